//! Input validation. Synchronous, runs before any provider call.

use crate::address::{Address, AddressKind, Network};
use crate::error::IllegalArgument;
use serde_json::Value;
use tracing::debug;

/// Largest BIP44 address index (31-bit, non-hardened)
pub const MAX_INDEX: i64 = 2_147_483_647;

/// Address index: integer in `0..=MAX_INDEX`.
pub fn index(name: &'static str, value: i64) -> Result<u32, IllegalArgument> {
    if !(0..=MAX_INDEX).contains(&value) {
        debug!(name, value, "index rejected");
        return Err(IllegalArgument::IndexOutOfRange { name, value, max: MAX_INDEX });
    }
    Ok(value as u32)
}

/// Requested address count: index range, at least one.
pub fn size(value: i64) -> Result<u32, IllegalArgument> {
    let size = index("size", value)?;
    if size == 0 {
        return Err(IllegalArgument::InvalidSize);
    }
    Ok(size)
}

/// Index from a JSON number. Fractional and non-numeric values fail.
pub fn index_value(name: &'static str, value: &Value) -> Result<u32, IllegalArgument> {
    index(name, json_integer(name, value)?)
}

/// Size from a JSON number.
pub fn size_value(value: &Value) -> Result<u32, IllegalArgument> {
    size(json_integer("size", value)?)
}

fn json_integer(name: &'static str, value: &Value) -> Result<i64, IllegalArgument> {
    let not_integer = || IllegalArgument::NotAnInteger { name, value: value.to_string() };
    let number = value.as_number().ok_or_else(not_integer)?;
    if let Some(i) = number.as_i64() {
        return Ok(i);
    }
    if number.as_u64().is_some() {
        // above i64::MAX, clamp so the range check reports it
        return Ok(i64::MAX);
    }
    match number.as_f64() {
        // float casts saturate, so out-of-range whole numbers still fail the range check
        Some(f) if f.fract() == 0.0 => Ok(f as i64),
        _ => Err(not_integer()),
    }
}

/// Even-length hex string. `allow_empty` is decided per call site.
pub fn hex(name: &'static str, value: &str, allow_empty: bool) -> Result<(), IllegalArgument> {
    if value.is_empty() {
        return if allow_empty { Ok(()) } else { Err(IllegalArgument::EmptyHex { name }) };
    }
    if value.len() % 2 != 0 || !value.bytes().all(|b| b.is_ascii_hexdigit()) {
        debug!(name, len = value.len(), "hex rejected");
        return Err(IllegalArgument::InvalidHex { name });
    }
    Ok(())
}

/// 32-byte transaction hash as 64 hex characters.
pub fn tx_hash(value: &str) -> Result<(), IllegalArgument> {
    if value.len() != 64 || !value.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(IllegalArgument::InvalidTxHash(value.to_string()));
    }
    Ok(())
}

/// Any address that classifies on `network`.
pub fn address(value: &str, network: Network) -> Result<Address, IllegalArgument> {
    Address::classify(value, network).map_err(|source| {
        debug!(address = value, error = %source, "address rejected");
        IllegalArgument::InvalidAddress { address: value.to_string(), source }
    })
}

/// Address that classifies and is of `kind`.
pub fn address_of_kind(value: &str, network: Network, kind: AddressKind) -> Result<Address, IllegalArgument> {
    let addr = address(value, network)?;
    if addr.kind != kind {
        return Err(IllegalArgument::WrongAddressKind { expected: kind, found: addr.kind });
    }
    Ok(addr)
}

/// Output amount in satoshis, non-zero.
pub fn amount(value: u64) -> Result<u64, IllegalArgument> {
    if value == 0 {
        return Err(IllegalArgument::ZeroAmount);
    }
    Ok(value)
}
