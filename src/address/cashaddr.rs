//! CashAddr base32 + BCH checksum.
//!
//! ```text
//! prefix ":" base32( version || hash ) base32( checksum )
//!                     └─ 8-bit → 5-bit ─┘  └─ 40 bits ─┘
//! ```
//!
//! The checksum is a 40-bit BCH code over the low five bits of every prefix
//! character, a zero separator, the 5-bit payload and eight zero groups.

use super::AddressError;

const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";
const CHECKSUM_LEN: usize = 8;

fn polymod(values: impl IntoIterator<Item = u8>) -> u64 {
    const GENERATORS: [u64; 5] = [0x98f2bc8e61, 0x79b76d99e2, 0xf33e5fb3c4, 0xae2eabe2a8, 0x1e4f43e470];
    let mut c: u64 = 1;
    for d in values {
        let c0 = (c >> 35) as u8;
        c = ((c & 0x07_ffff_ffff) << 5) ^ u64::from(d);
        for (bit, g) in GENERATORS.iter().enumerate() {
            if c0 & (1 << bit) != 0 {
                c ^= g;
            }
        }
    }
    c ^ 1
}

fn expand_prefix(prefix: &str) -> impl Iterator<Item = u8> + '_ {
    prefix.bytes().map(|b| b & 0x1f).chain(std::iter::once(0))
}

fn checksum(prefix: &str, payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let m = polymod(
        expand_prefix(prefix)
            .chain(payload.iter().copied())
            .chain([0u8; CHECKSUM_LEN]),
    );
    let mut out = [0u8; CHECKSUM_LEN];
    for (i, group) in out.iter_mut().enumerate() {
        *group = ((m >> (5 * (CHECKSUM_LEN - 1 - i))) & 0x1f) as u8;
    }
    out
}

fn verify(prefix: &str, data: &[u8]) -> bool {
    polymod(expand_prefix(prefix).chain(data.iter().copied())) == 0
}

/// Regroup a bit stream from `from`-bit to `to`-bit words.
///
/// With `pad` the trailing bits are zero-padded into a final word; without
/// it, leftover bits must be fewer than `from` and all zero.
fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Option<Vec<u8>> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let max = (1u32 << to) - 1;
    let mut out = Vec::with_capacity(data.len() * from as usize / to as usize + 1);
    for &value in data {
        if u32::from(value) >> from != 0 {
            return None;
        }
        acc = (acc << from) | u32::from(value);
        bits += from;
        while bits >= to {
            bits -= to;
            out.push(((acc >> bits) & max) as u8);
        }
    }
    if pad {
        if bits > 0 {
            out.push(((acc << (to - bits)) & max) as u8);
        }
    } else if bits >= from || (acc << (to - bits)) & max != 0 {
        return None;
    }
    Some(out)
}

/// Encode `payload` bytes (version byte + hash) under `prefix`.
pub(crate) fn encode(prefix: &str, payload: &[u8]) -> String {
    // 8 -> 5 with padding never fails for byte input
    let words = convert_bits(payload, 8, 5, true).unwrap_or_default();
    let sum = checksum(prefix, &words);
    let mut out = String::with_capacity(prefix.len() + 1 + words.len() + CHECKSUM_LEN);
    out.push_str(prefix);
    out.push(':');
    out.extend(words.iter().chain(sum.iter()).map(|&w| CHARSET[w as usize] as char));
    out
}

/// Decode `text` into `(prefix, payload bytes)`.
///
/// A missing prefix is filled with `default_prefix` before the checksum is
/// verified. The returned prefix is always lowercase.
pub(crate) fn decode(text: &str, default_prefix: &str) -> Result<(String, Vec<u8>), AddressError> {
    let has_lower = text.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = text.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(AddressError::MixedCase);
    }
    let lowered = text.to_ascii_lowercase();
    let (prefix, body) = match lowered.rsplit_once(':') {
        Some((p, b)) => (p.to_string(), b),
        None => (default_prefix.to_string(), lowered.as_str()),
    };
    if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()) {
        return Err(AddressError::InvalidPrefix(prefix));
    }
    if body.len() <= CHECKSUM_LEN {
        return Err(AddressError::TooShort);
    }

    let data = body
        .chars()
        .map(|c| {
            CHARSET
                .iter()
                .position(|&x| x as char == c)
                .map(|p| p as u8)
                .ok_or(AddressError::InvalidCharacter(c))
        })
        .collect::<Result<Vec<u8>, _>>()?;

    if !verify(&prefix, &data) {
        return Err(AddressError::BadChecksum);
    }

    let words = &data[..data.len() - CHECKSUM_LEN];
    let payload = convert_bits(words, 5, 8, false).ok_or(AddressError::InvalidPadding)?;
    Ok((prefix, payload))
}
