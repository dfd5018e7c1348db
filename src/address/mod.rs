//! Address codec - CashAddr classification and redeem-script derivation
//!
//! Pure functions, no provider access. Used both to reject bad input before a
//! provider is called and to turn provider-returned redeem scripts back into
//! addresses.
//!
//! | Kind | Version byte | Lock script |
//! |------|--------------|-------------|
//! | P2PKH | `0x00` | `OP_DUP OP_HASH160 <hash> OP_EQUALVERIFY OP_CHECKSIG` |
//! | P2SH | `0x08` | `OP_HASH160 <hash> OP_EQUAL` |
//!
//! # Example
//!
//! ```ignore
//! let addr = Address::classify("bitcoincash:ppm2qsznhks23z7629mms6s4cwef74vcwvn0h829pq", Network::Mainnet)?;
//! assert_eq!(addr.kind, AddressKind::P2sh);
//! ```

mod cashaddr;

use bitcoin::hashes::{hash160, Hash as _};
use bitcoin::{PubkeyHash, ScriptBuf, ScriptHash};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Hash length carried by every supported address
pub const HASH_LEN: usize = 20;

const VERSION_TYPE_MASK: u8 = 0x78;
const VERSION_SIZE_MASK: u8 = 0x07;

/// Reasons an address string or redeem script is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("address mixes upper and lower case")]
    MixedCase,
    #[error("invalid address prefix '{0}'")]
    InvalidPrefix(String),
    #[error("address payload too short")]
    TooShort,
    #[error("invalid address character '{0}'")]
    InvalidCharacter(char),
    #[error("address checksum mismatch")]
    BadChecksum,
    #[error("address payload has non-zero padding")]
    InvalidPadding,
    #[error("unknown address version byte 0x{0:02x}")]
    UnknownVersion(u8),
    #[error("address hash must be {HASH_LEN} bytes, got {0}")]
    InvalidHashLength(usize),
    #[error("address prefix '{found}' does not match network prefix '{expected}'")]
    WrongNetwork { expected: &'static str, found: String },
    #[error("invalid redeem script: {0}")]
    InvalidScript(String),
    #[error("unknown network '{0}'")]
    UnknownNetwork(String),
}

/// Bitcoin Cash network, selecting the CashAddr prefix and P2P magic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
    Regtest,
}

impl Network {
    pub const ALL: [Network; 3] = [Network::Mainnet, Network::Testnet, Network::Regtest];

    pub fn as_str(&self) -> &'static str {
        match self { Network::Mainnet => "mainnet", Network::Testnet => "testnet", Network::Regtest => "regtest" }
    }

    /// CashAddr human-readable prefix
    pub fn prefix(&self) -> &'static str {
        match self { Network::Mainnet => "bitcoincash", Network::Testnet => "bchtest", Network::Regtest => "bchreg" }
    }

    /// Message-start bytes as reported by a network provider
    pub fn magic(&self) -> u32 {
        match self { Network::Mainnet => 0xe3e1_f3e8, Network::Testnet => 0xf4e5_f3f4, Network::Regtest => 0xdab5_bffa }
    }

    pub fn from_magic(magic: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.magic() == magic)
    }

}

impl FromStr for Network {
    type Err = AddressError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mainnet" | "main" | "bitcoincash" => Ok(Network::Mainnet),
            "testnet" | "test" | "bchtest" => Ok(Network::Testnet),
            "regtest" | "reg" | "bchreg" => Ok(Network::Regtest),
            _ => Err(AddressError::UnknownNetwork(value.to_string())),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressKind {
    #[serde(rename = "p2pkh")]
    P2pkh,
    #[serde(rename = "p2sh")]
    P2sh,
}

impl AddressKind {
    fn version_byte(&self) -> u8 {
        match self { AddressKind::P2pkh => 0x00, AddressKind::P2sh => 0x08 }
    }

    fn from_version(version: u8) -> Result<Self, AddressError> {
        if version & VERSION_SIZE_MASK != 0 {
            // size bits other than 160-bit
            return Err(AddressError::UnknownVersion(version));
        }
        match version & VERSION_TYPE_MASK {
            0x00 => Ok(AddressKind::P2pkh),
            0x08 => Ok(AddressKind::P2sh),
            _ => Err(AddressError::UnknownVersion(version)),
        }
    }
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self { AddressKind::P2pkh => "P2PKH", AddressKind::P2sh => "P2SH" })
    }
}

/// A checksum-verified CashAddr address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    pub kind: AddressKind,
    pub network: Network,
    pub hash: [u8; HASH_LEN],
}

impl Address {
    pub fn new(kind: AddressKind, network: Network, hash: [u8; HASH_LEN]) -> Self {
        Self { kind, network, hash }
    }

    /// Parse and verify `text` as an address of `network`.
    ///
    /// Fails on unparseable text, a bad checksum, an unknown version byte, a
    /// hash that is not 20 bytes, or a prefix belonging to another network.
    pub fn classify(text: &str, network: Network) -> Result<Self, AddressError> {
        let (prefix, payload) = cashaddr::decode(text.trim(), network.prefix())?;
        if prefix != network.prefix() {
            return Err(AddressError::WrongNetwork { expected: network.prefix(), found: prefix });
        }
        let (&version, hash) = payload.split_first().ok_or(AddressError::TooShort)?;
        let kind = AddressKind::from_version(version)?;
        let hash: [u8; HASH_LEN] = hash.try_into().map_err(|_| AddressError::InvalidHashLength(hash.len()))?;
        Ok(Self { kind, network, hash })
    }

    /// P2SH address committing to `redeem_script_hex` (hash160 of the script).
    pub fn from_redeem_script(redeem_script_hex: &str, network: Network) -> Result<Self, AddressError> {
        if redeem_script_hex.is_empty() {
            return Err(AddressError::InvalidScript("empty script".into()));
        }
        let script = hex::decode(redeem_script_hex).map_err(|e| AddressError::InvalidScript(e.to_string()))?;
        Ok(Self::new(AddressKind::P2sh, network, script_hash(&script)))
    }

    pub fn is_p2sh(&self) -> bool { self.kind == AddressKind::P2sh }

    pub fn is_p2pkh(&self) -> bool { self.kind == AddressKind::P2pkh }

    /// Canonical lowercase `prefix:payload` form
    pub fn encode(&self) -> String {
        let mut payload = Vec::with_capacity(1 + HASH_LEN);
        payload.push(self.kind.version_byte());
        payload.extend_from_slice(&self.hash);
        cashaddr::encode(self.network.prefix(), &payload)
    }

    /// Standard locking script paying to this address
    pub fn lock_script(&self) -> ScriptBuf {
        match self.kind {
            AddressKind::P2pkh => ScriptBuf::new_p2pkh(&PubkeyHash::from_byte_array(self.hash)),
            AddressKind::P2sh => ScriptBuf::new_p2sh(&ScriptHash::from_byte_array(self.hash)),
        }
    }

    pub fn lock_script_hex(&self) -> String {
        hex::encode(self.lock_script().as_bytes())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.encode()) }
}

/// RIPEMD160(SHA256(script))
pub fn script_hash(script: &[u8]) -> [u8; HASH_LEN] {
    hash160::Hash::hash(script).to_byte_array()
}
