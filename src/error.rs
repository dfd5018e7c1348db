//! Error taxonomy: local precondition failures vs upstream provider failures.

use crate::address::{AddressError, AddressKind};
use thiserror::Error;

pub type WalletResult<T> = Result<T, WalletError>;

/// Which side of the boundary failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input, rejected before any provider was called
    IllegalArgument,
    /// A provider call rejected or returned a malformed value
    Provider,
}

/// Violated precondition. Raised before any provider call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IllegalArgument {
    #[error("invalid address '{address}': {source}")]
    InvalidAddress { address: String, source: AddressError },
    #[error("expected a {expected} address, got {found}")]
    WrongAddressKind { expected: AddressKind, found: AddressKind },
    #[error("{name} must be an integer in 0..={max}, got {value}")]
    IndexOutOfRange { name: &'static str, value: i64, max: i64 },
    #[error("{name} must be an integer, got {value}")]
    NotAnInteger { name: &'static str, value: String },
    #[error("size must be at least 1")]
    InvalidSize,
    #[error("{name} is not valid hex")]
    InvalidHex { name: &'static str },
    #[error("{name} must not be empty")]
    EmptyHex { name: &'static str },
    #[error("'{0}' is not a 32-byte transaction hash")]
    InvalidTxHash(String),
    #[error("no DApp ID given and no default DApp ID set")]
    MissingDAppId,
    #[error("transaction needs at least one output")]
    EmptyOutputs,
    #[error("output amount must be greater than zero")]
    ZeroAmount,
    #[error("data chunk of {0} bytes cannot be pushed")]
    DataTooLarge(usize),
    #[error("missing parameter '{0}'")]
    MissingParam(&'static str),
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParam { name: &'static str, reason: String },
    #[error("unknown path: {0}")]
    UnknownPath(String),
}

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("illegal argument: {0}")]
    IllegalArgument(#[from] IllegalArgument),

    #[error("provider call {call} failed: {reason}")]
    Provider { call: &'static str, reason: String },
}

impl WalletError {
    pub fn provider(call: &'static str, reason: impl Into<String>) -> Self {
        WalletError::Provider { call, reason: reason.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            WalletError::IllegalArgument(_) => ErrorKind::IllegalArgument,
            WalletError::Provider { .. } => ErrorKind::Provider,
        }
    }

    pub fn is_illegal_argument(&self) -> bool { self.kind() == ErrorKind::IllegalArgument }

    pub fn is_provider(&self) -> bool { self.kind() == ErrorKind::Provider }

    /// Only provider failures can succeed on a later attempt.
    pub fn is_retryable(&self) -> bool { self.is_provider() }
}
