//! Provider outcome classification.
//!
//! Every provider call goes through [`call`] or [`call_checked`]. A rejected
//! call, or a value failing its shape check, becomes
//! [`WalletError::Provider`] carrying the call name. No retries.

use crate::error::{WalletError, WalletResult};
use crate::provider::Utxo;
use crate::validate;
use std::future::Future;
use tracing::{debug, warn};

/// Await `fut` and classify a rejection.
pub async fn call<T, F>(name: &'static str, fut: F) -> WalletResult<T>
where
    F: Future<Output = anyhow::Result<T>>,
{
    call_checked(name, fut, |_| Ok(())).await
}

/// Await `fut`, then run `check` on the value.
pub async fn call_checked<T, F, C>(name: &'static str, fut: F, check: C) -> WalletResult<T>
where
    F: Future<Output = anyhow::Result<T>>,
    C: FnOnce(&T) -> Result<(), String>,
{
    debug!(call = name, "provider call");
    let value = fut.await.map_err(|e| {
        warn!(call = name, error = %e, "provider call rejected");
        WalletError::provider(name, format!("{:#}", e))
    })?;
    check(&value).map_err(|reason| {
        warn!(call = name, %reason, "provider returned invalid value");
        WalletError::provider(name, format!("invalid value: {}", reason))
    })?;
    Ok(value)
}

// Shape checks

pub fn non_empty<T>(values: &Vec<T>) -> Result<(), String> {
    if values.is_empty() { Err("empty result".into()) } else { Ok(()) }
}

/// Non-empty list of non-empty strings. Address text is the provider's own
/// and is passed through unparsed.
pub fn addresses(values: &Vec<String>) -> Result<(), String> {
    non_empty(values)?;
    match values.iter().position(|v| v.trim().is_empty()) {
        Some(i) => Err(format!("address {} is blank", i)),
        None => Ok(()),
    }
}

/// Non-empty list of non-empty hex strings.
pub fn hex_list(values: &Vec<String>) -> Result<(), String> {
    non_empty(values)?;
    values.iter().try_for_each(non_empty_hex)
}

pub fn non_empty_hex(value: &String) -> Result<(), String> {
    validate::hex("value", value, false).map_err(|e| e.to_string())
}

pub fn tx_hash(value: &String) -> Result<(), String> {
    validate::tx_hash(value).map_err(|e| e.to_string())
}

pub fn index(value: &u32) -> Result<(), String> {
    validate::index("address index", i64::from(*value)).map(|_| ()).map_err(|e| e.to_string())
}

/// Every UTXO carries a well-formed transaction id.
pub fn utxos(values: &Vec<Utxo>) -> Result<(), String> {
    for utxo in values {
        validate::tx_hash(&utxo.tx_id).map_err(|e| format!("utxo {}:{}: {}", utxo.tx_id, utxo.output_index, e))?;
    }
    Ok(())
}
