//! WalletNamespace - JSON path surface over [`Wallet`] for DApp bridges.
//!
//! Reads query, writes mutate or spend. Parameters and results are JSON
//! objects with camelCase keys; numbers are validated here, so a fractional
//! `index` is rejected before the wallet is touched.

use super::{Destination, Wallet};
use crate::error::{IllegalArgument, WalletResult};
use crate::provider::{ChangeType, Output, ProviderType};
use crate::validate;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;

pub mod paths {
    pub const ADDRESS: &str = "/address";
    pub const ADDRESSES: &str = "/addresses";
    pub const ADDRESS_INDEX: &str = "/address-index";
    pub const REDEEM_SCRIPT: &str = "/redeem-script";
    pub const REDEEM_SCRIPTS: &str = "/redeem-scripts";
    pub const UTXOS: &str = "/utxos";
    pub const BALANCE: &str = "/balance";
    pub const PROTOCOL_VERSION: &str = "/protocol-version";
    pub const NETWORK: &str = "/network";
    pub const FEE_PER_BYTE: &str = "/fee-per-byte";
    pub const DEFAULT_DAPP_ID: &str = "/default-dapp-id";
    pub const SIGN: &str = "/sign";
    pub const SEND: &str = "/send";
    pub const ADVANCED_SEND: &str = "/advanced-send";
    pub const BROADCAST: &str = "/broadcast";

    pub const READ: &[&str] = &[
        ADDRESS, ADDRESSES, ADDRESS_INDEX, REDEEM_SCRIPT, REDEEM_SCRIPTS, UTXOS, BALANCE,
        PROTOCOL_VERSION, NETWORK, FEE_PER_BYTE, DEFAULT_DAPP_ID,
    ];
    pub const WRITE: &[&str] = &[REDEEM_SCRIPT, SIGN, SEND, ADVANCED_SEND, BROADCAST, DEFAULT_DAPP_ID];
}

#[derive(Debug, Clone)]
pub struct WalletNamespace { wallet: Arc<Wallet> }

impl WalletNamespace {
    pub fn new(wallet: Arc<Wallet>) -> Self { Self { wallet } }

    pub fn wallet_handle(&self) -> Arc<Wallet> { self.wallet.clone() }

    pub async fn read(&self, path: &str, params: &Value) -> WalletResult<Value> {
        let w = &self.wallet;
        let dapp_id = opt_str(params, "dAppId")?;
        Ok(match path {
            paths::ADDRESS => {
                let index = opt_param(params, "index").map(|v| validate::index_value("index", v)).transpose()?;
                let address = w.get_address(change(params)?, index.map(i64::from), dapp_id).await?;
                json!({"address": address})
            }
            paths::ADDRESSES => {
                let start = opt_param(params, "startIndex").map(|v| validate::index_value("startIndex", v)).transpose()?;
                let size = opt_param(params, "size").map(validate::size_value).transpose()?;
                let addresses = w.get_addresses(change(params)?, start.map(i64::from), size.map(i64::from), dapp_id).await?;
                json!({"addresses": addresses, "count": addresses.len()})
            }
            paths::ADDRESS_INDEX => json!({"index": w.get_address_index(change(params)?, dapp_id).await?}),
            paths::REDEEM_SCRIPT => {
                let address = str_param(params, "address")?;
                json!({"redeemScript": w.get_redeem_script(address, dapp_id).await?})
            }
            paths::REDEEM_SCRIPTS => json!({"redeemScripts": w.get_redeem_scripts(dapp_id).await?}),
            paths::UTXOS => {
                let utxos = w.get_utxos(dapp_id).await?;
                let total = super::total_satoshis(&utxos)?;
                json!({"utxos": utxos, "count": utxos.len(), "totalSatoshis": total})
            }
            paths::BALANCE => json!({"balance": w.get_balance(dapp_id).await?}),
            paths::PROTOCOL_VERSION => {
                let provider_type = match opt_param(params, "providerType") {
                    Some(v) => from_value::<ProviderType>("providerType", v)?,
                    None => ProviderType::Network,
                };
                let version = w.get_protocol_version(provider_type).await?;
                match provider_type {
                    ProviderType::Network => json!({"protocolVersion": version, "providerType": provider_type}),
                    ProviderType::Wallet => json!({"walletVersion": version, "providerType": provider_type}),
                }
            }
            paths::NETWORK => {
                let network = w.get_network().await?;
                json!({"network": network, "magic": format!("{:08x}", network.magic()), "prefix": network.prefix()})
            }
            paths::FEE_PER_BYTE => json!({"feePerByte": w.get_fee_per_byte().await?}),
            paths::DEFAULT_DAPP_ID => json!({"dAppId": w.default_dapp_id()}),
            _ => return Err(IllegalArgument::UnknownPath(path.to_string()).into()),
        })
    }

    pub async fn write(&self, path: &str, data: Value) -> WalletResult<Value> {
        let w = &self.wallet;
        let dapp_id = opt_str(&data, "dAppId")?;
        Ok(match path {
            paths::REDEEM_SCRIPT => {
                w.add_redeem_script(str_param(&data, "redeemScript")?, dapp_id).await?;
                json!({"added": true})
            }
            paths::SIGN => {
                let signature = w.sign(str_param(&data, "address")?, str_param(&data, "dataToSign")?).await?;
                json!({"signature": signature})
            }
            paths::SEND => {
                let destinations = one_or_many::<Destination>(&data, "destination")?;
                let chunks = match opt_param(&data, "data") {
                    Some(v) => Some(one_or_many_value::<String>("data", v)?),
                    None => None,
                };
                let txid = w.send(&destinations, chunks.as_deref()).await?;
                json!({"txid": txid})
            }
            paths::ADVANCED_SEND => {
                let outputs: Vec<Output> = from_value("outputs", param(&data, "outputs")?)?;
                json!({"txid": w.advanced_send(&outputs, dapp_id).await?})
            }
            paths::BROADCAST => json!({"txid": w.broadcast_raw_tx(str_param(&data, "rawTx")?).await?}),
            paths::DEFAULT_DAPP_ID => {
                w.set_default_dapp_id(dapp_id.map(str::to_string));
                json!({"dAppId": w.default_dapp_id()})
            }
            _ => return Err(IllegalArgument::UnknownPath(path.to_string()).into()),
        })
    }

    pub fn list(&self) -> Vec<String> {
        let mut all: Vec<String> = paths::READ.iter().chain(paths::WRITE).map(|s| (*s).into()).collect();
        all.sort();
        all.dedup();
        all
    }
}

fn opt_param<'a>(params: &'a Value, name: &str) -> Option<&'a Value> {
    params.get(name).filter(|v| !v.is_null())
}

fn param<'a>(params: &'a Value, name: &'static str) -> Result<&'a Value, IllegalArgument> {
    opt_param(params, name).ok_or(IllegalArgument::MissingParam(name))
}

fn str_param<'a>(params: &'a Value, name: &'static str) -> Result<&'a str, IllegalArgument> {
    param(params, name)?
        .as_str()
        .ok_or_else(|| IllegalArgument::InvalidParam { name, reason: "expected a string".into() })
}

fn opt_str<'a>(params: &'a Value, name: &'static str) -> Result<Option<&'a str>, IllegalArgument> {
    opt_param(params, name).map(|_| str_param(params, name)).transpose()
}

fn change(params: &Value) -> Result<ChangeType, IllegalArgument> {
    str_param(params, "changeType")?.parse()
}

fn from_value<T: DeserializeOwned>(name: &'static str, value: &Value) -> Result<T, IllegalArgument> {
    serde_json::from_value(value.clone()).map_err(|e| IllegalArgument::InvalidParam { name, reason: e.to_string() })
}

/// Accept `name` as a single item or `{name}s` / array form.
fn one_or_many<T: DeserializeOwned>(data: &Value, name: &'static str) -> Result<Vec<T>, IllegalArgument> {
    let plural = format!("{}s", name);
    let value = opt_param(data, name)
        .or_else(|| opt_param(data, &plural))
        .ok_or(IllegalArgument::MissingParam(name))?;
    one_or_many_value(name, value)
}

fn one_or_many_value<T: DeserializeOwned>(name: &'static str, value: &Value) -> Result<Vec<T>, IllegalArgument> {
    match value {
        Value::Array(_) => from_value(name, value),
        _ => Ok(vec![from_value(name, value)?]),
    }
}
