//! Provider seams - the two capability-scoped backends a [`Wallet`](crate::Wallet) drives.
//!
//! ```text
//! Wallet
//!   ├── WalletProvider  (keys, signing, UTXO + redeem-script storage)
//!   └── NetworkProvider (protocol version, network magic, fees, relay)
//! ```
//!
//! Implementations return `anyhow::Result`; every outcome is classified by
//! [`classify`] into success or a provider failure.

pub mod classify;

use crate::error::IllegalArgument;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// BIP44 change branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Receive,
    Change,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self { ChangeType::Receive => "receive", ChangeType::Change => "change" }
    }
}

impl FromStr for ChangeType {
    type Err = IllegalArgument;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "receive" | "external" | "0" => Ok(ChangeType::Receive),
            "change" | "internal" | "1" => Ok(ChangeType::Change),
            _ => Err(IllegalArgument::InvalidParam {
                name: "changeType",
                reason: format!("unknown change type '{}'", value),
            }),
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Which backend a version query targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Network,
    Wallet,
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self { ProviderType::Network => "network", ProviderType::Wallet => "wallet" })
    }
}

/// Unspent output as reported by the wallet provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Utxo {
    pub tx_id: String,
    pub output_index: u32,
    pub address: String,
    pub script: String,
    pub satoshis: u64,
}

/// Transaction output handed to the wallet provider for signing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Output {
    /// Locking script, hex
    pub lock_script: String,
    /// Satoshis
    pub amount: u64,
}

impl Output {
    pub fn new(lock_script: impl Into<String>, amount: u64) -> Self {
        Self { lock_script: lock_script.into(), amount }
    }
}

/// Keys, signing and storage. All methods may fail.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    async fn get_version(&self) -> anyhow::Result<u32>;

    async fn get_addresses(
        &self,
        change: ChangeType,
        start_index: Option<u32>,
        size: Option<u32>,
        dapp_id: Option<&str>,
    ) -> anyhow::Result<Vec<String>>;

    async fn get_address_index(&self, change: ChangeType, dapp_id: Option<&str>) -> anyhow::Result<u32>;

    async fn get_redeem_scripts(&self, dapp_id: Option<&str>) -> anyhow::Result<Vec<String>>;

    async fn add_redeem_script(&self, redeem_script: &str, dapp_id: Option<&str>) -> anyhow::Result<()>;

    async fn get_spendable_utxos(&self) -> anyhow::Result<Vec<Utxo>>;

    async fn get_unspendable_utxos(&self, dapp_id: &str) -> anyhow::Result<Vec<Utxo>>;

    /// DER signature, hex
    async fn sign(&self, address: &str, data_to_sign: &str) -> anyhow::Result<String>;

    /// Signed raw transaction, hex. The provider adds no outputs of its own.
    async fn create_signed_tx(&self, outputs: &[Output], dapp_id: Option<&str>) -> anyhow::Result<String>;
}

/// Chain view and relay.
#[async_trait]
pub trait NetworkProvider: Send + Sync {
    async fn get_protocol_version(&self) -> anyhow::Result<u32>;

    async fn get_network_magic(&self) -> anyhow::Result<u32>;

    /// Satoshis per byte
    async fn get_fee_per_byte(&self) -> anyhow::Result<u64>;

    /// Relay a raw transaction, returning its id
    async fn broadcast_raw_tx(&self, raw_tx: &str) -> anyhow::Result<String>;
}

/// The backends a wallet is wired to. Either may be absent.
#[derive(Clone, Default)]
pub struct Providers {
    pub network: Option<Arc<dyn NetworkProvider>>,
    pub wallet: Option<Arc<dyn WalletProvider>>,
}

impl Providers {
    pub fn new(network: Option<Arc<dyn NetworkProvider>>, wallet: Option<Arc<dyn WalletProvider>>) -> Self {
        Self { network, wallet }
    }
    pub fn with_network(mut self, p: Arc<dyn NetworkProvider>) -> Self { self.network = Some(p); self }
    pub fn with_wallet(mut self, p: Arc<dyn WalletProvider>) -> Self { self.wallet = Some(p); self }
}

impl fmt::Debug for Providers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Providers")
            .field("network", &self.network.is_some())
            .field("wallet", &self.wallet.is_some())
            .finish()
    }
}
