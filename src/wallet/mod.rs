//! Wallet - the DApp-facing façade over the two providers.
//!
//! # Architecture
//!
//! ```text
//! Wallet::method(args)
//!     │
//!     ├── validate::*        (sync, IllegalArgument, no provider touched)
//!     │
//!     ├── WalletProvider / NetworkProvider call(s)
//!     │        └── classify::call_checked → ProviderFailure
//!     │
//!     └── address codec      (classification, script → address)
//! ```
//!
//! # Operations
//!
//! | Method | Providers | Notes |
//! |--------|-----------|-------|
//! | `get_address` | wallet | single address at `index` |
//! | `get_addresses` | wallet | list, non-empty |
//! | `get_address_index` | wallet | current index |
//! | `get_redeem_script` | wallet | first script deriving the P2SH address |
//! | `get_redeem_scripts` / `add_redeem_script` | wallet | append-only |
//! | `get_utxos` / `get_balance` | wallet | spendable ++ unspendable |
//! | `sign` | wallet | P2PKH only |
//! | `send` / `advanced_send` | wallet → network | sign, then broadcast |
//! | `get_protocol_version` | either | by [`ProviderType`] |
//! | `get_network` / `get_fee_per_byte` / `broadcast_raw_tx` | network | |
//! | `default_dapp_id` / `set_default_dapp_id` | none | instance state |

mod namespace;
mod outputs;

pub use namespace::WalletNamespace;
pub use outputs::Destination;

use crate::address::{Address, AddressKind, Network};
use crate::config::WalletConfig;
use crate::error::{IllegalArgument, WalletError, WalletResult};
use crate::provider::classify::{self, call, call_checked};
use crate::provider::{ChangeType, NetworkProvider, Output, ProviderType, Providers, Utxo, WalletProvider};
use crate::validate;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

pub struct Wallet {
    providers: Providers,
    network: Network,
    default_dapp_id: RwLock<Option<String>>,
}

impl Wallet {
    /// Mainnet wallet with no default DApp ID.
    pub fn new(providers: Providers) -> Self {
        Self::from_config(WalletConfig::default(), providers)
    }

    pub fn from_config(config: WalletConfig, providers: Providers) -> Self {
        Self { providers, network: config.network, default_dapp_id: RwLock::new(config.default_dapp_id) }
    }

    pub fn providers(&self) -> &Providers { &self.providers }

    /// Network addresses are validated against
    pub fn network(&self) -> Network { self.network }

    // -------------------------------------------------------------------------
    // Addresses
    // -------------------------------------------------------------------------

    pub async fn get_address(&self, change: ChangeType, index: Option<i64>, dapp_id: Option<&str>) -> WalletResult<String> {
        let index = index.map(|i| validate::index("index", i)).transpose()?;
        let dapp_id = self.resolve_dapp_id(dapp_id)?;
        let wallet = self.wallet_provider()?;
        let mut addresses = call_checked(
            "getAddresses",
            wallet.get_addresses(change, Some(index.unwrap_or(0)), Some(1), Some(dapp_id.as_str())),
            classify::addresses,
        )
        .await?;
        Ok(addresses.swap_remove(0))
    }

    pub async fn get_addresses(
        &self,
        change: ChangeType,
        start_index: Option<i64>,
        size: Option<i64>,
        dapp_id: Option<&str>,
    ) -> WalletResult<Vec<String>> {
        let start_index = start_index.map(|i| validate::index("startIndex", i)).transpose()?;
        let size = size.map(validate::size).transpose()?;
        let dapp_id = self.resolve_dapp_id(dapp_id)?;
        let wallet = self.wallet_provider()?;
        call_checked(
            "getAddresses",
            wallet.get_addresses(change, start_index, size, Some(dapp_id.as_str())),
            classify::addresses,
        )
        .await
    }

    pub async fn get_address_index(&self, change: ChangeType, dapp_id: Option<&str>) -> WalletResult<u32> {
        let dapp_id = self.resolve_dapp_id(dapp_id)?;
        let wallet = self.wallet_provider()?;
        call_checked("getAddressIndex", wallet.get_address_index(change, Some(dapp_id.as_str())), classify::index).await
    }

    // -------------------------------------------------------------------------
    // Redeem scripts
    // -------------------------------------------------------------------------

    /// First stored script deriving `p2sh_address`, or `None` if no script matches.
    pub async fn get_redeem_script(&self, p2sh_address: &str, dapp_id: Option<&str>) -> WalletResult<Option<String>> {
        let target = validate::address_of_kind(p2sh_address, self.network, AddressKind::P2sh)?;
        let scripts = self.get_redeem_scripts(dapp_id).await?;
        let found = scripts.into_iter().find(|script| {
            Address::from_redeem_script(script, self.network).map(|a| a == target).unwrap_or(false)
        });
        if found.is_none() {
            debug!(address = %target, "no stored redeem script matches");
        }
        Ok(found)
    }

    pub async fn get_redeem_scripts(&self, dapp_id: Option<&str>) -> WalletResult<Vec<String>> {
        let dapp_id = self.resolve_dapp_id(dapp_id)?;
        let wallet = self.wallet_provider()?;
        call_checked("getRedeemScripts", wallet.get_redeem_scripts(Some(dapp_id.as_str())), classify::hex_list).await
    }

    pub async fn add_redeem_script(&self, redeem_script: &str, dapp_id: Option<&str>) -> WalletResult<()> {
        validate::hex("redeemScript", redeem_script, false)?;
        let dapp_id = self.resolve_dapp_id(dapp_id)?;
        let wallet = self.wallet_provider()?;
        call("addRedeemScript", wallet.add_redeem_script(redeem_script, Some(dapp_id.as_str()))).await
    }

    // -------------------------------------------------------------------------
    // UTXOs
    // -------------------------------------------------------------------------

    /// Spendable UTXOs, followed by the DApp's unspendable ones when `dapp_id` is given.
    pub async fn get_utxos(&self, dapp_id: Option<&str>) -> WalletResult<Vec<Utxo>> {
        let wallet = self.wallet_provider()?;
        let spendable = call_checked("getSpendableUtxos", wallet.get_spendable_utxos(), classify::utxos);
        let Some(dapp_id) = dapp_id else {
            return spendable.await;
        };
        let unspendable = call_checked("getUnspendableUtxos", wallet.get_unspendable_utxos(dapp_id), classify::utxos);
        let (mut utxos, rest) = futures::future::try_join(spendable, unspendable).await?;
        utxos.extend(rest);
        Ok(utxos)
    }

    pub async fn get_balance(&self, dapp_id: Option<&str>) -> WalletResult<u64> {
        total_satoshis(&self.get_utxos(dapp_id).await?)
    }

    // -------------------------------------------------------------------------
    // Signing and sending
    // -------------------------------------------------------------------------

    pub async fn sign(&self, address: &str, data_to_sign: &str) -> WalletResult<String> {
        validate::address_of_kind(address, self.network, AddressKind::P2pkh)?;
        validate::hex("dataToSign", data_to_sign, false)?;
        let wallet = self.wallet_provider()?;
        call_checked("sign", wallet.sign(address, data_to_sign), classify::non_empty_hex).await
    }

    /// Pay `destinations`, optionally attaching hex `data` chunks in one
    /// `OP_RETURN` output. An empty chunk list adds no output. Uses the
    /// default DApp ID.
    pub async fn send(&self, destinations: &[Destination], data: Option<&[String]>) -> WalletResult<String> {
        let mut outputs = outputs::resolve_destinations(destinations, self.network)?;
        if let Some(chunks) = data.filter(|c| !c.is_empty()) {
            outputs.push(outputs::data_output(chunks)?);
        }
        outputs::check_outputs(&outputs)?;
        let dapp_id = self.default_dapp_id();
        self.sign_and_broadcast(&outputs, dapp_id.as_deref()).await
    }

    /// Sign exactly `outputs` and broadcast. The provider adds nothing.
    pub async fn advanced_send(&self, outputs: &[Output], dapp_id: Option<&str>) -> WalletResult<String> {
        outputs::check_outputs(outputs)?;
        let dapp_id = dapp_id.map(str::to_string).or_else(|| self.default_dapp_id());
        self.sign_and_broadcast(outputs, dapp_id.as_deref()).await
    }

    async fn sign_and_broadcast(&self, outputs: &[Output], dapp_id: Option<&str>) -> WalletResult<String> {
        let wallet = self.wallet_provider()?;
        let network = self.network_provider()?;
        let raw_tx = call_checked("createSignedTx", wallet.create_signed_tx(outputs, dapp_id), classify::non_empty_hex).await?;
        let txid = call_checked("broadcastRawTx", network.broadcast_raw_tx(&raw_tx), classify::tx_hash).await?;
        info!(%txid, outputs = outputs.len(), "transaction broadcast");
        Ok(txid)
    }

    // -------------------------------------------------------------------------
    // Network
    // -------------------------------------------------------------------------

    /// `Network`: the P2P protocol version. `Wallet`: the wallet provider's
    /// API version, a separate numbering.
    pub async fn get_protocol_version(&self, provider_type: ProviderType) -> WalletResult<u32> {
        match provider_type {
            ProviderType::Network => call("getProtocolVersion", self.network_provider()?.get_protocol_version()).await,
            ProviderType::Wallet => call("getVersion", self.wallet_provider()?.get_version()).await,
        }
    }

    pub async fn get_network(&self) -> WalletResult<Network> {
        let magic = call("getNetworkMagic", self.network_provider()?.get_network_magic()).await?;
        Network::from_magic(magic)
            .ok_or_else(|| WalletError::provider("getNetworkMagic", format!("unknown network magic 0x{:08x}", magic)))
    }

    pub async fn get_fee_per_byte(&self) -> WalletResult<u64> {
        call("getFeePerByte", self.network_provider()?.get_fee_per_byte()).await
    }

    pub async fn broadcast_raw_tx(&self, raw_tx: &str) -> WalletResult<String> {
        validate::hex("rawTx", raw_tx, false)?;
        let network = self.network_provider()?;
        call_checked("broadcastRawTx", network.broadcast_raw_tx(raw_tx), classify::tx_hash).await
    }

    // -------------------------------------------------------------------------
    // Default DApp ID
    // -------------------------------------------------------------------------

    pub fn default_dapp_id(&self) -> Option<String> {
        self.default_dapp_id.read().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Last write wins. `None` clears the default.
    pub fn set_default_dapp_id(&self, dapp_id: Option<String>) {
        *self.default_dapp_id.write().unwrap_or_else(|p| p.into_inner()) = dapp_id;
    }

    fn resolve_dapp_id(&self, dapp_id: Option<&str>) -> Result<String, IllegalArgument> {
        match dapp_id {
            Some(id) => Ok(id.to_string()),
            None => self.default_dapp_id().ok_or(IllegalArgument::MissingDAppId),
        }
    }

    fn wallet_provider(&self) -> WalletResult<&Arc<dyn WalletProvider>> {
        self.providers.wallet.as_ref().ok_or_else(|| WalletError::provider("walletProvider", "no wallet provider set"))
    }

    fn network_provider(&self) -> WalletResult<&Arc<dyn NetworkProvider>> {
        self.providers.network.as_ref().ok_or_else(|| WalletError::provider("networkProvider", "no network provider set"))
    }
}

/// Sum of UTXO amounts. Overflow means the provider reported impossible values.
pub(crate) fn total_satoshis(utxos: &[Utxo]) -> WalletResult<u64> {
    utxos
        .iter()
        .try_fold(0u64, |sum, u| sum.checked_add(u.satoshis))
        .ok_or_else(|| WalletError::provider("getSpendableUtxos", "balance overflows u64"))
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("providers", &self.providers)
            .field("network", &self.network)
            .field("default_dapp_id", &self.default_dapp_id())
            .finish()
    }
}
