//! Wallet configuration - passed from the embedding application

use crate::address::Network;

pub const ENV_NETWORK: &str = "CASHGATE_NETWORK";
pub const ENV_DAPP_ID: &str = "CASHGATE_DAPP_ID";

/// Wallet configuration. Higher layers construct this.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletConfig {
    /// Network addresses must belong to
    pub network: Network,
    /// Initial default DApp ID
    pub default_dapp_id: Option<String>,
}

impl WalletConfig {
    pub fn new(network: Network) -> Self {
        Self { network, ..Default::default() }
    }
    pub fn mainnet() -> Self { Self::new(Network::Mainnet) }
    pub fn testnet() -> Self { Self::new(Network::Testnet) }
    pub fn regtest() -> Self { Self::new(Network::Regtest) }
    pub fn with_network(mut self, network: Network) -> Self { self.network = network; self }
    pub fn with_default_dapp_id(mut self, id: impl Into<String>) -> Self { self.default_dapp_id = Some(id.into()); self }

    /// Read `CASHGATE_NETWORK` and `CASHGATE_DAPP_ID`. Unset or unknown
    /// values fall back to the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = std::env::var(ENV_NETWORK) {
            match value.parse::<Network>() {
                Ok(network) => config.network = network,
                Err(e) => tracing::warn!(error = %e, "ignoring {}, using {}", ENV_NETWORK, config.network),
            }
        }
        if let Ok(id) = std::env::var(ENV_DAPP_ID) {
            if !id.trim().is_empty() {
                config.default_dapp_id = Some(id.trim().to_string());
            }
        }
        config
    }
}
