//! Cashgate: DApp wallet gateway. Validates, then delegates to providers.
//!
//! # Architecture
//!
//! ```text
//! DApp
//!   │
//!   ├── WalletNamespace (JSON paths: /address, /utxos, /send, ...)
//!   │
//!   └── Wallet (façade, owns the default DApp ID)
//!         ├── validate   → IllegalArgument, before any provider call
//!         ├── address    → CashAddr classify / script → P2SH address
//!         ├── classify   → ProviderFailure on rejection or bad shape
//!         │
//!         ├── WalletProvider  (keys, signing, UTXOs, redeem scripts)
//!         └── NetworkProvider (protocol version, magic, fees, relay)
//! ```
//!
//! # Errors
//!
//! | Kind | Raised | Retry? |
//! |------|--------|--------|
//! | `IllegalArgument` | before any provider call | no |
//! | `Provider` | provider rejected or returned a malformed value | maybe |
//!
//! # Features
//!
//! - `native` - stderr logging subscriber and the `cashgate` CLI
//!
//! # Usage
//!
//! ```ignore
//! use cashgate::{ChangeType, Providers, Wallet, WalletConfig};
//!
//! let wallet = Wallet::from_config(
//!     WalletConfig::mainnet().with_default_dapp_id("53212266f799..."),
//!     Providers::default().with_wallet(wallet_provider).with_network(network_provider),
//! );
//!
//! let address = wallet.get_address(ChangeType::Receive, Some(0), None).await?;
//! let balance = wallet.get_balance(None).await?;
//! ```

pub mod address;
pub mod config;
pub mod error;
pub mod provider;
pub mod validate;
pub mod wallet;

#[cfg(feature = "native")]
pub mod logging;

pub use address::{Address, AddressError, AddressKind, Network};
pub use config::WalletConfig;
pub use error::{ErrorKind, IllegalArgument, WalletError, WalletResult};
pub use provider::{ChangeType, NetworkProvider, Output, ProviderType, Providers, Utxo, WalletProvider};
pub use wallet::{Destination, Wallet, WalletNamespace};
