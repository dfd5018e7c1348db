//! Recording mock providers shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use cashgate::{ChangeType, NetworkProvider, Output, Providers, Utxo, WalletProvider};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

pub const P2PKH: &str = "bitcoincash:qrsy0xwugcajsqa99c9nf05pz7ndckj55ctlsztu2p";
pub const P2SH: &str = "bitcoincash:prr7qqutastjmc9dn7nwkv2vcc58nn82uqwzq563hg";
pub const SCRIPT: &str = "03424f587e06424954424f5887";
pub const SCRIPT_P2SH: &str = "bitcoincash:pz0qcslrqn7hr44hsszwl4lw5r6udkg6zqncnufkrl";
pub const OTHER_SCRIPT: &str = "789787a72c21452a1c98ff";
pub const DAPP_ID: &str = "53212266f7994100e442f6dff10fbdb50a93121d25c196ce0597517d35d42e68";
pub const TXID: &str = "115e8f72f39fad874cfab0deed11a80f24f967a84079fb56ddf53ea02e308986";
pub const MAINNET_MAGIC: u32 = 0xe3e1f3e8;

/// Call log shared by both mocks, so ordering across providers is visible.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap_or_else(|p| p.into_inner()).push(entry.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == name).count()
    }

    pub fn is_empty(&self) -> bool {
        self.calls().is_empty()
    }
}

pub fn utxo(satoshis: u64, output_index: u32) -> Utxo {
    Utxo {
        tx_id: TXID.to_string(),
        output_index,
        address: P2PKH.to_string(),
        script: "76a914e047b9dc463b2803a52e0b34be8117a6dc5a54a688ac".to_string(),
        satoshis,
    }
}

pub struct MockWallet {
    pub log: CallLog,
    pub failing: HashSet<&'static str>,
    pub addresses: Vec<String>,
    pub address_index: u32,
    pub redeem_scripts: Mutex<Vec<String>>,
    pub spendable: Vec<Utxo>,
    pub unspendable: Vec<Utxo>,
    pub signature: String,
    pub signed_tx: String,
    /// (outputs, dapp_id) of the last createSignedTx call
    pub last_tx: Mutex<Option<(Vec<Output>, Option<String>)>>,
    /// (start, size, dapp_id) of the last getAddresses call
    pub last_addresses: Mutex<Option<(Option<u32>, Option<u32>, Option<String>)>>,
}

impl MockWallet {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            failing: HashSet::new(),
            addresses: vec![P2PKH.to_string()],
            address_index: 3,
            redeem_scripts: Mutex::new(vec![OTHER_SCRIPT.to_string(), SCRIPT.to_string()]),
            spendable: vec![utxo(1_000, 0), utxo(2_500, 1)],
            unspendable: vec![utxo(546, 2)],
            signature: "3045022100abcdef".to_string(),
            signed_tx: "0100000001abcdef".to_string(),
            last_tx: Mutex::new(None),
            last_addresses: Mutex::new(None),
        }
    }

    pub fn failing(mut self, call: &'static str) -> Self { self.failing.insert(call); self }

    fn enter(&self, call: &'static str) -> anyhow::Result<()> {
        self.log.push(call);
        if self.failing.contains(call) {
            anyhow::bail!("{} rejected by wallet", call);
        }
        Ok(())
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn get_version(&self) -> anyhow::Result<u32> {
        self.enter("getVersion")?;
        Ok(2)
    }

    async fn get_addresses(
        &self,
        _change: ChangeType,
        start_index: Option<u32>,
        size: Option<u32>,
        dapp_id: Option<&str>,
    ) -> anyhow::Result<Vec<String>> {
        self.enter("getAddresses")?;
        *self.last_addresses.lock().unwrap() = Some((start_index, size, dapp_id.map(str::to_string)));
        Ok(self.addresses.clone())
    }

    async fn get_address_index(&self, _change: ChangeType, _dapp_id: Option<&str>) -> anyhow::Result<u32> {
        self.enter("getAddressIndex")?;
        Ok(self.address_index)
    }

    async fn get_redeem_scripts(&self, _dapp_id: Option<&str>) -> anyhow::Result<Vec<String>> {
        self.enter("getRedeemScripts")?;
        Ok(self.redeem_scripts.lock().unwrap().clone())
    }

    async fn add_redeem_script(&self, redeem_script: &str, _dapp_id: Option<&str>) -> anyhow::Result<()> {
        self.enter("addRedeemScript")?;
        self.redeem_scripts.lock().unwrap().push(redeem_script.to_string());
        Ok(())
    }

    async fn get_spendable_utxos(&self) -> anyhow::Result<Vec<Utxo>> {
        self.enter("getSpendableUtxos")?;
        Ok(self.spendable.clone())
    }

    async fn get_unspendable_utxos(&self, _dapp_id: &str) -> anyhow::Result<Vec<Utxo>> {
        self.enter("getUnspendableUtxos")?;
        Ok(self.unspendable.clone())
    }

    async fn sign(&self, _address: &str, _data_to_sign: &str) -> anyhow::Result<String> {
        self.enter("sign")?;
        Ok(self.signature.clone())
    }

    async fn create_signed_tx(&self, outputs: &[Output], dapp_id: Option<&str>) -> anyhow::Result<String> {
        self.enter("createSignedTx")?;
        *self.last_tx.lock().unwrap() = Some((outputs.to_vec(), dapp_id.map(str::to_string)));
        Ok(self.signed_tx.clone())
    }
}

pub struct MockNetwork {
    pub log: CallLog,
    pub failing: HashSet<&'static str>,
    pub magic: u32,
    pub txid: String,
    pub last_raw_tx: Mutex<Option<String>>,
}

impl MockNetwork {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            failing: HashSet::new(),
            magic: MAINNET_MAGIC,
            txid: TXID.to_string(),
            last_raw_tx: Mutex::new(None),
        }
    }

    pub fn failing(mut self, call: &'static str) -> Self { self.failing.insert(call); self }

    pub fn with_magic(mut self, magic: u32) -> Self { self.magic = magic; self }

    fn enter(&self, call: &'static str) -> anyhow::Result<()> {
        self.log.push(call);
        if self.failing.contains(call) {
            anyhow::bail!("{} rejected by network", call);
        }
        Ok(())
    }
}

#[async_trait]
impl NetworkProvider for MockNetwork {
    async fn get_protocol_version(&self) -> anyhow::Result<u32> {
        self.enter("getProtocolVersion")?;
        Ok(70015)
    }

    async fn get_network_magic(&self) -> anyhow::Result<u32> {
        self.enter("getNetworkMagic")?;
        Ok(self.magic)
    }

    async fn get_fee_per_byte(&self) -> anyhow::Result<u64> {
        self.enter("getFeePerByte")?;
        Ok(1)
    }

    async fn broadcast_raw_tx(&self, raw_tx: &str) -> anyhow::Result<String> {
        self.enter("broadcastRawTx")?;
        *self.last_raw_tx.lock().unwrap() = Some(raw_tx.to_string());
        Ok(self.txid.clone())
    }
}

pub fn providers(wallet: MockWallet, network: MockNetwork) -> (Providers, Arc<MockWallet>, Arc<MockNetwork>) {
    let wallet = Arc::new(wallet);
    let network = Arc::new(network);
    let providers = Providers::default().with_wallet(wallet.clone()).with_network(network.clone());
    (providers, wallet, network)
}
