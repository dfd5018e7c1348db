//! Destination → output resolution and data-carrier outputs.

use crate::address::Network;
use crate::error::IllegalArgument;
use crate::provider::Output;
use crate::validate;
use bitcoin::opcodes::all::OP_RETURN;
use bitcoin::script::{Builder, PushBytesBuf};
use serde::{Deserialize, Serialize};

/// Payment target: an address and an amount in satoshis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub address: String,
    pub amount: u64,
}

impl Destination {
    pub fn new(address: impl Into<String>, amount: u64) -> Self {
        Self { address: address.into(), amount }
    }
}

/// Lock each destination to its address script.
pub fn resolve_destinations(destinations: &[Destination], network: Network) -> Result<Vec<Output>, IllegalArgument> {
    destinations
        .iter()
        .map(|d| {
            let addr = validate::address(&d.address, network)?;
            let amount = validate::amount(d.amount)?;
            Ok(Output::new(addr.lock_script_hex(), amount))
        })
        .collect()
}

/// Zero-value `OP_RETURN <chunk>...` output. Chunks are hex.
pub fn data_output(chunks: &[String]) -> Result<Output, IllegalArgument> {
    let mut builder = Builder::new().push_opcode(OP_RETURN);
    for chunk in chunks {
        validate::hex("data", chunk, true)?;
        let bytes = hex::decode(chunk).map_err(|_| IllegalArgument::InvalidHex { name: "data" })?;
        let len = bytes.len();
        let push = PushBytesBuf::try_from(bytes).map_err(|_| IllegalArgument::DataTooLarge(len))?;
        builder = builder.push_slice(push);
    }
    Ok(Output::new(hex::encode(builder.into_script().as_bytes()), 0))
}

/// Outputs must be non-empty and carry hex lock scripts.
pub fn check_outputs(outputs: &[Output]) -> Result<(), IllegalArgument> {
    if outputs.is_empty() {
        return Err(IllegalArgument::EmptyOutputs);
    }
    outputs.iter().try_for_each(|o| validate::hex("lockScript", &o.lock_script, false))
}
