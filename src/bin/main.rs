//! Cashgate CLI - offline CashAddr tooling
//!
//! Every command is pure computation, no providers involved:
//!   cashgate classify <address>        → {"kind", "network", "hash", "address"}
//!   cashgate script-address <hex>      → P2SH address of a redeem script
//!   cashgate lock-script <address>     → locking script paying the address
//!
//! Output format:
//!   --json     Output compact JSON (default for non-tty)
//!   --pretty   Pretty-print JSON (default for tty)

use cashgate::logging::init_logging;
use cashgate::{Address, Network, WalletConfig};
use serde_json::{json, Value};
use std::env;
use std::io::IsTerminal;
use tracing::debug;

fn main() {
    init_logging();

    let args: Vec<String> = env::args().collect();
    let opts = ParsedArgs::parse(&args[1..]);

    if opts.help {
        print_usage();
        return;
    }

    if opts.version {
        println!("cashgate {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let result = match opts.command.as_deref() {
        Some("classify") => cmd_classify(&opts),
        Some("script-address") => cmd_script_address(&opts),
        Some("lock-script") => cmd_lock_script(&opts),
        Some(cmd) => Err(format!("Unknown command: {}", cmd)),
        None => {
            print_usage();
            return;
        }
    };

    let pretty = !opts.json && (opts.pretty || std::io::stdout().is_terminal());
    match result {
        Ok(output) => println!("{}", render(&output, pretty)),
        Err(e) => {
            eprintln!("{}", render(&json!({"error": e}), pretty));
            std::process::exit(1);
        }
    }
}

fn render(value: &Value, pretty: bool) -> String {
    let rendered = if pretty { serde_json::to_string_pretty(value) } else { serde_json::to_string(value) };
    rendered.unwrap_or_else(|_| value.to_string())
}

#[derive(Default)]
struct ParsedArgs {
    command: Option<String>,
    arg: Option<String>,
    network: Option<String>,
    json: bool,
    pretty: bool,
    help: bool,
    version: bool,
}

impl ParsedArgs {
    fn parse(args: &[String]) -> Self {
        let mut opts = ParsedArgs::default();
        let mut positional = Vec::new();
        let mut i = 0;

        while i < args.len() {
            let arg = &args[i];
            match arg.as_str() {
                "--help" | "-h" => opts.help = true,
                "--version" | "-V" => opts.version = true,
                "--json" => opts.json = true,
                "--pretty" => opts.pretty = true,
                "--network" | "-n" => {
                    if i + 1 < args.len() {
                        opts.network = Some(args[i + 1].clone());
                        i += 1;
                    }
                }
                _ if !arg.starts_with('-') => positional.push(arg.clone()),
                _ => {} // Ignore unknown flags
            }
            i += 1;
        }

        let mut positional = positional.into_iter();
        opts.command = positional.next();
        opts.arg = positional.next();
        opts
    }

    /// `--network` wins over `CASHGATE_NETWORK`.
    fn network(&self) -> Result<Network, String> {
        match &self.network {
            Some(name) => name.parse::<Network>().map_err(|e| e.to_string()),
            None => Ok(WalletConfig::from_env().network),
        }
    }

    fn required_arg(&self, what: &str) -> Result<&str, String> {
        self.arg.as_deref().ok_or_else(|| format!("Missing {}", what))
    }
}

fn describe(address: &Address) -> Value {
    json!({
        "address": address.encode(),
        "kind": address.kind,
        "network": address.network,
        "hash": hex::encode(address.hash),
    })
}

fn cmd_classify(opts: &ParsedArgs) -> Result<Value, String> {
    let text = opts.required_arg("address")?;
    let network = opts.network()?;
    debug!(%network, "classify");
    let address = Address::classify(text, network).map_err(|e| e.to_string())?;
    Ok(describe(&address))
}

fn cmd_script_address(opts: &ParsedArgs) -> Result<Value, String> {
    let script = opts.required_arg("redeem script hex")?;
    let address = Address::from_redeem_script(script, opts.network()?).map_err(|e| e.to_string())?;
    let mut out = describe(&address);
    out["redeemScript"] = json!(script);
    Ok(out)
}

fn cmd_lock_script(opts: &ParsedArgs) -> Result<Value, String> {
    let text = opts.required_arg("address")?;
    let address = Address::classify(text, opts.network()?).map_err(|e| e.to_string())?;
    let mut out = describe(&address);
    out["lockScript"] = json!(address.lock_script_hex());
    Ok(out)
}

fn print_usage() {
    println!(
        r#"cashgate - CashAddr tooling

USAGE:
    cashgate <command> <arg> [options]

COMMANDS:
    classify <address>          Decode and classify a CashAddr address
    script-address <hex>        P2SH address of a redeem script
    lock-script <address>       Locking script paying an address

OPTIONS:
    --network, -n <net>         mainnet|testnet|regtest (env: CASHGATE_NETWORK)
    --json                      Compact JSON output
    --pretty                    Pretty-print JSON
    --help, -h                  Print this help
    --version, -V               Print version

EXAMPLES:
    cashgate classify bitcoincash:qrsy0xwugcajsqa99c9nf05pz7ndckj55ctlsztu2p
    cashgate script-address 03424f587e06424954424f5887
    cashgate lock-script bchtest:qq28xgrzkdyeg5vf7tp2s3mvx8u95zes5cf7wpwgux -n testnet
"#
    );
}
