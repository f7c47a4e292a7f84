//! Probe the ledger node and deploy the anchoring contract.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::runtime::Builder;
use url::Url;

use placement_backend::domain::ports::PlacementModel;
use placement_backend::outbound::ledger::{
    CompiledArtifact, ContractDeployer, JsonRpcClient, probe_node,
};
use placement_backend::outbound::model::TreeEnsembleModel;

const DEFAULT_LEDGER_URL: &str = "http://127.0.0.1:7545";
const RPC_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// `placement-ledger` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "placement-ledger",
    about = "Probe the ledger node and deploy the prediction anchoring contract",
    version
)]
struct CliArgs {
    /// JSON-RPC endpoint of the ledger node.
    #[arg(long = "ledger-url", value_name = "url", default_value = DEFAULT_LEDGER_URL)]
    ledger_url: Url,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Report the chain head, the admin account and whether the model loads.
    Probe {
        /// Model artifact to check.
        #[arg(long = "model", value_name = "path")]
        model: Option<PathBuf>,
    },
    /// Deploy a compiled contract and write its address and ABI.
    Deploy {
        /// Compiled contract JSON carrying `abi` and `bytecode`.
        #[arg(long = "artifact", value_name = "path")]
        artifact: PathBuf,
        /// Destination for the contract info file.
        #[arg(long = "out", value_name = "path", default_value = "contract_info.json")]
        out: PathBuf,
        /// Delay between receipt polls, in milliseconds.
        #[arg(long = "poll-interval-ms", value_name = "ms", default_value_t = 500)]
        poll_interval_ms: u64,
        /// Maximum wait for the deployment receipt, in milliseconds.
        #[arg(long = "receipt-timeout-ms", value_name = "ms", default_value_t = 120_000)]
        receipt_timeout_ms: u64,
    },
}

fn main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main(args))
}

async fn async_main(args: CliArgs) -> io::Result<()> {
    let rpc = JsonRpcClient::new(args.ledger_url, RPC_REQUEST_TIMEOUT)
        .map_err(|error| io::Error::other(format!("create JSON-RPC client: {error}")))?;

    match args.command {
        Command::Probe { model } => {
            let status = probe_node(&rpc)
                .await
                .map_err(|error| io::Error::other(format!("probe ledger node: {error}")))?;
            println!("block_number={}", status.block_number);
            println!(
                "admin_account={}",
                status.admin_account.as_deref().unwrap_or("none")
            );
            if let Some(path) = model {
                match TreeEnsembleModel::load(&path) {
                    Ok(loaded) => {
                        println!("model=loaded");
                        println!("model_trees={}", loaded.summary().tree_count);
                    }
                    Err(error) => println!("model=unavailable ({error})"),
                }
            }
        }
        Command::Deploy {
            artifact,
            out,
            poll_interval_ms,
            receipt_timeout_ms,
        } => {
            let compiled = CompiledArtifact::load(&artifact).map_err(io::Error::other)?;
            let deployer = ContractDeployer::new(
                rpc,
                Duration::from_millis(poll_interval_ms.max(1)),
                Duration::from_millis(receipt_timeout_ms.max(1)),
            );
            let info = deployer
                .deploy(&compiled)
                .await
                .map_err(|error| io::Error::other(format!("deploy contract: {error}")))?;
            info.save(&out).map_err(io::Error::other)?;
            println!("contract_address={}", info.address);
            println!("contract_info={}", out.display());
        }
    }

    Ok(())
}
