//! Contract deployment and node probing for the `placement-ledger` tool.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::domain::{AccountAddress, LedgerIdError};
use crate::outbound::artifact_fs;

use super::contract_info::ContractInfo;
use super::dto::TransactionRequest;
use super::rpc::{JsonRpcClient, RpcError};

/// Errors raised while deploying the anchoring contract.
#[derive(Debug, Error)]
pub enum DeployError {
    /// The compiled artifact could not be read.
    #[error("failed to read artifact at {path}: {source}")]
    ArtifactRead {
        /// Path to the artifact.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The compiled artifact is not `{abi, bytecode}`.
    #[error("artifact at {path} is invalid: {message}")]
    ArtifactInvalid {
        /// Path to the artifact.
        path: PathBuf,
        /// Parse or validation failure.
        message: String,
    },
    /// The node call failed.
    #[error("ledger rpc failed: {0}")]
    Rpc(#[from] RpcError),
    /// The node manages no accounts to deploy from.
    #[error("node has no accounts to deploy from")]
    NoAccounts,
    /// No receipt arrived within the configured wait.
    #[error("deployment {transaction} not confirmed after {waited_ms} ms")]
    Timeout {
        /// Deployment transaction hash.
        transaction: String,
        /// Time spent waiting.
        waited_ms: u64,
    },
    /// The deployment was mined but reverted.
    #[error("deployment {transaction} reverted")]
    Reverted {
        /// Deployment transaction hash.
        transaction: String,
    },
    /// The receipt did not name a usable contract address.
    #[error("deployment {transaction} produced no valid contract address: {source}")]
    ContractAddress {
        /// Deployment transaction hash.
        transaction: String,
        /// Address validation failure.
        #[source]
        source: LedgerIdError,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BytecodeDto {
    Hex(String),
    Object { object: String },
}

#[derive(Debug, Deserialize)]
struct CompiledArtifactDto {
    abi: Value,
    bytecode: BytecodeDto,
}

/// Compiler output needed to create the contract.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledArtifact {
    /// Contract ABI.
    pub abi: Value,
    /// `0x`-prefixed creation bytecode.
    pub bytecode: String,
}

impl CompiledArtifact {
    /// Read `{abi, bytecode}` where `bytecode` is either a hex string or a
    /// solc `{"object": "…"}` block.
    pub fn load(path: &Path) -> Result<Self, DeployError> {
        let raw = artifact_fs::read_to_string(path).map_err(|source| DeployError::ArtifactRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw).map_err(|message| DeployError::ArtifactInvalid {
            path: path.to_path_buf(),
            message,
        })
    }

    fn parse(raw: &str) -> Result<Self, String> {
        let dto: CompiledArtifactDto = serde_json::from_str(raw).map_err(|err| err.to_string())?;
        if !dto.abi.is_array() {
            return Err("abi must be an array".to_owned());
        }
        let code = match dto.bytecode {
            BytecodeDto::Hex(code) | BytecodeDto::Object { object: code } => code,
        };
        let digits = code.trim().trim_start_matches("0x");
        if digits.is_empty() || hex::decode(digits).is_err() {
            return Err("bytecode must be non-empty hex".to_owned());
        }
        Ok(Self {
            abi: dto.abi,
            bytecode: format!("0x{digits}"),
        })
    }
}

/// Chain state reported by `placement-ledger probe`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeStatus {
    /// Latest block number.
    pub block_number: u64,
    /// First managed account, if any.
    pub admin_account: Option<String>,
}

/// Read the block number and admin account from the node.
pub async fn probe_node(rpc: &JsonRpcClient) -> Result<NodeStatus, RpcError> {
    let block_number = rpc.block_number().await?;
    let admin_account = rpc.accounts().await?.into_iter().next();
    Ok(NodeStatus {
        block_number,
        admin_account,
    })
}

/// Sends contract-creation transactions from the node's admin account.
#[derive(Debug)]
pub struct ContractDeployer {
    rpc: JsonRpcClient,
    poll_interval: Duration,
    receipt_timeout: Duration,
}

impl ContractDeployer {
    /// Create a deployer with the given receipt wait.
    pub fn new(rpc: JsonRpcClient, poll_interval: Duration, receipt_timeout: Duration) -> Self {
        Self {
            rpc,
            poll_interval,
            receipt_timeout,
        }
    }

    /// Deploy `artifact` and return the resulting contract info.
    pub async fn deploy(&self, artifact: &CompiledArtifact) -> Result<ContractInfo, DeployError> {
        let from = self
            .rpc
            .accounts()
            .await?
            .into_iter()
            .next()
            .ok_or(DeployError::NoAccounts)?;
        let transaction = self
            .rpc
            .send_transaction(&TransactionRequest {
                from: from.clone(),
                to: None,
                data: artifact.bytecode.clone(),
                gas: None,
            })
            .await?;
        info!(%transaction, %from, "contract creation submitted");

        let receipt = self
            .rpc
            .wait_for_receipt(&transaction, self.poll_interval, self.receipt_timeout)
            .await?
            .ok_or_else(|| DeployError::Timeout {
                transaction: transaction.clone(),
                waited_ms: u64::try_from(self.receipt_timeout.as_millis()).unwrap_or(u64::MAX),
            })?;
        if receipt.is_reverted() {
            return Err(DeployError::Reverted { transaction });
        }
        let address = AccountAddress::parse(receipt.contract_address.as_deref().unwrap_or(""))
            .map_err(|source| DeployError::ContractAddress {
                transaction: transaction.clone(),
                source,
            })?;
        info!(%transaction, %address, "contract deployed");
        Ok(ContractInfo {
            address,
            abi: artifact.abi.clone(),
        })
    }
}
