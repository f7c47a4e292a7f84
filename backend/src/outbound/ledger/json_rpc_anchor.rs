//! `LedgerAnchor` adapter that calls `storeRecord` on the deployed contract
//! and waits for the transaction receipt.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{LedgerAnchor, LedgerAnchorError};
use crate::domain::{AccountAddress, AnchorRequest, TransactionId};

use super::abi::encode_call;
use super::dto::TransactionRequest;
use super::rpc::{JsonRpcClient, RpcError};

/// Contract function invoked for every anchored prediction.
pub const STORE_RECORD_SIGNATURE: &str = "storeRecord(string,string,string)";
/// Function name and input count the contract ABI must declare.
pub const STORE_RECORD_FUNCTION: (&str, usize) = ("storeRecord", 3);

/// Where to send anchoring transactions and how long to wait for them.
#[derive(Debug, Clone)]
pub struct AnchorSettings {
    /// Deployed contract address.
    pub contract: AccountAddress,
    /// Sending account; `eth_accounts[0]` when `None`.
    pub sender: Option<AccountAddress>,
    /// Delay between receipt polls.
    pub poll_interval: Duration,
    /// Overall wait for a receipt before giving up.
    pub receipt_timeout: Duration,
}

/// JSON-RPC implementation of [`LedgerAnchor`].
#[derive(Debug)]
pub struct JsonRpcLedgerAnchor {
    rpc: JsonRpcClient,
    settings: AnchorSettings,
}

impl JsonRpcLedgerAnchor {
    /// Create an anchor over an RPC client.
    pub fn new(rpc: JsonRpcClient, settings: AnchorSettings) -> Self {
        Self { rpc, settings }
    }

    async fn sender(&self) -> Result<String, LedgerAnchorError> {
        if let Some(sender) = &self.settings.sender {
            return Ok(sender.as_str().to_owned());
        }
        let accounts = self.rpc.accounts().await.map_err(map_rpc_error)?;
        accounts
            .into_iter()
            .next()
            .ok_or_else(LedgerAnchorError::no_sender)
    }
}

fn map_rpc_error(error: RpcError) -> LedgerAnchorError {
    if error.is_unreachable() {
        LedgerAnchorError::unreachable(error.to_string())
    } else {
        LedgerAnchorError::rpc(error.to_string())
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[async_trait]
impl LedgerAnchor for JsonRpcLedgerAnchor {
    async fn anchor(&self, request: &AnchorRequest) -> Result<TransactionId, LedgerAnchorError> {
        let from = self.sender().await?;
        let data = encode_call(
            STORE_RECORD_SIGNATURE,
            &[
                request.username.as_ref(),
                request.data_hash.as_str(),
                request.label.as_str(),
            ],
        );
        let submitted = self
            .rpc
            .send_transaction(&TransactionRequest {
                from,
                to: Some(self.settings.contract.as_str().to_owned()),
                data,
                gas: None,
            })
            .await
            .map_err(map_rpc_error)?;

        let receipt = self
            .rpc
            .wait_for_receipt(
                &submitted,
                self.settings.poll_interval,
                self.settings.receipt_timeout,
            )
            .await
            .map_err(map_rpc_error)?
            .ok_or_else(|| {
                LedgerAnchorError::timeout(
                    submitted.as_str(),
                    millis(self.settings.receipt_timeout),
                )
            })?;
        if receipt.is_reverted() {
            warn!(transaction = %submitted, "anchoring transaction reverted");
            return Err(LedgerAnchorError::reverted(submitted));
        }

        let transaction = TransactionId::parse(&receipt.transaction_hash).map_err(|err| {
            LedgerAnchorError::rpc(format!(
                "receipt carries malformed transaction hash {:?}: {err}",
                receipt.transaction_hash
            ))
        })?;
        info!(
            username = %request.username,
            transaction = %transaction,
            block = receipt.block_number.as_deref().unwrap_or("unknown"),
            "prediction hash anchored"
        );
        Ok(transaction)
    }
}
