//! JSON-RPC envelopes and Ethereum payloads exchanged with the ledger node.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub(super) struct RpcRequestDto<'a> {
    pub(super) jsonrpc: &'static str,
    pub(super) id: u64,
    pub(super) method: &'a str,
    pub(super) params: Value,
}

#[derive(Debug, Deserialize)]
pub(super) struct RpcResponseDto {
    #[serde(default)]
    pub(super) result: Option<Value>,
    #[serde(default)]
    pub(super) error: Option<RpcErrorDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RpcErrorDto {
    pub(super) code: i64,
    pub(super) message: String,
}

/// `eth_sendTransaction` parameter object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRequest {
    /// Sending account.
    pub from: String,
    /// Contract address; `None` creates a contract.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Hex call data or creation bytecode.
    pub data: String,
    /// Hex gas limit; the node estimates when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<String>,
}

/// The receipt fields the adapters read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    /// Mined transaction hash.
    pub transaction_hash: String,
    /// `0x1` on success, `0x0` on revert. Absent on pre-Byzantium nodes.
    #[serde(default)]
    pub status: Option<String>,
    /// Address of a contract created by this transaction.
    #[serde(default)]
    pub contract_address: Option<String>,
    /// Hex block number the transaction was mined in.
    #[serde(default)]
    pub block_number: Option<String>,
}

impl TransactionReceipt {
    /// Whether the node reported the transaction as reverted.
    pub fn is_reverted(&self) -> bool {
        matches!(self.status.as_deref(), Some("0x0" | "0x00"))
    }
}
