//! Ledger outbound adapters.
//!
//! A JSON-RPC client for an Ethereum-style node, the `LedgerAnchor`
//! implementation built on it, the contract info loader and the deployment
//! helpers used by the `placement-ledger` binary.

pub mod abi;
mod contract_info;
mod deploy;
mod dto;
mod json_rpc_anchor;
mod rpc;
#[cfg(test)]
pub(crate) mod test_node;

pub use contract_info::{ContractInfo, ContractInfoError};
pub use deploy::{CompiledArtifact, ContractDeployer, DeployError, NodeStatus, probe_node};
pub use dto::{TransactionReceipt, TransactionRequest};
pub use json_rpc_anchor::{
    AnchorSettings, JsonRpcLedgerAnchor, STORE_RECORD_FUNCTION, STORE_RECORD_SIGNATURE,
};
pub use rpc::{JsonRpcClient, RpcError};
