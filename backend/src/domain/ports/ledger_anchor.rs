//! Driven port for anchoring prediction hashes on the ledger.

use async_trait::async_trait;

use crate::domain::{AnchorRequest, TransactionId};

use super::define_port_error;

define_port_error! {
    /// Failures while submitting or confirming an anchoring transaction.
    pub enum LedgerAnchorError {
        /// The ledger node could not be reached.
        Unreachable { message: String } => "ledger node unreachable: {message}",
        /// The node answered with a JSON-RPC error or unexpected payload.
        Rpc { message: String } => "ledger rpc failed: {message}",
        /// The transaction was mined but reverted.
        Reverted { transaction: String } => "ledger transaction {transaction} reverted",
        /// No receipt arrived within the configured wait.
        Timeout { transaction: String, waited_ms: u64 } =>
            "ledger transaction {transaction} not confirmed after {waited_ms} ms",
        /// No sender account is configured or available on the node.
        NoSender => "no ledger account available to send from",
    }
}

/// Records `(username, data hash, label)` on the ledger and waits for
/// confirmation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerAnchor: Send + Sync {
    /// Submit the record and return the confirmed transaction id.
    async fn anchor(&self, request: &AnchorRequest) -> Result<TransactionId, LedgerAnchorError>;
}

/// Deterministic in-process anchor: the transaction id is `0x` followed by
/// the data hash. Nothing leaves the process.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLedgerAnchor;

#[async_trait]
impl LedgerAnchor for FixtureLedgerAnchor {
    async fn anchor(&self, request: &AnchorRequest) -> Result<TransactionId, LedgerAnchorError> {
        TransactionId::parse(&format!("0x{}", request.data_hash))
            .map_err(|err| LedgerAnchorError::rpc(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{DataHash, PlacementLabel, RawForm, Username};
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_anchor_derives_id_from_hash() {
        let username = Username::new("alice").expect("valid username");
        let data_hash = DataHash::compute(&username, &RawForm::default());
        let request = AnchorRequest {
            username,
            data_hash: data_hash.clone(),
            label: PlacementLabel::Placed,
        };

        let tx = FixtureLedgerAnchor.anchor(&request).await.expect("anchored");
        assert_eq!(tx.as_str(), format!("0x{data_hash}"));
    }

    #[rstest]
    fn timeout_message_names_transaction() {
        let err = LedgerAnchorError::timeout("0xabc", 1500_u64);
        assert_eq!(
            err.to_string(),
            "ledger transaction 0xabc not confirmed after 1500 ms"
        );
        assert_eq!(err.kind(), "timeout");
    }
}
