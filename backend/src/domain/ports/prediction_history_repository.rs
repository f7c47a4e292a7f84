//! Driven port for the append-only prediction audit store.

use async_trait::async_trait;

use crate::domain::{LabelCount, NewPredictionRecord, PredictionRecord, Username};

use super::define_port_error;

define_port_error! {
    /// Errors raised by prediction history adapters.
    pub enum PredictionHistoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "prediction history connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "prediction history query failed: {message}",
        /// A stored row could not be converted back into a record.
        Corrupt { id: i32, message: String } =>
            "prediction history row {id} is corrupt: {message}",
    }
}

/// Port for appending and reading prediction records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PredictionHistoryRepository: Send + Sync {
    /// Append a record and return it with its assigned id.
    async fn insert(
        &self,
        record: &NewPredictionRecord,
    ) -> Result<PredictionRecord, PredictionHistoryError>;

    /// All records owned by `username`, newest first; ties by id descending.
    async fn list_for_user(
        &self,
        username: &Username,
    ) -> Result<Vec<PredictionRecord>, PredictionHistoryError>;

    /// Record counts grouped by label for `username`.
    async fn count_by_label(
        &self,
        username: &Username,
    ) -> Result<Vec<LabelCount>, PredictionHistoryError>;

    /// One record, only if it belongs to `username`.
    async fn find_for_user(
        &self,
        username: &Username,
        id: i32,
    ) -> Result<Option<PredictionRecord>, PredictionHistoryError>;
}
