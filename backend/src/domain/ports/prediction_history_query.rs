//! Driving port for reading a user's prediction history.

use async_trait::async_trait;

use crate::domain::{Error, HashVerification, LabelSummary, PredictionRecord, Username};

/// Domain use-case port for history, analytics and hash verification.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PredictionHistoryQuery: Send + Sync {
    /// All of the user's records, newest first.
    async fn list(&self, username: &Username) -> Result<Vec<PredictionRecord>, Error>;

    /// Per-label counts, ordered by label.
    async fn summarize(&self, username: &Username) -> Result<LabelSummary, Error>;

    /// Recompute the stored record's data hash; `NotFound` unless the record
    /// belongs to `username`.
    async fn verify(&self, username: &Username, record_id: i32) -> Result<HashVerification, Error>;
}

/// History query with no records, for wiring tests of unrelated endpoints.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePredictionHistoryQuery;

#[async_trait]
impl PredictionHistoryQuery for FixturePredictionHistoryQuery {
    async fn list(&self, _username: &Username) -> Result<Vec<PredictionRecord>, Error> {
        Ok(Vec::new())
    }

    async fn summarize(&self, _username: &Username) -> Result<LabelSummary, Error> {
        Ok(LabelSummary::default())
    }

    async fn verify(&self, _username: &Username, record_id: i32) -> Result<HashVerification, Error> {
        Err(Error::not_found(format!("prediction {record_id} not found")))
    }
}
