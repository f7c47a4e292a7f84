//! History domain service: per-user audit listing, label analytics and
//! data-hash verification.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::ports::{
    PredictionHistoryError, PredictionHistoryQuery, PredictionHistoryRepository,
};
use crate::domain::{Error, HashVerification, LabelSummary, PredictionRecord, Username};

/// History service implementing [`PredictionHistoryQuery`].
#[derive(Clone)]
pub struct HistoryService<H: ?Sized> {
    history: Arc<H>,
}

impl<H: ?Sized> HistoryService<H> {
    /// Create a service over the audit store.
    pub fn new(history: Arc<H>) -> Self {
        Self { history }
    }
}

fn map_history_error(error: PredictionHistoryError) -> Error {
    match error {
        PredictionHistoryError::Connection { message } => {
            Error::service_unavailable(format!("prediction history unavailable: {message}"))
        }
        other => Error::internal(format!("prediction history error: {other}")),
    }
}

#[async_trait]
impl<H> PredictionHistoryQuery for HistoryService<H>
where
    H: PredictionHistoryRepository + ?Sized,
{
    async fn list(&self, username: &Username) -> Result<Vec<PredictionRecord>, Error> {
        self.history
            .list_for_user(username)
            .await
            .map_err(map_history_error)
    }

    async fn summarize(&self, username: &Username) -> Result<LabelSummary, Error> {
        let counts = self
            .history
            .count_by_label(username)
            .await
            .map_err(map_history_error)?;
        Ok(LabelSummary::from_counts(counts))
    }

    async fn verify(&self, username: &Username, record_id: i32) -> Result<HashVerification, Error> {
        let record = self
            .history
            .find_for_user(username, record_id)
            .await
            .map_err(map_history_error)?
            .ok_or_else(|| Error::not_found(format!("prediction {record_id} not found")))?;
        let verification = record.verify();
        if !verification.matches {
            warn!(
                username = %username,
                record_id,
                stored = %verification.stored_hash,
                recomputed = %verification.recomputed_hash,
                "stored prediction no longer matches its anchored hash"
            );
        }
        Ok(verification)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::MockPredictionHistoryRepository;
    use crate::domain::{
        Confidence, DataHash, ErrorCode, LabelCount, PlacementLabel, RawForm, TransactionId,
    };
    use chrono::DateTime;
    use rstest::rstest;

    fn alice() -> Username {
        Username::new("alice").expect("valid username")
    }

    fn stored(id: i32, form: RawForm, hash: DataHash) -> PredictionRecord {
        PredictionRecord {
            id,
            username: alice(),
            user_input: form,
            data_hash: hash,
            transaction_id: TransactionId::parse(&format!("0x{}", "c".repeat(64)))
                .expect("valid tx"),
            prediction: PlacementLabel::NotPlaced,
            confidence: Confidence::from_probability(0.2),
            timestamp: DateTime::UNIX_EPOCH,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn summarize_orders_labels() {
        let mut repo = MockPredictionHistoryRepository::new();
        repo.expect_count_by_label().return_once(|_| {
            Ok(vec![
                LabelCount {
                    label: PlacementLabel::Placed,
                    count: 4,
                },
                LabelCount {
                    label: PlacementLabel::NotPlaced,
                    count: 2,
                },
            ])
        });
        let service = HistoryService::new(Arc::new(repo));

        let summary = service.summarize(&alice()).await.expect("summary");
        assert_eq!(
            summary.labels,
            vec![PlacementLabel::NotPlaced, PlacementLabel::Placed]
        );
        assert_eq!(summary.values, vec![2, 4]);
    }

    #[rstest]
    #[tokio::test]
    async fn verify_reports_match_for_untouched_record() {
        let form = RawForm::from_pairs([("Age", "21")]);
        let hash = DataHash::compute(&alice(), &form);
        let mut repo = MockPredictionHistoryRepository::new();
        repo.expect_find_for_user()
            .withf(|user, id| user.as_ref() == "alice" && *id == 5)
            .return_once(move |_, _| Ok(Some(stored(5, form, hash))));
        let service = HistoryService::new(Arc::new(repo));

        let outcome = service.verify(&alice(), 5).await.expect("verified");
        assert!(outcome.matches);
    }

    #[rstest]
    #[tokio::test]
    async fn verify_flags_edited_snapshot() {
        let original = RawForm::from_pairs([("Age", "21")]);
        let hash = DataHash::compute(&alice(), &original);
        let edited = RawForm::from_pairs([("Age", "31")]);
        let mut repo = MockPredictionHistoryRepository::new();
        repo.expect_find_for_user()
            .return_once(move |_, _| Ok(Some(stored(5, edited, hash))));
        let service = HistoryService::new(Arc::new(repo));

        let outcome = service.verify(&alice(), 5).await.expect("verified");
        assert!(!outcome.matches);
    }

    #[rstest]
    #[tokio::test]
    async fn verify_unknown_record_is_not_found() {
        let mut repo = MockPredictionHistoryRepository::new();
        repo.expect_find_for_user().return_once(|_, _| Ok(None));
        let service = HistoryService::new(Arc::new(repo));

        let err = service.verify(&alice(), 99).await.expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[case(PredictionHistoryError::connection("locked"), ErrorCode::ServiceUnavailable)]
    #[case(PredictionHistoryError::query("syntax"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn list_maps_store_errors(
        #[case] failure: PredictionHistoryError,
        #[case] code: ErrorCode,
    ) {
        let mut repo = MockPredictionHistoryRepository::new();
        repo.expect_list_for_user()
            .return_once(move |_| Err(failure));
        let service = HistoryService::new(Arc::new(repo));

        let err = service.list(&alice()).await.expect_err("store failure");
        assert_eq!(err.code(), code);
    }
}
