//! Tests for the prediction service.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    FixtureLedgerAnchor, FixturePlacementModel, MockLedgerAnchor,
    MockPredictionHistoryRepository,
};
use crate::domain::{
    Confidence, ErrorCode, PlacementLabel, PredictionRecord, TrainedColumns, TransactionId,
};

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

#[fixture]
fn clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

#[fixture]
fn model() -> Arc<FixturePlacementModel> {
    let columns = TrainedColumns::new(
        ["Age", "Average GPA", "Branch_CS", "Branch_ME"]
            .into_iter()
            .map(str::to_owned)
            .collect(),
    )
    .expect("valid columns");
    Arc::new(FixturePlacementModel::new(columns, 0.8321))
}

fn alice() -> Username {
    Username::new("alice").expect("valid username")
}

fn form() -> RawForm {
    RawForm::from_pairs([("Age", "21"), ("Branch", "CS"), ("Average GPA", "3.8")])
}

fn echo_insert(record: &NewPredictionRecord) -> PredictionRecord {
    PredictionRecord {
        id: 41,
        username: record.username.clone(),
        user_input: record.form.clone(),
        data_hash: record.data_hash.clone(),
        transaction_id: record.transaction_id.clone(),
        prediction: record.label,
        confidence: record.confidence,
        timestamp: record.created_at,
    }
}

#[rstest]
#[tokio::test]
async fn successful_prediction_is_anchored_and_recorded(
    model: Arc<FixturePlacementModel>,
    clock: Arc<dyn Clock>,
) {
    let expected_hash = DataHash::compute(&alice(), &form());
    let mut history = MockPredictionHistoryRepository::new();
    let hash_for_check = expected_hash.clone();
    history
        .expect_insert()
        .times(1)
        .withf(move |record| {
            record.data_hash == hash_for_check
                && record.label == PlacementLabel::Placed
                && record.confidence == Confidence::from_probability(0.8321)
                && record.created_at == fixture_timestamp()
        })
        .returning(|record| Ok(echo_insert(record)));
    let service = PredictionService::new(model, Arc::new(FixtureLedgerAnchor), Arc::new(history), clock);

    let receipt = service.predict(&alice(), form()).await.expect("prediction");

    assert_eq!(receipt.record_id, 41);
    assert_eq!(receipt.prediction, PlacementLabel::Placed);
    assert_eq!(receipt.confidence.value(), 83.21);
    assert_eq!(receipt.data_hash, expected_hash);
    assert_eq!(
        receipt.transaction_id.as_str(),
        format!("0x{expected_hash}")
    );
    assert_eq!(receipt.created_at, fixture_timestamp());
}

#[rstest]
#[case(LedgerAnchorError::unreachable("connection refused"), ErrorCode::ServiceUnavailable)]
#[case(LedgerAnchorError::reverted("0xdead"), ErrorCode::InternalError)]
#[case(LedgerAnchorError::timeout("0xdead", 5_000_u64), ErrorCode::InternalError)]
#[tokio::test]
async fn ledger_failure_leaves_no_audit_row(
    model: Arc<FixturePlacementModel>,
    clock: Arc<dyn Clock>,
    #[case] failure: LedgerAnchorError,
    #[case] code: ErrorCode,
) {
    let mut ledger = MockLedgerAnchor::new();
    ledger.expect_anchor().times(1).return_once(move |_| Err(failure));
    let mut history = MockPredictionHistoryRepository::new();
    history.expect_insert().never();
    let service = PredictionService::new(model, Arc::new(ledger), Arc::new(history), clock);

    let err = service
        .predict(&alice(), form())
        .await
        .expect_err("ledger failure aborts");
    assert_eq!(err.code(), code);
}

#[rstest]
#[tokio::test]
async fn anchor_request_carries_username_hash_and_label(
    model: Arc<FixturePlacementModel>,
    clock: Arc<dyn Clock>,
) {
    let expected_hash = DataHash::compute(&alice(), &form());
    let mut ledger = MockLedgerAnchor::new();
    ledger
        .expect_anchor()
        .withf(move |request| {
            request.username.as_ref() == "alice"
                && request.data_hash == expected_hash
                && request.label == PlacementLabel::Placed
        })
        .return_once(|_| {
            Ok(TransactionId::parse(&format!("0x{}", "ab".repeat(32))).expect("valid tx"))
        });
    let mut history = MockPredictionHistoryRepository::new();
    history
        .expect_insert()
        .returning(|record| Ok(echo_insert(record)));
    let service = PredictionService::new(model, Arc::new(ledger), Arc::new(history), clock);

    let receipt = service.predict(&alice(), form()).await.expect("prediction");
    assert_eq!(receipt.transaction_id.as_str(), format!("0x{}", "ab".repeat(32)));
}

#[rstest]
#[tokio::test]
async fn history_failure_after_anchoring_is_reported(
    model: Arc<FixturePlacementModel>,
    clock: Arc<dyn Clock>,
) {
    let mut history = MockPredictionHistoryRepository::new();
    history
        .expect_insert()
        .return_once(|_| Err(PredictionHistoryError::connection("database is locked")));
    let service =
        PredictionService::new(model, Arc::new(FixtureLedgerAnchor), Arc::new(history), clock);

    let err = service
        .predict(&alice(), form())
        .await
        .expect_err("store down");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
fn form_schema_lists_fields_and_categories(
    model: Arc<FixturePlacementModel>,
    clock: Arc<dyn Clock>,
) {
    let service = PredictionService::new(
        model,
        Arc::new(FixtureLedgerAnchor),
        Arc::new(MockPredictionHistoryRepository::new()),
        clock,
    );

    let schema = service.form_schema();
    assert_eq!(schema.fields.len(), FORM_FIELDS.len());
    assert_eq!(schema.trained_columns.len(), 4);
    let branch = schema
        .categories
        .iter()
        .find(|c| c.field == "Branch")
        .expect("branch categories");
    assert_eq!(branch.values, vec!["CS", "ME"]);
}
