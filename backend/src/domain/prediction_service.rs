//! Prediction domain service.
//!
//! Orchestrates one submission: prepare features, score, hash, anchor on the
//! ledger, then append the audit record. The audit write is last, so a
//! failure anywhere earlier leaves no row behind.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    CategoryOptions, LedgerAnchor, LedgerAnchorError, PlacementModel, PlacementModelError,
    PredictionCommand, PredictionFormSchema, PredictionHistoryError, PredictionHistoryRepository,
};
use crate::domain::{
    AnchorRequest, DataHash, Error, FeaturePreparer, FORM_FIELDS, NUMERIC_FIELDS, ONE_HOT_FIELDS,
    NewPredictionRecord, PlacementOutcome, PredictionReceipt, RawForm, Username,
};

/// Prediction service implementing [`PredictionCommand`].
#[derive(Clone)]
pub struct PredictionService<M: ?Sized, L: ?Sized, H: ?Sized> {
    model: Arc<M>,
    ledger: Arc<L>,
    history: Arc<H>,
    preparer: FeaturePreparer,
    clock: Arc<dyn Clock>,
}

impl<M, L: ?Sized, H: ?Sized> PredictionService<M, L, H>
where
    M: PlacementModel + ?Sized,
{
    /// Create a service; the feature preparer is aligned to the model's
    /// trained columns.
    pub fn new(model: Arc<M>, ledger: Arc<L>, history: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        let preparer = FeaturePreparer::new(model.feature_columns().clone());
        Self {
            model,
            ledger,
            history,
            preparer,
            clock,
        }
    }
}

fn map_model_error(error: &PlacementModelError) -> Error {
    Error::internal(format!("prediction failed: {error}"))
}

fn map_ledger_error(error: LedgerAnchorError) -> Error {
    match error {
        LedgerAnchorError::Unreachable { message } => {
            Error::service_unavailable(format!("ledger node unreachable: {message}"))
        }
        other => Error::internal(format!("ledger anchoring failed: {other}")),
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
impl<M, L, H> PredictionCommand for PredictionService<M, L, H>
where
    M: PlacementModel + ?Sized,
    L: LedgerAnchor + ?Sized,
    H: PredictionHistoryRepository + ?Sized,
{
    async fn predict(
        &self,
        username: &Username,
        form: RawForm,
    ) -> Result<PredictionReceipt, Error> {
        let features = self.preparer.prepare(&form);
        let probability = self
            .model
            .predict_probability(&features)
            .map_err(|err| map_model_error(&err))?;
        let outcome = PlacementOutcome::from_probability(probability);
        debug!(
            username = %username,
            probability,
            label = %outcome.label,
            "model scored submission"
        );

        let data_hash = DataHash::compute(username, &form);
        let request = AnchorRequest {
            username: username.clone(),
            data_hash: data_hash.clone(),
            label: outcome.label,
        };
        let transaction_id = self.ledger.anchor(&request).await.map_err(|err| {
            warn!(username = %username, kind = err.kind(), error = %err, "ledger anchoring failed");
            map_ledger_error(err)
        })?;

        let record = NewPredictionRecord {
            username: username.clone(),
            form,
            data_hash,
            transaction_id,
            label: outcome.label,
            confidence: outcome.confidence,
            created_at: self.clock.utc(),
        };
        let stored = self
            .history
            .insert(&record)
            .await
            .map_err(map_history_error)?;
        info!(
            username = %username,
            record_id = stored.id,
            transaction = %stored.transaction_id,
            label = %stored.prediction,
            "prediction recorded"
        );

        Ok(PredictionReceipt {
            record_id: stored.id,
            prediction: stored.prediction,
            confidence: stored.confidence,
            data_hash: stored.data_hash,
            transaction_id: stored.transaction_id,
            created_at: stored.timestamp,
        })
    }

    fn form_schema(&self) -> PredictionFormSchema {
        let columns = self.preparer.columns();
        PredictionFormSchema {
            fields: FORM_FIELDS.iter().map(|f| (*f).to_owned()).collect(),
            numeric_fields: NUMERIC_FIELDS.iter().map(|f| (*f).to_owned()).collect(),
            categories: ONE_HOT_FIELDS
                .iter()
                .map(|field| CategoryOptions {
                    field: (*field).to_owned(),
                    values: columns.categories_for(field),
                })
                .collect(),
            trained_columns: columns.names().to_vec(),
        }
    }
}

#[cfg(test)]
#[path = "prediction_service_tests.rs"]
mod tests;
