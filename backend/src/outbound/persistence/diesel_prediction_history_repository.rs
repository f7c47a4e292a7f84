//! SQLite-backed `PredictionHistoryRepository` implementation using Diesel ORM.
//!
//! Records are append-only. The submitted form is stored as canonical JSON so
//! the data hash can be recomputed from the row alone.

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{PredictionHistoryError, PredictionHistoryRepository};
use crate::domain::{
    Confidence, DataHash, LabelCount, NewPredictionRecord, PlacementLabel, PredictionRecord,
    RawForm, TransactionId, Username, canonical_form_json,
};

use super::connection::SqliteConnector;
use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_connection_error};
use super::models::{NewPredictionRow, PredictionRow};
use super::schema::prediction_history;

/// Diesel-backed implementation of the `PredictionHistoryRepository` port.
#[derive(Debug, Clone)]
pub struct DieselPredictionHistoryRepository {
    connector: SqliteConnector,
}

impl DieselPredictionHistoryRepository {
    /// Create a new repository over the given database.
    pub fn new(connector: SqliteConnector) -> Self {
        Self { connector }
    }
}

fn map_diesel_error(error: &diesel::result::Error) -> PredictionHistoryError {
    map_basic_diesel_error(
        error,
        PredictionHistoryError::query,
        PredictionHistoryError::connection,
    )
}

fn row_to_record(row: PredictionRow) -> Result<PredictionRecord, PredictionHistoryError> {
    let id = row.id;
    let corrupt = |message: String| PredictionHistoryError::corrupt(id, message);
    Ok(PredictionRecord {
        id,
        username: Username::new(&row.username).map_err(|err| corrupt(err.to_string()))?,
        user_input: serde_json::from_str::<RawForm>(&row.user_input_json)
            .map_err(|err| corrupt(format!("user input: {err}")))?,
        data_hash: DataHash::parse(&row.data_hash).map_err(|err| corrupt(err.to_string()))?,
        transaction_id: TransactionId::parse(&row.transaction_id)
            .map_err(|err| corrupt(format!("transaction id: {err}")))?,
        prediction: row
            .prediction_label
            .parse::<PlacementLabel>()
            .map_err(|err| corrupt(err.to_string()))?,
        confidence: Confidence::new(row.confidence).map_err(|err| corrupt(err.to_string()))?,
        timestamp: row.timestamp.and_utc(),
    })
}

#[async_trait]
impl PredictionHistoryRepository for DieselPredictionHistoryRepository {
    async fn insert(
        &self,
        record: &NewPredictionRecord,
    ) -> Result<PredictionRecord, PredictionHistoryError> {
        let mut conn = self
            .connector
            .connect()
            .await
            .map_err(|err| map_connection_error(err, PredictionHistoryError::connection))?;

        let user_input_json = canonical_form_json(&record.form);
        let row = NewPredictionRow {
            username: record.username.as_ref(),
            user_input_json: &user_input_json,
            data_hash: record.data_hash.as_str(),
            transaction_id: record.transaction_id.as_str(),
            prediction_label: record.label.as_str(),
            confidence: record.confidence.value(),
            timestamp: record.created_at.naive_utc(),
        };
        let stored: PredictionRow = diesel::insert_into(prediction_history::table)
            .values(&row)
            .returning(PredictionRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err))?;

        row_to_record(stored)
    }

    async fn list_for_user(
        &self,
        username: &Username,
    ) -> Result<Vec<PredictionRecord>, PredictionHistoryError> {
        let mut conn = self
            .connector
            .connect()
            .await
            .map_err(|err| map_connection_error(err, PredictionHistoryError::connection))?;

        let rows: Vec<PredictionRow> = prediction_history::table
            .filter(prediction_history::username.eq(username.as_ref()))
            .order((
                prediction_history::timestamp.desc(),
                prediction_history::id.desc(),
            ))
            .select(PredictionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err))?;

        rows.into_iter().map(row_to_record).collect()
    }

    async fn count_by_label(
        &self,
        username: &Username,
    ) -> Result<Vec<LabelCount>, PredictionHistoryError> {
        let mut conn = self
            .connector
            .connect()
            .await
            .map_err(|err| map_connection_error(err, PredictionHistoryError::connection))?;

        let grouped: Vec<(String, i64)> = prediction_history::table
            .filter(prediction_history::username.eq(username.as_ref()))
            .group_by(prediction_history::prediction_label)
            .select((prediction_history::prediction_label, count_star()))
            .order(prediction_history::prediction_label.asc())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err))?;

        let mut counts = Vec::with_capacity(grouped.len());
        for (label, count) in grouped {
            let Ok(parsed) = label.parse::<PlacementLabel>() else {
                warn!(%username, label = %label, "skipping unknown label in history aggregate");
                continue;
            };
            let count = u64::try_from(count).map_err(|_| {
                PredictionHistoryError::query(format!("negative count for label {label}"))
            })?;
            counts.push(LabelCount {
                label: parsed,
                count,
            });
        }
        Ok(counts)
    }

    async fn find_for_user(
        &self,
        username: &Username,
        id: i32,
    ) -> Result<Option<PredictionRecord>, PredictionHistoryError> {
        let mut conn = self
            .connector
            .connect()
            .await
            .map_err(|err| map_connection_error(err, PredictionHistoryError::connection))?;

        let row: Option<PredictionRow> = prediction_history::table
            .filter(prediction_history::id.eq(id))
            .filter(prediction_history::username.eq(username.as_ref()))
            .select(PredictionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err))?;

        row.map(row_to_record).transpose()
    }
}
