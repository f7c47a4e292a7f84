//! Driving port for submitting placement predictions.
//!
//! A submission prepares features, scores them, anchors the data hash on the
//! ledger and appends an audit record, in that order. Failure at any step
//! aborts the request before the audit write.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Error, PredictionReceipt, RawForm, Username};

/// Field layout clients need to build a prediction form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PredictionFormSchema {
    /// Accepted form field names.
    pub fields: Vec<String>,
    /// Fields parsed as numbers.
    pub numeric_fields: Vec<String>,
    /// Known categories per one-hot field, derived from the trained columns.
    pub categories: Vec<CategoryOptions>,
    /// Model input columns in trained order.
    pub trained_columns: Vec<String>,
}

/// Known values for one categorical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CategoryOptions {
    pub field: String,
    pub values: Vec<String>,
}

/// Domain use-case port for predictions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PredictionCommand: Send + Sync {
    /// Score, anchor and record a submitted form for `username`.
    async fn predict(&self, username: &Username, form: RawForm)
    -> Result<PredictionReceipt, Error>;

    /// Describe the form the model expects.
    fn form_schema(&self) -> PredictionFormSchema;
}
