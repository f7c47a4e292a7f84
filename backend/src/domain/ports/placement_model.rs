//! Driven port for the trained placement classifier.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{FeatureVector, TrainedColumns};

use super::define_port_error;

define_port_error! {
    /// Errors raised while evaluating the classifier.
    pub enum PlacementModelError {
        /// The vector was not aligned to the model's columns.
        ColumnMismatch { expected: usize, found: usize } =>
            "feature vector has {found} columns, model expects {expected}",
        /// Evaluation produced an unusable score.
        Evaluation { message: String } => "model evaluation failed: {message}",
    }
}

/// Static description of the loaded model.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModelSummary {
    /// Model family, e.g. `gradient_boosted_trees`.
    pub kind: String,
    pub tree_count: usize,
    pub base_score: f64,
    /// Trained feature columns in evaluation order.
    pub feature_columns: Vec<String>,
}

/// Classifier that scores aligned feature vectors.
#[cfg_attr(test, mockall::automock)]
pub trait PlacementModel: Send + Sync {
    /// Columns the model was trained on, in order.
    fn feature_columns(&self) -> &TrainedColumns;

    /// Probability of the positive ("Placed") class.
    fn predict_probability(&self, features: &FeatureVector) -> Result<f64, PlacementModelError>;

    /// Describe the model for informational endpoints.
    fn summary(&self) -> ModelSummary;
}

/// Constant-probability model for tests and local wiring.
#[derive(Debug, Clone)]
pub struct FixturePlacementModel {
    columns: TrainedColumns,
    probability: f64,
}

impl FixturePlacementModel {
    /// Model over `columns` that always answers `probability`.
    pub fn new(columns: TrainedColumns, probability: f64) -> Self {
        Self {
            columns,
            probability,
        }
    }
}

impl PlacementModel for FixturePlacementModel {
    fn feature_columns(&self) -> &TrainedColumns {
        &self.columns
    }

    fn predict_probability(&self, features: &FeatureVector) -> Result<f64, PlacementModelError> {
        let expected = self.columns.names().len();
        let found = features.values().len();
        if expected != found {
            return Err(PlacementModelError::column_mismatch(expected, found));
        }
        Ok(self.probability)
    }

    fn summary(&self) -> ModelSummary {
        ModelSummary {
            kind: "fixture".to_owned(),
            tree_count: 0,
            base_score: self.probability,
            feature_columns: self.columns.names().to_vec(),
        }
    }
}
