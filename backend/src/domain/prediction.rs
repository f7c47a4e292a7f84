//! Placement prediction outcome types.
//!
//! The classifier reports the probability of the positive class; everything
//! user-facing (label, percentage confidence) is derived here so adapters
//! cannot disagree on rounding or thresholds.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::data_hash::DataHash;
use super::ledger::TransactionId;

/// The positive class is predicted only for probabilities strictly above this.
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Predicted placement outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum PlacementLabel {
    /// Predicted class 1.
    #[serde(rename = "Placed")]
    Placed,
    /// Predicted class 0.
    #[serde(rename = "Not Placed")]
    NotPlaced,
}

impl PlacementLabel {
    /// Stored and displayed label text.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Placed => "Placed",
            Self::NotPlaced => "Not Placed",
        }
    }
}

impl fmt::Display for PlacementLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored label is not one of the known outcomes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown placement label '{0}'")]
pub struct UnknownPlacementLabel(pub String);

impl FromStr for PlacementLabel {
    type Err = UnknownPlacementLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Placed" => Ok(Self::Placed),
            "Not Placed" => Ok(Self::NotPlaced),
            other => Err(UnknownPlacementLabel(other.to_owned())),
        }
    }
}

/// Validation errors for [`Confidence`].
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ConfidenceError {
    /// Value was NaN or infinite.
    #[error("confidence must be a finite number")]
    NotFinite,
    /// Value fell outside `0..=100`.
    #[error("confidence {0} is outside 0..=100")]
    OutOfRange(f64),
}

/// Positive-class probability as a percentage with two decimals.
///
/// # Examples
/// ```
/// use placement_backend::domain::Confidence;
///
/// assert_eq!(Confidence::from_probability(0.87654).value(), 87.65);
/// assert_eq!(Confidence::from_probability(1.7).value(), 100.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "f64", into = "f64")]
#[schema(value_type = f64, example = 87.65)]
pub struct Confidence(f64);

impl Confidence {
    /// Convert a probability to a clamped, rounded percentage. A non-finite
    /// probability yields 0.
    pub fn from_probability(probability: f64) -> Self {
        if !probability.is_finite() {
            return Self(0.0);
        }
        let percent = (probability * 100.0 * 100.0).round() / 100.0;
        Self(percent.clamp(0.0, 100.0))
    }

    /// Validate an already-computed percentage, e.g. one read from storage.
    pub fn new(value: f64) -> Result<Self, ConfidenceError> {
        if !value.is_finite() {
            return Err(ConfidenceError::NotFinite);
        }
        if !(0.0..=100.0).contains(&value) {
            return Err(ConfidenceError::OutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Percentage value.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Confidence {
    type Error = ConfidenceError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(value: Confidence) -> Self {
        value.0
    }
}

/// Label and confidence produced by the classifier for one feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PlacementOutcome {
    pub label: PlacementLabel,
    pub confidence: Confidence,
}

impl PlacementOutcome {
    /// Derive the outcome from the positive-class probability.
    ///
    /// # Examples
    /// ```
    /// use placement_backend::domain::{PlacementLabel, PlacementOutcome};
    ///
    /// let outcome = PlacementOutcome::from_probability(0.5);
    /// assert_eq!(outcome.label, PlacementLabel::NotPlaced);
    /// assert_eq!(outcome.confidence.value(), 50.0);
    /// ```
    pub fn from_probability(probability: f64) -> Self {
        let label = if probability > DECISION_THRESHOLD {
            PlacementLabel::Placed
        } else {
            PlacementLabel::NotPlaced
        };
        Self {
            label,
            confidence: Confidence::from_probability(probability),
        }
    }
}

/// Result of a successful, anchored and recorded prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PredictionReceipt {
    /// Audit record identifier.
    pub record_id: i32,
    pub prediction: PlacementLabel,
    pub confidence: Confidence,
    pub data_hash: DataHash,
    pub transaction_id: TransactionId,
    pub created_at: DateTime<Utc>,
}
