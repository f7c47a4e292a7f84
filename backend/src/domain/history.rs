//! Prediction audit trail: stored records, label aggregates and hash checks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::data_hash::DataHash;
use super::features::RawForm;
use super::ledger::TransactionId;
use super::prediction::{Confidence, PlacementLabel};
use super::user::Username;

/// Audit row to append after a prediction has been anchored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPredictionRecord {
    pub username: Username,
    pub form: RawForm,
    pub data_hash: DataHash,
    pub transaction_id: TransactionId,
    pub label: PlacementLabel,
    pub confidence: Confidence,
    pub created_at: DateTime<Utc>,
}

/// Stored, immutable prediction record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecord {
    pub id: i32,
    pub username: Username,
    /// Form fields exactly as submitted.
    pub user_input: RawForm,
    pub data_hash: DataHash,
    pub transaction_id: TransactionId,
    pub prediction: PlacementLabel,
    pub confidence: Confidence,
    pub timestamp: DateTime<Utc>,
}

impl PredictionRecord {
    /// Recompute the data hash from the stored snapshot and compare.
    pub fn verify(&self) -> HashVerification {
        let recomputed = DataHash::compute(&self.username, &self.user_input);
        HashVerification {
            record_id: self.id,
            matches: recomputed == self.data_hash,
            stored_hash: self.data_hash.clone(),
            recomputed_hash: recomputed,
            transaction_id: self.transaction_id.clone(),
        }
    }
}

/// Outcome of re-deriving a record's data hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HashVerification {
    pub record_id: i32,
    pub stored_hash: DataHash,
    pub recomputed_hash: DataHash,
    /// Ledger transaction that anchored the stored hash.
    pub transaction_id: TransactionId,
    pub matches: bool,
}

/// Number of records carrying one label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCount {
    pub label: PlacementLabel,
    pub count: u64,
}

/// Per-label counts laid out as parallel arrays for charting.
///
/// # Examples
/// ```
/// use placement_backend::domain::{LabelCount, LabelSummary, PlacementLabel};
///
/// let summary = LabelSummary::from_counts(vec![
///     LabelCount { label: PlacementLabel::Placed, count: 3 },
///     LabelCount { label: PlacementLabel::NotPlaced, count: 1 },
/// ]);
/// assert_eq!(summary.labels, vec![PlacementLabel::NotPlaced, PlacementLabel::Placed]);
/// assert_eq!(summary.values, vec![1, 3]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LabelSummary {
    pub labels: Vec<PlacementLabel>,
    pub values: Vec<u64>,
}

impl LabelSummary {
    /// Build the summary ordered by label text. Zero counts are skipped and
    /// repeated labels are merged.
    pub fn from_counts(counts: Vec<LabelCount>) -> Self {
        let mut merged: std::collections::BTreeMap<&'static str, (PlacementLabel, u64)> =
            std::collections::BTreeMap::new();
        for LabelCount { label, count } in counts {
            if count == 0 {
                continue;
            }
            merged.entry(label.as_str()).or_insert((label, 0)).1 += count;
        }
        let (labels, values) = merged.into_values().unzip();
        Self { labels, values }
    }

    /// Total number of records summarised.
    pub fn total(&self) -> u64 {
        self.values.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn record(form: RawForm, hash_owner: &str) -> PredictionRecord {
        let owner = Username::new(hash_owner).expect("valid username");
        PredictionRecord {
            id: 7,
            username: Username::new("alice").expect("valid username"),
            data_hash: DataHash::compute(&owner, &form),
            user_input: form,
            transaction_id: TransactionId::parse(&format!("0x{}", "1".repeat(64)))
                .expect("valid tx id"),
            prediction: PlacementLabel::Placed,
            confidence: Confidence::from_probability(0.8),
            timestamp: DateTime::UNIX_EPOCH,
        }
    }

    #[rstest]
    fn verify_detects_matching_snapshot() {
        let outcome = record(RawForm::from_pairs([("Age", "21")]), "alice").verify();
        assert!(outcome.matches);
        assert_eq!(outcome.record_id, 7);
        assert_eq!(outcome.stored_hash, outcome.recomputed_hash);
    }

    #[rstest]
    fn verify_detects_tampering() {
        let outcome = record(RawForm::from_pairs([("Age", "21")]), "mallory").verify();
        assert!(!outcome.matches);
    }

    #[rstest]
    fn summary_merges_and_orders_labels() {
        let summary = LabelSummary::from_counts(vec![
            LabelCount {
                label: PlacementLabel::Placed,
                count: 2,
            },
            LabelCount {
                label: PlacementLabel::NotPlaced,
                count: 0,
            },
            LabelCount {
                label: PlacementLabel::Placed,
                count: 1,
            },
        ]);
        assert_eq!(summary.labels, vec![PlacementLabel::Placed]);
        assert_eq!(summary.values, vec![3]);
        assert_eq!(summary.total(), 3);
    }

    #[rstest]
    fn empty_summary_serializes_as_empty_arrays() {
        let json = serde_json::to_value(LabelSummary::default()).expect("serialize");
        assert_eq!(json, serde_json::json!({ "labels": [], "values": [] }));
    }
}
