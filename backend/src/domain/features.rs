//! Feature preparation for the placement model.
//!
//! Maps the raw prediction form onto the exact, ordered feature columns the
//! classifier was trained with. The mapping mirrors the training pipeline:
//!
//! - numeric fields are parsed; unparseable values become the missing
//!   sentinel ([`f64::NAN`]) which the model routes as "missing";
//! - `Skill_Count`, `Club_Count` and `GPA_Trend` are derived;
//! - `Gender` and `Internship Done` are binary-coded (unmapped values → 0);
//! - `Branch` and `Internship Domain` are one-hot expanded;
//! - the result is reindexed to the trained columns: absent columns are 0,
//!   extra columns are dropped.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

/// Form field names accepted by the prediction endpoint.
pub mod field {
    pub const AGE: &str = "Age";
    pub const GENDER: &str = "Gender";
    pub const BRANCH: &str = "Branch";
    pub const AVERAGE_GPA: &str = "Average GPA";
    pub const BACKLOGS: &str = "Backlogs";
    pub const ATTENDANCE: &str = "Attendance (%)";
    pub const SEM1_GPA: &str = "Sem1 GPA";
    pub const SEM2_GPA: &str = "Sem2 GPA";
    pub const SEM3_GPA: &str = "Sem3 GPA";
    pub const SEM4_GPA: &str = "Sem4 GPA";
    pub const SEM5_GPA: &str = "Sem5 GPA";
    pub const SEM6_GPA: &str = "Sem6 GPA";
    pub const SEM7_GPA: &str = "Sem7 GPA";
    pub const SEM8_GPA: &str = "Sem8 GPA";
    pub const SKILLS: &str = "Skills";
    pub const CLUBS: &str = "Clubs";
    pub const INTERNSHIP_DONE: &str = "Internship Done";
    pub const INTERNSHIP_DOMAIN: &str = "Internship Domain";
}

/// Derived column names produced by the preparer.
pub mod derived {
    pub const SKILL_COUNT: &str = "Skill_Count";
    pub const CLUB_COUNT: &str = "Club_Count";
    pub const GPA_TREND: &str = "GPA_Trend";
}

/// Fields parsed as numbers.
pub const NUMERIC_FIELDS: [&str; 12] = [
    field::AGE,
    field::AVERAGE_GPA,
    field::BACKLOGS,
    field::ATTENDANCE,
    field::SEM1_GPA,
    field::SEM2_GPA,
    field::SEM3_GPA,
    field::SEM4_GPA,
    field::SEM5_GPA,
    field::SEM6_GPA,
    field::SEM7_GPA,
    field::SEM8_GPA,
];

/// Fields expanded into one indicator column per category.
pub const ONE_HOT_FIELDS: [&str; 2] = [field::BRANCH, field::INTERNSHIP_DOMAIN];

/// Every field the prediction form collects, in display order.
pub const FORM_FIELDS: [&str; 18] = [
    field::AGE,
    field::GENDER,
    field::BRANCH,
    field::AVERAGE_GPA,
    field::SEM1_GPA,
    field::SEM2_GPA,
    field::SEM3_GPA,
    field::SEM4_GPA,
    field::SEM5_GPA,
    field::SEM6_GPA,
    field::SEM7_GPA,
    field::SEM8_GPA,
    field::BACKLOGS,
    field::ATTENDANCE,
    field::SKILLS,
    field::CLUBS,
    field::INTERNSHIP_DONE,
    field::INTERNSHIP_DOMAIN,
];

/// Raw prediction form as submitted: field name → string value.
///
/// Keys are kept sorted, which is also the canonical order used when the
/// form is hashed and stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = HashMap<String, String>)]
pub struct RawForm(BTreeMap<String, String>);

impl RawForm {
    /// Build a form from any iterator of name/value pairs. Later duplicates win.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Value for `name`, if submitted.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Iterate fields in canonical (sorted) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of submitted fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the form has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Errors raised when the trained column list is unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrainedColumnsError {
    /// No columns were supplied.
    #[error("trained column list must not be empty")]
    Empty,
    /// A column name appeared more than once.
    #[error("trained column '{name}' is duplicated")]
    Duplicate { name: String },
}

/// Ordered feature columns the model was trained on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainedColumns(Arc<[String]>);

impl TrainedColumns {
    /// Validate a column list: non-empty and without duplicates.
    pub fn new(columns: Vec<String>) -> Result<Self, TrainedColumnsError> {
        if columns.is_empty() {
            return Err(TrainedColumnsError::Empty);
        }
        let mut seen = std::collections::HashSet::with_capacity(columns.len());
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(TrainedColumnsError::Duplicate { name: name.clone() });
            }
        }
        Ok(Self(columns.into()))
    }

    /// Column names in trained order.
    pub fn names(&self) -> &[String] {
        &self.0
    }

    /// Category values known for a one-hot source field, e.g. `Branch`.
    pub fn categories_for(&self, source_field: &str) -> Vec<String> {
        let prefix = format!("{source_field}_");
        self.0
            .iter()
            .filter_map(|name| name.strip_prefix(prefix.as_str()))
            .map(str::to_owned)
            .collect()
    }
}

/// Feature values aligned to [`TrainedColumns`].
///
/// `NaN` marks a value that was submitted but could not be parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    columns: TrainedColumns,
    values: Vec<f64>,
}

impl FeatureVector {
    /// Column names, in the same order as [`Self::values`].
    pub fn columns(&self) -> &[String] {
        self.columns.names()
    }

    /// Feature values in trained order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value of a named column.
    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .names()
            .iter()
            .position(|name| name == column)
            .and_then(|index| self.values.get(index).copied())
    }
}

/// Turns raw forms into model-ready [`FeatureVector`]s.
#[derive(Debug, Clone)]
pub struct FeaturePreparer {
    columns: TrainedColumns,
}

impl FeaturePreparer {
    /// Build a preparer for the given trained columns.
    pub fn new(columns: TrainedColumns) -> Self {
        Self { columns }
    }

    /// Trained columns this preparer aligns to.
    pub fn columns(&self) -> &TrainedColumns {
        &self.columns
    }

    /// Prepare and align a feature vector. Never fails: bad numeric input
    /// becomes the missing sentinel and absent columns become 0.
    ///
    /// # Examples
    /// ```
    /// use placement_backend::domain::{FeaturePreparer, RawForm, TrainedColumns};
    ///
    /// let columns = TrainedColumns::new(vec!["Age".into(), "Branch_CS".into()]).unwrap();
    /// let preparer = FeaturePreparer::new(columns);
    /// let vector = preparer.prepare(&RawForm::from_pairs([("Branch", "CS"), ("Extra", "x")]));
    /// assert_eq!(vector.values(), &[0.0, 1.0]);
    /// ```
    pub fn prepare(&self, form: &RawForm) -> FeatureVector {
        let frame = build_frame(form);
        let values = self
            .columns
            .names()
            .iter()
            .map(|name| frame.get(name.as_str()).copied().unwrap_or(0.0))
            .collect();
        FeatureVector {
            columns: self.columns.clone(),
            values,
        }
    }
}

fn build_frame(form: &RawForm) -> HashMap<String, f64> {
    let mut frame = HashMap::new();

    for name in NUMERIC_FIELDS {
        if let Some(raw) = form.get(name) {
            frame.insert(name.to_owned(), parse_numeric(name, raw));
        }
    }

    frame.insert(
        derived::SKILL_COUNT.to_owned(),
        count_tokens(form.get(field::SKILLS)),
    );
    frame.insert(
        derived::CLUB_COUNT.to_owned(),
        count_tokens(form.get(field::CLUBS)),
    );
    if let (Some(last), Some(first)) = (
        frame.get(field::SEM8_GPA).copied(),
        frame.get(field::SEM1_GPA).copied(),
    ) {
        frame.insert(derived::GPA_TREND.to_owned(), last - first);
    }

    frame.insert(
        field::GENDER.to_owned(),
        binary_code(form.get(field::GENDER), "Male"),
    );
    frame.insert(
        field::INTERNSHIP_DONE.to_owned(),
        binary_code(form.get(field::INTERNSHIP_DONE), "Yes"),
    );

    for source in ONE_HOT_FIELDS {
        if let Some(category) = form.get(source) {
            frame.insert(format!("{source}_{category}"), 1.0);
        }
    }

    frame
}

fn parse_numeric(name: &str, raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            debug!(field = name, "numeric form field coerced to missing");
            f64::NAN
        }
    }
}

fn count_tokens(raw: Option<&str>) -> f64 {
    match raw {
        None | Some("") => 0.0,
        Some(value) => value.split(',').count() as f64,
    }
}

/// `positive` codes as 1; the negative label and anything unmapped code as 0.
fn binary_code(raw: Option<&str>, positive: &str) -> f64 {
    if raw == Some(positive) { 1.0 } else { 0.0 }
}
