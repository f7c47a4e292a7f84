//! Gradient-boosted tree ensemble loaded from a JSON artifact.
//!
//! Each tree routes a sample from its root: a split node sends it left when
//! the feature is below the threshold and right otherwise; a missing value
//! (`NaN`) follows the node's default direction. Leaf values are summed with
//! the logit of `base_score` and passed through the logistic function.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::domain::ports::{ModelSummary, PlacementModel, PlacementModelError};
use crate::domain::{FeatureVector, TrainedColumns};
use crate::outbound::artifact_fs;

use super::dto::{EnsembleDto, NodeDto};

const MODEL_KIND: &str = "gradient_boosted_trees";

/// Errors raised while loading a model artifact.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    /// The artifact could not be read.
    #[error("failed to read model artifact at {path}: {source}")]
    Read {
        /// Path to the artifact.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The artifact is not valid JSON of the expected shape.
    #[error("model artifact is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// The artifact parsed but describes an unusable model.
    #[error("model artifact is invalid: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        default_left: bool,
    },
    Leaf(f64),
}

#[derive(Debug, Clone, PartialEq)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn score(&self, values: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes.get(index) {
                Some(Node::Leaf(value)) => return *value,
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    default_left,
                }) => {
                    let value = values.get(*feature).copied().unwrap_or(f64::NAN);
                    let go_left = if value.is_nan() {
                        *default_left
                    } else {
                        value < *threshold
                    };
                    index = if go_left { *left } else { *right };
                }
                // Validation guarantees every child index is in range.
                None => return 0.0,
            }
        }
    }
}

/// Tree-ensemble classifier implementing [`PlacementModel`].
#[derive(Debug, Clone)]
pub struct TreeEnsembleModel {
    columns: TrainedColumns,
    base_score: f64,
    trees: Vec<Tree>,
}

impl TreeEnsembleModel {
    /// Read and validate an artifact from disk.
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        let raw = artifact_fs::read_to_string(path).map_err(|source| ModelLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let model = Self::from_json(&raw)?;
        info!(
            path = %path.display(),
            trees = model.trees.len(),
            features = model.columns.names().len(),
            "placement model loaded"
        );
        Ok(model)
    }

    /// Parse and validate an artifact held in memory.
    pub fn from_json(raw: &str) -> Result<Self, ModelLoadError> {
        let dto: EnsembleDto = serde_json::from_str(raw)?;
        Self::from_dto(dto)
    }

    fn from_dto(dto: EnsembleDto) -> Result<Self, ModelLoadError> {
        let feature_count = dto.feature_names.len();
        let columns = TrainedColumns::new(dto.feature_names)
            .map_err(|err| ModelLoadError::Invalid(err.to_string()))?;
        if !(dto.base_score > 0.0 && dto.base_score < 1.0) {
            return Err(ModelLoadError::Invalid(format!(
                "base_score {} must lie strictly between 0 and 1",
                dto.base_score
            )));
        }
        if dto.trees.is_empty() {
            return Err(ModelLoadError::Invalid(
                "ensemble must contain at least one tree".to_owned(),
            ));
        }
        let trees = dto
            .trees
            .into_iter()
            .enumerate()
            .map(|(tree_index, tree)| build_tree(tree_index, tree.nodes, feature_count))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            columns,
            base_score: dto.base_score,
            trees,
        })
    }

    fn margin(&self, values: &[f64]) -> f64 {
        let base = (self.base_score / (1.0 - self.base_score)).ln();
        base + self.trees.iter().map(|tree| tree.score(values)).sum::<f64>()
    }
}

fn build_tree(
    tree_index: usize,
    nodes: Vec<NodeDto>,
    feature_count: usize,
) -> Result<Tree, ModelLoadError> {
    let invalid = |node: usize, message: String| {
        ModelLoadError::Invalid(format!("tree {tree_index} node {node}: {message}"))
    };
    if nodes.is_empty() {
        return Err(ModelLoadError::Invalid(format!("tree {tree_index} has no nodes")));
    }
    let node_count = nodes.len();
    nodes
        .into_iter()
        .enumerate()
        .map(|(index, node)| match node {
            NodeDto::Leaf { leaf } if leaf.is_finite() => Ok(Node::Leaf(leaf)),
            NodeDto::Leaf { leaf } => {
                Err(invalid(index, format!("leaf value {leaf} is not finite")))
            }
            NodeDto::Split {
                split,
                threshold,
                left,
                right,
                default_left,
            } => {
                if split >= feature_count {
                    return Err(invalid(
                        index,
                        format!("split feature {split} out of range for {feature_count} features"),
                    ));
                }
                if !threshold.is_finite() {
                    return Err(invalid(index, "threshold is not finite".to_owned()));
                }
                // Children must point forward so evaluation always terminates.
                for child in [left, right] {
                    if child <= index || child >= node_count {
                        return Err(invalid(
                            index,
                            format!("child {child} out of range ({index}, {node_count})"),
                        ));
                    }
                }
                Ok(Node::Split {
                    feature: split,
                    threshold,
                    left,
                    right,
                    default_left,
                })
            }
        })
        .collect::<Result<Vec<_>, _>>()
        .map(|nodes| Tree { nodes })
}

fn sigmoid(margin: f64) -> f64 {
    1.0 / (1.0 + (-margin).exp())
}

impl PlacementModel for TreeEnsembleModel {
    fn feature_columns(&self) -> &TrainedColumns {
        &self.columns
    }

    fn predict_probability(&self, features: &FeatureVector) -> Result<f64, PlacementModelError> {
        let expected = self.columns.names().len();
        let found = features.values().len();
        if expected != found {
            return Err(PlacementModelError::column_mismatch(expected, found));
        }
        let probability = sigmoid(self.margin(features.values()));
        if probability.is_nan() {
            return Err(PlacementModelError::evaluation(
                "ensemble produced a NaN probability",
            ));
        }
        Ok(probability)
    }

    fn summary(&self) -> ModelSummary {
        ModelSummary {
            kind: MODEL_KIND.to_owned(),
            tree_count: self.trees.len(),
            base_score: self.base_score,
            feature_columns: self.columns.names().to_vec(),
        }
    }
}

#[cfg(test)]
#[path = "tree_ensemble_tests.rs"]
mod tests;
