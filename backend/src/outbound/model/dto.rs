//! On-disk shape of the tree-ensemble artifact.
//!
//! ```json
//! {
//!   "feature_names": ["Age", "Average GPA"],
//!   "base_score": 0.5,
//!   "trees": [
//!     {"nodes": [
//!       {"split": 1, "threshold": 3.2, "left": 1, "right": 2, "default_left": true},
//!       {"leaf": -0.4},
//!       {"leaf": 0.6}
//!     ]}
//!   ]
//! }
//! ```

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct EnsembleDto {
    pub(super) feature_names: Vec<String>,
    #[serde(default = "default_base_score")]
    pub(super) base_score: f64,
    pub(super) trees: Vec<TreeDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TreeDto {
    pub(super) nodes: Vec<NodeDto>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum NodeDto {
    Split {
        split: usize,
        threshold: f64,
        left: usize,
        right: usize,
        #[serde(default = "default_left")]
        default_left: bool,
    },
    Leaf {
        leaf: f64,
    },
}

fn default_base_score() -> f64 {
    0.5
}

fn default_left() -> bool {
    true
}
