//! Placement model adapters.
//!
//! The classifier ships as a JSON tree-ensemble artifact read once at
//! startup and evaluated in process.

mod dto;
mod tree_ensemble;

pub use tree_ensemble::{ModelLoadError, TreeEnsembleModel};
