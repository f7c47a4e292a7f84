//! Deployed contract descriptor: `{"address": "0x…", "abi": [...]}`.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::AccountAddress;
use crate::outbound::artifact_fs;

/// Errors raised while loading or saving contract info.
#[derive(Debug, Error)]
pub enum ContractInfoError {
    /// The file could not be read or written.
    #[error("contract info at {path}: {source}")]
    Io {
        /// Path to the contract info file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The file is not a valid descriptor.
    #[error("contract info at {path} is invalid: {message}")]
    Invalid {
        /// Path to the contract info file.
        path: PathBuf,
        /// Parse or validation failure.
        message: String,
    },
}

/// Address and ABI of the anchoring contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractInfo {
    /// Deployed contract address.
    pub address: AccountAddress,
    /// Contract ABI as emitted by the Solidity compiler.
    pub abi: Value,
}

impl ContractInfo {
    /// Read and validate a descriptor. The ABI must declare
    /// `function_name` with `arity` inputs.
    pub fn load(
        path: &Path,
        function_name: &str,
        arity: usize,
    ) -> Result<Self, ContractInfoError> {
        let raw = artifact_fs::read_to_string(path).map_err(|source| ContractInfoError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let invalid = |message: String| ContractInfoError::Invalid {
            path: path.to_path_buf(),
            message,
        };
        let info: Self = serde_json::from_str(&raw).map_err(|err| invalid(err.to_string()))?;
        if !info.declares_function(function_name, arity) {
            return Err(invalid(format!(
                "abi does not declare {function_name} with {arity} inputs"
            )));
        }
        Ok(info)
    }

    /// Write the descriptor as JSON.
    pub fn save(&self, path: &Path) -> Result<(), ContractInfoError> {
        let encoded = serde_json::to_vec_pretty(self).map_err(|err| ContractInfoError::Invalid {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        artifact_fs::write(path, &encoded).map_err(|source| ContractInfoError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Whether the ABI lists a function `name` taking `arity` inputs.
    pub fn declares_function(&self, name: &str, arity: usize) -> bool {
        self.abi.as_array().is_some_and(|entries| {
            entries.iter().any(|entry| {
                entry.get("type").and_then(Value::as_str) == Some("function")
                    && entry.get("name").and_then(Value::as_str) == Some(name)
                    && entry
                        .get("inputs")
                        .and_then(Value::as_array)
                        .is_some_and(|inputs| inputs.len() == arity)
            })
        })
    }
}
