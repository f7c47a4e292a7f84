//! Startup configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `PLACEMENT_*` environment variables and an
//! optional configuration file, in that order of precedence. Session cookie
//! settings are separate; see
//! [`crate::inbound::http::session_config`].

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::{AccountAddress, LedgerIdError};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATABASE_URL: &str = "placement.db";
const DEFAULT_MODEL_PATH: &str = "model/placement_model.json";
const DEFAULT_CONTRACT_INFO: &str = "contract_info.json";
const DEFAULT_LEDGER_URL: &str = "http://127.0.0.1:7545";
const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
const DEFAULT_RECEIPT_TIMEOUT_MS: u64 = 120_000;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The ledger URL did not parse.
    #[error("invalid ledger url '{value}': {source}")]
    LedgerUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    /// The sender was not a 20-byte hex address.
    #[error("invalid ledger sender '{value}': {source}")]
    Sender {
        value: String,
        #[source]
        source: LedgerIdError,
    },
    /// The ledger mode was neither `json-rpc` nor `fixture`.
    #[error("invalid ledger mode '{value}': expected 'json-rpc' or 'fixture'")]
    LedgerMode { value: String },
    /// A duration setting was zero.
    #[error("{name} must be greater than zero")]
    ZeroDuration { name: &'static str },
}

/// Server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PLACEMENT")]
pub struct PlacementSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<SocketAddr>,
    /// SQLite database file.
    pub database_url: Option<String>,
    /// Tree-ensemble model artifact.
    pub model_path: Option<PathBuf>,
    /// Contract info file written by `placement-ledger deploy`.
    pub contract_info_path: Option<PathBuf>,
    /// `json-rpc` (default) or `fixture`. The fixture anchors in-process and
    /// never reaches a chain, so it is for local development only.
    pub ledger_mode: Option<String>,
    /// JSON-RPC endpoint of the ledger node, `http://127.0.0.1:7545` unless
    /// configured.
    pub ledger_url: Option<String>,
    /// Account transactions are sent from; defaults to the node's first account.
    pub ledger_sender: Option<String>,
    /// Delay between receipt polls, in milliseconds.
    pub receipt_poll_interval_ms: Option<u64>,
    /// Maximum wait for a receipt, in milliseconds.
    pub receipt_timeout_ms: Option<u64>,
}

/// How predictions are anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LedgerMode {
    /// Send `storeRecord` transactions to a JSON-RPC node.
    #[default]
    JsonRpc,
    /// Anchor through the in-process fixture.
    Fixture,
}

impl FromStr for LedgerMode {
    type Err = SettingsError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json-rpc" | "jsonrpc" => Ok(Self::JsonRpc),
            "fixture" => Ok(Self::Fixture),
            _ => Err(SettingsError::LedgerMode {
                value: raw.to_owned(),
            }),
        }
    }
}

/// Validated ledger connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConnection {
    pub url: Url,
    pub sender: Option<AccountAddress>,
    pub poll_interval: Duration,
    pub receipt_timeout: Duration,
}

impl PlacementSettings {
    /// Listen address, `0.0.0.0:8080` unless configured.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)))
    }

    /// Database file, `placement.db` unless configured.
    pub fn database_url(&self) -> &str {
        self.database_url.as_deref().unwrap_or(DEFAULT_DATABASE_URL)
    }

    /// Model artifact path, `model/placement_model.json` relative to the
    /// working directory unless configured.
    pub fn model_path(&self) -> PathBuf {
        self.model_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH))
    }

    /// Contract info path, `contract_info.json` unless configured.
    pub fn contract_info_path(&self) -> PathBuf {
        self.contract_info_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTRACT_INFO))
    }

    /// Anchoring mode, [`LedgerMode::JsonRpc`] unless configured.
    pub fn ledger_mode(&self) -> Result<LedgerMode, SettingsError> {
        self.ledger_mode
            .as_deref()
            .map_or(Ok(LedgerMode::default()), str::parse)
    }

    /// Validated ledger node settings.
    pub fn ledger_connection(&self) -> Result<LedgerConnection, SettingsError> {
        let raw_url = self.ledger_url.as_deref().unwrap_or(DEFAULT_LEDGER_URL);
        let url = Url::parse(raw_url).map_err(|source| SettingsError::LedgerUrl {
            value: raw_url.to_owned(),
            source,
        })?;
        let sender = self
            .ledger_sender
            .as_deref()
            .map(|raw| {
                AccountAddress::parse(raw).map_err(|source| SettingsError::Sender {
                    value: raw.to_owned(),
                    source,
                })
            })
            .transpose()?;
        Ok(LedgerConnection {
            url,
            sender,
            poll_interval: positive_millis(
                "receipt_poll_interval_ms",
                self.receipt_poll_interval_ms,
                DEFAULT_POLL_INTERVAL_MS,
            )?,
            receipt_timeout: positive_millis(
                "receipt_timeout_ms",
                self.receipt_timeout_ms,
                DEFAULT_RECEIPT_TIMEOUT_MS,
            )?,
        })
    }
}

fn positive_millis(
    name: &'static str,
    value: Option<u64>,
    fallback: u64,
) -> Result<Duration, SettingsError> {
    match value.unwrap_or(fallback) {
        0 => Err(SettingsError::ZeroDuration { name }),
        millis => Ok(Duration::from_millis(millis)),
    }
}
