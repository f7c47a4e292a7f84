//! HTTP inbound adapter exposing the JSON endpoints.
//!
//! Handlers depend on driving ports held in [`state::HttpState`] and on
//! [`session::SessionContext`] for authentication; domain errors become
//! responses through [`error`].

pub mod accounts;
pub mod error;
pub mod health;
pub mod history;
pub mod pages;
pub mod predict;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
