//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! This module follows the hexagonal architecture pattern, providing concrete
//! implementations of domain port traits:
//!
//! - **persistence**: SQLite-backed repositories using Diesel ORM
//! - **password**: argon2id password hashing
//! - **model**: JSON tree-ensemble placement classifier
//! - **ledger**: JSON-RPC ledger anchoring and contract deployment
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod artifact_fs;
pub mod ledger;
pub mod model;
pub mod password;
pub mod persistence;
