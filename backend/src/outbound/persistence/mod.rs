//! SQLite persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by an
//! embedded SQLite file via Diesel, with async access through
//! `diesel-async`'s `SyncConnectionWrapper`.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. No business logic resides here.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Connection per operation**: each call opens its own connection through
//!   [`SqliteConnector`]; migrations run once at startup.
//! - **Strongly typed errors**: Diesel errors are mapped to the port error
//!   enums; unique violations become duplicate-account errors.
//!
//! # Example
//!
//! ```ignore
//! use placement_backend::outbound::persistence::{DieselUserRepository, SqliteConnector};
//!
//! let connector = SqliteConnector::new("placement.db");
//! connector.run_migrations()?;
//! let repo = DieselUserRepository::new(connector);
//! ```

mod connection;
mod diesel_basic_error_mapping;
mod diesel_prediction_history_repository;
mod diesel_user_repository;
mod models;
mod schema;

pub use connection::{ConnectionError, DbConnection, MIGRATIONS, SqliteConnector};
pub use diesel_prediction_history_repository::DieselPredictionHistoryRepository;
pub use diesel_user_repository::DieselUserRepository;
