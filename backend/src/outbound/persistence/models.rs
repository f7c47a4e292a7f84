//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and never
//! leave it. Conversion to domain types happens in the repositories, where
//! stored values are re-validated.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use super::schema::{prediction_history, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct UserRow {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub password_hash: String,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub phone_number: &'a str,
    pub password_hash: &'a str,
}

/// Row struct for reading from the prediction_history table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = prediction_history)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct PredictionRow {
    pub id: i32,
    pub username: String,
    pub user_input_json: String,
    pub data_hash: String,
    pub transaction_id: String,
    pub prediction_label: String,
    pub confidence: f64,
    pub timestamp: NaiveDateTime,
}

/// Insertable struct for appending prediction records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = prediction_history)]
pub(crate) struct NewPredictionRow<'a> {
    pub username: &'a str,
    pub user_input_json: &'a str,
    pub data_hash: &'a str,
    pub transaction_id: &'a str,
    pub prediction_label: &'a str,
    pub confidence: f64,
    pub timestamp: NaiveDateTime,
}
