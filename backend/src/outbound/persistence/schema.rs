//! Diesel table definitions for the SQLite schema.
//!
//! These definitions must match `backend/migrations` exactly. When a
//! migration changes the schema, update this file to match (or regenerate it
//! with `diesel print-schema`).

diesel::table! {
    /// Registered accounts.
    users (id) {
        /// Autoincrement primary key.
        id -> Integer,
        /// Unique login name.
        username -> Text,
        /// Unique contact email.
        email -> Text,
        phone_number -> Text,
        /// Argon2 PHC string.
        password_hash -> Text,
    }
}

diesel::table! {
    /// Append-only prediction audit trail.
    prediction_history (id) {
        id -> Integer,
        /// Owning username; not a foreign key.
        username -> Text,
        /// Submitted form as canonical JSON.
        user_input_json -> Text,
        data_hash -> Text,
        transaction_id -> Text,
        /// `Placed` or `Not Placed`.
        prediction_label -> Text,
        /// Percentage in `0..=100`.
        confidence -> Double,
        /// Creation time, UTC.
        timestamp -> Timestamp,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, prediction_history);
