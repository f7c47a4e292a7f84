//! Shared Diesel error mapping for the SQLite repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::connection::ConnectionError;

/// Map connection errors into a repository-specific connection error.
pub(crate) fn map_connection_error<E, C>(error: ConnectionError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        ConnectionError::Open { message } | ConnectionError::Migration { message } => message,
    };
    connection(message)
}

/// Map common Diesel error variants into query/connection constructors.
///
/// A locked or busy SQLite file counts as a connection failure so callers
/// report it as temporarily unavailable rather than as a broken query.
pub(crate) fn map_basic_diesel_error<E, Q, C>(error: &DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(_, info) if is_busy(info.message()) => {
            connection("database is busy")
        }
        _ => query("database error"),
    }
}

/// Column named by a SQLite unique violation, e.g. `email` for
/// `UNIQUE constraint failed: users.email`.
pub(crate) fn unique_violation_column(error: &DieselError) -> Option<&str> {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => info
            .message()
            .rsplit_once('.')
            .map(|(_, column)| column.trim()),
        _ => None,
    }
}

fn is_busy(message: &str) -> bool {
    message.contains("database is locked") || message.contains("database is busy")
}
