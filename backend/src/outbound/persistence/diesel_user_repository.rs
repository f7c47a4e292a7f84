//! SQLite-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AccountConflict, UserPersistenceError, UserRepository};
use crate::domain::{
    Email, NewUserAccount, PasswordHash, PhoneNumber, UserAccount, UserValidationError, Username,
};

use super::connection::SqliteConnector;
use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_connection_error, unique_violation_column,
};
use super::models::{NewUserRow, UserRow};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Debug, Clone)]
pub struct DieselUserRepository {
    connector: SqliteConnector,
}

impl DieselUserRepository {
    /// Create a new repository over the given database.
    pub fn new(connector: SqliteConnector) -> Self {
        Self { connector }
    }
}

fn map_diesel_error(error: &diesel::result::Error) -> UserPersistenceError {
    if let Some(column) = unique_violation_column(error) {
        return UserPersistenceError::duplicate(column);
    }
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn row_to_account(row: UserRow) -> Result<UserAccount, UserPersistenceError> {
    let id = row.id;
    let invalid = |err: UserValidationError| {
        UserPersistenceError::query(format!("stored user {id} is invalid: {err}"))
    };
    Ok(UserAccount {
        id,
        username: Username::new(&row.username).map_err(invalid)?,
        email: Email::new(&row.email).map_err(invalid)?,
        phone_number: PhoneNumber::new(&row.phone_number).map_err(invalid)?,
        password_hash: PasswordHash::from_encoded(row.password_hash),
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self
            .connector
            .connect()
            .await
            .map_err(|err| map_connection_error(err, UserPersistenceError::connection))?;

        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err))?;

        row.map(row_to_account).transpose()
    }

    async fn find_conflict(
        &self,
        username: &Username,
        email: &Email,
    ) -> Result<Option<AccountConflict>, UserPersistenceError> {
        let mut conn = self
            .connector
            .connect()
            .await
            .map_err(|err| map_connection_error(err, UserPersistenceError::connection))?;

        let taken: Vec<(String, String)> = users::table
            .filter(
                users::username
                    .eq(username.as_ref())
                    .or(users::email.eq(email.as_ref())),
            )
            .select((users::username, users::email))
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err))?;

        if taken.iter().any(|(name, _)| name == username.as_ref()) {
            return Ok(Some(AccountConflict::Username));
        }
        Ok((!taken.is_empty()).then_some(AccountConflict::Email))
    }

    async fn insert(&self, account: &NewUserAccount) -> Result<UserAccount, UserPersistenceError> {
        let mut conn = self
            .connector
            .connect()
            .await
            .map_err(|err| map_connection_error(err, UserPersistenceError::connection))?;

        let row = NewUserRow {
            username: account.username.as_ref(),
            email: account.email.as_ref(),
            phone_number: account.phone_number.as_ref(),
            password_hash: account.password_hash.as_str(),
        };
        let stored: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err))?;

        row_to_account(stored)
    }
}
