//! Driven port for the credential store.

use async_trait::async_trait;

use crate::domain::{Email, NewUserAccount, UserAccount, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A uniqueness constraint rejected the insert.
        Duplicate { field: String } => "an account with this {field} already exists",
    }
}

/// Which unique account field is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountConflict {
    /// Username belongs to another account.
    Username,
    /// Email belongs to another account.
    Email,
}

impl AccountConflict {
    /// Form field name the conflict refers to.
    pub fn field(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
        }
    }
}

/// Port for reading and creating user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch the account with the given username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, UserPersistenceError>;

    /// Report whether the username or email is already in use. Username
    /// clashes take precedence when both are taken.
    async fn find_conflict(
        &self,
        username: &Username,
        email: &Email,
    ) -> Result<Option<AccountConflict>, UserPersistenceError>;

    /// Insert a new account. Unique violations surface as
    /// [`UserPersistenceError::Duplicate`].
    async fn insert(&self, account: &NewUserAccount) -> Result<UserAccount, UserPersistenceError>;
}
