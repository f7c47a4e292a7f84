//! Account domain service: registration, login and profile reads.
//!
//! One service implements all three account driving ports so they share the
//! repository and hasher, and so credential failures are reported the same
//! way regardless of which check failed.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    LoginService, PasswordHasher, PasswordHasherError, RegistrationService,
    UserPersistenceError, UserProfileQuery, UserRepository,
};
use crate::domain::{
    Error, LoginCredentials, NewUserAccount, Registration, UserProfile, Username,
};

/// Message used for every failed login, so callers cannot probe for
/// registered usernames.
pub const INVALID_CREDENTIALS: &str = "invalid username or password";

/// Account service implementing the account driving ports.
#[derive(Clone)]
pub struct AccountService<R: ?Sized, H: ?Sized> {
    users: Arc<R>,
    hasher: Arc<H>,
}

impl<R: ?Sized, H: ?Sized> AccountService<R, H> {
    /// Create a service over a user repository and password hasher.
    pub fn new(users: Arc<R>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::Duplicate { field } => conflict_error(&field),
    }
}

fn map_hasher_error(error: &PasswordHasherError) -> Error {
    Error::internal(error.to_string())
}

fn conflict_error(field: &str) -> Error {
    Error::conflict(format!("an account with this {field} already exists"))
        .with_details(json!({ "field": field, "code": "duplicate_account" }))
}

#[async_trait]
impl<R, H> RegistrationService for AccountService<R, H>
where
    R: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized,
{
    async fn register(&self, registration: &Registration) -> Result<UserProfile, Error> {
        if let Some(conflict) = self
            .users
            .find_conflict(registration.username(), registration.email())
            .await
            .map_err(map_user_error)?
        {
            warn!(
                username = %registration.username(),
                field = conflict.field(),
                "registration rejected: duplicate account"
            );
            return Err(conflict_error(conflict.field()));
        }

        let password_hash = self
            .hasher
            .hash(registration.password())
            .map_err(|err| map_hasher_error(&err))?;
        let account = NewUserAccount {
            username: registration.username().clone(),
            email: registration.email().clone(),
            phone_number: registration.phone_number().clone(),
            password_hash,
        };
        let stored = self
            .users
            .insert(&account)
            .await
            .map_err(map_user_error)?;
        info!(username = %stored.username, user_id = stored.id, "account registered");
        Ok(stored.into())
    }
}

#[async_trait]
impl<R, H> LoginService for AccountService<R, H>
where
    R: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Username, Error> {
        let Some(account) = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(map_user_error)?
        else {
            info!(username = %credentials.username(), "login failed: unknown user");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let verified = self
            .hasher
            .verify(credentials.password(), &account.password_hash)
            .map_err(|err| map_hasher_error(&err))?;
        if !verified {
            info!(username = %account.username, "login failed: password mismatch");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        info!(username = %account.username, "login succeeded");
        Ok(account.username)
    }
}

#[async_trait]
impl<R, H> UserProfileQuery for AccountService<R, H>
where
    R: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized,
{
    async fn fetch_profile(&self, username: &Username) -> Result<UserProfile, Error> {
        self.users
            .find_by_username(username)
            .await
            .map_err(map_user_error)?
            .map(UserProfile::from)
            .ok_or_else(|| Error::not_found(format!("user {username} not found")))
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
