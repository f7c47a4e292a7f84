//! Driving port for user profile queries.

use async_trait::async_trait;

use crate::domain::{Error, UserProfile, Username};

/// Domain use-case port for reading the signed-in user's profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileQuery: Send + Sync {
    /// Return the profile for `username`; `NotFound` if the account is gone.
    async fn fetch_profile(&self, username: &Username) -> Result<UserProfile, Error>;
}
