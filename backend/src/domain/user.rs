//! User account model.
//!
//! Accounts are created at registration and only read afterwards. Usernames
//! and emails are unique across the credential store.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Validation errors returned by the account field constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Username was blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Username exceeded the stored column width.
    #[error("username must be at most {max} characters")]
    UsernameTooLong { max: usize },
    /// Email was blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email did not look like `local@domain`.
    #[error("email must be a valid address")]
    InvalidEmail,
    /// Phone number was blank once trimmed.
    #[error("phone number must not be empty")]
    EmptyPhoneNumber,
    /// Phone number contained characters other than digits and separators.
    #[error("phone number may only contain digits, spaces, '+', '-', '(' or ')'")]
    InvalidPhoneNumber,
}

/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 64;

/// Unique login name; also the session subject and history owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "alice")]
pub struct Username(String);

impl Username {
    /// Trim and validate a username.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if trimmed.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Contact email, unique per account. Stored as entered after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "alice@example.com")]
pub struct Email(String);

impl Email {
    /// Trim and validate an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !email_regex().is_match(trimmed) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Contact phone number. Free-form apart from the allowed character set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "+44 20 7946 0000")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Trim and validate a phone number.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyPhoneNumber);
        }
        let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')');
        if !trimmed.chars().all(allowed) {
            return Err(UserValidationError::InvalidPhoneNumber);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Encoded password hash (PHC string). Never the plaintext.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash produced by a [`crate::domain::ports::PasswordHasher`].
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded PHC string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Account fields supplied at registration, with the password already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserAccount {
    pub username: Username,
    pub email: Email,
    pub phone_number: PhoneNumber,
    pub password_hash: PasswordHash,
}

/// Stored user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub id: i32,
    pub username: Username,
    pub email: Email,
    pub phone_number: PhoneNumber,
    pub password_hash: PasswordHash,
}

/// Public profile view of an account shown on the home page.
///
/// # Examples
/// ```
/// use placement_backend::domain::{Email, PhoneNumber, UserProfile, Username};
///
/// let profile = UserProfile {
///     username: Username::new("alice").unwrap(),
///     email: Email::new("a@x.com").unwrap(),
///     phone_number: PhoneNumber::new("555-0100").unwrap(),
/// };
/// let json = serde_json::to_value(&profile).unwrap();
/// assert_eq!(json["phoneNumber"], "555-0100");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: Username,
    pub email: Email,
    pub phone_number: PhoneNumber,
}

impl From<UserAccount> for UserProfile {
    fn from(account: UserAccount) -> Self {
        Self {
            username: account.username,
            email: account.email,
            phone_number: account.phone_number,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for account field validation.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyUsername)]
    #[case("   ", UserValidationError::EmptyUsername)]
    fn blank_usernames_are_rejected(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(Username::new(raw).expect_err("blank username"), expected);
    }

    #[rstest]
    fn usernames_are_trimmed() {
        let username = Username::new("  alice ").expect("valid username");
        assert_eq!(username.as_ref(), "alice");
    }

    #[rstest]
    fn overlong_usernames_are_rejected() {
        let raw = "a".repeat(USERNAME_MAX + 1);
        assert_eq!(
            Username::new(raw).expect_err("too long"),
            UserValidationError::UsernameTooLong { max: USERNAME_MAX }
        );
    }

    #[rstest]
    #[case("a@x.com", true)]
    #[case(" bob@example.org ", true)]
    #[case("no-at-sign", false)]
    #[case("a@b", false)]
    #[case("two@@x.com", false)]
    fn email_shape_is_checked(#[case] raw: &str, #[case] valid: bool) {
        assert_eq!(Email::new(raw).is_ok(), valid);
    }

    #[rstest]
    #[case("+1 (555) 010-0000", true)]
    #[case("07700900123", true)]
    #[case("call me", false)]
    #[case("", false)]
    fn phone_numbers_allow_digits_and_separators(#[case] raw: &str, #[case] valid: bool) {
        assert_eq!(PhoneNumber::new(raw).is_ok(), valid);
    }

    #[rstest]
    fn password_hash_debug_is_redacted() {
        let hash = PasswordHash::from_encoded("$argon2id$v=19$secret");
        assert_eq!(format!("{hash:?}"), "PasswordHash(..)");
    }
}
