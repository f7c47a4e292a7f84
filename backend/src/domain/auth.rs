//! Login and registration inputs.
//!
//! Handlers convert raw request payloads into these types before calling a
//! driving port, so services only ever see validated credentials.

use zeroize::Zeroizing;

use super::user::{Email, PhoneNumber, UserValidationError, Username};

/// Validation failures for login and registration payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// An account field failed its own validation.
    #[error(transparent)]
    Field(#[from] UserValidationError),
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,
}

impl CredentialsValidationError {
    /// Name of the offending form field, for error details.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Field(
                UserValidationError::EmptyUsername | UserValidationError::UsernameTooLong { .. },
            ) => "username",
            Self::Field(UserValidationError::EmptyEmail | UserValidationError::InvalidEmail) => {
                "email"
            }
            Self::Field(
                UserValidationError::EmptyPhoneNumber | UserValidationError::InvalidPhoneNumber,
            ) => "phoneNumber",
            Self::EmptyPassword => "password",
            Self::PasswordMismatch => "confirmPassword",
        }
    }
}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use placement_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" alice ", "p1").unwrap();
/// assert_eq!(creds.username().as_ref(), "alice");
/// assert_eq!(creds.password(), "p1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: Username,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let username = Username::new(username)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username used for the account lookup.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Plaintext password supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Raw registration form values.
#[derive(Debug, Clone, Copy)]
pub struct RegistrationForm<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub phone_number: &'a str,
    pub password: &'a str,
    pub confirm_password: &'a str,
}

/// Validated registration request; the password is still plaintext here and
/// is hashed by the registration service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    username: Username,
    email: Email,
    phone_number: PhoneNumber,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate a registration form.
    ///
    /// The password/confirmation comparison runs first so a mismatch is
    /// reported even when other fields are also wrong.
    ///
    /// # Examples
    /// ```
    /// use placement_backend::domain::{CredentialsValidationError, Registration, RegistrationForm};
    ///
    /// let err = Registration::try_from_form(RegistrationForm {
    ///     username: "alice",
    ///     email: "a@x.com",
    ///     phone_number: "555",
    ///     password: "p1",
    ///     confirm_password: "p2",
    /// })
    /// .unwrap_err();
    /// assert_eq!(err, CredentialsValidationError::PasswordMismatch);
    /// ```
    pub fn try_from_form(form: RegistrationForm<'_>) -> Result<Self, CredentialsValidationError> {
        if form.password != form.confirm_password {
            return Err(CredentialsValidationError::PasswordMismatch);
        }
        if form.password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            username: Username::new(form.username)?,
            email: Email::new(form.email)?,
            phone_number: PhoneNumber::new(form.phone_number)?,
            password: Zeroizing::new(form.password.to_owned()),
        })
    }

    /// Requested username.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Requested email.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Contact phone number.
    pub fn phone_number(&self) -> &PhoneNumber {
        &self.phone_number
    }

    /// Plaintext password to hash.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
