//! Domain primitives, services and ports.
//!
//! Purpose: define strongly typed entities shared by the HTTP and persistence
//! adapters, the services that implement the driving ports, and the ports
//! themselves. Types are immutable once validated; serde contracts are
//! documented on each type.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: API error payload and stable identifiers.
//! - Accounts: [`Username`], [`Email`], [`PhoneNumber`], [`UserProfile`],
//!   [`LoginCredentials`], [`Registration`].
//! - Predictions: [`RawForm`], [`FeaturePreparer`], [`PlacementOutcome`],
//!   [`DataHash`], [`PredictionRecord`], [`LabelSummary`].
//! - Services: [`AccountService`], [`PredictionService`], [`HistoryService`].

pub mod account_service;
pub mod auth;
pub mod data_hash;
pub mod error;
pub mod features;
pub mod history;
pub mod history_service;
pub mod ledger;
pub mod ports;
pub mod prediction;
pub mod prediction_service;
pub mod trace_id;
pub mod user;

pub use self::account_service::{AccountService, INVALID_CREDENTIALS};
pub use self::auth::{CredentialsValidationError, LoginCredentials, Registration, RegistrationForm};
pub use self::data_hash::{DataHash, InvalidDataHash, canonical_form_json};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::features::{
    FORM_FIELDS, FeaturePreparer, FeatureVector, NUMERIC_FIELDS, ONE_HOT_FIELDS, RawForm,
    TrainedColumns, TrainedColumnsError,
};
pub use self::history::{
    HashVerification, LabelCount, LabelSummary, NewPredictionRecord, PredictionRecord,
};
pub use self::history_service::HistoryService;
pub use self::ledger::{AccountAddress, AnchorRequest, LedgerIdError, TransactionId};
pub use self::prediction::{
    Confidence, ConfidenceError, DECISION_THRESHOLD, PlacementLabel, PlacementOutcome,
    PredictionReceipt, UnknownPlacementLabel,
};
pub use self::prediction_service::PredictionService;
pub use self::trace_id::TraceId;
pub use self::user::{
    Email, NewUserAccount, PasswordHash, PhoneNumber, USERNAME_MAX, UserAccount, UserProfile,
    UserValidationError, Username,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use placement_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::unauthorized("login required"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
