//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`], [`PlacementModel`],
//! [`LedgerAnchor`]) are implemented by outbound adapters. Driving ports
//! ([`LoginService`], [`RegistrationService`], [`UserProfileQuery`],
//! [`PredictionCommand`], [`PredictionHistoryQuery`]) are implemented by
//! domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod ledger_anchor;
mod login_service;
mod password_hasher;
mod placement_model;
mod prediction_command;
mod prediction_history_query;
mod prediction_history_repository;
mod registration_service;
mod user_profile_query;
mod user_repository;

#[cfg(test)]
pub use ledger_anchor::MockLedgerAnchor;
pub use ledger_anchor::{FixtureLedgerAnchor, LedgerAnchor, LedgerAnchorError};
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use placement_model::MockPlacementModel;
pub use placement_model::{
    FixturePlacementModel, ModelSummary, PlacementModel, PlacementModelError,
};
#[cfg(test)]
pub use prediction_command::MockPredictionCommand;
pub use prediction_command::{CategoryOptions, PredictionCommand, PredictionFormSchema};
#[cfg(test)]
pub use prediction_history_query::MockPredictionHistoryQuery;
pub use prediction_history_query::{FixturePredictionHistoryQuery, PredictionHistoryQuery};
#[cfg(test)]
pub use prediction_history_repository::MockPredictionHistoryRepository;
pub use prediction_history_repository::{PredictionHistoryError, PredictionHistoryRepository};
#[cfg(test)]
pub use registration_service::MockRegistrationService;
pub use registration_service::RegistrationService;
#[cfg(test)]
pub use user_profile_query::MockUserProfileQuery;
pub use user_profile_query::UserProfileQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{AccountConflict, UserPersistenceError, UserRepository};
