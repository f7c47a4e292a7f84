//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    LoginService, ModelSummary, PredictionCommand, PredictionHistoryQuery, RegistrationService,
    UserProfileQuery,
};
use crate::inbound::http::pages::PipelineSummary;

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationService>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub predictions: Arc<dyn PredictionCommand>,
    pub history: Arc<dyn PredictionHistoryQuery>,
}

/// Static descriptions served by the informational pages.
#[derive(Clone)]
pub struct HttpStateInfo {
    pub model: ModelSummary,
    pub pipeline: PipelineSummary,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationService>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub predictions: Arc<dyn PredictionCommand>,
    pub history: Arc<dyn PredictionHistoryQuery>,
    pub model: ModelSummary,
    pub pipeline: PipelineSummary,
}

impl HttpState {
    /// Construct state from the port bundle and the static page content.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use placement_backend::domain::ports::{
    ///     FixtureLedgerAnchor, FixturePlacementModel, PlacementModel,
    /// };
    /// use placement_backend::domain::{
    ///     AccountService, HistoryService, PredictionService, TrainedColumns,
    /// };
    /// use placement_backend::inbound::http::pages::PipelineSummary;
    /// use placement_backend::inbound::http::state::{HttpState, HttpStateInfo, HttpStatePorts};
    /// use placement_backend::outbound::password::Argon2PasswordHasher;
    /// use placement_backend::outbound::persistence::{
    ///     DieselPredictionHistoryRepository, DieselUserRepository, SqliteConnector,
    /// };
    ///
    /// let connector = SqliteConnector::new("placement.db");
    /// let users = Arc::new(DieselUserRepository::new(connector.clone()));
    /// let history = Arc::new(DieselPredictionHistoryRepository::new(connector));
    /// let accounts = Arc::new(AccountService::new(users, Arc::new(Argon2PasswordHasher::default())));
    /// let columns = TrainedColumns::new(vec!["Age".to_owned()]).expect("columns");
    /// let model = Arc::new(FixturePlacementModel::new(columns, 0.8));
    /// let summary = model.summary();
    /// let predictions = Arc::new(PredictionService::new(
    ///     model,
    ///     Arc::new(FixtureLedgerAnchor),
    ///     history.clone(),
    ///     Arc::new(mockable::DefaultClock),
    /// ));
    ///
    /// let state = HttpState::new(
    ///     HttpStatePorts {
    ///         login: accounts.clone(),
    ///         registration: accounts.clone(),
    ///         profile: accounts,
    ///         predictions,
    ///         history: Arc::new(HistoryService::new(history)),
    ///     },
    ///     HttpStateInfo {
    ///         model: summary,
    ///         pipeline: PipelineSummary::fixture(),
    ///     },
    /// );
    /// let _login = state.login.clone();
    /// ```
    pub fn new(ports: HttpStatePorts, info: HttpStateInfo) -> Self {
        let HttpStatePorts {
            login,
            registration,
            profile,
            predictions,
            history,
        } = ports;
        let HttpStateInfo { model, pipeline } = info;
        Self {
            login,
            registration,
            profile,
            predictions,
            history,
            model,
            pipeline,
        }
    }
}
