//! Builders for the startup artifacts and the HTTP state ports.

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use mockable::DefaultClock;
use tracing::{info, warn};

use placement_backend::domain::ports::{FixtureLedgerAnchor, LedgerAnchor, PlacementModel};
use placement_backend::domain::{AccountService, HistoryService, PredictionService};
use placement_backend::inbound::http::pages::PipelineSummary;
use placement_backend::inbound::http::state::{HttpState, HttpStateInfo, HttpStatePorts};
use placement_backend::outbound::ledger::{
    AnchorSettings, ContractInfo, JsonRpcClient, JsonRpcLedgerAnchor, STORE_RECORD_FUNCTION,
};
use placement_backend::outbound::model::TreeEnsembleModel;
use placement_backend::outbound::password::Argon2PasswordHasher;
use placement_backend::outbound::persistence::{
    DieselPredictionHistoryRepository, DieselUserRepository, SqliteConnector,
};
use placement_backend::settings::{LedgerMode, PlacementSettings};

use super::ServerConfig;

/// Per-request timeout for JSON-RPC calls; receipt waits are bounded separately.
const RPC_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Open the database and apply pending migrations.
pub(crate) fn prepare_database(database_url: &str) -> io::Result<SqliteConnector> {
    let connector = SqliteConnector::new(database_url);
    let applied = connector.run_migrations().map_err(io::Error::other)?;
    info!(database = database_url, applied = applied.len(), "database migrations applied");
    Ok(connector)
}

/// Load and validate the model artifact.
pub(crate) fn load_model(path: &Path) -> io::Result<Arc<dyn PlacementModel>> {
    let model = TreeEnsembleModel::load(path).map_err(io::Error::other)?;
    let summary = model.summary();
    info!(
        path = %path.display(),
        trees = summary.tree_count,
        columns = summary.feature_columns.len(),
        "placement model loaded"
    );
    Ok(Arc::new(model))
}

/// Build the ledger anchor from settings. The in-process fixture is used only
/// when `ledger_mode` is `fixture`.
pub(crate) fn build_ledger(
    settings: &PlacementSettings,
) -> io::Result<(Arc<dyn LedgerAnchor>, PipelineSummary)> {
    if settings.ledger_mode().map_err(io::Error::other)? == LedgerMode::Fixture {
        warn!("ledger mode is fixture; predictions are not anchored on any chain");
        return Ok((Arc::new(FixtureLedgerAnchor), PipelineSummary::fixture()));
    }
    let connection = settings.ledger_connection().map_err(io::Error::other)?;
    let contract_path = settings.contract_info_path();
    let (function, arity) = STORE_RECORD_FUNCTION;
    let contract = ContractInfo::load(&contract_path, function, arity).map_err(io::Error::other)?;
    let client =
        JsonRpcClient::new(connection.url.clone(), RPC_REQUEST_TIMEOUT).map_err(io::Error::other)?;
    let pipeline = PipelineSummary::json_rpc(
        &connection.url,
        &contract.address,
        connection.poll_interval,
        connection.receipt_timeout,
    );
    info!(
        contract = %contract.address,
        endpoint = pipeline.ledger_endpoint.as_deref().unwrap_or_default(),
        "ledger anchor configured"
    );
    let anchor = JsonRpcLedgerAnchor::new(
        client,
        AnchorSettings {
            contract: contract.address,
            sender: connection.sender,
            poll_interval: connection.poll_interval,
            receipt_timeout: connection.receipt_timeout,
        },
    );
    Ok((Arc::new(anchor), pipeline))
}

/// Wire repositories, adapters and services into the HTTP state.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let users = Arc::new(DieselUserRepository::new(config.connector.clone()));
    let history = Arc::new(DieselPredictionHistoryRepository::new(
        config.connector.clone(),
    ));
    let accounts = Arc::new(AccountService::new(
        users,
        Arc::new(Argon2PasswordHasher::default()),
    ));
    let predictions = Arc::new(PredictionService::new(
        config.model.clone(),
        config.ledger.clone(),
        history.clone(),
        Arc::new(DefaultClock),
    ));

    web::Data::new(HttpState::new(
        HttpStatePorts {
            login: accounts.clone(),
            registration: accounts.clone(),
            profile: accounts,
            predictions,
            history: Arc::new(HistoryService::new(history)),
        },
        HttpStateInfo {
            model: config.model.summary(),
            pipeline: config.pipeline.clone(),
        },
    ))
}
