//! Backend entry-point: loads settings, prepares the datastore, model and
//! ledger anchor, then serves the HTTP API.

mod server;

use std::io;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use placement_backend::inbound::http::health::HealthState;
use placement_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use placement_backend::settings::PlacementSettings;
use server::{ServerConfig, build_ledger, create_server, load_model, prepare_database};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = PlacementSettings::load().map_err(io::Error::other)?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(io::Error::other)?;
    let connector = prepare_database(settings.database_url())?;
    let model = load_model(&settings.model_path())?;
    let (ledger, pipeline) = build_ledger(&settings)?;

    let config = ServerConfig::new(
        session,
        settings.bind_addr(),
        connector,
        model,
        ledger,
        pipeline,
    );

    let health_state = web::Data::new(HealthState::new());
    let bind_addr = config.bind_addr();
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "placement backend listening");
    server.await
}
