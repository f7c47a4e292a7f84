//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use placement_backend::domain::ports::{LedgerAnchor, PlacementModel};
use placement_backend::inbound::http::pages::PipelineSummary;
use placement_backend::inbound::http::session_config::SessionSettings;
use placement_backend::outbound::persistence::SqliteConnector;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) connector: SqliteConnector,
    pub(crate) model: Arc<dyn PlacementModel>,
    pub(crate) ledger: Arc<dyn LedgerAnchor>,
    pub(crate) pipeline: PipelineSummary,
}

impl ServerConfig {
    /// Configuration serving `model` and anchoring through `ledger`, which
    /// `pipeline` describes on `/proposed`.
    #[must_use]
    pub fn new(
        session: SessionSettings,
        bind_addr: SocketAddr,
        connector: SqliteConnector,
        model: Arc<dyn PlacementModel>,
        ledger: Arc<dyn LedgerAnchor>,
        pipeline: PipelineSummary,
    ) -> Self {
        Self {
            session,
            bind_addr,
            connector,
            model,
            ledger,
            pipeline,
        }
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
