//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP handler, the request/response schemas and
//! the session cookie security scheme. The document backs Swagger UI in
//! debug builds and is exported by the `openapi-dump` binary.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::{CategoryOptions, ModelSummary, PredictionFormSchema};
use crate::domain::{
    Confidence, Error, ErrorCode, HashVerification, LabelSummary, PlacementLabel,
    PredictionReceipt, PredictionRecord, UserProfile,
};
use crate::inbound::http::accounts::{LoginRequest, LoginResponse, LogoutResponse, RegisterRequest};
use crate::inbound::http::health::ProbeStatus;
use crate::inbound::http::pages::{AnchorMode, EndpointEntry, PipelineSummary, ServiceIndex};
use crate::inbound::http::predict::PredictRequest;
use crate::inbound::http::session_config::SESSION_COOKIE_NAME;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE_NAME,
                "Session cookie issued by POST /login.",
            ))),
        );
    }
}

/// OpenAPI document for the HTTP API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Placement prediction API",
        description = "Accounts, placement predictions anchored on a ledger, and their audit history."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::pages::index,
        crate::inbound::http::pages::datascience,
        crate::inbound::http::pages::proposed,
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::accounts::home,
        crate::inbound::http::predict::prediction_form,
        crate::inbound::http::predict::submit_prediction,
        crate::inbound::http::history::list_history,
        crate::inbound::http::history::verify_record,
        crate::inbound::http::history::analytics,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        UserProfile,
        RegisterRequest,
        LoginRequest,
        LoginResponse,
        LogoutResponse,
        PredictRequest,
        PredictionFormSchema,
        CategoryOptions,
        PredictionReceipt,
        PlacementLabel,
        Confidence,
        PredictionRecord,
        HashVerification,
        LabelSummary,
        ModelSummary,
        PipelineSummary,
        AnchorMode,
        ServiceIndex,
        EndpointEntry,
        ProbeStatus,
    )),
    tags(
        (name = "pages", description = "Public informational pages"),
        (name = "accounts", description = "Registration, login and profile"),
        (name = "predictions", description = "Scoring and ledger anchoring"),
        (name = "history", description = "Audit history and analytics"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
