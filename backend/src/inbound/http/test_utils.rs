//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{HttpResponse, test, web};

use crate::domain::Username;
use crate::domain::ports::{
    MockLoginService, MockPredictionCommand, MockPredictionHistoryQuery, MockRegistrationService,
    MockUserProfileQuery, ModelSummary,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::pages::PipelineSummary;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::{HttpState, HttpStateInfo, HttpStatePorts};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Session cookie set on `response`, if any.
pub fn session_cookie(response: &ServiceResponse) -> Option<Cookie<'static>> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

/// Route prefix of [`sign_in_as`]; append the username.
pub const TEST_SIGN_IN_PATH: &str = "/test-sign-in";

/// Test-only route that opens a session for the username in the path.
///
/// Mount with `web::resource("/test-sign-in/{username}").to(sign_in_as)`.
pub async fn sign_in_as(
    session: SessionContext,
    username: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let username = Username::new(username.into_inner())
        .map_err(|err| crate::domain::Error::invalid_request(err.to_string()))?;
    session.persist_username(&username)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Open a session for `username` through [`sign_in_as`] and return its cookie.
///
/// The app must mount [`sign_in_as`] under [`TEST_SIGN_IN_PATH`].
pub async fn signed_in_cookie<S>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::get()
            .uri(&format!("{TEST_SIGN_IN_PATH}/{username}"))
            .to_request(),
    )
    .await;
    session_cookie(&res).expect("sign-in sets a session cookie")
}

/// Model description used by handler tests.
pub fn fixture_model_summary() -> ModelSummary {
    ModelSummary {
        kind: "fixture".to_owned(),
        tree_count: 0,
        base_score: 0.5,
        feature_columns: vec!["Age".to_owned(), "Branch_CS".to_owned()],
    }
}

/// Mocked driving ports; set expectations, then call [`MockPorts::into_state`].
#[derive(Default)]
pub struct MockPorts {
    pub login: MockLoginService,
    pub registration: MockRegistrationService,
    pub profile: MockUserProfileQuery,
    pub predictions: MockPredictionCommand,
    pub history: MockPredictionHistoryQuery,
}

impl MockPorts {
    /// Wrap the mocks in handler state.
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(
            HttpStatePorts {
                login: Arc::new(self.login),
                registration: Arc::new(self.registration),
                profile: Arc::new(self.profile),
                predictions: Arc::new(self.predictions),
                history: Arc::new(self.history),
            },
            HttpStateInfo {
                model: fixture_model_summary(),
                pipeline: PipelineSummary::fixture(),
            },
        ))
    }
}
