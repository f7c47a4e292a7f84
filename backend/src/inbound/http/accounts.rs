//! Account handlers: registration, login, logout and the profile page.
//!
//! ```text
//! POST /register {"username":"alice","email":"a@x.com","phoneNumber":"555","password":"p1","confirmPassword":"p1"}
//! POST /login {"username":"alice","password":"p1"}
//! POST /logout
//! GET /home
//! ```

use actix_web::{HttpResponse, get, post, route, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{
    CredentialsValidationError, Error, LoginCredentials, Registration, RegistrationForm,
    UserProfile, UserValidationError, Username,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::{LOGIN_REDIRECT, SessionContext};
use crate::inbound::http::state::HttpState;

/// Registration body for `POST /register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub confirm_password: String,
}

/// Login body for `POST /login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body returned after a successful login.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginResponse {
    pub username: Username,
}

/// Body returned after logout.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LogoutResponse {
    /// Where the client should go next.
    pub redirect: String,
}

fn validation_code(err: &CredentialsValidationError) -> &'static str {
    match err {
        CredentialsValidationError::Field(field) => match field {
            UserValidationError::EmptyUsername => "empty_username",
            UserValidationError::UsernameTooLong { .. } => "username_too_long",
            UserValidationError::EmptyEmail => "empty_email",
            UserValidationError::InvalidEmail => "invalid_email",
            UserValidationError::EmptyPhoneNumber => "empty_phone_number",
            UserValidationError::InvalidPhoneNumber => "invalid_phone_number",
        },
        CredentialsValidationError::EmptyPassword => "empty_password",
        CredentialsValidationError::PasswordMismatch => "password_mismatch",
    }
}

fn map_validation_error(err: &CredentialsValidationError) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": err.field(), "code": validation_code(err) }))
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserProfile),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Username or email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    let registration = Registration::try_from_form(RegistrationForm {
        username: &request.username,
        email: &request.email,
        phone_number: &request.phone_number,
        password: &request.password,
        confirm_password: &request.confirm_password,
    })
    .map_err(|err| map_validation_error(&err))?;
    let profile = state.registration.register(&registration).await?;
    Ok(HttpResponse::Created().json(profile))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let request = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&request.username, &request.password)
        .map_err(|err| map_validation_error(&err))?;
    let username = state.login.authenticate(&credentials).await?;
    session.persist_username(&username)?;
    info!(username = %username, "session established");
    Ok(web::Json(LoginResponse { username }))
}

/// End the session. Succeeds whether or not one exists.
#[utoipa::path(
    method(get, post),
    path = "/logout",
    responses(
        (status = 200, description = "Session cleared", body = LogoutResponse)
    ),
    tags = ["accounts"],
    operation_id = "logout",
    security([])
)]
#[route("/logout", method = "GET", method = "POST")]
pub async fn logout(session: SessionContext) -> web::Json<LogoutResponse> {
    session.purge();
    web::Json(LogoutResponse {
        redirect: LOGIN_REDIRECT.to_owned(),
    })
}

/// Profile of the signed-in user.
#[utoipa::path(
    get,
    path = "/home",
    responses(
        (status = 200, description = "Profile", body = UserProfile),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Account no longer exists", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "home"
)]
#[get("/home")]
pub async fn home(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserProfile>> {
    let username = session.require_username()?;
    let profile = state.profile.fetch_profile(&username).await?;
    Ok(web::Json(profile))
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
