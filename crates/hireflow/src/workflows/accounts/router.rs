use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use serde_json::json;

use super::directory::{AccountDirectory, AccountError};
use super::domain::{Actor, LoginRequest, ProfileUpdate, SignupRequest, User};
use super::middleware::bearer_token;
use crate::workflows::envelope::{respond, ApiFailure};
use crate::workflows::extract::ApiJson;

/// Router builder for authentication and the developer profile.
pub fn account_router(accounts: Arc<AccountDirectory>) -> Router {
    Router::new()
        .route("/api/auth/signup", post(signup_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/logout", post(logout_handler))
        .route("/api/auth/me", get(me_handler))
        .route(
            "/api/developer/profile",
            get(profile_handler).patch(update_profile_handler),
        )
        .with_state(accounts)
}

impl From<AccountError> for ApiFailure {
    fn from(error: AccountError) -> Self {
        ApiFailure::new(error.status_code(), error.to_string())
    }
}

pub(crate) async fn signup_handler(
    State(accounts): State<Arc<AccountDirectory>>,
    ApiJson(request): ApiJson<SignupRequest>,
) -> Result<Response, ApiFailure> {
    let payload = accounts.signup(request)?;
    Ok(respond(StatusCode::CREATED, payload))
}

pub(crate) async fn login_handler(
    State(accounts): State<Arc<AccountDirectory>>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Response, ApiFailure> {
    let payload = accounts.login(request)?;
    Ok(respond(StatusCode::OK, payload))
}

pub(crate) async fn logout_handler(
    State(accounts): State<Arc<AccountDirectory>>,
    headers: HeaderMap,
) -> Result<Response, ApiFailure> {
    let revoked = match bearer_token(&headers) {
        Some(token) => accounts.logout(token)?,
        None => false,
    };
    Ok(respond(StatusCode::OK, json!({ "revoked": revoked })))
}

pub(crate) async fn me_handler(user: User) -> Response {
    respond(StatusCode::OK, user)
}

pub(crate) async fn profile_handler(
    State(accounts): State<Arc<AccountDirectory>>,
    actor: Actor,
) -> Result<Response, ApiFailure> {
    Ok(respond(StatusCode::OK, accounts.profile(&actor)?))
}

pub(crate) async fn update_profile_handler(
    State(accounts): State<Arc<AccountDirectory>>,
    actor: Actor,
    ApiJson(update): ApiJson<ProfileUpdate>,
) -> Result<Response, ApiFailure> {
    Ok(respond(StatusCode::OK, accounts.update_profile(&actor, update)?))
}
