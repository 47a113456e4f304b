use serde::Deserialize;
use tracing::info;

use super::error::ClientError;
use super::session::Session;
use super::JobBoardClient;
use crate::workflows::accounts::{AuthPayload, LoginRequest, SignupRequest, User};

#[derive(Debug, Deserialize)]
struct LogoutAck {
    revoked: bool,
}

impl JobBoardClient {
    pub async fn signup(&self, request: &SignupRequest) -> Result<Session, ClientError> {
        let payload: AuthPayload = self.api.post("/api/auth/signup", request, None).await?;
        info!(user_id = %payload.user.id, role = %payload.user.role, "signed up");
        Ok(Session::new(payload.user, payload.access_token))
    }

    /// Fails with 401 when the credentials or the selected portal role do not match.
    pub async fn login(&self, request: &LoginRequest) -> Result<Session, ClientError> {
        let payload: AuthPayload = self.api.post("/api/auth/login", request, None).await?;
        info!(user_id = %payload.user.id, role = %payload.user.role, "logged in");
        Ok(Session::new(payload.user, payload.access_token))
    }

    /// Ends the session. Returns whether the server still knew the token.
    ///
    /// The session is only borrowed, so a failed call leaves it usable for a retry.
    pub async fn logout(&self, session: &Session) -> Result<bool, ClientError> {
        let ack: LogoutAck = self
            .api
            .post("/api/auth/logout", &serde_json::json!({}), Some(session))
            .await?;
        info!(user_id = %session.user().id, revoked = ack.revoked, "logged out");
        Ok(ack.revoked)
    }

    pub async fn me(&self, session: &Session) -> Result<User, ClientError> {
        self.api.get("/api/auth/me", Some(session)).await
    }
}
