use crate::client::developer::ResumeError;
use crate::client::guard::EntityKey;
use crate::workflows::applications::ApplicationStatus;
use crate::workflows::interviews::SlotError;

/// Failure of a portal call, whether rejected locally or by the server.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("Network error. Please check your connection.")]
    Network(#[source] reqwest::Error),
    /// A success status whose body is not the JSON envelope. Reported like a network
    /// failure; the parse error stays available as the source.
    #[error("Network error. Please check your connection.")]
    Decode(#[from] serde_json::Error),
    #[error("failed to build http client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("a request for {0} is already in flight")]
    Busy(EntityKey),
    #[error(transparent)]
    Slot(#[from] SlotError),
    #[error(transparent)]
    Resume(#[from] ResumeError),
    #[error("Cannot change application status from {from} to {to}.")]
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
    #[error("Application is {status} and can no longer be withdrawn.")]
    NotWithdrawable { status: ApplicationStatus },
}

/// Coarse classification used by drivers to pick a user-facing reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    Invalid,
    Network,
    Server,
    Other,
}

impl ClientError {
    /// HTTP status equivalent; 0 when the server was unreachable or answered with
    /// something other than the JSON envelope.
    pub fn status(&self) -> u16 {
        match self {
            ClientError::Api { status, .. } => *status,
            ClientError::Network(_) | ClientError::Build(_) | ClientError::Decode(_) => 0,
            ClientError::Busy(_) => 409,
            ClientError::Slot(_) | ClientError::Resume(_) => 400,
            ClientError::InvalidTransition { .. } | ClientError::NotWithdrawable { .. } => 422,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self.status() {
            0 => ErrorKind::Network,
            400 | 422 => ErrorKind::Invalid,
            401 => ErrorKind::Unauthorized,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::NotFound,
            409 => ErrorKind::Conflict,
            500..=599 => ErrorKind::Server,
            _ => ErrorKind::Other,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}
