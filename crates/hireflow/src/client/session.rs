use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use crate::workflows::accounts::{Actor, User};

/// An authenticated portal session.
///
/// Returned by signup and login and borrowed by every authenticated call, logout
/// included. The bearer token never appears in `Debug` output.
pub struct Session {
    user: User,
    token: SecretString,
}

impl Session {
    pub fn new(user: User, token: impl Into<String>) -> Self {
        Self {
            user,
            token: SecretString::from(token.into()),
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn actor(&self) -> Actor {
        Actor::from(&self.user)
    }

    pub(crate) fn bearer(&self) -> &str {
        self.token.expose_secret()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("token", &"[REDACTED]")
            .finish()
    }
}
