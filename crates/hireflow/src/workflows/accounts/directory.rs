use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use axum::http::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};
use uuid::Uuid;

use super::domain::{
    Actor, AuthPayload, DeveloperProfile, LoginRequest, ProfileUpdate, SignupRequest, User,
    UserId, UserRole,
};

const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_EXPERIENCE_YEARS: u32 = 60;
const MAX_SKILLS: usize = 50;

/// In-memory account store issuing opaque bearer tokens.
#[derive(Default)]
pub struct AccountDirectory {
    state: Mutex<DirectoryState>,
}

#[derive(Default)]
struct DirectoryState {
    next_id: u64,
    accounts: HashMap<String, AccountEntry>,
    sessions: HashMap<String, UserId>,
    profiles: HashMap<UserId, DeveloperProfile>,
}

struct AccountEntry {
    user: User,
    password: SecretString,
}

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("An account with this email already exists.")]
    EmailTaken,
    #[error("Invalid credentials or role mismatch.")]
    InvalidCredentials,
    #[error("admin accounts cannot be self-registered")]
    AdminSignupDisabled,
    #[error("{0}")]
    InvalidSignup(&'static str),
    #[error("{0}")]
    InvalidProfile(&'static str),
    #[error("You do not have permission to {action}.")]
    Forbidden { action: &'static str },
    #[error("account directory unavailable")]
    Unavailable,
}

impl AccountError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AccountError::EmailTaken => StatusCode::CONFLICT,
            AccountError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AccountError::AdminSignupDisabled => StatusCode::FORBIDDEN,
            AccountError::InvalidSignup(_) | AccountError::InvalidProfile(_) => {
                StatusCode::BAD_REQUEST
            }
            AccountError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AccountError::Unavailable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl AccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Public self-registration for developers and recruiters.
    pub fn signup(&self, request: SignupRequest) -> Result<AuthPayload, AccountError> {
        if request.role == UserRole::Admin {
            return Err(AccountError::AdminSignupDisabled);
        }
        let user = self.register(request)?;
        let access_token = self.issue_token(user.id)?;
        Ok(AuthPayload { user, access_token })
    }

    /// Creates an account of any role without issuing a token.
    pub fn register(&self, request: SignupRequest) -> Result<User, AccountError> {
        let name = request.name.trim();
        let email = request.email.trim().to_ascii_lowercase();
        if name.is_empty() {
            return Err(AccountError::InvalidSignup("name is required"));
        }
        if !email.contains('@') {
            return Err(AccountError::InvalidSignup("a valid email is required"));
        }
        if request.password.len() < MIN_PASSWORD_LENGTH {
            return Err(AccountError::InvalidSignup(
                "password must be at least 8 characters",
            ));
        }

        let mut state = self.lock()?;
        if state.accounts.contains_key(&email) {
            return Err(AccountError::EmailTaken);
        }
        state.next_id += 1;
        let user = User {
            id: UserId(state.next_id),
            name: name.to_string(),
            email: email.clone(),
            role: request.role,
        };
        state.accounts.insert(
            email,
            AccountEntry {
                user: user.clone(),
                password: SecretString::from(request.password),
            },
        );
        info!(user_id = %user.id, role = %user.role, "account registered");
        Ok(user)
    }

    pub fn login(&self, request: LoginRequest) -> Result<AuthPayload, AccountError> {
        let email = request.email.trim().to_ascii_lowercase();
        let user = {
            let state = self.lock()?;
            let entry = state
                .accounts
                .get(&email)
                .ok_or(AccountError::InvalidCredentials)?;
            if entry.password.expose_secret() != request.password
                || entry.user.role != request.role
            {
                debug!(role = %request.role, "login rejected");
                return Err(AccountError::InvalidCredentials);
            }
            entry.user.clone()
        };
        let access_token = self.issue_token(user.id)?;
        Ok(AuthPayload { user, access_token })
    }

    /// Revokes a token. Returns whether it was live.
    pub fn logout(&self, token: &str) -> Result<bool, AccountError> {
        Ok(self.lock()?.sessions.remove(token).is_some())
    }

    pub fn resolve(&self, token: &str) -> Result<Option<User>, AccountError> {
        let state = self.lock()?;
        let Some(user_id) = state.sessions.get(token) else {
            return Ok(None);
        };
        Ok(state
            .accounts
            .values()
            .find(|entry| entry.user.id == *user_id)
            .map(|entry| entry.user.clone()))
    }

    /// The caller's developer profile; empty until first updated.
    pub fn profile(&self, actor: &Actor) -> Result<DeveloperProfile, AccountError> {
        require_developer(actor)?;
        Ok(self
            .lock()?
            .profiles
            .get(&actor.user_id)
            .cloned()
            .unwrap_or_else(|| DeveloperProfile::empty(actor.user_id)))
    }

    pub fn update_profile(
        &self,
        actor: &Actor,
        update: ProfileUpdate,
    ) -> Result<DeveloperProfile, AccountError> {
        require_developer(actor)?;
        if update.experience.is_some_and(|years| years > MAX_EXPERIENCE_YEARS) {
            return Err(AccountError::InvalidProfile(
                "experience must be between 0 and 60 years",
            ));
        }
        let skills = update.skills.map(normalize_skills).transpose()?;
        let linkedin_url = update
            .linkedin_url
            .map(|url| profile_url(url, "linkedinUrl must be an http(s) URL"))
            .transpose()?;
        let github_url = update
            .github_url
            .map(|url| profile_url(url, "githubUrl must be an http(s) URL"))
            .transpose()?;
        let phone = update.phone.map(phone_number).transpose()?;

        let mut state = self.lock()?;
        let profile = state
            .profiles
            .entry(actor.user_id)
            .or_insert_with(|| DeveloperProfile::empty(actor.user_id));
        if let Some(experience) = update.experience {
            profile.experience = Some(experience);
        }
        if let Some(skills) = skills {
            profile.skills = skills;
        }
        if let Some(url) = linkedin_url {
            profile.linkedin_url = url;
        }
        if let Some(url) = github_url {
            profile.github_url = url;
        }
        if let Some(phone) = phone {
            profile.phone = phone;
        }
        let updated = profile.clone();
        info!(user_id = %actor.user_id, "developer profile updated");
        Ok(updated)
    }

    fn issue_token(&self, user_id: UserId) -> Result<String, AccountError> {
        let token = Uuid::new_v4().simple().to_string();
        self.lock()?.sessions.insert(token.clone(), user_id);
        Ok(token)
    }

    fn lock(&self) -> Result<MutexGuard<'_, DirectoryState>, AccountError> {
        self.state.lock().map_err(|_| AccountError::Unavailable)
    }
}

fn require_developer(actor: &Actor) -> Result<(), AccountError> {
    if actor.is(UserRole::Developer) {
        Ok(())
    } else {
        Err(AccountError::Forbidden {
            action: "manage developer profiles",
        })
    }
}

fn normalize_skills(skills: Vec<String>) -> Result<Vec<String>, AccountError> {
    let mut normalized: Vec<String> = Vec::with_capacity(skills.len());
    for skill in skills {
        let skill = skill.trim();
        if !skill.is_empty() && !normalized.iter().any(|seen| seen.eq_ignore_ascii_case(skill)) {
            normalized.push(skill.to_string());
        }
    }
    if normalized.len() > MAX_SKILLS {
        return Err(AccountError::InvalidProfile("at most 50 skills may be listed"));
    }
    Ok(normalized)
}

/// Blank clears the field; anything else must be an http(s) URL.
fn profile_url(url: String, invalid: &'static str) -> Result<Option<String>, AccountError> {
    let url = url.trim();
    if url.is_empty() {
        return Ok(None);
    }
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(Some(url.to_string()))
    } else {
        Err(AccountError::InvalidProfile(invalid))
    }
}

fn phone_number(phone: String) -> Result<Option<String>, AccountError> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Ok(None);
    }
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')' | '.'));
    if allowed && (7..=15).contains(&digits) {
        Ok(Some(phone.to_string()))
    } else {
        Err(AccountError::InvalidProfile("phone must contain 7 to 15 digits"))
    }
}
