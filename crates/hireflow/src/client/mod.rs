//! Typed REST client for the developer and recruiter portals.
//!
//! Each submodule adds the operations of one portal area to [`JobBoardClient`]. Local
//! checks (transition policy, withdrawability, interview slot validation, resume
//! limits) run before any request leaves the process, and mutating calls take a
//! per-entity permit from the shared [`RequestGuard`].

pub mod ai;
pub mod applications;
pub mod auth;
pub mod dashboard;
pub mod developer;
pub mod error;
pub mod guard;
pub mod http;
pub mod interviews;
pub mod jobs;
pub mod session;

pub use ai::{
    dispatch, evaluate_answer, run_cancellable, CoverLetter, Generation, InterviewQuestion,
    JobDescription, QuestionSet, UserDetails,
};
pub use developer::{format_file_size, validate_resume, ResumeDetails, ResumeError};
pub use error::{ClientError, ErrorKind};
pub use guard::{EntityKey, RequestGuard, RequestPermit};
pub use http::ApiClient;
pub use session::Session;

use crate::config::ClientConfig;
use crate::workflows::applications::TransitionPolicy;

/// Portal client: transport, in-flight guard, and the transition policy mirrored from
/// the server.
#[derive(Debug, Clone)]
pub struct JobBoardClient {
    api: ApiClient,
    guard: RequestGuard,
    policy: TransitionPolicy,
}

impl JobBoardClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        Ok(Self {
            api: ApiClient::new(config)?,
            guard: RequestGuard::new(),
            policy: TransitionPolicy::default(),
        })
    }

    pub fn with_policy(mut self, policy: TransitionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn guard(&self) -> &RequestGuard {
        &self.guard
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }
}
