//! Cancellable wrappers around the remote AI assist endpoints.
//!
//! A generation is a single outbound call with no retry. When the caller's
//! [`CancellationToken`] fires before the call settles, the result is
//! [`Generation::Cancelled`] and no success or error handling runs.

use std::future::Future;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::error::ClientError;
use super::session::Session;
use super::JobBoardClient;
use crate::workflows::accounts::User;
use crate::workflows::jobs::{Job, JobType};

/// Outcome of a cancellable request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation<T> {
    Completed(T),
    Cancelled,
}

impl<T> Generation<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            Generation::Completed(value) => Some(value),
            Generation::Cancelled => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Generation::Cancelled)
    }
}

/// Races `request` against `token`. Cancellation wins ties, including a request that
/// settles in the same poll the token fires.
pub async fn run_cancellable<F, T>(
    token: &CancellationToken,
    request: F,
) -> Result<Generation<T>, ClientError>
where
    F: Future<Output = Result<T, ClientError>>,
{
    if token.is_cancelled() {
        return Ok(Generation::Cancelled);
    }
    let outcome = tokio::select! {
        biased;
        _ = token.cancelled() => {
            debug!("generation cancelled before the response");
            return Ok(Generation::Cancelled);
        }
        outcome = request => outcome,
    };
    if token.is_cancelled() {
        debug!("generation cancelled after the response; discarding it");
        return Ok(Generation::Cancelled);
    }
    outcome.map(Generation::Completed)
}

/// Callback form of [`run_cancellable`]: at most one of the callbacks runs, and
/// neither runs once `token` is cancelled.
pub async fn dispatch<F, T, S, E>(
    token: &CancellationToken,
    request: F,
    on_success: S,
    on_error: E,
) -> Generation<()>
where
    F: Future<Output = Result<T, ClientError>>,
    S: FnOnce(T),
    E: FnOnce(ClientError),
{
    match run_cancellable(token, request).await {
        Ok(Generation::Completed(value)) => {
            on_success(value);
            Generation::Completed(())
        }
        Ok(Generation::Cancelled) => Generation::Cancelled,
        Err(err) => {
            on_error(err);
            Generation::Completed(())
        }
    }
}

/// Case-insensitive comparison of a chosen option with the expected answer.
pub fn evaluate_answer(user_answer: &str, correct_answer: &str) -> bool {
    user_answer.trim().to_lowercase() == correct_answer.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewQuestion {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSet {
    #[serde(default)]
    pub questions: Vec<InterviewQuestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetter {
    pub cover_letter: String,
}

/// Applicant facts sent to the cover-letter generator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
}

impl From<&User> for UserDetails {
    fn from(user: &User) -> Self {
        let name = user.name.trim();
        Self {
            name: if name.is_empty() { "Applicant" } else { name }.to_string(),
            email: Some(user.email.clone()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDescription {
    pub title: String,
    pub company_name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<JobType>,
}

impl From<&Job> for JobDescription {
    fn from(job: &Job) -> Self {
        Self {
            title: job.title.clone(),
            company_name: job.company_name.clone(),
            description: job.description.clone(),
            required_skills: job.required_skills.clone(),
            location: Some(job.location.clone()).filter(|location| !location.is_empty()),
            job_type: Some(job.job_type),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QuestionRequest<'a> {
    tech_stack: &'a [String],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CoverLetterRequest<'a> {
    user_details: &'a UserDetails,
    job_description: &'a JobDescription,
}

impl JobBoardClient {
    pub async fn generate_questions(
        &self,
        session: &Session,
        tech_stack: &[String],
        token: &CancellationToken,
    ) -> Result<Generation<QuestionSet>, ClientError> {
        let request = QuestionRequest { tech_stack };
        run_cancellable(
            token,
            self.api
                .post("/api/ai/generate-questions", &request, Some(session)),
        )
        .await
    }

    pub async fn generate_cover_letter(
        &self,
        session: &Session,
        user_details: &UserDetails,
        job_description: &JobDescription,
        token: &CancellationToken,
    ) -> Result<Generation<CoverLetter>, ClientError> {
        let request = CoverLetterRequest {
            user_details,
            job_description,
        };
        run_cancellable(
            token,
            self.api
                .post("/api/ai/generate-cover-letter", &request, Some(session)),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn completed_request_reaches_success_callback() {
        let token = CancellationToken::new();
        let successes = AtomicUsize::new(0);
        let outcome = dispatch(
            &token,
            async { Ok::<_, ClientError>("letter") },
            |value| {
                assert_eq!(value, "letter");
                successes.fetch_add(1, Ordering::SeqCst);
            },
            |err| panic!("unexpected error {err}"),
        )
        .await;
        assert_eq!(outcome, Generation::Completed(()));
        assert_eq!(successes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cancelled_request_runs_no_callback() {
        let token = CancellationToken::new();
        let cancel = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            cancel.cancel();
        });

        let outcome = dispatch(
            &token,
            async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, ClientError>(())
            },
            |_| panic!("success must not run"),
            |_| panic!("error must not run"),
        )
        .await;
        assert!(outcome.is_cancelled());
    }

    #[tokio::test]
    async fn already_cancelled_token_skips_the_request() {
        let token = CancellationToken::new();
        token.cancel();
        let polled = AtomicUsize::new(0);
        let outcome = run_cancellable(&token, async {
            polled.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(ClientError::Api {
                status: 500,
                message: "boom".to_string(),
            })
        })
        .await
        .expect("cancellation is not an error");
        assert!(outcome.is_cancelled());
        assert_eq!(polled.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failures_reach_the_error_callback_with_status() {
        let token = CancellationToken::new();
        let mut seen = None;
        dispatch(
            &token,
            async {
                Err::<(), _>(ClientError::Api {
                    status: 503,
                    message: "model offline".to_string(),
                })
            },
            |_| panic!("success must not run"),
            |err| seen = Some(err.status()),
        )
        .await;
        assert_eq!(seen, Some(503));
    }

    #[test]
    fn answers_compare_trimmed_and_case_insensitive() {
        assert!(evaluate_answer("  Ownership ", "ownership"));
        assert!(!evaluate_answer("Borrowing", "Ownership"));
    }

    #[test]
    fn payloads_use_camel_case_and_skip_absent_fields() {
        let details = UserDetails {
            name: "Ada".to_string(),
            linkedin_url: Some("https://linkedin.com/in/ada".to_string()),
            ..UserDetails::default()
        };
        let encoded = serde_json::to_value(&details).expect("serializes");
        assert_eq!(encoded["linkedinUrl"], "https://linkedin.com/in/ada");
        assert!(encoded.get("email").is_none());
        assert!(encoded.get("skills").is_none());
    }
}
