use super::domain::{Interview, InterviewId, InterviewStatus};
use crate::workflows::applications::ApplicationId;
use crate::workflows::repository::RepositoryError;

/// Storage abstraction for interviews. Rows are never deleted.
pub trait InterviewRepository: Send + Sync {
    /// Fails with [`RepositoryError::Conflict`] while the application already has an
    /// interview that is not cancelled.
    fn insert(&self, interview: Interview) -> Result<Interview, RepositoryError>;
    /// Fails with [`RepositoryError::Stale`] when the stored status is not `expected`.
    fn update(&self, interview: Interview, expected: InterviewStatus)
        -> Result<(), RepositoryError>;
    fn fetch(&self, id: InterviewId) -> Result<Option<Interview>, RepositoryError>;
    fn for_application(
        &self,
        application_id: ApplicationId,
    ) -> Result<Vec<Interview>, RepositoryError>;
    fn list(&self) -> Result<Vec<Interview>, RepositoryError>;
}
