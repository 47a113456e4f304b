use super::domain::{Application, ApplicationId, ApplicationStatus};
use crate::workflows::accounts::UserId;
use crate::workflows::jobs::JobId;
use crate::workflows::repository::RepositoryError;

/// Storage abstraction so the service module can be exercised in isolation.
///
/// Writes are conditional on the status the caller last observed, so two recruiters
/// racing on the same row cannot both apply a transition.
pub trait ApplicationRepository: Send + Sync {
    /// Fails with [`RepositoryError::Conflict`] when the (job, applicant) pair exists.
    fn insert(&self, application: Application) -> Result<Application, RepositoryError>;
    /// Fails with [`RepositoryError::Stale`] when the stored status is not `expected`.
    fn update(
        &self,
        application: Application,
        expected: ApplicationStatus,
    ) -> Result<(), RepositoryError>;
    fn fetch(&self, id: ApplicationId) -> Result<Option<Application>, RepositoryError>;
    fn find_by_pair(
        &self,
        job_id: JobId,
        applicant_id: UserId,
    ) -> Result<Option<Application>, RepositoryError>;
    fn list_for_job(&self, job_id: JobId) -> Result<Vec<Application>, RepositoryError>;
    fn list_for_applicant(&self, applicant_id: UserId)
        -> Result<Vec<Application>, RepositoryError>;
    /// Removes the row if its status is still `expected`.
    fn delete(
        &self,
        id: ApplicationId,
        expected: ApplicationStatus,
    ) -> Result<Application, RepositoryError>;
}
