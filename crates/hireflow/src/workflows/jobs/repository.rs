use super::domain::{Job, JobId};
use crate::workflows::repository::RepositoryError;

/// Storage abstraction for postings so ownership checks can run without a database.
pub trait JobRepository: Send + Sync {
    fn insert(&self, job: Job) -> Result<Job, RepositoryError>;
    fn update(&self, job: Job) -> Result<(), RepositoryError>;
    fn fetch(&self, id: JobId) -> Result<Option<Job>, RepositoryError>;
    fn list(&self) -> Result<Vec<Job>, RepositoryError>;
    fn delete(&self, id: JobId) -> Result<Job, RepositoryError>;
}
