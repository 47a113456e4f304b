//! Mutex-backed repositories for the service binary, demos, and tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::accounts::UserId;
use super::applications::{Application, ApplicationId, ApplicationRepository, ApplicationStatus};
use super::interviews::{Interview, InterviewId, InterviewRepository, InterviewStatus};
use super::jobs::{Job, JobId, JobRepository};
use super::repository::RepositoryError;

fn lock<'a, K, V>(
    rows: &'a Mutex<BTreeMap<K, V>>,
) -> Result<MutexGuard<'a, BTreeMap<K, V>>, RepositoryError> {
    rows.lock()
        .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
}

#[derive(Default, Clone)]
pub struct InMemoryJobRepository {
    rows: Arc<Mutex<BTreeMap<JobId, Job>>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl JobRepository for InMemoryJobRepository {
    fn insert(&self, job: Job) -> Result<Job, RepositoryError> {
        let mut guard = lock(&self.rows)?;
        if guard.contains_key(&job.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(job.id, job.clone());
        Ok(job)
    }

    fn update(&self, job: Job) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.rows)?;
        match guard.get_mut(&job.id) {
            Some(row) => {
                *row = job;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        Ok(lock(&self.rows)?.get(&id).cloned())
    }

    fn list(&self) -> Result<Vec<Job>, RepositoryError> {
        Ok(lock(&self.rows)?.values().cloned().collect())
    }

    fn delete(&self, id: JobId) -> Result<Job, RepositoryError> {
        lock(&self.rows)?.remove(&id).ok_or(RepositoryError::NotFound)
    }
}

#[derive(Default, Clone)]
pub struct InMemoryApplicationRepository {
    rows: Arc<Mutex<BTreeMap<ApplicationId, Application>>>,
}

impl InMemoryApplicationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut guard = lock(&self.rows)?;
        let duplicate = guard.contains_key(&application.id)
            || guard.values().any(|row| {
                row.job_id == application.job_id && row.applicant_id == application.applicant_id
            });
        if duplicate {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.id, application.clone());
        Ok(application)
    }

    fn update(
        &self,
        application: Application,
        expected: ApplicationStatus,
    ) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.rows)?;
        let row = guard
            .get_mut(&application.id)
            .ok_or(RepositoryError::NotFound)?;
        if row.status != expected {
            return Err(RepositoryError::Stale);
        }
        *row = application;
        Ok(())
    }

    fn fetch(&self, id: ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Ok(lock(&self.rows)?.get(&id).cloned())
    }

    fn find_by_pair(
        &self,
        job_id: JobId,
        applicant_id: UserId,
    ) -> Result<Option<Application>, RepositoryError> {
        Ok(lock(&self.rows)?
            .values()
            .find(|row| row.job_id == job_id && row.applicant_id == applicant_id)
            .cloned())
    }

    fn list_for_job(&self, job_id: JobId) -> Result<Vec<Application>, RepositoryError> {
        Ok(lock(&self.rows)?
            .values()
            .filter(|row| row.job_id == job_id)
            .cloned()
            .collect())
    }

    fn list_for_applicant(
        &self,
        applicant_id: UserId,
    ) -> Result<Vec<Application>, RepositoryError> {
        Ok(lock(&self.rows)?
            .values()
            .filter(|row| row.applicant_id == applicant_id)
            .cloned()
            .collect())
    }

    fn delete(
        &self,
        id: ApplicationId,
        expected: ApplicationStatus,
    ) -> Result<Application, RepositoryError> {
        let mut guard = lock(&self.rows)?;
        match guard.get(&id) {
            None => Err(RepositoryError::NotFound),
            Some(row) if row.status != expected => Err(RepositoryError::Stale),
            Some(_) => guard.remove(&id).ok_or(RepositoryError::NotFound),
        }
    }
}

#[derive(Default, Clone)]
pub struct InMemoryInterviewRepository {
    rows: Arc<Mutex<BTreeMap<InterviewId, Interview>>>,
}

impl InMemoryInterviewRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InterviewRepository for InMemoryInterviewRepository {
    fn insert(&self, interview: Interview) -> Result<Interview, RepositoryError> {
        let mut guard = lock(&self.rows)?;
        let occupied = guard.contains_key(&interview.id)
            || guard.values().any(|row| {
                row.application_id == interview.application_id && row.status.occupies_slot()
            });
        if occupied {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(interview.id, interview.clone());
        Ok(interview)
    }

    fn update(
        &self,
        interview: Interview,
        expected: InterviewStatus,
    ) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.rows)?;
        let row = guard
            .get_mut(&interview.id)
            .ok_or(RepositoryError::NotFound)?;
        if row.status != expected {
            return Err(RepositoryError::Stale);
        }
        *row = interview;
        Ok(())
    }

    fn fetch(&self, id: InterviewId) -> Result<Option<Interview>, RepositoryError> {
        Ok(lock(&self.rows)?.get(&id).cloned())
    }

    fn for_application(
        &self,
        application_id: ApplicationId,
    ) -> Result<Vec<Interview>, RepositoryError> {
        Ok(lock(&self.rows)?
            .values()
            .filter(|row| row.application_id == application_id)
            .cloned()
            .collect())
    }

    fn list(&self) -> Result<Vec<Interview>, RepositoryError> {
        Ok(lock(&self.rows)?.values().cloned().collect())
    }
}
