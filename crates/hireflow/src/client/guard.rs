use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use super::error::ClientError;
use crate::workflows::applications::ApplicationId;
use crate::workflows::interviews::InterviewId;
use crate::workflows::jobs::JobId;

/// Entity a mutating request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKey {
    Job(JobId),
    Application(ApplicationId),
    Interview(InterviewId),
    /// Scheduling is keyed by application since the interview does not exist yet.
    InterviewSlot(ApplicationId),
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKey::Job(id) => write!(f, "job {id}"),
            EntityKey::Application(id) => write!(f, "application {id}"),
            EntityKey::Interview(id) => write!(f, "interview {id}"),
            EntityKey::InterviewSlot(id) => write!(f, "interview slot for application {id}"),
        }
    }
}

/// Set of entities with a mutating request in flight.
///
/// A second mutation against a busy entity fails fast with [`ClientError::Busy`]
/// instead of racing the first one.
#[derive(Debug, Default, Clone)]
pub struct RequestGuard {
    in_flight: Arc<Mutex<HashSet<EntityKey>>>,
}

impl RequestGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self, key: EntityKey) -> Result<RequestPermit, ClientError> {
        if !lock(&self.in_flight).insert(key) {
            debug!(%key, "request already in flight");
            return Err(ClientError::Busy(key));
        }
        Ok(RequestPermit {
            key,
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    pub fn is_busy(&self, key: EntityKey) -> bool {
        lock(&self.in_flight).contains(&key)
    }
}

/// Releases its key when dropped, including when the request future is dropped.
#[derive(Debug)]
pub struct RequestPermit {
    key: EntityKey,
    in_flight: Arc<Mutex<HashSet<EntityKey>>>,
}

impl RequestPermit {
    pub fn key(&self) -> EntityKey {
        self.key
    }
}

impl Drop for RequestPermit {
    fn drop(&mut self) {
        lock(&self.in_flight).remove(&self.key);
    }
}

fn lock(set: &Mutex<HashSet<EntityKey>>) -> MutexGuard<'_, HashSet<EntityKey>> {
    set.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
