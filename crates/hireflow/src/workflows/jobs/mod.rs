//! Job postings: the recruiter-owned catalogue applications attach to.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{Job, JobDraft, JobId, JobType};
pub use repository::JobRepository;
pub use router::job_router;
pub use service::{JobBoardService, JobServiceError};
