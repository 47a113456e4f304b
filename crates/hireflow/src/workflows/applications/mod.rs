//! Application intake and the recruiter-driven status state machine.

pub mod domain;
pub mod policy;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Application, ApplicationId, ApplicationNote, ApplicationQuery, ApplicationStatus,
    ApplicationStatusView, ApplyRequest, SortOrder, StatusUpdate,
};
pub use policy::TransitionPolicy;
pub use repository::ApplicationRepository;
pub use router::application_router;
pub use service::{ApplicationService, ApplicationServiceError};
