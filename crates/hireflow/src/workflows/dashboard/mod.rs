//! Read-only dashboard views: counters and cross-job application feeds.

pub mod domain;
pub mod router;
pub mod service;

pub use domain::{
    ApplicationSummary, DeveloperStats, RecentQuery, RecruiterApplicationQuery,
    RecruiterStats, DEFAULT_RECENT_LIMIT, MAX_RECENT_LIMIT,
};
pub use router::dashboard_router;
pub use service::{DashboardError, DashboardService};

#[cfg(test)]
mod tests;
