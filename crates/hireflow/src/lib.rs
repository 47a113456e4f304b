//! Job board lifecycle rules and the typed REST client that drives them.
//!
//! `workflows` holds the application and interview state machines and the dashboards,
//! with their repositories and axum routers; `client` wraps the same endpoints for
//! portal front ends.

pub mod client;
pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
