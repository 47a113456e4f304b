//! Portal accounts: registration, bearer sessions, and caller extraction.

pub mod directory;
pub mod domain;
pub mod middleware;
pub mod router;

pub use directory::{AccountDirectory, AccountError};
pub use domain::{
    Actor, AuthPayload, DeveloperProfile, LoginRequest, ProfileUpdate, SignupRequest, User,
    UserId, UserRole,
};
pub use middleware::{authenticate, bearer_token};
pub use router::account_router;
