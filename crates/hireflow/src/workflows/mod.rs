pub mod accounts;
pub mod applications;
pub mod clock;
pub mod dashboard;
pub mod envelope;
pub mod extract;
pub mod interviews;
pub mod jobs;
pub mod memory;
pub mod portal;
pub mod repository;

pub use clock::{Clock, FixedClock, SystemClock};
pub use envelope::{ApiFailure, Envelope};
pub use portal::Portal;
pub use repository::RepositoryError;
