//! Database repositories
//!
//! Repositories handle all direct storage interactions.

pub mod memory_repo;
pub mod submission_repo;

pub use memory_repo::InMemorySubmissionStore;
pub use submission_repo::{PgSubmissionStore, SubmissionStore};

#[cfg(test)]
pub use submission_repo::MockSubmissionStore;
