//! Domain models
//!
//! This module contains all domain models used throughout the application.

pub mod execution;
pub mod language;
pub mod submission;

pub use execution::*;
pub use language::*;
pub use submission::*;
