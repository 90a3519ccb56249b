//! Utility functions

pub mod crypto;
pub mod time;

pub use crypto::{code_fingerprint, hash_string};
pub use time::{now_utc, Clock, SystemClock};
