//! Admission checks applied before any code leaves the service

pub mod rate_limiter;
pub mod resource_limits;
pub mod rules;
pub mod sanitizer;

pub use rate_limiter::RateLimiter;
pub use resource_limits::ResourceLimitPolicy;
pub use rules::{ExtraCheck, ExtraCheckKind, LanguageRules, SanitizerRules};
pub use sanitizer::CodeSanitizer;
