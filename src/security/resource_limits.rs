//! Static size ceilings and the execution caps passed downstream

use crate::models::ExecutionLimits;

/// Size checks on incoming payloads plus the fixed per-client execution limits
#[derive(Debug, Clone)]
pub struct ResourceLimitPolicy {
    max_code_bytes: usize,
    max_input_bytes: usize,
    limits: ExecutionLimits,
}

impl ResourceLimitPolicy {
    pub fn new(max_code_bytes: usize, max_input_bytes: usize, limits: ExecutionLimits) -> Self {
        Self {
            max_code_bytes,
            max_input_bytes,
            limits,
        }
    }

    /// UTF-8 byte length of `code` is within the ceiling
    pub fn code_size_ok(&self, code: &str) -> bool {
        let size = code.len();
        let ok = size <= self.max_code_bytes;
        if !ok {
            tracing::warn!(size, max = self.max_code_bytes, "Code size exceeded");
        }
        ok
    }

    /// Absent input is always acceptable
    pub fn input_size_ok(&self, input: Option<&str>) -> bool {
        let Some(input) = input else {
            return true;
        };

        let size = input.len();
        let ok = size <= self.max_input_bytes;
        if !ok {
            tracing::warn!(size, max = self.max_input_bytes, "Input size exceeded");
        }
        ok
    }

    /// Execution caps for a client; identical for everyone today
    pub fn limits_for(&self, _client_id: &str) -> ExecutionLimits {
        self.limits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> ResourceLimitPolicy {
        ResourceLimitPolicy::new(
            16,
            8,
            ExecutionLimits {
                timeout_ms: 1_000,
                max_memory_mb: 64,
                max_output_bytes: 512,
            },
        )
    }

    #[test]
    fn test_code_size_counts_bytes() {
        let policy = policy();
        assert!(policy.code_size_ok(""));
        assert!(policy.code_size_ok(&"a".repeat(16)));
        assert!(!policy.code_size_ok(&"a".repeat(17)));
        // 9 chars, 18 bytes
        assert!(!policy.code_size_ok("ééééééééé"));
    }

    #[test]
    fn test_input_size() {
        let policy = policy();
        assert!(policy.input_size_ok(None));
        assert!(policy.input_size_ok(Some("12345678")));
        assert!(!policy.input_size_ok(Some("123456789")));
    }

    #[test]
    fn test_limits_are_the_same_for_every_client() {
        let policy = policy();
        assert_eq!(policy.limits_for("alice"), policy.limits_for("bob"));
        assert_eq!(policy.limits_for("alice").timeout_ms, 1_000);
    }
}
