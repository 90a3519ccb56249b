//! Execution limits and caller identity

use serde::{Deserialize, Serialize};

/// Resource caps forwarded to the execution backend.
///
/// Never enforced locally; the backend applies them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionLimits {
    pub timeout_ms: u64,
    pub max_memory_mb: u64,
    pub max_output_bytes: u64,
}

/// Who is calling, as far as the pipeline cares
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    /// Authenticated account (token subject), if any
    pub user_id: Option<String>,
    /// Stable per-browser-session identifier
    pub session_id: String,
}

impl ClientIdentity {
    /// Identity for a caller without an account
    pub fn anonymous(session_id: impl Into<String>) -> Self {
        Self {
            user_id: None,
            session_id: session_id.into(),
        }
    }

    /// Identity for an authenticated caller
    pub fn authenticated(user_id: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            session_id: session_id.into(),
        }
    }

    /// The account when known, else the session
    pub fn client_id(&self) -> &str {
        self.user_id.as_deref().unwrap_or(&self.session_id)
    }

    /// Rate-limit partition key.
    ///
    /// Accounts and sessions live in separate namespaces, so a session id
    /// chosen by the caller can never spend an account's quota.
    pub fn quota_key(&self) -> String {
        match &self.user_id {
            Some(user_id) => format!("user:{}", user_id),
            None => format!("session:{}", self.session_id),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_id_prefers_account() {
        let anon = ClientIdentity::anonymous("sess-1");
        assert_eq!(anon.client_id(), "sess-1");
        assert!(!anon.is_authenticated());

        let user = ClientIdentity::authenticated("alice", "sess-1");
        assert_eq!(user.client_id(), "alice");
        assert!(user.is_authenticated());
    }

    #[test]
    fn test_quota_keys_do_not_collide_across_kinds() {
        let session_named_alice = ClientIdentity::anonymous("alice");
        let alice = ClientIdentity::authenticated("alice", "sess-1");

        assert_eq!(session_named_alice.quota_key(), "session:alice");
        assert_eq!(alice.quota_key(), "user:alice");
        assert_ne!(session_named_alice.quota_key(), alice.quota_key());
    }

    #[test]
    fn test_limits_serialize_camel_case() {
        let limits = ExecutionLimits {
            timeout_ms: 10_000,
            max_memory_mb: 100,
            max_output_bytes: 10_240,
        };
        let json = serde_json::to_value(limits).unwrap();
        assert_eq!(json["timeoutMs"], 10_000);
        assert_eq!(json["maxMemoryMb"], 100);
        assert_eq!(json["maxOutputBytes"], 10_240);
    }
}
