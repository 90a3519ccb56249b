//! Application configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! All configuration is loaded at startup and validated before the application runs;
//! a missing execution-backend credential stops the process here rather than per request.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use crate::constants::{
    judge0_language_ids, DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_EXECUTION_MAX_MEMORY_MB,
    DEFAULT_EXECUTION_MAX_OUTPUT_BYTES, DEFAULT_EXECUTION_TIMEOUT_MS, DEFAULT_JUDGE0_BASE_URL,
    DEFAULT_JUDGE0_TIMEOUT_SECS, DEFAULT_MAX_CODE_SIZE_BYTES, DEFAULT_MAX_INPUT_SIZE_BYTES,
    DEFAULT_RATE_LIMIT_PER_MINUTE, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
};
use crate::models::{ExecutionLimits, Language};

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub judge0: Judge0Config,
    pub limits: LimitsConfig,
    pub sanitizer: SanitizerConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

/// Database configuration; history is kept in memory when `url` is absent
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
}

/// Bearer token verification
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// HS256 secret; tokens are ignored when unset
    pub jwt_secret: Option<String>,
}

/// Remote execution backend
#[derive(Debug, Clone)]
pub struct Judge0Config {
    pub base_url: String,
    pub api_key: String,
    pub api_host: String,
    pub timeout_secs: u64,
    pub language_ids: HashMap<Language, u32>,
}

/// Quotas and size ceilings
#[derive(Debug, Clone)]
pub struct LimitsConfig {
    pub rate_limit_per_minute: u32,
    pub max_code_size_bytes: usize,
    pub max_input_size_bytes: usize,
    pub execution: ExecutionLimits,
}

#[derive(Debug, Clone, Default)]
pub struct SanitizerConfig {
    pub rules_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env(),
            judge0: Judge0Config::from_env()?,
            limits: LimitsConfig::from_env()?,
            sanitizer: SanitizerConfig::from_env(),
        })
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: parse_var("SERVER_PORT", DEFAULT_SERVER_PORT)?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: non_blank_var("DATABASE_URL"),
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS", DEFAULT_DATABASE_MAX_CONNECTIONS)?,
        })
    }
}

impl AuthConfig {
    fn from_env() -> Self {
        Self {
            jwt_secret: non_blank_var("JWT_SECRET"),
        }
    }
}

impl Judge0Config {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = env::var("JUDGE0_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_JUDGE0_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let api_key =
            non_blank_var("JUDGE0_API_KEY").ok_or_else(|| ConfigError::Missing("JUDGE0_API_KEY".to_string()))?;
        let api_host = non_blank_var("JUDGE0_API_HOST").unwrap_or_else(|| host_of(&base_url));

        let mut language_ids = default_language_ids();
        if let Some(overrides) = non_blank_var("JUDGE0_LANGUAGE_IDS") {
            apply_language_ids(&mut language_ids, &parse_language_ids(&overrides)?);
        }

        Ok(Self {
            base_url,
            api_key,
            api_host,
            timeout_secs: parse_var("JUDGE0_TIMEOUT_SECS", DEFAULT_JUDGE0_TIMEOUT_SECS)?,
            language_ids,
        })
    }
}

impl LimitsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            rate_limit_per_minute: parse_var("RATE_LIMIT_PER_MINUTE", DEFAULT_RATE_LIMIT_PER_MINUTE)?,
            max_code_size_bytes: parse_var("MAX_CODE_SIZE_BYTES", DEFAULT_MAX_CODE_SIZE_BYTES)?,
            max_input_size_bytes: parse_var("MAX_INPUT_SIZE_BYTES", DEFAULT_MAX_INPUT_SIZE_BYTES)?,
            execution: ExecutionLimits {
                timeout_ms: parse_var("EXECUTION_TIMEOUT_MS", DEFAULT_EXECUTION_TIMEOUT_MS)?,
                max_memory_mb: parse_var("EXECUTION_MAX_MEMORY_MB", DEFAULT_EXECUTION_MAX_MEMORY_MB)?,
                max_output_bytes: parse_var(
                    "EXECUTION_MAX_OUTPUT_BYTES",
                    DEFAULT_EXECUTION_MAX_OUTPUT_BYTES,
                )?,
            },
        })
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            rate_limit_per_minute: DEFAULT_RATE_LIMIT_PER_MINUTE,
            max_code_size_bytes: DEFAULT_MAX_CODE_SIZE_BYTES,
            max_input_size_bytes: DEFAULT_MAX_INPUT_SIZE_BYTES,
            execution: ExecutionLimits {
                timeout_ms: DEFAULT_EXECUTION_TIMEOUT_MS,
                max_memory_mb: DEFAULT_EXECUTION_MAX_MEMORY_MB,
                max_output_bytes: DEFAULT_EXECUTION_MAX_OUTPUT_BYTES,
            },
        }
    }
}

impl SanitizerConfig {
    fn from_env() -> Self {
        Self {
            rules_path: non_blank_var("SANITIZER_RULES_PATH").map(PathBuf::from),
        }
    }
}

/// Backend language ids used when no override is configured
pub fn default_language_ids() -> HashMap<Language, u32> {
    HashMap::from([
        (Language::Java, judge0_language_ids::JAVA),
        (Language::Python, judge0_language_ids::PYTHON),
        (Language::Cpp, judge0_language_ids::CPP),
        (Language::C, judge0_language_ids::C),
        (Language::JavaScript, judge0_language_ids::JAVASCRIPT),
        (Language::Go, judge0_language_ids::GO),
    ])
}

/// Parse `java=62,python=71,go=` into language id overrides.
///
/// An empty id (`go=`) marks the language as disabled.
pub fn parse_language_ids(raw: &str) -> Result<HashMap<Language, Option<u32>>, ConfigError> {
    let invalid = || ConfigError::InvalidValue("JUDGE0_LANGUAGE_IDS".to_string());

    raw.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (name, id) = pair.split_once('=').ok_or_else(invalid)?;
            let language = name.parse::<Language>().map_err(|_| invalid())?;
            let id = match id.trim() {
                "" => None,
                id => Some(id.parse::<u32>().map_err(|_| invalid())?),
            };
            Ok((language, id))
        })
        .collect()
}

/// Set or remove backend ids in `table`
pub fn apply_language_ids(
    table: &mut HashMap<Language, u32>,
    overrides: &HashMap<Language, Option<u32>>,
) {
    for (language, id) in overrides {
        match id {
            Some(id) => {
                table.insert(*language, *id);
            }
            None => {
                table.remove(language);
            }
        }
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        Err(_) => Ok(default),
    }
}

fn non_blank_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn host_of(url: &str) -> String {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    without_scheme
        .split(['/', '?'])
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),

    #[error("Invalid configuration file: {0}")]
    InvalidFile(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let server = ServerConfig {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
            rust_log: "info".to_string(),
        };
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8080);

        let limits = LimitsConfig::default();
        assert_eq!(limits.rate_limit_per_minute, 100);
        assert_eq!(limits.max_code_size_bytes, 100 * 1024);
        assert_eq!(limits.max_input_size_bytes, 10 * 1024);
        assert_eq!(limits.execution.timeout_ms, 10_000);
    }

    #[test]
    fn test_default_language_ids_cover_every_language() {
        let ids = default_language_ids();
        for language in Language::ALL {
            assert!(ids.contains_key(&language), "{language} has no backend id");
        }
        assert_eq!(ids[&Language::Python], 71);
        assert_eq!(ids[&Language::Java], 62);
    }

    #[test]
    fn test_parse_language_ids() {
        let ids = parse_language_ids(" java=91 , python = 92,").unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[&Language::Java], Some(91));
        assert_eq!(ids[&Language::Python], Some(92));
    }

    #[test]
    fn test_empty_override_removes_language() {
        let mut ids = default_language_ids();
        apply_language_ids(&mut ids, &parse_language_ids("go=, java=91").unwrap());

        assert!(!ids.contains_key(&Language::Go));
        assert_eq!(ids[&Language::Java], 91);
        assert_eq!(ids[&Language::Python], 71);
        assert_eq!(ids.len(), Language::ALL.len() - 1);
    }

    #[test]
    fn test_parse_language_ids_rejects_garbage() {
        assert!(matches!(
            parse_language_ids("ruby=72"),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(parse_language_ids("java").is_err());
        assert!(parse_language_ids("java=x").is_err());
    }

    #[test]
    fn test_host_of() {
        assert_eq!(host_of("https://judge0-ce.p.rapidapi.com"), "judge0-ce.p.rapidapi.com");
        assert_eq!(host_of("http://127.0.0.1:2358/api"), "127.0.0.1:2358");
        assert_eq!(host_of("localhost"), "localhost");
    }
}
