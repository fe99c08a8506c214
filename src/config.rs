//! Runtime configuration loaded from the environment
//!
//! Every setting has a default, and values that fail to parse fall back to it
//! rather than aborting startup.

use std::env;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP port to listen on (`PORT`, default: 8080)
    pub port: u16,

    /// Path of the embedded database file (`DATABASE_URL`, default: "data.db")
    pub database_path: String,

    /// Maximum candidates tried when auto-generating a code (`CODE_MAX_ATTEMPTS`, default: 10)
    pub code_max_attempts: u32,

    /// Tracing filter directive (`RUST_LOG`)
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            database_path: "data.db".to_string(),
            code_max_attempts: 10,
            log_filter: "shortlink=debug,tower_http=debug".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();

        Self {
            port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.port),

            database_path: lookup("DATABASE_URL")
                .filter(|v| !v.is_empty())
                .unwrap_or(default.database_path),

            code_max_attempts: lookup("CODE_MAX_ATTEMPTS")
                .and_then(|v| v.parse().ok())
                .filter(|n: &u32| *n >= 1)
                .unwrap_or(default.code_max_attempts),

            log_filter: lookup("RUST_LOG")
                .filter(|v| !v.is_empty())
                .unwrap_or(default.log_filter),
        }
    }
}
