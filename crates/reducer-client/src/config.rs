//! Reducer client configuration from the environment.

use serde::{Deserialize, Serialize};

/// Which reducer implementation the process runs with.
///
/// The choice is explicit configuration, never a runtime fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReducerMode {
    Platform,
    Synthetic,
}

/// Connection settings for the analysis platform.
#[derive(Debug, Clone)]
pub struct ReducerConfig {
    /// Base URL of the platform's reduce API.
    pub endpoint: String,

    /// Optional bearer token.
    pub api_key: Option<String>,

    /// Per-request timeout in seconds. Every external call is bounded.
    pub timeout_secs: u64,

    /// Which implementation to construct.
    pub mode: ReducerMode,
}

impl ReducerConfig {
    /// Load configuration from the environment.
    ///
    /// `REDUCER_ENDPOINT`, `REDUCER_API_KEY`, `REDUCER_TIMEOUT_SECS`,
    /// `REDUCER_MODE` (`platform` | `synthetic`).
    pub fn from_env() -> Self {
        let endpoint = std::env::var("REDUCER_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:9100".to_string());
        let api_key = std::env::var("REDUCER_API_KEY").ok();
        let timeout_secs = std::env::var("REDUCER_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        let mode = match std::env::var("REDUCER_MODE").as_deref() {
            Ok("synthetic") => ReducerMode::Synthetic,
            _ => ReducerMode::Platform,
        };

        Self {
            endpoint,
            api_key,
            timeout_secs,
            mode,
        }
    }
}
