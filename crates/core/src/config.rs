use std::env;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::WarmrunError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_parse<T: std::str::FromStr>(profile: &str, key: &str, default: T) -> T {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_bool(profile: &str, key: &str, default: bool) -> bool {
    match profiled_env_opt(profile, key).as_deref() {
        Some("true") | Some("1") | Some("yes") => true,
        Some("false") | Some("0") | Some("no") => false,
        _ => default,
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    #[serde(default)]
    pub profile: String,
    #[serde(default)]
    pub sequential: SequentialConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `WARMRUN_PROFILE`. When set (e.g. `CI`), every
    /// key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("WARMRUN_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        Self {
            sequential: SequentialConfig::from_env_profiled(&p),
            profile: p,
        }
    }

    /// Parse a TOML document. Missing sections and keys take defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, WarmrunError> {
        toml::from_str(content).map_err(|e| WarmrunError::Config(e.to_string()))
    }

    /// Load a TOML config file. A read failure is `WarmrunError::Io`.
    pub fn from_file(path: &Path) -> Result<Self, WarmrunError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  sequential:  threads={}, poll_interval={}ms, shutdown_timeout={}s, detailed_logging={}",
            self.sequential.worker_threads,
            self.sequential.poll_interval_ms,
            self.sequential.shutdown_timeout_secs,
            self.sequential.detailed_logging,
        );
    }
}

// ── Sequential scheduler ──────────────────────────────────────

/// Settings of the sequential (timestamp-ignoring) scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequentialConfig {
    /// Pool size. 0 = available parallelism.
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,
    /// Re-check cadence of admission control, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Upper bound on waiting for the pool to terminate, in seconds.
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
    /// Append a per-item log line before submission.
    #[serde(default)]
    pub detailed_logging: bool,
}

fn default_worker_threads() -> usize { 10 }
fn default_poll_interval_ms() -> u64 { 1 }
fn default_shutdown_timeout_secs() -> u64 { 10 }

impl Default for SequentialConfig {
    fn default() -> Self {
        Self {
            worker_threads: default_worker_threads(),
            poll_interval_ms: default_poll_interval_ms(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
            detailed_logging: false,
        }
    }
}

impl SequentialConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            worker_threads: profiled_env_parse(p, "SEQUENTIAL_THREADS", default_worker_threads()),
            poll_interval_ms: profiled_env_parse(
                p,
                "SEQUENTIAL_POLL_INTERVAL_MS",
                default_poll_interval_ms(),
            ),
            shutdown_timeout_secs: profiled_env_parse(
                p,
                "SEQUENTIAL_SHUTDOWN_TIMEOUT_SECS",
                default_shutdown_timeout_secs(),
            ),
            detailed_logging: profiled_env_bool(p, "DETAILED_LOGGING", false),
        }
    }

    /// Resolve worker thread count (0 means use available parallelism).
    pub fn resolved_worker_threads(&self) -> usize {
        if self.worker_threads == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        } else {
            self.worker_threads
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}
