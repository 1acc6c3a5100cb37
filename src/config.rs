//! Environment-driven configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

pub const APP_NAME: &str = "aidrelay";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_BIND: &str = "127.0.0.1:8080";
const DEFAULT_REASONING_MODEL: &str = "llama3";
const DEFAULT_REASONING_TIMEOUT_SECS: u64 = 20;

/// Default log filter when RUST_LOG is not set.
pub fn default_log_filter() -> String {
    format!("{APP_NAME}=info,tower_http=info")
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind: SocketAddr,
    /// Base URL of the reasoning service. None disables reasoning; every
    /// ranking degrades to the model-only path.
    pub reasoning_url: Option<String>,
    pub reasoning_model: String,
    pub reasoning_timeout_secs: u64,
    /// Facility dataset path. None uses the bundled dataset.
    pub facility_data: Option<PathBuf>,
    /// Seed for the synthetic telemetry provider. None seeds from entropy.
    pub telemetry_seed: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind = match std::env::var("AIDRELAY_BIND") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "AIDRELAY_BIND",
                value: raw,
            })?,
            Err(_) => DEFAULT_BIND.parse().map_err(|_| ConfigError::Invalid {
                name: "AIDRELAY_BIND",
                value: DEFAULT_BIND.to_string(),
            })?,
        };

        let reasoning_url = std::env::var("AIDRELAY_REASONING_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());
        let reasoning_model = std::env::var("AIDRELAY_REASONING_MODEL")
            .unwrap_or_else(|_| DEFAULT_REASONING_MODEL.to_string());

        let reasoning_timeout_secs = match std::env::var("AIDRELAY_REASONING_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "AIDRELAY_REASONING_TIMEOUT_SECS",
                value: raw,
            })?,
            Err(_) => DEFAULT_REASONING_TIMEOUT_SECS,
        };

        let facility_data = std::env::var("AIDRELAY_FACILITY_DATA").ok().map(PathBuf::from);

        let telemetry_seed = match std::env::var("AIDRELAY_TELEMETRY_SEED") {
            Ok(raw) => Some(raw.parse().map_err(|_| ConfigError::Invalid {
                name: "AIDRELAY_TELEMETRY_SEED",
                value: raw,
            })?),
            Err(_) => None,
        };

        Ok(Self {
            bind,
            reasoning_url,
            reasoning_model,
            reasoning_timeout_secs,
            facility_data,
            telemetry_seed,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.parse().unwrap_or_else(|_| {
                SocketAddr::from(([127, 0, 0, 1], 8080))
            }),
            reasoning_url: None,
            reasoning_model: DEFAULT_REASONING_MODEL.to_string(),
            reasoning_timeout_secs: DEFAULT_REASONING_TIMEOUT_SECS,
            facility_data: None,
            telemetry_seed: None,
        }
    }
}
