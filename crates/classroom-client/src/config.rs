//! Classroom client configuration.
//!
//! Configuration is loaded from environment variables. The API token is
//! redacted in Debug output.

use chrono::{FixedOffset, Offset, Utc};
use common::secret::SecretString;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Default HTTP request timeout for the join endpoint, in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 10;

/// Default lead time before a class starts at which joining opens, in seconds.
pub const DEFAULT_JOIN_LEAD_SECONDS: u64 = 600;

/// Longest accepted join lead time (one day).
pub const MAX_JOIN_LEAD_SECONDS: u64 = 24 * 60 * 60;

/// Default cadence of the pre-connection lobby re-check, in seconds.
pub const DEFAULT_LOBBY_TICK_SECONDS: u64 = 30;

/// Default cadence of the in-session countdown, in milliseconds.
pub const DEFAULT_COUNTDOWN_TICK_MILLIS: u64 = 1000;

/// Classroom client configuration.
#[derive(Clone)]
pub struct Config {
    /// Base URL of the backend REST API (e.g. `https://api.example.com/api`).
    pub api_base_url: String,

    /// Bearer token for the backend API, if the deployment uses one.
    /// Protected by `SecretString` to prevent accidental logging.
    pub api_token: Option<SecretString>,

    /// HTTP request timeout for the join endpoint.
    pub http_timeout: Duration,

    /// How long before the scheduled start joining opens (default: 10 minutes).
    pub join_lead: Duration,

    /// Lobby re-check cadence (default: 30 seconds).
    pub lobby_tick: Duration,

    /// Countdown tick cadence inside the session (default: 1 second).
    pub countdown_tick: Duration,

    /// Offset, in minutes east of UTC, at which schedule strings are interpreted.
    pub utc_offset_minutes: i32,

    /// Whether the microphone should be on when the session allows it.
    pub start_with_microphone: bool,

    /// Whether the camera should be on when the session allows it.
    pub start_with_camera: bool,

    /// Emit logs as JSON.
    pub log_json: bool,
}

/// Custom Debug implementation that redacts the API token.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_base_url", &self.api_base_url)
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("http_timeout", &self.http_timeout)
            .field("join_lead", &self.join_lead)
            .field("lobby_tick", &self.lobby_tick)
            .field("countdown_tick", &self.countdown_tick)
            .field("utc_offset_minutes", &self.utc_offset_minutes)
            .field("start_with_microphone", &self.start_with_microphone)
            .field("start_with_camera", &self.start_with_camera)
            .field("log_json", &self.log_json)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a `HashMap` (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let api_base_url = vars
            .get("CLASSROOM_API_BASE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("CLASSROOM_API_BASE_URL".to_string()))?
            .trim_end_matches('/')
            .to_string();

        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue(
                "CLASSROOM_API_BASE_URL must be an http(s) URL".to_string(),
            ));
        }

        let api_token = vars
            .get("CLASSROOM_API_TOKEN")
            .filter(|token| !token.is_empty())
            .map(|token| SecretString::from(token.clone()));

        let http_timeout = Duration::from_secs(parse_or(
            vars,
            "CLASSROOM_HTTP_TIMEOUT_SECONDS",
            DEFAULT_HTTP_TIMEOUT_SECONDS,
        )?);

        let join_lead_seconds = parse_or(
            vars,
            "CLASSROOM_JOIN_LEAD_SECONDS",
            DEFAULT_JOIN_LEAD_SECONDS,
        )?;
        if join_lead_seconds > MAX_JOIN_LEAD_SECONDS {
            return Err(ConfigError::InvalidValue(format!(
                "CLASSROOM_JOIN_LEAD_SECONDS must be at most {MAX_JOIN_LEAD_SECONDS}, got {join_lead_seconds}"
            )));
        }
        let join_lead = Duration::from_secs(join_lead_seconds);

        let lobby_tick = Duration::from_secs(parse_or(
            vars,
            "CLASSROOM_LOBBY_TICK_SECONDS",
            DEFAULT_LOBBY_TICK_SECONDS,
        )?);

        let countdown_tick = Duration::from_millis(parse_or(
            vars,
            "CLASSROOM_COUNTDOWN_TICK_MILLIS",
            DEFAULT_COUNTDOWN_TICK_MILLIS,
        )?);

        if lobby_tick.is_zero() || countdown_tick.is_zero() {
            return Err(ConfigError::InvalidValue(
                "tick intervals must be greater than zero".to_string(),
            ));
        }

        let utc_offset_minutes: i32 = parse_or(vars, "CLASSROOM_UTC_OFFSET_MINUTES", 0)?;
        if utc_offset_minutes.unsigned_abs() >= 24 * 60 {
            return Err(ConfigError::InvalidValue(format!(
                "CLASSROOM_UTC_OFFSET_MINUTES out of range: {utc_offset_minutes}"
            )));
        }

        let start_with_microphone = parse_or(vars, "CLASSROOM_START_WITH_MICROPHONE", true)?;
        let start_with_camera = parse_or(vars, "CLASSROOM_START_WITH_CAMERA", true)?;
        let log_json = parse_or(vars, "CLASSROOM_LOG_JSON", false)?;

        Ok(Config {
            api_base_url,
            api_token,
            http_timeout,
            join_lead,
            lobby_tick,
            countdown_tick,
            utc_offset_minutes,
            start_with_microphone,
            start_with_camera,
            log_json,
        })
    }

    /// Schedule offset as a `chrono::FixedOffset`.
    #[must_use]
    pub fn utc_offset(&self) -> FixedOffset {
        // Range is validated in from_vars
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or(Utc.fix())
    }
}

fn parse_or<T: FromStr>(
    vars: &HashMap<String, String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match vars.get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(format!("{key}={raw}"))),
        None => Ok(default),
    }
}
