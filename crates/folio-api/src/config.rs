//! Server configuration read from the environment.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use folio_editor::application::sync_channel::{DEFAULT_DEBOUNCE, SyncConfig};
use folio_renderer::transition::TransitionTimings;

use crate::error::AppError;

/// Settings for one server process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// JSON file the editor saves to.
    pub data_path: PathBuf,
    /// Optional YAML project used when nothing has been saved yet.
    pub seed_path: Option<PathBuf>,
    /// Editor broadcast settings.
    pub sync: SyncConfig,
    /// Renderer transition timings.
    pub timings: TransitionTimings,
}

impl AppConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, falling back to defaults
    /// for unset variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = TransitionTimings::default();
        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse(&lookup, "PORT")?.unwrap_or(3000),
            data_path: lookup("FOLIO_DATA_PATH").map_or_else(|| "folio.json".into(), PathBuf::from),
            seed_path: lookup("FOLIO_SEED_PATH").map(PathBuf::from),
            sync: SyncConfig {
                debounce: millis(&lookup, "FOLIO_DEBOUNCE_MS")?.unwrap_or(DEFAULT_DEBOUNCE),
            },
            timings: TransitionTimings {
                fade: millis(&lookup, "FOLIO_FADE_MS")?.unwrap_or(defaults.fade),
                pause: millis(&lookup, "FOLIO_PAUSE_MS")?.unwrap_or(defaults.pause),
            },
        })
    }

    /// Returns the `host:port` bind string.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| AppError::Config(format!("{key} must be a valid number: {e}")))
        })
        .transpose()
}

fn millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<Duration>, AppError> {
    Ok(parse::<u64>(lookup, key)?.map(Duration::from_millis))
}
