//! Application configuration loading and validation.
//!
//! Provides the [`Config`] record shared by every command. Values come from an
//! environment file (`.env` by default) and the process environment; the
//! process environment wins when both define a key.
//!
//! # Example
//!
//! ```no_run
//! use rugby_ingest::infrastructure::config::settings::load_config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config()?;
//!     println!("database: {}", config.database_url);
//!     Ok(())
//! }
//! ```

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::logging::{LogFormat, LoggingConfig};
use super::secret::{DatabaseUrl, Secret};
use crate::adapter::outbound::tsdb::settings::TsdbSettings;
use crate::error::{ConfigError, Result};

/// Conventional environment file name, resolved against the working directory.
pub const DEFAULT_ENV_FILE: &str = ".env";

pub const API_KEY: &str = "TSDB_API_KEY";
/// Older name of [`API_KEY`], still honoured.
pub const API_KEY_ALIAS: &str = "THESPORTSDB_API_KEY";
pub const DATABASE_URL: &str = "DATABASE_URL";
pub const DATA_DIR: &str = "RUGBY_DATA_DIR";
pub const TSDB_BASE_URL: &str = "TSDB_BASE_URL";
pub const TSDB_TIMEOUT_SECS: &str = "TSDB_TIMEOUT_SECS";
pub const TSDB_MAX_ATTEMPTS: &str = "TSDB_MAX_ATTEMPTS";
pub const LOG_LEVEL: &str = "LOG_LEVEL";
pub const LOG_FORMAT: &str = "LOG_FORMAT";

const DEFAULT_DATA_DIR: &str = "data";

/// Process-wide configuration, loaded once at startup and passed explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    /// TheSportsDB API key.
    pub api_key: Secret,

    /// Postgres connection string.
    pub database_url: DatabaseUrl,

    /// Directory for CSV snapshots and other local artifacts.
    pub data_dir: PathBuf,

    /// Upstream client settings.
    pub tsdb: TsdbSettings,

    /// Logging and tracing configuration.
    pub logging: LoggingConfig,
}

/// Load configuration from `.env` in the working directory and the process
/// environment.
///
/// # Errors
///
/// See [`Config::load`].
pub fn load_config() -> Result<Config> {
    Config::load()
}

impl Config {
    /// Load from `.env` (if present) overlaid with the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The API key or `DATABASE_URL` is absent
    /// - `DATABASE_URL` is not a valid Postgres connection string
    /// - An optional setting has an unparseable value
    pub fn load() -> Result<Self> {
        Self::load_with(Path::new(DEFAULT_ENV_FILE))
    }

    /// Like [`Config::load`] with an explicit environment file path. A missing
    /// file is not an error; its keys may come from the process environment.
    ///
    /// Process variables that are blank or not valid UTF-8 are ignored, so a
    /// stray `export DATABASE_URL=` does not hide the file's value.
    ///
    /// # Errors
    ///
    /// See [`Config::load`]. Also fails when the file exists but is malformed.
    pub fn load_with(env_file: &Path) -> Result<Self> {
        let mut vars = if env_file.exists() {
            read_env_file(env_file)?
        } else {
            HashMap::new()
        };
        vars.extend(process_overrides(std::env::vars_os()));
        Self::from_vars(vars)
    }

    /// Build configuration from the environment file alone, ignoring the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed, or on the validation
    /// errors of [`Config::load`].
    pub fn from_env_file(path: &Path) -> Result<Self> {
        Self::from_vars(read_env_file(path)?)
    }

    /// Build configuration from key/value pairs.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: HashMap<String, String> = vars.into_iter().collect();
        let get = |key: &str| {
            vars.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let api_key = get(API_KEY)
            .or_else(|| get(API_KEY_ALIAS))
            .ok_or(ConfigError::MissingConfiguration { key: API_KEY })?;

        let database_url = get(DATABASE_URL).ok_or(ConfigError::MissingConfiguration {
            key: DATABASE_URL,
        })?;
        let database_url = DatabaseUrl::parse(DATABASE_URL, &database_url)?;

        let mut tsdb = TsdbSettings::default();
        if let Some(base_url) = get(TSDB_BASE_URL) {
            tsdb.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(raw) = get(TSDB_TIMEOUT_SECS) {
            tsdb.timeout_secs = parse_positive(TSDB_TIMEOUT_SECS, &raw)?;
        }
        if let Some(raw) = get(TSDB_MAX_ATTEMPTS) {
            tsdb.retry.max_attempts = parse_positive(TSDB_MAX_ATTEMPTS, &raw)?;
        }

        let mut logging = LoggingConfig::default();
        if let Some(level) = get(LOG_LEVEL) {
            logging.level = level;
        }
        if let Some(format) = get(LOG_FORMAT) {
            logging.format = format.parse::<LogFormat>()?;
        }

        let data_dir = get(DATA_DIR).map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);

        Ok(Self {
            api_key: Secret::new(api_key),
            database_url,
            data_dir,
            tsdb,
            logging,
        })
    }
}

fn process_overrides<I>(env: I) -> impl Iterator<Item = (String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    env.into_iter()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .filter(|(_, value)| !value.trim().is_empty())
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let display = path.display().to_string();
    let iter = dotenvy::from_path_iter(path).map_err(|e| ConfigError::ReadFile {
        path: display.clone(),
        reason: describe_dotenv_error(&e),
    })?;

    let mut vars = HashMap::new();
    for item in iter {
        let (key, value) = item.map_err(|e| ConfigError::ReadFile {
            path: display.clone(),
            reason: describe_dotenv_error(&e),
        })?;
        vars.insert(key, value);
    }
    Ok(vars)
}

/// Describe a dotenv failure without echoing file content, which may hold secrets.
fn describe_dotenv_error(err: &dotenvy::Error) -> String {
    match err {
        dotenvy::Error::LineParse(_, index) => format!("malformed line at offset {index}"),
        dotenvy::Error::Io(io) => io.to_string(),
        dotenvy::Error::EnvVar(var) => var.to_string(),
        _ => "unreadable environment file".to_string(),
    }
}

fn parse_positive<T>(key: &'static str, raw: &str) -> Result<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match raw.parse::<T>() {
        Ok(value) if value > T::default() => Ok(value),
        _ => Err(ConfigError::InvalidConfiguration {
            key,
            reason: format!("'{raw}' is not a positive integer"),
        }
        .into()),
    }
}
