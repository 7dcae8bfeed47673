use std::path::{Path, PathBuf};
use std::{env, fs};

use serde::Deserialize;
use thiserror::Error;
use url::Url;

// Runtime constants and configuration for the console.

pub const DEFAULT_API_BASE_URL: &str = "https://api.example.com";
pub const DEFAULT_DEMO_DAYS: u32 = 7;
const APP_DIR: &str = "admin_console";
const CONFIG_FILE: &str = "config.toml";

pub const CONFIG_PATH_ENV: &str = "ADMIN_CONSOLE_CONFIG";
pub const API_URL_ENV: &str = "ADMIN_API_URL";
pub const DEFAULT_DAYS_ENV: &str = "ADMIN_DEFAULT_DAYS";
pub const STATE_DIR_ENV: &str = "ADMIN_CONSOLE_STATE_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub api_base_url: String,
    pub default_days: u32,
    // Directory holding the persisted admin key entry.
    pub state_dir: PathBuf,
}

// Optional TOML file; every field may be overridden from the environment.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    api_base_url: Option<String>,
    default_days: Option<u32>,
    state_dir: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid admin API url `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("default days must be a positive whole number, got `{0}`")]
    InvalidDays(String),
    #[error("could not determine a state directory, set ADMIN_CONSOLE_STATE_DIR")]
    NoStateDir,
}

impl ConsoleConfig {
    // Reads the config file (explicit path or the per-user default) and applies env overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let file = match env::var(CONFIG_PATH_ENV) {
            Ok(path) => Some(read_file(Path::new(&path))?),
            Err(_) => match default_app_dir().map(|dir| dir.join(CONFIG_FILE)) {
                Some(path) if path.exists() => Some(read_file(&path)?),
                _ => None,
            },
        };

        Self::from_sources(file.as_deref(), |name| env::var(name).ok())
    }

    pub fn from_sources(
        file: Option<&str>,
        env_var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let file: FileConfig = match file {
            Some(contents) => toml::from_str(contents)?,
            None => FileConfig::default(),
        };

        let api_base_url = env_var(API_URL_ENV)
            .or(file.api_base_url)
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        Url::parse(&api_base_url).map_err(|source| ConfigError::InvalidUrl {
            url: api_base_url.clone(),
            source,
        })?;

        let default_days = match env_var(DEFAULT_DAYS_ENV) {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(days) if days > 0 => days,
                _ => return Err(ConfigError::InvalidDays(raw)),
            },
            None => match file.default_days {
                Some(0) => return Err(ConfigError::InvalidDays("0".to_string())),
                Some(days) => days,
                None => DEFAULT_DEMO_DAYS,
            },
        };

        let state_dir = env_var(STATE_DIR_ENV)
            .map(PathBuf::from)
            .or(file.state_dir)
            .or_else(default_app_dir)
            .ok_or(ConfigError::NoStateDir)?;

        Ok(Self {
            api_base_url,
            default_days,
            state_dir,
        })
    }
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn default_app_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR))
}
