use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::collation::parse_locale;
use crate::hotkey::validate_hotkey;
use crate::session::SessionOptions;

pub const DEFAULT_HOTKEY: &str = "Ctrl+Alt+I";
pub const DEFAULT_LOG_FILTER: &str = "quickpurple=info";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read or write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config in '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub hotkey: String,
    /// BCP-47 tag selecting the collation used to order the index.
    pub locale: String,
    /// Index quit/add-buddy/accounts/preferences/plugins actions.
    pub static_actions: bool,
    /// Show unread messages while the query is empty.
    pub unread_on_open: bool,
    pub max_rows: u16,
    pub log_filter: String,
    pub snapshot_path: Option<PathBuf>,
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hotkey: DEFAULT_HOTKEY.to_string(),
            locale: "en".to_string(),
            static_actions: true,
            unread_on_open: true,
            max_rows: 20,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            snapshot_path: None,
            config_path: stable_app_data_dir().join(CONFIG_FILE_NAME),
        }
    }
}

impl Config {
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            static_actions: self.static_actions,
            unread_on_open: self.unread_on_open,
        }
    }
}

pub fn stable_app_data_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("quickpurple")
}

/// Loads the config at `path` (or the default location). A missing file
/// yields defaults remembered at that path. The hotkey is canonicalized.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| stable_app_data_dir().join(CONFIG_FILE_NAME));

    let mut config = match std::fs::read_to_string(&config_path) {
        Ok(raw) => toml::from_str::<Config>(&raw).map_err(|source| ConfigError::Parse {
            path: config_path.clone(),
            source,
        })?,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Config::default(),
        Err(source) => {
            return Err(ConfigError::Io {
                path: config_path,
                source,
            })
        }
    };
    config.config_path = config_path;

    validate(&config)?;
    config.hotkey = validate_hotkey(&config.hotkey)
        .map_err(|error| ConfigError::Invalid(format!("hotkey: {error}")))?;
    Ok(config)
}

pub fn save(config: &Config) -> Result<(), ConfigError> {
    validate(config)?;
    if let Some(parent) = config.config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let encoded = toml::to_string_pretty(config)?;
    std::fs::write(&config.config_path, encoded).map_err(|source| ConfigError::Io {
        path: config.config_path.clone(),
        source,
    })
}

pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_hotkey(&config.hotkey)
        .map_err(|error| ConfigError::Invalid(format!("hotkey: {error}")))?;

    parse_locale(&config.locale)
        .map_err(|error| ConfigError::Invalid(format!("locale: {error}")))?;

    if !(5..=100).contains(&config.max_rows) {
        return Err(ConfigError::Invalid(
            "max_rows must be between 5 and 100".to_string(),
        ));
    }

    if config.config_path.as_os_str().is_empty() {
        return Err(ConfigError::Invalid("config_path is required".to_string()));
    }

    Ok(())
}
