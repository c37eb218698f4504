use std::error::Error;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::Level;

use crate::logging::{parse_level, LogFormat};
use crate::progress::TimeRange;

const APP_DIR: &str = "gymtrack";
const CONFIG_FILE: &str = "config.toml";
const DATA_DIR: &str = ".gymtrack";
const DB_FILE: &str = "gymtrack.sqlite";

/// Settings read from `config.toml`, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: Option<PathBuf>,
    pub log_level: Level,
    pub log_format: LogFormat,
    pub default_range: TimeRange,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: Level::WARN,
            log_format: LogFormat::default(),
            default_range: TimeRange::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfigFile {
    storage: RawStorage,
    log: RawLog,
    progress: RawProgress,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawStorage {
    db_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawLog {
    level: Option<String>,
    format: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawProgress {
    default_range: Option<String>,
}

impl AppConfig {
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let file: RawConfigFile = toml::from_str(raw)?;
        let mut config = AppConfig::default();

        if let Some(path) = file.storage.db_path.as_deref().map(str::trim) {
            if path.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "storage.db_path must not be empty".to_string(),
                ));
            }
            config.db_path = Some(PathBuf::from(path));
        }
        if let Some(level) = file.log.level.as_deref() {
            config.log_level = parse_level(level).map_err(ConfigError::InvalidValue)?;
        }
        if let Some(format) = file.log.format.as_deref() {
            config.log_format = format.parse().map_err(ConfigError::InvalidValue)?;
        }
        if let Some(range) = file.progress.default_range.as_deref() {
            config.default_range = range
                .parse()
                .map_err(|err: crate::progress::ParseTimeRangeError| {
                    ConfigError::InvalidValue(format!("progress.default_range: {err}"))
                })?;
        }
        Ok(config)
    }

    /// Load from an explicit path, which must exist, or from the default
    /// location, where a missing file means defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    config_path_from(
        std::env::var_os("XDG_CONFIG_HOME"),
        std::env::var_os("HOME"),
    )
}

fn config_path_from(xdg_config_home: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    let base = xdg_config_home
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            home.filter(|value| !value.is_empty())
                .map(|home| PathBuf::from(home).join(".config"))
        })?;
    Some(base.join(APP_DIR).join(CONFIG_FILE))
}

fn default_db_path_from(home: Option<OsString>) -> PathBuf {
    let base = home
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    base.join(DATA_DIR).join(DB_FILE)
}

/// Flag or env value first, then the config file, then `~/.gymtrack/`.
pub fn resolve_db_path(cli_value: Option<&str>, config: &AppConfig) -> PathBuf {
    cli_value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(|| config.db_path.clone())
        .unwrap_or_else(|| default_db_path_from(std::env::var_os("HOME")))
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Toml(toml::de::Error),
    InvalidValue(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read config {}: {}", path.display(), source)
            }
            ConfigError::Toml(err) => write!(f, "invalid config TOML: {}", err),
            ConfigError::InvalidValue(message) => write!(f, "invalid config value: {}", message),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Toml(err) => Some(err),
            ConfigError::InvalidValue(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        ConfigError::Toml(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        config_path_from, default_db_path_from, resolve_db_path, AppConfig, ConfigError,
    };
    use crate::logging::LogFormat;
    use crate::progress::TimeRange;
    use std::ffi::OsString;
    use std::path::PathBuf;
    use tracing::Level;

    #[test]
    fn empty_file_yields_defaults() {
        let config = AppConfig::from_toml("").expect("empty config should parse");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.log_level, Level::WARN);
        assert_eq!(config.default_range, TimeRange::All);
    }

    #[test]
    fn every_section_is_read() {
        let config = AppConfig::from_toml(
            r#"
[storage]
db_path = "/data/gym.sqlite"

[log]
level = "debug"
format = "json"

[progress]
default_range = "90d"
"#,
        )
        .expect("config should parse");
        assert_eq!(config.db_path, Some(PathBuf::from("/data/gym.sqlite")));
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.default_range, TimeRange::NinetyDays);
    }

    #[test]
    fn bad_values_and_unknown_keys_are_rejected() {
        assert!(matches!(
            AppConfig::from_toml("[log]\nlevel = \"loud\"\n"),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            AppConfig::from_toml("[progress]\ndefault_range = \"2W\"\n"),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            AppConfig::from_toml("[storage]\ndb_path = \"  \"\n"),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            AppConfig::from_toml("[storage]\ndatabase = \"x\"\n"),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            AppConfig::from_toml("not = [valid"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let path = std::env::temp_dir().join(format!(
            "gymtrack-config-missing-{}.toml",
            uuid::Uuid::now_v7()
        ));
        let err = AppConfig::load(Some(&path)).expect_err("missing explicit config should fail");
        assert!(err.to_string().contains("failed to read config"));
    }

    #[test]
    fn explicit_file_is_loaded() {
        let path = std::env::temp_dir().join(format!(
            "gymtrack-config-{}.toml",
            uuid::Uuid::now_v7()
        ));
        std::fs::write(&path, "[log]\nformat = \"compact\"\n").expect("config should write");
        let config = AppConfig::load(Some(&path)).expect("config should load");
        assert_eq!(config.log_format, LogFormat::Compact);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn config_path_prefers_xdg_then_home() {
        assert_eq!(
            config_path_from(Some(OsString::from("/xdg")), Some(OsString::from("/home/u"))),
            Some(PathBuf::from("/xdg/gymtrack/config.toml"))
        );
        assert_eq!(
            config_path_from(Some(OsString::new()), Some(OsString::from("/home/u"))),
            Some(PathBuf::from("/home/u/.config/gymtrack/config.toml"))
        );
        assert_eq!(config_path_from(None, None), None);
    }

    #[test]
    fn db_path_precedence_is_flag_then_config_then_default() {
        let configured = AppConfig {
            db_path: Some(PathBuf::from("/from/config.sqlite")),
            ..AppConfig::default()
        };
        assert_eq!(
            resolve_db_path(Some("/from/flag.sqlite"), &configured),
            PathBuf::from("/from/flag.sqlite")
        );
        assert_eq!(
            resolve_db_path(None, &configured),
            PathBuf::from("/from/config.sqlite")
        );
        assert_eq!(
            default_db_path_from(Some(OsString::from("/home/u"))),
            PathBuf::from("/home/u/.gymtrack/gymtrack.sqlite")
        );
        assert_eq!(
            default_db_path_from(None),
            PathBuf::from("./.gymtrack/gymtrack.sqlite")
        );
    }
}
