use gameday_api::client::GAMEDAY_BASE;
use log::LevelFilter;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "sandlot.json";
pub const ENV_DATA_PATH: &str = "SANDLOT_DATA_PATH";
pub const ENV_GAMEDAY_URL: &str = "SANDLOT_GAMEDAY_URL";

#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory holding the schedule, master and snapshot files.
    pub data_path: PathBuf,
    pub gameday_base_url: String,
    /// Pause between dates during a catch-up sweep.
    pub catchup_delay: Duration,
    pub request_timeout: Duration,
    pub log_level: Option<LevelFilter>,
    /// A `log_level` value that did not parse; reported once logging is up.
    pub ignored_log_level: Option<String>,
}

/// `sandlot.json` as written on disk.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsFile {
    data_path: Option<PathBuf>,
    gameday_base_url: Option<String>,
    catchup_delay_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
    log_level: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    Load(PathBuf, String),
    MissingKey(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Load(path, reason) => {
                write!(f, "Error loading configuration file {}: {reason}", path.display())
            }
            ConfigError::MissingKey(key) => write!(f, "Config key {key} missing from {CONFIG_FILE}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Settings {
    /// Load `sandlot.json` from `config_dir`, then apply `SANDLOT_*` overrides.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        Self::load_with_env(config_dir, |key| std::env::var(key).ok())
    }

    fn load_with_env(
        config_dir: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let path = config_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Load(path.clone(), e.to_string()))?;
        let file: SettingsFile = serde_json::from_str(&contents)
            .map_err(|e| ConfigError::Load(path.clone(), e.to_string()))?;
        Self::resolve(file, env)
    }

    fn resolve(
        file: SettingsFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let data_path = env(ENV_DATA_PATH)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .or(file.data_path)
            .ok_or(ConfigError::MissingKey("data_path"))?;

        let gameday_base_url = env(ENV_GAMEDAY_URL)
            .filter(|u| !u.trim().is_empty())
            .or(file.gameday_base_url)
            .unwrap_or_else(|| GAMEDAY_BASE.to_owned());

        let (log_level, ignored_log_level) = match file.log_level {
            Some(level) => match level.parse::<LevelFilter>() {
                Ok(filter) => (Some(filter), None),
                Err(_) => (None, Some(level)),
            },
            None => (None, None),
        };

        Ok(Self {
            data_path,
            gameday_base_url,
            catchup_delay: Duration::from_secs(file.catchup_delay_secs.unwrap_or(5)),
            request_timeout: Duration::from_secs(file.request_timeout_secs.unwrap_or(10)),
            log_level,
            ignored_log_level,
        })
    }

    /// Settings for a data directory with every other value defaulted.
    #[cfg(test)]
    pub fn for_data_path(data_path: PathBuf) -> Self {
        Self {
            data_path,
            gameday_base_url: GAMEDAY_BASE.to_owned(),
            catchup_delay: Duration::ZERO,
            request_timeout: Duration::from_secs(10),
            log_level: None,
            ignored_log_level: None,
        }
    }
}

impl ConfigError {
    pub fn exit_code(&self) -> u8 {
        match self {
            ConfigError::Load(..) => 1,
            ConfigError::MissingKey(_) => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tmp_dir;
    use std::fs;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn reads_file_and_applies_defaults() {
        let dir = tmp_dir("settings_defaults");
        fs::write(dir.join(CONFIG_FILE), r#"{ "data_path": "/srv/sandlot/Data" }"#).unwrap();

        let settings = Settings::load_with_env(&dir, no_env).unwrap();
        assert_eq!(settings.data_path, PathBuf::from("/srv/sandlot/Data"));
        assert_eq!(settings.gameday_base_url, GAMEDAY_BASE);
        assert_eq!(settings.catchup_delay, Duration::from_secs(5));
        assert_eq!(settings.log_level, None);
    }

    #[test]
    fn env_overrides_file() {
        let dir = tmp_dir("settings_env");
        fs::write(
            dir.join(CONFIG_FILE),
            r#"{ "data_path": "/a", "log_level": "debug", "catchup_delay_secs": 0 }"#,
        )
        .unwrap();

        let env = |key: &str| match key {
            ENV_DATA_PATH => Some("/b".to_string()),
            ENV_GAMEDAY_URL => Some("http://localhost:9000".to_string()),
            _ => None,
        };
        let settings = Settings::load_with_env(&dir, env).unwrap();
        assert_eq!(settings.data_path, PathBuf::from("/b"));
        assert_eq!(settings.gameday_base_url, "http://localhost:9000");
        assert_eq!(settings.catchup_delay, Duration::ZERO);
        assert_eq!(settings.log_level, Some(LevelFilter::Debug));
    }

    #[test]
    fn unknown_log_level_is_kept_for_a_warning() {
        let dir = tmp_dir("settings_bad_level");
        fs::write(dir.join(CONFIG_FILE), r#"{ "data_path": "/a", "log_level": "chatty" }"#).unwrap();

        let settings = Settings::load_with_env(&dir, no_env).unwrap();
        assert_eq!(settings.log_level, None);
        assert_eq!(settings.ignored_log_level.as_deref(), Some("chatty"));
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let dir = tmp_dir("settings_missing");
        let err = Settings::load_with_env(&dir, no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Load(..)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn malformed_file_is_a_load_error() {
        let dir = tmp_dir("settings_malformed");
        fs::write(dir.join(CONFIG_FILE), "[DirectoryPaths]\nDataPath = Data/").unwrap();
        let err = Settings::load_with_env(&dir, no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Load(..)));
    }

    #[test]
    fn missing_data_path_is_a_key_error() {
        let dir = tmp_dir("settings_nokey");
        fs::write(dir.join(CONFIG_FILE), r#"{ "catchup_delay_secs": 1 }"#).unwrap();
        let err = Settings::load_with_env(&dir, no_env).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey("data_path")));
        assert_eq!(err.exit_code(), 2);
    }
}
