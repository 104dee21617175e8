use crate::core::query::{DEFAULT_PER_PAGE, clamp_per_page};
use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "rovertime";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_per_page")]
    pub default_per_page: u32,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_list_path")]
    pub list_path: String,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
}

/// Keys a complete configuration file carries.
pub const FIELDS: [&str; 5] = [
    "database",
    "default_per_page",
    "listen_addr",
    "list_path",
    "search_debounce_ms",
];

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}
fn default_listen_addr() -> String {
    "127.0.0.1:8080".to_string()
}
fn default_list_path() -> String {
    "/list".to_string()
}
fn default_search_debounce_ms() -> u64 {
    300
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            default_per_page: default_per_page(),
            listen_addr: default_listen_addr(),
            list_path: default_list_path(),
            search_debounce_ms: default_search_debounce_ms(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join(APP_DIR)
        } else {
            let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            home.join(format!(".{APP_DIR}"))
        }
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join(format!("{APP_DIR}.conf"))
    }

    pub fn database_file() -> PathBuf {
        Self::config_dir().join(format!("{APP_DIR}.sqlite"))
    }

    /// Load the configuration file, or defaults when there is none.
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content).map_err(|e| AppError::Config(format!("{}: {e}", path.display())))
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        let mut cfg: Config = if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(content)?
        };
        cfg.default_per_page = clamp_per_page(None, cfg.default_per_page);
        cfg.database = expand_tilde(&cfg.database).to_string_lossy().to_string();
        Ok(cfg)
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Create the config directory, write the config file (skipped in test
    /// mode) and return the database path that was configured.
    pub fn init_all(custom_db: Option<&str>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();

        let db_path = match custom_db {
            Some(name) => {
                let p = expand_tilde(name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => Self::database_file(),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        if !is_test {
            fs::create_dir_all(&dir)?;
            fs::write(Self::config_file(), config.to_yaml()?)?;
        }

        Ok(config)
    }
}

/// Keys of [`FIELDS`] absent from a YAML document; those come from defaults.
pub fn missing_fields(content: &str) -> AppResult<Vec<&'static str>> {
    let yaml: Value = if content.trim().is_empty() {
        Value::Mapping(Default::default())
    } else {
        serde_yaml::from_str(content).map_err(|e| AppError::Config(e.to_string()))?
    };

    let Some(map) = yaml.as_mapping() else {
        return Err(AppError::Config("configuration is not a YAML mapping".into()));
    };

    Ok(FIELDS
        .into_iter()
        .filter(|key| !map.contains_key(Value::String((*key).to_string())))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn older_files_fill_in_defaults() {
        let cfg = Config::from_yaml("database: /tmp/x.sqlite\n").unwrap();
        assert_eq!(cfg.database, "/tmp/x.sqlite");
        assert_eq!(cfg.default_per_page, 10);
        assert_eq!(cfg.list_path, "/list");
        assert_eq!(cfg.search_debounce(), Duration::from_millis(300));
    }

    #[test]
    fn page_size_is_clamped() {
        let cfg = Config::from_yaml("default_per_page: 500\n").unwrap();
        assert_eq!(cfg.default_per_page, 100);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rovertime.conf");
        fs::write(&path, "default_per_page: [not, a, number]\n").unwrap();
        assert!(matches!(Config::load_from(&path), Err(AppError::Config(_))));
    }

    #[test]
    fn reports_missing_keys() {
        let missing = missing_fields("database: a\nlisten_addr: 0.0.0.0:80\n").unwrap();
        assert_eq!(missing, vec!["default_per_page", "list_path", "search_debounce_ms"]);
    }

    #[test]
    fn round_trips_through_yaml() {
        let cfg = Config {
            database: "/data/ot.sqlite".into(),
            ..Config::default()
        };
        let yaml = cfg.to_yaml().unwrap();
        assert_eq!(Config::from_yaml(&yaml).unwrap(), cfg);
        assert!(missing_fields(&yaml).unwrap().is_empty());
    }
}
