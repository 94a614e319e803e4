//! Configuration loading with figment.
//!
//! Sources, lowest to highest precedence: built-in defaults, the TOML file
//! (`~/.boat-admeasurement/config.toml` unless overridden), then environment
//! variables prefixed with `BOATREG_`. Command-line flags are applied on top by
//! `main`.

use std::path::PathBuf;

use directories::{BaseDirs, UserDirs};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::listing::SortKey;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".boat-admeasurement";
const CONFIG_FILE_NAME: &str = "config.toml";
const LOG_FILE_NAME: &str = "boat-admeasurement.log";
const ENV_PREFIX: &str = "BOATREG_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the record store lives. Defaults to `~/.boat-admeasurement`.
    pub data_dir: Option<PathBuf>,
    /// Where exports are written. Defaults to the Downloads folder.
    pub export_dir: Option<PathBuf>,
    /// Log destination. Defaults to `<data_dir>/boat-admeasurement.log`.
    pub log_file: Option<PathBuf>,
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Hand each export to the system viewer once written.
    pub open_after_export: bool,
    /// Ordering the list starts with.
    pub default_sort: SortKey,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            export_dir: None,
            log_file: None,
            log_filter: "boat_admeasurement=info".to_string(),
            open_after_export: false,
            default_sort: SortKey::Date,
        }
    }
}

impl Config {
    /// Load from `config_path`, or from the default location when `None`. A
    /// missing file is not an error; figment simply contributes nothing for it.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = match config_path {
            Some(path) => path,
            None => default_data_dir()?.join(CONFIG_FILE_NAME),
        };

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.log_filter.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "log_filter must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_data_dir(),
        }
    }

    /// Configured export directory, else Downloads, else home.
    pub fn export_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.export_dir {
            return Ok(dir.clone());
        }
        let downloads = UserDirs::new().and_then(|dirs| dirs.download_dir().map(PathBuf::from));
        match downloads {
            Some(dir) => Ok(dir),
            None => home_dir(),
        }
    }

    pub fn log_file(&self) -> Result<PathBuf> {
        match &self.log_file {
            Some(path) => Ok(path.clone()),
            None => Ok(self.data_dir()?.join(LOG_FILE_NAME)),
        }
    }
}

fn home_dir() -> Result<PathBuf> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or_else(|| Error::ConfigValidation {
            message: "could not locate home directory".to_string(),
        })
}

fn default_data_dir() -> Result<PathBuf> {
    Ok(home_dir()?.join(DATA_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.default_sort, SortKey::Date);
        assert!(!config.open_after_export);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load_from(Some(tmp.path().join("absent.toml"))).unwrap();
        assert_eq!(config.data_dir, None);
        assert_eq!(config.default_sort, SortKey::Date);
    }

    #[test]
    fn toml_file_overrides_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            r#"
data_dir = "/srv/boats"
export_dir = "/srv/boats/out"
open_after_export = true
default_sort = "owner"
log_filter = "boat_admeasurement=debug"
"#,
        )
        .unwrap();

        let config = Config::load_from(Some(path)).unwrap();
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/srv/boats"));
        assert_eq!(config.export_dir().unwrap(), PathBuf::from("/srv/boats/out"));
        assert_eq!(
            config.log_file().unwrap(),
            PathBuf::from("/srv/boats/boat-admeasurement.log")
        );
        assert!(config.open_after_export);
        assert_eq!(config.default_sort, SortKey::Owner);
    }

    #[test]
    fn empty_log_filter_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "log_filter = \"  \"\n").unwrap();

        let err = Config::load_from(Some(path)).unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { .. }));
    }

    #[test]
    fn unknown_sort_key_fails_to_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "default_sort = \"tonnage\"\n").unwrap();

        let err = Config::load_from(Some(path)).unwrap_err();
        assert!(matches!(err, Error::ConfigLoad(_)));
    }
}
