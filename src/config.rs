//! Servicelog configuration.
//!
//! Loaded from `~/.servicelog/config.toml`. Every key is optional and a
//! missing file means defaults.
//!
//! The data directory is resolved through a chain:
//!
//! 1. `--data-dir <path>`: explicit per-command override
//! 2. `SERVICELOG_DATA_DIR` env var
//! 3. `data-dir` in the config file
//! 4. `~/.servicelog/data`

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs, io};

use serde::Deserialize;

use crate::form::AUTOSAVE_DELAY;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "SERVICELOG_DATA_DIR";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("could not determine home directory; pass --data-dir or set {DATA_DIR_ENV}")]
    NoHome,
}

/// Servicelog configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Where store sections are kept.
    pub data_dir: Option<PathBuf>,

    /// Quiet period before a draft edit is saved, in milliseconds.
    pub autosave_delay_ms: Option<u64>,
}

impl Config {
    /// Load config from `~/.servicelog/config.toml`, or defaults if absent.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from a specific file, or defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The config file path: `~/.servicelog/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".servicelog").join("config.toml"))
    }

    pub fn autosave_delay(&self) -> Duration {
        self.autosave_delay_ms
            .map_or(AUTOSAVE_DELAY, Duration::from_millis)
    }

    /// Resolve the data directory from the tiered chain.
    pub fn resolve_data_dir(&self, explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
        let from_env = env::var_os(DATA_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        resolve_data_dir(explicit, from_env, self.data_dir.as_deref())
    }
}

fn resolve_data_dir(
    explicit: Option<&Path>,
    from_env: Option<PathBuf>,
    from_config: Option<&Path>,
) -> Result<PathBuf, ConfigError> {
    // 1. Explicit --data-dir flag.
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }

    // 2. SERVICELOG_DATA_DIR environment variable.
    if let Some(dir) = from_env {
        return Ok(dir);
    }

    // 3. data-dir in config.toml.
    if let Some(dir) = from_config {
        return Ok(dir.to_path_buf());
    }

    crate::storage::Storage::default_root().ok_or(ConfigError::NoHome)
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.autosave_delay(), Duration::from_millis(500));
    }

    #[test]
    fn parses_kebab_case_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "data-dir = \"/srv/fleet\"\nautosave-delay-ms = 1200\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/fleet")));
        assert_eq!(config.autosave_delay(), Duration::from_millis(1200));
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "autosave-delay-ms = \"soon\"").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn explicit_beats_env_beats_config() {
        let explicit = Path::new("/explicit");
        let env = PathBuf::from("/env");
        let config = Path::new("/config");

        let dir = resolve_data_dir(Some(explicit), Some(env.clone()), Some(config)).unwrap();
        assert_eq!(dir, explicit);

        let dir = resolve_data_dir(None, Some(env.clone()), Some(config)).unwrap();
        assert_eq!(dir, env);

        let dir = resolve_data_dir(None, None, Some(config)).unwrap();
        assert_eq!(dir, config);
    }
}
