use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::error::{FbError, Result};

pub const STATE_DIR_NAME: &str = ".fb";
pub const CONFIG_FILE_NAME: &str = "config.yaml";
const AUTH_KEY_ENV: &str = "FB_AUTH_KEY";

pub const YAML_HINTS: &str = "Common YAML mistakes to check:
  • Use spaces, not tabs, for indentation
  • Check that each field has a colon followed by a space
  • Make sure quotes are properly matched

Example of a valid configuration:

auth_key: your-api-key-here
org_id: your-org-id
user_email: you@example.com";

#[derive(Deserialize, Serialize, Default, Debug, Clone)]
pub struct Config {
    #[serde(default)]
    pub auth_key: String,
    #[serde(default)]
    pub org_id: String,
    #[serde(default)]
    pub user_email: String,
}

impl Config {
    /// Loads and validates `~/.fb/config.yaml`.
    pub fn load() -> Result<Self> {
        Self::load_from(&state_dir()?)
    }

    /// Loads and validates `config.yaml` inside `dir`.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        let mut config = Self::read(&path)?;

        if let Ok(key) = std::env::var(AUTH_KEY_ENV) {
            if !key.trim().is_empty() {
                config.auth_key = key;
            }
        }

        config.validate()?;
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(FbError::ConfigMissing {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => {
                return Err(FbError::ConfigRead {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };

        // An empty document deserializes to unit, not to a mapping.
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }

        serde_yaml::from_str(&contents).map_err(|e| FbError::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// All three fields are required; blank counts as missing.
    pub fn validate(&self) -> Result<()> {
        if self.auth_key.trim().is_empty() {
            return Err(FbError::MissingField("auth_key"));
        }
        if self.org_id.trim().is_empty() {
            return Err(FbError::MissingField("org_id"));
        }
        if self.user_email.trim().is_empty() {
            return Err(FbError::MissingField("user_email"));
        }
        Ok(())
    }

    pub fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(CONFIG_FILE_NAME);
        let write_err = |source| FbError::ConfigWrite {
            path: path.clone(),
            source,
        };

        crate::state::ensure_private_dir(dir).map_err(write_err)?;
        let contents = serde_yaml::to_string(self).map_err(|e| FbError::ConfigWrite {
            path: path.clone(),
            source: std::io::Error::other(e),
        })?;
        crate::state::write_private_file(&path, contents.as_bytes()).map_err(write_err)?;

        Ok(path)
    }
}

/// `~/.fb`, holding the config file and the local checkout state.
pub fn state_dir() -> Result<PathBuf> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(STATE_DIR_NAME))
        .ok_or(FbError::NoHomeDir)
}

pub fn first_run_message(path: &Path) -> String {
    format!(
        "Welcome to fb! Let's get you set up.

Create a configuration file at:
  {}

or run 'fb init'. The file needs these three fields:
  • auth_key   - Your Flow Boards API authentication key
  • org_id     - Your organization identifier
  • user_email - Your email address

auth_key: your-api-key-here
org_id: your-org-id
user_email: you@example.com",
        path.display()
    )
}
