//! Console configuration at ~/.config/eventdesk/config.toml.
//!
//! The file is layered under `EVENTDESK_*` environment variables, so
//! `EVENTDESK_BASE_URL=http://backend:8000/` overrides `base_url`.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{EventDeskError, EventDeskResult};

static DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const ENV_PREFIX: &str = "EVENTDESK";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// What the import dialog does when more than one file is dropped at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiFilePolicy {
    /// Refuse the whole drop and ask for a single file.
    #[default]
    Reject,
    /// Keep the first file, ignore the rest.
    TakeFirst,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend root; endpoint paths such as `api/get-events/` are joined onto it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub multi_file_policy: MultiFilePolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            multi_file_policy: MultiFilePolicy::default(),
        }
    }
}

impl AppConfig {
    pub fn config_path() -> EventDeskResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| EventDeskError::Config("Could not determine config directory".into()))?
            .join("eventdesk");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, writing a commented template first
    /// if nothing is there yet.
    pub fn load() -> EventDeskResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> EventDeskResult<Self> {
        Self::load_layered(path, Environment::with_prefix(ENV_PREFIX))
    }

    /// `path` overridden by `env`.
    fn load_layered(path: &Path, env: Environment) -> EventDeskResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(env)
            .build()
            .map_err(|e| EventDeskError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| EventDeskError::Config(e.to_string()))
    }

    /// Base URL with the trailing slash `Url::join` needs to keep the path.
    pub fn normalized_base_url(&self) -> String {
        if self.base_url.ends_with('/') {
            self.base_url.clone()
        } else {
            format!("{}/", self.base_url)
        }
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> EventDeskResult<()> {
        let contents = format!(
            "\
# eventdesk configuration

# Events backend root:
# base_url = \"{DEFAULT_BASE_URL}\"

# Seconds to wait for a backend response:
# timeout_secs = {DEFAULT_TIMEOUT_SECS}

# When several files are given to `import`: \"reject\" or \"take_first\"
# multi_file_policy = \"reject\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                EventDeskError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| EventDeskError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    pub fn to_toml(&self) -> EventDeskResult<String> {
        toml::to_string_pretty(self).map_err(|e| EventDeskError::Serialization(e.to_string()))
    }
}
