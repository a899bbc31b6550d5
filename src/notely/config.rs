use crate::error::{NotelyError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
pub const DEFAULT_API_URL: &str = "https://todo-nti.vercel.app";
pub const DEFAULT_TOKEN_HEADER: &str = "token";

pub const HOME_ENV: &str = "NOTELY_HOME";
pub const API_URL_ENV: &str = "NOTELY_API_URL";

/// Configuration for notely, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotelyConfig {
    /// Base URL of the notes service
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Request header that carries the session token
    #[serde(default = "default_token_header")]
    pub token_header: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_token_header() -> String {
    DEFAULT_TOKEN_HEADER.to_string()
}

impl Default for NotelyConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token_header: default_token_header(),
        }
    }
}

/// Keys accepted by `notely config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    ApiUrl,
    TokenHeader,
}

impl ConfigKey {
    pub fn all() -> &'static [ConfigKey] {
        &[ConfigKey::ApiUrl, ConfigKey::TokenHeader]
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "api-url" => Some(ConfigKey::ApiUrl),
            "token-header" => Some(ConfigKey::TokenHeader),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::ApiUrl => "api-url",
            ConfigKey::TokenHeader => "token-header",
        }
    }
}

impl NotelyConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(NotelyError::Io)?;
        let config: NotelyConfig =
            serde_json::from_str(&content).map_err(NotelyError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(NotelyError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(NotelyError::Serialization)?;
        fs::write(config_path, content).map_err(NotelyError::Io)?;
        Ok(())
    }

    /// Applies an API URL override, if one is given.
    pub fn with_api_url_override(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_url = url;
        }
        self
    }

    /// Applies `NOTELY_API_URL` from the environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_api_url_override(std::env::var(API_URL_ENV).ok())
    }

    pub fn get(&self, key: ConfigKey) -> &str {
        match key {
            ConfigKey::ApiUrl => &self.api_url,
            ConfigKey::TokenHeader => &self.token_header,
        }
    }

    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            ConfigKey::ApiUrl => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(NotelyError::Config(format!(
                        "api-url must start with http:// or https://, got '{}'",
                        value
                    )));
                }
                self.api_url = value.trim_end_matches('/').to_string();
            }
            ConfigKey::TokenHeader => {
                if value.is_empty() || value.contains(char::is_whitespace) {
                    return Err(NotelyError::Config(format!(
                        "token-header must be a single word, got '{}'",
                        value
                    )));
                }
                self.token_header = value.to_string();
            }
        }
        Ok(())
    }
}

/// Where notely keeps its files.
#[derive(Debug, Clone)]
pub struct NotelyPaths {
    pub data_dir: PathBuf,
}

impl NotelyPaths {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// `NOTELY_HOME` if set, the platform data directory otherwise.
    pub fn resolve() -> Result<Self> {
        if let Some(home) = std::env::var_os(HOME_ENV).filter(|h| !h.is_empty()) {
            return Ok(Self::new(PathBuf::from(home)));
        }
        let dirs = ProjectDirs::from("com", "notely", "notely").ok_or_else(|| {
            NotelyError::Config("could not determine a data directory".to_string())
        })?;
        Ok(Self::new(dirs.data_dir().to_path_buf()))
    }
}
