use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::transfer::ClientOptions;

/// Push-channel parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// Upper bound for one long-poll request in seconds. Must exceed the
    /// server's ping interval plus ping timeout.
    pub poll_timeout_secs: u64,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            poll_timeout_secs: 60,
        }
    }
}

/// Global configuration loaded from `~/.config/ttv/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtvConfig {
    /// Base URL of the file-sharing server.
    pub server_url: String,
    /// Response header carrying the server's SHA-256 of a download.
    pub hash_header: String,
    /// TCP/TLS connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Overall limit for one request (including the body) in seconds.
    pub request_timeout_secs: u64,
    /// Where `download` saves files when `--out` is not given (None = current dir).
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    /// Optional push-channel settings; if missing, built-in defaults are used.
    #[serde(default)]
    pub push: Option<PushConfig>,
}

impl Default for TtvConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:5000".to_string(),
            hash_header: "X-SHA256".to_string(),
            connect_timeout_secs: 15,
            request_timeout_secs: 300,
            download_dir: None,
            push: None,
        }
    }
}

impl TtvConfig {
    /// curl options for REST calls and downloads.
    pub fn client_options(&self, cookie_jar: Option<PathBuf>) -> ClientOptions {
        ClientOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: Duration::from_secs(self.request_timeout_secs),
            cookie_jar,
        }
    }

    /// curl options for push-channel long polls.
    pub fn push_client_options(&self, cookie_jar: Option<PathBuf>) -> ClientOptions {
        let push = self.push.clone().unwrap_or_default();
        ClientOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: Duration::from_secs(push.poll_timeout_secs),
            cookie_jar,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("ttv")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<TtvConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = TtvConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: TtvConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
