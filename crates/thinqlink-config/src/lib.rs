//! Bridge configuration: TOML file + environment, credential resolution,
//! and translation into `thinqlink-api` / `thinqlink-core` types.
//!
//! Consumers never hand-assemble sessions or sync settings -- they load a
//! [`BridgeConfig`] and call [`BridgeConfig::session`] /
//! [`BridgeConfig::sync_config`], the single boundary where config types
//! cross into library types.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use thinqlink_api::{Session, ThinqClient, TlsMode, TransportConfig};
use thinqlink_core::SyncConfig;

// ── Errors ───────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("no access token configured -- set `access_token` in {path} or THINQLINK_ACCESS_TOKEN")]
    NoCredentials { path: String },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error(transparent)]
    Api(#[from] thinqlink_api::Error),

    #[error(transparent)]
    Core(#[from] thinqlink_core::CoreError),
}

// ── Config shape ─────────────────────────────────────────────────────

/// Bridge configuration as loaded from `thinqlink.toml` and the
/// `THINQLINK_*` environment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BridgeConfig {
    /// ThinQ service base URL. Defaults to the global backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// ISO country code the account is registered in.
    #[serde(default = "default_country")]
    pub country: String,

    /// IETF language tag for API responses.
    #[serde(default = "default_language")]
    pub language: String,

    /// ThinQ access token (plaintext -- prefer THINQLINK_ACCESS_TOKEN).
    pub access_token: Option<String>,

    /// Snapshot refresh cadence in minutes. Must be at least 1.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_minutes: u64,

    /// HTTP timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Path to a custom CA certificate (corporate proxies).
    pub ca_cert: Option<PathBuf>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            country: default_country(),
            language: default_language(),
            access_token: None,
            refresh_interval_minutes: default_refresh_interval(),
            timeout_secs: default_timeout(),
            ca_cert: None,
        }
    }
}

fn default_base_url() -> String {
    thinqlink_api::DEFAULT_BASE_URL.into()
}
fn default_country() -> String {
    "US".into()
}
fn default_language() -> String {
    "en-US".into()
}
fn default_refresh_interval() -> u64 {
    1
}
fn default_timeout() -> u64 {
    30
}

// ── Config file path ─────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("tech", "hyperbliss", "thinqlink")
        .map(|dirs| dirs.config_dir().join("thinqlink.toml"))
        .unwrap_or_else(|| {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("thinqlink");
            p.push("thinqlink.toml");
            p
        })
}

// ── Loading ──────────────────────────────────────────────────────────

impl BridgeConfig {
    /// Load from the default path plus the `THINQLINK_*` environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_path())
    }

    /// Load from an explicit TOML path plus the environment.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("THINQLINK_"));

        let config: Self = figment.extract().map_err(Box::new)?;
        Ok(config)
    }

    // ── Translation boundary ─────────────────────────────────────────

    /// Build the authenticated session this config describes.
    pub fn session(&self) -> Result<Session, ConfigError> {
        let token = self
            .access_token
            .clone()
            .ok_or_else(|| ConfigError::NoCredentials {
                path: config_path().display().to_string(),
            })?;
        Ok(Session {
            access_token: SecretString::from(token),
            country: self.country.clone(),
            language: self.language.clone(),
        })
    }

    /// Build a ready-to-use API client with the session installed.
    pub fn client(&self) -> Result<ThinqClient, ConfigError> {
        let base_url: url::Url =
            self.base_url
                .parse()
                .map_err(|_| ConfigError::Validation {
                    field: "base_url".into(),
                    reason: format!("invalid URL: {}", self.base_url),
                })?;

        let transport = TransportConfig {
            tls: self
                .ca_cert
                .clone()
                .map_or(TlsMode::System, TlsMode::CustomCa),
            timeout: Duration::from_secs(self.timeout_secs),
        };

        let client = ThinqClient::new(base_url, &transport)?;
        client.set_session(self.session()?);
        Ok(client)
    }

    /// Validated engine settings.
    pub fn sync_config(&self) -> Result<SyncConfig, ConfigError> {
        Ok(SyncConfig::new(self.refresh_interval_minutes)?)
    }
}
