//! Configuration Module
//!
//! Session/tenant configuration loaded from `config/config.toml` with
//! `ARCHIVAULT__`-prefixed environment variables layered on top. The tenant
//! (`company_id`) is optional here on purpose: the allocator refuses to
//! generate rows for a session that has none, and the caller surfaces that
//! as a configuration error instead of this module panicking at load time.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize, Default)]
pub struct ArchiveConfig {
    /// Owning tenant for every row this session creates
    #[serde(default)]
    pub company_id: Option<Uuid>,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_cache_ttl_seconds")]
    pub cache_ttl_seconds: u64,
}

fn default_api_base_url() -> String {
    "https://api.archivault.local/entities".to_string()
}

fn default_cache_ttl_seconds() -> u64 {
    300 // Five minutes between forced refreshes of list screens
}

impl ArchiveConfig {
    /// Load the archive configuration from `config/config.toml`, falling back to env vars.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("config/config.toml").required(false))
            .add_source(Environment::with_prefix("ARCHIVAULT").separator("__"));

        let settings = match builder.build() {
            Ok(cfg) => cfg,
            // A present-but-unreadable file must not block the session:
            // warn and retry with env vars alone.
            Err(err) => {
                if std::path::Path::new("config/config.toml").exists() {
                    log::warn!("Failed to load config file, falling back to env. Error: {err}");
                }
                Config::builder()
                    .add_source(Environment::with_prefix("ARCHIVAULT").separator("__"))
                    .build()
                    .map_err(|env_err| {
                        ConfigError::Message(format!(
                            "Failed to load configuration from file and env: {err}, then env-only error: {env_err}"
                        ))
                    })?
            }
        };

        settings.get::<ArchiveConfig>("archive").map_err(|e| {
            ConfigError::Message(format!(
                "Archive configuration could not be loaded from file or environment: {e}"
            ))
        })
    }

    /// Cache TTL as a `Duration`, for `ResponseCache::new`.
    pub fn cache_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.cache_ttl_seconds)
    }
}
