use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BUCKET: &str = "kintobot";
pub const DEFAULT_COLLECTION: &str = "wall";
/// Max records fetched on startup.
pub const DEFAULT_LIMIT: u32 = 100;
/// Rotation delay between two displayed records.
pub const DEFAULT_REFRESH_MS: u64 = 10_000;
/// Cadence of the change-poll loop.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Top-level config (wallcast.toml + WALLCAST_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WallConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub wall: WallSection,
}

/// Where the record store lives and how to authenticate against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL including the API version, e.g. `https://kinto.example/v1`.
    pub url: String,
    #[serde(default = "default_bucket")]
    pub bucket: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Optional Basic credentials; the wall collection is world-readable on
    /// the reference deployment, so this is usually absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<BasicAuth>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicAuth {
    pub user: String,
    pub password: String,
}

/// Rotation and synchronization tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WallSection {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default = "default_refresh_ms")]
    pub refresh_ms: u64,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Prefetch upcoming image media into the cache.
    #[serde(default = "bool_true")]
    pub preload: bool,
}

impl Default for WallSection {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            refresh_ms: DEFAULT_REFRESH_MS,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            preload: true,
        }
    }
}

impl WallConfig {
    /// Load config from a TOML file with WALLCAST_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ./wallcast.toml
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path.unwrap_or("wallcast.toml");

        let config: WallConfig = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("WALLCAST_").split("_"))
            .extract()
            .map_err(|e| crate::error::WallError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_bucket() -> String {
    DEFAULT_BUCKET.to_string()
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

fn default_refresh_ms() -> u64 {
    DEFAULT_REFRESH_MS
}

fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

fn bool_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_toml_gets_defaults() {
        let config: WallConfig = Figment::new()
            .merge(Toml::string(r#"[server]
url = "https://kinto.example/v1""#))
            .extract()
            .unwrap();

        assert_eq!(config.server.bucket, DEFAULT_BUCKET);
        assert_eq!(config.server.collection, DEFAULT_COLLECTION);
        assert_eq!(config.wall.limit, DEFAULT_LIMIT);
        assert_eq!(config.wall.refresh_ms, DEFAULT_REFRESH_MS);
        assert!(config.wall.preload);
        assert!(config.server.auth.is_none());
    }

    #[test]
    fn explicit_values_win() {
        let config: WallConfig = Figment::new()
            .merge(Toml::string(
                r#"
                [server]
                url = "https://kinto.example/v1"
                bucket = "photos"

                [server.auth]
                user = "wall"
                password = "secret"

                [wall]
                refresh_ms = 7000
                preload = false
                "#,
            ))
            .extract()
            .unwrap();

        assert_eq!(config.server.bucket, "photos");
        assert_eq!(config.wall.refresh_ms, 7000);
        assert!(!config.wall.preload);
        assert_eq!(config.server.auth.unwrap().user, "wall");
    }
}
