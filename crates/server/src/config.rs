use std::path::Path;
use std::time::Duration;

use anyhow::{Context, anyhow};
use serde::Deserialize;
use talent_match_core::engine::EngineConfig;
type Result<T> = anyhow::Result<T>;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: Option<String>,
    #[serde(default = "default_access_token_expiry_mins")]
    pub access_token_expiry_mins: i64,
    #[serde(default)]
    pub allow_admin_registration: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
    /// Period of the full aggregate rebuild sweep; 0 disables it.
    #[serde(default = "default_rebuild_interval_secs")]
    pub rebuild_interval_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    /// Empty means any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("failed to deserialize server config")
    }

    /// Reads `path` when it exists, then applies `DATABASE_URL`, `JWT_SECRET`
    /// and `BIND_ADDR` from the environment.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database_url = Some(url);
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.auth.jwt_secret = Some(secret);
        }
        if let Some(addr) = lookup("BIND_ADDR") {
            self.bind_addr = addr;
        }
    }

    pub fn database_url(&self) -> Result<&str> {
        self.database_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| anyhow!("DATABASE_URL is not set"))
    }

    pub fn jwt_secret(&self) -> Result<&str> {
        self.auth
            .jwt_secret
            .as_deref()
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| anyhow!("JWT_SECRET is not set"))
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            store_timeout: Duration::from_millis(self.engine.store_timeout_ms),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            database_url: None,
            auth: AuthConfig::default(),
            engine: EngineSettings::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            access_token_expiry_mins: default_access_token_expiry_mins(),
            allow_admin_registration: false,
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            store_timeout_ms: default_store_timeout_ms(),
            rebuild_interval_secs: default_rebuild_interval_secs(),
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0:8001".to_string()
}

fn default_access_token_expiry_mins() -> i64 {
    30
}

fn default_store_timeout_ms() -> u64 {
    5_000
}

fn default_rebuild_interval_secs() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use super::ServerConfig;

    #[test]
    fn test_parse_config() {
        let raw = r#"
bind_addr = "127.0.0.1:9000"
database_url = "postgres://localhost/talent"

[auth]
jwt_secret = "s3cret"
access_token_expiry_mins = 60
allow_admin_registration = true

[engine]
store_timeout_ms = 1500

[cors]
allowed_origins = ["http://localhost:3000"]
"#;

        let config = ServerConfig::from_str(raw).expect("config should parse");
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(
            config.database_url().expect("database url"),
            "postgres://localhost/talent"
        );
        assert_eq!(config.jwt_secret().expect("secret"), "s3cret");
        assert_eq!(config.auth.access_token_expiry_mins, 60);
        assert!(config.auth.allow_admin_registration);
        assert_eq!(config.engine.store_timeout_ms, 1500);
        assert_eq!(config.engine.rebuild_interval_secs, 300);
        assert_eq!(
            config.engine_config().store_timeout,
            std::time::Duration::from_millis(1500)
        );
        assert_eq!(config.cors.allowed_origins, vec!["http://localhost:3000"]);
    }

    #[test]
    fn test_defaults_for_empty_config() {
        let config = ServerConfig::from_str("").expect("empty config should parse");

        assert_eq!(config.bind_addr, "0.0.0.0:8001");
        assert_eq!(config.auth.access_token_expiry_mins, 30);
        assert!(!config.auth.allow_admin_registration);
        assert!(config.cors.allowed_origins.is_empty());
        assert!(config.database_url().is_err());
        assert!(config.jwt_secret().is_err());
    }

    #[test]
    fn test_environment_overrides_file_values() {
        let mut config =
            ServerConfig::from_str("database_url = \"sqlite::memory:\"").expect("config");

        config.apply_overrides(|key| match key {
            "DATABASE_URL" => Some("postgres://db/prod".to_string()),
            "JWT_SECRET" => Some("from-env".to_string()),
            _ => None,
        });

        assert_eq!(config.database_url().expect("url"), "postgres://db/prod");
        assert_eq!(config.jwt_secret().expect("secret"), "from-env");
        assert_eq!(config.bind_addr, "0.0.0.0:8001");
    }
}
