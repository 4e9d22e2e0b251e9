//! Application configuration
//!
//! Read once at startup from `labnote.yml` (or the file given with `--config`),
//! then overridden by command-line flags and `LABNOTE_*` environment variables.

use anyhow::{Context, Result};
use labnote_access::SearchConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Config file looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "labnote.yml";

const MIN_JWT_SECRET_LEN: usize = 16;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database URL (SQLite or Postgres)
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Address the API server binds to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,

    /// Secret used to sign and verify session tokens
    #[serde(default)]
    pub jwt_secret: Option<String>,

    /// Enable CORS for browser clients
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,

    /// Allowed CORS origins (localhost origins when unset)
    #[serde(default)]
    pub cors_origins: Option<Vec<String>>,

    /// Search tunables
    #[serde(default)]
    pub search: SearchConfig,
}

fn default_database_url() -> String {
    "sqlite://labnote.db?mode=rwc".to_string()
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

fn default_enable_cors() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            bind_addr: default_bind_addr(),
            jwt_secret: None,
            enable_cors: default_enable_cors(),
            cors_origins: None,
            search: SearchConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, `labnote.yml` in the working
    /// directory is used when present, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_file(path),
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load_file(&default_path)
                } else {
                    debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config = Self::parse(&content)
            .with_context(|| format!("Invalid config file: {:?}", path))?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Parse config from YAML string
    pub fn parse(content: &str) -> Result<Self> {
        // An empty file is a valid, all-default config
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: AppConfig =
            serde_yaml::from_str(content).context("Failed to parse YAML config")?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.search
            .validate()
            .context("Invalid search configuration")?;

        if let Some(secret) = &self.jwt_secret {
            check_jwt_secret(secret)?;
        }

        Ok(())
    }

    /// The JWT secret, which every command touching sessions requires.
    ///
    /// Checked here as well as in `validate` since flags and environment
    /// variables override the file after it was parsed.
    pub fn require_jwt_secret(&self) -> Result<&str> {
        let secret = self
            .jwt_secret
            .as_deref()
            .context("No JWT secret configured (set jwt_secret or LABNOTE_JWT_SECRET)")?;
        check_jwt_secret(secret)?;
        Ok(secret)
    }
}

fn check_jwt_secret(secret: &str) -> Result<()> {
    if secret.len() < MIN_JWT_SECRET_LEN {
        anyhow::bail!(
            "jwt_secret must be at least {} bytes long",
            MIN_JWT_SECRET_LEN
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr.port(), 8080);
        assert!(config.enable_cors);
        assert_eq!(config.search, SearchConfig::default());
        assert!(config.require_jwt_secret().is_err());
    }

    #[test]
    fn test_parse_partial_config() {
        let yaml = r#"
database_url: "postgres://lab@localhost/labnote"
jwt_secret: "0123456789abcdef0123"
search:
  search_limit: 50
"#;
        let config = AppConfig::parse(yaml).unwrap();

        assert_eq!(config.database_url, "postgres://lab@localhost/labnote");
        assert_eq!(config.bind_addr, default_bind_addr());
        assert_eq!(config.search.search_limit, 50);
        assert_eq!(config.search.no_limit_sentinel, -1);
        assert_eq!(config.require_jwt_secret().unwrap(), "0123456789abcdef0123");
    }

    #[test]
    fn test_parse_empty_config() {
        let config = AppConfig::parse("   \n").unwrap();
        assert_eq!(config.database_url, default_database_url());
    }

    #[test]
    fn test_rejects_invalid_search_config() {
        let yaml = "search:\n  search_limit: 0\n";
        assert!(AppConfig::parse(yaml).is_err());

        let yaml = "search:\n  no_limit_sentinel: 2\n";
        assert!(AppConfig::parse(yaml).is_err());
    }

    #[test]
    fn test_rejects_short_secret() {
        assert!(AppConfig::parse("jwt_secret: short\n").is_err());
    }

    #[test]
    fn test_overridden_secret_is_checked() {
        let mut config = AppConfig::default();
        config.jwt_secret = Some("too-short".to_string());
        assert!(config.require_jwt_secret().is_err());

        config.jwt_secret = Some("long-enough-secret-value".to_string());
        assert_eq!(
            config.require_jwt_secret().unwrap(),
            "long-enough-secret-value"
        );
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "bind_addr: \"0.0.0.0:9000\"").unwrap();
        writeln!(file, "enable_cors: false").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.bind_addr.port(), 9000);
        assert!(!config.enable_cors);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load(Some(&dir.path().join("absent.yml")));

        assert!(result.is_err());
    }
}
