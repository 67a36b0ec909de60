//! Application configuration.
//!
//! Every field has a default, so the service starts without any file.
//! Sources, later ones winning:
//!
//! 1. `config/default.toml`
//! 2. `config/{STORE_ENV}.toml` (`STORE_ENV` defaults to `development`)
//! 3. `STORE__SECTION__KEY` environment variables

use serde::{Deserialize, Serialize};

use ::config::{Config, ConfigError, Environment, File};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub localization: LocalizationConfig,
    pub cors: CorsConfig,
    pub headers: HeadersConfig,
    pub upload: UploadConfig,
    pub logging: LoggingConfig,
    pub errors: ErrorsConfig,
    pub docs: DocsConfig,
}

impl AppConfig {
    /// # Errors
    /// A file that exists but does not parse, or a value of the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("STORE_ENV").unwrap_or_else(|_| "development".to_string());
        Self::load_from("config", &env)
    }

    /// Loads `{dir}/default` and `{dir}/{env}` plus the environment.
    ///
    /// # Errors
    /// See [`AppConfig::load`].
    pub fn load_from(dir: &str, env: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(&format!("{dir}/default")).required(false))
            .add_source(File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                Environment::with_prefix("STORE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("localization.supported")
                    .with_list_parse_key("cors.allowed_origins"),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            request_timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_seconds: u64,
    /// Log every statement sqlx runs
    pub sqlx_logging: bool,
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://store.db?mode=rwc".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_seconds: 8,
            sqlx_logging: false,
            run_migrations: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalizationConfig {
    pub default_locale: String,
    pub supported: Vec<String>,
}

impl Default for LocalizationConfig {
    fn default() -> Self {
        Self {
            default_locale: "ar".to_string(),
            supported: vec!["en".to_string(), "ar".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// `*` allows any origin
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:4200".to_string()],
            allow_credentials: false,
            max_age_seconds: 3600,
        }
    }
}

/// Static `Access-Control-*` values stamped on every response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadersConfig {
    pub allow_origin: String,
    pub allow_headers: String,
    pub allow_methods: String,
}

impl Default for HeadersConfig {
    fn default() -> Self {
        Self {
            allow_origin: "*".to_string(),
            allow_headers: "Content-Type, Authorization, Accept-Language".to_string(),
            allow_methods: "GET, POST, PUT, DELETE, OPTIONS".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub directory: String,
    pub max_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            directory: "uploads".to_string(),
            max_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Used when `RUST_LOG` is unset
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info,sqlx=warn".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorsConfig {
    /// Put raw storage and I/O fault text in error envelopes
    pub expose_internal: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    pub enabled: bool,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_sources() {
        let config = AppConfig::load_from("does-not-exist", "test").unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.localization.default_locale, "ar");
        assert_eq!(config.cors.allowed_origins, vec!["http://localhost:4200"]);
        assert_eq!(config.upload.max_bytes, 10 * 1024 * 1024);
        assert!(!config.errors.expose_internal);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config: AppConfig = Config::builder()
            .add_source(File::from_str(
                "[server]\nport = 8080\n\n[logging]\nformat = \"json\"\n",
                ::config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.database.run_migrations);
    }
}
