//! Service configuration
//!
//! Loaded from an optional TOML file, then overridden by `CATALOG_*`
//! environment variables. Every section has defaults, so an empty file (or no
//! file) yields a runnable production configuration.

use std::{fmt, net::SocketAddr, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

/// Environment variable names read by [`CatalogConfig::apply_env`]
pub mod env {
    pub const ENVIRONMENT: &str = "CATALOG_ENVIRONMENT";
    pub const URLS: &str = "CATALOG_URLS";
    pub const HTTP_PORTS: &str = "CATALOG_HTTP_PORTS";
    pub const LOG_JSON: &str = "CATALOG_LOG_JSON";
}

/// Configuration loading failures
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: &'static str, message: String },
}

impl ConfigError {
    fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            message: message.into(),
        }
    }
}

/// Deployment environment; controls how much error detail clients see.
///
/// Defaults to `Production`. Development, which exposes raw failure messages,
/// must be selected explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(ConfigError::invalid(
                "environment",
                format!("unknown environment '{other}'"),
            )),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Development => "development",
            Self::Production => "production",
        })
    }
}

/// Listening addresses.
///
/// `urls` is a `;`-separated list such as `http://localhost:5000`. When unset,
/// one `http://0.0.0.0:{port}` URL is built per entry of `http_ports`.
/// Only plain HTTP is served; `https://` URLs are rejected by
/// [`HostingConfig::socket_addrs`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostingConfig {
    pub urls: Option<String>,
    pub http_ports: String,
}

impl Default for HostingConfig {
    fn default() -> Self {
        Self {
            urls: None,
            http_ports: "8080".to_string(),
        }
    }
}

impl HostingConfig {
    /// URLs to bind, rewritten to listen on every IPv4 interface.
    ///
    /// `localhost` and `127.0.0.1` become `0.0.0.0`; IPv6-only `[::]`
    /// bindings are dropped.
    pub fn resolved_urls(&self) -> Vec<String> {
        match self.urls.as_deref().filter(|urls| !urls.trim().is_empty()) {
            Some(urls) => urls
                .split(';')
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(|url| url.replace("localhost", "0.0.0.0").replace("127.0.0.1", "0.0.0.0"))
                .filter(|url| !url.contains("[::]"))
                .collect(),
            None => self
                .http_ports
                .split(';')
                .map(str::trim)
                .filter(|port| !port.is_empty())
                .map(|port| format!("http://0.0.0.0:{port}"))
                .collect(),
        }
    }

    /// Socket addresses for the resolved URLs
    pub fn socket_addrs(&self) -> Result<Vec<SocketAddr>, ConfigError> {
        let addrs = self
            .resolved_urls()
            .iter()
            .map(|url| parse_http_url(url))
            .collect::<Result<Vec<_>, _>>()?;

        if addrs.is_empty() {
            return Err(ConfigError::invalid("hosting", "no listening address configured"));
        }
        Ok(addrs)
    }
}

fn parse_http_url(url: &str) -> Result<SocketAddr, ConfigError> {
    let authority = url
        .strip_prefix("http://")
        .ok_or_else(|| ConfigError::invalid("hosting.urls", format!("'{url}' is not an http URL")))?;
    let authority = authority.split('/').next().unwrap_or(authority);
    let authority = match authority.rsplit_once(':') {
        Some(("*" | "+", port)) => format!("0.0.0.0:{port}"),
        Some(_) => authority.to_string(),
        None => format!("{authority}:80"),
    };

    authority
        .parse()
        .map_err(|e| ConfigError::invalid("hosting.urls", format!("'{url}': {e}")))
}

/// HTTP adapter limits and CORS
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub max_body_bytes: usize,
    /// Allowed CORS origins; empty allows any origin
    pub allowed_origins: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 1024 * 1024,
            allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,catalog_core=debug".to_string(),
            json: false,
        }
    }
}

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub environment: Environment,
    pub hosting: HostingConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}

impl CatalogConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load the optional file, then apply process environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()
    }

    /// Apply `CATALOG_*` overrides from the process environment
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source
    pub fn apply_env_with<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(environment) = lookup(env::ENVIRONMENT) {
            self.environment = environment.parse()?;
        }
        if let Some(urls) = lookup(env::URLS) {
            self.hosting.urls = Some(urls);
        }
        if let Some(ports) = lookup(env::HTTP_PORTS) {
            self.hosting.http_ports = ports;
        }
        if let Some(json) = lookup(env::LOG_JSON) {
            self.logging.json = parse_bool(env::LOG_JSON, &json)?;
        }
        Ok(self)
    }
}

fn parse_bool(field: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::invalid(field, format!("'{other}' is not a boolean"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = CatalogConfig::from_toml_str("").unwrap();
        assert_eq!(config, CatalogConfig::default());
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.hosting.resolved_urls(), vec!["http://0.0.0.0:8080"]);
    }

    #[test]
    fn test_toml_sections() {
        let config = CatalogConfig::from_toml_str(
            r#"
            environment = "development"

            [hosting]
            http_ports = "8080;9090"

            [http]
            max_body_bytes = 2048
            allowed_origins = ["https://shop.example"]

            [logging]
            json = true
            "#,
        )
        .unwrap();

        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.http.max_body_bytes, 2048);
        assert!(config.logging.json);
        assert_eq!(config.logging.filter, LoggingConfig::default().filter);

        let addrs = config.hosting.socket_addrs().unwrap();
        assert_eq!(addrs.len(), 2);
        assert_eq!(addrs[1].port(), 9090);
    }

    #[test]
    fn test_urls_are_rewritten_for_containers() {
        let hosting = HostingConfig {
            urls: Some("http://localhost:5000; http://[::]:5001;http://127.0.0.1:5002".into()),
            ..HostingConfig::default()
        };

        assert_eq!(
            hosting.resolved_urls(),
            vec!["http://0.0.0.0:5000", "http://0.0.0.0:5002"]
        );
        let addrs = hosting.socket_addrs().unwrap();
        assert!(addrs.iter().all(|addr| addr.ip().is_unspecified()));
    }

    #[test]
    fn test_wildcard_host_and_bad_scheme() {
        assert_eq!(
            parse_http_url("http://*:7000").unwrap(),
            "0.0.0.0:7000".parse::<SocketAddr>().unwrap()
        );
        assert!(matches!(
            parse_http_url("https://0.0.0.0:443"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (env::ENVIRONMENT, "Development"),
            (env::HTTP_PORTS, "7070"),
            (env::LOG_JSON, "true"),
        ]);

        let config = CatalogConfig::default()
            .apply_env_with(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert!(config.environment.is_development());
        assert_eq!(config.hosting.resolved_urls(), vec!["http://0.0.0.0:7070"]);
        assert!(config.logging.json);
    }

    #[test]
    fn test_invalid_env_value() {
        let result = CatalogConfig::default()
            .apply_env_with(|key| (key == env::ENVIRONMENT).then(|| "staging".to_string()));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }
}
