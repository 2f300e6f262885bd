//! Service configuration.
//!
//! # Purpose
//! Resolves the full application configuration once at startup into an
//! explicit struct. Request handlers never read the process environment;
//! everything they need arrives through `AppState`.
//!
//! # Notes
//! A missing app URL is a startup-time fatal error with remediation
//! guidance; it is deliberately not part of the request-time contract.
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_ms: u64,
}

/// Application configuration sourced from environment variables, with an
/// optional YAML override file.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub metrics_bind: SocketAddr,
    pub api_key: String,
    pub api_secret: String,
    /// Public URL the platform redirects the embedded app to.
    pub app_url: String,
    /// Admin GraphQL API version, e.g. `2025-10`.
    pub api_version: String,
    /// Scopes the app declares as required, in declaration order.
    pub required_scopes: Vec<String>,
    pub storage: StorageBackend,
    pub postgres: Option<PostgresConfig>,
}

#[derive(Debug, Deserialize)]
struct AppConfigOverride {
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    app_url: Option<String>,
    api_version: Option<String>,
    required_scopes: Option<Vec<String>>,
    postgres: Option<PostgresConfig>,
}

/// Resolve the public app URL from the environment.
///
/// Priority: `SHOPIFY_APP_URL`, then the hosting provider's
/// `RENDER_EXTERNAL_URL` / `RENDER_SERVICE_URL`. Absence is fatal at
/// startup.
fn app_url_from_env() -> Result<String> {
    for key in ["SHOPIFY_APP_URL", "RENDER_EXTERNAL_URL", "RENDER_SERVICE_URL"] {
        if let Ok(value) = std::env::var(key) {
            if !value.is_empty() {
                return Ok(value);
            }
        }
    }
    bail!(
        "SHOPIFY_APP_URL environment variable is required. Set it to the app's \
         public URL (e.g. https://your-app.example.com); on Render, \
         RENDER_EXTERNAL_URL is also accepted."
    )
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = std::env::var("SHOPBRIDGE_BIND")
            .unwrap_or_else(|_| "0.0.0.0:8443".to_string())
            .parse()
            .with_context(|| "parse SHOPBRIDGE_BIND")?;
        let metrics_bind = std::env::var("SHOPBRIDGE_METRICS_BIND")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .with_context(|| "parse SHOPBRIDGE_METRICS_BIND")?;
        let api_key = std::env::var("SHOPIFY_API_KEY").unwrap_or_default();
        let api_secret = std::env::var("SHOPIFY_API_SECRET").unwrap_or_default();
        let app_url = app_url_from_env()?;
        let api_version =
            std::env::var("SHOPIFY_API_VERSION").unwrap_or_else(|_| "2025-10".to_string());
        let required_scopes = std::env::var("SCOPES")
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|scope| !scope.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let storage = match std::env::var("SHOPBRIDGE_STORAGE").as_deref() {
            Ok("postgres") => StorageBackend::Postgres,
            Ok("memory") | Err(_) => StorageBackend::Memory,
            Ok(other) => bail!("unknown SHOPBRIDGE_STORAGE backend: {other}"),
        };
        let postgres = match std::env::var("SHOPBRIDGE_PG_URL") {
            Ok(url) => Some(PostgresConfig {
                url,
                max_connections: std::env::var("SHOPBRIDGE_PG_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|value| value.parse().ok())
                    .unwrap_or(8),
                acquire_timeout_ms: std::env::var("SHOPBRIDGE_PG_ACQUIRE_TIMEOUT_MS")
                    .ok()
                    .and_then(|value| value.parse().ok())
                    .unwrap_or(2_000),
            }),
            Err(_) => None,
        };

        Ok(Self {
            bind_addr,
            metrics_bind,
            api_key,
            api_secret,
            app_url,
            api_version,
            required_scopes,
            storage,
            postgres,
        })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("SHOPBRIDGE_CONFIG") {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read SHOPBRIDGE_CONFIG: {path}"))?;
            let override_cfg: AppConfigOverride =
                serde_yaml::from_str(&contents).with_context(|| "parse config yaml")?;
            if let Some(value) = override_cfg.bind_addr {
                config.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
            }
            if let Some(value) = override_cfg.metrics_bind {
                config.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
            }
            if let Some(value) = override_cfg.app_url {
                config.app_url = value;
            }
            if let Some(value) = override_cfg.api_version {
                config.api_version = value;
            }
            if let Some(value) = override_cfg.required_scopes {
                config.required_scopes = value;
            }
            if let Some(value) = override_cfg.postgres {
                config.postgres = Some(value);
            }
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    struct EnvGuard {
        key: &'static str,
        prev: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let prev = std::env::var(key).ok();
            unsafe {
                std::env::set_var(key, value);
            }
            Self { key, prev }
        }

        fn unset(key: &'static str) -> Self {
            let prev = std::env::var(key).ok();
            unsafe {
                std::env::remove_var(key);
            }
            Self { key, prev }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.prev {
                Some(value) => unsafe {
                    std::env::set_var(self.key, value);
                },
                None => unsafe {
                    std::env::remove_var(self.key);
                },
            }
        }
    }

    #[test]
    #[serial]
    fn from_env_resolves_app_url_priority_chain() {
        let _g1 = EnvGuard::set("SHOPIFY_APP_URL", "https://primary.example.com");
        let _g2 = EnvGuard::set("RENDER_EXTERNAL_URL", "https://render.example.com");
        let _g3 = EnvGuard::set("SCOPES", "read_products,write_products");
        let config = AppConfig::from_env().expect("config");
        assert_eq!(config.app_url, "https://primary.example.com");
        assert_eq!(
            config.required_scopes,
            vec!["read_products".to_string(), "write_products".to_string()]
        );
    }

    #[test]
    #[serial]
    fn from_env_falls_back_to_hosting_url() {
        let _g1 = EnvGuard::unset("SHOPIFY_APP_URL");
        let _g2 = EnvGuard::set("RENDER_EXTERNAL_URL", "https://render.example.com");
        let config = AppConfig::from_env().expect("config");
        assert_eq!(config.app_url, "https://render.example.com");
    }

    #[test]
    #[serial]
    fn missing_app_url_is_a_startup_error() {
        let _g1 = EnvGuard::unset("SHOPIFY_APP_URL");
        let _g2 = EnvGuard::unset("RENDER_EXTERNAL_URL");
        let _g3 = EnvGuard::unset("RENDER_SERVICE_URL");
        let err = AppConfig::from_env().expect_err("missing url");
        assert!(err.to_string().contains("SHOPIFY_APP_URL"));
    }

    #[test]
    #[serial]
    fn storage_backend_defaults_to_memory() {
        let _g1 = EnvGuard::set("SHOPIFY_APP_URL", "https://primary.example.com");
        let _g2 = EnvGuard::unset("SHOPBRIDGE_STORAGE");
        let config = AppConfig::from_env().expect("config");
        assert_eq!(config.storage, StorageBackend::Memory);
        assert!(config.postgres.is_none());
    }

    #[test]
    #[serial]
    fn unknown_storage_backend_is_rejected() {
        let _g1 = EnvGuard::set("SHOPIFY_APP_URL", "https://primary.example.com");
        let _g2 = EnvGuard::set("SHOPBRIDGE_STORAGE", "sqlite");
        let err = AppConfig::from_env().expect_err("unknown backend");
        assert!(err.to_string().contains("sqlite"));
    }

    #[test]
    #[serial]
    fn yaml_override_wins_over_env() {
        let _g1 = EnvGuard::set("SHOPIFY_APP_URL", "https://primary.example.com");
        let dir = std::env::temp_dir().join("shopbridge-config-test");
        std::fs::create_dir_all(&dir).expect("tempdir");
        let path = dir.join("override.yaml");
        std::fs::write(
            &path,
            "app_url: https://override.example.com\nrequired_scopes:\n  - read_orders\n",
        )
        .expect("write yaml");
        let _g2 = EnvGuard::set("SHOPBRIDGE_CONFIG", path.to_str().expect("utf8 path"));

        let config = AppConfig::from_env_or_yaml().expect("config");
        assert_eq!(config.app_url, "https://override.example.com");
        assert_eq!(config.required_scopes, vec!["read_orders".to_string()]);
    }
}
