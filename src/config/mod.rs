use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub guard: GuardConfig,
    pub menu: MenuConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Fixed key the bearer token is persisted under
    pub token_key: String,
    /// Directory holding the persisted token; `None` uses the default config dir
    pub storage_dir: Option<PathBuf>,
    pub login_path: String,
    pub landing_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardConfig {
    pub denial_delay_ms: u64,
    pub default_redirect: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuConfig {
    /// Serve the static default menu when the module list is unavailable or empty
    pub fallback_enabled: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides
        if let Ok(v) = env::var("ADMIN_API_BASE_URL") {
            self.api.base_url = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("ADMIN_API_TIMEOUT_SECS") {
            self.api.request_timeout_secs = v.parse().unwrap_or(self.api.request_timeout_secs);
        }

        // Session overrides
        if let Ok(v) = env::var("ADMIN_STORAGE_DIR") {
            self.session.storage_dir = Some(PathBuf::from(v));
        }
        if let Ok(v) = env::var("ADMIN_LOGIN_PATH") {
            self.session.login_path = v;
        }
        if let Ok(v) = env::var("ADMIN_LANDING_PATH") {
            self.session.landing_path = v;
        }

        // Guard overrides
        if let Ok(v) = env::var("ADMIN_DENIAL_DELAY_MS") {
            self.guard.denial_delay_ms = v.parse().unwrap_or(self.guard.denial_delay_ms);
        }
        if let Ok(v) = env::var("ADMIN_DEFAULT_REDIRECT") {
            self.guard.default_redirect = v;
        }

        // Menu overrides
        if let Ok(v) = env::var("ADMIN_MENU_FALLBACK") {
            self.menu.fallback_enabled = v.parse().unwrap_or(self.menu.fallback_enabled);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: "http://localhost:5000/api".to_string(),
                request_timeout_secs: 30,
            },
            session: SessionConfig::default(),
            guard: GuardConfig::default(),
            menu: MenuConfig { fallback_enabled: true },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                base_url: "https://staging-api.example.org/api".to_string(),
                request_timeout_secs: 15,
            },
            session: SessionConfig::default(),
            guard: GuardConfig::default(),
            menu: MenuConfig { fallback_enabled: true },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: "https://api.example.org/api".to_string(),
                request_timeout_secs: 10,
            },
            session: SessionConfig::default(),
            guard: GuardConfig::default(),
            menu: MenuConfig { fallback_enabled: true },
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_key: "admin_token".to_string(),
            storage_dir: None,
            login_path: "/login".to_string(),
            landing_path: "/dashboard".to_string(),
        }
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            denial_delay_ms: 1000,
            default_redirect: crate::guard::DEFAULT_REDIRECT.to_string(),
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl GuardConfig {
    pub fn denial_delay(&self) -> Duration {
        Duration::from_millis(self.denial_delay_ms)
    }
}

impl SessionConfig {
    /// Directory the token file lives in
    pub fn resolve_storage_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.storage_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_config_dir(),
        }
    }
}

/// `$ADMIN_CLI_CONFIG_DIR`, or `~/.config/donation-admin`
pub fn default_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(custom_dir) = env::var("ADMIN_CLI_CONFIG_DIR") {
        return Ok(PathBuf::from(custom_dir));
    }

    let home = env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
    Ok(PathBuf::from(home).join(".config").join("donation-admin"))
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.api.base_url, "http://localhost:5000/api");
        assert_eq!(config.session.token_key, "admin_token");
        assert_eq!(config.guard.denial_delay(), Duration::from_millis(1000));
        assert!(config.menu.fallback_enabled);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.api.base_url.starts_with("https://"));
        assert_eq!(config.api.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.session.login_path, "/login");
        assert_eq!(config.guard.default_redirect, "/dashboard");
    }

    #[test]
    fn test_explicit_storage_dir_wins() {
        let mut session = SessionConfig::default();
        session.storage_dir = Some(PathBuf::from("/tmp/admin-tokens"));
        assert_eq!(session.resolve_storage_dir().unwrap(), PathBuf::from("/tmp/admin-tokens"));
    }
}
