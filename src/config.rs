/*
 * Responsibility
 * - 環境変数 (.env 含む) からの設定読み込み
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::logger::LogLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Stage,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Result<Self, ConfigError> {
        match raw
            .unwrap_or_else(|| "dev".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "dev" | "development" => Ok(Self::Development),
            "stage" | "staging" => Ok(Self::Stage),
            "prod" | "production" => Ok(Self::Production),
            _ => Err(ConfigError::Invalid("APP_ENV")),
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: LogLevel,
    // JSON output instead of human-readable console lines
    pub production_mode: bool,
}

#[derive(Debug, Clone)]
pub struct ClientServerConfig {
    pub addr: SocketAddr,
    pub allow_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DebugServerConfig {
    pub addr: SocketAddr,
}

#[derive(Clone)]
pub struct KeycloakConfig {
    pub base_path: String,
    pub realm: String,
    pub client_id: String,
    pub client_secret: String,
    pub debug_mode: bool,
}

impl fmt::Debug for KeycloakConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeycloakConfig")
            .field("base_path", &self.base_path)
            .field("realm", &self.realm)
            .field("client_id", &self.client_id)
            .field("debug_mode", &self.debug_mode)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub required_resource: String,
    pub required_role: String,
    pub introspect_timeout: Duration,
    pub clock_skew_seconds: i64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub app_env: AppEnv,
    pub log: LogConfig,
    pub client_server: ClientServerConfig,
    pub debug_server: DebugServerConfig,
    pub keycloak: KeycloakConfig,
    pub auth: AuthConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &'static str| var(key).ok_or(ConfigError::Missing(key));

        let app_env = AppEnv::parse(var("APP_ENV"))?;

        let log = LogConfig {
            level: var("LOG_LEVEL")
                .map(|v| v.parse::<LogLevel>())
                .transpose()
                .map_err(|_| ConfigError::Invalid("LOG_LEVEL"))?
                .unwrap_or(LogLevel::Info),
            production_mode: parse_bool(var("LOG_PRODUCTION_MODE"), "LOG_PRODUCTION_MODE")?,
        };

        let client_addr = parse_addr(var("CLIENT_SERVER_ADDR"), "0.0.0.0:8080", "CLIENT_SERVER_ADDR")?;

        let allow_origins = required("CLIENT_ALLOW_ORIGINS")?
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();
        if allow_origins.is_empty() || allow_origins.iter().any(|o| Url::parse(o).is_err()) {
            return Err(ConfigError::Invalid("CLIENT_ALLOW_ORIGINS"));
        }

        let debug_addr = parse_addr(var("DEBUG_SERVER_ADDR"), "0.0.0.0:8079", "DEBUG_SERVER_ADDR")?;

        let base_path = required("KEYCLOAK_BASE_PATH")?;
        if Url::parse(&base_path).is_err() {
            return Err(ConfigError::Invalid("KEYCLOAK_BASE_PATH"));
        }

        let keycloak = KeycloakConfig {
            base_path,
            realm: required("KEYCLOAK_REALM")?,
            client_id: required("KEYCLOAK_CLIENT_ID")?,
            client_secret: required("KEYCLOAK_CLIENT_SECRET")?,
            debug_mode: parse_bool(var("KEYCLOAK_DEBUG_MODE"), "KEYCLOAK_DEBUG_MODE")?,
        };

        let introspect_timeout_ms = var("KEYCLOAK_INTROSPECT_TIMEOUT_MS")
            .map(|v| v.parse::<u64>())
            .transpose()
            .map_err(|_| ConfigError::Invalid("KEYCLOAK_INTROSPECT_TIMEOUT_MS"))?
            .unwrap_or(3000);
        if introspect_timeout_ms == 0 {
            return Err(ConfigError::Invalid("KEYCLOAK_INTROSPECT_TIMEOUT_MS"));
        }

        let clock_skew_seconds = var("AUTH_CLOCK_SKEW_SECONDS")
            .map(|v| v.parse::<u32>())
            .transpose()
            .map_err(|_| ConfigError::Invalid("AUTH_CLOCK_SKEW_SECONDS"))?
            .unwrap_or(0);

        let auth = AuthConfig {
            required_resource: var("AUTH_REQUIRED_RESOURCE")
                .unwrap_or_else(|| "chat-ui-client".to_string()),
            required_role: var("AUTH_REQUIRED_ROLE")
                .unwrap_or_else(|| "support-chat-client".to_string()),
            introspect_timeout: Duration::from_millis(introspect_timeout_ms),
            clock_skew_seconds: i64::from(clock_skew_seconds),
        };

        Ok(Self {
            app_env,
            log,
            client_server: ClientServerConfig {
                addr: client_addr,
                allow_origins,
            },
            debug_server: DebugServerConfig { addr: debug_addr },
            keycloak,
            auth,
        })
    }
}

fn parse_addr(
    raw: Option<String>,
    default: &str,
    key: &'static str,
) -> Result<SocketAddr, ConfigError> {
    SocketAddr::from_str(raw.as_deref().unwrap_or(default)).map_err(|_| ConfigError::Invalid(key))
}

fn parse_bool(raw: Option<String>, key: &'static str) -> Result<bool, ConfigError> {
    match raw.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None => Ok(false),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(_) => Err(ConfigError::Invalid(key)),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn base_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("CLIENT_ALLOW_ORIGINS", "http://localhost:3000, https://chat.example.com"),
            ("KEYCLOAK_BASE_PATH", "http://localhost:3010"),
            ("KEYCLOAK_REALM", "Bank"),
            ("KEYCLOAK_CLIENT_ID", "chat-service"),
            ("KEYCLOAK_CLIENT_SECRET", "secret"),
        ])
    }

    fn load(env: &HashMap<&'static str, &'static str>) -> Result<Config, ConfigError> {
        Config::from_lookup(|key| env.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn defaults_are_applied() {
        let config = load(&base_env()).unwrap();

        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.log.level, LogLevel::Info);
        assert!(!config.log.production_mode);
        assert_eq!(config.client_server.addr.port(), 8080);
        assert_eq!(
            config.client_server.allow_origins,
            vec!["http://localhost:3000", "https://chat.example.com"]
        );
        assert_eq!(config.debug_server.addr.port(), 8079);
        assert!(!config.keycloak.debug_mode);
        assert_eq!(config.auth.required_resource, "chat-ui-client");
        assert_eq!(config.auth.required_role, "support-chat-client");
        assert_eq!(config.auth.introspect_timeout, Duration::from_secs(3));
        assert_eq!(config.auth.clock_skew_seconds, 0);
    }

    #[test]
    fn overrides_are_parsed() {
        let mut env = base_env();
        env.insert("APP_ENV", "prod");
        env.insert("LOG_LEVEL", "debug");
        env.insert("LOG_PRODUCTION_MODE", "true");
        env.insert("CLIENT_SERVER_ADDR", "127.0.0.1:9000");
        env.insert("KEYCLOAK_DEBUG_MODE", "1");
        env.insert("KEYCLOAK_INTROSPECT_TIMEOUT_MS", "250");
        env.insert("AUTH_CLOCK_SKEW_SECONDS", "5");

        let config = load(&env).unwrap();
        assert!(config.app_env.is_production());
        assert_eq!(config.log.level, LogLevel::Debug);
        assert!(config.log.production_mode);
        assert_eq!(config.client_server.addr.to_string(), "127.0.0.1:9000");
        assert!(config.keycloak.debug_mode);
        assert_eq!(config.auth.introspect_timeout, Duration::from_millis(250));
        assert_eq!(config.auth.clock_skew_seconds, 5);
    }

    #[test]
    fn missing_required_keys_fail() {
        for key in [
            "CLIENT_ALLOW_ORIGINS",
            "KEYCLOAK_BASE_PATH",
            "KEYCLOAK_REALM",
            "KEYCLOAK_CLIENT_ID",
            "KEYCLOAK_CLIENT_SECRET",
        ] {
            let mut env = base_env();
            env.remove(key);
            match load(&env) {
                Err(ConfigError::Missing(k)) => assert_eq!(k, key),
                other => panic!("{key}: unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn invalid_values_fail() {
        for (key, value) in [
            ("APP_ENV", "qa"),
            ("LOG_LEVEL", "trace"),
            ("LOG_PRODUCTION_MODE", "maybe"),
            ("CLIENT_SERVER_ADDR", "localhost"),
            ("CLIENT_ALLOW_ORIGINS", "not a url"),
            ("CLIENT_ALLOW_ORIGINS", " , "),
            ("KEYCLOAK_BASE_PATH", "/auth"),
            ("KEYCLOAK_INTROSPECT_TIMEOUT_MS", "0"),
            ("AUTH_CLOCK_SKEW_SECONDS", "-1"),
        ] {
            let mut env = base_env();
            env.insert(key, value);
            match load(&env) {
                Err(ConfigError::Invalid(k)) => assert_eq!(k, key),
                other => panic!("{key}={value}: unexpected {other:?}"),
            }
        }
    }
}
