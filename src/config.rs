//! Process-wide configuration loaded once from the environment, mirroring
//! the original system's `utils/config.py`: a Redis connection section and
//! an application section (hop bound, bin traversal bound, default fee).

use once_cell::sync::Lazy;

/// Connection parameters for the persistence layer.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub db: i64,
    pub password: Option<String>,
    pub tls: bool,
}

impl RedisConfig {
    fn from_env() -> Self {
        Self {
            host: std::env::var("REDIS_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("REDIS_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(6379),
            db: std::env::var("REDIS_DB")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            password: std::env::var("REDIS_PASSWORD").ok(),
            tls: std::env::var("REDIS_TLS")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }

    /// Builds the `redis://` URL the `redis` crate's client accepts.
    pub fn connection_url(&self) -> String {
        let scheme = if self.tls { "rediss" } else { "redis" };
        match &self.password {
            Some(pw) => format!("{scheme}://:{pw}@{}:{}/{}", self.host, self.port, self.db),
            None => format!("{scheme}://{}:{}/{}", self.host, self.port, self.db),
        }
    }
}

/// Application-level tunables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub debug: bool,
    pub max_hops: usize,
    pub max_bin_traversal: usize,
    pub default_fee_rate_bps: u32,
}

impl AppConfig {
    fn from_env() -> Self {
        Self {
            debug: std::env::var("DEBUG")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            max_hops: std::env::var("MAX_HOPS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            max_bin_traversal: std::env::var("MAX_BIN_TRAVERSAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            default_fee_rate_bps: std::env::var("DEFAULT_FEE_RATE_BPS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }
}

pub static REDIS_CONFIG: Lazy<RedisConfig> = Lazy::new(RedisConfig::from_env);
pub static APP_CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

/// Loads `.env` (if present) and forces the lazily-built config statics to
/// initialize. Call once at process start, before any other config access.
pub fn init() {
    dotenv::dotenv().ok();
    Lazy::force(&REDIS_CONFIG);
    Lazy::force(&APP_CONFIG);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redis_url_without_password() {
        let cfg = RedisConfig {
            host: "localhost".into(),
            port: 6379,
            db: 0,
            password: None,
            tls: false,
        };
        assert_eq!(cfg.connection_url(), "redis://localhost:6379/0");
    }

    #[test]
    fn redis_url_with_password_and_tls() {
        let cfg = RedisConfig {
            host: "localhost".into(),
            port: 6380,
            db: 2,
            password: Some("secret".into()),
            tls: true,
        };
        assert_eq!(cfg.connection_url(), "rediss://:secret@localhost:6380/2");
    }
}
