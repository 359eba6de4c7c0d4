use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    /// Enables the application-wide password gate.
    pub allow_password: bool,
    /// Reported to the client only; the server never resets the password itself.
    pub can_be_reset: bool,
    pub pepper_secret: String,
    pub bcrypt_cost: u32,
    pub session_ttl_secs: u64,
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub upstream_timeout_secs: u64,
    pub static_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: "sqlite://wealth-tracker.db?mode=rwc".into(),
            server_host: "0.0.0.0".into(),
            server_port: 8888,
            allow_password: false,
            can_be_reset: false,
            pepper_secret: String::new(),
            bcrypt_cost: 12,
            session_ttl_secs: 15 * 60,
            openai_api_key: None,
            openai_base_url: None,
            upstream_timeout_secs: 60,
            static_dir: "public".into(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let defaults = Config::default();
        Ok(Config {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            server_host: env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_var("PORT", defaults.server_port)?,
            allow_password: flag("ALLOW_PASSWORD"),
            can_be_reset: flag("CAN_BE_RESET"),
            pepper_secret: env::var("PEPPER_SECRET").unwrap_or_default(),
            bcrypt_cost: parse_var("BCRYPT_COST", defaults.bcrypt_cost)?,
            session_ttl_secs: parse_var("SESSION_TTL_SECS", defaults.session_ttl_secs)?,
            openai_api_key: non_empty_var("OPENAI_API_KEY"),
            openai_base_url: non_empty_var("OPENAI_BASE_URL"),
            upstream_timeout_secs: parse_var(
                "UPSTREAM_TIMEOUT_SECS",
                defaults.upstream_timeout_secs,
            )?,
            static_dir: env::var("STATIC_DIR").unwrap_or(defaults.static_dir),
        })
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}

fn flag(name: &str) -> bool {
    env::var(name).map(|v| v.trim() == "true").unwrap_or(false)
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}
