//! Process configuration for the survey service, read once at startup.
//!
//! Every setting comes from the environment (`.env` is loaded by `main`).
//! A malformed value aborts startup with the variable's name.

use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

/// Settings for binding, CORS, timeouts, the survey store and token checks.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins of the survey editor clients.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// PostgreSQL URL. `None` runs against the in-memory store.
    pub database_url: Option<String>,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:8081`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `DATABASE_URL`         | unset (in-memory store)    |
    ///
    /// JWT settings are documented on [`JwtConfig::from_env`].
    pub fn from_env() -> Self {
        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: parse_env("PORT", 3000),
            cors_origins: split_origins(&env_or("CORS_ORIGINS", "http://localhost:8081")),
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", 30),
            database_url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.is_empty()),
            jwt: JwtConfig::from_env(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|_| panic!("{key} must be a valid {}", std::any::type_name::<T>())),
        Err(_) => default,
    }
}

/// Comma-separated origins, blanks dropped.
fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blanks_dropped() {
        assert_eq!(
            split_origins(" http://localhost:8081, ,https://app.tempo.new "),
            vec!["http://localhost:8081", "https://app.tempo.new"]
        );
        assert!(split_origins("").is_empty());
    }

    #[test]
    fn unset_variable_falls_back_to_default() {
        let port: u16 = parse_env("TEMPO_TEST_UNSET_PORT", 3000);
        assert_eq!(port, 3000);
    }
}
