use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tracing::info;

use crate::error::ConfigError;

/// Deployment environment, chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }

    /// Search backend serving this environment.
    pub fn api_base_url(&self) -> &'static str {
        match self {
            Environment::Development => "http://127.0.0.1:8000",
            Environment::Production => "https://api.example.com",
            Environment::Test => "https://test-api.example.com",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            _ => Err(ConfigError::UnknownEnvironment(s.to_string())),
        }
    }
}

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub environment: Environment,
    pub api_base_url: String,
    pub api_timeout: Duration,
    /// Attach cookies to backend calls.
    pub with_credentials: bool,
}

impl Config {
    /// Fixed settings for `environment`, no overrides.
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment,
            api_base_url: environment.api_base_url().to_string(),
            api_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            with_credentials: true,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// `QUICKSEEK_ENV` picks the environment (default `development`);
    /// `QUICKSEEK_API_URL`, `QUICKSEEK_API_TIMEOUT_MS` and
    /// `QUICKSEEK_WITH_CREDENTIALS` override its defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = match var("QUICKSEEK_ENV") {
            Some(name) => name.parse()?,
            None => Environment::default(),
        };
        let mut config = Self::for_environment(environment);

        if let Some(url) = var("QUICKSEEK_API_URL") {
            config.api_base_url = url.trim().trim_end_matches('/').to_string();
        }

        if let Some(ms) = var("QUICKSEEK_API_TIMEOUT_MS") {
            let ms: u64 = ms.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "QUICKSEEK_API_TIMEOUT_MS",
                expected: "a number of milliseconds",
                value: ms.clone(),
            })?;
            config.api_timeout = Duration::from_millis(ms);
        }

        if let Some(flag) = var("QUICKSEEK_WITH_CREDENTIALS") {
            config.with_credentials = parse_bool(&flag).ok_or(ConfigError::InvalidValue {
                key: "QUICKSEEK_WITH_CREDENTIALS",
                expected: "true or false",
                value: flag.clone(),
            })?;
        }

        Ok(config)
    }

    pub fn log_summary(&self) {
        info!(
            environment = %self.environment,
            api_base_url = %self.api_base_url,
            api_timeout_ms = self.api_timeout.as_millis() as u64,
            with_credentials = self.with_credentials,
            "Configuration loaded"
        );
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
