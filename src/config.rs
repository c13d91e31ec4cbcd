use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Token for the upstream API; when absent the contributor endpoints
    /// answer with a configuration error instead of fetching
    pub github_token: Option<String>,
    /// Base URL of the upstream API
    pub github_api_base: String,
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Upstream request timeout in seconds (default: 30)
    pub request_timeout_secs: u64,
    /// Safety ceiling on pages fetched in one session (default: 50)
    pub max_pages_ceiling: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let github_token = env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());

        let github_api_base =
            env::var("GITHUB_API_BASE").unwrap_or_else(|_| "https://api.github.com".to_string());

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT"))?;

        let request_timeout_secs = env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("REQUEST_TIMEOUT_SECS"))?;

        let max_pages_ceiling = env::var("MAX_PAGES_CEILING")
            .unwrap_or_else(|_| "50".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("MAX_PAGES_CEILING"))?;

        Ok(Self {
            github_token,
            github_api_base,
            host,
            port,
            request_timeout_secs,
            max_pages_ceiling,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_token: None,
            github_api_base: "https://api.github.com".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            max_pages_ceiling: 50,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
