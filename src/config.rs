use crate::errors::AppError;
use serde::Deserialize;

/// Default reps offered by the upload form when `REP_ROSTER` is unset.
pub const DEFAULT_REP_ROSTER: [&str; 3] = ["Sam Rep", "Alex Agent", "Jess Sales"];

/// What a read against the lead store does when the store cannot be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadFallback {
    /// Substitute the built-in sample dataset and carry on.
    Sample,
    /// Return a `Transport` error to the caller.
    Surface,
}

impl std::str::FromStr for ReadFallback {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sample" => Ok(ReadFallback::Sample),
            "surface" => Ok(ReadFallback::Surface),
            other => Err(AppError::Configuration(format!(
                "LEADS_READ_FALLBACK must be 'sample' or 'surface', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub leads_api_base_url: String,
    pub port: u16,
    pub read_fallback: ReadFallback,
    pub request_timeout_secs: u64,
    pub rep_roster: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            leads_api_base_url: lookup("LEADS_API_BASE_URL")
                .ok_or_else(|| {
                    AppError::Configuration(
                        "LEADS_API_BASE_URL environment variable required".to_string(),
                    )
                })
                .and_then(|url| {
                    let url = url.trim().to_string();
                    if url.is_empty() {
                        return Err(AppError::Configuration(
                            "LEADS_API_BASE_URL cannot be empty".to_string(),
                        ));
                    }
                    let parsed = url::Url::parse(&url).map_err(|e| {
                        AppError::Configuration(format!("LEADS_API_BASE_URL is invalid: {}", e))
                    })?;
                    if parsed.scheme() != "http" && parsed.scheme() != "https" {
                        return Err(AppError::Configuration(
                            "LEADS_API_BASE_URL must start with http:// or https://".to_string(),
                        ));
                    }
                    Ok(url)
                })?,
            port: lookup("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .map_err(|_| {
                    AppError::Configuration(
                        "PORT must be a valid number between 1-65535".to_string(),
                    )
                })?,
            read_fallback: lookup("LEADS_READ_FALLBACK")
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.parse::<ReadFallback>())
                .transpose()?
                .unwrap_or(ReadFallback::Sample),
            request_timeout_secs: lookup("LEADS_API_TIMEOUT_SECS")
                .unwrap_or_else(|| "30".to_string())
                .parse()
                .map_err(|_| {
                    AppError::Configuration(
                        "LEADS_API_TIMEOUT_SECS must be a whole number of seconds".to_string(),
                    )
                })?,
            rep_roster: lookup("REP_ROSTER")
                .map(|roster| {
                    roster
                        .split(',')
                        .map(str::trim)
                        .filter(|rep| !rep.is_empty())
                        .map(str::to_string)
                        .collect::<Vec<_>>()
                })
                .filter(|roster| !roster.is_empty())
                .unwrap_or_else(|| DEFAULT_REP_ROSTER.iter().map(|r| r.to_string()).collect()),
        };

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Lead store URL: {}", config.leads_api_base_url);
        tracing::debug!("Read fallback: {:?}", config.read_fallback);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}
