use std::env;
use std::time::Duration;

use quiz_core::time::DEFAULT_TIME_LIMIT_SECS;
use url::Url;

use crate::error::ConfigError;

/// Per-session settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    time_limit_secs: u32,
}

impl SessionConfig {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidTimeLimit` for a zero limit.
    pub fn new(time_limit_secs: u32) -> Result<Self, ConfigError> {
        if time_limit_secs == 0 {
            return Err(ConfigError::InvalidTimeLimit);
        }
        Ok(Self { time_limit_secs })
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
        }
    }
}

const DEFAULT_API_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for a remote quiz API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizApiConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl QuizApiConfig {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidApiUrl` if `base_url` does not parse and
    /// `ConfigError::UnsupportedScheme` for anything but http(s).
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let trimmed = base_url.trim();
        let parsed = Url::parse(trimmed).map_err(|source| ConfigError::InvalidApiUrl {
            raw: trimmed.to_string(),
            source,
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme {
                scheme: parsed.scheme().to_string(),
            });
        }
        Ok(Self {
            base_url: parsed,
            timeout: DEFAULT_API_TIMEOUT,
        })
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reads `QUIZ_API_URL` and `QUIZ_API_TIMEOUT_SECS`.
    ///
    /// Returns `Ok(None)` when no URL is set, which means the bundled bank is used.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let Ok(raw) = env::var("QUIZ_API_URL") else {
            return Ok(None);
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        let mut config = Self::new(&raw)?;
        if let Ok(raw_timeout) = env::var("QUIZ_API_TIMEOUT_SECS") {
            let secs: u64 = raw_timeout
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout {
                    raw: raw_timeout.clone(),
                })?;
            if secs == 0 {
                return Err(ConfigError::InvalidTimeout { raw: raw_timeout });
            }
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(Some(config))
    }

    /// Absolute URL for an endpoint below the base URL.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
