use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_ENDPOINT: &str = "grpc.go2.ge:443";

/// Connection settings for a [`Go2Client`](crate::client::Go2Client)
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientOptions {
    #[serde(default)]
    pub api_key: String,
    /// `host:port`, or a full URL when a scheme is given
    #[serde(default = "ClientOptions::default_endpoint")]
    pub endpoint: String,
    /// Use plain HTTP instead of TLS
    #[serde(default)]
    pub insecure: bool,
    /// Per-call timeout in milliseconds; none when unset
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl ClientOptions {
    fn default_endpoint() -> String {
        DEFAULT_ENDPOINT.to_string()
    }

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: Self::default_endpoint(),
            insecure: false,
            timeout_ms: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.timeout_ms == Some(0) {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(())
    }

    /// Load options from `GO2_API_KEY`, `GO2_ENDPOINT`, `GO2_INSECURE` and
    /// `GO2_TIMEOUT_MS`, reading a `.env` file first if there is one.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let options: ClientOptions = ::config::Config::builder()
            .set_default("endpoint", DEFAULT_ENDPOINT)?
            .add_source(::config::Environment::with_prefix("GO2").try_parsing(true))
            .build()
            .context("Failed to read GO2_* environment")?
            .try_deserialize()
            .context("Invalid GO2_* environment")?;

        options
            .validate()
            .context("Invalid GO2_* settings")?;

        if options.insecure {
            tracing::warn!("GO2_INSECURE is set, API key will be sent over plain HTTP");
        }

        Ok(options)
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("insecure", &self.insecure)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_production() {
        let options = ClientOptions::new("key");
        assert_eq!(options.endpoint, "grpc.go2.ge:443");
        assert!(!options.insecure);
        assert_eq!(options.timeout(), None);
    }

    #[test]
    fn empty_api_key_is_rejected() {
        assert!(matches!(
            ClientOptions::new("  ").validate(),
            Err(ConfigError::MissingApiKey)
        ));
        assert!(ClientOptions::new("key").validate().is_ok());
    }

    #[test]
    fn debug_output_hides_the_key() {
        let options = ClientOptions::new("super-secret").with_timeout(Duration::from_secs(5));
        let printed = format!("{options:?}");
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("timeout_ms: Some(5000)"));
    }

    #[test]
    fn deserialize_fills_missing_fields() {
        let options: ClientOptions =
            serde_json::from_value(serde_json::json!({"api_key": "k"})).unwrap();
        assert_eq!(options.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(options.timeout_ms, None);
    }

    #[test]
    fn sub_second_timeouts_are_kept() {
        let options = ClientOptions::new("key").with_timeout(Duration::from_millis(500));
        assert_eq!(options.timeout(), Some(Duration::from_millis(500)));
        assert!(options.validate().is_ok());

        let options = ClientOptions::new("key").with_timeout(Duration::from_millis(1500));
        assert_eq!(options.timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let options = ClientOptions::new("key").with_timeout(Duration::ZERO);
        assert!(matches!(options.validate(), Err(ConfigError::InvalidTimeout)));
    }
}
