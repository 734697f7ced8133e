//! Connection settings for the remote platform.

use serde::{Deserialize, Serialize};

/// Remote compute endpoint and credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Base URL, e.g. `https://compute.example.org`.
    pub endpoint: String,

    /// Bearer token sent with every request.
    pub token: Option<String>,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080".to_string(),
            token: None,
            timeout_secs: 60,
        }
    }
}

impl PlatformConfig {
    /// Overlay `VERDANT_PLATFORM_*` environment variables.
    pub fn apply_env(&mut self) {
        if let Ok(val) = std::env::var("VERDANT_PLATFORM_URL") {
            self.endpoint = val;
        }

        if let Ok(val) = std::env::var("VERDANT_PLATFORM_TOKEN") {
            if !val.is_empty() {
                self.token = Some(val);
            }
        }

        if let Ok(val) = std::env::var("VERDANT_PLATFORM_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                self.timeout_secs = secs;
            }
        }
    }

    /// Defaults overlaid with the environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(format!("platform endpoint must be an http(s) URL: {}", self.endpoint));
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be > 0".to_string());
        }

        Ok(())
    }

    /// Endpoint joined with a path, without doubled slashes.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(PlatformConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = PlatformConfig::default();
        config.endpoint = "ftp://x".to_string();
        assert!(config.validate().is_err());

        let mut config = PlatformConfig::default();
        config.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_url_join() {
        let mut config = PlatformConfig::default();
        config.endpoint = "https://compute.example.org/".to_string();
        assert_eq!(config.url("/v1/exports"), "https://compute.example.org/v1/exports");
    }
}
