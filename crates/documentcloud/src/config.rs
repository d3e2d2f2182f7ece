//! Configuration for the DocumentCloud client.

use std::time::Duration;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Base URI for the DocumentCloud API.
    pub const BASE_URI: &str = "https://www.documentcloud.org/api/";

    /// Request timeout. The service does not document one; 30 seconds is
    /// this crate's explicit default.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Maximum retries for transient transport failures.
    pub const MAX_RETRIES: u32 = 3;

    /// Minimum backoff between retries.
    pub const RETRY_MIN: Duration = Duration::from_secs(1);

    /// Maximum backoff between retries.
    pub const RETRY_MAX: Duration = Duration::from_secs(30);

    /// Search results per page when auto-paginating.
    pub const DEFAULT_PER_PAGE: u32 = 1000;

    /// Surrounding-text snippets returned per keyword hit.
    pub const DEFAULT_MENTIONS: u32 = 3;

    /// The service caps mention context at ten snippets.
    pub const MAX_MENTIONS: u32 = 10;

    /// Upload size limit enforced client-side (the service rejects ~400 MB).
    pub const MAX_UPLOAD_BYTES: u64 = 399_999_999;
}

/// Client configuration.
///
/// Credentials are optional; anonymous clients can search and fetch public
/// documents but cannot upload, update, delete, or list projects.
#[derive(Debug, Clone)]
pub struct Config {
    /// Account username (optional).
    pub username: Option<String>,

    /// Account password (optional).
    pub password: Option<String>,

    /// Base URI for the API (overridable for testing with mock servers).
    pub base_uri: String,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Maximum retries for transient transport failures.
    pub max_retries: u32,
}

impl Config {
    /// Create a configuration with the given credentials.
    #[must_use]
    pub fn new(username: Option<String>, password: Option<String>) -> Self {
        Self {
            username,
            password,
            base_uri: api::BASE_URI.to_string(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            max_retries: api::MAX_RETRIES,
        }
    }

    /// Create an anonymous configuration for public-document access.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::new(None, None)
    }

    /// Create a test configuration pointed at a mock server.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            username: Some("tester".to_string()),
            password: Some("hunter2".to_string()),
            base_uri: format!("{}/api/", base_url.trim_end_matches('/')),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            max_retries: 0, // No backoff loops in tests
        }
    }

    /// Create configuration from `DOCUMENTCLOUD_USERNAME` and
    /// `DOCUMENTCLOUD_PASSWORD` environment variables.
    ///
    /// # Errors
    ///
    /// Returns error if environment variables are invalid.
    pub fn from_env() -> anyhow::Result<Self> {
        let username = std::env::var("DOCUMENTCLOUD_USERNAME").ok();
        let password = std::env::var("DOCUMENTCLOUD_PASSWORD").ok();
        Ok(Self::new(username, password))
    }

    /// Check if both a username and a password are configured.
    #[must_use]
    pub const fn has_credentials(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::anonymous()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_is_anonymous() {
        let config = Config::default();
        assert!(config.username.is_none());
        assert!(!config.has_credentials());
        assert_eq!(config.base_uri, api::BASE_URI);
    }

    #[test]
    fn test_config_with_credentials() {
        let config = Config::new(Some("carolyn".to_string()), Some("pw".to_string()));
        assert!(config.has_credentials());
    }

    #[test]
    fn test_username_alone_is_not_credentialed() {
        let config = Config::new(Some("carolyn".to_string()), None);
        assert!(!config.has_credentials());
    }

    #[test]
    fn test_for_testing_points_at_mock() {
        let config = Config::for_testing("http://127.0.0.1:9999");
        assert_eq!(config.base_uri, "http://127.0.0.1:9999/api/");
        assert_eq!(config.max_retries, 0);
    }
}
