//! Connection settings supplied by the host.
//!
//! The library reads no files or environment variables. `ClientConfig`
//! derives `Deserialize` so a host can load it from whatever format it
//! already uses.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Endpoint, credentials and timeout policy for one `Caller`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// Root URL of the installation, without the `/api/` suffix.
    pub base_url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Whole-exchange timeout handed to the HTTP agent. `None` waits forever.
    #[serde(
        rename = "timeout_secs",
        default = "default_timeout",
        deserialize_with = "timeout_from_secs"
    )]
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: &str, username: &str, password: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            timeout: default_timeout(),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The JSON endpoint: `<base>/api/`.
    pub fn api_url(&self) -> String {
        api_url(&self.base_url)
    }
}

pub(crate) fn api_url(base_url: &str) -> String {
    format!("{}/api/", base_url.trim_end_matches('/'))
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn default_timeout() -> Option<Duration> {
    Some(DEFAULT_TIMEOUT)
}

fn timeout_from_secs<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_appends_api_suffix() {
        let config = ClientConfig::new("https://rss.example.org/tt-rss", "u", "p");
        assert_eq!(config.api_url(), "https://rss.example.org/tt-rss/api/");
    }

    #[test]
    fn trailing_slashes_are_stripped() {
        let config = ClientConfig::new("http://localhost:3000//", "u", "p");
        assert_eq!(config.api_url(), "http://localhost:3000/api/");
    }

    #[test]
    fn debug_redacts_password() {
        let config = ClientConfig::new("http://localhost", "admin", "hunter2");
        let printed = format!("{config:?}");
        assert!(printed.contains("admin"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn deserializes_with_default_timeout() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"base_url":"http://localhost","username":"a"}"#).unwrap();
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.password, "");
    }

    #[test]
    fn deserializes_explicit_and_disabled_timeout() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"base_url":"http://x","timeout_secs":5}"#).unwrap();
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));

        let config: ClientConfig =
            serde_json::from_str(r#"{"base_url":"http://x","timeout_secs":null}"#).unwrap();
        assert_eq!(config.timeout, None);
    }
}
