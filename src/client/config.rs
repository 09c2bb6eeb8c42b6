// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Client configuration.

use std::time::Duration;

use crate::config::Credentials;
use crate::error::{CommunicationError, Error};

use super::AgatarkClient;

/// Configuration for an [`AgatarkClient`].
///
/// # Examples
///
/// ```
/// use agatark_lib::client::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new("192.168.1.20", "me@example.com", "secret")
///     .with_request_timeout(Duration::from_secs(5))
///     .with_poll_timeout(Duration::from_secs(60));
///
/// assert_eq!(config.base_url(), "http://192.168.1.20");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    credentials: Credentials,
    request_timeout: Duration,
    poll_timeout: Duration,
    user_agent: String,
}

impl ClientConfig {
    /// Default timeout for login and device requests.
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default bound on a single long-poll attempt.
    pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(30);
    /// Default `User-Agent` header.
    pub const DEFAULT_USER_AGENT: &'static str = "AgatarkIntegration/1.0.0";

    /// Creates a configuration for the given controller and account.
    ///
    /// `host` may be a bare `host[:port]` (plain HTTP is assumed) or a full
    /// `http://` / `https://` URL.
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::from_credentials(Credentials::new(host, email, password))
    }

    /// Creates a configuration from existing credentials.
    #[must_use]
    pub fn from_credentials(credentials: Credentials) -> Self {
        Self {
            credentials,
            request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
            poll_timeout: Self::DEFAULT_POLL_TIMEOUT,
            user_agent: Self::DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Sets the timeout for login and device requests.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the bound on a single long-poll attempt.
    #[must_use]
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Sets the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the credentials.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Returns the long-poll timeout.
    #[must_use]
    pub fn poll_timeout(&self) -> Duration {
        self.poll_timeout
    }

    /// Returns the `User-Agent` header value.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Builds the base URL from the configured host.
    #[must_use]
    pub fn base_url(&self) -> String {
        base_url(&self.credentials.host)
    }

    /// Creates an [`AgatarkClient`] from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the credentials are incomplete or the HTTP client
    /// cannot be created.
    pub fn into_client(self) -> Result<AgatarkClient, Error> {
        self.credentials.validate()?;
        AgatarkClient::from_config(self)
    }
}

/// Turns a configured host into a base URL without trailing slash.
pub(crate) fn base_url(host: &str) -> String {
    let host = host.trim();
    let url = if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{host}")
    };
    url.trim_end_matches('/').to_string()
}

/// Builds a full endpoint URL, rejecting hosts that do not parse.
pub(crate) fn endpoint(host: &str, path: &str) -> Result<String, Error> {
    let url = format!("{}{path}", base_url(host));
    reqwest::Url::parse(&url)
        .map_err(|e| CommunicationError::InvalidAddress(format!("{host}: {e}")))?;
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn defaults() {
        let config = ClientConfig::new("192.168.1.20", "me@example.com", "secret");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.poll_timeout(), Duration::from_secs(30));
        assert_eq!(config.user_agent(), "AgatarkIntegration/1.0.0");
        assert_eq!(config.credentials().email, "me@example.com");
    }

    #[test]
    fn base_url_bare_host() {
        assert_eq!(base_url("192.168.1.20"), "http://192.168.1.20");
        assert_eq!(base_url("controller.lan:8080"), "http://controller.lan:8080");
    }

    #[test]
    fn base_url_keeps_scheme() {
        assert_eq!(base_url("https://agatark.example.com/"), "https://agatark.example.com");
        assert_eq!(base_url("http://10.0.0.5"), "http://10.0.0.5");
    }

    #[test]
    fn endpoint_appends_path() {
        assert_eq!(
            endpoint("10.0.0.5", "/hello").unwrap(),
            "http://10.0.0.5/hello"
        );
    }

    #[test]
    fn endpoint_rejects_garbage_host() {
        let err = endpoint("bad host name", "/hello").unwrap_err();
        assert!(matches!(
            err,
            Error::Communication(CommunicationError::InvalidAddress(_))
        ));
        assert!(err.is_connection_failure());
    }

    #[test]
    fn into_client_requires_host() {
        let err = ClientConfig::new("", "me@example.com", "secret")
            .into_client()
            .unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::MissingField("host"))));
    }

    #[test]
    fn builder_chain() {
        let config = ClientConfig::new("h", "e", "p")
            .with_request_timeout(Duration::from_secs(3))
            .with_poll_timeout(Duration::from_millis(500))
            .with_user_agent("test/1");
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
        assert_eq!(config.poll_timeout(), Duration::from_millis(500));
        assert_eq!(config.user_agent(), "test/1");
    }
}
