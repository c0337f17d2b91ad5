//! Live connector that builds a fresh HTTP client per invocation.

pub mod gemini;

use std::time::Duration;

use reqwest::{Client, Proxy, Url};

use crate::error::NodeError;
use crate::ports::{Connector, GenerationService, NetworkOptions};

use self::gemini::GeminiService;

/// Default Google Generative Language API base.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Timeout for direct (non-proxied) requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Connects to the live Google API.
#[derive(Debug, Clone)]
pub struct LiveConnector {
    base_url: String,
    direct_timeout: Duration,
}

impl Default for LiveConnector {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string(), direct_timeout: DEFAULT_TIMEOUT }
    }
}

impl LiveConnector {
    /// Create a connector against the default endpoint.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the timeout used without a proxy.
    #[must_use]
    pub fn with_direct_timeout(mut self, timeout: Duration) -> Self {
        self.direct_timeout = timeout;
        self
    }
}

impl Connector for LiveConnector {
    fn connect(
        &self,
        credential: &str,
        network: &NetworkOptions,
    ) -> Result<Box<dyn GenerationService>, NodeError> {
        let client = build_http_client(network, self.direct_timeout)?;
        Ok(Box::new(GeminiService::new(client, credential.to_string(), self.base_url.clone())))
    }
}

/// Build an HTTP client honouring the proxy and timeout settings.
///
/// # Errors
///
/// Returns a configuration error for an unusable proxy URL.
pub fn build_http_client(network: &NetworkOptions, direct_timeout: Duration) -> Result<Client, NodeError> {
    let mut builder = Client::builder().timeout(network.timeout.unwrap_or(direct_timeout));

    if let Some(proxy_url) = &network.proxy_url {
        let parsed = Url::parse(proxy_url)
            .map_err(|e| NodeError::Configuration(format!("Invalid proxy URL '{proxy_url}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(NodeError::Configuration(format!(
                "Unsupported proxy scheme '{}' in '{proxy_url}'. Use http:// or https://",
                parsed.scheme()
            )));
        }
        let proxy = Proxy::all(parsed)
            .map_err(|e| NodeError::Configuration(format!("Invalid proxy URL '{proxy_url}': {e}")))?;
        builder = builder.proxy(proxy);
    }

    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_client_builds() {
        assert!(build_http_client(&NetworkOptions::default(), DEFAULT_TIMEOUT).is_ok());
    }

    #[test]
    fn proxied_client_builds() {
        let network = NetworkOptions::from_proxy_input("http://127.0.0.1:7890");
        assert!(build_http_client(&network, DEFAULT_TIMEOUT).is_ok());
    }

    #[test]
    fn unparseable_proxy_is_configuration_error() {
        let network = NetworkOptions::from_proxy_input("127.0.0.1:7890");
        let err = build_http_client(&network, DEFAULT_TIMEOUT).unwrap_err();
        assert!(matches!(err, NodeError::Configuration(_)), "{err}");
    }

    #[test]
    fn unsupported_proxy_scheme_is_configuration_error() {
        let network = NetworkOptions::from_proxy_input("ftp://proxy.local:21");
        let err = build_http_client(&network, DEFAULT_TIMEOUT).unwrap_err();
        assert!(err.to_string().contains("Unsupported proxy scheme 'ftp'"));
    }

    #[test]
    fn connect_yields_service() {
        let connector = LiveConnector::new().with_base_url("http://localhost:1");
        assert!(connector.check_available().is_ok());
        assert!(connector.connect("key", &NetworkOptions::default()).is_ok());
    }
}
