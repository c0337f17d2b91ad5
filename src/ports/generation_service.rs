//! Remote generation service port and the connector that produces it.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::NodeError;

/// Request for the text-to-image operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagesRequest {
    /// Remote model identifier (e.g. `"imagen-4.0-generate-001"`).
    pub model: String,
    /// Text prompt.
    pub prompt: String,
    /// Number of images to generate.
    pub count: u32,
    /// Aspect ratio (e.g. `"16:9"`).
    pub aspect_ratio: String,
}

/// One unit of multimodal input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentPart {
    /// A text fragment.
    Text(String),
    /// An encoded image.
    Image(EncodedImage),
}

/// Request for the multimodal operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRequest {
    /// Remote model identifier (e.g. `"gemini-2.5-flash-image"`).
    pub model: String,
    /// Ordered input parts.
    pub contents: Vec<ContentPart>,
}

/// One unit of a multimodal response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponsePart {
    /// A text fragment.
    Text(String),
    /// An image embedded in the response.
    InlineImage(EncodedImage),
}

/// Encoded image bytes with their MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedImage {
    /// Raw image bytes.
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    /// MIME type of the image (e.g., `"image/png"`).
    pub mime_type: String,
}

/// Boxed future returned by [`GenerationService`] operations.
pub type ServiceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, NodeError>> + Send + 'a>>;

/// The remote image generation service.
pub trait GenerationService: Send + Sync {
    /// Generate images from a prompt (text-to-image models).
    fn generate_images(&self, request: &ImagesRequest) -> ServiceFuture<'_, Vec<EncodedImage>>;

    /// Generate interleaved text and images from ordered content (multimodal models).
    fn generate_content(&self, request: &ContentRequest) -> ServiceFuture<'_, Vec<ResponsePart>>;
}

/// Outbound network settings for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkOptions {
    /// Proxy for both HTTP and HTTPS traffic.
    pub proxy_url: Option<String>,
    /// Request timeout; `None` leaves the connector's default bound in place.
    pub timeout: Option<Duration>,
}

impl NetworkOptions {
    /// Timeout applied to proxied requests.
    pub const PROXY_TIMEOUT: Duration = Duration::from_secs(60);

    /// Options for a node `proxy_url` input; an empty string means a direct connection.
    #[must_use]
    pub fn from_proxy_input(proxy_url: &str) -> Self {
        let proxy_url = proxy_url.trim();
        if proxy_url.is_empty() {
            Self::default()
        } else {
            Self { proxy_url: Some(proxy_url.to_string()), timeout: Some(Self::PROXY_TIMEOUT) }
        }
    }
}

/// Produces a fresh [`GenerationService`] for each invocation.
pub trait Connector: Send + Sync {
    /// Report whether a remote client can be constructed at all.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::DependencyUnavailable`] when the client is not part of this build.
    fn check_available(&self) -> Result<(), NodeError> {
        Ok(())
    }

    /// Construct a service bound to the credential and network options.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built (e.g. an invalid proxy).
    fn connect(
        &self,
        credential: &str,
        network: &NetworkOptions,
    ) -> Result<Box<dyn GenerationService>, NodeError>;
}

/// Serde helper for serializing `Vec<u8>` as base64 strings in cassettes.
mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize bytes as base64 string.
    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(data);
        serializer.serialize_str(&encoded)
    }

    /// Deserialize base64 string to bytes.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}
