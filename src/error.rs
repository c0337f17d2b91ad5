//! Unified error type for the generation node.

use thiserror::Error;

/// Errors that can occur while running the generation node.
#[derive(Debug, Error)]
pub enum NodeError {
    /// A required input is missing or out of range.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The remote-service client is not part of this build.
    #[error("Remote generation client unavailable. {instruction}")]
    DependencyUnavailable {
        /// How to obtain a build with the client.
        instruction: String,
    },

    /// The service answered but produced no usable image.
    #[error("{message}")]
    Upstream {
        /// What was missing from the response.
        message: String,
        /// Text gathered from the response before the failure.
        text: String,
    },

    /// An API returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// A network error occurred.
    #[cfg(feature = "live")]
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding, encoding or tensor shape error.
    #[error("Image conversion error: {0}")]
    ImageConversion(String),
}

impl NodeError {
    /// Build an upstream error for a response without an image.
    pub(crate) fn no_image(message: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Upstream { message: message.into(), text: text.into() }
    }
}
