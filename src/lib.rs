//! Simple Gemini - an image generation node for Gemini and Imagen models.
//!
//! The node takes a prompt and optional input images in host tensor form,
//! calls the remote service for the selected model family, and returns the
//! generated image as a tensor together with any text the model produced.

pub mod adapters;
pub mod cassette;
pub mod config;
pub mod context;
pub mod convert;
pub mod error;
pub mod generation;
pub mod model;
pub mod node;
pub mod output;
pub mod params;
pub mod ports;
pub mod tensor;

pub use error::NodeError;
pub use generation::{GenerationAdapter, GenerationRequest, GenerationResult};
pub use tensor::ImageTensor;
