//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the node core and an external
//! system. Implementations live in `src/adapters/`.

pub mod generation_service;

pub use generation_service::{
    Connector, ContentPart, ContentRequest, EncodedImage, GenerationService, ImagesRequest,
    NetworkOptions, ResponsePart, ServiceFuture,
};
