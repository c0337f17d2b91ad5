//! Replaying adapter for the `GenerationService` port.

use std::sync::{Arc, Mutex};

use super::{next_output, replay_result};
use crate::adapters::recording::generation_service::PORT;
use crate::cassette::replayer::CassetteReplayer;
use crate::error::NodeError;
use crate::ports::{
    Connector, ContentRequest, EncodedImage, GenerationService, ImagesRequest, NetworkOptions,
    ResponsePart, ServiceFuture,
};

/// Serves recorded generation results from a cassette.
pub struct ReplayingGenerationService {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingGenerationService {
    /// Create a replaying service backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl GenerationService for ReplayingGenerationService {
    fn generate_images(&self, _request: &ImagesRequest) -> ServiceFuture<'_, Vec<EncodedImage>> {
        let output = next_output(&self.replayer, PORT, "generate_images");
        Box::pin(async move { output.and_then(replay_result::<Vec<EncodedImage>>) })
    }

    fn generate_content(&self, _request: &ContentRequest) -> ServiceFuture<'_, Vec<ResponsePart>> {
        let output = next_output(&self.replayer, PORT, "generate_content");
        Box::pin(async move { output.and_then(replay_result::<Vec<ResponsePart>>) })
    }
}

/// Hands out replaying services; credential and network options are ignored.
pub struct ReplayingConnector {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingConnector {
    /// Create a connector serving from `replayer`.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Arc::new(Mutex::new(replayer)) }
    }
}

impl Connector for ReplayingConnector {
    fn connect(
        &self,
        _credential: &str,
        _network: &NetworkOptions,
    ) -> Result<Box<dyn GenerationService>, NodeError> {
        Ok(Box::new(ReplayingGenerationService::new(Arc::clone(&self.replayer))))
    }
}
