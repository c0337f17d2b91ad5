//! Recording adapter for the `GenerationService` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::error::NodeError;
use crate::ports::{
    Connector, ContentRequest, EncodedImage, GenerationService, ImagesRequest, NetworkOptions,
    ResponsePart, ServiceFuture,
};

/// Port name under which generation calls are recorded.
pub const PORT: &str = "generation_service";

/// Records generation interactions while delegating to an inner service.
pub struct RecordingGenerationService {
    inner: Box<dyn GenerationService>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingGenerationService {
    /// Creates a new recording service wrapping the given implementation.
    pub fn new(inner: Box<dyn GenerationService>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl GenerationService for RecordingGenerationService {
    fn generate_images(&self, request: &ImagesRequest) -> ServiceFuture<'_, Vec<EncodedImage>> {
        let request_clone = request.clone();
        let recorder = Arc::clone(&self.recorder);

        Box::pin(async move {
            let result = self.inner.generate_images(&request_clone).await;
            record_result(&recorder, PORT, "generate_images", &request_clone, &result);
            result
        })
    }

    fn generate_content(&self, request: &ContentRequest) -> ServiceFuture<'_, Vec<ResponsePart>> {
        let request_clone = request.clone();
        let recorder = Arc::clone(&self.recorder);

        Box::pin(async move {
            let result = self.inner.generate_content(&request_clone).await;
            record_result(&recorder, PORT, "generate_content", &request_clone, &result);
            result
        })
    }
}

/// Wraps every service produced by an inner connector in a recorder.
pub struct RecordingConnector {
    inner: Arc<dyn Connector>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingConnector {
    /// Creates a connector that records through `recorder`.
    pub fn new(inner: Arc<dyn Connector>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl Connector for RecordingConnector {
    fn check_available(&self) -> Result<(), NodeError> {
        self.inner.check_available()
    }

    fn connect(
        &self,
        credential: &str,
        network: &NetworkOptions,
    ) -> Result<Box<dyn GenerationService>, NodeError> {
        let inner = self.inner.connect(credential, network)?;
        Ok(Box::new(RecordingGenerationService::new(inner, Arc::clone(&self.recorder))))
    }
}
