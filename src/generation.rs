//! The generation adapter: validate, dispatch by model family, convert.

use std::backtrace::Backtrace;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::convert::{decode_to_tensor, tensor_to_png_frames};
use crate::error::NodeError;
use crate::model::{Model, ModelFamily};
use crate::params::{AspectRatio, ImageCount};
use crate::ports::{
    ContentPart, ContentRequest, Connector, EncodedImage, GenerationService, ImagesRequest,
    NetworkOptions, ResponsePart,
};
use crate::tensor::ImageTensor;

/// Characters of response text shown in log previews.
const PREVIEW_CHARS: usize = 100;

/// Inputs of one node invocation, as the host passes them.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// API credential.
    pub api_key: String,
    /// Model identifier or alias.
    pub model_name: String,
    /// Text prompt.
    pub prompt: String,
    /// Optional input images, one per batch frame.
    pub images: Option<ImageTensor>,
    /// Proxy endpoint; empty means a direct connection.
    pub proxy_url: String,
    /// Aspect ratio (e.g. `"1:1"`).
    pub aspect_ratio: String,
    /// Number of images to request from text-to-image models.
    pub number_of_images: u32,
}

impl GenerationRequest {
    /// A request with the node's defaults for every optional input.
    pub fn new(
        api_key: impl Into<String>,
        model_name: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            model_name: model_name.into(),
            prompt: prompt.into(),
            images: None,
            proxy_url: String::new(),
            aspect_ratio: AspectRatio::default().as_str().to_string(),
            number_of_images: 1,
        }
    }

    /// Attach input images.
    #[must_use]
    pub fn with_images(mut self, images: ImageTensor) -> Self {
        self.images = Some(images);
        self
    }

    /// Route traffic through a proxy.
    #[must_use]
    pub fn with_proxy_url(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy_url = proxy_url.into();
        self
    }

    /// Set the aspect ratio.
    #[must_use]
    pub fn with_aspect_ratio(mut self, aspect_ratio: impl Into<String>) -> Self {
        self.aspect_ratio = aspect_ratio.into();
        self
    }

    /// Set the number of images requested.
    #[must_use]
    pub fn with_count(mut self, count: u32) -> Self {
        self.number_of_images = count;
        self
    }
}

/// Output of one node invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    /// Generated image, batch of one.
    pub image: ImageTensor,
    /// Text returned alongside the image; empty for text-to-image models.
    pub text: String,
}

impl GenerationResult {
    /// The `(image, text_response)` pair the node returns to its host.
    #[must_use]
    pub fn into_tuple(self) -> (ImageTensor, String) {
        (self.image, self.text)
    }
}

/// A request after validation.
#[derive(Debug)]
struct Validated<'a> {
    model: Model,
    aspect_ratio: AspectRatio,
    count: ImageCount,
    network: NetworkOptions,
    request: &'a GenerationRequest,
}

impl<'a> Validated<'a> {
    fn new(request: &'a GenerationRequest) -> Result<Self, NodeError> {
        if request.api_key.trim().is_empty() {
            return Err(NodeError::Configuration("API key is required".into()));
        }
        Ok(Self {
            model: request.model_name.parse()?,
            aspect_ratio: request.aspect_ratio.parse()?,
            count: ImageCount::new(request.number_of_images)?,
            network: NetworkOptions::from_proxy_input(&request.proxy_url),
            request,
        })
    }
}

/// An outbound call, shaped for one model family.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ServiceCall {
    Images(ImagesRequest),
    Content(ContentRequest),
}

impl ModelFamily {
    /// Build the outbound call this family needs.
    fn build_call(self, validated: &Validated<'_>) -> Result<ServiceCall, NodeError> {
        let request = validated.request;
        match self {
            ModelFamily::TextToImage => {
                if let Some(images) = &request.images {
                    warn!(
                        model = %validated.model,
                        count = images.batch(),
                        "Text-to-image model does not accept input images; ignoring them"
                    );
                }
                Ok(ServiceCall::Images(ImagesRequest {
                    model: validated.model.id().to_string(),
                    prompt: request.prompt.clone(),
                    count: validated.count.get(),
                    aspect_ratio: validated.aspect_ratio.as_str().to_string(),
                }))
            }
            ModelFamily::Multimodal => {
                let mut contents = vec![ContentPart::Text(request.prompt.clone())];
                if let Some(images) = &request.images {
                    info!("Processing {} input image(s)", images.batch());
                    contents.extend(tensor_to_png_frames(images)?.into_iter().map(ContentPart::Image));
                }
                Ok(ServiceCall::Content(ContentRequest {
                    model: validated.model.id().to_string(),
                    contents,
                }))
            }
        }
    }
}

/// Runs the node: one validated request, one remote call, one result.
pub struct GenerationAdapter {
    connector: Arc<dyn Connector>,
}

impl GenerationAdapter {
    /// Create an adapter that builds its remote client through `connector`.
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self { connector }
    }

    /// Run one invocation.
    ///
    /// # Errors
    ///
    /// - [`NodeError::DependencyUnavailable`] if no remote client is available.
    /// - [`NodeError::Configuration`] for a missing credential or invalid input.
    /// - [`NodeError::Upstream`] if the service returned no usable image.
    /// - Any transport, API or decoding error, unchanged.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, NodeError> {
        self.connector.check_available()?;
        let validated = Validated::new(request)?;

        if let Some(proxy) = &validated.network.proxy_url {
            info!(proxy = %proxy, "Using proxy");
        }
        let service = self.connector.connect(&request.api_key, &validated.network)?;

        let result = run(service.as_ref(), &validated).await;
        if let Err(e) = &result {
            error!(model = %validated.model, error = %e, "Generation failed");
            debug!("Backtrace:\n{}", Backtrace::force_capture());
        }
        result
    }
}

async fn run(
    service: &dyn GenerationService,
    validated: &Validated<'_>,
) -> Result<GenerationResult, NodeError> {
    info!(model = %validated.model, "Using model");

    let (image, text) = match validated.model.family().build_call(validated)? {
        ServiceCall::Images(request) => {
            let images = service.generate_images(&request).await?;
            (first_generated(images, request.count)?, String::new())
        }
        ServiceCall::Content(request) => {
            let parts = service.generate_content(&request).await?;
            first_inline_image(parts)?
        }
    };

    let image = decode_to_tensor(&image.data)?;
    Ok(GenerationResult { image, text })
}

fn first_generated(images: Vec<EncodedImage>, requested: u32) -> Result<EncodedImage, NodeError> {
    if images.len() != requested as usize {
        warn!(requested, returned = images.len(), "Image count differs from request");
    }
    images.into_iter().next().ok_or_else(|| NodeError::no_image("No images returned from Imagen API", ""))
}

fn first_inline_image(parts: Vec<ResponsePart>) -> Result<(EncodedImage, String), NodeError> {
    let mut image = None;
    let mut text = String::new();
    for part in parts {
        match part {
            ResponsePart::Text(fragment) => {
                debug!("Text: {}...", preview(&fragment, PREVIEW_CHARS));
                text.push_str(&fragment);
            }
            ResponsePart::InlineImage(inline) => {
                if image.is_none() {
                    info!("Image generated successfully");
                    image = Some(inline);
                }
            }
        }
    }
    match image {
        Some(image) => Ok((image, text)),
        None => Err(NodeError::no_image(format!("No image generated. Response text: {text}"), text)),
    }
}

/// First `max_chars` characters of `text`.
fn preview(text: &str, max_chars: usize) -> &str {
    text.char_indices().nth(max_chars).map_or(text, |(i, _)| &text[..i])
}
