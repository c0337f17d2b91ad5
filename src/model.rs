//! Model catalogue and family detection.

use std::fmt;
use std::str::FromStr;

use crate::error::NodeError;

/// How a model is driven on the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    /// Text in, images out. No image input, no text output.
    TextToImage,
    /// Interleaved text/image input and output.
    Multimodal,
}

/// Models the node can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Model {
    /// `gemini-2.5-flash-image`
    Gemini25FlashImage,
    /// `gemini-3-pro-image-preview`
    Gemini3ProImagePreview,
    /// `imagen-3.0-generate-002`
    Imagen3Generate002,
    /// `imagen-4.0-generate-001`
    Imagen4Generate001,
    /// `imagen-4.0-fast-generate-001`
    Imagen4FastGenerate001,
    /// `imagen-4.0-ultra-generate-001`
    Imagen4UltraGenerate001,
}

/// Short name aliases for popular models.
const ALIASES: &[(&str, &str)] = &[
    ("nano-banana", "gemini-2.5-flash-image"),
    ("nano-banana-pro", "gemini-3-pro-image-preview"),
];

impl Model {
    /// Every model, in the order the node lists them.
    pub const ALL: [Model; 6] = [
        Model::Gemini25FlashImage,
        Model::Gemini3ProImagePreview,
        Model::Imagen3Generate002,
        Model::Imagen4Generate001,
        Model::Imagen4FastGenerate001,
        Model::Imagen4UltraGenerate001,
    ];

    /// The remote model identifier.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Model::Gemini25FlashImage => "gemini-2.5-flash-image",
            Model::Gemini3ProImagePreview => "gemini-3-pro-image-preview",
            Model::Imagen3Generate002 => "imagen-3.0-generate-002",
            Model::Imagen4Generate001 => "imagen-4.0-generate-001",
            Model::Imagen4FastGenerate001 => "imagen-4.0-fast-generate-001",
            Model::Imagen4UltraGenerate001 => "imagen-4.0-ultra-generate-001",
        }
    }

    /// Which request shape this model needs.
    #[must_use]
    pub fn family(self) -> ModelFamily {
        match self {
            Model::Gemini25FlashImage | Model::Gemini3ProImagePreview => ModelFamily::Multimodal,
            Model::Imagen3Generate002
            | Model::Imagen4Generate001
            | Model::Imagen4FastGenerate001
            | Model::Imagen4UltraGenerate001 => ModelFamily::TextToImage,
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Model {
    type Err = NodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let resolved = resolve_alias(s.trim());
        Model::ALL.into_iter().find(|m| m.id() == resolved).ok_or_else(|| {
            let valid: Vec<&str> = Model::ALL.iter().map(|m| m.id()).collect();
            NodeError::Configuration(format!("Unknown model '{s}'. Valid: {valid:?}"))
        })
    }
}

/// Resolve a model name (alias or exact) to the full model identifier.
#[must_use]
pub fn resolve_alias(name: &str) -> &str {
    ALIASES.iter().find(|&&(alias, _)| alias == name).map_or(name, |&(_, full)| full)
}
