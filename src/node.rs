//! Host-facing node metadata: what the node is called and what it takes.

use serde::Serialize;

use crate::model::Model;
use crate::params::{AspectRatio, ImageCount};

/// Class name the host registers the node under.
pub const CLASS_NAME: &str = "SimpleGeminiImage";
/// Name shown in the host's node browser.
pub const DISPLAY_NAME: &str = "Simple Gemini Image Generator";
/// Menu category.
pub const CATEGORY: &str = "SimpleGemini";
/// Entry point the host invokes.
pub const FUNCTION: &str = "generate";

/// Default prompt shown in a fresh node.
pub const DEFAULT_PROMPT: &str = "A beautiful landscape";

/// Kind of value an input or output carries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InputKind {
    /// Free text.
    #[serde(rename = "STRING")]
    Text {
        /// Whether the host should render a multi-line editor.
        multiline: bool,
        /// Initial value.
        default: String,
    },
    /// One of a fixed list.
    Choice {
        /// Allowed values, in display order.
        options: Vec<String>,
        /// Initial value.
        default: String,
    },
    /// Bounded integer.
    Int {
        /// Initial value.
        default: u32,
        /// Smallest allowed value.
        min: u32,
        /// Largest allowed value.
        max: u32,
    },
    /// An image batch.
    Image,
}

/// One declared input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputSpec {
    /// Parameter name.
    pub name: &'static str,
    /// Value kind and widget settings.
    #[serde(flatten)]
    pub kind: InputKind,
}

/// One declared output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputSpec {
    /// Output name.
    pub name: &'static str,
    /// Host type tag (`IMAGE`, `STRING`).
    #[serde(rename = "type")]
    pub kind: &'static str,
}

/// Everything the host needs to register the node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeDescriptor {
    /// Registered class name.
    pub class_name: &'static str,
    /// Human-readable name.
    pub display_name: &'static str,
    /// Menu category.
    pub category: &'static str,
    /// Entry point name.
    pub function: &'static str,
    /// Inputs that must be connected or filled in.
    pub required: Vec<InputSpec>,
    /// Inputs with defaults.
    pub optional: Vec<InputSpec>,
    /// Outputs in return order.
    pub outputs: Vec<OutputSpec>,
}

/// The descriptor for this node.
#[must_use]
pub fn descriptor() -> NodeDescriptor {
    let text = |multiline: bool, default: &str| InputKind::Text { multiline, default: default.to_string() };

    NodeDescriptor {
        class_name: CLASS_NAME,
        display_name: DISPLAY_NAME,
        category: CATEGORY,
        function: FUNCTION,
        required: vec![
            InputSpec { name: "api_key", kind: text(false, "") },
            InputSpec {
                name: "model_name",
                kind: InputKind::Choice {
                    options: Model::ALL.iter().map(ToString::to_string).collect(),
                    default: Model::Gemini25FlashImage.to_string(),
                },
            },
            InputSpec { name: "prompt", kind: text(true, DEFAULT_PROMPT) },
        ],
        optional: vec![
            InputSpec { name: "images", kind: InputKind::Image },
            InputSpec { name: "proxy_url", kind: text(false, "") },
            InputSpec {
                name: "aspect_ratio",
                kind: InputKind::Choice {
                    options: AspectRatio::ALL.iter().map(ToString::to_string).collect(),
                    default: AspectRatio::default().to_string(),
                },
            },
            InputSpec {
                name: "number_of_images",
                kind: InputKind::Int { default: 1, min: ImageCount::MIN, max: ImageCount::MAX },
            },
        ],
        outputs: vec![
            OutputSpec { name: "image", kind: "IMAGE" },
            OutputSpec { name: "text_response", kind: "STRING" },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declares_image_and_string_outputs() {
        let d = descriptor();
        let outputs: Vec<_> = d.outputs.iter().map(|o| (o.name, o.kind)).collect();
        assert_eq!(outputs, vec![("image", "IMAGE"), ("text_response", "STRING")]);
    }

    #[test]
    fn model_choices_cover_catalogue() {
        let d = descriptor();
        let model = d.required.iter().find(|i| i.name == "model_name").unwrap();
        let InputKind::Choice { options, default } = &model.kind else { panic!("model_name is a choice") };
        assert_eq!(options.len(), Model::ALL.len());
        assert_eq!(default, "gemini-2.5-flash-image");
    }

    #[test]
    fn optional_defaults() {
        let json = serde_json::to_value(descriptor()).unwrap();
        let optional = json["optional"].as_array().unwrap();
        let by_name = |name: &str| optional.iter().find(|i| i["name"] == name).unwrap().clone();

        assert_eq!(by_name("proxy_url")["default"], "");
        assert_eq!(by_name("aspect_ratio")["default"], "1:1");
        assert_eq!(by_name("number_of_images")["type"], "INT");
        assert_eq!(by_name("number_of_images")["max"], 4);
        assert_eq!(by_name("images")["type"], "IMAGE");
    }

    #[test]
    fn serializes_class_metadata() {
        let json = serde_json::to_value(descriptor()).unwrap();
        assert_eq!(json["class_name"], "SimpleGeminiImage");
        assert_eq!(json["display_name"], "Simple Gemini Image Generator");
        assert_eq!(json["category"], "SimpleGemini");
    }
}
