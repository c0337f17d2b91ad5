//! Parameter validation for node inputs and CLI output options.

use std::fmt;
use std::str::FromStr;

use crate::error::NodeError;

/// Output aspect ratios the node offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AspectRatio {
    /// `1:1`
    #[default]
    Square,
    /// `16:9`
    Landscape16x9,
    /// `9:16`
    Portrait9x16,
    /// `4:3`
    Landscape4x3,
    /// `3:4`
    Portrait3x4,
}

impl AspectRatio {
    /// Every ratio, in the order the node lists them.
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Square,
        AspectRatio::Landscape16x9,
        AspectRatio::Portrait9x16,
        AspectRatio::Landscape4x3,
        AspectRatio::Portrait3x4,
    ];

    /// The wire form (e.g. `"16:9"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape16x9 => "16:9",
            AspectRatio::Portrait9x16 => "9:16",
            AspectRatio::Landscape4x3 => "4:3",
            AspectRatio::Portrait3x4 => "3:4",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = NodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AspectRatio::ALL.into_iter().find(|r| r.as_str() == s).ok_or_else(|| {
            let valid: Vec<&str> = AspectRatio::ALL.iter().map(|r| r.as_str()).collect();
            NodeError::Configuration(format!("Unsupported aspect ratio '{s}'. Valid: {valid:?}"))
        })
    }
}

/// Number of images requested from a text-to-image model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageCount(u32);

impl ImageCount {
    /// Smallest accepted count.
    pub const MIN: u32 = 1;
    /// Largest accepted count.
    pub const MAX: u32 = 4;

    /// Validate a requested count.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the count is outside `1..=4`.
    pub fn new(count: u32) -> Result<Self, NodeError> {
        if (Self::MIN..=Self::MAX).contains(&count) {
            Ok(Self(count))
        } else {
            Err(NodeError::Configuration(format!(
                "number_of_images must be between {} and {}, got {count}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    /// The validated count.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

/// Validate the output format parameter.
///
/// # Errors
///
/// Returns an error if the format is not recognized.
pub fn validate_format(format: &str) -> Result<(), NodeError> {
    match format {
        "jpeg" | "png" | "webp" => Ok(()),
        _ => Err(NodeError::Configuration(format!(
            "Unsupported format '{format}'. Valid: jpeg, png, webp"
        ))),
    }
}

/// Get the file extension for an output format.
#[must_use]
pub fn format_extension(format: &str) -> &'static str {
    match format {
        "jpeg" => "jpg",
        "webp" => "webp",
        // png and any unknown format default to png
        _ => "png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_ratio_parses_listed_values() {
        assert_eq!("1:1".parse::<AspectRatio>().unwrap(), AspectRatio::Square);
        assert_eq!("16:9".parse::<AspectRatio>().unwrap(), AspectRatio::Landscape16x9);
        assert_eq!("9:16".parse::<AspectRatio>().unwrap(), AspectRatio::Portrait9x16);
        assert_eq!("4:3".parse::<AspectRatio>().unwrap(), AspectRatio::Landscape4x3);
        assert_eq!("3:4".parse::<AspectRatio>().unwrap(), AspectRatio::Portrait3x4);
    }

    #[test]
    fn aspect_ratio_rejects_unlisted() {
        let err = "21:9".parse::<AspectRatio>().unwrap_err();
        assert!(err.to_string().contains("Unsupported aspect ratio '21:9'"));
    }

    #[test]
    fn aspect_ratio_default_is_square() {
        assert_eq!(AspectRatio::default().to_string(), "1:1");
    }

    #[test]
    fn image_count_bounds() {
        assert!(ImageCount::new(0).is_err());
        assert_eq!(ImageCount::new(1).unwrap().get(), 1);
        assert_eq!(ImageCount::new(4).unwrap().get(), 4);
        assert!(matches!(ImageCount::new(5), Err(NodeError::Configuration(_))));
    }

    #[test]
    fn validate_format_valid() {
        assert!(validate_format("jpeg").is_ok());
        assert!(validate_format("png").is_ok());
        assert!(validate_format("webp").is_ok());
    }

    #[test]
    fn validate_format_invalid() {
        assert!(validate_format("gif").is_err());
        assert!(validate_format("bmp").is_err());
    }

    #[test]
    fn format_extension_mapping() {
        assert_eq!(format_extension("jpeg"), "jpg");
        assert_eq!(format_extension("png"), "png");
        assert_eq!(format_extension("webp"), "webp");
    }
}
