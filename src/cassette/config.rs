//! Locating and loading cassettes.

use std::path::{Path, PathBuf};

use super::format::Cassette;
use super::replayer::CassetteReplayer;
use crate::error::NodeError;

/// Directory, relative to the working directory, where recordings land.
pub const RECORDING_ROOT: &str = ".simple-gemini/cassettes";

/// Load a cassette file and create a replayer.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_cassette(path: &Path) -> Result<CassetteReplayer, NodeError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        NodeError::Configuration(format!("Failed to read cassette file {}: {e}", path.display()))
    })?;
    let cassette: Cassette = serde_yaml::from_str(&content).map_err(|e| {
        NodeError::Configuration(format!("Failed to parse cassette file {}: {e}", path.display()))
    })?;
    Ok(CassetteReplayer::new(&cassette))
}

/// Path of the cassette written by a recording session started at `timestamp`.
#[must_use]
pub fn recording_path(root: &Path, timestamp: &str) -> PathBuf {
    root.join(timestamp).join("generation_service.cassette.yaml")
}
