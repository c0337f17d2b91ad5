//! Connector used when the build carries no remote client.

use crate::error::NodeError;
use crate::ports::{Connector, GenerationService, NetworkOptions};

/// Instruction shown when the live client is missing.
pub const INSTALL_INSTRUCTION: &str =
    "Rebuild with the live client enabled: cargo install simple-gemini --features live";

/// Always reports the remote client as unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableConnector;

impl Connector for UnavailableConnector {
    fn check_available(&self) -> Result<(), NodeError> {
        Err(NodeError::DependencyUnavailable { instruction: INSTALL_INSTRUCTION.to_string() })
    }

    fn connect(
        &self,
        _credential: &str,
        _network: &NetworkOptions,
    ) -> Result<Box<dyn GenerationService>, NodeError> {
        Err(NodeError::DependencyUnavailable { instruction: INSTALL_INSTRUCTION.to_string() })
    }
}
