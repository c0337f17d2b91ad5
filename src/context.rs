//! Service context: picks the connector the adapter runs against.

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::adapters::recording::generation_service::RecordingConnector;
use crate::adapters::replaying::generation_service::ReplayingConnector;
use crate::cassette::config::{load_cassette, recording_path, RECORDING_ROOT};
use crate::cassette::recorder::CassetteRecorder;
use crate::config::Config;
use crate::error::NodeError;
use crate::generation::GenerationAdapter;
use crate::ports::Connector;

/// Bundles the connector behind the generation adapter.
pub struct ServiceContext {
    /// Connector handed to the adapter.
    pub connector: Arc<dyn Connector>,
}

/// Handle to a recording session that must be finished after use.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Finish the recording and write the cassette file to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the recorder is still shared or the file cannot be written.
    pub fn finish(self) -> Result<std::path::PathBuf, NodeError> {
        let recorder = Arc::try_unwrap(self.recorder)
            .map_err(|_| NodeError::Configuration("Recording adapter still has references".into()))?
            .into_inner()
            .map_err(|e| NodeError::Configuration(format!("Recorder lock poisoned: {e}")))?;
        recorder.finish()
    }
}

impl ServiceContext {
    /// Create a live context, or an unavailable one when the client is not compiled in.
    #[must_use]
    pub fn live(config: &Config) -> Self {
        Self { connector: live_connector(config) }
    }

    /// Create a recording context that wraps the live connector with a recorder.
    #[must_use]
    pub fn recording(config: &Config) -> (Self, RecordingSession) {
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let path = recording_path(Path::new(RECORDING_ROOT), &timestamp);
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            format!("{timestamp}-generation_service"),
            get_commit_hash(),
        )));

        let connector = RecordingConnector::new(live_connector(config), Arc::clone(&recorder));
        (Self { connector: Arc::new(connector) }, RecordingSession { recorder })
    }

    /// Create a replaying context from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be loaded.
    pub fn replaying(path: &Path) -> Result<Self, NodeError> {
        let replayer = load_cassette(path)?;
        Ok(Self { connector: Arc::new(ReplayingConnector::new(replayer)) })
    }

    /// An adapter bound to this context's connector.
    #[must_use]
    pub fn adapter(&self) -> GenerationAdapter {
        GenerationAdapter::new(Arc::clone(&self.connector))
    }
}

#[cfg(feature = "live")]
fn live_connector(config: &Config) -> Arc<dyn Connector> {
    use crate::adapters::live::LiveConnector;

    let mut connector = LiveConnector::new();
    if let Some(base_url) = &config.network.base_url {
        connector = connector.with_base_url(base_url.clone());
    }
    if let Some(timeout) = config.network.direct_timeout() {
        connector = connector.with_direct_timeout(timeout);
    }
    Arc::new(connector)
}

#[cfg(not(feature = "live"))]
fn live_connector(_config: &Config) -> Arc<dyn Connector> {
    Arc::new(crate::adapters::unavailable::UnavailableConnector)
}

/// Get the current git commit hash, or "unknown" if unavailable.
fn get_commit_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string())
}
