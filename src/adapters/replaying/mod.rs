//! Replaying adapters that serve recorded interactions from cassettes.

pub mod generation_service;

use std::sync::{Arc, Mutex};

use crate::cassette::replayer::CassetteReplayer;
use crate::error::NodeError;

/// Retrieve the next recorded output for a given port and method.
///
/// # Errors
///
/// Returns an error if the cassette has no more interactions for the pair.
pub(crate) fn next_output(
    replayer: &Arc<Mutex<CassetteReplayer>>,
    port: &str,
    method: &str,
) -> Result<serde_json::Value, NodeError> {
    let mut guard = replayer
        .lock()
        .map_err(|e| NodeError::Api { status: 0, message: format!("Replayer lock poisoned: {e}") })?;
    guard
        .next_interaction(port, method)
        .map(|interaction| interaction.output.clone())
        .map_err(|message| NodeError::Api { status: 0, message })
}

/// Deserialize a replayed output as `Result<T, NodeError>`.
///
/// Recorded errors come back as [`NodeError::Api`] with status 0.
pub(crate) fn replay_result<T: serde::de::DeserializeOwned>(
    output: serde_json::Value,
) -> Result<T, NodeError> {
    let replay_error = |message: String| NodeError::Api { status: 0, message };

    if let Some(err_val) = output.get("Err").or_else(|| output.get("err")) {
        let msg = err_val.as_str().unwrap_or("replayed error").to_string();
        return Err(replay_error(msg));
    }
    let value = output.get("Ok").or_else(|| output.get("ok")).cloned().unwrap_or(output);
    serde_json::from_value(value)
        .map_err(|e| replay_error(format!("Failed to parse replayed output: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ResponsePart;
    use serde_json::json;

    #[test]
    fn replays_ok_value() {
        let parts: Vec<ResponsePart> = replay_result(json!({"Ok": [{"text": "hi"}]})).unwrap();
        assert_eq!(parts, vec![ResponsePart::Text("hi".into())]);
    }

    #[test]
    fn replays_bare_value() {
        let parts: Vec<ResponsePart> = replay_result(json!([])).unwrap();
        assert!(parts.is_empty());
    }

    #[test]
    fn replays_err_as_api_error() {
        let err = replay_result::<Vec<ResponsePart>>(json!({"Err": "quota"})).unwrap_err();
        assert!(matches!(err, NodeError::Api { status: 0, ref message } if message == "quota"));
    }
}
