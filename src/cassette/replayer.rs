//! Replays recorded interactions from a cassette.

use std::collections::HashMap;

use super::format::{Cassette, Interaction};

/// Key for indexing interactions by port and method.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct PortMethodKey {
    port: String,
    method: String,
}

/// Replays interactions from a loaded cassette, serving them sequentially
/// per port/method pair.
pub struct CassetteReplayer {
    queues: HashMap<PortMethodKey, Vec<Interaction>>,
    cursors: HashMap<PortMethodKey, usize>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<PortMethodKey, Vec<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            let key = PortMethodKey {
                port: interaction.port.clone(),
                method: interaction.method.clone(),
            };
            queues.entry(key).or_default().push(interaction.clone());
        }
        let cursors = queues.keys().map(|k| (k.clone(), 0)).collect();
        Self { queues, cursors }
    }

    /// Return the next interaction for the given port and method.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if the cassette has no (more)
    /// interactions for the given port/method combination.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Result<&Interaction, String> {
        let key = PortMethodKey { port: port.to_string(), method: method.to_string() };

        let Some(queue) = self.queues.get(&key) else {
            let mut available: Vec<String> =
                self.queues.keys().map(|k| format!("{}::{}", k.port, k.method)).collect();
            available.sort();
            return Err(format!(
                "Cassette exhausted: no interactions recorded for port={port:?} method={method:?}. \
                 Available port::method pairs: [{}]",
                available.join(", ")
            ));
        };

        let cursor = self.cursors.entry(key).or_insert(0);
        let interaction = queue.get(*cursor).ok_or_else(|| {
            format!(
                "Cassette exhausted: all {count} interactions for port={port:?} method={method:?} \
                 have been consumed.",
                count = queue.len(),
            )
        })?;
        *cursor += 1;
        Ok(interaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    fn make_cassette(interactions: Vec<Interaction>) -> Cassette {
        Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions,
        }
    }

    #[test]
    fn replay_in_order() {
        let cassette = make_cassette(vec![
            Interaction {
                seq: 0,
                port: "generation_service".into(),
                method: "generate_images".into(),
                input: json!({"prompt": "first"}),
                output: json!({"Ok": []}),
            },
            Interaction {
                seq: 1,
                port: "generation_service".into(),
                method: "generate_images".into(),
                input: json!({"prompt": "second"}),
                output: json!({"Ok": []}),
            },
        ]);

        let mut replayer = CassetteReplayer::new(&cassette);

        let i1 = replayer.next_interaction("generation_service", "generate_images").unwrap();
        assert_eq!(i1.seq, 0);

        let i2 = replayer.next_interaction("generation_service", "generate_images").unwrap();
        assert_eq!(i2.seq, 1);
    }

    #[test]
    fn exhausted_replayer_errors() {
        let cassette = make_cassette(vec![Interaction {
            seq: 0,
            port: "generation_service".into(),
            method: "generate_content".into(),
            input: json!({}),
            output: json!({}),
        }]);

        let mut replayer = CassetteReplayer::new(&cassette);
        assert!(replayer.next_interaction("generation_service", "generate_content").is_ok());
        let err = replayer.next_interaction("generation_service", "generate_content").unwrap_err();
        assert!(err.contains("Cassette exhausted"));
    }

    #[test]
    fn unknown_method_lists_available_pairs() {
        let cassette = make_cassette(vec![Interaction {
            seq: 0,
            port: "generation_service".into(),
            method: "generate_images".into(),
            input: json!({}),
            output: json!({}),
        }]);
        let mut replayer = CassetteReplayer::new(&cassette);
        let err = replayer.next_interaction("generation_service", "generate_content").unwrap_err();
        assert!(err.contains("no interactions recorded"));
        assert!(err.contains("generation_service::generate_images"));
    }
}
