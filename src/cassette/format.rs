//! Cassette data structures for recording and replaying interactions.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded call to a port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Sequence number, assigned by the recorder.
    pub seq: u64,
    /// Port name (`tasks`, `clock`, `fs`, ...).
    pub port: String,
    /// Method invoked on the port.
    pub method: String,
    /// Arguments as JSON.
    pub input: serde_json::Value,
    /// Return value as JSON; results use `{"Ok": v}` / `{"Err": e}`.
    pub output: serde_json::Value,
}

/// An ordered list of interactions plus metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name.
    pub name: String,
    /// When the cassette was written.
    pub recorded_at: DateTime<Utc>,
    /// Source revision at recording time, or `unknown`.
    pub commit: String,
    /// Interactions in call order.
    pub interactions: Vec<Interaction>,
}

impl Cassette {
    /// Reads and parses a YAML cassette.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a cassette.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))
    }

    /// Number of interactions recorded for `port`.
    #[must_use]
    pub fn count_for(&self, port: &str) -> usize {
        self.interactions.iter().filter(|i| i.port == port).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_cassette() -> Cassette {
        Cassette {
            name: "board-load".into(),
            recorded_at: Utc::now(),
            commit: "abc123".into(),
            interactions: vec![
                Interaction {
                    seq: 0,
                    port: "clock".into(),
                    method: "now".into(),
                    input: json!(null),
                    output: json!("2025-04-10T12:00:00+02:00"),
                },
                Interaction {
                    seq: 1,
                    port: "tasks".into(),
                    method: "list".into(),
                    input: json!(null),
                    output: json!({"Ok": [
                        {"id": "1", "title": "Write report", "dueDate": "2025-04-10"}
                    ]}),
                },
            ],
        }
    }

    #[test]
    fn survives_yaml() {
        let cassette = sample_cassette();
        let yaml = serde_yaml::to_string(&cassette).expect("serialize");
        let parsed: Cassette = serde_yaml::from_str(&yaml).expect("deserialize");
        assert_eq!(cassette, parsed);
        assert_eq!(parsed.count_for("tasks"), 1);
        assert_eq!(parsed.count_for("insights"), 0);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Cassette::load(Path::new("/nonexistent/tasks.cassette.yaml")).unwrap_err();
        assert!(err.contains("Failed to read cassette file"));
    }
}
