//! Import event log entries.

use serde::{Deserialize, Serialize};

/// Logged when an import yields neither transactions nor parsing errors.
pub const NULL_PARSE_MESSAGE: &str =
    "No results from parsing file. Do you have the right bank and file type selected?";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InfoLogEvent {
    pub iso_timestamp: String,
    /// File name (or other origin) the event is about
    pub source: String,
    pub message: String,
}

impl InfoLogEvent {
    pub fn new(
        iso_timestamp: impl Into<String>,
        source: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            iso_timestamp: iso_timestamp.into(),
            source: source.into(),
            message: message.into(),
        }
    }
}

/// One event per parsing error, all stamped with the same time.
pub fn parsing_errors_to_events(
    source: &str,
    errors: &[String],
    iso_timestamp: &str,
) -> Vec<InfoLogEvent> {
    errors
        .iter()
        .map(|message| InfoLogEvent::new(iso_timestamp, source, message.as_str()))
        .collect()
}
