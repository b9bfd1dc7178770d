use serde::{Deserialize, Deserializer, Serialize};

use crate::envelope::{SUCCESS, Signature};

/// Default page size for the log view.
pub const LOGS_PER_PAGE: u32 = 100;

/// A device log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Firmware builds disagree on whether this is a string or a number.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub message: String,
    pub timestamp: String,
}

fn string_or_number<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(de)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

pub const FETCH_LOGS_SUCCESS: Signature = SUCCESS;
pub const DELETE_LOG_SUCCESS: Signature = SUCCESS;
pub const CLEAR_LOGS_SUCCESS: Signature = SUCCESS;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn numeric_ids_become_strings() {
        let entry: LogEntry = serde_json::from_value(json!({
            "id": 42, "message": "boot", "timestamp": "2024-01-01 00:00:00"
        }))
        .unwrap();
        assert_eq!(entry.id, "42");
    }
}
