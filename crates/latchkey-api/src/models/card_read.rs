use serde::{Deserialize, Serialize};

use crate::envelope::{Envelope, SUCCESS, Signature, Status};

/// A single reader event. Append-only on the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRead {
    pub id: u32,
    pub card_number: String,
    pub timestamp: String,
    #[serde(rename = "type")]
    pub read_type: String,
}

/// `data` of `DELETE /card-reads`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadsRemoved {
    pub reads_removed: u64,
    pub timestamp: i64,
}

pub const FETCH_CARD_READS_SUCCESS: Signature = SUCCESS;

pub const DELETE_CARD_READ_SUCCESS: Signature = SUCCESS;

pub const DELETE_ALL_CARD_READS_SUCCESS: Signature =
    Signature::coded(Status::Success, &[200]).requiring(&["reads_removed"]);

pub fn is_delete_all_card_reads_success(env: &Envelope) -> bool {
    DELETE_ALL_CARD_READS_SUCCESS.matches(env)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::envelope::{is_auth_error, is_operation_error};

    #[test]
    fn delete_all_discrimination() {
        let ok: Envelope = serde_json::from_value(json!({
            "status": "success", "code": 200, "message": "cleared",
            "data": {"reads_removed": 12, "timestamp": 1_700_000_000}
        }))
        .unwrap();
        let denied: Envelope = serde_json::from_value(json!({
            "status": "error", "code": 401, "message": "Unauthorized"
        }))
        .unwrap();

        assert!(is_delete_all_card_reads_success(&ok));
        assert!(!is_delete_all_card_reads_success(&denied));
        assert!(is_auth_error(&denied));
        assert!(!is_operation_error(&denied));
    }

    #[test]
    fn read_type_field_is_renamed() {
        let read: CardRead = serde_json::from_value(json!({
            "id": 3, "card_number": "0AF3", "timestamp": "2024-05-01 08:00:00", "type": "entry"
        }))
        .unwrap();
        assert_eq!(read.read_type, "entry");
    }
}
