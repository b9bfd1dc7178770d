use serde::{Deserialize, Serialize};

use crate::envelope::{CONFLICT_ERROR, Envelope, SUCCESS, Signature, Status};

/// A registered access card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: u32,
    pub number: String,
    #[serde(default)]
    pub personal_id: Option<String>,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Partial card payload for create and update.
///
/// Every field is optional; the device decides what is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// Update body: the draft plus the card id.
#[derive(Debug, Serialize)]
pub(crate) struct CardUpdate<'a> {
    pub id: u32,
    #[serde(flatten)]
    pub draft: &'a CardDraft,
}

/// `data` of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedCard {
    pub number: String,
    #[serde(default)]
    pub personal_id: Option<String>,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// A card seen by the reader that is not registered yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnregisteredCard {
    pub card_number: String,
    pub last_seen: String,
}

/// `GET /latest-card-reads` result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnregisteredCards {
    pub count: u64,
    pub timestamp: Option<i64>,
    pub cards: Vec<UnregisteredCard>,
}

/// Registration succeeded: `success` + 201.
pub const CREATE_CARD_SUCCESS: Signature = Signature::coded(Status::Success, &[201]);

/// Card number already registered: `error` + 409.
pub const CREATE_CARD_ERROR: Signature = CONFLICT_ERROR;

/// Update, delete, and clear only promise the status tag.
pub const CARD_MUTATION_SUCCESS: Signature = SUCCESS;

pub fn is_create_card_success(env: &Envelope) -> bool {
    CREATE_CARD_SUCCESS.matches(env)
}

pub fn is_create_card_error(env: &Envelope) -> bool {
    CREATE_CARD_ERROR.matches(env)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn env(value: serde_json::Value) -> Envelope {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn create_success_needs_status_and_201() {
        assert!(is_create_card_success(&env(
            json!({"status": "success", "code": 201, "data": {}})
        )));
        assert!(!is_create_card_success(&env(
            json!({"status": "success", "code": 200, "data": {}})
        )));
        assert!(!is_create_card_success(&env(json!({"status": "success"}))));
        assert!(!is_create_card_success(&env(
            json!({"status": "error", "code": 201})
        )));
        assert!(!is_create_card_success(&env(json!({"code": 201}))));
    }

    #[test]
    fn create_error_needs_error_and_409() {
        assert!(is_create_card_error(&env(
            json!({"status": "error", "code": 409, "data": {"card_number": "A1"}})
        )));
        assert!(!is_create_card_error(&env(
            json!({"status": "error", "code": 500})
        )));
        assert!(!is_create_card_error(&env(
            json!({"status": "success", "code": 409})
        )));
    }

    #[test]
    fn draft_omits_unset_fields() {
        let draft = CardDraft {
            number: Some("0012AB".into()),
            ..CardDraft::default()
        };
        let body = serde_json::to_value(CardUpdate {
            id: 4,
            draft: &draft,
        })
        .unwrap();
        assert_eq!(body, json!({"id": 4, "number": "0012AB"}));
    }

    #[test]
    fn card_tolerates_null_personal_id() {
        let card: Card = serde_json::from_value(json!({
            "id": 1, "number": "AA", "personal_id": null, "start_date": "2024-01-01"
        }))
        .unwrap();
        assert_eq!(card.personal_id, None);
        assert_eq!(card.end_date, None);
    }
}
