use serde::{Deserialize, Serialize, Serializer};

use crate::envelope::{Envelope, Page, SUCCESS, Signature, Status};

/// A stored network.
///
/// The password is masked whenever this value is serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiNetwork {
    pub id: u32,
    pub ssid: String,
    #[serde(serialize_with = "serialize_masked_password")]
    pub password: String,
}

/// Display form of a stored password. Open networks stay empty.
pub fn masked_password(password: &str) -> &'static str {
    if password.is_empty() {
        ""
    } else {
        "********"
    }
}

fn serialize_masked_password<S: Serializer>(password: &str, ser: S) -> Result<S::Ok, S::Error> {
    ser.serialize_str(masked_password(password))
}

/// Create/update payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiCredentials {
    pub ssid: String,
    pub password: String,
}

/// The network the device is joined to right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentConnection {
    pub ssid: String,
    pub ip: String,
    pub mac: String,
}

/// `GET /wifi` result: a page of networks plus the live connection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WifiList {
    #[serde(flatten)]
    pub page: Page<WifiNetwork>,
    pub current_connection: Option<CurrentConnection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiDeleted {
    pub deleted: bool,
}

/// `data` of `DELETE /wifi`. The factory credentials are never removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiCleared {
    pub cleared_count: u64,
    #[serde(default)]
    pub default_credentials_preserved: bool,
}

pub const CREATE_WIFI_SUCCESS: Signature = SUCCESS;
pub const UPDATE_WIFI_SUCCESS: Signature = SUCCESS;
pub const DELETE_WIFI_SUCCESS: Signature = SUCCESS;
pub const DELETE_ALL_WIFI_SUCCESS: Signature = SUCCESS;

pub fn is_create_wifi_success(env: &Envelope) -> bool {
    CREATE_WIFI_SUCCESS.matches(env)
}

pub fn is_update_wifi_success(env: &Envelope) -> bool {
    UPDATE_WIFI_SUCCESS.matches(env)
}

pub fn is_delete_wifi_success(env: &Envelope) -> bool {
    DELETE_WIFI_SUCCESS.matches(env)
}

pub fn is_delete_all_wifi_success(env: &Envelope) -> bool {
    DELETE_ALL_WIFI_SUCCESS.matches(env)
}

/// WiFi failures are `status == "error"` with a non-empty message.
pub fn is_wifi_error(env: &Envelope) -> bool {
    env.status() == Some(Status::Error) && env.message.as_deref().is_some_and(|m| !m.is_empty())
}

pub fn is_create_wifi_error(env: &Envelope) -> bool {
    is_wifi_error(env)
}

pub fn is_update_wifi_error(env: &Envelope) -> bool {
    is_wifi_error(env)
}

pub fn is_delete_wifi_error(env: &Envelope) -> bool {
    is_wifi_error(env)
}

pub fn is_delete_all_wifi_error(env: &Envelope) -> bool {
    is_wifi_error(env)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn error_predicate_requires_message() {
        let with_msg: Envelope =
            serde_json::from_value(json!({"status": "error", "code": 400, "message": "SSID taken"}))
                .unwrap();
        let empty: Envelope =
            serde_json::from_value(json!({"status": "error", "message": ""})).unwrap();
        let bare: Envelope = serde_json::from_value(json!({"status": "error"})).unwrap();

        assert!(is_create_wifi_error(&with_msg));
        assert!(!is_update_wifi_error(&empty));
        assert!(!is_delete_wifi_error(&bare));
        assert!(!is_delete_all_wifi_success(&with_msg));
    }

    #[test]
    fn stored_password_never_serializes() {
        let list = WifiList {
            page: Page {
                items: vec![
                    WifiNetwork {
                        id: 1,
                        ssid: "office".into(),
                        password: "hunter2hunter2".into(),
                    },
                    WifiNetwork {
                        id: 2,
                        ssid: "guest".into(),
                        password: String::new(),
                    },
                ],
                pagination: None,
            },
            current_connection: None,
        };

        let out = serde_json::to_string(&list).unwrap();
        assert!(!out.contains("hunter2"));
        let value = serde_json::to_value(&list).unwrap();
        assert_eq!(value["items"][0]["password"], "********");
        assert_eq!(value["items"][1]["password"], "");
    }

    #[test]
    fn cleared_defaults_preserved_flag() {
        let cleared: WifiCleared = serde_json::from_value(json!({"cleared_count": 2})).unwrap();
        assert_eq!(cleared.cleared_count, 2);
        assert!(!cleared.default_credentials_preserved);
    }
}
