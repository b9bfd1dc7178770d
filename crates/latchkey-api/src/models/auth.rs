use serde::{Deserialize, Serialize};

/// Body returned by `POST /auth-key`. Not an envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub success: bool,
}

/// Login failure messages, keyed by what came back.
pub const INVALID_KEY_MESSAGE: &str = "Invalid authentication key";
pub const DEVICE_ERROR_MESSAGE: &str = "Device error during authentication";
pub const AUTH_FAILED_MESSAGE: &str = "Authentication failed";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error occurred";
