use thiserror::Error;

/// Message substituted when a failed response carries no `message`.
pub const DEFAULT_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Code substituted when a failed response carries no `code`.
pub const DEFAULT_ERROR_CODE: &str = "UNKNOWN_ERROR";

/// Top-level error type for the `latchkey-api` crate.
///
/// Every failure a caller can observe is one of these variants; raw
/// `reqwest` errors are normalized before they leave the client.
#[derive(Debug, Error)]
pub enum Error {
    // ── Local validation ────────────────────────────────────────────
    /// Input rejected before any request was made.
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// Firmware image exceeds the device's upload ceiling.
    #[error(
        "Firmware file size ({:.2}MB) exceeds maximum allowed size ({}MB)",
        crate::models::firmware::as_megabytes(.size),
        .max / (1024 * 1024)
    )]
    FirmwareTooLarge { size: u64, max: u64 },

    // ── Authentication ──────────────────────────────────────────────
    /// Login failed. The session has already been reverted to logged-out.
    /// `responded` is false when the device was never reached.
    #[error("{message}")]
    Authentication { message: String, responded: bool },

    /// The device rejected the `X-Auth-Key` header (code 401).
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    // ── Server-signaled failures ────────────────────────────────────
    /// The resource already exists (code 409).
    #[error("{message}")]
    Conflict {
        message: String,
        data: serde_json::Value,
    },

    /// Normalized `{message, code}` failure. `status` is `None` when no
    /// response was received at all.
    #[error("{message}")]
    Api {
        message: String,
        code: String,
        status: Option<u16>,
    },

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data ────────────────────────────────────────────────────────
    /// Success envelope was missing or did not match its declared shape.
    #[error("Invalid response from server")]
    InvalidResponse { reason: String, body: String },

    // ── Session ─────────────────────────────────────────────────────
    /// Loading or saving the session context failed.
    #[error("Session storage error: {0}")]
    Session(String),

    /// The HTTP client could not be built.
    #[error("HTTP client setup failed: {0}")]
    Setup(String),

    /// URL construction failed (bad IP / port in the connection details).
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Normalize a transport failure that produced no response.
    pub(crate) fn no_response(err: &reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout { timeout_secs }
        } else {
            Self::Api {
                message: DEFAULT_ERROR_MESSAGE.into(),
                code: DEFAULT_ERROR_CODE.into(),
                status: None,
            }
        }
    }

    /// Returns `true` if a response was received from the device.
    pub fn has_response(&self) -> bool {
        match self {
            Self::Api { status, .. } => status.is_some(),
            Self::Authentication { responded, .. } => *responded,
            Self::Timeout { .. }
            | Self::Validation { .. }
            | Self::FirmwareTooLarge { .. }
            | Self::Session(_)
            | Self::Setup(_)
            | Self::InvalidUrl(_) => false,
            _ => true,
        }
    }

    /// HTTP status of the failed response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            Self::Unauthorized { .. } => Some(401),
            Self::Conflict { .. } => Some(409),
            _ => None,
        }
    }

    /// The normalized error code (`"UNKNOWN_ERROR"` when the server gave none).
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Returns `true` if re-running `login` might resolve this error.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Unauthorized { .. } | Self::Authentication { .. })
    }

    /// Returns `true` if the failure happened before any request was sent.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::FirmwareTooLarge { .. } | Self::InvalidUrl(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn firmware_too_large_reports_megabytes() {
        let err = Error::FirmwareTooLarge {
            size: 3 * 1024 * 1024 + 512 * 1024,
            max: 2 * 1024 * 1024,
        };
        assert_eq!(
            err.to_string(),
            "Firmware file size (3.50MB) exceeds maximum allowed size (2MB)"
        );
        assert!(err.is_local());
    }

    #[test]
    fn api_error_without_status_has_no_response() {
        let err = Error::Api {
            message: DEFAULT_ERROR_MESSAGE.into(),
            code: DEFAULT_ERROR_CODE.into(),
            status: None,
        };
        assert!(!err.has_response());
        assert_eq!(err.code(), Some("UNKNOWN_ERROR"));
        assert_eq!(err.to_string(), "An unexpected error occurred");
    }

    #[test]
    fn unreachable_device_login_has_no_response() {
        let err = Error::Authentication {
            message: "Network error occurred".into(),
            responded: false,
        };
        assert!(!err.has_response());
        assert!(err.is_auth_expired());

        let err = Error::Authentication {
            message: "Invalid authentication key".into(),
            responded: true,
        };
        assert!(err.has_response());
    }

    #[test]
    fn invalid_response_message() {
        let err = Error::InvalidResponse {
            reason: "missing status".into(),
            body: "{}".into(),
        };
        assert_eq!(err.to_string(), "Invalid response from server");
        assert!(err.has_response());
    }
}
