//! CLI error types with miette diagnostics.
//!
//! Maps api, core, and config errors into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use latchkey_api::Error as ApiError;
use latchkey_config::ConfigError;
use latchkey_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Session ──────────────────────────────────────────────────────
    #[error("Not logged in")]
    #[diagnostic(
        code(latchkey::not_logged_in),
        help("`{route}` needs an authenticated session.\nRun: latchkey login <ip>")
    )]
    NotLoggedIn { route: &'static str },

    #[error("{message}")]
    #[diagnostic(
        code(latchkey::auth_failed),
        help("Check the device address and auth key, then run: latchkey login <ip>")
    )]
    AuthFailed { message: String },

    #[error("The device rejected the stored auth key: {message}")]
    #[diagnostic(
        code(latchkey::unauthorized),
        help("The key may have been changed. Run: latchkey login")
    )]
    Unauthorized { message: String },

    #[error("No auth key available for {ip}")]
    #[diagnostic(
        code(latchkey::no_credentials),
        help("Pass --auth-key, set LATCHKEY_AUTH_KEY, or run interactively to be prompted.")
    )]
    NoCredentials { ip: String },

    #[error("No device address given")]
    #[diagnostic(
        code(latchkey::no_device),
        help("Run: latchkey login <ip>, or set [device] ip in {path}")
    )]
    NoDevice { path: String },

    // ── Device responses ─────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(latchkey::conflict))]
    Conflict { message: String },

    #[error("{message}")]
    #[diagnostic(
        code(latchkey::not_found),
        help("Run: latchkey {list_command} to see what exists")
    )]
    NotFound {
        message: String,
        list_command: &'static str,
    },

    #[error("{message}")]
    #[diagnostic(code(latchkey::api_error), help("Device error code: {code}"))]
    Api { message: String, code: String },

    #[error("Could not reach the device")]
    #[diagnostic(
        code(latchkey::connection_failed),
        help("Check that the device is powered and on this network: {message}")
    )]
    ConnectionFailed { message: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(latchkey::timeout),
        help("Increase the timeout with --timeout or check the device's WiFi signal.")
    )]
    Timeout { seconds: u64 },

    #[error("Invalid response from server")]
    #[diagnostic(code(latchkey::invalid_response), help("{reason}"))]
    InvalidResponse { reason: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(latchkey::validation))]
    Validation { message: String },

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(latchkey::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Local state ──────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(latchkey::config))]
    Config(ConfigError),

    #[error("Session storage error: {0}")]
    #[diagnostic(code(latchkey::session))]
    Session(String),

    #[error("{0}")]
    #[diagnostic(code(latchkey::internal))]
    Internal(String),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render JSON output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not render YAML output: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::NotLoggedIn { .. }
            | Self::AuthFailed { .. }
            | Self::Unauthorized { .. }
            | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::NoDevice { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

// ── ApiError → CliError mapping ──────────────────────────────────────

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Validation { field, message } => Self::Validation {
                message: format!("Invalid {field}: {message}"),
            },
            e @ ApiError::FirmwareTooLarge { .. } => Self::validation(e.to_string()),
            ApiError::Authentication { message, .. } => Self::AuthFailed { message },
            ApiError::Unauthorized { message } => Self::Unauthorized { message },
            ApiError::Conflict { message, .. } => Self::Conflict { message },
            ApiError::Api {
                message,
                status: None,
                ..
            } => Self::ConnectionFailed { message },
            ApiError::Api {
                message,
                code,
                status: Some(404),
            } => Self::NotFound {
                message: format!("{message} ({code})"),
                list_command: "menu",
            },
            ApiError::Api { message, code, .. } => Self::Api { message, code },
            ApiError::Timeout { timeout_secs } => Self::Timeout {
                seconds: timeout_secs,
            },
            ApiError::InvalidResponse { reason, body } => {
                tracing::debug!(%body, "invalid response body");
                Self::InvalidResponse { reason }
            }
            ApiError::Session(message) => Self::Session(message),
            e @ (ApiError::Setup(_) | ApiError::InvalidUrl(_)) => Self::Internal(e.to_string()),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { ip } => Self::NoCredentials { ip },
            other => Self::Config(other),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Storage(message) => Self::Session(message),
            CoreError::Api(e) => e.into(),
        }
    }
}
