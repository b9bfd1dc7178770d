// ── Flash message ──
//
// At most one status message at a time. It expires a fixed interval after
// it was shown; showing another message restarts the interval.

use std::time::Duration;

use serde::Serialize;
use strum::{Display, IntoStaticStr};
use tokio::time::Instant;

/// How long a message stays visible.
pub const FLASH_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, IntoStaticStr, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
    #[default]
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlashMessage {
    pub message: String,
    pub kind: FlashKind,
}

#[derive(Debug, Clone)]
pub struct Flash {
    current: Option<(FlashMessage, Instant)>,
    ttl: Duration,
}

impl Default for Flash {
    fn default() -> Self {
        Self::new(FLASH_DURATION)
    }
}

impl Flash {
    pub fn new(ttl: Duration) -> Self {
        Self { current: None, ttl }
    }

    /// Replace the current message and restart the dismiss timer.
    pub fn show(&mut self, message: impl Into<String>, kind: FlashKind) -> &FlashMessage {
        let deadline = Instant::now() + self.ttl;
        let message = FlashMessage {
            message: message.into(),
            kind,
        };
        &self.current.insert((message, deadline)).0
    }

    pub fn success(&mut self, message: impl Into<String>) -> &FlashMessage {
        self.show(message, FlashKind::Success)
    }

    pub fn error(&mut self, message: impl Into<String>) -> &FlashMessage {
        self.show(message, FlashKind::Error)
    }

    pub fn info(&mut self, message: impl Into<String>) -> &FlashMessage {
        self.show(message, FlashKind::Info)
    }

    /// The visible message, if it has not expired yet.
    pub fn current(&self) -> Option<&FlashMessage> {
        match self.current {
            Some((ref msg, deadline)) if Instant::now() < deadline => Some(msg),
            _ => None,
        }
    }

    /// Dismiss immediately.
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Resolves once the current message has expired. Returns at once when
    /// nothing is shown.
    pub async fn dismissed(&self) {
        if let Some((_, deadline)) = self.current {
            tokio::time::sleep_until(deadline).await;
        }
    }
}
