//! User-facing notifications and view signals.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use storecart_core::ValueObject;

/// How long a renderer keeps a notification on screen before dismissing it.
pub const NOTIFICATION_TTL: Duration = Duration::from_millis(3000);

/// Styling class of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Info,
    Error,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Info => "info",
            NotificationKind::Error => "error",
        }
    }
}

impl core::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transient message for the notification renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, message)
    }

    /// Auto-dismiss delay for renderers that honour it.
    pub fn ttl(&self) -> Duration {
        NOTIFICATION_TTL
    }
}

impl ValueObject for Notification {}

/// Something the presentation layer should react to after a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum UiSignal {
    /// Show a transient notification.
    Notify(Notification),
    /// Re-render the cart view from a fresh snapshot.
    RefreshView,
}
