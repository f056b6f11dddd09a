//! In-process notice bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`NoticeBus`] is shared via `Arc<NoticeBus>` between the editor session
//! and the host UI.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Notice
// ---------------------------------------------------------------------------

/// Severity of a notice, mapped to toast styling by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A message to show the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }
}

// ---------------------------------------------------------------------------
// NoticeBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 64;

/// Fan-out channel for [`Notice`]s.
///
/// ```rust
/// use deskplan_events::{Notice, NoticeBus};
///
/// let bus = NoticeBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(Notice::error("Failed to delete desk"));
/// ```
pub struct NoticeBus {
    sender: broadcast::Sender<Notice>,
}

impl NoticeBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest notices are dropped and slow
    /// receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a notice to all current subscribers.
    pub fn publish(&self, notice: Notice) {
        tracing::debug!(level = ?notice.level, message = %notice.message, "Notice published");
        // A send error only means nobody is listening.
        let _ = self.sender.send(notice);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.sender.subscribe()
    }
}

impl Default for NoticeBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
