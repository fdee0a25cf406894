//! # Notifier
//!
//! User-facing notices ("Item added to cart", "order failed", ...).
//!
//! How a notice is displayed is up to the host: the CLI prints it, tests
//! record it, and [`TracingNotifier`] just logs it.

use std::sync::Mutex;

use tracing::{info, warn};

/// Tone of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A notice as delivered to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Sink for user-facing notices.
pub trait Notifier: Send + Sync {
    /// Delivers one notice.
    fn notify(&self, level: NoticeLevel, message: &str);

    fn success(&self, message: &str) {
        self.notify(NoticeLevel::Success, message);
    }

    fn error(&self, message: &str) {
        self.notify(NoticeLevel::Error, message);
    }
}

/// Logs notices through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Success => info!(notice = %message, "notice"),
            NoticeLevel::Error => warn!(notice = %message, "notice"),
        }
    }
}

/// Keeps every notice for later inspection (tests).
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every notice so far, oldest first.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().map(|n| n.clone()).unwrap_or_default()
    }

    /// Just the messages.
    pub fn messages(&self) -> Vec<String> {
        self.notices().into_iter().map(|n| n.message).collect()
    }

    /// The most recent message.
    pub fn last_message(&self) -> Option<String> {
        self.notices().pop().map(|n| n.message)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(Notice {
                level,
                message: message.to_string(),
            });
        }
    }
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, level: NoticeLevel, message: &str) {
        (**self).notify(level, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier_keeps_order_and_level() {
        let notifier = RecordingNotifier::new();
        notifier.success("Item added to cart");
        notifier.error("order failed");

        assert_eq!(notifier.messages(), vec!["Item added to cart", "order failed"]);
        assert_eq!(notifier.notices()[1].level, NoticeLevel::Error);
        assert_eq!(notifier.last_message().as_deref(), Some("order failed"));
    }

    #[test]
    fn test_reference_forwards() {
        let notifier = RecordingNotifier::new();
        let by_ref = &notifier;
        by_ref.success("Registered");
        assert_eq!(notifier.messages(), vec!["Registered"]);
    }
}
