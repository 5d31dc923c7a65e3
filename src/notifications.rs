//! Transient user-visible notifications
//!
//! Every caught operation error, and every lifecycle milestone worth telling
//! the user about, surfaces here as a notification that auto-dismisses after
//! a fixed duration. Frontends render [`NotificationCenter::active`] however
//! they like; the library owns the lifetime.

use crate::types::Event;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast;

/// Notification severity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Something worked
    Success,
    /// Something failed
    Error,
}

/// Locally unique identifier for a posted notification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(u64);

/// One transient notification
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Notification {
    /// Identifier for explicit dismissal
    pub id: NotificationId,
    /// Severity
    pub kind: NotificationKind,
    /// Text to display
    pub message: String,
    /// When the notification was posted
    pub posted_at: DateTime<Utc>,
}

/// Cloneable handle to the shared notification list
///
/// Posting spawns an auto-dismiss task, so a [`NotificationCenter`] must live
/// inside a tokio runtime.
#[derive(Clone, Debug)]
pub struct NotificationCenter {
    inner: Arc<Mutex<Vec<Notification>>>,
    next_id: Arc<AtomicU64>,
    dismiss_after: Duration,
    event_tx: broadcast::Sender<Event>,
}

impl NotificationCenter {
    /// Create a center whose notifications dismiss after `dismiss_after`
    pub(crate) fn new(dismiss_after: Duration, event_tx: broadcast::Sender<Event>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(0)),
            dismiss_after,
            event_tx,
        }
    }

    /// Post a notification; it dismisses itself after the configured duration
    pub fn post(&self, kind: NotificationKind, message: impl Into<String>) -> NotificationId {
        let message = message.into();
        let id = NotificationId(self.next_id.fetch_add(1, Ordering::Relaxed));

        self.lock().push(Notification {
            id,
            kind,
            message: message.clone(),
            posted_at: Utc::now(),
        });

        self.event_tx
            .send(Event::Notified {
                kind,
                message: message.clone(),
            })
            .ok();
        tracing::debug!(kind = ?kind, message = %message, "notification posted");

        let center = self.clone();
        let dismiss_after = self.dismiss_after;
        tokio::spawn(async move {
            tokio::time::sleep(dismiss_after).await;
            center.dismiss(id);
        });

        id
    }

    /// Dismiss a notification before its timer fires.
    ///
    /// Returns false if it was already gone.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        let mut notifications = self.lock();
        let before = notifications.len();
        notifications.retain(|n| n.id != id);
        notifications.len() != before
    }

    /// The currently active notifications, oldest first
    pub fn active(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn center(dismiss_after: Duration) -> (NotificationCenter, broadcast::Receiver<Event>) {
        let (event_tx, event_rx) = broadcast::channel(16);
        (NotificationCenter::new(dismiss_after, event_tx), event_rx)
    }

    #[tokio::test]
    async fn test_post_makes_notification_active() {
        let (center, _rx) = center(Duration::from_secs(4));
        center.post(NotificationKind::Success, "Download started");

        let active = center.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].kind, NotificationKind::Success);
        assert_eq!(active[0].message, "Download started");
    }

    #[tokio::test(start_paused = true)]
    async fn test_notifications_auto_dismiss() {
        let (center, _rx) = center(Duration::from_secs(4));
        center.post(NotificationKind::Error, "Download failed");
        assert_eq!(center.active().len(), 1);

        tokio::time::sleep(Duration::from_millis(4100)).await;
        assert!(center.active().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_notifications_survive_until_their_deadline() {
        let (center, _rx) = center(Duration::from_secs(4));
        center.post(NotificationKind::Success, "still here");

        tokio::time::sleep(Duration::from_millis(3900)).await;
        assert_eq!(center.active().len(), 1);
    }

    #[tokio::test]
    async fn test_explicit_dismiss() {
        let (center, _rx) = center(Duration::from_secs(60));
        let id = center.post(NotificationKind::Success, "bye");
        assert!(center.dismiss(id));
        assert!(!center.dismiss(id));
        assert!(center.active().is_empty());
    }

    #[tokio::test]
    async fn test_post_emits_notified_event() {
        let (center, mut rx) = center(Duration::from_secs(4));
        center.post(NotificationKind::Error, "oops");

        let event = rx.try_recv().unwrap();
        match event {
            Event::Notified { kind, message } => {
                assert_eq!(kind, NotificationKind::Error);
                assert_eq!(message, "oops");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let (center, _rx) = center(Duration::from_secs(60));
        let a = center.post(NotificationKind::Success, "a");
        let b = center.post(NotificationKind::Success, "b");
        assert_ne!(a, b);
        assert_eq!(center.active().len(), 2);
    }
}
