//! Transient notifications. Several may be visible at once; each closes on its
//! own after `NOTIFICATION_TTL` or earlier when dismissed. Messages are shown
//! to the user as-is and must never contain tokens or passwords.

use std::time::{Duration, Instant};

pub const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

impl NotificationKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    shown_at: Instant,
}

#[derive(Debug, Default)]
pub struct Notifications {
    next_id: u64,
    stack: Vec<Notification>,
}

impl Notifications {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a notification and returns its id for early dismissal.
    pub fn show(&mut self, message: impl Into<String>, kind: NotificationKind, now: Instant) -> u64 {
        self.next_id += 1;
        self.stack.push(Notification {
            id: self.next_id,
            kind,
            message: message.into(),
            shown_at: now,
        });
        self.next_id
    }

    /// Returns `false` if the notification was already gone.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.stack.len();
        self.stack.retain(|notification| notification.id != id);
        self.stack.len() != before
    }

    /// Drops every notification older than the TTL.
    pub fn expire(&mut self, now: Instant) {
        self.stack
            .retain(|notification| now.saturating_duration_since(notification.shown_at) < NOTIFICATION_TTL);
    }

    /// Removes and returns everything currently shown, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.stack)
    }

    #[must_use]
    pub fn active(&self) -> &[Notification] {
        &self.stack
    }
}
