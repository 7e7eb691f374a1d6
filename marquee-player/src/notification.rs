use std::time::{Duration, Instant};

use crate::progress::SeekAck;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Seek,
    Fallback,
    Ended,
}

/// Transient message shown over the player.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub expires_at: Instant,
}

impl Notification {
    pub fn new(
        kind: NotificationKind,
        message: impl Into<String>,
        now: Instant,
        ttl: Duration,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            expires_at: now + ttl,
        }
    }

    pub fn seek(ack: SeekAck, now: Instant, ttl: Duration) -> Self {
        Self::new(NotificationKind::Seek, ack.to_string(), now, ttl)
    }

    pub fn fallback(now: Instant, ttl: Duration) -> Self {
        Self::new(
            NotificationKind::Fallback,
            "Movie not available. Trying to load trailer...",
            now,
            ttl,
        )
    }

    pub fn ended(now: Instant, ttl: Duration) -> Self {
        Self::new(
            NotificationKind::Ended,
            "Video ended. Check out related content below!",
            now,
            ttl,
        )
    }

    pub fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}
