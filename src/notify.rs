use chrono::{DateTime, Duration, Utc};
use std::collections::VecDeque;

/// How long a banner stays visible unless told otherwise.
pub const DEFAULT_NOTICE_MS: i64 = 2000;

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub message: String,
    pub expires_at: DateTime<Utc>,
}

/// Self-dismissing messages. The view renders `active`, then calls `expire`.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    notices: VecDeque<Notice>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>, duration: Duration) {
        self.push_at(message, duration, Utc::now());
    }

    pub fn push_at(&mut self, message: impl Into<String>, duration: Duration, now: DateTime<Utc>) {
        self.notices.push_back(Notice {
            message: message.into(),
            expires_at: now + duration,
        });
    }

    pub fn active(&self, now: DateTime<Utc>) -> impl Iterator<Item = &Notice> {
        self.notices.iter().filter(move |n| n.expires_at > now)
    }

    /// Drop expired notices and return how many were removed.
    pub fn expire(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.notices.len();
        self.notices.retain(|n| n.expires_at > now);
        before - self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notices_expire() {
        let now = Utc::now();
        let mut queue = NotificationQueue::new();
        queue.push_at("✓ Draft Saved", Duration::milliseconds(DEFAULT_NOTICE_MS), now);
        queue.push_at("long", Duration::seconds(10), now);

        assert_eq!(queue.active(now).count(), 2);
        let later = now + Duration::seconds(3);
        assert_eq!(queue.active(later).count(), 1);
        assert_eq!(queue.expire(later), 1);
        assert_eq!(queue.active(later).next().unwrap().message, "long");

        queue.expire(now + Duration::seconds(11));
        assert!(queue.is_empty());
    }
}
