//! Short-lived user notices ("toasts").

use std::collections::VecDeque;

use chrono::{DateTime, TimeDelta, Utc};

/// Maximum number of notices kept at once; the oldest is dropped first.
const MAX_NOTICES: usize = 8;

/// How long a notice stays visible by default.
const DEFAULT_TTL_SECS: i64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub level: NoticeLevel,
    pub created_at: DateTime<Utc>,
}

/// Fire-and-forget notice queue shared by both panels.
#[derive(Debug, Clone)]
pub struct Notices {
    entries: VecDeque<Notice>,
    ttl: TimeDelta,
}

impl Default for Notices {
    fn default() -> Self {
        Self::with_ttl(TimeDelta::seconds(DEFAULT_TTL_SECS))
    }
}

impl Notices {
    pub fn with_ttl(ttl: TimeDelta) -> Self {
        Self {
            entries: VecDeque::with_capacity(MAX_NOTICES),
            ttl,
        }
    }

    pub fn info(&mut self, title: impl Into<String>, description: impl Into<String>) {
        self.push_at(NoticeLevel::Info, title, description, Utc::now());
    }

    pub fn error(&mut self, title: impl Into<String>, description: impl Into<String>) {
        self.push_at(NoticeLevel::Error, title, description, Utc::now());
    }

    pub fn push_at(
        &mut self,
        level: NoticeLevel,
        title: impl Into<String>,
        description: impl Into<String>,
        created_at: DateTime<Utc>,
    ) {
        if self.entries.len() == MAX_NOTICES {
            self.entries.pop_front();
        }
        self.entries.push_back(Notice {
            title: title.into(),
            description: description.into(),
            level,
            created_at,
        });
    }

    /// Drops every notice that has been visible for the whole TTL.
    pub fn expire(&mut self, now: DateTime<Utc>) {
        let ttl = self.ttl;
        self.entries.retain(|notice| now - notice.created_at < ttl);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
