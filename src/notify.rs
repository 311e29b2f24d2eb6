use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// A user-facing message. The core only picks the level and text;
/// presenting it is up to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Fire-and-forget notification sink.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Collects notices raised while handling one request so they can be
/// returned with the response.
#[derive(Debug, Default)]
pub struct NoticeBuffer {
    notices: Mutex<Vec<Notice>>,
}

impl NoticeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<Notice> {
        let mut notices = self.notices.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *notices)
    }
}

impl Notifier for NoticeBuffer {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => tracing::info!(text = %notice.message, "notice raised"),
            NoticeLevel::Warning => tracing::warn!(text = %notice.message, "notice raised"),
            NoticeLevel::Error => tracing::error!(text = %notice.message, "notice raised"),
        }
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}
