//! User-facing notices emitted by the planner.
//!
//! Notices are brief messages ("moved to 10:00", "trip too long") that the
//! presentation layer shows transiently. The planner queues them; the UI
//! drains the queue after each interaction.

use crate::models::plan_item::PlanItemId;

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn icon(&self) -> &'static str {
        match self {
            NoticeLevel::Info => "ℹ",
            NoticeLevel::Warning => "⚠",
            NoticeLevel::Error => "✗",
        }
    }
}

/// What triggered a notice, for callers that react to more than the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeKind {
    /// A drop overlapped and was shifted.
    ConflictShifted {
        item_id: PlanItemId,
        day_index: usize,
        original_start: u32,
        resolved_start: u32,
    },
    /// A drop overlapped and the single shift found no room.
    ConflictBlocked {
        item_id: PlanItemId,
        day_index: usize,
        original_start: u32,
        committed: bool,
    },
    /// Rejected input: trip dates, windows, resize frames.
    Validation,
    /// Saving or loading failed; the in-memory plan is unaffected.
    Persistence,
    /// Items moved back to the pool by a trip change or restore.
    ReturnedToPool { count: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
    pub kind: NoticeKind,
}

impl Notice {
    pub fn new(message: impl Into<String>, level: NoticeLevel, kind: NoticeKind) -> Self {
        Self {
            message: message.into(),
            level,
            kind,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(message, NoticeLevel::Warning, NoticeKind::Validation)
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::new(message, NoticeLevel::Error, NoticeKind::Persistence)
    }

    /// Display form with the level icon, e.g. `⚠ Trip too long`.
    pub fn display(&self) -> String {
        format!("{} {}", self.level.icon(), self.message)
    }
}

/// FIFO of pending notices.
#[derive(Debug, Default)]
pub struct NoticeQueue {
    pending: Vec<Notice>,
}

impl NoticeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => log::warn!("{}", notice.message),
            _ => log::info!("{}", notice.message),
        }
        self.pending.push(notice);
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Take every pending notice, oldest first.
    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.pending)
    }
}
