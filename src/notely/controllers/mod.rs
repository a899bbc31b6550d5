//! # View Controllers
//!
//! One controller per screen. A controller owns its form state and drives
//! validation, the API client and the session store for that screen. None of
//! them print anything: outcomes come back as [`Submission`]s carrying a
//! [`Notice`] for the UI to show.
//!
//! API failures are never returned as `Err`. They become a failure notice and
//! the user may simply try again. `Err` is reserved for local failures such as
//! an unwritable session file.

use crate::validation::FieldErrors;

pub mod form;
pub mod login;
pub mod notes;
pub mod profile;
pub mod register;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A one-line user-facing message (toast or banner).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub content: String,
}

impl Notice {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            content: content.into(),
        }
    }
}

/// What happened when a form was submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Local validation failed; nothing was sent.
    Blocked(FieldErrors),
    /// This form already has a request in flight; nothing was sent.
    Busy,
    Completed(Notice),
    Failed(Notice),
}

impl Submission {
    pub fn is_completed(&self) -> bool {
        matches!(self, Submission::Completed(_))
    }

    pub fn notice(&self) -> Option<&Notice> {
        match self {
            Submission::Completed(notice) | Submission::Failed(notice) => Some(notice),
            Submission::Blocked(_) | Submission::Busy => None,
        }
    }
}
