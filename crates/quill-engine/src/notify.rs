//! Notices - what the presentation layer hears about a flow

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::{EngineError, MissingControl};

pub const FILLED: &str = "Reply filled! Click Send to post.";
pub const DIALOG_NOT_FOUND: &str = "Reply dialog not found. Text copied to clipboard.";
pub const FILL_FAILED: &str = "Could not fill text. Text copied to clipboard.";
pub const REPLY_ACTION_NOT_FOUND: &str = "Could not find reply button. Try refreshing the page.";
pub const COPIED: &str = "Reply copied to clipboard";
pub const NOTHING_TO_COPY: &str = "No reply to copy yet";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

/// One user-facing outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: &str) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.to_string(),
        }
    }

    pub fn failure(message: &str) -> Self {
        Self {
            kind: NoticeKind::Failure,
            message: message.to_string(),
        }
    }

    /// User-facing wording for a failed flow
    pub fn from_error(error: &EngineError) -> Self {
        match error {
            EngineError::ControlNotFound(MissingControl::ReplyAction) => Self::failure(REPLY_ACTION_NOT_FOUND),
            EngineError::SurfaceNotFound { .. } | EngineError::ControlNotFound(MissingControl::Editable) => {
                Self::failure(DIALOG_NOT_FOUND)
            }
            EngineError::InjectionUnverified { .. } | EngineError::Host(_) => Self::failure(FILL_FAILED),
            EngineError::UpstreamFailure(e) => Self::failure(&format!("Could not reach reply service: {e}")),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == NoticeKind::Success
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Receives notices
pub trait Notifier {
    fn notify(&self, notice: Notice);
}

impl<N: Notifier + ?Sized> Notifier for Rc<N> {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice);
    }
}

/// Writes notices to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Success => tracing::info!(text = %notice.message, "notice"),
            NoticeKind::Failure => tracing::warn!(text = %notice.message, "notice"),
        }
    }
}

/// Keeps every notice in memory
#[derive(Debug, Default)]
pub struct NoticeLog {
    notices: RefCell<Vec<Notice>>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.notices.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.borrow().is_empty()
    }
}

impl Notifier for NoticeLog {
    fn notify(&self, notice: Notice) {
        tracing::debug!(kind = ?notice.kind, text = %notice.message, "notice recorded");
        self.notices.borrow_mut().push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_net::ServiceError;

    #[test]
    fn test_error_wording() {
        let missing = EngineError::SurfaceNotFound { waited_ms: 5000 };
        assert_eq!(Notice::from_error(&missing), Notice::failure(DIALOG_NOT_FOUND));

        let no_editable = EngineError::ControlNotFound(MissingControl::Editable);
        assert_eq!(Notice::from_error(&no_editable).message, DIALOG_NOT_FOUND);
        let no_action = EngineError::ControlNotFound(MissingControl::ReplyAction);
        assert_eq!(Notice::from_error(&no_action).message, REPLY_ACTION_NOT_FOUND);

        let unverified = EngineError::InjectionUnverified { observed: "draft".into() };
        assert_eq!(Notice::from_error(&unverified).message, FILL_FAILED);

        let upstream = EngineError::UpstreamFailure(ServiceError::Status { status: 502 });
        let notice = Notice::from_error(&upstream);
        assert!(!notice.is_success());
        assert!(notice.message.starts_with("Could not reach reply service:"));
        assert!(notice.message.contains("502"));
    }

    #[test]
    fn test_shared_log() {
        let log = Rc::new(NoticeLog::new());
        let notifier: Rc<NoticeLog> = log.clone();
        notifier.notify(Notice::success(FILLED));
        assert_eq!(log.len(), 1);
        assert!(log.notices()[0].is_success());
    }
}
