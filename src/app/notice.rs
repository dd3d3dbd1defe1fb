use crate::error::ValidationError;
use crate::upload::BatchSummary;
use std::time::{Duration, Instant};

const NOTICE_LIFETIME: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Destructive,
}

/// A short-lived message shown above the footer.
#[derive(Debug, Clone)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub kind: NoticeKind,
    expires_at: Instant,
}

impl Notice {
    pub fn new(title: impl Into<String>, description: impl Into<String>, kind: NoticeKind) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            kind,
            expires_at: Instant::now() + NOTICE_LIFETIME,
        }
    }

    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, NoticeKind::Info)
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, NoticeKind::Destructive)
    }

    pub fn from_validation(error: &ValidationError) -> Self {
        Self::destructive(error.title(), error.to_string())
    }

    pub fn from_summary(summary: &BatchSummary) -> Self {
        if summary.all_succeeded() {
            Self::info(
                "Upload complete",
                format!("Successfully processed {} file(s)", summary.succeeded),
            )
        } else {
            Self::destructive(
                "Upload failed",
                format!(
                    "Some files failed to upload ({} of {} failed)",
                    summary.failed,
                    summary.total()
                ),
            )
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Default)]
pub struct Notices {
    active: Vec<Notice>,
}

impl Notices {
    pub fn push(&mut self, notice: Notice) {
        self.active.push(notice);
    }

    pub fn prune(&mut self, now: Instant) {
        self.active.retain(|notice| !notice.is_expired(now));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.active.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_notice_reflects_outcome() {
        let ok = Notice::from_summary(&BatchSummary { succeeded: 4, failed: 0 });
        assert_eq!(ok.kind, NoticeKind::Info);
        assert_eq!(ok.description, "Successfully processed 4 file(s)");

        let partial = Notice::from_summary(&BatchSummary { succeeded: 3, failed: 1 });
        assert_eq!(partial.kind, NoticeKind::Destructive);
        assert_eq!(partial.title, "Upload failed");
        assert!(partial.description.contains("1 of 4"));
    }

    #[test]
    fn validation_notice_uses_error_text() {
        let notice = Notice::from_validation(&ValidationError::BlankName);
        assert_eq!(notice.title, "Name required");
        assert_eq!(notice.description, "Please enter a name for your prompts");
    }

    #[test]
    fn expired_notices_are_pruned() {
        let mut notices = Notices::default();
        notices.push(Notice::info("a", "b"));
        notices.prune(Instant::now());
        assert!(!notices.is_empty());
        notices.prune(Instant::now() + NOTICE_LIFETIME * 2);
        assert!(notices.is_empty());
    }
}
