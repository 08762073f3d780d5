//! Advisory notices raised while resolving options.
//!
//! The resolver decides whether a notice is due and what it says. Sinks
//! decide how it is shown.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Deprecation,
    Incubating,
}

/// A non-fatal notice about an exercised option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,

    /// Long name, or property key for property-only options.
    pub option: String,

    pub message: String,
}

impl Notice {
    pub fn deprecation(option: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Deprecation,
            option: option.into(),
            message: message.into(),
        }
    }

    pub fn incubating(option: impl Into<String>) -> Self {
        let option = option.into();
        let message = format!("{} is an incubating feature.", option);
        Self {
            kind: NoticeKind::Incubating,
            option,
            message,
        }
    }
}

/// Receives notices.
pub trait DiagnosticsSink {
    fn notify(&mut self, notice: Notice);
}

/// Collects notices in emission order.
impl DiagnosticsSink for Vec<Notice> {
    fn notify(&mut self, notice: Notice) {
        self.push(notice);
    }
}

/// Forwards notices to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn notify(&mut self, notice: Notice) {
        match notice.kind {
            NoticeKind::Deprecation => {
                tracing::warn!(option = %notice.option, "{}", notice.message)
            }
            NoticeKind::Incubating => {
                tracing::info!(option = %notice.option, "{}", notice.message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incubating_message() {
        let notice = Notice::incubating("--continuous");
        assert_eq!(notice.kind, NoticeKind::Incubating);
        assert_eq!(notice.message, "--continuous is an incubating feature.");
    }

    #[test]
    fn test_vec_collects_in_order() {
        let mut sink: Vec<Notice> = Vec::new();
        sink.notify(Notice::deprecation("--recompile-scripts", "gone soon"));
        sink.notify(Notice::incubating("--scan"));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[0].kind, NoticeKind::Deprecation);
        assert_eq!(sink[1].option, "--scan");
    }

    #[test]
    fn test_tracing_sink_does_not_panic_without_subscriber() {
        let mut sink = TracingSink;
        sink.notify(Notice::deprecation("--recompile-scripts", "deprecated"));
    }
}
