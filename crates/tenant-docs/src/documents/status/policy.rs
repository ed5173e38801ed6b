use serde::{Deserialize, Serialize};

use super::classify::DocumentRef;

/// Overall document-compliance status of a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectStatus {
    Complete,
    CompleteWithExpired,
    Incomplete,
}

impl SubjectStatus {
    pub const ALL: [SubjectStatus; 3] = [
        SubjectStatus::Complete,
        SubjectStatus::CompleteWithExpired,
        SubjectStatus::Incomplete,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            SubjectStatus::Complete => "complete",
            SubjectStatus::CompleteWithExpired => "complete_with_expired",
            SubjectStatus::Incomplete => "incomplete",
        }
    }

    pub const fn is_compliant(self) -> bool {
        matches!(self, SubjectStatus::Complete)
    }

    pub fn summary(self, missing: usize, expired: usize) -> String {
        match self {
            SubjectStatus::Complete => "all required documents on file".to_string(),
            SubjectStatus::CompleteWithExpired => {
                format!("{expired} document(s) expired")
            }
            SubjectStatus::Incomplete if expired == 0 => {
                format!("{missing} document(s) missing")
            }
            SubjectStatus::Incomplete => {
                format!("{missing} document(s) missing, {expired} expired")
            }
        }
    }
}

/// Missing documents outrank expired ones; no applicable types at all is `Complete`.
pub fn derive_overall_status(
    missing: &[DocumentRef],
    expired: &[DocumentRef],
    _completed: &[DocumentRef],
) -> SubjectStatus {
    if !missing.is_empty() {
        SubjectStatus::Incomplete
    } else if !expired.is_empty() {
        SubjectStatus::CompleteWithExpired
    } else {
        SubjectStatus::Complete
    }
}
