mod applicability;
mod classify;
mod config;
mod policy;

pub use applicability::applicable_document_types;
pub use classify::{classify_documents, latest_document, DocumentBuckets, DocumentRef};
pub use config::{EngineConfig, DEFAULT_EXPIRY_WARNING_DAYS, MAX_EXPIRY_WARNING_DAYS};
pub use policy::{derive_overall_status, SubjectStatus};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{DocumentInstance, DocumentState, Subject, SubjectId, SubjectKind};
use super::rules::{rules_from_records, DocumentTypeRecord, DocumentTypeRule, RuleConfigError};

/// Document compliance of one subject at one point in time. Recomputed per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStatusInfo {
    pub subject_id: SubjectId,
    pub subject_kind: SubjectKind,
    pub as_of: DateTime<Utc>,
    pub status: SubjectStatus,
    pub missing_documents: Vec<DocumentRef>,
    pub expired_documents: Vec<DocumentRef>,
    pub completed_documents: Vec<DocumentRef>,
    /// Completed types whose current document lapses inside the warning window.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expiring_soon: Vec<DocumentRef>,
    /// Completed or expired types whose current document has not been reviewed yet.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pending_review: Vec<DocumentRef>,
}

impl DocumentStatusInfo {
    pub fn summary(&self) -> String {
        self.status
            .summary(self.missing_documents.len(), self.expired_documents.len())
    }
}

/// Stateless evaluator deriving document compliance from rules and uploads.
#[derive(Debug, Clone, Default)]
pub struct DocumentStatusEngine {
    config: EngineConfig,
}

impl DocumentStatusEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn evaluate(
        &self,
        subject: &Subject,
        rules: &[DocumentTypeRule],
        documents: &[DocumentInstance],
        as_of: DateTime<Utc>,
    ) -> DocumentStatusInfo {
        let documents: Vec<DocumentInstance> = documents
            .iter()
            .filter(|document| document.subject_id == subject.id)
            .cloned()
            .collect();

        let applicable = applicable_document_types(subject, rules);
        let buckets = classify_documents(&applicable, &documents, as_of);
        let status = derive_overall_status(&buckets.missing, &buckets.expired, &buckets.completed);

        // `None` past the representable range: every dated expiry is inside the window.
        let warning_horizon = Duration::try_days(self.config.expiry_warning_days)
            .and_then(|window| as_of.checked_add_signed(window));
        let expiring_soon = buckets
            .completed
            .iter()
            .filter(|entry| {
                latest_document(&entry.id, &documents)
                    .and_then(|document| document.expires_at)
                    .map(|expiry| warning_horizon.map_or(true, |horizon| expiry <= horizon))
                    .unwrap_or(false)
            })
            .cloned()
            .collect();

        let pending_review = applicable
            .iter()
            .filter(|rule| {
                latest_document(&rule.id, &documents)
                    .map(|document| document.state == DocumentState::Pending)
                    .unwrap_or(false)
            })
            .map(|rule| DocumentRef::from(*rule))
            .collect();

        debug!(
            subject = %subject.id.0,
            applicable = applicable.len(),
            missing = buckets.missing.len(),
            expired = buckets.expired.len(),
            completed = buckets.completed.len(),
            status = status.label(),
            "derived document status"
        );

        DocumentStatusInfo {
            subject_id: subject.id.clone(),
            subject_kind: subject.kind(),
            as_of,
            status,
            missing_documents: buckets.missing,
            expired_documents: buckets.expired,
            completed_documents: buckets.completed,
            expiring_soon,
            pending_review,
        }
    }

    /// Evaluate against persisted records; any malformed record rejects the whole call.
    pub fn evaluate_records(
        &self,
        subject: &Subject,
        records: &[DocumentTypeRecord],
        documents: &[DocumentInstance],
        as_of: DateTime<Utc>,
    ) -> Result<DocumentStatusInfo, RuleConfigError> {
        let rules = rules_from_records(records)?;
        Ok(self.evaluate(subject, &rules, documents, as_of))
    }
}
