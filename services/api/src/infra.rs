use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, RwLock};
use tenant_docs::documents::{
    CompanyId, DocumentInstance, DocumentRepository, DocumentTypeRecord, RepositoryError,
    Subject, SubjectId, TenantSnapshot,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Repository serving a loaded snapshot; stands in for the relational store.
#[derive(Default, Clone)]
pub(crate) struct InMemoryDocumentRepository {
    snapshot: Arc<RwLock<TenantSnapshot>>,
}

impl InMemoryDocumentRepository {
    pub(crate) fn from_snapshot(snapshot: TenantSnapshot) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(snapshot)),
        }
    }

    fn read<T>(&self, f: impl FnOnce(&TenantSnapshot) -> T) -> Result<T, RepositoryError> {
        let guard = self
            .snapshot
            .read()
            .map_err(|_| RepositoryError::Unavailable("snapshot lock poisoned".to_string()))?;
        Ok(f(&guard))
    }
}

impl DocumentRepository for InMemoryDocumentRepository {
    fn fetch_subject(
        &self,
        company: &CompanyId,
        subject: &SubjectId,
    ) -> Result<Option<Subject>, RepositoryError> {
        self.read(|snapshot| {
            snapshot.company(company).and_then(|block| {
                block
                    .subjects
                    .iter()
                    .find(|candidate| &candidate.id == subject)
                    .cloned()
            })
        })
    }

    fn list_subjects(&self, company: &CompanyId) -> Result<Vec<Subject>, RepositoryError> {
        self.read(|snapshot| {
            snapshot
                .company(company)
                .map(|block| block.subjects.clone())
                .unwrap_or_default()
        })
    }

    fn document_types(
        &self,
        company: &CompanyId,
    ) -> Result<Vec<DocumentTypeRecord>, RepositoryError> {
        self.read(|snapshot| {
            let mut records = snapshot
                .company(company)
                .map(|block| block.document_types.clone())
                .unwrap_or_default();
            records.extend(snapshot.shared_document_types.iter().cloned());
            records
        })
    }

    fn documents_for(
        &self,
        company: &CompanyId,
        subject: &SubjectId,
    ) -> Result<Vec<DocumentInstance>, RepositoryError> {
        self.read(|snapshot| {
            snapshot
                .company(company)
                .map(|block| {
                    block
                        .documents
                        .iter()
                        .filter(|document| &document.subject_id == subject)
                        .cloned()
                        .collect()
                })
                .unwrap_or_default()
        })
    }
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| format!("failed to parse '{raw}' as an RFC 3339 timestamp ({err})"))
}
