use super::domain::{CompanyId, DocumentInstance, Subject, SubjectId};
use super::rules::DocumentTypeRecord;

/// Tenant-scoped read access to the records the status engine consumes.
pub trait DocumentRepository: Send + Sync {
    fn fetch_subject(
        &self,
        company: &CompanyId,
        subject: &SubjectId,
    ) -> Result<Option<Subject>, RepositoryError>;

    fn list_subjects(&self, company: &CompanyId) -> Result<Vec<Subject>, RepositoryError>;

    /// The company's own document types followed by platform-wide ones.
    fn document_types(
        &self,
        company: &CompanyId,
    ) -> Result<Vec<DocumentTypeRecord>, RepositoryError>;

    fn documents_for(
        &self,
        company: &CompanyId,
        subject: &SubjectId,
    ) -> Result<Vec<DocumentInstance>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
