use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use super::domain::{CompanyId, SubjectId};
use super::report::{ComplianceReport, SubjectReportRow};
use super::repository::{DocumentRepository, RepositoryError};
use super::rules::{rules_from_records, RuleConfigError};
use super::status::{DocumentStatusEngine, DocumentStatusInfo, EngineConfig};

/// Service composing the tenant repository with the document status engine.
pub struct DocumentStatusService<R> {
    repository: Arc<R>,
    engine: Arc<DocumentStatusEngine>,
}

impl<R> DocumentStatusService<R>
where
    R: DocumentRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: EngineConfig) -> Self {
        Self {
            repository,
            engine: Arc::new(DocumentStatusEngine::new(config)),
        }
    }

    pub fn engine(&self) -> &DocumentStatusEngine {
        &self.engine
    }

    /// Compute the status of one subject; all reads finish before evaluation.
    pub fn status_for(
        &self,
        company: &CompanyId,
        subject_id: &SubjectId,
        as_of: DateTime<Utc>,
    ) -> Result<DocumentStatusInfo, StatusServiceError> {
        let subject = self
            .repository
            .fetch_subject(company, subject_id)
            .map_err(|error| log_repository(company, error))?
            .ok_or_else(|| StatusServiceError::SubjectNotFound(subject_id.clone()))?;

        let records = self
            .repository
            .document_types(company)
            .map_err(|error| log_repository(company, error))?;
        let documents = self
            .repository
            .documents_for(company, subject_id)
            .map_err(|error| log_repository(company, error))?;

        self.engine
            .evaluate_records(&subject, &records, &documents, as_of)
            .map_err(|error| log_configuration(company, error))
    }

    /// Evaluate every subject of a company into a compliance report.
    pub fn company_report(
        &self,
        company: &CompanyId,
        as_of: DateTime<Utc>,
    ) -> Result<ComplianceReport, StatusServiceError> {
        let records = self
            .repository
            .document_types(company)
            .map_err(|error| log_repository(company, error))?;
        let rules = rules_from_records(&records).map_err(|error| log_configuration(company, error))?;
        let subjects = self
            .repository
            .list_subjects(company)
            .map_err(|error| log_repository(company, error))?;

        let mut rows = Vec::with_capacity(subjects.len());
        for subject in subjects {
            let documents = self
                .repository
                .documents_for(company, &subject.id)
                .map_err(|error| log_repository(company, error))?;
            let info = self.engine.evaluate(&subject, &rules, &documents, as_of);
            rows.push(SubjectReportRow::new(&subject, info));
        }

        Ok(ComplianceReport::new(company.clone(), as_of, rows))
    }
}

fn log_repository(company: &CompanyId, error: RepositoryError) -> StatusServiceError {
    warn!(company = %company.0, %error, "document repository read failed");
    StatusServiceError::Repository(error)
}

fn log_configuration(company: &CompanyId, error: RuleConfigError) -> StatusServiceError {
    warn!(company = %company.0, %error, "document type configuration rejected");
    StatusServiceError::Configuration(error)
}

/// Error raised by the status service.
#[derive(Debug, thiserror::Error)]
pub enum StatusServiceError {
    #[error("subject {0:?} not found")]
    SubjectNotFound(SubjectId),
    #[error(transparent)]
    Configuration(#[from] RuleConfigError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
