//! Document requirements for employees and equipment, and the status derived from them.
//!
//! Companies configure document types with conditions on subject attributes. For a subject, the
//! status engine selects the applicable types, matches them against uploaded documents, and
//! sorts each into missing, expired, or completed before deriving an overall status. Nothing here
//! is persisted: status is recomputed from the repository snapshot on every request.

pub mod domain;
pub mod report;
pub mod repository;
pub mod router;
pub mod rules;
pub mod service;
pub mod snapshot;
pub mod status;

#[cfg(test)]
mod tests;

pub use domain::{
    CompanyId, ContractType, CostType, DocumentId, DocumentInstance, DocumentState,
    DocumentTypeId, EmployeeAttributes, EquipmentAttributes, Gender, Subject, SubjectAttributes,
    SubjectId, SubjectKind, Titularity, VehicleKind,
};
pub use report::{ComplianceReport, ReportError, StatusCountEntry, SubjectReportRow};
pub use repository::{DocumentRepository, RepositoryError};
pub use router::document_router;
pub use rules::{
    rules_from_records, DocumentTypeRecord, DocumentTypeRule, EmployeeConditions,
    EquipmentConditions, RuleConditions, RuleConfigError,
};
pub use service::{DocumentStatusService, StatusServiceError};
pub use snapshot::{CompanySnapshot, SnapshotError, TenantSnapshot};
pub use status::{
    applicable_document_types, classify_documents, derive_overall_status, DocumentBuckets,
    DocumentRef, DocumentStatusEngine, DocumentStatusInfo, EngineConfig, SubjectStatus,
};
