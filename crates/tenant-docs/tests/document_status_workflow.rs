//! End-to-end scenarios for document status derivation through the public facade: snapshot
//! loading, tenant-scoped repository reads, evaluation and reporting.

use std::io::Cursor;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use tenant_docs::documents::{
    CompanyId, DocumentInstance, DocumentRepository, DocumentStatusService, DocumentTypeRecord,
    EngineConfig, RepositoryError, SnapshotError, Subject, SubjectId, SubjectStatus,
    TenantSnapshot,
};

const SNAPSHOT: &str = r#"{
  "shared_document_types": [
    { "id": "dt-id", "name": "National ID", "applies_to": "employee" }
  ],
  "companies": [
    {
      "company_id": "acme",
      "document_types": [
        { "id": "dt-license", "name": "Driver's License", "company_id": "acme",
          "applies_to": "employee", "conditions": { "contract_type": "permanent" } },
        { "id": "dt-vtv", "name": "Technical Inspection", "company_id": "acme",
          "applies_to": "equipment", "conditions": { "vehicle_kind": "truck" } },
        { "id": "dt-legacy", "name": "Legacy Form", "company_id": "acme",
          "applies_to": "employee", "active": false }
      ],
      "subjects": [
        { "id": "emp-1", "company_id": "acme", "display_name": "Lucia Perez",
          "attributes": { "kind": "employee", "gender": "female", "contract_type": "permanent" } },
        { "id": "emp-2", "company_id": "acme", "display_name": "Tomas Diaz",
          "attributes": { "kind": "employee", "contract_type": "contractor" } },
        { "id": "veh-1", "company_id": "acme", "display_name": "AB123CD",
          "attributes": { "kind": "equipment", "titularity": "owned", "vehicle_kind": "truck" } }
      ],
      "documents": [
        { "id": "doc-1", "subject_id": "emp-1", "document_type_id": "dt-id",
          "created_at": "2025-01-10T09:00:00Z", "state": "approved" },
        { "id": "doc-2", "subject_id": "emp-1", "document_type_id": "dt-license",
          "created_at": "2024-03-01T09:00:00Z", "expires_at": "2025-03-01T09:00:00Z",
          "state": "approved" },
        { "id": "doc-3", "subject_id": "emp-1", "document_type_id": "dt-license",
          "created_at": "2025-02-20T09:00:00Z", "expires_at": "2026-02-20T09:00:00Z",
          "state": "pending" },
        { "id": "doc-4", "subject_id": "veh-1", "document_type_id": "dt-vtv",
          "created_at": "2024-06-01T09:00:00Z", "expires_at": "2025-06-01T09:00:00Z",
          "state": "approved" }
      ]
    }
  ]
}"#;

fn as_of() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0)
        .single()
        .expect("valid timestamp")
}

struct SnapshotRepository {
    snapshot: TenantSnapshot,
}

impl DocumentRepository for SnapshotRepository {
    fn fetch_subject(
        &self,
        company: &CompanyId,
        subject: &SubjectId,
    ) -> Result<Option<Subject>, RepositoryError> {
        Ok(self.snapshot.company(company).and_then(|block| {
            block
                .subjects
                .iter()
                .find(|candidate| &candidate.id == subject)
                .cloned()
        }))
    }

    fn list_subjects(&self, company: &CompanyId) -> Result<Vec<Subject>, RepositoryError> {
        Ok(self
            .snapshot
            .company(company)
            .map(|block| block.subjects.clone())
            .unwrap_or_default())
    }

    fn document_types(
        &self,
        company: &CompanyId,
    ) -> Result<Vec<DocumentTypeRecord>, RepositoryError> {
        let mut records = self
            .snapshot
            .company(company)
            .map(|block| block.document_types.clone())
            .unwrap_or_default();
        records.extend(self.snapshot.shared_document_types.iter().cloned());
        Ok(records)
    }

    fn documents_for(
        &self,
        company: &CompanyId,
        subject: &SubjectId,
    ) -> Result<Vec<DocumentInstance>, RepositoryError> {
        Ok(self
            .snapshot
            .company(company)
            .map(|block| {
                block
                    .documents
                    .iter()
                    .filter(|document| &document.subject_id == subject)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

fn service() -> DocumentStatusService<SnapshotRepository> {
    let snapshot = TenantSnapshot::from_reader(Cursor::new(SNAPSHOT)).expect("snapshot parses");
    DocumentStatusService::new(
        Arc::new(SnapshotRepository { snapshot }),
        EngineConfig::default(),
    )
}

fn ids(entries: &[tenant_docs::documents::DocumentRef]) -> Vec<&str> {
    entries.iter().map(|entry| entry.id.0.as_str()).collect()
}

#[test]
fn renewed_license_replaces_the_expired_one() {
    let info = service()
        .status_for(
            &CompanyId("acme".to_string()),
            &SubjectId("emp-1".to_string()),
            as_of(),
        )
        .expect("status computed");

    assert_eq!(info.status, SubjectStatus::Complete);
    assert_eq!(ids(&info.completed_documents), vec!["dt-license", "dt-id"]);
    assert_eq!(ids(&info.pending_review), vec!["dt-license"]);
    assert!(info.missing_documents.is_empty());
}

#[test]
fn contractor_only_needs_shared_documents() {
    let info = service()
        .status_for(
            &CompanyId("acme".to_string()),
            &SubjectId("emp-2".to_string()),
            as_of(),
        )
        .expect("status computed");

    assert_eq!(info.status, SubjectStatus::Incomplete);
    assert_eq!(ids(&info.missing_documents), vec!["dt-id"]);
}

#[test]
fn company_report_flags_lapsed_inspection() {
    let report = service()
        .company_report(&CompanyId("acme".to_string()), as_of())
        .expect("report builds");

    assert_eq!(report.count(SubjectStatus::Complete), 1);
    assert_eq!(report.count(SubjectStatus::Incomplete), 1);
    assert_eq!(report.count(SubjectStatus::CompleteWithExpired), 1);

    let truck = report
        .rows
        .iter()
        .find(|row| row.subject_id.0 == "veh-1")
        .expect("truck row");
    assert_eq!(ids(&truck.expired), vec!["dt-vtv"]);
    assert_eq!(truck.summary, "1 document(s) expired");
}

#[test]
fn snapshot_rejects_subjects_filed_under_the_wrong_company() {
    let raw = r#"{ "companies": [ { "company_id": "acme", "subjects": [
        { "id": "emp-9", "company_id": "globex", "display_name": "Misfiled",
          "attributes": { "kind": "employee" } } ] } ] }"#;

    match TenantSnapshot::from_reader(Cursor::new(raw)) {
        Err(SnapshotError::ForeignSubject { subject, .. }) => assert_eq!(subject, "emp-9"),
        other => panic!("expected foreign subject error, got {other:?}"),
    }
}
