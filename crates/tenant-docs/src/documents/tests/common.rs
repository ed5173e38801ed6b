use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::documents::domain::{
    CompanyId, ContractType, CostType, DocumentId, DocumentInstance, DocumentState,
    DocumentTypeId, EmployeeAttributes, EquipmentAttributes, Gender, Subject, SubjectAttributes,
    SubjectId, Titularity, VehicleKind,
};
use crate::documents::repository::{DocumentRepository, RepositoryError};
use crate::documents::rules::{
    DocumentTypeRecord, DocumentTypeRule, EmployeeConditions, EquipmentConditions,
};
use crate::documents::service::DocumentStatusService;
use crate::documents::status::{DocumentStatusEngine, EngineConfig};

pub(super) fn as_of() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn company() -> CompanyId {
    CompanyId("acme-logistics".to_string())
}

pub(super) fn engine() -> DocumentStatusEngine {
    DocumentStatusEngine::new(engine_config())
}

pub(super) fn engine_config() -> EngineConfig {
    EngineConfig {
        expiry_warning_days: 30,
    }
}

pub(super) fn employee(id: &str, gender: Gender) -> Subject {
    Subject {
        id: SubjectId(id.to_string()),
        company_id: company(),
        display_name: format!("Employee {id}"),
        attributes: SubjectAttributes::Employee(EmployeeAttributes {
            gender: Some(gender),
            cost_type: Some(CostType::Direct),
            contract_type: Some(ContractType::Permanent),
        }),
    }
}

pub(super) fn truck(id: &str, titularity: Titularity) -> Subject {
    Subject {
        id: SubjectId(id.to_string()),
        company_id: company(),
        display_name: format!("Truck {id}"),
        attributes: SubjectAttributes::Equipment(EquipmentAttributes {
            titularity: Some(titularity),
            vehicle_kind: Some(VehicleKind::Truck),
        }),
    }
}

pub(super) fn any_employee_rule(id: &str, name: &str) -> DocumentTypeRule {
    DocumentTypeRule::employee(id, name, EmployeeConditions::default())
}

pub(super) fn any_equipment_rule(id: &str, name: &str) -> DocumentTypeRule {
    DocumentTypeRule::equipment(id, name, EquipmentConditions::default())
}

pub(super) fn document(
    id: &str,
    subject: &Subject,
    document_type: &str,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
) -> DocumentInstance {
    DocumentInstance {
        id: DocumentId(id.to_string()),
        subject_id: subject.id.clone(),
        document_type_id: DocumentTypeId(document_type.to_string()),
        created_at,
        expires_at,
        state: DocumentState::Approved,
    }
}

/// Approved document uploaded a month before `as_of`, valid for a year after it.
pub(super) fn valid_document(id: &str, subject: &Subject, document_type: &str) -> DocumentInstance {
    document(
        id,
        subject,
        document_type,
        as_of() - Duration::days(30),
        Some(as_of() + Duration::days(365)),
    )
}

pub(super) fn record(
    id: &str,
    name: &str,
    applies_to: &str,
    conditions: &[(&str, &str)],
) -> DocumentTypeRecord {
    DocumentTypeRecord {
        id: DocumentTypeId(id.to_string()),
        name: name.to_string(),
        company_id: Some(company()),
        applies_to: applies_to.to_string(),
        active: true,
        conditions: conditions
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<BTreeMap<_, _>>(),
    }
}

pub(super) fn ids(entries: &[crate::documents::status::DocumentRef]) -> Vec<&str> {
    entries.iter().map(|entry| entry.id.0.as_str()).collect()
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) subjects: Arc<Mutex<Vec<Subject>>>,
    pub(super) document_types: Arc<Mutex<Vec<DocumentTypeRecord>>>,
    pub(super) documents: Arc<Mutex<HashMap<SubjectId, Vec<DocumentInstance>>>>,
}

impl MemoryRepository {
    pub(super) fn with_subject(self, subject: Subject) -> Self {
        self.subjects
            .lock()
            .expect("repository mutex poisoned")
            .push(subject);
        self
    }

    pub(super) fn with_document_type(self, record: DocumentTypeRecord) -> Self {
        self.document_types
            .lock()
            .expect("repository mutex poisoned")
            .push(record);
        self
    }

    pub(super) fn with_document(self, document: DocumentInstance) -> Self {
        self.documents
            .lock()
            .expect("repository mutex poisoned")
            .entry(document.subject_id.clone())
            .or_default()
            .push(document);
        self
    }
}

impl DocumentRepository for MemoryRepository {
    fn fetch_subject(
        &self,
        company: &CompanyId,
        subject: &SubjectId,
    ) -> Result<Option<Subject>, RepositoryError> {
        let guard = self.subjects.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .find(|candidate| &candidate.company_id == company && &candidate.id == subject)
            .cloned())
    }

    fn list_subjects(&self, company: &CompanyId) -> Result<Vec<Subject>, RepositoryError> {
        let guard = self.subjects.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|candidate| &candidate.company_id == company)
            .cloned()
            .collect())
    }

    fn document_types(
        &self,
        company: &CompanyId,
    ) -> Result<Vec<DocumentTypeRecord>, RepositoryError> {
        let guard = self
            .document_types
            .lock()
            .expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| {
                record
                    .company_id
                    .as_ref()
                    .map(|owner| owner == company)
                    .unwrap_or(true)
            })
            .cloned()
            .collect())
    }

    fn documents_for(
        &self,
        _company: &CompanyId,
        subject: &SubjectId,
    ) -> Result<Vec<DocumentInstance>, RepositoryError> {
        let guard = self.documents.lock().expect("repository mutex poisoned");
        Ok(guard.get(subject).cloned().unwrap_or_default())
    }
}

pub(super) struct UnavailableRepository;

impl DocumentRepository for UnavailableRepository {
    fn fetch_subject(
        &self,
        _company: &CompanyId,
        _subject: &SubjectId,
    ) -> Result<Option<Subject>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_subjects(&self, _company: &CompanyId) -> Result<Vec<Subject>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn document_types(
        &self,
        _company: &CompanyId,
    ) -> Result<Vec<DocumentTypeRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn documents_for(
        &self,
        _company: &CompanyId,
        _subject: &SubjectId,
    ) -> Result<Vec<DocumentInstance>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Two employees and a leased truck; only the first employee is fully documented.
pub(super) fn seeded_repository() -> MemoryRepository {
    let ana = employee("emp-ana", Gender::Female);
    let bruno = employee("emp-bruno", Gender::Male);
    let truck = truck("veh-042", Titularity::Leased);

    MemoryRepository::default()
        .with_subject(ana.clone())
        .with_subject(bruno.clone())
        .with_subject(truck.clone())
        .with_document_type(record("dt-id", "National ID", "employee", &[]))
        .with_document_type(record(
            "dt-maternity",
            "Maternity Leave Form",
            "employee",
            &[("gender", "F")],
        ))
        .with_document_type(record(
            "dt-lease",
            "Lease Agreement",
            "equipment",
            &[("titularity", "leasing")],
        ))
        .with_document(valid_document("doc-1", &ana, "dt-id"))
        .with_document(valid_document("doc-2", &ana, "dt-maternity"))
        .with_document(document(
            "doc-3",
            &truck,
            "dt-lease",
            as_of() - Duration::days(400),
            Some(as_of() - Duration::days(35)),
        ))
}

pub(super) fn build_service() -> (DocumentStatusService<MemoryRepository>, Arc<MemoryRepository>)
{
    let repository = Arc::new(seeded_repository());
    let service = DocumentStatusService::new(repository.clone(), engine_config());
    (service, repository)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
