use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::domain::{CompanyId, DocumentInstance, Subject};
use super::rules::DocumentTypeRecord;

/// Exported records for one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanySnapshot {
    pub company_id: CompanyId,
    #[serde(default)]
    pub document_types: Vec<DocumentTypeRecord>,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub documents: Vec<DocumentInstance>,
}

/// Point-in-time export of document configuration and uploads across companies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantSnapshot {
    /// Document types with no company, shared by every tenant.
    #[serde(default)]
    pub shared_document_types: Vec<DocumentTypeRecord>,
    #[serde(default)]
    pub companies: Vec<CompanySnapshot>,
}

impl TenantSnapshot {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SnapshotError> {
        let snapshot: TenantSnapshot = serde_json::from_reader(reader)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let file = File::open(path).map_err(|source| SnapshotError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn company(&self, company: &CompanyId) -> Option<&CompanySnapshot> {
        self.companies
            .iter()
            .find(|snapshot| &snapshot.company_id == company)
    }

    // Subjects must belong to the company block they are listed under.
    fn validate(&self) -> Result<(), SnapshotError> {
        for company in &self.companies {
            if let Some(subject) = company
                .subjects
                .iter()
                .find(|subject| subject.company_id != company.company_id)
            {
                return Err(SnapshotError::ForeignSubject {
                    company: company.company_id.0.clone(),
                    subject: subject.id.0.clone(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to open snapshot {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse snapshot: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("subject {subject} is listed under company {company} but belongs elsewhere")]
    ForeignSubject { company: String, subject: String },
}
