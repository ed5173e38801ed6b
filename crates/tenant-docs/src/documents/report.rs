use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{CompanyId, Subject, SubjectId, SubjectKind};
use super::status::{DocumentRef, DocumentStatusInfo, SubjectStatus};

/// One evaluated subject inside a company report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectReportRow {
    pub subject_id: SubjectId,
    pub subject_kind: SubjectKind,
    pub display_name: String,
    pub status: SubjectStatus,
    pub summary: String,
    pub missing: Vec<DocumentRef>,
    pub expired: Vec<DocumentRef>,
    pub completed: Vec<DocumentRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expiring_soon: Vec<DocumentRef>,
}

impl SubjectReportRow {
    pub fn new(subject: &Subject, info: DocumentStatusInfo) -> Self {
        let summary = info.summary();
        Self {
            subject_id: info.subject_id,
            subject_kind: info.subject_kind,
            display_name: subject.display_name.clone(),
            status: info.status,
            summary,
            missing: info.missing_documents,
            expired: info.expired_documents,
            completed: info.completed_documents,
            expiring_soon: info.expiring_soon,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCountEntry {
    pub status: SubjectStatus,
    pub status_label: &'static str,
    pub subjects: usize,
}

/// Document compliance of every subject of a company at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceReport {
    pub company_id: CompanyId,
    pub as_of: DateTime<Utc>,
    pub status_counts: Vec<StatusCountEntry>,
    pub compliance_rate: f32,
    pub rows: Vec<SubjectReportRow>,
}

impl ComplianceReport {
    pub fn new(company_id: CompanyId, as_of: DateTime<Utc>, rows: Vec<SubjectReportRow>) -> Self {
        let status_counts = SubjectStatus::ALL
            .iter()
            .map(|status| StatusCountEntry {
                status: *status,
                status_label: status.label(),
                subjects: rows.iter().filter(|row| row.status == *status).count(),
            })
            .collect();

        let compliance_rate = if rows.is_empty() {
            1.0
        } else {
            let compliant = rows.iter().filter(|row| row.status.is_compliant()).count();
            compliant as f32 / rows.len() as f32
        };

        Self {
            company_id,
            as_of,
            status_counts,
            compliance_rate,
            rows,
        }
    }

    pub fn count(&self, status: SubjectStatus) -> usize {
        self.status_counts
            .iter()
            .find(|entry| entry.status == status)
            .map(|entry| entry.subjects)
            .unwrap_or(0)
    }

    /// Rows needing attention, incomplete subjects first.
    pub fn non_compliant(&self) -> Vec<&SubjectReportRow> {
        let mut rows: Vec<&SubjectReportRow> = self
            .rows
            .iter()
            .filter(|row| !row.status.is_compliant())
            .collect();
        rows.sort_by(|left, right| right.status.cmp(&left.status));
        rows
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ReportError> {
        let mut csv = csv::Writer::from_writer(writer);
        for row in &self.rows {
            csv.serialize(CsvRow {
                subject_id: &row.subject_id.0,
                subject_kind: row.subject_kind.label(),
                display_name: &row.display_name,
                status: row.status.label(),
                missing: join_names(&row.missing),
                expired: join_names(&row.expired),
                completed: join_names(&row.completed),
            })?;
        }
        csv.flush()?;
        Ok(())
    }

    pub fn to_csv(&self) -> Result<String, ReportError> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        String::from_utf8(buffer).map_err(|_| ReportError::Encoding)
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    subject_id: &'a str,
    subject_kind: &'static str,
    display_name: &'a str,
    status: &'static str,
    missing: String,
    expired: String,
    completed: String,
}

fn join_names(entries: &[DocumentRef]) -> String {
    entries
        .iter()
        .map(|entry| entry.name.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to write csv report: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush csv report: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv report is not valid utf-8")]
    Encoding,
}
