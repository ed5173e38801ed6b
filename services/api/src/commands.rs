use crate::infra::{parse_timestamp, InMemoryDocumentRepository};
use chrono::{DateTime, Utc};
use clap::{Args, ValueEnum};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tenant_docs::config::AppConfig;
use tenant_docs::documents::{
    CompanyId, ComplianceReport, DocumentStatusInfo, DocumentStatusService, SubjectId,
    TenantSnapshot,
};
use tenant_docs::error::AppError;

#[derive(Args, Debug)]
pub(crate) struct StatusArgs {
    /// JSON snapshot of document types, subjects and documents
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    /// Company the subject belongs to
    #[arg(long)]
    pub(crate) company: String,
    /// Employee or equipment identifier
    #[arg(long)]
    pub(crate) subject: String,
    /// Evaluation instant in RFC 3339 (defaults to now)
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) as_of: Option<DateTime<Utc>>,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// JSON snapshot of document types, subjects and documents
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    /// Company to report on
    #[arg(long)]
    pub(crate) company: String,
    /// Evaluation instant in RFC 3339 (defaults to now)
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) as_of: Option<DateTime<Utc>>,
    /// Output format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub(crate) format: ReportFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ReportFormat {
    Text,
    Json,
    Csv,
}

fn service_for(
    snapshot: &Path,
) -> Result<DocumentStatusService<InMemoryDocumentRepository>, AppError> {
    let config = AppConfig::load()?;
    let snapshot = TenantSnapshot::load(snapshot)?;
    let repository = Arc::new(InMemoryDocumentRepository::from_snapshot(snapshot));
    Ok(DocumentStatusService::new(repository, config.engine))
}

pub(crate) fn run_status(args: StatusArgs) -> Result<(), AppError> {
    let service = service_for(&args.snapshot)?;
    let as_of = args.as_of.unwrap_or_else(Utc::now);
    let info = service.status_for(
        &CompanyId(args.company),
        &SubjectId(args.subject),
        as_of,
    )?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_status(&mut out, &info)?;
    Ok(())
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let service = service_for(&args.snapshot)?;
    let as_of = args.as_of.unwrap_or_else(Utc::now);
    let report = service.company_report(&CompanyId(args.company), as_of)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        ReportFormat::Text => write_report(&mut out, &report)?,
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &report)?;
            writeln!(out)?;
        }
        ReportFormat::Csv => report.write_csv(&mut out)?,
    }
    Ok(())
}

pub(crate) fn write_status<W: Write>(out: &mut W, info: &DocumentStatusInfo) -> io::Result<()> {
    writeln!(
        out,
        "{} ({}) as of {}",
        info.subject_id.0,
        info.subject_kind.label(),
        info.as_of.to_rfc3339()
    )?;
    writeln!(out, "Status: {} - {}", info.status.label(), info.summary())?;

    let sections = [
        ("Missing", &info.missing_documents),
        ("Expired", &info.expired_documents),
        ("Completed", &info.completed_documents),
        ("Expiring soon", &info.expiring_soon),
        ("Pending review", &info.pending_review),
    ];
    for (title, entries) in sections {
        if entries.is_empty() {
            continue;
        }
        writeln!(out, "{title}:")?;
        for entry in entries {
            writeln!(out, "  - {} [{}]", entry.name, entry.id.0)?;
        }
    }
    Ok(())
}

pub(crate) fn write_report<W: Write>(out: &mut W, report: &ComplianceReport) -> io::Result<()> {
    writeln!(
        out,
        "Document compliance for {} as of {}",
        report.company_id.0,
        report.as_of.to_rfc3339()
    )?;
    for entry in &report.status_counts {
        writeln!(out, "  {:<24} {}", entry.status_label, entry.subjects)?;
    }
    writeln!(
        out,
        "Compliance rate: {:.0}%",
        report.compliance_rate * 100.0
    )?;

    let attention = report.non_compliant();
    if !attention.is_empty() {
        writeln!(out, "Needs attention:")?;
        for row in attention {
            writeln!(
                out,
                "  - {} ({}): {}",
                row.display_name, row.subject_id.0, row.summary
            )?;
        }
    }
    Ok(())
}
