use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::domain::{DocumentInstance, DocumentTypeId};
use super::super::rules::DocumentTypeRule;

/// `{id, name}` reference to a document type, as shown in status listings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentRef {
    pub id: DocumentTypeId,
    pub name: String,
}

impl From<&DocumentTypeRule> for DocumentRef {
    fn from(rule: &DocumentTypeRule) -> Self {
        Self {
            id: rule.id.clone(),
            name: rule.name.clone(),
        }
    }
}

/// Disjoint partition of a subject's applicable document types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentBuckets {
    pub missing: Vec<DocumentRef>,
    pub expired: Vec<DocumentRef>,
    pub completed: Vec<DocumentRef>,
}

impl DocumentBuckets {
    pub fn len(&self) -> usize {
        self.missing.len() + self.expired.len() + self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Most recently created document for `document_type`; equal timestamps go to the later entry.
pub fn latest_document<'d>(
    document_type: &DocumentTypeId,
    documents: &'d [DocumentInstance],
) -> Option<&'d DocumentInstance> {
    let mut latest: Option<&'d DocumentInstance> = None;
    for document in documents
        .iter()
        .filter(|document| &document.document_type_id == document_type)
    {
        match latest {
            Some(current) if current.created_at > document.created_at => {}
            _ => latest = Some(document),
        }
    }
    latest
}

pub fn classify_documents(
    applicable: &[&DocumentTypeRule],
    documents: &[DocumentInstance],
    as_of: DateTime<Utc>,
) -> DocumentBuckets {
    let mut buckets = DocumentBuckets::default();

    for rule in applicable {
        let entry = DocumentRef::from(*rule);
        match latest_document(&rule.id, documents) {
            None => buckets.missing.push(entry),
            Some(document) if document.is_expired_at(as_of) => buckets.expired.push(entry),
            Some(_) => buckets.completed.push(entry),
        }
    }

    buckets
}
