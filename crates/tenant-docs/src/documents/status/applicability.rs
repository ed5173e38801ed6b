use std::collections::HashSet;

use super::super::domain::Subject;
use super::super::rules::DocumentTypeRule;

/// Rules that apply to `subject`, in input order, each id at most once.
pub fn applicable_document_types<'r>(
    subject: &Subject,
    rules: &'r [DocumentTypeRule],
) -> Vec<&'r DocumentTypeRule> {
    let mut seen = HashSet::new();
    let mut applicable = Vec::new();

    for rule in rules {
        if rule.applies_to(&subject.attributes) && seen.insert(&rule.id) {
            applicable.push(rule);
        }
    }

    applicable
}
