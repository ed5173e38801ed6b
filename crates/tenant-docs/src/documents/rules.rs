use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{
    CompanyId, ContractType, CostType, DocumentTypeId, EmployeeAttributes, EquipmentAttributes,
    Gender, SubjectAttributes, SubjectKind, Titularity, VehicleKind,
};

/// Configuration errors detected while loading persisted document types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleConfigError {
    #[error("document type {rule:?} targets unknown subject kind '{value}'")]
    UnknownSubjectKind { rule: DocumentTypeId, value: String },
    #[error("document type {rule:?} has a condition on '{attribute}', which {kind:?} subjects do not have")]
    UnknownAttribute {
        rule: DocumentTypeId,
        kind: SubjectKind,
        attribute: String,
    },
    #[error("document type {rule:?} has invalid value '{value}' for '{attribute}'")]
    InvalidValue {
        rule: DocumentTypeId,
        attribute: String,
        value: String,
    },
}

/// Conditions on employee attributes; `None` fields match any value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeConditions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_type: Option<CostType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<ContractType>,
}

impl EmployeeConditions {
    pub fn matches(&self, attributes: &EmployeeAttributes) -> bool {
        condition_holds(self.gender, attributes.gender)
            && condition_holds(self.cost_type, attributes.cost_type)
            && condition_holds(self.contract_type, attributes.contract_type)
    }
}

/// Conditions on equipment attributes; `None` fields match any value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentConditions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub titularity: Option<Titularity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_kind: Option<VehicleKind>,
}

impl EquipmentConditions {
    pub fn matches(&self, attributes: &EquipmentAttributes) -> bool {
        condition_holds(self.titularity, attributes.titularity)
            && condition_holds(self.vehicle_kind, attributes.vehicle_kind)
    }
}

// An unset condition is a wildcard; a set condition never matches an unknown attribute.
fn condition_holds<T: PartialEq>(condition: Option<T>, actual: Option<T>) -> bool {
    match condition {
        None => true,
        Some(expected) => actual == Some(expected),
    }
}

/// Applicability predicate, tagged by the subject kind it targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "applies_to", rename_all = "snake_case")]
pub enum RuleConditions {
    Employee(EmployeeConditions),
    Equipment(EquipmentConditions),
}

impl RuleConditions {
    pub const fn subject_kind(&self) -> SubjectKind {
        match self {
            RuleConditions::Employee(_) => SubjectKind::Employee,
            RuleConditions::Equipment(_) => SubjectKind::Equipment,
        }
    }

    /// Subjects of the other kind never match.
    pub fn matches(&self, attributes: &SubjectAttributes) -> bool {
        match (self, attributes) {
            (RuleConditions::Employee(conditions), SubjectAttributes::Employee(attributes)) => {
                conditions.matches(attributes)
            }
            (RuleConditions::Equipment(conditions), SubjectAttributes::Equipment(attributes)) => {
                conditions.matches(attributes)
            }
            _ => false,
        }
    }
}

/// A tenant-configured required document category with its applicability conditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTypeRule {
    pub id: DocumentTypeId,
    pub name: String,
    /// `None` marks a platform-wide document type shared by every company.
    #[serde(default)]
    pub company_id: Option<CompanyId>,
    #[serde(default = "default_active")]
    pub active: bool,
    pub conditions: RuleConditions,
}

fn default_active() -> bool {
    true
}

impl DocumentTypeRule {
    pub fn employee(id: &str, name: &str, conditions: EmployeeConditions) -> Self {
        Self {
            id: DocumentTypeId(id.to_string()),
            name: name.to_string(),
            company_id: None,
            active: true,
            conditions: RuleConditions::Employee(conditions),
        }
    }

    pub fn equipment(id: &str, name: &str, conditions: EquipmentConditions) -> Self {
        Self {
            id: DocumentTypeId(id.to_string()),
            name: name.to_string(),
            company_id: None,
            active: true,
            conditions: RuleConditions::Equipment(conditions),
        }
    }

    pub fn applies_to(&self, attributes: &SubjectAttributes) -> bool {
        self.active && self.conditions.matches(attributes)
    }
}

/// Document type as persisted: conditions keyed by attribute name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTypeRecord {
    pub id: DocumentTypeId,
    pub name: String,
    #[serde(default)]
    pub company_id: Option<CompanyId>,
    pub applies_to: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub conditions: BTreeMap<String, String>,
}

impl TryFrom<&DocumentTypeRecord> for DocumentTypeRule {
    type Error = RuleConfigError;

    fn try_from(record: &DocumentTypeRecord) -> Result<Self, Self::Error> {
        let kind = SubjectKind::parse(&record.applies_to).ok_or_else(|| {
            RuleConfigError::UnknownSubjectKind {
                rule: record.id.clone(),
                value: record.applies_to.clone(),
            }
        })?;

        let conditions = match kind {
            SubjectKind::Employee => {
                RuleConditions::Employee(employee_conditions(record, &record.conditions)?)
            }
            SubjectKind::Equipment => {
                RuleConditions::Equipment(equipment_conditions(record, &record.conditions)?)
            }
        };

        Ok(Self {
            id: record.id.clone(),
            name: record.name.clone(),
            company_id: record.company_id.clone(),
            active: record.active,
            conditions,
        })
    }
}

/// Convert every record, failing on the first malformed one.
pub fn rules_from_records(
    records: &[DocumentTypeRecord],
) -> Result<Vec<DocumentTypeRule>, RuleConfigError> {
    records.iter().map(DocumentTypeRule::try_from).collect()
}

fn employee_conditions(
    record: &DocumentTypeRecord,
    raw: &BTreeMap<String, String>,
) -> Result<EmployeeConditions, RuleConfigError> {
    let mut conditions = EmployeeConditions::default();
    for (attribute, value) in raw {
        match attribute.as_str() {
            "gender" => conditions.gender = Some(parse_value(record, attribute, value, Gender::parse)?),
            "cost_type" => {
                conditions.cost_type = Some(parse_value(record, attribute, value, CostType::parse)?)
            }
            "contract_type" => {
                conditions.contract_type =
                    Some(parse_value(record, attribute, value, ContractType::parse)?)
            }
            _ => return Err(unknown_attribute(record, SubjectKind::Employee, attribute)),
        }
    }
    Ok(conditions)
}

fn equipment_conditions(
    record: &DocumentTypeRecord,
    raw: &BTreeMap<String, String>,
) -> Result<EquipmentConditions, RuleConfigError> {
    let mut conditions = EquipmentConditions::default();
    for (attribute, value) in raw {
        match attribute.as_str() {
            "titularity" => {
                conditions.titularity =
                    Some(parse_value(record, attribute, value, Titularity::parse)?)
            }
            "vehicle_kind" => {
                conditions.vehicle_kind =
                    Some(parse_value(record, attribute, value, VehicleKind::parse)?)
            }
            _ => return Err(unknown_attribute(record, SubjectKind::Equipment, attribute)),
        }
    }
    Ok(conditions)
}

fn parse_value<T>(
    record: &DocumentTypeRecord,
    attribute: &str,
    value: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, RuleConfigError> {
    parse(value).ok_or_else(|| RuleConfigError::InvalidValue {
        rule: record.id.clone(),
        attribute: attribute.to_string(),
        value: value.to_string(),
    })
}

fn unknown_attribute(
    record: &DocumentTypeRecord,
    kind: SubjectKind,
    attribute: &str,
) -> RuleConfigError {
    RuleConfigError::UnknownAttribute {
        rule: record.id.clone(),
        kind,
        attribute: attribute.to_string(),
    }
}
