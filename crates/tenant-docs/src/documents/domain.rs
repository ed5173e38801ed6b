use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tenant (company) identifier; every subject and document is scoped to one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(pub String);

/// Identifier of an employee or equipment record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(pub String);

/// Identifier of a configured document type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentTypeId(pub String);

/// Identifier of an uploaded document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

fn normalize(raw: &str) -> String {
    raw.trim().to_ascii_lowercase().replace([' ', '-'], "_")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize(raw).as_str() {
            "m" | "male" | "masculino" => Some(Self::Male),
            "f" | "female" | "femenino" => Some(Self::Female),
            "x" | "other" | "no_declarado" => Some(Self::Other),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }
}

/// Whether an employee's cost is booked directly against operations or as overhead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostType {
    Direct,
    Indirect,
}

impl CostType {
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize(raw).as_str() {
            "direct" | "directo" => Some(Self::Direct),
            "indirect" | "indirecto" => Some(Self::Indirect),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Indirect => "indirect",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    Permanent,
    FixedTerm,
    Contractor,
}

impl ContractType {
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize(raw).as_str() {
            "permanent" => Some(Self::Permanent),
            "fixed_term" | "temporary" => Some(Self::FixedTerm),
            "contractor" => Some(Self::Contractor),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Permanent => "permanent",
            Self::FixedTerm => "fixed_term",
            Self::Contractor => "contractor",
        }
    }
}

/// Ownership arrangement of a vehicle or piece of equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Titularity {
    Owned,
    Leased,
    Rented,
    ThirdParty,
}

impl Titularity {
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize(raw).as_str() {
            "owned" | "propio" => Some(Self::Owned),
            "leased" | "leasing" => Some(Self::Leased),
            "rented" | "alquilado" => Some(Self::Rented),
            "third_party" | "tercero" => Some(Self::ThirdParty),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Owned => "owned",
            Self::Leased => "leased",
            Self::Rented => "rented",
            Self::ThirdParty => "third_party",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleKind {
    Car,
    Pickup,
    Truck,
    Machinery,
    Trailer,
}

impl VehicleKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize(raw).as_str() {
            "car" => Some(Self::Car),
            "pickup" => Some(Self::Pickup),
            "truck" => Some(Self::Truck),
            "machinery" => Some(Self::Machinery),
            "trailer" => Some(Self::Trailer),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::Pickup => "pickup",
            Self::Truck => "truck",
            Self::Machinery => "machinery",
            Self::Trailer => "trailer",
        }
    }
}

/// The two families of records that carry required documentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    Employee,
    Equipment,
}

impl SubjectKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize(raw).as_str() {
            "employee" | "employees" | "persona" | "personas" => Some(Self::Employee),
            "equipment" | "vehicle" | "equipos" => Some(Self::Equipment),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Equipment => "equipment",
        }
    }
}

/// Attributes of an employee that document-type conditions may reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeAttributes {
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub cost_type: Option<CostType>,
    #[serde(default)]
    pub contract_type: Option<ContractType>,
}

/// Attributes of a vehicle or machine that document-type conditions may reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentAttributes {
    #[serde(default)]
    pub titularity: Option<Titularity>,
    #[serde(default)]
    pub vehicle_kind: Option<VehicleKind>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubjectAttributes {
    Employee(EmployeeAttributes),
    Equipment(EquipmentAttributes),
}

impl SubjectAttributes {
    pub const fn kind(&self) -> SubjectKind {
        match self {
            SubjectAttributes::Employee(_) => SubjectKind::Employee,
            SubjectAttributes::Equipment(_) => SubjectKind::Equipment,
        }
    }
}

/// An employee or equipment record evaluated for document compliance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub company_id: CompanyId,
    pub display_name: String,
    pub attributes: SubjectAttributes,
}

impl Subject {
    pub const fn kind(&self) -> SubjectKind {
        self.attributes.kind()
    }
}

/// Review state of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentState {
    Pending,
    Approved,
    Rejected,
    Expired,
}

impl DocumentState {
    pub const fn label(self) -> &'static str {
        match self {
            DocumentState::Pending => "pending",
            DocumentState::Approved => "approved",
            DocumentState::Rejected => "rejected",
            DocumentState::Expired => "expired",
        }
    }
}

/// A document uploaded for a subject against one configured document type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInstance {
    pub id: DocumentId,
    pub subject_id: SubjectId,
    pub document_type_id: DocumentTypeId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    pub state: DocumentState,
}

impl DocumentInstance {
    /// Expiry is strict: a document expiring exactly at `as_of` is still valid.
    pub fn is_expired_at(&self, as_of: DateTime<Utc>) -> bool {
        self.state == DocumentState::Expired
            || self.expires_at.map(|expiry| expiry < as_of).unwrap_or(false)
    }
}
