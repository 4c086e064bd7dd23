use serde::{Deserialize, Serialize};

use super::super::domain::{present, FieldSource, PersistedRow, RecordId, Selectable};
use super::blueprint::BuyerSection;

/// Organization profile and contacts for a buyer program.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramProfile {
    pub organization_name: Option<String>,
    pub program_name: Option<String>,
    pub primary_contact_name: Option<String>,
    pub primary_contact_email: Option<String>,
    pub primary_contact_phone: Option<String>,
    pub billing_contact_name: Option<String>,
    pub billing_contact_email: Option<String>,
    /// Owned by the default-services section; profile saves leave it alone.
    pub default_services_confirmed: bool,
}

impl FieldSource for ProgramProfile {
    fn has_field(&self, name: &str) -> bool {
        match name {
            "organization_name" => present(&self.organization_name),
            "program_name" => present(&self.program_name),
            "primary_contact_name" => present(&self.primary_contact_name),
            "primary_contact_email" => present(&self.primary_contact_email),
            "primary_contact_phone" => present(&self.primary_contact_phone),
            "billing_contact_name" => present(&self.billing_contact_name),
            "billing_contact_email" => present(&self.billing_contact_email),
            _ => false,
        }
    }
}

/// Physical site where the program delivers care.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub id: Option<RecordId>,
    pub name: Option<String>,
    pub address_line1: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub operating_hours: Option<String>,
    pub daily_capacity: Option<u32>,
}

impl FieldSource for Location {
    fn has_field(&self, name: &str) -> bool {
        match name {
            "name" => present(&self.name),
            "address_line1" => present(&self.address_line1),
            "city" => present(&self.city),
            "state" => present(&self.state),
            "postal_code" => present(&self.postal_code),
            "operating_hours" => present(&self.operating_hours),
            "daily_capacity" => self.daily_capacity.is_some(),
            _ => false,
        }
    }
}

impl PersistedRow for Location {
    fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// Phase-two operating details merged into an existing location row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationCapacity {
    pub location_id: RecordId,
    #[serde(default)]
    pub operating_hours: Option<String>,
    #[serde(default)]
    pub daily_capacity: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Provider {
    pub id: Option<RecordId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub npi: Option<String>,
    pub credential: Option<String>,
    pub specialty: Option<String>,
    pub location_id: Option<RecordId>,
}

impl FieldSource for Provider {
    fn has_field(&self, name: &str) -> bool {
        match name {
            "first_name" => present(&self.first_name),
            "last_name" => present(&self.last_name),
            "npi" => present(&self.npi),
            "credential" => present(&self.credential),
            "specialty" => present(&self.specialty),
            _ => false,
        }
    }
}

impl PersistedRow for Provider {
    fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// Catalog entry a program can opt into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOffering {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub selected: bool,
}

impl Selectable for ServiceOffering {
    fn is_selected(&self) -> bool {
        self.selected
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubService {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub service_code: String,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub selected: bool,
}

impl Selectable for SubService {
    fn is_selected(&self) -> bool {
        self.selected
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabNetwork {
    pub lab_name: Option<String>,
    pub account_number: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
}

impl FieldSource for LabNetwork {
    fn has_field(&self, name: &str) -> bool {
        match name {
            "lab_name" => present(&self.lab_name),
            "account_number" => present(&self.account_number),
            "contact_name" => present(&self.contact_name),
            "contact_email" => present(&self.contact_email),
            _ => false,
        }
    }
}

/// Retained for existing programs; no longer evaluated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadiologyNetwork {
    pub facility_name: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationConfig {
    pub escalation_contact_name: Option<String>,
    pub escalation_phone: Option<String>,
    pub escalation_email: Option<String>,
    pub after_hours_phone: Option<String>,
}

impl FieldSource for EscalationConfig {
    fn has_field(&self, name: &str) -> bool {
        match name {
            "escalation_contact_name" => present(&self.escalation_contact_name),
            "escalation_phone" => present(&self.escalation_phone),
            "escalation_email" => present(&self.escalation_email),
            "after_hours_phone" => present(&self.after_hours_phone),
            _ => false,
        }
    }
}

/// Everything the buyer evaluator reads, fetched up front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuyerIntakeRecords {
    pub program: Option<ProgramProfile>,
    pub locations: Vec<Location>,
    pub providers: Vec<Provider>,
    pub services: Vec<ServiceOffering>,
    pub sub_services: Vec<SubService>,
    pub lab_network: Option<LabNetwork>,
    pub radiology_network: Option<RadiologyNetwork>,
    pub escalation: Option<EscalationConfig>,
}

/// Payload of a buyer section save, tagged by section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "section", content = "data", rename_all = "snake_case")]
pub enum BuyerSectionData {
    ProgramProfile(ProgramProfile),
    Locations(Vec<Location>),
    DefaultServices { confirmed: bool },
    ServiceCatalog(Vec<ServiceOffering>),
    SubServices(Vec<SubService>),
    Providers(Vec<Provider>),
    LabNetwork(LabNetwork),
    RadiologyNetwork(RadiologyNetwork),
    Escalation(EscalationConfig),
    LocationCapacity(Vec<LocationCapacity>),
}

impl BuyerSectionData {
    pub fn section(&self) -> BuyerSection {
        match self {
            Self::ProgramProfile(_) => BuyerSection::ProgramProfile,
            Self::Locations(_) => BuyerSection::Locations,
            Self::DefaultServices { .. } => BuyerSection::DefaultServices,
            Self::ServiceCatalog(_) => BuyerSection::ServiceCatalog,
            Self::SubServices(_) => BuyerSection::SubServices,
            Self::Providers(_) => BuyerSection::Providers,
            Self::LabNetwork(_) => BuyerSection::LabNetwork,
            Self::RadiologyNetwork(_) => BuyerSection::RadiologyNetwork,
            Self::Escalation(_) => BuyerSection::Escalation,
            Self::LocationCapacity(_) => BuyerSection::LocationCapacity,
        }
    }
}
