use serde::{Deserialize, Serialize};

use super::super::domain::{present, FieldSource, PersistedRow, RecordId, Selectable};
use super::blueprint::SellerSection;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SellerOrganization {
    pub organization_name: Option<String>,
    pub tax_id: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    /// Written only by the participation-terms section.
    pub terms_accepted: bool,
}

impl FieldSource for SellerOrganization {
    fn has_field(&self, name: &str) -> bool {
        match name {
            "organization_name" => present(&self.organization_name),
            "tax_id" => present(&self.tax_id),
            "contact_name" => present(&self.contact_name),
            "contact_email" => present(&self.contact_email),
            "contact_phone" => present(&self.contact_phone),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CareLocation {
    pub id: Option<RecordId>,
    pub name: Option<String>,
    pub address_line1: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
}

impl FieldSource for CareLocation {
    fn has_field(&self, name: &str) -> bool {
        match name {
            "name" => present(&self.name),
            "address_line1" => present(&self.address_line1),
            "city" => present(&self.city),
            "state" => present(&self.state),
            "postal_code" => present(&self.postal_code),
            _ => false,
        }
    }
}

impl PersistedRow for CareLocation {
    fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Clinician {
    pub id: Option<RecordId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub npi: Option<String>,
    pub license_state: Option<String>,
    pub license_number: Option<String>,
}

impl FieldSource for Clinician {
    fn has_field(&self, name: &str) -> bool {
        match name {
            "first_name" => present(&self.first_name),
            "last_name" => present(&self.last_name),
            "npi" => present(&self.npi),
            "license_state" => present(&self.license_state),
            "license_number" => present(&self.license_number),
            _ => false,
        }
    }
}

impl PersistedRow for Clinician {
    fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerServiceOffering {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub selected: bool,
}

impl Selectable for SellerServiceOffering {
    fn is_selected(&self) -> bool {
        self.selected
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationContacts {
    pub primary_name: Option<String>,
    pub primary_phone: Option<String>,
    pub primary_email: Option<String>,
    pub backup_name: Option<String>,
    pub backup_phone: Option<String>,
}

impl FieldSource for EscalationContacts {
    fn has_field(&self, name: &str) -> bool {
        match name {
            "primary_name" => present(&self.primary_name),
            "primary_phone" => present(&self.primary_phone),
            "primary_email" => present(&self.primary_email),
            "backup_name" => present(&self.backup_name),
            "backup_phone" => present(&self.backup_phone),
            _ => false,
        }
    }
}

/// Everything the seller evaluator reads, fetched up front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SellerIntakeRecords {
    pub organization: Option<SellerOrganization>,
    pub locations: Vec<CareLocation>,
    pub clinicians: Vec<Clinician>,
    pub offerings: Vec<SellerServiceOffering>,
    pub escalation: Option<EscalationContacts>,
}

/// Payload of a seller section save, tagged by section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "section", content = "data", rename_all = "snake_case")]
pub enum SellerSectionData {
    OrganizationProfile(SellerOrganization),
    CareLocations(Vec<CareLocation>),
    Clinicians(Vec<Clinician>),
    ServiceOfferings(Vec<SellerServiceOffering>),
    EscalationContacts(EscalationContacts),
    ParticipationTerms { accepted: bool },
}

impl SellerSectionData {
    pub fn section(&self) -> SellerSection {
        match self {
            Self::OrganizationProfile(_) => SellerSection::OrganizationProfile,
            Self::CareLocations(_) => SellerSection::CareLocations,
            Self::Clinicians(_) => SellerSection::Clinicians,
            Self::ServiceOfferings(_) => SellerSection::ServiceOfferings,
            Self::EscalationContacts(_) => SellerSection::EscalationContacts,
            Self::ParticipationTerms { .. } => SellerSection::ParticipationTerms,
        }
    }
}
