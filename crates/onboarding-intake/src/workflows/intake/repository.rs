use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::buyer::{
    EscalationConfig, LabNetwork, Location, ProgramProfile, Provider, RadiologyNetwork,
    ServiceOffering, SubService,
};
use super::domain::{PhaseNumber, PhaseStatus, ProgramRef, TenantId, TenantRole};
use super::phase::PhaseRecord;
use super::seller::{
    CareLocation, Clinician, EscalationContacts, SellerOrganization, SellerServiceOffering,
};
use super::snapshot::{NewSnapshot, SectionSnapshot};

/// Top-level tenant row owned by the account subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantRecord {
    pub tenant_id: TenantId,
    pub display_name: String,
    pub role: TenantRole,
    pub program_ref: Option<ProgramRef>,
    /// Legacy intake status kept in step with the buyer flow's first phase.
    pub intake_status: PhaseStatus,
    pub intake_submitted_at: Option<DateTime<Utc>>,
}

impl TenantRecord {
    pub fn new(tenant_id: TenantId, display_name: impl Into<String>, role: TenantRole) -> Self {
        Self {
            tenant_id,
            display_name: display_name.into(),
            role,
            program_ref: None,
            intake_status: PhaseStatus::Draft,
            intake_submitted_at: None,
        }
    }
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

pub trait TenantDirectory: Send + Sync {
    fn fetch_tenant(&self, tenant_id: &TenantId) -> Result<Option<TenantRecord>, RepositoryError>;
    fn update_tenant(&self, record: TenantRecord) -> Result<(), RepositoryError>;
}

/// Backing tables for buyer sections.
///
/// `replace_*` calls persist the full collection and return it with every row
/// carrying an id.
pub trait BuyerRecordStore: Send + Sync {
    fn program(&self, tenant_id: &TenantId) -> Result<Option<ProgramProfile>, RepositoryError>;
    fn save_program(
        &self,
        tenant_id: &TenantId,
        program: ProgramProfile,
    ) -> Result<(), RepositoryError>;

    fn locations(&self, tenant_id: &TenantId) -> Result<Vec<Location>, RepositoryError>;
    fn replace_locations(
        &self,
        tenant_id: &TenantId,
        rows: Vec<Location>,
    ) -> Result<Vec<Location>, RepositoryError>;

    fn providers(&self, tenant_id: &TenantId) -> Result<Vec<Provider>, RepositoryError>;
    fn replace_providers(
        &self,
        tenant_id: &TenantId,
        rows: Vec<Provider>,
    ) -> Result<Vec<Provider>, RepositoryError>;

    fn services(&self, tenant_id: &TenantId) -> Result<Vec<ServiceOffering>, RepositoryError>;
    fn replace_services(
        &self,
        tenant_id: &TenantId,
        rows: Vec<ServiceOffering>,
    ) -> Result<Vec<ServiceOffering>, RepositoryError>;

    fn sub_services(&self, tenant_id: &TenantId) -> Result<Vec<SubService>, RepositoryError>;
    fn replace_sub_services(
        &self,
        tenant_id: &TenantId,
        rows: Vec<SubService>,
    ) -> Result<Vec<SubService>, RepositoryError>;

    fn lab_network(&self, tenant_id: &TenantId) -> Result<Option<LabNetwork>, RepositoryError>;
    fn save_lab_network(
        &self,
        tenant_id: &TenantId,
        record: LabNetwork,
    ) -> Result<(), RepositoryError>;

    fn radiology_network(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Option<RadiologyNetwork>, RepositoryError>;
    fn save_radiology_network(
        &self,
        tenant_id: &TenantId,
        record: RadiologyNetwork,
    ) -> Result<(), RepositoryError>;

    fn escalation(&self, tenant_id: &TenantId)
        -> Result<Option<EscalationConfig>, RepositoryError>;
    fn save_escalation(
        &self,
        tenant_id: &TenantId,
        record: EscalationConfig,
    ) -> Result<(), RepositoryError>;
}

/// Backing tables for seller sections; disjoint from the buyer tables.
pub trait SellerRecordStore: Send + Sync {
    fn seller_organization(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Option<SellerOrganization>, RepositoryError>;
    fn save_seller_organization(
        &self,
        tenant_id: &TenantId,
        record: SellerOrganization,
    ) -> Result<(), RepositoryError>;

    fn care_locations(&self, tenant_id: &TenantId) -> Result<Vec<CareLocation>, RepositoryError>;
    fn replace_care_locations(
        &self,
        tenant_id: &TenantId,
        rows: Vec<CareLocation>,
    ) -> Result<Vec<CareLocation>, RepositoryError>;

    fn clinicians(&self, tenant_id: &TenantId) -> Result<Vec<Clinician>, RepositoryError>;
    fn replace_clinicians(
        &self,
        tenant_id: &TenantId,
        rows: Vec<Clinician>,
    ) -> Result<Vec<Clinician>, RepositoryError>;

    fn seller_offerings(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Vec<SellerServiceOffering>, RepositoryError>;
    fn replace_seller_offerings(
        &self,
        tenant_id: &TenantId,
        rows: Vec<SellerServiceOffering>,
    ) -> Result<Vec<SellerServiceOffering>, RepositoryError>;

    fn escalation_contacts(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Option<EscalationContacts>, RepositoryError>;
    fn save_escalation_contacts(
        &self,
        tenant_id: &TenantId,
        record: EscalationContacts,
    ) -> Result<(), RepositoryError>;
}

pub trait PhaseRepository: Send + Sync {
    fn fetch_phase(
        &self,
        tenant_id: &TenantId,
        phase: PhaseNumber,
    ) -> Result<Option<PhaseRecord>, RepositoryError>;
    fn upsert_phase(&self, record: PhaseRecord) -> Result<(), RepositoryError>;
}

/// Append-only storage for section snapshots. There is no update or delete.
pub trait SnapshotRepository: Send + Sync {
    fn append(&self, snapshot: NewSnapshot) -> Result<SectionSnapshot, RepositoryError>;
    /// All snapshots for the tenant in append order.
    fn for_tenant(&self, tenant_id: &TenantId) -> Result<Vec<SectionSnapshot>, RepositoryError>;
}

/// Everything the intake service reads and writes apart from the audit log.
pub trait IntakeStore:
    TenantDirectory + BuyerRecordStore + SellerRecordStore + PhaseRepository
{
}

impl<T> IntakeStore for T where
    T: TenantDirectory + BuyerRecordStore + SellerRecordStore + PhaseRepository
{
}
