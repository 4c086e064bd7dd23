//! In-process implementations of every intake repository trait.
//!
//! Used by the demo binary, the seeded development server, and tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use super::buyer::{
    BuyerIntakeRecords, EscalationConfig, LabNetwork, Location, ProgramProfile, Provider,
    RadiologyNetwork, ServiceOffering, SubService,
};
use super::domain::{PhaseNumber, RecordId, TenantId};
use super::phase::PhaseRecord;
use super::repository::{
    BuyerRecordStore, PhaseRepository, RepositoryError, SellerRecordStore, SnapshotRepository,
    TenantDirectory, TenantRecord,
};
use super::seller::{
    CareLocation, Clinician, EscalationContacts, SellerIntakeRecords, SellerOrganization,
    SellerServiceOffering,
};
use super::snapshot::{NewSnapshot, SectionSnapshot, SnapshotId};

#[derive(Default)]
struct TenantTables {
    buyer: BuyerIntakeRecords,
    seller: SellerIntakeRecords,
}

#[derive(Default)]
struct Tables {
    tenants: HashMap<TenantId, TenantRecord>,
    records: HashMap<TenantId, TenantTables>,
    phases: HashMap<(TenantId, PhaseNumber), PhaseRecord>,
}

#[derive(Default, Clone)]
pub struct InMemoryIntakeStore {
    tables: Arc<Mutex<Tables>>,
    sequence: Arc<AtomicU64>,
}

impl InMemoryIntakeStore {
    pub fn register_tenant(&self, record: TenantRecord) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        if tables.tenants.contains_key(&record.tenant_id) {
            return Err(RepositoryError::Conflict);
        }
        tables.tenants.insert(record.tenant_id.clone(), record);
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("intake store mutex poisoned".to_string()))
    }

    fn next_id(&self, prefix: &str) -> RecordId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        RecordId(format!("{prefix}-{id:06}"))
    }

    fn assign(&self, id: &mut Option<RecordId>, prefix: &str) {
        if id.is_none() {
            *id = Some(self.next_id(prefix));
        }
    }

    fn read<T>(
        &self,
        tenant_id: &TenantId,
        view: impl FnOnce(&TenantTables) -> T,
    ) -> Result<T, RepositoryError>
    where
        T: Default,
    {
        let tables = self.lock()?;
        Ok(tables.records.get(tenant_id).map(view).unwrap_or_default())
    }

    fn write<T>(
        &self,
        tenant_id: &TenantId,
        change: impl FnOnce(&mut TenantTables) -> T,
    ) -> Result<T, RepositoryError> {
        let mut tables = self.lock()?;
        if !tables.tenants.contains_key(tenant_id) {
            return Err(RepositoryError::NotFound);
        }
        let entry = tables.records.entry(tenant_id.clone()).or_default();
        Ok(change(entry))
    }
}

impl TenantDirectory for InMemoryIntakeStore {
    fn fetch_tenant(&self, tenant_id: &TenantId) -> Result<Option<TenantRecord>, RepositoryError> {
        Ok(self.lock()?.tenants.get(tenant_id).cloned())
    }

    fn update_tenant(&self, record: TenantRecord) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        match tables.tenants.get_mut(&record.tenant_id) {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}

impl BuyerRecordStore for InMemoryIntakeStore {
    fn program(&self, tenant_id: &TenantId) -> Result<Option<ProgramProfile>, RepositoryError> {
        self.read(tenant_id, |tables| tables.buyer.program.clone())
    }

    fn save_program(
        &self,
        tenant_id: &TenantId,
        program: ProgramProfile,
    ) -> Result<(), RepositoryError> {
        self.write(tenant_id, |tables| tables.buyer.program = Some(program))
    }

    fn locations(&self, tenant_id: &TenantId) -> Result<Vec<Location>, RepositoryError> {
        self.read(tenant_id, |tables| tables.buyer.locations.clone())
    }

    fn replace_locations(
        &self,
        tenant_id: &TenantId,
        mut rows: Vec<Location>,
    ) -> Result<Vec<Location>, RepositoryError> {
        for row in &mut rows {
            self.assign(&mut row.id, "loc");
        }
        self.write(tenant_id, |tables| {
            tables.buyer.locations = rows.clone();
            rows
        })
    }

    fn providers(&self, tenant_id: &TenantId) -> Result<Vec<Provider>, RepositoryError> {
        self.read(tenant_id, |tables| tables.buyer.providers.clone())
    }

    fn replace_providers(
        &self,
        tenant_id: &TenantId,
        mut rows: Vec<Provider>,
    ) -> Result<Vec<Provider>, RepositoryError> {
        for row in &mut rows {
            self.assign(&mut row.id, "prv");
        }
        self.write(tenant_id, |tables| {
            tables.buyer.providers = rows.clone();
            rows
        })
    }

    fn services(&self, tenant_id: &TenantId) -> Result<Vec<ServiceOffering>, RepositoryError> {
        self.read(tenant_id, |tables| tables.buyer.services.clone())
    }

    fn replace_services(
        &self,
        tenant_id: &TenantId,
        mut rows: Vec<ServiceOffering>,
    ) -> Result<Vec<ServiceOffering>, RepositoryError> {
        for row in &mut rows {
            self.assign(&mut row.id, "svc");
        }
        self.write(tenant_id, |tables| {
            tables.buyer.services = rows.clone();
            rows
        })
    }

    fn sub_services(&self, tenant_id: &TenantId) -> Result<Vec<SubService>, RepositoryError> {
        self.read(tenant_id, |tables| tables.buyer.sub_services.clone())
    }

    fn replace_sub_services(
        &self,
        tenant_id: &TenantId,
        mut rows: Vec<SubService>,
    ) -> Result<Vec<SubService>, RepositoryError> {
        for row in &mut rows {
            self.assign(&mut row.id, "sub");
        }
        self.write(tenant_id, |tables| {
            tables.buyer.sub_services = rows.clone();
            rows
        })
    }

    fn lab_network(&self, tenant_id: &TenantId) -> Result<Option<LabNetwork>, RepositoryError> {
        self.read(tenant_id, |tables| tables.buyer.lab_network.clone())
    }

    fn save_lab_network(
        &self,
        tenant_id: &TenantId,
        record: LabNetwork,
    ) -> Result<(), RepositoryError> {
        self.write(tenant_id, |tables| tables.buyer.lab_network = Some(record))
    }

    fn radiology_network(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Option<RadiologyNetwork>, RepositoryError> {
        self.read(tenant_id, |tables| tables.buyer.radiology_network.clone())
    }

    fn save_radiology_network(
        &self,
        tenant_id: &TenantId,
        record: RadiologyNetwork,
    ) -> Result<(), RepositoryError> {
        self.write(tenant_id, |tables| {
            tables.buyer.radiology_network = Some(record)
        })
    }

    fn escalation(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Option<EscalationConfig>, RepositoryError> {
        self.read(tenant_id, |tables| tables.buyer.escalation.clone())
    }

    fn save_escalation(
        &self,
        tenant_id: &TenantId,
        record: EscalationConfig,
    ) -> Result<(), RepositoryError> {
        self.write(tenant_id, |tables| tables.buyer.escalation = Some(record))
    }
}

impl SellerRecordStore for InMemoryIntakeStore {
    fn seller_organization(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Option<SellerOrganization>, RepositoryError> {
        self.read(tenant_id, |tables| tables.seller.organization.clone())
    }

    fn save_seller_organization(
        &self,
        tenant_id: &TenantId,
        record: SellerOrganization,
    ) -> Result<(), RepositoryError> {
        self.write(tenant_id, |tables| tables.seller.organization = Some(record))
    }

    fn care_locations(&self, tenant_id: &TenantId) -> Result<Vec<CareLocation>, RepositoryError> {
        self.read(tenant_id, |tables| tables.seller.locations.clone())
    }

    fn replace_care_locations(
        &self,
        tenant_id: &TenantId,
        mut rows: Vec<CareLocation>,
    ) -> Result<Vec<CareLocation>, RepositoryError> {
        for row in &mut rows {
            self.assign(&mut row.id, "sl");
        }
        self.write(tenant_id, |tables| {
            tables.seller.locations = rows.clone();
            rows
        })
    }

    fn clinicians(&self, tenant_id: &TenantId) -> Result<Vec<Clinician>, RepositoryError> {
        self.read(tenant_id, |tables| tables.seller.clinicians.clone())
    }

    fn replace_clinicians(
        &self,
        tenant_id: &TenantId,
        mut rows: Vec<Clinician>,
    ) -> Result<Vec<Clinician>, RepositoryError> {
        for row in &mut rows {
            self.assign(&mut row.id, "clin");
        }
        self.write(tenant_id, |tables| {
            tables.seller.clinicians = rows.clone();
            rows
        })
    }

    fn seller_offerings(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Vec<SellerServiceOffering>, RepositoryError> {
        self.read(tenant_id, |tables| tables.seller.offerings.clone())
    }

    fn replace_seller_offerings(
        &self,
        tenant_id: &TenantId,
        mut rows: Vec<SellerServiceOffering>,
    ) -> Result<Vec<SellerServiceOffering>, RepositoryError> {
        for row in &mut rows {
            self.assign(&mut row.id, "off");
        }
        self.write(tenant_id, |tables| {
            tables.seller.offerings = rows.clone();
            rows
        })
    }

    fn escalation_contacts(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Option<EscalationContacts>, RepositoryError> {
        self.read(tenant_id, |tables| tables.seller.escalation.clone())
    }

    fn save_escalation_contacts(
        &self,
        tenant_id: &TenantId,
        record: EscalationContacts,
    ) -> Result<(), RepositoryError> {
        self.write(tenant_id, |tables| tables.seller.escalation = Some(record))
    }
}

impl PhaseRepository for InMemoryIntakeStore {
    fn fetch_phase(
        &self,
        tenant_id: &TenantId,
        phase: PhaseNumber,
    ) -> Result<Option<PhaseRecord>, RepositoryError> {
        let tables = self.lock()?;
        Ok(tables.phases.get(&(tenant_id.clone(), phase)).cloned())
    }

    fn upsert_phase(&self, record: PhaseRecord) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        tables
            .phases
            .insert((record.tenant_id.clone(), record.phase), record);
        Ok(())
    }
}

/// Append-only snapshot log with sequential ids.
#[derive(Default, Clone)]
pub struct InMemorySnapshotLog {
    rows: Arc<Mutex<Vec<SectionSnapshot>>>,
}

impl SnapshotRepository for InMemorySnapshotLog {
    fn append(&self, snapshot: NewSnapshot) -> Result<SectionSnapshot, RepositoryError> {
        let mut rows = self
            .rows
            .lock()
            .map_err(|_| RepositoryError::Unavailable("snapshot log mutex poisoned".to_string()))?;
        let stored = SectionSnapshot {
            id: SnapshotId(rows.len() as u64 + 1),
            tenant_id: snapshot.tenant_id,
            section: snapshot.section,
            data: snapshot.data,
            actor: snapshot.actor,
            program_ref: snapshot.program_ref,
            recorded_at: snapshot.recorded_at,
            rolled_back_to: snapshot.rolled_back_to,
        };
        rows.push(stored.clone());
        Ok(stored)
    }

    fn for_tenant(&self, tenant_id: &TenantId) -> Result<Vec<SectionSnapshot>, RepositoryError> {
        let rows = self
            .rows
            .lock()
            .map_err(|_| RepositoryError::Unavailable("snapshot log mutex poisoned".to_string()))?;
        Ok(rows
            .iter()
            .filter(|row| &row.tenant_id == tenant_id)
            .cloned()
            .collect())
    }
}
