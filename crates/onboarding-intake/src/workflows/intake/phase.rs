use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

use super::domain::{Clock, PhaseNumber, PhaseStatus, TenantId, TenantRole};
use super::repository::{PhaseRepository, RepositoryError, TenantDirectory, TenantRecord};

/// Persisted state of one phase for one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseRecord {
    pub tenant_id: TenantId,
    pub phase: PhaseNumber,
    pub status: PhaseStatus,
    pub unlocked_at: Option<DateTime<Utc>>,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl PhaseRecord {
    /// Phase 1 before anything has been written for it.
    fn implicit(tenant_id: &TenantId, phase: PhaseNumber) -> Self {
        Self {
            tenant_id: tenant_id.clone(),
            phase,
            status: PhaseStatus::Draft,
            unlocked_at: None,
            submitted_at: None,
        }
    }
}

/// What a phase transition writes besides the phase record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionStrategy {
    PhaseRecordOnly,
    /// Also keep the tenant's legacy `intake_status` in step, and read it back
    /// when no phase record exists yet.
    MirrorLegacyTenantStatus,
}

#[derive(Debug)]
pub struct PhasePlan {
    pub phase: PhaseNumber,
    pub label: &'static str,
    pub strategy: TransitionStrategy,
}

static BUYER_PHASES: [PhasePlan; 2] = [
    PhasePlan {
        phase: PhaseNumber::FIRST,
        label: "Program Setup",
        strategy: TransitionStrategy::MirrorLegacyTenantStatus,
    },
    PhasePlan {
        phase: PhaseNumber::SECOND,
        label: "Network Build-Out",
        strategy: TransitionStrategy::PhaseRecordOnly,
    },
];

static SELLER_PHASES: [PhasePlan; 1] = [PhasePlan {
    phase: PhaseNumber::FIRST,
    label: "Seller Onboarding",
    strategy: TransitionStrategy::PhaseRecordOnly,
}];

pub fn phase_plans(role: TenantRole) -> &'static [PhasePlan] {
    match role {
        TenantRole::Buyer => &BUYER_PHASES,
        TenantRole::Seller => &SELLER_PHASES,
    }
}

pub fn phase_plan(role: TenantRole, phase: PhaseNumber) -> Option<&'static PhasePlan> {
    phase_plans(role).iter().find(|plan| plan.phase == phase)
}

/// Phase statuses as seen by the lock resolver and evaluators.
///
/// Phase 1 always has a status; later phases only once unlocked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseStatusMap {
    statuses: BTreeMap<PhaseNumber, PhaseStatus>,
}

impl PhaseStatusMap {
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (PhaseNumber, PhaseStatus)>,
    {
        Self {
            statuses: entries.into_iter().collect(),
        }
    }

    pub fn from_records(records: &[PhaseRecord]) -> Self {
        Self::from_entries(records.iter().map(|record| (record.phase, record.status)))
    }

    pub fn status(&self, phase: PhaseNumber) -> Option<PhaseStatus> {
        match self.statuses.get(&phase) {
            Some(status) => Some(*status),
            None if phase == PhaseNumber::FIRST => Some(PhaseStatus::Draft),
            None => None,
        }
    }

    pub fn is_submitted(&self, phase: PhaseNumber) -> bool {
        self.status(phase) == Some(PhaseStatus::Submitted)
    }
}

/// Per-phase view returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseView {
    pub phase: PhaseNumber,
    pub label: &'static str,
    pub status: PhaseStatus,
    pub unlocked_at: Option<DateTime<Utc>>,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl PhaseView {
    pub(crate) fn new(plan: &PhasePlan, record: &PhaseRecord) -> Self {
        Self {
            phase: record.phase,
            label: plan.label,
            status: record.status,
            unlocked_at: record.unlocked_at,
            submitted_at: record.submitted_at,
        }
    }
}

/// Owns phase records and the side effects of moving between DRAFT and
/// SUBMITTED. Callers serialize transitions per (tenant, phase).
pub struct PhaseLifecycle<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> PhaseLifecycle<S>
where
    S: PhaseRepository + TenantDirectory,
{
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Current record for `plan`, or `None` if the phase was never unlocked.
    pub fn current(
        &self,
        tenant: &TenantRecord,
        plan: &PhasePlan,
    ) -> Result<Option<PhaseRecord>, RepositoryError> {
        if let Some(record) = self.store.fetch_phase(&tenant.tenant_id, plan.phase)? {
            return Ok(Some(record));
        }

        let fallback = match plan.strategy {
            TransitionStrategy::MirrorLegacyTenantStatus => Some(PhaseRecord {
                tenant_id: tenant.tenant_id.clone(),
                phase: plan.phase,
                status: tenant.intake_status,
                unlocked_at: None,
                submitted_at: tenant.intake_submitted_at,
            }),
            TransitionStrategy::PhaseRecordOnly if plan.phase == PhaseNumber::FIRST => {
                Some(PhaseRecord::implicit(&tenant.tenant_id, plan.phase))
            }
            TransitionStrategy::PhaseRecordOnly => None,
        };
        Ok(fallback)
    }

    /// Every reachable phase for the tenant's flow, in phase order.
    pub fn records(&self, tenant: &TenantRecord) -> Result<Vec<PhaseRecord>, RepositoryError> {
        let mut records = Vec::new();
        for plan in phase_plans(tenant.role) {
            if let Some(record) = self.current(tenant, plan)? {
                records.push(record);
            }
        }
        Ok(records)
    }

    pub fn views(&self, tenant: &TenantRecord) -> Result<Vec<PhaseView>, RepositoryError> {
        let mut views = Vec::new();
        for plan in phase_plans(tenant.role) {
            if let Some(record) = self.current(tenant, plan)? {
                views.push(PhaseView::new(plan, &record));
            }
        }
        Ok(views)
    }

    pub fn statuses(&self, tenant: &TenantRecord) -> Result<PhaseStatusMap, RepositoryError> {
        Ok(PhaseStatusMap::from_records(&self.records(tenant)?))
    }

    /// Move the phase to DRAFT, creating the record on first unlock.
    pub fn unlock(
        &self,
        tenant: &TenantRecord,
        plan: &PhasePlan,
    ) -> Result<PhaseRecord, RepositoryError> {
        let now = self.clock.now();
        let record = PhaseRecord {
            tenant_id: tenant.tenant_id.clone(),
            phase: plan.phase,
            status: PhaseStatus::Draft,
            unlocked_at: Some(now),
            submitted_at: None,
        };
        self.apply_strategy(tenant, plan, PhaseStatus::Draft, None)?;
        self.store.upsert_phase(record.clone())?;

        info!(tenant = %tenant.tenant_id, phase = %plan.phase, "phase unlocked");
        Ok(record)
    }

    /// Move the phase to SUBMITTED and stamp `submitted_at`.
    pub fn submit(
        &self,
        tenant: &TenantRecord,
        plan: &PhasePlan,
    ) -> Result<PhaseRecord, RepositoryError> {
        let now = self.clock.now();
        let unlocked_at = self
            .store
            .fetch_phase(&tenant.tenant_id, plan.phase)?
            .and_then(|existing| existing.unlocked_at);
        let record = PhaseRecord {
            tenant_id: tenant.tenant_id.clone(),
            phase: plan.phase,
            status: PhaseStatus::Submitted,
            unlocked_at,
            submitted_at: Some(now),
        };
        self.apply_strategy(tenant, plan, PhaseStatus::Submitted, Some(now))?;
        self.store.upsert_phase(record.clone())?;

        info!(tenant = %tenant.tenant_id, phase = %plan.phase, submitted_at = %now, "phase submitted");
        Ok(record)
    }

    /// Runs before the phase record is written, so a failed mirror leaves
    /// nothing half-transitioned.
    fn apply_strategy(
        &self,
        tenant: &TenantRecord,
        plan: &PhasePlan,
        status: PhaseStatus,
        submitted_at: Option<DateTime<Utc>>,
    ) -> Result<(), RepositoryError> {
        match plan.strategy {
            TransitionStrategy::PhaseRecordOnly => Ok(()),
            TransitionStrategy::MirrorLegacyTenantStatus => {
                // Re-read so a concurrent profile edit is not clobbered.
                let mut record = self
                    .store
                    .fetch_tenant(&tenant.tenant_id)?
                    .ok_or(RepositoryError::NotFound)?;
                record.intake_status = status;
                record.intake_submitted_at = submitted_at;
                self.store.update_tenant(record)?;
                debug!(tenant = %tenant.tenant_id, status = status.label(), "legacy intake status mirrored");
                Ok(())
            }
        }
    }
}
