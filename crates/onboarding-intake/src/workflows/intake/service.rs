use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::config::IntakeConfig;

use super::buyer::{
    evaluate_buyer, BuyerIntakeRecords, BuyerSection, BuyerSectionData, Location, LocationCapacity,
};
use super::domain::{
    ActorId, Clock, PhaseNumber, PhaseStatus, ProgramRef, RequestContext, SystemClock, TenantId,
    TenantRole,
};
use super::gating::{access_overview, edit_lock, LockReason, SectionAccess};
use super::phase::{phase_plan, PhaseLifecycle, PhasePlan, PhaseRecord, PhaseStatusMap, PhaseView};
use super::repository::{IntakeStore, RepositoryError, SnapshotRepository, TenantRecord};
use super::section::{IntakeSection, StatusMap};
use super::seller::{evaluate_seller, SellerIntakeRecords, SellerSection, SellerSectionData};
use super::snapshot::{SectionSnapshot, SnapshotRecorder};
use super::submission::{IncompleteSectionsError, SubmissionError, SubmissionGate};

/// Everything a caller needs to render a tenant's intake.
#[derive(Debug, Clone, Serialize)]
pub struct IntakeOverview {
    pub tenant_id: TenantId,
    pub role: TenantRole,
    pub sections: Vec<SectionAccess>,
    pub phases: Vec<PhaseView>,
}

/// Service composing evaluators, the lock resolver, the phase lifecycle, the
/// submission gate, and the snapshot recorder.
///
/// Every operation takes the caller's resolved [`RequestContext`]; elevated
/// callers use the same entry points as tenant users.
pub struct OnboardingService<S, L> {
    store: Arc<S>,
    lifecycle: PhaseLifecycle<S>,
    snapshots: SnapshotRecorder<L>,
    gate: SubmissionGate,
    history_limit: usize,
}

impl<S, L> OnboardingService<S, L>
where
    S: IntakeStore + 'static,
    L: SnapshotRepository + 'static,
{
    pub fn new(store: Arc<S>, snapshots: Arc<L>, config: &IntakeConfig) -> Self {
        Self::with_clock(store, snapshots, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        store: Arc<S>,
        snapshots: Arc<L>,
        config: &IntakeConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            lifecycle: PhaseLifecycle::new(store.clone(), clock.clone()),
            snapshots: SnapshotRecorder::new(snapshots, clock),
            store,
            gate: SubmissionGate::default(),
            history_limit: config.snapshot_history_limit,
        }
    }

    pub fn compute_statuses(
        &self,
        ctx: &RequestContext,
        tenant_id: &TenantId,
    ) -> Result<StatusMap<BuyerSection>, OnboardingError> {
        let tenant = self.authorized_tenant(ctx, tenant_id)?;
        expect_role(&tenant, TenantRole::Buyer)?;
        let phases = self.phase_statuses_or_default(&tenant);
        Ok(self.buyer_statuses(&tenant, &phases))
    }

    pub fn compute_seller_statuses(
        &self,
        ctx: &RequestContext,
        tenant_id: &TenantId,
    ) -> Result<StatusMap<SellerSection>, OnboardingError> {
        let tenant = self.authorized_tenant(ctx, tenant_id)?;
        expect_role(&tenant, TenantRole::Seller)?;
        let phases = self.phase_statuses_or_default(&tenant);
        Ok(self.seller_statuses(&tenant, &phases))
    }

    pub fn overview(
        &self,
        ctx: &RequestContext,
        tenant_id: &TenantId,
    ) -> Result<IntakeOverview, OnboardingError> {
        let tenant = self.authorized_tenant(ctx, tenant_id)?;
        let phases = self.phase_statuses_or_default(&tenant);
        let sections = match tenant.role {
            TenantRole::Buyer => access_overview(&self.buyer_statuses(&tenant, &phases), &phases),
            TenantRole::Seller => access_overview(&self.seller_statuses(&tenant, &phases), &phases),
        };

        Ok(IntakeOverview {
            phases: self.lifecycle.views(&tenant)?,
            tenant_id: tenant.tenant_id,
            role: tenant.role,
            sections,
        })
    }

    /// Persist one buyer section and return the recomputed status map.
    pub fn save_buyer_section(
        &self,
        ctx: &RequestContext,
        tenant_id: &TenantId,
        data: BuyerSectionData,
    ) -> Result<StatusMap<BuyerSection>, OnboardingError> {
        let tenant = self.authorized_tenant(ctx, tenant_id)?;
        expect_role(&tenant, TenantRole::Buyer)?;
        let section = data.section();

        let guarded_write = || -> Result<BuyerSectionData, OnboardingError> {
            let phases = self.lifecycle.statuses(&tenant)?;
            let statuses = self.buyer_statuses(&tenant, &phases);
            ensure_editable(section, &statuses, &phases, ctx.is_elevated)?;
            self.persist_buyer(&tenant.tenant_id, data)
        };
        let stored = self
            .gate
            .serialize(&tenant.tenant_id, buyer_write_key(section), guarded_write)?;

        info!(tenant = %tenant.tenant_id, section = %section.key(), actor = %ctx.actor_id, "buyer section saved");
        self.snapshot_after_save(ctx, &tenant, section, serde_json::to_value(&stored));

        let phases = self.phase_statuses_or_default(&tenant);
        Ok(self.buyer_statuses(&tenant, &phases))
    }

    /// Persist one seller section and return the recomputed status map.
    pub fn save_seller_section(
        &self,
        ctx: &RequestContext,
        tenant_id: &TenantId,
        data: SellerSectionData,
    ) -> Result<StatusMap<SellerSection>, OnboardingError> {
        let tenant = self.authorized_tenant(ctx, tenant_id)?;
        expect_role(&tenant, TenantRole::Seller)?;
        let section = data.section();

        let guarded_write = || -> Result<SellerSectionData, OnboardingError> {
            let phases = self.lifecycle.statuses(&tenant)?;
            let statuses = self.seller_statuses(&tenant, &phases);
            ensure_editable(section, &statuses, &phases, ctx.is_elevated)?;
            self.persist_seller(&tenant.tenant_id, data)
        };
        let stored = self
            .gate
            .serialize(&tenant.tenant_id, section.meta().min_phase, guarded_write)?;

        info!(tenant = %tenant.tenant_id, section = %section.key(), actor = %ctx.actor_id, "seller section saved");
        self.snapshot_after_save(ctx, &tenant, section, serde_json::to_value(&stored));

        let phases = self.phase_statuses_or_default(&tenant);
        Ok(self.seller_statuses(&tenant, &phases))
    }

    /// Gate and submit a phase. Re-evaluates every required section first.
    pub fn submit(
        &self,
        ctx: &RequestContext,
        tenant_id: &TenantId,
        phase: PhaseNumber,
    ) -> Result<PhaseRecord, OnboardingError> {
        let tenant = self.authorized_tenant(ctx, tenant_id)?;
        let plan = plan_for(&tenant, phase)?;

        let outcome = match tenant.role {
            TenantRole::Buyer => self.gate.submit(&self.lifecycle, &tenant, plan, || {
                let phases = self.lifecycle.statuses(&tenant)?;
                Ok(self.buyer_statuses(&tenant, &phases))
            }),
            TenantRole::Seller => self.gate.submit(&self.lifecycle, &tenant, plan, || {
                let phases = self.lifecycle.statuses(&tenant)?;
                Ok(self.seller_statuses(&tenant, &phases))
            }),
        };

        outcome.map_err(|failure| {
            let error = OnboardingError::from_submission(&tenant.tenant_id, failure);
            if let OnboardingError::Incomplete(incomplete) = &error {
                info!(tenant = %tenant.tenant_id, phase = %phase, missing = ?incomplete.missing, "submission refused");
            }
            error
        })
    }

    /// Open a phase for editing, creating its record on first use.
    pub fn unlock_phase(
        &self,
        ctx: &RequestContext,
        tenant_id: &TenantId,
        phase: PhaseNumber,
    ) -> Result<PhaseRecord, OnboardingError> {
        require_elevated(ctx, "unlock_phase")?;
        let tenant = self.authorized_tenant(ctx, tenant_id)?;
        let plan = plan_for(&tenant, phase)?;

        let record = self.gate.serialize(&tenant.tenant_id, phase, || {
            self.lifecycle.unlock(&tenant, plan)
        })?;
        Ok(record)
    }

    /// Reopen a submitted phase. Section statuses are left exactly as they were.
    pub fn unlock_phase_for_editing(
        &self,
        ctx: &RequestContext,
        tenant_id: &TenantId,
        phase: PhaseNumber,
    ) -> Result<PhaseRecord, OnboardingError> {
        require_elevated(ctx, "unlock_phase_for_editing")?;
        let tenant = self.authorized_tenant(ctx, tenant_id)?;
        let plan = plan_for(&tenant, phase)?;

        let reopen = || -> Result<PhaseRecord, OnboardingError> {
            match self.lifecycle.current(&tenant, plan)? {
                Some(record) if record.status == PhaseStatus::Submitted => {
                    info!(tenant = %tenant.tenant_id, phase = %phase, actor = %ctx.actor_id, "reopening submitted phase");
                    Ok(self.lifecycle.unlock(&tenant, plan)?)
                }
                _ => Err(OnboardingError::PhaseNotSubmitted {
                    tenant: tenant.tenant_id.clone(),
                    phase,
                }),
            }
        };
        self.gate.serialize(&tenant.tenant_id, phase, reopen)
    }

    /// Administrative submit that skips the completeness gate.
    pub fn lock_phase(
        &self,
        ctx: &RequestContext,
        tenant_id: &TenantId,
        phase: PhaseNumber,
    ) -> Result<PhaseRecord, OnboardingError> {
        require_elevated(ctx, "lock_phase")?;
        let tenant = self.authorized_tenant(ctx, tenant_id)?;
        let plan = plan_for(&tenant, phase)?;

        let lock = || -> Result<PhaseRecord, OnboardingError> {
            match self.lifecycle.current(&tenant, plan)? {
                None => Err(OnboardingError::PhaseNotFound {
                    tenant: tenant.tenant_id.clone(),
                    phase,
                }),
                Some(record) if record.status == PhaseStatus::Submitted => Ok(record),
                Some(_) => Ok(self.lifecycle.submit(&tenant, plan)?),
            }
        };
        self.gate.serialize(&tenant.tenant_id, phase, lock)
    }

    pub fn list_phase_statuses(
        &self,
        ctx: &RequestContext,
        tenant_id: &TenantId,
    ) -> Result<Vec<PhaseView>, OnboardingError> {
        let tenant = self.authorized_tenant(ctx, tenant_id)?;
        Ok(self.lifecycle.views(&tenant)?)
    }

    /// Append an audit snapshot for a section named by its key (`"6"`, `"S-2"`).
    pub fn record_snapshot(
        &self,
        ctx: &RequestContext,
        tenant_id: &TenantId,
        section: &str,
        data: Value,
    ) -> Result<SectionSnapshot, OnboardingError> {
        let tenant = self.authorized_tenant(ctx, tenant_id)?;
        let key = match tenant.role {
            TenantRole::Buyer => BuyerSection::parse_key(section).map(BuyerSection::key),
            TenantRole::Seller => SellerSection::parse_key(section).map(SellerSection::key),
        }
        .ok_or_else(|| OnboardingError::UnknownSection {
            role: tenant.role,
            section: section.to_string(),
        })?;

        let snapshot = self.snapshots.record(
            &tenant.tenant_id,
            key,
            data,
            &ctx.actor_id,
            program_ref(ctx, &tenant),
        )?;
        Ok(snapshot)
    }

    /// Most recent snapshots first, capped by the configured history limit.
    pub fn snapshot_history(
        &self,
        ctx: &RequestContext,
        tenant_id: &TenantId,
        limit: Option<usize>,
    ) -> Result<Vec<SectionSnapshot>, OnboardingError> {
        let tenant = self.authorized_tenant(ctx, tenant_id)?;
        let limit = limit.map_or(self.history_limit, |requested| {
            requested.min(self.history_limit)
        });
        Ok(self.snapshots.history(&tenant.tenant_id, limit)?)
    }

    /// Restore every section's payload as of `target` by appending new snapshots.
    pub fn rollback_to(
        &self,
        ctx: &RequestContext,
        tenant_id: &TenantId,
        target: DateTime<Utc>,
    ) -> Result<Vec<SectionSnapshot>, OnboardingError> {
        require_elevated(ctx, "rollback_to")?;
        let tenant = self.authorized_tenant(ctx, tenant_id)?;
        let program_ref = program_ref(ctx, &tenant);

        let restored = match tenant.role {
            TenantRole::Buyer => self.snapshots.rollback_to::<BuyerSection>(
                &tenant.tenant_id,
                target,
                &ctx.actor_id,
                program_ref,
            ),
            TenantRole::Seller => self.snapshots.rollback_to::<SellerSection>(
                &tenant.tenant_id,
                target,
                &ctx.actor_id,
                program_ref,
            ),
        }?;
        Ok(restored)
    }

    fn authorized_tenant(
        &self,
        ctx: &RequestContext,
        tenant_id: &TenantId,
    ) -> Result<TenantRecord, OnboardingError> {
        if !ctx.may_act_on(tenant_id) {
            warn!(actor = %ctx.actor_id, tenant = %tenant_id, "cross-tenant access refused");
            return Err(OnboardingError::Forbidden {
                actor: ctx.actor_id.clone(),
                tenant: tenant_id.clone(),
            });
        }

        let tenant = self
            .store
            .fetch_tenant(tenant_id)?
            .ok_or_else(|| OnboardingError::TenantNotFound(tenant_id.clone()))?;
        if !ctx.is_elevated && ctx.role != tenant.role {
            warn!(actor = %ctx.actor_id, tenant = %tenant_id, role = %ctx.role, "caller role does not match the tenant flow");
            return Err(OnboardingError::FlowMismatch {
                tenant: tenant.tenant_id,
                expected: ctx.role,
                actual: tenant.role,
            });
        }
        Ok(tenant)
    }

    fn phase_statuses_or_default(&self, tenant: &TenantRecord) -> PhaseStatusMap {
        degrade(&tenant.tenant_id, "phases", self.lifecycle.statuses(tenant))
    }

    fn buyer_statuses(
        &self,
        tenant: &TenantRecord,
        phases: &PhaseStatusMap,
    ) -> StatusMap<BuyerSection> {
        let id = &tenant.tenant_id;
        let records = BuyerIntakeRecords {
            program: degrade(id, "program", self.store.program(id)),
            locations: degrade(id, "locations", self.store.locations(id)),
            providers: degrade(id, "providers", self.store.providers(id)),
            services: degrade(id, "services", self.store.services(id)),
            sub_services: degrade(id, "sub_services", self.store.sub_services(id)),
            lab_network: degrade(id, "lab_network", self.store.lab_network(id)),
            radiology_network: degrade(id, "radiology_network", self.store.radiology_network(id)),
            escalation: degrade(id, "escalation", self.store.escalation(id)),
        };
        let statuses = evaluate_buyer(&records, phases);
        debug!(tenant = %id, "buyer statuses evaluated");
        statuses
    }

    fn seller_statuses(
        &self,
        tenant: &TenantRecord,
        phases: &PhaseStatusMap,
    ) -> StatusMap<SellerSection> {
        let id = &tenant.tenant_id;
        let records = SellerIntakeRecords {
            organization: degrade(id, "seller_organization", self.store.seller_organization(id)),
            locations: degrade(id, "care_locations", self.store.care_locations(id)),
            clinicians: degrade(id, "clinicians", self.store.clinicians(id)),
            offerings: degrade(id, "seller_offerings", self.store.seller_offerings(id)),
            escalation: degrade(id, "escalation_contacts", self.store.escalation_contacts(id)),
        };
        let statuses = evaluate_seller(&records, phases);
        debug!(tenant = %id, "seller statuses evaluated");
        statuses
    }

    /// Write one buyer section and return it as stored, with assigned ids and
    /// carried-over flags.
    fn persist_buyer(
        &self,
        tenant_id: &TenantId,
        data: BuyerSectionData,
    ) -> Result<BuyerSectionData, OnboardingError> {
        let stored = match data {
            BuyerSectionData::ProgramProfile(mut program) => {
                program.default_services_confirmed = self
                    .store
                    .program(tenant_id)?
                    .map(|existing| existing.default_services_confirmed)
                    .unwrap_or(false);
                self.store.save_program(tenant_id, program.clone())?;
                BuyerSectionData::ProgramProfile(program)
            }
            BuyerSectionData::DefaultServices { confirmed } => {
                let mut program = self.store.program(tenant_id)?.unwrap_or_default();
                program.default_services_confirmed = confirmed;
                self.store.save_program(tenant_id, program)?;
                BuyerSectionData::DefaultServices { confirmed }
            }
            BuyerSectionData::Locations(rows) => {
                let existing = self.store.locations(tenant_id)?;
                let rows = rows
                    .into_iter()
                    .map(|row| keep_capacity_fields(row, &existing))
                    .collect();
                BuyerSectionData::Locations(self.store.replace_locations(tenant_id, rows)?)
            }
            BuyerSectionData::LocationCapacity(updates) => {
                let mut locations = self.store.locations(tenant_id)?;
                for update in updates {
                    let location = locations
                        .iter_mut()
                        .find(|location| location.id.as_ref() == Some(&update.location_id))
                        .ok_or_else(|| {
                            OnboardingError::InvalidPayload(format!(
                                "location {} does not exist",
                                update.location_id.0
                            ))
                        })?;
                    location.operating_hours = update.operating_hours;
                    location.daily_capacity = update.daily_capacity;
                }
                let saved = self.store.replace_locations(tenant_id, locations)?;
                BuyerSectionData::LocationCapacity(capacity_rows(saved))
            }
            BuyerSectionData::ServiceCatalog(rows) => {
                BuyerSectionData::ServiceCatalog(self.store.replace_services(tenant_id, rows)?)
            }
            BuyerSectionData::SubServices(rows) => {
                BuyerSectionData::SubServices(self.store.replace_sub_services(tenant_id, rows)?)
            }
            BuyerSectionData::Providers(rows) => {
                BuyerSectionData::Providers(self.store.replace_providers(tenant_id, rows)?)
            }
            BuyerSectionData::LabNetwork(record) => {
                self.store.save_lab_network(tenant_id, record.clone())?;
                BuyerSectionData::LabNetwork(record)
            }
            BuyerSectionData::RadiologyNetwork(record) => {
                self.store.save_radiology_network(tenant_id, record.clone())?;
                BuyerSectionData::RadiologyNetwork(record)
            }
            BuyerSectionData::Escalation(record) => {
                self.store.save_escalation(tenant_id, record.clone())?;
                BuyerSectionData::Escalation(record)
            }
        };
        Ok(stored)
    }

    fn persist_seller(
        &self,
        tenant_id: &TenantId,
        data: SellerSectionData,
    ) -> Result<SellerSectionData, OnboardingError> {
        let stored = match data {
            SellerSectionData::OrganizationProfile(mut organization) => {
                organization.terms_accepted = self
                    .store
                    .seller_organization(tenant_id)?
                    .map(|existing| existing.terms_accepted)
                    .unwrap_or(false);
                self.store
                    .save_seller_organization(tenant_id, organization.clone())?;
                SellerSectionData::OrganizationProfile(organization)
            }
            SellerSectionData::ParticipationTerms { accepted } => {
                let mut organization = self
                    .store
                    .seller_organization(tenant_id)?
                    .unwrap_or_default();
                organization.terms_accepted = accepted;
                self.store
                    .save_seller_organization(tenant_id, organization)?;
                SellerSectionData::ParticipationTerms { accepted }
            }
            SellerSectionData::CareLocations(rows) => {
                SellerSectionData::CareLocations(self.store.replace_care_locations(tenant_id, rows)?)
            }
            SellerSectionData::Clinicians(rows) => {
                SellerSectionData::Clinicians(self.store.replace_clinicians(tenant_id, rows)?)
            }
            SellerSectionData::ServiceOfferings(rows) => SellerSectionData::ServiceOfferings(
                self.store.replace_seller_offerings(tenant_id, rows)?,
            ),
            SellerSectionData::EscalationContacts(record) => {
                self.store
                    .save_escalation_contacts(tenant_id, record.clone())?;
                SellerSectionData::EscalationContacts(record)
            }
        };
        Ok(stored)
    }

    fn snapshot_after_save<Sec: IntakeSection>(
        &self,
        ctx: &RequestContext,
        tenant: &TenantRecord,
        section: Sec,
        payload: Result<Value, serde_json::Error>,
    ) {
        let payload = match payload {
            Ok(payload) => payload,
            Err(err) => {
                error!(tenant = %tenant.tenant_id, section = %section.key(), error = %err, "section payload could not be serialized for the audit log");
                return;
            }
        };

        if let Err(err) = self.snapshots.record(
            &tenant.tenant_id,
            section.key(),
            payload,
            &ctx.actor_id,
            program_ref(ctx, tenant),
        ) {
            error!(tenant = %tenant.tenant_id, section = %section.key(), error = %err, "snapshot write failed; section save kept");
        }
    }
}

fn ensure_editable<Sec: IntakeSection>(
    section: Sec,
    statuses: &StatusMap<Sec>,
    phases: &PhaseStatusMap,
    elevated: bool,
) -> Result<(), OnboardingError> {
    match edit_lock(section, statuses, phases, elevated) {
        None => Ok(()),
        Some(reason) => Err(OnboardingError::SectionLocked {
            title: section.title(),
            reason,
        }),
    }
}

/// Phase-one location edits keep whatever phase-two fields the row already had.
fn keep_capacity_fields(mut row: Location, existing: &[Location]) -> Location {
    let previous = row
        .id
        .as_ref()
        .and_then(|id| existing.iter().find(|location| location.id.as_ref() == Some(id)));
    if let Some(previous) = previous {
        if row.operating_hours.is_none() {
            row.operating_hours = previous.operating_hours.clone();
        }
        if row.daily_capacity.is_none() {
            row.daily_capacity = previous.daily_capacity;
        }
    }
    row
}

/// Capacity fields of every saved location, keyed by location id.
fn capacity_rows(locations: Vec<Location>) -> Vec<LocationCapacity> {
    locations
        .into_iter()
        .filter_map(|location| {
            location.id.map(|location_id| LocationCapacity {
                location_id,
                operating_hours: location.operating_hours,
                daily_capacity: location.daily_capacity,
            })
        })
        .collect()
}

/// Gate key for a buyer save. Both location sections rewrite the same table,
/// so they share the phase-one key.
fn buyer_write_key(section: BuyerSection) -> PhaseNumber {
    match section {
        BuyerSection::Locations | BuyerSection::LocationCapacity => PhaseNumber::FIRST,
        other => other.meta().min_phase,
    }
}

fn degrade<T: Default>(
    tenant_id: &TenantId,
    table: &'static str,
    result: Result<T, RepositoryError>,
) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            warn!(tenant = %tenant_id, table, error = %err, "intake read failed; treating as absent");
            T::default()
        }
    }
}

fn expect_role(tenant: &TenantRecord, expected: TenantRole) -> Result<(), OnboardingError> {
    if tenant.role == expected {
        Ok(())
    } else {
        Err(OnboardingError::FlowMismatch {
            tenant: tenant.tenant_id.clone(),
            expected,
            actual: tenant.role,
        })
    }
}

fn require_elevated(ctx: &RequestContext, operation: &'static str) -> Result<(), OnboardingError> {
    if ctx.is_elevated {
        Ok(())
    } else {
        warn!(actor = %ctx.actor_id, operation, "elevated operation refused");
        Err(OnboardingError::ElevationRequired { operation })
    }
}

fn plan_for(tenant: &TenantRecord, phase: PhaseNumber) -> Result<&'static PhasePlan, OnboardingError> {
    phase_plan(tenant.role, phase).ok_or(OnboardingError::UnknownPhase {
        role: tenant.role,
        phase,
    })
}

/// The target tenant's own program. The caller's program only fills in when
/// the caller acts on its own tenant.
fn program_ref<'a>(ctx: &'a RequestContext, tenant: &'a TenantRecord) -> Option<&'a ProgramRef> {
    tenant.program_ref.as_ref().or_else(|| {
        ctx.program_ref
            .as_ref()
            .filter(|_| ctx.tenant_id == tenant.tenant_id)
    })
}

/// Error raised by the onboarding service.
#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    #[error(transparent)]
    Incomplete(#[from] IncompleteSectionsError),
    #[error("actor {actor} may not act on tenant {tenant}")]
    Forbidden { actor: ActorId, tenant: TenantId },
    #[error("{operation} requires an elevated caller")]
    ElevationRequired { operation: &'static str },
    #[error("tenant {0} not found")]
    TenantNotFound(TenantId),
    #[error("phase {phase} has not been unlocked for tenant {tenant}")]
    PhaseNotFound { tenant: TenantId, phase: PhaseNumber },
    #[error("the {role} flow has no phase {phase}")]
    UnknownPhase { role: TenantRole, phase: PhaseNumber },
    #[error("the {role} flow has no section `{section}`")]
    UnknownSection { role: TenantRole, section: String },
    #[error("phase {phase} is already submitted for tenant {tenant}")]
    AlreadySubmitted { tenant: TenantId, phase: PhaseNumber },
    #[error("phase {phase} is not submitted for tenant {tenant}")]
    PhaseNotSubmitted { tenant: TenantId, phase: PhaseNumber },
    #[error("section `{title}` is locked: {reason}")]
    SectionLocked {
        title: &'static str,
        reason: LockReason,
    },
    #[error("tenant {tenant} follows the {actual} flow, not the {expected} flow")]
    FlowMismatch {
        tenant: TenantId,
        expected: TenantRole,
        actual: TenantRole,
    },
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl OnboardingError {
    fn from_submission(tenant_id: &TenantId, failure: SubmissionError) -> Self {
        match failure {
            SubmissionError::Incomplete(error) => Self::Incomplete(error),
            SubmissionError::PhaseNotFound { phase } => Self::PhaseNotFound {
                tenant: tenant_id.clone(),
                phase,
            },
            SubmissionError::AlreadySubmitted { phase } => Self::AlreadySubmitted {
                tenant: tenant_id.clone(),
                phase,
            },
            SubmissionError::Repository(error) => Self::Repository(error),
        }
    }
}
