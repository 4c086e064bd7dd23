use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use super::domain::{PhaseNumber, PhaseStatus, TenantId};
use super::phase::{PhaseLifecycle, PhasePlan, PhaseRecord};
use super::repository::{PhaseRepository, RepositoryError, TenantDirectory, TenantRecord};
use super::section::{IntakeSection, StatusMap};

/// Submission refused because required sections are not complete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("phase {phase} cannot be submitted; incomplete sections: {}", .missing.join(", "))]
pub struct IncompleteSectionsError {
    pub phase: PhaseNumber,
    /// Section titles in display order.
    pub missing: Vec<&'static str>,
}

/// Verify every section the phase gates on is complete.
pub fn check_phase_ready<S: IntakeSection>(
    phase: PhaseNumber,
    statuses: &StatusMap<S>,
) -> Result<(), IncompleteSectionsError> {
    let missing: Vec<&'static str> = statuses
        .incomplete(S::required_for_phase(phase))
        .map(S::title)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(IncompleteSectionsError { phase, missing })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Incomplete(#[from] IncompleteSectionsError),
    #[error("phase {phase} has not been unlocked")]
    PhaseNotFound { phase: PhaseNumber },
    #[error("phase {phase} is already submitted")]
    AlreadySubmitted { phase: PhaseNumber },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

type PhaseKey = (TenantId, PhaseNumber);

/// Serializes check-then-write for every phase transition of a tenant.
#[derive(Default)]
pub struct SubmissionGate {
    locks: Mutex<HashMap<PhaseKey, Arc<Mutex<()>>>>,
}

impl SubmissionGate {
    /// Run `work` while holding the (tenant, phase) lock.
    pub fn serialize<T>(
        &self,
        tenant_id: &TenantId,
        phase: PhaseNumber,
        work: impl FnOnce() -> T,
    ) -> T {
        let slot = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks
                .entry((tenant_id.clone(), phase))
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        let _held = slot.lock().unwrap_or_else(PoisonError::into_inner);
        work()
    }

    /// Re-evaluate, gate, and transition the phase to SUBMITTED.
    pub fn submit<S, Sec, F>(
        &self,
        lifecycle: &PhaseLifecycle<S>,
        tenant: &TenantRecord,
        plan: &PhasePlan,
        evaluate: F,
    ) -> Result<PhaseRecord, SubmissionError>
    where
        S: PhaseRepository + TenantDirectory,
        Sec: IntakeSection,
        F: FnOnce() -> Result<StatusMap<Sec>, RepositoryError>,
    {
        let transition = || -> Result<PhaseRecord, SubmissionError> {
            let current = lifecycle
                .current(tenant, plan)?
                .ok_or(SubmissionError::PhaseNotFound { phase: plan.phase })?;
            if current.status == PhaseStatus::Submitted {
                return Err(SubmissionError::AlreadySubmitted { phase: plan.phase });
            }

            let statuses = evaluate()?;
            check_phase_ready(plan.phase, &statuses)?;

            Ok(lifecycle.submit(tenant, plan)?)
        };
        self.serialize(&tenant.tenant_id, plan.phase, transition)
    }
}
