use serde::Serialize;
use std::fmt;

use super::domain::{CompletionStatus, PhaseNumber};
use super::phase::PhaseStatusMap;
use super::section::{IntakeSection, SectionMeta, StatusMap};

/// Prerequisites of `section` whose own status is not complete, in graph order.
pub fn unmet_prerequisites<S: IntakeSection>(
    section: S,
    statuses: &StatusMap<S>,
) -> Vec<&'static SectionMeta<S>> {
    section
        .prerequisites()
        .iter()
        .filter(|prerequisite| !statuses.get(**prerequisite).is_complete())
        .map(|prerequisite| prerequisite.meta())
        .collect()
}

/// Whether a section is frozen by its phase or waiting on prerequisites.
pub fn is_locked<S: IntakeSection>(
    section: S,
    statuses: &StatusMap<S>,
    phases: &PhaseStatusMap,
) -> bool {
    let frozen = phases.is_submitted(section.meta().min_phase);
    frozen || !unmet_prerequisites(section, statuses).is_empty()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionRef {
    pub id: String,
    pub title: &'static str,
}

impl SectionRef {
    fn from_meta<S: IntakeSection>(meta: &SectionMeta<S>) -> Self {
        Self {
            id: meta.id.key().0,
            title: meta.title,
        }
    }
}

/// Everything a caller needs to render one section's availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionAccess {
    pub id: String,
    pub title: &'static str,
    pub group: &'static str,
    pub min_phase: PhaseNumber,
    pub status: CompletionStatus,
    pub locked: bool,
    /// Locked because the section's phase has been submitted.
    pub frozen: bool,
    /// The section's phase has been unlocked at least once.
    pub available: bool,
    pub unmet_prerequisites: Vec<SectionRef>,
}

pub fn section_access<S: IntakeSection>(
    section: S,
    statuses: &StatusMap<S>,
    phases: &PhaseStatusMap,
) -> SectionAccess {
    let meta = section.meta();
    let frozen = phases.is_submitted(meta.min_phase);
    let unmet: Vec<SectionRef> = unmet_prerequisites(section, statuses)
        .into_iter()
        .map(SectionRef::from_meta)
        .collect();

    SectionAccess {
        id: section.key().0,
        title: meta.title,
        group: meta.group,
        min_phase: meta.min_phase,
        status: statuses.get(section),
        locked: frozen || !unmet.is_empty(),
        frozen,
        available: phases.status(meta.min_phase).is_some(),
        unmet_prerequisites: unmet,
    }
}

pub fn access_overview<S: IntakeSection>(
    statuses: &StatusMap<S>,
    phases: &PhaseStatusMap,
) -> Vec<SectionAccess> {
    S::all()
        .iter()
        .map(|section| section_access(*section, statuses, phases))
        .collect()
}

/// Why a save into a section was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockReason {
    PhaseSubmitted(PhaseNumber),
    PhaseUnavailable(PhaseNumber),
    /// Titles of the incomplete prerequisites.
    Prerequisites(Vec<&'static str>),
}

impl fmt::Display for LockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockReason::PhaseSubmitted(phase) => write!(f, "phase {phase} has been submitted"),
            LockReason::PhaseUnavailable(phase) => write!(f, "phase {phase} has not been unlocked"),
            LockReason::Prerequisites(titles) => {
                write!(f, "complete {} first", titles.join(", "))
            }
        }
    }
}

/// Decide whether `section` may be edited right now.
///
/// A submitted phase freezes its sections for everyone. Elevated callers may
/// edit ahead of prerequisites and before the phase has been unlocked.
pub fn edit_lock<S: IntakeSection>(
    section: S,
    statuses: &StatusMap<S>,
    phases: &PhaseStatusMap,
    elevated: bool,
) -> Option<LockReason> {
    let phase = section.meta().min_phase;
    if phases.is_submitted(phase) {
        return Some(LockReason::PhaseSubmitted(phase));
    }
    if elevated {
        return None;
    }
    if phases.status(phase).is_none() {
        return Some(LockReason::PhaseUnavailable(phase));
    }

    let unmet = unmet_prerequisites(section, statuses);
    if unmet.is_empty() {
        None
    } else {
        Some(LockReason::Prerequisites(
            unmet.into_iter().map(|meta| meta.title).collect(),
        ))
    }
}
