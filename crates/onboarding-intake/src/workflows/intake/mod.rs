//! Completion tracking and phase gating for buyer and seller onboarding intake.
//!
//! Section statuses are always derived from the backing records on read. The
//! lock resolver combines them with the static prerequisite graph and phase
//! state; the submission gate re-runs the evaluator before a phase moves to
//! SUBMITTED.

pub mod buyer;
pub(crate) mod completion;
pub mod domain;
pub mod gating;
pub mod memory;
pub mod phase;
pub mod repository;
pub mod router;
pub mod section;
pub mod seller;
pub mod service;
pub mod snapshot;
pub mod submission;

#[cfg(test)]
mod tests;

pub use buyer::{evaluate_buyer, BuyerSection, BuyerSectionData, RADIOLOGY_COMPATIBILITY_OVERRIDE};
pub use domain::{
    ActorId, Clock, CompletionStatus, PhaseNumber, PhaseStatus, ProgramRef, RecordId,
    RequestContext, SectionKey, SystemClock, TenantId, TenantRole,
};
pub use gating::{access_overview, is_locked, section_access, unmet_prerequisites, LockReason, SectionAccess};
pub use memory::{InMemoryIntakeStore, InMemorySnapshotLog};
pub use phase::{PhaseRecord, PhaseStatusMap, PhaseView, TransitionStrategy};
pub use repository::{
    BuyerRecordStore, IntakeStore, PhaseRepository, RepositoryError, SellerRecordStore,
    SnapshotRepository, TenantDirectory, TenantRecord,
};
pub use router::{intake_router, ContextError, ContextResolver, HeaderContextResolver};
pub use section::{IntakeSection, SectionMeta, StatusMap};
pub use seller::{evaluate_seller, SellerSection, SellerSectionData};
pub use service::{IntakeOverview, OnboardingError, OnboardingService};
pub use snapshot::{SectionSnapshot, SnapshotId};
pub use submission::{check_phase_ready, IncompleteSectionsError};
