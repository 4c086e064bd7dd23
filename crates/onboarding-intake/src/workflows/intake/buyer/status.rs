use super::super::completion;
use super::super::domain::{CompletionStatus, PhaseNumber};
use super::super::phase::PhaseStatusMap;
use super::super::section::{IntakeSection, StatusMap};
use super::blueprint::BuyerSection;
use super::records::BuyerIntakeRecords;

/// Status reported for the radiology section no matter what data exists.
///
/// The section is hidden from users but still sits on the escalation
/// section's prerequisite chain; this keeps it from blocking that chain.
pub const RADIOLOGY_COMPATIBILITY_OVERRIDE: CompletionStatus = CompletionStatus::Complete;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OneToOne {
    Program,
    LabNetwork,
    Escalation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Catalog {
    Services,
    SubServices,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Collection {
    Locations,
    Providers,
}

/// How a buyer section's status is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuyerRule {
    ContactBlock(OneToOne),
    DefaultServicesConfirmed,
    Selection(Catalog),
    PerRow(Collection),
    Override(CompletionStatus),
    SubmissionDerived(PhaseNumber),
}

fn dispatch(section: BuyerSection) -> BuyerRule {
    match section {
        BuyerSection::ProgramProfile => BuyerRule::ContactBlock(OneToOne::Program),
        BuyerSection::Locations => BuyerRule::PerRow(Collection::Locations),
        BuyerSection::DefaultServices => BuyerRule::DefaultServicesConfirmed,
        BuyerSection::ServiceCatalog => BuyerRule::Selection(Catalog::Services),
        BuyerSection::SubServices => BuyerRule::Selection(Catalog::SubServices),
        BuyerSection::Providers => BuyerRule::PerRow(Collection::Providers),
        BuyerSection::LabNetwork => BuyerRule::ContactBlock(OneToOne::LabNetwork),
        BuyerSection::RadiologyNetwork => BuyerRule::Override(RADIOLOGY_COMPATIBILITY_OVERRIDE),
        BuyerSection::Escalation => BuyerRule::ContactBlock(OneToOne::Escalation),
        BuyerSection::PhaseOneReview => BuyerRule::SubmissionDerived(PhaseNumber::FIRST),
        BuyerSection::LocationCapacity => BuyerRule::PerRow(Collection::Locations),
        BuyerSection::PhaseTwoReview => BuyerRule::SubmissionDerived(PhaseNumber::SECOND),
    }
}

/// Derive every buyer section's status from already-fetched records.
///
/// This is the only implementation of the buyer rules; the repository-backed
/// service path and any caller holding records in memory both land here.
pub fn evaluate_buyer(
    records: &BuyerIntakeRecords,
    phases: &PhaseStatusMap,
) -> StatusMap<BuyerSection> {
    BuyerSection::all()
        .iter()
        .map(|section| (*section, evaluate_section(*section, records, phases)))
        .collect()
}

fn evaluate_section(
    section: BuyerSection,
    records: &BuyerIntakeRecords,
    phases: &PhaseStatusMap,
) -> CompletionStatus {
    let fields = section.meta().required_fields;

    match dispatch(section) {
        BuyerRule::ContactBlock(OneToOne::Program) => {
            completion::contact_block(records.program.as_ref(), fields)
        }
        BuyerRule::ContactBlock(OneToOne::LabNetwork) => {
            completion::contact_block(records.lab_network.as_ref(), fields)
        }
        BuyerRule::ContactBlock(OneToOne::Escalation) => {
            completion::contact_block(records.escalation.as_ref(), fields)
        }
        BuyerRule::DefaultServicesConfirmed => completion::confirmation(
            records
                .program
                .as_ref()
                .map(|program| program.default_services_confirmed)
                .unwrap_or(false),
        ),
        BuyerRule::Selection(Catalog::Services) => completion::selection(&records.services),
        BuyerRule::Selection(Catalog::SubServices) => completion::selection(&records.sub_services),
        BuyerRule::PerRow(Collection::Locations) => {
            completion::per_row(&records.locations, fields)
        }
        BuyerRule::PerRow(Collection::Providers) => {
            completion::per_row(&records.providers, fields)
        }
        BuyerRule::Override(status) => status,
        BuyerRule::SubmissionDerived(phase) => {
            if phases.is_submitted(phase) {
                CompletionStatus::Complete
            } else {
                CompletionStatus::NotStarted
            }
        }
    }
}
