use super::super::completion;
use super::super::domain::{CompletionStatus, PhaseNumber};
use super::super::phase::PhaseStatusMap;
use super::super::section::{IntakeSection, StatusMap};
use super::blueprint::SellerSection;
use super::records::SellerIntakeRecords;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SellerRule {
    OrganizationContacts,
    LocationRows,
    ClinicianRows,
    OfferingSelection,
    EscalationContacts,
    TermsAccepted,
    /// Complete once every other section is complete and the flow is submitted.
    ReviewAfterSubmission,
}

fn dispatch(section: SellerSection) -> SellerRule {
    match section {
        SellerSection::OrganizationProfile => SellerRule::OrganizationContacts,
        SellerSection::CareLocations => SellerRule::LocationRows,
        SellerSection::Clinicians => SellerRule::ClinicianRows,
        SellerSection::ServiceOfferings => SellerRule::OfferingSelection,
        SellerSection::EscalationContacts => SellerRule::EscalationContacts,
        SellerSection::ParticipationTerms => SellerRule::TermsAccepted,
        SellerSection::Review => SellerRule::ReviewAfterSubmission,
    }
}

/// Derive every seller section's status from already-fetched records.
pub fn evaluate_seller(
    records: &SellerIntakeRecords,
    phases: &PhaseStatusMap,
) -> StatusMap<SellerSection> {
    let mut statuses = StatusMap::default();

    // Review reads the other sections, so it is resolved last.
    for section in SellerSection::all() {
        let status = match dispatch(*section) {
            SellerRule::ReviewAfterSubmission => continue,
            rule => evaluate_data_rule(rule, section.meta().required_fields, records),
        };
        statuses.insert(*section, status);
    }

    let others_complete = SellerSection::all()
        .iter()
        .filter(|section| dispatch(**section) != SellerRule::ReviewAfterSubmission)
        .all(|section| statuses.get(*section).is_complete());
    let review = match (others_complete, phases.is_submitted(PhaseNumber::FIRST)) {
        (true, true) => CompletionStatus::Complete,
        (true, false) => CompletionStatus::InProgress,
        (false, _) => CompletionStatus::NotStarted,
    };
    statuses.insert(SellerSection::Review, review);

    statuses
}

fn evaluate_data_rule(
    rule: SellerRule,
    fields: &[&str],
    records: &SellerIntakeRecords,
) -> CompletionStatus {
    match rule {
        SellerRule::OrganizationContacts => {
            completion::contact_block(records.organization.as_ref(), fields)
        }
        SellerRule::LocationRows => completion::per_row(&records.locations, fields),
        SellerRule::ClinicianRows => completion::per_row(&records.clinicians, fields),
        SellerRule::OfferingSelection => completion::selection(&records.offerings),
        SellerRule::EscalationContacts => {
            completion::contact_block(records.escalation.as_ref(), fields)
        }
        SellerRule::TermsAccepted => completion::confirmation(
            records
                .organization
                .as_ref()
                .map(|organization| organization.terms_accepted)
                .unwrap_or(false),
        ),
        SellerRule::ReviewAfterSubmission => CompletionStatus::NotStarted,
    }
}
