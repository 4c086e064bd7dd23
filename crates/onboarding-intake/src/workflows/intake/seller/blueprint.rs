use super::super::domain::{PhaseNumber, SectionKey, TenantRole};
use super::super::section::{IntakeSection, SectionMeta};

const SELLER_ONBOARDING: &str = "Seller Onboarding";

/// Seller intake sections, keyed by short code (`S-1` … `S-6`, `S-R`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SellerSection {
    OrganizationProfile,
    CareLocations,
    Clinicians,
    ServiceOfferings,
    EscalationContacts,
    ParticipationTerms,
    Review,
}

impl SellerSection {
    pub const fn code(self) -> &'static str {
        match self {
            Self::OrganizationProfile => "S-1",
            Self::CareLocations => "S-2",
            Self::Clinicians => "S-3",
            Self::ServiceOfferings => "S-4",
            Self::EscalationContacts => "S-5",
            Self::ParticipationTerms => "S-6",
            Self::Review => "S-R",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

const ALL_SECTIONS: [SellerSection; 7] = [
    SellerSection::OrganizationProfile,
    SellerSection::CareLocations,
    SellerSection::Clinicians,
    SellerSection::ServiceOfferings,
    SellerSection::EscalationContacts,
    SellerSection::ParticipationTerms,
    SellerSection::Review,
];

static SECTIONS: [SectionMeta<SellerSection>; 7] = [
    SectionMeta {
        id: SellerSection::OrganizationProfile,
        title: "Organization Profile",
        group: SELLER_ONBOARDING,
        min_phase: PhaseNumber::FIRST,
        required_fields: &[
            "organization_name",
            "tax_id",
            "contact_name",
            "contact_email",
            "contact_phone",
        ],
    },
    SectionMeta {
        id: SellerSection::CareLocations,
        title: "Care Locations",
        group: SELLER_ONBOARDING,
        min_phase: PhaseNumber::FIRST,
        required_fields: &["name", "address_line1", "city", "state", "postal_code"],
    },
    SectionMeta {
        id: SellerSection::Clinicians,
        title: "Clinicians",
        group: SELLER_ONBOARDING,
        min_phase: PhaseNumber::FIRST,
        required_fields: &[
            "first_name",
            "last_name",
            "npi",
            "license_state",
            "license_number",
        ],
    },
    SectionMeta {
        id: SellerSection::ServiceOfferings,
        title: "Service Offerings",
        group: SELLER_ONBOARDING,
        min_phase: PhaseNumber::FIRST,
        required_fields: &["selected"],
    },
    SectionMeta {
        id: SellerSection::EscalationContacts,
        title: "Escalation Contacts",
        group: SELLER_ONBOARDING,
        min_phase: PhaseNumber::FIRST,
        required_fields: &[
            "primary_name",
            "primary_phone",
            "primary_email",
            "backup_name",
            "backup_phone",
        ],
    },
    SectionMeta {
        id: SellerSection::ParticipationTerms,
        title: "Participation Terms",
        group: SELLER_ONBOARDING,
        min_phase: PhaseNumber::FIRST,
        required_fields: &["terms_accepted"],
    },
    SectionMeta {
        id: SellerSection::Review,
        title: "Review & Submit",
        group: SELLER_ONBOARDING,
        min_phase: PhaseNumber::FIRST,
        required_fields: &[],
    },
];

const SUBMISSION_GATE: [SellerSection; 6] = [
    SellerSection::OrganizationProfile,
    SellerSection::CareLocations,
    SellerSection::Clinicians,
    SellerSection::ServiceOfferings,
    SellerSection::EscalationContacts,
    SellerSection::ParticipationTerms,
];

impl IntakeSection for SellerSection {
    const ROLE: TenantRole = TenantRole::Seller;

    fn all() -> &'static [Self] {
        &ALL_SECTIONS
    }

    fn meta(self) -> &'static SectionMeta<Self> {
        &SECTIONS[self.index()]
    }

    fn prerequisites(self) -> &'static [Self] {
        match self {
            Self::OrganizationProfile => &[],
            Self::CareLocations
            | Self::ServiceOfferings
            | Self::EscalationContacts
            | Self::ParticipationTerms => &[Self::OrganizationProfile],
            Self::Clinicians => &[Self::CareLocations],
            Self::Review => &SUBMISSION_GATE,
        }
    }

    fn required_for_phase(phase: PhaseNumber) -> &'static [Self] {
        match phase {
            PhaseNumber::FIRST => &SUBMISSION_GATE,
            _ => &[],
        }
    }

    fn key(self) -> SectionKey {
        SectionKey(self.code().to_string())
    }

    fn parse_key(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_uppercase();
        ALL_SECTIONS
            .iter()
            .copied()
            .find(|section| section.code() == normalized)
    }
}
