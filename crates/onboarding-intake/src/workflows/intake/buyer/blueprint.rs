use super::super::domain::{PhaseNumber, SectionKey, TenantRole};
use super::super::section::{IntakeSection, SectionMeta};

const PROGRAM_SETUP: &str = "Program Setup";
const NETWORK_BUILD_OUT: &str = "Network Build-Out";

/// Buyer (affiliate) intake sections, numbered as presented to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BuyerSection {
    ProgramProfile = 1,
    Locations = 2,
    DefaultServices = 3,
    ServiceCatalog = 4,
    SubServices = 5,
    Providers = 6,
    LabNetwork = 7,
    RadiologyNetwork = 8,
    Escalation = 9,
    PhaseOneReview = 10,
    LocationCapacity = 11,
    PhaseTwoReview = 12,
}

impl BuyerSection {
    pub const fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        ALL_SECTIONS.iter().copied().find(|section| section.id() == id)
    }
}

const ALL_SECTIONS: [BuyerSection; 12] = [
    BuyerSection::ProgramProfile,
    BuyerSection::Locations,
    BuyerSection::DefaultServices,
    BuyerSection::ServiceCatalog,
    BuyerSection::SubServices,
    BuyerSection::Providers,
    BuyerSection::LabNetwork,
    BuyerSection::RadiologyNetwork,
    BuyerSection::Escalation,
    BuyerSection::PhaseOneReview,
    BuyerSection::LocationCapacity,
    BuyerSection::PhaseTwoReview,
];

static SECTIONS: [SectionMeta<BuyerSection>; 12] = [
    SectionMeta {
        id: BuyerSection::ProgramProfile,
        title: "Program Profile & Contacts",
        group: PROGRAM_SETUP,
        min_phase: PhaseNumber::FIRST,
        required_fields: &[
            "organization_name",
            "program_name",
            "primary_contact_name",
            "primary_contact_email",
            "primary_contact_phone",
            "billing_contact_name",
            "billing_contact_email",
        ],
    },
    SectionMeta {
        id: BuyerSection::Locations,
        title: "Locations",
        group: PROGRAM_SETUP,
        min_phase: PhaseNumber::FIRST,
        required_fields: &["name", "address_line1", "city", "state", "postal_code"],
    },
    SectionMeta {
        id: BuyerSection::DefaultServices,
        title: "Default Services",
        group: PROGRAM_SETUP,
        min_phase: PhaseNumber::FIRST,
        required_fields: &["default_services_confirmed"],
    },
    SectionMeta {
        id: BuyerSection::ServiceCatalog,
        title: "Service Catalog",
        group: PROGRAM_SETUP,
        min_phase: PhaseNumber::FIRST,
        required_fields: &["selected"],
    },
    SectionMeta {
        id: BuyerSection::SubServices,
        title: "Sub-Services",
        group: PROGRAM_SETUP,
        min_phase: PhaseNumber::FIRST,
        required_fields: &["selected"],
    },
    SectionMeta {
        id: BuyerSection::Providers,
        title: "Providers & Credentials",
        group: PROGRAM_SETUP,
        min_phase: PhaseNumber::FIRST,
        required_fields: &["first_name", "last_name", "npi", "credential"],
    },
    SectionMeta {
        id: BuyerSection::LabNetwork,
        title: "Lab Network",
        group: PROGRAM_SETUP,
        min_phase: PhaseNumber::FIRST,
        required_fields: &["lab_name", "account_number", "contact_name", "contact_email"],
    },
    SectionMeta {
        id: BuyerSection::RadiologyNetwork,
        title: "Radiology Network",
        group: PROGRAM_SETUP,
        min_phase: PhaseNumber::FIRST,
        required_fields: &[],
    },
    SectionMeta {
        id: BuyerSection::Escalation,
        title: "Escalation Configuration",
        group: PROGRAM_SETUP,
        min_phase: PhaseNumber::FIRST,
        required_fields: &[
            "escalation_contact_name",
            "escalation_phone",
            "escalation_email",
            "after_hours_phone",
        ],
    },
    SectionMeta {
        id: BuyerSection::PhaseOneReview,
        title: "Phase 1 Review & Submit",
        group: PROGRAM_SETUP,
        min_phase: PhaseNumber::FIRST,
        required_fields: &[],
    },
    SectionMeta {
        id: BuyerSection::LocationCapacity,
        title: "Location Hours & Capacity",
        group: NETWORK_BUILD_OUT,
        min_phase: PhaseNumber::SECOND,
        required_fields: &["operating_hours", "daily_capacity"],
    },
    SectionMeta {
        id: BuyerSection::PhaseTwoReview,
        title: "Phase 2 Review & Submit",
        group: NETWORK_BUILD_OUT,
        min_phase: PhaseNumber::SECOND,
        required_fields: &[],
    },
];

/// Radiology (8) is deliberately absent: it always reports complete and must
/// never hold up a submission.
const PHASE_ONE_GATE: [BuyerSection; 8] = [
    BuyerSection::ProgramProfile,
    BuyerSection::Locations,
    BuyerSection::DefaultServices,
    BuyerSection::ServiceCatalog,
    BuyerSection::SubServices,
    BuyerSection::Providers,
    BuyerSection::LabNetwork,
    BuyerSection::Escalation,
];

const PHASE_TWO_GATE: [BuyerSection; 1] = [BuyerSection::LocationCapacity];

impl IntakeSection for BuyerSection {
    const ROLE: TenantRole = TenantRole::Buyer;

    fn all() -> &'static [Self] {
        &ALL_SECTIONS
    }

    fn meta(self) -> &'static SectionMeta<Self> {
        &SECTIONS[usize::from(self.id()) - 1]
    }

    fn prerequisites(self) -> &'static [Self] {
        use BuyerSection::*;

        match self {
            Locations | DefaultServices | LabNetwork => &[ProgramProfile],
            ServiceCatalog => &[DefaultServices],
            SubServices => &[ServiceCatalog],
            Providers => &[Locations],
            Escalation => &[LabNetwork, RadiologyNetwork],
            PhaseOneReview => &[
                ProgramProfile,
                Locations,
                DefaultServices,
                ServiceCatalog,
                SubServices,
                Providers,
                LabNetwork,
                Escalation,
            ],
            LocationCapacity => &[PhaseOneReview],
            PhaseTwoReview => &[LocationCapacity],
            ProgramProfile | RadiologyNetwork => &[],
        }
    }

    fn required_for_phase(phase: PhaseNumber) -> &'static [Self] {
        match phase {
            PhaseNumber::FIRST => &PHASE_ONE_GATE,
            PhaseNumber::SECOND => &PHASE_TWO_GATE,
            _ => &[],
        }
    }

    fn key(self) -> SectionKey {
        SectionKey(self.id().to_string())
    }

    fn parse_key(raw: &str) -> Option<Self> {
        raw.trim().parse::<u8>().ok().and_then(Self::from_id)
    }
}
