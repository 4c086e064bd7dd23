use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::config::IntakeConfig;
use crate::workflows::intake::buyer::{
    BuyerSectionData, EscalationConfig, LabNetwork, Location, ProgramProfile, Provider,
    ServiceOffering, SubService,
};
use crate::workflows::intake::domain::{
    ActorId, Clock, ProgramRef, RequestContext, TenantId, TenantRole,
};
use crate::workflows::intake::memory::{InMemoryIntakeStore, InMemorySnapshotLog};
use crate::workflows::intake::repository::{
    BuyerRecordStore, RepositoryError, SellerRecordStore, SnapshotRepository, TenantRecord,
};
use crate::workflows::intake::seller::{
    CareLocation, Clinician, EscalationContacts, SellerOrganization, SellerSectionData,
    SellerServiceOffering,
};
use crate::workflows::intake::snapshot::{NewSnapshot, SectionSnapshot};
use crate::workflows::intake::{intake_router, HeaderContextResolver, OnboardingService};

pub(super) type MemoryService = OnboardingService<InMemoryIntakeStore, InMemorySnapshotLog>;

/// Clock that only moves when a test tells it to.
pub(super) struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub(super) fn new() -> Self {
        Self {
            now: Mutex::new(start_of_day()),
        }
    }

    pub(super) fn advance(&self, minutes: i64) {
        let mut now = self.now.lock().expect("clock mutex poisoned");
        *now += Duration::minutes(minutes);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock mutex poisoned")
    }
}

pub(super) fn start_of_day() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 14, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) struct FailingSnapshotLog;

impl SnapshotRepository for FailingSnapshotLog {
    fn append(&self, _snapshot: NewSnapshot) -> Result<SectionSnapshot, RepositoryError> {
        Err(RepositoryError::Unavailable("audit database offline".to_string()))
    }

    fn for_tenant(&self, _tenant_id: &TenantId) -> Result<Vec<SectionSnapshot>, RepositoryError> {
        Err(RepositoryError::Unavailable("audit database offline".to_string()))
    }
}

pub(super) fn buyer_id() -> TenantId {
    TenantId("buyer-prairie".to_string())
}

pub(super) fn seller_id() -> TenantId {
    TenantId("seller-ankeny".to_string())
}

pub(super) fn buyer_ctx() -> RequestContext {
    RequestContext {
        tenant_id: buyer_id(),
        actor_id: ActorId("coordinator@prairie.example".to_string()),
        role: TenantRole::Buyer,
        program_ref: Some(ProgramRef("PRG-0042".to_string())),
        is_elevated: false,
    }
}

pub(super) fn seller_ctx() -> RequestContext {
    RequestContext {
        tenant_id: seller_id(),
        actor_id: ActorId("office@ankeny.example".to_string()),
        role: TenantRole::Seller,
        program_ref: None,
        is_elevated: false,
    }
}

pub(super) fn admin_ctx() -> RequestContext {
    RequestContext {
        tenant_id: TenantId("operations".to_string()),
        actor_id: ActorId("ops@intake.example".to_string()),
        role: TenantRole::Buyer,
        program_ref: None,
        is_elevated: true,
    }
}

pub(super) fn seeded_store() -> Arc<InMemoryIntakeStore> {
    let store = Arc::new(InMemoryIntakeStore::default());
    store
        .register_tenant(TenantRecord::new(buyer_id(), "Prairie Health", TenantRole::Buyer))
        .expect("register buyer");
    store
        .register_tenant(TenantRecord::new(
            seller_id(),
            "Ankeny Family Clinic",
            TenantRole::Seller,
        ))
        .expect("register seller");
    store
}

pub(super) fn build_service() -> (
    MemoryService,
    Arc<InMemoryIntakeStore>,
    Arc<InMemorySnapshotLog>,
    Arc<ManualClock>,
) {
    let store = seeded_store();
    let log = Arc::new(InMemorySnapshotLog::default());
    let clock = Arc::new(ManualClock::new());
    let service = OnboardingService::with_clock(
        store.clone(),
        log.clone(),
        &IntakeConfig::default(),
        clock.clone(),
    );
    (service, store, log, clock)
}

pub(super) fn router_for(service: MemoryService) -> axum::Router {
    intake_router(Arc::new(service), Arc::new(HeaderContextResolver))
}

fn text(value: &str) -> Option<String> {
    Some(value.to_string())
}

pub(super) fn program_profile() -> ProgramProfile {
    ProgramProfile {
        organization_name: text("Prairie Health"),
        program_name: text("Prairie Primary Care Network"),
        primary_contact_name: text("Dana Ruiz"),
        primary_contact_email: text("dana@prairie.example"),
        primary_contact_phone: text("515-555-0142"),
        billing_contact_name: text("Lee Park"),
        billing_contact_email: text("billing@prairie.example"),
        default_services_confirmed: false,
    }
}

pub(super) fn location(name: &str) -> Location {
    Location {
        id: None,
        name: text(name),
        address_line1: text("210 Grand Ave"),
        city: text("Des Moines"),
        state: text("IA"),
        postal_code: text("50309"),
        operating_hours: None,
        daily_capacity: None,
    }
}

pub(super) fn provider(first: &str, npi: Option<&str>) -> Provider {
    Provider {
        id: None,
        first_name: text(first),
        last_name: text("Nguyen"),
        npi: npi.map(str::to_string),
        credential: text("MD"),
        specialty: text("Family Medicine"),
        location_id: None,
    }
}

pub(super) fn service_catalog() -> Vec<ServiceOffering> {
    ["PC", "BH", "LAB", "IMG", "RX"]
        .iter()
        .enumerate()
        .map(|(index, code)| ServiceOffering {
            id: None,
            code: code.to_string(),
            name: format!("Service {code}"),
            selected: index == 0,
        })
        .collect()
}

pub(super) fn sub_services() -> Vec<SubService> {
    vec![SubService {
        id: None,
        service_code: "PC".to_string(),
        code: "PC-WELL".to_string(),
        name: "Wellness visit".to_string(),
        selected: true,
    }]
}

pub(super) fn lab_network() -> LabNetwork {
    LabNetwork {
        lab_name: text("Heartland Labs"),
        account_number: text("HL-99812"),
        contact_name: text("Morgan Fay"),
        contact_email: text("morgan@heartland.example"),
    }
}

pub(super) fn escalation() -> EscalationConfig {
    EscalationConfig {
        escalation_contact_name: text("Dana Ruiz"),
        escalation_phone: text("515-555-0142"),
        escalation_email: text("escalations@prairie.example"),
        after_hours_phone: text("515-555-0199"),
    }
}

/// Fill sections 1–9 in prerequisite order, using `providers` for section 6.
pub(super) fn fill_buyer_phase_one(service: &MemoryService, providers: Vec<Provider>) {
    let ctx = buyer_ctx();
    let tenant = buyer_id();
    let saves = vec![
        BuyerSectionData::ProgramProfile(program_profile()),
        BuyerSectionData::Locations(vec![location("Eastside Clinic")]),
        BuyerSectionData::DefaultServices { confirmed: true },
        BuyerSectionData::ServiceCatalog(service_catalog()),
        BuyerSectionData::SubServices(sub_services()),
        BuyerSectionData::Providers(providers),
        BuyerSectionData::LabNetwork(lab_network()),
        BuyerSectionData::Escalation(escalation()),
    ];
    for data in saves {
        let section = data.section();
        service
            .save_buyer_section(&ctx, &tenant, data)
            .unwrap_or_else(|err| panic!("saving {section:?} failed: {err}"));
    }
}

pub(super) fn complete_buyer_phase_one(service: &MemoryService) {
    fill_buyer_phase_one(
        service,
        vec![
            provider("Avery", Some("1234567893")),
            provider("Blake", Some("1245319599")),
        ],
    );
}

pub(super) fn seller_organization() -> SellerOrganization {
    SellerOrganization {
        organization_name: text("Ankeny Family Clinic"),
        tax_id: text("42-7654321"),
        contact_name: text("Jo Reyes"),
        contact_email: text("jo@ankeny.example"),
        contact_phone: text("515-555-0100"),
        terms_accepted: false,
    }
}

pub(super) fn complete_seller(service: &MemoryService) {
    let ctx = seller_ctx();
    let tenant = seller_id();
    let saves = vec![
        SellerSectionData::OrganizationProfile(seller_organization()),
        SellerSectionData::CareLocations(vec![CareLocation {
            id: None,
            name: text("Ankeny Clinic"),
            address_line1: text("400 Oak Ave"),
            city: text("Ankeny"),
            state: text("IA"),
            postal_code: text("50023"),
        }]),
        SellerSectionData::Clinicians(vec![Clinician {
            id: None,
            first_name: text("Sam"),
            last_name: text("Lee"),
            npi: text("1234567893"),
            license_state: text("IA"),
            license_number: text("MD-4411"),
        }]),
        SellerSectionData::ServiceOfferings(vec![SellerServiceOffering {
            id: None,
            code: "TELE".to_string(),
            name: "Telehealth".to_string(),
            selected: true,
        }]),
        SellerSectionData::EscalationContacts(EscalationContacts {
            primary_name: text("Jo Reyes"),
            primary_phone: text("515-555-0100"),
            primary_email: text("jo@ankeny.example"),
            backup_name: text("Kim Ode"),
            backup_phone: text("515-555-0101"),
        }),
        SellerSectionData::ParticipationTerms { accepted: true },
    ];
    for data in saves {
        let section = data.section();
        service
            .save_seller_section(&ctx, &tenant, data)
            .unwrap_or_else(|err| panic!("saving {section:?} failed: {err}"));
    }
}

pub(super) fn saved_location_ids(store: &InMemoryIntakeStore) -> Vec<String> {
    store
        .locations(&buyer_id())
        .expect("locations")
        .into_iter()
        .filter_map(|location| location.id.map(|id| id.0))
        .collect()
}

pub(super) fn seller_terms_accepted(store: &InMemoryIntakeStore) -> bool {
    store
        .seller_organization(&seller_id())
        .expect("organization")
        .map(|organization| organization.terms_accepted)
        .unwrap_or(false)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
