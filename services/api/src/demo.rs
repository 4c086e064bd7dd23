use crate::infra::{build_intake_service, parse_role, IntakeService, DEMO_BUYER, DEMO_SELLER};
use crate::routes::{blueprint, BlueprintEntry};
use clap::Args;
use onboarding_intake::config::IntakeConfig;
use onboarding_intake::error::AppError;
use onboarding_intake::workflows::intake::buyer::{
    EscalationConfig, LabNetwork, Location, LocationCapacity, ProgramProfile, Provider,
    ServiceOffering, SubService,
};
use onboarding_intake::workflows::intake::seller::{
    CareLocation, Clinician, EscalationContacts, SellerOrganization, SellerServiceOffering,
};
use onboarding_intake::workflows::intake::{
    ActorId, BuyerRecordStore, BuyerSectionData, InMemoryIntakeStore, IntakeSection,
    OnboardingError, PhaseNumber, RequestContext, SellerSectionData, StatusMap, TenantId,
    TenantRole,
};

#[derive(Args, Debug, Default)]
pub(crate) struct SectionsArgs {
    /// Only print one flow (buyer or seller)
    #[arg(long, value_parser = parse_role)]
    pub(crate) role: Option<TenantRole>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Stop after the first buyer phase is submitted.
    #[arg(long)]
    pub(crate) skip_phase_two: bool,
    /// Skip the seller portion of the demo.
    #[arg(long)]
    pub(crate) skip_seller: bool,
}

pub(crate) fn print_sections(args: SectionsArgs) {
    let roles = match args.role {
        Some(role) => vec![role],
        None => vec![TenantRole::Buyer, TenantRole::Seller],
    };

    for role in roles {
        println!("{} intake", role);
        render_blueprint(&blueprint(role));
        println!();
    }
}

fn render_blueprint(entries: &[BlueprintEntry]) {
    let mut group = "";
    for entry in entries {
        if entry.group != group {
            group = entry.group;
            println!("  {group}");
        }
        let prerequisites = if entry.prerequisites.is_empty() {
            "none".to_string()
        } else {
            entry.prerequisites.join(", ")
        };
        println!(
            "    [{:>3}] {:<32} phase {} | requires {}",
            entry.key, entry.title, entry.min_phase, prerequisites
        );
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = IntakeConfig {
        seed_demo_tenants: true,
        ..IntakeConfig::default()
    };
    let (service, store) = build_intake_service(&config)?;

    println!("Onboarding intake demo");
    run_buyer_demo(&service, &store, args.skip_phase_two)?;

    if !args.skip_seller {
        run_seller_demo(&service)?;
    }
    Ok(())
}

fn context(tenant: &str, actor: &str, role: TenantRole, elevated: bool) -> RequestContext {
    RequestContext {
        tenant_id: TenantId(tenant.to_string()),
        actor_id: ActorId(actor.to_string()),
        role,
        program_ref: None,
        is_elevated: elevated,
    }
}

fn render_statuses<S: IntakeSection>(statuses: &StatusMap<S>) {
    for (section, status) in statuses.iter() {
        println!("    {:>3} {:<32} {}", section.key(), section.title(), status.label());
    }
}

fn text(value: &str) -> Option<String> {
    Some(value.to_string())
}

fn run_buyer_demo(
    service: &IntakeService,
    store: &InMemoryIntakeStore,
    skip_phase_two: bool,
) -> Result<(), AppError> {
    let tenant = TenantId(DEMO_BUYER.to_string());
    let buyer = context(DEMO_BUYER, "coordinator@demo.example", TenantRole::Buyer, false);
    let operations = context("operations", "ops@demo.example", TenantRole::Buyer, true);

    println!("\nBuyer flow ({DEMO_BUYER})");
    match service.submit(&buyer, &tenant, PhaseNumber::FIRST) {
        Err(OnboardingError::Incomplete(incomplete)) => {
            println!("- Early submit refused; missing: {}", incomplete.missing.join(", "));
        }
        other => println!("- Unexpected early submit outcome: {other:?}"),
    }

    let saves = vec![
        BuyerSectionData::ProgramProfile(ProgramProfile {
            organization_name: text("Demo Affiliate Health"),
            program_name: text("Demo Care Network"),
            primary_contact_name: text("Taylor Brooks"),
            primary_contact_email: text("taylor@demo.example"),
            primary_contact_phone: text("555-0100"),
            billing_contact_name: text("Jamie Fox"),
            billing_contact_email: text("billing@demo.example"),
            default_services_confirmed: false,
        }),
        BuyerSectionData::Locations(vec![Location {
            id: None,
            name: text("Main Street Clinic"),
            address_line1: text("100 Main St"),
            city: text("Springfield"),
            state: text("IA"),
            postal_code: text("50000"),
            operating_hours: None,
            daily_capacity: None,
        }]),
        BuyerSectionData::DefaultServices { confirmed: true },
        BuyerSectionData::ServiceCatalog(vec![ServiceOffering {
            id: None,
            code: "PC".to_string(),
            name: "Primary care".to_string(),
            selected: true,
        }]),
        BuyerSectionData::SubServices(vec![SubService {
            id: None,
            service_code: "PC".to_string(),
            code: "PC-WELL".to_string(),
            name: "Wellness visit".to_string(),
            selected: true,
        }]),
        BuyerSectionData::Providers(vec![Provider {
            id: None,
            first_name: text("Morgan"),
            last_name: text("Lee"),
            npi: text("1234567893"),
            credential: text("MD"),
            specialty: text("Family Medicine"),
            location_id: None,
        }]),
        BuyerSectionData::LabNetwork(LabNetwork {
            lab_name: text("Demo Reference Lab"),
            account_number: text("DRL-100"),
            contact_name: text("Pat Kim"),
            contact_email: text("pat@lab.example"),
        }),
        BuyerSectionData::Escalation(EscalationConfig {
            escalation_contact_name: text("Taylor Brooks"),
            escalation_phone: text("555-0100"),
            escalation_email: text("escalations@demo.example"),
            after_hours_phone: text("555-0199"),
        }),
    ];
    for data in saves {
        let section = data.section();
        service.save_buyer_section(&buyer, &tenant, data)?;
        println!("- Saved section {} ({})", section.key(), section.title());
    }

    let submitted = service.submit(&buyer, &tenant, PhaseNumber::FIRST)?;
    println!(
        "- Phase 1 {} at {}",
        submitted.status.label(),
        submitted
            .submitted_at
            .map(|at| at.to_rfc3339())
            .unwrap_or_default()
    );

    if !skip_phase_two {
        service.unlock_phase(&operations, &tenant, PhaseNumber::SECOND)?;
        println!("- Operations unlocked phase 2");

        let capacities = store
            .locations(&tenant)
            .map_err(OnboardingError::from)?
            .into_iter()
            .filter_map(|location| location.id)
            .map(|location_id| LocationCapacity {
                location_id,
                operating_hours: text("Mon-Fri 8:00-17:00"),
                daily_capacity: Some(30),
            })
            .collect();
        service.save_buyer_section(&buyer, &tenant, BuyerSectionData::LocationCapacity(capacities))?;
        let submitted = service.submit(&buyer, &tenant, PhaseNumber::SECOND)?;
        println!("- Phase 2 {}", submitted.status.label());
    }

    println!("  Section statuses:");
    render_statuses(&service.compute_statuses(&buyer, &tenant)?);

    let history = service.snapshot_history(&buyer, &tenant, Some(3))?;
    println!("  Latest snapshots:");
    for snapshot in history {
        println!(
            "    #{} section {} by {} (program {})",
            snapshot.id.0,
            snapshot.section,
            snapshot.actor,
            snapshot
                .program_ref
                .map(|reference| reference.0)
                .unwrap_or_else(|| "-".to_string())
        );
    }
    Ok(())
}

fn run_seller_demo(service: &IntakeService) -> Result<(), AppError> {
    let tenant = TenantId(DEMO_SELLER.to_string());
    let seller = context(DEMO_SELLER, "office@partners.example", TenantRole::Seller, false);

    println!("\nSeller flow ({DEMO_SELLER})");
    let saves = vec![
        SellerSectionData::OrganizationProfile(SellerOrganization {
            organization_name: text("Demo Care Partners"),
            tax_id: text("00-0000000"),
            contact_name: text("Riley Chen"),
            contact_email: text("riley@partners.example"),
            contact_phone: text("555-0150"),
            terms_accepted: false,
        }),
        SellerSectionData::CareLocations(vec![CareLocation {
            id: None,
            name: text("Partners West"),
            address_line1: text("200 West Ave"),
            city: text("Springfield"),
            state: text("IA"),
            postal_code: text("50001"),
        }]),
        SellerSectionData::Clinicians(vec![Clinician {
            id: None,
            first_name: text("Avery"),
            last_name: text("Stone"),
            npi: text("1245319599"),
            license_state: text("IA"),
            license_number: text("MD-2020"),
        }]),
        SellerSectionData::ServiceOfferings(vec![SellerServiceOffering {
            id: None,
            code: "TELE".to_string(),
            name: "Telehealth".to_string(),
            selected: true,
        }]),
        SellerSectionData::EscalationContacts(EscalationContacts {
            primary_name: text("Riley Chen"),
            primary_phone: text("555-0150"),
            primary_email: text("riley@partners.example"),
            backup_name: text("Drew Hall"),
            backup_phone: text("555-0151"),
        }),
        SellerSectionData::ParticipationTerms { accepted: true },
    ];
    for data in saves {
        let section = data.section();
        service.save_seller_section(&seller, &tenant, data)?;
        println!("- Saved section {} ({})", section.key(), section.title());
    }

    let submitted = service.submit(&seller, &tenant, PhaseNumber::FIRST)?;
    println!("- Intake {}", submitted.status.label());
    println!("  Section statuses:");
    render_statuses(&service.compute_seller_statuses(&seller, &tenant)?);
    Ok(())
}
