use super::common::*;
use std::sync::Arc;
use std::thread;

use serde_json::json;

use crate::config::IntakeConfig;
use crate::workflows::intake::buyer::{BuyerSectionData, LocationCapacity};
use crate::workflows::intake::domain::{
    CompletionStatus, PhaseNumber, PhaseStatus, ProgramRef, RecordId, RequestContext, TenantId,
    TenantRole,
};
use crate::workflows::intake::gating::LockReason;
use crate::workflows::intake::repository::{
    BuyerRecordStore, SellerRecordStore, SnapshotRepository, TenantDirectory,
};
use crate::workflows::intake::InMemorySnapshotLog;
use crate::workflows::intake::seller::SellerSectionData;
use crate::workflows::intake::{
    BuyerSection, IntakeSection, OnboardingError, OnboardingService, SellerSection,
};

#[test]
fn provider_missing_npi_blocks_phase_one_submission() {
    let (service, _, _, _) = build_service();
    fill_buyer_phase_one(
        &service,
        vec![
            provider("Avery", Some("1234567893")),
            provider("Blake", None),
        ],
    );

    let statuses = service
        .compute_statuses(&buyer_ctx(), &buyer_id())
        .expect("statuses");
    for section in BuyerSection::required_for_phase(PhaseNumber::FIRST) {
        let expected = if *section == BuyerSection::Providers {
            CompletionStatus::InProgress
        } else {
            CompletionStatus::Complete
        };
        assert_eq!(statuses.get(*section), expected, "{section:?}");
    }

    match service.submit(&buyer_ctx(), &buyer_id(), PhaseNumber::FIRST) {
        Err(OnboardingError::Incomplete(error)) => {
            assert_eq!(error.phase, PhaseNumber::FIRST);
            assert_eq!(error.missing, vec!["Providers & Credentials"]);
        }
        other => panic!("expected incomplete sections, got {other:?}"),
    }
}

#[test]
fn submit_stamps_the_clock_and_mirrors_the_legacy_status() {
    let (service, store, _, clock) = build_service();
    complete_buyer_phase_one(&service);
    clock.advance(30);

    let record = service
        .submit(&buyer_ctx(), &buyer_id(), PhaseNumber::FIRST)
        .expect("phase one submits");
    let submitted_at = start_of_day() + chrono::Duration::minutes(30);
    assert_eq!(record.status, PhaseStatus::Submitted);
    assert_eq!(record.submitted_at, Some(submitted_at));

    let tenant = store
        .fetch_tenant(&buyer_id())
        .expect("fetch")
        .expect("tenant present");
    assert_eq!(tenant.intake_status, PhaseStatus::Submitted);
    assert_eq!(tenant.intake_submitted_at, Some(submitted_at));

    let statuses = service
        .compute_statuses(&buyer_ctx(), &buyer_id())
        .expect("statuses");
    assert_eq!(
        statuses.get(BuyerSection::PhaseOneReview),
        CompletionStatus::Complete
    );

    match service.submit(&buyer_ctx(), &buyer_id(), PhaseNumber::FIRST) {
        Err(OnboardingError::AlreadySubmitted { phase, .. }) => {
            assert_eq!(phase, PhaseNumber::FIRST)
        }
        other => panic!("expected already submitted, got {other:?}"),
    }
}

#[test]
fn reopening_a_phase_leaves_data_derived_statuses_alone() {
    let (service, store, _, _) = build_service();
    complete_buyer_phase_one(&service);
    service
        .submit(&buyer_ctx(), &buyer_id(), PhaseNumber::FIRST)
        .expect("submit");
    let before = service
        .compute_statuses(&buyer_ctx(), &buyer_id())
        .expect("statuses");

    let record = service
        .unlock_phase_for_editing(&admin_ctx(), &buyer_id(), PhaseNumber::FIRST)
        .expect("reopen");
    assert_eq!(record.status, PhaseStatus::Draft);
    assert_eq!(record.submitted_at, None);

    let after = service
        .compute_statuses(&buyer_ctx(), &buyer_id())
        .expect("statuses");
    for section in BuyerSection::all() {
        if matches!(
            section,
            BuyerSection::PhaseOneReview | BuyerSection::PhaseTwoReview
        ) {
            continue;
        }
        assert_eq!(before.get(*section), after.get(*section), "{section:?}");
    }

    let tenant = store
        .fetch_tenant(&buyer_id())
        .expect("fetch")
        .expect("tenant present");
    assert_eq!(tenant.intake_status, PhaseStatus::Draft);
    assert_eq!(tenant.intake_submitted_at, None);
}

#[test]
fn reopening_a_draft_phase_is_rejected() {
    let (service, _, _, _) = build_service();
    match service.unlock_phase_for_editing(&admin_ctx(), &buyer_id(), PhaseNumber::FIRST) {
        Err(OnboardingError::PhaseNotSubmitted { phase, .. }) => {
            assert_eq!(phase, PhaseNumber::FIRST)
        }
        other => panic!("expected phase not submitted, got {other:?}"),
    }
}

#[test]
fn concurrent_submits_of_one_phase_succeed_exactly_once() {
    let (service, _, _, _) = build_service();
    complete_buyer_phase_one(&service);
    let service = Arc::new(service);

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let service = service.clone();
            thread::spawn(move || service.submit(&buyer_ctx(), &buyer_id(), PhaseNumber::FIRST))
        })
        .collect();
    let outcomes: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("submit thread"))
        .collect();

    let succeeded = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    assert_eq!(succeeded, 1);
    assert!(outcomes.iter().all(|outcome| matches!(
        outcome,
        Ok(_) | Err(OnboardingError::AlreadySubmitted { .. })
    )));
}

#[test]
fn other_tenants_are_forbidden_before_existence_is_checked() {
    let (service, _, _, _) = build_service();
    match service.compute_statuses(&buyer_ctx(), &TenantId("missing".to_string())) {
        Err(OnboardingError::Forbidden { tenant, .. }) => assert_eq!(tenant.0, "missing"),
        other => panic!("expected forbidden, got {other:?}"),
    }
    assert!(matches!(
        service.overview(&seller_ctx(), &buyer_id()),
        Err(OnboardingError::Forbidden { .. })
    ));
    assert!(matches!(
        service.compute_statuses(&admin_ctx(), &TenantId("missing".to_string())),
        Err(OnboardingError::TenantNotFound(_))
    ));
}

#[test]
fn administrative_operations_require_elevation() {
    let (service, _, _, _) = build_service();
    for outcome in [
        service.unlock_phase(&buyer_ctx(), &buyer_id(), PhaseNumber::SECOND),
        service.lock_phase(&buyer_ctx(), &buyer_id(), PhaseNumber::FIRST),
        service.unlock_phase_for_editing(&buyer_ctx(), &buyer_id(), PhaseNumber::FIRST),
    ] {
        assert!(matches!(
            outcome,
            Err(OnboardingError::ElevationRequired { .. })
        ));
    }
    assert!(matches!(
        service.rollback_to(&buyer_ctx(), &buyer_id(), start_of_day()),
        Err(OnboardingError::ElevationRequired { .. })
    ));
}

#[test]
fn prerequisite_locks_apply_to_tenant_users_only() {
    let (service, _, _, _) = build_service();
    let providers = BuyerSectionData::Providers(vec![provider("Avery", Some("1234567893"))]);

    match service.save_buyer_section(&buyer_ctx(), &buyer_id(), providers.clone()) {
        Err(OnboardingError::SectionLocked { title, reason }) => {
            assert_eq!(title, "Providers & Credentials");
            assert_eq!(reason, LockReason::Prerequisites(vec!["Locations"]));
        }
        other => panic!("expected a prerequisite lock, got {other:?}"),
    }

    let statuses = service
        .save_buyer_section(&admin_ctx(), &buyer_id(), providers)
        .expect("elevated callers skip prerequisites");
    assert_eq!(
        statuses.get(BuyerSection::Providers),
        CompletionStatus::Complete
    );
}

#[test]
fn submitted_phase_freezes_sections_for_everyone() {
    let (service, _, _, _) = build_service();
    complete_buyer_phase_one(&service);
    service
        .submit(&buyer_ctx(), &buyer_id(), PhaseNumber::FIRST)
        .expect("submit");

    for ctx in [buyer_ctx(), admin_ctx()] {
        match service.save_buyer_section(
            &ctx,
            &buyer_id(),
            BuyerSectionData::LabNetwork(lab_network()),
        ) {
            Err(OnboardingError::SectionLocked { reason, .. }) => {
                assert_eq!(reason, LockReason::PhaseSubmitted(PhaseNumber::FIRST))
            }
            other => panic!("expected a frozen section, got {other:?}"),
        }
    }
}

#[test]
fn phase_two_capacity_merges_into_phase_one_locations() {
    let (service, store, _, _) = build_service();
    complete_buyer_phase_one(&service);
    service
        .submit(&buyer_ctx(), &buyer_id(), PhaseNumber::FIRST)
        .expect("submit phase one");

    let capacity = |id: &str| {
        BuyerSectionData::LocationCapacity(vec![LocationCapacity {
            location_id: RecordId(id.to_string()),
            operating_hours: Some("Mon-Fri 8-6".to_string()),
            daily_capacity: Some(45),
        }])
    };
    let location_id = saved_location_ids(&store).remove(0);

    match service.save_buyer_section(&buyer_ctx(), &buyer_id(), capacity(&location_id)) {
        Err(OnboardingError::SectionLocked { reason, .. }) => {
            assert_eq!(reason, LockReason::PhaseUnavailable(PhaseNumber::SECOND))
        }
        other => panic!("phase two should be unavailable, got {other:?}"),
    }

    service
        .unlock_phase(&admin_ctx(), &buyer_id(), PhaseNumber::SECOND)
        .expect("unlock phase two");
    assert!(matches!(
        service.save_buyer_section(&buyer_ctx(), &buyer_id(), capacity("loc-unknown")),
        Err(OnboardingError::InvalidPayload(_))
    ));
    let statuses = service
        .save_buyer_section(&buyer_ctx(), &buyer_id(), capacity(&location_id))
        .expect("capacity saves");
    assert_eq!(
        statuses.get(BuyerSection::LocationCapacity),
        CompletionStatus::Complete
    );
    assert_eq!(
        statuses.get(BuyerSection::Locations),
        CompletionStatus::Complete
    );

    let saved = store.locations(&buyer_id()).expect("locations");
    assert_eq!(saved[0].name.as_deref(), Some("Eastside Clinic"));
    assert_eq!(saved[0].daily_capacity, Some(45));

    let record = service
        .submit(&buyer_ctx(), &buyer_id(), PhaseNumber::SECOND)
        .expect("phase two submits");
    assert_eq!(record.phase, PhaseNumber::SECOND);
    assert!(record.unlocked_at.is_some());
}

#[test]
fn submitting_a_phase_that_was_never_unlocked_is_not_found() {
    let (service, _, _, _) = build_service();
    assert!(matches!(
        service.submit(&buyer_ctx(), &buyer_id(), PhaseNumber::SECOND),
        Err(OnboardingError::PhaseNotFound { .. })
    ));
    assert!(matches!(
        service.submit(&buyer_ctx(), &buyer_id(), PhaseNumber(3)),
        Err(OnboardingError::UnknownPhase { .. })
    ));
    assert!(matches!(
        service.submit(&seller_ctx(), &seller_id(), PhaseNumber::SECOND),
        Err(OnboardingError::UnknownPhase { .. })
    ));
}

#[test]
fn lock_phase_is_idempotent_and_skips_the_gate() {
    let (service, _, _, _) = build_service();
    let first = service
        .lock_phase(&admin_ctx(), &buyer_id(), PhaseNumber::FIRST)
        .expect("lock");
    let second = service
        .lock_phase(&admin_ctx(), &buyer_id(), PhaseNumber::FIRST)
        .expect("lock again");
    assert_eq!(first, second);
    assert!(matches!(
        service.lock_phase(&admin_ctx(), &buyer_id(), PhaseNumber::SECOND),
        Err(OnboardingError::PhaseNotFound { .. })
    ));
}

#[test]
fn profile_saves_keep_the_confirmation_flags() {
    let (service, store, _, _) = build_service();
    let ctx = buyer_ctx();
    service
        .save_buyer_section(&ctx, &buyer_id(), BuyerSectionData::ProgramProfile(program_profile()))
        .expect("profile");
    service
        .save_buyer_section(&ctx, &buyer_id(), BuyerSectionData::DefaultServices { confirmed: true })
        .expect("confirm");

    let mut edited = program_profile();
    edited.program_name = Some("Renamed Program".to_string());
    let statuses = service
        .save_buyer_section(&ctx, &buyer_id(), BuyerSectionData::ProgramProfile(edited))
        .expect("profile edit");
    assert_eq!(
        statuses.get(BuyerSection::DefaultServices),
        CompletionStatus::Complete
    );
    assert!(store
        .program(&buyer_id())
        .expect("program")
        .map(|program| program.default_services_confirmed)
        .unwrap_or(false));

    let seller = seller_ctx();
    service
        .save_seller_section(
            &seller,
            &seller_id(),
            SellerSectionData::OrganizationProfile(seller_organization()),
        )
        .expect("organization");
    service
        .save_seller_section(
            &seller,
            &seller_id(),
            SellerSectionData::ParticipationTerms { accepted: true },
        )
        .expect("terms");
    service
        .save_seller_section(
            &seller,
            &seller_id(),
            SellerSectionData::OrganizationProfile(seller_organization()),
        )
        .expect("organization edit");
    assert!(seller_terms_accepted(&store));
}

#[test]
fn saves_against_the_other_flow_are_rejected() {
    let (service, _, _, _) = build_service();
    assert!(matches!(
        service.save_seller_section(
            &admin_ctx(),
            &buyer_id(),
            SellerSectionData::ParticipationTerms { accepted: true },
        ),
        Err(OnboardingError::FlowMismatch { .. })
    ));
}

#[test]
fn empty_seller_reports_not_started_for_collections_and_review() {
    let (service, _, _, _) = build_service();
    let statuses = service
        .compute_seller_statuses(&seller_ctx(), &seller_id())
        .expect("statuses");
    for section in [
        SellerSection::CareLocations,
        SellerSection::Clinicians,
        SellerSection::ServiceOfferings,
        SellerSection::Review,
    ] {
        assert_eq!(statuses.get(section), CompletionStatus::NotStarted, "{section:?}");
    }
}

#[test]
fn seller_flow_submits_and_completes_review() {
    let (service, _, _, _) = build_service();
    complete_seller(&service);

    let statuses = service
        .compute_seller_statuses(&seller_ctx(), &seller_id())
        .expect("statuses");
    assert_eq!(
        statuses.get(SellerSection::Review),
        CompletionStatus::InProgress
    );

    service
        .submit(&seller_ctx(), &seller_id(), PhaseNumber::FIRST)
        .expect("seller submits");
    let statuses = service
        .compute_seller_statuses(&seller_ctx(), &seller_id())
        .expect("statuses");
    assert_eq!(statuses.get(SellerSection::Review), CompletionStatus::Complete);

    let phases = service
        .list_phase_statuses(&seller_ctx(), &seller_id())
        .expect("phases");
    assert_eq!(phases.len(), 1);
    assert_eq!(phases[0].status, PhaseStatus::Submitted);
}

#[test]
fn snapshot_failures_never_undo_a_save() {
    let store = seeded_store();
    let service = OnboardingService::new(
        store.clone(),
        Arc::new(FailingSnapshotLog),
        &IntakeConfig::default(),
    );

    let statuses = service
        .save_buyer_section(
            &buyer_ctx(),
            &buyer_id(),
            BuyerSectionData::ProgramProfile(program_profile()),
        )
        .expect("save succeeds without the audit log");
    assert_eq!(
        statuses.get(BuyerSection::ProgramProfile),
        CompletionStatus::Complete
    );
    assert!(store.program(&buyer_id()).expect("program").is_some());
}

#[test]
fn saves_are_recorded_and_history_is_bounded() {
    let store = seeded_store();
    let log = Arc::new(InMemorySnapshotLog::default());
    let config = IntakeConfig {
        snapshot_history_limit: 3,
        ..IntakeConfig::default()
    };
    let service = OnboardingService::new(store, log, &config);
    complete_buyer_phase_one(&service);

    let history = service
        .snapshot_history(&buyer_ctx(), &buyer_id(), None)
        .expect("history");
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].section.0, BuyerSection::Escalation.key().0);
    assert_eq!(history[0].program_ref.as_ref().map(|r| r.0.as_str()), Some("PRG-0042"));

    let capped = service
        .snapshot_history(&buyer_ctx(), &buyer_id(), Some(500))
        .expect("history");
    assert_eq!(capped.len(), 3);
}

#[test]
fn record_snapshot_validates_section_keys_per_flow() {
    let (service, _, _, _) = build_service();
    let snapshot = service
        .record_snapshot(&seller_ctx(), &seller_id(), "s-2", json!({ "imported": 4 }))
        .expect("seller key accepted");
    assert_eq!(snapshot.section.0, "S-2");

    assert!(matches!(
        service.record_snapshot(&seller_ctx(), &seller_id(), "6", json!({})),
        Err(OnboardingError::UnknownSection { .. })
    ));
    assert!(matches!(
        service.record_snapshot(&buyer_ctx(), &buyer_id(), "13", json!({})),
        Err(OnboardingError::UnknownSection { .. })
    ));
}

#[test]
fn rollback_appends_restored_payloads() {
    let (service, _, log, clock) = build_service();
    let ctx = buyer_ctx();
    service
        .save_buyer_section(&ctx, &buyer_id(), BuyerSectionData::ProgramProfile(program_profile()))
        .expect("profile");
    let checkpoint = start_of_day() + chrono::Duration::minutes(5);
    clock.advance(10);

    let mut edited = program_profile();
    edited.program_name = Some("Edited".to_string());
    service
        .save_buyer_section(&ctx, &buyer_id(), BuyerSectionData::ProgramProfile(edited))
        .expect("edit");
    clock.advance(10);

    let restored = service
        .rollback_to(&admin_ctx(), &buyer_id(), checkpoint)
        .expect("rollback");
    assert_eq!(restored.len(), 1);
    assert_eq!(restored[0].rolled_back_to, Some(checkpoint));
    assert_eq!(
        restored[0].data["data"]["program_name"],
        json!("Prairie Primary Care Network")
    );
    assert_eq!(restored[0].actor, admin_ctx().actor_id);

    assert_eq!(log.for_tenant(&buyer_id()).expect("rows").len(), 3);
}

#[test]
fn rollback_for_unknown_tenant_is_not_found() {
    let (service, _, _, _) = build_service();
    assert!(matches!(
        service.rollback_to(&admin_ctx(), &TenantId("ghost".to_string()), start_of_day()),
        Err(OnboardingError::TenantNotFound(_))
    ));
}

#[test]
fn legacy_submitted_status_freezes_phase_one_without_a_record() {
    let (service, store, _, _) = build_service();
    let mut tenant = store
        .fetch_tenant(&buyer_id())
        .expect("fetch")
        .expect("tenant present");
    tenant.intake_status = PhaseStatus::Submitted;
    tenant.intake_submitted_at = Some(start_of_day());
    store.update_tenant(tenant).expect("legacy status");

    let phases = service
        .list_phase_statuses(&buyer_ctx(), &buyer_id())
        .expect("phases");
    assert_eq!(phases.len(), 1);
    assert_eq!(phases[0].status, PhaseStatus::Submitted);
    assert_eq!(phases[0].submitted_at, Some(start_of_day()));

    let overview = service.overview(&buyer_ctx(), &buyer_id()).expect("overview");
    for access in &overview.sections {
        assert_eq!(
            access.frozen,
            access.min_phase == PhaseNumber::FIRST,
            "section {}",
            access.id
        );
    }
    assert_eq!(overview.sections.iter().filter(|access| access.frozen).count(), 10);

    match service.save_buyer_section(
        &buyer_ctx(),
        &buyer_id(),
        BuyerSectionData::ProgramProfile(program_profile()),
    ) {
        Err(OnboardingError::SectionLocked { reason, .. }) => {
            assert_eq!(reason, LockReason::PhaseSubmitted(PhaseNumber::FIRST))
        }
        other => panic!("expected a frozen section, got {other:?}"),
    }
    assert!(matches!(
        service.submit(&buyer_ctx(), &buyer_id(), PhaseNumber::FIRST),
        Err(OnboardingError::AlreadySubmitted { .. })
    ));
}

#[test]
fn admin_snapshots_carry_the_target_tenants_program() {
    let (service, store, log, clock) = build_service();
    let mut tenant = store
        .fetch_tenant(&buyer_id())
        .expect("fetch")
        .expect("tenant present");
    tenant.program_ref = Some(ProgramRef("PRG-0042".to_string()));
    store.update_tenant(tenant).expect("program assigned");

    let admin = RequestContext {
        program_ref: Some(ProgramRef("PRG-ADMIN-HOME".to_string())),
        ..admin_ctx()
    };
    service
        .save_buyer_section(&admin, &buyer_id(), BuyerSectionData::ProgramProfile(program_profile()))
        .expect("profile");
    clock.advance(5);
    let restored = service
        .rollback_to(&admin, &buyer_id(), start_of_day())
        .expect("rollback");
    assert_eq!(restored.len(), 1);

    let rows = log.for_tenant(&buyer_id()).expect("rows");
    assert_eq!(rows.len(), 2);
    for row in rows {
        assert_eq!(row.program_ref, Some(ProgramRef("PRG-0042".to_string())));
    }
}

#[test]
fn snapshots_record_sections_as_stored() {
    let (service, store, log, _) = build_service();
    let mut profile = program_profile();
    profile.default_services_confirmed = true;
    service
        .save_buyer_section(&buyer_ctx(), &buyer_id(), BuyerSectionData::ProgramProfile(profile))
        .expect("profile");
    service
        .save_buyer_section(
            &buyer_ctx(),
            &buyer_id(),
            BuyerSectionData::Locations(vec![location("Eastside Clinic")]),
        )
        .expect("locations");
    service
        .save_seller_section(
            &seller_ctx(),
            &seller_id(),
            SellerSectionData::OrganizationProfile(seller_organization()),
        )
        .expect("organization");

    let program = store
        .program(&buyer_id())
        .expect("program")
        .expect("program saved");
    assert!(!program.default_services_confirmed);
    let locations = store.locations(&buyer_id()).expect("locations");
    assert!(locations[0].id.is_some());

    let rows = log.for_tenant(&buyer_id()).expect("rows");
    assert_eq!(
        rows[0].data,
        serde_json::to_value(BuyerSectionData::ProgramProfile(program)).expect("json")
    );
    assert_eq!(
        rows[1].data,
        serde_json::to_value(BuyerSectionData::Locations(locations)).expect("json")
    );

    let organization = store
        .seller_organization(&seller_id())
        .expect("organization")
        .expect("organization saved");
    let seller_rows = log.for_tenant(&seller_id()).expect("rows");
    assert_eq!(
        seller_rows[0].data,
        serde_json::to_value(SellerSectionData::OrganizationProfile(organization)).expect("json")
    );
}

#[test]
fn capacity_snapshot_lists_the_merged_location_rows() {
    let (service, store, log, _) = build_service();
    complete_buyer_phase_one(&service);
    service
        .submit(&buyer_ctx(), &buyer_id(), PhaseNumber::FIRST)
        .expect("submit phase one");
    service
        .unlock_phase(&admin_ctx(), &buyer_id(), PhaseNumber::SECOND)
        .expect("unlock phase two");

    let location_id = RecordId(saved_location_ids(&store).remove(0));
    let update = LocationCapacity {
        location_id,
        operating_hours: Some("Mon-Fri 8-6".to_string()),
        daily_capacity: Some(45),
    };
    service
        .save_buyer_section(
            &buyer_ctx(),
            &buyer_id(),
            BuyerSectionData::LocationCapacity(vec![update.clone()]),
        )
        .expect("capacity");

    let latest = log
        .for_tenant(&buyer_id())
        .expect("rows")
        .pop()
        .expect("capacity snapshot");
    assert_eq!(latest.section, BuyerSection::LocationCapacity.key());
    assert_eq!(
        latest.data,
        serde_json::to_value(BuyerSectionData::LocationCapacity(vec![update])).expect("json")
    );
}

#[test]
fn location_edits_and_capacity_saves_both_land() {
    let (service, store, _, _) = build_service();
    complete_buyer_phase_one(&service);
    service
        .unlock_phase(&admin_ctx(), &buyer_id(), PhaseNumber::SECOND)
        .expect("unlock phase two");
    let service = Arc::new(service);
    let existing = store.locations(&buyer_id()).expect("locations");
    let location_id = existing[0].id.clone().expect("saved id");

    let mut renamed = existing[0].clone();
    renamed.name = Some("Eastside Clinic North".to_string());
    let edits = {
        let service = service.clone();
        thread::spawn(move || {
            for _ in 0..20 {
                service
                    .save_buyer_section(
                        &admin_ctx(),
                        &buyer_id(),
                        BuyerSectionData::Locations(vec![renamed.clone()]),
                    )
                    .expect("location edit");
            }
        })
    };
    let capacity = {
        let service = service.clone();
        thread::spawn(move || {
            for hours in 0..20 {
                service
                    .save_buyer_section(
                        &admin_ctx(),
                        &buyer_id(),
                        BuyerSectionData::LocationCapacity(vec![LocationCapacity {
                            location_id: location_id.clone(),
                            operating_hours: Some(format!("{hours} hours")),
                            daily_capacity: Some(45),
                        }]),
                    )
                    .expect("capacity");
            }
        })
    };
    edits.join().expect("edits finish");
    capacity.join().expect("capacity finishes");

    let saved = store.locations(&buyer_id()).expect("locations");
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].name.as_deref(), Some("Eastside Clinic North"));
    assert_eq!(saved[0].operating_hours.as_deref(), Some("19 hours"));
    assert_eq!(saved[0].daily_capacity, Some(45));
}

#[test]
fn callers_must_use_their_tenants_flow() {
    let (service, _, _, _) = build_service();
    let mismatched = RequestContext {
        role: TenantRole::Seller,
        ..buyer_ctx()
    };
    match service.compute_statuses(&mismatched, &buyer_id()) {
        Err(OnboardingError::FlowMismatch { expected, actual, .. }) => {
            assert_eq!(expected, TenantRole::Seller);
            assert_eq!(actual, TenantRole::Buyer);
        }
        other => panic!("expected a flow mismatch, got {other:?}"),
    }

    let elevated_seller = RequestContext {
        role: TenantRole::Seller,
        ..admin_ctx()
    };
    assert!(service.overview(&elevated_seller, &buyer_id()).is_ok());
}
