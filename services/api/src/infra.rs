use metrics_exporter_prometheus::PrometheusHandle;
use onboarding_intake::config::IntakeConfig;
use onboarding_intake::workflows::intake::{
    InMemoryIntakeStore, InMemorySnapshotLog, OnboardingError, OnboardingService, ProgramRef,
    TenantId, TenantRecord, TenantRole,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

pub(crate) const DEMO_BUYER: &str = "demo-buyer";
pub(crate) const DEMO_SELLER: &str = "demo-seller";
pub(crate) const DEMO_PROGRAM: &str = "PRG-DEMO";

pub(crate) type IntakeService = OnboardingService<InMemoryIntakeStore, InMemorySnapshotLog>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Build the in-memory intake service, registering the demo tenants when asked.
pub(crate) fn build_intake_service(
    config: &IntakeConfig,
) -> Result<(Arc<IntakeService>, Arc<InMemoryIntakeStore>), OnboardingError> {
    let store = Arc::new(InMemoryIntakeStore::default());
    if config.seed_demo_tenants {
        seed_demo_tenants(&store)?;
    }
    let service = OnboardingService::new(
        store.clone(),
        Arc::new(InMemorySnapshotLog::default()),
        config,
    );
    Ok((Arc::new(service), store))
}

pub(crate) fn seed_demo_tenants(store: &InMemoryIntakeStore) -> Result<(), OnboardingError> {
    let mut buyer = TenantRecord::new(
        TenantId(DEMO_BUYER.to_string()),
        "Demo Affiliate Health",
        TenantRole::Buyer,
    );
    buyer.program_ref = Some(ProgramRef(DEMO_PROGRAM.to_string()));
    store.register_tenant(buyer)?;
    store.register_tenant(TenantRecord::new(
        TenantId(DEMO_SELLER.to_string()),
        "Demo Care Partners",
        TenantRole::Seller,
    ))?;

    info!(buyer = DEMO_BUYER, seller = DEMO_SELLER, "demo tenants registered");
    Ok(())
}

pub(crate) fn parse_role(raw: &str) -> Result<TenantRole, String> {
    TenantRole::parse(raw).ok_or_else(|| format!("unknown tenant role '{raw}' (buyer or seller)"))
}
