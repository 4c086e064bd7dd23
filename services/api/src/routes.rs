use crate::infra::{parse_role, AppState, IntakeService};
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use onboarding_intake::workflows::intake::{
    intake_router, BuyerSection, HeaderContextResolver, IntakeSection, PhaseNumber,
    SellerSection, TenantRole,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

/// One row of a flow's static section table.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct BlueprintEntry {
    pub(crate) key: String,
    pub(crate) title: &'static str,
    pub(crate) group: &'static str,
    pub(crate) min_phase: PhaseNumber,
    pub(crate) prerequisites: Vec<String>,
    pub(crate) required_fields: &'static [&'static str],
}

pub(crate) fn blueprint_for<S: IntakeSection>() -> Vec<BlueprintEntry> {
    S::all()
        .iter()
        .map(|section| {
            let meta = section.meta();
            BlueprintEntry {
                key: section.key().0,
                title: meta.title,
                group: meta.group,
                min_phase: meta.min_phase,
                prerequisites: section
                    .prerequisites()
                    .iter()
                    .map(|prerequisite| prerequisite.key().0)
                    .collect(),
                required_fields: meta.required_fields,
            }
        })
        .collect()
}

pub(crate) fn blueprint(role: TenantRole) -> Vec<BlueprintEntry> {
    match role {
        TenantRole::Buyer => blueprint_for::<BuyerSection>(),
        TenantRole::Seller => blueprint_for::<SellerSection>(),
    }
}

pub(crate) fn with_intake_routes(service: Arc<IntakeService>) -> axum::Router {
    intake_router(service, Arc::new(HeaderContextResolver))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/intake/blueprints/:role",
            axum::routing::get(blueprint_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn blueprint_endpoint(Path(role): Path<String>) -> Response {
    match parse_role(&role) {
        Ok(role) => {
            let payload = json!({ "role": role, "sections": blueprint(role) });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(message) => (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response(),
    }
}
