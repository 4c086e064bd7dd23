use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

use super::buyer::BuyerSectionData;
use super::domain::{ActorId, PhaseNumber, ProgramRef, RequestContext, TenantId, TenantRole};
use super::repository::{IntakeStore, RepositoryError, SnapshotRepository};
use super::seller::SellerSectionData;
use super::service::{OnboardingError, OnboardingService};

/// Resolves the caller's identity for a request. Session handling lives
/// outside this crate; implementations only translate what it left behind.
pub trait ContextResolver: Send + Sync {
    fn resolve(&self, headers: &HeaderMap) -> Result<RequestContext, ContextError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("missing `{0}` header")]
    Missing(&'static str),
    #[error("invalid `{header}` header value `{value}`")]
    Invalid { header: &'static str, value: String },
}

/// Reads the identity headers set by the upstream session gateway.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeaderContextResolver;

impl HeaderContextResolver {
    pub const TENANT: &'static str = "x-tenant-id";
    pub const ACTOR: &'static str = "x-actor-id";
    pub const ROLE: &'static str = "x-tenant-role";
    pub const PROGRAM: &'static str = "x-program-ref";
    pub const ELEVATED: &'static str = "x-actor-elevated";
}

fn header_text(headers: &HeaderMap, name: &'static str) -> Result<Option<String>, ContextError> {
    match headers.get(name) {
        None => Ok(None),
        Some(raw) => raw
            .to_str()
            .map(|value| Some(value.trim().to_string()).filter(|value| !value.is_empty()))
            .map_err(|_| ContextError::Invalid {
                header: name,
                value: String::from_utf8_lossy(raw.as_bytes()).into_owned(),
            }),
    }
}

fn required_header(headers: &HeaderMap, name: &'static str) -> Result<String, ContextError> {
    header_text(headers, name)?.ok_or(ContextError::Missing(name))
}

impl ContextResolver for HeaderContextResolver {
    fn resolve(&self, headers: &HeaderMap) -> Result<RequestContext, ContextError> {
        let tenant_id = required_header(headers, Self::TENANT)?;
        let actor_id = required_header(headers, Self::ACTOR)?;
        let raw_role = required_header(headers, Self::ROLE)?;
        let role = TenantRole::parse(&raw_role).ok_or(ContextError::Invalid {
            header: Self::ROLE,
            value: raw_role,
        })?;

        let is_elevated = match header_text(headers, Self::ELEVATED)? {
            None => false,
            Some(flag) => match flag.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    return Err(ContextError::Invalid {
                        header: Self::ELEVATED,
                        value: flag,
                    })
                }
            },
        };

        Ok(RequestContext {
            tenant_id: TenantId(tenant_id),
            actor_id: ActorId(actor_id),
            role,
            program_ref: header_text(headers, Self::PROGRAM)?.map(ProgramRef),
            is_elevated,
        })
    }
}

pub struct IntakeRouterState<S, L, C> {
    pub service: Arc<OnboardingService<S, L>>,
    pub resolver: Arc<C>,
}

impl<S, L, C> Clone for IntakeRouterState<S, L, C> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            resolver: self.resolver.clone(),
        }
    }
}

/// Router builder exposing the intake endpoints.
pub fn intake_router<S, L, C>(service: Arc<OnboardingService<S, L>>, resolver: Arc<C>) -> Router
where
    S: IntakeStore + 'static,
    L: SnapshotRepository + 'static,
    C: ContextResolver + 'static,
{
    let base = "/api/v1/intake/tenants/:tenant_id";
    Router::new()
        .route(&format!("{base}/overview"), get(overview_handler::<S, L, C>))
        .route(
            &format!("{base}/buyer/sections"),
            put(save_buyer_handler::<S, L, C>),
        )
        .route(
            &format!("{base}/seller/sections"),
            put(save_seller_handler::<S, L, C>),
        )
        .route(&format!("{base}/phases"), get(phases_handler::<S, L, C>))
        .route(
            &format!("{base}/phases/:phase/submit"),
            post(submit_handler::<S, L, C>),
        )
        .route(
            &format!("{base}/phases/:phase/unlock"),
            post(unlock_handler::<S, L, C>),
        )
        .route(
            &format!("{base}/phases/:phase/lock"),
            post(lock_handler::<S, L, C>),
        )
        .route(
            &format!("{base}/snapshots"),
            get(history_handler::<S, L, C>).post(record_snapshot_handler::<S, L, C>),
        )
        .route(
            &format!("{base}/snapshots/rollback"),
            post(rollback_handler::<S, L, C>),
        )
        .with_state(IntakeRouterState { service, resolver })
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryQuery {
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SnapshotBody {
    section: String,
    data: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RollbackBody {
    timestamp: DateTime<Utc>,
}

macro_rules! resolve_or_reject {
    ($state:expr, $headers:expr) => {
        match $state.resolver.resolve(&$headers) {
            Ok(ctx) => ctx,
            Err(err) => return context_rejection(err),
        }
    };
}

pub(crate) async fn overview_handler<S, L, C>(
    State(state): State<IntakeRouterState<S, L, C>>,
    Path(tenant_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    S: IntakeStore + 'static,
    L: SnapshotRepository + 'static,
    C: ContextResolver + 'static,
{
    let ctx = resolve_or_reject!(state, headers);
    match state.service.overview(&ctx, &TenantId(tenant_id)) {
        Ok(overview) => (StatusCode::OK, Json(overview)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn save_buyer_handler<S, L, C>(
    State(state): State<IntakeRouterState<S, L, C>>,
    Path(tenant_id): Path<String>,
    headers: HeaderMap,
    Json(data): Json<BuyerSectionData>,
) -> Response
where
    S: IntakeStore + 'static,
    L: SnapshotRepository + 'static,
    C: ContextResolver + 'static,
{
    let ctx = resolve_or_reject!(state, headers);
    let tenant_id = TenantId(tenant_id);
    match state.service.save_buyer_section(&ctx, &tenant_id, data) {
        Ok(statuses) => {
            let payload = json!({ "tenant_id": tenant_id, "statuses": statuses });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn save_seller_handler<S, L, C>(
    State(state): State<IntakeRouterState<S, L, C>>,
    Path(tenant_id): Path<String>,
    headers: HeaderMap,
    Json(data): Json<SellerSectionData>,
) -> Response
where
    S: IntakeStore + 'static,
    L: SnapshotRepository + 'static,
    C: ContextResolver + 'static,
{
    let ctx = resolve_or_reject!(state, headers);
    let tenant_id = TenantId(tenant_id);
    match state.service.save_seller_section(&ctx, &tenant_id, data) {
        Ok(statuses) => {
            let payload = json!({ "tenant_id": tenant_id, "statuses": statuses });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn phases_handler<S, L, C>(
    State(state): State<IntakeRouterState<S, L, C>>,
    Path(tenant_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    S: IntakeStore + 'static,
    L: SnapshotRepository + 'static,
    C: ContextResolver + 'static,
{
    let ctx = resolve_or_reject!(state, headers);
    match state.service.list_phase_statuses(&ctx, &TenantId(tenant_id)) {
        Ok(phases) => (StatusCode::OK, Json(phases)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn submit_handler<S, L, C>(
    State(state): State<IntakeRouterState<S, L, C>>,
    Path((tenant_id, phase)): Path<(String, u8)>,
    headers: HeaderMap,
) -> Response
where
    S: IntakeStore + 'static,
    L: SnapshotRepository + 'static,
    C: ContextResolver + 'static,
{
    let ctx = resolve_or_reject!(state, headers);
    match state
        .service
        .submit(&ctx, &TenantId(tenant_id), PhaseNumber(phase))
    {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

/// Reopens a submitted phase, or unlocks a phase that has never been submitted.
pub(crate) async fn unlock_handler<S, L, C>(
    State(state): State<IntakeRouterState<S, L, C>>,
    Path((tenant_id, phase)): Path<(String, u8)>,
    headers: HeaderMap,
) -> Response
where
    S: IntakeStore + 'static,
    L: SnapshotRepository + 'static,
    C: ContextResolver + 'static,
{
    let ctx = resolve_or_reject!(state, headers);
    let tenant_id = TenantId(tenant_id);
    let phase = PhaseNumber(phase);
    let outcome = match state
        .service
        .unlock_phase_for_editing(&ctx, &tenant_id, phase)
    {
        Err(OnboardingError::PhaseNotSubmitted { .. }) => {
            state.service.unlock_phase(&ctx, &tenant_id, phase)
        }
        other => other,
    };

    match outcome {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn lock_handler<S, L, C>(
    State(state): State<IntakeRouterState<S, L, C>>,
    Path((tenant_id, phase)): Path<(String, u8)>,
    headers: HeaderMap,
) -> Response
where
    S: IntakeStore + 'static,
    L: SnapshotRepository + 'static,
    C: ContextResolver + 'static,
{
    let ctx = resolve_or_reject!(state, headers);
    match state
        .service
        .lock_phase(&ctx, &TenantId(tenant_id), PhaseNumber(phase))
    {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn history_handler<S, L, C>(
    State(state): State<IntakeRouterState<S, L, C>>,
    Path(tenant_id): Path<String>,
    Query(query): Query<HistoryQuery>,
    headers: HeaderMap,
) -> Response
where
    S: IntakeStore + 'static,
    L: SnapshotRepository + 'static,
    C: ContextResolver + 'static,
{
    let ctx = resolve_or_reject!(state, headers);
    match state
        .service
        .snapshot_history(&ctx, &TenantId(tenant_id), query.limit)
    {
        Ok(history) => (StatusCode::OK, Json(history)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn record_snapshot_handler<S, L, C>(
    State(state): State<IntakeRouterState<S, L, C>>,
    Path(tenant_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<SnapshotBody>,
) -> Response
where
    S: IntakeStore + 'static,
    L: SnapshotRepository + 'static,
    C: ContextResolver + 'static,
{
    let ctx = resolve_or_reject!(state, headers);
    match state
        .service
        .record_snapshot(&ctx, &TenantId(tenant_id), &body.section, body.data)
    {
        Ok(snapshot) => (StatusCode::CREATED, Json(snapshot)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn rollback_handler<S, L, C>(
    State(state): State<IntakeRouterState<S, L, C>>,
    Path(tenant_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<RollbackBody>,
) -> Response
where
    S: IntakeStore + 'static,
    L: SnapshotRepository + 'static,
    C: ContextResolver + 'static,
{
    let ctx = resolve_or_reject!(state, headers);
    match state
        .service
        .rollback_to(&ctx, &TenantId(tenant_id), body.timestamp)
    {
        Ok(restored) => {
            let payload = json!({
                "rolled_back_to": body.timestamp,
                "restored": restored,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

fn context_rejection(err: ContextError) -> Response {
    let payload = json!({ "error": err.to_string() });
    (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
}

/// Map a service error to its HTTP status and JSON body.
pub fn error_response(err: OnboardingError) -> Response {
    let status = match &err {
        OnboardingError::Incomplete(incomplete) => {
            let payload = json!({
                "error": err.to_string(),
                "phase": incomplete.phase,
                "missing_sections": incomplete.missing,
            });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
        OnboardingError::Forbidden { .. } | OnboardingError::ElevationRequired { .. } => {
            StatusCode::FORBIDDEN
        }
        OnboardingError::TenantNotFound(_)
        | OnboardingError::PhaseNotFound { .. }
        | OnboardingError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        OnboardingError::AlreadySubmitted { .. }
        | OnboardingError::PhaseNotSubmitted { .. }
        | OnboardingError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        OnboardingError::SectionLocked { .. } => StatusCode::LOCKED,
        OnboardingError::UnknownPhase { .. }
        | OnboardingError::UnknownSection { .. }
        | OnboardingError::FlowMismatch { .. }
        | OnboardingError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
        OnboardingError::Repository(RepositoryError::Unavailable(_)) => {
            error!(error = %err, "intake repository unavailable");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}
