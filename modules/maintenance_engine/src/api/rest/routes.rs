//! Route registration

use super::{dto::*, error::Problem, handlers};
use crate::domain::Service;
use axum::{
    extract::Path,
    http::{HeaderMap, StatusCode},
    routing::{get, patch, post},
    Extension, Json, Router,
};
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

/// Schema document for the REST DTOs
#[derive(OpenApi)]
#[openapi(
    info(title = "Maintenance Engine API"),
    components(schemas(
        OnboardingStatusDto,
        StepStatusDto,
        AssetDto,
        UpdateAssetRequest,
        OperationalStatusDto,
        ScheduleDto,
        CreateScheduleRequest,
        UpdateScheduleRequest,
        FrequencyTypeDto,
        SyncInspectionRequest,
        SyncInspectionResponse,
        TicketDto,
        CreateTicketRequest,
        StartTicketRequest,
        AssignTicketRequest,
        ResolveTicketRequest,
        TicketStatusDto,
        TicketPriorityDto,
    ))
)]
pub struct ApiDoc;

/// Register all REST routes on `router`
pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    router
        .route("/openapi.json", get(openapi_handler))
        // Onboarding endpoints
        .route("/tenants/{tenant_id}/onboarding", get(onboarding_status_handler))
        .route(
            "/tenants/{tenant_id}/onboarding/gates/{step}",
            get(check_gate_handler),
        )
        // Preventive schedule endpoints
        .route("/tenants/{tenant_id}/schedules", post(create_schedule_handler))
        .route(
            "/tenants/{tenant_id}/schedules/{schedule_id}",
            patch(update_schedule_handler),
        )
        // Inspection endpoints
        .route(
            "/tenants/{tenant_id}/inspections/sync",
            post(sync_inspection_handler),
        )
        // Asset endpoints
        .route(
            "/tenants/{tenant_id}/assets/{asset_id}",
            patch(update_asset_handler),
        )
        // Ticket endpoints
        .route("/tenants/{tenant_id}/tickets", post(create_ticket_handler))
        .route(
            "/tenants/{tenant_id}/tickets/{ticket_id}/start",
            post(start_ticket_handler),
        )
        .route(
            "/tenants/{tenant_id}/tickets/{ticket_id}/assign",
            post(assign_ticket_handler),
        )
        .route(
            "/tenants/{tenant_id}/tickets/{ticket_id}/resolve",
            post(resolve_ticket_handler),
        )
        // Add service as extension for handlers
        .layer(Extension(service))
}

async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

// ===== Handler wrappers that extract service from Extension =====

async fn onboarding_status_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<Uuid>,
) -> Result<Json<OnboardingStatusDto>, Problem> {
    handlers::get_onboarding_status(service, path).await
}

async fn check_gate_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<(Uuid, String)>,
) -> Result<StatusCode, Problem> {
    handlers::check_gate(service, path).await
}

async fn create_schedule_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<Uuid>,
    json: Json<CreateScheduleRequest>,
) -> Result<(StatusCode, Json<ScheduleDto>), Problem> {
    handlers::create_schedule(service, path, json).await
}

async fn update_schedule_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<(Uuid, Uuid)>,
    json: Json<UpdateScheduleRequest>,
) -> Result<Json<ScheduleDto>, Problem> {
    handlers::update_schedule(service, path, json).await
}

async fn sync_inspection_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<Uuid>,
    headers: HeaderMap,
    json: Json<SyncInspectionRequest>,
) -> Result<(StatusCode, Json<SyncInspectionResponse>), Problem> {
    handlers::sync_inspection(service, path, headers, json).await
}

async fn update_asset_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<(Uuid, Uuid)>,
    json: Json<UpdateAssetRequest>,
) -> Result<Json<AssetDto>, Problem> {
    handlers::update_asset(service, path, json).await
}

async fn create_ticket_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<Uuid>,
    headers: HeaderMap,
    json: Json<CreateTicketRequest>,
) -> Result<(StatusCode, Json<TicketDto>), Problem> {
    handlers::create_ticket(service, path, headers, json).await
}

async fn start_ticket_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<(Uuid, Uuid)>,
    json: Option<Json<StartTicketRequest>>,
) -> Result<Json<TicketDto>, Problem> {
    handlers::start_ticket(service, path, json).await
}

async fn assign_ticket_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<(Uuid, Uuid)>,
    json: Json<AssignTicketRequest>,
) -> Result<Json<TicketDto>, Problem> {
    handlers::assign_ticket(service, path, json).await
}

async fn resolve_ticket_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<(Uuid, Uuid)>,
    json: Json<ResolveTicketRequest>,
) -> Result<Json<TicketDto>, Problem> {
    handlers::resolve_ticket(service, path, json).await
}
