//! HTTP request handlers - thin layer that delegates to domain service

use super::{
    dto::*,
    error::{map_domain_error, Problem},
};
use crate::contract::OnboardingStep;
use crate::domain::Service;
use axum::{
    extract::Path,
    http::{HeaderMap, StatusCode},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

/// Header carrying the authenticated caller
pub const USER_ID_HEADER: &str = "x-user-id";

fn require_user_id(headers: &HeaderMap) -> Result<Uuid, Problem> {
    let raw = headers
        .get(USER_ID_HEADER)
        .ok_or_else(|| Problem::bad_request(format!("missing '{}' header", USER_ID_HEADER)))?;
    raw.to_str()
        .ok()
        .and_then(|value| Uuid::parse_str(value.trim()).ok())
        .ok_or_else(|| Problem::bad_request(format!("'{}' must be a UUID", USER_ID_HEADER)))
}

// ===== Onboarding Handlers =====

pub async fn get_onboarding_status(
    service: Arc<Service>,
    Path(tenant_id): Path<Uuid>,
) -> Result<Json<OnboardingStatusDto>, Problem> {
    let status = service
        .compute_status(tenant_id)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(status.into()))
}

/// Gate check used before creating a dependent entity
pub async fn check_gate(
    service: Arc<Service>,
    Path((tenant_id, step)): Path<(Uuid, String)>,
) -> Result<StatusCode, Problem> {
    let target = OnboardingStep::from_key(&step)
        .ok_or_else(|| Problem::bad_request(format!("unknown onboarding step '{}'", step)))?;

    service
        .ensure_prerequisites(tenant_id, target)
        .await
        .map_err(map_domain_error)?;

    Ok(StatusCode::NO_CONTENT)
}

// ===== Schedule Handlers =====

pub async fn create_schedule(
    service: Arc<Service>,
    Path(tenant_id): Path<Uuid>,
    Json(req): Json<CreateScheduleRequest>,
) -> Result<(StatusCode, Json<ScheduleDto>), Problem> {
    let schedule = service
        .create_schedule(tenant_id, req.into())
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(schedule.into())))
}

pub async fn update_schedule(
    service: Arc<Service>,
    Path((tenant_id, schedule_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateScheduleRequest>,
) -> Result<Json<ScheduleDto>, Problem> {
    let schedule = service
        .update_schedule(tenant_id, schedule_id, req.into())
        .await
        .map_err(map_domain_error)?;

    Ok(Json(schedule.into()))
}

// ===== Inspection Handlers =====

pub async fn sync_inspection(
    service: Arc<Service>,
    Path(tenant_id): Path<Uuid>,
    headers: HeaderMap,
    Json(req): Json<SyncInspectionRequest>,
) -> Result<(StatusCode, Json<SyncInspectionResponse>), Problem> {
    let user_id = require_user_id(&headers)?;
    let receipt = service
        .process_sync(tenant_id, user_id, req.into())
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(receipt.into())))
}

// ===== Asset Handlers =====

pub async fn update_asset(
    service: Arc<Service>,
    Path((tenant_id, asset_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateAssetRequest>,
) -> Result<Json<AssetDto>, Problem> {
    let asset = service
        .update_asset(tenant_id, asset_id, req.into())
        .await
        .map_err(map_domain_error)?;

    Ok(Json(asset.into()))
}

// ===== Ticket Handlers =====

pub async fn create_ticket(
    service: Arc<Service>,
    Path(tenant_id): Path<Uuid>,
    headers: HeaderMap,
    Json(req): Json<CreateTicketRequest>,
) -> Result<(StatusCode, Json<TicketDto>), Problem> {
    let user_id = require_user_id(&headers)?;
    let ticket = service
        .create_ticket(tenant_id, user_id, req.into())
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(ticket.into())))
}

pub async fn start_ticket(
    service: Arc<Service>,
    Path((tenant_id, ticket_id)): Path<(Uuid, Uuid)>,
    req: Option<Json<StartTicketRequest>>,
) -> Result<Json<TicketDto>, Problem> {
    let assignee = req.and_then(|Json(body)| body.assignee);
    let ticket = service
        .start_ticket(tenant_id, ticket_id, assignee)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(ticket.into()))
}

pub async fn assign_ticket(
    service: Arc<Service>,
    Path((tenant_id, ticket_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<AssignTicketRequest>,
) -> Result<Json<TicketDto>, Problem> {
    let ticket = service
        .assign_ticket(tenant_id, ticket_id, req.assignee)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(ticket.into()))
}

pub async fn resolve_ticket(
    service: Arc<Service>,
    Path((tenant_id, ticket_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<ResolveTicketRequest>,
) -> Result<Json<TicketDto>, Problem> {
    let ticket = service
        .resolve_ticket(tenant_id, ticket_id, &req.resolution_notes)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(ticket.into()))
}
