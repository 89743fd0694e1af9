//! REST DTOs with serde derives for HTTP API
//!
//! Field names are camelCase on the wire; enum codes are the stored
//! upper-case codes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;

// ===== Onboarding DTOs =====

/// Readiness of a tenant across the onboarding chain
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingStatusDto {
    pub tenant_id: Uuid,
    pub all_steps_ready: bool,
    pub steps: Vec<StepStatusDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StepStatusDto {
    /// Step key
    #[schema(example = "forklifts")]
    pub key: String,

    /// Display label
    #[schema(example = "Forklifts")]
    pub label: String,

    pub completed: bool,

    /// Every prerequisite is complete
    pub can_create: bool,

    /// Keys of incomplete prerequisites, in chain order
    pub blocked_by: Vec<String>,
}

// ===== Asset DTOs =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationalStatusDto {
    Operational,
    Maintenance,
    OutOfService,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetDto {
    pub id: Uuid,
    pub tenant_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<Uuid>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    pub operational_status: OperationalStatusDto,
    pub current_hours: f64,
    pub updated_at: DateTime<Utc>,
}

/// Sparse asset update
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateAssetRequest {
    #[serde(default)]
    pub operational_status: Option<OperationalStatusDto>,

    /// Usage meter in hours
    #[serde(default)]
    #[schema(example = 1250.5)]
    pub current_hours: Option<f64>,
}

// ===== Schedule DTOs =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FrequencyTypeDto {
    Days,
    Hours,
    Calendar,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDto {
    pub id: Uuid,
    pub tenant_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<Uuid>,
    pub task_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub frequency_type: FrequencyTypeDto,
    pub frequency_value: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_due_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_due_hours: Option<f64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduleRequest {
    /// Required for HOURS schedules
    #[serde(default)]
    pub asset_id: Option<Uuid>,

    #[schema(example = "Oil change")]
    pub task_name: String,

    #[serde(default)]
    pub description: Option<String>,

    pub frequency_type: FrequencyTypeDto,

    #[schema(example = 30, minimum = 1)]
    pub frequency_value: u32,
}

/// Sparse schedule update; `isActive: false` deactivates
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateScheduleRequest {
    #[serde(default)]
    pub task_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub frequency_value: Option<u32>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

// ===== Inspection DTOs =====

/// Checklist answers captured on a device
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncInspectionRequest {
    pub asset_id: Uuid,
    pub template_id: Uuid,

    /// Raw answers keyed by question id
    #[schema(value_type = Object)]
    pub answers: BTreeMap<Uuid, serde_json::Value>,

    /// Explicit critical flag raised by the inspector
    #[serde(default)]
    pub critical_flag: Option<bool>,

    /// Capture time on the device; defaults to the sync time
    #[serde(default)]
    pub captured_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub gps_latitude: Option<f64>,
    #[serde(default)]
    pub gps_longitude: Option<f64>,

    /// Idempotency key; a repeated key returns the first receipt
    #[serde(default)]
    pub client_report_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncInspectionResponse {
    pub report_id: Uuid,
    pub synced_at: DateTime<Utc>,
}

// ===== Ticket DTOs =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatusDto {
    Open,
    InProgress,
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketPriorityDto {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketDto {
    pub id: Uuid,
    pub asset_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Uuid>,
    pub description: String,
    pub priority: TicketPriorityDto,
    pub status: TicketStatusDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    pub asset_id: Uuid,

    #[schema(example = "Hydraulic leak under the mast")]
    pub description: String,

    #[serde(default = "default_priority")]
    pub priority: TicketPriorityDto,
}

fn default_priority() -> TicketPriorityDto {
    TicketPriorityDto::Medium
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartTicketRequest {
    /// Optional technician taking the ticket
    #[serde(default)]
    pub assignee: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignTicketRequest {
    pub assignee: Uuid,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolveTicketRequest {
    #[schema(example = "Replaced the hydraulic hose")]
    pub resolution_notes: String,
}
