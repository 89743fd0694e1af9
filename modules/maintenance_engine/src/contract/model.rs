//! Contract models for the maintenance engine
//!
//! These models are transport-agnostic and used for inter-module communication.
//! NO serde derives - these are pure domain models. Stored codes are mapped in
//! `infra::storage::mapper`, wire shapes in `api::rest::dto`.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

// ===== Onboarding =====

/// Readiness step in the onboarding chain, declared in chain order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OnboardingStep {
    Tenant,
    Users,
    Locations,
    Forklifts,
    ServiceContracts,
    Slas,
    Checklists,
    PreventiveSchedules,
}

impl OnboardingStep {
    /// Every step, in chain order
    pub const ALL: [OnboardingStep; 8] = [
        OnboardingStep::Tenant,
        OnboardingStep::Users,
        OnboardingStep::Locations,
        OnboardingStep::Forklifts,
        OnboardingStep::ServiceContracts,
        OnboardingStep::Slas,
        OnboardingStep::Checklists,
        OnboardingStep::PreventiveSchedules,
    ];

    /// Stable key exposed to callers
    pub fn key(self) -> &'static str {
        match self {
            Self::Tenant => "tenant",
            Self::Users => "users",
            Self::Locations => "locations",
            Self::Forklifts => "forklifts",
            Self::ServiceContracts => "service_contracts",
            Self::Slas => "slas",
            Self::Checklists => "checklists",
            Self::PreventiveSchedules => "preventive_schedules",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|step| step.key() == key)
    }

    /// Prerequisites of a step: every step before it in the chain
    pub fn prerequisites(self) -> &'static [OnboardingStep] {
        static CHAIN: [OnboardingStep; 8] = OnboardingStep::ALL;
        let position = CHAIN.iter().position(|step| *step == self).unwrap_or(0);
        &CHAIN[..position]
    }
}

impl fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Fresh per-tenant aggregates the readiness resolver evaluates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnboardingCounts {
    pub tenant_exists: bool,
    /// Active users per stored role label
    pub active_users_by_role: BTreeMap<String, u64>,
    pub locations: u64,
    pub forklifts: u64,
    pub service_contracts: u64,
    pub slas: u64,
    pub checklist_templates: u64,
    pub checklist_questions: u64,
    pub active_schedules: u64,
}

/// Derived status of one readiness step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepStatus {
    pub step: OnboardingStep,
    pub label: String,
    pub completed: bool,
    pub can_create: bool,
    /// Prerequisites not yet completed, in chain order
    pub blocked_by: Vec<OnboardingStep>,
}

/// Readiness of a tenant across the whole chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingStatus {
    pub tenant_id: Uuid,
    pub all_steps_ready: bool,
    pub steps: Vec<StepStatus>,
}

impl OnboardingStatus {
    pub fn step(&self, step: OnboardingStep) -> Option<&StepStatus> {
        self.steps.iter().find(|s| s.step == step)
    }
}

// ===== Assets =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationalStatus {
    Operational,
    Maintenance,
    OutOfService,
}

/// Forklift registered by a tenant
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub location_id: Option<Uuid>,
    pub name: String,
    pub serial_number: Option<String>,
    pub operational_status: OperationalStatus,
    /// Usage meter in hours
    pub current_hours: f64,
    pub updated_at: DateTime<Utc>,
}

/// Sparse asset update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetPatch {
    pub operational_status: Option<OperationalStatus>,
    pub current_hours: Option<f64>,
}

impl AssetPatch {
    pub fn is_empty(&self) -> bool {
        self.operational_status.is_none() && self.current_hours.is_none()
    }
}

// ===== Preventive schedules =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyType {
    Days,
    Hours,
    Calendar,
}

impl FrequencyType {
    /// Whether the due marker is a timestamp rather than a meter reading
    pub fn is_time_based(self) -> bool {
        matches!(self, Self::Days | Self::Calendar)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreventiveSchedule {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub asset_id: Option<Uuid>,
    pub task_name: String,
    pub description: Option<String>,
    pub frequency_type: FrequencyType,
    pub frequency_value: u32,
    /// Due timestamp for DAYS/CALENDAR, fallback checkpoint for HOURS
    pub next_due_at: Option<DateTime<Utc>>,
    /// Meter threshold for HOURS
    pub next_due_hours: Option<f64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a preventive schedule
#[derive(Debug, Clone, PartialEq)]
pub struct NewSchedule {
    pub asset_id: Option<Uuid>,
    pub task_name: String,
    pub description: Option<String>,
    pub frequency_type: FrequencyType,
    pub frequency_value: u32,
}

/// Sparse schedule update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulePatch {
    pub task_name: Option<String>,
    pub description: Option<String>,
    pub frequency_value: Option<u32>,
    pub is_active: Option<bool>,
}

impl SchedulePatch {
    pub fn is_empty(&self) -> bool {
        self.task_name.is_none()
            && self.description.is_none()
            && self.frequency_value.is_none()
            && self.is_active.is_none()
    }
}

/// Outcome of one due-scan pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub due: usize,
    pub fired: usize,
    /// Already advanced by a concurrent scan, or not fireable
    pub skipped: usize,
    pub failed: usize,
}

// ===== Inspections =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    CriticalStop,
}

/// Inspection payload captured on a device and synced later
#[derive(Debug, Clone, PartialEq)]
pub struct SyncInspection {
    pub asset_id: Uuid,
    pub template_id: Uuid,
    pub answers: BTreeMap<Uuid, serde_json::Value>,
    pub critical_flag: Option<bool>,
    pub captured_at: DateTime<Utc>,
    pub gps_latitude: Option<f64>,
    pub gps_longitude: Option<f64>,
    /// Caller-supplied key; repeat submissions with the same key are no-ops
    pub client_report_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InspectionReport {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub asset_id: Uuid,
    pub template_id: Uuid,
    pub inspector_id: Uuid,
    pub client_report_id: Option<String>,
    pub captured_at: DateTime<Utc>,
    pub synced_at: DateTime<Utc>,
    pub gps_latitude: Option<f64>,
    pub gps_longitude: Option<f64>,
    pub has_critical_failure: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InspectionAnswer {
    pub report_id: Uuid,
    pub question_id: Uuid,
    pub raw_value: serde_json::Value,
    pub normalized_value: String,
    pub is_failure: bool,
}

/// Acknowledgement returned to the syncing device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReceipt {
    pub report_id: Uuid,
    pub synced_at: DateTime<Utc>,
}

// ===== Tickets =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TicketPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: Uuid,
    pub asset_id: Uuid,
    pub report_id: Option<Uuid>,
    pub schedule_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub assigned_to: Option<Uuid>,
    pub description: String,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    pub resolution_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Input for manual ticket creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    pub asset_id: Uuid,
    pub description: String,
    pub priority: TicketPriority,
}
