//! Native client trait for inter-module communication
//!
//! The CRUD modules (locations, contracts, SLAs, checklist templates) call the
//! onboarding gate through this trait before inserting. NO HTTP - direct
//! function calls.

use super::error::MaintenanceError;
use super::model::{
    Asset, AssetPatch, NewSchedule, NewTicket, OnboardingStatus, OnboardingStep,
    PreventiveSchedule, SchedulePatch, SyncInspection, SyncReceipt, Ticket,
};
use async_trait::async_trait;
use uuid::Uuid;

/// Maintenance engine API for inter-module communication
#[async_trait]
pub trait MaintenanceApi: Send + Sync {
    // ===== Onboarding =====

    /// Compute readiness of every onboarding step for a tenant
    async fn onboarding_status(
        &self,
        tenant_id: Uuid,
    ) -> Result<OnboardingStatus, MaintenanceError>;

    /// Fail with `PrerequisiteBlocked` unless every prerequisite of `target` is complete
    async fn ensure_prerequisites(
        &self,
        tenant_id: Uuid,
        target: OnboardingStep,
    ) -> Result<(), MaintenanceError>;

    // ===== Schedules =====

    async fn create_schedule(
        &self,
        tenant_id: Uuid,
        params: NewSchedule,
    ) -> Result<PreventiveSchedule, MaintenanceError>;

    async fn update_schedule(
        &self,
        tenant_id: Uuid,
        schedule_id: Uuid,
        patch: SchedulePatch,
    ) -> Result<PreventiveSchedule, MaintenanceError>;

    // ===== Inspections =====

    async fn process_sync(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        inspection: SyncInspection,
    ) -> Result<SyncReceipt, MaintenanceError>;

    // ===== Assets =====

    async fn update_asset(
        &self,
        tenant_id: Uuid,
        asset_id: Uuid,
        patch: AssetPatch,
    ) -> Result<Asset, MaintenanceError>;

    // ===== Tickets =====

    async fn create_ticket(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        ticket: NewTicket,
    ) -> Result<Ticket, MaintenanceError>;

    async fn start_ticket(
        &self,
        tenant_id: Uuid,
        ticket_id: Uuid,
        assignee: Option<Uuid>,
    ) -> Result<Ticket, MaintenanceError>;

    async fn assign_ticket(
        &self,
        tenant_id: Uuid,
        ticket_id: Uuid,
        assignee: Uuid,
    ) -> Result<Ticket, MaintenanceError>;

    async fn resolve_ticket(
        &self,
        tenant_id: Uuid,
        ticket_id: Uuid,
        resolution_notes: &str,
    ) -> Result<Ticket, MaintenanceError>;
}
