//! Native client implementation - wraps domain service for in-process calls

use crate::contract::{
    Asset, AssetPatch, MaintenanceApi, MaintenanceError, NewSchedule, NewTicket,
    OnboardingStatus, OnboardingStep, PreventiveSchedule, SchedulePatch, SyncInspection,
    SyncReceipt, Ticket,
};
use crate::domain::Service;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Native client that calls the domain service directly
///
/// Used by the CRUD modules to run the onboarding gate before they insert,
/// without an HTTP round-trip.
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl MaintenanceApi for NativeClient {
    async fn onboarding_status(
        &self,
        tenant_id: Uuid,
    ) -> Result<OnboardingStatus, MaintenanceError> {
        self.service.compute_status(tenant_id).await
    }

    async fn ensure_prerequisites(
        &self,
        tenant_id: Uuid,
        target: OnboardingStep,
    ) -> Result<(), MaintenanceError> {
        self.service.ensure_prerequisites(tenant_id, target).await
    }

    async fn create_schedule(
        &self,
        tenant_id: Uuid,
        params: NewSchedule,
    ) -> Result<PreventiveSchedule, MaintenanceError> {
        self.service.create_schedule(tenant_id, params).await
    }

    async fn update_schedule(
        &self,
        tenant_id: Uuid,
        schedule_id: Uuid,
        patch: SchedulePatch,
    ) -> Result<PreventiveSchedule, MaintenanceError> {
        self.service
            .update_schedule(tenant_id, schedule_id, patch)
            .await
    }

    async fn process_sync(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        inspection: SyncInspection,
    ) -> Result<SyncReceipt, MaintenanceError> {
        self.service
            .process_sync(tenant_id, user_id, inspection)
            .await
    }

    async fn update_asset(
        &self,
        tenant_id: Uuid,
        asset_id: Uuid,
        patch: AssetPatch,
    ) -> Result<Asset, MaintenanceError> {
        self.service.update_asset(tenant_id, asset_id, patch).await
    }

    async fn create_ticket(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        ticket: NewTicket,
    ) -> Result<Ticket, MaintenanceError> {
        self.service.create_ticket(tenant_id, user_id, ticket).await
    }

    async fn start_ticket(
        &self,
        tenant_id: Uuid,
        ticket_id: Uuid,
        assignee: Option<Uuid>,
    ) -> Result<Ticket, MaintenanceError> {
        self.service
            .start_ticket(tenant_id, ticket_id, assignee)
            .await
    }

    async fn assign_ticket(
        &self,
        tenant_id: Uuid,
        ticket_id: Uuid,
        assignee: Uuid,
    ) -> Result<Ticket, MaintenanceError> {
        self.service
            .assign_ticket(tenant_id, ticket_id, assignee)
            .await
    }

    async fn resolve_ticket(
        &self,
        tenant_id: Uuid,
        ticket_id: Uuid,
        resolution_notes: &str,
    ) -> Result<Ticket, MaintenanceError> {
        self.service
            .resolve_ticket(tenant_id, ticket_id, resolution_notes)
            .await
    }
}
