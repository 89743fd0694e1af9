//! Repository traits for data access
//!
//! These traits define the interface for data access operations.
//! Implementations are in infra/storage/repositories.rs. Methods that write
//! more than one row run as a single transaction in the implementation.

use crate::contract::{
    Asset, AssetPatch, InspectionAnswer, InspectionReport, OnboardingCounts, PreventiveSchedule,
    SchedulePatch, Severity, Ticket, TicketStatus,
};
use crate::domain::schedule::DueAdvance;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

/// Aggregate counts behind the onboarding chain
#[async_trait]
pub trait OnboardingRepository: Send + Sync {
    /// Fresh counts for one tenant; never cached
    async fn load_counts(&self, tenant_id: Uuid) -> Result<OnboardingCounts>;
}

#[async_trait]
pub trait AssetRepository: Send + Sync {
    /// Find an asset owned by the tenant
    async fn find(&self, tenant_id: Uuid, asset_id: Uuid) -> Result<Option<Asset>>;

    /// Apply a sparse patch; `None` when the asset is not owned by the tenant
    async fn apply_patch(
        &self,
        tenant_id: Uuid,
        asset_id: Uuid,
        patch: &AssetPatch,
    ) -> Result<Option<Asset>>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Whether the user exists, is active and belongs to the tenant
    async fn is_active_member(&self, tenant_id: Uuid, user_id: Uuid) -> Result<bool>;
}

/// Active schedule selected by the due scan with its asset's meter reading
#[derive(Debug, Clone, PartialEq)]
pub struct DueCandidate {
    pub schedule: PreventiveSchedule,
    pub asset_hours: Option<f64>,
}

/// Ticket creation plus due advance for one schedule
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleFiring {
    pub schedule_id: Uuid,
    pub ticket: Ticket,
    pub advance: DueAdvance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    Fired,
    /// Marker no longer matched; nothing was written
    AlreadyAdvanced,
}

#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    async fn create(&self, schedule: &PreventiveSchedule) -> Result<PreventiveSchedule>;

    async fn find(&self, tenant_id: Uuid, schedule_id: Uuid) -> Result<Option<PreventiveSchedule>>;

    /// Write only the patched columns; the due markers are never touched.
    /// `None` when the schedule is not owned by the tenant
    async fn apply_patch(
        &self,
        tenant_id: Uuid,
        schedule_id: Uuid,
        patch: &SchedulePatch,
    ) -> Result<Option<PreventiveSchedule>>;

    /// Active schedules that may be due at `now`; the caller re-checks the
    /// predicate, so implementations may over-select
    async fn find_due_candidates(&self, now: DateTime<Utc>) -> Result<Vec<DueCandidate>>;

    /// Insert the ticket and advance the marker in one transaction; the
    /// advance is a compare-and-set on the stored marker
    async fn fire(&self, firing: &ScheduleFiring) -> Result<FireOutcome>;
}

/// Everything one inspection sync writes
#[derive(Debug, Clone, PartialEq)]
pub struct InspectionRecord {
    pub report: InspectionReport,
    pub answers: Vec<InspectionAnswer>,
    pub ticket: Option<Ticket>,
    /// Force the report's asset to OUT_OF_SERVICE
    pub take_out_of_service: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Recorded,
    /// Another sync already stored a report under the same client key;
    /// nothing was written
    DuplicateKey,
}

#[async_trait]
pub trait InspectionRepository: Send + Sync {
    /// Severities of the given questions within a template owned by the tenant
    async fn question_severities(
        &self,
        tenant_id: Uuid,
        template_id: Uuid,
        question_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Severity>>;

    async fn find_by_client_report_id(
        &self,
        tenant_id: Uuid,
        client_report_id: &str,
    ) -> Result<Option<InspectionReport>>;

    /// Persist report, answers, ticket and status change all-or-nothing
    async fn record(&self, record: &InspectionRecord) -> Result<RecordOutcome>;
}

#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn create(&self, ticket: &Ticket) -> Result<Ticket>;

    /// Find a ticket whose asset belongs to the tenant
    async fn find_for_tenant(&self, tenant_id: Uuid, ticket_id: Uuid) -> Result<Option<Ticket>>;

    /// Store a transition computed from a ticket read in status `from`.
    /// `None` when the stored status moved on in the meantime
    async fn save_transition(&self, ticket: &Ticket, from: TicketStatus) -> Result<Option<Ticket>>;
}
