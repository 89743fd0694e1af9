//! Domain service - maintenance workflow orchestration
//!
//! Every operation reads fresh state, decides, then acts. Gates are not
//! lock-protected: two concurrent creations may both pass the same gate.
//! Duplicate schedule firing is prevented in storage by the compare-and-set
//! due advance.

use super::onboarding::{self, ReadinessConfig};
use super::repository::{
    AssetRepository, DueCandidate, FireOutcome, InspectionRecord, InspectionRepository,
    OnboardingRepository, RecordOutcome, ScheduleFiring, ScheduleRepository, TicketRepository,
    UserRepository,
};
use super::schedule;
use super::ticket::TicketSource;
use super::triage::{self, Triage};
use super::validation;
use crate::config::Config;
use crate::contract::{
    Asset, AssetPatch, InspectionAnswer, InspectionReport, MaintenanceError, NewSchedule,
    NewTicket, OnboardingStatus, OnboardingStep, PreventiveSchedule, ScanReport, SchedulePatch,
    SyncInspection, SyncReceipt, Ticket, TicketPriority, TicketStatus,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Data access collaborators of the service
#[derive(Clone)]
pub struct Repositories {
    pub onboarding: Arc<dyn OnboardingRepository>,
    pub assets: Arc<dyn AssetRepository>,
    pub users: Arc<dyn UserRepository>,
    pub schedules: Arc<dyn ScheduleRepository>,
    pub inspections: Arc<dyn InspectionRepository>,
    pub tickets: Arc<dyn TicketRepository>,
}

/// Domain service for the maintenance workflow
pub struct Service {
    repos: Repositories,
    readiness: ReadinessConfig,
    max_answers_per_report: usize,
}

fn internal(context: &str, err: anyhow::Error) -> MaintenanceError {
    error!(error = ?err, "{} failed", context);
    MaintenanceError::Internal
}

fn rolled_back(context: &str, err: anyhow::Error) -> MaintenanceError {
    error!(error = ?err, "{} rolled back", context);
    MaintenanceError::Transaction {
        message: format!("{} rolled back", context),
    }
}

impl Service {
    /// Create a new service instance
    pub fn new(repos: Repositories, config: &Config) -> Self {
        Self {
            repos,
            readiness: config.readiness.clone(),
            max_answers_per_report: config.max_answers_per_report,
        }
    }

    // ===== Onboarding =====

    /// Readiness of every onboarding step, computed from fresh counts
    pub async fn compute_status(
        &self,
        tenant_id: Uuid,
    ) -> Result<OnboardingStatus, MaintenanceError> {
        let counts = self
            .repos
            .onboarding
            .load_counts(tenant_id)
            .await
            .map_err(|e| internal("loading onboarding counts", e))?;

        Ok(onboarding::resolve(tenant_id, &counts, &self.readiness))
    }

    /// Gate run before creating locations, contracts, SLAs, checklist
    /// templates and preventive schedules
    pub async fn ensure_prerequisites(
        &self,
        tenant_id: Uuid,
        target: OnboardingStep,
    ) -> Result<(), MaintenanceError> {
        let status = self.compute_status(tenant_id).await?;
        let result = onboarding::check_gate(&status, target, &self.readiness);
        if let Err(MaintenanceError::PrerequisiteBlocked { missing_steps, .. }) = &result {
            debug!(%tenant_id, step = %target, ?missing_steps, "onboarding gate blocked");
        }
        result
    }

    // ===== Preventive schedules =====

    pub async fn create_schedule(
        &self,
        tenant_id: Uuid,
        params: NewSchedule,
    ) -> Result<PreventiveSchedule, MaintenanceError> {
        validation::validate_new_schedule(&params)?;
        self.ensure_prerequisites(tenant_id, OnboardingStep::PreventiveSchedules)
            .await?;

        let asset = match params.asset_id {
            Some(asset_id) => Some(self.require_asset(tenant_id, asset_id).await?),
            None => None,
        };

        let now = Utc::now();
        let (next_due_at, next_due_hours) = schedule::initial_due(
            params.frequency_type,
            params.frequency_value,
            now,
            asset.as_ref().map(|a| a.current_hours),
        );

        let new_schedule = PreventiveSchedule {
            id: Uuid::new_v4(),
            tenant_id,
            asset_id: params.asset_id,
            task_name: params.task_name.trim().to_string(),
            description: params.description,
            frequency_type: params.frequency_type,
            frequency_value: params.frequency_value,
            next_due_at,
            next_due_hours,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let created = self
            .repos
            .schedules
            .create(&new_schedule)
            .await
            .map_err(|e| internal("creating schedule", e))?;

        info!(
            %tenant_id,
            schedule_id = %created.id,
            frequency_type = ?created.frequency_type,
            frequency_value = created.frequency_value,
            "preventive schedule created"
        );
        Ok(created)
    }

    /// Apply a typed patch; deactivation is `is_active = Some(false)`
    pub async fn update_schedule(
        &self,
        tenant_id: Uuid,
        schedule_id: Uuid,
        patch: SchedulePatch,
    ) -> Result<PreventiveSchedule, MaintenanceError> {
        validation::validate_schedule_patch(&patch)?;
        let patch = SchedulePatch {
            task_name: patch.task_name.map(|name| name.trim().to_string()),
            ..patch
        };

        // The due marker keeps its position; a new step applies from the next firing
        let updated = self
            .repos
            .schedules
            .apply_patch(tenant_id, schedule_id, &patch)
            .await
            .map_err(|e| internal("updating schedule", e))?
            .ok_or_else(|| MaintenanceError::not_found("schedule", schedule_id))?;

        debug!(%tenant_id, %schedule_id, is_active = updated.is_active, "schedule patched");
        Ok(updated)
    }

    /// One pass of the time-triggered due scan. Each schedule fires in its
    /// own transaction; a failure is logged and does not stop the others.
    pub async fn scan_and_fire_due_schedules(
        &self,
        now: DateTime<Utc>,
    ) -> Result<ScanReport, MaintenanceError> {
        let candidates = self
            .repos
            .schedules
            .find_due_candidates(now)
            .await
            .map_err(|e| internal("selecting due schedules", e))?;

        let mut report = ScanReport::default();
        for candidate in candidates {
            if !schedule::is_due(&candidate.schedule, candidate.asset_hours, now) {
                continue;
            }
            report.due += 1;

            match self.fire_schedule(&candidate, now).await {
                Ok(FireOutcome::Fired) => report.fired += 1,
                Ok(FireOutcome::AlreadyAdvanced) => report.skipped += 1,
                Err(FireError::NotFireable(reason)) => {
                    warn!(schedule_id = %candidate.schedule.id, reason, "due schedule skipped");
                    report.skipped += 1;
                }
                Err(FireError::Storage(err)) => {
                    error!(
                        schedule_id = %candidate.schedule.id,
                        error = ?err,
                        "firing schedule failed, transaction rolled back"
                    );
                    report.failed += 1;
                }
            }
        }

        if report.due > 0 {
            info!(
                due = report.due,
                fired = report.fired,
                skipped = report.skipped,
                failed = report.failed,
                "preventive due scan finished"
            );
        } else {
            debug!("preventive due scan found nothing due");
        }
        Ok(report)
    }

    async fn fire_schedule(
        &self,
        candidate: &DueCandidate,
        now: DateTime<Utc>,
    ) -> Result<FireOutcome, FireError> {
        let due = &candidate.schedule;
        let asset_id = due
            .asset_id
            .ok_or(FireError::NotFireable("schedule has no asset"))?;
        let advance = schedule::next_advance(due)
            .ok_or(FireError::NotFireable("schedule has no due marker"))?;

        let ticket = Ticket::open(
            asset_id,
            TicketSource::Schedule(due.id),
            None,
            TicketPriority::Medium,
            schedule::ticket_description(due),
            now,
        );

        let outcome = self
            .repos
            .schedules
            .fire(&ScheduleFiring {
                schedule_id: due.id,
                ticket,
                advance,
            })
            .await
            .map_err(FireError::Storage)?;

        match outcome {
            FireOutcome::Fired => {
                info!(schedule_id = %due.id, %asset_id, "preventive ticket opened")
            }
            FireOutcome::AlreadyAdvanced => {
                debug!(schedule_id = %due.id, "schedule already advanced by another scan")
            }
        }
        Ok(outcome)
    }

    // ===== Inspections =====

    /// Triage an inspection and persist every effect in one transaction
    pub async fn process_sync(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        inspection: SyncInspection,
    ) -> Result<SyncReceipt, MaintenanceError> {
        validation::validate_sync(&inspection, self.max_answers_per_report)?;

        if let Some(key) = inspection.client_report_id.as_deref() {
            if let Some(receipt) = self.find_receipt(tenant_id, key).await? {
                debug!(
                    %tenant_id,
                    report_id = %receipt.report_id,
                    "duplicate inspection sync ignored"
                );
                return Ok(receipt);
            }
        }

        self.require_asset(tenant_id, inspection.asset_id).await?;

        let report_id = Uuid::new_v4();
        let answers: Vec<InspectionAnswer> = inspection
            .answers
            .iter()
            .map(|(question_id, raw)| {
                let normalized_value = triage::normalize_answer(raw);
                InspectionAnswer {
                    report_id,
                    question_id: *question_id,
                    raw_value: raw.clone(),
                    is_failure: triage::is_failure(&normalized_value),
                    normalized_value,
                }
            })
            .collect();

        let failing: Vec<Uuid> = answers
            .iter()
            .filter(|a| a.is_failure)
            .map(|a| a.question_id)
            .collect();

        let severities = if failing.is_empty() {
            Default::default()
        } else {
            self.repos
                .inspections
                .question_severities(tenant_id, inspection.template_id, &failing)
                .await
                .map_err(|e| internal("looking up question severities", e))?
        };

        let verdict = Triage::classify(&failing, &severities, inspection.critical_flag);
        let critical = verdict.is_critical();
        let synced_at = Utc::now();

        let ticket = verdict.ticket().map(|(priority, description)| {
            Ticket::open(
                inspection.asset_id,
                TicketSource::Inspection(report_id),
                Some(user_id),
                priority,
                description,
                synced_at,
            )
        });

        let record = InspectionRecord {
            report: InspectionReport {
                id: report_id,
                tenant_id,
                asset_id: inspection.asset_id,
                template_id: inspection.template_id,
                inspector_id: user_id,
                client_report_id: inspection.client_report_id,
                captured_at: inspection.captured_at,
                synced_at,
                gps_latitude: inspection.gps_latitude,
                gps_longitude: inspection.gps_longitude,
                has_critical_failure: critical,
            },
            answers,
            ticket,
            take_out_of_service: critical,
        };

        let stored = self
            .repos
            .inspections
            .record(&record)
            .await
            .map_err(|e| rolled_back("recording inspection", e))?;

        if stored == RecordOutcome::DuplicateKey {
            // A concurrent sync with the same key committed first
            let key = record.report.client_report_id.as_deref().unwrap_or_default();
            let receipt = self.find_receipt(tenant_id, key).await?.ok_or_else(|| {
                MaintenanceError::Transaction {
                    message: format!("report key '{}' collided but no report was found", key),
                }
            })?;
            debug!(
                %tenant_id,
                report_id = %receipt.report_id,
                "concurrent inspection sync ignored"
            );
            return Ok(receipt);
        }

        info!(
            %tenant_id,
            %report_id,
            asset_id = %inspection.asset_id,
            failing = failing.len(),
            critical,
            warning = verdict.has_warning(),
            ticket_opened = record.ticket.is_some(),
            "inspection synced"
        );
        if critical {
            warn!(asset_id = %inspection.asset_id, %report_id, "asset taken out of service");
        }

        Ok(SyncReceipt {
            report_id,
            synced_at,
        })
    }

    // ===== Assets =====

    pub async fn update_asset(
        &self,
        tenant_id: Uuid,
        asset_id: Uuid,
        patch: AssetPatch,
    ) -> Result<Asset, MaintenanceError> {
        validation::validate_asset_patch(&patch)?;

        self.repos
            .assets
            .apply_patch(tenant_id, asset_id, &patch)
            .await
            .map_err(|e| internal("updating asset", e))?
            .ok_or_else(|| MaintenanceError::not_found("asset", asset_id))
    }

    // ===== Tickets =====

    /// Manual ticket creation; same shape as the automatic paths
    pub async fn create_ticket(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        params: NewTicket,
    ) -> Result<Ticket, MaintenanceError> {
        validation::validate_new_ticket(&params)?;
        self.require_asset(tenant_id, params.asset_id).await?;

        let ticket = Ticket::open(
            params.asset_id,
            TicketSource::Manual,
            Some(user_id),
            params.priority,
            params.description.trim().to_string(),
            Utc::now(),
        );

        self.repos
            .tickets
            .create(&ticket)
            .await
            .map_err(|e| internal("creating ticket", e))
    }

    pub async fn start_ticket(
        &self,
        tenant_id: Uuid,
        ticket_id: Uuid,
        assignee: Option<Uuid>,
    ) -> Result<Ticket, MaintenanceError> {
        let mut ticket = self.require_ticket(tenant_id, ticket_id).await?;
        if let Some(user_id) = assignee {
            self.require_member(tenant_id, user_id).await?;
        }
        let from = ticket.status;
        ticket.start(assignee, Utc::now())?;
        self.save_ticket(&ticket, from).await
    }

    pub async fn assign_ticket(
        &self,
        tenant_id: Uuid,
        ticket_id: Uuid,
        assignee: Uuid,
    ) -> Result<Ticket, MaintenanceError> {
        let mut ticket = self.require_ticket(tenant_id, ticket_id).await?;
        self.require_member(tenant_id, assignee).await?;
        let from = ticket.status;
        ticket.assign(assignee, Utc::now())?;
        self.save_ticket(&ticket, from).await
    }

    pub async fn resolve_ticket(
        &self,
        tenant_id: Uuid,
        ticket_id: Uuid,
        resolution_notes: &str,
    ) -> Result<Ticket, MaintenanceError> {
        if resolution_notes.trim().is_empty() {
            return Err(MaintenanceError::validation(
                "resolution notes are required to resolve a ticket",
            ));
        }
        let mut ticket = self.require_ticket(tenant_id, ticket_id).await?;
        let from = ticket.status;
        ticket.resolve(resolution_notes, Utc::now())?;
        let saved = self.save_ticket(&ticket, from).await?;
        info!(%tenant_id, %ticket_id, "ticket resolved");
        Ok(saved)
    }

    // ===== Helper Methods =====

    async fn require_asset(
        &self,
        tenant_id: Uuid,
        asset_id: Uuid,
    ) -> Result<Asset, MaintenanceError> {
        self.repos
            .assets
            .find(tenant_id, asset_id)
            .await
            .map_err(|e| internal("loading asset", e))?
            .ok_or_else(|| MaintenanceError::not_found("asset", asset_id))
    }

    async fn require_ticket(
        &self,
        tenant_id: Uuid,
        ticket_id: Uuid,
    ) -> Result<Ticket, MaintenanceError> {
        self.repos
            .tickets
            .find_for_tenant(tenant_id, ticket_id)
            .await
            .map_err(|e| internal("loading ticket", e))?
            .ok_or_else(|| MaintenanceError::not_found("ticket", ticket_id))
    }

    async fn require_member(&self, tenant_id: Uuid, user_id: Uuid) -> Result<(), MaintenanceError> {
        let is_member = self
            .repos
            .users
            .is_active_member(tenant_id, user_id)
            .await
            .map_err(|e| internal("checking assignee", e))?;
        if !is_member {
            return Err(MaintenanceError::validation(format!(
                "assignee {} is not an active user of this tenant",
                user_id
            )));
        }
        Ok(())
    }

    /// Persist a transition only if the stored status is still `from`
    async fn save_ticket(
        &self,
        ticket: &Ticket,
        from: TicketStatus,
    ) -> Result<Ticket, MaintenanceError> {
        self.repos
            .tickets
            .save_transition(ticket, from)
            .await
            .map_err(|e| internal("updating ticket", e))?
            .ok_or_else(|| {
                MaintenanceError::conflict(format!(
                    "ticket {} was changed concurrently; reload and retry",
                    ticket.id
                ))
            })
    }

    async fn find_receipt(
        &self,
        tenant_id: Uuid,
        client_report_id: &str,
    ) -> Result<Option<SyncReceipt>, MaintenanceError> {
        let report = self
            .repos
            .inspections
            .find_by_client_report_id(tenant_id, client_report_id)
            .await
            .map_err(|e| internal("looking up report key", e))?;

        Ok(report.map(|report| SyncReceipt {
            report_id: report.id,
            synced_at: report.synced_at,
        }))
    }
}

enum FireError {
    NotFireable(&'static str),
    Storage(anyhow::Error),
}
