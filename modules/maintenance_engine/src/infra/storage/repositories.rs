//! SeaORM repository implementations
//!
//! Multi-row writes open an explicit transaction; an early return drops it,
//! which rolls it back.

use crate::contract::{
    Asset, AssetPatch, InspectionReport, OnboardingCounts, OperationalStatus, PreventiveSchedule,
    SchedulePatch, Severity, Ticket, TicketStatus,
};
use crate::domain::repository::{
    AssetRepository, DueCandidate, FireOutcome, InspectionRecord, InspectionRepository,
    OnboardingRepository, RecordOutcome, ScheduleFiring, ScheduleRepository, TicketRepository,
    UserRepository,
};
use crate::domain::schedule::DueAdvance;
use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::{Expr, JoinType},
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect,
    RelationTrait, SqlErr, TransactionTrait,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use uuid::Uuid;

use super::entity::{
    checklist_question, checklist_template, forklift, inspection_answer, inspection_report,
    location, maintenance_ticket, preventive_schedule, service_contract, sla_definition, tenant,
    user,
};
use super::mapper;

// ===== Onboarding Repository =====

pub struct SeaOrmOnboardingRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmOnboardingRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OnboardingRepository for SeaOrmOnboardingRepository {
    async fn load_counts(&self, tenant_id: Uuid) -> Result<OnboardingCounts> {
        let db = &*self.db;

        let tenant_exists = tenant::Entity::find_by_id(tenant_id).count(db).await? > 0;

        let roles: Vec<(String, i64)> = user::Entity::find()
            .select_only()
            .column(user::Column::Role)
            .column_as(Expr::col(user::Column::Id).count(), "active_users")
            .filter(user::Column::TenantId.eq(tenant_id))
            .filter(user::Column::IsActive.eq(true))
            .group_by(user::Column::Role)
            .into_tuple()
            .all(db)
            .await?;

        let active_users_by_role: BTreeMap<String, u64> = roles
            .into_iter()
            .map(|(role, count)| (role, u64::try_from(count).unwrap_or(0)))
            .collect();

        let locations = location::Entity::find()
            .filter(location::Column::TenantId.eq(tenant_id))
            .count(db)
            .await?;
        let forklifts = forklift::Entity::find()
            .filter(forklift::Column::TenantId.eq(tenant_id))
            .count(db)
            .await?;
        let service_contracts = service_contract::Entity::find()
            .filter(service_contract::Column::TenantId.eq(tenant_id))
            .count(db)
            .await?;
        let slas = sla_definition::Entity::find()
            .filter(sla_definition::Column::TenantId.eq(tenant_id))
            .count(db)
            .await?;
        let checklist_templates = checklist_template::Entity::find()
            .filter(checklist_template::Column::TenantId.eq(tenant_id))
            .count(db)
            .await?;
        let checklist_questions = checklist_question::Entity::find()
            .join(JoinType::InnerJoin, checklist_question::Relation::Template.def())
            .filter(checklist_template::Column::TenantId.eq(tenant_id))
            .count(db)
            .await?;
        let active_schedules = preventive_schedule::Entity::find()
            .filter(preventive_schedule::Column::TenantId.eq(tenant_id))
            .filter(preventive_schedule::Column::IsActive.eq(true))
            .count(db)
            .await?;

        Ok(OnboardingCounts {
            tenant_exists,
            active_users_by_role,
            locations,
            forklifts,
            service_contracts,
            slas,
            checklist_templates,
            checklist_questions,
            active_schedules,
        })
    }
}

// ===== Asset and User Repositories =====

pub struct SeaOrmAssetRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmAssetRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AssetRepository for SeaOrmAssetRepository {
    async fn find(&self, tenant_id: Uuid, asset_id: Uuid) -> Result<Option<Asset>> {
        let result = forklift::Entity::find_by_id(asset_id)
            .filter(forklift::Column::TenantId.eq(tenant_id))
            .one(&*self.db)
            .await?;

        result.map(Asset::try_from).transpose()
    }

    async fn apply_patch(
        &self,
        tenant_id: Uuid,
        asset_id: Uuid,
        patch: &AssetPatch,
    ) -> Result<Option<Asset>> {
        let mut update = forklift::Entity::update_many()
            .col_expr(forklift::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(forklift::Column::Id.eq(asset_id))
            .filter(forklift::Column::TenantId.eq(tenant_id));

        if let Some(status) = patch.operational_status {
            update = update.col_expr(
                forklift::Column::OperationalStatus,
                Expr::value(mapper::format_operational_status(status)),
            );
        }
        if let Some(hours) = patch.current_hours {
            update = update.col_expr(forklift::Column::CurrentHours, Expr::value(hours));
        }

        if update.exec(&*self.db).await?.rows_affected == 0 {
            return Ok(None);
        }
        self.find(tenant_id, asset_id).await
    }
}

pub struct SeaOrmUserRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmUserRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn is_active_member(&self, tenant_id: Uuid, user_id: Uuid) -> Result<bool> {
        let count = user::Entity::find_by_id(user_id)
            .filter(user::Column::TenantId.eq(tenant_id))
            .filter(user::Column::IsActive.eq(true))
            .count(&*self.db)
            .await?;

        Ok(count > 0)
    }
}

// ===== Schedule Repository =====

pub struct SeaOrmScheduleRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmScheduleRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ScheduleRepository for SeaOrmScheduleRepository {
    async fn create(&self, schedule: &PreventiveSchedule) -> Result<PreventiveSchedule> {
        let active: preventive_schedule::ActiveModel = schedule.try_into()?;

        let result = preventive_schedule::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?;

        result.try_into()
    }

    async fn find(&self, tenant_id: Uuid, schedule_id: Uuid) -> Result<Option<PreventiveSchedule>> {
        let result = preventive_schedule::Entity::find_by_id(schedule_id)
            .filter(preventive_schedule::Column::TenantId.eq(tenant_id))
            .one(&*self.db)
            .await?;

        result.map(PreventiveSchedule::try_from).transpose()
    }

    async fn apply_patch(
        &self,
        tenant_id: Uuid,
        schedule_id: Uuid,
        patch: &SchedulePatch,
    ) -> Result<Option<PreventiveSchedule>> {
        let mut update = preventive_schedule::Entity::update_many()
            .col_expr(preventive_schedule::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(preventive_schedule::Column::Id.eq(schedule_id))
            .filter(preventive_schedule::Column::TenantId.eq(tenant_id));

        if let Some(task_name) = &patch.task_name {
            update = update.col_expr(
                preventive_schedule::Column::TaskName,
                Expr::value(task_name.clone()),
            );
        }
        if let Some(description) = &patch.description {
            update = update.col_expr(
                preventive_schedule::Column::Description,
                Expr::value(description.clone()),
            );
        }
        if let Some(frequency_value) = patch.frequency_value {
            let frequency_value = i32::try_from(frequency_value)
                .map_err(|_| anyhow!("frequency value {} out of range", frequency_value))?;
            update = update.col_expr(
                preventive_schedule::Column::FrequencyValue,
                Expr::value(frequency_value),
            );
        }
        if let Some(is_active) = patch.is_active {
            update = update.col_expr(preventive_schedule::Column::IsActive, Expr::value(is_active));
        }

        if update.exec(&*self.db).await?.rows_affected == 0 {
            return Ok(None);
        }
        self.find(tenant_id, schedule_id).await
    }

    async fn find_due_candidates(&self, now: DateTime<Utc>) -> Result<Vec<DueCandidate>> {
        let db = &*self.db;
        let mut candidates = Vec::new();

        let time_based = preventive_schedule::Entity::find()
            .filter(preventive_schedule::Column::IsActive.eq(true))
            .filter(
                preventive_schedule::Column::FrequencyType
                    .is_in(mapper::TIME_BASED_FREQUENCY_CODES),
            )
            .filter(preventive_schedule::Column::NextDueAt.lte(now))
            .all(db)
            .await?;

        for model in time_based {
            candidates.push(DueCandidate {
                schedule: model.try_into()?,
                asset_hours: None,
            });
        }

        let usage_based = preventive_schedule::Entity::find()
            .filter(preventive_schedule::Column::IsActive.eq(true))
            .filter(preventive_schedule::Column::FrequencyType.is_in(mapper::HOURS_FREQUENCY_CODES))
            .filter(preventive_schedule::Column::NextDueHours.is_not_null())
            .find_also_related(forklift::Entity)
            .all(db)
            .await?;

        for (model, asset) in usage_based {
            let Some(asset) = asset else { continue };
            let threshold = model.next_due_hours.unwrap_or(f64::INFINITY);
            if asset.current_hours >= threshold {
                candidates.push(DueCandidate {
                    schedule: model.try_into()?,
                    asset_hours: Some(asset.current_hours),
                });
            }
        }

        Ok(candidates)
    }

    async fn fire(&self, firing: &ScheduleFiring) -> Result<FireOutcome> {
        let txn = self.db.begin().await?;

        let advance = preventive_schedule::Entity::update_many()
            .col_expr(preventive_schedule::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(preventive_schedule::Column::Id.eq(firing.schedule_id))
            .filter(preventive_schedule::Column::IsActive.eq(true));

        let advance = match firing.advance {
            DueAdvance::At { expected, next } => advance
                .col_expr(preventive_schedule::Column::NextDueAt, Expr::value(next))
                .filter(preventive_schedule::Column::NextDueAt.eq(expected)),
            DueAdvance::Hours { expected, next } => advance
                .col_expr(preventive_schedule::Column::NextDueHours, Expr::value(next))
                .filter(preventive_schedule::Column::NextDueHours.eq(expected)),
        };

        if advance.exec(&txn).await?.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(FireOutcome::AlreadyAdvanced);
        }

        let ticket: maintenance_ticket::ActiveModel = (&firing.ticket).into();
        maintenance_ticket::Entity::insert(ticket).exec(&txn).await?;

        txn.commit().await?;
        Ok(FireOutcome::Fired)
    }
}

// ===== Inspection Repository =====

pub struct SeaOrmInspectionRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmInspectionRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl InspectionRepository for SeaOrmInspectionRepository {
    async fn question_severities(
        &self,
        tenant_id: Uuid,
        template_id: Uuid,
        question_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Severity>> {
        if question_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let questions = checklist_question::Entity::find()
            .join(JoinType::InnerJoin, checklist_question::Relation::Template.def())
            .filter(checklist_template::Column::TenantId.eq(tenant_id))
            .filter(checklist_question::Column::TemplateId.eq(template_id))
            .filter(checklist_question::Column::Id.is_in(question_ids.iter().copied()))
            .all(&*self.db)
            .await?;

        questions
            .into_iter()
            .map(|q| Ok((q.id, mapper::parse_severity(&q.severity)?)))
            .collect()
    }

    async fn find_by_client_report_id(
        &self,
        tenant_id: Uuid,
        client_report_id: &str,
    ) -> Result<Option<InspectionReport>> {
        let result = inspection_report::Entity::find()
            .filter(inspection_report::Column::TenantId.eq(tenant_id))
            .filter(inspection_report::Column::ClientReportId.eq(client_report_id))
            .one(&*self.db)
            .await?;

        Ok(result.map(|e| e.into()))
    }

    async fn record(&self, record: &InspectionRecord) -> Result<RecordOutcome> {
        let txn = self.db.begin().await?;

        let report: inspection_report::ActiveModel = (&record.report).into();
        if let Err(err) = inspection_report::Entity::insert(report).exec(&txn).await {
            let key_taken = record.report.client_report_id.is_some()
                && matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)));
            txn.rollback().await?;
            if key_taken {
                return Ok(RecordOutcome::DuplicateKey);
            }
            return Err(err.into());
        }

        if !record.answers.is_empty() {
            let answers: Vec<inspection_answer::ActiveModel> =
                record.answers.iter().map(|a| a.into()).collect();
            inspection_answer::Entity::insert_many(answers)
                .exec_without_returning(&txn)
                .await?;
        }

        if let Some(ticket) = &record.ticket {
            let ticket: maintenance_ticket::ActiveModel = ticket.into();
            maintenance_ticket::Entity::insert(ticket).exec(&txn).await?;
        }

        if record.take_out_of_service {
            let updated = forklift::Entity::update_many()
                .col_expr(
                    forklift::Column::OperationalStatus,
                    Expr::value(mapper::format_operational_status(
                        OperationalStatus::OutOfService,
                    )),
                )
                .col_expr(forklift::Column::UpdatedAt, Expr::value(Utc::now()))
                .filter(forklift::Column::Id.eq(record.report.asset_id))
                .filter(forklift::Column::TenantId.eq(record.report.tenant_id))
                .exec(&txn)
                .await?;

            if updated.rows_affected == 0 {
                bail!("asset {} disappeared during inspection sync", record.report.asset_id);
            }
        }

        txn.commit().await?;
        Ok(RecordOutcome::Recorded)
    }
}

// ===== Ticket Repository =====

pub struct SeaOrmTicketRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmTicketRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TicketRepository for SeaOrmTicketRepository {
    async fn create(&self, ticket: &Ticket) -> Result<Ticket> {
        let active: maintenance_ticket::ActiveModel = ticket.into();

        let result = maintenance_ticket::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?;

        result.try_into()
    }

    async fn find_for_tenant(&self, tenant_id: Uuid, ticket_id: Uuid) -> Result<Option<Ticket>> {
        let result = maintenance_ticket::Entity::find_by_id(ticket_id)
            .join(JoinType::InnerJoin, maintenance_ticket::Relation::Forklift.def())
            .filter(forklift::Column::TenantId.eq(tenant_id))
            .one(&*self.db)
            .await?;

        result.map(Ticket::try_from).transpose()
    }

    async fn save_transition(&self, ticket: &Ticket, from: TicketStatus) -> Result<Option<Ticket>> {
        let result = maintenance_ticket::Entity::update_many()
            .col_expr(
                maintenance_ticket::Column::Status,
                Expr::value(mapper::format_ticket_status(ticket.status)),
            )
            .col_expr(maintenance_ticket::Column::AssignedTo, Expr::value(ticket.assigned_to))
            .col_expr(
                maintenance_ticket::Column::ResolutionNotes,
                Expr::value(ticket.resolution_notes.clone()),
            )
            .col_expr(maintenance_ticket::Column::ResolvedAt, Expr::value(ticket.resolved_at))
            .col_expr(maintenance_ticket::Column::UpdatedAt, Expr::value(ticket.updated_at))
            .filter(maintenance_ticket::Column::Id.eq(ticket.id))
            .filter(
                maintenance_ticket::Column::Status
                    .is_in(mapper::ticket_status_codes(from).iter().copied()),
            )
            .exec(&*self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        let stored = maintenance_ticket::Entity::find_by_id(ticket.id)
            .one(&*self.db)
            .await?;
        stored.map(Ticket::try_from).transpose()
    }
}
