//! Common test utilities: an in-memory store behind every repository trait
//! and seeding helpers for a fully onboarded tenant

#![allow(dead_code)]

use anyhow::{anyhow, bail};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use maintenance_engine::config::Config;
use maintenance_engine::contract::*;
use maintenance_engine::domain::repository::{
    AssetRepository, DueCandidate, FireOutcome, InspectionRecord, InspectionRepository,
    OnboardingRepository, RecordOutcome, ScheduleFiring, ScheduleRepository, TicketRepository,
    UserRepository,
};
use maintenance_engine::domain::schedule::DueAdvance;
use maintenance_engine::domain::{Repositories, Service};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

pub fn print_test_header(test_name: &str, purpose: &[&str]) {
    println!("\n🧪 TEST: {}", test_name);
    if let Some(first) = purpose.first() {
        println!("📋 PURPOSE: {}", first);
    }
    for line in purpose.iter().skip(1) {
        println!("   {}", line);
    }
}

#[derive(Debug, Clone)]
struct UserRow {
    tenant_id: Uuid,
    role: String,
    is_active: bool,
}

#[derive(Default)]
struct State {
    tenants: HashSet<Uuid>,
    users: HashMap<Uuid, UserRow>,
    locations: HashMap<Uuid, u64>,
    service_contracts: HashMap<Uuid, u64>,
    slas: HashMap<Uuid, u64>,
    /// template id -> tenant id
    templates: HashMap<Uuid, Uuid>,
    /// question id -> (template id, severity)
    questions: HashMap<Uuid, (Uuid, Severity)>,
    assets: HashMap<Uuid, Asset>,
    schedules: HashMap<Uuid, PreventiveSchedule>,
    reports: Vec<InspectionReport>,
    answers: Vec<InspectionAnswer>,
    tickets: HashMap<Uuid, Ticket>,

    // Failure injection
    failing_schedules: HashSet<Uuid>,
    racing_schedules: HashSet<Uuid>,
    fail_record: bool,
    hidden_report_keys: u32,
    concurrently_resolved: HashSet<Uuid>,
}

/// In-memory store shared by all mock repositories
#[derive(Clone, Default)]
pub struct MockStore {
    state: Arc<RwLock<State>>,
}

/// Ids of a tenant onboarded up to (and including) checklists
#[derive(Debug, Clone, Copy)]
pub struct Fixture {
    pub tenant_id: Uuid,
    pub admin_id: Uuid,
    pub technician_id: Uuid,
    pub asset_id: Uuid,
    pub template_id: Uuid,
    pub critical_question: Uuid,
    pub warning_question: Uuid,
    pub info_question: Uuid,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repositories(&self) -> Repositories {
        Repositories {
            onboarding: Arc::new(self.clone()),
            assets: Arc::new(self.clone()),
            users: Arc::new(self.clone()),
            schedules: Arc::new(self.clone()),
            inspections: Arc::new(self.clone()),
            tickets: Arc::new(self.clone()),
        }
    }

    pub fn service(&self) -> Service {
        Service::new(self.repositories(), &Config::default())
    }

    // ===== Seeding =====

    pub fn seed_tenant(&self) -> Uuid {
        let tenant_id = Uuid::new_v4();
        self.state.write().tenants.insert(tenant_id);
        tenant_id
    }

    pub fn seed_user(&self, tenant_id: Uuid, role: &str) -> Uuid {
        let user_id = Uuid::new_v4();
        self.state.write().users.insert(
            user_id,
            UserRow {
                tenant_id,
                role: role.to_string(),
                is_active: true,
            },
        );
        user_id
    }

    pub fn deactivate_user(&self, user_id: Uuid) {
        if let Some(user) = self.state.write().users.get_mut(&user_id) {
            user.is_active = false;
        }
    }

    pub fn seed_location(&self, tenant_id: Uuid) {
        *self.state.write().locations.entry(tenant_id).or_default() += 1;
    }

    pub fn seed_service_contract(&self, tenant_id: Uuid) {
        *self
            .state
            .write()
            .service_contracts
            .entry(tenant_id)
            .or_default() += 1;
    }

    pub fn seed_sla(&self, tenant_id: Uuid) {
        *self.state.write().slas.entry(tenant_id).or_default() += 1;
    }

    pub fn seed_asset(&self, tenant_id: Uuid, current_hours: f64) -> Uuid {
        let asset_id = Uuid::new_v4();
        self.state.write().assets.insert(
            asset_id,
            Asset {
                id: asset_id,
                tenant_id,
                location_id: None,
                name: "Forklift".to_string(),
                serial_number: Some(format!("SN-{}", &asset_id.to_string()[..8])),
                operational_status: OperationalStatus::Operational,
                current_hours,
                updated_at: Utc::now(),
            },
        );
        asset_id
    }

    pub fn seed_template(&self, tenant_id: Uuid) -> Uuid {
        let template_id = Uuid::new_v4();
        self.state.write().templates.insert(template_id, tenant_id);
        template_id
    }

    pub fn seed_question(&self, template_id: Uuid, severity: Severity) -> Uuid {
        let question_id = Uuid::new_v4();
        self.state
            .write()
            .questions
            .insert(question_id, (template_id, severity));
        question_id
    }

    /// Tenant with every step up to checklists complete; no schedules yet
    pub fn seed_ready_tenant(&self) -> Fixture {
        let tenant_id = self.seed_tenant();
        let admin_id = self.seed_user(tenant_id, "ADMIN");
        self.seed_user(tenant_id, "CLIENTE");
        let technician_id = self.seed_user(tenant_id, "TECNICO");
        self.seed_user(tenant_id, "OPERADOR");
        self.seed_location(tenant_id);
        let asset_id = self.seed_asset(tenant_id, 1000.0);
        self.seed_service_contract(tenant_id);
        self.seed_sla(tenant_id);
        let template_id = self.seed_template(tenant_id);
        let critical_question = self.seed_question(template_id, Severity::CriticalStop);
        let warning_question = self.seed_question(template_id, Severity::Warning);
        let info_question = self.seed_question(template_id, Severity::Info);

        Fixture {
            tenant_id,
            admin_id,
            technician_id,
            asset_id,
            template_id,
            critical_question,
            warning_question,
            info_question,
        }
    }

    // ===== Failure injection =====

    /// Make `fire` fail for this schedule without writing anything
    pub fn fail_firing(&self, schedule_id: Uuid) {
        self.state.write().failing_schedules.insert(schedule_id);
    }

    /// Simulate a concurrent scan that advances this schedule (and opens its
    /// ticket) between selection and firing
    pub fn race_firing(&self, schedule_id: Uuid) {
        self.state.write().racing_schedules.insert(schedule_id);
    }

    /// Make every inspection record fail, as a rolled-back transaction would
    pub fn fail_inspection_records(&self) {
        self.state.write().fail_record = true;
    }

    /// Hide committed reports from the next key lookup, as a sync that
    /// started before a concurrent one committed would see them
    pub fn hide_report_keys_once(&self) {
        self.state.write().hidden_report_keys += 1;
    }

    /// Resolve this ticket from another session right before the next save
    pub fn resolve_concurrently(&self, ticket_id: Uuid) {
        self.state.write().concurrently_resolved.insert(ticket_id);
    }

    // ===== Direct state access =====

    pub fn asset(&self, asset_id: Uuid) -> Option<Asset> {
        self.state.read().assets.get(&asset_id).cloned()
    }

    pub fn set_asset_hours(&self, asset_id: Uuid, hours: f64) {
        if let Some(asset) = self.state.write().assets.get_mut(&asset_id) {
            asset.current_hours = hours;
        }
    }

    pub fn schedule(&self, schedule_id: Uuid) -> Option<PreventiveSchedule> {
        self.state.read().schedules.get(&schedule_id).cloned()
    }

    /// Overwrite a schedule's time marker
    pub fn set_next_due_at(&self, schedule_id: Uuid, due: DateTime<Utc>) {
        if let Some(schedule) = self.state.write().schedules.get_mut(&schedule_id) {
            schedule.next_due_at = Some(due);
        }
    }

    pub fn tickets(&self) -> Vec<Ticket> {
        let mut tickets: Vec<Ticket> = self.state.read().tickets.values().cloned().collect();
        tickets.sort_by_key(|t| t.created_at);
        tickets
    }

    pub fn tickets_for_schedule(&self, schedule_id: Uuid) -> Vec<Ticket> {
        self.tickets()
            .into_iter()
            .filter(|t| t.schedule_id == Some(schedule_id))
            .collect()
    }

    pub fn reports(&self) -> Vec<InspectionReport> {
        self.state.read().reports.clone()
    }

    pub fn answers(&self) -> Vec<InspectionAnswer> {
        self.state.read().answers.clone()
    }
}

fn apply_advance(schedule: &mut PreventiveSchedule, advance: DueAdvance) -> bool {
    match advance {
        DueAdvance::At { expected, next } => {
            if schedule.next_due_at != Some(expected) {
                return false;
            }
            schedule.next_due_at = Some(next);
        }
        DueAdvance::Hours { expected, next } => {
            if schedule.next_due_hours != Some(expected) {
                return false;
            }
            schedule.next_due_hours = Some(next);
        }
    }
    schedule.updated_at = Utc::now();
    true
}

#[async_trait]
impl OnboardingRepository for MockStore {
    async fn load_counts(&self, tenant_id: Uuid) -> anyhow::Result<OnboardingCounts> {
        let state = self.state.read();

        let mut active_users_by_role = BTreeMap::new();
        for user in state.users.values() {
            if user.tenant_id == tenant_id && user.is_active {
                *active_users_by_role.entry(user.role.clone()).or_insert(0) += 1;
            }
        }

        let tenant_templates: HashSet<Uuid> = state
            .templates
            .iter()
            .filter(|(_, owner)| **owner == tenant_id)
            .map(|(id, _)| *id)
            .collect();

        Ok(OnboardingCounts {
            tenant_exists: state.tenants.contains(&tenant_id),
            active_users_by_role,
            locations: state.locations.get(&tenant_id).copied().unwrap_or(0),
            forklifts: state
                .assets
                .values()
                .filter(|a| a.tenant_id == tenant_id)
                .count() as u64,
            service_contracts: state.service_contracts.get(&tenant_id).copied().unwrap_or(0),
            slas: state.slas.get(&tenant_id).copied().unwrap_or(0),
            checklist_templates: tenant_templates.len() as u64,
            checklist_questions: state
                .questions
                .values()
                .filter(|(template_id, _)| tenant_templates.contains(template_id))
                .count() as u64,
            active_schedules: state
                .schedules
                .values()
                .filter(|s| s.tenant_id == tenant_id && s.is_active)
                .count() as u64,
        })
    }
}

#[async_trait]
impl AssetRepository for MockStore {
    async fn find(&self, tenant_id: Uuid, asset_id: Uuid) -> anyhow::Result<Option<Asset>> {
        Ok(self
            .state
            .read()
            .assets
            .get(&asset_id)
            .filter(|a| a.tenant_id == tenant_id)
            .cloned())
    }

    async fn apply_patch(
        &self,
        tenant_id: Uuid,
        asset_id: Uuid,
        patch: &AssetPatch,
    ) -> anyhow::Result<Option<Asset>> {
        let mut state = self.state.write();
        let Some(asset) = state
            .assets
            .get_mut(&asset_id)
            .filter(|a| a.tenant_id == tenant_id)
        else {
            return Ok(None);
        };
        if let Some(status) = patch.operational_status {
            asset.operational_status = status;
        }
        if let Some(hours) = patch.current_hours {
            asset.current_hours = hours;
        }
        asset.updated_at = Utc::now();
        Ok(Some(asset.clone()))
    }
}

#[async_trait]
impl UserRepository for MockStore {
    async fn is_active_member(&self, tenant_id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
        Ok(self
            .state
            .read()
            .users
            .get(&user_id)
            .is_some_and(|u| u.tenant_id == tenant_id && u.is_active))
    }
}

#[async_trait]
impl ScheduleRepository for MockStore {
    async fn create(&self, schedule: &PreventiveSchedule) -> anyhow::Result<PreventiveSchedule> {
        self.state
            .write()
            .schedules
            .insert(schedule.id, schedule.clone());
        Ok(schedule.clone())
    }

    async fn find(
        &self,
        tenant_id: Uuid,
        schedule_id: Uuid,
    ) -> anyhow::Result<Option<PreventiveSchedule>> {
        Ok(self
            .state
            .read()
            .schedules
            .get(&schedule_id)
            .filter(|s| s.tenant_id == tenant_id)
            .cloned())
    }

    async fn apply_patch(
        &self,
        tenant_id: Uuid,
        schedule_id: Uuid,
        patch: &SchedulePatch,
    ) -> anyhow::Result<Option<PreventiveSchedule>> {
        let mut state = self.state.write();
        let Some(schedule) = state
            .schedules
            .get_mut(&schedule_id)
            .filter(|s| s.tenant_id == tenant_id)
        else {
            return Ok(None);
        };
        if let Some(task_name) = &patch.task_name {
            schedule.task_name = task_name.clone();
        }
        if let Some(description) = &patch.description {
            schedule.description = Some(description.clone());
        }
        if let Some(frequency_value) = patch.frequency_value {
            schedule.frequency_value = frequency_value;
        }
        if let Some(is_active) = patch.is_active {
            schedule.is_active = is_active;
        }
        schedule.updated_at = Utc::now();
        Ok(Some(schedule.clone()))
    }

    async fn find_due_candidates(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<DueCandidate>> {
        let state = self.state.read();
        let mut candidates: Vec<DueCandidate> = state
            .schedules
            .values()
            .filter(|s| s.is_active)
            .filter(|s| match s.frequency_type {
                FrequencyType::Hours => s.next_due_hours.is_some(),
                _ => s.next_due_at.is_some_and(|due| due <= now),
            })
            .map(|s| DueCandidate {
                schedule: s.clone(),
                asset_hours: s
                    .asset_id
                    .and_then(|id| state.assets.get(&id))
                    .map(|a| a.current_hours),
            })
            .collect();
        candidates.sort_by_key(|c| c.schedule.created_at);
        Ok(candidates)
    }

    async fn fire(&self, firing: &ScheduleFiring) -> anyhow::Result<FireOutcome> {
        let mut guard = self.state.write();
        let state = &mut *guard;

        if state.failing_schedules.contains(&firing.schedule_id) {
            bail!("injected failure firing schedule {}", firing.schedule_id);
        }

        let schedule = state
            .schedules
            .get_mut(&firing.schedule_id)
            .ok_or_else(|| anyhow!("schedule {} does not exist", firing.schedule_id))?;

        if state.racing_schedules.remove(&firing.schedule_id) {
            // The other scan wins: its ticket and advance land first
            let mut rival = firing.ticket.clone();
            rival.id = Uuid::new_v4();
            apply_advance(schedule, firing.advance);
            state.tickets.insert(rival.id, rival);
        }

        if !schedule.is_active || !apply_advance(schedule, firing.advance) {
            return Ok(FireOutcome::AlreadyAdvanced);
        }
        state.tickets.insert(firing.ticket.id, firing.ticket.clone());
        Ok(FireOutcome::Fired)
    }
}

#[async_trait]
impl InspectionRepository for MockStore {
    async fn question_severities(
        &self,
        tenant_id: Uuid,
        template_id: Uuid,
        question_ids: &[Uuid],
    ) -> anyhow::Result<HashMap<Uuid, Severity>> {
        let state = self.state.read();
        if state.templates.get(&template_id) != Some(&tenant_id) {
            return Ok(HashMap::new());
        }
        Ok(question_ids
            .iter()
            .filter_map(|id| {
                state
                    .questions
                    .get(id)
                    .filter(|(owner, _)| *owner == template_id)
                    .map(|(_, severity)| (*id, *severity))
            })
            .collect())
    }

    async fn find_by_client_report_id(
        &self,
        tenant_id: Uuid,
        client_report_id: &str,
    ) -> anyhow::Result<Option<InspectionReport>> {
        let mut state = self.state.write();
        if state.hidden_report_keys > 0 {
            state.hidden_report_keys -= 1;
            return Ok(None);
        }
        Ok(state
            .reports
            .iter()
            .find(|r| {
                r.tenant_id == tenant_id && r.client_report_id.as_deref() == Some(client_report_id)
            })
            .cloned())
    }

    async fn record(&self, record: &InspectionRecord) -> anyhow::Result<RecordOutcome> {
        let mut state = self.state.write();
        if state.fail_record {
            bail!("injected failure recording report {}", record.report.id);
        }

        if let Some(key) = record.report.client_report_id.as_deref() {
            let taken = state.reports.iter().any(|r| {
                r.tenant_id == record.report.tenant_id && r.client_report_id.as_deref() == Some(key)
            });
            if taken {
                return Ok(RecordOutcome::DuplicateKey);
            }
        }

        // Validate everything before writing, so a failure leaves no trace
        if record.take_out_of_service {
            let owned = state
                .assets
                .get(&record.report.asset_id)
                .is_some_and(|a| a.tenant_id == record.report.tenant_id);
            if !owned {
                bail!("asset {} disappeared", record.report.asset_id);
            }
        }

        state.reports.push(record.report.clone());
        state.answers.extend(record.answers.iter().cloned());
        if let Some(ticket) = &record.ticket {
            state.tickets.insert(ticket.id, ticket.clone());
        }
        if record.take_out_of_service {
            if let Some(asset) = state.assets.get_mut(&record.report.asset_id) {
                asset.operational_status = OperationalStatus::OutOfService;
                asset.updated_at = Utc::now();
            }
        }
        Ok(RecordOutcome::Recorded)
    }
}

#[async_trait]
impl TicketRepository for MockStore {
    async fn create(&self, ticket: &Ticket) -> anyhow::Result<Ticket> {
        self.state.write().tickets.insert(ticket.id, ticket.clone());
        Ok(ticket.clone())
    }

    async fn find_for_tenant(
        &self,
        tenant_id: Uuid,
        ticket_id: Uuid,
    ) -> anyhow::Result<Option<Ticket>> {
        let state = self.state.read();
        Ok(state
            .tickets
            .get(&ticket_id)
            .filter(|t| {
                state
                    .assets
                    .get(&t.asset_id)
                    .is_some_and(|a| a.tenant_id == tenant_id)
            })
            .cloned())
    }

    async fn save_transition(
        &self,
        ticket: &Ticket,
        from: TicketStatus,
    ) -> anyhow::Result<Option<Ticket>> {
        let mut guard = self.state.write();
        let state = &mut *guard;
        let Some(stored) = state.tickets.get_mut(&ticket.id) else {
            bail!("ticket {} does not exist", ticket.id);
        };
        if state.concurrently_resolved.remove(&ticket.id) {
            stored.status = TicketStatus::Resolved;
            stored.resolution_notes = Some("Closed from another session".to_string());
            stored.resolved_at = Some(Utc::now());
        }
        if stored.status != from {
            return Ok(None);
        }
        *stored = ticket.clone();
        Ok(Some(ticket.clone()))
    }
}
