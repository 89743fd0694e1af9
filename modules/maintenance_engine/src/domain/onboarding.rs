//! Onboarding readiness resolver
//!
//! Pure function of fresh per-tenant counts. Every step has its own completion
//! predicate; `blocked_by` is derived afterwards from the completion map, so a
//! step's status never depends on evaluation order.

use crate::contract::{
    MaintenanceError, OnboardingCounts, OnboardingStatus, OnboardingStep, StepStatus,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// A role group is covered once any of its equivalent labels has an active user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGroup {
    pub name: String,
    pub roles: Vec<String>,
}

impl RoleGroup {
    fn new(name: &str, roles: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }
}

/// Step labels and role-group equivalences used by the resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReadinessConfig {
    /// Label overrides keyed by step key
    #[serde(default)]
    pub labels: BTreeMap<String, String>,

    #[serde(default = "default_role_groups")]
    pub role_groups: Vec<RoleGroup>,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            labels: BTreeMap::new(),
            role_groups: default_role_groups(),
        }
    }
}

fn default_role_groups() -> Vec<RoleGroup> {
    vec![
        RoleGroup::new("admin", &["ADMIN", "ADMINISTRADOR", "SUPERADMIN"]),
        RoleGroup::new("client", &["CLIENTE", "CLIENT", "CLIENTE_ADMIN"]),
        RoleGroup::new("technician", &["TECNICO", "TECHNICIAN"]),
        RoleGroup::new("operator", &["OPERADOR", "OPERATOR"]),
    ]
}

fn default_label(step: OnboardingStep) -> &'static str {
    match step {
        OnboardingStep::Tenant => "Client company",
        OnboardingStep::Users => "Users",
        OnboardingStep::Locations => "Locations",
        OnboardingStep::Forklifts => "Forklifts",
        OnboardingStep::ServiceContracts => "Service contracts",
        OnboardingStep::Slas => "SLA definitions",
        OnboardingStep::Checklists => "Inspection checklists",
        OnboardingStep::PreventiveSchedules => "Preventive schedules",
    }
}

impl ReadinessConfig {
    pub fn label(&self, step: OnboardingStep) -> String {
        self.labels
            .get(step.key())
            .cloned()
            .unwrap_or_else(|| default_label(step).to_string())
    }

    /// Reject label overrides for keys outside the chain
    pub fn validate(&self) -> Result<(), String> {
        if let Some(key) = self
            .labels
            .keys()
            .find(|key| OnboardingStep::from_key(key).is_none())
        {
            return Err(format!("unknown onboarding step in labels: '{}'", key));
        }
        if let Some(group) = self.role_groups.iter().find(|g| g.roles.is_empty()) {
            return Err(format!("role group '{}' lists no roles", group.name));
        }
        Ok(())
    }

    fn roles_covered(&self, active_users_by_role: &BTreeMap<String, u64>) -> bool {
        let mut by_label: HashMap<String, u64> = HashMap::new();
        for (role, count) in active_users_by_role {
            *by_label.entry(role.trim().to_uppercase()).or_default() += count;
        }

        self.role_groups.iter().all(|group| {
            group.roles.iter().any(|role| {
                by_label
                    .get(&role.trim().to_uppercase())
                    .is_some_and(|count| *count > 0)
            })
        })
    }
}

fn is_completed(step: OnboardingStep, counts: &OnboardingCounts, config: &ReadinessConfig) -> bool {
    match step {
        OnboardingStep::Tenant => counts.tenant_exists,
        OnboardingStep::Users => config.roles_covered(&counts.active_users_by_role),
        OnboardingStep::Locations => counts.locations > 0,
        OnboardingStep::Forklifts => counts.forklifts > 0,
        OnboardingStep::ServiceContracts => counts.service_contracts > 0,
        OnboardingStep::Slas => counts.slas > 0,
        OnboardingStep::Checklists => {
            counts.checklist_templates > 0 && counts.checklist_questions > 0
        }
        OnboardingStep::PreventiveSchedules => counts.active_schedules > 0,
    }
}

/// Compute the status of every step from one snapshot of counts
pub fn resolve(
    tenant_id: Uuid,
    counts: &OnboardingCounts,
    config: &ReadinessConfig,
) -> OnboardingStatus {
    let completed: HashMap<OnboardingStep, bool> = OnboardingStep::ALL
        .into_iter()
        .map(|step| (step, is_completed(step, counts, config)))
        .collect();

    let steps: Vec<StepStatus> = OnboardingStep::ALL
        .into_iter()
        .map(|step| {
            let blocked_by: Vec<OnboardingStep> = step
                .prerequisites()
                .iter()
                .copied()
                .filter(|prereq| !completed.get(prereq).copied().unwrap_or(false))
                .collect();

            StepStatus {
                step,
                label: config.label(step),
                completed: completed.get(&step).copied().unwrap_or(false),
                can_create: blocked_by.is_empty(),
                blocked_by,
            }
        })
        .collect();

    OnboardingStatus {
        tenant_id,
        all_steps_ready: steps.iter().all(|s| s.completed),
        steps,
    }
}

/// Gate check against an already-resolved status
pub fn check_gate(
    status: &OnboardingStatus,
    target: OnboardingStep,
    config: &ReadinessConfig,
) -> Result<(), MaintenanceError> {
    let missing: Vec<OnboardingStep> = status
        .step(target)
        .map(|s| s.blocked_by.clone())
        .unwrap_or_default();

    if missing.is_empty() {
        return Ok(());
    }

    let labels: Vec<String> = missing.iter().map(|step| config.label(*step)).collect();
    Err(MaintenanceError::PrerequisiteBlocked {
        message: format!(
            "Complete the following onboarding steps first: {}",
            labels.join(", ")
        ),
        missing_steps: missing,
    })
}
