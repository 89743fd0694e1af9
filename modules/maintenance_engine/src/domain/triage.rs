//! Inspection triage: answer normalization and severity classification

use crate::contract::{Severity, TicketPriority};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

/// Normalized answers that count as a failed check
const FAILURE_VALUES: [&str; 5] = ["NO", "FAIL", "FAILED", "FALSE", "0"];

/// Booleans become `TRUE`/`FALSE`; everything else is stringified, trimmed
/// and upper-cased
pub fn normalize_answer(value: &Value) -> String {
    match value {
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::String(s) => s.trim().to_uppercase(),
        Value::Number(n) => match n.as_f64() {
            // Integral floats read as their integer form: 0.0 is "0"
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => {
                (f as i64).to_string()
            }
            _ => n.to_string(),
        },
        other => other.to_string().trim().to_uppercase(),
    }
}

pub fn is_failure(normalized: &str) -> bool {
    FAILURE_VALUES.contains(&normalized)
}

/// Result of classifying the failing answers of one report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Triage {
    pub critical_failures: usize,
    pub warning_failures: usize,
    /// Caller asserted a critical failure regardless of answers
    pub flagged_critical: bool,
}

impl Triage {
    /// Classify failing questions by their looked-up severity; unknown
    /// questions count as INFO
    pub fn classify(
        failing: &[Uuid],
        severities: &HashMap<Uuid, Severity>,
        critical_flag: Option<bool>,
    ) -> Self {
        let mut triage = Self {
            flagged_critical: critical_flag.unwrap_or(false),
            ..Self::default()
        };
        for question_id in failing {
            match severities.get(question_id) {
                Some(Severity::CriticalStop) => triage.critical_failures += 1,
                Some(Severity::Warning) => triage.warning_failures += 1,
                Some(Severity::Info) | None => {}
            }
        }
        triage
    }

    pub fn is_critical(&self) -> bool {
        self.flagged_critical || self.critical_failures > 0
    }

    pub fn has_warning(&self) -> bool {
        self.warning_failures > 0
    }

    /// Priority and description of the ticket this triage opens, if any
    pub fn ticket(&self) -> Option<(TicketPriority, String)> {
        if self.critical_failures > 0 {
            Some((
                TicketPriority::High,
                format!(
                    "Critical failure detected during inspection: {} critical item(s) failed",
                    self.critical_failures
                ),
            ))
        } else if self.flagged_critical {
            Some((
                TicketPriority::High,
                "Critical failure reported by inspector".to_string(),
            ))
        } else if self.has_warning() {
            Some((
                TicketPriority::Medium,
                format!(
                    "Inspection warning: {} item(s) require attention",
                    self.warning_failures
                ),
            ))
        } else {
            None
        }
    }
}
