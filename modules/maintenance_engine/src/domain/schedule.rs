//! Preventive schedule due math
//!
//! Due markers only move forward, one `frequency_value` step at a time.

use crate::contract::{FrequencyType, PreventiveSchedule};
use chrono::{DateTime, Duration, Utc};

/// Checkpoint recorded for HOURS schedules; never re-derived from usage
pub const HOURS_FALLBACK_CHECKPOINT_DAYS: i64 = 365;

/// Initial due markers `(next_due_at, next_due_hours)` for a new schedule
pub fn initial_due(
    frequency_type: FrequencyType,
    frequency_value: u32,
    now: DateTime<Utc>,
    asset_hours: Option<f64>,
) -> (Option<DateTime<Utc>>, Option<f64>) {
    match frequency_type {
        FrequencyType::Days | FrequencyType::Calendar => {
            (Some(now + Duration::days(i64::from(frequency_value))), None)
        }
        FrequencyType::Hours => (
            Some(now + Duration::days(HOURS_FALLBACK_CHECKPOINT_DAYS)),
            Some(asset_hours.unwrap_or(0.0) + f64::from(frequency_value)),
        ),
    }
}

/// Whether an active schedule must fire now
pub fn is_due(schedule: &PreventiveSchedule, asset_hours: Option<f64>, now: DateTime<Utc>) -> bool {
    if !schedule.is_active {
        return false;
    }
    match schedule.frequency_type {
        FrequencyType::Days | FrequencyType::Calendar => {
            schedule.next_due_at.is_some_and(|due| due <= now)
        }
        FrequencyType::Hours => match (asset_hours, schedule.next_due_hours) {
            (Some(hours), Some(threshold)) => hours >= threshold,
            _ => false,
        },
    }
}

/// Conditional advance of a due marker: applies only if the stored marker
/// still equals `expected`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DueAdvance {
    At {
        expected: DateTime<Utc>,
        next: DateTime<Utc>,
    },
    Hours {
        expected: f64,
        next: f64,
    },
}

/// Exactly one step forward from the stored marker
pub fn next_advance(schedule: &PreventiveSchedule) -> Option<DueAdvance> {
    let step = schedule.frequency_value;
    match schedule.frequency_type {
        FrequencyType::Days | FrequencyType::Calendar => {
            schedule.next_due_at.map(|expected| DueAdvance::At {
                expected,
                next: expected + Duration::days(i64::from(step)),
            })
        }
        FrequencyType::Hours => schedule.next_due_hours.map(|expected| DueAdvance::Hours {
            expected,
            next: expected + f64::from(step),
        }),
    }
}

pub fn ticket_description(schedule: &PreventiveSchedule) -> String {
    match schedule.description.as_deref().map(str::trim) {
        Some(details) if !details.is_empty() => {
            format!("Preventive maintenance due: {} - {}", schedule.task_name, details)
        }
        _ => format!("Preventive maintenance due: {}", schedule.task_name),
    }
}
