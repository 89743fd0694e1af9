//! Input validation for engine operations

use crate::contract::{
    AssetPatch, FrequencyType, MaintenanceError, NewSchedule, NewTicket, SchedulePatch,
    SyncInspection,
};

/// Maximum length of a caller-supplied report key
pub const MAX_CLIENT_REPORT_ID_LEN: usize = 128;

pub fn validate_new_schedule(params: &NewSchedule) -> Result<(), MaintenanceError> {
    if params.task_name.trim().is_empty() {
        return Err(MaintenanceError::validation("task_name cannot be empty"));
    }
    if params.frequency_value == 0 {
        return Err(MaintenanceError::validation(
            "frequency_value must be a positive number",
        ));
    }
    if params.frequency_type == FrequencyType::Hours && params.asset_id.is_none() {
        return Err(MaintenanceError::validation(
            "asset_id is required for HOURS schedules",
        ));
    }
    Ok(())
}

pub fn validate_schedule_patch(patch: &SchedulePatch) -> Result<(), MaintenanceError> {
    if patch.is_empty() {
        return Err(MaintenanceError::validation("no fields to update"));
    }
    if patch.task_name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(MaintenanceError::validation("task_name cannot be empty"));
    }
    if patch.frequency_value == Some(0) {
        return Err(MaintenanceError::validation(
            "frequency_value must be a positive number",
        ));
    }
    Ok(())
}

pub fn validate_asset_patch(patch: &AssetPatch) -> Result<(), MaintenanceError> {
    if patch.is_empty() {
        return Err(MaintenanceError::validation("no fields to update"));
    }
    if let Some(hours) = patch.current_hours {
        if !hours.is_finite() || hours < 0.0 {
            return Err(MaintenanceError::validation(format!(
                "current_hours must be a non-negative number, got {}",
                hours
            )));
        }
    }
    Ok(())
}

pub fn validate_new_ticket(ticket: &NewTicket) -> Result<(), MaintenanceError> {
    if ticket.description.trim().is_empty() {
        return Err(MaintenanceError::validation("description cannot be empty"));
    }
    Ok(())
}

pub fn validate_sync(
    inspection: &SyncInspection,
    max_answers: usize,
) -> Result<(), MaintenanceError> {
    if inspection.answers.is_empty() {
        return Err(MaintenanceError::validation("answers cannot be empty"));
    }
    if inspection.answers.len() > max_answers {
        return Err(MaintenanceError::validation(format!(
            "too many answers: {} (max {})",
            inspection.answers.len(),
            max_answers
        )));
    }
    if let Some(lat) = inspection.gps_latitude {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(MaintenanceError::validation(format!(
                "gps_latitude out of range: {}",
                lat
            )));
        }
    }
    if let Some(lon) = inspection.gps_longitude {
        if !(-180.0..=180.0).contains(&lon) {
            return Err(MaintenanceError::validation(format!(
                "gps_longitude out of range: {}",
                lon
            )));
        }
    }
    if let Some(key) = &inspection.client_report_id {
        if key.trim().is_empty() || key.len() > MAX_CLIENT_REPORT_ID_LEN {
            return Err(MaintenanceError::validation(format!(
                "client_report_id must be 1-{} characters",
                MAX_CLIENT_REPORT_ID_LEN
            )));
        }
    }
    Ok(())
}
