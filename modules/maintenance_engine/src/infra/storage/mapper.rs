//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models. Stored codes are
//! written in canonical upper-case English; legacy Spanish codes are still
//! accepted when reading.

use super::entity::{
    forklift, inspection_answer, inspection_report, maintenance_ticket, preventive_schedule,
};
use crate::contract::{
    Asset, FrequencyType, InspectionAnswer, InspectionReport, OperationalStatus,
    PreventiveSchedule, Severity, Ticket, TicketPriority, TicketStatus,
};
use anyhow::{anyhow, Result};

/// Stored frequency codes whose due marker is a timestamp
pub const TIME_BASED_FREQUENCY_CODES: [&str; 4] = ["DAYS", "CALENDAR", "DIAS", "CALENDARIO"];

/// Stored frequency codes whose due marker is a meter reading
pub const HOURS_FREQUENCY_CODES: [&str; 2] = ["HOURS", "HORAS"];

// ===== Code parsing =====

pub fn parse_operational_status(code: &str) -> Result<OperationalStatus> {
    match code.trim().to_uppercase().as_str() {
        "OPERATIONAL" | "OPERATIVO" => Ok(OperationalStatus::Operational),
        "MAINTENANCE" | "MANTENIMIENTO" | "EN_MANTENIMIENTO" => Ok(OperationalStatus::Maintenance),
        "OUT_OF_SERVICE" | "FUERA_DE_SERVICIO" => Ok(OperationalStatus::OutOfService),
        other => Err(anyhow!("unknown operational status '{}'", other)),
    }
}

pub fn format_operational_status(status: OperationalStatus) -> &'static str {
    match status {
        OperationalStatus::Operational => "OPERATIONAL",
        OperationalStatus::Maintenance => "MAINTENANCE",
        OperationalStatus::OutOfService => "OUT_OF_SERVICE",
    }
}

pub fn parse_frequency_type(code: &str) -> Result<FrequencyType> {
    match code.trim().to_uppercase().as_str() {
        "DAYS" | "DIAS" => Ok(FrequencyType::Days),
        "HOURS" | "HORAS" => Ok(FrequencyType::Hours),
        "CALENDAR" | "CALENDARIO" => Ok(FrequencyType::Calendar),
        other => Err(anyhow!("unknown frequency type '{}'", other)),
    }
}

pub fn format_frequency_type(frequency_type: FrequencyType) -> &'static str {
    match frequency_type {
        FrequencyType::Days => "DAYS",
        FrequencyType::Hours => "HOURS",
        FrequencyType::Calendar => "CALENDAR",
    }
}

pub fn parse_severity(code: &str) -> Result<Severity> {
    match code.trim().to_uppercase().as_str() {
        "INFO" => Ok(Severity::Info),
        "WARNING" => Ok(Severity::Warning),
        "CRITICAL_STOP" => Ok(Severity::CriticalStop),
        other => Err(anyhow!("unknown question severity '{}'", other)),
    }
}

pub fn parse_ticket_status(code: &str) -> Result<TicketStatus> {
    match code.trim().to_uppercase().as_str() {
        "OPEN" | "ABIERTO" => Ok(TicketStatus::Open),
        "IN_PROGRESS" | "EN_PROGRESO" | "EN_PROCESO" => Ok(TicketStatus::InProgress),
        "RESOLVED" | "RESUELTO" | "CERRADO" => Ok(TicketStatus::Resolved),
        other => Err(anyhow!("unknown ticket status '{}'", other)),
    }
}

/// Every stored code, canonical first, that reads back as `status`
pub fn ticket_status_codes(status: TicketStatus) -> &'static [&'static str] {
    match status {
        TicketStatus::Open => &["OPEN", "ABIERTO"],
        TicketStatus::InProgress => &["IN_PROGRESS", "EN_PROGRESO", "EN_PROCESO"],
        TicketStatus::Resolved => &["RESOLVED", "RESUELTO", "CERRADO"],
    }
}

pub fn format_ticket_status(status: TicketStatus) -> &'static str {
    match status {
        TicketStatus::Open => "OPEN",
        TicketStatus::InProgress => "IN_PROGRESS",
        TicketStatus::Resolved => "RESOLVED",
    }
}

pub fn parse_ticket_priority(code: &str) -> Result<TicketPriority> {
    match code.trim().to_uppercase().as_str() {
        "LOW" | "BAJA" => Ok(TicketPriority::Low),
        "MEDIUM" | "MEDIA" => Ok(TicketPriority::Medium),
        "HIGH" | "ALTA" => Ok(TicketPriority::High),
        other => Err(anyhow!("unknown ticket priority '{}'", other)),
    }
}

pub fn format_ticket_priority(priority: TicketPriority) -> &'static str {
    match priority {
        TicketPriority::Low => "LOW",
        TicketPriority::Medium => "MEDIUM",
        TicketPriority::High => "HIGH",
    }
}

// ===== Asset Conversions =====

impl TryFrom<forklift::Model> for Asset {
    type Error = anyhow::Error;

    fn try_from(entity: forklift::Model) -> Result<Self> {
        Ok(Self {
            id: entity.id,
            tenant_id: entity.tenant_id,
            location_id: entity.location_id,
            name: entity.name,
            serial_number: entity.serial_number,
            operational_status: parse_operational_status(&entity.operational_status)?,
            current_hours: entity.current_hours,
            updated_at: entity.updated_at,
        })
    }
}

// ===== Schedule Conversions =====

impl TryFrom<preventive_schedule::Model> for PreventiveSchedule {
    type Error = anyhow::Error;

    fn try_from(entity: preventive_schedule::Model) -> Result<Self> {
        let frequency_value = u32::try_from(entity.frequency_value)
            .map_err(|_| anyhow!("schedule {} has negative frequency", entity.id))?;

        Ok(Self {
            id: entity.id,
            tenant_id: entity.tenant_id,
            asset_id: entity.asset_id,
            task_name: entity.task_name,
            description: entity.description,
            frequency_type: parse_frequency_type(&entity.frequency_type)?,
            frequency_value,
            next_due_at: entity.next_due_at,
            next_due_hours: entity.next_due_hours,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

impl TryFrom<&PreventiveSchedule> for preventive_schedule::ActiveModel {
    type Error = anyhow::Error;

    fn try_from(model: &PreventiveSchedule) -> Result<Self> {
        use sea_orm::ActiveValue::*;

        let frequency_value = i32::try_from(model.frequency_value)
            .map_err(|_| anyhow!("frequency value {} out of range", model.frequency_value))?;

        Ok(Self {
            id: Set(model.id),
            tenant_id: Set(model.tenant_id),
            asset_id: Set(model.asset_id),
            task_name: Set(model.task_name.clone()),
            description: Set(model.description.clone()),
            frequency_type: Set(format_frequency_type(model.frequency_type).to_string()),
            frequency_value: Set(frequency_value),
            next_due_at: Set(model.next_due_at),
            next_due_hours: Set(model.next_due_hours),
            is_active: Set(model.is_active),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
        })
    }
}

// ===== Inspection Conversions =====

impl From<inspection_report::Model> for InspectionReport {
    fn from(entity: inspection_report::Model) -> Self {
        Self {
            id: entity.id,
            tenant_id: entity.tenant_id,
            asset_id: entity.asset_id,
            template_id: entity.template_id,
            inspector_id: entity.inspector_id,
            client_report_id: entity.client_report_id,
            captured_at: entity.captured_at,
            synced_at: entity.synced_at,
            gps_latitude: entity.gps_latitude,
            gps_longitude: entity.gps_longitude,
            has_critical_failure: entity.has_critical_failure,
        }
    }
}

impl From<&InspectionReport> for inspection_report::ActiveModel {
    fn from(model: &InspectionReport) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            id: Set(model.id),
            tenant_id: Set(model.tenant_id),
            asset_id: Set(model.asset_id),
            template_id: Set(model.template_id),
            inspector_id: Set(model.inspector_id),
            client_report_id: Set(model.client_report_id.clone()),
            captured_at: Set(model.captured_at),
            synced_at: Set(model.synced_at),
            gps_latitude: Set(model.gps_latitude),
            gps_longitude: Set(model.gps_longitude),
            has_critical_failure: Set(model.has_critical_failure),
        }
    }
}

impl From<&InspectionAnswer> for inspection_answer::ActiveModel {
    fn from(model: &InspectionAnswer) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            report_id: Set(model.report_id),
            question_id: Set(model.question_id),
            raw_value: Set(model.raw_value.clone()),
            normalized_value: Set(model.normalized_value.clone()),
            is_failure: Set(model.is_failure),
        }
    }
}

// ===== Ticket Conversions =====

impl TryFrom<maintenance_ticket::Model> for Ticket {
    type Error = anyhow::Error;

    fn try_from(entity: maintenance_ticket::Model) -> Result<Self> {
        Ok(Self {
            id: entity.id,
            asset_id: entity.asset_id,
            report_id: entity.report_id,
            schedule_id: entity.schedule_id,
            created_by: entity.created_by,
            assigned_to: entity.assigned_to,
            description: entity.description,
            priority: parse_ticket_priority(&entity.priority)?,
            status: parse_ticket_status(&entity.status)?,
            resolution_notes: entity.resolution_notes,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            resolved_at: entity.resolved_at,
        })
    }
}

impl From<&Ticket> for maintenance_ticket::ActiveModel {
    fn from(model: &Ticket) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            id: Set(model.id),
            asset_id: Set(model.asset_id),
            report_id: Set(model.report_id),
            schedule_id: Set(model.schedule_id),
            created_by: Set(model.created_by),
            assigned_to: Set(model.assigned_to),
            description: Set(model.description.clone()),
            priority: Set(format_ticket_priority(model.priority).to_string()),
            status: Set(format_ticket_status(model.status).to_string()),
            resolution_notes: Set(model.resolution_notes.clone()),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
            resolved_at: Set(model.resolved_at),
        }
    }
}
