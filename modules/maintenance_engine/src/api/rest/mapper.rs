//! Mapper implementations for converting between DTOs and contract models
//!
//! This module contains all From/Into implementations for bidirectional
//! conversion between REST DTOs and transport-agnostic contract models.

use super::dto::*;
use crate::contract;
use chrono::Utc;

// ===== Onboarding conversions =====

impl From<contract::OnboardingStatus> for OnboardingStatusDto {
    fn from(status: contract::OnboardingStatus) -> Self {
        Self {
            tenant_id: status.tenant_id,
            all_steps_ready: status.all_steps_ready,
            steps: status.steps.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<contract::StepStatus> for StepStatusDto {
    fn from(step: contract::StepStatus) -> Self {
        Self {
            key: step.step.key().to_string(),
            label: step.label,
            completed: step.completed,
            can_create: step.can_create,
            blocked_by: step
                .blocked_by
                .into_iter()
                .map(|s| s.key().to_string())
                .collect(),
        }
    }
}

// ===== Asset conversions =====

impl From<contract::OperationalStatus> for OperationalStatusDto {
    fn from(status: contract::OperationalStatus) -> Self {
        match status {
            contract::OperationalStatus::Operational => Self::Operational,
            contract::OperationalStatus::Maintenance => Self::Maintenance,
            contract::OperationalStatus::OutOfService => Self::OutOfService,
        }
    }
}

impl From<OperationalStatusDto> for contract::OperationalStatus {
    fn from(dto: OperationalStatusDto) -> Self {
        match dto {
            OperationalStatusDto::Operational => Self::Operational,
            OperationalStatusDto::Maintenance => Self::Maintenance,
            OperationalStatusDto::OutOfService => Self::OutOfService,
        }
    }
}

impl From<contract::Asset> for AssetDto {
    fn from(asset: contract::Asset) -> Self {
        Self {
            id: asset.id,
            tenant_id: asset.tenant_id,
            location_id: asset.location_id,
            name: asset.name,
            serial_number: asset.serial_number,
            operational_status: asset.operational_status.into(),
            current_hours: asset.current_hours,
            updated_at: asset.updated_at,
        }
    }
}

impl From<UpdateAssetRequest> for contract::AssetPatch {
    fn from(req: UpdateAssetRequest) -> Self {
        Self {
            operational_status: req.operational_status.map(Into::into),
            current_hours: req.current_hours,
        }
    }
}

// ===== Schedule conversions =====

impl From<contract::FrequencyType> for FrequencyTypeDto {
    fn from(frequency_type: contract::FrequencyType) -> Self {
        match frequency_type {
            contract::FrequencyType::Days => Self::Days,
            contract::FrequencyType::Hours => Self::Hours,
            contract::FrequencyType::Calendar => Self::Calendar,
        }
    }
}

impl From<FrequencyTypeDto> for contract::FrequencyType {
    fn from(dto: FrequencyTypeDto) -> Self {
        match dto {
            FrequencyTypeDto::Days => Self::Days,
            FrequencyTypeDto::Hours => Self::Hours,
            FrequencyTypeDto::Calendar => Self::Calendar,
        }
    }
}

impl From<contract::PreventiveSchedule> for ScheduleDto {
    fn from(schedule: contract::PreventiveSchedule) -> Self {
        Self {
            id: schedule.id,
            tenant_id: schedule.tenant_id,
            asset_id: schedule.asset_id,
            task_name: schedule.task_name,
            description: schedule.description,
            frequency_type: schedule.frequency_type.into(),
            frequency_value: schedule.frequency_value,
            next_due_at: schedule.next_due_at,
            next_due_hours: schedule.next_due_hours,
            is_active: schedule.is_active,
            created_at: schedule.created_at,
            updated_at: schedule.updated_at,
        }
    }
}

impl From<CreateScheduleRequest> for contract::NewSchedule {
    fn from(req: CreateScheduleRequest) -> Self {
        Self {
            asset_id: req.asset_id,
            task_name: req.task_name,
            description: req.description,
            frequency_type: req.frequency_type.into(),
            frequency_value: req.frequency_value,
        }
    }
}

impl From<UpdateScheduleRequest> for contract::SchedulePatch {
    fn from(req: UpdateScheduleRequest) -> Self {
        Self {
            task_name: req.task_name,
            description: req.description,
            frequency_value: req.frequency_value,
            is_active: req.is_active,
        }
    }
}

// ===== Inspection conversions =====

impl From<SyncInspectionRequest> for contract::SyncInspection {
    fn from(req: SyncInspectionRequest) -> Self {
        Self {
            asset_id: req.asset_id,
            template_id: req.template_id,
            answers: req.answers,
            critical_flag: req.critical_flag,
            captured_at: req.captured_at.unwrap_or_else(Utc::now),
            gps_latitude: req.gps_latitude,
            gps_longitude: req.gps_longitude,
            client_report_id: req.client_report_id,
        }
    }
}

impl From<contract::SyncReceipt> for SyncInspectionResponse {
    fn from(receipt: contract::SyncReceipt) -> Self {
        Self {
            report_id: receipt.report_id,
            synced_at: receipt.synced_at,
        }
    }
}

// ===== Ticket conversions =====

impl From<contract::TicketStatus> for TicketStatusDto {
    fn from(status: contract::TicketStatus) -> Self {
        match status {
            contract::TicketStatus::Open => Self::Open,
            contract::TicketStatus::InProgress => Self::InProgress,
            contract::TicketStatus::Resolved => Self::Resolved,
        }
    }
}

impl From<contract::TicketPriority> for TicketPriorityDto {
    fn from(priority: contract::TicketPriority) -> Self {
        match priority {
            contract::TicketPriority::Low => Self::Low,
            contract::TicketPriority::Medium => Self::Medium,
            contract::TicketPriority::High => Self::High,
        }
    }
}

impl From<TicketPriorityDto> for contract::TicketPriority {
    fn from(dto: TicketPriorityDto) -> Self {
        match dto {
            TicketPriorityDto::Low => Self::Low,
            TicketPriorityDto::Medium => Self::Medium,
            TicketPriorityDto::High => Self::High,
        }
    }
}

impl From<contract::Ticket> for TicketDto {
    fn from(ticket: contract::Ticket) -> Self {
        Self {
            id: ticket.id,
            asset_id: ticket.asset_id,
            report_id: ticket.report_id,
            schedule_id: ticket.schedule_id,
            created_by: ticket.created_by,
            assigned_to: ticket.assigned_to,
            description: ticket.description,
            priority: ticket.priority.into(),
            status: ticket.status.into(),
            resolution_notes: ticket.resolution_notes,
            created_at: ticket.created_at,
            updated_at: ticket.updated_at,
            resolved_at: ticket.resolved_at,
        }
    }
}

impl From<CreateTicketRequest> for contract::NewTicket {
    fn from(req: CreateTicketRequest) -> Self {
        Self {
            asset_id: req.asset_id,
            description: req.description,
            priority: req.priority.into(),
        }
    }
}
