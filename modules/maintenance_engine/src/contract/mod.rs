//! Contract layer - public API for inter-module communication
//!
//! This layer contains transport-agnostic models and the native client trait.

pub mod client;
pub mod error;
pub mod model;

pub use client::MaintenanceApi;
pub use error::{MaintenanceError, PREREQUISITE_MISSING_CODE};
pub use model::{
    Asset, AssetPatch, FrequencyType, InspectionAnswer, InspectionReport, NewSchedule, NewTicket,
    OnboardingCounts, OnboardingStatus, OnboardingStep, OperationalStatus, PreventiveSchedule,
    ScanReport, SchedulePatch, Severity, StepStatus, SyncInspection, SyncReceipt, Ticket,
    TicketPriority, TicketStatus,
};
