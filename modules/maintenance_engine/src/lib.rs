//! Maintenance Engine Module
//!
//! Workflow core of a multi-tenant maintenance backend: onboarding
//! readiness gates, preventive schedules that open tickets when due, and
//! inspection triage that opens tickets and takes assets out of service.

// Public exports
pub mod contract;
pub use contract::{
    client::MaintenanceApi, error::MaintenanceError, Asset, AssetPatch, FrequencyType,
    NewSchedule, NewTicket, OnboardingStatus, OnboardingStep, PreventiveSchedule, ScanReport,
    SchedulePatch, SyncInspection, SyncReceipt, Ticket, TicketPriority, TicketStatus,
};

pub mod config;
pub use config::{AppConfig, Config};

pub mod module;
pub use module::MaintenanceEngineModule;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
