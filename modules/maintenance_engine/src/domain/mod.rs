//! Domain layer - business logic and services

pub mod onboarding;
pub mod repository;
pub mod schedule;
pub mod service;
pub mod ticket;
pub mod triage;
pub mod validation;

pub use onboarding::{ReadinessConfig, RoleGroup};
pub use repository::{
    AssetRepository, InspectionRepository, OnboardingRepository, ScheduleRepository,
    TicketRepository, UserRepository,
};
pub use service::{Repositories, Service};
