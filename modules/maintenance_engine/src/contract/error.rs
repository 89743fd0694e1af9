//! Contract error types for the maintenance engine
//!
//! These errors are transport-agnostic and used for inter-module communication.

use super::model::OnboardingStep;
use thiserror::Error;

/// Code attached to every onboarding gate conflict
pub const PREREQUISITE_MISSING_CODE: &str = "ONBOARDING_PREREQUISITE_MISSING";

/// Maintenance engine domain errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaintenanceError {
    /// Missing or malformed input
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Referenced entity does not exist or is owned by another tenant
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    /// Onboarding gate failed
    #[error("{message}")]
    PrerequisiteBlocked {
        /// Missing steps in chain order
        missing_steps: Vec<OnboardingStep>,
        message: String,
    },

    /// State transition not allowed
    #[error("Conflict: {reason}")]
    Conflict { reason: String },

    /// A multi-statement unit of work failed and was rolled back
    #[error("Transaction failed: {message}")]
    Transaction { message: String },

    #[error("Internal error")]
    Internal,
}

impl MaintenanceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: impl ToString) -> Self {
        Self::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict {
            reason: reason.into(),
        }
    }
}
