//! HTTP error mapping to RFC-9457 Problem Details

use crate::contract::{MaintenanceError, PREREQUISITE_MISSING_CODE};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// RFC-9457 Problem Details for HTTP API errors
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    /// A URI reference that identifies the problem type
    #[serde(rename = "type")]
    pub type_uri: String,

    /// A short, human-readable summary of the problem type
    pub title: String,

    /// The HTTP status code
    pub status: u16,

    /// A human-readable explanation specific to this occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// A URI reference that identifies the specific occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    /// Machine-readable error code (extension member)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Caller-facing message (extension member)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Onboarding step keys still missing (extension member)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_steps: Option<Vec<String>>,
}

impl Problem {
    /// Create a new Problem Details response
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            type_uri: format!("https://httpstatuses.io/{}", status.as_u16()),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
            code: None,
            message: None,
            missing_steps: None,
        }
    }

    /// Add detail message
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Shorthand for a 400 raised by the HTTP layer itself
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Problem::new(StatusCode::BAD_REQUEST, "Validation Error").with_detail(detail)
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Map domain errors to HTTP Problem Details
pub fn map_domain_error(error: MaintenanceError) -> Problem {
    match error {
        MaintenanceError::Validation { message } => {
            Problem::new(StatusCode::BAD_REQUEST, "Validation Error").with_detail(message)
        }

        MaintenanceError::NotFound { resource, id } => Problem::new(
            StatusCode::NOT_FOUND,
            format!("{} Not Found", resource),
        )
        .with_detail(format!("{} with id '{}' was not found", resource, id)),

        MaintenanceError::PrerequisiteBlocked {
            missing_steps,
            message,
        } => {
            let mut problem = Problem::new(StatusCode::CONFLICT, "Onboarding Prerequisite Missing")
                .with_detail(message.clone())
                .with_code(PREREQUISITE_MISSING_CODE);
            problem.message = Some(message);
            problem.missing_steps = Some(
                missing_steps
                    .into_iter()
                    .map(|step| step.key().to_string())
                    .collect(),
            );
            problem
        }

        MaintenanceError::Conflict { reason } => {
            Problem::new(StatusCode::CONFLICT, "Conflict").with_detail(reason)
        }

        MaintenanceError::Transaction { message } => {
            Problem::new(StatusCode::INTERNAL_SERVER_ERROR, "Transaction Failed")
                .with_detail(message)
        }

        MaintenanceError::Internal => Problem::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
        )
        .with_detail("An unexpected error occurred"),
    }
}
