//! DTOs for health check endpoint.

use serde::Serialize;
use serde_with::skip_serializing_none;

/// Health check response with component status.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
}

/// Health status for each system component.
///
/// Components a service does not use are omitted.
#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub database: CheckStatus,
    pub cache: Option<CheckStatus>,
    pub event_bus: Option<CheckStatus>,
}

impl HealthChecks {
    pub fn all_healthy(&self) -> bool {
        self.database.is_healthy()
            && self.cache.as_ref().is_none_or(CheckStatus::is_healthy)
            && self.event_bus.as_ref().is_none_or(CheckStatus::is_healthy)
    }
}

/// Individual component health status.
///
/// `disabled` counts as healthy: the component is optional and the service
/// runs without it.
#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct CheckStatus {
    pub status: String,
    pub message: Option<String>,
}

impl CheckStatus {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.into()),
        }
    }

    pub fn disabled() -> Self {
        Self {
            status: "disabled".to_string(),
            message: None,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status != "error"
    }
}
