//! API request/response models.

use chrono::Utc;
use serde::{Deserialize, Serialize};

pub const SERVICE_NAME: &str = "PHAROS Laser Virtual Clone";
pub const API_VERSION: &str = "1.0.0";
pub const API_BASE: &str = "/v1";

/// Body returned by every successful action or setter.
#[derive(Debug, Serialize, Deserialize)]
pub struct ActionResponse {
    pub status: String,
    pub message: String,
}

impl ActionResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
        }
    }
}

/// Error envelope matching the device API.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code,
                message: message.into(),
                timestamp: Utc::now().to_rfc3339(),
            },
        }
    }
}

/// JSON served at `/` when no HTML documentation is available.
#[derive(Debug, Serialize, Deserialize)]
pub struct RootFallbackResponse {
    pub message: String,
    pub version: String,
    pub api_base: String,
    pub documentation: String,
    pub status: String,
    pub laser_state: String,
    pub note: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InfoResponse {
    pub message: String,
    pub version: String,
    pub api_base: String,
    pub documentation: String,
    pub original_api_docs: String,
    pub health_check: String,
    pub status: String,
    pub laser_state: String,
    pub output_enabled: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    /// Seconds since the last state transition
    pub uptime_seconds: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RawInfoResponse {
    pub message: String,
    pub available_functions: Vec<String>,
    pub warning: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WrapperExecutionResponse {
    pub status: String,
    pub function: String,
    pub result: String,
    pub timestamp: String,
    pub warning: String,
}

/// Route listing served at `/docs`.
#[derive(Debug, Serialize, Deserialize)]
pub struct DocsResponse {
    pub title: String,
    pub version: String,
    pub api_base: String,
    pub routes: Vec<RouteDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteDoc {
    pub method: String,
    pub path: String,
    pub description: String,
}
