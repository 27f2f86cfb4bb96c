//! HTTP request handlers for the laser API.

use crate::api::models::*;
use crate::api::body;
use crate::api::routes::ROUTE_TABLE;
use crate::error::{LaserError, LaserResult};
use crate::format::format_decimal;
use crate::laser::{AdvancedSnapshot, BasicSnapshot, VirtualLaser, WarningEntry};
use crate::preset::Preset;
use crate::shared::SharedLaser;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use observability::ServerMetrics;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Error half of every handler result.
pub type ApiError = (StatusCode, Json<ErrorResponse>);
pub type ApiResult<T> = Result<T, ApiError>;

/// Shared state for laser API handlers.
pub struct LaserApiState {
    pub laser: SharedLaser,
    /// HTML page served at `/`, if any
    pub docs_path: Option<PathBuf>,
    pub metrics: ServerMetrics,
}

impl LaserApiState {
    pub fn new(laser: SharedLaser) -> Self {
        Self {
            laser,
            docs_path: None,
            metrics: ServerMetrics::new("laser-http"),
        }
    }

    pub fn with_docs(mut self, path: impl Into<PathBuf>) -> Self {
        self.docs_path = Some(path.into());
        self
    }

    fn act(
        &self,
        operation: &'static str,
        f: impl FnOnce(&mut VirtualLaser) -> LaserResult<()>,
        message: String,
    ) -> ApiResult<Json<ActionResponse>> {
        match self.laser.write(|l| f(l).map(|()| l.state())) {
            Ok(state) => {
                info!(operation, %state, "{}", message);
                Ok(Json(ActionResponse::success(message)))
            }
            Err(e) => Err(rejected(operation, e)),
        }
    }
}

pub fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse::new(status.as_u16(), message)))
}

fn status_for(err: &LaserError) -> StatusCode {
    if err.is_state_conflict() {
        StatusCode::FORBIDDEN
    } else {
        StatusCode::BAD_REQUEST
    }
}

fn rejected(operation: &'static str, err: LaserError) -> ApiError {
    let status = status_for(&err);
    warn!(operation, status = status.as_u16(), error = %err, "Request rejected");
    api_error(status, err.to_string())
}

// ============================================================================
// /v1/Basic
// ============================================================================

/// GET /v1/Basic
pub async fn basic_properties(State(state): State<Arc<LaserApiState>>) -> Json<BasicSnapshot> {
    Json(state.laser.read(|l| l.basic_snapshot()))
}

/// GET /v1/Basic/ActualAttenuatorPercentage
pub async fn actual_attenuator_percentage(State(state): State<Arc<LaserApiState>>) -> Json<String> {
    Json(format_decimal(
        state.laser.read(|l| l.parameters().actual_attenuator_percentage()),
    ))
}

/// GET /v1/Basic/ActualHarmonic
pub async fn actual_harmonic(State(state): State<Arc<LaserApiState>>) -> Json<String> {
    Json(state.laser.read(|l| l.parameters().actual_harmonic()).to_string())
}

/// GET /v1/Basic/ActualOutputEnergy
pub async fn actual_output_energy(State(state): State<Arc<LaserApiState>>) -> Json<String> {
    Json(format_decimal(state.laser.read(|l| l.output_energy_uj())))
}

/// GET /v1/Basic/ActualOutputFrequency
pub async fn actual_output_frequency(State(state): State<Arc<LaserApiState>>) -> Json<String> {
    Json(format_decimal(state.laser.read(|l| l.output_frequency_khz())))
}

/// GET /v1/Basic/ActualOutputPower
pub async fn actual_output_power(State(state): State<Arc<LaserApiState>>) -> Json<String> {
    Json(format_decimal(state.laser.read(|l| l.output_power_w())))
}

/// GET /v1/Basic/ActualPpDivider
pub async fn actual_pp_divider(State(state): State<Arc<LaserApiState>>) -> Json<String> {
    Json(state.laser.read(|l| l.parameters().actual_pp_divider()).to_string())
}

/// GET /v1/Basic/ActualRaFrequency
pub async fn actual_ra_frequency(State(state): State<Arc<LaserApiState>>) -> Json<String> {
    Json(format_decimal(state.laser.read(|l| l.parameters().ra_frequency_khz())))
}

/// GET /v1/Basic/ActualRaPower
pub async fn actual_ra_power(State(state): State<Arc<LaserApiState>>) -> Json<String> {
    Json(format_decimal(state.laser.read(|l| l.parameters().ra_power_w())))
}

/// GET /v1/Basic/ActualStateName and /v1/Basic/ActualStateName2
pub async fn actual_state_name(State(state): State<Arc<LaserApiState>>) -> Json<&'static str> {
    Json(state.laser.read(|l| l.state().as_wire_str()))
}

/// GET /v1/Basic/Errors
pub async fn errors(State(state): State<Arc<LaserApiState>>) -> Json<Vec<WarningEntry>> {
    Json(state.laser.read(|l| l.errors().to_vec()))
}

/// GET /v1/Basic/Warnings
pub async fn warnings(State(state): State<Arc<LaserApiState>>) -> Json<Vec<WarningEntry>> {
    Json(state.laser.read(|l| l.warnings().to_vec()))
}

/// GET /v1/Basic/GeneralStatus
pub async fn general_status(State(state): State<Arc<LaserApiState>>) -> Json<&'static str> {
    Json(state.laser.read(|l| l.machine().general_status().as_str()))
}

/// GET /v1/Basic/IsOutputEnabled
pub async fn is_output_enabled(State(state): State<Arc<LaserApiState>>) -> Json<bool> {
    Json(state.laser.read(|l| l.is_output_enabled()))
}

/// GET /v1/Basic/SelectedPresetIndex
pub async fn selected_preset_index(State(state): State<Arc<LaserApiState>>) -> Json<String> {
    Json(state.laser.read(|l| l.selected_preset_index()).to_string())
}

/// GET /v1/Basic/TargetAttenuatorPercentage
pub async fn target_attenuator_percentage(State(state): State<Arc<LaserApiState>>) -> Json<String> {
    Json(format_decimal(
        state.laser.read(|l| l.parameters().target_attenuator_percentage()),
    ))
}

/// GET /v1/Basic/TargetPpDivider
pub async fn target_pp_divider(State(state): State<Arc<LaserApiState>>) -> Json<String> {
    Json(state.laser.read(|l| l.parameters().target_pp_divider()).to_string())
}

/// POST /v1/Basic/ApplySelectedPreset
pub async fn apply_selected_preset(
    State(state): State<Arc<LaserApiState>>,
) -> ApiResult<Json<ActionResponse>> {
    state.act(
        "ApplySelectedPreset",
        |l| l.apply_selected_preset(),
        "Preset applied successfully".to_string(),
    )
}

/// POST /v1/Basic/CloseOutput
pub async fn close_output(State(state): State<Arc<LaserApiState>>) -> ApiResult<Json<ActionResponse>> {
    state.act(
        "CloseOutput",
        |l| {
            l.close_output();
            Ok(())
        },
        "Output closed successfully".to_string(),
    )
}

/// POST /v1/Basic/EnableOutput
pub async fn enable_output(State(state): State<Arc<LaserApiState>>) -> ApiResult<Json<ActionResponse>> {
    state.act(
        "EnableOutput",
        |l| l.enable_output(),
        "Output enabled successfully".to_string(),
    )
}

/// POST /v1/Basic/GoToStandby
pub async fn go_to_standby(State(state): State<Arc<LaserApiState>>) -> ApiResult<Json<ActionResponse>> {
    state.act(
        "GoToStandby",
        |l| {
            l.go_to_standby();
            Ok(())
        },
        "Transitioned to standby successfully".to_string(),
    )
}

/// POST /v1/Basic/TurnOff
pub async fn turn_off(State(state): State<Arc<LaserApiState>>) -> ApiResult<Json<ActionResponse>> {
    state.act(
        "TurnOff",
        |l| l.turn_off(),
        "Laser turned off successfully".to_string(),
    )
}

/// POST /v1/Basic/TurnOn
pub async fn turn_on(State(state): State<Arc<LaserApiState>>) -> ApiResult<Json<ActionResponse>> {
    state.act(
        "TurnOn",
        |l| l.turn_on(),
        "Laser turned on successfully".to_string(),
    )
}

/// PUT /v1/Basic/SelectedPresetIndex
pub async fn set_selected_preset_index(
    State(state): State<Arc<LaserApiState>>,
    payload: Bytes,
) -> ApiResult<Json<ActionResponse>> {
    let operation = "SetSelectedPresetIndex";
    let index = body::parse_preset_index(&payload).map_err(|e| rejected(operation, e))?;
    // Negative indices fall through to the range check.
    let slot = usize::try_from(index).unwrap_or(usize::MAX);
    state.act(
        operation,
        |l| l.select_preset(slot),
        format!("Preset index set to {index}"),
    )
}

/// PUT /v1/Basic/TargetAttenuatorPercentage
pub async fn set_target_attenuator_percentage(
    State(state): State<Arc<LaserApiState>>,
    payload: Bytes,
) -> ApiResult<Json<ActionResponse>> {
    let operation = "SetTargetAttenuatorPercentage";
    let percentage =
        body::parse_attenuator_percentage(&payload).map_err(|e| rejected(operation, e))?;
    state.act(
        operation,
        |l| l.set_attenuator_percentage(percentage),
        format!("Attenuator percentage set to {percentage:?}%"),
    )
}

/// PUT /v1/Basic/TargetPpDivider
pub async fn set_target_pp_divider(
    State(state): State<Arc<LaserApiState>>,
    payload: Bytes,
) -> ApiResult<Json<ActionResponse>> {
    let operation = "SetTargetPpDivider";
    let divider = body::parse_pp_divider(&payload).map_err(|e| rejected(operation, e))?;
    state.act(
        operation,
        |l| l.set_pp_divider(divider),
        format!("PP divider set to {divider}"),
    )
}

// ============================================================================
// /v1/Advanced
// ============================================================================

/// GET /v1/Advanced
pub async fn advanced_properties(
    State(state): State<Arc<LaserApiState>>,
) -> Json<AdvancedSnapshot> {
    Json(state.laser.read(|l| l.advanced_snapshot()))
}

/// GET /v1/Advanced/ActualStateId
pub async fn actual_state_id(State(state): State<Arc<LaserApiState>>) -> Json<String> {
    Json(state.laser.read(|l| l.machine().state_id().code()).to_string())
}

/// GET /v1/Advanced/IsPpOpened
pub async fn is_pp_opened(State(state): State<Arc<LaserApiState>>) -> Json<bool> {
    Json(state.laser.read(|l| l.flags().pp_opened))
}

/// GET /v1/Advanced/IsShutterUsedToControlOutput
pub async fn is_shutter_used_to_control_output(
    State(state): State<Arc<LaserApiState>>,
) -> Json<bool> {
    Json(state.laser.read(|l| l.flags().shutter_controls_output))
}

/// PUT /v1/Advanced/IsShutterUsedToControlOutput
pub async fn set_is_shutter_used_to_control_output(
    State(state): State<Arc<LaserApiState>>,
    payload: Bytes,
) -> ApiResult<Json<ActionResponse>> {
    let operation = "SetIsShutterUsedToControlOutput";
    let enabled = body::parse_bool(&payload).map_err(|e| rejected(operation, e))?;
    state.act(
        operation,
        |l| {
            l.set_shutter_controls_output(enabled);
            Ok(())
        },
        format!("Shutter control set to {enabled}"),
    )
}

/// GET /v1/Advanced/IsRemoteInterlockActive
pub async fn is_remote_interlock_active(State(state): State<Arc<LaserApiState>>) -> Json<bool> {
    Json(state.laser.read(|l| l.flags().remote_interlock_active))
}

/// GET /v1/Advanced/Presets
pub async fn presets(State(state): State<Arc<LaserApiState>>) -> Json<Vec<Preset>> {
    Json(state.laser.read(|l| l.presets().to_vec()))
}

// ============================================================================
// /v1/Raw
// ============================================================================

/// GET /v1/Raw
pub async fn raw_info() -> Json<RawInfoResponse> {
    Json(RawInfoResponse {
        message: "Raw API for advanced users only".to_string(),
        available_functions: vec!["ExecuteWrapperFunction".to_string()],
        warning: "Use with caution - direct hardware access simulation".to_string(),
    })
}

/// POST /v1/Raw/ExecuteWrapperFunction
///
/// Echoes the request; nothing is executed.
pub async fn execute_wrapper_function(payload: Bytes) -> ApiResult<Json<WrapperExecutionResponse>> {
    let function = String::from_utf8(payload.to_vec()).map_err(|e| {
        warn!(operation = "ExecuteWrapperFunction", error = %e, "Request rejected");
        api_error(
            StatusCode::BAD_REQUEST,
            format!("Failed to execute wrapper function: {e}"),
        )
    })?;
    debug!(%function, "Simulating wrapper function");
    Ok(Json(WrapperExecutionResponse {
        status: "executed".to_string(),
        function,
        result: "simulated_success".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        warning: "This is a simulated execution for development purposes".to_string(),
    }))
}

// ============================================================================
// Informational
// ============================================================================

/// GET /
///
/// Serves the configured HTML documentation, falling back to JSON.
pub async fn root(State(state): State<Arc<LaserApiState>>) -> Response {
    let note = match &state.docs_path {
        Some(path) => match tokio::fs::read_to_string(path).await {
            Ok(html) => return Html(html).into_response(),
            Err(e) => {
                debug!(path = %path.display(), %e, "Documentation page unavailable");
                format!("Could not load {}: {} - serving JSON fallback", path.display(), e)
            }
        },
        None => "No documentation page configured - serving JSON fallback".to_string(),
    };

    Json(RootFallbackResponse {
        message: SERVICE_NAME.to_string(),
        version: API_VERSION.to_string(),
        api_base: API_BASE.to_string(),
        documentation: "/docs".to_string(),
        status: "operational".to_string(),
        laser_state: state.laser.read(|l| l.state().as_wire_str()).to_string(),
        note,
    })
    .into_response()
}

/// GET /info
pub async fn info(State(state): State<Arc<LaserApiState>>) -> Json<InfoResponse> {
    let (laser_state, output_enabled) =
        state.laser.read(|l| (l.state().as_wire_str(), l.is_output_enabled()));
    Json(InfoResponse {
        message: SERVICE_NAME.to_string(),
        version: API_VERSION.to_string(),
        api_base: API_BASE.to_string(),
        documentation: "/docs".to_string(),
        original_api_docs: "/".to_string(),
        health_check: "/health".to_string(),
        status: "operational".to_string(),
        laser_state: laser_state.to_string(),
        output_enabled,
    })
}

/// GET /health
pub async fn health(State(state): State<Arc<LaserApiState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        uptime_seconds: state.laser.read(|l| l.machine().since_last_change().as_secs_f64()),
    })
}

/// GET /docs
pub async fn docs() -> Json<DocsResponse> {
    Json(DocsResponse {
        title: SERVICE_NAME.to_string(),
        version: API_VERSION.to_string(),
        api_base: API_BASE.to_string(),
        routes: ROUTE_TABLE
            .iter()
            .map(|(method, path, description)| RouteDoc {
                method: method.to_string(),
                path: path.to_string(),
                description: description.to_string(),
            })
            .collect(),
    })
}

/// Unknown paths get the device's error envelope.
pub async fn not_found(uri: Uri) -> ApiError {
    debug!(path = %uri.path(), "No route");
    api_error(StatusCode::NOT_FOUND, "Not Found")
}
