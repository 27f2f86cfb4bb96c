//! Axum route definitions for the laser API.

use crate::api::handlers::{self, LaserApiState};
use crate::api::middleware::track_metrics;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// `(method, path, description)` of every `/v1` endpoint, as listed at `/docs`.
pub const ROUTE_TABLE: &[(&str, &str, &str)] = &[
    ("GET", "/v1/Basic", "All basic properties"),
    ("GET", "/v1/Basic/ActualAttenuatorPercentage", "Settled attenuator position (%)"),
    ("GET", "/v1/Basic/ActualHarmonic", "Active harmonic"),
    ("GET", "/v1/Basic/ActualOutputEnergy", "Pulse energy (uJ)"),
    ("GET", "/v1/Basic/ActualOutputFrequency", "Output repetition rate (kHz)"),
    ("GET", "/v1/Basic/ActualOutputPower", "Output power (W)"),
    ("GET", "/v1/Basic/ActualPpDivider", "Settled pulse picker divider"),
    ("GET", "/v1/Basic/ActualRaFrequency", "Regenerative amplifier frequency (kHz)"),
    ("GET", "/v1/Basic/ActualRaPower", "Regenerative amplifier power (W)"),
    ("GET", "/v1/Basic/ActualStateName", "Operational state"),
    ("GET", "/v1/Basic/ActualStateName2", "Operational state"),
    ("GET", "/v1/Basic/Errors", "Active errors"),
    ("GET", "/v1/Basic/GeneralStatus", "Coarse status"),
    ("GET", "/v1/Basic/IsOutputEnabled", "Whether the output is open"),
    ("GET", "/v1/Basic/SelectedPresetIndex", "Selected preset"),
    ("GET", "/v1/Basic/TargetAttenuatorPercentage", "Commanded attenuator position (%)"),
    ("GET", "/v1/Basic/TargetPpDivider", "Commanded pulse picker divider"),
    ("GET", "/v1/Basic/Warnings", "Active warnings"),
    ("POST", "/v1/Basic/ApplySelectedPreset", "Apply the selected preset"),
    ("POST", "/v1/Basic/CloseOutput", "Close the output"),
    ("POST", "/v1/Basic/EnableOutput", "Open the output"),
    ("POST", "/v1/Basic/GoToStandby", "Go to standby"),
    ("POST", "/v1/Basic/TurnOff", "Turn the laser off"),
    ("POST", "/v1/Basic/TurnOn", "Turn the laser on"),
    ("PUT", "/v1/Basic/SelectedPresetIndex", "Select a preset"),
    ("PUT", "/v1/Basic/TargetAttenuatorPercentage", "Set attenuator position (0-100)"),
    ("PUT", "/v1/Basic/TargetPpDivider", "Set pulse picker divider (1-1000)"),
    ("GET", "/v1/Advanced", "All advanced properties"),
    ("GET", "/v1/Advanced/ActualStateId", "Numeric state id"),
    ("GET", "/v1/Advanced/IsPpOpened", "Whether the pulse picker is open"),
    ("GET", "/v1/Advanced/IsShutterUsedToControlOutput", "Shutter control mode"),
    ("PUT", "/v1/Advanced/IsShutterUsedToControlOutput", "Set shutter control mode"),
    ("GET", "/v1/Advanced/IsRemoteInterlockActive", "Remote interlock status"),
    ("GET", "/v1/Advanced/Presets", "Preset table"),
    ("GET", "/v1/Raw", "Raw API descriptor"),
    ("POST", "/v1/Raw/ExecuteWrapperFunction", "Simulated wrapper call"),
];

/// Create all laser routes.
///
/// Unknown paths answer 404 with the structured error body; a known path with
/// the wrong verb answers 405.
pub fn laser_routes(state: Arc<LaserApiState>) -> Router {
    Router::new()
        // Basic
        .route("/v1/Basic", get(handlers::basic_properties))
        .route(
            "/v1/Basic/ActualAttenuatorPercentage",
            get(handlers::actual_attenuator_percentage),
        )
        .route("/v1/Basic/ActualHarmonic", get(handlers::actual_harmonic))
        .route("/v1/Basic/ActualOutputEnergy", get(handlers::actual_output_energy))
        .route(
            "/v1/Basic/ActualOutputFrequency",
            get(handlers::actual_output_frequency),
        )
        .route("/v1/Basic/ActualOutputPower", get(handlers::actual_output_power))
        .route("/v1/Basic/ActualPpDivider", get(handlers::actual_pp_divider))
        .route("/v1/Basic/ActualRaFrequency", get(handlers::actual_ra_frequency))
        .route("/v1/Basic/ActualRaPower", get(handlers::actual_ra_power))
        .route("/v1/Basic/ActualStateName", get(handlers::actual_state_name))
        .route("/v1/Basic/ActualStateName2", get(handlers::actual_state_name))
        .route("/v1/Basic/Errors", get(handlers::errors))
        .route("/v1/Basic/GeneralStatus", get(handlers::general_status))
        .route("/v1/Basic/IsOutputEnabled", get(handlers::is_output_enabled))
        .route(
            "/v1/Basic/SelectedPresetIndex",
            get(handlers::selected_preset_index).put(handlers::set_selected_preset_index),
        )
        .route(
            "/v1/Basic/TargetAttenuatorPercentage",
            get(handlers::target_attenuator_percentage)
                .put(handlers::set_target_attenuator_percentage),
        )
        .route(
            "/v1/Basic/TargetPpDivider",
            get(handlers::target_pp_divider).put(handlers::set_target_pp_divider),
        )
        .route("/v1/Basic/Warnings", get(handlers::warnings))
        .route(
            "/v1/Basic/ApplySelectedPreset",
            post(handlers::apply_selected_preset),
        )
        .route("/v1/Basic/CloseOutput", post(handlers::close_output))
        .route("/v1/Basic/EnableOutput", post(handlers::enable_output))
        .route("/v1/Basic/GoToStandby", post(handlers::go_to_standby))
        .route("/v1/Basic/TurnOff", post(handlers::turn_off))
        .route("/v1/Basic/TurnOn", post(handlers::turn_on))
        // Advanced
        .route("/v1/Advanced", get(handlers::advanced_properties))
        .route("/v1/Advanced/ActualStateId", get(handlers::actual_state_id))
        .route("/v1/Advanced/IsPpOpened", get(handlers::is_pp_opened))
        .route(
            "/v1/Advanced/IsShutterUsedToControlOutput",
            get(handlers::is_shutter_used_to_control_output)
                .put(handlers::set_is_shutter_used_to_control_output),
        )
        .route(
            "/v1/Advanced/IsRemoteInterlockActive",
            get(handlers::is_remote_interlock_active),
        )
        .route("/v1/Advanced/Presets", get(handlers::presets))
        // Raw
        .route("/v1/Raw", get(handlers::raw_info))
        .route(
            "/v1/Raw/ExecuteWrapperFunction",
            post(handlers::execute_wrapper_function),
        )
        // Informational
        .route("/", get(handlers::root))
        .route("/info", get(handlers::info))
        .route("/health", get(handlers::health))
        .route("/docs", get(handlers::docs))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), track_metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
