use serde::{Deserialize, Serialize};

pub mod defaults;
pub mod parser;
pub mod substitution;
pub mod validator;

pub use defaults::*;
pub use parser::*;
pub use substitution::*;
pub use validator::*;

/// Root of the simulator configuration file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SimulatorConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub instrument: InstrumentSettings,
    #[serde(default)]
    pub docs: Option<DocsSettings>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Prometheus exporter port; metrics are not exported when unset
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            metrics_port: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingSettings {
    /// One of `pretty`, `json` or `compact`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            format: default_log_format(),
        }
    }
}

/// Power-on parameters of the virtual laser.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InstrumentSettings {
    #[serde(default = "default_attenuator_percentage")]
    pub target_attenuator_percentage: f64,
    #[serde(default = "default_pp_divider")]
    pub pp_divider: i64,
    #[serde(default = "default_harmonic")]
    pub harmonic: i32,
    #[serde(default = "default_ra_frequency_khz")]
    pub ra_frequency_khz: f64,
    #[serde(default = "default_ra_power_w")]
    pub ra_power_w: f64,
    #[serde(default = "default_selected_preset")]
    pub selected_preset: usize,
    #[serde(default = "default_presets")]
    pub presets: Vec<PresetSettings>,
    #[serde(default)]
    pub flags: FlagSettings,
}

impl Default for InstrumentSettings {
    fn default() -> Self {
        Self {
            target_attenuator_percentage: default_attenuator_percentage(),
            pp_divider: default_pp_divider(),
            harmonic: default_harmonic(),
            ra_frequency_khz: default_ra_frequency_khz(),
            ra_power_w: default_ra_power_w(),
            selected_preset: default_selected_preset(),
            presets: default_presets(),
            flags: FlagSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FlagSettings {
    #[serde(default)]
    pub pp_opened: bool,
    #[serde(default = "default_enabled")]
    pub shutter_controls_output: bool,
    #[serde(default)]
    pub remote_interlock_active: bool,
}

impl Default for FlagSettings {
    fn default() -> Self {
        Self {
            pp_opened: false,
            shutter_controls_output: true,
            remote_interlock_active: false,
        }
    }
}

/// A preset entry as written in the configuration file. Omitted fields take
/// the device defaults.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PresetSettings {
    pub attenuator_percentage: f64,
    pub burst_envelope_control_parameter: i32,
    pub burst_mode: i32,
    pub burst_parameter_n: i32,
    pub burst_parameter_p: i32,
    pub cavity_dumping_time_in_ns: i32,
    pub harmonic_number: i32,
    pub notes: String,
    pub optimal_motor_position: i32,
    pub photodiode_correction_1: f64,
    pub photodiode_correction_2: f64,
    pub photodiode_factor: f64,
    pub photodiode_offset: f64,
    pub pp_divider: i32,
    pub pp_high_voltage_in_volts: f64,
    pub pulse_repetition_rate_in_khz: f64,
    pub ra_high_voltage_in_volts: f64,
    pub ra_ldd_current_in_a: f64,
    pub ra_on_delay_in_ns: f64,
    pub ra_output_power_setpoint_in_w: f64,
    pub is_stored_in_pharos: bool,
}

impl Default for PresetSettings {
    fn default() -> Self {
        Self {
            attenuator_percentage: 100.0,
            burst_envelope_control_parameter: 0,
            burst_mode: 0,
            burst_parameter_n: 1,
            burst_parameter_p: 1,
            cavity_dumping_time_in_ns: -1,
            harmonic_number: 0,
            notes: "Virtual preset".to_string(),
            optimal_motor_position: -1,
            photodiode_correction_1: 0.10446500033140183,
            photodiode_correction_2: -1.6866900409695518e-7,
            photodiode_factor: -1.0,
            photodiode_offset: -1.0,
            pp_divider: 1,
            pp_high_voltage_in_volts: -1.0,
            pulse_repetition_rate_in_khz: 100.0,
            ra_high_voltage_in_volts: -1.0,
            ra_ldd_current_in_a: -1.0,
            ra_on_delay_in_ns: -1.0,
            ra_output_power_setpoint_in_w: 5.0,
            is_stored_in_pharos: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DocsSettings {
    /// HTML page served at `/`
    pub html_path: String,
}
