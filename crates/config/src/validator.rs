use crate::*;
use thiserror::Error;

const LOG_FORMATS: [&str; 3] = ["pretty", "json", "compact"];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Server host is required")]
    MissingHost,

    #[error("{field} must be between 1024 and 65535, got {port}")]
    InvalidPort { field: String, port: u16 },

    #[error("Server port and metrics port must differ (both {0})")]
    PortClash(u16),

    #[error("Invalid log format: {0}. Must be one of: pretty, json, compact")]
    InvalidLogFormat(String),

    #[error("{field} must be between 0 and 100, got {value}")]
    InvalidPercentage { field: String, value: f64 },

    #[error("{field} must be between 1 and 1000, got {value}")]
    InvalidDivider { field: String, value: i64 },

    #[error("{field} must be a positive number")]
    InvalidPositiveFloat { field: String },

    #[error("At least one preset must be defined")]
    NoPresets,

    #[error("Selected preset {index} is out of range (0..{count})")]
    SelectedPresetOutOfRange { index: usize, count: usize },

    #[error("Documentation page path is empty")]
    EmptyDocsPath,
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.to_string(),
        });
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

pub fn validate_config(config: &SimulatorConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_server(&config.server, &mut report);
    validate_logging(&config.logging, &mut report);
    validate_instrument(&config.instrument, &mut report);

    if let Some(docs) = &config.docs {
        if docs.html_path.trim().is_empty() {
            report.add_error(ValidationError::EmptyDocsPath);
        }
    }

    report
}

fn validate_server(server: &ServerSettings, report: &mut ValidationReport) {
    if server.host.trim().is_empty() {
        report.add_error(ValidationError::MissingHost);
    } else if !matches!(server.host.as_str(), "127.0.0.1" | "localhost" | "::1") {
        report.add_warning(
            "server.host",
            "Binding beyond loopback exposes an unauthenticated control surface",
        );
    }

    validate_port("server.port", server.port, report);

    if let Some(metrics_port) = server.metrics_port {
        validate_port("server.metrics_port", metrics_port, report);
        if metrics_port == server.port {
            report.add_error(ValidationError::PortClash(metrics_port));
        }
    }
}

fn validate_port(field: &str, port: u16, report: &mut ValidationReport) {
    if port < 1024 {
        report.add_error(ValidationError::InvalidPort {
            field: field.to_string(),
            port,
        });
    }
}

fn validate_logging(logging: &LoggingSettings, report: &mut ValidationReport) {
    if !LOG_FORMATS.contains(&logging.format.to_lowercase().as_str()) {
        report.add_error(ValidationError::InvalidLogFormat(logging.format.clone()));
    }
}

fn validate_instrument(instrument: &InstrumentSettings, report: &mut ValidationReport) {
    validate_percentage(
        "instrument.target_attenuator_percentage",
        instrument.target_attenuator_percentage,
        report,
    );
    validate_divider("instrument.pp_divider", instrument.pp_divider, report);
    validate_positive("instrument.ra_frequency_khz", instrument.ra_frequency_khz, report);
    validate_positive("instrument.ra_power_w", instrument.ra_power_w, report);

    if instrument.presets.is_empty() {
        report.add_error(ValidationError::NoPresets);
        return;
    }

    if instrument.selected_preset >= instrument.presets.len() {
        report.add_error(ValidationError::SelectedPresetOutOfRange {
            index: instrument.selected_preset,
            count: instrument.presets.len(),
        });
    }

    for (index, preset) in instrument.presets.iter().enumerate() {
        validate_preset(index, preset, report);
    }
}

fn validate_preset(index: usize, preset: &PresetSettings, report: &mut ValidationReport) {
    let prefix = format!("instrument.presets[{}]", index);

    validate_percentage(
        &format!("{}.attenuator_percentage", prefix),
        preset.attenuator_percentage,
        report,
    );
    validate_divider(
        &format!("{}.pp_divider", prefix),
        i64::from(preset.pp_divider),
        report,
    );
    validate_positive(
        &format!("{}.pulse_repetition_rate_in_khz", prefix),
        preset.pulse_repetition_rate_in_khz,
        report,
    );
    validate_positive(
        &format!("{}.ra_output_power_setpoint_in_w", prefix),
        preset.ra_output_power_setpoint_in_w,
        report,
    );

    if preset.notes.is_empty() {
        report.add_warning(&format!("{}.notes", prefix), "Preset has no notes");
    }
}

fn validate_percentage(field: &str, value: f64, report: &mut ValidationReport) {
    if !(0.0..=100.0).contains(&value) {
        report.add_error(ValidationError::InvalidPercentage {
            field: field.to_string(),
            value,
        });
    }
}

fn validate_divider(field: &str, value: i64, report: &mut ValidationReport) {
    if !(1..=1000).contains(&value) {
        report.add_error(ValidationError::InvalidDivider {
            field: field.to_string(),
            value,
        });
    }
}

fn validate_positive(field: &str, value: f64, report: &mut ValidationReport) {
    if !(value.is_finite() && value > 0.0) {
        report.add_error(ValidationError::InvalidPositiveFloat {
            field: field.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let report = validate_config(&generate_default_config());
        assert!(report.is_valid(), "unexpected errors: {:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_privileged_port_rejected() {
        let mut config = generate_default_config();
        config.server.port = 80;

        let report = validate_config(&config);

        assert_eq!(
            report.errors,
            vec![ValidationError::InvalidPort {
                field: "server.port".to_string(),
                port: 80
            }]
        );
    }

    #[test]
    fn test_metrics_port_must_differ() {
        let mut config = generate_default_config();
        config.server.metrics_port = Some(config.server.port);

        let report = validate_config(&config);

        assert!(report.errors.contains(&ValidationError::PortClash(20020)));
    }

    #[test]
    fn test_unknown_log_format() {
        let mut config = generate_default_config();
        config.logging.format = "xml".to_string();

        let report = validate_config(&config);

        assert_eq!(
            report.errors,
            vec![ValidationError::InvalidLogFormat("xml".to_string())]
        );
    }

    #[test]
    fn test_public_host_warns() {
        let mut config = generate_default_config();
        config.server.host = "0.0.0.0".to_string();

        let report = validate_config(&config);

        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].field, "server.host");
    }

    #[test]
    fn test_instrument_ranges() {
        let mut config = generate_default_config();
        config.instrument.target_attenuator_percentage = 120.0;
        config.instrument.pp_divider = 0;
        config.instrument.ra_power_w = 0.0;

        let report = validate_config(&config);

        assert_eq!(report.errors.len(), 3);
        assert!(report.errors.contains(&ValidationError::InvalidDivider {
            field: "instrument.pp_divider".to_string(),
            value: 0
        }));
    }

    #[test]
    fn test_selected_preset_out_of_range() {
        let mut config = generate_default_config();
        config.instrument.selected_preset = 3;

        let report = validate_config(&config);

        assert_eq!(
            report.errors,
            vec![ValidationError::SelectedPresetOutOfRange { index: 3, count: 3 }]
        );
    }

    #[test]
    fn test_empty_preset_table() {
        let mut config = generate_default_config();
        config.instrument.presets.clear();

        let report = validate_config(&config);

        assert_eq!(report.errors, vec![ValidationError::NoPresets]);
    }

    #[test]
    fn test_invalid_preset_reports_its_index() {
        let mut config = generate_default_config();
        config.instrument.presets[2].pp_divider = 5000;

        let report = validate_config(&config);

        assert_eq!(
            report.errors,
            vec![ValidationError::InvalidDivider {
                field: "instrument.presets[2].pp_divider".to_string(),
                value: 5000
            }]
        );
    }
}
