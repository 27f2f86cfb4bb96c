use crate::PresetSettings;

/// Port the physical device serves its REST API on.
pub const DEVICE_PORT: u16 = 20020;

pub fn default_enabled() -> bool {
    true
}

pub fn default_host() -> String {
    "127.0.0.1".to_string()
}

pub fn default_port() -> u16 {
    DEVICE_PORT
}

pub fn default_log_format() -> String {
    "pretty".to_string()
}

pub fn default_attenuator_percentage() -> f64 {
    50.0
}

pub fn default_pp_divider() -> i64 {
    1
}

pub fn default_harmonic() -> i32 {
    1
}

pub fn default_ra_frequency_khz() -> f64 {
    100.1
}

pub fn default_ra_power_w() -> f64 {
    5.0
}

pub fn default_selected_preset() -> usize {
    1
}

/// The three factory presets; they differ only in attenuation.
pub fn default_presets() -> Vec<PresetSettings> {
    [("Default preset 1", 50.0), ("Default preset 2", 75.0), ("Default preset 3", 25.0)]
        .into_iter()
        .map(|(notes, attenuator_percentage)| PresetSettings {
            notes: notes.to_string(),
            attenuator_percentage,
            ..PresetSettings::default()
        })
        .collect()
}
