//! Preset records as reported by `/v1/Advanced/Presets`.

use serde::{Deserialize, Serialize, Serializer};

/// A stored bundle of control parameters.
///
/// Field names on the wire follow the device firmware.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Preset {
    pub attenuator_percentage: f64,
    pub burst_envelope_control_parameter: i32,
    pub burst_mode: i32,
    pub burst_parameter_n: i32,
    pub burst_parameter_p: i32,
    pub cavity_dumping_time_in_ns: i32,
    pub harmonic_number: i32,
    pub notes: String,
    pub optimal_motor_position: i32,
    #[serde(rename = "PhotodiodeCorrection1")]
    pub photodiode_correction_1: f64,
    #[serde(rename = "PhotodiodeCorrection2")]
    pub photodiode_correction_2: f64,
    #[serde(serialize_with = "whole_number")]
    pub photodiode_factor: f64,
    #[serde(serialize_with = "whole_number")]
    pub photodiode_offset: f64,
    pub pp_divider: i32,
    #[serde(serialize_with = "whole_number")]
    pub pp_high_voltage_in_volts: f64,
    pub pulse_repetition_rate_in_khz: f64,
    #[serde(serialize_with = "whole_number")]
    pub ra_high_voltage_in_volts: f64,
    #[serde(serialize_with = "whole_number")]
    pub ra_ldd_current_in_a: f64,
    #[serde(serialize_with = "whole_number")]
    pub ra_on_delay_in_ns: f64,
    pub ra_output_power_setpoint_in_w: f64,
    pub is_stored_in_pharos: bool,
}

/// Whole values go out as integers (`-1`, not `-1.0`), matching the firmware.
fn whole_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::from(&config::PresetSettings::default())
    }
}

impl From<&config::PresetSettings> for Preset {
    fn from(p: &config::PresetSettings) -> Self {
        Self {
            attenuator_percentage: p.attenuator_percentage,
            burst_envelope_control_parameter: p.burst_envelope_control_parameter,
            burst_mode: p.burst_mode,
            burst_parameter_n: p.burst_parameter_n,
            burst_parameter_p: p.burst_parameter_p,
            cavity_dumping_time_in_ns: p.cavity_dumping_time_in_ns,
            harmonic_number: p.harmonic_number,
            notes: p.notes.clone(),
            optimal_motor_position: p.optimal_motor_position,
            photodiode_correction_1: p.photodiode_correction_1,
            photodiode_correction_2: p.photodiode_correction_2,
            photodiode_factor: p.photodiode_factor,
            photodiode_offset: p.photodiode_offset,
            pp_divider: p.pp_divider,
            pp_high_voltage_in_volts: p.pp_high_voltage_in_volts,
            pulse_repetition_rate_in_khz: p.pulse_repetition_rate_in_khz,
            ra_high_voltage_in_volts: p.ra_high_voltage_in_volts,
            ra_ldd_current_in_a: p.ra_ldd_current_in_a,
            ra_on_delay_in_ns: p.ra_on_delay_in_ns,
            ra_output_power_setpoint_in_w: p.ra_output_power_setpoint_in_w,
            is_stored_in_pharos: p.is_stored_in_pharos,
        }
    }
}

/// Factory preset table.
pub fn default_presets() -> Vec<Preset> {
    config::default_presets().iter().map(Preset::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_presets() {
        let presets = default_presets();
        assert_eq!(presets.len(), 3);
        assert_eq!(presets[0].notes, "Default preset 1");
        assert_eq!(presets[1].attenuator_percentage, 75.0);
        assert_eq!(presets[2].attenuator_percentage, 25.0);
        assert!(presets.iter().all(|p| p.pp_divider == 1));
        assert!(presets.iter().all(|p| p.pulse_repetition_rate_in_khz == 100.0));
    }

    #[test]
    fn test_wire_field_names() {
        let value = serde_json::to_value(Preset::default()).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 21);
        for key in [
            "AttenuatorPercentage",
            "BurstEnvelopeControlParameter",
            "CavityDumpingTimeInNs",
            "PhotodiodeCorrection1",
            "PhotodiodeCorrection2",
            "PpDivider",
            "PulseRepetitionRateInKhz",
            "RaLddCurrentInA",
            "RaOutputPowerSetpointInW",
            "IsStoredInPharos",
        ] {
            assert!(object.contains_key(key), "missing {key}");
        }
        assert_eq!(object["Notes"], "Virtual preset");
        assert_eq!(object["CavityDumpingTimeInNs"], -1);
    }

    #[test]
    fn test_placeholders_serialize_as_integers() {
        let text = serde_json::to_string(&Preset::default()).unwrap();
        for key in [
            "PhotodiodeFactor",
            "PhotodiodeOffset",
            "PpHighVoltageInVolts",
            "RaHighVoltageInVolts",
            "RaLddCurrentInA",
            "RaOnDelayInNs",
        ] {
            assert!(text.contains(&format!("\"{key}\":-1,")), "{key} in {text}");
        }

        let preset = Preset {
            ra_on_delay_in_ns: 12.5,
            ..Preset::default()
        };
        let value = serde_json::to_value(&preset).unwrap();
        assert_eq!(value["RaOnDelayInNs"], 12.5);
        assert!(value["AttenuatorPercentage"].is_f64());
        assert!(value["PhotodiodeCorrection1"].is_f64());
    }
}
