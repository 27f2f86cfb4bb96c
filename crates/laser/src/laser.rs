//! The virtual instrument: state machine, parameters, presets and flags.

use serde::Serialize;

use crate::error::{LaserError, LaserResult};
use crate::parameters::{check_attenuation, check_pp_divider, AdvancedFlags, ParameterStore};
use crate::preset::{default_presets, Preset};
use crate::state::{GeneralStatus, OperationalState, StateMachine};

/// Entry of the `Warnings` / `Errors` lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WarningEntry {
    pub description: String,
    pub code: String,
}

/// Consistent reading of every `/v1/Basic` field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BasicSnapshot {
    pub actual_attenuator_percentage: f64,
    pub actual_harmonic: i32,
    pub actual_output_energy: f64,
    pub actual_output_frequency: f64,
    pub actual_output_power: f64,
    pub actual_pp_divider: i64,
    pub actual_ra_frequency: f64,
    pub actual_ra_power: f64,
    pub actual_state_name: OperationalState,
    pub actual_state_name2: OperationalState,
    pub general_status: GeneralStatus,
    pub is_output_enabled: bool,
    pub selected_preset_index: usize,
    pub target_attenuator_percentage: f64,
    pub target_pp_divider: i64,
}

/// Consistent reading of every `/v1/Advanced` field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AdvancedSnapshot {
    pub actual_state_id: u32,
    pub is_pp_opened: bool,
    pub is_shutter_used_to_control_output: bool,
    pub is_remote_interlock_active: bool,
    pub presets: Vec<Preset>,
}

/// One simulated PHAROS laser.
#[derive(Debug, Clone)]
pub struct VirtualLaser {
    machine: StateMachine,
    parameters: ParameterStore,
    presets: Vec<Preset>,
    selected_preset: usize,
    flags: AdvancedFlags,
    warnings: Vec<WarningEntry>,
    errors: Vec<WarningEntry>,
}

impl Default for VirtualLaser {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualLaser {
    /// Laser with factory parameters, powered up and Operational.
    pub fn new() -> Self {
        Self {
            machine: StateMachine::new(),
            parameters: ParameterStore::default(),
            presets: default_presets(),
            selected_preset: 1,
            flags: AdvancedFlags::default(),
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Laser with power-on values taken from the configuration file.
    pub fn from_settings(settings: &config::InstrumentSettings) -> LaserResult<Self> {
        let parameters = ParameterStore::with_initial(
            settings.target_attenuator_percentage,
            settings.pp_divider,
            settings.harmonic,
            settings.ra_frequency_khz,
            settings.ra_power_w,
        )?;
        let presets: Vec<Preset> = settings.presets.iter().map(Preset::from).collect();

        let mut laser = Self {
            machine: StateMachine::new(),
            parameters,
            presets,
            selected_preset: 0,
            flags: AdvancedFlags::from(&settings.flags),
            warnings: Vec::new(),
            errors: Vec::new(),
        };
        laser.select_preset(settings.selected_preset)?;
        Ok(laser)
    }

    pub fn state(&self) -> OperationalState {
        self.machine.state()
    }

    pub fn machine(&self) -> &StateMachine {
        &self.machine
    }

    pub fn parameters(&self) -> &ParameterStore {
        &self.parameters
    }

    pub fn is_output_enabled(&self) -> bool {
        self.machine.is_output_enabled()
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn selected_preset_index(&self) -> usize {
        self.selected_preset
    }

    pub fn flags(&self) -> AdvancedFlags {
        self.flags
    }

    pub fn warnings(&self) -> &[WarningEntry] {
        &self.warnings
    }

    pub fn errors(&self) -> &[WarningEntry] {
        &self.errors
    }

    pub fn output_power_w(&self) -> f64 {
        self.parameters.output_power_w(self.is_output_enabled())
    }

    pub fn output_frequency_khz(&self) -> f64 {
        self.parameters.output_frequency_khz()
    }

    pub fn output_energy_uj(&self) -> f64 {
        self.parameters.output_energy_uj(self.is_output_enabled())
    }

    // Lifecycle

    pub fn turn_on(&mut self) -> LaserResult<()> {
        self.machine.turn_on()
    }

    pub fn turn_off(&mut self) -> LaserResult<()> {
        self.machine.turn_off()
    }

    pub fn go_to_standby(&mut self) {
        self.machine.go_to_standby()
    }

    pub fn enable_output(&mut self) -> LaserResult<()> {
        self.machine.enable_output()
    }

    pub fn close_output(&mut self) {
        self.machine.close_output()
    }

    // Parameters

    pub fn set_attenuator_percentage(&mut self, percentage: f64) -> LaserResult<()> {
        self.parameters.set_attenuator_percentage(percentage)
    }

    pub fn set_pp_divider(&mut self, divider: i64) -> LaserResult<()> {
        self.parameters.set_pp_divider(divider)
    }

    /// Select a preset without applying it.
    pub fn select_preset(&mut self, index: usize) -> LaserResult<()> {
        if index >= self.presets.len() {
            return Err(LaserError::invalid_parameter(format!(
                "Preset index must be between 0 and {}",
                self.presets.len().saturating_sub(1)
            )));
        }
        self.selected_preset = index;
        Ok(())
    }

    /// Copy the selected preset into the control parameters.
    ///
    /// Only allowed while Operational or StandingBy. Both parameters are checked
    /// before either is written.
    pub fn apply_selected_preset(&mut self) -> LaserResult<()> {
        let state = self.machine.state();
        if !matches!(
            state,
            OperationalState::Operational | OperationalState::StandingBy
        ) {
            return Err(LaserError::ForbiddenOperation {
                operation: "apply preset",
                state,
            });
        }

        let preset = self
            .presets
            .get(self.selected_preset)
            .ok_or_else(|| LaserError::invalid_parameter("Selected preset does not exist"))?;
        let divider = i64::from(preset.pp_divider);
        check_attenuation(preset.attenuator_percentage)?;
        check_pp_divider(divider)?;

        let (attenuation, frequency, power) = (
            preset.attenuator_percentage,
            preset.pulse_repetition_rate_in_khz,
            preset.ra_output_power_setpoint_in_w,
        );
        self.parameters.set_attenuator_percentage(attenuation)?;
        self.parameters.set_pp_divider(divider)?;
        self.parameters.set_ra_base(frequency, power);
        Ok(())
    }

    pub fn set_shutter_controls_output(&mut self, enabled: bool) {
        self.flags.shutter_controls_output = enabled;
    }

    pub fn basic_snapshot(&self) -> BasicSnapshot {
        let state = self.state();
        BasicSnapshot {
            actual_attenuator_percentage: self.parameters.actual_attenuator_percentage(),
            actual_harmonic: self.parameters.actual_harmonic(),
            actual_output_energy: self.output_energy_uj(),
            actual_output_frequency: self.output_frequency_khz(),
            actual_output_power: self.output_power_w(),
            actual_pp_divider: self.parameters.actual_pp_divider(),
            actual_ra_frequency: self.parameters.ra_frequency_khz(),
            actual_ra_power: self.parameters.ra_power_w(),
            actual_state_name: state,
            actual_state_name2: state,
            general_status: state.general_status(),
            is_output_enabled: self.is_output_enabled(),
            selected_preset_index: self.selected_preset,
            target_attenuator_percentage: self.parameters.target_attenuator_percentage(),
            target_pp_divider: self.parameters.target_pp_divider(),
        }
    }

    pub fn advanced_snapshot(&self) -> AdvancedSnapshot {
        AdvancedSnapshot {
            actual_state_id: self.machine.state_id().code(),
            is_pp_opened: self.flags.pp_opened,
            is_shutter_used_to_control_output: self.flags.shutter_controls_output,
            is_remote_interlock_active: self.flags.remote_interlock_active,
            presets: self.presets.clone(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_state(state: OperationalState) -> Self {
        Self {
            machine: StateMachine::starting_in(state),
            ..Self::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_warning_entry_wire_shape() {
        let entry = WarningEntry {
            description: "Interlock open".to_string(),
            code: "W12".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            serde_json::json!({ "Description": "Interlock open", "Code": "W12" })
        );
    }

    #[test]
    fn test_power_on_snapshot() {
        let laser = VirtualLaser::new();
        let basic = laser.basic_snapshot();

        assert_eq!(basic.actual_state_name, OperationalState::Operational);
        assert_eq!(basic.general_status, GeneralStatus::Operational);
        assert!(!basic.is_output_enabled);
        assert_eq!(basic.actual_output_power, 0.0);
        assert_eq!(basic.actual_output_frequency, 100.1);
        assert_eq!(basic.selected_preset_index, 1);
        assert!(laser.warnings().is_empty());
        assert!(laser.errors().is_empty());

        let advanced = laser.advanced_snapshot();
        assert_eq!(advanced.actual_state_id, 0x80);
        assert!(advanced.is_shutter_used_to_control_output);
        assert!(!advanced.is_pp_opened);
        assert_eq!(advanced.presets.len(), 3);
    }

    #[test]
    fn test_emission_scenario() {
        let mut laser = VirtualLaser::new();
        laser.enable_output().unwrap();
        assert_eq!(laser.state(), OperationalState::EmissionOn);

        laser.set_attenuator_percentage(50.0).unwrap();
        laser.set_pp_divider(2).unwrap();
        laser.parameters.set_ra_base(100.0, 5.0);

        assert!((laser.output_power_w() - 1.25).abs() < 0.01);
        assert_eq!(laser.output_frequency_khz(), 50.0);
        assert!(laser.output_energy_uj() > 0.0);

        laser.close_output();
        assert_eq!(laser.output_power_w(), 0.0);
        assert_eq!(laser.output_frequency_khz(), 50.0);
    }

    #[test]
    fn test_turn_off_from_emission_then_enable_forbidden() {
        let mut laser = VirtualLaser::new();
        laser.enable_output().unwrap();
        laser.turn_off().unwrap();

        assert_eq!(laser.state(), OperationalState::Off);
        assert!(!laser.is_output_enabled());
        assert_matches!(
            laser.enable_output(),
            Err(LaserError::ForbiddenOperation { .. })
        );
    }

    #[test]
    fn test_select_and_apply_preset_from_standby() {
        let mut laser = VirtualLaser::new();

        assert_matches!(
            laser.select_preset(999),
            Err(LaserError::InvalidParameter(msg)) if msg == "Preset index must be between 0 and 2"
        );
        assert_eq!(laser.selected_preset_index(), 1);

        laser.go_to_standby();
        laser.select_preset(1).unwrap();
        laser.apply_selected_preset().unwrap();

        let params = laser.parameters();
        assert_eq!(params.target_attenuator_percentage(), 75.0);
        assert!((params.actual_attenuator_percentage() - 75.1).abs() < 1e-9);
        assert_eq!(params.target_pp_divider(), 1);
        assert_eq!(params.ra_frequency_khz(), 100.0);
        assert_eq!(params.ra_power_w(), 5.0);
    }

    #[test]
    fn test_apply_preset_forbidden_states() {
        for state in [
            OperationalState::Off,
            OperationalState::EmissionOn,
            OperationalState::Failure,
            OperationalState::Disconnected,
        ] {
            let mut laser = VirtualLaser::with_state(state);
            let before = laser.parameters().clone();

            let err = laser.apply_selected_preset().unwrap_err();

            assert_eq!(err.to_string(), format!("Cannot apply preset in state {state}"));
            assert_eq!(laser.parameters(), &before);
        }
    }

    #[test]
    fn test_apply_invalid_preset_changes_nothing() {
        let mut laser = VirtualLaser::new();
        laser.presets[0].attenuator_percentage = 42.0;
        laser.presets[0].pp_divider = 0;
        laser.select_preset(0).unwrap();
        let before = laser.parameters().clone();

        assert_matches!(
            laser.apply_selected_preset(),
            Err(LaserError::InvalidParameter(_))
        );
        assert_eq!(laser.parameters(), &before);
    }

    #[test]
    fn test_shutter_flag() {
        let mut laser = VirtualLaser::new();
        laser.set_shutter_controls_output(false);
        assert!(!laser.flags().shutter_controls_output);
        laser.set_shutter_controls_output(true);
        assert!(laser.flags().shutter_controls_output);
    }

    #[test]
    fn test_from_settings() {
        let mut settings = config::InstrumentSettings::default();
        settings.target_attenuator_percentage = 10.0;
        settings.pp_divider = 4;
        settings.selected_preset = 2;
        settings.flags.pp_opened = true;

        let laser = VirtualLaser::from_settings(&settings).unwrap();
        assert_eq!(laser.parameters().target_pp_divider(), 4);
        assert_eq!(laser.selected_preset_index(), 2);
        assert!(laser.flags().pp_opened);

        settings.selected_preset = 3;
        assert_matches!(
            VirtualLaser::from_settings(&settings),
            Err(LaserError::InvalidParameter(_))
        );
    }

    #[test]
    fn test_basic_snapshot_wire_names() {
        let value = serde_json::to_value(VirtualLaser::new().basic_snapshot()).unwrap();
        assert_eq!(value["ActualStateName"], "StateOperational");
        assert_eq!(value["ActualStateName2"], "StateOperational");
        assert_eq!(value["GeneralStatus"], "Operational");
        assert_eq!(value["TargetPpDivider"], 1);
        assert_eq!(value["IsOutputEnabled"], false);
        assert_eq!(value.as_object().unwrap().len(), 15);
    }
}
