//! Control parameters and the quantities derived from them.

use crate::error::{LaserError, LaserResult};

/// Offset between the commanded and the settled attenuator position.
pub const ATTENUATOR_SETTLING_OFFSET: f64 = 0.1;

pub const ATTENUATOR_MIN: f64 = 0.0;
pub const ATTENUATOR_MAX: f64 = 100.0;
pub const PP_DIVIDER_MIN: i64 = 1;
pub const PP_DIVIDER_MAX: i64 = 1000;

/// Boolean switches of the advanced API. No transition constraints apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvancedFlags {
    pub pp_opened: bool,
    pub shutter_controls_output: bool,
    pub remote_interlock_active: bool,
}

impl Default for AdvancedFlags {
    fn default() -> Self {
        Self {
            pp_opened: false,
            shutter_controls_output: true,
            remote_interlock_active: false,
        }
    }
}

impl From<&config::FlagSettings> for AdvancedFlags {
    fn from(flags: &config::FlagSettings) -> Self {
        Self {
            pp_opened: flags.pp_opened,
            shutter_controls_output: flags.shutter_controls_output,
            remote_interlock_active: flags.remote_interlock_active,
        }
    }
}

/// Target/actual control parameter pairs plus the regenerative amplifier base values.
///
/// Setters validate before assigning, so a rejected value leaves the store untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterStore {
    target_attenuator_percentage: f64,
    actual_attenuator_percentage: f64,
    // Signed so a non-positive divider stays representable for the derived guards.
    target_pp_divider: i64,
    actual_pp_divider: i64,
    actual_harmonic: i32,
    ra_frequency_khz: f64,
    ra_power_w: f64,
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self {
            target_attenuator_percentage: 50.0,
            actual_attenuator_percentage: settled_attenuation(50.0),
            target_pp_divider: 1,
            actual_pp_divider: 1,
            actual_harmonic: 1,
            ra_frequency_khz: 100.1,
            ra_power_w: 5.0,
        }
    }
}

fn settled_attenuation(percentage: f64) -> f64 {
    if percentage < ATTENUATOR_MAX {
        percentage + ATTENUATOR_SETTLING_OFFSET
    } else {
        percentage
    }
}

pub(crate) fn check_attenuation(percentage: f64) -> LaserResult<()> {
    if (ATTENUATOR_MIN..=ATTENUATOR_MAX).contains(&percentage) {
        Ok(())
    } else {
        Err(LaserError::invalid_parameter(
            "Attenuator percentage must be between 0 and 100",
        ))
    }
}

pub(crate) fn check_pp_divider(divider: i64) -> LaserResult<()> {
    if (PP_DIVIDER_MIN..=PP_DIVIDER_MAX).contains(&divider) {
        Ok(())
    } else {
        Err(LaserError::invalid_parameter(
            "PP divider must be between 1 and 1000",
        ))
    }
}

impl ParameterStore {
    /// Store with explicit power-on values, validated like the setters.
    pub fn with_initial(
        attenuator_percentage: f64,
        pp_divider: i64,
        harmonic: i32,
        ra_frequency_khz: f64,
        ra_power_w: f64,
    ) -> LaserResult<Self> {
        let mut store = Self {
            actual_harmonic: harmonic,
            ra_frequency_khz,
            ra_power_w,
            ..Self::default()
        };
        store.set_attenuator_percentage(attenuator_percentage)?;
        store.set_pp_divider(pp_divider)?;
        Ok(store)
    }

    pub fn target_attenuator_percentage(&self) -> f64 {
        self.target_attenuator_percentage
    }

    pub fn actual_attenuator_percentage(&self) -> f64 {
        self.actual_attenuator_percentage
    }

    pub fn target_pp_divider(&self) -> i64 {
        self.target_pp_divider
    }

    pub fn actual_pp_divider(&self) -> i64 {
        self.actual_pp_divider
    }

    pub fn actual_harmonic(&self) -> i32 {
        self.actual_harmonic
    }

    pub fn ra_frequency_khz(&self) -> f64 {
        self.ra_frequency_khz
    }

    pub fn ra_power_w(&self) -> f64 {
        self.ra_power_w
    }

    pub fn set_attenuator_percentage(&mut self, percentage: f64) -> LaserResult<()> {
        check_attenuation(percentage)?;
        self.target_attenuator_percentage = percentage;
        self.actual_attenuator_percentage = settled_attenuation(percentage);
        Ok(())
    }

    pub fn set_pp_divider(&mut self, divider: i64) -> LaserResult<()> {
        check_pp_divider(divider)?;
        self.target_pp_divider = divider;
        self.actual_pp_divider = divider;
        Ok(())
    }

    pub(crate) fn set_ra_base(&mut self, frequency_khz: f64, power_w: f64) {
        self.ra_frequency_khz = frequency_khz;
        self.ra_power_w = power_w;
    }

    /// Output power in W; zero while the output is closed.
    pub fn output_power_w(&self, output_enabled: bool) -> f64 {
        if !output_enabled {
            return 0.0;
        }
        let divider_factor = if self.actual_pp_divider > 0 {
            1.0 / self.actual_pp_divider as f64
        } else {
            0.0
        };
        self.ra_power_w * (self.actual_attenuator_percentage / 100.0) * divider_factor
    }

    /// Pulse repetition rate after the pulse picker, in kHz.
    pub fn output_frequency_khz(&self) -> f64 {
        if self.actual_pp_divider > 0 {
            self.ra_frequency_khz / self.actual_pp_divider as f64
        } else {
            0.0
        }
    }

    /// Pulse energy in µJ.
    pub fn output_energy_uj(&self, output_enabled: bool) -> f64 {
        let frequency_khz = self.output_frequency_khz();
        let frequency_hz = frequency_khz * 1000.0;
        if frequency_hz == 0.0 {
            return 0.0;
        }
        self.output_power_w(output_enabled) * 1e6 / frequency_hz
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_power_on_values() {
        let store = ParameterStore::default();
        assert_eq!(store.target_attenuator_percentage(), 50.0);
        assert!(approx(store.actual_attenuator_percentage(), 50.1));
        assert_eq!(store.target_pp_divider(), 1);
        assert_eq!(store.actual_pp_divider(), 1);
        assert_eq!(store.actual_harmonic(), 1);
        assert_eq!(store.ra_frequency_khz(), 100.1);
        assert_eq!(store.ra_power_w(), 5.0);
    }

    #[test]
    fn test_attenuation_accepts_full_range() {
        let mut store = ParameterStore::default();
        for step in 0..=1000 {
            let p = step as f64 / 10.0;
            store.set_attenuator_percentage(p).unwrap();
            assert_eq!(store.target_attenuator_percentage(), p);
        }
    }

    #[test]
    fn test_attenuation_settling_offset() {
        let mut store = ParameterStore::default();

        store.set_attenuator_percentage(75.5).unwrap();
        assert!(approx(store.actual_attenuator_percentage(), 75.6));

        store.set_attenuator_percentage(0.0).unwrap();
        assert!(approx(store.actual_attenuator_percentage(), 0.1));

        store.set_attenuator_percentage(100.0).unwrap();
        assert_eq!(store.actual_attenuator_percentage(), 100.0);
    }

    #[test]
    fn test_attenuation_rejection_keeps_previous() {
        let mut store = ParameterStore::default();
        store.set_attenuator_percentage(30.0).unwrap();

        for bad in [-0.001, -50.0, 100.001, 150.0, f64::NAN, f64::INFINITY] {
            assert_matches!(
                store.set_attenuator_percentage(bad),
                Err(LaserError::InvalidParameter(msg)) if msg == "Attenuator percentage must be between 0 and 100"
            );
            assert_eq!(store.target_attenuator_percentage(), 30.0);
            assert!(approx(store.actual_attenuator_percentage(), 30.1));
        }
    }

    #[test]
    fn test_divider_range() {
        let mut store = ParameterStore::default();
        for d in [1, 2, 500, 999, 1000] {
            store.set_pp_divider(d).unwrap();
            assert_eq!(store.target_pp_divider(), d);
            assert_eq!(store.actual_pp_divider(), d);
        }

        for bad in [0, -1, -1000, 1001, 5000] {
            assert_matches!(
                store.set_pp_divider(bad),
                Err(LaserError::InvalidParameter(_))
            );
            assert_eq!(store.target_pp_divider(), 1000);
            assert_eq!(store.actual_pp_divider(), 1000);
        }
    }

    #[test]
    fn test_power_gated_on_output() {
        let mut store = ParameterStore::default();
        for p in [0.0, 25.0, 100.0] {
            store.set_attenuator_percentage(p).unwrap();
            assert_eq!(store.output_power_w(false), 0.0);
            assert_eq!(store.output_energy_uj(false), 0.0);
        }
    }

    #[test]
    fn test_half_attenuation_half_rate() {
        let mut store = ParameterStore::default();
        store.set_ra_base(100.0, 5.0);
        store.set_attenuator_percentage(50.0).unwrap();
        store.set_pp_divider(2).unwrap();

        let power = store.output_power_w(true);
        assert!(approx(power, 5.0 * 0.501 * 0.5));
        assert!((power - 1.25).abs() < 0.01);
        assert_eq!(store.output_frequency_khz(), 50.0);
        assert!(approx(store.output_energy_uj(true), power * 1e6 / 50_000.0));
    }

    #[test]
    fn test_frequency_not_gated_on_output() {
        let store = ParameterStore::default();
        assert_eq!(store.output_frequency_khz(), 100.1);
    }

    #[test]
    fn test_non_positive_divider_yields_zero() {
        let store = ParameterStore {
            actual_pp_divider: 0,
            ..ParameterStore::default()
        };
        assert_eq!(store.output_frequency_khz(), 0.0);
        assert_eq!(store.output_power_w(true), 0.0);
        assert_eq!(store.output_energy_uj(true), 0.0);

        let store = ParameterStore {
            actual_pp_divider: -4,
            ..ParameterStore::default()
        };
        assert_eq!(store.output_frequency_khz(), 0.0);
        assert_eq!(store.output_power_w(true), 0.0);
    }

    #[test]
    fn test_zero_base_rate_gives_zero_energy() {
        let mut store = ParameterStore::default();
        store.set_ra_base(0.0, 5.0);
        assert_eq!(store.output_energy_uj(true), 0.0);
    }

    #[test]
    fn test_with_initial_validates() {
        assert!(ParameterStore::with_initial(20.0, 4, 2, 200.0, 10.0).is_ok());
        assert!(ParameterStore::with_initial(120.0, 4, 2, 200.0, 10.0).is_err());
        assert!(ParameterStore::with_initial(20.0, 0, 2, 200.0, 10.0).is_err());
    }
}
