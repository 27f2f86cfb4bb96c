//! Operational state machine of the laser.
//!
//! The guards are deliberately asymmetric and mirror the device firmware:
//!
//! | operation       | allowed from                          | on refusal           |
//! |-----------------|---------------------------------------|----------------------|
//! | `turn_on`       | Off, Disconnected, StandingBy (no-op if Operational) | `InvalidTransition` |
//! | `turn_off`      | anything but Off                      | `InvalidTransition`  |
//! | `go_to_standby` | anything                              | -                    |
//! | `enable_output` | Operational                           | `ForbiddenOperation` |
//! | `close_output`  | anything                              | -                    |

use crate::error::{LaserError, LaserResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

/// Lifecycle phase of the laser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationalState {
    #[serde(rename = "StateDisconnected")]
    Disconnected,
    #[serde(rename = "StateOff")]
    Off,
    #[serde(rename = "StateStandingBy")]
    StandingBy,
    #[serde(rename = "StateOperational")]
    Operational,
    #[serde(rename = "StateEmissionOn")]
    EmissionOn,
    #[serde(rename = "StateFailure")]
    Failure,
    #[serde(rename = "StateShuttingDown")]
    ShuttingDown,
    #[serde(rename = "StateDetectingLaserState")]
    DetectingState,
    #[serde(rename = "StatePreparingHardware")]
    PreparingHardware,
}

impl OperationalState {
    /// Name reported by `ActualStateName`.
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "StateDisconnected",
            Self::Off => "StateOff",
            Self::StandingBy => "StateStandingBy",
            Self::Operational => "StateOperational",
            Self::EmissionOn => "StateEmissionOn",
            Self::Failure => "StateFailure",
            Self::ShuttingDown => "StateShuttingDown",
            Self::DetectingState => "StateDetectingLaserState",
            Self::PreparingHardware => "StatePreparingHardware",
        }
    }

    /// Numeric state id reported by the advanced API.
    pub fn state_id(&self) -> StateId {
        match self {
            Self::Disconnected => StateId::Disconnected,
            Self::Off => StateId::Off,
            Self::StandingBy => StateId::StandingBy,
            // Emission is a sub-state of operational on the controller.
            Self::Operational | Self::EmissionOn => StateId::Operational,
            Self::Failure => StateId::Failure,
            Self::ShuttingDown => StateId::ShuttingDown,
            Self::DetectingState => StateId::DetectingLaserState,
            Self::PreparingHardware => StateId::Initializing,
        }
    }

    pub fn general_status(&self) -> GeneralStatus {
        match self {
            Self::Disconnected => GeneralStatus::Disconnected,
            Self::Off | Self::ShuttingDown | Self::DetectingState => GeneralStatus::Off,
            Self::StandingBy | Self::PreparingHardware => GeneralStatus::Standby,
            Self::Operational => GeneralStatus::Operational,
            Self::EmissionOn => GeneralStatus::EmissionOn,
            Self::Failure => GeneralStatus::Failure,
        }
    }
}

impl fmt::Display for OperationalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire_str())
    }
}

/// Bit-flag state ids of the PHAROS advanced API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StateId {
    #[default]
    Unknown,
    StandingBy,
    Service,
    InFieldUpdate,
    Initializing,
    GoingToStandby,
    Failure,
    Housekeeping,
    Operational,
    ShuttingDown,
    Off,
    DetectingLaserState,
    Disconnected,
}

impl StateId {
    pub fn code(&self) -> u32 {
        match self {
            Self::Unknown => 0x00,
            Self::StandingBy => 0x01,
            Self::Service => 0x02,
            Self::InFieldUpdate => 0x04,
            Self::Initializing => 0x08,
            Self::GoingToStandby => 0x10,
            Self::Failure => 0x20,
            Self::Housekeeping => 0x40,
            Self::Operational => 0x80,
            Self::ShuttingDown => 0x100,
            Self::Off => 0x200,
            Self::DetectingLaserState => 0x400,
            Self::Disconnected => 0x800,
        }
    }
}

/// Coarse status reported by `GeneralStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GeneralStatus {
    #[default]
    Disconnected,
    Off,
    Standby,
    Operational,
    EmissionOn,
    Failure,
}

impl GeneralStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "Disconnected",
            Self::Off => "Off",
            Self::Standby => "Standby",
            Self::Operational => "Operational",
            Self::EmissionOn => "EmissionOn",
            Self::Failure => "Failure",
        }
    }
}

impl fmt::Display for GeneralStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn can_turn_on(state: OperationalState) -> bool {
    matches!(
        state,
        OperationalState::Off | OperationalState::Disconnected | OperationalState::StandingBy
    )
}

fn can_turn_off(state: OperationalState) -> bool {
    state != OperationalState::Off
}

fn can_enable_output(state: OperationalState) -> bool {
    state == OperationalState::Operational
}

/// Operational state plus the output-enable flag.
///
/// Invariant: `output_enabled` implies `state == EmissionOn`.
#[derive(Debug, Clone)]
pub struct StateMachine {
    state: OperationalState,
    output_enabled: bool,
    last_change: Instant,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    /// Starts Operational, skipping the Disconnected → ... → Operational boot.
    pub fn new() -> Self {
        Self::starting_in(OperationalState::Operational)
    }

    /// Starts in an arbitrary state with output closed.
    pub fn starting_in(state: OperationalState) -> Self {
        Self {
            state,
            output_enabled: false,
            last_change: Instant::now(),
        }
    }

    pub fn state(&self) -> OperationalState {
        self.state
    }

    pub fn is_output_enabled(&self) -> bool {
        self.output_enabled
    }

    pub fn state_id(&self) -> StateId {
        self.state.state_id()
    }

    pub fn general_status(&self) -> GeneralStatus {
        self.state.general_status()
    }

    /// Time since the last successful transition.
    pub fn since_last_change(&self) -> Duration {
        self.last_change.elapsed()
    }

    pub fn turn_on(&mut self) -> LaserResult<()> {
        if self.state == OperationalState::Operational {
            return Ok(());
        }
        if !can_turn_on(self.state) {
            return Err(LaserError::InvalidTransition {
                operation: "turn on laser",
                state: self.state,
            });
        }
        self.enter(OperationalState::Operational);
        Ok(())
    }

    pub fn turn_off(&mut self) -> LaserResult<()> {
        if !can_turn_off(self.state) {
            return Err(LaserError::InvalidTransition {
                operation: "turn off laser",
                state: self.state,
            });
        }
        self.output_enabled = false;
        self.enter(OperationalState::Off);
        Ok(())
    }

    pub fn go_to_standby(&mut self) {
        self.output_enabled = false;
        self.enter(OperationalState::StandingBy);
    }

    pub fn enable_output(&mut self) -> LaserResult<()> {
        if !can_enable_output(self.state) {
            return Err(LaserError::ForbiddenOperation {
                operation: "enable output",
                state: self.state,
            });
        }
        self.output_enabled = true;
        self.enter(OperationalState::EmissionOn);
        Ok(())
    }

    pub fn close_output(&mut self) {
        self.output_enabled = false;
        let next = match self.state {
            OperationalState::EmissionOn => OperationalState::Operational,
            other => other,
        };
        self.enter(next);
    }

    fn enter(&mut self, state: OperationalState) {
        self.state = state;
        self.last_change = Instant::now();
    }
}
