//! Virtual PHAROS laser.
//!
//! [`VirtualLaser`] models the instrument: a [`StateMachine`] with
//! asymmetric guards, a [`ParameterStore`] with validated target/actual pairs,
//! the preset table and the advanced flags. Output power, frequency and pulse
//! energy are computed on every read.
//!
//! With the `api` feature the crate also provides the axum REST surface that
//! mirrors the device's `/v1` API.

pub mod error;
pub mod format;
pub mod laser;
pub mod parameters;
pub mod preset;
pub mod shared;
pub mod state;

#[cfg(feature = "api")]
pub mod api;

pub use error::{LaserError, LaserResult};
pub use format::format_decimal;
pub use laser::{AdvancedSnapshot, BasicSnapshot, VirtualLaser, WarningEntry};
pub use parameters::{AdvancedFlags, ParameterStore};
pub use preset::{default_presets, Preset};
pub use shared::SharedLaser;
pub use state::{GeneralStatus, OperationalState, StateId, StateMachine};
