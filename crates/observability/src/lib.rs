//! Observability for the virtual laser
//!
//! - Structured logging via tracing
//! - Prometheus metrics for the HTTP surface
//!
//! ```ignore
//! use observability::{init_logging, LogFormat};
//!
//! init_logging("pharos-sim", LogFormat::Pretty)?;
//! observability::init_metrics(9020)?;
//! ```

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, LogFormat};
pub use metrics::{init_metrics, RequestMetricsGuard, ServerMetrics};
