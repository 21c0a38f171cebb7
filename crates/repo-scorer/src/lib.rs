//! Rule-based quality scoring for software repository metrics.
//!
//! The engine consumes a [`scoring::MetricSnapshot`] and produces a decimal
//! score. Fetching the metrics, transport mapping, and persistence belong to
//! the caller.

pub mod config;
pub mod error;
pub mod scoring;
pub mod telemetry;
