//! Observability for the classroom client.
//!
//! Metric recording helpers live in [`metrics`]; logging goes through
//! `tracing` directly at each call site.

pub mod metrics;
