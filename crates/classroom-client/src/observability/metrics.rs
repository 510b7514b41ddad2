//! Metrics definitions for the classroom client.
//!
//! All metrics follow Prometheus naming conventions:
//! - `classroom_` prefix
//! - `_total` suffix for counters
//!
//! # Cardinality
//!
//! Labels are bounded:
//! - `outcome`: granted, too_early, error
//! - `device`: microphone, camera
//! - `reason`: waiting, lock
//! - `kind`: time_extended, raise_hand, unknown, malformed
//!
//! The library only records through the `metrics` facade. The embedding
//! application decides whether to install a recorder.

use metrics::counter;

/// Record the outcome of a join request.
///
/// Metric: `classroom_join_requests_total`
/// Labels: `outcome`
pub fn record_join_request(outcome: &'static str) {
    counter!("classroom_join_requests_total", "outcome" => outcome).increment(1);
}

/// Record a capture device forced off by an override.
///
/// Metric: `classroom_device_overrides_total`
/// Labels: `device`, `reason`
pub fn record_device_override(device: &'static str, reason: &'static str) {
    counter!(
        "classroom_device_overrides_total",
        "device" => device,
        "reason" => reason
    )
    .increment(1);
}

/// Record an ephemeral message received from the room.
///
/// Metric: `classroom_ephemeral_messages_total`
/// Labels: `kind`
pub fn record_ephemeral_message(kind: &'static str) {
    counter!("classroom_ephemeral_messages_total", "kind" => kind).increment(1);
}

/// Record a control metadata document that failed to parse.
///
/// Metric: `classroom_control_metadata_rejected_total`
pub fn record_control_metadata_rejected() {
    counter!("classroom_control_metadata_rejected_total").increment(1);
}
