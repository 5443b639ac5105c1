//! Reconciliation metrics.
//!
//! # Metrics
//! - `vm_reconcile_detections_total` (counter): change-detector runs by
//!   `changed` = true/false
//! - `vm_reconcile_restart_triggers_total` (counter): fields that forced a
//!   restart, by `field`
//! - `vm_reconcile_cycles_total` (counter): reconciliation cycles by
//!   `outcome` = in_sync/applied/error
//!
//! # Design Decisions
//! - Recording is gated by a process-wide flag set from
//!   `[observability].metrics_enabled`
//! - Field names are a closed set (the registry), so the `field` label
//!   cannot blow up cardinality

use std::sync::atomic::{AtomicBool, Ordering};

use metrics::counter;

static ENABLED: AtomicBool = AtomicBool::new(true);

pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

pub fn record_detection(changed: bool) {
    if is_enabled() {
        counter!("vm_reconcile_detections_total", "changed" => changed.to_string()).increment(1);
    }
}

pub fn record_restart_trigger(field: &str) {
    if is_enabled() {
        counter!("vm_reconcile_restart_triggers_total", "field" => field.to_string()).increment(1);
    }
}

pub fn record_cycle(outcome: &'static str) {
    if is_enabled() {
        counter!("vm_reconcile_cycles_total", "outcome" => outcome).increment(1);
    }
}
