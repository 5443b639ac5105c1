//! Change detector.
//!
//! # Data Flow
//! ```text
//! LiveSnapshot ──flatten──▶ baseline
//! build(baseline, baseline) ──▶ no-op request
//! build(desired,  baseline) ──▶ candidate request
//! no-op == candidate ?  →  in sync : changed
//! ```
//!
//! Detection and construction share one code path: "does anything change"
//! is answered by building both requests and comparing them structurally.
//! The comparison also serves as the idempotence check; a freshly flattened
//! snapshot must never compare as changed against itself.

use crate::model::{DesiredConfig, LiveSnapshot, UpdateRequest};
use crate::observability::metrics;
use crate::reconcile::builder::RequestBuilder;
use crate::reconcile::error::{ReconcileError, ReconcileResult};
use crate::reconcile::flatten::SnapshotMapper;
use crate::reconcile::restart::RestartRequirement;
use crate::registry::FieldRegistry;

/// Result of comparing desired state against live state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeReport {
    /// Request converging the live state toward the desired document.
    pub request: UpdateRequest,
    pub changed: bool,
    pub restart: RestartRequirement,
}

#[derive(Debug, Clone, Copy)]
pub struct ChangeDetector<'r> {
    mapper: SnapshotMapper<'r>,
    builder: RequestBuilder<'r>,
}

impl<'r> ChangeDetector<'r> {
    pub fn new(registry: &'r FieldRegistry) -> Self {
        Self {
            mapper: SnapshotMapper::new(registry),
            builder: RequestBuilder::new(registry),
        }
    }

    /// Compare `desired` against `snapshot`, surfacing only the live
    /// extra-config keys that `desired` declares.
    pub fn has_changed(&self, desired: &DesiredConfig, snapshot: &LiveSnapshot) -> ReconcileResult<ChangeReport> {
        self.has_changed_tracking(desired, desired, snapshot)
    }

    /// Like [`ChangeDetector::has_changed`], but the live extra-config keys
    /// surfaced into the baseline are those declared by `tracked`.
    pub fn has_changed_tracking(
        &self,
        desired: &DesiredConfig,
        tracked: &DesiredConfig,
        snapshot: &LiveSnapshot,
    ) -> ReconcileResult<ChangeReport> {
        let baseline = self.mapper.flatten(snapshot, tracked)?;

        let noop = self
            .builder
            .build(&baseline, &baseline)
            .map_err(live_state_error)?;
        let candidate = self.builder.build(desired, &baseline)?;

        let changed = candidate.request != noop.request;
        metrics::record_detection(changed);
        tracing::debug!(
            instance = %desired.label(),
            changed,
            restart_required = candidate.restart_required(),
            "Compared desired configuration against live state"
        );

        Ok(ChangeReport {
            request: candidate.request,
            changed,
            restart: candidate.restart,
        })
    }
}

/// A baseline that fails to build means the live snapshot itself is unusable.
fn live_state_error(err: ReconcileError) -> ReconcileError {
    match err {
        ReconcileError::Validation { field, reason } => ReconcileError::Mapping { field, reason },
        ReconcileError::Consistency(reason) => ReconcileError::mapping("hardware", reason),
        mapping @ ReconcileError::Mapping { .. } => mapping,
    }
}
