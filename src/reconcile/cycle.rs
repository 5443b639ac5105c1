//! Reconciliation cycle.
//!
//! # Data Flow
//! ```text
//! ConfigStore ──desired / last applied / live snapshot──▶ ChangeDetector
//!     in sync  → CycleOutcome::InSync
//!     changed  → VirtualMachineApi::reconfigure(request)
//!              → ConfigStore::persist(desired, new snapshot)
//!              → re-detect against the new snapshot (warn on residual drift)
//!              → CycleOutcome::Applied
//! ```
//!
//! One call handles one instance. Errors end the cycle and are returned as-is;
//! retrying is the caller's decision.

use thiserror::Error;

use crate::model::{DesiredConfig, LiveSnapshot, UpdateRequest};
use crate::observability::metrics;
use crate::reconcile::detector::ChangeDetector;
use crate::reconcile::error::ReconcileError;
use crate::reconcile::restart::RestartRequirement;
use crate::registry::FieldRegistry;
use crate::store::{ApiError, ConfigStore, StoreError, VirtualMachineApi};

#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error("configuration store error: {0}")]
    Store(#[from] StoreError),

    #[error("virtualization API error: {0}")]
    Api(#[from] ApiError),

    #[error("no live snapshot available for {0}")]
    MissingSnapshot(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Live state already matches the desired document.
    InSync,
    /// An update was sent to the platform.
    Applied {
        request: UpdateRequest,
        restart: RestartRequirement,
    },
}

impl CycleOutcome {
    fn label(&self) -> &'static str {
        match self {
            CycleOutcome::InSync => "in_sync",
            CycleOutcome::Applied { .. } => "applied",
        }
    }
}

pub struct Reconciler<'r, S, A> {
    registry: &'r FieldRegistry,
    detector: ChangeDetector<'r>,
    store: S,
    api: A,
}

impl<'r, S: ConfigStore, A: VirtualMachineApi> Reconciler<'r, S, A> {
    pub fn new(registry: &'r FieldRegistry, store: S, api: A) -> Self {
        Self {
            registry,
            detector: ChangeDetector::new(registry),
            store,
            api,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Run one reconciliation pass.
    pub fn run_once(&mut self) -> Result<CycleOutcome, CycleError> {
        let result = self.reconcile();
        match &result {
            Ok(outcome) => metrics::record_cycle(outcome.label()),
            Err(e) => {
                tracing::error!(error = %e, "Reconciliation cycle failed");
                metrics::record_cycle("error");
            }
        }
        result
    }

    fn reconcile(&mut self) -> Result<CycleOutcome, CycleError> {
        let desired = self.store.desired()?;
        let last_applied = self.store.last_applied()?;
        let snapshot = self
            .store
            .live_snapshot()?
            .ok_or_else(|| CycleError::MissingSnapshot(desired.label().to_string()))?;

        if last_applied.is_some() {
            let edited = self.edited_fields()?;
            if !edited.is_empty() {
                tracing::info!(
                    instance = %desired.label(),
                    fields = %edited.join(","),
                    "Desired configuration edited since last apply"
                );
            }
        }

        let tracked = match &last_applied {
            Some(previous) => desired.tracking(previous),
            None => desired.clone(),
        };
        let report = self.detector.has_changed_tracking(&desired, &tracked, &snapshot)?;

        if !report.changed {
            tracing::debug!(instance = %desired.label(), "Live state in sync");
            return Ok(CycleOutcome::InSync);
        }

        tracing::info!(
            instance = %desired.label(),
            restart_required = report.restart.required(),
            restart_fields = %report.restart.fields().join(","),
            "Applying configuration update"
        );

        let updated = self.api.reconfigure(&report.request)?;
        self.store.persist(&desired, updated.clone())?;
        self.check_converged(&desired, &updated);

        Ok(CycleOutcome::Applied {
            request: report.request,
            restart: report.restart,
        })
    }

    fn edited_fields(&self) -> Result<Vec<&'static str>, StoreError> {
        let mut edited = Vec::new();
        for spec in self.registry.all_fields().filter(|s| !s.computed) {
            if self.store.has_field_changed(spec.name)? {
                edited.push(spec.name);
            }
        }
        Ok(edited)
    }

    fn check_converged(&self, desired: &DesiredConfig, updated: &LiveSnapshot) {
        match self.detector.has_changed(desired, updated) {
            Ok(report) if report.changed => tracing::warn!(
                instance = %desired.label(),
                "Live state still differs from desired configuration after apply"
            ),
            Ok(_) => {}
            Err(e) => tracing::warn!(
                instance = %desired.label(),
                error = %e,
                "Could not verify live state after apply"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DefaultsConfig;
    use crate::reconcile::flatten::SnapshotMapper;
    use crate::store::MemoryStore;

    /// Returns a fixed snapshot and records every request it receives.
    struct CannedApi {
        reply: Result<LiveSnapshot, String>,
        calls: Vec<UpdateRequest>,
    }

    impl CannedApi {
        fn replying(snapshot: LiveSnapshot) -> Self {
            Self {
                reply: Ok(snapshot),
                calls: Vec::new(),
            }
        }

        fn failing(reason: &str) -> Self {
            Self {
                reply: Err(reason.to_string()),
                calls: Vec::new(),
            }
        }
    }

    impl VirtualMachineApi for CannedApi {
        fn reconfigure(&mut self, request: &UpdateRequest) -> Result<LiveSnapshot, ApiError> {
            self.calls.push(request.clone());
            self.reply.clone().map_err(ApiError::Rejected)
        }
    }

    fn registry() -> FieldRegistry {
        FieldRegistry::with_defaults(&DefaultsConfig::default()).unwrap()
    }

    fn in_sync_desired(registry: &FieldRegistry) -> DesiredConfig {
        SnapshotMapper::new(registry)
            .flatten(&LiveSnapshot::sample(), &DesiredConfig::new())
            .unwrap()
    }

    #[test]
    fn test_in_sync_makes_no_api_call() {
        let registry = registry();
        let store = MemoryStore::new(in_sync_desired(&registry)).with_snapshot(LiveSnapshot::sample());
        let mut reconciler = Reconciler::new(&registry, store, CannedApi::replying(LiveSnapshot::sample()));

        assert_eq!(reconciler.run_once().unwrap(), CycleOutcome::InSync);
        assert!(reconciler.api().calls.is_empty());
        assert!(reconciler.store().last_applied().unwrap().is_none());
    }

    #[test]
    fn test_change_is_applied_and_persisted() {
        let registry = registry();
        let desired = in_sync_desired(&registry).with("annotation", "db tier");
        let mut updated = LiveSnapshot::sample();
        updated.annotation = Some("db tier".to_string());

        let store = MemoryStore::new(desired.clone()).with_snapshot(LiveSnapshot::sample());
        let mut reconciler = Reconciler::new(&registry, store, CannedApi::replying(updated.clone()));

        let (request, restart) = match reconciler.run_once().unwrap() {
            CycleOutcome::Applied { request, restart } => (request, restart),
            other => panic!("expected an apply, got {:?}", other),
        };
        assert_eq!(request.annotation, "db tier");
        assert!(!restart.required());
        assert_eq!(reconciler.api().calls.len(), 1);
        assert_eq!(reconciler.store().last_applied().unwrap(), Some(desired));
        assert_eq!(reconciler.store().live_snapshot().unwrap(), Some(updated));

        // Second pass sees the persisted snapshot and does nothing.
        assert_eq!(reconciler.run_once().unwrap(), CycleOutcome::InSync);
        assert_eq!(reconciler.api().calls.len(), 1);
    }

    #[test]
    fn test_missing_snapshot() {
        let registry = registry();
        let store = MemoryStore::new(in_sync_desired(&registry));
        let mut reconciler = Reconciler::new(&registry, store, CannedApi::replying(LiveSnapshot::sample()));

        assert!(matches!(reconciler.run_once(), Err(CycleError::MissingSnapshot(ref id)) if id == "4213-abcd"));
    }

    #[test]
    fn test_api_failure_leaves_store_untouched() {
        let registry = registry();
        let desired = in_sync_desired(&registry).with("memory", 2048i64);
        let store = MemoryStore::new(desired).with_snapshot(LiveSnapshot::sample());
        let mut reconciler = Reconciler::new(&registry, store, CannedApi::failing("host in maintenance"));

        let err = reconciler.run_once().unwrap_err();
        assert!(matches!(err, CycleError::Api(ApiError::Rejected(_))));
        assert!(reconciler.store().last_applied().unwrap().is_none());
    }

    #[test]
    fn test_invalid_desired_document_is_surfaced() {
        let registry = registry();
        let desired = in_sync_desired(&registry).with("num_cores_per_socket", 4i64);
        let store = MemoryStore::new(desired).with_snapshot(LiveSnapshot::sample());
        let mut reconciler = Reconciler::new(&registry, store, CannedApi::replying(LiveSnapshot::sample()));

        assert!(matches!(
            reconciler.run_once(),
            Err(CycleError::Reconcile(ReconcileError::Consistency(_)))
        ));
        assert!(reconciler.api().calls.is_empty());
    }
}
