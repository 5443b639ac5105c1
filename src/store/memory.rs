//! In-memory configuration store.

use crate::model::{DesiredConfig, LiveSnapshot};

use super::{ConfigStore, StoreError};

/// Holds one instance's documents in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    desired: DesiredConfig,
    last_applied: Option<DesiredConfig>,
    snapshot: Option<LiveSnapshot>,
}

impl MemoryStore {
    pub fn new(desired: DesiredConfig) -> Self {
        Self {
            desired,
            last_applied: None,
            snapshot: None,
        }
    }

    pub fn with_snapshot(mut self, snapshot: LiveSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    pub fn with_last_applied(mut self, applied: DesiredConfig) -> Self {
        self.last_applied = Some(applied);
        self
    }

    /// Replace the desired document, as a user edit would.
    pub fn set_desired(&mut self, desired: DesiredConfig) {
        self.desired = desired;
    }

    /// Replace the observed live state, as an out-of-band change would.
    pub fn set_snapshot(&mut self, snapshot: LiveSnapshot) {
        self.snapshot = Some(snapshot);
    }
}

impl ConfigStore for MemoryStore {
    fn desired(&self) -> Result<DesiredConfig, StoreError> {
        Ok(self.desired.clone())
    }

    fn last_applied(&self) -> Result<Option<DesiredConfig>, StoreError> {
        Ok(self.last_applied.clone())
    }

    fn live_snapshot(&self) -> Result<Option<LiveSnapshot>, StoreError> {
        Ok(self.snapshot.clone())
    }

    fn persist(&mut self, applied: &DesiredConfig, snapshot: LiveSnapshot) -> Result<(), StoreError> {
        self.last_applied = Some(applied.clone());
        self.snapshot = Some(snapshot);
        Ok(())
    }
}
