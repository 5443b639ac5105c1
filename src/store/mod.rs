//! Collaborator ports.
//!
//! # Responsibilities
//! - `ConfigStore`: supplies desired documents, remembers what was last
//!   applied and the live snapshot observed after it
//! - `VirtualMachineApi`: applies an update request to the remote platform
//!
//! # Design Decisions
//! - Synchronous traits; the reconciliation core does no I/O of its own and
//!   leaves scheduling to whoever drives it
//! - The remote API is assumed to apply a request atomically or fail as a
//!   whole, so there is no partial-apply error variant

pub mod memory;

use thiserror::Error;

use crate::model::{DesiredConfig, LiveSnapshot, UpdateRequest};

pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("no desired configuration for {0}")]
    NotFound(String),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("reconfigure rejected: {0}")]
    Rejected(String),

    #[error("remote call failed: {0}")]
    Transport(String),
}

/// Source of desired state and sink for applied state.
pub trait ConfigStore {
    /// The currently loaded desired document.
    fn desired(&self) -> Result<DesiredConfig, StoreError>;

    /// The document persisted by the last successful apply, if any.
    fn last_applied(&self) -> Result<Option<DesiredConfig>, StoreError>;

    /// The live snapshot recorded by the last read or apply, if any.
    fn live_snapshot(&self) -> Result<Option<LiveSnapshot>, StoreError>;

    /// Record a successful apply: the document that was applied and the
    /// snapshot the platform returned.
    fn persist(&mut self, applied: &DesiredConfig, snapshot: LiveSnapshot) -> Result<(), StoreError>;

    /// Whether `field` differs between the loaded document and the last
    /// applied one. Everything counts as changed before the first apply.
    fn has_field_changed(&self, field: &str) -> Result<bool, StoreError> {
        let desired = self.desired()?;
        Ok(match self.last_applied()? {
            Some(previous) => !desired.same_field(&previous, field),
            None => true,
        })
    }
}

/// Remote virtualization platform.
pub trait VirtualMachineApi {
    /// Apply `request` and return the resulting live snapshot.
    fn reconfigure(&mut self, request: &UpdateRequest) -> Result<LiveSnapshot, ApiError>;
}
