//! Virtual machine configuration reconciler.

pub mod config;
pub mod model;
pub mod observability;
pub mod reconcile;
pub mod registry;
pub mod store;

pub use config::schema::ReconcilerConfig;
pub use model::{DesiredConfig, LiveSnapshot, UpdateRequest};
pub use reconcile::{ChangeDetector, ReconcileError, Reconciler, RequestBuilder, SnapshotMapper};
pub use registry::FieldRegistry;
