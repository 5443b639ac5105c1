//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! reconciler.toml
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ReconcilerConfig (validated, immutable)
//!     → [defaults] seeds the FieldRegistry once at startup
//!
//! Desired documents (TOML/JSON) and live snapshots (JSON)
//!     → loader.rs (parse only; field semantics are checked by the
//!       request builder against the registry)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_desired, load_snapshot, ConfigError};
pub use schema::{DefaultsConfig, ObservabilityConfig, ReconcilerConfig};
