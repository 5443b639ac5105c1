//! Data model shared by the reconciliation components.
//!
//! # Data Flow
//! ```text
//! LiveSnapshot (remote state) ──flatten──▶ DesiredConfig (baseline)
//! DesiredConfig (user intent) ──build────▶ UpdateRequest (to transport)
//! ```
//!
//! `DesiredConfig` and `LiveSnapshot` are supplied per call and never
//! mutated by the core; `UpdateRequest` is built fresh on every pass.

pub mod desired;
pub mod request;
pub mod snapshot;
pub mod types;

pub use desired::DesiredConfig;
pub use request::{
    BootOptions, ExtraConfigDelta, ExtraConfigEntry, ExtraConfigValue, FlagInfo, ResourceAllocation,
    Shares, ToolsConfig, UpdateRequest,
};
pub use snapshot::{
    LiveAllocation, LiveBootOptions, LiveFlags, LiveHardware, LiveOption, LiveShares, LiveSnapshot,
    LiveTools,
};
pub use types::{Firmware, ShareLevel, SwapPlacement, UnknownValue, VirtualExecUsage, VirtualMmuUsage};
