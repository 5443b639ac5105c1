//! vm-reconciler
//!
//! Offline driver for the reconciliation core: reads a desired document and a
//! captured live snapshot, and prints what an update would look like.
//!
//! # Architecture Overview
//!
//! ```text
//!   reconciler.toml ──▶ config ──[defaults]──▶ FieldRegistry (immutable)
//!                                                   │
//!   desired.{toml,json} ─┐                          ▼
//!                        ├──▶ reconcile::ChangeDetector ──▶ JSON report
//!   snapshot.json ───────┘        (flatten → build → compare)
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use vm_reconciler::config::{self, ReconcilerConfig};
use vm_reconciler::model::{DesiredConfig, UpdateRequest};
use vm_reconciler::observability::{logging, metrics};
use vm_reconciler::reconcile::{ChangeDetector, SnapshotMapper};
use vm_reconciler::registry::FieldRegistry;

#[derive(Parser)]
#[command(name = "vm-reconciler")]
#[command(about = "Compute virtual machine configuration updates from desired and live state", long_about = None)]
struct Cli {
    /// Reconciler configuration file (TOML).
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare a desired document against a live snapshot
    Diff {
        #[arg(long)]
        desired: PathBuf,
        #[arg(long)]
        snapshot: PathBuf,
        /// Document applied by the previous run; its extra_config keys are tracked
        #[arg(long)]
        last_applied: Option<PathBuf>,
    },
    /// Print a live snapshot in desired-document shape
    Flatten {
        #[arg(long)]
        snapshot: PathBuf,
        /// Document whose extra_config keys are surfaced from live state
        #[arg(long)]
        desired: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct DiffReport<'a> {
    changed: bool,
    restart_required: bool,
    restart_fields: &'a [String],
    request: &'a UpdateRequest,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => ReconcilerConfig::default(),
    };

    logging::init_logging(&config.observability);
    metrics::set_enabled(config.observability.metrics_enabled);

    tracing::debug!(
        guest_id = %config.defaults.guest_id,
        firmware = %config.defaults.firmware,
        "Configuration loaded"
    );

    let registry = FieldRegistry::with_defaults(&config.defaults)?;

    match cli.command {
        Commands::Diff {
            desired,
            snapshot,
            last_applied,
        } => {
            let desired = config::load_desired(&desired)?;
            let snapshot = config::load_snapshot(&snapshot)?;
            let tracked = match last_applied {
                Some(path) => desired.tracking(&config::load_desired(&path)?),
                None => desired.clone(),
            };

            let report = ChangeDetector::new(&registry).has_changed_tracking(&desired, &tracked, &snapshot)?;
            let out = DiffReport {
                changed: report.changed,
                restart_required: report.restart.required(),
                restart_fields: report.restart.fields(),
                request: &report.request,
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Commands::Flatten { snapshot, desired } => {
            let snapshot = config::load_snapshot(&snapshot)?;
            let target = match desired {
                Some(path) => config::load_desired(&path)?,
                None => DesiredConfig::new(),
            };

            let doc = SnapshotMapper::new(&registry).flatten(&snapshot, &target)?;
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
    }

    Ok(())
}
