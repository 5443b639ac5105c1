//! Restart classification.
//!
//! # Responsibilities
//! - Decide, per field, whether a pending change forces the instance to
//!   restart
//! - Aggregate per-field decisions into one monotonic `RestartRequirement`
//!
//! # Rules
//! - CPU count: growing needs the *previous* hot-add flag, shrinking needs
//!   the *previous* hot-remove flag; otherwise restart
//! - Memory: growing needs the *previous* hot-add flag; shrinking always
//!   restarts
//! - Any other hot-swap field restarts iff its value changed
//!
//! Only the pre-change hot-plug flags count: toggling hot-add/remove is
//! itself a restart-requiring change, so the new value cannot apply to a
//! count change made in the same pass.

use crate::reconcile::changes::FieldChanges;
use crate::reconcile::error::ReconcileResult;
use crate::registry::{keys, FieldValue};

/// A field value paired with whether applying it forces a restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified<T> {
    pub value: T,
    pub restart_required: bool,
}

impl<T> Classified<T> {
    pub fn free(value: T) -> Self {
        Self {
            value,
            restart_required: false,
        }
    }

    pub fn restart_if(value: T, restart_required: bool) -> Self {
        Self {
            value,
            restart_required,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Classified<U> {
        Classified {
            value: f(self.value),
            restart_required: self.restart_required,
        }
    }
}

/// Hot-plug capability of the instance *before* this change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HotPlug {
    pub add: bool,
    pub remove: bool,
}

pub fn cpu_count(old: i64, new: i64, prior: HotPlug) -> Classified<i64> {
    let restart = if new > old {
        !prior.add
    } else if new < old {
        !prior.remove
    } else {
        false
    };
    Classified::restart_if(new, restart)
}

pub fn memory_size(old: i64, new: i64, prior_hot_add: bool) -> Classified<i64> {
    let restart = if new > old {
        !prior_hot_add
    } else {
        // Shrinking memory live is never supported.
        new < old
    };
    Classified::restart_if(new, restart)
}

pub fn on_change<T: PartialEq>(old: T, new: T) -> Classified<T> {
    let changed = old != new;
    Classified::restart_if(new, changed)
}

/// Classify a `ConditionalHotSwap` field.
pub fn conditional(changes: &FieldChanges<'_>, name: &str) -> ReconcileResult<Classified<FieldValue>> {
    match name {
        keys::NUM_CPUS => {
            let (old, new) = changes.int_change(keys::NUM_CPUS)?;
            let prior = HotPlug {
                add: changes.old_bool(keys::CPU_HOT_ADD_ENABLED)?,
                remove: changes.old_bool(keys::CPU_HOT_REMOVE_ENABLED)?,
            };
            Ok(cpu_count(old, new, prior).map(FieldValue::Int))
        }
        keys::MEMORY => {
            let (old, new) = changes.int_change(keys::MEMORY)?;
            let prior_hot_add = changes.old_bool(keys::MEMORY_HOT_ADD_ENABLED)?;
            Ok(memory_size(old, new, prior_hot_add).map(FieldValue::Int))
        }
        _ => Ok(on_change(changes.old_value(name)?, changes.new_value(name)?)),
    }
}

/// Whether a reconciliation pass forces a restart, and which fields did it.
///
/// Monotonic: once required, later evaluations cannot clear it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestartRequirement {
    required: bool,
    fields: Vec<String>,
}

impl RestartRequirement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one field's decision into the requirement.
    pub fn record(&mut self, field: &str, restart_required: bool) {
        if restart_required {
            self.required = true;
            self.fields.push(field.to_string());
        }
    }

    pub fn required(&self) -> bool {
        self.required
    }

    /// Fields that forced the restart, in evaluation order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DefaultsConfig;
    use crate::model::DesiredConfig;
    use crate::registry::FieldRegistry;

    #[test]
    fn test_cpu_scale_up_depends_on_prior_hot_add() {
        assert!(cpu_count(2, 4, HotPlug { add: false, remove: false }).restart_required);
        assert!(!cpu_count(2, 4, HotPlug { add: true, remove: false }).restart_required);
        assert_eq!(cpu_count(2, 4, HotPlug::default()).value, 4);
    }

    #[test]
    fn test_cpu_scale_down_depends_on_prior_hot_remove() {
        assert!(cpu_count(4, 2, HotPlug { add: true, remove: false }).restart_required);
        assert!(!cpu_count(4, 2, HotPlug { add: false, remove: true }).restart_required);
    }

    #[test]
    fn test_cpu_unchanged_never_restarts() {
        assert!(!cpu_count(4, 4, HotPlug::default()).restart_required);
    }

    #[test]
    fn test_memory_grow_depends_on_prior_hot_add() {
        assert!(memory_size(1024, 2048, false).restart_required);
        assert!(!memory_size(1024, 2048, true).restart_required);
        assert!(!memory_size(2048, 2048, false).restart_required);
    }

    #[test]
    fn test_memory_shrink_always_restarts() {
        assert!(memory_size(4096, 2048, false).restart_required);
        assert!(memory_size(4096, 2048, true).restart_required);
        assert!(memory_size(4096, 4095, true).restart_required);
    }

    #[test]
    fn test_on_change() {
        assert!(on_change("bios", "efi").restart_required);
        assert!(!on_change("bios", "bios").restart_required);
    }

    #[test]
    fn test_conditional_uses_previous_flags() {
        let registry = FieldRegistry::with_defaults(&DefaultsConfig::default()).unwrap();

        // Enabling hot-add in the same pass does not make the scale-up live.
        let old = DesiredConfig::new().with("num_cpus", 2i64).with("cpu_hot_add_enabled", false);
        let new = DesiredConfig::new().with("num_cpus", 4i64).with("cpu_hot_add_enabled", true);
        let c = conditional(&FieldChanges::new(&registry, &new, &old), "num_cpus").unwrap();
        assert_eq!(c.value, FieldValue::Int(4));
        assert!(c.restart_required);

        // Hot-add already on: live scale-up even when it is being disabled now.
        let old = DesiredConfig::new().with("num_cpus", 2i64).with("cpu_hot_add_enabled", true);
        let new = DesiredConfig::new().with("num_cpus", 4i64).with("cpu_hot_add_enabled", false);
        let c = conditional(&FieldChanges::new(&registry, &new, &old), "num_cpus").unwrap();
        assert!(!c.restart_required);
    }

    #[test]
    fn test_conditional_memory_from_documents() {
        let registry = FieldRegistry::with_defaults(&DefaultsConfig::default()).unwrap();
        let old = DesiredConfig::new().with("memory", 4096i64).with("memory_hot_add_enabled", true);
        let new = old.clone().with("memory", 2048i64);
        let c = conditional(&FieldChanges::new(&registry, &new, &old), "memory").unwrap();
        assert_eq!(c.value, FieldValue::Int(2048));
        assert!(c.restart_required);
    }

    #[test]
    fn test_restart_requirement_is_monotonic() {
        let mut restart = RestartRequirement::new();
        restart.record("annotation", false);
        assert!(!restart.required());

        restart.record("firmware", true);
        restart.record("annotation", false);
        restart.record("boot_delay", false);
        assert!(restart.required());
        assert_eq!(restart.fields(), ["firmware".to_string()]);
    }
}
