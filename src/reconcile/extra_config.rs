//! Shared extra-configuration map handling.
//!
//! The extra-configuration map is partially owned: other systems write keys
//! into it too. Two rules keep the reconciler from fighting them:
//! - reading live state only surfaces keys the target document mentions
//! - writing sends a minimal delta; keys dropped by the user become
//!   tombstones, keys never declared are left alone

use std::collections::BTreeMap;

use crate::model::{ExtraConfigDelta, ExtraConfigEntry, LiveOption};

/// Minimal edit set turning `old` into `new`.
///
/// Emits a tombstone for every key only in `old`, a set entry for every key
/// new or changed in `new`, and nothing for unchanged keys.
pub fn diff(old: &BTreeMap<String, String>, new: &BTreeMap<String, String>) -> ExtraConfigDelta {
    let mut entries = Vec::new();

    for key in old.keys() {
        if !new.contains_key(key) {
            entries.push(ExtraConfigEntry::tombstone(key.clone()));
        }
    }

    for (key, value) in new {
        if old.get(key) != Some(value) {
            entries.push(ExtraConfigEntry::set(key.clone(), value.clone()));
        }
    }

    ExtraConfigDelta::new(entries)
}

/// Live entries whose key `target` already declares.
pub fn surface_known(live: &[LiveOption], target: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    live.iter()
        .filter(|opt| target.contains_key(&opt.key))
        .map(|opt| (opt.key.clone(), opt.value.clone()))
        .collect()
}
