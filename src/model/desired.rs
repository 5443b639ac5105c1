//! Desired-configuration documents.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::registry::keys;
use crate::registry::FieldValue;

/// User intent for one instance: field name → value, plus the shared
/// extra-configuration map.
///
/// Fields the document leaves unset resolve to registry defaults at build
/// time; the document itself never stores defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredConfig {
    #[serde(flatten)]
    values: BTreeMap<String, FieldValue>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_config: BTreeMap<String, String>,
}

impl DesiredConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field. A map value for `extra_config` replaces the extra-config map.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> &mut Self {
        let name = name.into();
        match value.into() {
            FieldValue::Map(map) if name == keys::EXTRA_CONFIG => self.extra_config = map,
            value => {
                self.values.insert(name, value);
            }
        }
        self
    }

    /// Builder-style [`DesiredConfig::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_config.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.values.remove(name)
    }

    /// Explicitly set fields, excluding `extra_config`.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether `name` holds the same declared value in both documents.
    /// Unset fields compare equal only to unset fields.
    pub fn same_field(&self, other: &DesiredConfig, name: &str) -> bool {
        if name == keys::EXTRA_CONFIG {
            self.extra_config == other.extra_config
        } else {
            self.get(name) == other.get(name)
        }
    }

    /// A copy whose extra-config map also tracks the keys of `previous`.
    ///
    /// Used as the flatten target so that keys dropped from this document
    /// since `previous` was applied are still read back from live state.
    pub fn tracking(&self, previous: &DesiredConfig) -> DesiredConfig {
        let mut target = self.clone();
        for (key, value) in &previous.extra_config {
            target
                .extra_config
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
        target
    }

    /// Label used in log events: the instance UUID when known, else its name.
    pub fn label(&self) -> &str {
        [keys::UUID, keys::NAME]
            .iter()
            .filter_map(|k| self.get(k).and_then(FieldValue::as_str))
            .find(|s| !s.is_empty())
            .unwrap_or("<unnamed>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_routes_extra_config_map() {
        let mut map = BTreeMap::new();
        map.insert("k".to_string(), "v".to_string());

        let doc = DesiredConfig::new().with("name", "vm1").with("extra_config", map.clone());
        assert_eq!(doc.extra_config, map);
        assert!(!doc.contains("extra_config"));
        assert_eq!(doc.fields().count(), 1);
    }

    #[test]
    fn test_tracking_keeps_current_values() {
        let current = DesiredConfig::new().with_extra("a", "new");
        let previous = DesiredConfig::new().with_extra("a", "old").with_extra("b", "2");

        let target = current.tracking(&previous);
        assert_eq!(target.extra_config.get("a").map(String::as_str), Some("new"));
        assert_eq!(target.extra_config.get("b").map(String::as_str), Some("2"));
        assert!(current.extra_config.get("b").is_none());
    }

    #[test]
    fn test_same_field() {
        let a = DesiredConfig::new().with("memory", 1024i64);
        let b = DesiredConfig::new().with("memory", 2048i64);
        assert!(!a.same_field(&b, "memory"));
        assert!(a.same_field(&a.clone(), "memory"));
        assert!(!a.same_field(&DesiredConfig::new(), "memory"));
        assert!(a.same_field(&b, "extra_config"));
    }

    #[test]
    fn test_label_prefers_uuid() {
        let doc = DesiredConfig::new().with("name", "vm1");
        assert_eq!(doc.label(), "vm1");
        let doc = doc.with("uuid", "4213-abcd");
        assert_eq!(doc.label(), "4213-abcd");
        assert_eq!(DesiredConfig::new().label(), "<unnamed>");
    }
}
