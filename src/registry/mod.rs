//! Field registry.
//!
//! # Responsibilities
//! - Declare every configuration field (kind, default, allowed values, bounds)
//! - Classify each field's restart policy
//! - Hold global defaults (guest OS identifier, firmware)
//!
//! # Design Decisions
//! - Built once at startup from `[defaults]`, immutable afterwards
//! - Construction rejects duplicate names, empty allowed-value lists and
//!   defaults that violate their own field's constraints
//! - Shared by reference; no interior mutability, so concurrent
//!   reconciliations need no locking

pub mod catalog;
pub mod field;
pub mod keys;

use std::collections::HashMap;

use thiserror::Error;

use crate::config::schema::DefaultsConfig;

pub use field::{Bounds, FieldKind, FieldSpec, FieldValue, RestartPolicy};
pub use keys::AllocationKind;

/// Errors raised while assembling a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("field {0:?} is declared more than once")]
    DuplicateField(&'static str),

    #[error("field {0:?} declares an empty allowed-value list")]
    EmptyAllowedValues(&'static str),

    #[error("invalid default for field {field:?}: {reason}")]
    InvalidDefault { field: &'static str, reason: String },
}

/// Immutable catalog of configuration fields.
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    fields: Vec<FieldSpec>,
    index: HashMap<&'static str, usize>,
}

impl FieldRegistry {
    /// Build a registry from explicit field declarations.
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self, RegistryError> {
        let mut index = HashMap::with_capacity(fields.len());

        for (pos, spec) in fields.iter().enumerate() {
            if index.insert(spec.name, pos).is_some() {
                return Err(RegistryError::DuplicateField(spec.name));
            }

            match spec.allowed_values {
                Some(values) if values.is_empty() => {
                    return Err(RegistryError::EmptyAllowedValues(spec.name));
                }
                None if spec.kind == FieldKind::StringSet => {
                    return Err(RegistryError::EmptyAllowedValues(spec.name));
                }
                _ => {}
            }

            if let Some(default) = &spec.default {
                spec.check(default).map_err(|reason| RegistryError::InvalidDefault {
                    field: spec.name,
                    reason,
                })?;
            }
        }

        Ok(Self { fields, index })
    }

    /// Build the virtual machine registry with the given global defaults.
    pub fn with_defaults(defaults: &DefaultsConfig) -> Result<Self, RegistryError> {
        Self::new(catalog::standard_fields(defaults))
    }

    pub fn lookup(&self, name: &str) -> Option<&FieldSpec> {
        self.index.get(name).map(|&pos| &self.fields[pos])
    }

    /// All fields in declaration order.
    pub fn all_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard() -> FieldRegistry {
        FieldRegistry::with_defaults(&DefaultsConfig::default()).unwrap()
    }

    #[test]
    fn test_standard_registry_builds() {
        let registry = standard();
        // 28 scalar fields + 8 allocation fields + extra_config + 2 computed
        assert_eq!(registry.len(), 39);
        assert!(registry.all_fields().any(|f| f.name == keys::EXTRA_CONFIG));
    }

    #[test]
    fn test_lookup_defaults_and_policies() {
        let registry = standard();

        let guest_id = registry.lookup(keys::GUEST_ID).unwrap();
        assert_eq!(guest_id.default, Some(FieldValue::from("other-64")));
        assert_eq!(guest_id.restart_policy, RestartPolicy::AlwaysRestart);

        let num_cpus = registry.lookup(keys::NUM_CPUS).unwrap();
        assert_eq!(num_cpus.restart_policy, RestartPolicy::ConditionalHotSwap);

        let limit = registry.lookup("memory_limit").unwrap();
        assert_eq!(limit.default, Some(FieldValue::Int(-1)));
        assert_eq!(limit.bounds, Bounds::IntAtLeast(-1));

        assert!(registry.lookup("does_not_exist").is_none());
    }

    #[test]
    fn test_configured_defaults_flow_into_registry() {
        let defaults = DefaultsConfig {
            guest_id: "ubuntu64Guest".to_string(),
            firmware: "efi".to_string(),
        };
        let registry = FieldRegistry::with_defaults(&defaults).unwrap();
        assert_eq!(
            registry.lookup(keys::FIRMWARE).unwrap().default_value(),
            FieldValue::from("efi")
        );
        assert_eq!(
            registry.lookup(keys::GUEST_ID).unwrap().default_value(),
            FieldValue::from("ubuntu64Guest")
        );
    }

    #[test]
    fn test_rejects_invalid_configured_firmware() {
        let defaults = DefaultsConfig {
            firmware: "uefi".to_string(),
            ..DefaultsConfig::default()
        };
        let err = FieldRegistry::with_defaults(&defaults).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidDefault { field: "firmware", .. }));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let fields = vec![
            FieldSpec::new("name", FieldKind::String, RestartPolicy::Free),
            FieldSpec::new("name", FieldKind::String, RestartPolicy::Free),
        ];
        assert_eq!(
            FieldRegistry::new(fields).unwrap_err(),
            RegistryError::DuplicateField("name")
        );
    }

    #[test]
    fn test_rejects_string_set_without_allowed_values() {
        let fields = vec![FieldSpec::new("tags", FieldKind::StringSet, RestartPolicy::Free)];
        assert_eq!(
            FieldRegistry::new(fields).unwrap_err(),
            RegistryError::EmptyAllowedValues("tags")
        );

        let fields = vec![FieldSpec::new("tags", FieldKind::StringSet, RestartPolicy::Free).one_of(&[])];
        assert_eq!(
            FieldRegistry::new(fields).unwrap_err(),
            RegistryError::EmptyAllowedValues("tags")
        );
    }

    #[test]
    fn test_rejects_default_of_wrong_kind() {
        let fields = vec![FieldSpec::new("memory", FieldKind::Int, RestartPolicy::Free).with_default("big")];
        assert!(matches!(
            FieldRegistry::new(fields),
            Err(RegistryError::InvalidDefault { field: "memory", .. })
        ));
    }
}
