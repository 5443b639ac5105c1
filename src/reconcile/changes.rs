//! Field change primitive.
//!
//! `FieldChanges` pairs the desired document with the document it replaces
//! ("previous": the state before this reconciliation attempt began) and
//! resolves unset fields through the registry. Restart classification is
//! phrased entirely in terms of `has_change`, `old_value` and `new_value`.

use crate::model::DesiredConfig;
use crate::reconcile::error::{ReconcileError, ReconcileResult};
use crate::registry::{keys, FieldKind, FieldRegistry, FieldSpec, FieldValue};

#[derive(Debug, Clone, Copy)]
pub struct FieldChanges<'a> {
    registry: &'a FieldRegistry,
    new: &'a DesiredConfig,
    old: &'a DesiredConfig,
}

impl<'a> FieldChanges<'a> {
    pub fn new(registry: &'a FieldRegistry, new: &'a DesiredConfig, old: &'a DesiredConfig) -> Self {
        Self { registry, new, old }
    }

    pub fn registry(&self) -> &'a FieldRegistry {
        self.registry
    }

    pub fn desired(&self) -> &'a DesiredConfig {
        self.new
    }

    pub fn previous(&self) -> &'a DesiredConfig {
        self.old
    }

    pub fn spec(&self, name: &str) -> ReconcileResult<&'a FieldSpec> {
        self.registry
            .lookup(name)
            .ok_or_else(|| ReconcileError::validation(name, "unknown configuration field"))
    }

    fn resolve(&self, doc: &DesiredConfig, name: &str) -> ReconcileResult<FieldValue> {
        let spec = self.spec(name)?;
        if name == keys::EXTRA_CONFIG {
            return Ok(FieldValue::Map(doc.extra_config.clone()));
        }
        Ok(doc.get(name).cloned().unwrap_or_else(|| spec.default_value()))
    }

    /// Desired value of `name`. Unset inheriting fields keep the previous value.
    pub fn new_value(&self, name: &str) -> ReconcileResult<FieldValue> {
        if self.spec(name)?.inherit_when_unset && !self.new.contains(name) {
            return self.old_value(name);
        }
        self.resolve(self.new, name)
    }

    pub fn old_value(&self, name: &str) -> ReconcileResult<FieldValue> {
        self.resolve(self.old, name)
    }

    /// Whether the resolved value of `name` differs between the documents.
    pub fn has_change(&self, name: &str) -> ReconcileResult<bool> {
        Ok(self.old_value(name)? != self.new_value(name)?)
    }

    pub fn old_bool(&self, name: &str) -> ReconcileResult<bool> {
        let value = self.old_value(name)?;
        value.as_bool().ok_or_else(|| kind_mismatch(name, FieldKind::Bool, &value))
    }

    /// `(old, new)` pair for an integer field.
    pub fn int_change(&self, name: &str) -> ReconcileResult<(i64, i64)> {
        let old = self.old_value(name)?;
        let new = self.new_value(name)?;
        match (old.as_int(), new.as_int()) {
            (Some(o), Some(n)) => Ok((o, n)),
            (None, _) => Err(kind_mismatch(name, FieldKind::Int, &old)),
            (_, None) => Err(kind_mismatch(name, FieldKind::Int, &new)),
        }
    }
}

pub(crate) fn kind_mismatch(name: &str, expected: FieldKind, got: &FieldValue) -> ReconcileError {
    ReconcileError::validation(name, format!("expected a {} value, got {}", expected, got.kind()))
}
