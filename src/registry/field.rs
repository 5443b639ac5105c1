//! Field declarations.
//!
//! A `FieldSpec` describes one key of the desired-configuration document:
//! its value kind, default, allowed values, numeric/length bounds and how a
//! change to it affects a running instance.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Value kinds a configuration field can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Bool,
    Int,
    String,
    StringSet,
    Map,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Bool => "bool",
            FieldKind::Int => "int",
            FieldKind::String => "string",
            FieldKind::StringSet => "stringset",
            FieldKind::Map => "map",
        };
        f.write_str(name)
    }
}

/// A single configuration value.
///
/// Deserializes untagged so that documents can be written as plain TOML or
/// JSON: booleans, integers, strings, string arrays and string tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    String(String),
    StringSet(BTreeSet<String>),
    Map(BTreeMap<String, String>),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Bool(_) => FieldKind::Bool,
            FieldValue::Int(_) => FieldKind::Int,
            FieldValue::String(_) => FieldKind::String,
            FieldValue::StringSet(_) => FieldKind::StringSet,
            FieldValue::Map(_) => FieldKind::Map,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            FieldValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// The value an unset field of `kind` takes when it has no default.
    pub fn zero(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Bool => FieldValue::Bool(false),
            FieldKind::Int => FieldValue::Int(0),
            FieldKind::String => FieldValue::String(String::new()),
            FieldKind::StringSet => FieldValue::StringSet(BTreeSet::new()),
            FieldKind::Map => FieldValue::Map(BTreeMap::new()),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Int(i64::from(v))
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::String(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::String(v)
    }
}

impl From<BTreeMap<String, String>> for FieldValue {
    fn from(v: BTreeMap<String, String>) -> Self {
        FieldValue::Map(v)
    }
}

/// How a change to a field affects a running instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RestartPolicy {
    /// Applied live, never forces a restart.
    Free,
    /// Applied live only when the instance's hot-plug capability allows it.
    ConditionalHotSwap,
    /// Any change forces a restart.
    AlwaysRestart,
}

/// Range constraint on a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bounds {
    Unbounded,
    IntAtLeast(i64),
    /// Inclusive character-count bounds for strings.
    Length { min: usize, max: usize },
}

/// Declaration of one configuration field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub default: Option<FieldValue>,
    pub allowed_values: Option<&'static [&'static str]>,
    pub bounds: Bounds,
    pub restart_policy: RestartPolicy,
    /// Must be present in every desired document and every live snapshot.
    pub required: bool,
    /// Read back from live state only, never sent in an update request.
    pub computed: bool,
    /// When a document leaves the field unset, keep the previous value
    /// instead of falling back to the default.
    pub inherit_when_unset: bool,
    pub description: &'static str,
}

impl FieldSpec {
    pub fn new(name: &'static str, kind: FieldKind, restart_policy: RestartPolicy) -> Self {
        Self {
            name,
            kind,
            default: None,
            allowed_values: None,
            bounds: Bounds::Unbounded,
            restart_policy,
            required: false,
            computed: false,
            inherit_when_unset: false,
            description: "",
        }
    }

    pub fn with_default(mut self, value: impl Into<FieldValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn one_of(mut self, values: &'static [&'static str]) -> Self {
        self.allowed_values = Some(values);
        self
    }

    pub fn at_least(mut self, min: i64) -> Self {
        self.bounds = Bounds::IntAtLeast(min);
        self
    }

    pub fn length(mut self, min: usize, max: usize) -> Self {
        self.bounds = Bounds::Length { min, max };
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn inherit_when_unset(mut self) -> Self {
        self.inherit_when_unset = true;
        self
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Value used when a document leaves this field unset.
    pub fn default_value(&self) -> FieldValue {
        self.default
            .clone()
            .unwrap_or_else(|| FieldValue::zero(self.kind))
    }

    /// Check `value` against kind, allowed values and bounds.
    ///
    /// Returns a human-readable reason on violation.
    pub fn check(&self, value: &FieldValue) -> Result<(), String> {
        if value.kind() != self.kind {
            return Err(format!("expected a {} value, got {}", self.kind, value.kind()));
        }

        if let Some(allowed) = self.allowed_values {
            match value {
                FieldValue::String(s) if !allowed.contains(&s.as_str()) => {
                    return Err(format!("{:?} is not one of {:?}", s, allowed));
                }
                FieldValue::StringSet(set) => {
                    if let Some(bad) = set.iter().find(|s| !allowed.contains(&s.as_str())) {
                        return Err(format!("{:?} is not one of {:?}", bad, allowed));
                    }
                }
                _ => {}
            }
        }

        match (self.bounds, value) {
            (Bounds::IntAtLeast(min), FieldValue::Int(i)) if *i < min => {
                Err(format!("{} is below the minimum of {}", i, min))
            }
            (Bounds::Length { min, max }, FieldValue::String(s)) => {
                let len = s.chars().count();
                if len < min || len > max {
                    Err(format!("length {} is outside {}..={}", len, min, max))
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }
}
