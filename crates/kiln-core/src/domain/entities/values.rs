//! Template values and the two views derived from them.
//!
//! Caller values and template defaults are merged twice, into two distinct
//! results that are never reconciled:
//!
//! ```text
//! ManifestValues = defaults ∪ caller                         (written to disk)
//! MergedValues   = defaults ∪ caller∖destination ∪ destination (passed as --data)
//! ```
//!
//! `∪` is a right-biased union: the right operand wins on key collision.
//! Key order follows insertion order, and an overridden key keeps the position
//! it first appeared at.

use serde_json::{Map, Value};

use crate::domain::error::{DomainError, json_type_name};

/// Reserved caller key whose object value is unpacked over the other values.
pub const DESTINATION_KEY: &str = "destination";

/// A JSON object, key order preserved.
pub type ValueMap = Map<String, Value>;

// ============================================================================
// Inputs
// ============================================================================

/// Defaults declared by the template. An absent defaults file is an empty map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateDefaults(ValueMap);

impl TemplateDefaults {
    pub fn new(values: ValueMap) -> Self {
        Self(values)
    }

    /// Accept a parsed defaults document; only a JSON object is valid.
    pub fn try_from_value(value: Value) -> Result<Self, DomainError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(DomainError::InvalidDefaults {
                found: json_type_name(&other),
            }),
        }
    }

    pub fn as_map(&self) -> &ValueMap {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Values supplied by whoever invoked the render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallerValues(ValueMap);

impl CallerValues {
    pub fn new(values: ValueMap) -> Self {
        Self(values)
    }

    /// Accept a JSON document; `null` is treated as "no values".
    pub fn try_from_value(value: Value) -> Result<Self, DomainError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            other => Err(DomainError::InvalidInput {
                field: "values".into(),
                reason: format!("must be an object, found {}", json_type_name(&other)),
            }),
        }
    }

    pub fn as_map(&self) -> &ValueMap {
        &self.0
    }

    /// Set a single value, replacing any previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Split off the `destination` sub-object.
    ///
    /// Returns the caller values without the reserved key, and the unpacked
    /// destination entries (empty when the key is absent or `null`).
    pub fn split_destination(&self) -> Result<(ValueMap, ValueMap), DomainError> {
        let mut rest = self.0.clone();
        let destination = match rest.shift_remove(DESTINATION_KEY) {
            None | Some(Value::Null) => ValueMap::new(),
            Some(Value::Object(map)) => map,
            Some(other) => {
                return Err(DomainError::InvalidInput {
                    field: DESTINATION_KEY.into(),
                    reason: format!("must be an object, found {}", json_type_name(&other)),
                });
            }
        };
        Ok((rest, destination))
    }
}

// ============================================================================
// Derived views
// ============================================================================

/// `defaults ∪ caller`, written next to the template for the engine.
///
/// The caller map is used as supplied, so a `destination` key is kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestValues(ValueMap);

impl ManifestValues {
    pub fn derive(defaults: &TemplateDefaults, caller: &CallerValues) -> Self {
        let mut values = defaults.as_map().clone();
        overlay(&mut values, caller.as_map());
        Self(values)
    }

    pub fn as_map(&self) -> &ValueMap {
        &self.0
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.0)
    }
}

/// `defaults ∪ caller∖destination ∪ destination`, the source of the render arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedValues(ValueMap);

impl MergedValues {
    pub fn derive(defaults: &TemplateDefaults, caller: &CallerValues) -> Result<Self, DomainError> {
        let (direct, destination) = caller.split_destination()?;

        let mut values = defaults.as_map().clone();
        overlay(&mut values, &direct);
        overlay(&mut values, &destination);
        Ok(Self(values))
    }

    pub fn as_map(&self) -> &ValueMap {
        &self.0
    }

    /// Flatten into one `flag key=value` pair per entry.
    pub fn render_arguments(&self, flag: &str) -> RenderArguments {
        RenderArguments(
            self.0
                .iter()
                .map(|(key, value)| RenderArgument {
                    flag: flag.to_string(),
                    assignment: format!("{}={}", key, stringify(value)),
                })
                .collect(),
        )
    }
}

// ============================================================================
// RenderArguments
// ============================================================================

/// One `--data key=value` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderArgument {
    pub flag: String,
    pub assignment: String,
}

/// Ordered data arguments for an engine invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderArguments(Vec<RenderArgument>);

impl RenderArguments {
    pub fn iter(&self) -> impl Iterator<Item = &RenderArgument> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, flag: &str, assignment: &str) -> bool {
        self.0
            .iter()
            .any(|arg| arg.flag == flag && arg.assignment == assignment)
    }

    /// Alternating `flag, assignment, flag, assignment, ...` argv entries.
    pub fn to_args(&self) -> Vec<String> {
        self.0
            .iter()
            .flat_map(|arg| [arg.flag.clone(), arg.assignment.clone()])
            .collect()
    }
}

fn overlay(base: &mut ValueMap, top: &ValueMap) {
    for (key, value) in top {
        base.insert(key.clone(), value.clone());
    }
}

/// Strings go through verbatim; everything else as compact JSON.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
