//! Typed accessors over a generic Kubernetes-style document
//!
//! A [`KubeObject`] wraps a YAML mapping and exposes the handful of
//! operations the function needs: reading nested fields with type checks,
//! setting nested fields, and reading the standard identity fields
//! (`apiVersion`, `kind`, `metadata.name`, `metadata.namespace`, labels and
//! annotations).
//!
//! Nested readers return `Ok(None)` when a field is absent and an error when
//! it is present with the wrong type, so callers can tell "not set" apart
//! from "set to something unusable".

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};

/// A single structured document (Kubernetes resource)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KubeObject(Mapping);

impl KubeObject {
    /// Create an empty object
    pub fn new() -> Self {
        Self(Mapping::new())
    }

    /// Create an object with `apiVersion`, `kind` and `metadata.name` set
    pub fn with_identity(api_version: &str, kind: &str, name: &str) -> Self {
        let mut obj = Self::new();
        obj.set_nested(&["apiVersion"], api_version);
        obj.set_nested(&["kind"], kind);
        obj.set_nested(&["metadata", "name"], name);
        obj
    }

    /// Parse a single YAML document; the document root must be a mapping
    pub fn parse(yaml: &str) -> Result<Self> {
        let value: Value =
            serde_yaml::from_str(yaml).map_err(|e| Error::parse("document", e))?;
        Self::try_from(value)
    }

    /// Serialize to YAML text
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.0).map_err(|e| Error::parse(self.display_name(), e))
    }

    // =========================================================================
    // Nested access
    // =========================================================================

    /// Get the raw value at a nested path
    pub fn get_nested(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.0.get(*first)?;
        for key in rest {
            current = current.as_mapping()?.get(*key)?;
        }
        Some(current)
    }

    /// Check whether the value at `path` exists and is a mapping
    pub fn is_nested_map(&self, path: &[&str]) -> bool {
        matches!(self.get_nested(path), Some(Value::Mapping(_)))
    }

    /// Read a nested string
    pub fn nested_string(&self, path: &[&str]) -> Result<Option<&str>> {
        match self.get_nested(path) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(type_mismatch(path, "a string", other)),
        }
    }

    /// Read a nested bool
    pub fn nested_bool(&self, path: &[&str]) -> Result<Option<bool>> {
        match self.get_nested(path) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(type_mismatch(path, "a boolean", other)),
        }
    }

    /// Read a nested mapping
    pub fn nested_map(&self, path: &[&str]) -> Result<Option<&Mapping>> {
        match self.get_nested(path) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Mapping(m)) => Ok(Some(m)),
            Some(other) => Err(type_mismatch(path, "a mapping", other)),
        }
    }

    /// Read a nested list of strings
    pub fn nested_string_slice(&self, path: &[&str]) -> Result<Option<Vec<String>>> {
        let seq = match self.get_nested(path) {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Sequence(seq)) => seq,
            Some(other) => return Err(type_mismatch(path, "a list", other)),
        };

        seq.iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(Error::parse(
                    format!("{}[{}]", path.join("."), i),
                    format!("expected a string, got {}", type_name(other)),
                )),
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    /// Read a nested flat mapping of string keys to string values
    pub fn nested_string_map(&self, path: &[&str]) -> Result<Option<BTreeMap<String, String>>> {
        let Some(map) = self.nested_map(path)? else {
            return Ok(None);
        };

        let mut out = BTreeMap::new();
        for (k, v) in map {
            let key = k.as_str().ok_or_else(|| {
                Error::parse(path.join("."), format!("expected string keys, got {}", type_name(k)))
            })?;
            let value = v.as_str().ok_or_else(|| {
                Error::parse(
                    format!("{}.{}", path.join("."), key),
                    format!("expected a string, got {}", type_name(v)),
                )
            })?;
            out.insert(key.to_string(), value.to_string());
        }
        Ok(Some(out))
    }

    /// Set a value at a nested path, creating intermediate mappings
    ///
    /// Intermediate values that are not mappings are replaced.
    pub fn set_nested(&mut self, path: &[&str], value: impl Into<Value>) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };

        let mut current = &mut self.0;
        for key in parents {
            let entry = current
                .entry(Value::from(*key))
                .or_insert_with(|| Value::Mapping(Mapping::new()));
            if !entry.is_mapping() {
                *entry = Value::Mapping(Mapping::new());
            }
            let Value::Mapping(next) = entry else {
                unreachable!("entry was just made a mapping");
            };
            current = next;
        }
        current.insert(Value::from(*last), value.into());
    }

    // =========================================================================
    // Identity fields
    // =========================================================================

    /// `apiVersion`, or empty when unset
    pub fn api_version(&self) -> &str {
        self.identity_field(&["apiVersion"])
    }

    /// `kind`, or empty when unset
    pub fn kind(&self) -> &str {
        self.identity_field(&["kind"])
    }

    /// `metadata.name`, or empty when unset
    pub fn name(&self) -> &str {
        self.identity_field(&["metadata", "name"])
    }

    /// `metadata.namespace`, or empty when unset
    pub fn namespace(&self) -> &str {
        self.identity_field(&["metadata", "namespace"])
    }

    /// Look up a single label value
    pub fn label(&self, key: &str) -> Option<&str> {
        self.get_nested(&["metadata", "labels", key])?.as_str()
    }

    /// Look up a single annotation value
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.get_nested(&["metadata", "annotations", key])?.as_str()
    }

    /// `Kind/name` for logs and error messages
    pub fn display_name(&self) -> String {
        format!("{}/{}", self.kind(), self.name())
    }

    fn identity_field(&self, path: &[&str]) -> &str {
        self.get_nested(path).and_then(Value::as_str).unwrap_or_default()
    }
}

impl TryFrom<Value> for KubeObject {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Mapping(m) => Ok(Self(m)),
            other => Err(Error::parse(
                "document",
                format!("expected a mapping at the document root, got {}", type_name(&other)),
            )),
        }
    }
}

fn type_mismatch(path: &[&str], expected: &str, found: &Value) -> Error {
    Error::parse(
        path.join("."),
        format!("expected {}, got {}", expected, type_name(found)),
    )
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
