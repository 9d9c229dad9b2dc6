//! Helm values attached to a release

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};

/// Values container, always a mapping
///
/// Kept as YAML so whatever the release declares reaches helm unchanged:
/// non-string keys in nested maps, `.inf`, tagged scalars.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Values(pub Mapping);

impl Values {
    /// Create empty values
    pub fn new() -> Self {
        Self(Mapping::new())
    }

    /// Parse values from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(yaml).map_err(|e| Error::parse("values", e))?;
        Self::from_yaml_value("values", &value)
    }

    /// Take a YAML mapping as values
    ///
    /// `field` names the origin for error messages.
    pub fn from_yaml_value(field: &str, value: &Value) -> Result<Self> {
        match value {
            Value::Mapping(map) => Ok(Self(map.clone())),
            _ => Err(Error::parse(field, "expected a mapping")),
        }
    }

    /// Serialize as a YAML document, the format helm expects for `--values`
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.0).map_err(|e| Error::parse("values", e))
    }

    /// Insert a top-level key, replacing any existing entry
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(Value::String(key.into()), value.into());
    }

    /// Get a top-level key
    ///
    /// Keys are matched literally: harvested keys such as `service.port` are
    /// stored as-is and not split into a path.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of top-level keys
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if values are empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
