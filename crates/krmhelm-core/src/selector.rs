//! Values selector: harvest Helm values from sibling ConfigMaps and Secrets

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::object::KubeObject;
use crate::release::HelmRelease;

/// Kinds whose `data` can feed release values
pub const DATA_KINDS: [&str; 2] = ["ConfigMap", "Secret"];

/// Conjunctive filter over sibling documents
///
/// A document matches only if every criterion that is set matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValuesSelector {
    pub kind: Option<String>,
    pub name: Option<String>,
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
}

impl ValuesSelector {
    /// Parse the selector mapping found at `path`
    pub fn parse(fc: &KubeObject, path: &[&str]) -> Result<Self> {
        let field = |key| child_path(path, key);

        Ok(Self {
            kind: non_empty(fc.nested_string(&field("kind"))?),
            name: non_empty(fc.nested_string(&field("name"))?),
            labels: fc.nested_string_map(&field("labels"))?.unwrap_or_default(),
            annotations: fc
                .nested_string_map(&field("annotations"))?
                .unwrap_or_default(),
        })
    }

    /// Check a document against every criterion
    pub fn matches(&self, obj: &KubeObject) -> bool {
        if let Some(kind) = &self.kind {
            if kind != obj.kind() {
                return false;
            }
        }

        if let Some(name) = &self.name {
            if name != obj.name() {
                return false;
            }
        }

        let labels_match = self
            .labels
            .iter()
            .all(|(k, v)| obj.label(k) == Some(v.as_str()));

        let annotations_match = self
            .annotations
            .iter()
            .all(|(k, v)| obj.annotation(k) == Some(v.as_str()));

        labels_match && annotations_match
    }
}

/// Merge `data` from matching sibling documents into the release values
///
/// Documents are visited in the order given and each key is copied over the
/// existing values, so the last matching document wins, including over keys
/// set inline in the release. Only `ConfigMap` and `Secret` documents are
/// considered. Without a selector this does nothing.
pub fn resolve_values(release: &mut HelmRelease, items: &[KubeObject]) -> Result<()> {
    let Some(selector) = &release.values_selector else {
        return Ok(());
    };

    for obj in items {
        if !DATA_KINDS.contains(&obj.kind()) || !selector.matches(obj) {
            continue;
        }

        let data = obj
            .nested_string_map(&["data"])
            .map_err(|e| Error::io(format!("failed to read data from {}", obj.display_name()), e))?;

        let Some(data) = data else {
            tracing::debug!(source = %obj.display_name(), "matched document has no data");
            continue;
        };

        tracing::debug!(
            source = %obj.display_name(),
            keys = data.len(),
            "harvesting values"
        );

        for (key, value) in data {
            release.values.insert(key, value);
        }
    }

    Ok(())
}

fn child_path<'a>(path: &[&'a str], key: &'a str) -> Vec<&'a str> {
    let mut p = path.to_vec();
    p.push(key);
    p
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.filter(|s| !s.is_empty()).map(str::to_string)
}
