//! The `ResourceList` envelope exchanged with the orchestrator on stdin/stdout

use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;

use crate::error::{Error, Result};
use crate::object::KubeObject;

pub const RESOURCE_LIST_API_VERSION: &str = "config.kubernetes.io/v1";
pub const RESOURCE_LIST_KIND: &str = "ResourceList";

/// Ordered collection of documents plus the function's control document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceList {
    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_kind")]
    pub kind: String,

    /// Sibling documents, in the order the orchestrator supplied them
    #[serde(default)]
    pub items: Vec<KubeObject>,

    /// The `HelmRelease` control document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_config: Option<KubeObject>,

    /// Any other envelope field (`results` from earlier functions), passed through as-is
    #[serde(flatten)]
    pub extra: Mapping,
}

fn default_api_version() -> String {
    RESOURCE_LIST_API_VERSION.to_string()
}

fn default_kind() -> String {
    RESOURCE_LIST_KIND.to_string()
}

impl Default for ResourceList {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            kind: default_kind(),
            items: Vec::new(),
            function_config: None,
            extra: Mapping::new(),
        }
    }
}

impl ResourceList {
    /// Create a list with a control document and items
    pub fn new(function_config: KubeObject, items: Vec<KubeObject>) -> Self {
        Self {
            items,
            function_config: Some(function_config),
            ..Default::default()
        }
    }

    /// Parse a `ResourceList` from YAML text
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let list: Self = serde_yaml::from_str(yaml).map_err(|e| Error::parse("ResourceList", e))?;
        if list.kind != RESOURCE_LIST_KIND {
            return Err(Error::parse(
                "ResourceList",
                format!("expected kind: {}, got: {}", RESOURCE_LIST_KIND, list.kind),
            ));
        }
        Ok(list)
    }

    /// Serialize to YAML text
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::parse("ResourceList", e))
    }
}
