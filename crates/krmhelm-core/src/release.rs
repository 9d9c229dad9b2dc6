//! The `HelmRelease` control document and its parsed model

use crate::error::{Error, Result};
use crate::object::KubeObject;
use crate::selector::ValuesSelector;
use crate::values::Values;

/// `apiVersion` of the control document
pub const API_VERSION: &str = "krm.kubed.io";

/// `kind` of the control document
pub const KIND: &str = "HelmRelease";

const SPEC: &str = "spec";
const PROVIDER: &str = "provider";
const CHART: &str = "chart";
const VALUES: &str = "values";
const VALUES_SELECTOR: &str = "valuesSelector";
const INCLUDE_CRDS: &str = "includeCRDs";
const API_VERSIONS: &str = "apiVersions";
const SKIP_TESTS: &str = "skipTests";
const RELEASE_NAME: &str = "releaseName";

/// A parsed release request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HelmRelease {
    /// `metadata.name` of the control document
    pub name: String,

    /// `metadata.namespace`; empty means cluster-scoped
    pub namespace: String,

    /// Provider key, resolved through the provider registry
    pub provider: String,

    /// Chart to render or reference
    pub chart: ChartSpec,

    /// Helm release name, defaults to `name`
    pub release_name: String,

    /// Inline values, later augmented by the values selector
    pub values: Values,

    /// Criteria for harvesting values from sibling documents
    pub values_selector: Option<ValuesSelector>,

    /// Render CRDs along with the other templates
    pub include_crds: bool,

    /// Skip chart test templates
    pub skip_tests: bool,

    /// Kubernetes API versions advertised to the chart
    pub api_versions: Vec<String>,
}

/// Chart reference
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartSpec {
    pub name: String,
    pub version: String,
    /// Repository URL or `oci://` registry reference
    pub repo: String,
    pub auth: Option<ChartAuth>,
}

/// Credentials for private chart repositories
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ChartAuth {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for ChartAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl ChartSpec {
    /// Whether the repo is an OCI registry reference
    pub fn is_oci(&self) -> bool {
        self.repo.starts_with("oci://")
    }
}

/// Check the control document's shape before it is parsed
pub fn validate_function_config(fc: &KubeObject) -> Result<()> {
    let api_version = fc
        .get_nested(&["apiVersion"])
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::validation("apiVersion is required"))?;
    if api_version != API_VERSION {
        return Err(Error::validation(format!(
            "expected apiVersion: {}, got: {}",
            API_VERSION, api_version
        )));
    }

    let kind = fc
        .get_nested(&["kind"])
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::validation("kind is required"))?;
    if kind != KIND {
        return Err(Error::validation(format!(
            "expected kind: {}, got: {}",
            KIND, kind
        )));
    }

    if !fc.is_nested_map(&[SPEC]) {
        return Err(Error::validation("spec is required and must be a mapping"));
    }

    match fc.get_nested(&[SPEC, PROVIDER]).and_then(|v| v.as_str()) {
        Some(p) if !p.is_empty() => {}
        _ => return Err(Error::validation("spec.provider is required")),
    }

    if !fc.is_nested_map(&[SPEC, CHART]) {
        return Err(Error::validation("spec.chart is required and must be a mapping"));
    }

    Ok(())
}

impl HelmRelease {
    /// Parse a validated control document
    pub fn parse(fc: &KubeObject) -> Result<Self> {
        let name = required_string(fc, &["metadata", "name"])?;
        let namespace = optional_string(fc, &["metadata", "namespace"])?;
        let provider = required_string(fc, &[SPEC, PROVIDER])?;

        let chart = ChartSpec {
            name: required_string(fc, &[SPEC, CHART, "name"])?,
            version: optional_string(fc, &[SPEC, CHART, "version"])?,
            repo: optional_string(fc, &[SPEC, CHART, "repo"])?,
            auth: parse_auth(fc)?,
        };

        let values = match fc.get_nested(&[SPEC, VALUES]) {
            None | Some(serde_yaml::Value::Null) => Values::new(),
            Some(v) => Values::from_yaml_value("spec.values", v)?,
        };

        let values_selector = match fc.nested_map(&[SPEC, VALUES_SELECTOR])? {
            Some(_) => Some(ValuesSelector::parse(fc, &[SPEC, VALUES_SELECTOR])?),
            None => None,
        };

        let release_name = match fc.nested_string(&[SPEC, RELEASE_NAME])? {
            Some(r) if !r.is_empty() => r.to_string(),
            _ => name.clone(),
        };

        Ok(Self {
            name,
            namespace,
            provider,
            chart,
            release_name,
            values,
            values_selector,
            include_crds: fc.nested_bool(&[SPEC, INCLUDE_CRDS])?.unwrap_or(false),
            skip_tests: fc.nested_bool(&[SPEC, SKIP_TESTS])?.unwrap_or(false),
            api_versions: fc
                .nested_string_slice(&[SPEC, API_VERSIONS])?
                .unwrap_or_default(),
        })
    }
}

fn parse_auth(fc: &KubeObject) -> Result<Option<ChartAuth>> {
    let path = [SPEC, CHART, "auth"];
    if fc.nested_map(&path)?.is_none() {
        return Ok(None);
    }
    Ok(Some(ChartAuth {
        username: optional_string(fc, &[SPEC, CHART, "auth", "username"])?,
        password: optional_string(fc, &[SPEC, CHART, "auth", "password"])?,
    }))
}

fn required_string(fc: &KubeObject, path: &[&str]) -> Result<String> {
    match fc.nested_string(path)? {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(Error::missing_field(path.join("."))),
    }
}

fn optional_string(fc: &KubeObject, path: &[&str]) -> Result<String> {
    Ok(fc.nested_string(path)?.unwrap_or_default().to_string())
}
