//! Providers expand a [`HelmRelease`] into concrete documents
//!
//! The set of providers is closed: each key maps to one [`Provider`]
//! variant through [`ProviderRegistry::resolve`], and any other key is a
//! `NotFound` error.

mod argocd;
mod crossplane;
mod fluxcd;
mod inflate;
mod rancher;

pub use argocd::ArgoCdProvider;
pub use crossplane::CrossplaneProvider;
pub use fluxcd::FluxCdProvider;
pub use inflate::{InflateProvider, template_args};
pub use rancher::RancherProvider;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use krmhelm_core::{Error, HelmRelease, KubeObject, Result};
use serde_yaml::{Mapping, Value};

use crate::runner::HelmRunner;

/// Provider keys accepted in `spec.provider`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Inflate,
    ArgoCd,
    FluxCd,
    Crossplane,
    Rancher,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 5] = [
        Self::Inflate,
        Self::ArgoCd,
        Self::FluxCd,
        Self::Crossplane,
        Self::Rancher,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inflate => "inflate",
            Self::ArgoCd => "argocd",
            Self::FluxCd => "fluxcd",
            Self::Crossplane => "crossplane",
            Self::Rancher => "rancher",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                let supported: Vec<&str> = Self::ALL.iter().map(|k| k.as_str()).collect();
                Error::provider_not_found(s, &supported)
            })
    }
}

/// A resolved provider, ready to generate
#[derive(Clone)]
pub enum Provider {
    Inflate(InflateProvider),
    ArgoCd(ArgoCdProvider),
    FluxCd(FluxCdProvider),
    Crossplane(CrossplaneProvider),
    Rancher(RancherProvider),
}

impl Provider {
    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::Inflate(_) => ProviderKind::Inflate,
            Self::ArgoCd(_) => ProviderKind::ArgoCd,
            Self::FluxCd(_) => ProviderKind::FluxCd,
            Self::Crossplane(_) => ProviderKind::Crossplane,
            Self::Rancher(_) => ProviderKind::Rancher,
        }
    }

    /// Expand the release into output documents
    pub async fn generate(&self, release: &HelmRelease) -> Result<Vec<KubeObject>> {
        match self {
            Self::Inflate(p) => p.generate(release).await,
            Self::ArgoCd(p) => Ok(p.generate(release)),
            Self::FluxCd(p) => Ok(p.generate(release)),
            Self::Crossplane(p) => Ok(p.generate(release)),
            Self::Rancher(p) => Ok(p.generate(release)),
        }
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Provider").field(&self.kind()).finish()
    }
}

/// Maps provider keys to provider instances
#[derive(Clone)]
pub struct ProviderRegistry {
    runner: Arc<dyn HelmRunner>,
}

impl ProviderRegistry {
    /// Registry whose inflate provider runs helm through `runner`
    pub fn new(runner: Arc<dyn HelmRunner>) -> Self {
        Self { runner }
    }

    /// Look up a provider by key
    pub fn resolve(&self, key: &str) -> Result<Provider> {
        let provider = match key.parse::<ProviderKind>()? {
            ProviderKind::Inflate => Provider::Inflate(InflateProvider::new(self.runner.clone())),
            ProviderKind::ArgoCd => Provider::ArgoCd(ArgoCdProvider),
            ProviderKind::FluxCd => Provider::FluxCd(FluxCdProvider),
            ProviderKind::Crossplane => Provider::Crossplane(CrossplaneProvider),
            ProviderKind::Rancher => Provider::Rancher(RancherProvider),
        };
        Ok(provider)
    }
}

/// Build `apiVersion`/`kind`/`metadata` with an empty `spec`
///
/// An empty namespace leaves `metadata.namespace` unset (cluster-scoped).
fn resource_skeleton(api_version: &str, kind: &str, name: &str, namespace: &str) -> KubeObject {
    let mut obj = KubeObject::with_identity(api_version, kind, name);
    if !namespace.is_empty() {
        obj.set_nested(&["metadata", "namespace"], namespace);
    }
    obj.set_nested(&["spec"], Value::Mapping(Mapping::new()));
    obj
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::FakeHelmRunner;

    fn registry() -> ProviderRegistry {
        ProviderRegistry::new(Arc::new(FakeHelmRunner::default()))
    }

    #[test]
    fn test_resolve_every_key() {
        let registry = registry();
        for kind in ProviderKind::ALL {
            let provider = registry.resolve(kind.as_str()).unwrap();
            assert_eq!(provider.kind(), kind);
        }
    }

    #[test]
    fn test_resolve_unknown_key() {
        let err = registry().resolve("helmfile").unwrap_err();
        match &err {
            Error::NotFound { provider, help } => {
                assert_eq!(provider, "helmfile");
                assert_eq!(
                    help.as_deref(),
                    Some("supported providers: inflate, argocd, fluxcd, crossplane, rancher")
                );
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(err.to_string(), "unknown provider type: helmfile");
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        assert!("ArgoCD".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_skeleton_omits_empty_namespace() {
        let obj = resource_skeleton("v1", "Thing", "a", "");
        assert!(obj.get_nested(&["metadata", "namespace"]).is_none());
        assert!(obj.is_nested_map(&["spec"]));
    }
}
