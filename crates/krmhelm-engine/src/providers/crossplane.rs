//! Crossplane provider-helm `Release`

use krmhelm_core::{HelmRelease, KubeObject};

use super::resource_skeleton;

pub const API_VERSION: &str = "helm.crossplane.io/v1beta1";
pub const KIND: &str = "Release";

/// Crossplane Releases are cluster-scoped, so no namespace is set
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossplaneProvider;

impl CrossplaneProvider {
    pub fn generate(&self, release: &HelmRelease) -> Vec<KubeObject> {
        vec![resource_skeleton(API_VERSION, KIND, &release.name, "")]
    }
}
