//! Flux `HelmRelease` plus the `HelmRepository` it pulls from

use krmhelm_core::{HelmRelease, KubeObject};

use super::resource_skeleton;

pub const RELEASE_API_VERSION: &str = "helm.toolkit.fluxcd.io/v2beta1";
pub const RELEASE_KIND: &str = "HelmRelease";
pub const REPOSITORY_API_VERSION: &str = "source.toolkit.fluxcd.io/v1beta1";
pub const REPOSITORY_KIND: &str = "HelmRepository";

#[derive(Debug, Clone, Copy, Default)]
pub struct FluxCdProvider;

impl FluxCdProvider {
    pub fn generate(&self, release: &HelmRelease) -> Vec<KubeObject> {
        vec![
            resource_skeleton(
                RELEASE_API_VERSION,
                RELEASE_KIND,
                &release.name,
                &release.namespace,
            ),
            resource_skeleton(
                REPOSITORY_API_VERSION,
                REPOSITORY_KIND,
                &release.name,
                &release.namespace,
            ),
        ]
    }
}
