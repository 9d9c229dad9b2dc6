//! K3s / Rancher helm-controller `HelmChart`

use krmhelm_core::{HelmRelease, KubeObject};

use super::resource_skeleton;

pub const API_VERSION: &str = "helm.cattle.io/v1";
pub const KIND: &str = "HelmChart";

#[derive(Debug, Clone, Copy, Default)]
pub struct RancherProvider;

impl RancherProvider {
    pub fn generate(&self, release: &HelmRelease) -> Vec<KubeObject> {
        vec![resource_skeleton(
            API_VERSION,
            KIND,
            &release.name,
            &release.namespace,
        )]
    }
}
