//! Argo CD `Application`

use krmhelm_core::{HelmRelease, KubeObject};

use super::resource_skeleton;

pub const API_VERSION: &str = "argoproj.io/v1alpha1";
pub const KIND: &str = "Application";

/// Namespace Argo CD watches for Applications
pub const NAMESPACE: &str = "argocd";

#[derive(Debug, Clone, Copy, Default)]
pub struct ArgoCdProvider;

impl ArgoCdProvider {
    pub fn generate(&self, release: &HelmRelease) -> Vec<KubeObject> {
        vec![resource_skeleton(API_VERSION, KIND, &release.name, NAMESPACE)]
    }
}
