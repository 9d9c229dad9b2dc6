//! krmhelm Engine - expand a HelmRelease into deployable resources
//!
//! This crate provides:
//! - `Processor`: the pipeline over a `ResourceList` (validate, parse,
//!   resolve provider, harvest values, generate, append)
//! - `ProviderRegistry` and the `Provider` variants (inflate, argocd,
//!   fluxcd, crossplane, rancher)
//! - `HelmRunner`: the boundary to the helm executable, with a fake for tests
//! - multi-document YAML splitting for helm output

pub mod config;
pub mod manifest;
pub mod processor;
pub mod providers;
pub mod runner;

pub use config::Config;
pub use manifest::{parse_documents, split_documents};
pub use processor::Processor;
pub use providers::{Provider, ProviderKind, ProviderRegistry};
pub use runner::{CommandHelmRunner, FakeHelmRunner, HelmOutput, HelmRunner, RecordedCall};
