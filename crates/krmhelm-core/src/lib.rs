//! krmhelm Core - document model and release types for the krm-helm-fn function
//!
//! This crate provides the types every pipeline stage works on:
//! - `KubeObject`: typed accessors over a single YAML document
//! - `ResourceList`: the function's input/output envelope
//! - `HelmRelease`: the parsed control document, with validation
//! - `Values`: Helm values handed to providers
//! - `ValuesSelector`: harvesting values from sibling ConfigMaps/Secrets

pub mod error;
pub mod object;
pub mod release;
pub mod resource_list;
pub mod selector;
pub mod values;

pub use error::{Error, Result};
pub use object::KubeObject;
pub use release::{ChartAuth, ChartSpec, HelmRelease, validate_function_config};
pub use resource_list::ResourceList;
pub use selector::{DATA_KINDS, ValuesSelector, resolve_values};
pub use values::Values;
