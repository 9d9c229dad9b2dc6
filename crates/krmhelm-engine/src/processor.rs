//! The function pipeline over a `ResourceList`

use std::sync::Arc;

use krmhelm_core::{Error, HelmRelease, ResourceList, Result, resolve_values, validate_function_config};

use crate::config::Config;
use crate::providers::ProviderRegistry;
use crate::runner::{CommandHelmRunner, HelmRunner};

/// Runs one `HelmRelease` through validation, values resolution and its provider
pub struct Processor {
    config: Config,
    registry: ProviderRegistry,
}

impl Processor {
    /// Processor that runs the real helm executable from `config`
    pub fn new(config: Config) -> Self {
        let runner = Arc::new(CommandHelmRunner::from_config(&config));
        Self::with_runner(config, runner)
    }

    /// Processor with a custom helm runner
    pub fn with_runner(config: Config, runner: Arc<dyn HelmRunner>) -> Self {
        Self {
            config,
            registry: ProviderRegistry::new(runner),
        }
    }

    /// Process the resource list in place
    ///
    /// Generated documents are appended to `items` only once the provider
    /// has fully succeeded; on error the list is left untouched. Returns
    /// whether any document was added.
    pub async fn process(&self, rl: &mut ResourceList) -> Result<bool> {
        let fc = rl
            .function_config
            .as_ref()
            .ok_or_else(|| Error::validation("functionConfig is required"))?;

        validate_function_config(fc)?;
        let mut release = HelmRelease::parse(fc)?;

        tracing::debug!(
            name = %release.name,
            namespace = %release.namespace,
            provider = %release.provider,
            "processing HelmRelease"
        );

        let provider = self.registry.resolve(&release.provider)?;

        resolve_values(&mut release, &rl.items)?;
        if self.config.debug {
            match release.values.to_yaml() {
                Ok(yaml) => tracing::debug!(values = %yaml, "resolved values"),
                Err(e) => tracing::debug!(error = %e, "resolved values are not printable"),
            }
        }

        let generated = provider.generate(&release).await?;
        tracing::debug!(
            provider = %provider.kind(),
            count = generated.len(),
            "generated resources"
        );

        let mutated = !generated.is_empty();
        rl.items.extend(generated);
        Ok(mutated)
    }
}
