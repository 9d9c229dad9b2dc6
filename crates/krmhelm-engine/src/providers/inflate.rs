//! Inflate provider: render the chart with `helm template`
//!
//! Values are written to a temporary file passed with `--values`; the file
//! is removed as soon as generation finishes. Helm's stdout is split into
//! documents and every document must parse, otherwise the whole generation
//! fails.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use krmhelm_core::{Error, HelmRelease, KubeObject, Result, Values};
use tempfile::NamedTempFile;

use crate::manifest::parse_documents;
use crate::runner::HelmRunner;

const NAME: &str = "inflate";

#[derive(Clone)]
pub struct InflateProvider {
    runner: Arc<dyn HelmRunner>,
}

impl InflateProvider {
    pub fn new(runner: Arc<dyn HelmRunner>) -> Self {
        Self { runner }
    }

    pub async fn generate(&self, release: &HelmRelease) -> Result<Vec<KubeObject>> {
        // Kept alive until helm has exited
        let values_file = write_values_file(&release.values)?;
        let args = template_args(release, values_file.as_ref().map(NamedTempFile::path));

        tracing::debug!(
            release = %release.release_name,
            args = %redacted(&args).join(" "),
            "running helm"
        );

        let output = self.runner.run(&args).await?;
        if !output.success() {
            let status = match output.status {
                Some(code) => format!("exit code {}", code),
                None => "termination by signal".to_string(),
            };
            return Err(Error::generation(
                NAME,
                format!("helm template failed with {}: {}", status, output.stderr),
            ));
        }

        let objects = parse_documents(&output.stdout)?;
        tracing::debug!(count = objects.len(), "parsed helm output");
        Ok(objects)
    }
}

/// Build the `helm template` argument list
///
/// The chart reference is always the last argument. An `oci://` repo is
/// folded into the reference; any other repo is passed with `--repo`.
pub fn template_args(release: &HelmRelease, values_file: Option<&Path>) -> Vec<String> {
    let chart = &release.chart;
    let mut args = vec!["template".to_string(), release.release_name.clone()];

    let chart_ref = if chart.is_oci() {
        format!("{}/{}", chart.repo.trim_end_matches('/'), chart.name)
    } else {
        if !chart.repo.is_empty() {
            args.extend(["--repo".to_string(), chart.repo.clone()]);
        }
        chart.name.clone()
    };

    if let Some(auth) = &chart.auth {
        if !auth.username.is_empty() {
            args.extend(["--username".to_string(), auth.username.clone()]);
        }
        if !auth.password.is_empty() {
            args.extend(["--password".to_string(), auth.password.clone()]);
        }
    }

    if !chart.version.is_empty() {
        args.extend(["--version".to_string(), chart.version.clone()]);
    }

    if !release.namespace.is_empty() {
        args.extend(["--namespace".to_string(), release.namespace.clone()]);
    }

    for api_version in &release.api_versions {
        args.extend(["--api-versions".to_string(), api_version.clone()]);
    }

    if release.include_crds {
        args.push("--include-crds".to_string());
    }

    if release.skip_tests {
        args.push("--skip-tests".to_string());
    }

    if let Some(path) = values_file {
        args.extend(["--values".to_string(), path.display().to_string()]);
    }

    args.push(chart_ref);
    args
}

/// Write non-empty values to a uniquely named temp file
fn write_values_file(values: &Values) -> Result<Option<NamedTempFile>> {
    if values.is_empty() {
        return Ok(None);
    }

    let yaml = values.to_yaml()?;
    let mut file = tempfile::Builder::new()
        .prefix("values-")
        .suffix(".yaml")
        .tempfile()
        .map_err(|e| Error::io("failed to create values file", e))?;

    let context = format!("failed to write {}", file.path().display());
    file.write_all(yaml.as_bytes())
        .map_err(|e| Error::io(context.clone(), e))?;
    file.flush().map_err(|e| Error::io(context, e))?;

    Ok(Some(file))
}

fn redacted(args: &[String]) -> Vec<&str> {
    let mut out = Vec::with_capacity(args.len());
    let mut hide_next = false;
    for arg in args {
        if hide_next {
            out.push("<redacted>");
            hide_next = false;
        } else {
            hide_next = arg == "--password";
            out.push(arg.as_str());
        }
    }
    out
}
