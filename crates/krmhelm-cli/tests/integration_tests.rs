//! Integration tests driving the function binary

use std::io::Write;
use std::process::{Command, Output, Stdio};

use serde_yaml::Value;

/// Run the function with `input` on stdin
fn krm_helm_fn(args: &[&str], input: &str) -> Output {
    krm_helm_fn_with_env(args, &[], input)
}

/// Run the function with only the given configuration variables set
fn krm_helm_fn_with_env(args: &[&str], env: &[(&str, &str)], input: &str) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_krm-helm-fn"));
    cmd.args(args)
        .env_remove("LOG_LEVEL")
        .env_remove("HELM_BIN")
        .env_remove("HELM_TIMEOUT")
        .envs(env.iter().copied());

    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute krm-helm-fn");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("Failed to write stdin");

    child.wait_with_output().expect("Failed to wait for krm-helm-fn")
}

/// Get the fixtures path
fn fixtures_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures")
}

fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!("{}/{}", fixtures_path(), name))
        .expect("Failed to read fixture")
}

fn items(output: &Output) -> Vec<Value> {
    let rl: Value = serde_yaml::from_slice(&output.stdout).expect("stdout should be YAML");
    assert_eq!(rl["kind"], "ResourceList");
    rl["items"].as_sequence().expect("items should be a list").clone()
}

mod structural_providers {
    use super::*;

    #[test]
    fn test_argocd_appends_application() {
        let output = krm_helm_fn(&[], &fixture("argocd.yaml"));

        assert!(
            output.status.success(),
            "stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        let items = items(&output);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["kind"], "Namespace");

        let app = &items[1];
        assert_eq!(app["apiVersion"], "argoproj.io/v1alpha1");
        assert_eq!(app["kind"], "Application");
        assert_eq!(app["metadata"]["name"], "my-app");
        assert_eq!(app["metadata"]["namespace"], "argocd");
    }

    #[test]
    fn test_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.yaml");
        let input = format!("{}/argocd.yaml", fixtures_path());

        let output = krm_helm_fn(
            &["--input", &input, "--output", out.to_str().unwrap()],
            "",
        );

        assert!(output.status.success());
        assert!(output.stdout.is_empty());
        let written = std::fs::read_to_string(&out).unwrap();
        assert!(written.contains("kind: Application"));
    }
}

mod failures {
    use super::*;

    #[test]
    fn test_unknown_provider_exits_not_found() {
        let output = krm_helm_fn(&[], &fixture("unknown-provider.yaml"));

        assert_eq!(output.status.code(), Some(6));
        assert!(output.stdout.is_empty(), "no partial output on failure");
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("unknown provider type: kustomize"));
    }

    #[test]
    fn test_wrong_kind_exits_validation() {
        let output = krm_helm_fn(&[], &fixture("wrong-kind.yaml"));

        assert_eq!(output.status.code(), Some(2));
        assert!(output.stdout.is_empty());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("expected kind: HelmRelease"));
    }

    #[test]
    fn test_malformed_input_exits_parse() {
        let output = krm_helm_fn(&[], "kind: [unterminated\n");

        assert_eq!(output.status.code(), Some(4));
        assert!(output.stdout.is_empty());
    }

    #[test]
    fn test_missing_input_file_exits_io() {
        let output = krm_helm_fn(&["--input", "/nonexistent/resource-list.yaml"], "");

        assert_eq!(output.status.code(), Some(5));
        assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read"));
    }

    #[test]
    fn test_missing_helm_exits_io() {
        let output = krm_helm_fn(
            &["--helm-bin", "krmhelm-definitely-not-installed"],
            &fixture("inflate.yaml"),
        );

        assert_eq!(output.status.code(), Some(5));
        assert!(output.stdout.is_empty());
    }
}

#[cfg(unix)]
mod inflate {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    /// Install a shell script standing in for helm
    ///
    /// The script records its arguments and a copy of the `--values` file in
    /// `dir`, then runs `body`.
    fn fake_helm(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("helm");
        let script = format!(
            r#"#!/bin/sh
echo "$@" > "{dir}/args"
prev=""
for arg in "$@"; do
  if [ "$prev" = "--values" ]; then cp "$arg" "{dir}/values.yaml"; fi
  prev="$arg"
done
{body}
"#,
            dir = dir.display(),
        );
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    const RENDERED: &str = r#"cat <<'EOF'
---
# Source: hello-world/templates/service.yaml
apiVersion: v1
kind: Service
metadata:
  name: my-app
---
# Source: hello-world/templates/deployment.yaml
apiVersion: apps/v1
kind: Deployment
metadata:
  name: my-app
EOF"#;

    #[test]
    fn test_inflate_renders_with_harvested_values() {
        let dir = tempfile::tempdir().unwrap();
        let helm = fake_helm(dir.path(), RENDERED);

        let output = krm_helm_fn(
            &["--helm-bin", helm.to_str().unwrap()],
            &fixture("inflate.yaml"),
        );

        assert!(
            output.status.success(),
            "stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        let kinds: Vec<_> = items(&output)
            .iter()
            .map(|i| i["kind"].as_str().unwrap_or_default().to_string())
            .collect();
        assert_eq!(kinds, vec!["ConfigMap", "ConfigMap", "Service", "Deployment"]);

        let args = std::fs::read_to_string(dir.path().join("args")).unwrap();
        assert!(args.starts_with("template my-app --repo https://helm.github.io/examples"));
        assert!(args.contains("--namespace my-system"));
        assert!(args.trim_end().ends_with("hello-world"));

        let values: Value =
            serde_yaml::from_str(&std::fs::read_to_string(dir.path().join("values.yaml")).unwrap())
                .unwrap();
        assert_eq!(values["replicaCount"], "3");
        assert_eq!(values["service"]["port"], 443);
        assert!(values.get("leaked").is_none());
    }

    #[test]
    fn test_inflate_failure_reports_stderr_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let helm = fake_helm(
            dir.path(),
            r#"echo 'Error: chart "hello-world" version "0.1.0" not found' >&2
exit 1"#,
        );

        let output = krm_helm_fn(
            &["--helm-bin", helm.to_str().unwrap()],
            &fixture("inflate.yaml"),
        );

        assert_eq!(output.status.code(), Some(3));
        assert!(output.stdout.is_empty());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains(r#"Error: chart "hello-world" version "0.1.0" not found"#));
    }

    #[test]
    fn test_inflate_timeout_exits_generation() {
        let dir = tempfile::tempdir().unwrap();
        let helm = fake_helm(dir.path(), "sleep 5");

        let output = krm_helm_fn(
            &["--helm-bin", helm.to_str().unwrap(), "--helm-timeout", "1"],
            &fixture("inflate.yaml"),
        );

        assert_eq!(output.status.code(), Some(3));
        assert!(String::from_utf8_lossy(&output.stderr).contains("timed out"));
    }

    #[test]
    fn test_helm_settings_from_environment() {
        let dir = tempfile::tempdir().unwrap();
        let helm = fake_helm(dir.path(), "sleep 5");

        let output = krm_helm_fn_with_env(
            &[],
            &[("HELM_BIN", helm.to_str().unwrap()), ("HELM_TIMEOUT", "1")],
            &fixture("inflate.yaml"),
        );

        assert_eq!(output.status.code(), Some(3));
        assert!(dir.path().join("args").exists(), "HELM_BIN should select the fake helm");
        assert!(String::from_utf8_lossy(&output.stderr).contains("timed out"));
    }

    #[test]
    fn test_debug_logs_go_to_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let helm = fake_helm(dir.path(), RENDERED);

        let output = krm_helm_fn(
            &["--log-level", "debug", "--helm-bin", helm.to_str().unwrap()],
            &fixture("inflate.yaml"),
        );

        assert!(output.status.success());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("resolved values"));
        // stdout still parses as a single ResourceList
        assert_eq!(items(&output).len(), 4);
    }
}
