//! krm-helm-fn - KRM function that expands a HelmRelease into deployable resources
//!
//! Reads a `ResourceList` from stdin, runs its `functionConfig` through the
//! selected provider and writes the updated list to stdout. Diagnostics go to
//! stderr; nothing is written to stdout unless processing succeeded.

use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use krmhelm_core::ResourceList;
use krmhelm_engine::{Config, Processor};
use tracing_subscriber::filter::LevelFilter;

mod error;
mod exit_codes;

use error::{CliError, Result};

#[derive(Parser, Debug)]
#[command(name = "krm-helm-fn")]
#[command(author = "kubed.io")]
#[command(version)]
#[command(about = "Expand a HelmRelease into provider-specific Kubernetes resources", long_about = None)]
struct Cli {
    /// Log level (`debug` also prints resolved values)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Helm executable used by the inflate provider
    #[arg(long, env = "HELM_BIN", default_value = krmhelm_engine::config::DEFAULT_HELM_BIN)]
    helm_bin: String,

    /// Seconds before a helm run is killed
    #[arg(long, env = "HELM_TIMEOUT", default_value_t = 300)]
    helm_timeout: u64,

    /// Read the ResourceList from a file instead of stdin
    #[arg(long)]
    input: Option<PathBuf>,

    /// Write the ResourceList to a file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Cli {
    fn debug(&self) -> bool {
        self.log_level.eq_ignore_ascii_case("debug")
    }

    fn config(&self) -> Config {
        Config::default()
            .with_debug(self.debug())
            .with_helm_bin(self.helm_bin.clone())
            .with_helm_timeout(Duration::from_secs(self.helm_timeout))
    }
}

fn main() -> ExitCode {
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_logging(cli.debug());

    match run(&cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS),
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            ExitCode::from(code)
        }
    }
}

/// Install the stderr subscriber; stdout is reserved for the ResourceList
fn init_logging(debug: bool) {
    let level = if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::internal(format!("failed to start runtime: {}", e)))?;

    let input = read_input(cli.input.as_ref())?;
    let mut rl = ResourceList::from_yaml(&input)?;

    let processor = Processor::new(cli.config());
    let mutated = runtime.block_on(processor.process(&mut rl))?;
    tracing::debug!(mutated, items = rl.items.len(), "processing finished");

    let output = rl.to_yaml()?;
    write_output(cli.output.as_ref(), &output)
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| CliError::io(format!("failed to read {}", path.display()), e)),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| CliError::io("failed to read stdin", e))?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, content)
            .map_err(|e| CliError::io(format!("failed to write {}", path.display()), e)),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(|e| CliError::io("failed to write stdout", e))
        }
    }
}
