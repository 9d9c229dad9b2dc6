//! Process-wide settings, read once at startup

use std::time::Duration;

/// Default executable used by the inflate provider
pub const DEFAULT_HELM_BIN: &str = "helm";

/// Default upper bound on a single `helm template` run
pub const DEFAULT_HELM_TIMEOUT: Duration = Duration::from_secs(300);

/// Immutable configuration handed to the [`Processor`](crate::Processor)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Verbose diagnostics, including resolved values
    pub debug: bool,

    /// Helm executable, resolved through `PATH` when not absolute
    pub helm_bin: String,

    /// Kill helm if it runs longer than this
    pub helm_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            helm_bin: DEFAULT_HELM_BIN.to_string(),
            helm_timeout: DEFAULT_HELM_TIMEOUT,
        }
    }
}

impl Config {
    /// Enable or disable debug output
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Use a different helm executable
    pub fn with_helm_bin(mut self, helm_bin: impl Into<String>) -> Self {
        self.helm_bin = helm_bin.into();
        self
    }

    /// Change the helm timeout
    pub fn with_helm_timeout(mut self, timeout: Duration) -> Self {
        self.helm_timeout = timeout;
        self
    }
}
