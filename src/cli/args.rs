use crate::strategy::RunConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Run deposits, withdrawals and transfers against shared accounts
#[derive(Parser, Debug)]
#[command(name = "concurrent-ledger")]
#[command(
    about = "Run deposits, withdrawals and transfers against shared accounts",
    long_about = None
)]
pub struct CliArgs {
    /// Script CSV file path; the built-in reference scenario runs when omitted
    #[arg(value_name = "INPUT", help = "Path to a script CSV file (default: built-in scenario)")]
    pub input_file: Option<PathBuf>,

    /// Execution strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "concurrent",
        help = "Execution strategy: 'sequential' for program order or 'concurrent' for one worker per operation"
    )]
    pub strategy: StrategyType,

    /// Bound on each lock wait inside a transfer, in milliseconds
    #[arg(
        long = "lock-timeout-ms",
        value_name = "MILLIS",
        help = "Per-lock wait bound for transfers (default: 100)"
    )]
    pub lock_timeout_ms: Option<u64>,

    /// Maximum number of worker threads (concurrent strategy only)
    #[arg(
        long = "workers",
        value_name = "COUNT",
        help = "Maximum number of worker threads (default: CPU cores)"
    )]
    pub workers: Option<usize>,
}

/// Available execution strategies
#[derive(Clone, Debug, ValueEnum)]
pub enum StrategyType {
    Sequential,
    Concurrent,
}

impl CliArgs {
    /// Create a RunConfig from CLI arguments, falling back to defaults
    pub fn to_run_config(&self) -> RunConfig {
        if self.lock_timeout_ms.is_some() || self.workers.is_some() {
            let default = RunConfig::default();
            RunConfig::new(
                self.lock_timeout_ms
                    .map(Duration::from_millis)
                    .unwrap_or(default.lock_timeout),
                self.workers.unwrap_or(default.workers),
            )
        } else {
            RunConfig::default()
        }
    }
}
