//! # CLI Interface
//!
//! Defines the command-line argument structure for `provenance-node` using
//! `clap` derive. Supports five subcommands: `script`, `validate`,
//! `simulate`, `keygen`, and `version`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Operator tooling for the supply-chain provenance validator.
///
/// Exports the validator descriptor, checks transition requests offline,
/// and simulates whole batch lifecycles against an in-memory ledger.
#[derive(Parser, Debug)]
#[command(
    name = "provenance-node",
    about = "Supply-chain provenance validator tooling",
    version,
    propagate_version = true
)]
pub struct ProvenanceCli {
    #[command(flatten)]
    pub log: LogArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Logging options shared by every subcommand.
#[derive(Args, Debug)]
pub struct LogArgs {
    /// Default filter when `RUST_LOG` is unset.
    #[arg(
        long,
        global = true,
        env = "PROVENANCE_LOG",
        default_value = "provenance_node=info,provenance_contracts=info,provenance_protocol=warn"
    )]
    pub log_level: String,

    /// Log output format: `pretty` or `json`.
    #[arg(long, global = true, env = "PROVENANCE_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the validator descriptor (JSON and hex) to a directory.
    Script(ScriptArgs),
    /// Check a transition request read from a JSON file.
    Validate(ValidateArgs),
    /// Drive one batch through its whole lifecycle in memory.
    Simulate(SimulateArgs),
    /// Generate a role keypair and print its identity.
    Keygen(KeygenArgs),
    /// Print version information and exit.
    Version,
}

#[derive(Parser, Debug)]
pub struct ScriptArgs {
    /// Directory the descriptor files are written to. Created if missing.
    #[arg(long, short = 'o', env = "PROVENANCE_OUT_DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Network to describe: preprod, mainnet, or devnet.
    #[arg(long, env = "PROVENANCE_NETWORK", default_value = "preprod")]
    pub network: String,
}

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// JSON file holding `record`, `action` and `context`.
    #[arg(long, short = 'r')]
    pub request: PathBuf,
}

#[derive(Parser, Debug)]
pub struct SimulateArgs {
    /// Label hashed (SHA-256) into the batch content hash.
    #[arg(long, default_value = "demo-batch-001")]
    pub batch: String,

    /// Bond in whole coins.
    #[arg(long, default_value_t = 5)]
    pub bond: u64,

    /// End the lifecycle with a rejection instead of a verification.
    #[arg(long)]
    pub reject: bool,
}

#[derive(Parser, Debug)]
pub struct KeygenArgs {
    /// Role the key is for. Only used for display.
    #[arg(long, default_value = "actor")]
    pub role: String,

    /// File to write the hex secret key to. Printed nowhere if omitted.
    #[arg(long)]
    pub out: Option<PathBuf>,
}
