// Copyright (c) 2026 Provenance Contributors. MIT License.
// See LICENSE for details.

//! # Provenance Node
//!
//! Entry point for the `provenance-node` binary. Parses CLI arguments,
//! initializes logging, and dispatches to a subcommand:
//!
//! - `script`: write the validator descriptor to disk
//! - `validate`: check a transition request file
//! - `simulate`: run one batch through its lifecycle in memory
//! - `keygen`: generate a role keypair
//! - `version`: print build version information

mod cli;
mod logging;
mod request;
mod simulate;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use provenance_contracts::script::ScriptDescriptor;
use provenance_protocol::config::{network_magic, SCRIPT_NAME, SCRIPT_VERSION};
use provenance_protocol::crypto::Keypair;
use provenance_protocol::identity::Identity;

use cli::{Commands, ProvenanceCli};
use logging::LogFormat;

fn main() -> Result<()> {
    let cli = ProvenanceCli::parse();
    logging::init_logging(&cli.log.log_level, LogFormat::from_str_lossy(&cli.log.log_format));

    match cli.command {
        Commands::Script(args) => {
            let written = export_script(&args.out_dir, &args.network)?;
            for path in written {
                println!("wrote {}", path.display());
            }
            Ok(())
        }
        Commands::Validate(args) => validate_request(&args.request),
        Commands::Simulate(args) => {
            let trail = simulate::run(&args)?;
            for entry in &trail {
                let location = entry
                    .out_ref
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "closed".to_string());
                println!("{:<10} {}  escrow={}", entry.record.state, location, entry.escrow);
            }
            Ok(())
        }
        Commands::Keygen(args) => keygen(&args.role, args.out.as_deref()),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Writes `<name>.json` and `<name>.hex` into `out_dir` and returns both paths.
fn export_script(out_dir: &Path, network: &str) -> Result<Vec<PathBuf>> {
    let magic = network_magic(network).ok_or_else(|| anyhow!("unknown network {:?}", network))?;
    let descriptor = ScriptDescriptor::supply_chain(magic);

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory: {}", out_dir.display()))?;

    let json_path = out_dir.join(format!("{}.json", SCRIPT_NAME));
    let json = serde_json::to_string_pretty(&descriptor).context("failed to encode descriptor")?;
    std::fs::write(&json_path, json)
        .with_context(|| format!("failed to write {}", json_path.display()))?;

    let hex_path = out_dir.join(format!("{}.hex", SCRIPT_NAME));
    let bytes = descriptor.to_bytes().context("failed to encode descriptor")?;
    std::fs::write(&hex_path, hex::encode(bytes))
        .with_context(|| format!("failed to write {}", hex_path.display()))?;

    tracing::info!(
        network = %descriptor.network,
        validator_hash = %descriptor.validator_hash,
        out_dir = %out_dir.display(),
        "validator descriptor exported"
    );
    println!("validator hash: {}", descriptor.validator_hash);
    Ok(vec![json_path, hex_path])
}

/// Prints `accepted`, or `rejected: <reason>` with the first failing check.
/// A rejected request is an error so the exit code is non-zero.
fn validate_request(path: &Path) -> Result<()> {
    let req = request::TransitionRequest::load(path)?;
    let report = req.evaluate()?;
    match report.into_result() {
        Ok(()) => {
            println!("accepted");
            Ok(())
        }
        Err(reason) => {
            tracing::debug!(failures = ?report.failures(), "all failing checks");
            println!("rejected: {}", reason);
            bail!("transition rejected: {}", reason)
        }
    }
}

fn keygen(role: &str, out: Option<&Path>) -> Result<()> {
    let keypair = Keypair::generate();
    let identity = Identity::of(&keypair);

    if let Some(path) = out {
        std::fs::write(path, keypair.secret_key_hex())
            .with_context(|| format!("failed to write key to {}", path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }
        tracing::info!(role, identity = %identity, key_path = %path.display(), "keypair generated");
    }

    println!("role       : {}", role);
    println!("public key : {}", keypair.public_key());
    println!("identity   : {}", identity);
    Ok(())
}

fn print_version() {
    println!("provenance-node {}", env!("CARGO_PKG_VERSION"));
    println!("script          {} v{}", SCRIPT_NAME, SCRIPT_VERSION);
}

#[cfg(test)]
mod tests {
    use super::*;
    use provenance_contracts::supply_chain::{BatchRecord, BatchState, Participants, SupplyAction};
    use provenance_protocol::ledger::{OutputRef, ScriptContext, ScriptHash, TxInInfo, TxInfo, TxOut, Value};

    #[test]
    fn export_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let written = export_script(dir.path(), "devnet").unwrap();
        assert_eq!(written.len(), 2);

        let json = std::fs::read_to_string(&written[0]).unwrap();
        let descriptor: ScriptDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(descriptor.network, "devnet");

        let hex_str = std::fs::read_to_string(&written[1]).unwrap();
        assert_eq!(hex::decode(hex_str).unwrap(), descriptor.to_bytes().unwrap());
    }

    #[test]
    fn export_refuses_unknown_network() {
        let dir = tempfile::tempdir().unwrap();
        assert!(export_script(dir.path(), "moonnet").is_err());
    }

    fn write_request(dir: &Path, signer: Identity) -> PathBuf {
        let id = |n: u8| Identity::from_bytes([n; 32]);
        let record = BatchRecord::register(
            [0x01; 32],
            Participants {
                manufacturer: id(1),
                transporter: id(2),
                warehouse: id(3),
                retailer: id(4),
                verifier: id(5),
            },
            500,
        )
        .unwrap();
        let own = OutputRef::new([0x02; 32], 0);
        let context = ScriptContext::spending(
            TxInfo {
                inputs: vec![TxInInfo {
                    out_ref: own,
                    resolved: TxOut::to_script(ScriptHash::from_bytes([0x03; 32]), Value::base(500), vec![]),
                }],
                outputs: vec![],
                signatories: vec![signer],
            },
            own,
        );
        let req = request::TransitionRequest {
            record,
            action: request::ActionInput::Typed(SupplyAction::Advance(BatchState::InTransit)),
            context,
        };
        let path = dir.join("request.json");
        std::fs::write(&path, serde_json::to_string_pretty(&req).unwrap()).unwrap();
        path
    }

    #[test]
    fn validate_accepts_and_rejects_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let ok = write_request(dir.path(), Identity::from_bytes([2u8; 32]));
        assert!(validate_request(&ok).is_ok());

        let bad = write_request(dir.path(), Identity::from_bytes([9u8; 32]));
        let err = validate_request(&bad).unwrap_err();
        assert!(err.to_string().contains("unauthorized signer"));
    }

    #[test]
    fn validate_surfaces_only_the_first_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_request(dir.path(), Identity::from_bytes([9u8; 32]));
        let mut req = request::TransitionRequest::load(&path).unwrap();
        // Skip straight to Warehoused with a drained escrow: all three checks fail.
        req.action = request::ActionInput::Typed(SupplyAction::Advance(BatchState::Warehoused));
        req.context.tx_info.inputs[0].resolved.value = Value::base(0);
        std::fs::write(&path, serde_json::to_string(&req).unwrap()).unwrap();

        assert_eq!(req.evaluate().unwrap().failures().len(), 3);
        let err = validate_request(&path).unwrap_err();
        assert_eq!(err.to_string(), "transition rejected: invalid state transition");
    }

    #[test]
    fn validate_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_request(&dir.path().join("nope.json")).is_err());
    }

    #[test]
    fn keygen_writes_secret() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transporter.key");
        keygen("transporter", Some(&path)).unwrap();
        let secret = std::fs::read_to_string(&path).unwrap();
        assert!(Keypair::from_hex(&secret).is_ok());
    }
}
