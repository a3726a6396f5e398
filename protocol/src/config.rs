//! # Protocol Configuration & Constants
//!
//! Every magic number the validator and its tooling agree on lives here.
//! The integer encodings below are shared with off-chain clients, so
//! changing one is a breaking change for every deployed front-end.

// ---------------------------------------------------------------------------
// Currency
// ---------------------------------------------------------------------------

/// Number of smallest currency units in one whole coin. Bonds are stored
/// in smallest units; operator tooling accepts whole coins and scales.
pub const BASE_UNITS_PER_COIN: u64 = 1_000_000;

/// Ticker of the base currency. Only this asset counts towards a bond.
pub const BASE_CURRENCY: &str = "ADA";

// ---------------------------------------------------------------------------
// Validator encoding
// ---------------------------------------------------------------------------

/// Name under which the supply-chain validator is published.
pub const SCRIPT_NAME: &str = "supply_chain";

/// Script format version. Bump whenever the datum or redeemer layout
/// changes, since the validator hash is derived from it.
pub const SCRIPT_VERSION: u16 = 2;

/// Offset added to a terminal target's state index when a client encodes
/// a finalize (verify/reject) request as a single integer.
pub const FINALIZE_CODE_OFFSET: u64 = 10;

/// Number of batch states. State indices run `0..STATE_COUNT`.
pub const STATE_COUNT: u64 = 6;

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// Ed25519 secret key length in bytes.
pub const SIGNING_KEY_LENGTH: usize = 32;

/// Public (verifying) key length in bytes.
pub const VERIFYING_KEY_LENGTH: usize = 32;

/// Ed25519 signature length.
pub const SIGNATURE_LENGTH: usize = 64;

/// Digest length of every hash in the protocol (BLAKE3 and SHA-256 alike).
pub const HASH_OUTPUT_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Networks
// ---------------------------------------------------------------------------

/// Public test network, magic 1.
pub const NETWORK_MAGIC_PREPROD: u32 = 1;

/// Main network.
pub const NETWORK_MAGIC_MAINNET: u32 = 764_824_073;

/// Local development network. Anything goes.
pub const NETWORK_MAGIC_DEVNET: u32 = 42;

/// Returns a friendly name for a network magic, mainly for logging.
pub fn network_name(magic: u32) -> String {
    match magic {
        NETWORK_MAGIC_PREPROD => "preprod".to_string(),
        NETWORK_MAGIC_MAINNET => "mainnet".to_string(),
        NETWORK_MAGIC_DEVNET => "devnet".to_string(),
        other => format!("unknown({})", other),
    }
}

/// Resolves a network name to its magic. Case-insensitive.
pub fn network_magic(name: &str) -> Option<u32> {
    match name.to_lowercase().as_str() {
        "preprod" => Some(NETWORK_MAGIC_PREPROD),
        "mainnet" => Some(NETWORK_MAGIC_MAINNET),
        "devnet" => Some(NETWORK_MAGIC_DEVNET),
        _ => None,
    }
}

/// Converts whole coins to smallest units, refusing to overflow.
pub fn coins_to_base_units(coins: u64) -> Option<u64> {
    coins.checked_mul(BASE_UNITS_PER_COIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_magics_are_distinct() {
        assert_ne!(NETWORK_MAGIC_PREPROD, NETWORK_MAGIC_MAINNET);
        assert_ne!(NETWORK_MAGIC_PREPROD, NETWORK_MAGIC_DEVNET);
        assert_ne!(NETWORK_MAGIC_MAINNET, NETWORK_MAGIC_DEVNET);
    }

    #[test]
    fn test_network_name_roundtrip() {
        for name in ["preprod", "mainnet", "devnet"] {
            let magic = network_magic(name).unwrap();
            assert_eq!(network_name(magic), name);
        }
        assert_eq!(network_magic("PrePROD"), Some(NETWORK_MAGIC_PREPROD));
        assert_eq!(network_magic("moonnet"), None);
        assert_eq!(network_name(7), "unknown(7)");
    }

    #[test]
    fn test_coin_scaling() {
        assert_eq!(coins_to_base_units(5), Some(5_000_000));
        assert_eq!(coins_to_base_units(0), Some(0));
        assert_eq!(coins_to_base_units(u64::MAX), None);
    }

    #[test]
    fn test_finalize_codes_do_not_collide_with_states() {
        // Finalize codes must never be mistaken for a plain state index.
        assert!(FINALIZE_CODE_OFFSET >= STATE_COUNT);
    }

    #[test]
    fn test_crypto_parameter_sizes() {
        assert_eq!(SIGNING_KEY_LENGTH, 32);
        assert_eq!(VERIFYING_KEY_LENGTH, 32);
        assert_eq!(SIGNATURE_LENGTH, 64);
        assert_eq!(HASH_OUTPUT_LENGTH, 32);
    }
}
