// Copyright (c) 2026 Provenance Contributors. MIT License.
// See LICENSE for details.

//! # Provenance Protocol: Ledger Primitives
//!
//! The types a supply-chain validator reads when it decides whether a
//! batch may move to its next state: who signed, what was paid to whom,
//! and which escrowed output is being spent.
//!
//! - **config**: protocol constants: currency scale, redeemer codes,
//!   network magics.
//! - **crypto**: Ed25519 keys and signatures, BLAKE3 and SHA-256.
//! - **identity**: public-key hashes naming each actor.
//! - **ledger**: values, outputs, and the script execution context.
//!
//! Nothing here talks to a network. Building, signing and submitting real
//! transactions is somebody else's job.

pub mod config;
pub mod crypto;
pub mod encoding;
pub mod identity;
pub mod ledger;
