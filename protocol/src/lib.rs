// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # SIGIL Protocol — Core Library
//!
//! SIGIL is a bearer-token settlement protocol: non-fungible,
//! value-bearing tokens that live as single entries in an append-only
//! unspent-output ledger. This crate is the protocol layer — the
//! cryptographic primitives and transaction-output machinery the token
//! contract in `sigil-contracts` is built on.
//!
//! The stack is deliberately boring: Ed25519 for signatures (because
//! we're not barbarians), BLAKE3 for commitments and signing digests
//! (because we live in the future), and double-SHA-256 for the output
//! digest (because the UTXO world standardized on it and interop beats
//! elegance there).
//!
//! ## Architecture
//!
//! - **crypto** — Keys, signatures, hashing, and the 20-byte key-hash
//!   commitment that stands in for an owner on the ledger.
//! - **transaction** — Outputs, the output-set digest, scoped signing
//!   digests, and the candidate-output builder.
//! - **config** — Protocol constants. Every magic number, one place.
//!
//! ## Design Philosophy
//!
//! 1. Correctness over performance (but we're still fast).
//! 2. No unsafe code in crypto paths — we sleep at night.
//! 3. Consensus bytes are hand-rolled and deterministic; serde is for
//!    humans and wires, never for digests.
//! 4. If it touches money, it has tests. Plural.

pub mod config;
pub mod crypto;
pub mod transaction;
