// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # SIGIL Contracts
//!
//! The bearer-token contract: a non-fungible, value-bearing token whose
//! entire life is a chain of unspent-output records, each committing to
//! its current owner and to the authority that can co-retire it.
//!
//! - **bearer_token** — the record model and the two spend validators:
//!   owner-signed transfer (with forced state and value continuation) and
//!   dual-custody redemption (terminal, no successor).
//! - **issuance** — the off-ledger boundary: assembling a new token and
//!   the genesis output set that funds it.
//!
//! ## Design Principles
//!
//! 1. Validators are pure functions: record in, verdict out. No clock,
//!    no RNG, no ledger reads, no partial application.
//! 2. State transitions are values, not mutations — a transfer *returns*
//!    the successor record; nothing is updated in place.
//! 3. Signature verification gates every privileged operation, and the
//!    key-hash commitment gates the signature check itself.
//! 4. Every public type is serializable (serde) for wire transport; the
//!    consensus-relevant state bytes are hand-rolled and deterministic.

pub mod bearer_token;
pub mod issuance;
