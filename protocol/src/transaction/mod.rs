//! # Transaction Module
//!
//! The output side of a spend: the output data model, the output-set
//! digest, the scoped signing digests, and a builder for candidate output
//! sets.
//!
//! ## Architecture
//!
//! ```text
//! outputs.rs — TxOutput, canonical bytes, hash_outputs (double-SHA-256)
//! digest.rs  — SigningScope and the spend digest every signature covers
//! builder.rs — OutputSetBuilder for assembling candidate output sets
//! ```
//!
//! There is deliberately no `Transaction` struct here. The validators in
//! `sigil-contracts` judge a spend entirely from (record state, locked
//! value, declared outputs, signatures) — inputs, fees, and broadcast
//! belong to whatever ledger client embeds this library, and modeling
//! them here would only invite drift from that client's own types.
//!
//! ## Design Decisions
//!
//! - Canonical bytes are hand-rolled little-endian concatenation with
//!   length prefixes. Serde never touches consensus bytes.
//! - The output-set digest is `double_sha256`, the construction the UTXO
//!   world standardized on for output commitments.
//! - Signing digests are BLAKE3 `derive_key` under a versioned domain,
//!   binding the spent record, the locked value, the scope, and the
//!   covered outputs.

pub mod builder;
pub mod digest;
pub mod outputs;

pub use builder::OutputSetBuilder;
pub use digest::{spend_digest, spend_digest_all, DigestError, SigningScope};
pub use outputs::{hash_outputs, serialize_outputs, TxOutput};
