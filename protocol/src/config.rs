//! # Protocol Configuration & Constants
//!
//! Every magic number in SIGIL lives here. If you're hardcoding a constant
//! somewhere else, you're doing it wrong and you owe the team coffee.
//!
//! These values are consensus-relevant: two validators disagreeing on any
//! of them will disagree on spend verdicts. Changing one after tokens have
//! been issued invalidates every live record, so don't.

// ---------------------------------------------------------------------------
// State Format
// ---------------------------------------------------------------------------

/// Current token-record state format version. Written into the canonical
/// state bytes of every record and carried unchanged across transfers.
/// Bump only on a breaking change to the state byte layout.
pub const STATE_VERSION: u16 = 1;

/// The output index conventionally designated for state continuation at
/// issuance. Transfers may designate a different index; this is only the
/// default the issuance helper uses for the genesis output set.
pub const GENESIS_STATE_INDEX: usize = 0;

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// Ed25519 — the only sane choice for signatures in 2024+.
/// Deterministic, compact, and ed25519-dalek's strict verification rejects
/// the cofactor edge cases lenient implementations wave through.
pub const SIGNING_ALGORITHM: &str = "Ed25519";

/// Ed25519 secret key length in bytes.
pub const SIGNING_KEY_LENGTH: usize = 32;

/// Ed25519 public (verifying) key length in bytes.
pub const VERIFYING_KEY_LENGTH: usize = 32;

/// Ed25519 signature length. Always 64 bytes. If yours isn't, something
/// has gone terribly wrong.
pub const SIGNATURE_LENGTH: usize = 64;

/// Length of a public-key hash commitment in bytes.
///
/// 20 bytes (160 bits) of BLAKE3 XOF output. 80-bit collision resistance
/// is enough for an ownership commitment: forging one requires a second
/// preimage against a *specific* record's hash, not a free collision.
pub const KEY_HASH_LENGTH: usize = 20;

// ---------------------------------------------------------------------------
// Digest Domains
// ---------------------------------------------------------------------------

/// BLAKE3 `derive_key` context for spend signing digests. The `v1` suffix
/// is tied to [`STATE_VERSION`]: a state-format bump gets a fresh domain,
/// so signatures can never be replayed across format generations.
pub const SPEND_DIGEST_DOMAIN: &str = "sigil/spend-digest/v1";
