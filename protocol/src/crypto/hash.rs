//! # Hashing Utilities
//!
//! Cryptographic hash functions used throughout SIGIL. We support two
//! hash functions and refuse to support more without a very good reason:
//!
//! - **BLAKE3** — Our default. Fast on every platform, parallelizable,
//!   and safe to truncate by design (its XOF mode makes any output length
//!   a first-class operation). Used for key-hash commitments and every
//!   domain-separated signing digest.
//!
//! - **SHA-256** — For the output-set digest, in its classic
//!   `double_sha256` form. Double-SHA-256 over serialized outputs is the
//!   construction the entire UTXO world standardized on for output
//!   commitments, and interoperability there is worth more than the
//!   speed delta.
//!
//! ## Key-hash commitments
//!
//! A [`KeyHash`] is a 20-byte commitment to an Ed25519 public key: the
//! first 20 bytes of the key's BLAKE3 XOF output. The record on the ledger
//! carries only the hash; the key itself stays private until spend time,
//! when it is presented together with a signature and re-hashed for
//! comparison. 160 bits buys 80-bit collision resistance, which is plenty
//! for a commitment an attacker must second-preimage, not merely collide.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use thiserror::Error;

use crate::config::KEY_HASH_LENGTH;

use super::keys::SigilPublicKey;

/// Compute the SHA-256 hash of the input data.
///
/// Returns the 32-byte digest as a fixed-size array. Building block for
/// [`double_sha256`]; prefer [`blake3_hash`] for SIGIL-native structures.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute the double-SHA-256 hash: `SHA-256(SHA-256(data))`.
///
/// Used for the output-set digest (`hashOutputs`). The double hash closes
/// the length-extension hole in plain SHA-256; BLAKE3 doesn't need the
/// trick, which is why our native digests use it single-pass.
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Compute the BLAKE3 hash of the input data.
///
/// The workhorse hash of SIGIL — 32-byte digest, SIMD-accelerated where
/// the platform allows.
pub fn blake3_hash(data: &[u8]) -> [u8; 32] {
    *blake3::hash(data).as_bytes()
}

/// Compute a domain-separated hash using BLAKE3 with a context string.
///
/// Uses BLAKE3's built-in `derive_key` mode, which derives a distinct
/// internal IV from the context string. Cross-context collisions are
/// impossible by construction — don't try to prepend a tag manually,
/// that's what amateurs do.
///
/// `domain_separated_hash("a", data)` and `domain_separated_hash("b", data)`
/// never collide, which is exactly what keeps a spend signature from being
/// replayed as anything other than a spend signature.
pub fn domain_separated_hash(context: &str, data: &[u8]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new_derive_key(context);
    hasher.update(data);
    *hasher.finalize().as_bytes()
}

// ---------------------------------------------------------------------------
// KeyHash
// ---------------------------------------------------------------------------

/// Errors parsing a [`KeyHash`] from external input.
#[derive(Debug, Error)]
pub enum KeyHashError {
    /// The input does not decode to exactly [`KEY_HASH_LENGTH`] bytes.
    #[error("invalid key hash length: expected {expected} bytes, got {got}", expected = KEY_HASH_LENGTH)]
    InvalidLength {
        /// Number of bytes actually provided.
        got: usize,
    },

    /// The hex string could not be decoded.
    #[error("invalid key hash hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// A 20-byte hash commitment to a public key.
///
/// This is the only form in which an owner or redemption authority appears
/// inside a token record. The fixed length is enforced by the type: if you
/// are holding a `KeyHash`, it is exactly 20 bytes, end of discussion.
///
/// # Examples
///
/// ```
/// use sigil_protocol::crypto::keys::SigilKeypair;
/// use sigil_protocol::crypto::hash::KeyHash;
///
/// let kp = SigilKeypair::generate();
/// let commitment = KeyHash::of(&kp.public_key());
///
/// // Spend time: the revealed key must hash back to the commitment.
/// assert!(commitment.matches(&kp.public_key()));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyHash([u8; KEY_HASH_LENGTH]);

impl KeyHash {
    /// Compute the commitment for a public key.
    ///
    /// First 20 bytes of the BLAKE3 XOF over the raw key bytes. Truncating
    /// BLAKE3 output is sound — the XOF is designed so that any prefix is
    /// a full-strength digest of its length.
    pub fn of(public_key: &SigilPublicKey) -> Self {
        Self::of_bytes(public_key.as_bytes())
    }

    /// Compute the commitment for raw key bytes.
    ///
    /// Exposed separately for wire-format code that has bytes but no
    /// parsed [`SigilPublicKey`] yet.
    pub fn of_bytes(key_bytes: &[u8]) -> Self {
        let mut out = [0u8; KEY_HASH_LENGTH];
        let mut hasher = blake3::Hasher::new();
        hasher.update(key_bytes);
        hasher.finalize_xof().fill(&mut out);
        Self(out)
    }

    /// Returns `true` if `public_key` hashes to this commitment.
    ///
    /// This is the ownership gate every validator applies before touching
    /// a signature.
    pub fn matches(&self, public_key: &SigilPublicKey) -> bool {
        Self::of(public_key) == *self
    }

    /// Wrap raw commitment bytes. No validation needed — any 20 bytes are
    /// a structurally valid commitment (whether a key hashing to them
    /// exists is a different question).
    pub fn from_bytes(bytes: [u8; KEY_HASH_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Try to build a `KeyHash` from a slice of unknown length.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyHashError> {
        let bytes: [u8; KEY_HASH_LENGTH] = slice
            .try_into()
            .map_err(|_| KeyHashError::InvalidLength { got: slice.len() })?;
        Ok(Self(bytes))
    }

    /// The raw commitment bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_HASH_LENGTH] {
        &self.0
    }

    /// Hex-encoded commitment. 40 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a hex-encoded commitment.
    pub fn from_hex(s: &str) -> Result<Self, KeyHashError> {
        let bytes = hex::decode(s)?;
        Self::try_from_slice(&bytes)
    }
}

impl fmt::Display for KeyHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for KeyHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyHash({})", self.to_hex())
    }
}
