//! Transaction outputs and the output-set digest.
//!
//! An output is the atom of the ledger this protocol rides on: a value
//! plus the blob that locks it. The blob is opaque at this layer — it may
//! be a spending script, or the serialized state of a contract record
//! being carried forward. The validators never parse it; they compare
//! digests.
//!
//! Canonical bytes are a hand-rolled, deterministic concatenation of
//! fixed-width little-endian integers and length-prefixed blobs.
//! JSON/serde is intentionally avoided for consensus bytes because field
//! ordering is not guaranteed across serialization formats.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crypto::hash::double_sha256;

/// A single transaction output: a locking blob and a value.
///
/// `value` is in the smallest indivisible ledger unit -- no floating point
/// anywhere near money.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutput {
    /// Value bound to this output, in the smallest ledger unit.
    pub value: u64,

    /// The locking blob: a spending script or serialized contract state.
    /// Opaque to this layer.
    pub lock: Vec<u8>,
}

impl TxOutput {
    /// Creates an output.
    pub fn new(value: u64, lock: impl Into<Vec<u8>>) -> Self {
        Self {
            value,
            lock: lock.into(),
        }
    }

    /// Canonical byte representation of this single output:
    /// `value (u64 LE) || lock_len (u32 LE) || lock`.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(12 + self.lock.len());
        buf.extend_from_slice(&self.value.to_le_bytes());
        buf.extend_from_slice(&(self.lock.len() as u32).to_le_bytes());
        buf.extend_from_slice(&self.lock);
        buf
    }
}

impl fmt::Display for TxOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxOutput(value={}, lock={}B)", self.value, self.lock.len())
    }
}

/// Canonical byte representation of an ordered output set:
/// `count (u32 LE) || output_0 || output_1 || ...`.
///
/// The count prefix keeps the encoding injective — without it,
/// `[a, b]` and `[a ++ b]` could collide for pathological blobs.
pub fn serialize_outputs(outputs: &[TxOutput]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(4 + outputs.len() * 64);
    buf.extend_from_slice(&(outputs.len() as u32).to_le_bytes());
    for output in outputs {
        buf.extend_from_slice(&output.canonical_bytes());
    }
    buf
}

/// The output-set digest: `double_sha256(serialize_outputs(outputs))`.
///
/// This is the commitment a transfer validator compares to decide whether
/// a transaction's declared outputs carry the successor record. Two output
/// sets are interchangeable exactly when their digests match.
pub fn hash_outputs(outputs: &[TxOutput]) -> [u8; 32] {
    double_sha256(&serialize_outputs(outputs))
}
