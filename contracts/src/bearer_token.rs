//! # Bearer Token Contract
//!
//! A non-fungible, value-bearing token that lives as a single entry in an
//! append-only unspent-output ledger. The record commits to its current
//! owner and to a redemption authority (typically the issuer) as 20-byte
//! key hashes; the actual public keys surface only at spend time, next to
//! the signatures that prove control of them.
//!
//! Two spends exist, and only two:
//!
//! 1. **Transfer** — the current owner signs the token over to a new
//!    owner hash. The consuming transaction must carry exactly one
//!    successor record, identical to the predecessor except for the owner
//!    hash, with the locked value preserved to the unit.
//! 2. **Redeem** — the current owner and the redemption authority
//!    co-sign to retire the token permanently. No successor is produced;
//!    the lifecycle ends.
//!
//! ## Security Model
//!
//! - **Ownership gating**: every operation first re-hashes the presented
//!   public key and compares it to the record's commitment. Signatures
//!   from keys that don't hash to the commitment are never even checked.
//! - **Scoped signatures**: a transfer signature covers the single
//!   designated continuation output (plus the spent record and value), so
//!   counterparties can add change freely and a signature can never be
//!   replayed against different outputs, a different record, or a
//!   different value. Redemption signatures cover the full output set.
//! - **Output commitment**: the transfer validator independently rebuilds
//!   the expected continuation output and compares digests. The successor
//!   state and the locked value are forced, not trusted.
//! - **Non-transferability**: an issuer can pin a token so its only legal
//!   destination is the redemption authority — a take-it-back-only token.
//!
//! The validators are pure functions of their inputs: no clock, no RNG,
//! no ledger reads. Mutual exclusion between competing spends of the same
//! record is the ledger's unspent-output consumption rule, not ours.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use sigil_protocol::config::{KEY_HASH_LENGTH, STATE_VERSION};
use sigil_protocol::crypto::hash::KeyHash;
use sigil_protocol::crypto::keys::{SigilPublicKey, SigilSignature};
use sigil_protocol::transaction::digest::{spend_digest, spend_digest_all, SigningScope};
use sigil_protocol::transaction::outputs::{hash_outputs, TxOutput};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Rejection reasons for token spends.
///
/// Every variant is terminal: the validators never retry, never partially
/// apply, and never repair. The transaction-construction layer surfaces
/// the variant to whoever initiated the spend, who must build a corrected
/// candidate from scratch.
///
/// Hash commitments are public ledger data, so mismatch variants carry
/// them for diagnostics. Signature failures carry nothing — we don't tell
/// attackers why verification failed.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The presented public key does not hash to the record's owner
    /// commitment.
    #[error("owner key hash mismatch: record commits to {expected}, presented key hashes to {presented}")]
    OwnerMismatch {
        /// The record's owner commitment.
        expected: String,
        /// Hash of the key that was actually presented.
        presented: String,
    },

    /// The transfer signature fails verification against the presented
    /// owner key and the single-output spend digest.
    #[error("transfer signature verification failed")]
    InvalidSignature,

    /// The token is non-transferable and the destination is not the
    /// redemption authority.
    #[error("token is non-transferable: destination must be the redemption authority {authority}, got {destination}")]
    TransferNotAllowed {
        /// The only permitted destination.
        authority: String,
        /// The destination that was requested.
        destination: String,
    },

    /// The declared output at the designated continuation index does not
    /// commit to the successor record with the unchanged locked value (or
    /// no output exists at that index).
    #[error("declared outputs do not commit to the successor record at index {state_index}")]
    OutputCommitmentMismatch {
        /// The designated state-continuation index.
        state_index: usize,
    },

    /// The presented redeemer public key does not hash to the record's
    /// redemption-authority commitment.
    #[error("redeemer key hash mismatch: record commits to {expected}, presented key hashes to {presented}")]
    RedeemerMismatch {
        /// The record's redemption-authority commitment.
        expected: String,
        /// Hash of the key that was actually presented.
        presented: String,
    },

    /// The redeemer signature fails verification (redemption path).
    #[error("redeemer signature verification failed")]
    InvalidRedeemerSignature,

    /// The owner signature fails verification (redemption path).
    #[error("owner signature verification failed")]
    InvalidOwnerSignature,
}

/// Errors decoding a token record from its canonical state bytes.
#[derive(Debug, Error)]
pub enum StateDecodeError {
    /// The input ended before the fixed-size fields were complete.
    #[error("truncated state bytes: {0}")]
    Truncated(&'static str),

    /// The state format version is not one this build understands.
    #[error("unsupported state version {got} (this build speaks {latest})", latest = STATE_VERSION)]
    UnsupportedVersion {
        /// The version found in the bytes.
        got: u16,
    },

    /// The transferability flag byte was neither 0 nor 1.
    #[error("invalid transferability flag: {got:#04x}")]
    InvalidFlag {
        /// The byte that was found.
        got: u8,
    },

    /// Bytes remained after the declared payload length was consumed.
    #[error("trailing bytes after payload: {got} extra")]
    TrailingBytes {
        /// Number of unconsumed bytes.
        got: usize,
    },
}

// ---------------------------------------------------------------------------
// TokenRecord
// ---------------------------------------------------------------------------

/// The persistent state of a bearer token, carried forward from unspent
/// output to unspent output.
///
/// The locked value is *not* a field: it is output metadata, supplied by
/// whatever transaction carries the record, and the transfer validator
/// forces it to be preserved rather than trusting anyone to copy it.
///
/// Records are immutable values. A transfer does not mutate a record — it
/// computes a successor via [`apply_transfer`](Self::apply_transfer), and
/// the ledger makes the predecessor unspendable the moment the successor
/// is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// State-format version. Carried unchanged across transfers; lets a
    /// future rule set coexist with live v1 tokens.
    pub version: u16,

    /// Commitment to the public key of whoever may currently authorize a
    /// transfer.
    pub owner_hash: KeyHash,

    /// Commitment to the public key of whoever may co-sign a redemption.
    /// Typically the issuer.
    pub redemption_authority_hash: KeyHash,

    /// If `false`, the only valid transfer destination is
    /// `redemption_authority_hash` — the token can only move back toward
    /// the issuer.
    pub is_transferrable: bool,

    /// Arbitrary issuer-defined data. Carried byte-for-byte across
    /// transfers, never interpreted by any validator.
    pub payload: Vec<u8>,
}

impl TokenRecord {
    /// Creates a fresh record at issuance.
    ///
    /// The initial owner is whoever the issuer says it is — there is no
    /// restriction on the first `owner_hash`.
    pub fn new(
        owner_hash: KeyHash,
        redemption_authority_hash: KeyHash,
        is_transferrable: bool,
        payload: Vec<u8>,
    ) -> Self {
        Self {
            version: STATE_VERSION,
            owner_hash,
            redemption_authority_hash,
            is_transferrable,
            payload,
        }
    }

    /// Canonical state bytes:
    /// `version (u16 LE) || owner_hash (20) || authority_hash (20) ||
    /// flag (u8) || payload_len (u32 LE) || payload`.
    ///
    /// This is what a state-continuation output's lock blob carries, and
    /// what every spend digest binds. Hand-rolled because consensus bytes
    /// must be deterministic; serde makes no such promise.
    pub fn state_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(47 + self.payload.len());
        buf.extend_from_slice(&self.version.to_le_bytes());
        buf.extend_from_slice(self.owner_hash.as_bytes());
        buf.extend_from_slice(self.redemption_authority_hash.as_bytes());
        buf.push(self.is_transferrable as u8);
        buf.extend_from_slice(&(self.payload.len() as u32).to_le_bytes());
        buf.extend_from_slice(&self.payload);
        buf
    }

    /// Decodes a record from canonical state bytes.
    ///
    /// Strict: unknown versions, malformed flags, and trailing garbage are
    /// all errors. A record that doesn't round-trip exactly is a record
    /// whose digest you cannot trust.
    pub fn from_state_bytes(bytes: &[u8]) -> Result<Self, StateDecodeError> {
        const FIXED: usize = 2 + 2 * KEY_HASH_LENGTH + 1 + 4;
        if bytes.len() < FIXED {
            return Err(StateDecodeError::Truncated("fixed-size header"));
        }

        let version = u16::from_le_bytes([bytes[0], bytes[1]]);
        if version != STATE_VERSION {
            return Err(StateDecodeError::UnsupportedVersion { got: version });
        }

        let mut cursor = 2;
        let mut owner = [0u8; KEY_HASH_LENGTH];
        owner.copy_from_slice(&bytes[cursor..cursor + KEY_HASH_LENGTH]);
        let owner_hash = KeyHash::from_bytes(owner);
        cursor += KEY_HASH_LENGTH;

        let mut authority = [0u8; KEY_HASH_LENGTH];
        authority.copy_from_slice(&bytes[cursor..cursor + KEY_HASH_LENGTH]);
        let redemption_authority_hash = KeyHash::from_bytes(authority);
        cursor += KEY_HASH_LENGTH;

        let is_transferrable = match bytes[cursor] {
            0 => false,
            1 => true,
            got => return Err(StateDecodeError::InvalidFlag { got }),
        };
        cursor += 1;

        let mut len_bytes = [0u8; 4];
        len_bytes.copy_from_slice(&bytes[cursor..cursor + 4]);
        let payload_len = u32::from_le_bytes(len_bytes) as usize;
        cursor += 4;

        if bytes.len() < cursor + payload_len {
            return Err(StateDecodeError::Truncated("payload"));
        }
        let payload = bytes[cursor..cursor + payload_len].to_vec();
        cursor += payload_len;

        if cursor != bytes.len() {
            return Err(StateDecodeError::TrailingBytes {
                got: bytes.len() - cursor,
            });
        }

        Ok(Self {
            version,
            owner_hash,
            redemption_authority_hash,
            is_transferrable,
            payload,
        })
    }

    /// Computes the successor record for a transfer: a copy of this record
    /// with the owner hash replaced and everything else — authority,
    /// transferability, payload, version — untouched.
    ///
    /// Pure and total. Whether the transfer is *permitted* is the
    /// validator's question, not this function's.
    pub fn apply_transfer(&self, next_owner: KeyHash) -> TokenRecord {
        TokenRecord {
            owner_hash: next_owner,
            ..self.clone()
        }
    }

    /// The output a correctly formed transfer must place at the designated
    /// continuation index: this record's state bytes, locking the given
    /// value.
    pub fn expected_output(&self, locked_value: u64) -> TxOutput {
        TxOutput::new(locked_value, self.state_bytes())
    }
}

// ---------------------------------------------------------------------------
// Transfer
// ---------------------------------------------------------------------------

/// Validates a transfer of `record` to `next_owner`.
///
/// On success, returns the successor record the accepted transaction
/// carries — the caller threads it into the next spend. On failure,
/// returns the most specific applicable [`TokenError`]; nothing is
/// partially applied.
///
/// The checks, in order:
///
/// 1. **Ownership** — `owner_pk` must hash to `record.owner_hash`.
/// 2. **Signature** — `owner_sig` must verify against `owner_pk` over the
///    [`SigningScope::Single`] spend digest for `state_index`. A candidate
///    set with no output at `state_index` has nothing the signature could
///    cover and is rejected as [`TokenError::OutputCommitmentMismatch`].
/// 3. **Transferability** — if the record is non-transferable, the only
///    permitted destination is the redemption authority.
/// 4. **Output commitment** — the output at `state_index` must digest
///    equal to the successor's state bytes locking the unchanged
///    `locked_value`. Outputs at other indices are free; the digest scope
///    already excludes them.
///
/// # Arguments
///
/// * `record` — The current (about-to-be-spent) record.
/// * `locked_value` — The value locked with the current record. The
///   successor must lock exactly this much.
/// * `owner_sig` / `owner_pk` — The current owner's authorization.
/// * `next_owner` — Hash commitment to the new owner's key. Required;
///   for a same-owner spend use [`refresh`].
/// * `outputs` — The candidate transaction's declared outputs, in order.
/// * `state_index` — The index designated for state continuation.
pub fn transfer(
    record: &TokenRecord,
    locked_value: u64,
    owner_sig: &SigilSignature,
    owner_pk: &SigilPublicKey,
    next_owner: KeyHash,
    outputs: &[TxOutput],
    state_index: usize,
) -> Result<TokenRecord, TokenError> {
    // 1. The presented key must be the committed owner.
    let presented = KeyHash::of(owner_pk);
    if presented != record.owner_hash {
        return Err(TokenError::OwnerMismatch {
            expected: record.owner_hash.to_hex(),
            presented: presented.to_hex(),
        });
    }

    // 2. The signature must cover this record, this value, and the
    //    designated output — nothing less, nothing else.
    let digest = spend_digest(
        &record.state_bytes(),
        locked_value,
        outputs,
        SigningScope::Single(state_index),
    )
    .map_err(|_| TokenError::OutputCommitmentMismatch { state_index })?;

    if !owner_pk.verify(&digest, owner_sig) {
        return Err(TokenError::InvalidSignature);
    }

    // Successor: same record, new owner.
    let successor = record.apply_transfer(next_owner);

    // 3. Non-transferable tokens may only move back to the authority.
    if !record.is_transferrable && next_owner != record.redemption_authority_hash {
        return Err(TokenError::TransferNotAllowed {
            authority: record.redemption_authority_hash.to_hex(),
            destination: next_owner.to_hex(),
        });
    }

    // 4. The designated output must commit to the successor state with
    //    the value preserved. Digest comparison, not field inspection —
    //    the validator never parses the declared blob.
    let expected = successor.expected_output(locked_value);
    let actual = &outputs[state_index]; // in range: step 2 digested it
    if hash_outputs(std::slice::from_ref(actual)) != hash_outputs(&[expected]) {
        return Err(TokenError::OutputCommitmentMismatch { state_index });
    }

    debug!(
        owner = %record.owner_hash,
        next_owner = %next_owner,
        locked_value,
        "transfer authorized"
    );

    Ok(successor)
}

/// Validates a same-owner spend: the token moves to a fresh output, the
/// ownership does not change.
///
/// This is the fixed-owner capability as its own named operation, rather
/// than an optional-argument variant of [`transfer`] — who can move
/// ownership should be visible at every call site. It delegates with
/// `next_owner = record.owner_hash`, so every transfer rule applies,
/// including non-transferability: a non-transferable token whose owner is
/// not the authority cannot be refreshed in place, only surrendered.
pub fn refresh(
    record: &TokenRecord,
    locked_value: u64,
    owner_sig: &SigilSignature,
    owner_pk: &SigilPublicKey,
    outputs: &[TxOutput],
    state_index: usize,
) -> Result<TokenRecord, TokenError> {
    transfer(
        record,
        locked_value,
        owner_sig,
        owner_pk,
        record.owner_hash,
        outputs,
        state_index,
    )
}

// ---------------------------------------------------------------------------
// Redeem
// ---------------------------------------------------------------------------

/// Validates a redemption: the terminal, dual-custody retirement of the
/// token.
///
/// Both the current owner and the redemption authority must independently
/// authorize. Each signature covers the [`SigningScope::All`] spend digest
/// over `outputs` — the full output side of the retiring transaction —
/// so neither party's signature can be lifted onto a differently shaped
/// retirement. What those outputs *are* (return the value to the owner,
/// split it, burn it) is the transaction-construction layer's business;
/// there is no successor record and no output-commitment rule here.
///
/// The checks, in order, first failure aborts:
///
/// 1. `redeemer_pk` hashes to the redemption-authority commitment, else
///    [`TokenError::RedeemerMismatch`].
/// 2. `redeemer_sig` verifies, else [`TokenError::InvalidRedeemerSignature`].
/// 3. `owner_pk` hashes to the owner commitment, else
///    [`TokenError::OwnerMismatch`].
/// 4. `owner_sig` verifies, else [`TokenError::InvalidOwnerSignature`].
///
/// On success the token is retired: no successor exists, so no further
/// operation can ever be constructed against this record.
pub fn redeem(
    record: &TokenRecord,
    locked_value: u64,
    owner_sig: &SigilSignature,
    owner_pk: &SigilPublicKey,
    redeemer_sig: &SigilSignature,
    redeemer_pk: &SigilPublicKey,
    outputs: &[TxOutput],
) -> Result<(), TokenError> {
    let digest = spend_digest_all(&record.state_bytes(), locked_value, outputs);

    // 1–2. The redemption authority agrees.
    let presented_redeemer = KeyHash::of(redeemer_pk);
    if presented_redeemer != record.redemption_authority_hash {
        return Err(TokenError::RedeemerMismatch {
            expected: record.redemption_authority_hash.to_hex(),
            presented: presented_redeemer.to_hex(),
        });
    }
    if !redeemer_pk.verify(&digest, redeemer_sig) {
        return Err(TokenError::InvalidRedeemerSignature);
    }

    // 3–4. The current owner agrees.
    let presented_owner = KeyHash::of(owner_pk);
    if presented_owner != record.owner_hash {
        return Err(TokenError::OwnerMismatch {
            expected: record.owner_hash.to_hex(),
            presented: presented_owner.to_hex(),
        });
    }
    if !owner_pk.verify(&digest, owner_sig) {
        return Err(TokenError::InvalidOwnerSignature);
    }

    debug!(
        owner = %record.owner_hash,
        authority = %record.redemption_authority_hash,
        locked_value,
        "redemption authorized, token retired"
    );

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use sigil_protocol::crypto::keys::SigilKeypair;

    fn record_owned_by(kp: &SigilKeypair, transferrable: bool) -> TokenRecord {
        let authority = SigilKeypair::from_seed(&[7u8; 32]);
        TokenRecord::new(
            KeyHash::of(&kp.public_key()),
            KeyHash::of(&authority.public_key()),
            transferrable,
            b"issuer payload".to_vec(),
        )
    }

    #[test]
    fn state_bytes_layout() {
        let kp = SigilKeypair::generate();
        let record = record_owned_by(&kp, true);
        let bytes = record.state_bytes();

        // version + 2 hashes + flag + payload length + payload
        assert_eq!(bytes.len(), 2 + 20 + 20 + 1 + 4 + 14);
        assert_eq!(&bytes[..2], &STATE_VERSION.to_le_bytes());
        assert_eq!(&bytes[2..22], record.owner_hash.as_bytes());
        assert_eq!(&bytes[22..42], record.redemption_authority_hash.as_bytes());
        assert_eq!(bytes[42], 1);
    }

    #[test]
    fn state_bytes_roundtrip() {
        let kp = SigilKeypair::generate();
        let record = record_owned_by(&kp, false);
        let recovered = TokenRecord::from_state_bytes(&record.state_bytes()).unwrap();
        assert_eq!(record, recovered);
    }

    #[test]
    fn empty_payload_roundtrip() {
        let kp = SigilKeypair::generate();
        let record = TokenRecord::new(
            KeyHash::of(&kp.public_key()),
            KeyHash::of(&kp.public_key()),
            true,
            vec![],
        );
        let recovered = TokenRecord::from_state_bytes(&record.state_bytes()).unwrap();
        assert_eq!(record, recovered);
    }

    #[test]
    fn decode_rejects_truncation() {
        let kp = SigilKeypair::generate();
        let bytes = record_owned_by(&kp, true).state_bytes();
        assert!(matches!(
            TokenRecord::from_state_bytes(&bytes[..10]),
            Err(StateDecodeError::Truncated(_))
        ));
        // Cut into the payload.
        assert!(matches!(
            TokenRecord::from_state_bytes(&bytes[..bytes.len() - 1]),
            Err(StateDecodeError::Truncated(_))
        ));
    }

    #[test]
    fn decode_rejects_unknown_version() {
        let kp = SigilKeypair::generate();
        let mut bytes = record_owned_by(&kp, true).state_bytes();
        bytes[0] = 0xFF;
        bytes[1] = 0xFF;
        assert!(matches!(
            TokenRecord::from_state_bytes(&bytes),
            Err(StateDecodeError::UnsupportedVersion { got: 0xFFFF })
        ));
    }

    #[test]
    fn decode_rejects_bad_flag() {
        let kp = SigilKeypair::generate();
        let mut bytes = record_owned_by(&kp, true).state_bytes();
        bytes[42] = 2;
        assert!(matches!(
            TokenRecord::from_state_bytes(&bytes),
            Err(StateDecodeError::InvalidFlag { got: 2 })
        ));
    }

    #[test]
    fn decode_rejects_trailing_bytes() {
        let kp = SigilKeypair::generate();
        let mut bytes = record_owned_by(&kp, true).state_bytes();
        bytes.push(0x00);
        assert!(matches!(
            TokenRecord::from_state_bytes(&bytes),
            Err(StateDecodeError::TrailingBytes { got: 1 })
        ));
    }

    #[test]
    fn apply_transfer_changes_only_the_owner() {
        let kp = SigilKeypair::generate();
        let next = SigilKeypair::generate();
        let record = record_owned_by(&kp, true);
        let next_hash = KeyHash::of(&next.public_key());

        let successor = record.apply_transfer(next_hash);

        assert_eq!(successor.owner_hash, next_hash);
        assert_eq!(successor.version, record.version);
        assert_eq!(
            successor.redemption_authority_hash,
            record.redemption_authority_hash
        );
        assert_eq!(successor.is_transferrable, record.is_transferrable);
        assert_eq!(successor.payload, record.payload);
    }

    #[test]
    fn apply_transfer_does_not_touch_the_original() {
        let kp = SigilKeypair::generate();
        let record = record_owned_by(&kp, true);
        let before = record.clone();
        let _ = record.apply_transfer(KeyHash::of(&SigilKeypair::generate().public_key()));
        assert_eq!(record, before);
    }

    #[test]
    fn expected_output_carries_state_and_value() {
        let kp = SigilKeypair::generate();
        let record = record_owned_by(&kp, true);
        let out = record.expected_output(12_345);
        assert_eq!(out.value, 12_345);
        assert_eq!(out.lock, record.state_bytes());
    }

    #[test]
    fn record_serde_roundtrip() {
        let kp = SigilKeypair::generate();
        let record = record_owned_by(&kp, false);
        let json = serde_json::to_string(&record).unwrap();
        let recovered: TokenRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, recovered);
    }
}
