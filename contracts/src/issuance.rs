//! # Token Issuance
//!
//! The boundary between the off-ledger world and a token's on-ledger
//! lifecycle. Issuance is not a validated operation — there is no prior
//! record to spend, so there is nothing for a validator to check. The
//! issuer simply decides the initial owner, the redemption authority, the
//! transferability, and the payload, then funds the first record with its
//! locked value.
//!
//! What this module adds is the receipt type an issuance produces and the
//! genesis output set the funding transaction must carry: the record's
//! state at the conventional continuation index, plus optional change
//! back to the issuer (or anyone else footing the funding bill).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use sigil_protocol::crypto::hash::KeyHash;
use sigil_protocol::transaction::builder::OutputSetBuilder;
use sigil_protocol::transaction::outputs::TxOutput;

use crate::bearer_token::TokenRecord;

/// A freshly issued token: the record, the value locked with it, and
/// off-ledger bookkeeping metadata.
///
/// The `token_id` and `issued_at` fields exist for wallets, explorers,
/// and audit trails — they are *not* part of the record's canonical state
/// and play no role in validation. On the ledger, a token's identity is
/// its chain of records, nothing more.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    /// Issuer-side identifier for tracking this token across its
    /// lifecycle. Never serialized into state bytes.
    pub token_id: Uuid,

    /// When the issuance was assembled.
    pub issued_at: DateTime<Utc>,

    /// The genesis record.
    pub record: TokenRecord,

    /// Value locked with the record, in the smallest ledger unit.
    /// Preserved across every subsequent transfer.
    pub locked_value: u64,
}

/// Assembles a new token issuance.
///
/// The initial owner is arbitrary — issuers commonly issue straight to a
/// customer's hash, or to themselves for later distribution.
///
/// # Arguments
///
/// * `owner_hash` — Commitment to the initial owner's key.
/// * `redemption_authority_hash` — Commitment to the co-signer required
///   for retirement. Typically the issuer's own key hash.
/// * `is_transferrable` — `false` pins the token so it can only move
///   back to the redemption authority.
/// * `payload` — Opaque issuer data, carried for the token's lifetime.
/// * `locked_value` — Value to bind to the record.
pub fn issue(
    owner_hash: KeyHash,
    redemption_authority_hash: KeyHash,
    is_transferrable: bool,
    payload: Vec<u8>,
    locked_value: u64,
) -> IssuedToken {
    let record = TokenRecord::new(
        owner_hash,
        redemption_authority_hash,
        is_transferrable,
        payload,
    );

    let token = IssuedToken {
        token_id: Uuid::new_v4(),
        issued_at: Utc::now(),
        record,
        locked_value,
    };

    debug!(
        token_id = %token.token_id,
        owner = %token.record.owner_hash,
        authority = %token.record.redemption_authority_hash,
        transferrable = token.record.is_transferrable,
        locked_value,
        "token issued"
    );

    token
}

impl IssuedToken {
    /// The output set the funding (deployment) transaction must declare:
    /// the genesis record's state output at index 0, then any change
    /// outputs in the order given.
    ///
    /// Change is expressed as `(lock, value)` pairs — typically the
    /// funder's own spending lock reclaiming whatever the funding inputs
    /// carried beyond `locked_value` and fees.
    pub fn genesis_outputs(&self, change: &[(Vec<u8>, u64)]) -> Vec<TxOutput> {
        let mut builder = OutputSetBuilder::new()
            .state_output(self.record.state_bytes(), self.locked_value);
        for (lock, value) in change {
            builder = builder.change_output(lock.clone(), *value);
        }
        builder.build()
    }
}
