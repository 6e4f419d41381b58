//! Spend signing digests and their scopes.
//!
//! A spend signature never covers "the transaction" as an amorphous blob —
//! it covers a precisely scoped digest, so the verifier can reconstruct
//! exactly what the signer committed to and nothing else can be smuggled
//! underneath the same signature.
//!
//! Two scopes exist:
//!
//! - [`SigningScope::Single`] — the digest covers exactly one designated
//!   output. This is what makes cooperative protocols work: each party can
//!   sign its slice of the transaction without seeing (or caring about)
//!   the other outputs, and change can be added after signing without
//!   invalidating anything.
//! - [`SigningScope::All`] — the digest covers every declared output.
//!   Used for terminal spends where the signer wants to pin the whole
//!   output side.
//!
//! Every digest also binds the *spent* record's state bytes and locked
//! value. A signature for one record is meaningless for any other record,
//! even one owned by the same key — replay across records or values is a
//! digest mismatch, not a judgement call.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SPEND_DIGEST_DOMAIN;
use crate::crypto::hash::domain_separated_hash;

use super::outputs::{serialize_outputs, TxOutput};

/// Errors computing a spend digest.
#[derive(Debug, Error)]
pub enum DigestError {
    /// A `Single(i)` scope referenced an output index the candidate set
    /// does not have.
    #[error("scope covers output {index} but the set has only {output_count} outputs")]
    MissingOutput {
        /// The designated index.
        index: usize,
        /// How many outputs were actually declared.
        output_count: usize,
    },
}

/// Which declared outputs a spend signature commits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SigningScope {
    /// The signature covers exactly the output at this index.
    Single(usize),
    /// The signature covers every declared output, in order.
    All,
}

/// Computes the 32-byte digest a spend signature must cover.
///
/// The preimage binds, in order:
///
/// 1. the spent record's canonical state bytes (length-prefixed),
/// 2. the locked value being carried,
/// 3. the scope tag (and designated index, for `Single`),
/// 4. the canonical bytes of the covered output(s).
///
/// The whole preimage is hashed under the [`SPEND_DIGEST_DOMAIN`]
/// `derive_key` context, so a spend digest can never collide with any
/// other digest in the protocol, whatever the payload.
///
/// # Errors
///
/// [`DigestError::MissingOutput`] if a `Single(i)` scope points past the
/// end of `outputs`. There is nothing to sign over in that case — the
/// candidate set is malformed, and the caller decides what that means.
pub fn spend_digest(
    spent_state: &[u8],
    spent_value: u64,
    outputs: &[TxOutput],
    scope: SigningScope,
) -> Result<[u8; 32], DigestError> {
    match scope {
        SigningScope::Single(index) => {
            let output = outputs.get(index).ok_or(DigestError::MissingOutput {
                index,
                output_count: outputs.len(),
            })?;
            let mut buf = preimage_prefix(spent_state, spent_value);
            buf.push(0x01);
            buf.extend_from_slice(&(index as u32).to_le_bytes());
            buf.extend_from_slice(&output.canonical_bytes());
            Ok(domain_separated_hash(SPEND_DIGEST_DOMAIN, &buf))
        }
        SigningScope::All => Ok(spend_digest_all(spent_state, spent_value, outputs)),
    }
}

/// The spend digest under the [`SigningScope::All`] scope.
///
/// Separate entry point because the `All` scope is total over any output
/// set (including an empty one) — callers that always sign everything
/// shouldn't have to handle an error that cannot occur.
pub fn spend_digest_all(spent_state: &[u8], spent_value: u64, outputs: &[TxOutput]) -> [u8; 32] {
    let mut buf = preimage_prefix(spent_state, spent_value);
    buf.push(0x02);
    buf.extend_from_slice(&serialize_outputs(outputs));
    domain_separated_hash(SPEND_DIGEST_DOMAIN, &buf)
}

/// Shared preimage head: the spent record's state (length-prefixed) and
/// the value it locks.
fn preimage_prefix(spent_state: &[u8], spent_value: u64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(64 + spent_state.len());
    buf.extend_from_slice(&(spent_state.len() as u32).to_le_bytes());
    buf.extend_from_slice(spent_state);
    buf.extend_from_slice(&spent_value.to_le_bytes());
    buf
}
