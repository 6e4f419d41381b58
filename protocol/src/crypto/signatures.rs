//! # Digital Signatures
//!
//! Ed25519 signing and verification — the authorization backbone of SIGIL.
//!
//! Every transfer and every redemption is gated on at least one of these
//! verifying. The functions here are thin wrappers over the typed keys in
//! [`super::keys`]; wrapping them gives us one place to audit signing
//! operations, consistent error types, and a natural extension point for
//! threshold schemes later.
//!
//! ## Strictness
//!
//! We use `ed25519-dalek`'s strict verification. Some edge-case signatures
//! that lenient implementations accept are rejected here, deliberately —
//! we don't need compatibility with implementations that get the cofactor
//! wrong.

use ed25519_dalek::{Signature as DalekSignature, Verifier, VerifyingKey};
use thiserror::Error;

use super::keys::{SigilKeypair, SigilPublicKey, SigilSignature};

/// Errors during signature operations.
///
/// Intentionally vague — we don't tell attackers why verification failed.
#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("signature verification failed")]
    VerificationFailed,

    #[error("invalid public key")]
    InvalidPublicKey,
}

/// Sign a message using a SIGIL keypair.
///
/// Produces a 64-byte Ed25519 signature, deterministic per RFC 8032.
/// No nonce reuse bugs possible. Thank you, Bernstein.
///
/// The message in this protocol is always a 32-byte spend digest (see
/// `transaction::digest`), but the primitive doesn't care about length —
/// Ed25519 hashes internally with SHA-512.
pub fn sign(keypair: &SigilKeypair, message: &[u8]) -> SigilSignature {
    keypair.sign(message)
}

/// Verify an Ed25519 signature against a public key and message.
///
/// Returns `true` if the signature is valid, `false` otherwise. We
/// intentionally don't distinguish "invalid signature" from "wrong public
/// key" — both are just "nope." Giving attackers a detailed error oracle
/// is a bad idea.
pub fn verify(public_key: &SigilPublicKey, message: &[u8], signature: &SigilSignature) -> bool {
    public_key.verify(message, signature)
}

/// Verify a signature using raw byte components.
///
/// The "I got these bytes off the wire and need to check them" variant:
/// parses the public key and signature bytes, then verifies. Useful when
/// deserializing spends from transport where everything arrives as byte
/// slices rather than typed structs.
pub fn verify_raw(
    public_key_bytes: &[u8; 32],
    message: &[u8],
    signature_bytes: &[u8; 64],
) -> Result<(), SignatureError> {
    let verifying_key =
        VerifyingKey::from_bytes(public_key_bytes).map_err(|_| SignatureError::InvalidPublicKey)?;

    let signature = DalekSignature::from_bytes(signature_bytes);

    verifying_key
        .verify(message, &signature)
        .map_err(|_| SignatureError::VerificationFailed)
}
