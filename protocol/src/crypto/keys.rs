//! # Key Management
//!
//! Ed25519 keypair generation and serialization for SIGIL participants.
//!
//! Every party in a token's lifecycle — issuer, holder, redemption
//! authority — is an Ed25519 keypair. On-ledger, a party appears only as
//! a 20-byte hash commitment to its public key (see [`crate::crypto::hash::KeyHash`]);
//! the key itself is revealed at spend time, alongside a signature.
//!
//! ## Why Ed25519?
//!
//! - Deterministic signatures (no k-value footguns like ECDSA).
//! - 128-bit security level in 32+32 bytes. Compact and sufficient.
//! - Constant-time implementations exist and are well-audited.
//! - Verification is cheap, and verification is all the validators do.
//!
//! ## Security considerations
//!
//! - Private keys are zeroized on drop (thanks, ed25519-dalek).
//! - Key generation uses the OS RNG. If your OS RNG is broken, you have
//!   bigger problems than SIGIL.
//! - Key bytes are never logged. If you add logging to this module,
//!   you will be asked to leave.

use ed25519_dalek::{
    Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey, SECRET_KEY_LENGTH,
};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Errors that can occur during key operations.
///
/// Intentionally vague about *why* something failed — leaking details
/// about key material through error messages is a classic footgun.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid secret key bytes: wrong length or not a valid scalar")]
    InvalidSecretKey,

    #[error("invalid public key bytes: not a valid Ed25519 point")]
    InvalidPublicKey,
}

/// A SIGIL identity keypair wrapping an Ed25519 signing key.
///
/// The signing key is the crown jewel: whoever holds it can move (or
/// co-retire) every token whose record commits to its public key.
///
/// ## Serialization
///
/// `SigilKeypair` intentionally does NOT implement `Serialize`/`Deserialize`.
/// Serializing private keys should be a deliberate, conscious act, not
/// something that happens because a keypair ended up inside a JSON response.
/// Use [`secret_key_bytes`](Self::secret_key_bytes) / [`from_seed`](Self::from_seed)
/// explicitly.
///
/// # Examples
///
/// ```
/// use sigil_protocol::crypto::keys::SigilKeypair;
///
/// let kp = SigilKeypair::generate();
/// let sig = kp.sign(b"spend digest goes here");
/// assert!(kp.public_key().verify(b"spend digest goes here", &sig));
/// ```
pub struct SigilKeypair {
    signing_key: SigningKey,
}

/// The public half of a SIGIL identity, safe to share with the world.
///
/// On-ledger, only its [`KeyHash`](crate::crypto::hash::KeyHash) appears;
/// the key itself is presented to a validator together with a signature
/// when a record is spent.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigilPublicKey {
    bytes: [u8; 32],
}

/// An Ed25519 signature over a spend digest.
///
/// 64 bytes, deterministic for a given (key, message) pair. Stored as
/// `Vec<u8>` for serde compatibility, but always exactly 64 bytes when
/// produced by [`SigilKeypair::sign`]. A wrong-length signature does not
/// panic anywhere — verification just returns `false`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigilSignature {
    bytes: Vec<u8>,
}

impl SigilKeypair {
    /// Generate a fresh keypair using the OS cryptographic RNG
    /// (`/dev/urandom` on Unix, `BCryptGenRandom` on Windows).
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self { signing_key }
    }

    /// Construct a keypair deterministically from a 32-byte seed.
    ///
    /// In Ed25519 the 32-byte secret key *is* the seed. Useful for deriving
    /// keypairs from KDF output or recovered secrets.
    ///
    /// **Warning**: a weak seed is a weak key. Feed this CSPRNG or KDF
    /// output, nothing else.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Reconstruct a keypair from raw secret key bytes. Alias for
    /// [`from_seed`](Self::from_seed) with a length-checked signature.
    pub fn from_bytes(secret_key_bytes: &[u8; SECRET_KEY_LENGTH]) -> Self {
        Self::from_seed(secret_key_bytes)
    }

    /// Returns the public key associated with this keypair.
    pub fn public_key(&self) -> SigilPublicKey {
        SigilPublicKey {
            bytes: self.signing_key.verifying_key().to_bytes(),
        }
    }

    /// The raw public key bytes (32 bytes). Safe to share, log, tattoo
    /// on your arm, etc.
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Sign a message and return a [`SigilSignature`].
    ///
    /// Deterministic: the same (key, message) pair always produces the same
    /// signature, so there is no nonce to manage and no RNG involved at
    /// signing time. This is one of the biggest advantages over ECDSA,
    /// where a bad RNG during signing can leak the private key.
    pub fn sign(&self, message: &[u8]) -> SigilSignature {
        let sig = self.signing_key.sign(message);
        SigilSignature {
            bytes: sig.to_bytes().to_vec(),
        }
    }

    /// Exports the raw 32-byte secret key material.
    ///
    /// **Handle with extreme care.** This is the only secret standing
    /// between an attacker and every token committed to this key.
    pub fn secret_key_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }
}

impl Clone for SigilKeypair {
    /// Cloning a keypair is allowed but should make you uncomfortable.
    /// Every copy of a private key is another thing to protect.
    fn clone(&self) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&self.signing_key.to_bytes()),
        }
    }
}

impl fmt::Debug for SigilKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print secret key material in debug output. Not even
        // "partially" — a partial leak is still a leak.
        write!(f, "SigilKeypair(pub={})", self.public_key().to_hex())
    }
}

impl PartialEq for SigilKeypair {
    /// Two keypairs are equal if their public keys match. Comparing secret
    /// material in a non-constant-time way is a bad habit, and for identity
    /// purposes the public key is what matters.
    fn eq(&self, other: &Self) -> bool {
        self.public_key_bytes() == other.public_key_bytes()
    }
}

impl Eq for SigilKeypair {}

// ---------------------------------------------------------------------------
// SigilPublicKey
// ---------------------------------------------------------------------------

impl SigilPublicKey {
    /// Create a `SigilPublicKey` from raw bytes, without point validation.
    ///
    /// Use [`try_from_slice`](Self::try_from_slice) for bytes that arrived
    /// off the wire.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Try to create a `SigilPublicKey` from a byte slice.
    ///
    /// Validates the length and that the bytes represent a valid Ed25519
    /// point. Low-order points and other degenerate encodings are rejected.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        if slice.len() != 32 {
            return Err(KeyError::InvalidPublicKey);
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(slice);

        VerifyingKey::from_bytes(&bytes).map_err(|_| KeyError::InvalidPublicKey)?;

        Ok(Self { bytes })
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Verify a signature against this public key.
    ///
    /// Returns `true` if the signature is valid, `false` otherwise. A
    /// boolean (rather than `Result`) because callers want a yes/no answer —
    /// the specific failure mode is deliberately not exposed here.
    pub fn verify(&self, message: &[u8], signature: &SigilSignature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.bytes) else {
            return false;
        };
        let sig_bytes: [u8; 64] = match signature.bytes.as_slice().try_into() {
            Ok(b) => b,
            Err(_) => return false,
        };
        verifying_key
            .verify(message, &DalekSignature::from_bytes(&sig_bytes))
            .is_ok()
    }

    /// Hex-encoded representation. 64 characters for 32 bytes.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Parse a hex-encoded public key string.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s).map_err(|_| KeyError::InvalidPublicKey)?;
        Self::try_from_slice(&bytes)
    }
}

impl Hash for SigilPublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl fmt::Display for SigilPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for SigilPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigilPublicKey({})", &self.to_hex()[..16])
    }
}

// ---------------------------------------------------------------------------
// SigilSignature
// ---------------------------------------------------------------------------

impl SigilSignature {
    /// Create a signature from its raw 64-byte representation.
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// The raw signature bytes (64 bytes for anything we produced).
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Hex-encoded signature. 128 characters for a valid sig.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Parse a hex-encoded signature.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 64 {
            return Err(hex::FromHexError::OddLength);
        }
        Ok(Self { bytes })
    }
}

impl fmt::Display for SigilSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for SigilSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_str = self.to_hex();
        if hex_str.len() >= 128 {
            write!(f, "SigilSignature({}...{})", &hex_str[..8], &hex_str[120..])
        } else {
            write!(f, "SigilSignature({})", hex_str)
        }
    }
}
