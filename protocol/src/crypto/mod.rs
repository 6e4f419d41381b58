//! # Cryptographic Primitives for SIGIL
//!
//! Everything security-related in the protocol flows through here: the
//! keys that authorize spends, the signatures the validators check, and
//! the hashes that commit records to owners and transactions to outputs.
//!
//! We deliberately chose boring, well-audited cryptography:
//!
//! - **Ed25519** for signatures — fast, deterministic, and nobody has broken it.
//! - **BLAKE3** for hashing — because we live in the future.
//! - **SHA-256** for the output digest — because the UTXO world standardized
//!   on double-SHA-256 and interoperability beats elegance there.
//!
//! ## A note on "rolling your own crypto"
//!
//! We don't. Everything here is a thin, type-safe wrapper around audited
//! implementations. If you're tempted to optimize these functions, please
//! reconsider. Then reconsider again. Then go read about timing attacks
//! and come back when you've lost the urge.

pub mod hash;
pub mod keys;
pub mod signatures;

// Re-export the things people actually need so they don't have to memorize
// our module hierarchy. Life's too short for five levels of `use` statements.
pub use hash::{blake3_hash, domain_separated_hash, double_sha256, sha256, KeyHash};
pub use keys::{SigilKeypair, SigilPublicKey, SigilSignature};
pub use signatures::{sign, verify};
