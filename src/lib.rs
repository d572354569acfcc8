//! Secpsig implements ECDSA signatures over the secp256k1 curve, as used
//! by Bitcoin and related systems.
//!
//! The library covers the whole signature layer: curve point arithmetic
//! (Jacobian coordinates), several interchangeable scalar multiplication
//! algorithms, nonce generation (random, or deterministic as per RFC
//! 6979), ECDSA signature generation and verification, the DER encoding
//! of signatures with low-S canonicalization, and recovery of the signer's
//! public key from a signature (including the 65-byte "compact" format).
//!
//! Modules are layered bottom-up:
//!
//!  - `field`: integers modulo the field prime `p`.
//!  - `curve`: the domain parameters (`p`, `a`, `b`, `G`, `n`, `h`) and
//!    a few operations on scalars modulo `n`.
//!  - `point`: curve points, with SEC1 encoding and decoding.
//!  - `mult`: the `ScalarMultiplier` trait and its algorithms; the
//!    double-scalar product used by verification.
//!  - `nonce`: the `NonceCalculator` trait, with `RandomNonce` and
//!    `HmacNonce`.
//!  - `keys`: private and public keys.
//!  - `ecdsa`: the `EcdsaSigner` state machine.
//!  - `signature`: signature values, DER and fixed-size encodings.
//!  - `recovery`: public key recovery and compact signatures.
//!
//! # Usage
//!
//! Messages are always digests: the caller hashes the message (typically
//! with SHA-256, or double SHA-256 for Bitcoin transactions) and hands the
//! digest to the signing and verification functions.
//!
//! ```
//! use secpsig::{PrivateKey, Signature};
//! use sha2::{Digest, Sha256};
//!
//! let sk = PrivateKey::from_seed(b"some 32-byte high-entropy seed..");
//! let hv = Sha256::digest(b"message");
//! let sig = sk.sign(&hv).unwrap();
//! let der = sig.to_der();
//! let sig2 = Signature::from_der(&der).unwrap();
//! assert!(sk.public_key().verify(&hv, &sig2));
//! ```
//!
//! # Conventions
//!
//! Arithmetic is implemented over `num_bigint::BigUint` and is NOT
//! constant-time. This library targets verification-heavy and tooling
//! workloads; it should not be used to sign with long-term keys on hosts
//! where timing side channels are a concern.
//!
//! Verification failure is reported as `false`, never as an error.
//! Errors (`Error`) are reserved to malformed input and misuse (e.g.
//! signing with a public key). The library logs with `tracing` (internal
//! retries at the trace level, rejected input at the debug level) and
//! never installs a subscriber; secret values are never logged.

pub mod error;
pub mod field;
pub mod curve;
pub mod point;
pub mod mult;
pub mod nonce;
pub mod keys;
pub mod ecdsa;
pub mod signature;
pub mod recovery;

pub use rand_core::{CryptoRng, RngCore};

pub use crate::curve::{params, CurveParams};
pub use crate::ecdsa::EcdsaSigner;
pub use crate::error::{Error, Result};
pub use crate::field::FieldElement;
pub use crate::keys::{EcKey, KeyPair, PrivateKey, PublicKey};
pub use crate::mult::{sum_of_two_multiplies, Multiplier, ScalarMultiplier};
pub use crate::nonce::{HmacNonce, NonceCalculator, RandomNonce};
pub use crate::point::Point;
pub use crate::recovery::{find_recovery_id, recover_compact, recover_from_signature, CompactSignature};
pub use crate::signature::Signature;
