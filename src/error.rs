//! Error type shared by all modules of this crate.
//!
//! Only malformed input and API misuse are reported as errors. A
//! well-formed signature that does not match its message and key is
//! reported by the verification functions as `false`.

use thiserror::Error;

/// Error type returned if something went wrong in this crate.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum Error {
    /// A DER-encoded signature could not be parsed.
    ///
    /// The attached string describes which structural rule was broken.
    #[error("invalid DER signature: {0}")]
    InvalidDer(&'static str),

    /// A scalar (private key, `r` or `s`) is zero or not lower than the
    /// curve order.
    #[error("scalar is out of range [1, n-1]")]
    ScalarOutOfRange,

    /// A byte slice of the wrong length was provided where a fixed-width
    /// value was expected.
    #[error("invalid length: expected {0} bytes, found {1}")]
    InvalidLength(usize, usize),

    /// A field element encoding is not lower than the field modulus.
    #[error("field element encoding is not canonical")]
    NonCanonicalFieldElement,

    /// A point encoding has an unknown prefix or an unsupported length.
    #[error("invalid point encoding")]
    InvalidPointEncoding,

    /// Decoded coordinates do not satisfy the curve equation.
    #[error("point is not on the curve")]
    PointNotOnCurve,

    /// The point-at-infinity cannot be used as a public key.
    #[error("the point-at-infinity is not a valid public key")]
    InfinityPublicKey,

    /// The key handed to a signer does not allow the requested operation
    /// (e.g. signing with a public-only key).
    #[error("wrong key type: {0}")]
    WrongKeyType(&'static str),

    /// The signer was not initialized for the requested operation.
    #[error("signer not initialized for {0}")]
    NotInitialized(&'static str),

    /// A nonce was requested before the calculator was initialized.
    #[error("nonce calculator used before initialization")]
    NonceNotInitialized,

    /// A nonce calculator was given a group order lower than 2.
    #[error("group order too small for nonce generation")]
    InvalidOrder,

    /// The HMAC primitive rejected its key.
    #[error("invalid HMAC key length")]
    HmacKey(#[from] hmac::digest::InvalidLength),

    /// Recovery ids are two-bit values (0 to 3).
    #[error("invalid recovery id: {0}")]
    InvalidRecoveryId(u8),

    /// No public key can be rebuilt from this signature, digest and
    /// recovery id.
    #[error("public key recovery failed")]
    RecoveryFailed,

    /// A public key was paired with a private key it was not derived
    /// from.
    #[error("public key does not match the private key")]
    KeyMismatch,

    /// A compact (65-byte) signature has an invalid header byte.
    #[error("invalid compact signature header: {0}")]
    InvalidCompactHeader(u8),
}

/// Result alias used throughout this crate.
pub type Result<T> = core::result::Result<T, Error>;
