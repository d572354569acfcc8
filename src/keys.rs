//! secp256k1 key types.
//!
//! A private key wraps a secret scalar `d` in `[1, n-1]`; its public key
//! is the point `Q = d*G`, computed on first use and cached. A public key
//! wraps a non-neutral curve point, along with the encoding format
//! (compressed or not) it should be serialized with; that flag matters
//! for Bitcoin-style addresses and compact signatures, which commit to
//! the exact public key bytes.
//!
//! `EcKey` is the sum type handed to `EcdsaSigner::init()`: signing
//! requires the `Private` variant, verification the `Public` one.

use core::fmt;
use std::sync::OnceLock;

use num_bigint::BigUint;
use num_traits::Zero;
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha512};

use crate::curve::params;
use crate::ecdsa::{verify_prehashed, EcdsaSigner};
use crate::error::{Error, Result};
use crate::field::encode_be32;
use crate::mult::{Multiplier, ScalarMultiplier};
use crate::point::Point;
use crate::recovery::{find_recovery_id, CompactSignature};
use crate::signature::Signature;

/// A secp256k1 private key.
#[derive(Clone)]
pub struct PrivateKey {
    d: BigUint,
    public: OnceLock<PublicKey>,
}

/// A secp256k1 public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    point: Point,
    compressed: bool,
}

impl PrivateKey {

    /// Wraps a secret scalar, which must be in `[1, n-1]`.
    pub fn from_scalar(d: BigUint) -> Result<Self> {
        if !params().is_valid_scalar(&d) {
            return Err(Error::ScalarOutOfRange);
        }
        Ok(Self { d, public: OnceLock::new() })
    }

    /// Decodes a private key from exactly 32 bytes.
    ///
    /// The bytes are the unsigned big-endian encoding of the secret
    /// scalar (as per SEC1 and RFC 5915). Zero and values not lower than
    /// the curve order are rejected.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() != 32 {
            return Err(Error::InvalidLength(32, buf.len()));
        }
        Self::from_scalar(BigUint::from_bytes_be(buf))
    }

    /// Encodes this private key over 32 bytes (unsigned big-endian).
    pub fn encode(&self) -> [u8; 32] {
        encode_be32(&self.d)
    }

    /// Derives a private key from a random seed.
    ///
    /// The seed MUST come from a cryptographically secure source with at
    /// least 128 bits of entropy. The derivation (SHA-512 of a fixed
    /// prefix and the seed, reduced modulo `n`) is not standard: store
    /// the private key, not the seed. The output is never zero.
    pub fn from_seed(seed: &[u8]) -> Self {
        let mut sh = Sha512::new();
        sh.update(b"secpsig secp256k1 seed");
        sh.update(seed);
        let mut d = params().reduce(&BigUint::from_bytes_be(&sh.finalize()));
        if d.is_zero() {
            d = BigUint::from(1u32);
        }
        Self { d, public: OnceLock::new() }
    }

    /// Generates a new private key from a cryptographically secure RNG.
    pub fn generate<T: CryptoRng + RngCore>(rng: &mut T) -> Self {
        let mut seed = [0u8; 32];
        rng.fill_bytes(&mut seed);
        Self::from_seed(&seed)
    }

    /// Returns the secret scalar.
    #[inline]
    pub fn scalar(&self) -> &BigUint {
        &self.d
    }

    /// Returns the public key (compressed format) matching this private
    /// key.
    pub fn public_key(&self) -> &PublicKey {
        self.public.get_or_init(|| {
            let point = Multiplier::default().multiply(&params().g, &self.d);
            PublicKey { point: point.normalize(), compressed: true }
        })
    }

    /// Signs a message digest with deterministic ECDSA (RFC 6979,
    /// HMAC/SHA-256).
    ///
    /// The digest should be a real hash output (usually SHA-256); if it
    /// is longer than 256 bits, only its leftmost 256 bits are used. The
    /// returned signature is in low-S form.
    pub fn sign(&self, digest: &[u8]) -> Result<Signature> {
        let mut signer = EcdsaSigner::deterministic();
        signer.init(true, self.clone())?;
        Ok(signer.generate_signature(digest)?.canonicalize())
    }

    /// Signs a message digest and attaches the recovery id, producing a
    /// 65-byte compact signature.
    ///
    /// `compressed` selects which encoding of the public key the
    /// signature commits to.
    pub fn sign_compact(&self, digest: &[u8], compressed: bool) -> Result<CompactSignature> {
        let sig = self.sign(digest)?;
        let public = self.public_key().with_compression(compressed);
        let rec_id = find_recovery_id(&sig, digest, &public)?;
        CompactSignature::new(rec_id, compressed, sig)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey").field("d", &"<redacted>").finish()
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, rhs: &Self) -> bool {
        self.d == rhs.d
    }
}

impl Eq for PrivateKey {}

impl PublicKey {

    /// Wraps a curve point.
    ///
    /// The point-at-infinity is rejected, and so is a point that does not
    /// satisfy the curve equation.
    pub fn from_point(point: &Point, compressed: bool) -> Result<Self> {
        if point.is_infinity() {
            return Err(Error::InfinityPublicKey);
        }
        if !point.is_on_curve() {
            return Err(Error::PointNotOnCurve);
        }
        Ok(Self { point: point.normalize(), compressed })
    }

    /// Decodes a public key.
    ///
    /// Both the compressed (33 bytes) and uncompressed (65 bytes) formats
    /// are accepted; the format is remembered for `encode()`. The point
    /// must be on the curve. The point-at-infinity is rejected.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let point = Point::decode(buf)?;
        if point.is_infinity() {
            return Err(Error::InfinityPublicKey);
        }
        Ok(Self { point, compressed: buf.len() == 33 })
    }

    /// Encodes this public key in the format it was created with.
    pub fn encode(&self) -> Vec<u8> {
        if self.compressed {
            self.encode_compressed().to_vec()
        } else {
            self.encode_uncompressed().to_vec()
        }
    }

    /// Encodes this public key into the compressed format (33 bytes).
    pub fn encode_compressed(&self) -> [u8; 33] {
        self.point.encode_compressed()
    }

    /// Encodes this public key into the uncompressed format (65 bytes).
    pub fn encode_uncompressed(&self) -> [u8; 65] {
        self.point.encode_uncompressed()
    }

    #[inline]
    pub fn point(&self) -> &Point {
        &self.point
    }

    #[inline]
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Returns the same key with the given encoding format.
    pub fn with_compression(&self, compressed: bool) -> Self {
        Self { point: self.point.clone(), compressed }
    }

    /// Verifies an ECDSA signature on a message digest.
    ///
    /// High-S signatures are accepted; callers enforcing low-S should
    /// check `Signature::is_low_s()` as well.
    pub fn verify(&self, digest: &[u8], sig: &Signature) -> bool {
        verify_prehashed(&self.point, digest, sig.r(), sig.s())
    }
}

/// A private key along with its public key.
#[derive(Clone, Debug)]
pub struct KeyPair {
    private: PrivateKey,
    public: PublicKey,
}

impl KeyPair {

    /// Pairs a private key with a public key.
    ///
    /// The public key must be `d*G` for the private scalar `d`; otherwise
    /// `Error::KeyMismatch` is returned. The encoding format of `public`
    /// is kept.
    pub fn new(private: PrivateKey, public: PublicKey) -> Result<Self> {
        if private.public_key().point() != public.point() {
            return Err(Error::KeyMismatch);
        }
        Ok(Self { private, public })
    }

    /// Builds a key pair from a private key (compressed public key).
    pub fn from_private(private: PrivateKey) -> Self {
        let public = private.public_key().clone();
        Self { private, public }
    }

    #[inline]
    pub fn private(&self) -> &PrivateKey {
        &self.private
    }

    #[inline]
    pub fn public(&self) -> &PublicKey {
        &self.public
    }
}

/// A key handed to a signer.
#[derive(Clone, Debug)]
pub enum EcKey {
    Private(PrivateKey),
    Public(PublicKey),
}

impl From<PrivateKey> for EcKey {
    fn from(k: PrivateKey) -> Self {
        EcKey::Private(k)
    }
}

impl From<PublicKey> for EcKey {
    fn from(k: PublicKey) -> Self {
        EcKey::Public(k)
    }
}

// ========================================================================
