//! ECDSA signature generation and verification.
//!
//! `EcdsaSigner` is a small state machine. It starts uninitialized, and
//! `init()` binds it either to a private key (for signing) or to a public
//! key (for verifying); the key variant must match the requested mode.
//! Once initialized, it can be used for any number of operations of that
//! kind.
//!
//! The signer owns its nonce calculator; the calculator is re-initialized
//! at the start of each signature. A signer is therefore not meant to be
//! shared between threads without external synchronization: use one
//! signer per signing context.
//!
//! Messages are digests (usually SHA-256 outputs), not raw data. A digest
//! longer than the curve order is truncated to its leftmost bits; it is
//! never hashed again.
//!
//! Signature generation follows the textbook edge-case policy: a nonce
//! that yields `r = 0` is discarded and a new one is drawn; if `s = 0`,
//! the whole `(r, s)` computation restarts with a new nonce. Neither case
//! is visible to the caller.

#![allow(non_snake_case)]

use num_bigint::BigUint;
use num_traits::Zero;
use rand_core::{CryptoRng, RngCore};

use crate::curve::params;
use crate::error::{Error, Result};
use crate::keys::{EcKey, PrivateKey, PublicKey};
use crate::mult::{sum_of_two_multiplies, Multiplier, ScalarMultiplier};
use crate::nonce::{HmacNonce, NonceCalculator, RandomNonce};
use crate::point::Point;
use crate::signature::Signature;

#[derive(Clone, Debug)]
enum SignerState {
    Uninitialized,
    Signing(PrivateKey),
    Verifying(PublicKey),
}

/// An ECDSA signer/verifier over secp256k1.
pub struct EcdsaSigner<N: NonceCalculator> {
    calculator: N,
    multiplier: Multiplier,
    state: SignerState,
}

impl EcdsaSigner<HmacNonce> {

    /// Creates a signer with deterministic nonces (RFC 6979,
    /// HMAC/SHA-256).
    pub fn deterministic() -> Self {
        Self::new(HmacNonce::new())
    }
}

impl<R: CryptoRng + RngCore> EcdsaSigner<RandomNonce<R>> {

    /// Creates a signer drawing its nonces from `rng`.
    pub fn random(rng: R) -> Self {
        Self::new(RandomNonce::new(rng))
    }
}

impl<N: NonceCalculator> EcdsaSigner<N> {

    /// Creates an uninitialized signer using the provided nonce
    /// calculator and the default scalar multiplication algorithm.
    pub fn new(calculator: N) -> Self {
        Self {
            calculator,
            multiplier: Multiplier::default(),
            state: SignerState::Uninitialized,
        }
    }

    /// Selects the algorithm used to compute `k*G` when signing.
    pub fn with_multiplier(mut self, multiplier: Multiplier) -> Self {
        self.multiplier = multiplier;
        self
    }

    #[inline]
    pub fn multiplier(&self) -> Multiplier {
        self.multiplier
    }

    /// Tells whether signatures from this signer are deterministic.
    pub fn is_deterministic(&self) -> bool {
        self.calculator.is_deterministic()
    }

    /// Binds this signer to a key.
    ///
    /// If `for_signing` is true, `key` must be a private key; otherwise,
    /// it must be a public key. On error, the signer is left
    /// uninitialized.
    pub fn init(&mut self, for_signing: bool, key: impl Into<EcKey>) -> Result<()> {
        self.state = SignerState::Uninitialized;
        self.state = match (for_signing, key.into()) {
            (true, EcKey::Private(sk)) => SignerState::Signing(sk),
            (false, EcKey::Public(pk)) => SignerState::Verifying(pk),
            (true, EcKey::Public(_)) =>
                return Err(Error::WrongKeyType("signing requires a private key")),
            (false, EcKey::Private(_)) =>
                return Err(Error::WrongKeyType("verification requires a public key")),
        };
        Ok(())
    }

    /// Signs a message digest.
    ///
    /// The returned signature is NOT canonicalized (`s` may be higher
    /// than `n/2`); use `Signature::canonicalize()` where low-S is
    /// required.
    pub fn generate_signature(&mut self, message: &[u8]) -> Result<Signature> {
        let d = match &self.state {
            SignerState::Signing(sk) => sk.scalar().clone(),
            _ => return Err(Error::NotInitialized("signing")),
        };
        let c = params();
        let e = c.message_to_integer(message);
        self.calculator.init(&c.n, &d, message)?;

        loop {
            let (k, r) = loop {
                let k = self.calculator.next_k()?;
                let R = self.multiplier.multiply(&c.g, &k);
                if let Some(x) = R.affine_x() {
                    let r = c.reduce(x.as_biguint());
                    if !r.is_zero() {
                        break (k, r);
                    }
                }
                tracing::trace!("r = 0, drawing a new nonce");
            };

            let s = (c.invert_scalar(&k) * ((&e + &d * &r) % &c.n)) % &c.n;
            if !s.is_zero() {
                return Signature::new(r, s);
            }
            tracing::trace!("s = 0, restarting signature generation");
        }
    }

    /// Verifies a signature `(r, s)` on a message digest.
    ///
    /// Out-of-range `r` or `s` yield `Ok(false)`. An error is returned
    /// only if the signer was not initialized for verification.
    pub fn verify_signature(&self, message: &[u8], r: &BigUint, s: &BigUint) -> Result<bool> {
        match &self.state {
            SignerState::Verifying(pk) => Ok(verify_prehashed(pk.point(), message, r, s)),
            _ => Err(Error::NotInitialized("verification")),
        }
    }

    /// Verifies a `Signature` on a message digest.
    pub fn verify(&self, message: &[u8], sig: &Signature) -> Result<bool> {
        self.verify_signature(message, sig.r(), sig.s())
    }
}

/// Plain ECDSA verification of `(r, s)` against public point `Q`.
pub(crate) fn verify_prehashed(Q: &Point, message: &[u8], r: &BigUint, s: &BigUint) -> bool {
    let c = params();
    if !c.is_valid_scalar(r) || !c.is_valid_scalar(s) {
        return false;
    }
    let e = c.reduce(&c.message_to_integer(message));
    let w = c.invert_scalar(s);
    let u1 = (&e * &w) % &c.n;
    let u2 = (r * &w) % &c.n;
    let P = sum_of_two_multiplies(&c.g, &u1, Q, &u2);
    match P.affine_x() {
        Some(x) => c.reduce(x.as_biguint()) == *r,
        None => false,
    }
}

// ========================================================================
