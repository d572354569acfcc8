//! Public key recovery.
//!
//! Given a signature `(r, s)` and the signed digest, the signer's public
//! key can be rebuilt, up to a small ambiguity that is resolved by a
//! two-bit recovery id:
//!
//!  - the high bit tells whether the x coordinate of the nonce point
//!    `R = k*G` is `r` or `r + n` (the latter is possible only when
//!    `r + n < p`, which happens with negligible probability);
//!
//!  - the low bit is the parity of the y coordinate of `R`.
//!
//! The public key is then `Q = r^(-1)*(s*R - e*G)`.
//!
//! A compact signature is the Bitcoin "signed message" format: 65 bytes,
//! a header byte `27 + recid` (plus 4 if the public key is meant to be
//! compressed), followed by `r` and `s` over 32 bytes each.

#![allow(non_snake_case)]

use crate::curve::params;
use crate::error::{Error, Result};
use crate::field::FieldElement;
use crate::keys::PublicKey;
use crate::mult::{sum_of_two_multiplies, Multiplier, ScalarMultiplier};
use crate::point::Point;
use crate::signature::Signature;

const COMPACT_HEADER_BASE: u8 = 27;

fn failed(rec_id: u8, reason: &'static str) -> Error {
    tracing::debug!(rec_id, reason, "public key recovery failed");
    Error::RecoveryFailed
}

/// Recovers the public key that produced `sig` over `digest`, using
/// the provided recovery id (0 to 3).
///
/// The returned key uses the compressed format if `compressed` is true.
/// An error is returned if the recovery id is invalid or if no public
/// key matches it.
pub fn recover_from_signature(rec_id: u8, sig: &Signature, digest: &[u8], compressed: bool)
    -> Result<PublicKey>
{
    if rec_id > 3 {
        return Err(Error::InvalidRecoveryId(rec_id));
    }
    let c = params();
    let r = sig.r();
    let s = sig.s();

    let x = if rec_id & 2 != 0 { r + &c.n } else { r.clone() };
    let x = FieldElement::from_canonical(x)
        .ok_or_else(|| failed(rec_id, "x coordinate not lower than p"))?;
    let R = Point::decompress(&x, rec_id & 1 != 0)
        .ok_or_else(|| failed(rec_id, "x coordinate not on the curve"))?;
    if !Multiplier::default().multiply(&R, &c.n).is_infinity() {
        return Err(failed(rec_id, "candidate point not of order n"));
    }

    // Q = (-e/r)*G + (s/r)*R
    let e = c.reduce(&c.message_to_integer(digest));
    let ir = c.invert_scalar(r);
    let u1 = (c.negate_scalar(&e) * &ir) % &c.n;
    let u2 = (s * &ir) % &c.n;
    let Q = sum_of_two_multiplies(&c.g, &u1, &R, &u2);
    PublicKey::from_point(&Q, compressed).map_err(|_| failed(rec_id, "recovered infinity"))
}

/// Finds the recovery id under which `sig` over `digest` yields
/// `public`.
pub fn find_recovery_id(sig: &Signature, digest: &[u8], public: &PublicKey) -> Result<u8> {
    for rec_id in 0..4 {
        if let Ok(Q) = recover_from_signature(rec_id, sig, digest, public.is_compressed()) {
            if Q.point() == public.point() {
                return Ok(rec_id);
            }
        }
    }
    Err(Error::RecoveryFailed)
}

/// A signature with its recovery id (65-byte compact format).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompactSignature {
    rec_id: u8,
    compressed: bool,
    sig: Signature,
}

impl CompactSignature {

    pub fn new(rec_id: u8, compressed: bool, sig: Signature) -> Result<Self> {
        if rec_id > 3 {
            return Err(Error::InvalidRecoveryId(rec_id));
        }
        Ok(Self { rec_id, compressed, sig })
    }

    #[inline]
    pub fn rec_id(&self) -> u8 {
        self.rec_id
    }

    #[inline]
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    #[inline]
    pub fn signature(&self) -> &Signature {
        &self.sig
    }

    /// Encodes this signature over 65 bytes (header, `r`, `s`).
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[0] = COMPACT_HEADER_BASE + self.rec_id + if self.compressed { 4 } else { 0 };
        out[1..].copy_from_slice(&self.sig.to_bytes());
        out
    }

    /// Decodes a 65-byte compact signature.
    ///
    /// The header byte must be in `[27, 34]`.
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        if buf.len() != 65 {
            return Err(Error::InvalidLength(65, buf.len()));
        }
        let h = buf[0];
        if !(COMPACT_HEADER_BASE..(COMPACT_HEADER_BASE + 8)).contains(&h) {
            return Err(Error::InvalidCompactHeader(h));
        }
        let h = h - COMPACT_HEADER_BASE;
        Self::new(h & 3, h & 4 != 0, Signature::from_bytes(&buf[1..])?)
    }

    /// Recovers the signer's public key.
    pub fn recover(&self, digest: &[u8]) -> Result<PublicKey> {
        recover_from_signature(self.rec_id, &self.sig, digest, self.compressed)
    }
}

/// Recovers a public key from a 65-byte compact signature.
pub fn recover_compact(buf: &[u8], digest: &[u8]) -> Result<PublicKey> {
    CompactSignature::from_bytes(buf)?.recover(digest)
}

// ========================================================================
