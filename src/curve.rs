//! secp256k1 domain parameters and scalar helpers.
//!
//! The curve is the short Weierstraß curve `y^2 = x^3 + 7` over the
//! field of integers modulo `p = 2^256 - 2^32 - 977`, as standardized in
//! [SEC 2]. The group of points has prime order `n` (the cofactor is 1)
//! and is generated by the conventional base point `G`.
//!
//! All parameters are immutable and shared process-wide; they are
//! obtained through `params()`.
//!
//! Scalars (private keys, nonces, signature halves) are plain `BigUint`
//! values; the helpers in this module perform the few operations modulo
//! `n` that the signature code needs.
//!
//! [SEC 2]: https://www.secg.org/sec2-v2.pdf

use lazy_static::lazy_static;
use num_bigint::BigUint;
use num_traits::Zero;

use crate::field::FieldElement;
use crate::point::Point;

/// The domain parameters of secp256k1.
#[derive(Debug)]
pub struct CurveParams {
    /// Field modulus.
    pub p: BigUint,
    /// Curve equation constant `a` (zero for secp256k1).
    pub a: FieldElement,
    /// Curve equation constant `b`.
    pub b: FieldElement,
    /// Conventional base point (affine).
    pub g: Point,
    /// Prime order of `G`.
    pub n: BigUint,
    /// Cofactor.
    pub h: BigUint,
    /// `floor(n / 2)`, the upper bound of "low" `s` values.
    pub half_n: BigUint,
    n_minus_2: BigUint,
}

lazy_static! {
    static ref SECP256K1: CurveParams = {
        let p = FieldElement::modulus().clone();
        let n = BigUint::from_bytes_be(&[
            0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
            0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
            0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B,
            0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
        ]);
        let gx = FieldElement::from_biguint(BigUint::from_bytes_be(&[
            0x79, 0xBE, 0x66, 0x7E, 0xF9, 0xDC, 0xBB, 0xAC,
            0x55, 0xA0, 0x62, 0x95, 0xCE, 0x87, 0x0B, 0x07,
            0x02, 0x9B, 0xFC, 0xDB, 0x2D, 0xCE, 0x28, 0xD9,
            0x59, 0xF2, 0x81, 0x5B, 0x16, 0xF8, 0x17, 0x98,
        ]));
        let gy = FieldElement::from_biguint(BigUint::from_bytes_be(&[
            0x48, 0x3A, 0xDA, 0x77, 0x26, 0xA3, 0xC4, 0x65,
            0x5D, 0xA4, 0xFB, 0xFC, 0x0E, 0x11, 0x08, 0xA8,
            0xFD, 0x17, 0xB4, 0x48, 0xA6, 0x85, 0x54, 0x19,
            0x9C, 0x47, 0xD0, 0x8F, 0xFB, 0x10, 0xD4, 0xB8,
        ]));
        let half_n = &n >> 1;
        let n_minus_2 = &n - 2u32;
        CurveParams {
            p,
            a: FieldElement::zero(),
            b: FieldElement::from_u64(7),
            g: Point::from_affine_unchecked(gx, gy),
            n,
            h: BigUint::from(1u32),
            half_n,
            n_minus_2,
        }
    };
}

/// Returns the secp256k1 domain parameters.
#[inline]
pub fn params() -> &'static CurveParams {
    &SECP256K1
}

impl CurveParams {

    /// Tests whether `k` is a valid non-zero scalar (in `[1, n-1]`).
    pub fn is_valid_scalar(&self, k: &BigUint) -> bool {
        !k.is_zero() && *k < self.n
    }

    /// Reduces an integer modulo `n`.
    #[inline]
    pub fn reduce(&self, k: &BigUint) -> BigUint {
        k % &self.n
    }

    /// Computes `-k mod n`.
    pub fn negate_scalar(&self, k: &BigUint) -> BigUint {
        let k = self.reduce(k);
        if k.is_zero() {
            k
        } else {
            &self.n - k
        }
    }

    /// Computes the inverse of `k` modulo `n` (Fermat's little theorem,
    /// `n` being prime). The inverse of zero is zero.
    pub fn invert_scalar(&self, k: &BigUint) -> BigUint {
        k.modpow(&self.n_minus_2, &self.n)
    }

    /// Converts a message digest into the integer `e` used by ECDSA.
    ///
    /// The digest is interpreted in unsigned big-endian convention; if
    /// it is longer (in bits) than the curve order, only its leftmost
    /// bits are kept. The value is NOT reduced modulo `n` here.
    pub fn message_to_integer(&self, message: &[u8]) -> BigUint {
        let e = BigUint::from_bytes_be(message);
        let mbits = (message.len() as u64) * 8;
        let nbits = self.n.bits();
        if mbits > nbits {
            e >> (mbits - nbits)
        } else {
            e
        }
    }
}

// ========================================================================
