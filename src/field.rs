//! Base field of secp256k1.
//!
//! A `FieldElement` is an integer modulo the prime
//! `p = 2^256 - 2^32 - 977`. The value is always kept fully reduced, so
//! that equality of field elements is equality of their internal
//! integers. Arbitrary-precision arithmetic is delegated to `num-bigint`;
//! nothing here is constant-time.
//!
//! The usual arithmetic operators (`+`, `-`, `*`, unary `-`) are
//! implemented on both values and references. Encoding is over exactly
//! 32 bytes, unsigned big-endian, as used by SEC 1 point encodings.

use core::ops::{Add, Mul, Neg, Sub};
use lazy_static::lazy_static;
use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::error::{Error, Result};

lazy_static! {
    /// The field modulus p.
    static ref MODULUS: BigUint = BigUint::from_bytes_be(&[
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFF, 0xFF, 0xFF, 0xFE, 0xFF, 0xFF, 0xFC, 0x2F,
    ]);

    // p - 2, for inversion with Fermat's little theorem.
    static ref MODULUS_MINUS_2: BigUint = &*MODULUS - 2u32;

    // (p + 1) / 4; p = 3 mod 4, so a^((p+1)/4) is a square root of a
    // whenever a is a quadratic residue.
    static ref SQRT_EXPONENT: BigUint = (&*MODULUS + 1u32) >> 2;
}

/// Encodes an integer over exactly 32 bytes (unsigned big-endian).
///
/// The value MUST be lower than 2^256; this holds for all field elements
/// and scalars handled by this crate.
pub(crate) fn encode_be32(v: &BigUint) -> [u8; 32] {
    let bb = v.to_bytes_be();
    let mut out = [0u8; 32];
    let n = bb.len().min(32);
    out[(32 - n)..].copy_from_slice(&bb[(bb.len() - n)..]);
    out
}

/// An element of the secp256k1 base field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldElement(BigUint);

impl FieldElement {

    /// Returns the field modulus p.
    pub fn modulus() -> &'static BigUint {
        &MODULUS
    }

    /// The element of value 0.
    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    /// The element of value 1.
    pub fn one() -> Self {
        Self(BigUint::one())
    }

    /// Builds a field element from a small integer.
    pub fn from_u64(x: u64) -> Self {
        Self(BigUint::from(x))
    }

    /// Builds a field element from an arbitrary integer, reducing it
    /// modulo p.
    pub fn from_biguint(v: BigUint) -> Self {
        if v < *MODULUS {
            Self(v)
        } else {
            Self(v % &*MODULUS)
        }
    }

    /// Builds a field element from an integer which is known to already
    /// be in the `[0, p)` range; `None` is returned otherwise.
    pub fn from_canonical(v: BigUint) -> Option<Self> {
        if v < *MODULUS {
            Some(Self(v))
        } else {
            None
        }
    }

    /// Decodes a field element from exactly 32 bytes (unsigned
    /// big-endian).
    ///
    /// Non-canonical encodings (values not lower than p) are rejected.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() != 32 {
            return Err(Error::InvalidLength(32, buf.len()));
        }
        Self::from_canonical(BigUint::from_bytes_be(buf))
            .ok_or(Error::NonCanonicalFieldElement)
    }

    /// Encodes this element over exactly 32 bytes (unsigned big-endian).
    pub fn encode(&self) -> [u8; 32] {
        encode_be32(&self.0)
    }

    /// Returns the element as an integer in `[0, p)`.
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// Consumes the element and returns its integer value.
    pub fn into_biguint(self) -> BigUint {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        self.0.is_one()
    }

    /// Tests whether the (reduced) integer value is odd; this is the
    /// "sign" used by compressed point encodings.
    #[inline]
    pub fn is_odd(&self) -> bool {
        self.0.bit(0)
    }

    pub fn square(&self) -> Self {
        self * self
    }

    /// Multiplies this element by a small integer.
    pub fn mul_small(&self, x: u32) -> Self {
        Self::from_biguint(&self.0 * x)
    }

    /// Computes the inverse of this element.
    ///
    /// The inverse of zero is conventionally zero.
    pub fn invert(&self) -> Self {
        Self(self.0.modpow(&MODULUS_MINUS_2, &MODULUS))
    }

    /// Computes a square root of this element.
    ///
    /// Returns `None` if the element is not a quadratic residue. When a
    /// root exists, the returned one is whichever the exponentiation
    /// yields; callers select the parity they need with `is_odd()`.
    pub fn sqrt(&self) -> Option<Self> {
        let r = Self(self.0.modpow(&SQRT_EXPONENT, &MODULUS));
        if r.square() == *self {
            Some(r)
        } else {
            None
        }
    }
}

impl Add<&FieldElement> for &FieldElement {
    type Output = FieldElement;

    fn add(self, rhs: &FieldElement) -> FieldElement {
        let s = &self.0 + &rhs.0;
        if s >= *MODULUS {
            FieldElement(s - &*MODULUS)
        } else {
            FieldElement(s)
        }
    }
}

impl Sub<&FieldElement> for &FieldElement {
    type Output = FieldElement;

    fn sub(self, rhs: &FieldElement) -> FieldElement {
        if self.0 >= rhs.0 {
            FieldElement(&self.0 - &rhs.0)
        } else {
            FieldElement(&*MODULUS - (&rhs.0 - &self.0))
        }
    }
}

impl Mul<&FieldElement> for &FieldElement {
    type Output = FieldElement;

    fn mul(self, rhs: &FieldElement) -> FieldElement {
        FieldElement((&self.0 * &rhs.0) % &*MODULUS)
    }
}

impl Neg for &FieldElement {
    type Output = FieldElement;

    fn neg(self) -> FieldElement {
        if self.0.is_zero() {
            FieldElement::zero()
        } else {
            FieldElement(&*MODULUS - &self.0)
        }
    }
}

impl Neg for FieldElement {
    type Output = FieldElement;

    #[inline(always)]
    fn neg(self) -> FieldElement {
        -&self
    }
}

// Value/reference combinations all forward to the reference-reference
// implementations above.
macro_rules! forward_binop {
    ($tr:ident, $f:ident) => {
        impl $tr<FieldElement> for FieldElement {
            type Output = FieldElement;

            #[inline(always)]
            fn $f(self, rhs: FieldElement) -> FieldElement {
                (&self).$f(&rhs)
            }
        }

        impl $tr<&FieldElement> for FieldElement {
            type Output = FieldElement;

            #[inline(always)]
            fn $f(self, rhs: &FieldElement) -> FieldElement {
                (&self).$f(rhs)
            }
        }

        impl $tr<FieldElement> for &FieldElement {
            type Output = FieldElement;

            #[inline(always)]
            fn $f(self, rhs: FieldElement) -> FieldElement {
                self.$f(&rhs)
            }
        }
    };
}

forward_binop!(Add, add);
forward_binop!(Sub, sub);
forward_binop!(Mul, mul);

// ========================================================================

#[cfg(test)]
mod tests {

    use super::FieldElement;
    use num_bigint::BigUint;
    use sha2::{Digest, Sha256};

    fn rand_fe(sh: &mut Sha256, i: u64) -> FieldElement {
        sh.update(i.to_le_bytes());
        FieldElement::from_biguint(BigUint::from_bytes_be(&sh.finalize_reset()))
    }

    #[test]
    fn ring_ops() {
        let mut sh = Sha256::new();
        for i in 0..50 {
            let a = rand_fe(&mut sh, 3 * i);
            let b = rand_fe(&mut sh, 3 * i + 1);
            let c = rand_fe(&mut sh, 3 * i + 2);
            assert_eq!(&(&a + &b) - &b, a);
            assert_eq!(&a - &a, FieldElement::zero());
            assert_eq!(&a + &(-&a), FieldElement::zero());
            assert_eq!(&(&a + &b) * &c, &(&a * &c) + &(&b * &c));
            assert_eq!(a.square(), &a * &a);
            assert_eq!(a.mul_small(3), &(&a + &a) + &a);
        }
    }

    #[test]
    fn wraparound() {
        let pm1 = FieldElement::from_biguint(FieldElement::modulus() - 1u32);
        assert_eq!(&pm1 + &FieldElement::one(), FieldElement::zero());
        assert_eq!(&FieldElement::zero() - &FieldElement::one(), pm1);
        assert_eq!(-FieldElement::zero(), FieldElement::zero());
        assert_eq!(&pm1 * &pm1, FieldElement::one());
    }

    #[test]
    fn invert_and_sqrt() {
        let mut sh = Sha256::new();
        for i in 0..30 {
            let a = rand_fe(&mut sh, i);
            assert!((&a * &a.invert()).is_one());

            let a2 = a.square();
            let r = a2.sqrt().unwrap();
            assert!(r == a || r == -&a);
        }
        assert!(FieldElement::zero().invert().is_zero());

        // -1 is not a square since p = 3 mod 4.
        assert!((-FieldElement::one()).sqrt().is_none());
    }

    #[test]
    fn encoding() {
        let x = FieldElement::from_u64(0x0102);
        let enc = x.encode();
        assert_eq!(enc[30], 0x01);
        assert_eq!(enc[31], 0x02);
        assert!(enc[..30].iter().all(|&b| b == 0));
        assert_eq!(FieldElement::decode(&enc).unwrap(), x);

        let p = FieldElement::modulus().to_bytes_be();
        assert_eq!(p.len(), 32);
        assert!(FieldElement::decode(&p).is_err());
        assert!(FieldElement::decode(&enc[1..]).is_err());
    }
}
