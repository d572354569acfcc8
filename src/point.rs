//! Points on secp256k1.
//!
//! A point is represented in Jacobian coordinates `(X:Y:Z)`, standing for
//! the affine point `(X/Z^2, Y/Z^3)`. The point-at-infinity (the neutral
//! element of the group) is any triplet with `Z = 0`; the canonical one
//! is `(1:1:0)`. Points obtained from decoding, from `normalize()`, or
//! from `from_affine()` have `Z = 1`, and their `X` and `Y` are then the
//! affine coordinates.
//!
//! Since the curve constant `a` is zero, the "modified Jacobian" auxiliary
//! coordinate `W = a*Z^4` is always zero and is not stored.
//!
//! Arithmetic is not constant-time. The group law is not implemented with
//! complete formulas; instead, the exceptional cases are dispatched
//! explicitly:
//!
//!  - adding the point-at-infinity returns the other operand;
//!
//!  - adding a point to itself is a doubling;
//!
//!  - adding a point to its opposite yields the point-at-infinity;
//!
//!  - doubling a point with `y = 0` yields the point-at-infinity (there is
//!    no such point on secp256k1, but the rule is kept for safety of the
//!    formulas).
//!
//! Equality is mathematical equality (normalized-coordinate comparison),
//! not equality of the representations.
//!
//! Points can be encoded in compressed (33 bytes) or uncompressed (65
//! bytes) SEC 1 format. Decoding also accepts the one-byte encoding
//! (0x00) of the point-at-infinity. Decoding verifies that the point is
//! on the curve; points built by arithmetic are never re-checked.

// Projective/fractional coordinates traditionally use uppercase letters,
// using lowercase only for affine coordinates.
#![allow(non_snake_case)]

use core::ops::{Add, Neg, Sub};

use crate::curve::params;
use crate::error::{Error, Result};
use crate::field::FieldElement;

/// A point on the short Weierstraß curve secp256k1.
#[derive(Clone, Debug)]
pub struct Point {
    X: FieldElement,
    Y: FieldElement,
    Z: FieldElement,
}

impl Point {

    /// The point-at-infinity.
    pub fn infinity() -> Self {
        Self {
            X: FieldElement::one(),
            Y: FieldElement::one(),
            Z: FieldElement::zero(),
        }
    }

    /// The conventional base point G.
    pub fn generator() -> Self {
        params().g.clone()
    }

    /// Builds a point from affine coordinates, without checking the curve
    /// equation.
    pub(crate) fn from_affine_unchecked(x: FieldElement, y: FieldElement) -> Self {
        Self { X: x, Y: y, Z: FieldElement::one() }
    }

    /// Builds a point from its affine coordinates.
    ///
    /// An error is returned if `(x, y)` is not on the curve.
    pub fn from_affine(x: FieldElement, y: FieldElement) -> Result<Self> {
        let P = Self::from_affine_unchecked(x, y);
        if P.is_on_curve() {
            Ok(P)
        } else {
            Err(Error::PointNotOnCurve)
        }
    }

    /// Rebuilds a point from its x coordinate and the parity of its y
    /// coordinate (point decompression).
    ///
    /// `None` is returned if `x^3 + 7` has no square root, i.e. there is
    /// no point with that x coordinate.
    pub fn decompress(x: &FieldElement, y_odd: bool) -> Option<Self> {
        let alpha = &(&x.square() * x) + &params().b;
        let mut y = alpha.sqrt()?;
        if y.is_odd() != y_odd {
            y = -y;
        }
        Some(Self::from_affine_unchecked(x.clone(), y))
    }

    /// Tests whether this point is the point-at-infinity.
    #[inline(always)]
    pub fn is_infinity(&self) -> bool {
        self.Z.is_zero()
    }

    /// Tests whether this point is in affine form (`Z = 1`) or is the
    /// point-at-infinity.
    #[inline]
    pub fn is_normalized(&self) -> bool {
        self.Z.is_zero() || self.Z.is_one()
    }

    /// Tests whether this point satisfies the curve equation.
    ///
    /// The point-at-infinity is considered to be on the curve.
    pub fn is_on_curve(&self) -> bool {
        if self.is_infinity() {
            return true;
        }

        // Y^2 = X^3 + b*Z^6
        let Z2 = self.Z.square();
        let Z6 = &(&Z2 * &Z2) * &Z2;
        let lhs = self.Y.square();
        let rhs = &(&self.X.square() * &self.X) + &(&params().b * &Z6);
        lhs == rhs
    }

    /// Returns the same point with `Z = 1` (or the canonical
    /// point-at-infinity).
    ///
    /// This costs one field inversion.
    pub fn normalize(&self) -> Self {
        if self.is_infinity() {
            return Self::infinity();
        }
        if self.Z.is_one() {
            return self.clone();
        }
        let iZ = self.Z.invert();
        let iZ2 = iZ.square();
        let iZ3 = &iZ2 * &iZ;
        Self {
            X: &self.X * &iZ2,
            Y: &self.Y * &iZ3,
            Z: FieldElement::one(),
        }
    }

    /// Returns the affine coordinates of this point, or `None` for the
    /// point-at-infinity.
    pub fn to_affine(&self) -> Option<(FieldElement, FieldElement)> {
        if self.is_infinity() {
            return None;
        }
        let P = self.normalize();
        Some((P.X, P.Y))
    }

    /// Returns the affine x coordinate, or `None` for the
    /// point-at-infinity.
    pub fn affine_x(&self) -> Option<FieldElement> {
        self.to_affine().map(|(x, _)| x)
    }

    /// Returns the affine y coordinate, or `None` for the
    /// point-at-infinity.
    pub fn affine_y(&self) -> Option<FieldElement> {
        self.to_affine().map(|(_, y)| y)
    }

    /// Returns the opposite of this point.
    pub fn negate(&self) -> Self {
        Self {
            X: self.X.clone(),
            Y: -&self.Y,
            Z: self.Z.clone(),
        }
    }

    /// Adds `rhs` to this point.
    pub fn add(&self, rhs: &Self) -> Self {
        if self.is_infinity() {
            return rhs.clone();
        }
        if rhs.is_infinity() {
            return self.clone();
        }

        let (X1, Y1, Z1) = (&self.X, &self.Y, &self.Z);
        let (X2, Y2, Z2) = (&rhs.X, &rhs.Y, &rhs.Z);

        // U1 = X1*Z2^2, U2 = X2*Z1^2, S1 = Y1*Z2^3, S2 = Y2*Z1^3
        // (with shortcuts when either operand is affine).
        let Z1Z1 = Z1.square();
        let Z2Z2 = Z2.square();
        let (U1, S1) = if Z2.is_one() {
            (X1.clone(), Y1.clone())
        } else {
            (X1 * &Z2Z2, Y1 * &(Z2 * &Z2Z2))
        };
        let (U2, S2) = if Z1.is_one() {
            (X2.clone(), Y2.clone())
        } else {
            (X2 * &Z1Z1, Y2 * &(Z1 * &Z1Z1))
        };

        let H = &U2 - &U1;
        let R = &S2 - &S1;
        if H.is_zero() {
            if R.is_zero() {
                // Same point.
                return self.twice();
            }
            // Opposite points.
            return Self::infinity();
        }

        let HH = H.square();
        let HHH = &HH * &H;
        let V = &U1 * &HH;
        let X3 = &(&R.square() - &HHH) - &V.mul_small(2);
        let Y3 = &(&R * &(&V - &X3)) - &(&S1 * &HHH);
        let Z3 = &(Z1 * Z2) * &H;
        Self { X: X3, Y: Y3, Z: Z3 }
    }

    /// Subtracts `rhs` from this point.
    pub fn subtract(&self, rhs: &Self) -> Self {
        self.add(&rhs.negate())
    }

    /// Doubles this point.
    pub fn twice(&self) -> Self {
        if self.is_infinity() {
            return Self::infinity();
        }
        if self.Y.is_zero() {
            return Self::infinity();
        }

        // Formulas for a = 0 ("dbl-2009-l"):
        //   A = X^2, B = Y^2, C = B^2
        //   D = 2*((X + B)^2 - A - C)
        //   E = 3*A, F = E^2
        //   X3 = F - 2*D
        //   Y3 = E*(D - X3) - 8*C
        //   Z3 = 2*Y*Z
        let (X, Y, Z) = (&self.X, &self.Y, &self.Z);
        let A = X.square();
        let B = Y.square();
        let C = B.square();
        let D = (&(&(X + &B).square() - &A) - &C).mul_small(2);
        let E = A.mul_small(3);
        let F = E.square();
        let X3 = &F - &D.mul_small(2);
        let Y3 = &(&E * &(&D - &X3)) - &C.mul_small(8);
        let Z3 = (Y * Z).mul_small(2);
        Self { X: X3, Y: Y3, Z: Z3 }
    }

    /// Computes `2*self + b`.
    ///
    /// This is the step used by the left-to-right multipliers. It is the
    /// plain composition `twice()` then `add()`, with the exceptional
    /// cases (either operand at infinity, `y = 0`) resolved first; no
    /// merged doubling-and-addition formula is used.
    pub fn twice_plus(&self, b: &Self) -> Self {
        if self.is_infinity() {
            return b.clone();
        }
        if b.is_infinity() {
            return self.twice();
        }
        if self.Y.is_zero() {
            // 2*self is the point-at-infinity.
            return b.clone();
        }
        &self.twice() + b
    }

    /// Computes `3*self`.
    pub fn three_times(&self) -> Self {
        self.twice_plus(self)
    }

    /// Multiplies this point by `2^e` (`e` successive doublings).
    pub fn times_pow2(&self, e: u32) -> Self {
        let mut P = self.clone();
        for _ in 0..e {
            if P.is_infinity() {
                break;
            }
            P = P.twice();
        }
        P
    }

    /// Tries to decode a point.
    ///
    /// This function accepts the following encodings and lengths:
    ///
    ///  - A single byte of value 0x00: the point-at-infinity.
    ///
    ///  - A byte of value 0x02 or 0x03, followed by exactly 32 bytes
    ///    (unsigned big-endian encoding of the x coordinate): compressed
    ///    encoding of a non-neutral point.
    ///
    ///  - A byte of value 0x04, followed by exactly 64 bytes (unsigned
    ///    big-endian encodings of x and y): uncompressed encoding of a
    ///    non-neutral point.
    ///
    /// Coordinates must be canonical (lower than p) and the point must be
    /// on the curve.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        match (buf.len(), buf.first()) {
            (1, Some(0x00)) => Ok(Self::infinity()),
            (33, Some(&tag)) if tag == 0x02 || tag == 0x03 => {
                let x = FieldElement::decode(&buf[1..33])?;
                Self::decompress(&x, tag == 0x03).ok_or(Error::PointNotOnCurve)
            }
            (65, Some(0x04)) => {
                let x = FieldElement::decode(&buf[1..33])?;
                let y = FieldElement::decode(&buf[33..65])?;
                Self::from_affine(x, y)
            }
            _ => Err(Error::InvalidPointEncoding),
        }
    }

    /// Encodes this point in compressed format (33 bytes).
    ///
    /// The point-at-infinity cannot be represented in that format; it
    /// yields 33 bytes of value 0x00.
    pub fn encode_compressed(&self) -> [u8; 33] {
        let mut out = [0u8; 33];
        if let Some((x, y)) = self.to_affine() {
            out[0] = if y.is_odd() { 0x03 } else { 0x02 };
            out[1..33].copy_from_slice(&x.encode());
        }
        out
    }

    /// Encodes this point in uncompressed format (65 bytes).
    ///
    /// The point-at-infinity cannot be represented in that format; it
    /// yields 65 bytes of value 0x00.
    pub fn encode_uncompressed(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        if let Some((x, y)) = self.to_affine() {
            out[0] = 0x04;
            out[1..33].copy_from_slice(&x.encode());
            out[33..65].copy_from_slice(&y.encode());
        }
        out
    }
}

impl PartialEq for Point {
    fn eq(&self, rhs: &Self) -> bool {
        match (self.is_infinity(), rhs.is_infinity()) {
            (true, true) => return true,
            (false, false) => {}
            _ => return false,
        }

        // X1*Z2^2 = X2*Z1^2 and Y1*Z2^3 = Y2*Z1^3
        let Z1Z1 = self.Z.square();
        let Z2Z2 = rhs.Z.square();
        if &self.X * &Z2Z2 != &rhs.X * &Z1Z1 {
            return false;
        }
        &self.Y * &(&rhs.Z * &Z2Z2) == &rhs.Y * &(&self.Z * &Z1Z1)
    }
}

impl Eq for Point {}

impl Add<&Point> for &Point {
    type Output = Point;

    #[inline(always)]
    fn add(self, other: &Point) -> Point {
        Point::add(self, other)
    }
}

impl Add<Point> for Point {
    type Output = Point;

    #[inline(always)]
    fn add(self, other: Point) -> Point {
        Point::add(&self, &other)
    }
}

impl Sub<&Point> for &Point {
    type Output = Point;

    #[inline(always)]
    fn sub(self, other: &Point) -> Point {
        self.subtract(other)
    }
}

impl Sub<Point> for Point {
    type Output = Point;

    #[inline(always)]
    fn sub(self, other: Point) -> Point {
        self.subtract(&other)
    }
}

impl Neg for &Point {
    type Output = Point;

    #[inline(always)]
    fn neg(self) -> Point {
        self.negate()
    }
}

impl Neg for Point {
    type Output = Point;

    #[inline(always)]
    fn neg(self) -> Point {
        self.negate()
    }
}

// ========================================================================
