//! Scalar multiplication algorithms.
//!
//! Four interchangeable algorithms compute `k*P` for a point `P` and a
//! non-negative integer `k`. They all follow the same contract (the
//! `ScalarMultiplier` trait) and produce the same group element for the
//! same inputs; they differ only in the sequence of point operations
//! they perform:
//!
//!  - `Multiplier::Reference`: classic left-to-right double-and-add. It
//!    is slow and is meant to be used as an oracle.
//!
//!  - `Multiplier::NafL2R`: the scalar is recoded in non-adjacent form
//!    (digits in {-1, 0, 1}, no two adjacent non-zero digits), then
//!    processed from the top, each non-zero digit with a single
//!    `twice_plus()` and each run of zeros with `times_pow2()`.
//!
//!  - `Multiplier::MontgomeryLadder`: two running points `R0` and `R1`
//!    with `R1 - R0 = P`; each bit costs exactly one addition and one
//!    doubling, whatever its value. This equalizes per-bit work but is
//!    not claimed to be free of side channels (the underlying field
//!    arithmetic is not constant-time).
//!
//!  - `Multiplier::ZSignedDigitL2R`: the scalar is written as
//!    `k = k' * 2^s` with `k'` odd, and `k'` is processed with signed
//!    digits in {-1, 1} only (every bit of `k'` below the top one selects
//!    `+P` or `-P`), followed by `s` doublings.
//!
//! Negative multipliers are not representable (`BigUint`); a caller with
//! a negative scalar negates the point instead. For `k = 0` or for the
//! point-at-infinity, all algorithms return the point-at-infinity.
//!
//! The double-scalar product `a*P + b*Q` used by signature verification
//! and key recovery is provided by `sum_of_two_multiplies()`.

#![allow(non_snake_case)]

use num_bigint::BigUint;
use num_traits::Zero;

use crate::point::Point;

/// Computes `k*P`.
pub trait ScalarMultiplier {
    fn multiply(&self, p: &Point, k: &BigUint) -> Point;
}

/// Selection of a scalar multiplication algorithm.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Multiplier {
    /// Left-to-right double-and-add.
    Reference,
    /// Left-to-right non-adjacent form.
    #[default]
    NafL2R,
    /// Montgomery ladder.
    MontgomeryLadder,
    /// Left-to-right zeroless signed digits.
    ZSignedDigitL2R,
}

impl Multiplier {

    /// All available algorithms.
    pub const ALL: [Multiplier; 4] = [
        Multiplier::Reference,
        Multiplier::NafL2R,
        Multiplier::MontgomeryLadder,
        Multiplier::ZSignedDigitL2R,
    ];
}

impl ScalarMultiplier for Multiplier {
    fn multiply(&self, p: &Point, k: &BigUint) -> Point {
        if k.is_zero() || p.is_infinity() {
            return Point::infinity();
        }
        match self {
            Multiplier::Reference => mul_reference(p, k),
            Multiplier::NafL2R => mul_naf_l2r(p, k),
            Multiplier::MontgomeryLadder => mul_montgomery_ladder(p, k),
            Multiplier::ZSignedDigitL2R => mul_zsigned_digit_l2r(p, k),
        }
    }
}

fn mul_reference(p: &Point, k: &BigUint) -> Point {
    let mut R = Point::infinity();
    for i in (0..k.bits()).rev() {
        R = R.twice();
        if k.bit(i) {
            R = &R + p;
        }
    }
    R
}

/// Recodes `k` (which MUST be non-zero) into compact non-adjacent form.
///
/// Each entry is a pair `(digit, zeros)` with `digit` in {-1, 1}; entries
/// are ordered from the least significant digit upwards, and `zeros` is
/// the number of zero digits immediately below `digit` (down to the
/// previous non-zero digit, or to bit 0). The top digit is always 1.
pub(crate) fn compact_naf(k: &BigUint) -> Vec<(i8, u32)> {
    // The NAF digits of k are read from the bits of 3k XOR k: bit i+1 of
    // that value is set exactly when digit i is non-zero, and the digit is
    // then -1 if bit i+1 of k is set, +1 otherwise.
    let k3 = (k << 1u32) + k;
    let diff = &k3 ^ k;
    let bits = k3.bits();
    let high = bits - 1;
    let mut naf = Vec::with_capacity((bits >> 1) as usize + 1);
    let mut zeros = 0u32;
    let mut i = 1u64;
    while i < high {
        if !diff.bit(i) {
            zeros += 1;
            i += 1;
            continue;
        }
        let digit = if k.bit(i) { -1 } else { 1 };
        naf.push((digit, zeros));

        // The next digit is necessarily zero.
        zeros = 1;
        i += 2;
    }
    naf.push((1, zeros));
    naf
}

fn mul_naf_l2r(p: &Point, k: &BigUint) -> Point {
    let naf = compact_naf(k);
    let addP = p.normalize();
    let subP = addP.negate();
    let mut R = Point::infinity();
    for &(digit, zeros) in naf.iter().rev() {
        R = R.twice_plus(if digit < 0 { &subP } else { &addP });
        R = R.times_pow2(zeros);
    }
    R
}

fn mul_montgomery_ladder(p: &Point, k: &BigUint) -> Point {
    let mut R = [Point::infinity(), p.clone()];
    for i in (0..k.bits()).rev() {
        let b = k.bit(i) as usize;
        let bp = 1 - b;
        R[bp] = &R[bp] + &R[b];
        R[b] = R[b].twice();
    }
    let [R0, _] = R;
    R0
}

fn mul_zsigned_digit_l2r(p: &Point, k: &BigUint) -> Point {
    // With k = k'*2^s and k' odd of top bit m, k' = 2^m + sum of
    // (2*b[i+1] - 1)*2^i for i = 0 to m-1: each bit of k' above bit 0
    // yields a digit +1 (bit set) or -1 (bit clear) one position lower.
    let addP = p.normalize();
    let subP = addP.negate();
    let s = k.trailing_zeros().unwrap_or(0);
    let mut R = addP.clone();
    let mut i = k.bits() - 1;
    while i > s {
        R = R.twice_plus(if k.bit(i) { &addP } else { &subP });
        i -= 1;
    }
    R.times_pow2(s as u32)
}

/// Computes `a*P + b*Q` with interleaved doublings (Shamir's trick).
///
/// This is equivalent to adding the results of two separate
/// multiplications, with about half the doublings.
pub fn sum_of_two_multiplies(P: &Point, a: &BigUint, Q: &Point, b: &BigUint) -> Point {
    let P = P.normalize();
    let Q = Q.normalize();
    let PQ = (&P + &Q).normalize();
    let bits = a.bits().max(b.bits());
    let mut R = Point::infinity();
    for i in (0..bits).rev() {
        R = R.twice();
        match (a.bit(i), b.bit(i)) {
            (true, true) => R = &R + &PQ,
            (true, false) => R = &R + &P,
            (false, true) => R = &R + &Q,
            (false, false) => {}
        }
    }
    R
}

// ========================================================================

#[cfg(test)]
mod tests {

    use super::{compact_naf, sum_of_two_multiplies, Multiplier, ScalarMultiplier};
    use crate::curve::params;
    use crate::point::Point;
    use num_bigint::BigUint;
    use sha2::{Digest, Sha256};

    fn naf_value(naf: &[(i8, u32)]) -> (BigUint, BigUint) {
        // Returns (positive part, negative part).
        let mut pos = BigUint::from(0u32);
        let mut neg = BigUint::from(0u32);
        let mut shift = 0u32;
        for &(d, z) in naf {
            shift += z;
            if d > 0 {
                pos += BigUint::from(1u32) << shift;
            } else {
                neg += BigUint::from(1u32) << shift;
            }
            shift += 1;
        }
        (pos, neg)
    }

    #[test]
    fn naf_recoding() {
        let mut sh = Sha256::new();
        for i in 0..200u64 {
            let k = if i < 100 {
                BigUint::from(i + 1)
            } else {
                sh.update(i.to_le_bytes());
                BigUint::from_bytes_be(&sh.finalize_reset())
            };
            let naf = compact_naf(&k);
            let (pos, neg) = naf_value(&naf);
            assert_eq!(pos - neg, k);
            assert_eq!(naf.last().unwrap().0, 1);

            // Non-adjacent: every digit above the lowest one has at least
            // one zero below it.
            for &(_, z) in &naf[1..] {
                assert!(z >= 1);
            }
        }
    }

    #[test]
    fn small_multiples() {
        let G = Point::generator();
        let mut expected = Point::infinity();
        for k in 0..40u32 {
            let kk = BigUint::from(k);
            for m in Multiplier::ALL {
                assert_eq!(m.multiply(&G, &kk), expected, "{:?} k={}", m, k);
            }
            expected = &expected + &G;
        }
    }

    #[test]
    fn known_vector() {
        // Test vector generated randomly with Sage.
        let s = BigUint::parse_bytes(
            b"F0FCA55C06488D1C6CA454ED29573B6C89D4F76592F96F1098BD4A5F08DF863E", 16).unwrap();
        let enc = hex::decode(
            "0208289C906282497194389EA32BD63518ADEAE84C179FEA6FD2531A71144C94FA").unwrap();
        let R = Point::decode(&enc).unwrap();
        for m in Multiplier::ALL {
            let P = m.multiply(&Point::generator(), &s);
            assert_eq!(P, R);
            assert_eq!(&P.encode_compressed()[..], &enc[..]);
        }
    }

    #[test]
    fn edge_scalars() {
        let c = params();
        let G = Point::generator();
        let mut P7 = G.clone();
        for _ in 0..6 {
            P7 = &P7 + &G;
        }
        for m in Multiplier::ALL {
            assert!(m.multiply(&G, &BigUint::from(0u32)).is_infinity());
            assert!(m.multiply(&Point::infinity(), &BigUint::from(5u32)).is_infinity());
            assert!(m.multiply(&G, &c.n).is_infinity());
            assert_eq!(m.multiply(&G, &(&c.n - 1u32)), -&G);
            assert_eq!(m.multiply(&G, &(&c.n + 1u32)), G);
            assert_eq!(m.multiply(&G, &BigUint::from(7u32)), P7);

            // Powers of two exercise the trailing-zero paths.
            let k = BigUint::from(1u32) << 200;
            assert_eq!(m.multiply(&G, &k), Multiplier::Reference.multiply(&G, &k));
        }
    }

    #[test]
    fn algorithms_agree() {
        // 1024 pseudo-random (P, k) pairs. One in four scalars uses all
        // 256 bits, as keys and nonces do; the others range over all bit
        // lengths up to 248 so that short scalars are covered too.
        let mut sh = Sha256::new();
        let mut points = Vec::new();
        for i in 0..8u64 {
            sh.update(b"point");
            sh.update(i.to_le_bytes());
            let s = BigUint::from_bytes_be(&sh.finalize_reset());
            points.push(Multiplier::NafL2R.multiply(&Point::generator(), &s));
        }
        for i in 0..1024u64 {
            sh.update(b"scalar");
            sh.update(i.to_le_bytes());
            let v = sh.finalize_reset();
            let nbits = (v[0] as u64) + 1;
            let k = if i & 3 == 0 {
                BigUint::from_bytes_be(&v)
            } else {
                BigUint::from_bytes_be(&v[1..]) >> (248u64.saturating_sub(nbits))
            };
            let P = &points[(i & 7) as usize];
            let R = Multiplier::Reference.multiply(P, &k);
            for m in &Multiplier::ALL[1..] {
                let Q = m.multiply(P, &k);
                assert_eq!(Q, R, "{:?} disagrees with reference", m);
                assert_eq!(Q.encode_compressed(), R.encode_compressed());
            }
        }
    }

    #[test]
    fn double_scalar() {
        let mut sh = Sha256::new();
        for i in 0..10u64 {
            sh.update((3 * i).to_le_bytes());
            let v1 = BigUint::from_bytes_be(&sh.finalize_reset());
            sh.update((3 * i + 1).to_le_bytes());
            let v2 = BigUint::from_bytes_be(&sh.finalize_reset());
            sh.update((3 * i + 2).to_le_bytes());
            let v3 = BigUint::from_bytes_be(&sh.finalize_reset());
            let G = Point::generator();
            let A = Multiplier::NafL2R.multiply(&G, &v1);

            let R1 = &Multiplier::NafL2R.multiply(&A, &v2)
                + &Multiplier::NafL2R.multiply(&G, &v3);
            let R2 = sum_of_two_multiplies(&A, &v2, &G, &v3);
            assert_eq!(R1, R2);
        }

        // Cancellation to the point-at-infinity: a*G + (n-a)*G.
        let c = params();
        let a = BigUint::from(12345u32);
        let b = &c.n - &a;
        let G = Point::generator();
        assert!(sum_of_two_multiplies(&G, &a, &G, &b).is_infinity());
    }
}
