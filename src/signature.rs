//! ECDSA signature values and their encodings.
//!
//! A signature is a pair of integers `(r, s)`, both in `[1, n-1]`. Two
//! encodings are supported:
//!
//!  - DER, as used in Bitcoin transactions and most X.509-related
//!    formats: `30 len 02 rlen r 02 slen s`, where `r` and `s` use the
//!    minimal big-endian encoding of a non-negative ASN.1 `INTEGER` (a
//!    leading 0x00 byte is inserted when the top bit of the first byte
//!    would otherwise be set). Lengths are written in short form; on
//!    decoding, the one-byte long form (`0x81 len`) is also accepted,
//!    since some encoders always emit it.
//!
//!  - Fixed-size: `r` and `s` over 32 bytes each (unsigned big-endian),
//!    concatenated in that order (64 bytes).
//!
//! For any valid signature `(r, s)`, the pair `(r, n - s)` is also valid
//! for the same message and key. `canonicalize()` picks the "low-S" form
//! (`s <= n/2`), which removes that malleability.

use num_bigint::BigUint;

use crate::curve::params;
use crate::error::{Error, Result};
use crate::field::encode_be32;

/// An ECDSA signature `(r, s)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    r: BigUint,
    s: BigUint,
}

impl Signature {

    /// Builds a signature from its two halves.
    ///
    /// Both values must be in `[1, n-1]`.
    pub fn new(r: BigUint, s: BigUint) -> Result<Self> {
        let c = params();
        if !c.is_valid_scalar(&r) || !c.is_valid_scalar(&s) {
            return Err(Error::ScalarOutOfRange);
        }
        Ok(Self { r, s })
    }

    #[inline]
    pub fn r(&self) -> &BigUint {
        &self.r
    }

    #[inline]
    pub fn s(&self) -> &BigUint {
        &self.s
    }

    /// Tests whether `s <= n/2`.
    pub fn is_low_s(&self) -> bool {
        self.s <= params().half_n
    }

    /// Returns the low-S form of this signature: `(r, n - s)` if
    /// `s > n/2`, an identical copy otherwise.
    pub fn canonicalize(&self) -> Self {
        if self.is_low_s() {
            self.clone()
        } else {
            Self { r: self.r.clone(), s: &params().n - &self.s }
        }
    }

    /// Encodes this signature in DER.
    pub fn to_der(&self) -> Vec<u8> {
        let r = der_integer(&self.r);
        let s = der_integer(&self.s);
        let mut out = Vec::with_capacity(r.len() + s.len() + 6);
        out.push(0x30);
        push_der_length(&mut out, r.len() + s.len());
        out.extend_from_slice(&r);
        out.extend_from_slice(&s);
        out
    }

    /// Decodes a DER-encoded signature.
    ///
    /// The input must be exactly one `SEQUENCE` of two non-negative,
    /// minimally encoded `INTEGER` values, with no trailing bytes; both
    /// integers must be in `[1, n-1]`.
    pub fn from_der(buf: &[u8]) -> Result<Self> {
        let mut rd = DerReader { buf, pos: 0 };
        if rd.byte()? != 0x30 {
            return Err(der_error("expected SEQUENCE tag"));
        }
        let len = rd.length()?;
        if len != rd.remaining() {
            return Err(der_error("SEQUENCE length mismatch"));
        }
        let r = rd.integer()?;
        let s = rd.integer()?;
        if rd.remaining() != 0 {
            return Err(der_error("trailing data in SEQUENCE"));
        }
        Self::new(r, s)
    }

    /// Tests whether `buf` is a valid DER-encoded signature.
    pub fn is_valid_der(buf: &[u8]) -> bool {
        Self::from_der(buf).is_ok()
    }

    /// Encodes this signature over 64 bytes (`r || s`, unsigned
    /// big-endian).
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&encode_be32(&self.r));
        out[32..].copy_from_slice(&encode_be32(&self.s));
        out
    }

    /// Decodes a 64-byte `r || s` signature.
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        if buf.len() != 64 {
            return Err(Error::InvalidLength(64, buf.len()));
        }
        Self::new(BigUint::from_bytes_be(&buf[..32]), BigUint::from_bytes_be(&buf[32..]))
    }
}

fn der_error(reason: &'static str) -> Error {
    tracing::debug!(reason, "rejected DER signature");
    Error::InvalidDer(reason)
}

// Minimal DER INTEGER for a non-negative value (tag included).
fn der_integer(v: &BigUint) -> Vec<u8> {
    let mut bb = v.to_bytes_be();
    if bb[0] & 0x80 != 0 {
        bb.insert(0, 0x00);
    }
    let mut out = Vec::with_capacity(bb.len() + 3);
    out.push(0x02);
    push_der_length(&mut out, bb.len());
    out.extend_from_slice(&bb);
    out
}

fn push_der_length(out: &mut Vec<u8>, len: usize) {
    if len < 0x80 {
        out.push(len as u8);
    } else {
        // Signature components never exceed 33 bytes; this branch only
        // matters for the general form.
        out.push(0x81);
        out.push(len as u8);
    }
}

struct DerReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> DerReader<'a> {

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn byte(&mut self) -> Result<u8> {
        let b = *self.buf.get(self.pos).ok_or_else(|| der_error("truncated input"))?;
        self.pos += 1;
        Ok(b)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(der_error("length exceeds input"));
        }
        let v = &self.buf[self.pos..(self.pos + len)];
        self.pos += len;
        Ok(v)
    }

    // Short form, or the one-byte long form 0x81.
    fn length(&mut self) -> Result<usize> {
        match self.byte()? {
            b if b < 0x80 => Ok(b as usize),
            0x81 => Ok(self.byte()? as usize),
            _ => Err(der_error("unsupported length encoding")),
        }
    }

    fn integer(&mut self) -> Result<BigUint> {
        if self.byte()? != 0x02 {
            return Err(der_error("expected INTEGER tag"));
        }
        let len = self.length()?;
        let v = self.take(len)?;
        if v.is_empty() {
            return Err(der_error("empty INTEGER"));
        }
        if v[0] & 0x80 != 0 {
            return Err(der_error("negative INTEGER"));
        }
        if v.len() > 1 && v[0] == 0x00 && v[1] & 0x80 == 0 {
            return Err(der_error("non-minimal INTEGER"));
        }
        Ok(BigUint::from_bytes_be(v))
    }
}

// ========================================================================

#[cfg(test)]
mod tests {

    use super::Signature;
    use crate::curve::params;
    use crate::error::Error;
    use num_bigint::BigUint;

    fn hexint(s: &str) -> BigUint {
        BigUint::parse_bytes(s.as_bytes(), 16).unwrap()
    }

    #[test]
    fn der_encoding() {
        // Both halves with the high bit set: 0x00 padding on each.
        let sig = Signature::new(
            hexint("813EF79CCEFA9A56F7BA805F0E478584FE5F0DD5F567BC09B5123CCBC9832365"),
            hexint("900E75AD233FCC908509DBFF5922647DB37C21F4AFD3203AE8DC4AE7794B0F87"),
        ).unwrap();
        let der = sig.to_der();
        assert_eq!(der.len(), 72);
        assert_eq!(&der[..5], &[0x30, 0x46, 0x02, 0x21, 0x00]);
        assert_eq!(der[37], 0x02);
        assert_eq!(der[38], 0x21);
        assert_eq!(der[39], 0x00);
        assert_eq!(Signature::from_der(&der).unwrap(), sig);

        // Small values: minimal encodings.
        let sig = Signature::new(BigUint::from(1u32), BigUint::from(0x80u32)).unwrap();
        let der = sig.to_der();
        assert_eq!(der, [0x30, 0x07, 0x02, 0x01, 0x01, 0x02, 0x02, 0x00, 0x80]);
        assert_eq!(Signature::from_der(&der).unwrap(), sig);
    }

    #[test]
    fn der_round_trip() {
        let c = params();
        let values = [
            BigUint::from(1u32),
            BigUint::from(0x7Fu32),
            BigUint::from(0xFFu32),
            BigUint::from(0x0100u32),
            &c.half_n + 0u32,
            &c.half_n + 1u32,
            &c.n - 1u32,
        ];
        for r in &values {
            for s in &values {
                let sig = Signature::new(r.clone(), s.clone()).unwrap();
                let der = sig.to_der();
                assert!(Signature::is_valid_der(&der));
                assert_eq!(Signature::from_der(&der).unwrap(), sig);
                assert_eq!(Signature::from_bytes(&sig.to_bytes()).unwrap(), sig);
            }
        }
    }

    #[test]
    fn der_long_form_length() {
        let short: &[u8] = &[0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x02];
        let a = Signature::from_der(short).unwrap();
        assert_eq!(a.r(), &BigUint::from(1u32));
        assert_eq!(a.s(), &BigUint::from(2u32));

        let long: [&[u8]; 3] = [
            // both the SEQUENCE and the second INTEGER
            &[0x30, 0x81, 0x07, 0x02, 0x01, 0x01, 0x02, 0x81, 0x01, 0x02],
            // SEQUENCE only
            &[0x30, 0x81, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x02],
            // first INTEGER only
            &[0x30, 0x07, 0x02, 0x81, 0x01, 0x01, 0x02, 0x01, 0x02],
        ];
        for der in long.iter() {
            assert_eq!(Signature::from_der(der).unwrap(), a);
        }

        // Re-encoding uses the short form.
        assert_eq!(a.to_der(), short);
    }

    #[test]
    fn der_rejects() {
        let bad: [&[u8]; 12] = [
            &[],
            &[0x30],
            // wrong outer tag
            &[0x31, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x02],
            // outer length too long / too short
            &[0x30, 0x07, 0x02, 0x01, 0x01, 0x02, 0x01, 0x02],
            &[0x30, 0x05, 0x02, 0x01, 0x01, 0x02, 0x01, 0x02],
            // trailing garbage after the sequence
            &[0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x02, 0x00],
            // three integers
            &[0x30, 0x09, 0x02, 0x01, 0x01, 0x02, 0x01, 0x02, 0x02, 0x01, 0x03],
            // one integer only
            &[0x30, 0x03, 0x02, 0x01, 0x01],
            // negative integer
            &[0x30, 0x06, 0x02, 0x01, 0x81, 0x02, 0x01, 0x02],
            // non-minimal integer
            &[0x30, 0x07, 0x02, 0x02, 0x00, 0x01, 0x02, 0x01, 0x02],
            // zero r
            &[0x30, 0x06, 0x02, 0x01, 0x00, 0x02, 0x01, 0x02],
            // wrong inner tag
            &[0x30, 0x06, 0x04, 0x01, 0x01, 0x02, 0x01, 0x02],
        ];
        for b in bad.iter() {
            assert!(Signature::from_der(b).is_err(), "accepted {:02X?}", b);
            assert!(!Signature::is_valid_der(b));
        }
        assert_eq!(
            Signature::from_der(&[0x30, 0x06, 0x02, 0x01, 0x00, 0x02, 0x01, 0x02]),
            Err(Error::ScalarOutOfRange));

        // r = n is out of range.
        let n = params().n.to_bytes_be();
        let mut der = vec![0x30, 0x26, 0x02, 0x21, 0x00];
        der.extend_from_slice(&n);
        der.extend_from_slice(&[0x02, 0x01, 0x01]);
        assert_eq!(Signature::from_der(&der), Err(Error::ScalarOutOfRange));
    }

    #[test]
    fn low_s() {
        let c = params();
        let r = BigUint::from(5u32);

        let high = Signature::new(r.clone(), &c.half_n + 1u32).unwrap();
        assert!(!high.is_low_s());
        let low = high.canonicalize();
        assert!(low.is_low_s());
        assert_eq!(low.s(), &(&c.n - &c.half_n - 1u32));
        assert_eq!(low.r(), &r);
        assert_eq!(low.canonicalize(), low);

        let edge = Signature::new(r.clone(), c.half_n.clone()).unwrap();
        assert!(edge.is_low_s());
        assert_eq!(edge.canonicalize(), edge);

        let top = Signature::new(r, &c.n - 1u32).unwrap();
        assert_eq!(top.canonicalize().s(), &BigUint::from(1u32));
    }

    #[test]
    fn range_checks() {
        let c = params();
        assert!(Signature::new(BigUint::from(0u32), BigUint::from(1u32)).is_err());
        assert!(Signature::new(BigUint::from(1u32), BigUint::from(0u32)).is_err());
        assert!(Signature::new(c.n.clone(), BigUint::from(1u32)).is_err());
        assert!(Signature::new(BigUint::from(1u32), c.n.clone()).is_err());
        assert!(Signature::from_bytes(&[0u8; 63]).is_err());
        assert!(Signature::from_bytes(&[0u8; 64]).is_err());
    }
}
