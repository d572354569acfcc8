//! Per-signature nonce generation.
//!
//! ECDSA needs, for each signature, a fresh secret scalar `k` in
//! `[1, n-1]`. Two calculators are provided, both implementing
//! `NonceCalculator`:
//!
//!  - `RandomNonce` draws `k` uniformly from a caller-provided
//!    cryptographically secure random source. Its output is not
//!    reproducible.
//!
//!  - `HmacNonce` derives `k` deterministically from the private key and
//!    the message digest with HMAC/SHA-256, following [RFC 6979] (section
//!    3.2). The same `(n, d, message)` always yields the same sequence of
//!    `k` values; no external randomness is used.
//!
//! A calculator is initialized once per signature with `init()`, then
//! queried with `next_k()` as many times as the signer needs (a signer
//! retries when it obtains `r = 0` or `s = 0`). The internal state must
//! not be shared between concurrent signing operations.
//!
//! [RFC 6979]: https://datatracker.ietf.org/doc/html/rfc6979

use hmac::{Hmac, Mac};
use num_bigint::BigUint;
use num_traits::Zero;
use rand_core::{CryptoRng, RngCore};
use sha2::Sha256;

use crate::error::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// Source of ECDSA nonces.
pub trait NonceCalculator {

    /// Tells whether this calculator derives nonces from the key and
    /// message (and therefore needs them in `init()`).
    fn is_deterministic(&self) -> bool;

    /// Prepares the calculator for one signature with group order
    /// `order`, private scalar `d` and message digest `message`.
    ///
    /// Non-deterministic calculators ignore `d` and `message`. An order
    /// lower than 2 leaves no valid nonce and is rejected.
    fn init(&mut self, order: &BigUint, d: &BigUint, message: &[u8]) -> Result<()>;

    /// Returns the next candidate nonce, always in `[1, order-1]`.
    fn next_k(&mut self) -> Result<BigUint>;
}

/// Interprets `buf` as an unsigned big-endian integer, keeping only its
/// leftmost `qbits` bits if it is longer (RFC 6979 `bits2int`).
fn bits2int(buf: &[u8], qbits: u64) -> BigUint {
    let v = BigUint::from_bytes_be(buf);
    let blen = (buf.len() as u64) * 8;
    if blen > qbits {
        v >> (blen - qbits)
    } else {
        v
    }
}

/// Encodes `v` over exactly `len` bytes (unsigned big-endian); `v` MUST
/// fit (callers reduce it modulo the order first).
fn int2octets(v: &BigUint, len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len];
    if !v.is_zero() {
        let bb = v.to_bytes_be();
        out[(len - bb.len())..].copy_from_slice(&bb);
    }
    out
}

fn check_order(order: &BigUint) -> Result<&BigUint> {
    if order.bits() < 2 {
        return Err(Error::InvalidOrder);
    }
    Ok(order)
}

// ========================================================================

/// Nonces drawn uniformly at random.
pub struct RandomNonce<R> {
    rng: R,
    order: Option<BigUint>,
}

impl<R: CryptoRng + RngCore> RandomNonce<R> {

    /// Creates a calculator drawing its randomness from `rng`.
    pub fn new(rng: R) -> Self {
        Self { rng, order: None }
    }
}

impl<R: CryptoRng + RngCore> NonceCalculator for RandomNonce<R> {

    fn is_deterministic(&self) -> bool {
        false
    }

    fn init(&mut self, order: &BigUint, _d: &BigUint, _message: &[u8]) -> Result<()> {
        self.order = None;
        self.order = Some(check_order(order)?.clone());
        Ok(())
    }

    fn next_k(&mut self) -> Result<BigUint> {
        let order = self.order.as_ref().ok_or(Error::NonceNotInitialized)?;
        let qbits = order.bits();
        let mut buf = vec![0u8; ((qbits + 7) >> 3) as usize];
        let excess = (buf.len() as u64) * 8 - qbits;
        loop {
            // Rejection sampling over [0, 2^qbits); the expected number of
            // iterations is below 2 for any order.
            self.rng.fill_bytes(&mut buf);
            buf[0] &= 0xFFu8 >> excess;
            let k = BigUint::from_bytes_be(&buf);
            if !k.is_zero() && k < *order {
                return Ok(k);
            }
        }
    }
}

// ========================================================================

// RFC 6979 internal state: the HMAC key K and the chaining value V, both
// sized to the SHA-256 output.
#[allow(non_snake_case)]
struct HmacState {
    K: [u8; 32],
    V: [u8; 32],
}

#[allow(non_snake_case)]
impl HmacState {

    fn new() -> Self {
        Self { K: [0x00u8; 32], V: [0x01u8; 32] }
    }

    // HMAC/SHA-256 keyed with the current K over the concatenation of the
    // provided chunks.
    fn hmac(&self, chunks: &[&[u8]]) -> Result<[u8; 32]> {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(&self.K)?;
        for c in chunks {
            mac.update(c);
        }
        Ok(mac.finalize().into_bytes().into())
    }

    // K = HMAC_K(V || sep || extra); V = HMAC_K(V)
    fn update(&mut self, sep: u8, extra: &[&[u8]]) -> Result<()> {
        let V = self.V;
        let mut chunks: Vec<&[u8]> = vec![&V[..], core::slice::from_ref(&sep)];
        chunks.extend_from_slice(extra);
        self.K = self.hmac(&chunks)?;
        self.step()
    }

    // V = HMAC_K(V)
    fn step(&mut self) -> Result<()> {
        self.V = self.hmac(&[&self.V[..]])?;
        Ok(())
    }
}

/// Deterministic nonces (RFC 6979, HMAC/SHA-256).
pub struct HmacNonce {
    order: Option<BigUint>,
    state: HmacState,
}

impl HmacNonce {

    pub fn new() -> Self {
        Self { order: None, state: HmacState::new() }
    }
}

impl Default for HmacNonce {
    fn default() -> Self {
        Self::new()
    }
}

impl NonceCalculator for HmacNonce {

    fn is_deterministic(&self) -> bool {
        true
    }

    fn init(&mut self, order: &BigUint, d: &BigUint, message: &[u8]) -> Result<()> {
        self.order = None;
        let order = check_order(order)?;
        let qbits = order.bits();
        let size = ((qbits + 7) >> 3) as usize;

        // int2octets(d) and bits2octets(message): the message integer is
        // brought into [0, n) with a single subtraction (it has at most
        // as many bits as n).
        let x = int2octets(&(d % order), size);
        let mut m = bits2int(message, qbits);
        if m >= *order {
            m -= order;
        }
        let m = int2octets(&m, size);

        // 3.2.b to 3.2.g
        self.state = HmacState::new();
        self.state.update(0x00, &[&x[..], &m[..]])?;
        self.state.update(0x01, &[&x[..], &m[..]])?;
        self.order = Some(order.clone());
        Ok(())
    }

    fn next_k(&mut self) -> Result<BigUint> {
        let order = self.order.as_ref().ok_or(Error::NonceNotInitialized)?;
        let qbits = order.bits();
        let mut t = vec![0u8; ((qbits + 7) >> 3) as usize];

        // 3.2.h
        loop {
            let mut off = 0;
            while off < t.len() {
                self.state.step()?;
                let len = (t.len() - off).min(self.state.V.len());
                t[off..(off + len)].copy_from_slice(&self.state.V[..len]);
                off += len;
            }
            let k = bits2int(&t, qbits);
            if !k.is_zero() && k < *order {
                return Ok(k);
            }

            tracing::trace!("RFC 6979 candidate out of range, reseeding");
            self.state.update(0x00, &[])?;
        }
    }
}

// ========================================================================
