//! Arbitrary-precision modular arithmetic (C1).
//!
//! This is the leaf layer every other module in the crate builds on: SM2
//! curve arithmetic reduces modulo the field prime `P` and the group order
//! `N`; Paillier and the DDH group reduce modulo much larger composite and
//! prime moduli. Keeping one small set of canonical-residue helpers here
//! means every caller gets the same non-negative-residue convention instead
//! of re-deriving it at each call site.

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::Zero;
use rand::{rngs::OsRng, RngCore};

/// `(a + b) mod m`.
pub fn add_mod(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    (a + b) % m
}

/// `(a - b) mod m`, non-negative.
pub fn sub_mod(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    let a = a % m;
    let b = b % m;
    if a >= b {
        a - b
    } else {
        m - (b - a)
    }
}

/// `(a * b) mod m`.
pub fn mul_mod(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    (a * b) % m
}

/// `base^exp mod m`.
pub fn pow_mod(base: &BigUint, exp: &BigUint, m: &BigUint) -> BigUint {
    base.modpow(exp, m)
}

/// Modular inverse via the extended Euclidean algorithm.
///
/// Returns `0` when `a == 0`; callers must not invert a value that is not
/// coprime with `m`, in which case the returned "inverse" is meaningless
/// (`gcd(a, m) != 1`).
pub fn mod_inv(a: &BigUint, m: &BigUint) -> BigUint {
    if a.is_zero() {
        return BigUint::zero();
    }
    let a_signed = BigInt::from_biguint(Sign::Plus, a.clone());
    let m_signed = BigInt::from_biguint(Sign::Plus, m.clone());
    let egcd = a_signed.extended_gcd(&m_signed);
    let mut x = egcd.x % &m_signed;
    if x.sign() == Sign::Minus {
        x += &m_signed;
    }
    x.to_biguint().expect("reduced mod a positive modulus")
}

/// Draw a cryptographically uniform random integer in `[0, bound)`.
///
/// Uses rejection sampling over the minimal byte width of `bound`, masking
/// the high bits of the top byte to keep the rejection rate low.
pub fn random_below(bound: &BigUint) -> Result<BigUint, rand::Error> {
    assert!(!bound.is_zero(), "bound must be positive");
    let bit_len = bound.bits() as usize;
    let byte_len = bit_len.div_ceil(8);
    let excess_bits = byte_len * 8 - bit_len;
    loop {
        let mut buf = vec![0u8; byte_len];
        OsRng.try_fill_bytes(&mut buf)?;
        if excess_bits > 0 {
            buf[0] &= 0xFFu8 >> excess_bits;
        }
        let candidate = BigUint::from_bytes_be(&buf);
        if candidate < *bound {
            return Ok(candidate);
        }
    }
}

/// Draw uniform in `[1, bound)`, i.e. excluding zero.
///
/// Used for private scalars and nonces, which must be nonzero
/// (e.g. `dA ∈ [1, N-2]`, `k ∈ [1, N-1]`).
pub fn random_nonzero_below(bound: &BigUint) -> Result<BigUint, rand::Error> {
    loop {
        let candidate = random_below(bound)?;
        if !candidate.is_zero() {
            return Ok(candidate);
        }
    }
}
