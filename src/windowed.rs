//! Windowed (fixed-width, table-driven) scalar multiplication (C5).
//!
//! Precomputes `T[i] = i·P` for `i ∈ [0, 2^w)`, then walks the scalar
//! left-to-right in `w`-bit windows, doubling `w` times and adding the
//! appropriate table entry per window. Must agree with
//! [`crate::curve::AffinePoint::scalar_mul`] for every input; that property
//! is the main thing tested below.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::curve::AffinePoint;

/// Multiply `point` by `scalar` using a `window_bits`-wide precomputed
/// table. `window_bits` must be in `1..=16` (enough headroom for any
/// sensible choice; SM2 scalars are 256 bits so a 4–8 bit window is typical).
pub fn scalar_mul(point: &AffinePoint, scalar: &BigUint, window_bits: u32) -> AffinePoint {
    assert!((1..=16).contains(&window_bits), "window_bits must be in 1..=16");
    if scalar.is_zero() || point.is_infinity() {
        return AffinePoint::Infinity;
    }

    let table = build_table(point, window_bits);
    let total_bits = scalar.bits();
    let mut result = AffinePoint::Infinity;

    // Walk windows from the most-significant down to the least-significant.
    let num_windows = total_bits.div_ceil(window_bits as u64);
    for w in (0..num_windows).rev() {
        for _ in 0..window_bits {
            result = result.add(&result);
        }
        let window_value = extract_window(scalar, w * window_bits as u64, window_bits);
        if window_value != 0 {
            result = result.add(&table[window_value as usize]);
        }
    }
    result
}

fn build_table(point: &AffinePoint, window_bits: u32) -> Vec<AffinePoint> {
    let size = 1usize << window_bits;
    let mut table = Vec::with_capacity(size);
    table.push(AffinePoint::Infinity);
    if size > 1 {
        table.push(point.clone());
    }
    for i in 2..size {
        table.push(table[i - 1].add(point));
    }
    table
}

/// Read `window_bits` bits of `scalar` starting at bit offset `start`
/// (little-endian bit order, i.e. bit 0 is the least significant).
fn extract_window(scalar: &BigUint, start: u64, window_bits: u32) -> u64 {
    let mut value = 0u64;
    for i in 0..window_bits as u64 {
        if scalar.bit(start + i) {
            value |= 1 << i;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::g;
    use num_bigint::BigUint;

    #[test]
    fn agrees_with_naive_multiplication() {
        let k = BigUint::parse_bytes(b"1234567890ABCDEF", 16).unwrap();
        let naive = g().scalar_mul(&k);
        for w in [1u32, 2, 3, 4, 5, 8] {
            assert_eq!(scalar_mul(&g(), &k, w), naive, "window size {w} disagreed");
        }
    }

    #[test]
    fn zero_scalar_is_infinity() {
        assert!(scalar_mul(&g(), &BigUint::zero(), 4).is_infinity());
    }

    #[test]
    fn agrees_across_many_scalars() {
        use crate::curve::n;
        let mut k = BigUint::from(1u8);
        for _ in 0..20 {
            let naive = g().scalar_mul(&k);
            assert_eq!(scalar_mul(&g(), &k, 4), naive);
            k = (&k * 7u8 + 13u8) % n();
        }
    }
}
