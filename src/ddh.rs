//! DDH group for double-blinding (C7).
//!
//! Uses a fixed safe-prime multiplicative group `Z_p*` of prime order
//! `q = (p-1)/2` (the textbook DDH instantiation for PSI-style protocols),
//! chosen independent of SM2's curve so the two cryptographic cores in this
//! crate share no state. Rationale recorded in DESIGN.md.
//!
//! `hash_to_scalar` maps an arbitrary identifier to an exponent in `[1, q)`
//! via `SHA-256(x) mod q`; this is the randomized-exponent blinding step
//! both parties apply in [`crate::pis`].

use std::sync::OnceLock;

use num_bigint::BigUint;
use num_traits::{One, Zero};
use sha2::{Digest, Sha256};

use crate::bigint::pow_mod;

/// Safe prime `p = 2q + 1` (RFC 3526's 2048-bit MODP group prime, known safe
/// and widely vetted rather than freshly generated at every run).
fn p() -> &'static BigUint {
    static P: OnceLock<BigUint> = OnceLock::new();
    P.get_or_init(|| {
        BigUint::parse_bytes(
            concat!(
                "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD",
                "129024E088A67CC74020BBEA63B139B22514A08798E3404DDEF9519",
                "B3CD3A431B302B0A6DF25F14374FE1356D6D51C245E485B576625E7",
                "EC6F44C42E9A637ED6B0BFF5CB6F406B7EDEE386BFB5A899FA5AE9F",
                "24117C4B1FE649286651ECE45B3DC2007CB8A163BF0598DA48361C5",
                "5D39A69163FA8FD24CF5F83655D23DCA3AD961C62F356208552BB9E",
                "D529077096966D670C354E4ABC9804F1746C08CA18217C32905E462E36CE3BE39E772C180E86039B2783A2EC07A28FB5C55DF06F4C52C9DE2BCBF6955817183995497CEA956AE515D2261898FA051015728E5A8AACAA68FFFFFFFFFFFFFFFF",
            )
            .as_bytes(),
            16,
        )
        .expect("valid safe-prime literal")
    })
}

/// Subgroup order `q = (p-1)/2`.
pub fn q() -> &'static BigUint {
    static Q: OnceLock<BigUint> = OnceLock::new();
    Q.get_or_init(|| (p() - BigUint::one()) >> 1u32)
}

/// Group modulus `p`.
pub fn modulus() -> &'static BigUint {
    p()
}

/// Raise `base` to `exp` modulo `p` — the single primitive both rounds of
/// [`crate::pis`] apply to double-blind each element.
pub fn exponentiate(base: &BigUint, exp: &BigUint) -> BigUint {
    pow_mod(base, exp, p())
}

/// Map an arbitrary byte string into the exponent group `[1, q)` via
/// `H(x) mod q`, retrying (by appending a counter) on the zero-probability
/// case of landing on zero.
pub fn hash_to_scalar(data: &[u8]) -> BigUint {
    let q = q();
    let mut counter: u8 = 0;
    loop {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hasher.update([counter]);
        let digest = hasher.finalize();
        let candidate = BigUint::from_bytes_be(&digest) % q;
        if !candidate.is_zero() {
            return candidate;
        }
        counter = counter.wrapping_add(1);
    }
}

/// Map an arbitrary byte string onto a group element of `Z_p*` via
/// hash-then-exponentiate: `g_0^{H(x)}` for a fixed generator `g_0 = 2`.
/// Used as the base each party's identifiers start from before blinding.
pub fn hash_to_group(data: &[u8]) -> BigUint {
    let exponent = hash_to_scalar(data);
    exponentiate(&BigUint::from(2u8), &exponent)
}
