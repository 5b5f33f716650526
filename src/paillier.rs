//! Paillier additively-homomorphic cryptosystem (C6).
//!
//! Textbook Paillier: `n = p·q`, `g = n + 1` (the standard simplification,
//! valid because `n+1` always has order `n` mod `n²`), decryption via the `L`
//! function with `λ = φ(n)` and `μ = λ⁻¹ mod n`. Ciphertext addition and
//! rerandomization are the two operations [`crate::pis`] needs to blind the
//! intersection-sum without touching the plaintext.

use num_bigint::BigUint;
use num_integer::Integer;
use num_prime::RandPrime;
use num_traits::{One, Zero};
use rand::rngs::OsRng;

use crate::bigint::{mod_inv, pow_mod};
use crate::error::PaillierError;

/// Bit length of each of the two safe-ish primes `p`, `q`; `n = p·q` is twice
/// this width. 1024 keeps the demo binaries and test suite fast while still
/// exercising real multi-limb arithmetic; production use should raise this.
pub const PRIME_BITS: usize = 1024;

/// A Paillier public key `(n, g)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    pub n: BigUint,
    pub n_squared: BigUint,
    pub g: BigUint,
}

impl PublicKey {
    /// `Enc(m) = g^m · r^n mod n²` for a uniform `r ∈ Z_n*` drawn internally.
    pub fn encrypt(&self, message: &BigUint) -> Result<BigUint, PaillierError> {
        if message >= &self.n {
            return Err(PaillierError::PlaintextOutOfRange);
        }
        let r = loop {
            let candidate = crate::bigint::random_nonzero_below(&self.n)
                .map_err(|_| PaillierError::CiphertextMalformed)?;
            if candidate.gcd(&self.n) == BigUint::one() {
                break candidate;
            }
        };
        Ok(self.encrypt_with_randomness(message, &r))
    }

    fn encrypt_with_randomness(&self, message: &BigUint, r: &BigUint) -> BigUint {
        // g = n+1, so g^m mod n^2 simplifies to (1 + m*n) mod n^2.
        let gm = (BigUint::one() + message * &self.n) % &self.n_squared;
        let rn = pow_mod(r, &self.n, &self.n_squared);
        (gm * rn) % &self.n_squared
    }

    /// Homomorphic addition: `Enc(a) · Enc(b) mod n² = Enc(a + b mod n)`.
    pub fn add(&self, lhs: &BigUint, rhs: &BigUint) -> Result<BigUint, PaillierError> {
        if lhs >= &self.n_squared || rhs >= &self.n_squared {
            return Err(PaillierError::CiphertextMalformed);
        }
        Ok((lhs * rhs) % &self.n_squared)
    }

    /// Rerandomize a ciphertext in place: multiply by `r^n mod n²` for a
    /// fresh uniform `r`, without changing the plaintext it decrypts to.
    pub fn rerandomize(&self, ciphertext: &BigUint) -> Result<BigUint, PaillierError> {
        let r = loop {
            let candidate = crate::bigint::random_nonzero_below(&self.n)
                .map_err(|_| PaillierError::CiphertextMalformed)?;
            if candidate.gcd(&self.n) == BigUint::one() {
                break candidate;
            }
        };
        let rn = pow_mod(&r, &self.n, &self.n_squared);
        Ok((ciphertext * rn) % &self.n_squared)
    }
}

/// A Paillier private key `(λ, μ)`, kept alongside its public half.
///
/// Only the client in [`crate::pis`] ever holds a [`PrivateKey`]; the server
/// sees ciphertexts and the public key alone.
pub struct PrivateKey {
    pub public: PublicKey,
    lambda: BigUint,
    mu: BigUint,
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.lambda = BigUint::zero();
        self.mu = BigUint::zero();
    }
}

impl PrivateKey {
    /// `Dec(c) = L(c^λ mod n²) · μ mod n`, where `L(x) = (x - 1) / n`.
    pub fn decrypt(&self, ciphertext: &BigUint) -> Result<BigUint, PaillierError> {
        if ciphertext >= &self.public.n_squared {
            return Err(PaillierError::CiphertextMalformed);
        }
        let x = pow_mod(ciphertext, &self.lambda, &self.public.n_squared);
        let l = l_function(&x, &self.public.n);
        Ok((&l * &self.mu) % &self.public.n)
    }
}

fn l_function(x: &BigUint, n: &BigUint) -> BigUint {
    (x - BigUint::one()) / n
}

/// Generate a fresh Paillier keypair: two random `PRIME_BITS`-wide primes
/// `p ≠ q`, `n = p·q`, `λ = lcm(p-1, q-1)`, `μ = λ⁻¹ mod n`.
pub fn keygen() -> Result<(PrivateKey, PublicKey), PaillierError> {
    let mut rng = OsRng;
    let p: BigUint = rng.gen_prime_exact(PRIME_BITS, None);
    let q = loop {
        let candidate: BigUint = rng.gen_prime_exact(PRIME_BITS, None);
        if candidate != p {
            break candidate;
        }
    };

    let n = &p * &q;
    let n_squared = &n * &n;
    let g = &n + BigUint::one();

    let p_minus_one = &p - BigUint::one();
    let q_minus_one = &q - BigUint::one();
    let lambda = lcm(&p_minus_one, &q_minus_one);
    let mu = mod_inv(&(&lambda % &n), &n);
    if mu.is_zero() {
        return Err(PaillierError::CiphertextMalformed);
    }

    let public = PublicKey { n, n_squared, g };
    let private = PrivateKey { public: public.clone(), lambda, mu };
    Ok((private, public))
}

fn lcm(a: &BigUint, b: &BigUint) -> BigUint {
    let gcd = a.gcd(b);
    a / &gcd * b
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Smaller than [`PRIME_BITS`] to keep the unit test suite fast; the
    /// demo binaries and integration tests exercise the real key size.
    const TEST_BITS: usize = 256;

    fn small_keygen() -> (PrivateKey, PublicKey) {
        let mut rng = OsRng;
        let p: BigUint = rng.gen_prime_exact(TEST_BITS, None);
        let q = loop {
            let candidate: BigUint = rng.gen_prime_exact(TEST_BITS, None);
            if candidate != p {
                break candidate;
            }
        };
        let n = &p * &q;
        let n_squared = &n * &n;
        let g = &n + BigUint::one();
        let lambda = lcm(&(&p - BigUint::one()), &(&q - BigUint::one()));
        let mu = mod_inv(&(&lambda % &n), &n);
        let public = PublicKey { n, n_squared, g };
        let private = PrivateKey { public: public.clone(), lambda, mu };
        (private, public)
    }

    #[test]
    fn encrypt_then_decrypt_round_trips() {
        let (sk, pk) = small_keygen();
        let m = BigUint::from(42u32);
        let c = pk.encrypt(&m).unwrap();
        assert_eq!(sk.decrypt(&c).unwrap(), m);
    }

    #[test]
    fn addition_is_homomorphic() {
        let (sk, pk) = small_keygen();
        let a = BigUint::from(17u32);
        let b = BigUint::from(25u32);
        let ca = pk.encrypt(&a).unwrap();
        let cb = pk.encrypt(&b).unwrap();
        let sum_cipher = pk.add(&ca, &cb).unwrap();
        assert_eq!(sk.decrypt(&sum_cipher).unwrap(), a + b);
    }

    #[test]
    fn rerandomize_preserves_plaintext() {
        let (sk, pk) = small_keygen();
        let m = BigUint::from(7u32);
        let c = pk.encrypt(&m).unwrap();
        let c2 = pk.rerandomize(&c).unwrap();
        assert_ne!(c, c2);
        assert_eq!(sk.decrypt(&c2).unwrap(), m);
    }

    #[test]
    fn encrypt_rejects_out_of_range_plaintext() {
        let (_sk, pk) = small_keygen();
        assert!(pk.encrypt(&pk.n).is_err());
    }
}
