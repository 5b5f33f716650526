//! SM2 signature engine: ZA derivation, keygen, sign, verify (C3).
//!
//! The GB/T 32918 standard designates SM3 as the hash function; `H` here is
//! SHA-256 as a stand-in (swap [`hash`] for an SM3 implementation to be
//! fully standards-conformant). `ZA` includes the public key `PA` in its
//! preimage, per the standard.

use num_bigint::BigUint;
use num_traits::Zero;
use sha2::{Digest, Sha256};

use crate::bigint::{mod_inv, random_nonzero_below};
use crate::curve::{a, b, g, n, AffinePoint};
use crate::error::Sm2Error;

/// Bound on sign's internal retry loop, so a pathological run fails with a
/// typed error instead of looping forever.
pub const MAX_SIGN_RETRIES: u32 = 16;

const FIELD_BYTES: usize = 32;

/// `H` — the hash function designated by the standard (SM3 in a conformant
/// build; SHA-256 here as a documented stand-in).
pub fn hash(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// An SM2 private scalar `dA ∈ [1, N-2]`.
///
/// Zeroed on drop so the scalar doesn't linger in freed memory.
pub struct SecretKey(BigUint);

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.0 = BigUint::zero();
    }
}

impl SecretKey {
    /// Expose the raw scalar for signing; never serialized or logged.
    pub fn scalar(&self) -> &BigUint {
        &self.0
    }
}

/// `keygen()`: draw `dA ∈ [1, N-2]`, compute `PA = dA·G`.
pub fn keygen() -> Result<(SecretKey, AffinePoint), Sm2Error> {
    // N - 2 as an exclusive bound over [0, N-2) shifted by +1 draws [1, N-2].
    let bound = n() - 2u8;
    let d = random_nonzero_below(&bound).map_err(|e| Sm2Error::EntropyFailure(e.to_string()))?;
    let pa = g().scalar_mul(&d);
    Ok((SecretKey(d), pa))
}

fn encode_field_element(value: &BigUint) -> [u8; FIELD_BYTES] {
    let mut out = [0u8; FIELD_BYTES];
    let bytes = value.to_bytes_be();
    debug_assert!(bytes.len() <= FIELD_BYTES);
    out[FIELD_BYTES - bytes.len()..].copy_from_slice(&bytes);
    out
}

/// Derive `ZA = H(ENTL ‖ ID ‖ A ‖ B ‖ Gx ‖ Gy ‖ PA.x ‖ PA.y)`.
///
/// `ENTL` is the bit length of `id` encoded as two big-endian bytes, as the
/// standard requires.
pub fn derive_za(id: &[u8], pa: &AffinePoint) -> Result<[u8; 32], Sm2Error> {
    let (pax, pay) = pa.xy().ok_or(Sm2Error::InvalidPoint)?;
    let entl = (id.len() as u64) * 8;
    let mut preimage = Vec::with_capacity(2 + id.len() + FIELD_BYTES * 6);
    preimage.extend_from_slice(&(entl as u16).to_be_bytes());
    preimage.extend_from_slice(id);
    preimage.extend_from_slice(&encode_field_element(a()));
    preimage.extend_from_slice(&encode_field_element(b()));
    let generator = g();
    let (gx, gy) = generator.xy().unwrap();
    preimage.extend_from_slice(&encode_field_element(gx));
    preimage.extend_from_slice(&encode_field_element(gy));
    preimage.extend_from_slice(&encode_field_element(pax));
    preimage.extend_from_slice(&encode_field_element(pay));
    Ok(hash(&preimage))
}

fn e_of(za: &[u8; 32], message: &[u8]) -> BigUint {
    let mut preimage = Vec::with_capacity(32 + message.len());
    preimage.extend_from_slice(za);
    preimage.extend_from_slice(message);
    BigUint::from_bytes_be(&hash(&preimage)) % n()
}

/// An SM2 signature `(r, s)`, each in `(0, N)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    pub r: BigUint,
    pub s: BigUint,
}

/// Sign with an explicit nonce `k`, skipping the retry loop and returning
/// the hash value `e` alongside the signature.
///
/// `sign` below is the real entry point and draws `k` itself; this variant
/// exists so the nonce-leak and nonce-reuse demonstrators in
/// [`crate::attacks`] can construct signatures against a `k` they already
/// know, without duplicating the signing algebra. Returns `None` in the
/// (probability-zero) case that this particular `k` would force a retry.
pub fn sign_with_nonce(
    sk: &SecretKey,
    message: &[u8],
    id: &[u8],
    k: &BigUint,
) -> Result<Option<(Signature, BigUint)>, Sm2Error> {
    let pa = g().scalar_mul(&sk.0);
    let za = derive_za(id, &pa)?;
    let e = e_of(&za, message);
    let n = n();

    let kg = g().scalar_mul(k);
    let (x1, _) = match kg.xy() {
        Some(xy) => xy,
        None => return Ok(None),
    };
    let r = (&e + x1) % n;
    if r.is_zero() || &r + k == *n {
        return Ok(None);
    }
    let one_plus_d_inv = mod_inv(&((&sk.0 + 1u8) % n), n);
    let k_minus_rd = crate::bigint::sub_mod(k, &((&r * &sk.0) % n), n);
    let s = (&one_plus_d_inv * &k_minus_rd) % n;
    if s.is_zero() {
        return Ok(None);
    }
    Ok(Some((Signature { r, s }, e)))
}

/// `Sign(dA, M)`. `id` is the signer's identity used to derive `ZA`.
pub fn sign(sk: &SecretKey, message: &[u8], id: &[u8]) -> Result<Signature, Sm2Error> {
    let n = n();
    for _ in 0..MAX_SIGN_RETRIES {
        let mut k = random_nonzero_below(&(n - 1u8))
            .map_err(|err| Sm2Error::EntropyFailure(err.to_string()))?;
        let outcome = sign_with_nonce(sk, message, id, &k)?;
        #[allow(unused_assignments)]
        {
            k = BigUint::zero();
        }
        if let Some((sig, _e)) = outcome {
            return Ok(sig);
        }
    }
    Err(Sm2Error::Internal(MAX_SIGN_RETRIES))
}

/// `Verify(PA, M, (r, s))`. Never errors: out-of-range or malformed
/// signatures simply verify as `false`.
pub fn verify(pa: &AffinePoint, message: &[u8], id: &[u8], sig: &Signature) -> bool {
    let n = n();
    if sig.r.is_zero() || &sig.r >= n || sig.s.is_zero() || &sig.s >= n {
        return false;
    }
    let za = match derive_za(id, pa) {
        Ok(za) => za,
        Err(_) => return false,
    };
    let e = e_of(&za, message);
    let t = (&sig.r + &sig.s) % n;
    if t.is_zero() {
        return false;
    }
    let sg = g().scalar_mul(&sig.s);
    let t_pa = pa.scalar_mul(&t);
    let point = sg.add(&t_pa);
    let (x1, _) = match point.xy() {
        Some(xy) => xy,
        None => return false,
    };
    (&e + x1) % n == sig.r
}
