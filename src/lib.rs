//! Crate root: public surface and cross-module invariants.
//!
//! This crate implements two independent cryptographic cores that share only
//! the arbitrary-precision arithmetic layer ([`bigint`]):
//!
//! - **SM2** ([`sm2`], built on [`curve`], [`encoding`], [`windowed`]): the
//!   GB/T 32918 elliptic-curve signature scheme, plus algebraic attack
//!   demonstrators ([`attacks`]) for nonce leakage and nonce reuse.
//! - **Private Intersection-Sum** ([`pis`], built on [`ddh`], [`paillier`]):
//!   a three-round two-party protocol for computing a sum over set
//!   intersection without revealing either party's set, and its
//!   password-checkup application ([`checkup`]).
//!
//! ## Invariants
//!
//! - **No silent truncation of secrets.** Private scalars
//!   ([`sm2::SecretKey`], [`pis::Client`]'s Paillier private key and blinding
//!   exponent) are zeroed on drop; comparisons and equality checks operate
//!   on the canonical non-negative residues [`bigint`] produces, never on
//!   raw two's-complement representations.
//! - **Verification never errors.** [`sm2::verify`] returns `bool`: a
//!   malformed or out-of-range signature is a `false`, not an error variant.
//!   Every other fallible operation returns a typed [`error`] enum.
//! - **Sessions are value objects.** [`pis::Client`] and [`pis::Server`]
//!   hold no shared mutable state and execute sequentially; running many
//!   independent sessions concurrently is safe without synchronization.
#![forbid(unsafe_code)]

/// Arbitrary-precision modular arithmetic shared by both cores (C1).
pub mod bigint;
/// SM2 curve constants and affine point arithmetic (C2).
pub mod curve;
/// Compressed-point encoding (C4).
pub mod encoding;
/// Windowed scalar multiplication (C5).
pub mod windowed;
/// SM2 keygen, sign, verify (C3).
pub mod sm2;
/// Attack demonstrators: nonce leak, nonce reuse, ECDSA forgery (C10).
pub mod attacks;

/// Paillier additively homomorphic cryptosystem (C6).
pub mod paillier;
/// DDH group and hash-to-group mapping (C7).
pub mod ddh;
/// Private Intersection-Sum protocol state machine (C8).
pub mod pis;
/// Password-checkup façade built on PIS (C9).
pub mod checkup;

/// Shared error kinds for both cores.
pub mod error;
