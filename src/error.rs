//! Shared error kinds.
//!
//! Verification itself is never an error — [`crate::sm2::verify`] returns
//! `bool` so callers can distinguish "bad math" from "valid-no". Everything
//! else that can fail surfaces one of these.

/// Errors raised by the SM2 engine (C2–C5, C10).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Sm2Error {
    /// A scalar fell outside `[1, N-1]` where the operation requires it.
    #[error("scalar out of range [1, N-1]")]
    InvalidScalar,
    /// A decoded point is not on the curve, or arithmetic produced an
    /// impossible state (e.g. an inversion of a non-invertible residue).
    #[error("point is not on the curve")]
    InvalidPoint,
    /// `r` or `s` fell outside `(0, N)`.
    #[error("signature components out of range")]
    SignatureMalformed,
    /// Exceeded the retry budget while searching for a valid `(k, r, s)`.
    #[error("exceeded nonce retry budget ({0} attempts)")]
    Internal(u32),
    /// The OS CSPRNG could not be read.
    #[error("entropy source unavailable: {0}")]
    EntropyFailure(String),
}

/// Errors raised by the Paillier engine (C6).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PaillierError {
    /// Plaintext was not in `[0, n)`.
    #[error("plaintext out of range for this public key")]
    PlaintextOutOfRange,
    /// Ciphertext was not in `[0, n^2)`, or was not invertible mod `n^2`.
    #[error("ciphertext malformed or not coprime with n^2")]
    CiphertextMalformed,
    /// Two ciphertexts/keys that must share a modulus did not.
    #[error("mismatched Paillier public keys")]
    KeyMismatch,
}

/// Errors raised by the PIS protocol state machine (C8, C9).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PisError {
    /// A round was invoked before `init`, or out of order, or twice.
    #[error("protocol round called out of order")]
    ProtocolState,
    /// Duplicate identifier in a party's input set, or a Paillier public key
    /// mismatch between client and server.
    #[error("invalid protocol input: {0}")]
    ProtocolInput(&'static str),
    /// The OS CSPRNG could not be read while drawing a blinding exponent.
    #[error("entropy source unavailable: {0}")]
    EntropyFailure(String),
    #[error(transparent)]
    Paillier(#[from] PaillierError),
}
