//! Password-checkup façade (C9).
//!
//! Maps each password to an identifier via `PBKDF2-HMAC-SHA256(password,
//! salt, 100_000, 32)`, hex-encoded, then runs that identifier set through
//! [`crate::pis`] against a breach list where every entry carries value `1`
//! — the sum the client decrypts is the count of its passwords that appear
//! on the list. The salt is a field on [`Checkup`] rather than a process
//! global, so multiple checkups (e.g. in tests) cannot cross-talk.

use pbkdf2::pbkdf2_hmac_array;
use sha2::Sha256;

use crate::error::PisError;
use crate::pis::{Client, Server};

/// PBKDF2 round count.
pub const PBKDF2_ROUNDS: u32 = 100_000;
/// Derived identifier length in bytes.
pub const IDENTIFIER_BYTES: usize = 32;

/// A password-checkup instance, carrying the salt both parties must share
/// out of band.
pub struct Checkup {
    salt: Vec<u8>,
}

impl Checkup {
    /// Build a checkup instance around a shared salt.
    pub fn new(salt: impl Into<Vec<u8>>) -> Self {
        Checkup { salt: salt.into() }
    }

    /// Derive the hex-encoded identifier for one password.
    pub fn identifier(&self, password: &str) -> String {
        let key = pbkdf2_hmac_array::<Sha256, IDENTIFIER_BYTES>(
            password.as_bytes(),
            &self.salt,
            PBKDF2_ROUNDS,
        );
        hex::encode(key)
    }

    /// Run the full three-round PIS protocol between a client's password
    /// list and a server's breached-identifier list, returning the count of
    /// the client's passwords that appear on the list.
    pub fn check(&self, passwords: &[&str], breached: &[&str]) -> Result<u64, PisError> {
        let client = Client::new()?;
        let server_pairs: Vec<(Vec<u8>, u64)> = breached
            .iter()
            .map(|entry| (self.identifier(entry).into_bytes(), 1u64))
            .collect();
        let server = Server::new(client.paillier_public_key().clone());

        let client_items: Vec<Vec<u8>> =
            passwords.iter().map(|p| self.identifier(p).into_bytes()).collect();

        let msg1 = client.round1(&client_items)?;
        let msg2 = server.round2(&msg1, &server_pairs)?;
        let ciphertext = client.round3(&msg2)?;
        let count = client.finalize(&ciphertext)?;

        use num_traits::ToPrimitive;
        Ok(count.to_u64().expect("leak count fits in u64 for any realistic password list"))
    }
}
