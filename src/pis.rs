//! Private Intersection-Sum protocol state machine (C8).
//!
//! Three rounds, two value-typed sessions: the client draws its own exponent
//! and Paillier keypair in [`Client::new`], blinds its set in
//! [`Client::round1`], and after the server's [`Server::round2`] reply,
//! intersects and homomorphically sums in [`Client::round3`]. Only the
//! client ever holds the Paillier private key, so [`Client::finalize`]
//! decrypts, not the server.

use num_bigint::BigUint;
use num_traits::Zero;
use rand::{rngs::OsRng, seq::SliceRandom};

use crate::bigint::random_nonzero_below;
use crate::ddh::{exponentiate, hash_to_group, q};
use crate::error::PisError;
use crate::paillier::{self, PrivateKey, PublicKey};

/// The server's round-2 reply: the double-blinded client set `Z` and the
/// paired `(blinded identifier, encrypted value)` set `B`.
pub struct ServerMessage {
    pub z: Vec<BigUint>,
    pub pairs: Vec<(BigUint, BigUint)>,
}

/// The client side of a PIS session: holds the blinding exponent `k1` and
/// the Paillier keypair it alone owns.
pub struct Client {
    k1: BigUint,
    private_key: PrivateKey,
    public_key: PublicKey,
}

impl Drop for Client {
    fn drop(&mut self) {
        self.k1 = BigUint::zero();
    }
}

impl Client {
    /// Draw `k1 ∈ [1, q)` and a fresh Paillier keypair.
    pub fn new() -> Result<Self, PisError> {
        let k1 = random_nonzero_below(q())
            .map_err(|e| PisError::EntropyFailure(e.to_string()))?;
        let (private_key, public_key) = paillier::keygen()?;
        Ok(Client { k1, private_key, public_key })
    }

    /// The Paillier public key the server must encrypt under.
    pub fn paillier_public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// `round1(V) = shuffle({ H(v)^k1 : v ∈ V })`. Rejects a set with
    /// duplicate identifiers, which would silently skew the intersection
    /// count (see [`Server::round2`] for the same check on the server's
    /// set).
    pub fn round1(&self, items: &[Vec<u8>]) -> Result<Vec<BigUint>, PisError> {
        let mut seen = std::collections::HashSet::with_capacity(items.len());
        for item in items {
            if !seen.insert(item.as_slice()) {
                return Err(PisError::ProtocolInput("duplicate identifier in client set"));
            }
        }
        let mut blinded: Vec<BigUint> =
            items.iter().map(|v| exponentiate(&hash_to_group(v), &self.k1)).collect();
        blinded.shuffle(&mut OsRng);
        Ok(blinded)
    }

    /// `round3(Z, B)`: re-blind each `b` with `k1`, intersect against `Z` by
    /// equality, and homomorphically sum the matching ciphertexts. An empty
    /// intersection returns `Enc_pk(0)` rather than failing.
    pub fn round3(&self, msg2: &ServerMessage) -> Result<BigUint, PisError> {
        let mut sum: Option<BigUint> = None;
        for (b, c) in &msg2.pairs {
            let b_prime = exponentiate(b, &self.k1);
            if msg2.z.contains(&b_prime) {
                sum = Some(match sum {
                    None => c.clone(),
                    Some(acc) => self.public_key.add(&acc, c)?,
                });
            }
        }
        match sum {
            Some(ciphertext) => Ok(self.public_key.rerandomize(&ciphertext)?),
            None => Ok(self.public_key.encrypt(&BigUint::zero())?),
        }
    }

    /// Decrypt the ciphertext `round3` produced. Only the client can do
    /// this: it is the sole holder of the Paillier private key.
    pub fn finalize(&self, ciphertext: &BigUint) -> Result<BigUint, PisError> {
        Ok(self.private_key.decrypt(ciphertext)?)
    }
}

/// The server side of a PIS session: holds the client's Paillier public key
/// so its round-2 reply can be decrypted only by the client.
pub struct Server {
    client_public_key: PublicKey,
}

impl Server {
    /// `Server.new(pk_paillier)`: the server never generates or sees a
    /// Paillier private key.
    pub fn new(client_public_key: PublicKey) -> Self {
        Server { client_public_key }
    }

    /// `round2(A, W, f)`: draw `k2`, compute `Z = shuffle({a^k2 : a ∈ A})`
    /// and `B = shuffle({(H(w)^k2, Enc_pk(f(w))) : w ∈ W})`. Rejects a
    /// `pairs` set with duplicate identifiers, which would double-count
    /// that element's value in the intersection sum.
    pub fn round2(
        &self,
        msg1: &[BigUint],
        pairs: &[(Vec<u8>, u64)],
    ) -> Result<ServerMessage, PisError> {
        let mut seen = std::collections::HashSet::with_capacity(pairs.len());
        for (w, _) in pairs {
            if !seen.insert(w.as_slice()) {
                return Err(PisError::ProtocolInput("duplicate identifier in server set"));
            }
        }

        let mut k2 = random_nonzero_below(q())
            .map_err(|e| PisError::EntropyFailure(e.to_string()))?;

        let mut z: Vec<BigUint> = msg1.iter().map(|a| exponentiate(a, &k2)).collect();
        z.shuffle(&mut OsRng);

        let mut b = Vec::with_capacity(pairs.len());
        for (w, value) in pairs {
            let blinded = exponentiate(&hash_to_group(w), &k2);
            let encrypted = self.client_public_key.encrypt(&BigUint::from(*value))?;
            b.push((blinded, encrypted));
        }
        b.shuffle(&mut OsRng);

        #[allow(unused_assignments)]
        {
            k2 = BigUint::zero();
        }

        Ok(ServerMessage { z, pairs: b })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes_vec(items: &[&str]) -> Vec<Vec<u8>> {
        items.iter().map(|s| s.as_bytes().to_vec()).collect()
    }

    #[test]
    fn intersection_sum_matches_expected() {
        let client = Client::new().unwrap();
        let server = Server::new(client.paillier_public_key().clone());

        let client_set = bytes_vec(&["a", "b", "c"]);
        let server_pairs: Vec<(Vec<u8>, u64)> =
            vec![(b"b".to_vec(), 7), (b"c".to_vec(), 5), (b"d".to_vec(), 9)];

        let msg1 = client.round1(&client_set).unwrap();
        let msg2 = server.round2(&msg1, &server_pairs).unwrap();
        let ciphertext = client.round3(&msg2).unwrap();
        let sum = client.finalize(&ciphertext).unwrap();

        assert_eq!(sum, BigUint::from(12u32));
    }

    #[test]
    fn empty_intersection_sums_to_zero() {
        let client = Client::new().unwrap();
        let server = Server::new(client.paillier_public_key().clone());

        let client_set = bytes_vec(&["a", "b"]);
        let server_pairs: Vec<(Vec<u8>, u64)> = vec![(b"x".to_vec(), 3), (b"y".to_vec(), 4)];

        let msg1 = client.round1(&client_set).unwrap();
        let msg2 = server.round2(&msg1, &server_pairs).unwrap();
        let ciphertext = client.round3(&msg2).unwrap();
        let sum = client.finalize(&ciphertext).unwrap();

        assert!(sum.is_zero());
    }

    #[test]
    fn full_subset_sums_every_value() {
        let client = Client::new().unwrap();
        let server = Server::new(client.paillier_public_key().clone());

        let client_set = bytes_vec(&["a", "b"]);
        let server_pairs: Vec<(Vec<u8>, u64)> =
            vec![(b"a".to_vec(), 2), (b"b".to_vec(), 3), (b"c".to_vec(), 100)];

        let msg1 = client.round1(&client_set).unwrap();
        let msg2 = server.round2(&msg1, &server_pairs).unwrap();
        let ciphertext = client.round3(&msg2).unwrap();
        let sum = client.finalize(&ciphertext).unwrap();

        assert_eq!(sum, BigUint::from(5u32));
    }

    #[test]
    fn permuting_either_input_leaves_the_sum_unchanged() {
        let client = Client::new().unwrap();
        let server = Server::new(client.paillier_public_key().clone());

        let client_set = bytes_vec(&["c", "a", "b"]);
        let server_pairs: Vec<(Vec<u8>, u64)> =
            vec![(b"d".to_vec(), 9), (b"c".to_vec(), 5), (b"b".to_vec(), 7)];

        let msg1 = client.round1(&client_set).unwrap();
        let msg2 = server.round2(&msg1, &server_pairs).unwrap();
        let ciphertext = client.round3(&msg2).unwrap();
        let sum = client.finalize(&ciphertext).unwrap();

        assert_eq!(sum, BigUint::from(12u32));
    }

    #[test]
    fn round1_rejects_duplicate_identifiers() {
        let client = Client::new().unwrap();
        let dup = bytes_vec(&["a", "a"]);
        assert!(client.round1(&dup).is_err());
    }

    #[test]
    fn round2_rejects_duplicate_identifiers() {
        let client = Client::new().unwrap();
        let server = Server::new(client.paillier_public_key().clone());

        let client_set = bytes_vec(&["a", "b"]);
        let dup_pairs: Vec<(Vec<u8>, u64)> = vec![(b"b".to_vec(), 7), (b"b".to_vec(), 3)];

        let msg1 = client.round1(&client_set).unwrap();
        assert!(server.round2(&msg1, &dup_pairs).is_err());
    }
}
