//! Integration tests for the SM2 core: sign/verify, compression, and
//! windowed multiplication.

use num_bigint::BigUint;

use sm2pis::bigint::random_nonzero_below;
use sm2pis::curve::{g, n};
use sm2pis::encoding::{compress, decompress};
use sm2pis::sm2::{self, sign_with_nonce};
use sm2pis::windowed;

#[test]
fn sign_verify_round_trip_with_bit_flip_rejection() {
    let (sk, pa) = sm2::keygen().unwrap();
    let id = b"ALICE123@YAHOO.COM";
    let msg = b"message digest";

    let sig = sm2::sign(&sk, msg, id).unwrap();
    assert!(sm2::verify(&pa, msg, id, &sig));

    let mut flipped = msg.to_vec();
    flipped[0] ^= 0x01;
    assert!(!sm2::verify(&pa, &flipped, id, &sig));

    let mut bad_sig = sig.clone();
    bad_sig.r = (&bad_sig.r + 1u8) % n();
    assert!(!sm2::verify(&pa, msg, id, &bad_sig));
}

#[test]
fn compression_round_trip_has_correct_prefix_parity() {
    let (_, pa) = sm2::keygen().unwrap();
    let encoded = compress(&pa).unwrap();
    assert!(encoded[0] == 0x02 || encoded[0] == 0x03);

    let (_, y) = pa.xy().unwrap();
    assert_eq!(encoded[0] == 0x03, y.bit(0));

    let decoded = decompress(&encoded).unwrap();
    assert_eq!(decoded, pa);
}

#[test]
fn windowed_multiplication_matches_naive_for_a_fixed_scalar() {
    let k = BigUint::parse_bytes(b"1234567890ABCDEF", 16).unwrap();
    let naive = g().scalar_mul(&k);
    for window_bits in [1u32, 2, 4, 8] {
        assert_eq!(windowed::scalar_mul(&g(), &k, window_bits), naive);
    }
}

#[test]
fn leaked_and_reused_nonce_attacks_recover_the_signing_key() {
    use sm2pis::attacks::{recover_from_leaked_nonce, recover_from_reused_nonce};

    let (sk, _pa) = sm2::keygen().unwrap();
    let id = b"ALICE123@YAHOO.COM";
    let k = random_nonzero_below(&(n() - 1u8)).unwrap();

    let (sig, _e) = sign_with_nonce(&sk, b"leak me", id, &k).unwrap().unwrap();
    assert_eq!(&recover_from_leaked_nonce(&sig, &k), sk.scalar());

    let (sig1, _e1) = sign_with_nonce(&sk, b"first", id, &k).unwrap().unwrap();
    let (sig2, _e2) = sign_with_nonce(&sk, b"second", id, &k).unwrap().unwrap();
    assert_eq!(&recover_from_reused_nonce(&sig1, &sig2), sk.scalar());
}
