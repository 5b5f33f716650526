//! SM2 demo driver: keygen/sign/verify, compression, windowed multiplication,
//! and the attack demonstrators, all exercised against one keypair.
//!
//! Boxed terminal output lives here deliberately: it's a demo driver calling
//! the library API, not part of the library itself.

use anyhow::Result;
use num_bigint::BigUint;
use tracing::info;

use sm2pis::attacks;
use sm2pis::bigint::random_nonzero_below;
use sm2pis::curve::{g, n};
use sm2pis::encoding::{compress, decompress};
use sm2pis::sm2::{self, sign_with_nonce};
use sm2pis::windowed;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("SM2 demo: keygen → sign → verify → compress round trip");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let (sk, pa) = sm2::keygen()?;
    let id = b"ALICE123@YAHOO.COM";
    let msg = b"message digest";
    info!("keypair generated");

    let sig = sm2::sign(&sk, msg, id)?;
    let ok = sm2::verify(&pa, msg, id, &sig);
    println!("sign/verify round trip: {}", if ok { "PASS" } else { "FAIL" });
    assert!(ok);

    let tampered = sm2::verify(&pa, b"message digest!", id, &sig);
    println!("tampered message rejected: {}", if !tampered { "PASS" } else { "FAIL" });
    assert!(!tampered);

    let encoded = compress(&pa)?;
    let decoded = decompress(&encoded)?;
    println!("compress/decompress round trip: {}", if decoded == pa { "PASS" } else { "FAIL" });
    println!("compressed PA: {}", hex::encode(encoded));
    assert_eq!(decoded, pa);

    let naive = g().scalar_mul(sk.scalar());
    let via_window = windowed::scalar_mul(&g(), sk.scalar(), 4);
    println!(
        "windowed vs. naive scalar_mul agree: {}",
        if naive == via_window { "PASS" } else { "FAIL" }
    );
    assert_eq!(naive, via_window);

    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Attack demonstrators (reproducible algebra, not implementation bugs)");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let k = random_nonzero_below(&(n() - 1u8))?;
    let (leaked_sig, _e) = sign_with_nonce(&sk, msg, id, &k)?.expect("k avoided the retry case");
    let recovered = attacks::recover_from_leaked_nonce(&leaked_sig, &k);
    println!(
        "nonce-leak recovery: original dA == recovered dA: {}",
        if &recovered == sk.scalar() { "PASS" } else { "FAIL" }
    );
    assert_eq!(&recovered, sk.scalar());

    let reused_k = random_nonzero_below(&(n() - 1u8))?;
    let (sig1, _e1) = sign_with_nonce(&sk, b"first message", id, &reused_k)?.unwrap();
    let (sig2, _e2) = sign_with_nonce(&sk, b"second message", id, &reused_k)?.unwrap();
    let recovered = attacks::recover_from_reused_nonce(&sig1, &sig2);
    println!(
        "nonce-reuse recovery:  original dA == recovered dA: {}",
        if &recovered == sk.scalar() { "PASS" } else { "FAIL" }
    );
    assert_eq!(&recovered, sk.scalar());

    let priv_key = random_nonzero_below(&(n() - 1u8))?;
    let ecdsa_k = random_nonzero_below(&(n() - 1u8))?;
    let sig1 = attacks::ecdsa_sign_for_demo(&priv_key, b"tx one", &ecdsa_k);
    let sig2 = attacks::ecdsa_sign_for_demo(&priv_key, b"tx two", &ecdsa_k);
    let e1 = BigUint::from_bytes_be(&sm2::hash(b"tx one")) % n();
    let e2 = BigUint::from_bytes_be(&sm2::hash(b"tx two")) % n();
    let recovered = attacks::recover_from_ecdsa_nonce_reuse(&sig1, &e1, &sig2, &e2);
    println!(
        "ECDSA \"Satoshi forgery\" recovery: original d == recovered d: {}",
        if recovered == priv_key { "PASS" } else { "FAIL" }
    );
    assert_eq!(recovered, priv_key);

    println!();
    println!("all demonstrations passed");
    Ok(())
}
