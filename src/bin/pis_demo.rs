//! PIS demo driver: a raw three-round session, then the password-checkup
//! façade over an example client/server scenario.

use anyhow::Result;
use tracing::info;

use sm2pis::checkup::Checkup;
use sm2pis::pis::{Client, Server};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Private Intersection-Sum demo: raw protocol");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let client = Client::new()?;
    info!("client drew k1 and a fresh Paillier keypair");
    let server = Server::new(client.paillier_public_key().clone());

    let client_set: Vec<Vec<u8>> = ["a", "b", "c"].iter().map(|s| s.as_bytes().to_vec()).collect();
    let server_pairs: Vec<(Vec<u8>, u64)> =
        vec![(b"b".to_vec(), 7), (b"c".to_vec(), 5), (b"d".to_vec(), 9)];

    let msg1 = client.round1(&client_set)?;
    let msg2 = server.round2(&msg1, &server_pairs)?;
    let ciphertext = client.round3(&msg2)?;
    let sum = client.finalize(&ciphertext)?;

    println!("client = {{a, b, c}}, server = {{(b,7), (c,5), (d,9)}}");
    println!("intersection-sum = {sum} (expected 12)");
    assert_eq!(sum, 12u32.into());

    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Password-checkup façade: how many of my passwords are breached?");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let checkup = Checkup::new(b"demo-shared-salt".to_vec());
    let my_passwords = ["correct horse battery staple", "hunter2", "qwerty123"];
    let breached_list = ["hunter2", "qwerty123", "letmein", "password1"];
    let leaked = checkup.check(&my_passwords, &breached_list)?;
    println!("{} of {} passwords appear on the breach list", leaked, my_passwords.len());

    println!();
    println!("all demonstrations passed");
    Ok(())
}
