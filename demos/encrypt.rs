use hex_literal::hex;
use ope_rs::{Ope, OpeEncrypt};

fn main() {
    let key: [u8; 32] = hex!(
        "000102030405060708090a0b0c0d0e0f"
        "101112131415161718191a1b1c1d1e1f"
    );

    let ope = Ope::init(&key).unwrap();

    let n = 10000i64;
    let ct = n.encrypt(&ope).unwrap();
    println!("E({}) = {}", n, ct);

    let ct_str = "ant".encrypt(&ope).unwrap();
    println!("E(\"ant\") = {}", hex::encode(&ct_str));
}
