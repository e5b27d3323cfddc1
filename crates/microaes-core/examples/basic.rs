//! Demonstrates encrypting and decrypting a short buffer in CBC mode.

use microaes_core::{cbc_decrypt, cbc_encrypt, Variant};

fn main() {
    let key = *b"sixteen byte key";
    let iv = *b"unique 16B nonce";

    let mut data = [0u8; 32];
    data[..16].copy_from_slice(b"first block here");
    data[16..].copy_from_slice(b"second block in.");
    let original = data;

    cbc_encrypt(&mut data, &key, &iv, Variant::Aes128).expect("aligned demo buffer");
    assert_ne!(data, original);

    cbc_decrypt(&mut data, &key, &iv, Variant::Aes128).expect("aligned demo buffer");
    assert_eq!(data, original);

    println!("example succeeded; CBC round trip matches the original buffer");
}
