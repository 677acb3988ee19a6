//! Demonstrates key generation, envelope encryption, and decryption.

use oaes::{Cipher, KeySize};
use rand::SeedableRng;
use rand_isaac::IsaacRng;

fn main() -> oaes::Result<()> {
    // Deterministic seed for reproducibility in the example.
    let mut cipher = Cipher::with_rng(IsaacRng::from_seed([7u8; 32]));
    cipher.generate_key(KeySize::Bits256);

    let plaintext = b"the quick brown fox jumps over the lazy dog";
    let message = cipher.encrypt(plaintext)?;
    let recovered = cipher.decrypt(&message)?;
    assert_eq!(recovered, plaintext);

    println!("key:     {}", hex::encode(cipher.export_key_data()?));
    println!("message: {}", oaes::armor::encode(&message));
    println!("example succeeded; decrypted text matches input");
    Ok(())
}
