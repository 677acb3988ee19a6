//! Key schedule and single-block encryption/decryption.

use core::convert::TryInto;

use crate::block::Block;
use crate::key::{AesKey, RoundKeys};
use crate::round::{
    add_round_key, inv_mix_columns, inv_shift_rows, inv_sub_bytes, mix_columns, shift_rows,
    sub_bytes,
};
use crate::sbox::sbox;

const RCON: [u8; 10] = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1b, 0x36];

fn rot_word(word: u32) -> u32 {
    word.rotate_left(8)
}

fn sub_word(word: u32) -> u32 {
    let b0 = sbox((word >> 24) as u8) as u32;
    let b1 = sbox((word >> 16) as u8) as u32;
    let b2 = sbox((word >> 8) as u8) as u32;
    let b3 = sbox(word as u8) as u32;
    (b0 << 24) | (b1 << 16) | (b2 << 8) | b3
}

/// Expands a key into its round keys (11, 13, or 15 depending on key size).
pub fn expand_key(key: &AesKey) -> RoundKeys {
    let key_bytes = key.bytes();
    let nk = key_bytes.len() / 4;
    let rounds = key.rounds();
    let total_words = 4 * (rounds + 1);

    let mut w = [0u32; 60];
    for (i, chunk) in key_bytes.chunks_exact(4).enumerate() {
        let bytes: [u8; 4] = chunk.try_into().expect("chunk length is four");
        w[i] = u32::from_be_bytes(bytes);
    }

    for i in nk..total_words {
        let mut temp = w[i - 1];
        if i % nk == 0 {
            temp = sub_word(rot_word(temp)) ^ (u32::from(RCON[i / nk - 1]) << 24);
        } else if nk > 6 && i % nk == 4 {
            temp = sub_word(temp);
        }
        w[i] = w[i - nk] ^ temp;
    }

    let mut round_keys = [[0u8; 16]; 15];
    for round in 0..=rounds {
        for word_idx in 0..4 {
            let bytes = w[round * 4 + word_idx].to_be_bytes();
            round_keys[round][word_idx * 4..word_idx * 4 + 4].copy_from_slice(&bytes);
        }
    }

    RoundKeys::new(round_keys, rounds + 1)
}

/// Encrypts a single 16-byte block with pre-expanded round keys.
pub fn encrypt_block(block: &Block, round_keys: &RoundKeys) -> Block {
    let rounds = round_keys.rounds();
    let mut state = *block;

    add_round_key(&mut state, round_keys.get(0));

    for round in 1..rounds {
        sub_bytes(&mut state);
        shift_rows(&mut state);
        mix_columns(&mut state);
        add_round_key(&mut state, round_keys.get(round));
    }

    sub_bytes(&mut state);
    shift_rows(&mut state);
    add_round_key(&mut state, round_keys.get(rounds));

    state
}

/// Decrypts a single 16-byte block with pre-expanded round keys.
pub fn decrypt_block(block: &Block, round_keys: &RoundKeys) -> Block {
    let rounds = round_keys.rounds();
    let mut state = *block;

    add_round_key(&mut state, round_keys.get(rounds));
    for round in (1..rounds).rev() {
        inv_shift_rows(&mut state);
        inv_sub_bytes(&mut state);
        add_round_key(&mut state, round_keys.get(round));
        inv_mix_columns(&mut state);
    }
    inv_shift_rows(&mut state);
    inv_sub_bytes(&mut state);
    add_round_key(&mut state, round_keys.get(0));

    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    // FIPS-197 Appendix C example vectors; all three share the plaintext.
    const NIST_PLAIN: [u8; 16] = [
        0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee,
        0xff,
    ];

    fn nist_key_bytes(len: usize) -> Vec<u8> {
        (0..len as u8).collect()
    }

    const NIST_CIPHER_128: [u8; 16] = [
        0x69, 0xc4, 0xe0, 0xd8, 0x6a, 0x7b, 0x04, 0x30, 0xd8, 0xcd, 0xb7, 0x80, 0x70, 0xb4, 0xc5,
        0x5a,
    ];
    const NIST_CIPHER_192: [u8; 16] = [
        0xdd, 0xa9, 0x7c, 0xa4, 0x86, 0x4c, 0xdf, 0xe0, 0x6e, 0xaf, 0x70, 0xa0, 0xec, 0x0d, 0x71,
        0x91,
    ];
    const NIST_CIPHER_256: [u8; 16] = [
        0x8e, 0xa2, 0xb7, 0xca, 0x51, 0x67, 0x45, 0xbf, 0xea, 0xfc, 0x49, 0x90, 0x4b, 0x49, 0x60,
        0x89,
    ];

    #[test]
    fn encrypt_matches_nist_vectors() {
        for (len, expected) in [
            (16usize, NIST_CIPHER_128),
            (24, NIST_CIPHER_192),
            (32, NIST_CIPHER_256),
        ] {
            let key = AesKey::from_slice(&nist_key_bytes(len)).expect("valid key length");
            let round_keys = expand_key(&key);
            let ct = encrypt_block(&NIST_PLAIN, &round_keys);
            assert_eq!(ct, expected, "key length {len}");
        }
    }

    #[test]
    fn decrypt_matches_nist_vectors() {
        for (len, cipher) in [
            (16usize, NIST_CIPHER_128),
            (24, NIST_CIPHER_192),
            (32, NIST_CIPHER_256),
        ] {
            let key = AesKey::from_slice(&nist_key_bytes(len)).expect("valid key length");
            let round_keys = expand_key(&key);
            let pt = decrypt_block(&cipher, &round_keys);
            assert_eq!(pt, NIST_PLAIN, "key length {len}");
        }
    }

    #[test]
    fn round_counts_by_key_size() {
        for (len, rounds) in [(16usize, 10usize), (24, 12), (32, 14)] {
            let key = AesKey::from_slice(&nist_key_bytes(len)).unwrap();
            assert_eq!(key.rounds(), rounds);
            assert_eq!(expand_key(&key).rounds(), rounds);
        }
    }

    #[test]
    fn encrypt_decrypt_round_trip_random() {
        let mut rng = rand::thread_rng();
        for len in [16usize, 24, 32] {
            for _ in 0..50 {
                let mut key_bytes = vec![0u8; len];
                let mut block = [0u8; 16];
                rng.fill_bytes(&mut key_bytes);
                rng.fill_bytes(&mut block);
                let key = AesKey::from_slice(&key_bytes).unwrap();
                let rks = expand_key(&key);
                let ct = encrypt_block(&block, &rks);
                let pt = decrypt_block(&ct, &rks);
                assert_eq!(pt, block);
            }
        }
    }

    #[test]
    fn from_slice_rejects_other_lengths() {
        for len in [0usize, 1, 15, 17, 23, 25, 31, 33, 48] {
            assert!(AesKey::from_slice(&vec![0u8; len]).is_none());
        }
    }
}
