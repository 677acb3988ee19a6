//! The envelope cipher context: key material, mode, IV, and RNG.

use oaes_core::{
    decrypt_block, encrypt_block, expand_key, xor_in_place, AesKey, Block, RoundKeys, BLOCK_SIZE,
};
use rand::rngs::OsRng;
use rand::{RngCore, SeedableRng};
use rand_isaac::IsaacRng;

use crate::error::{Error, Result};
use crate::header::{Header, HEADER_LEN, SEGMENT_DATA, SEGMENT_KEY};
use crate::mode::Mode;

/// Supported key sizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeySize {
    /// 128-bit key.
    Bits128,
    /// 192-bit key.
    Bits192,
    /// 256-bit key.
    Bits256,
}

impl KeySize {
    /// Raw key length in bytes.
    pub fn byte_len(self) -> usize {
        match self {
            Self::Bits128 => 16,
            Self::Bits192 => 24,
            Self::Bits256 => 32,
        }
    }

    /// Maps a bit count (128/192/256) to a key size.
    pub fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            128 => Some(Self::Bits128),
            192 => Some(Self::Bits192),
            256 => Some(Self::Bits256),
            _ => None,
        }
    }
}

#[derive(Clone)]
struct KeyMaterial {
    key: AesKey,
    round_keys: RoundKeys,
}

/// A cipher context.
///
/// Holds optional key material with its expanded schedule, the chaining mode,
/// the current IV, and an ISAAC generator that supplies key and IV bytes.
/// A fresh context starts in CBC mode with a randomly generated IV and no key.
pub struct Cipher {
    key: Option<KeyMaterial>,
    mode: Mode,
    iv: Block,
    rng: IsaacRng,
}

impl Cipher {
    /// Creates a context whose generator is seeded from OS entropy.
    pub fn new() -> Self {
        let mut seed = [0u8; 32];
        OsRng.fill_bytes(&mut seed);
        Self::with_rng(IsaacRng::from_seed(seed))
    }

    /// Creates a context around a caller-seeded generator.
    ///
    /// Useful for reproducible key and IV generation; encryption itself is
    /// deterministic either way once the key and IV are fixed.
    pub fn with_rng(rng: IsaacRng) -> Self {
        let mut cipher = Self {
            key: None,
            mode: Mode::Cbc,
            iv: [0u8; BLOCK_SIZE],
            rng,
        };
        cipher.rng.fill_bytes(&mut cipher.iv);
        cipher
    }

    /// Returns the current chaining mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switches the chaining mode.
    ///
    /// Entering CBC draws a fresh random IV; entering ECB zeroes the IV field
    /// so the reserved prologue block is deterministic.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        match mode {
            Mode::Ecb => self.iv = [0u8; BLOCK_SIZE],
            Mode::Cbc => self.rng.fill_bytes(&mut self.iv),
        }
    }

    /// Sets an explicit IV and switches to CBC mode.
    pub fn set_iv(&mut self, iv: Block) {
        self.mode = Mode::Cbc;
        self.iv = iv;
    }

    /// Generates a fresh random key of the requested size.
    pub fn generate_key(&mut self, size: KeySize) {
        let key = match size {
            KeySize::Bits128 => {
                let mut bytes = [0u8; 16];
                self.rng.fill_bytes(&mut bytes);
                AesKey::from(bytes)
            }
            KeySize::Bits192 => {
                let mut bytes = [0u8; 24];
                self.rng.fill_bytes(&mut bytes);
                AesKey::from(bytes)
            }
            KeySize::Bits256 => {
                let mut bytes = [0u8; 32];
                self.rng.fill_bytes(&mut bytes);
                AesKey::from(bytes)
            }
        };
        self.install_key(key);
    }

    /// Loads raw key bytes (16, 24, or 32 of them).
    pub fn import_key_data(&mut self, data: &[u8]) -> Result<()> {
        let key = AesKey::from_slice(data).ok_or(Error::InvalidKeyLength(data.len()))?;
        self.install_key(key);
        Ok(())
    }

    /// Returns the raw key bytes.
    pub fn export_key_data(&self) -> Result<Vec<u8>> {
        let material = self.key.as_ref().ok_or(Error::NoKey)?;
        Ok(material.key.bytes().to_vec())
    }

    /// Loads a headered key blob produced by [`Cipher::export_key`].
    pub fn import_key(&mut self, blob: &[u8]) -> Result<()> {
        match Header::parse(blob)? {
            Header::Key { key_len } => {
                let expected = HEADER_LEN + key_len;
                if blob.len() != expected {
                    return Err(Error::TruncatedInput {
                        expected,
                        actual: blob.len(),
                    });
                }
                self.import_key_data(&blob[HEADER_LEN..])
            }
            Header::Data { .. } => Err(Error::UnexpectedSegment(SEGMENT_DATA)),
        }
    }

    /// Exports the key as a headered blob.
    pub fn export_key(&self) -> Result<Vec<u8>> {
        let material = self.key.as_ref().ok_or(Error::NoKey)?;
        let key_bytes = material.key.bytes();
        let mut blob = Vec::with_capacity(HEADER_LEN + key_bytes.len());
        blob.extend_from_slice(
            &Header::Key {
                key_len: key_bytes.len(),
            }
            .encode(),
        );
        blob.extend_from_slice(key_bytes);
        Ok(blob)
    }

    /// Total message length produced for a plaintext of `plaintext_len` bytes.
    ///
    /// Header and IV blocks plus the plaintext rounded up to a whole block.
    pub fn encrypted_len(plaintext_len: usize) -> usize {
        let remainder = plaintext_len % BLOCK_SIZE;
        let pad = if remainder == 0 { 0 } else { BLOCK_SIZE - remainder };
        2 * BLOCK_SIZE + plaintext_len + pad
    }

    /// Encrypts `plaintext` into a self-describing message.
    ///
    /// The output is header ‖ IV ‖ ciphertext blocks. A trailing partial
    /// block is filled with the pad sequence 1, 2, …, n and the header's pad
    /// flag is set; block-aligned input gets neither. In CBC mode the IV
    /// advances to the last ciphertext block, so consecutive messages chain.
    pub fn encrypt(&mut self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let round_keys = self.round_keys()?;
        let padded = plaintext.len() % BLOCK_SIZE != 0;

        let mut out = Vec::with_capacity(Self::encrypted_len(plaintext.len()));
        out.extend_from_slice(
            &Header::Data {
                mode: self.mode,
                padded,
            }
            .encode(),
        );
        out.extend_from_slice(&self.iv);

        let mut offset = 0;
        while offset < plaintext.len() {
            let take = (plaintext.len() - offset).min(BLOCK_SIZE);
            let mut block = [0u8; BLOCK_SIZE];
            block[..take].copy_from_slice(&plaintext[offset..offset + take]);
            for (pad_idx, slot) in block[take..].iter_mut().enumerate() {
                *slot = (pad_idx + 1) as u8;
            }

            if self.mode == Mode::Cbc {
                xor_in_place(&mut block, &self.iv);
            }
            let encrypted = encrypt_block(&block, &round_keys);
            if self.mode == Mode::Cbc {
                self.iv = encrypted;
            }
            out.extend_from_slice(&encrypted);
            offset += BLOCK_SIZE;
        }

        Ok(out)
    }

    /// Decrypts a message produced by [`Cipher::encrypt`].
    ///
    /// The chaining mode and IV recorded in the message drive decryption;
    /// the context's own mode and IV are not consulted and not modified.
    pub fn decrypt(&self, message: &[u8]) -> Result<Vec<u8>> {
        let round_keys = self.round_keys()?;

        if message.len() % BLOCK_SIZE != 0 {
            return Err(Error::UnalignedInput(message.len()));
        }
        if message.len() < 2 * BLOCK_SIZE {
            return Err(Error::TruncatedInput {
                expected: 2 * BLOCK_SIZE,
                actual: message.len(),
            });
        }

        let (mode, padded) = match Header::parse(message)? {
            Header::Data { mode, padded } => (mode, padded),
            Header::Key { .. } => return Err(Error::UnexpectedSegment(SEGMENT_KEY)),
        };

        let mut iv = [0u8; BLOCK_SIZE];
        iv.copy_from_slice(&message[BLOCK_SIZE..2 * BLOCK_SIZE]);

        let body = &message[2 * BLOCK_SIZE..];
        if padded && body.is_empty() {
            return Err(Error::InvalidPadding);
        }

        let mut plain = Vec::with_capacity(body.len());
        for chunk in body.chunks_exact(BLOCK_SIZE) {
            let mut block = [0u8; BLOCK_SIZE];
            block.copy_from_slice(chunk);
            let mut decrypted = decrypt_block(&block, &round_keys);
            if mode == Mode::Cbc {
                xor_in_place(&mut decrypted, &iv);
                iv = block;
            }
            plain.extend_from_slice(&decrypted);
        }

        if padded {
            let pad_len = *plain.last().ok_or(Error::InvalidPadding)? as usize;
            if pad_len == 0 || pad_len >= BLOCK_SIZE {
                return Err(Error::InvalidPadding);
            }
            let start = plain.len() - pad_len;
            for (pad_idx, byte) in plain[start..].iter().enumerate() {
                if *byte as usize != pad_idx + 1 {
                    return Err(Error::InvalidPadding);
                }
            }
            plain.truncate(start);
        }

        Ok(plain)
    }

    fn install_key(&mut self, key: AesKey) {
        let round_keys = expand_key(&key);
        self.key = Some(KeyMaterial { key, round_keys });
    }

    fn round_keys(&self) -> Result<RoundKeys> {
        self.key
            .as_ref()
            .map(|material| material.round_keys)
            .ok_or(Error::NoKey)
    }
}

impl Default for Cipher {
    fn default() -> Self {
        Self::new()
    }
}
