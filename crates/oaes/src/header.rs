//! The 16-byte segment header shared by key blobs and ciphertext messages.
//!
//! Layout:
//! - bytes 0..4: magic `"OAES"`
//! - byte 4: format version (0x01)
//! - byte 5: segment type (0x01 key blob, 0x02 ciphertext message)
//! - byte 6: mode bits (messages only)
//! - byte 7: raw key length in bytes (key blobs only)
//! - byte 8: flag bits (messages only)
//!
//! All other bytes are reserved and zero.

use oaes_core::BLOCK_SIZE;

use crate::error::{Error, Result};
use crate::mode::Mode;

pub(crate) const HEADER_LEN: usize = BLOCK_SIZE;
pub(crate) const MAGIC: [u8; 4] = *b"OAES";
pub(crate) const VERSION: u8 = 0x01;
pub(crate) const SEGMENT_KEY: u8 = 0x01;
pub(crate) const SEGMENT_DATA: u8 = 0x02;
pub(crate) const FLAG_PAD: u8 = 0x01;

/// Parsed form of a segment header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Header {
    /// Prologue of an exported key blob.
    Key {
        /// Raw key length in bytes (16, 24, or 32).
        key_len: usize,
    },
    /// Prologue of a ciphertext message.
    Data {
        /// Chaining mode the message was produced with.
        mode: Mode,
        /// Whether a trailing pad sequence is present.
        padded: bool,
    },
}

impl Header {
    pub(crate) fn encode(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[..4].copy_from_slice(&MAGIC);
        bytes[4] = VERSION;
        match self {
            Self::Key { key_len } => {
                bytes[5] = SEGMENT_KEY;
                bytes[7] = *key_len as u8;
            }
            Self::Data { mode, padded } => {
                bytes[5] = SEGMENT_DATA;
                bytes[6] = mode.bits();
                if *padded {
                    bytes[8] = FLAG_PAD;
                }
            }
        }
        bytes
    }

    /// Parses and validates the header at the front of `bytes`.
    pub(crate) fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(Error::TruncatedInput {
                expected: HEADER_LEN,
                actual: bytes.len(),
            });
        }
        if bytes[..4] != MAGIC {
            return Err(Error::BadMagic);
        }
        if bytes[4] != VERSION {
            return Err(Error::UnsupportedVersion(bytes[4]));
        }
        match bytes[5] {
            SEGMENT_KEY => {
                let key_len = bytes[7] as usize;
                match key_len {
                    16 | 24 | 32 => Ok(Self::Key { key_len }),
                    _ => Err(Error::InvalidKeyLength(key_len)),
                }
            }
            SEGMENT_DATA => {
                let mode = Mode::from_bits(bytes[6])?;
                let flags = bytes[8];
                if flags & !FLAG_PAD != 0 {
                    return Err(Error::InvalidFlags(flags));
                }
                Ok(Self::Data {
                    mode,
                    padded: flags & FLAG_PAD != 0,
                })
            }
            other => Err(Error::UnexpectedSegment(other)),
        }
    }
}
