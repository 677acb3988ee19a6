//! Error type shared across the envelope layer.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures reported by the envelope cipher.
#[derive(Debug, Error)]
pub enum Error {
    /// An operation that needs key material ran on a keyless context.
    #[error("no key has been loaded into the cipher context")]
    NoKey,

    /// Raw key data was not one of the three supported lengths.
    #[error("key data must be 16, 24, or 32 bytes, got {0}")]
    InvalidKeyLength(usize),

    /// Ciphertext input is not a whole number of blocks.
    #[error("input must be a whole number of 16-byte blocks, got {0} bytes")]
    UnalignedInput(usize),

    /// Input is shorter than its mandatory prologue.
    #[error("input too short: need at least {expected} bytes, got {actual}")]
    TruncatedInput {
        /// Minimum byte count the format requires here.
        expected: usize,
        /// Bytes actually supplied.
        actual: usize,
    },

    /// The header magic bytes are wrong.
    #[error("bad magic bytes in header")]
    BadMagic,

    /// The header names a format version this build does not speak.
    #[error("unsupported format version {0:#04x}")]
    UnsupportedVersion(u8),

    /// The header's segment type does not match the operation.
    #[error("unexpected segment type {0:#04x}")]
    UnexpectedSegment(u8),

    /// The header's mode bits name no known chaining mode.
    #[error("invalid mode bits {0:#04x} in header")]
    InvalidMode(u8),

    /// The header carries flag bits this build does not know.
    #[error("invalid flag bits {0:#04x} in header")]
    InvalidFlags(u8),

    /// The trailing pad sequence failed verification.
    #[error("invalid trailing padding")]
    InvalidPadding,

    /// Base64 armor could not be decoded.
    #[error("invalid base64 armor")]
    Armor(#[from] base64::DecodeError),
}
