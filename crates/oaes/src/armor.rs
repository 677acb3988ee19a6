//! Base64 armor for keys and ciphertext messages.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::Result;

/// Encodes bytes as standard padded base64.
pub fn encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decodes base64 text, ignoring embedded ASCII whitespace so line-wrapped
/// armor is accepted as-is.
pub fn decode(text: &str) -> Result<Vec<u8>> {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(STANDARD.decode(cleaned.as_bytes())?)
}
