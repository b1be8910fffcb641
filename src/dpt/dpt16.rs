//! DPT 16.000 - Character String, ASCII (14 bytes)
//!
//! Fixed width: shorter text is padded with spaces on encode, and trailing
//! spaces and NULs are stripped on decode.

use crate::dpt::{fixed, DptText};
use crate::error::{KnxError, Result};

/// Encoded width of a DPT 16 string
pub const ASCII_LEN: usize = 14;

const PAD: u8 = b' ';

/// Encode up to 14 ASCII characters.
///
/// # Errors
///
/// - `Range` if `text` is longer than 14 characters
/// - `Encoding` if `text` contains a character outside ASCII
pub fn encode_ascii(text: &str) -> Result<[u8; ASCII_LEN]> {
    if !text.is_ascii() {
        return Err(KnxError::non_ascii());
    }
    if text.len() > ASCII_LEN {
        return Err(KnxError::out_of_range("ascii_length"));
    }
    let mut out = [PAD; ASCII_LEN];
    out[..text.len()].copy_from_slice(text.as_bytes());
    Ok(out)
}

/// Decode exactly 14 octets.
pub fn decode_ascii(data: &[u8]) -> Result<DptText> {
    let raw = fixed::<ASCII_LEN>(data)?;
    if !raw.is_ascii() {
        return Err(KnxError::non_ascii());
    }
    let end = raw
        .iter()
        .rposition(|&b| b != PAD && b != 0)
        .map_or(0, |i| i + 1);
    let mut out = DptText::new();
    for &b in &raw[..end] {
        out.push(char::from(b))
            .map_err(|_| KnxError::out_of_range("ascii_length"))?;
    }
    Ok(out)
}
