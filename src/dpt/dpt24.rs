//! DPT 24.001 - Character String, ISO 8859-1 (variable length)
//!
//! One octet per character; a Latin-1 code point maps directly onto the
//! Unicode scalar of the same value. Trailing spaces and NULs are stripped
//! on decode.

use crate::dpt::{DptText, EncodedValue};
use crate::error::{KnxError, Result};
use crate::protocol::constants::MAX_APDU_SIZE;

/// Encode `text` as Latin-1.
///
/// # Errors
///
/// - `Encoding` if a character is above U+00FF
/// - `Range` if the result exceeds the APDU payload capacity
pub fn encode_latin1(text: &str) -> Result<EncodedValue> {
    let mut out = EncodedValue::new();
    for c in text.chars() {
        let code = u8::try_from(u32::from(c)).map_err(|_| KnxError::non_latin1())?;
        out.push(code)
            .map_err(|_| KnxError::out_of_range("latin1_length"))?;
    }
    Ok(out)
}

/// Decode Latin-1 octets.
pub fn decode_latin1(data: &[u8]) -> Result<DptText> {
    if data.len() > MAX_APDU_SIZE {
        return Err(KnxError::length_mismatch());
    }
    let end = data
        .iter()
        .rposition(|&b| b != b' ' && b != 0)
        .map_or(0, |i| i + 1);
    let mut out = DptText::new();
    for &b in &data[..end] {
        out.push(char::from(b))
            .map_err(|_| KnxError::length_mismatch())?;
    }
    Ok(out)
}

/// Copy text into a [`DptText`].
pub(crate) fn to_text(text: &str) -> Result<DptText> {
    let mut out = DptText::new();
    out.push_str(text)
        .map_err(|_| KnxError::out_of_range("text_length"))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_umlauts() {
        let bytes = encode_latin1("Grüße").unwrap();
        assert_eq!(bytes.as_slice(), &[b'G', b'r', 0xFC, 0xDF, b'e']);
        assert_eq!(decode_latin1(&bytes).unwrap().as_str(), "Grüße");
    }

    #[test]
    fn test_rejects_beyond_latin1() {
        match encode_latin1("€5") {
            Err(KnxError::Encoding(e)) => assert!(e.is_invalid_character()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_length_limits() {
        let long = "x".repeat(MAX_APDU_SIZE + 1);
        assert!(matches!(encode_latin1(&long), Err(KnxError::Range(_))));
        assert_eq!(encode_latin1(&long[1..]).unwrap().len(), MAX_APDU_SIZE);
        assert!(matches!(
            decode_latin1(long.as_bytes()),
            Err(KnxError::Encoding(_))
        ));
    }

    #[test]
    fn test_trailing_padding_trimmed() {
        assert_eq!(decode_latin1(b"ab  \0\0").unwrap().as_str(), "ab");
        assert_eq!(decode_latin1(&[]).unwrap().as_str(), "");
    }
}
