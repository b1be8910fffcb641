//! DPT 14.xxx - 4-byte Float (IEEE 754 single precision)
//!
//! The value travels as its big-endian IEEE 754 bit pattern. Every `f32`,
//! including NaN and the infinities, has an encoding.

use crate::dpt::fixed;
use crate::error::Result;

/// Encode an `f32` as four big-endian octets.
#[inline]
pub fn encode_f32(value: f32) -> [u8; 4] {
    value.to_bits().to_be_bytes()
}

/// Decode exactly four octets.
#[inline]
pub fn decode_f32(data: &[u8]) -> Result<f32> {
    Ok(f32::from_bits(u32::from_be_bytes(fixed(data)?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KnxError;

    #[test]
    fn test_known_patterns() {
        assert_eq!(encode_f32(1.0), [0x3F, 0x80, 0x00, 0x00]);
        assert_eq!(encode_f32(-2.5), [0xC0, 0x20, 0x00, 0x00]);
        assert_eq!(decode_f32(&[0x42, 0xF6, 0xE9, 0x79]).unwrap(), 123.456);
    }

    #[test]
    fn test_extremes_are_bit_exact() {
        for value in [f32::MAX, f32::MIN, f32::MIN_POSITIVE, 0.0, -0.0] {
            let decoded = decode_f32(&encode_f32(value)).unwrap();
            assert_eq!(decoded.to_bits(), value.to_bits());
        }
        assert!(decode_f32(&encode_f32(f32::NAN)).unwrap().is_nan());
    }

    #[test]
    fn test_length() {
        assert!(matches!(
            decode_f32(&[0x3F, 0x80]),
            Err(KnxError::FrameTooShort(_))
        ));
        assert!(matches!(
            decode_f32(&[0; 5]),
            Err(KnxError::Encoding(_))
        ));
    }
}
