//! DPT 9.xxx - 2-byte Float (16-bit floating point)
//!
//! 2-byte floating point datapoint types represent values using a custom
//! 16-bit floating point format with 1 sign bit, 4 exponent bits, and 11 mantissa bits.
//!
//! ## Format
//!
//! ```text
//! Byte 0: SEEE EMMM
//! Byte 1: MMMM MMMM
//!
//! S = Sign bit (bit 15)
//! E = Exponent (bits 14-11: 4 bits, unsigned, range 0-15)
//! M = Mantissa (bits 10-0); with S it forms a 12-bit two's complement value
//!
//! Value = 0.01 * M * 2^E
//! ```
//!
//! ## Range
//!
//! - Min: -671088.64
//! - Max: +670760.96
//! - Resolution: 0.01 at exponent 0, doubling with each exponent step
//!
//! ## Example
//!
//! ```
//! use knx_codec::dpt::{Dpt9, DptDecode, DptEncode};
//!
//! let mut buf = [0u8; 2];
//! let len = Dpt9::Temperature.encode(21.5, &mut buf)?;
//! assert_eq!(&buf[..len], &[0x0C, 0x33]);
//! assert_eq!(Dpt9::Temperature.decode(&buf)?, 21.5);
//! # Ok::<(), knx_codec::KnxError>(())
//! ```

use crate::bitfield::get_bits16;
use crate::dpt::{fixed, put, round_half_away, DptDecode, DptEncode};
use crate::error::{KnxError, Result};

/// Largest encodable value: `2047 * 2^15 * 0.01`
pub const MAX: f64 = 670_760.96;
/// Smallest encodable value: `-2048 * 2^15 * 0.01`
pub const MIN: f64 = -671_088.64;

const MANTISSA_MIN: i64 = -2048;
const MANTISSA_MAX: i64 = 2047;
const MAX_EXPONENT: u32 = 15;

/// DPT 9.xxx 2-byte float types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dpt9 {
    /// DPT 9.001 - Temperature (°C)
    Temperature,
    /// DPT 9.002 - Temperature difference (K)
    TemperatureDifference,
    /// DPT 9.004 - Illuminance (lux)
    Illuminance,
    /// DPT 9.005 - Wind speed (m/s)
    WindSpeed,
    /// DPT 9.006 - Pressure (Pa)
    Pressure,
    /// DPT 9.007 - Humidity (%)
    Humidity,
    /// DPT 9.008 - Air quality (ppm)
    AirQuality,
    /// DPT 9.020 - Voltage (mV)
    Voltage,
    /// DPT 9.021 - Current (mA)
    Current,
    /// DPT 9.024 - Power (kW)
    Power,
}

impl Dpt9 {
    /// Get the DPT identifier string
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt9::Temperature => "9.001",
            Dpt9::TemperatureDifference => "9.002",
            Dpt9::Illuminance => "9.004",
            Dpt9::WindSpeed => "9.005",
            Dpt9::Pressure => "9.006",
            Dpt9::Humidity => "9.007",
            Dpt9::AirQuality => "9.008",
            Dpt9::Voltage => "9.020",
            Dpt9::Current => "9.021",
            Dpt9::Power => "9.024",
        }
    }

    /// Get the unit string
    pub const fn unit(&self) -> &'static str {
        match self {
            Dpt9::Temperature => "°C",
            Dpt9::TemperatureDifference => "K",
            Dpt9::Illuminance => "lux",
            Dpt9::WindSpeed => "m/s",
            Dpt9::Pressure => "Pa",
            Dpt9::Humidity => "%",
            Dpt9::AirQuality => "ppm",
            Dpt9::Voltage => "mV",
            Dpt9::Current => "mA",
            Dpt9::Power => "kW",
        }
    }
}

/// Encode a float into the 2-octet KNX format.
///
/// Searches exponents upward from 0 and keeps the first whose rounded
/// mantissa fits `[-2048, 2047]`, which is the most precise encoding.
///
/// # Errors
///
/// - `Encoding` if `value` is NaN or infinite
/// - `Range` if `value` is outside `[MIN, MAX]`
pub fn encode_f16(value: f32) -> Result<[u8; 2]> {
    if !value.is_finite() {
        return Err(KnxError::non_finite());
    }
    let value = f64::from(value);
    if !(MIN..=MAX).contains(&value) {
        return Err(KnxError::out_of_range("dpt9"));
    }

    let scaled = value * 100.0;
    for exponent in 0..=MAX_EXPONENT {
        let mantissa = round_half_away(scaled / f64::from(1u32 << exponent));
        if (MANTISSA_MIN..=MANTISSA_MAX).contains(&mantissa) {
            let sign = u16::from(mantissa < 0);
            let bits = (mantissa as u16) & 0x07FF;
            let raw = (sign << 15) | ((exponent as u16) << 11) | bits;
            return Ok(raw.to_be_bytes());
        }
    }
    Err(KnxError::out_of_range("dpt9"))
}

/// Decode two octets; see the module docs for the layout.
pub fn decode_raw(bytes: [u8; 2]) -> f32 {
    let raw = u16::from_be_bytes(bytes);
    let exponent = get_bits16(raw, 11, 4);
    let mut mantissa = i32::from(get_bits16(raw, 0, 11));
    if get_bits16(raw, 15, 1) == 1 {
        mantissa -= 2048;
    }
    (f64::from(mantissa) * f64::from(1u32 << exponent) / 100.0) as f32
}

/// Decode exactly two octets.
pub fn decode_f16(data: &[u8]) -> Result<f32> {
    Ok(decode_raw(fixed(data)?))
}

impl DptEncode<f32> for Dpt9 {
    fn encode(&self, value: f32, buf: &mut [u8]) -> Result<usize> {
        put(buf, &encode_f16(value)?)
    }
}

impl DptDecode<f32> for Dpt9 {
    fn decode(&self, data: &[u8]) -> Result<f32> {
        decode_f16(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Value step at the exponent an encoding used
    fn resolution(bytes: [u8; 2]) -> f32 {
        let exponent = (bytes[0] >> 3) & 0x0F;
        0.01 * (1u32 << exponent) as f32
    }

    #[test]
    fn test_encode_known_values() {
        let cases: [(f32, [u8; 2]); 6] = [
            (0.0, [0x00, 0x00]),
            (0.01, [0x00, 0x01]),
            (-0.01, [0x87, 0xFF]),
            (21.5, [0x0C, 0x33]),
            (100.0, [0x1C, 0xE2]),
            (-272.0, [0xA1, 0x5C]),
        ];
        for (value, bytes) in cases {
            assert_eq!(encode_f16(value).unwrap(), bytes, "{value}");
        }
    }

    #[test]
    fn test_decode_bus_values() {
        // Exponent 1, mantissa 1080
        assert!((decode_raw([0x0C, 0x38]) - 21.6).abs() < 0.001);
        // Exponent 1, mantissa 752
        assert!((decode_raw([0x0A, 0xF0]) - 15.04).abs() < 0.001);
        // Sign set, mantissa 0x7FF: -1
        assert!((decode_raw([0x87, 0xFF]) + 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_roundtrip_within_resolution() {
        for value in [0.0, 0.01, -0.01, 100.0, -272.0, 670_760.96, -671_088.64] {
            let bytes = encode_f16(value).unwrap();
            let decoded = decode_raw(bytes);
            assert!(
                (decoded - value).abs() <= resolution(bytes) / 2.0 + value.abs() * 1e-6,
                "{value} -> {decoded}"
            );
        }
    }

    #[test]
    fn test_extremes_are_exact() {
        assert_eq!(encode_f16(670_760.96).unwrap(), [0x7F, 0xFF]);
        assert_eq!(encode_f16(-671_088.64).unwrap(), [0xF8, 0x00]);
    }

    #[test]
    fn test_smallest_exponent_wins() {
        // 20.47 fits exponent 0 exactly; 20.48 needs exponent 1
        assert_eq!(encode_f16(20.47).unwrap(), [0x07, 0xFF]);
        assert_eq!(encode_f16(20.48).unwrap(), [0x0C, 0x00]);
    }

    #[test]
    fn test_non_finite_rejected() {
        for value in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            match encode_f16(value) {
                Err(KnxError::Encoding(e)) => assert!(e.is_non_finite()),
                other => panic!("{value}: unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(matches!(encode_f16(670_800.0), Err(KnxError::Range(_))));
        assert!(matches!(encode_f16(-671_100.0), Err(KnxError::Range(_))));
    }

    #[test]
    fn test_decode_length() {
        assert!(matches!(decode_f16(&[0x0C]), Err(KnxError::FrameTooShort(_))));
        assert!(matches!(
            decode_f16(&[0x0C, 0x33, 0x00]),
            Err(KnxError::Encoding(_))
        ));
    }

    #[test]
    fn test_trait_impl() {
        let mut buf = [0u8; 2];
        assert_eq!(Dpt9::Humidity.encode(65.5, &mut buf).unwrap(), 2);
        // Exponent 2: 0.04 resolution
        assert!((Dpt9::Humidity.decode(&buf).unwrap() - 65.5).abs() < 0.03);
        assert!(Dpt9::Humidity.encode(1.0, &mut [0u8; 1]).is_err());
        assert_eq!(Dpt9::Temperature.identifier(), "9.001");
        assert_eq!(Dpt9::Illuminance.unit(), "lux");
    }
}
