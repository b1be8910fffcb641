//! DPT 7.xxx - 2-byte Unsigned Value (2 bytes)
//!
//! 16-bit unsigned datapoint types represent values from 0 to 65535,
//! big-endian.
//!
//! ## Example
//!
//! ```
//! use knx_codec::dpt::{Dpt7, DptDecode, DptEncode};
//!
//! let mut buf = [0u8; 2];
//! Dpt7::Pulses.encode(1234, &mut buf)?;
//! assert_eq!(buf, [0x04, 0xD2]);
//! assert_eq!(Dpt7::ColorTemperature.decode(&[0x0F, 0xA0])?, 4000);
//! # Ok::<(), knx_codec::KnxError>(())
//! ```

use crate::dpt::{fixed, put, DptDecode, DptEncode};
use crate::error::Result;

/// DPT 7.xxx 16-bit unsigned types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dpt7 {
    /// DPT 7.001 - Pulses (0-65535)
    Pulses,
    /// DPT 7.002 - Time Period (ms)
    TimePeriodMs,
    /// DPT 7.005 - Time Period (s)
    TimePeriodSec,
    /// DPT 7.006 - Time Period (min)
    TimePeriodMin,
    /// DPT 7.007 - Time Period (h)
    TimePeriodHr,
    /// DPT 7.011 - Length (mm)
    LengthMm,
    /// DPT 7.012 - Current (mA)
    CurrentMa,
    /// DPT 7.013 - Brightness (lux)
    Brightness,
    /// DPT 7.600 - Color Temperature (K)
    ColorTemperature,
}

impl Dpt7 {
    /// Get the DPT identifier string (e.g., "7.001")
    #[inline]
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt7::Pulses => "7.001",
            Dpt7::TimePeriodMs => "7.002",
            Dpt7::TimePeriodSec => "7.005",
            Dpt7::TimePeriodMin => "7.006",
            Dpt7::TimePeriodHr => "7.007",
            Dpt7::LengthMm => "7.011",
            Dpt7::CurrentMa => "7.012",
            Dpt7::Brightness => "7.013",
            Dpt7::ColorTemperature => "7.600",
        }
    }

    /// Get the unit string for this DPT
    #[inline]
    pub const fn unit(&self) -> &'static str {
        match self {
            Dpt7::Pulses => "pulses",
            Dpt7::TimePeriodMs => "ms",
            Dpt7::TimePeriodSec => "s",
            Dpt7::TimePeriodMin => "min",
            Dpt7::TimePeriodHr => "h",
            Dpt7::LengthMm => "mm",
            Dpt7::CurrentMa => "mA",
            Dpt7::Brightness => "lux",
            Dpt7::ColorTemperature => "K",
        }
    }
}

impl DptEncode<u16> for Dpt7 {
    #[inline]
    fn encode(&self, value: u16, buf: &mut [u8]) -> Result<usize> {
        put(buf, &value.to_be_bytes())
    }
}

impl DptDecode<u16> for Dpt7 {
    #[inline]
    fn decode(&self, data: &[u8]) -> Result<u16> {
        Ok(u16::from_be_bytes(fixed(data)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KnxError;

    #[test]
    fn test_encode_known_values() {
        let cases: [(u16, [u8; 2]); 5] = [
            (0, [0x00, 0x00]),
            (1234, [0x04, 0xD2]),
            (2700, [0x0A, 0x8C]),
            (5000, [0x13, 0x88]),
            (65535, [0xFF, 0xFF]),
        ];
        let mut buf = [0u8; 2];
        for (value, bytes) in cases {
            assert_eq!(Dpt7::Brightness.encode(value, &mut buf).unwrap(), 2);
            assert_eq!(buf, bytes);
            assert_eq!(Dpt7::Brightness.decode(&bytes).unwrap(), value);
        }
    }

    #[test]
    fn test_length_checks() {
        assert!(matches!(
            Dpt7::Pulses.decode(&[0x01]),
            Err(KnxError::FrameTooShort(_))
        ));
        assert!(matches!(
            Dpt7::Pulses.decode(&[0x01, 0x02, 0x03]),
            Err(KnxError::Encoding(_))
        ));
        assert!(Dpt7::Pulses.encode(1, &mut [0u8; 1]).is_err());
    }

    #[test]
    fn test_metadata() {
        assert_eq!(Dpt7::ColorTemperature.identifier(), "7.600");
        assert_eq!(Dpt7::ColorTemperature.unit(), "K");
        assert_eq!(Dpt7::Brightness.unit(), "lux");
    }
}
