//! DPT 5.xxx - 8-bit Unsigned Value (1 byte)
//!
//! 8-bit unsigned datapoint types represent values from 0 to 255
//! with different scaling and interpretations.
//!
//! ## Common Subtypes
//!
//! - **5.001** - Percentage (0-100%), scaled onto 0-255
//! - **5.003** - Angle (0-360°), scaled onto 0-255
//! - **5.004** - Percentage 0-255 (0-255)
//! - **5.005** - Ratio (0-255)
//! - **5.006** - Tariff (0-254)
//! - **5.010** - Counter pulses (0-255)
//!
//! ## Example
//!
//! ```
//! use knx_codec::dpt::{Dpt5, DptDecode, DptEncode};
//!
//! let mut buf = [0u8; 1];
//! Dpt5::Percentage.encode(75, &mut buf)?;
//! assert_eq!(buf, [0xBF]);
//! assert_eq!(Dpt5::Percentage.decode(&buf)?, 75);
//! # Ok::<(), knx_codec::KnxError>(())
//! ```

use crate::dpt::{fixed, put, round_half_away, DptDecode, DptEncode};
use crate::error::{KnxError, Result};

/// DPT 5.xxx 8-bit unsigned types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dpt5 {
    /// DPT 5.001 - Percentage (0-100%)
    Percentage,
    /// DPT 5.003 - Angle (0-360°)
    Angle,
    /// DPT 5.004 - Percentage 0-255 (0-255)
    PercentU8,
    /// DPT 5.005 - Ratio (0-255)
    Ratio,
    /// DPT 5.006 - Tariff (0-254)
    Tariff,
    /// DPT 5.010 - Counter pulses (0-255)
    Counter,
}

/// Encode a 5.001 percentage: `round(v * 255 / 100)`.
///
/// # Errors
///
/// - `Encoding` if `percent` is NaN or infinite
/// - `Range` if `percent` is outside `[0, 100]`
pub fn encode_percent(percent: f32) -> Result<u8> {
    if !percent.is_finite() {
        return Err(KnxError::non_finite());
    }
    if !(0.0..=100.0).contains(&percent) {
        return Err(KnxError::out_of_range("percent"));
    }
    Ok(round_half_away(f64::from(percent) * 255.0 / 100.0) as u8)
}

/// Decode a 5.001 octet into percent.
pub fn decode_percent(data: &[u8]) -> Result<f32> {
    let [raw] = fixed::<1>(data)?;
    Ok((f64::from(raw) * 100.0 / 255.0) as f32)
}

impl Dpt5 {
    /// Get the DPT identifier string (e.g., "5.001")
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt5::Percentage => "5.001",
            Dpt5::Angle => "5.003",
            Dpt5::PercentU8 => "5.004",
            Dpt5::Ratio => "5.005",
            Dpt5::Tariff => "5.006",
            Dpt5::Counter => "5.010",
        }
    }

    /// Get the unit string for this DPT
    pub const fn unit(&self) -> &'static str {
        match self {
            Dpt5::Percentage => "%",
            Dpt5::Angle => "°",
            Dpt5::Counter => "pulses",
            Dpt5::PercentU8 | Dpt5::Ratio | Dpt5::Tariff => "",
        }
    }

    /// Inclusive range of the engineering value
    pub const fn range(&self) -> (u16, u16) {
        match self {
            Dpt5::Percentage => (0, 100),
            Dpt5::Angle => (0, 360),
            Dpt5::Tariff => (0, 254),
            Dpt5::PercentU8 | Dpt5::Ratio | Dpt5::Counter => (0, 255),
        }
    }

    /// Scale an engineering value onto the raw octet, rounding.
    fn to_raw(self, value: u16) -> Result<u8> {
        let (min, max) = self.range();
        if value < min || value > max {
            return Err(KnxError::out_of_range("dpt5"));
        }
        Ok(match self {
            Dpt5::Percentage | Dpt5::Angle => {
                ((u32::from(value) * 255 + u32::from(max) / 2) / u32::from(max)) as u8
            }
            Dpt5::PercentU8 | Dpt5::Ratio | Dpt5::Tariff | Dpt5::Counter => value as u8,
        })
    }

    /// Inverse of [`Self::to_raw`].
    fn from_raw(self, raw: u8) -> Result<u16> {
        let (_, max) = self.range();
        match self {
            Dpt5::Percentage | Dpt5::Angle => {
                Ok(((u32::from(raw) * u32::from(max) + 127) / 255) as u16)
            }
            Dpt5::Tariff if raw > 254 => Err(KnxError::out_of_range("dpt5")),
            Dpt5::PercentU8 | Dpt5::Ratio | Dpt5::Tariff | Dpt5::Counter => Ok(u16::from(raw)),
        }
    }
}

impl DptEncode<u16> for Dpt5 {
    fn encode(&self, value: u16, buf: &mut [u8]) -> Result<usize> {
        put(buf, &[self.to_raw(value)?])
    }
}

impl DptDecode<u16> for Dpt5 {
    fn decode(&self, data: &[u8]) -> Result<u16> {
        let [raw] = fixed::<1>(data)?;
        self.from_raw(raw)
    }
}
