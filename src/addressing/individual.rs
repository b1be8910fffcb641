//! Device addresses in `area.line.device` notation.
//!
//! ```text
//! AAAA LLLL DDDDDDDD
//! ```
//!
//! Text is accepted only in canonical decimal form: no signs, no
//! whitespace, at most 2/2/3 digits.

use crate::addressing::{split_parts, AddressText};
use crate::bitfield::get_bits16;
use crate::error::{KnxError, Result};
use core::fmt;

/// Maximum digits per textual component: area, line, device
const MAX_DIGITS: [usize; 3] = [2, 2, 3];

/// Physical address of a device on the bus.
///
/// ```
/// use knx_codec::IndividualAddress;
///
/// let router: IndividualAddress = "1.1.0".parse()?;
/// assert_eq!(router.raw().to_be_bytes(), [0x11, 0x00]);
/// assert_eq!(IndividualAddress::from(0xF0FF).to_string(), "15.0.255");
/// # Ok::<(), knx_codec::KnxError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndividualAddress {
    raw: u16,
}

impl IndividualAddress {
    /// Largest area
    pub const MAX_AREA: u8 = 15;
    /// Largest line
    pub const MAX_LINE: u8 = 15;
    /// Largest device number
    pub const MAX_DEVICE: u8 = 255;

    /// Build from components.
    ///
    /// # Errors
    ///
    /// Returns `KnxError::Range` if area or line exceed 4 bits.
    pub fn new(area: u8, line: u8, device: u8) -> Result<Self> {
        if area > Self::MAX_AREA {
            return Err(KnxError::out_of_range("area"));
        }
        if line > Self::MAX_LINE {
            return Err(KnxError::out_of_range("line"));
        }
        Ok(Self::from_parts(area, line, device))
    }

    const fn from_parts(area: u8, line: u8, device: u8) -> Self {
        let raw = ((area as u16) << 12) | ((line as u16) << 8) | device as u16;
        Self { raw }
    }

    /// Parse the textual `A.L.D` form.
    ///
    /// # Errors
    ///
    /// Returns `KnxError::InvalidAddress` carrying `text` on any failure.
    pub fn parse_text(text: &str) -> Result<Self> {
        let [area, line, device] = split_parts(text, '.', MAX_DIGITS)?;
        if area > u16::from(Self::MAX_AREA)
            || line > u16::from(Self::MAX_LINE)
            || device > u16::from(Self::MAX_DEVICE)
        {
            return Err(KnxError::address_out_of_range(text));
        }
        Ok(Self::from_parts(area as u8, line as u8, device as u8))
    }

    /// Wire value
    #[inline(always)]
    pub const fn raw(self) -> u16 {
        self.raw
    }

    #[inline(always)]
    pub const fn area(self) -> u8 {
        get_bits16(self.raw, 12, 4) as u8
    }

    #[inline(always)]
    pub const fn line(self) -> u8 {
        get_bits16(self.raw, 8, 4) as u8
    }

    #[inline(always)]
    pub const fn device(self) -> u8 {
        get_bits16(self.raw, 0, 8) as u8
    }

    /// Format into a fixed-capacity string.
    pub fn to_text(&self) -> AddressText {
        use core::fmt::Write;
        let mut s = AddressText::new();
        let _ = write!(s, "{self}");
        s
    }

    /// Write the two big-endian octets to the front of `buf`.
    #[inline]
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        KnxError::ensure_len(buf, 2)?;
        buf[..2].copy_from_slice(&self.raw.to_be_bytes());
        Ok(2)
    }

    /// Read two big-endian octets from the front of `buf`.
    #[inline]
    pub fn decode(buf: &[u8]) -> Result<Self> {
        KnxError::ensure_len(buf, 2)?;
        Ok(Self::from(u16::from_be_bytes([buf[0], buf[1]])))
    }
}

impl fmt::Display for IndividualAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.area(), self.line(), self.device())
    }
}

impl From<u16> for IndividualAddress {
    #[inline(always)]
    fn from(raw: u16) -> Self {
        Self { raw }
    }
}

impl From<IndividualAddress> for u16 {
    #[inline(always)]
    fn from(addr: IndividualAddress) -> u16 {
        addr.raw
    }
}

impl core::str::FromStr for IndividualAddress {
    type Err = KnxError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_text(s)
    }
}
