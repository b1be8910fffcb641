//! Group addresses, the destinations of group telegrams.
//!
//! The same 16 bits read two ways:
//!
//! ```text
//! 3-level  MMMMM III SSSSSSSS   main/middle/sub   0-31 / 0-7 / 0-255
//! 2-level  MMMMM SSSSSSSSSSS    main/sub          0-31 / 0-2047
//! ```
//!
//! Which one applies is a property of the installation, so formatting and
//! strict parsing take a [`GroupLevel`].

use crate::addressing::{split_parts, AddressText};
use crate::bitfield::get_bits16;
use crate::error::{KnxError, Result};
use core::fmt;

/// Textual group address layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GroupLevel {
    /// Main/Sub
    Two,
    /// Main/Middle/Sub
    #[default]
    Three,
}

impl GroupLevel {
    /// Number of textual components
    pub const fn parts(self) -> usize {
        match self {
            Self::Two => 2,
            Self::Three => 3,
        }
    }
}

impl core::str::FromStr for GroupLevel {
    type Err = KnxError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "2" => Ok(Self::Two),
            "3" => Ok(Self::Three),
            _ => Err(KnxError::out_of_range("group_level")),
        }
    }
}

/// Group address.
///
/// ```
/// use knx_codec::{GroupAddress, GroupLevel};
///
/// let blinds = GroupAddress::parse_text("2/1/17", GroupLevel::Three)?;
/// assert_eq!(blinds.raw(), 0x1111);
/// assert_eq!(blinds.format(GroupLevel::Two).as_str(), "2/273");
/// # Ok::<(), knx_codec::KnxError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupAddress {
    raw: u16,
}

impl GroupAddress {
    pub const MAX_MAIN: u8 = 31;
    pub const MAX_MIDDLE: u8 = 7;
    pub const MAX_SUB: u8 = 255;
    /// Largest sub group in 2-level form
    pub const MAX_SUB_2LEVEL: u16 = 2047;

    /// Build from 3-level components.
    ///
    /// # Errors
    ///
    /// Returns `KnxError::Range` naming the component that is out of range.
    pub fn new(main: u8, middle: u8, sub: u8) -> Result<Self> {
        if main > Self::MAX_MAIN {
            return Err(KnxError::out_of_range("main"));
        }
        if middle > Self::MAX_MIDDLE {
            return Err(KnxError::out_of_range("middle"));
        }
        Ok(Self::from_3level(main, middle, sub))
    }

    /// Build from 2-level components.
    ///
    /// # Errors
    ///
    /// Returns `KnxError::Range` naming the component that is out of range.
    pub fn new_2level(main: u8, sub: u16) -> Result<Self> {
        if main > Self::MAX_MAIN {
            return Err(KnxError::out_of_range("main"));
        }
        if sub > Self::MAX_SUB_2LEVEL {
            return Err(KnxError::out_of_range("sub"));
        }
        Ok(Self::from_2level(main, sub))
    }

    const fn from_3level(main: u8, middle: u8, sub: u8) -> Self {
        let raw = ((main as u16) << 11) | ((middle as u16) << 8) | sub as u16;
        Self { raw }
    }

    const fn from_2level(main: u8, sub: u16) -> Self {
        Self {
            raw: ((main as u16) << 11) | sub,
        }
    }

    /// Create from a 3-element array `[main, middle, sub]`.
    ///
    /// ```
    /// use knx_codec::GroupAddress;
    ///
    /// let addr = GroupAddress::from_array([1, 2, 3])?;
    /// assert_eq!(addr.to_string(), "1/2/3");
    /// # Ok::<(), knx_codec::KnxError>(())
    /// ```
    pub fn from_array(parts: [u8; 3]) -> Result<Self> {
        Self::new(parts[0], parts[1], parts[2])
    }

    /// Parse text in exactly the given layout.
    ///
    /// # Errors
    ///
    /// Returns `KnxError::InvalidAddress` carrying `text` on any failure.
    pub fn parse_text(text: &str, level: GroupLevel) -> Result<Self> {
        match level {
            GroupLevel::Three => {
                let [main, middle, sub] = split_parts(text, '/', [2, 1, 3])?;
                if main > u16::from(Self::MAX_MAIN)
                    || middle > u16::from(Self::MAX_MIDDLE)
                    || sub > u16::from(Self::MAX_SUB)
                {
                    return Err(KnxError::address_out_of_range(text));
                }
                Ok(Self::from_3level(main as u8, middle as u8, sub as u8))
            }
            GroupLevel::Two => {
                let [main, sub] = split_parts(text, '/', [2, 4])?;
                if main > u16::from(Self::MAX_MAIN) || sub > Self::MAX_SUB_2LEVEL {
                    return Err(KnxError::address_out_of_range(text));
                }
                Ok(Self::from_2level(main as u8, sub))
            }
        }
    }

    /// Wire value
    #[inline(always)]
    pub const fn raw(self) -> u16 {
        self.raw
    }

    #[inline(always)]
    pub const fn main(self) -> u8 {
        get_bits16(self.raw, 11, 5) as u8
    }

    /// Middle group, 3-level reading
    #[inline(always)]
    pub const fn middle(self) -> u8 {
        get_bits16(self.raw, 8, 3) as u8
    }

    /// Sub group, 3-level reading
    #[inline(always)]
    pub const fn sub(self) -> u8 {
        get_bits16(self.raw, 0, 8) as u8
    }

    /// Sub group, 2-level reading
    #[inline(always)]
    pub const fn sub_2level(self) -> u16 {
        get_bits16(self.raw, 0, 11)
    }

    /// Format as 3-level string (Main/Middle/Sub).
    pub fn to_string_3level(&self) -> AddressText {
        use core::fmt::Write;
        let mut s = AddressText::new();
        let _ = write!(s, "{}/{}/{}", self.main(), self.middle(), self.sub());
        s
    }

    /// Format as 2-level string (Main/Sub).
    pub fn to_string_2level(&self) -> AddressText {
        use core::fmt::Write;
        let mut s = AddressText::new();
        let _ = write!(s, "{}/{}", self.main(), self.sub_2level());
        s
    }

    /// Format in the given layout.
    pub fn format(&self, level: GroupLevel) -> AddressText {
        match level {
            GroupLevel::Two => self.to_string_2level(),
            GroupLevel::Three => self.to_string_3level(),
        }
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

impl From<u16> for GroupAddress {
    #[inline(always)]
    fn from(raw: u16) -> Self {
        Self { raw }
    }
}

impl From<GroupAddress> for u16 {
    #[inline(always)]
    fn from(addr: GroupAddress) -> u16 {
        addr.raw
    }
}

// 3-level unless asked otherwise through `format`
impl fmt::Display for GroupAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.main(), self.middle(), self.sub())
    }
}

impl core::str::FromStr for GroupAddress {
    type Err = KnxError;

    fn from_str(s: &str) -> Result<Self> {
        let level = if s.split('/').count() == 2 {
            GroupLevel::Two
        } else {
            GroupLevel::Three
        };
        Self::parse_text(s, level)
    }
}
