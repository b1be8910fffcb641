//! KNX addressing system.
//!
//! KNX uses two types of addresses, both 16 bits on the wire:
//! - Individual addresses for physical devices (Area.Line.Device)
//! - Group addresses for logical grouping (Main/Middle/Sub or Main/Sub)
//!
//! The textual form selects the layout: `.` separates individual address
//! parts, `/` group address parts, and the number of group parts picks
//! 2-level or 3-level. The two octets alone cannot tell 2-level from 3-level,
//! so [`format_address`] always takes the kind from the caller.
//!
//! ## Example
//!
//! ```
//! use knx_codec::addressing::{format_address, parse_address, AddressKind};
//!
//! let (kind, bytes) = parse_address("1/2/3")?;
//! assert_eq!(kind, AddressKind::Group3Level);
//! assert_eq!(bytes, [0x0A, 0x03]);
//! assert_eq!(format_address(&bytes, kind)?.as_str(), "1/2/3");
//! # Ok::<(), knx_codec::KnxError>(())
//! ```

pub mod group;
pub mod individual;

pub use group::{GroupAddress, GroupLevel};
pub use individual::IndividualAddress;

use crate::error::{KnxError, Result};

/// Textual address buffer; the longest form ("15.15.255") is 9 bytes.
pub type AddressText = heapless::String<16>;

/// Address layout selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AddressKind {
    /// Area.Line.Device (4/4/8 bits)
    Individual,
    /// Main/Sub (5/11 bits)
    Group2Level,
    /// Main/Middle/Sub (5/3/8 bits)
    Group3Level,
}

impl AddressKind {
    /// Infer the layout from the separator and part count of `text`.
    ///
    /// # Errors
    ///
    /// Returns `KnxError::InvalidAddress` when no layout matches.
    pub fn infer(text: &str) -> Result<Self> {
        let has_dot = text.contains('.');
        let has_slash = text.contains('/');
        match (has_dot, has_slash) {
            (true, false) => Ok(Self::Individual),
            (false, true) => match text.split('/').count() {
                2 => Ok(Self::Group2Level),
                3 => Ok(Self::Group3Level),
                _ => Err(KnxError::address_syntax(text)),
            },
            _ => Err(KnxError::address_syntax(text)),
        }
    }

    /// Separator character of the textual form
    pub const fn separator(self) -> char {
        match self {
            Self::Individual => '.',
            Self::Group2Level | Self::Group3Level => '/',
        }
    }

    /// Check if this is one of the group layouts
    pub const fn is_group(self) -> bool {
        matches!(self, Self::Group2Level | Self::Group3Level)
    }
}

impl From<GroupLevel> for AddressKind {
    fn from(level: GroupLevel) -> Self {
        match level {
            GroupLevel::Two => Self::Group2Level,
            GroupLevel::Three => Self::Group3Level,
        }
    }
}

/// Parse a textual address, inferring its layout.
///
/// Returns the layout and the two big-endian octets.
///
/// # Errors
///
/// Returns `KnxError::InvalidAddress` carrying `text` for malformed syntax or
/// out-of-range components.
pub fn parse_address(text: &str) -> Result<(AddressKind, [u8; 2])> {
    let kind = AddressKind::infer(text)?;
    let raw = match kind {
        AddressKind::Individual => IndividualAddress::parse_text(text)?.raw(),
        AddressKind::Group2Level => GroupAddress::parse_text(text, GroupLevel::Two)?.raw(),
        AddressKind::Group3Level => GroupAddress::parse_text(text, GroupLevel::Three)?.raw(),
    };
    Ok((kind, raw.to_be_bytes()))
}

/// Parse a textual address that must have the given layout.
///
/// # Errors
///
/// Returns `KnxError::InvalidAddress` if the text is invalid or has a
/// different layout than `kind`.
pub fn parse_address_as(text: &str, kind: AddressKind) -> Result<[u8; 2]> {
    let (found, bytes) = parse_address(text)?;
    if found != kind {
        crate::codec_log!(debug, "address layout mismatch");
        return Err(KnxError::address_syntax(text));
    }
    Ok(bytes)
}

/// Format two big-endian octets as text in the given layout.
///
/// # Errors
///
/// Returns `KnxError::FrameTooShort` if `bytes` holds fewer than 2 octets.
pub fn format_address(bytes: &[u8], kind: AddressKind) -> Result<AddressText> {
    KnxError::ensure_len(bytes, 2)?;
    let raw = u16::from_be_bytes([bytes[0], bytes[1]]);
    Ok(match kind {
        AddressKind::Individual => IndividualAddress::from(raw).to_text(),
        AddressKind::Group2Level => GroupAddress::from(raw).to_string_2level(),
        AddressKind::Group3Level => GroupAddress::from(raw).to_string_3level(),
    })
}

/// Split `text` on `sep` into exactly `N` decimal components.
///
/// Part count and part lengths are checked against `max_digits` before any
/// numeric parsing, so oversized input is rejected without being parsed.
pub(crate) fn split_parts<const N: usize>(
    text: &str,
    sep: char,
    max_digits: [usize; N],
) -> Result<[u16; N]> {
    let mut count = 0;
    for part in text.split(sep) {
        if count >= N || part.len() > max_digits[count] {
            return Err(KnxError::address_syntax(text));
        }
        count += 1;
    }
    if count != N {
        return Err(KnxError::address_syntax(text));
    }

    let mut values = [0u16; N];
    for (slot, part) in values.iter_mut().zip(text.split(sep)) {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(KnxError::address_syntax(text));
        }
        *slot = part
            .parse::<u16>()
            .map_err(|_| KnxError::address_syntax(text))?;
    }
    Ok(values)
}
