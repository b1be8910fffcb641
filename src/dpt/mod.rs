//! KNX Datapoint Types (DPT)
//!
//! This module provides encoding and decoding for KNX Datapoint Types.
//! DPTs define how to interpret the data payload in KNX telegrams.
//!
//! ## Supported DPT Families
//!
//! - **DPT 1.xxx** - Boolean (1 bit): switches, buttons, binary sensors
//! - **DPT 3.xxx** - 3-bit controlled: dimming, blind control
//! - **DPT 5.xxx** - 8-bit unsigned, with 5.001 as a 0-100% scaling
//! - **DPT 6.xxx / 8.xxx / 13.xxx** - 8/16/32-bit signed
//! - **DPT 7.xxx / 12.xxx** - 16/32-bit unsigned
//! - **DPT 9.xxx** - 2-byte float: temperature, illuminance, pressure
//! - **DPT 10.xxx / 11.xxx** - time of day, date
//! - **DPT 14.xxx** - 4-byte IEEE 754 float
//! - **DPT 16.xxx / 24.xxx** - ASCII (14 octets) and Latin-1 strings
//! - **DPT 232.xxx** - RGB colour
//!
//! ## Usage
//!
//! The tag-driven API works on any supported type:
//!
//! ```
//! use knx_codec::dpt::{self, DptTag, DptValue};
//!
//! let tag: DptTag = "9.001".parse()?;
//! let bytes = dpt::encode(tag, &DptValue::Float(21.5))?;
//! assert_eq!(bytes.as_slice(), &[0x0C, 0x33]);
//! assert_eq!(dpt::decode(tag, &bytes)?, DptValue::Float(21.5));
//! # Ok::<(), knx_codec::KnxError>(())
//! ```
//!
//! The family types carry subtype metadata and encode into a caller buffer:
//!
//! ```
//! use knx_codec::dpt::{Dpt7, Dpt9, DptDecode, DptEncode};
//!
//! let mut buf = [0u8; 2];
//! let len = Dpt9::Temperature.encode(21.5, &mut buf)?;
//! assert_eq!(Dpt9::Temperature.decode(&buf[..len])?, 21.5);
//!
//! let lux = Dpt7::Brightness.decode(&[0x13, 0x88])?;
//! assert_eq!(lux, 5000);
//! # Ok::<(), knx_codec::KnxError>(())
//! ```

use crate::error::{KnxError, Result};
use crate::protocol::constants::MAX_APDU_SIZE;
use core::fmt;

pub mod dpt1;
pub mod dpt10;
pub mod dpt11;
pub mod dpt13;
pub mod dpt14;
pub mod dpt16;
pub mod dpt24;
pub mod dpt232;
pub mod dpt3;
pub mod dpt5;
pub mod dpt7;
pub mod dpt9;
pub mod integer;

#[doc(inline)]
pub use dpt1::Dpt1;
#[doc(inline)]
pub use dpt10::TimeOfDay;
#[doc(inline)]
pub use dpt11::Date;
#[doc(inline)]
pub use dpt13::Dpt13;
#[doc(inline)]
pub use dpt232::Rgb;
#[doc(inline)]
pub use dpt3::{ControlCommand, Dpt3, StepCode};
#[doc(inline)]
pub use dpt5::Dpt5;
#[doc(inline)]
pub use dpt7::Dpt7;
#[doc(inline)]
pub use dpt9::Dpt9;

/// Encoded DPT payload
pub type EncodedValue = heapless::Vec<u8, MAX_APDU_SIZE>;

/// Decoded string payload; 64 Latin-1 characters take at most 128 UTF-8 bytes.
pub type DptText = heapless::String<128>;

/// Trait for encoding values to KNX data format
pub trait DptEncode<T> {
    /// Encode `value` into `buf`, returning the number of octets written.
    fn encode(&self, value: T, buf: &mut [u8]) -> Result<usize>;
}

/// Trait for decoding KNX data to values
pub trait DptDecode<T> {
    /// Decode KNX byte representation to a value
    fn decode(&self, data: &[u8]) -> Result<T>;
}

/// Copy exactly `N` octets out of `data`.
///
/// Fewer octets is a short frame; more is a length mismatch, so a buffer
/// decoded under the wrong tag is rejected instead of reinterpreted.
pub(crate) fn fixed<const N: usize>(data: &[u8]) -> Result<[u8; N]> {
    KnxError::ensure_len(data, N)?;
    if data.len() > N {
        return Err(KnxError::length_mismatch());
    }
    let mut out = [0u8; N];
    out.copy_from_slice(data);
    Ok(out)
}

/// Write `bytes` into the front of `buf`.
pub(crate) fn put(buf: &mut [u8], bytes: &[u8]) -> Result<usize> {
    KnxError::ensure_len(buf, bytes.len())?;
    buf[..bytes.len()].copy_from_slice(bytes);
    Ok(bytes.len())
}

/// Round half away from zero (manual, `core` has no `f64::round`).
///
/// Callers range check first, so the cast never saturates.
#[inline]
pub(crate) fn round_half_away(x: f64) -> i64 {
    if x >= 0.0 {
        (x + 0.5) as i64
    } else {
        (x - 0.5) as i64
    }
}

// =============================================================================
// Tags
// =============================================================================

/// Closed set of supported datapoint types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DptTag {
    /// DPT 1 - boolean
    Boolean,
    /// DPT 3 - dimming / blind step control
    Dimming,
    /// DPT 5 - 8-bit unsigned
    Unsigned8,
    /// DPT 5.001 - percentage scaled onto 0-255
    Percent,
    /// DPT 6 - 8-bit signed
    Signed8,
    /// DPT 7 - 16-bit unsigned
    Unsigned16,
    /// DPT 8 - 16-bit signed
    Signed16,
    /// DPT 9 - 2-byte float
    Float16,
    /// DPT 10 - time of day
    Time,
    /// DPT 11 - date
    Date,
    /// DPT 12 - 32-bit unsigned
    Unsigned32,
    /// DPT 13 - 32-bit signed
    Signed32,
    /// DPT 14 - IEEE 754 single precision
    Float32,
    /// DPT 16 - 14 octet ASCII string
    Ascii,
    /// DPT 24 - variable length Latin-1 string
    Latin1,
    /// DPT 232 - RGB colour
    Rgb,
}

impl DptTag {
    /// All supported tags
    pub const ALL: [DptTag; 16] = [
        Self::Boolean,
        Self::Dimming,
        Self::Unsigned8,
        Self::Percent,
        Self::Signed8,
        Self::Unsigned16,
        Self::Signed16,
        Self::Float16,
        Self::Time,
        Self::Date,
        Self::Unsigned32,
        Self::Signed32,
        Self::Float32,
        Self::Ascii,
        Self::Latin1,
        Self::Rgb,
    ];

    /// Canonical identifier, e.g. `"9"` or `"5.001"`
    pub const fn identifier(self) -> &'static str {
        match self {
            Self::Boolean => "1",
            Self::Dimming => "3",
            Self::Unsigned8 => "5",
            Self::Percent => "5.001",
            Self::Signed8 => "6",
            Self::Unsigned16 => "7",
            Self::Signed16 => "8",
            Self::Float16 => "9",
            Self::Time => "10",
            Self::Date => "11",
            Self::Unsigned32 => "12",
            Self::Signed32 => "13",
            Self::Float32 => "14",
            Self::Ascii => "16",
            Self::Latin1 => "24",
            Self::Rgb => "232",
        }
    }

    /// Main type number
    pub const fn main_number(self) -> u16 {
        match self {
            Self::Boolean => 1,
            Self::Dimming => 3,
            Self::Unsigned8 | Self::Percent => 5,
            Self::Signed8 => 6,
            Self::Unsigned16 => 7,
            Self::Signed16 => 8,
            Self::Float16 => 9,
            Self::Time => 10,
            Self::Date => 11,
            Self::Unsigned32 => 12,
            Self::Signed32 => 13,
            Self::Float32 => 14,
            Self::Ascii => 16,
            Self::Latin1 => 24,
            Self::Rgb => 232,
        }
    }

    /// Encoded width in octets; `None` for variable length strings.
    pub const fn size(self) -> Option<usize> {
        match self {
            Self::Boolean | Self::Dimming | Self::Unsigned8 | Self::Percent | Self::Signed8 => {
                Some(1)
            }
            Self::Unsigned16 | Self::Signed16 | Self::Float16 => Some(2),
            Self::Time | Self::Date | Self::Rgb => Some(3),
            Self::Unsigned32 | Self::Signed32 | Self::Float32 => Some(4),
            Self::Ascii => Some(dpt16::ASCII_LEN),
            Self::Latin1 => None,
        }
    }

    /// Check if the value travels in the low 6 bits of the APCI octet
    pub const fn is_short(self) -> bool {
        matches!(self, Self::Boolean | Self::Dimming)
    }
}

impl fmt::Display for DptTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl core::str::FromStr for DptTag {
    type Err = KnxError;

    /// Accepts a main number (`"9"`) or a subtype (`"9.001"`).
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (main, sub) = match s.split_once('.') {
            Some((main, sub)) => (main, Some(sub)),
            None => (s, None),
        };
        let is_number = |p: &str| {
            !p.is_empty() && p.len() <= 3 && p.bytes().all(|b| b.is_ascii_digit())
        };
        if !is_number(main) || !sub.map_or(true, is_number) {
            crate::codec_log!(debug, "rejected DPT identifier");
            return Err(KnxError::unknown_dpt());
        }
        let main: u16 = main.parse().map_err(|_| KnxError::unknown_dpt())?;
        if main == 5 && sub.and_then(|p| p.parse::<u16>().ok()) == Some(1) {
            return Ok(Self::Percent);
        }
        Self::ALL
            .iter()
            .find(|tag| tag.main_number() == main && **tag != Self::Percent)
            .copied()
            .ok_or_else(KnxError::unknown_dpt)
    }
}

// =============================================================================
// Values
// =============================================================================

/// Decoded datapoint value; each variant belongs to exactly one [`DptTag`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DptValue {
    /// DPT 1
    Bool(bool),
    /// DPT 3
    Control(ControlCommand),
    /// DPT 5
    U8(u8),
    /// DPT 5.001, in percent
    Percent(f32),
    /// DPT 6
    I8(i8),
    /// DPT 7
    U16(u16),
    /// DPT 8
    I16(i16),
    /// DPT 9
    Float(f32),
    /// DPT 12
    U32(u32),
    /// DPT 13
    I32(i32),
    /// DPT 14
    F32(f32),
    /// DPT 10
    Time(TimeOfDay),
    /// DPT 11
    Date(Date),
    /// DPT 16
    Ascii(DptText),
    /// DPT 24
    Latin1(DptText),
    /// DPT 232
    Rgb(Rgb),
}

impl DptValue {
    /// The tag this value encodes under
    pub const fn tag(&self) -> DptTag {
        match self {
            Self::Bool(_) => DptTag::Boolean,
            Self::Control(_) => DptTag::Dimming,
            Self::U8(_) => DptTag::Unsigned8,
            Self::Percent(_) => DptTag::Percent,
            Self::I8(_) => DptTag::Signed8,
            Self::U16(_) => DptTag::Unsigned16,
            Self::I16(_) => DptTag::Signed16,
            Self::Float(_) => DptTag::Float16,
            Self::U32(_) => DptTag::Unsigned32,
            Self::I32(_) => DptTag::Signed32,
            Self::F32(_) => DptTag::Float32,
            Self::Time(_) => DptTag::Time,
            Self::Date(_) => DptTag::Date,
            Self::Ascii(_) => DptTag::Ascii,
            Self::Latin1(_) => DptTag::Latin1,
            Self::Rgb(_) => DptTag::Rgb,
        }
    }

    /// Build a value for `tag` from its textual form.
    ///
    /// Numbers are range checked against the tag before narrowing, so
    /// `"256"` under [`DptTag::Unsigned8`] is a range error rather than a
    /// wrapped value.
    ///
    /// ```
    /// use knx_codec::dpt::{DptTag, DptValue};
    ///
    /// assert_eq!(DptValue::from_text(DptTag::Unsigned8, "255")?, DptValue::U8(255));
    /// assert!(DptValue::from_text(DptTag::Unsigned8, "256").is_err());
    /// assert_eq!(
    ///     DptValue::from_text(DptTag::Time, "7:05:00")?.to_string(),
    ///     "7:5:0"
    /// );
    /// # Ok::<(), knx_codec::KnxError>(())
    /// ```
    pub fn from_text(tag: DptTag, text: &str) -> Result<Self> {
        let text = text.trim();
        Ok(match tag {
            DptTag::Boolean => Self::Bool(dpt1::parse_bool(text)?),
            DptTag::Dimming => Self::Control(text.parse()?),
            DptTag::Unsigned8 => Self::U8(integer::parse_int(text, "dpt5")?),
            DptTag::Percent => Self::Percent(parse_float(text)?),
            DptTag::Signed8 => Self::I8(integer::parse_int(text, "dpt6")?),
            DptTag::Unsigned16 => Self::U16(integer::parse_int(text, "dpt7")?),
            DptTag::Signed16 => Self::I16(integer::parse_int(text, "dpt8")?),
            DptTag::Float16 => Self::Float(parse_float(text)?),
            DptTag::Unsigned32 => Self::U32(integer::parse_int(text, "dpt12")?),
            DptTag::Signed32 => Self::I32(integer::parse_int(text, "dpt13")?),
            DptTag::Float32 => Self::F32(parse_float(text)?),
            DptTag::Time => Self::Time(text.parse()?),
            DptTag::Date => Self::Date(text.parse()?),
            DptTag::Ascii => Self::Ascii(dpt24::to_text(text)?),
            DptTag::Latin1 => Self::Latin1(dpt24::to_text(text)?),
            DptTag::Rgb => Self::Rgb(text.parse()?),
        })
    }
}

fn parse_float(text: &str) -> Result<f32> {
    text.parse::<f32>().map_err(|_| KnxError::malformed())
}

impl fmt::Display for DptValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Control(v) => write!(f, "{v}"),
            Self::U8(v) => write!(f, "{v}"),
            Self::Percent(v) => write!(f, "{v}%"),
            Self::I8(v) => write!(f, "{v}"),
            Self::U16(v) => write!(f, "{v}"),
            Self::I16(v) => write!(f, "{v}"),
            Self::Float(v) | Self::F32(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::Time(v) => write!(f, "{v}"),
            Self::Date(v) => write!(f, "{v}"),
            Self::Ascii(v) | Self::Latin1(v) => f.write_str(v),
            Self::Rgb(v) => write!(f, "{v}"),
        }
    }
}

// =============================================================================
// Dispatch
// =============================================================================

/// Encode `value` under `tag`.
///
/// # Errors
///
/// - `UnsupportedType` if `value` belongs to a different tag
/// - `Range` / `Encoding` from the per-family encoder
pub fn encode(tag: DptTag, value: &DptValue) -> Result<EncodedValue> {
    if value.tag() != tag {
        crate::codec_log!(debug, "DPT value does not match tag");
        return Err(KnxError::value_mismatch());
    }
    let mut out = EncodedValue::new();
    let push = |out: &mut EncodedValue, bytes: &[u8]| {
        out.extend_from_slice(bytes)
            .map_err(|_| KnxError::out_of_range("encoded_length"))
    };
    match value {
        DptValue::Bool(v) => push(&mut out, &[dpt1::encode_bool(*v)])?,
        DptValue::Control(v) => push(&mut out, &[v.to_byte()])?,
        DptValue::U8(v) => push(&mut out, &[*v])?,
        DptValue::Percent(v) => push(&mut out, &[dpt5::encode_percent(*v)?])?,
        DptValue::I8(v) => push(&mut out, &v.to_be_bytes())?,
        DptValue::U16(v) => push(&mut out, &v.to_be_bytes())?,
        DptValue::I16(v) => push(&mut out, &v.to_be_bytes())?,
        DptValue::Float(v) => push(&mut out, &dpt9::encode_f16(*v)?)?,
        DptValue::U32(v) => push(&mut out, &v.to_be_bytes())?,
        DptValue::I32(v) => push(&mut out, &v.to_be_bytes())?,
        DptValue::F32(v) => push(&mut out, &dpt14::encode_f32(*v))?,
        DptValue::Time(v) => push(&mut out, &v.encode()?)?,
        DptValue::Date(v) => push(&mut out, &v.encode()?)?,
        DptValue::Ascii(v) => push(&mut out, &dpt16::encode_ascii(v)?)?,
        DptValue::Latin1(v) => push(&mut out, &dpt24::encode_latin1(v)?)?,
        DptValue::Rgb(v) => push(&mut out, &v.encode())?,
    }
    Ok(out)
}

/// Decode `data` under `tag`.
///
/// # Errors
///
/// - `FrameTooShort` if `data` is shorter than the type
/// - `Encoding` if `data` is longer than a fixed-width type, or its content
///   is not valid for the type
pub fn decode(tag: DptTag, data: &[u8]) -> Result<DptValue> {
    Ok(match tag {
        DptTag::Boolean => DptValue::Bool(dpt1::decode_bool(data)?),
        DptTag::Dimming => DptValue::Control(ControlCommand::decode(data)?),
        DptTag::Unsigned8 => DptValue::U8(u8::from_be_bytes(fixed(data)?)),
        DptTag::Percent => DptValue::Percent(dpt5::decode_percent(data)?),
        DptTag::Signed8 => DptValue::I8(i8::from_be_bytes(fixed(data)?)),
        DptTag::Unsigned16 => DptValue::U16(u16::from_be_bytes(fixed(data)?)),
        DptTag::Signed16 => DptValue::I16(i16::from_be_bytes(fixed(data)?)),
        DptTag::Float16 => DptValue::Float(dpt9::decode_f16(data)?),
        DptTag::Unsigned32 => DptValue::U32(u32::from_be_bytes(fixed(data)?)),
        DptTag::Signed32 => DptValue::I32(i32::from_be_bytes(fixed(data)?)),
        DptTag::Float32 => DptValue::F32(dpt14::decode_f32(data)?),
        DptTag::Time => DptValue::Time(TimeOfDay::decode(data)?),
        DptTag::Date => DptValue::Date(Date::decode(data)?),
        DptTag::Ascii => DptValue::Ascii(dpt16::decode_ascii(data)?),
        DptTag::Latin1 => DptValue::Latin1(dpt24::decode_latin1(data)?),
        DptTag::Rgb => DptValue::Rgb(Rgb::decode(data)?),
    })
}
