//! DPT 11.001 - Date (3 bytes)
//!
//! ```text
//! Octet 0: 000D DDDD   day 1-31
//! Octet 1: 0000 MMMM   month 1-12
//! Octet 2: 0YYY YYYY   year offset from 1900
//! ```
//!
//! Only the 1900 based reading of the year octet is used, so the
//! representable years are 1900 through 2027.

use core::fmt;

use crate::bitfield::get_bits;
use crate::dpt::fixed;
use crate::error::{KnxError, Result};

/// First representable year
pub const MIN_YEAR: u16 = 1900;
/// Last representable year
pub const MAX_YEAR: u16 = 2027;

/// Calendar date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Date {
    year: u16,
    month: u8,
    day: u8,
}

impl Date {
    /// # Errors
    ///
    /// `Range` naming the first field out of bounds. Days are checked
    /// against 1-31 only, not against the month length.
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(KnxError::out_of_range("year"));
        }
        if !(1..=12).contains(&month) {
            return Err(KnxError::out_of_range("month"));
        }
        if !(1..=31).contains(&day) {
            return Err(KnxError::out_of_range("day"));
        }
        Ok(Self { year, month, day })
    }

    pub const fn year(self) -> u16 {
        self.year
    }

    pub const fn month(self) -> u8 {
        self.month
    }

    pub const fn day(self) -> u8 {
        self.day
    }

    pub fn encode(&self) -> Result<[u8; 3]> {
        let checked = Self::new(self.year, self.month, self.day)?;
        Ok([
            checked.day & 0x1F,
            checked.month & 0x0F,
            (checked.year - MIN_YEAR) as u8 & 0x7F,
        ])
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let [d, m, y] = fixed::<3>(data)?;
        let year = MIN_YEAR + u16::from(get_bits(y, 0, 7));
        Self::new(year, get_bits(m, 0, 4), get_bits(d, 0, 5)).map_err(|_| KnxError::malformed())
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl core::str::FromStr for Date {
    type Err = KnxError;

    /// Parses `YYYY-MM-DD`.
    fn from_str(s: &str) -> Result<Self> {
        let mut fields = s.trim().split('-');
        let mut next = |width: usize| -> Result<u16> {
            let part = fields.next().ok_or_else(KnxError::malformed)?;
            if part.is_empty() || part.len() > width || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(KnxError::malformed());
            }
            part.parse().map_err(|_| KnxError::malformed())
        };
        let year = next(4)?;
        let month = next(2)?;
        let day = next(2)?;
        if fields.next().is_some() {
            return Err(KnxError::malformed());
        }
        Self::new(year, month as u8, day as u8)
    }
}
