//! DPT 10.001 - Time of Day (3 bytes)
//!
//! ```text
//! Octet 0: DDDH HHHH   day of week (unused here), hour 0-23
//! Octet 1: 00MM MMMM   minute 0-59
//! Octet 2: 00SS SSSS   second 0-59
//! ```
//!
//! The day-of-week bits are written as zero and ignored on decode.

use core::fmt;

use crate::bitfield::get_bits;
use crate::dpt::fixed;
use crate::error::{KnxError, Result};

/// Hour, minute and second
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
    second: u8,
}

impl TimeOfDay {
    /// # Errors
    ///
    /// `Range` naming the first field outside 0-23 / 0-59 / 0-59.
    pub fn new(hour: u8, minute: u8, second: u8) -> Result<Self> {
        if hour > 23 {
            return Err(KnxError::out_of_range("hour"));
        }
        if minute > 59 {
            return Err(KnxError::out_of_range("minute"));
        }
        if second > 59 {
            return Err(KnxError::out_of_range("second"));
        }
        Ok(Self {
            hour,
            minute,
            second,
        })
    }

    pub const fn hour(self) -> u8 {
        self.hour
    }

    pub const fn minute(self) -> u8 {
        self.minute
    }

    pub const fn second(self) -> u8 {
        self.second
    }

    /// Encode into three octets.
    ///
    /// Deserialized values bypass [`Self::new`], so the fields are checked
    /// again here.
    pub fn encode(&self) -> Result<[u8; 3]> {
        let checked = Self::new(self.hour, self.minute, self.second)?;
        Ok([
            checked.hour & 0x1F,
            checked.minute & 0x3F,
            checked.second & 0x3F,
        ])
    }

    /// Decode three octets, rejecting impossible times.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let [h, m, s] = fixed::<3>(data)?;
        Self::new(get_bits(h, 0, 5), get_bits(m, 0, 6), get_bits(s, 0, 6))
            .map_err(|_| KnxError::malformed())
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.hour, self.minute, self.second)
    }
}

impl core::str::FromStr for TimeOfDay {
    type Err = KnxError;

    /// Parses `H:M:S`, one or two digits per part.
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = [0u8; 3];
        let mut fields = s.trim().split(':');
        for slot in &mut parts {
            let part = fields.next().ok_or_else(KnxError::malformed)?;
            if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(KnxError::malformed());
            }
            *slot = part.parse().map_err(|_| KnxError::malformed())?;
        }
        if fields.next().is_some() {
            return Err(KnxError::malformed());
        }
        Self::new(parts[0], parts[1], parts[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        assert_eq!(TimeOfDay::new(0, 0, 0).unwrap().encode().unwrap(), [0, 0, 0]);
        assert_eq!(
            TimeOfDay::new(23, 59, 59).unwrap().encode().unwrap(),
            [0x17, 0x3B, 0x3B]
        );
        assert_eq!(
            TimeOfDay::new(12, 30, 5).unwrap().encode().unwrap(),
            [0x0C, 0x1E, 0x05]
        );
    }

    #[test]
    fn test_decode_ignores_weekday() {
        // Weekday 3 (Wednesday) in the top bits of octet 0
        let t = TimeOfDay::decode(&[0x6C, 0x1E, 0x05]).unwrap();
        assert_eq!((t.hour(), t.minute(), t.second()), (12, 30, 5));
    }

    #[test]
    fn test_validation() {
        match TimeOfDay::new(24, 0, 0) {
            Err(KnxError::Range(e)) => assert_eq!(e.field(), "hour"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(TimeOfDay::new(0, 60, 0).is_err());
        assert!(TimeOfDay::new(0, 0, 60).is_err());
        assert!(matches!(
            TimeOfDay::decode(&[0x18, 0, 0]),
            Err(KnxError::Encoding(_))
        ));
        assert!(matches!(
            TimeOfDay::decode(&[0, 0]),
            Err(KnxError::FrameTooShort(_))
        ));
    }

    #[test]
    fn test_text() {
        let t: TimeOfDay = "07:05:00".parse().unwrap();
        assert_eq!(t.to_string(), "7:5:0");
        assert_eq!("23:59:59".parse::<TimeOfDay>().unwrap(), TimeOfDay::new(23, 59, 59).unwrap());
        for bad in ["", "7:5", "7:5:0:0", "007:5:0", "a:b:c", "24:00:00"] {
            assert!(bad.parse::<TimeOfDay>().is_err(), "{bad:?}");
        }
    }
}
