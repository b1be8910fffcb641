//! DPT 232.600 - RGB colour (3 bytes)

use core::fmt;

use crate::dpt::fixed;
use crate::error::{KnxError, Result};

/// Red, green and blue channels, one octet each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn encode(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let [r, g, b] = fixed::<3>(data)?;
        Ok(Self::new(r, g, b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

impl core::str::FromStr for Rgb {
    type Err = KnxError;

    /// Parses `r,g,b` with each channel 0-255.
    fn from_str(s: &str) -> Result<Self> {
        let mut channels = [0u8; 3];
        let mut fields = s.trim().split(',');
        for slot in &mut channels {
            let part = fields.next().ok_or_else(KnxError::malformed)?;
            *slot = crate::dpt::integer::parse_int(part, "rgb")?;
        }
        if fields.next().is_some() {
            return Err(KnxError::malformed());
        }
        Ok(Self::new(channels[0], channels[1], channels[2]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode() {
        let c = Rgb::new(0xFF, 0x80, 0x00);
        assert_eq!(c.encode(), [0xFF, 0x80, 0x00]);
        assert_eq!(Rgb::decode(&[0xFF, 0x80, 0x00]).unwrap(), c);
        assert!(Rgb::decode(&[1, 2]).is_err());
    }

    #[test]
    fn test_text() {
        assert_eq!("255, 128, 0".parse::<Rgb>().unwrap(), Rgb::new(255, 128, 0));
        assert_eq!(Rgb::new(1, 2, 3).to_string(), "1,2,3");
        assert!(matches!("256,0,0".parse::<Rgb>(), Err(KnxError::Range(_))));
        assert!("1,2".parse::<Rgb>().is_err());
        assert!("1,2,3,4".parse::<Rgb>().is_err());
    }
}
