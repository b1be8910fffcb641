//! DPT 3.xxx - 3-bit controlled (dimming and blinds)
//!
//! Control datapoint types for stepwise dimming and blind positioning.
//!
//! ## Format
//!
//! ```text
//! ┌─────────┬─────────────┐
//! │ Control │  Stepcode   │
//! │  (1b)   │    (3b)     │
//! └─────────┴─────────────┘
//!    Bit 3     Bits 0-2
//! ```
//!
//! Stepcode 0 is break/stop; 1-7 select 1, 2, 4 ... 64 intervals.
//!
//! ## Example
//!
//! ```
//! use knx_codec::dpt::{ControlCommand, Dpt3, DptDecode, DptEncode, StepCode};
//!
//! let mut buf = [0u8; 1];
//! let cmd = ControlCommand::new(true, StepCode::Intervals4);
//! Dpt3::Dimming.encode(cmd, &mut buf)?;
//! assert_eq!(buf, [0x0B]);
//! assert_eq!(Dpt3::Dimming.decode(&buf)?, cmd);
//! # Ok::<(), knx_codec::KnxError>(())
//! ```

use crate::bitfield::{get_bits, get_flag, set_bits, set_flag};
use crate::dpt::{fixed, put, DptDecode, DptEncode};
use crate::error::{KnxError, Result};
use core::fmt;

/// DPT 3.xxx 3-bit controlled types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dpt3 {
    /// DPT 3.007 - Dimming control (decrease/increase)
    Dimming,
    /// DPT 3.008 - Blind control (up/down)
    Blind,
}

/// Number of intervals for a step operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum StepCode {
    /// Break/Stop - halts the current operation
    Break = 0,
    /// 1 interval
    Intervals1 = 1,
    /// 2 intervals
    Intervals2 = 2,
    /// 4 intervals
    Intervals4 = 3,
    /// 8 intervals
    Intervals8 = 4,
    /// 16 intervals
    Intervals16 = 5,
    /// 32 intervals
    Intervals32 = 6,
    /// 64 intervals (maximum)
    Intervals64 = 7,
}

impl StepCode {
    const ALL: [StepCode; 8] = [
        StepCode::Break,
        StepCode::Intervals1,
        StepCode::Intervals2,
        StepCode::Intervals4,
        StepCode::Intervals8,
        StepCode::Intervals16,
        StepCode::Intervals32,
        StepCode::Intervals64,
    ];

    /// Convert a 3-bit code to a `StepCode`
    ///
    /// # Errors
    ///
    /// Returns `KnxError::UnsupportedType` if `value` is not in 0-7
    pub fn from_u8(value: u8) -> Result<Self> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or_else(KnxError::unknown_enum_value)
    }

    /// Number of intervals; 0 for `Break`
    pub const fn intervals(self) -> u8 {
        match self {
            StepCode::Break => 0,
            code => 1 << (code as u8 - 1),
        }
    }
}

impl TryFrom<u8> for StepCode {
    type Error = KnxError;

    fn try_from(value: u8) -> Result<Self> {
        Self::from_u8(value)
    }
}

/// Decoded DPT 3 value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlCommand {
    /// Control bit: false = decrease/up, true = increase/down
    pub control: bool,
    /// Stepcode (0-7)
    pub stepcode: StepCode,
}

impl ControlCommand {
    /// Create a command
    pub const fn new(control: bool, stepcode: StepCode) -> Self {
        Self { control, stepcode }
    }

    /// Pack into the low nibble of an octet
    pub const fn to_byte(self) -> u8 {
        set_flag(set_bits(0, 0, 3, self.stepcode as u8), 3, self.control)
    }

    /// Decode one octet; bits 7-4 are ignored.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let [octet] = fixed::<1>(data)?;
        Ok(Self {
            control: get_flag(octet, 3),
            stepcode: StepCode::from_u8(get_bits(octet, 0, 3))?,
        })
    }
}

impl fmt::Display for ControlCommand {
    /// `control,stepcode`, e.g. `1,3`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", u8::from(self.control), self.stepcode as u8)
    }
}

impl core::str::FromStr for ControlCommand {
    type Err = KnxError;

    fn from_str(s: &str) -> Result<Self> {
        let (control, step) = s.split_once(',').ok_or_else(KnxError::malformed)?;
        let control = crate::dpt::dpt1::parse_bool(control.trim())?;
        let step: u8 = step.trim().parse().map_err(|_| KnxError::malformed())?;
        if step > 7 {
            return Err(KnxError::out_of_range("stepcode"));
        }
        Ok(Self::new(control, StepCode::from_u8(step)?))
    }
}

impl Dpt3 {
    /// Get the DPT identifier string (e.g., "3.007")
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt3::Dimming => "3.007",
            Dpt3::Blind => "3.008",
        }
    }

    /// Step types have no unit
    pub const fn unit(&self) -> &'static str {
        ""
    }

    /// Labels as (`control_false_label`, `control_true_label`)
    pub const fn control_labels(&self) -> (&'static str, &'static str) {
        match self {
            Dpt3::Dimming => ("decrease", "increase"),
            Dpt3::Blind => ("up", "down"),
        }
    }
}

impl DptEncode<ControlCommand> for Dpt3 {
    fn encode(&self, value: ControlCommand, buf: &mut [u8]) -> Result<usize> {
        put(buf, &[value.to_byte()])
    }
}

impl DptDecode<ControlCommand> for Dpt3 {
    fn decode(&self, data: &[u8]) -> Result<ControlCommand> {
        ControlCommand::decode(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_values() {
        let cases = [
            (false, StepCode::Break, 0x00),
            (true, StepCode::Break, 0x08),
            (false, StepCode::Intervals1, 0x01),
            (false, StepCode::Intervals4, 0x03),
            (true, StepCode::Intervals1, 0x09),
            (true, StepCode::Intervals4, 0x0B),
            (true, StepCode::Intervals64, 0x0F),
        ];
        for (control, step, byte) in cases {
            assert_eq!(ControlCommand::new(control, step).to_byte(), byte);
        }
    }

    #[test]
    fn test_decode_all_combinations() {
        for byte in 0..16u8 {
            let cmd = ControlCommand::decode(&[byte]).unwrap();
            assert_eq!(cmd.control, byte & 0x08 != 0);
            assert_eq!(cmd.stepcode as u8, byte & 0x07);
            assert_eq!(cmd.to_byte(), byte);
        }
    }

    #[test]
    fn test_decode_ignores_upper_bits() {
        let cmd = Dpt3::Blind.decode(&[0xF9]).unwrap();
        assert_eq!(cmd, ControlCommand::new(true, StepCode::Intervals1));
    }

    #[test]
    fn test_decode_empty() {
        assert!(Dpt3::Dimming.decode(&[]).is_err());
    }

    #[test]
    fn test_stepcode() {
        assert_eq!(StepCode::from_u8(7).unwrap(), StepCode::Intervals64);
        assert!(StepCode::try_from(8).is_err());
        let intervals: [u8; 8] = [0, 1, 2, 4, 8, 16, 32, 64];
        for (code, expected) in StepCode::ALL.iter().zip(intervals) {
            assert_eq!(code.intervals(), expected);
        }
    }

    #[test]
    fn test_trait_encode() {
        let mut buf = [0u8; 1];
        let cmd = ControlCommand::new(false, StepCode::Intervals2);
        assert_eq!(Dpt3::Blind.encode(cmd, &mut buf).unwrap(), 1);
        assert_eq!(buf[0], 0x02);
        assert!(Dpt3::Blind.encode(cmd, &mut []).is_err());
    }

    #[test]
    fn test_text_form() {
        let cmd: ControlCommand = "1,3".parse().unwrap();
        assert_eq!(cmd, ControlCommand::new(true, StepCode::Intervals4));
        assert_eq!(cmd.to_string(), "1,3");
        assert!("1,8".parse::<ControlCommand>().is_err());
        assert!("13".parse::<ControlCommand>().is_err());
    }

    #[test]
    fn test_labels() {
        assert_eq!(Dpt3::Dimming.identifier(), "3.007");
        assert_eq!(Dpt3::Blind.control_labels(), ("up", "down"));
    }
}
