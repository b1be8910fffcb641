//! DPT 1: one bit.
//!
//! The value lives in bit 0 of a single octet. Inside a group telegram that
//! octet is folded into the low bits of the APCI octet, so a switch telegram
//! carries no separate payload.
//!
//! Subtypes differ only in what the two states are called; see
//! [`Dpt1::labels`].
//!
//! ## Example
//!
//! ```
//! use knx_codec::dpt::{Dpt1, DptDecode, DptEncode};
//!
//! let mut buf = [0u8; 1];
//! Dpt1::Switch.encode(true, &mut buf)?;
//! assert_eq!(buf, [0x01]);
//! assert!(Dpt1::Switch.decode(&buf)?);
//! # Ok::<(), knx_codec::KnxError>(())
//! ```

use crate::dpt::{fixed, put, DptDecode, DptEncode};
use crate::error::{KnxError, Result};

/// DPT 1.xxx Boolean types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dpt1 {
    /// DPT 1.001 - Switch (off/on)
    Switch,
    /// DPT 1.002 - Bool (false/true)
    Bool,
    /// DPT 1.003 - Enable (disable/enable)
    Enable,
    /// DPT 1.005 - Alarm (no alarm/alarm)
    Alarm,
    /// DPT 1.007 - Step (decrease/increase)
    Step,
    /// DPT 1.008 - UpDown (up/down)
    UpDown,
    /// DPT 1.009 - OpenClose (open/close)
    OpenClose,
    /// DPT 1.010 - Start (stop/start)
    Start,
    /// DPT 1.011 - State (inactive/active)
    State,
}

/// Encode a boolean as `0x01` / `0x00`.
#[inline(always)]
pub const fn encode_bool(value: bool) -> u8 {
    value as u8
}

/// Decode one octet; only bit 0 is significant.
pub fn decode_bool(data: &[u8]) -> Result<bool> {
    let [octet] = fixed::<1>(data)?;
    Ok(octet & 0x01 != 0)
}

/// Parse `1`/`0`, `true`/`false` or `on`/`off` (case-insensitive).
pub(crate) fn parse_bool(text: &str) -> Result<bool> {
    const TRUE: [&str; 3] = ["1", "true", "on"];
    const FALSE: [&str; 3] = ["0", "false", "off"];
    if TRUE.iter().any(|t| t.eq_ignore_ascii_case(text)) {
        Ok(true)
    } else if FALSE.iter().any(|t| t.eq_ignore_ascii_case(text)) {
        Ok(false)
    } else {
        Err(KnxError::malformed())
    }
}

impl DptEncode<bool> for Dpt1 {
    fn encode(&self, value: bool, buf: &mut [u8]) -> Result<usize> {
        put(buf, &[encode_bool(value)])
    }
}

impl DptDecode<bool> for Dpt1 {
    fn decode(&self, data: &[u8]) -> Result<bool> {
        decode_bool(data)
    }
}

impl Dpt1 {
    /// Get the DPT identifier string (e.g., "1.001")
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt1::Switch => "1.001",
            Dpt1::Bool => "1.002",
            Dpt1::Enable => "1.003",
            Dpt1::Alarm => "1.005",
            Dpt1::Step => "1.007",
            Dpt1::UpDown => "1.008",
            Dpt1::OpenClose => "1.009",
            Dpt1::Start => "1.010",
            Dpt1::State => "1.011",
        }
    }

    /// Boolean types have no unit
    pub const fn unit(&self) -> &'static str {
        ""
    }

    /// Semantic labels as `(false_label, true_label)`
    pub const fn labels(&self) -> (&'static str, &'static str) {
        match self {
            Dpt1::Switch => ("off", "on"),
            Dpt1::Bool => ("false", "true"),
            Dpt1::Enable => ("disable", "enable"),
            Dpt1::Alarm => ("no alarm", "alarm"),
            Dpt1::Step => ("decrease", "increase"),
            Dpt1::UpDown => ("up", "down"),
            Dpt1::OpenClose => ("open", "close"),
            Dpt1::Start => ("stop", "start"),
            Dpt1::State => ("inactive", "active"),
        }
    }
}
