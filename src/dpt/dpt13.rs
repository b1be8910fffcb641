//! DPT 13.xxx - 4-byte Signed Value (4 bytes)
//!
//! 32-bit signed datapoint types, big-endian two's complement.
//!
//! ## Example
//!
//! ```
//! use knx_codec::dpt::{Dpt13, DptDecode, DptEncode};
//!
//! let wh = Dpt13::ActiveEnergy.decode(&[0x00, 0x07, 0xA1, 0x20])?;
//! assert_eq!(wh, 500_000);
//!
//! // Reverse flow is negative
//! let mut buf = [0u8; 4];
//! Dpt13::FlowRate.encode(-1000, &mut buf)?;
//! assert_eq!(buf, [0xFF, 0xFF, 0xFC, 0x18]);
//! # Ok::<(), knx_codec::KnxError>(())
//! ```

use crate::dpt::{fixed, put, DptDecode, DptEncode};
use crate::error::Result;

/// DPT 13.xxx 32-bit signed types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dpt13 {
    /// DPT 13.001 - Counter Pulses (signed)
    Counter,
    /// DPT 13.002 - Flow Rate (l/h)
    FlowRate,
    /// DPT 13.010 - Active Energy (Wh)
    ActiveEnergy,
    /// DPT 13.011 - Apparent Energy (`VAh`)
    ApparentEnergy,
    /// DPT 13.012 - Reactive Energy (`VArh`)
    ReactiveEnergy,
    /// DPT 13.013 - Active Energy (kWh)
    ActiveEnergyKwh,
    /// DPT 13.100 - Long Delta Time Period (s)
    LongDeltaTimeSec,
}

impl Dpt13 {
    /// Get the DPT identifier string (e.g., "13.001")
    #[inline]
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt13::Counter => "13.001",
            Dpt13::FlowRate => "13.002",
            Dpt13::ActiveEnergy => "13.010",
            Dpt13::ApparentEnergy => "13.011",
            Dpt13::ReactiveEnergy => "13.012",
            Dpt13::ActiveEnergyKwh => "13.013",
            Dpt13::LongDeltaTimeSec => "13.100",
        }
    }

    /// Get the unit string for this DPT
    #[inline]
    pub const fn unit(&self) -> &'static str {
        match self {
            Dpt13::Counter => "pulses",
            Dpt13::FlowRate => "l/h",
            Dpt13::ActiveEnergy => "Wh",
            Dpt13::ApparentEnergy => "VAh",
            Dpt13::ReactiveEnergy => "VArh",
            Dpt13::ActiveEnergyKwh => "kWh",
            Dpt13::LongDeltaTimeSec => "s",
        }
    }
}

impl DptEncode<i32> for Dpt13 {
    #[inline]
    fn encode(&self, value: i32, buf: &mut [u8]) -> Result<usize> {
        put(buf, &value.to_be_bytes())
    }
}

impl DptDecode<i32> for Dpt13 {
    #[inline]
    fn decode(&self, data: &[u8]) -> Result<i32> {
        Ok(i32::from_be_bytes(fixed(data)?))
    }
}
