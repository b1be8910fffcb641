#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![doc = include_str!("../README.md")]

//! ## Crate layout
//!
//! - [`bitfield`] - sub-byte field helpers
//! - [`protocol`] - control fields, APDU framing, KNXnet/IP datagrams
//! - [`addressing`] - individual and group addresses
//! - [`dpt`] - Datapoint Type codecs
//! - [`config`] - defaults for outgoing telegrams
//! - [`error`] - [`KnxError`]
//!
//! The functions at the crate root cover the common paths in one call each.

pub mod addressing;
pub mod bitfield;
pub mod config;
pub mod dpt;
pub mod error;
pub mod protocol;

// Macro modules (must be declared before use)
#[macro_use]
pub mod macros;
#[macro_use]
pub mod logging;

use core::str::FromStr;

#[doc(inline)]
pub use addressing::{AddressKind, AddressText, GroupAddress, GroupLevel, IndividualAddress};
#[doc(inline)]
pub use config::CodecConfig;
#[doc(inline)]
pub use dpt::{DptDecode, DptEncode, DptTag, DptValue, EncodedValue};
#[doc(inline)]
pub use error::{KnxError, Result};
#[doc(inline)]
pub use protocol::datagram::{Datagram, DatagramBuilder, FrameBytes};

/// Encode `value` under the DPT named by `tag` (e.g. `"9.001"`).
///
/// ```
/// use knx_codec::{encode_value, DptValue};
///
/// assert_eq!(encode_value("9", &DptValue::Float(21.5))?.as_slice(), &[0x0C, 0x33]);
/// # Ok::<(), knx_codec::KnxError>(())
/// ```
pub fn encode_value(tag: &str, value: &DptValue) -> Result<EncodedValue> {
    dpt::encode(DptTag::from_str(tag)?, value)
}

/// Decode `data` under the DPT named by `tag`.
pub fn decode_value(tag: &str, data: &[u8]) -> Result<DptValue> {
    dpt::decode(DptTag::from_str(tag)?, data)
}

/// Encode address text; the layout is inferred from its shape.
///
/// ```
/// assert_eq!(knx_codec::encode_address("1.2.3")?, [0x12, 0x03]);
/// assert_eq!(knx_codec::encode_address("1/100")?, [0x08, 0x64]);
/// # Ok::<(), knx_codec::KnxError>(())
/// ```
pub fn encode_address(text: &str) -> Result<[u8; 2]> {
    addressing::parse_address(text).map(|(_, bytes)| bytes)
}

/// Format two address octets in the layout given by `kind`.
pub fn decode_address(bytes: &[u8], kind: AddressKind) -> Result<AddressText> {
    addressing::format_address(bytes, kind)
}

/// Write `datagram` into `buf`.
pub fn build_frame(datagram: &Datagram, buf: &mut [u8]) -> Result<usize> {
    datagram.build(buf)
}

/// Parse a received KNXnet/IP datagram.
pub fn parse_frame(bytes: &[u8]) -> Result<Datagram> {
    Datagram::parse(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_helpers() {
        let bytes = encode_value("5.001", &DptValue::Percent(100.0)).unwrap();
        assert_eq!(bytes.as_slice(), &[0xFF]);
        assert_eq!(decode_value("5.001", &bytes).unwrap(), DptValue::Percent(100.0));
        assert!(encode_value("2", &DptValue::Bool(true)).is_err());
    }

    #[test]
    fn test_address_helpers() {
        let bytes = encode_address("1/2/3").unwrap();
        assert_eq!(decode_address(&bytes, AddressKind::Group3Level).unwrap().as_str(), "1/2/3");
        assert_eq!(decode_address(&bytes, AddressKind::Group2Level).unwrap().as_str(), "1/515");
        assert!(encode_address("99.0.0").is_err());
    }

    #[test]
    fn test_frame_helpers() {
        let datagram = DatagramBuilder::new(&CodecConfig::default())
            .group_read("0/0/1")
            .unwrap();
        let mut buf = [0u8; 64];
        let len = build_frame(&datagram, &mut buf).unwrap();
        assert_eq!(parse_frame(&buf[..len]).unwrap(), datagram);
        assert!(build_frame(&datagram, &mut buf[..4]).is_err());
    }
}
