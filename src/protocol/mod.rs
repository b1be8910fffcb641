//! KNXnet/IP protocol structures.
//!
//! Leaf first: the link-layer [`control`] octets, [`apdu`] framing, the
//! [`constants`] tables and the [`datagram`] that puts them together.

pub mod apdu;
pub mod constants;
pub mod control;
pub mod datagram;

pub use apdu::{Apci, Apdu, ApduData, Tpci};
pub use constants::{MessageCode, ServiceType};
pub use control::{AddressType, ControlField, ExtendedControlField, FrameType, Priority};
pub use datagram::{
    CemiFrame, ConnectionHeader, Datagram, DatagramBuilder, Destination, KnxnetIpHeader,
};
