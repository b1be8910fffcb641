//! APDU length classes and payload packing.
//!
//! ```text
//! Octet 0: TTTT TTAA   TPCI (6 bits), APCI bits 9-8
//! Octet 1: AADD DDDD   APCI bits 7-6, packed data (bits 5-0)
//! Octet 2+:            long data
//! ```
//!
//! A payload whose only octet is below 0x3F shares octet 1 with the APCI.
//! Anything else starts at octet 2. The length class written into the cEMI
//! frame tells the receiver which of the two layouts to expect.
//!
//! ## Example
//!
//! ```
//! use knx_codec::protocol::apdu::{Apci, Apdu};
//!
//! let apdu = Apdu::with_data(Apci::GroupValueWrite, &[0x01])?;
//! assert_eq!(apdu.as_bytes(), &[0x00, 0x81]);
//! assert_eq!(apdu.data_length(), 1);
//! # Ok::<(), knx_codec::KnxError>(())
//! ```

use crate::bitfield::{get_bits, set_bits};
use crate::dpt::{self, dpt9, DptTag, DptValue};
use crate::error::{KnxError, Result};
use crate::protocol::constants::MAX_APDU_LEN;

/// Largest value that still packs into the APCI octet
const SHORT_LIMIT: u8 = 0x3F;
const SHORT_MASK: u8 = 0x3F;

/// APDU octets
pub type ApduBytes = heapless::Vec<u8, MAX_APDU_LEN>;

// =============================================================================
// Length class
// =============================================================================

/// Length class of `payload`.
///
/// - 0 for an empty payload
/// - 1 for a single octet below 0x3F
/// - 3 for exactly four octets (carried as a 2-octet float)
/// - `len` when the first octet is below 0x3F, otherwise `len + 1`
///
/// # Errors
///
/// `Range` if the class does not fit the one-octet length field.
pub fn data_length(payload: &[u8]) -> Result<u8> {
    let class = match payload {
        [] => 0,
        [b] if *b < SHORT_LIMIT => 1,
        [_, _, _, _] => 3,
        [first, ..] if *first < SHORT_LIMIT => payload.len(),
        _ => payload.len() + 1,
    };
    u8::try_from(class).map_err(|_| KnxError::out_of_range("data_length"))
}

/// Write `payload` into `frame`, where `frame[offset]` is the APCI low octet.
///
/// # Errors
///
/// - `FrameTooShort` if the payload does not fit behind `offset`
/// - `Encoding` / `Range` if a 4-octet payload is not a representable float
pub fn write_data(frame: &mut [u8], payload: &[u8], offset: usize) -> Result<()> {
    match payload {
        [] => Ok(()),
        [b] if *b < SHORT_LIMIT => {
            KnxError::ensure_len(frame, offset + 1)?;
            frame[offset] |= *b;
            Ok(())
        }
        [b] => {
            KnxError::ensure_len(frame, offset + 2)?;
            frame[offset + 1] = *b;
            Ok(())
        }
        [a, b, c, d] => {
            let packed = dpt9::encode_f16(f32::from_be_bytes([*a, *b, *c, *d]))?;
            KnxError::ensure_len(frame, offset + 3)?;
            frame[offset + 1..=offset + 2].copy_from_slice(&packed);
            Ok(())
        }
        [first, rest @ ..] if *first < SHORT_LIMIT => {
            KnxError::ensure_len(frame, offset + 1 + rest.len())?;
            frame[offset] |= *first;
            frame[offset + 1..=offset + rest.len()].copy_from_slice(rest);
            Ok(())
        }
        _ => {
            KnxError::ensure_len(frame, offset + 1 + payload.len())?;
            frame[offset + 1..=offset + payload.len()].copy_from_slice(payload);
            Ok(())
        }
    }
}

/// Payload as located by its length class
#[derive(Debug, Clone, PartialEq)]
pub enum ApduData {
    /// Class 0
    Empty,
    /// Class 1, the low 6 bits of the APCI octet
    Small(u8),
    /// Class 2, a single Latin-1 character at octet 2
    Char(char),
    /// Class 3, a 2-octet float at octets 2-3
    Float(f32),
    /// Any other class, the whole APDU
    Raw(ApduBytes),
}

/// Read the payload of `apdu` for the given length class.
///
/// This only decides where the bytes are; interpreting them belongs to
/// [`crate::dpt`].
pub fn read_data(apdu: &[u8], length_class: u8) -> Result<ApduData> {
    Ok(match length_class {
        0 => ApduData::Empty,
        1 => {
            KnxError::ensure_len(apdu, 2)?;
            ApduData::Small(apdu[1] & SHORT_MASK)
        }
        2 => {
            KnxError::ensure_len(apdu, 3)?;
            ApduData::Char(char::from(apdu[2]))
        }
        3 => {
            KnxError::ensure_len(apdu, 4)?;
            ApduData::Float(dpt9::decode_f16(&apdu[2..4])?)
        }
        _ => ApduData::Raw(ApduBytes::from_slice(apdu).map_err(|_| KnxError::length_mismatch())?),
    })
}

// =============================================================================
// TPCI / APCI
// =============================================================================

/// TPCI (Transport Layer Protocol Control Information)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tpci {
    /// Unnumbered Data Packet, used for group communication
    #[default]
    UnnumberedData,
    /// Numbered Data Packet with sequence number
    NumberedData {
        /// Sequence number (0-15)
        sequence: u8,
    },
    /// Unnumbered Control Packet
    UnnumberedControl,
    /// Numbered Control Packet with sequence number
    NumberedControl {
        /// Sequence number (0-15)
        sequence: u8,
    },
}

impl Tpci {
    /// Parse the TPCI from octet 0 of the APDU
    pub const fn from_byte(byte: u8) -> Self {
        let sequence = get_bits(byte, 2, 4);
        match get_bits(byte, 6, 2) {
            0b00 => Self::UnnumberedData,
            0b01 => Self::NumberedData { sequence },
            0b10 => Self::UnnumberedControl,
            _ => Self::NumberedControl { sequence },
        }
    }

    /// Octet 0 with the APCI bits cleared
    pub const fn to_byte(self) -> u8 {
        let (kind, sequence) = match self {
            Self::UnnumberedData => (0b00, 0),
            Self::NumberedData { sequence } => (0b01, sequence),
            Self::UnnumberedControl => (0b10, 0),
            Self::NumberedControl { sequence } => (0b11, sequence),
        };
        set_bits(set_bits(0, 6, 2, kind), 2, 4, sequence)
    }

    /// Check if this is a data packet
    pub const fn is_data(self) -> bool {
        matches!(self, Self::UnnumberedData | Self::NumberedData { .. })
    }
}

/// APCI (Application Layer Protocol Control Information)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Apci {
    /// `A_GroupValue_Read`
    GroupValueRead,
    /// `A_GroupValue_Response`
    GroupValueResponse,
    /// `A_GroupValue_Write`
    GroupValueWrite,
    /// Individual Address Write
    IndividualAddressWrite,
    /// Individual Address Read
    IndividualAddressRead,
    /// Individual Address Response
    IndividualAddressResponse,
    /// ADC Read
    AdcRead,
    /// ADC Response
    AdcResponse,
    /// Memory Read
    MemoryRead,
    /// Memory Response
    MemoryResponse,
    /// Memory Write
    MemoryWrite,
    /// Device Descriptor Read
    DeviceDescriptorRead,
    /// Device Descriptor Response
    DeviceDescriptorResponse,
    /// Any other 4-bit service code, as its 10-bit value
    Unknown(u16),
}

impl Apci {
    /// Parse the APCI from octets 0 and 1, ignoring the packed data bits.
    pub const fn from_bytes(byte1: u8, byte2: u8) -> Self {
        Self::from_u16(((byte1 as u16 & 0x03) << 8) | (byte2 as u16 & 0xC0))
    }

    /// Parse a 10-bit APCI value.
    pub const fn from_u16(value: u16) -> Self {
        match value & 0x3C0 {
            0x000 => Self::GroupValueRead,
            0x040 => Self::GroupValueResponse,
            0x080 => Self::GroupValueWrite,
            0x0C0 => Self::IndividualAddressWrite,
            0x100 => Self::IndividualAddressRead,
            0x140 => Self::IndividualAddressResponse,
            0x180 => Self::AdcRead,
            0x1C0 => Self::AdcResponse,
            0x200 => Self::MemoryRead,
            0x240 => Self::MemoryResponse,
            0x280 => Self::MemoryWrite,
            0x300 => Self::DeviceDescriptorRead,
            0x340 => Self::DeviceDescriptorResponse,
            other => Self::Unknown(other),
        }
    }

    /// 10-bit APCI value
    pub const fn to_u16(self) -> u16 {
        match self {
            Self::GroupValueRead => 0x000,
            Self::GroupValueResponse => 0x040,
            Self::GroupValueWrite => 0x080,
            Self::IndividualAddressWrite => 0x0C0,
            Self::IndividualAddressRead => 0x100,
            Self::IndividualAddressResponse => 0x140,
            Self::AdcRead => 0x180,
            Self::AdcResponse => 0x1C0,
            Self::MemoryRead => 0x200,
            Self::MemoryResponse => 0x240,
            Self::MemoryWrite => 0x280,
            Self::DeviceDescriptorRead => 0x300,
            Self::DeviceDescriptorResponse => 0x340,
            Self::Unknown(val) => val & 0x3C0,
        }
    }

    /// Check if this is one of the three group value services
    pub const fn is_group_value(self) -> bool {
        matches!(
            self,
            Self::GroupValueRead | Self::GroupValueResponse | Self::GroupValueWrite
        )
    }
}

// =============================================================================
// Apdu
// =============================================================================

/// An APDU together with its length class.
///
/// The class is kept next to the octets because it is what goes on the
/// wire; [`Self::with_data`] derives it from the payload, and
/// [`Self::with_value`] from the number of octets after octet 0.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Apdu {
    octets: ApduBytes,
    data_length: u8,
}

impl Apdu {
    /// Two octet APDU with no payload.
    pub fn new(tpci: Tpci, apci: Apci) -> Self {
        let apci = apci.to_u16();
        let octets =
            ApduBytes::from_slice(&[tpci.to_byte() | (apci >> 8) as u8, apci as u8 & 0xC0])
                .unwrap_or_default();
        Self {
            octets,
            data_length: 0,
        }
    }

    /// Pack `payload` behind an unnumbered `apci` using [`write_data`].
    pub fn with_data(apci: Apci, payload: &[u8]) -> Result<Self> {
        let header = Self::new(Tpci::UnnumberedData, apci);
        let class = data_length(payload)?;
        let mut frame = [0u8; MAX_APDU_LEN];
        frame[..2].copy_from_slice(&header.octets);
        write_data(&mut frame, payload, 1)?;
        let used = (usize::from(class) + 1).max(2);
        KnxError::ensure_len(&frame, used)?;
        Ok(Self {
            octets: ApduBytes::from_slice(&frame[..used])
                .map_err(|_| KnxError::out_of_range("apdu_length"))?,
            data_length: class,
        })
    }

    /// Encode `value` under `tag` behind an unnumbered `apci`.
    ///
    /// DPT 1 and DPT 3 travel in the low six bits of octet 1; every other
    /// type is appended from octet 2.
    pub fn with_value(apci: Apci, tag: DptTag, value: &DptValue) -> Result<Self> {
        let encoded = dpt::encode(tag, value)?;
        let mut apdu = Self::new(Tpci::UnnumberedData, apci);
        if tag.is_short() {
            let [small] = encoded.as_slice() else {
                return Err(KnxError::length_mismatch());
            };
            apdu.octets[1] |= small & SHORT_MASK;
            apdu.data_length = 1;
        } else {
            apdu.octets
                .extend_from_slice(&encoded)
                .map_err(|_| KnxError::out_of_range("apdu_length"))?;
            apdu.data_length = (apdu.octets.len() - 1) as u8;
        }
        Ok(apdu)
    }

    /// Wrap received octets.
    pub fn from_octets(octets: &[u8], data_length: u8) -> Result<Self> {
        KnxError::ensure_len(octets, 2)?;
        Ok(Self {
            octets: ApduBytes::from_slice(octets).map_err(|_| KnxError::length_mismatch())?,
            data_length,
        })
    }

    /// Number of APDU octets that follow a given length class on the wire
    pub fn wire_len(data_length: u8) -> usize {
        (usize::from(data_length) + 1).max(2)
    }

    pub fn tpci(&self) -> Tpci {
        Tpci::from_byte(self.octets[0])
    }

    pub fn apci(&self) -> Apci {
        Apci::from_bytes(self.octets[0], self.octets[1])
    }

    /// Length class written into the cEMI data length octet
    pub fn data_length(&self) -> u8 {
        self.data_length
    }

    /// Long-form payload, from octet 2 on
    pub fn payload(&self) -> &[u8] {
        &self.octets[2..]
    }

    /// Data packed into the low six bits of octet 1
    pub fn short_value(&self) -> u8 {
        self.octets[1] & SHORT_MASK
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.octets
    }

    pub fn len(&self) -> usize {
        self.octets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.octets.is_empty()
    }

    /// Structural payload for this APDU's length class.
    pub fn read_data(&self) -> Result<ApduData> {
        read_data(&self.octets, self.data_length)
    }

    /// Decode the payload as `tag`.
    ///
    /// DPT 1 and 3 always come from octet 1. Other one-octet types come from
    /// octet 1 when the length class says the value was packed there.
    pub fn value(&self, tag: DptTag) -> Result<DptValue> {
        let packed = self.data_length == 1 && tag.size() == Some(1);
        if tag.is_short() || packed {
            dpt::decode(tag, &[self.short_value()])
        } else {
            dpt::decode(tag, self.payload())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dpt::{ControlCommand, StepCode};

    #[test]
    fn test_data_length_classes() {
        let cases: [(&[u8], u8); 11] = [
            (&[], 0),
            (&[0x00], 1),
            (&[0x3E], 1),
            (&[0x3F], 2),
            (&[0xFF], 2),
            (&[0x01, 0x02, 0x03, 0x04], 3),
            (&[0xFF, 0x02, 0x03, 0x04], 3),
            (&[0x01, 0x02], 2),
            (&[0x40, 0x02], 3),
            (&[0x01, 0x02, 0x03], 3),
            (&[0x40, 0x02, 0x03], 4),
        ];
        for (payload, class) in cases {
            assert_eq!(data_length(payload).unwrap(), class, "{payload:02X?}");
        }
    }

    #[test]
    fn test_data_length_overflow_is_an_error() {
        assert_eq!(data_length(&[0x01; 255]).unwrap(), 255);
        assert_eq!(data_length(&[0x40; 254]).unwrap(), 255);
        for payload in [&[0x40; 255][..], &[0x01; 256][..], &[0x01; 300][..]] {
            match data_length(payload) {
                Err(KnxError::Range(e)) => assert_eq!(e.field(), "data_length"),
                other => panic!("{} octets: unexpected {other:?}", payload.len()),
            }
        }
        assert!(matches!(
            Apdu::with_data(Apci::GroupValueWrite, &[0x40; 255]),
            Err(KnxError::Range(_))
        ));
    }

    #[test]
    fn test_threshold_below_packs_into_apci_octet() {
        let mut frame = [0x00, 0x80, 0x00];
        write_data(&mut frame, &[0x3E], 1).unwrap();
        assert_eq!(frame, [0x00, 0xBE, 0x00]);
        assert_eq!(read_data(&frame[..2], 1).unwrap(), ApduData::Small(0x3E));
    }

    #[test]
    fn test_threshold_at_limit_uses_next_octet() {
        let mut frame = [0x00, 0x80, 0x00];
        write_data(&mut frame, &[0x3F], 1).unwrap();
        assert_eq!(frame, [0x00, 0x80, 0x3F]);
        assert_eq!(data_length(&[0x3F]).unwrap(), 2);
        assert_eq!(read_data(&frame, 2).unwrap(), ApduData::Char('?'));
    }

    #[test]
    fn test_four_octets_become_float16() {
        let mut frame = [0x00, 0x80, 0x00, 0x00];
        write_data(&mut frame, &21.5f32.to_be_bytes(), 1).unwrap();
        assert_eq!(frame, [0x00, 0x80, 0x0C, 0x33]);
        assert_eq!(read_data(&frame, 3).unwrap(), ApduData::Float(21.5));

        match write_data(&mut frame, &f32::NAN.to_be_bytes(), 1) {
            Err(KnxError::Encoding(e)) => assert!(e.is_non_finite()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_long_payloads() {
        let mut frame = [0x00, 0x80, 0, 0, 0];
        write_data(&mut frame, &[0x01, 0xAA, 0xBB], 1).unwrap();
        assert_eq!(frame, [0x00, 0x81, 0xAA, 0xBB, 0x00]);

        let mut frame = [0x00, 0x80, 0, 0, 0];
        write_data(&mut frame, &[0x40, 0xAA, 0xBB], 1).unwrap();
        assert_eq!(frame, [0x00, 0x80, 0x40, 0xAA, 0xBB]);
        match read_data(&frame, 4).unwrap() {
            ApduData::Raw(raw) => assert_eq!(raw.as_slice(), &frame),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_write_past_end() {
        let mut frame = [0x00, 0x80];
        assert!(matches!(
            write_data(&mut frame, &[0x40], 1),
            Err(KnxError::FrameTooShort(_))
        ));
        assert!(matches!(
            write_data(&mut frame, &[0x01, 0x02], 1),
            Err(KnxError::FrameTooShort(_))
        ));
        assert!(matches!(
            read_data(&frame, 3),
            Err(KnxError::FrameTooShort(_))
        ));
    }

    #[test]
    fn test_tpci() {
        assert_eq!(Tpci::from_byte(0x00), Tpci::UnnumberedData);
        assert_eq!(
            Tpci::from_byte(0b0100_1100),
            Tpci::NumberedData { sequence: 3 }
        );
        assert_eq!(Tpci::NumberedData { sequence: 3 }.to_byte(), 0b0100_1100);
        assert!(!Tpci::from_byte(0x80).is_data());
    }

    #[test]
    fn test_apci() {
        assert_eq!(Apci::from_bytes(0x00, 0x00), Apci::GroupValueRead);
        assert_eq!(Apci::from_bytes(0x00, 0x40), Apci::GroupValueResponse);
        assert_eq!(Apci::from_bytes(0x00, 0x81), Apci::GroupValueWrite);
        assert_eq!(Apci::from_bytes(0x03, 0x40), Apci::DeviceDescriptorResponse);
        assert_eq!(Apci::from_bytes(0x03, 0xC0), Apci::Unknown(0x3C0));
        assert_eq!(Apci::MemoryWrite.to_u16(), 0x280);
        assert!(Apci::GroupValueWrite.is_group_value());
        assert!(!Apci::MemoryRead.is_group_value());
    }

    #[test]
    fn test_apdu_with_data() {
        let apdu = Apdu::with_data(Apci::GroupValueWrite, &[0x40, 0x01]).unwrap();
        assert_eq!(apdu.as_bytes(), &[0x00, 0x80, 0x40, 0x01]);
        assert_eq!(apdu.data_length(), 3);
        assert_eq!(apdu.apci(), Apci::GroupValueWrite);
        assert_eq!(apdu.tpci(), Tpci::UnnumberedData);

        let read = Apdu::new(Tpci::UnnumberedData, Apci::GroupValueRead);
        assert_eq!(read.as_bytes(), &[0x00, 0x00]);
        assert_eq!(read.read_data().unwrap(), ApduData::Empty);
    }

    #[test]
    fn test_apdu_with_value_short() {
        let apdu =
            Apdu::with_value(Apci::GroupValueWrite, DptTag::Boolean, &DptValue::Bool(true))
                .unwrap();
        assert_eq!(apdu.as_bytes(), &[0x00, 0x81]);
        assert_eq!(apdu.data_length(), 1);
        assert_eq!(apdu.value(DptTag::Boolean).unwrap(), DptValue::Bool(true));

        let dim = DptValue::Control(ControlCommand::new(true, StepCode::Intervals4));
        let apdu = Apdu::with_value(Apci::GroupValueWrite, DptTag::Dimming, &dim).unwrap();
        assert_eq!(apdu.as_bytes(), &[0x00, 0x8B]);
        assert_eq!(apdu.value(DptTag::Dimming).unwrap(), dim);
    }

    #[test]
    fn test_apdu_with_value_long() {
        let apdu = Apdu::with_value(
            Apci::GroupValueResponse,
            DptTag::Float16,
            &DptValue::Float(21.5),
        )
        .unwrap();
        assert_eq!(apdu.as_bytes(), &[0x00, 0x40, 0x0C, 0x33]);
        assert_eq!(apdu.data_length(), 3);
        assert_eq!(apdu.payload(), &[0x0C, 0x33]);
        assert_eq!(apdu.value(DptTag::Float16).unwrap(), DptValue::Float(21.5));

        // Small unsigned values still go to octet 2
        let apdu =
            Apdu::with_value(Apci::GroupValueWrite, DptTag::Unsigned8, &DptValue::U8(5)).unwrap();
        assert_eq!(apdu.as_bytes(), &[0x00, 0x80, 0x05]);
        assert_eq!(apdu.data_length(), 2);
        assert_eq!(Apdu::wire_len(apdu.data_length()), apdu.len());
    }

    #[test]
    fn test_from_octets() {
        assert!(matches!(
            Apdu::from_octets(&[0x00], 0),
            Err(KnxError::FrameTooShort(_))
        ));
        let apdu = Apdu::from_octets(&[0x00, 0x80, 0x0C, 0x33], 3).unwrap();
        assert_eq!(apdu.read_data().unwrap(), ApduData::Float(21.5));
        assert_eq!(Apdu::wire_len(0), 2);
    }

    #[test]
    fn test_packed_octet_decodes_as_one_octet_type() {
        let apdu = Apdu::with_data(Apci::GroupValueWrite, &[0x05]).unwrap();
        assert_eq!(apdu.as_bytes(), &[0x00, 0x85]);
        assert_eq!(apdu.value(DptTag::Unsigned8).unwrap(), DptValue::U8(5));
        assert_eq!(apdu.value(DptTag::Signed8).unwrap(), DptValue::I8(5));
        assert_eq!(apdu.value(DptTag::Percent).unwrap(), DptValue::Percent(0.0));

        // At the threshold the octet moves to octet 2
        let apdu = Apdu::with_data(Apci::GroupValueWrite, &[0x3F]).unwrap();
        assert_eq!(apdu.value(DptTag::Unsigned8).unwrap(), DptValue::U8(0x3F));

        // Wider types never read the APCI octet
        assert!(matches!(
            Apdu::with_data(Apci::GroupValueWrite, &[0x05])
                .unwrap()
                .value(DptTag::Unsigned16),
            Err(KnxError::FrameTooShort(_))
        ));
    }

    #[test]
    fn test_largest_payload_fits() {
        let text: heapless::String<64> = core::iter::repeat('x').take(64).collect();
        let value = DptValue::Latin1(crate::dpt::dpt24::to_text(&text).unwrap());
        let apdu = Apdu::with_value(Apci::GroupValueWrite, DptTag::Latin1, &value).unwrap();
        assert_eq!(apdu.len(), MAX_APDU_LEN);
        assert_eq!(apdu.data_length(), 65);
        assert_eq!(apdu.value(DptTag::Latin1).unwrap(), value);

        let apdu = Apdu::with_data(Apci::GroupValueWrite, &[0x40; 64]).unwrap();
        assert_eq!(apdu.len(), MAX_APDU_LEN);
    }
}
