//! KNXnet/IP datagram assembly and parsing.
//!
//! A datagram is a fixed sequence of sections, each at a known offset:
//!
//! ```text
//! ┌─────────────────────────────┐
//! │  Header (6 bytes)           │
//! │  - Header Length: 0x06      │
//! │  - Protocol Version: 0x10   │
//! │  - Service Type: 2 bytes    │
//! │  - Total Length: 2 bytes    │
//! ├─────────────────────────────┤
//! │  Connection Header (4)      │  tunnelling / device configuration only
//! │  - Structure Length: 0x04   │
//! │  - Channel ID               │
//! │  - Sequence Counter         │
//! │  - Status                   │
//! ├─────────────────────────────┤
//! │  cEMI                       │
//! │  - Message Code             │
//! │  - Additional Info Length   │
//! │  - Additional Info          │
//! │  - Control Field 1 / 2      │
//! │  - Source / Destination     │
//! │  - Data Length              │
//! │  - APDU                     │
//! └─────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use knx_codec::config::CodecConfig;
//! use knx_codec::dpt::{DptTag, DptValue};
//! use knx_codec::protocol::datagram::{Datagram, DatagramBuilder};
//!
//! let datagram = DatagramBuilder::new(&CodecConfig::default())
//!     .tunnelling(1, 0)
//!     .group_write("1/2/3", DptTag::Boolean, &DptValue::Bool(true))?;
//! let bytes = datagram.to_bytes()?;
//!
//! let parsed = Datagram::parse(&bytes)?;
//! assert_eq!(parsed, datagram);
//! assert_eq!(parsed.group_value(DptTag::Boolean)?, DptValue::Bool(true));
//! # Ok::<(), knx_codec::KnxError>(())
//! ```

use crate::addressing::{AddressText, GroupAddress, GroupLevel, IndividualAddress};
use crate::config::CodecConfig;
use crate::dpt::{DptTag, DptValue};
use crate::error::{KnxError, Result};
use crate::protocol::apdu::{Apci, Apdu, Tpci};
use crate::protocol::constants::{
    MessageCode, ServiceType, CEMI_LDATA_FIXED, CONNECTION_HEADER_SIZE, E_NO_ERROR,
    HEADER_SIZE_10, KNXNETIP_VERSION_10, MAX_ADDITIONAL_INFO, MAX_FRAME_SIZE,
};
use crate::protocol::control::{AddressType, ControlField, ExtendedControlField};

/// Assembled datagram octets
pub type FrameBytes = heapless::Vec<u8, MAX_FRAME_SIZE>;

/// cEMI additional info block
pub type AdditionalInfo = heapless::Vec<u8, MAX_ADDITIONAL_INFO>;

// =============================================================================
// Header
// =============================================================================

/// KNXnet/IP frame header (6 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KnxnetIpHeader {
    /// Header length (0x06)
    pub header_length: u8,
    /// Protocol version (0x10)
    pub protocol_version: u8,
    /// Service type identifier
    pub service_type: ServiceType,
    /// Total length of frame (header + body)
    pub total_length: u16,
}

impl KnxnetIpHeader {
    /// Size of the header in bytes
    pub const SIZE: usize = 6;

    /// Create a header for a body of `body_length` octets
    pub const fn new(service_type: ServiceType, body_length: u16) -> Self {
        Self {
            header_length: HEADER_SIZE_10,
            protocol_version: KNXNETIP_VERSION_10,
            service_type,
            total_length: Self::SIZE as u16 + body_length,
        }
    }

    /// Parse a header from a byte slice
    ///
    /// # Errors
    ///
    /// - `FrameTooShort` if fewer than 6 octets are available
    /// - `Encoding` if the header length is not 0x06
    /// - `UnsupportedType` for a protocol version other than 1.0 or an
    ///   unknown service type
    pub fn parse(data: &[u8]) -> Result<Self> {
        KnxError::ensure_len(data, Self::SIZE)?;

        let header_length = data[0];
        let protocol_version = data[1];
        let service_type_raw = u16::from_be_bytes([data[2], data[3]]);
        let total_length = u16::from_be_bytes([data[4], data[5]]);

        if header_length != HEADER_SIZE_10 {
            crate::codec_log!(debug, "bad header length {}", header_length);
            return Err(KnxError::malformed());
        }
        if protocol_version != KNXNETIP_VERSION_10 {
            crate::codec_log!(debug, "unsupported protocol version {}", protocol_version);
            return Err(KnxError::unsupported_version());
        }
        let service_type = ServiceType::try_from(service_type_raw)?;

        Ok(Self {
            header_length,
            protocol_version,
            service_type,
            total_length,
        })
    }

    /// Encode the header into a byte buffer
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        KnxError::ensure_len(buf, Self::SIZE)?;
        buf[0] = self.header_length;
        buf[1] = self.protocol_version;
        buf[2..4].copy_from_slice(&self.service_type.to_u16().to_be_bytes());
        buf[4..6].copy_from_slice(&self.total_length.to_be_bytes());
        Ok(Self::SIZE)
    }

    /// Body length declared by the header
    pub const fn body_length(&self) -> u16 {
        self.total_length.saturating_sub(Self::SIZE as u16)
    }
}

// =============================================================================
// Connection Header
// =============================================================================

/// Connection header of tunnelling and device configuration requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnectionHeader {
    /// Structure length (0x04)
    pub structure_length: u8,
    /// Communication channel ID
    pub channel_id: u8,
    /// Sequence counter
    pub sequence_counter: u8,
    /// Status code
    pub status: u8,
}

impl ConnectionHeader {
    /// Size of the connection header in bytes
    pub const SIZE: usize = 4;

    pub const fn new(channel_id: u8, sequence_counter: u8) -> Self {
        Self {
            structure_length: CONNECTION_HEADER_SIZE,
            channel_id,
            sequence_counter,
            status: E_NO_ERROR,
        }
    }

    pub fn parse(data: &[u8]) -> Result<Self> {
        KnxError::ensure_len(data, Self::SIZE)?;
        if data[0] != CONNECTION_HEADER_SIZE {
            crate::codec_log!(debug, "bad connection header length {}", data[0]);
            return Err(KnxError::malformed());
        }
        Ok(Self {
            structure_length: data[0],
            channel_id: data[1],
            sequence_counter: data[2],
            status: data[3],
        })
    }

    pub fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        KnxError::ensure_len(buf, Self::SIZE)?;
        buf[..Self::SIZE].copy_from_slice(&[
            self.structure_length,
            self.channel_id,
            self.sequence_counter,
            self.status,
        ]);
        Ok(Self::SIZE)
    }
}

// =============================================================================
// cEMI
// =============================================================================

/// Destination of an `L_Data` frame; bit 7 of the extended control field
/// says which kind the two octets hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Destination {
    Individual(IndividualAddress),
    Group(GroupAddress),
}

impl Destination {
    pub const fn address_type(self) -> AddressType {
        match self {
            Self::Individual(_) => AddressType::Individual,
            Self::Group(_) => AddressType::Group,
        }
    }

    pub fn raw(self) -> u16 {
        match self {
            Self::Individual(addr) => addr.raw(),
            Self::Group(addr) => addr.raw(),
        }
    }

    /// Dotted text for an individual address, `level` text for a group.
    pub fn to_text(self, level: GroupLevel) -> AddressText {
        match self {
            Self::Individual(addr) => addr.to_text(),
            Self::Group(addr) => addr.format(level),
        }
    }

    fn from_raw(address_type: AddressType, raw: u16) -> Self {
        match address_type {
            AddressType::Individual => Self::Individual(IndividualAddress::from(raw)),
            AddressType::Group => Self::Group(GroupAddress::from(raw)),
        }
    }
}

/// cEMI `L_Data` frame
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CemiFrame {
    message_code: MessageCode,
    additional_info: AdditionalInfo,
    control: ControlField,
    extended_control: ExtendedControlField,
    source: IndividualAddress,
    destination: Destination,
    apdu: Apdu,
}

impl CemiFrame {
    /// Create a frame; the address type bit of `extended_control` is set
    /// from `destination`.
    pub fn new(
        message_code: MessageCode,
        control: ControlField,
        extended_control: ExtendedControlField,
        source: IndividualAddress,
        destination: Destination,
        apdu: Apdu,
    ) -> Self {
        Self {
            message_code,
            additional_info: AdditionalInfo::new(),
            control,
            extended_control: extended_control.with_address_type(destination.address_type()),
            source,
            destination,
            apdu,
        }
    }

    /// Attach an additional info block.
    pub fn with_additional_info(mut self, info: &[u8]) -> Result<Self> {
        self.additional_info =
            AdditionalInfo::from_slice(info).map_err(|_| KnxError::out_of_range("additional_info"))?;
        Ok(self)
    }

    pub const fn message_code(&self) -> MessageCode {
        self.message_code
    }

    pub fn additional_info(&self) -> &[u8] {
        &self.additional_info
    }

    pub const fn control(&self) -> ControlField {
        self.control
    }

    pub const fn extended_control(&self) -> ExtendedControlField {
        self.extended_control
    }

    pub const fn source(&self) -> IndividualAddress {
        self.source
    }

    pub const fn destination(&self) -> Destination {
        self.destination
    }

    pub const fn apdu(&self) -> &Apdu {
        &self.apdu
    }

    /// Length class octet as written on the wire
    pub fn data_length(&self) -> u8 {
        self.apdu.data_length()
    }

    /// Encoded size in octets
    pub fn len(&self) -> usize {
        2 + self.additional_info.len() + CEMI_LDATA_FIXED + self.apdu.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        let size = self.len();
        KnxError::ensure_len(buf, size)?;

        let info_len = self.additional_info.len();
        buf[0] = self.message_code.to_u8();
        buf[1] = info_len as u8;
        buf[2..2 + info_len].copy_from_slice(&self.additional_info);

        let mut pos = 2 + info_len;
        buf[pos] = self.control.raw();
        buf[pos + 1] = self.extended_control.raw();
        self.source.encode(&mut buf[pos + 2..])?;
        buf[pos + 4..pos + 6].copy_from_slice(&self.destination.raw().to_be_bytes());
        buf[pos + 6] = self.apdu.data_length();
        pos += CEMI_LDATA_FIXED;

        buf[pos..pos + self.apdu.len()].copy_from_slice(self.apdu.as_bytes());
        Ok(size)
    }

    /// Parse exactly one `L_Data` frame from `data`.
    ///
    /// # Errors
    ///
    /// - `FrameTooShort` if a section runs past the end of `data`
    /// - `UnsupportedType` for an unknown or non `L_Data` message code
    /// - `Range` if the additional info is longer than 32 octets
    /// - `Encoding` if octets remain after the APDU
    pub fn parse(data: &[u8]) -> Result<Self> {
        KnxError::ensure_len(data, 2)?;
        let message_code = MessageCode::try_from(data[0])?;
        if !message_code.is_ldata() {
            crate::codec_log!(debug, "message code {} is not L_Data", data[0]);
            return Err(KnxError::unknown_message_code());
        }

        let info_len = usize::from(data[1]);
        if info_len > MAX_ADDITIONAL_INFO {
            return Err(KnxError::out_of_range("additional_info"));
        }
        let fixed_start = 2 + info_len;
        KnxError::ensure_len(data, fixed_start + CEMI_LDATA_FIXED)?;

        let fixed = &data[fixed_start..fixed_start + CEMI_LDATA_FIXED];
        let control = ControlField::from(fixed[0]);
        let extended_control = ExtendedControlField::from(fixed[1]);
        let source = IndividualAddress::decode(&fixed[2..4])?;
        let destination = Destination::from_raw(
            extended_control.address_type(),
            u16::from_be_bytes([fixed[4], fixed[5]]),
        );
        let data_length = fixed[6];

        let apdu_start = fixed_start + CEMI_LDATA_FIXED;
        let apdu_len = Apdu::wire_len(data_length);
        KnxError::ensure_len(data, apdu_start + apdu_len)?;
        if data.len() > apdu_start + apdu_len {
            crate::codec_log!(debug, "{} octets after the APDU", data.len() - apdu_start - apdu_len);
            return Err(KnxError::length_mismatch());
        }
        let apdu = Apdu::from_octets(&data[apdu_start..], data_length)?;

        Ok(Self {
            message_code,
            additional_info: AdditionalInfo::from_slice(&data[2..fixed_start])
                .map_err(|_| KnxError::out_of_range("additional_info"))?,
            control,
            extended_control,
            source,
            destination,
            apdu,
        })
    }
}

// =============================================================================
// Datagram
// =============================================================================

/// A complete KNXnet/IP datagram carrying one cEMI frame
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Datagram {
    header: KnxnetIpHeader,
    connection: Option<ConnectionHeader>,
    cemi: CemiFrame,
}

impl Datagram {
    /// Assemble a datagram, deriving the header lengths.
    ///
    /// # Errors
    ///
    /// - `UnsupportedType` if `service_type` does not carry a cEMI frame
    /// - `Encoding` if a connection header is given for a service that has
    ///   none, or missing for one that needs it
    /// - `Range` if the datagram would exceed 256 octets
    pub fn new(
        service_type: ServiceType,
        connection: Option<ConnectionHeader>,
        cemi: CemiFrame,
    ) -> Result<Self> {
        if !service_type.carries_cemi() {
            return Err(KnxError::unknown_service_type());
        }
        if connection.is_some() != service_type.has_connection_header() {
            return Err(KnxError::malformed());
        }
        let body = connection.map_or(0, |_| ConnectionHeader::SIZE) + cemi.len();
        if KnxnetIpHeader::SIZE + body > MAX_FRAME_SIZE {
            return Err(KnxError::out_of_range("total_length"));
        }
        Ok(Self {
            header: KnxnetIpHeader::new(service_type, body as u16),
            connection,
            cemi,
        })
    }

    pub const fn header(&self) -> &KnxnetIpHeader {
        &self.header
    }

    pub const fn service_type(&self) -> ServiceType {
        self.header.service_type
    }

    pub const fn connection(&self) -> Option<&ConnectionHeader> {
        self.connection.as_ref()
    }

    pub const fn cemi(&self) -> &CemiFrame {
        &self.cemi
    }

    /// Total length in octets
    pub const fn total_length(&self) -> usize {
        self.header.total_length as usize
    }

    /// Write the datagram into `buf`, returning the number of octets used.
    pub fn build(&self, buf: &mut [u8]) -> Result<usize> {
        let total = self.total_length();
        KnxError::ensure_len(buf, total)?;

        let mut pos = self.header.encode(buf)?;
        if let Some(connection) = &self.connection {
            pos += connection.encode(&mut buf[pos..])?;
        }
        pos += self.cemi.encode(&mut buf[pos..])?;

        crate::codec_log!(
            trace,
            "built {} datagram, {} octets",
            self.header.service_type.name(),
            pos
        );
        Ok(pos)
    }

    pub fn to_bytes(&self) -> Result<FrameBytes> {
        let mut buf = [0u8; MAX_FRAME_SIZE];
        let len = self.build(&mut buf)?;
        FrameBytes::from_slice(&buf[..len]).map_err(|_| KnxError::out_of_range("total_length"))
    }

    /// Parse a received datagram.
    ///
    /// Octets beyond the header's total length are ignored, so a whole
    /// receive buffer may be passed.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let header = KnxnetIpHeader::parse(bytes)?;
        let total = usize::from(header.total_length);
        if total < KnxnetIpHeader::SIZE {
            return Err(KnxError::malformed());
        }
        KnxError::ensure_len(bytes, total)?;
        if !header.service_type.carries_cemi() {
            crate::codec_log!(
                debug,
                "{} does not carry a cEMI frame",
                header.service_type.name()
            );
            return Err(KnxError::unknown_service_type());
        }

        let mut body = &bytes[KnxnetIpHeader::SIZE..total];
        let connection = if header.service_type.has_connection_header() {
            let connection = ConnectionHeader::parse(body)?;
            body = &body[ConnectionHeader::SIZE..];
            Some(connection)
        } else {
            None
        };
        let cemi = CemiFrame::parse(body)?;

        crate::codec_log!(
            trace,
            "parsed {} datagram, {} octets",
            header.service_type.name(),
            total
        );
        Ok(Self {
            header,
            connection,
            cemi,
        })
    }

    /// Decode the group value carried by this datagram as `tag`.
    ///
    /// # Errors
    ///
    /// `UnsupportedType` if the APDU is not a group value write or response.
    pub fn group_value(&self, tag: DptTag) -> Result<DptValue> {
        let apdu = self.cemi.apdu();
        if !matches!(
            apdu.apci(),
            Apci::GroupValueWrite | Apci::GroupValueResponse
        ) {
            return Err(KnxError::value_mismatch());
        }
        apdu.value(tag)
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builds outgoing group telegrams from a [`CodecConfig`].
///
/// Routing indications are produced by default; call [`Self::tunnelling`]
/// to wrap the frame in a tunnelling request instead.
#[derive(Debug, Clone, Copy)]
pub struct DatagramBuilder {
    config: CodecConfig,
    service_type: ServiceType,
    connection: Option<ConnectionHeader>,
}

impl DatagramBuilder {
    pub fn new(config: &CodecConfig) -> Self {
        Self {
            config: *config,
            service_type: ServiceType::RoutingIndication,
            connection: None,
        }
    }

    /// Send over a tunnelling connection
    #[must_use]
    pub fn tunnelling(mut self, channel_id: u8, sequence_counter: u8) -> Self {
        self.service_type = ServiceType::TunnellingRequest;
        self.connection = Some(ConnectionHeader::new(channel_id, sequence_counter));
        self
    }

    /// Send as a routing indication
    #[must_use]
    pub fn routing(mut self) -> Self {
        self.service_type = ServiceType::RoutingIndication;
        self.connection = None;
        self
    }

    /// `A_GroupValue_Write` of `value` to `destination`.
    pub fn group_write(&self, destination: &str, tag: DptTag, value: &DptValue) -> Result<Datagram> {
        let apdu = Apdu::with_value(Apci::GroupValueWrite, tag, value)?;
        self.telegram(destination, apdu)
    }

    /// `A_GroupValue_Read` of `destination`.
    pub fn group_read(&self, destination: &str) -> Result<Datagram> {
        let apdu = Apdu::new(Tpci::UnnumberedData, Apci::GroupValueRead);
        self.telegram(destination, apdu)
    }

    /// `A_GroupValue_Response` with `value` for `destination`.
    pub fn group_response(
        &self,
        destination: &str,
        tag: DptTag,
        value: &DptValue,
    ) -> Result<Datagram> {
        let apdu = Apdu::with_value(Apci::GroupValueResponse, tag, value)?;
        self.telegram(destination, apdu)
    }

    /// Wrap `apdu` in a datagram addressed to `destination`.
    ///
    /// The group level of slash-separated text follows its part count; the
    /// configured level only picks how the destination is logged.
    pub fn telegram(&self, destination: &str, apdu: Apdu) -> Result<Datagram> {
        let destination = if destination.contains('/') {
            Destination::Group(destination.parse()?)
        } else {
            Destination::Individual(destination.parse()?)
        };
        let control = ControlField::default().with_priority(self.config.priority);
        let extended_control =
            ExtendedControlField::new(destination.address_type(), self.config.hop_count, false)?;
        let cemi = CemiFrame::new(
            self.config.message_code,
            control,
            extended_control,
            self.config.source,
            destination,
            apdu,
        );
        crate::codec_log!(
            debug,
            "telegram to {}",
            destination.to_text(self.config.group_level).as_str()
        );
        Datagram::new(self.service_type, self.connection, cemi)
    }
}
