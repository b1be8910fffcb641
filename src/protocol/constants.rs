//! KNXnet/IP protocol constants, service types and cEMI message codes.
//!
//! The two code tables are `static` slices built at compile time and only
//! ever read through the lookup functions below.

use crate::error::{KnxError, Result};

/// KNXnet/IP protocol version 1.0
pub const KNXNETIP_VERSION_10: u8 = 0x10;

/// Standard KNXnet/IP header length (6 bytes)
pub const HEADER_SIZE_10: u8 = 0x06;

/// Connection header structure length (4 bytes)
pub const CONNECTION_HEADER_SIZE: u8 = 0x04;

/// Standard UDP port for KNXnet/IP communication
pub const KNXNETIP_DEFAULT_PORT: u16 = 3671;

/// Maximum size of a KNXnet/IP frame
pub const MAX_FRAME_SIZE: usize = 256;

/// Largest DPT payload carried by one cEMI frame
pub const MAX_APDU_SIZE: usize = 64;

/// Largest APDU: TPCI/APCI octets plus the largest payload
pub const MAX_APDU_LEN: usize = MAX_APDU_SIZE + 2;

/// Maximum size of the cEMI additional info block
pub const MAX_ADDITIONAL_INFO: usize = 32;

/// Fixed cEMI L_Data octets after the additional info:
/// ctrl1, ctrl2, source (2), destination (2), data length
pub const CEMI_LDATA_FIXED: usize = 7;

/// Connection status code for successful operation
pub const E_NO_ERROR: u8 = 0x00;

// =============================================================================
// Service Type Identifiers
// =============================================================================

/// KNXnet/IP service type identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum ServiceType {
    /// `SEARCH_REQUEST`
    SearchRequest = 0x0201,
    /// `SEARCH_RESPONSE`
    SearchResponse = 0x0202,
    /// `DESCRIPTION_REQUEST`
    DescriptionRequest = 0x0203,
    /// `DESCRIPTION_RESPONSE`
    DescriptionResponse = 0x0204,
    /// `CONNECT_REQUEST`
    ConnectRequest = 0x0205,
    /// `CONNECT_RESPONSE`
    ConnectResponse = 0x0206,
    /// `CONNECTIONSTATE_REQUEST`
    ConnectionstateRequest = 0x0207,
    /// `CONNECTIONSTATE_RESPONSE`
    ConnectionstateResponse = 0x0208,
    /// `DISCONNECT_REQUEST`
    DisconnectRequest = 0x0209,
    /// `DISCONNECT_RESPONSE`
    DisconnectResponse = 0x020A,
    /// `DEVICE_CONFIGURATION_REQUEST`
    DeviceConfigurationRequest = 0x0310,
    /// `DEVICE_CONFIGURATION_ACK`
    DeviceConfigurationAck = 0x0311,
    /// `TUNNELLING_REQUEST` - carries a cEMI frame over a connection
    TunnellingRequest = 0x0420,
    /// `TUNNELLING_ACK`
    TunnellingAck = 0x0421,
    /// `ROUTING_INDICATION` - multicast cEMI frame, no connection header
    RoutingIndication = 0x0530,
    /// `ROUTING_LOST_MESSAGE`
    RoutingLostMessage = 0x0531,
    /// `ROUTING_BUSY`
    RoutingBusy = 0x0532,
}

static SERVICE_TYPES: &[(ServiceType, &str)] = &[
    (ServiceType::SearchRequest, "SEARCH_REQUEST"),
    (ServiceType::SearchResponse, "SEARCH_RESPONSE"),
    (ServiceType::DescriptionRequest, "DESCRIPTION_REQUEST"),
    (ServiceType::DescriptionResponse, "DESCRIPTION_RESPONSE"),
    (ServiceType::ConnectRequest, "CONNECT_REQUEST"),
    (ServiceType::ConnectResponse, "CONNECT_RESPONSE"),
    (ServiceType::ConnectionstateRequest, "CONNECTIONSTATE_REQUEST"),
    (ServiceType::ConnectionstateResponse, "CONNECTIONSTATE_RESPONSE"),
    (ServiceType::DisconnectRequest, "DISCONNECT_REQUEST"),
    (ServiceType::DisconnectResponse, "DISCONNECT_RESPONSE"),
    (ServiceType::DeviceConfigurationRequest, "DEVICE_CONFIGURATION_REQUEST"),
    (ServiceType::DeviceConfigurationAck, "DEVICE_CONFIGURATION_ACK"),
    (ServiceType::TunnellingRequest, "TUNNELLING_REQUEST"),
    (ServiceType::TunnellingAck, "TUNNELLING_ACK"),
    (ServiceType::RoutingIndication, "ROUTING_INDICATION"),
    (ServiceType::RoutingLostMessage, "ROUTING_LOST_MESSAGE"),
    (ServiceType::RoutingBusy, "ROUTING_BUSY"),
];

impl ServiceType {
    /// Look up a service type by its wire value
    pub fn from_u16(value: u16) -> Option<Self> {
        SERVICE_TYPES
            .iter()
            .find(|(st, _)| *st as u16 == value)
            .map(|(st, _)| *st)
    }

    /// Convert `ServiceType` to u16
    pub const fn to_u16(self) -> u16 {
        self as u16
    }

    /// Protocol name, e.g. `"TUNNELLING_REQUEST"`
    pub fn name(self) -> &'static str {
        SERVICE_TYPES
            .iter()
            .find(|(st, _)| *st == self)
            .map_or("UNKNOWN", |(_, name)| *name)
    }

    /// Look up a service type by its protocol name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        SERVICE_TYPES
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name))
            .map(|(st, _)| *st)
    }

    /// Check if frames of this service carry a connection header
    pub const fn has_connection_header(self) -> bool {
        matches!(
            self,
            Self::TunnellingRequest
                | Self::TunnellingAck
                | Self::DeviceConfigurationRequest
                | Self::DeviceConfigurationAck
        )
    }

    /// Check if frames of this service carry a cEMI payload
    pub const fn carries_cemi(self) -> bool {
        matches!(
            self,
            Self::TunnellingRequest | Self::DeviceConfigurationRequest | Self::RoutingIndication
        )
    }
}

impl TryFrom<u16> for ServiceType {
    type Error = KnxError;

    fn try_from(value: u16) -> Result<Self> {
        Self::from_u16(value).ok_or_else(KnxError::unknown_service_type)
    }
}

// =============================================================================
// cEMI Message Codes
// =============================================================================

/// cEMI message codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MessageCode {
    /// `L_Raw.req`
    LRawReq = 0x10,
    /// `L_Data.req` - data request
    LDataReq = 0x11,
    /// `L_Poll_Data.req`
    LPollDataReq = 0x13,
    /// `L_Poll_Data.con`
    LPollDataCon = 0x25,
    /// `L_Data.ind` - data indication
    LDataInd = 0x29,
    /// `L_Busmon.ind`
    LBusmonInd = 0x2B,
    /// `L_Raw.ind`
    LRawInd = 0x2D,
    /// `L_Data.con` - data confirmation
    LDataCon = 0x2E,
    /// `L_Raw.con`
    LRawCon = 0x2F,
}

static MESSAGE_CODES: &[(MessageCode, &str)] = &[
    (MessageCode::LRawReq, "L_Raw.req"),
    (MessageCode::LDataReq, "L_Data.req"),
    (MessageCode::LPollDataReq, "L_Poll_Data.req"),
    (MessageCode::LPollDataCon, "L_Poll_Data.con"),
    (MessageCode::LDataInd, "L_Data.ind"),
    (MessageCode::LBusmonInd, "L_Busmon.ind"),
    (MessageCode::LRawInd, "L_Raw.ind"),
    (MessageCode::LDataCon, "L_Data.con"),
    (MessageCode::LRawCon, "L_Raw.con"),
];

impl MessageCode {
    /// Look up a message code by its wire value
    pub fn from_u8(value: u8) -> Option<Self> {
        MESSAGE_CODES
            .iter()
            .find(|(code, _)| *code as u8 == value)
            .map(|(code, _)| *code)
    }

    /// Convert `MessageCode` to u8
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Protocol name, e.g. `"L_Data.ind"`
    pub fn name(self) -> &'static str {
        MESSAGE_CODES
            .iter()
            .find(|(code, _)| *code == self)
            .map_or("UNKNOWN", |(_, name)| *name)
    }

    /// Look up a message code by its protocol name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        MESSAGE_CODES
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name))
            .map(|(code, _)| *code)
    }

    /// Check if this is one of the `L_Data` services
    pub const fn is_ldata(self) -> bool {
        matches!(self, Self::LDataReq | Self::LDataInd | Self::LDataCon)
    }
}

impl TryFrom<u8> for MessageCode {
    type Error = KnxError;

    fn try_from(value: u8) -> Result<Self> {
        Self::from_u8(value).ok_or_else(KnxError::unknown_message_code)
    }
}

impl core::str::FromStr for MessageCode {
    type Err = KnxError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s.trim()).ok_or_else(KnxError::unknown_message_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_type_lookup() {
        assert_eq!(
            ServiceType::from_u16(0x0420),
            Some(ServiceType::TunnellingRequest)
        );
        assert_eq!(ServiceType::from_u16(0xFFFF), None);
        assert_eq!(ServiceType::RoutingIndication.to_u16(), 0x0530);
        assert!(ServiceType::try_from(0x0000u16).is_err());
    }

    #[test]
    fn test_service_type_names() {
        for (st, name) in SERVICE_TYPES {
            assert_eq!(st.name(), *name);
            assert_eq!(ServiceType::from_name(name), Some(*st));
            assert_eq!(ServiceType::from_u16(st.to_u16()), Some(*st));
        }
        assert_eq!(
            ServiceType::from_name("routing_indication"),
            Some(ServiceType::RoutingIndication)
        );
    }

    #[test]
    fn test_connection_header_presence() {
        assert!(ServiceType::TunnellingRequest.has_connection_header());
        assert!(!ServiceType::RoutingIndication.has_connection_header());
        assert!(ServiceType::RoutingIndication.carries_cemi());
        assert!(!ServiceType::SearchRequest.carries_cemi());
    }

    #[test]
    fn test_message_code_lookup() {
        assert_eq!(MessageCode::from_u8(0x29), Some(MessageCode::LDataInd));
        assert_eq!(MessageCode::from_u8(0x00), None);
        assert_eq!(MessageCode::LDataReq.to_u8(), 0x11);
        match MessageCode::try_from(0x99u8) {
            Err(KnxError::UnsupportedType(e)) => assert!(e.is_unknown_message_code()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_message_code_names() {
        for (code, name) in MESSAGE_CODES {
            assert_eq!(code.name(), *name);
            assert_eq!(name.parse::<MessageCode>().unwrap(), *code);
            assert_eq!(MessageCode::from_u8(code.to_u8()), Some(*code));
        }
        assert!("L_Data.foo".parse::<MessageCode>().is_err());
        assert!(MessageCode::LDataCon.is_ldata());
        assert!(!MessageCode::LRawReq.is_ldata());
    }
}
