//! Link-layer control fields.
//!
//! A data telegram carries two control octets ahead of its addresses. Both are
//! plain `Copy` values over a single byte: getters mask and shift, setters
//! clear the target bits and OR the new value in, leaving every other bit as
//! it was. The `with_*` variants return a modified copy.
//!
//! ## Control Field
//!
//! ```text
//! Bit 7:   Frame type (0 = extended, 1 = standard)
//! Bit 6:   Repeat (1 = do not repeat)
//! Bit 5-4: Priority (0 = system, 1 = normal, 2 = urgent, 3 = low)
//! Bit 3-0: Telegram type
//! ```
//!
//! ## Extended Control Field
//!
//! ```text
//! Bit 7:   Destination address type (0 = individual, 1 = group)
//! Bit 6-3: Hop count (0-15)
//! Bit 2-1: Reserved
//! Bit 0:   Extended frame format
//! ```

use core::fmt;

use crate::bitfield::{get_bits, get_flag, set_bits, set_flag};
use crate::error::{KnxError, Result};

const FRAME_TYPE_BIT: u32 = 7;
const REPEAT_BIT: u32 = 6;
const PRIORITY_SHIFT: u32 = 4;
const PRIORITY_WIDTH: u32 = 2;
const TELEGRAM_TYPE_SHIFT: u32 = 0;
const TELEGRAM_TYPE_WIDTH: u32 = 4;

const ADDRESS_TYPE_BIT: u32 = 7;
const HOP_COUNT_SHIFT: u32 = 3;
const HOP_COUNT_WIDTH: u32 = 4;
const EXTENDED_FORMAT_BIT: u32 = 0;

/// Largest hop count the extended control field can carry
pub const MAX_HOP_COUNT: u8 = 15;

/// Largest telegram type tag
pub const MAX_TELEGRAM_TYPE: u8 = 15;

/// Frame type flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum FrameType {
    /// Extended frame
    Extended = 0,
    /// Standard frame
    Standard = 1,
}

impl TryFrom<u8> for FrameType {
    type Error = KnxError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Extended),
            1 => Ok(Self::Standard),
            _ => Err(KnxError::unknown_enum_value()),
        }
    }
}

/// KNX message priority levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Priority {
    /// System priority
    System = 0,
    /// Normal priority
    Normal = 1,
    /// Urgent priority
    Urgent = 2,
    /// Low priority (default for group telegrams)
    #[default]
    Low = 3,
}

impl Priority {
    /// Decode the two priority bits; upper bits are ignored
    pub const fn from_bits(value: u8) -> Self {
        match value & 0b11 {
            0 => Self::System,
            1 => Self::Normal,
            2 => Self::Urgent,
            _ => Self::Low,
        }
    }

    /// Convert Priority to u8
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Lower-case name used in configuration text
    pub const fn name(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Normal => "normal",
            Self::Urgent => "urgent",
            Self::Low => "low",
        }
    }
}

impl TryFrom<u8> for Priority {
    type Error = KnxError;

    fn try_from(value: u8) -> Result<Self> {
        if value > 3 {
            return Err(KnxError::unknown_enum_value());
        }
        Ok(Self::from_bits(value))
    }
}

impl core::str::FromStr for Priority {
    type Err = KnxError;

    fn from_str(s: &str) -> Result<Self> {
        [Self::System, Self::Normal, Self::Urgent, Self::Low]
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(KnxError::unknown_enum_value)
    }
}

/// Destination address type flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum AddressType {
    /// Destination is an individual (device) address
    Individual = 0,
    /// Destination is a group address
    Group = 1,
}

impl TryFrom<u8> for AddressType {
    type Error = KnxError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Individual),
            1 => Ok(Self::Group),
            _ => Err(KnxError::unknown_enum_value()),
        }
    }
}

// =============================================================================
// Control Field
// =============================================================================

/// Standard control field (first control octet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlField {
    raw: u8,
}

impl From<u8> for ControlField {
    #[inline(always)]
    fn from(raw: u8) -> Self {
        Self { raw }
    }
}

impl From<ControlField> for u8 {
    #[inline(always)]
    fn from(ctrl: ControlField) -> u8 {
        ctrl.raw
    }
}

impl ControlField {
    /// Create a control field from its four components.
    ///
    /// # Errors
    ///
    /// Returns `KnxError::Range` if `telegram_type` exceeds 4 bits.
    pub fn new(
        frame_type: FrameType,
        do_not_repeat: bool,
        priority: Priority,
        telegram_type: u8,
    ) -> Result<Self> {
        let mut ctrl = Self { raw: 0 };
        ctrl.set_frame_type(frame_type);
        ctrl.set_do_not_repeat(do_not_repeat);
        ctrl.set_priority(priority);
        ctrl.set_telegram_type(telegram_type)?;
        Ok(ctrl)
    }

    /// Get raw byte value
    #[inline(always)]
    pub const fn raw(self) -> u8 {
        self.raw
    }

    /// Frame type (bit 7)
    #[inline(always)]
    pub const fn frame_type(self) -> FrameType {
        if get_flag(self.raw, FRAME_TYPE_BIT) {
            FrameType::Standard
        } else {
            FrameType::Extended
        }
    }

    /// Set the frame type, leaving the other fields untouched
    #[inline]
    pub fn set_frame_type(&mut self, frame_type: FrameType) {
        self.raw = set_flag(self.raw, FRAME_TYPE_BIT, frame_type == FrameType::Standard);
    }

    /// Copy with a different frame type
    #[inline]
    #[must_use]
    pub fn with_frame_type(mut self, frame_type: FrameType) -> Self {
        self.set_frame_type(frame_type);
        self
    }

    /// Repeat flag (bit 6); `true` means the frame must not be repeated
    #[inline(always)]
    pub const fn do_not_repeat(self) -> bool {
        get_flag(self.raw, REPEAT_BIT)
    }

    /// Set the repeat flag
    #[inline]
    pub fn set_do_not_repeat(&mut self, do_not_repeat: bool) {
        self.raw = set_flag(self.raw, REPEAT_BIT, do_not_repeat);
    }

    /// Copy with a different repeat flag
    #[inline]
    #[must_use]
    pub fn with_do_not_repeat(mut self, do_not_repeat: bool) -> Self {
        self.set_do_not_repeat(do_not_repeat);
        self
    }

    /// Priority (bits 5-4)
    #[inline(always)]
    pub const fn priority(self) -> Priority {
        Priority::from_bits(get_bits(self.raw, PRIORITY_SHIFT, PRIORITY_WIDTH))
    }

    /// Set the priority
    #[inline]
    pub fn set_priority(&mut self, priority: Priority) {
        self.raw = set_bits(self.raw, PRIORITY_SHIFT, PRIORITY_WIDTH, priority.to_u8());
    }

    /// Copy with a different priority
    #[inline]
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.set_priority(priority);
        self
    }

    /// Telegram type tag (bits 3-0)
    #[inline(always)]
    pub const fn telegram_type(self) -> u8 {
        get_bits(self.raw, TELEGRAM_TYPE_SHIFT, TELEGRAM_TYPE_WIDTH)
    }

    /// Set the telegram type tag.
    ///
    /// # Errors
    ///
    /// Returns `KnxError::Range` if `telegram_type > 15`.
    pub fn set_telegram_type(&mut self, telegram_type: u8) -> Result<()> {
        if telegram_type > MAX_TELEGRAM_TYPE {
            return Err(KnxError::out_of_range("telegram_type"));
        }
        self.raw = set_bits(
            self.raw,
            TELEGRAM_TYPE_SHIFT,
            TELEGRAM_TYPE_WIDTH,
            telegram_type,
        );
        Ok(())
    }
}

impl Default for ControlField {
    #[inline]
    fn default() -> Self {
        // Standard frame, do not repeat, low priority, telegram type 0
        // 0b1111_0000 = 0xF0
        Self { raw: 0xF0 }
    }
}

impl fmt::Display for ControlField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} frame, {}, {:?} priority, telegram type {}",
            self.frame_type(),
            if self.do_not_repeat() { "no repeat" } else { "repeat" },
            self.priority(),
            self.telegram_type()
        )
    }
}

// =============================================================================
// Extended Control Field
// =============================================================================

/// Extended control field (second control octet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtendedControlField {
    raw: u8,
}

impl From<u8> for ExtendedControlField {
    #[inline(always)]
    fn from(raw: u8) -> Self {
        Self { raw }
    }
}

impl From<ExtendedControlField> for u8 {
    #[inline(always)]
    fn from(ctrl: ExtendedControlField) -> u8 {
        ctrl.raw
    }
}

impl ExtendedControlField {
    /// Create an extended control field.
    ///
    /// # Errors
    ///
    /// Returns `KnxError::Range` if `hop_count > 15`.
    pub fn new(address_type: AddressType, hop_count: u8, extended_format: bool) -> Result<Self> {
        let mut ctrl = Self { raw: 0 };
        ctrl.set_address_type(address_type);
        ctrl.set_hop_count(hop_count)?;
        ctrl.set_extended_frame_format(extended_format);
        Ok(ctrl)
    }

    /// Get raw byte value
    #[inline(always)]
    pub const fn raw(self) -> u8 {
        self.raw
    }

    /// Destination address type (bit 7)
    #[inline(always)]
    pub const fn address_type(self) -> AddressType {
        if get_flag(self.raw, ADDRESS_TYPE_BIT) {
            AddressType::Group
        } else {
            AddressType::Individual
        }
    }

    /// Check if destination is a group address
    #[inline(always)]
    pub const fn is_group_address(self) -> bool {
        get_flag(self.raw, ADDRESS_TYPE_BIT)
    }

    /// Set the destination address type
    #[inline]
    pub fn set_address_type(&mut self, address_type: AddressType) {
        self.raw = set_flag(self.raw, ADDRESS_TYPE_BIT, address_type == AddressType::Group);
    }

    /// Copy with a different address type
    #[inline]
    #[must_use]
    pub fn with_address_type(mut self, address_type: AddressType) -> Self {
        self.set_address_type(address_type);
        self
    }

    /// Hop count (bits 6-3)
    #[inline(always)]
    pub const fn hop_count(self) -> u8 {
        get_bits(self.raw, HOP_COUNT_SHIFT, HOP_COUNT_WIDTH)
    }

    /// Set the hop count.
    ///
    /// # Errors
    ///
    /// Returns `KnxError::Range` if `count > 15`.
    pub fn set_hop_count(&mut self, count: u8) -> Result<()> {
        if count > MAX_HOP_COUNT {
            return Err(KnxError::out_of_range("hop_count"));
        }
        self.raw = set_bits(self.raw, HOP_COUNT_SHIFT, HOP_COUNT_WIDTH, count);
        Ok(())
    }

    /// Copy with a different hop count
    pub fn with_hop_count(mut self, count: u8) -> Result<Self> {
        self.set_hop_count(count)?;
        Ok(self)
    }

    /// Relays must drop the frame instead of forwarding it
    #[inline(always)]
    pub const fn is_hop_budget_exhausted(self) -> bool {
        self.hop_count() == 0
    }

    /// Extended frame format flag (bit 0)
    #[inline(always)]
    pub const fn extended_frame_format(self) -> bool {
        get_flag(self.raw, EXTENDED_FORMAT_BIT)
    }

    /// Set the extended frame format flag
    #[inline]
    pub fn set_extended_frame_format(&mut self, extended: bool) {
        self.raw = set_flag(self.raw, EXTENDED_FORMAT_BIT, extended);
    }
}

impl Default for ExtendedControlField {
    #[inline]
    fn default() -> Self {
        // Group address, hop count 6, standard format
        // 0b1011_0000 = 0xB0
        Self { raw: 0xB0 }
    }
}

impl fmt::Display for ExtendedControlField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} destination, hop count {}, extended format {}",
            self.address_type(),
            self.hop_count(),
            self.extended_frame_format()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIORITIES: [Priority; 4] = [
        Priority::System,
        Priority::Normal,
        Priority::Urgent,
        Priority::Low,
    ];

    #[test]
    fn test_control_field_new() {
        let ctrl = ControlField::new(FrameType::Standard, true, Priority::Normal, 5).unwrap();
        assert_eq!(ctrl.frame_type(), FrameType::Standard);
        assert!(ctrl.do_not_repeat());
        assert_eq!(ctrl.priority(), Priority::Normal);
        assert_eq!(ctrl.telegram_type(), 5);
        assert_eq!(ctrl.raw(), 0b1101_0101);
    }

    #[test]
    fn test_control_field_default() {
        let ctrl = ControlField::default();
        assert_eq!(ctrl.raw(), 0xF0);
        assert_eq!(ctrl.frame_type(), FrameType::Standard);
        assert!(ctrl.do_not_repeat());
        assert_eq!(ctrl.priority(), Priority::Low);
        assert_eq!(ctrl.telegram_type(), 0);
    }

    #[test]
    fn test_control_field_priority_bits() {
        for p in PRIORITIES {
            let ctrl = ControlField::from(0).with_priority(p);
            assert_eq!(ctrl.raw(), p.to_u8() << 4);
        }
    }

    #[test]
    fn test_control_field_rejects_wide_telegram_type() {
        let mut ctrl = ControlField::default();
        let result = ctrl.set_telegram_type(16);
        assert!(matches!(result, Err(KnxError::Range(_))));
        assert_eq!(ctrl.raw(), 0xF0);
    }

    #[test]
    fn test_control_field_isolation_all_bytes() {
        for raw in 0..=255u8 {
            let base = ControlField::from(raw);

            let ctrl = base.with_frame_type(FrameType::Extended);
            assert_eq!(ctrl.do_not_repeat(), base.do_not_repeat());
            assert_eq!(ctrl.priority(), base.priority());
            assert_eq!(ctrl.telegram_type(), base.telegram_type());

            let ctrl = base.with_do_not_repeat(!base.do_not_repeat());
            assert_eq!(ctrl.frame_type(), base.frame_type());
            assert_eq!(ctrl.priority(), base.priority());
            assert_eq!(ctrl.telegram_type(), base.telegram_type());

            for p in PRIORITIES {
                let ctrl = base.with_priority(p);
                assert_eq!(ctrl.priority(), p);
                assert_eq!(ctrl.frame_type(), base.frame_type());
                assert_eq!(ctrl.do_not_repeat(), base.do_not_repeat());
                assert_eq!(ctrl.telegram_type(), base.telegram_type());
            }

            for t in 0..=15 {
                let mut ctrl = base;
                ctrl.set_telegram_type(t).unwrap();
                assert_eq!(ctrl.telegram_type(), t);
                assert_eq!(ctrl.frame_type(), base.frame_type());
                assert_eq!(ctrl.do_not_repeat(), base.do_not_repeat());
                assert_eq!(ctrl.priority(), base.priority());
            }
        }
    }

    #[test]
    fn test_extended_default() {
        let ctrl = ExtendedControlField::default();
        assert_eq!(ctrl.raw(), 0xB0);
        assert_eq!(ctrl.address_type(), AddressType::Group);
        assert_eq!(ctrl.hop_count(), 6);
        assert!(!ctrl.extended_frame_format());
    }

    #[test]
    fn test_hop_count_roundtrip_all_bytes() {
        for raw in 0..=255u8 {
            for h in 0..=MAX_HOP_COUNT {
                let mut ctrl = ExtendedControlField::from(raw);
                ctrl.set_hop_count(h).unwrap();
                assert_eq!(ctrl.hop_count(), h);
                assert_eq!(ctrl.raw() & 0x87, raw & 0x87);
            }
        }
    }

    #[test]
    fn test_hop_count_rejects_16() {
        let mut ctrl = ExtendedControlField::default();
        assert!(matches!(ctrl.set_hop_count(16), Err(KnxError::Range(_))));
        assert_eq!(ctrl.hop_count(), 6);
        assert!(ExtendedControlField::new(AddressType::Group, 16, false).is_err());
    }

    #[test]
    fn test_hop_budget_exhausted() {
        let ctrl = ExtendedControlField::default().with_hop_count(0).unwrap();
        assert!(ctrl.is_hop_budget_exhausted());
        assert!(!ExtendedControlField::default().is_hop_budget_exhausted());
    }

    #[test]
    fn test_extended_individual() {
        let ctrl = ExtendedControlField::new(AddressType::Individual, 5, true).unwrap();
        assert!(!ctrl.is_group_address());
        assert_eq!(ctrl.hop_count(), 5);
        assert!(ctrl.extended_frame_format());
        assert_eq!(ctrl.raw(), 0b0010_1001);
    }

    #[test]
    fn test_enum_try_from() {
        assert_eq!(Priority::try_from(2).unwrap(), Priority::Urgent);
        assert!(matches!(Priority::try_from(4), Err(KnxError::UnsupportedType(_))));
        assert_eq!(FrameType::try_from(1).unwrap(), FrameType::Standard);
        assert!(FrameType::try_from(2).is_err());
        assert_eq!(AddressType::try_from(0).unwrap(), AddressType::Individual);
        assert!(AddressType::try_from(9).is_err());
    }

    #[test]
    fn test_priority_from_str() {
        assert_eq!("urgent".parse::<Priority>().unwrap(), Priority::Urgent);
        assert_eq!("LOW".parse::<Priority>().unwrap(), Priority::Low);
        assert!("fast".parse::<Priority>().is_err());
    }

    #[test]
    fn test_display() {
        let ctrl = ControlField::default();
        assert_eq!(
            format!("{}", ctrl),
            "Standard frame, no repeat, Low priority, telegram type 0"
        );
        let ext = ExtendedControlField::default();
        assert_eq!(
            format!("{}", ext),
            "Group destination, hop count 6, extended format false"
        );
    }
}
