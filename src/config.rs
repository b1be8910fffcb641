//! Defaults for outgoing telegrams.
//!
//! A [`CodecConfig`] can be built in code or read from `KEY=VALUE` text:
//!
//! ```
//! use knx_codec::config::CodecConfig;
//! use knx_codec::protocol::control::Priority;
//!
//! let config = CodecConfig::parse("SOURCE_ADDRESS=1.1.10\nPRIORITY=normal\n")?;
//! assert_eq!(config.source.to_string(), "1.1.10");
//! assert_eq!(config.priority, Priority::Normal);
//! assert_eq!(config.hop_count, 6);
//! # Ok::<(), knx_codec::KnxError>(())
//! ```

use crate::addressing::{GroupLevel, IndividualAddress};
use crate::dpt::integer::parse_int;
use crate::error::{KnxError, Result};
use crate::protocol::constants::MessageCode;
use crate::protocol::control::{Priority, MAX_HOP_COUNT};

/// Configuration text matching [`CodecConfig::default`].
pub const DEFAULT_CONFIG: &str = r"
# Individual address stamped on outgoing telegrams
SOURCE_ADDRESS=1.1.250
HOP_COUNT=6
PRIORITY=low
# 2 or 3
GROUP_ADDRESS_LEVELS=3
MESSAGE_CODE=L_Data.req
";

/// Settings applied to every telegram built by
/// [`DatagramBuilder`](crate::protocol::datagram::DatagramBuilder).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CodecConfig {
    /// Source individual address
    pub source: IndividualAddress,
    /// Initial hop count (0-15)
    pub hop_count: u8,
    /// Telegram priority
    pub priority: Priority,
    /// How group address text is read and written
    pub group_level: GroupLevel,
    /// cEMI message code for outgoing frames
    pub message_code: MessageCode,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            // 1.1.250
            source: IndividualAddress::from(0x11FA),
            hop_count: 6,
            priority: Priority::Low,
            group_level: GroupLevel::Three,
            message_code: MessageCode::LDataReq,
        }
    }
}

impl CodecConfig {
    /// Read `KEY=VALUE` lines over the defaults.
    ///
    /// Blank lines, `#` comments and unknown keys are skipped. A known key
    /// with an invalid value fails with that value's error.
    pub fn parse(text: &str) -> Result<Self> {
        let mut config = Self::default();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                crate::codec_log!(debug, "config line without '=' skipped");
                continue;
            };
            config.apply(key.trim(), value.trim())?;
        }
        Ok(config)
    }

    fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "SOURCE_ADDRESS" => self.source = value.parse()?,
            "HOP_COUNT" => {
                let hops: u8 = parse_int(value, "hop_count")?;
                if hops > MAX_HOP_COUNT {
                    return Err(KnxError::out_of_range("hop_count"));
                }
                self.hop_count = hops;
            }
            "PRIORITY" => self.priority = value.parse()?,
            "GROUP_ADDRESS_LEVELS" => self.group_level = value.parse()?,
            "MESSAGE_CODE" => self.message_code = value.parse()?,
            _ => crate::codec_log!(debug, "unknown config key skipped"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_text_matches_default() {
        assert_eq!(CodecConfig::parse(DEFAULT_CONFIG).unwrap(), CodecConfig::default());
        assert_eq!(CodecConfig::default().source.to_string(), "1.1.250");
    }

    #[test]
    fn test_overrides() {
        let config = CodecConfig::parse(
            "HOP_COUNT = 7\nGROUP_ADDRESS_LEVELS=2\nMESSAGE_CODE=L_Data.ind\nWIFI=x\n",
        )
        .unwrap();
        assert_eq!(config.hop_count, 7);
        assert_eq!(config.group_level, GroupLevel::Two);
        assert_eq!(config.message_code, MessageCode::LDataInd);
        assert_eq!(config.priority, Priority::Low);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            CodecConfig::parse("HOP_COUNT=16"),
            Err(KnxError::Range(_))
        ));
        assert!(matches!(
            CodecConfig::parse("SOURCE_ADDRESS=16.0.0"),
            Err(KnxError::InvalidAddress(_))
        ));
        assert!(matches!(
            CodecConfig::parse("MESSAGE_CODE=L_Nope.req"),
            Err(KnxError::UnsupportedType(_))
        ));
        assert!(CodecConfig::parse("GROUP_ADDRESS_LEVELS=4").is_err());
        assert!(CodecConfig::parse("PRIORITY=whenever").is_err());
    }
}
