//! Error types for the KNX codec.
//!
//! Every variant of [`KnxError`] wraps a small struct holding a private kind
//! enum plus, when the `std` feature is enabled, a captured backtrace. Callers
//! inspect errors through the `is_*` helpers rather than matching kinds.

use core::fmt;

#[cfg(feature = "std")]
use std::backtrace::Backtrace;

/// Result type alias for KNX codec operations.
pub type Result<T> = core::result::Result<T, KnxError>;

/// Maximum number of bytes of the offending text kept in an [`AddressError`].
pub const MAX_ERROR_TEXT: usize = 32;

// =============================================================================
// Error Kind Enums (Internal)
// =============================================================================

/// Address error variants (internal)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum AddressErrorKind {
    Syntax,
    OutOfRange,
}

/// Unsupported type variants (internal)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum UnsupportedTypeKind {
    UnknownDpt,
    ValueMismatch,
    UnknownMessageCode,
    UnknownServiceType,
    UnsupportedVersion,
    UnknownEnumValue,
}

/// Encoding error variants (internal)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum EncodingErrorKind {
    NonFinite,
    NonAscii,
    NonLatin1,
    LengthMismatch,
    Malformed,
}

// =============================================================================
// Main Error Type
// =============================================================================

/// KNX codec error.
///
/// All errors are local and synchronous; the codec never retries.
#[derive(Debug)]
pub enum KnxError {
    /// Malformed or out-of-range textual address
    InvalidAddress(AddressError),
    /// Value outside a field's permitted range
    Range(RangeError),
    /// Unknown DPT tag, enum value, message code or service type
    UnsupportedType(UnsupportedTypeError),
    /// Value cannot be represented on the wire
    Encoding(EncodingError),
    /// Buffer shorter than the structure being read or written
    FrameTooShort(FrameTooShortError),
}

// =============================================================================
// Structured Error Types
// =============================================================================

/// Address parse error, carrying the rejected text.
#[derive(Debug)]
pub struct AddressError {
    kind: AddressErrorKind,
    text: heapless::String<MAX_ERROR_TEXT>,
    #[cfg(feature = "std")]
    backtrace: Backtrace,
}

impl AddressError {
    pub(crate) fn new(kind: AddressErrorKind, text: &str) -> Self {
        let mut kept = heapless::String::new();
        for c in text.chars() {
            if kept.push(c).is_err() {
                break;
            }
        }
        Self {
            kind,
            text: kept,
            #[cfg(feature = "std")]
            backtrace: Backtrace::capture(),
        }
    }

    /// The rejected text, truncated to [`MAX_ERROR_TEXT`] bytes.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Check if a component was syntactically valid but too large
    pub fn is_out_of_range(&self) -> bool {
        matches!(self.kind, AddressErrorKind::OutOfRange)
    }

    /// Check if the text was malformed
    pub fn is_syntax(&self) -> bool {
        matches!(self.kind, AddressErrorKind::Syntax)
    }
}

/// Range error naming the offending field.
#[derive(Debug)]
pub struct RangeError {
    field: &'static str,
    #[cfg(feature = "std")]
    backtrace: Backtrace,
}

impl RangeError {
    pub(crate) fn new(field: &'static str) -> Self {
        Self {
            field,
            #[cfg(feature = "std")]
            backtrace: Backtrace::capture(),
        }
    }

    /// Name of the field whose value was rejected
    pub fn field(&self) -> &'static str {
        self.field
    }
}

/// Unsupported type error.
#[derive(Debug)]
pub struct UnsupportedTypeError {
    kind: UnsupportedTypeKind,
    #[cfg(feature = "std")]
    backtrace: Backtrace,
}

impl UnsupportedTypeError {
    pub(crate) fn new(kind: UnsupportedTypeKind) -> Self {
        Self {
            kind,
            #[cfg(feature = "std")]
            backtrace: Backtrace::capture(),
        }
    }

    /// Check if the DPT tag is unknown
    pub fn is_unknown_dpt(&self) -> bool {
        matches!(self.kind, UnsupportedTypeKind::UnknownDpt)
    }

    /// Check if a value did not match the shape required by its DPT tag
    pub fn is_value_mismatch(&self) -> bool {
        matches!(self.kind, UnsupportedTypeKind::ValueMismatch)
    }

    /// Check if a cEMI message code was not recognised
    pub fn is_unknown_message_code(&self) -> bool {
        matches!(self.kind, UnsupportedTypeKind::UnknownMessageCode)
    }

    /// Check if a KNXnet/IP service type was not recognised
    pub fn is_unknown_service_type(&self) -> bool {
        matches!(self.kind, UnsupportedTypeKind::UnknownServiceType)
    }

    /// Check if a KNXnet/IP header named a protocol version other than 1.0
    pub fn is_unsupported_version(&self) -> bool {
        matches!(self.kind, UnsupportedTypeKind::UnsupportedVersion)
    }
}

/// Encoding error.
#[derive(Debug)]
pub struct EncodingError {
    kind: EncodingErrorKind,
    #[cfg(feature = "std")]
    backtrace: Backtrace,
}

impl EncodingError {
    pub(crate) fn new(kind: EncodingErrorKind) -> Self {
        Self {
            kind,
            #[cfg(feature = "std")]
            backtrace: Backtrace::capture(),
        }
    }

    /// Check if a NaN or infinite float was rejected
    pub fn is_non_finite(&self) -> bool {
        matches!(self.kind, EncodingErrorKind::NonFinite)
    }

    /// Check if a character outside the permitted set was rejected
    pub fn is_invalid_character(&self) -> bool {
        matches!(
            self.kind,
            EncodingErrorKind::NonAscii | EncodingErrorKind::NonLatin1
        )
    }

    /// Check if a buffer had the wrong length for its type
    pub fn is_length_mismatch(&self) -> bool {
        matches!(self.kind, EncodingErrorKind::LengthMismatch)
    }
}

/// Short buffer error with the needed and available sizes.
#[derive(Debug)]
pub struct FrameTooShortError {
    needed: usize,
    available: usize,
    #[cfg(feature = "std")]
    backtrace: Backtrace,
}

impl FrameTooShortError {
    pub(crate) fn new(needed: usize, available: usize) -> Self {
        Self {
            needed,
            available,
            #[cfg(feature = "std")]
            backtrace: Backtrace::capture(),
        }
    }

    /// Octets required by the structure
    pub fn needed(&self) -> usize {
        self.needed
    }

    /// Octets actually present
    pub fn available(&self) -> usize {
        self.available
    }
}

// =============================================================================
// Convenience Constructors for KnxError
// =============================================================================

impl KnxError {
    // Address errors
    pub(crate) fn address_syntax(text: &str) -> Self {
        Self::InvalidAddress(AddressError::new(AddressErrorKind::Syntax, text))
    }

    pub(crate) fn address_out_of_range(text: &str) -> Self {
        Self::InvalidAddress(AddressError::new(AddressErrorKind::OutOfRange, text))
    }

    // Range errors
    pub(crate) fn out_of_range(field: &'static str) -> Self {
        Self::Range(RangeError::new(field))
    }

    // Unsupported type errors
    pub(crate) fn unknown_dpt() -> Self {
        Self::UnsupportedType(UnsupportedTypeError::new(UnsupportedTypeKind::UnknownDpt))
    }

    pub(crate) fn value_mismatch() -> Self {
        Self::UnsupportedType(UnsupportedTypeError::new(UnsupportedTypeKind::ValueMismatch))
    }

    pub(crate) fn unknown_message_code() -> Self {
        Self::UnsupportedType(UnsupportedTypeError::new(
            UnsupportedTypeKind::UnknownMessageCode,
        ))
    }

    pub(crate) fn unknown_service_type() -> Self {
        Self::UnsupportedType(UnsupportedTypeError::new(
            UnsupportedTypeKind::UnknownServiceType,
        ))
    }

    pub(crate) fn unsupported_version() -> Self {
        Self::UnsupportedType(UnsupportedTypeError::new(
            UnsupportedTypeKind::UnsupportedVersion,
        ))
    }

    pub(crate) fn unknown_enum_value() -> Self {
        Self::UnsupportedType(UnsupportedTypeError::new(
            UnsupportedTypeKind::UnknownEnumValue,
        ))
    }

    // Encoding errors
    pub(crate) fn non_finite() -> Self {
        Self::Encoding(EncodingError::new(EncodingErrorKind::NonFinite))
    }

    pub(crate) fn non_ascii() -> Self {
        Self::Encoding(EncodingError::new(EncodingErrorKind::NonAscii))
    }

    pub(crate) fn non_latin1() -> Self {
        Self::Encoding(EncodingError::new(EncodingErrorKind::NonLatin1))
    }

    pub(crate) fn length_mismatch() -> Self {
        Self::Encoding(EncodingError::new(EncodingErrorKind::LengthMismatch))
    }

    pub(crate) fn malformed() -> Self {
        Self::Encoding(EncodingError::new(EncodingErrorKind::Malformed))
    }

    // Frame errors
    pub(crate) fn frame_too_short(needed: usize, available: usize) -> Self {
        Self::FrameTooShort(FrameTooShortError::new(needed, available))
    }

    /// Fails with [`KnxError::FrameTooShort`] unless `buf` holds `needed` octets.
    #[inline]
    pub(crate) fn ensure_len(buf: &[u8], needed: usize) -> Result<()> {
        if buf.len() < needed {
            return Err(Self::frame_too_short(needed, buf.len()));
        }
        Ok(())
    }

    /// Check if this is an address error
    pub fn is_invalid_address(&self) -> bool {
        matches!(self, Self::InvalidAddress(_))
    }

    /// Check if this is a range error
    pub fn is_range(&self) -> bool {
        matches!(self, Self::Range(_))
    }

    /// Check if this is an unsupported type error
    pub fn is_unsupported_type(&self) -> bool {
        matches!(self, Self::UnsupportedType(_))
    }

    /// Check if this is an encoding error
    pub fn is_encoding(&self) -> bool {
        matches!(self, Self::Encoding(_))
    }

    /// Check if this is a short-buffer error
    pub fn is_frame_too_short(&self) -> bool {
        matches!(self, Self::FrameTooShort(_))
    }
}

// =============================================================================
// Display Implementation
// =============================================================================

impl fmt::Display for KnxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KnxError::InvalidAddress(e) => {
                write!(f, "Invalid address {:?}: {:?}", e.text.as_str(), e.kind)
            }
            KnxError::Range(e) => write!(f, "Value out of range for {}", e.field),
            KnxError::UnsupportedType(e) => write!(f, "Unsupported type: {:?}", e.kind),
            KnxError::Encoding(e) => write!(f, "Encoding error: {:?}", e.kind),
            KnxError::FrameTooShort(e) => write!(
                f,
                "Frame too short: needed {} octets, got {}",
                e.needed, e.available
            ),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for KnxError {
    fn format(&self, f: defmt::Formatter<'_>) {
        match self {
            KnxError::InvalidAddress(e) => {
                defmt::write!(f, "Invalid address {=str}: {}", e.text.as_str(), e.kind);
            }
            KnxError::Range(e) => defmt::write!(f, "Value out of range for {=str}", e.field),
            KnxError::UnsupportedType(e) => defmt::write!(f, "Unsupported type: {}", e.kind),
            KnxError::Encoding(e) => defmt::write!(f, "Encoding error: {}", e.kind),
            KnxError::FrameTooShort(e) => defmt::write!(
                f,
                "Frame too short: needed {=usize} octets, got {=usize}",
                e.needed,
                e.available
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for KnxError {}
