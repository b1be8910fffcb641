//! Plain integer families: DPT 6 (i8), 8 (i16) and 12 (u32).
//!
//! These have no scaling. DPT 5, 7 and 13 have their own modules because they
//! carry subtype metadata; the remaining widths only need the big-endian
//! conversions already handled by [`crate::dpt::encode`].

use crate::error::{KnxError, Result};

/// Parse decimal text into `T`, range checking before narrowing.
///
/// Text that is not an integer at all is `Encoding`; an integer that does not
/// fit `T` is `Range` naming `field`.
pub(crate) fn parse_int<T: TryFrom<i64>>(text: &str, field: &'static str) -> Result<T> {
    let wide: i64 = text.trim().parse().map_err(|_| KnxError::malformed())?;
    T::try_from(wide).map_err(|_| KnxError::out_of_range(field))
}
