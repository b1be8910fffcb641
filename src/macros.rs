//! Convenience macros for KNX addresses and group telegrams.

/// Creates a [`GroupAddress`](crate::addressing::GroupAddress) from 3-level
/// (`main/middle/sub`) or 2-level (`main/sub`) notation.
///
/// Components are checked at compile time.
///
/// # Examples
///
/// ```
/// use knx_codec::ga;
///
/// let light = ga!(1/2/3);
/// assert_eq!(light.raw(), 0x0A03);
///
/// let scene = ga!(1/100);
/// assert_eq!(scene.raw(), 0x0864);
/// ```
///
/// ```compile_fail
/// // main group > 31
/// let addr = knx_codec::ga!(32/0/0);
/// ```
///
/// ```compile_fail
/// // middle group > 7
/// let addr = knx_codec::ga!(1/8/0);
/// ```
#[macro_export]
macro_rules! ga {
    ($main:literal / $middle:literal / $sub:literal) => {{
        const _: () = {
            if $main > 31 {
                panic!("Main group must be 0-31");
            }
            if $middle > 7 {
                panic!("Middle group must be 0-7");
            }
            if $sub > 255 {
                panic!("Sub group must be 0-255");
            }
        };
        // MMMMMIII SSSSSSSS
        const RAW: u16 = (($main & 0x1F) << 11) | (($middle & 0x07) << 8) | ($sub & 0xFF);
        $crate::addressing::GroupAddress::from(RAW)
    }};
    ($main:literal / $sub:literal) => {{
        const _: () = {
            if $main > 31 {
                panic!("Main group must be 0-31");
            }
            if $sub > 2047 {
                panic!("Sub group must be 0-2047");
            }
        };
        // MMMMMSSS SSSSSSSS
        const RAW: u16 = (($main & 0x1F) << 11) | ($sub & 0x07FF);
        $crate::addressing::GroupAddress::from(RAW)
    }};
}

/// Creates an [`IndividualAddress`](crate::addressing::IndividualAddress)
/// from `area, line, device`, checked at compile time.
///
/// ```
/// use knx_codec::ia;
///
/// assert_eq!(ia!(1, 1, 250).to_string(), "1.1.250");
/// ```
///
/// ```compile_fail
/// let addr = knx_codec::ia!(16, 0, 0);
/// ```
#[macro_export]
macro_rules! ia {
    ($area:literal, $line:literal, $device:literal) => {{
        const _: () = {
            if $area > 15 {
                panic!("Area must be 0-15");
            }
            if $line > 15 {
                panic!("Line must be 0-15");
            }
            if $device > 255 {
                panic!("Device must be 0-255");
            }
        };
        const RAW: u16 = (($area & 0x0F) << 12) | (($line & 0x0F) << 8) | ($device & 0xFF);
        $crate::addressing::IndividualAddress::from(RAW)
    }};
}

/// Group write through a
/// [`DatagramBuilder`](crate::protocol::datagram::DatagramBuilder) with
/// inline 3-level address notation.
///
/// ```
/// use knx_codec::config::CodecConfig;
/// use knx_codec::dpt::{DptTag, DptValue};
/// use knx_codec::knx_write;
/// use knx_codec::protocol::datagram::DatagramBuilder;
///
/// let builder = DatagramBuilder::new(&CodecConfig::default());
/// let datagram = knx_write!(builder, 1/2/3, DptTag::Boolean, &DptValue::Bool(true))?;
/// assert_eq!(datagram.cemi().destination().raw(), 0x0A03);
/// # Ok::<(), knx_codec::KnxError>(())
/// ```
#[macro_export]
macro_rules! knx_write {
    ($builder:expr, $main:literal / $middle:literal / $sub:literal, $tag:expr, $value:expr) => {
        $builder.group_write(
            ::core::concat!(
                ::core::stringify!($main),
                "/",
                ::core::stringify!($middle),
                "/",
                ::core::stringify!($sub)
            ),
            $tag,
            $value,
        )
    };
}

/// Group read with inline 3-level address notation; see [`knx_write!`].
#[macro_export]
macro_rules! knx_read {
    ($builder:expr, $main:literal / $middle:literal / $sub:literal) => {
        $builder.group_read(::core::concat!(
            ::core::stringify!($main),
            "/",
            ::core::stringify!($middle),
            "/",
            ::core::stringify!($sub)
        ))
    };
}

/// Group response with inline 3-level address notation; see [`knx_write!`].
#[macro_export]
macro_rules! knx_respond {
    ($builder:expr, $main:literal / $middle:literal / $sub:literal, $tag:expr, $value:expr) => {
        $builder.group_response(
            ::core::concat!(
                ::core::stringify!($main),
                "/",
                ::core::stringify!($middle),
                "/",
                ::core::stringify!($sub)
            ),
            $tag,
            $value,
        )
    };
}

#[cfg(test)]
mod tests {
    use crate::addressing::{GroupAddress, IndividualAddress};
    use crate::config::CodecConfig;
    use crate::dpt::{DptTag, DptValue};
    use crate::protocol::apdu::Apci;
    use crate::protocol::datagram::DatagramBuilder;

    #[test]
    fn test_ga_macro_basic() {
        assert_eq!(ga!(1 / 2 / 3), GroupAddress::from(0x0A03));
        assert_eq!(ga!(31 / 7 / 255), GroupAddress::from(0xFFFF));
        assert_eq!(ga!(0 / 0 / 0), GroupAddress::from(0x0000));
        assert_eq!(ga!(5 / 3 / 100), GroupAddress::from(0x2B64));
    }

    #[test]
    fn test_ga_macro_two_level() {
        assert_eq!(ga!(1 / 100), GroupAddress::from(0x0864));
        assert_eq!(ga!(31 / 2047), GroupAddress::from(0xFFFF));
    }

    #[test]
    fn test_ia_macro() {
        assert_eq!(ia!(1, 2, 3), IndividualAddress::from(0x1203));
        assert_eq!(ia!(15, 15, 255), IndividualAddress::from(0xFFFF));
    }

    #[test]
    fn test_telegram_macros() {
        let builder = DatagramBuilder::new(&CodecConfig::default());
        let write = knx_write!(builder, 1 / 2 / 3, DptTag::Unsigned8, &DptValue::U8(7)).unwrap();
        assert_eq!(write.cemi().apdu().apci(), Apci::GroupValueWrite);

        let read = knx_read!(builder, 1 / 2 / 3).unwrap();
        assert_eq!(read.cemi().apdu().apci(), Apci::GroupValueRead);

        let resp = knx_respond!(builder, 1 / 2 / 3, DptTag::Boolean, &DptValue::Bool(false)).unwrap();
        assert_eq!(resp.cemi().apdu().apci(), Apci::GroupValueResponse);
        assert_eq!(resp.cemi().destination().raw(), 0x0A03);
    }
}
