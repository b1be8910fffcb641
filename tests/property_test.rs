//! Property tests over the codec's numeric domains.

use knx_codec::addressing::{format_address, parse_address, AddressKind};
use knx_codec::config::CodecConfig;
use knx_codec::dpt::{self, dpt9, DptTag, DptValue};
use knx_codec::protocol::control::{ControlField, ExtendedControlField, Priority};
use knx_codec::protocol::datagram::{Datagram, DatagramBuilder};
use proptest::prelude::*;

fn priority() -> impl Strategy<Value = Priority> {
    (0u8..4).prop_map(Priority::from_bits)
}

proptest! {
    #[test]
    fn float16_stays_within_resolution(value in -671_000.0f32..670_000.0f32) {
        let decoded = dpt9::decode_raw(dpt9::encode_f16(value).unwrap());
        let tolerance = (value.abs() * 0.0006).max(0.0051);
        prop_assert!(
            (decoded - value).abs() <= tolerance,
            "{} decoded as {}", value, decoded
        );
    }

    #[test]
    fn float16_encoding_is_stable(raw in any::<u16>()) {
        // Decoding then re-encoding lands on an equal value, not necessarily equal bits
        let value = dpt9::decode_raw(raw.to_be_bytes());
        let again = dpt9::decode_raw(dpt9::encode_f16(value).unwrap());
        prop_assert!((again - value).abs() <= (value.abs() * 0.0006).max(0.0051));
    }

    #[test]
    fn every_individual_address_formats_and_parses(raw in any::<u16>()) {
        let text = format_address(&raw.to_be_bytes(), AddressKind::Individual).unwrap();
        prop_assert_eq!(
            parse_address(&text).unwrap(),
            (AddressKind::Individual, raw.to_be_bytes())
        );
    }

    #[test]
    fn every_group_address_formats_and_parses(raw in any::<u16>()) {
        for kind in [AddressKind::Group2Level, AddressKind::Group3Level] {
            let text = format_address(&raw.to_be_bytes(), kind).unwrap();
            prop_assert_eq!(parse_address(&text).unwrap(), (kind, raw.to_be_bytes()));
        }
    }

    #[test]
    fn priority_setter_touches_only_its_bits(raw in any::<u8>(), p in priority()) {
        let mut ctrl = ControlField::from(raw);
        ctrl.set_priority(p);
        prop_assert_eq!(ctrl.priority(), p);
        prop_assert_eq!(u8::from(ctrl) & !0b0011_0000, raw & !0b0011_0000);
    }

    #[test]
    fn repeat_setter_touches_only_its_bit(raw in any::<u8>(), flag in any::<bool>()) {
        let mut ctrl = ControlField::from(raw);
        ctrl.set_do_not_repeat(flag);
        prop_assert_eq!(ctrl.do_not_repeat(), flag);
        prop_assert_eq!(u8::from(ctrl) & !0b0100_0000, raw & !0b0100_0000);
    }

    #[test]
    fn hop_count_round_trips(raw in any::<u8>(), hops in 0u8..=15) {
        let mut ext = ExtendedControlField::from(raw);
        ext.set_hop_count(hops).unwrap();
        prop_assert_eq!(ext.hop_count(), hops);
        prop_assert_eq!(u8::from(ext) & !0b0111_1000, raw & !0b0111_1000);
    }

    #[test]
    fn hop_count_above_four_bits_is_rejected(raw in any::<u8>(), hops in 16u8..) {
        let mut ext = ExtendedControlField::from(raw);
        prop_assert!(ext.set_hop_count(hops).is_err());
        prop_assert_eq!(u8::from(ext), raw);
    }

    #[test]
    fn integer_types_round_trip(a in any::<u8>(), b in any::<i8>(), c in any::<u16>(),
                                d in any::<i16>(), e in any::<u32>(), f in any::<i32>()) {
        let values = [
            (DptTag::Unsigned8, DptValue::U8(a)),
            (DptTag::Signed8, DptValue::I8(b)),
            (DptTag::Unsigned16, DptValue::U16(c)),
            (DptTag::Signed16, DptValue::I16(d)),
            (DptTag::Unsigned32, DptValue::U32(e)),
            (DptTag::Signed32, DptValue::I32(f)),
        ];
        for (tag, value) in values {
            let bytes = dpt::encode(tag, &value).unwrap();
            prop_assert_eq!(bytes.len(), tag.size().unwrap());
            prop_assert_eq!(dpt::decode(tag, &bytes).unwrap(), value);
        }
    }

    #[test]
    fn datagrams_round_trip(
        main in 0u8..32,
        middle in 0u8..8,
        sub in any::<u8>(),
        value in any::<u16>(),
        channel in any::<u8>(),
        seq in any::<u8>(),
        tunnel in any::<bool>(),
    ) {
        let builder = DatagramBuilder::new(&CodecConfig::default());
        let builder = if tunnel { builder.tunnelling(channel, seq) } else { builder };
        let dest = format!("{main}/{middle}/{sub}");
        let datagram = builder
            .group_write(&dest, DptTag::Unsigned16, &DptValue::U16(value))
            .unwrap();
        let bytes = datagram.to_bytes().unwrap();
        prop_assert_eq!(bytes.len(), datagram.total_length());

        let parsed = Datagram::parse(&bytes).unwrap();
        prop_assert_eq!(&parsed, &datagram);
        prop_assert_eq!(parsed.group_value(DptTag::Unsigned16).unwrap(), DptValue::U16(value));
    }

    #[test]
    fn parse_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let _ = Datagram::parse(&bytes);
    }
}
