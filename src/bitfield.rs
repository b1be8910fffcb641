//! Sub-byte bit range helpers.
//!
//! Every field codec in this crate (control fields, addresses, DPT packing)
//! is a mask-and-shift over an octet or a 16-bit word. These helpers keep the
//! mask arithmetic in one place.
//!
//! ```text
//!   bit:   7 6 5 4 3 2 1 0
//!              └─┬─┘
//!   get_bits(v, 4, 2) reads bits 5-4
//! ```

/// Mask covering the low `width` bits of an octet.
#[inline(always)]
pub const fn mask8(width: u32) -> u8 {
    if width >= 8 {
        0xFF
    } else {
        ((1u16 << width) - 1) as u8
    }
}

/// Mask covering the low `width` bits of a 16-bit word.
#[inline(always)]
pub const fn mask16(width: u32) -> u16 {
    if width >= 16 {
        0xFFFF
    } else {
        ((1u32 << width) - 1) as u16
    }
}

/// Read `width` bits of `value` starting at bit `shift`.
#[inline(always)]
pub const fn get_bits(value: u8, shift: u32, width: u32) -> u8 {
    (value >> shift) & mask8(width)
}

/// Replace `width` bits of `value` starting at bit `shift` with `field`.
///
/// Bits of `field` beyond `width` are discarded; all bits of `value` outside
/// the target range are preserved.
#[inline(always)]
pub const fn set_bits(value: u8, shift: u32, width: u32, field: u8) -> u8 {
    let mask = mask8(width) << shift;
    (value & !mask) | ((field << shift) & mask)
}

/// Read a single flag bit.
#[inline(always)]
pub const fn get_flag(value: u8, bit: u32) -> bool {
    get_bits(value, bit, 1) != 0
}

/// Set or clear a single flag bit.
#[inline(always)]
pub const fn set_flag(value: u8, bit: u32, on: bool) -> u8 {
    set_bits(value, bit, 1, on as u8)
}

/// Read `width` bits of a 16-bit word starting at bit `shift`.
#[inline(always)]
pub const fn get_bits16(value: u16, shift: u32, width: u32) -> u16 {
    (value >> shift) & mask16(width)
}

/// Replace `width` bits of a 16-bit word starting at bit `shift`.
#[inline(always)]
pub const fn set_bits16(value: u16, shift: u32, width: u32, field: u16) -> u16 {
    let mask = mask16(width) << shift;
    (value & !mask) | ((field << shift) & mask)
}
