//! Data byte packing shared by the encoder and the decoder.
//!
//! MIDI data bytes only carry 7 bits of payload, the top bit being reserved to mark status bytes.
//! Values wider than 7 bits are split across several data bytes.

/// The largest value a single data byte can carry.
pub(crate) const U7_MAX: u8 = 0x7F;

/// The largest value two data bytes can carry.
pub(crate) const U14_MAX: u16 = 0x3FFF;

/// Whether the byte is a data byte, ie. has its top bit clear.
#[inline]
pub(crate) fn is_data_byte(byte: u8) -> bool {
    byte & 0x80 == 0
}

/// Check that a value fits in a data byte before it is written out.
///
/// # Panics
///
/// Panics if the value has its top bit set.
/// This is a bug in the caller, which constructed a message with an out-of-range field.
#[inline]
#[track_caller]
pub(crate) fn u7(value: u8, field: &'static str) -> u8 {
    assert!(
        value <= U7_MAX,
        "{} {} does not fit in a midi data byte",
        field,
        value
    );
    value
}

/// Split a 14-bit value into two data bytes, least significant 7 bits first.
///
/// # Panics
///
/// Panics if the value does not fit in 14 bits.
#[inline]
#[track_caller]
pub(crate) fn split_u14(value: u16, field: &'static str) -> [u8; 2] {
    assert!(
        value <= U14_MAX,
        "{} {} does not fit in 14 bits",
        field,
        value
    );
    [(value & 0x7F) as u8, (value >> 7) as u8]
}

/// Join two data bytes into a 14-bit value.
/// Note the little-endian order, the least significant 7 bits come first.
#[inline]
pub(crate) fn join_u14(lsb: u8, msb: u8) -> u16 {
    (msb as u16 & 0x7F) << 7 | (lsb as u16 & 0x7F)
}
