//! Packed BCD conversion
//!
//! In packed BCD the high nibble holds the tens digit and the low nibble
//! the units digit of a value in `0..=99`.

/// Convert a packed BCD byte to its integer value
pub const fn to_int(bcd: u8) -> u8 {
    ((bcd >> 4) & 0x0F) * 10 + (bcd & 0x0F)
}

/// Convert an integer in `0..=99` to packed BCD
pub const fn from_int(value: u8) -> u8 {
    let tens = value / 10;
    let units = value - tens * 10;
    ((tens << 4) & 0xF0) | (units & 0x0F)
}
