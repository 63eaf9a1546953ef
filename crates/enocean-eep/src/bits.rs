//! Big-endian bit-field access over byte slices.
//!
//! Offset 0 is the most significant bit of the first byte. Fields may span
//! byte boundaries and be up to 32 bits wide.

/// Largest field width supported by [`read_bits`] / [`write_bits`].
pub const MAX_FIELD_BITS: usize = 32;

/// Returns true when `offset..offset + size` lies within `bytes`.
pub fn fits(bytes: &[u8], offset: usize, size: usize) -> bool {
    size <= MAX_FIELD_BITS
        && offset
            .checked_add(size)
            .is_some_and(|end| end <= bytes.len() * 8)
}

/// Read an unsigned field. Returns `None` when the range does not fit.
pub fn read_bits(bytes: &[u8], offset: usize, size: usize) -> Option<u32> {
    if !fits(bytes, offset, size) {
        return None;
    }

    let mut value = 0u32;
    for pos in offset..offset + size {
        let bit = (bytes[pos / 8] >> (7 - pos % 8)) & 1;
        value = (value << 1) | u32::from(bit);
    }
    Some(value)
}

/// Write the low `size` bits of `value` into the field.
///
/// Returns `false` (and leaves `bytes` untouched) when the range does not fit.
/// Bits of `value` above `size` are ignored.
pub fn write_bits(bytes: &mut [u8], offset: usize, size: usize, value: u32) -> bool {
    if !fits(bytes, offset, size) {
        return false;
    }

    for i in 0..size {
        let pos = offset + i;
        let mask = 0x80u8 >> (pos % 8);
        if (value >> (size - 1 - i)) & 1 == 1 {
            bytes[pos / 8] |= mask;
        } else {
            bytes[pos / 8] &= !mask;
        }
    }
    true
}

/// Largest raw value a field of `size` bits can hold.
pub fn max_raw(size: usize) -> u32 {
    if size >= MAX_FIELD_BITS {
        u32::MAX
    } else {
        (1u32 << size) - 1
    }
}
