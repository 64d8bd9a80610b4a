// Signed offset field of old-offset chunks.
//
// First byte: bits 0..2 extension count `k`, bits 2..8 low 6 bits of the
// field. `k` little-endian bytes follow, for a field width of `6 + 8k` bits.
// The field is two's complement over its own width.

use super::error::{Error, Result, SizeField};
use super::header::Packed;

/// Smallest offset representable with three extension bytes.
pub const MIN_OFFSET: i32 = -(1 << 29);
/// Largest offset representable with three extension bytes.
pub const MAX_OFFSET: i32 = (1 << 29) - 1;

/// Number of extension bytes needed for `offset`.
#[inline]
pub fn extension_len(offset: i32) -> usize {
    match offset {
        -0x20..0x20 => 0,
        -0x2000..0x2000 => 1,
        -0x20_0000..0x20_0000 => 2,
        _ => 3,
    }
}

pub fn encode(offset: i32) -> Result<Packed> {
    if !(MIN_OFFSET..=MAX_OFFSET).contains(&offset) {
        return Err(Error::InvalidSize {
            field: SizeField::Offset,
            value: offset as i64,
        });
    }
    let ext = extension_len(offset);
    let mut bytes = [
        (((offset & 0x3F) << 2) as u8) | ext as u8,
        (offset >> 6) as u8,
        (offset >> 14) as u8,
        (offset >> 22) as u8,
    ];
    // Sign bit of the field is the top bit of the last byte used.
    if offset < 0 {
        bytes[ext] |= 0x80;
    }
    Ok(Packed::new(bytes, ext + 1))
}

/// Decode the offset field at `pos`, returning the offset and the next position.
pub fn decode(src: &[u8], pos: usize) -> Result<(i32, usize)> {
    let end = src.len();
    if pos >= end {
        return Err(Error::OutOfBounds { at: pos.min(end) });
    }

    let first = src[pos];
    let ext = (first & 0b11) as usize;
    let p = pos + 1;
    if end - p < ext {
        return Err(Error::OutOfBounds { at: p });
    }

    let mut field = (first >> 2) as u32;
    for (i, &byte) in src[p..p + ext].iter().enumerate() {
        field |= (byte as u32) << (6 + 8 * i);
    }

    let width = 6 + 8 * ext as u32;
    let mut offset = field as i32;
    if field >> (width - 1) != 0 {
        offset -= 1 << width;
    }
    Ok((offset, p + ext))
}
