// Chunk header: 2-bit kind tag plus a variable-width `count - 1` field.
//
// Layout of the first byte, LSB first:
//   bits 0..2  kind tag
//   bits 2..4  number of extension bytes `k` (0..=3)
//   bits 4..8  low 4 bits of `count - 1`
// followed by `k` little-endian bytes carrying the next `8 * k` bits.

use super::error::{Error, Result};
use super::types::ChunkKind;

/// Largest count a header can carry (28-bit `count - 1` field).
pub const MAX_COUNT: usize = 1 << 28;

/// Maximum header length in bytes.
pub const MAX_HEADER_LEN: usize = 4;

const EXT_SHIFT: u8 = 2;
const EXT_MASK: u8 = 0b0000_1100;
const LOW_SHIFT: u8 = 4;

/// Up to four packed bytes of a header or an offset field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packed {
    bytes: [u8; 4],
    len: u8,
}

impl Packed {
    pub(crate) fn new(bytes: [u8; 4], len: usize) -> Self {
        debug_assert!((1..=4).contains(&len));
        Self {
            bytes,
            len: len as u8,
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Number of extension bytes needed for `value` (= `count - 1`).
#[inline]
pub fn extension_len(value: u32) -> usize {
    match value {
        0..=0xF => 0,
        0x10..=0xFFF => 1,
        0x1000..=0xF_FFFF => 2,
        _ => 3,
    }
}

/// Encode a header for a chunk of `kind` carrying `count`.
pub fn encode(kind: ChunkKind, count: usize) -> Result<Packed> {
    if count == 0 || count > MAX_COUNT {
        return Err(Error::invalid_count(count));
    }
    let value = (count - 1) as u32;
    let ext = extension_len(value);

    let mut bytes = [0u8; 4];
    bytes[0] = kind.tag() | ((ext as u8) << EXT_SHIFT) | (((value & 0xF) as u8) << LOW_SHIFT);
    let high = value >> 4;
    for (i, slot) in bytes[1..=ext].iter_mut().enumerate() {
        *slot = (high >> (8 * i)) as u8;
    }
    Ok(Packed::new(bytes, ext + 1))
}

/// Decode the header at `pos`.
///
/// Returns the kind, the logical count and the position just past the header.
pub fn decode(src: &[u8], pos: usize) -> Result<(ChunkKind, usize, usize)> {
    let end = src.len();
    if pos >= end {
        return Err(Error::OutOfBounds { at: end });
    }

    let head = src[pos];
    let ext = ((head & EXT_MASK) >> EXT_SHIFT) as usize;
    let mut p = pos + 1;
    if end - p < ext {
        return Err(Error::OutOfBounds { at: p });
    }

    let mut value = (head >> LOW_SHIFT) as usize;
    for (i, &byte) in src[p..p + ext].iter().enumerate() {
        value |= (byte as usize) << (4 + 8 * i);
    }
    p += ext;

    let kind = ChunkKind::from_tag(head & ChunkKind::TAG_MASK, p)?;
    Ok((kind, value + 1, p))
}
