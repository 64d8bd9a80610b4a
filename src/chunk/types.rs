// Chunk model: the four chunk kinds and their decoded values.

use super::error::Error;

/// 2-bit kind tag stored in the low bits of every chunk header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ChunkKind {
    Raw = 0,
    RepeatedByte = 1,
    RepeatedArray = 2,
    OldOffset = 3,
}

impl ChunkKind {
    /// Mask selecting the kind tag from a header byte.
    pub const TAG_MASK: u8 = 0b0000_0011;

    #[inline]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Short label used by diagnostics.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Raw => "RAW",
            Self::RepeatedByte => "REP",
            Self::RepeatedArray => "ARR",
            Self::OldOffset => "OLD",
        }
    }

    /// Map a tag back to a kind. `at` is only used for the error.
    #[inline]
    pub fn from_tag(tag: u8, at: usize) -> Result<Self, Error> {
        match tag {
            0 => Ok(Self::Raw),
            1 => Ok(Self::RepeatedByte),
            2 => Ok(Self::RepeatedArray),
            3 => Ok(Self::OldOffset),
            _ => Err(Error::Unreachable { tag, at }),
        }
    }
}

/// One decoded chunk.
///
/// Raw and repeated-array payloads borrow from the buffer they were decoded
/// from and cannot outlive it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chunk<'a> {
    /// Literal bytes.
    Raw(&'a [u8]),
    /// `byte` repeated `count` times.
    RepeatedByte { byte: u8, count: usize },
    /// `pattern` repeated `reps` times, `reps` in `1..=256`.
    RepeatedArray { pattern: &'a [u8], reps: u16 },
    /// `len` bytes of previously seen data at signed distance `offset`.
    OldOffset { offset: i32, len: usize },
}

impl<'a> Chunk<'a> {
    pub fn kind(&self) -> ChunkKind {
        match self {
            Self::Raw(_) => ChunkKind::Raw,
            Self::RepeatedByte { .. } => ChunkKind::RepeatedByte,
            Self::RepeatedArray { .. } => ChunkKind::RepeatedArray,
            Self::OldOffset { .. } => ChunkKind::OldOffset,
        }
    }

    /// Logical count stored in the chunk header (never zero for a decoded chunk).
    pub fn size(&self) -> usize {
        match *self {
            Self::Raw(bytes) => bytes.len(),
            Self::RepeatedByte { count, .. } => count,
            Self::RepeatedArray { pattern, .. } => pattern.len(),
            Self::OldOffset { len, .. } => len,
        }
    }

    /// Number of output bytes this chunk stands for once materialized.
    pub fn expanded_len(&self) -> usize {
        match *self {
            Self::RepeatedArray { pattern, reps } => pattern.len().saturating_mul(reps as usize),
            _ => self.size(),
        }
    }

    /// Borrowed payload bytes, for the kinds that carry any.
    pub fn payload(&self) -> Option<&'a [u8]> {
        match *self {
            Self::Raw(bytes) => Some(bytes),
            Self::RepeatedArray { pattern, .. } => Some(pattern),
            Self::RepeatedByte { .. } | Self::OldOffset { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_roundtrip() {
        for kind in [
            ChunkKind::Raw,
            ChunkKind::RepeatedByte,
            ChunkKind::RepeatedArray,
            ChunkKind::OldOffset,
        ] {
            assert_eq!(ChunkKind::from_tag(kind.tag(), 0), Ok(kind));
        }
        assert_eq!(
            ChunkKind::from_tag(4, 9),
            Err(Error::Unreachable { tag: 4, at: 9 })
        );
    }

    #[test]
    fn sizes_and_expansion() {
        let pattern = [1u8, 2, 3];
        let arr = Chunk::RepeatedArray {
            pattern: &pattern,
            reps: 256,
        };
        assert_eq!(arr.kind(), ChunkKind::RepeatedArray);
        assert_eq!(arr.size(), 3);
        assert_eq!(arr.expanded_len(), 768);
        assert_eq!(arr.payload(), Some(&pattern[..]));

        let rep = Chunk::RepeatedByte {
            byte: 0x42,
            count: 100,
        };
        assert_eq!(rep.size(), 100);
        assert_eq!(rep.expanded_len(), 100);
        assert_eq!(rep.payload(), None);

        let off = Chunk::OldOffset {
            offset: -8191,
            len: 1024,
        };
        assert_eq!(off.size(), 1024);
        assert_eq!(off.kind().label(), "OLD");
    }
}
