// Chunk encoder: frames one chunk as header + kind-specific bytes.
//
// A `Frame` validates every size up front and holds the encoded prefix
// inline; the payload stays borrowed until it is copied into a buffer.
// Nothing is written anywhere until the whole frame is known to fit.

use super::error::{Error, Result, SizeField};
use super::header::{self, MAX_HEADER_LEN, Packed};
use super::offset;
use super::types::{Chunk, ChunkKind};

/// Largest repetition count of a repeated-array chunk.
pub const MAX_REPS: usize = 256;

/// Longest prefix a frame can carry: header plus a 4-byte offset field.
pub const MAX_FRAME_PREFIX: usize = MAX_HEADER_LEN + 4;

/// One chunk ready to be appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'p> {
    prefix: [u8; MAX_FRAME_PREFIX],
    prefix_len: usize,
    payload: &'p [u8],
}

impl<'p> Frame<'p> {
    fn assemble(head: Packed, tail: &[u8], payload: &'p [u8]) -> Self {
        let mut prefix = [0u8; MAX_FRAME_PREFIX];
        let head = head.as_bytes();
        prefix[..head.len()].copy_from_slice(head);
        prefix[head.len()..head.len() + tail.len()].copy_from_slice(tail);
        Self {
            prefix,
            prefix_len: head.len() + tail.len(),
            payload,
        }
    }

    /// Literal bytes.
    pub fn raw(bytes: &'p [u8]) -> Result<Self> {
        let head = header::encode(ChunkKind::Raw, bytes.len())?;
        Ok(Self::assemble(head, &[], bytes))
    }

    /// `byte` repeated `count` times.
    pub fn rep(byte: u8, count: usize) -> Result<Self> {
        let head = header::encode(ChunkKind::RepeatedByte, count)?;
        Ok(Self::assemble(head, &[byte], &[]))
    }

    /// `pattern` repeated `reps` times, `reps` in `1..=256`.
    pub fn arr(pattern: &'p [u8], reps: usize) -> Result<Self> {
        if pattern.is_empty() {
            return Err(Error::invalid_count(0));
        }
        if reps == 0 || reps > MAX_REPS {
            return Err(Error::InvalidSize {
                field: SizeField::Reps,
                value: i64::try_from(reps).unwrap_or(i64::MAX),
            });
        }
        let head = header::encode(ChunkKind::RepeatedArray, pattern.len())?;
        Ok(Self::assemble(head, &[(reps - 1) as u8], pattern))
    }

    /// Reference to `len` bytes of old data at signed distance `offset`.
    pub fn off(offset: i32, len: usize) -> Result<Self> {
        let head = header::encode(ChunkKind::OldOffset, len)?;
        let field = offset::encode(offset)?;
        Ok(Self::assemble(head, field.as_bytes(), &[]))
    }

    /// Frame an already decoded chunk.
    pub fn from_chunk(chunk: &Chunk<'p>) -> Result<Self> {
        match *chunk {
            Chunk::Raw(bytes) => Self::raw(bytes),
            Chunk::RepeatedByte { byte, count } => Self::rep(byte, count),
            Chunk::RepeatedArray { pattern, reps } => Self::arr(pattern, reps as usize),
            Chunk::OldOffset { offset, len } => Self::off(offset, len),
        }
    }

    /// Header and inline bytes (reps byte, repeated byte or offset field).
    pub fn prefix(&self) -> &[u8] {
        &self.prefix[..self.prefix_len]
    }

    pub fn payload(&self) -> &'p [u8] {
        self.payload
    }

    /// Total bytes this frame occupies on the wire.
    pub fn encoded_len(&self) -> usize {
        self.prefix_len + self.payload.len()
    }

    /// Write the frame at the start of `dst`, returning the bytes written.
    ///
    /// `dst` is left untouched if it is too short.
    pub fn write_to(&self, dst: &mut [u8]) -> Result<usize> {
        let needed = self.encoded_len();
        if dst.len() < needed {
            return Err(Error::NoMemory {
                needed,
                available: dst.len(),
            });
        }
        let (head, rest) = dst.split_at_mut(self.prefix_len);
        head.copy_from_slice(self.prefix());
        rest[..self.payload.len()].copy_from_slice(self.payload);
        Ok(needed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire(frame: Frame<'_>) -> Vec<u8> {
        let mut out = vec![0u8; frame.encoded_len()];
        frame.write_to(&mut out).unwrap();
        out
    }

    #[test]
    fn single_byte_chunks() {
        assert_eq!(wire(Frame::raw(&[0x00]).unwrap()), [0x00, 0x00]);
        assert_eq!(wire(Frame::rep(0x2A, 1).unwrap()), [0x01, 0x2A]);
        assert_eq!(wire(Frame::arr(&[0x00], 1).unwrap()), [0x02, 0x00, 0x00]);
        assert_eq!(wire(Frame::off(0, 1).unwrap()), [0x03, 0x00]);
    }

    #[test]
    fn old_offset_frame() {
        let frame = Frame::off(-8191, 1024).unwrap();
        assert_eq!(frame.prefix(), &[0xF7, 0x3F, 0x05, 0x80]);
        assert!(frame.payload().is_empty());
    }

    #[test]
    fn array_reps_stored_minus_one() {
        assert_eq!(wire(Frame::arr(&[0x42], 256).unwrap()), [0x02, 0xFF, 0x42]);
        assert_eq!(wire(Frame::arr(&[0x42], 16).unwrap()), [0x02, 0x0F, 0x42]);
    }

    #[test]
    fn invalid_sizes() {
        assert_eq!(Frame::raw(&[]), Err(Error::invalid_count(0)));
        assert_eq!(Frame::rep(0x42, 0), Err(Error::invalid_count(0)));
        assert_eq!(Frame::arr(&[], 1), Err(Error::invalid_count(0)));
        assert_eq!(
            Frame::arr(&[0x00], 0),
            Err(Error::InvalidSize {
                field: SizeField::Reps,
                value: 0
            })
        );
        assert_eq!(
            Frame::arr(&[0x00], 257),
            Err(Error::InvalidSize {
                field: SizeField::Reps,
                value: 257
            })
        );
        assert_eq!(Frame::off(5, 0), Err(Error::invalid_count(0)));
    }

    #[test]
    fn write_to_short_destination_is_untouched() {
        let frame = Frame::raw(&[1, 2, 3]).unwrap();
        let mut dst = [0xEEu8; 3];
        assert_eq!(
            frame.write_to(&mut dst),
            Err(Error::NoMemory {
                needed: 4,
                available: 3
            })
        );
        assert_eq!(dst, [0xEE; 3]);
    }

    #[test]
    fn frames_decoded_chunks() {
        let pattern = [0xDE, 0xAD];
        let chunk = Chunk::RepeatedArray {
            pattern: &pattern,
            reps: 4,
        };
        let frame = Frame::from_chunk(&chunk).unwrap();
        assert_eq!(wire(frame), [0x12, 0x03, 0xDE, 0xAD]);
    }
}
