// Chunk decoder and the lazy chunk sequence iterator.
//
// `decode` never reads past the end of its input and never panics. Every
// length is checked before it is consumed; on failure the error carries the
// position up to which the input was validated.

use std::iter::FusedIterator;

use super::error::{Error, Result};
use super::types::{Chunk, ChunkKind};
use super::{header, offset};

/// Decode the chunk starting at `pos`.
///
/// Returns the chunk and the position just past its last byte. Payloads
/// borrow from `src`.
pub fn decode(src: &[u8], pos: usize) -> Result<(Chunk<'_>, usize)> {
    let end = src.len();
    let (kind, size, p) = header::decode(src, pos)?;
    let remaining = end - p;

    let decoded = match kind {
        ChunkKind::Raw => {
            if remaining < size {
                return Err(Error::OutOfBounds { at: p });
            }
            (Chunk::Raw(&src[p..p + size]), p + size)
        }
        ChunkKind::RepeatedByte => {
            if remaining < 1 {
                return Err(Error::OutOfBounds { at: p });
            }
            (
                Chunk::RepeatedByte {
                    byte: src[p],
                    count: size,
                },
                p + 1,
            )
        }
        ChunkKind::RepeatedArray => {
            // One reps byte precedes the pattern.
            if remaining <= size {
                return Err(Error::OutOfBounds { at: p });
            }
            let reps = src[p] as u16 + 1;
            let start = p + 1;
            (
                Chunk::RepeatedArray {
                    pattern: &src[start..start + size],
                    reps,
                },
                start + size,
            )
        }
        ChunkKind::OldOffset => {
            let (offset, next) = offset::decode(src, p)?;
            (Chunk::OldOffset { offset, len: size }, next)
        }
    };

    log::trace!(
        "decoded {} [{}] at {pos}..{}",
        kind.label(),
        size,
        decoded.1
    );
    Ok(decoded)
}

/// Single-pass iterator over the chunks of a byte range.
///
/// Iteration stops at the first chunk that fails to decode. A clean end and
/// a truncated or corrupt tail both end the iteration; [`ChunkIter::error`]
/// tells them apart once `next` has returned `None`.
#[derive(Debug, Clone)]
pub struct ChunkIter<'a> {
    src: &'a [u8],
    pos: usize,
    error: Option<Error>,
    done: bool,
}

impl<'a> ChunkIter<'a> {
    pub fn new(src: &'a [u8]) -> Self {
        Self {
            src,
            pos: 0,
            error: None,
            done: false,
        }
    }

    /// Cursor position: start of the next chunk, or where decoding stopped.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes not yet consumed.
    pub fn remainder(&self) -> &'a [u8] {
        &self.src[self.pos..]
    }

    /// Error that ended the iteration, if the tail did not decode.
    ///
    /// `None` while iterating and after a clean end.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.done
    }
}

impl<'a> Iterator for ChunkIter<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.pos >= self.src.len() {
            self.done = true;
            return None;
        }
        match decode(self.src, self.pos) {
            Ok((chunk, next)) => {
                self.pos = next;
                Some(chunk)
            }
            Err(e) => {
                log::debug!("chunk sequence stopped at byte {}: {e}", self.pos);
                if let Some(at) = e.position() {
                    self.pos = at.min(self.src.len());
                }
                self.error = Some(e);
                self.done = true;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            // Every chunk takes at least two bytes.
            (0, Some((self.src.len() - self.pos).div_ceil(2)))
        }
    }
}

impl FusedIterator for ChunkIter<'_> {}

/// Read-only byte range traversed as a chunk sequence.
///
/// Each call to [`Seq::iter`] starts a fresh pass from the beginning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seq<'a> {
    bytes: &'a [u8],
}

impl<'a> Seq<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub fn iter(&self) -> ChunkIter<'a> {
        ChunkIter::new(self.bytes)
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl<'a> From<&'a [u8]> for Seq<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::new(bytes)
    }
}

impl<'a> IntoIterator for Seq<'a> {
    type Item = Chunk<'a>;
    type IntoIter = ChunkIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &Seq<'a> {
    type Item = Chunk<'a>;
    type IntoIter = ChunkIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
