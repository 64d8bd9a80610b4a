//! Storage adapters: fixed-capacity byte regions that chunks are appended to.
//!
//! [`ChunkBuffer`] is the one capability interface. Implementors only expose
//! their byte region and committed length; encoding, inspection and
//! iteration are provided on top of that.
//!
//! | Adapter | Bytes | Length |
//! |---|---|---|
//! | [`SharedView`] | borrowed | shared [`Cell`](std::cell::Cell), visible to every holder |
//! | [`View`] | borrowed | private to the adapter |
//! | [`InlineBuffer`] | owned `[u8; N]` | private to the adapter |

mod inline;
mod shared;
mod view;

pub use inline::InlineBuffer;
pub use shared::SharedView;
pub use view::View;

use crate::chunk::{Chunk, ChunkIter, Error, Frame, Result, Seq};

pub trait ChunkBuffer {
    /// The whole backing region, committed or not.
    fn region(&self) -> &[u8];

    fn region_mut(&mut self) -> &mut [u8];

    /// Committed length.
    fn size(&self) -> usize;

    /// Store a new committed length, clamped to `capacity()`.
    ///
    /// Implementor hook; callers should go through [`ChunkBuffer::resize`].
    fn store_size(&mut self, len: usize);

    #[inline]
    fn capacity(&self) -> usize {
        self.region().len()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Bytes still free after the committed prefix.
    #[inline]
    fn remaining(&self) -> usize {
        self.capacity().saturating_sub(self.size())
    }

    /// Set the committed length to `len` and return it; if `len` exceeds the
    /// capacity nothing changes and the current size is returned.
    fn resize(&mut self, len: usize) -> usize {
        if len <= self.capacity() {
            self.store_size(len);
            len
        } else {
            self.size()
        }
    }

    fn clear(&mut self) {
        self.store_size(0);
    }

    /// Committed prefix `[0, size())`.
    fn as_bytes(&self) -> &[u8] {
        let len = self.size().min(self.capacity());
        &self.region()[..len]
    }

    fn as_bytes_mut(&mut self) -> &mut [u8] {
        let len = self.size().min(self.capacity());
        &mut self.region_mut()[..len]
    }

    /// Committed byte at `index`.
    fn get(&self, index: usize) -> Option<u8> {
        self.as_bytes().get(index).copied()
    }

    fn seq(&self) -> Seq<'_> {
        Seq::new(self.as_bytes())
    }

    /// Iterate the chunks of the committed prefix.
    fn chunks(&self) -> ChunkIter<'_> {
        ChunkIter::new(self.as_bytes())
    }

    /// Append a framed chunk. On failure neither the size nor the bytes change.
    fn encode_frame(&mut self, frame: &Frame<'_>) -> Result<()> {
        let size = self.size();
        let needed = frame.encoded_len();
        let available = self.remaining();
        if needed > available {
            log::debug!("encode rejected: {needed} bytes needed, {available} free");
            return Err(Error::NoMemory { needed, available });
        }
        let written = frame.write_to(&mut self.region_mut()[size..])?;
        self.store_size(size + written);
        log::trace!("appended {written} bytes at {size}");
        Ok(())
    }

    fn encode_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.encode_frame(&Frame::raw(bytes)?)
    }

    fn encode_rep(&mut self, byte: u8, count: usize) -> Result<()> {
        self.encode_frame(&Frame::rep(byte, count)?)
    }

    fn encode_arr(&mut self, pattern: &[u8], reps: usize) -> Result<()> {
        self.encode_frame(&Frame::arr(pattern, reps)?)
    }

    fn encode_off(&mut self, offset: i32, len: usize) -> Result<()> {
        self.encode_frame(&Frame::off(offset, len)?)
    }

    /// Re-encode an already decoded chunk.
    fn encode(&mut self, chunk: &Chunk<'_>) -> Result<()> {
        self.encode_frame(&Frame::from_chunk(chunk)?)
    }
}
