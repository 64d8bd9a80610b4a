// Borrowed bytes with an adapter-local length.

use std::cell::Cell;
use std::ops::{Index, IndexMut};

use super::{ChunkBuffer, SharedView};

/// Adapter over external bytes that keeps its own committed length.
///
/// A [`View::reborrow`] handle writes the same bytes but starts from a
/// snapshot of the length, so its appends do not move this view's size.
/// Use [`View::share`] when size changes must flow back.
#[derive(Debug)]
pub struct View<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl<'a> View<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, len: 0 }
    }

    /// View with `len` bytes already committed, clamped to the capacity.
    pub fn with_len(buf: &'a mut [u8], len: usize) -> Self {
        let len = len.min(buf.len());
        Self { buf, len }
    }

    /// Same bytes, copied length.
    pub fn reborrow(&mut self) -> View<'_> {
        View {
            buf: &mut *self.buf,
            len: self.len,
        }
    }

    /// Same bytes, length aliased with this view.
    pub fn share(&mut self) -> SharedView<'_> {
        SharedView::new(&mut *self.buf, Cell::from_mut(&mut self.len))
    }

    pub fn into_inner(self) -> &'a mut [u8] {
        self.buf
    }
}

impl ChunkBuffer for View<'_> {
    fn region(&self) -> &[u8] {
        self.buf
    }

    fn region_mut(&mut self) -> &mut [u8] {
        self.buf
    }

    fn size(&self) -> usize {
        self.len
    }

    fn store_size(&mut self, len: usize) {
        self.len = len.min(self.buf.len());
    }
}

impl Index<usize> for View<'_> {
    type Output = u8;

    fn index(&self, index: usize) -> &u8 {
        &self.as_bytes()[index]
    }
}

impl IndexMut<usize> for View<'_> {
    fn index_mut(&mut self, index: usize) -> &mut u8 {
        &mut self.as_bytes_mut()[index]
    }
}
