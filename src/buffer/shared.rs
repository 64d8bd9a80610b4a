// Borrowed bytes with a shared, live length cell.

use std::cell::Cell;
use std::ops::{Index, IndexMut};

use super::ChunkBuffer;

/// Adapter over external bytes whose committed length lives in a shared
/// [`Cell`].
///
/// Every holder of the same cell observes appends made through this adapter
/// immediately.
#[derive(Debug)]
pub struct SharedView<'a> {
    buf: &'a mut [u8],
    len: &'a Cell<usize>,
}

impl<'a> SharedView<'a> {
    pub fn new(buf: &'a mut [u8], len: &'a Cell<usize>) -> Self {
        Self { buf, len }
    }

    /// The shared length cell.
    pub fn len_cell(&self) -> &'a Cell<usize> {
        self.len
    }

    /// Second handle over the same bytes and the same length cell.
    pub fn reborrow(&mut self) -> SharedView<'_> {
        SharedView {
            buf: &mut *self.buf,
            len: self.len,
        }
    }
}

impl ChunkBuffer for SharedView<'_> {
    fn region(&self) -> &[u8] {
        self.buf
    }

    fn region_mut(&mut self) -> &mut [u8] {
        self.buf
    }

    fn size(&self) -> usize {
        self.len.get()
    }

    fn store_size(&mut self, len: usize) {
        self.len.set(len.min(self.buf.len()));
    }
}

impl Index<usize> for SharedView<'_> {
    type Output = u8;

    fn index(&self, index: usize) -> &u8 {
        &self.as_bytes()[index]
    }
}

impl IndexMut<usize> for SharedView<'_> {
    fn index_mut(&mut self, index: usize) -> &mut u8 {
        &mut self.as_bytes_mut()[index]
    }
}
