// Owned fixed-capacity buffer.

use std::cell::Cell;
use std::ops::{Index, IndexMut};

use super::{ChunkBuffer, SharedView, View};

/// Buffer owning `N` bytes inline. The capacity is fixed by the type.
#[derive(Clone)]
pub struct InlineBuffer<const N: usize> {
    buf: [u8; N],
    len: usize,
}

impl<const N: usize> InlineBuffer<N> {
    pub const CAPACITY: usize = N;

    pub const fn new() -> Self {
        Self {
            buf: [0; N],
            len: 0,
        }
    }

    /// Borrow as a [`View`]: same bytes, length snapshot.
    pub fn as_view(&mut self) -> View<'_> {
        View::with_len(&mut self.buf, self.len)
    }

    /// Borrow as a [`SharedView`] whose appends update this buffer's size.
    pub fn share(&mut self) -> SharedView<'_> {
        SharedView::new(&mut self.buf, Cell::from_mut(&mut self.len))
    }
}

impl<const N: usize> Default for InlineBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> std::fmt::Debug for InlineBuffer<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InlineBuffer")
            .field("capacity", &N)
            .field("bytes", &self.as_bytes())
            .finish()
    }
}

impl<const N: usize> ChunkBuffer for InlineBuffer<N> {
    fn region(&self) -> &[u8] {
        &self.buf
    }

    fn region_mut(&mut self) -> &mut [u8] {
        &mut self.buf
    }

    fn size(&self) -> usize {
        self.len
    }

    fn store_size(&mut self, len: usize) {
        self.len = len.min(N);
    }
}

impl<const N: usize> Index<usize> for InlineBuffer<N> {
    type Output = u8;

    fn index(&self, index: usize) -> &u8 {
        &self.as_bytes()[index]
    }
}

impl<const N: usize> IndexMut<usize> for InlineBuffer<N> {
    fn index_mut(&mut self, index: usize) -> &mut u8 {
        &mut self.as_bytes_mut()[index]
    }
}
