use core::ops::Range;

/// Offset and length of a region inside the shared [`Buffer`].
///
/// A handle is a relative reference: it survives buffer growth (which may move
/// the whole allocation) but is meaningless against any other buffer and
/// after [`Buffer::reset`].
///
/// [`Buffer`]: crate::buffer::Buffer
/// [`Buffer::reset`]: crate::buffer::Buffer::reset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Handle {
    offset: usize,
    len: usize,
}

impl Handle {
    pub(crate) const fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    pub(crate) fn set(&mut self, offset: usize, len: usize) {
        self.offset = offset;
        self.len = len;
    }

    pub(crate) const fn offset(self) -> usize {
        self.offset
    }

    pub(crate) const fn len(self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(self) -> bool {
        self.len == 0
    }

    /// One past the last byte covered by the handle.
    pub(crate) const fn end(self) -> usize {
        self.offset + self.len
    }

    pub(crate) const fn range(self) -> Range<usize> {
        self.offset..self.end()
    }

    pub(crate) fn reset(&mut self) {
        self.set(0, 0);
    }
}
