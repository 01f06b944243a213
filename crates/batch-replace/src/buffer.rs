//! The single backing array shared by the source, every operand, and the
//! result.
//!
//! Bytes below `used` are committed regions, each addressed by a [`Handle`].
//! Bytes above `used` form the *staged tail*: scratch content that is being
//! built (a running-text preview during registration, the destination and its
//! scratch twin during commit). Allocating a new region while a tail is staged
//! slides the tail up so the committed layout stays contiguous:
//!
//! ```text
//! [source][old0][new0] ... [oldN][newN][destination] | staged tail
//!                                                    ^ used
//! ```
//!
//! Growth is left to `Vec`, which grows geometrically and by at least the
//! requested delta. Growth may move the allocation, so slices are always
//! re-derived from handles and never kept across a mutating call.
use alloc::vec::Vec;

use bstr::ByteSlice;

use crate::handle::Handle;

#[derive(Debug, Default)]
pub(crate) struct Buffer {
    bytes: Vec<u8>,
    used: usize,
    #[cfg(test)]
    sweeps: usize,
}

impl Buffer {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    pub(crate) fn used(&self) -> usize {
        self.used
    }

    pub(crate) fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    /// Makes room for `additional` bytes past `used`, counting whatever is
    /// already staged.
    pub(crate) fn reserve_tail(&mut self, additional: usize) {
        let wanted = (self.used + additional).saturating_sub(self.bytes.len());
        self.bytes.reserve(wanted);
    }

    /// Places `src` at the head of the buffer, discarding everything else.
    pub(crate) fn set_source(&mut self, src: &[u8]) -> Handle {
        self.bytes.clear();
        self.bytes.extend_from_slice(src);
        self.used = src.len();
        Handle::new(0, src.len())
    }

    /// Copies `bytes` into a fresh committed region.
    pub(crate) fn alloc(&mut self, bytes: &[u8]) -> Handle {
        let start = self.bytes.len();
        self.bytes.extend_from_slice(bytes);
        self.settle(start)
    }

    /// Lets `write` append directly to the array and commits whatever it
    /// produced as a fresh region.
    pub(crate) fn alloc_with(&mut self, write: impl FnOnce(&mut Vec<u8>)) -> Handle {
        let start = self.bytes.len();
        write(&mut self.bytes);
        self.settle(start)
    }

    // Moves `bytes[start..]` down to `used`, ahead of the staged tail.
    fn settle(&mut self, start: usize) -> Handle {
        let len = self.bytes.len() - start;
        self.bytes[self.used..].rotate_right(len);
        let handle = Handle::new(self.used, len);
        self.used += len;
        handle
    }

    pub(crate) fn get(&self, handle: Handle) -> &[u8] {
        debug_assert!(handle.end() <= self.used, "handle past used bytes");
        &self.bytes[handle.range()]
    }

    pub(crate) fn staged(&self) -> &[u8] {
        &self.bytes[self.used..]
    }

    /// Appends a copy of a committed region to the staged tail.
    pub(crate) fn stage(&mut self, handle: Handle) {
        debug_assert!(handle.end() <= self.used, "handle past used bytes");
        self.bytes.extend_from_within(handle.range());
    }

    pub(crate) fn discard_staged(&mut self) {
        self.bytes.truncate(self.used);
    }

    /// Turns the staged tail into a committed region.
    pub(crate) fn commit_staged(&mut self) -> Handle {
        let handle = Handle::new(self.used, self.bytes.len() - self.used);
        self.used = self.bytes.len();
        handle
    }

    /// Drops the committed bytes from `offset` up to `used`. The staged tail
    /// slides down to the new `used`.
    pub(crate) fn rewind(&mut self, offset: usize) {
        debug_assert!(offset <= self.used);
        self.bytes.drain(offset..self.used);
        self.used = offset;
    }

    /// Replaces up to `limit` non-overlapping occurrences of `old` with `new`
    /// inside the staged tail, left to right. Returns how many were replaced.
    ///
    /// The result is built in scratch space appended after the tail and then
    /// copied back over it. Running out of matches before `limit` copies the
    /// remainder verbatim.
    pub(crate) fn sweep(&mut self, old: Handle, new: Handle, limit: usize) -> usize {
        debug_assert!(!old.is_empty(), "empty patterns are never registered");
        #[cfg(test)]
        {
            self.sweeps += 1;
        }
        let head = self.used;
        let scratch = self.bytes.len();

        let mut start = head;
        let mut replaced = 0;
        while replaced < limit {
            let Some(found) = self.bytes[start..scratch].find(&self.bytes[old.range()]) else {
                break;
            };
            let at = start + found;
            self.bytes.extend_from_within(start..at);
            self.bytes.extend_from_within(new.range());
            start = at + old.len();
            replaced += 1;
        }
        if replaced == 0 {
            return 0;
        }

        self.bytes.extend_from_within(start..scratch);
        let len = self.bytes.len() - scratch;
        self.bytes.copy_within(scratch.., head);
        self.bytes.truncate(head + len);
        replaced
    }

    #[cfg(test)]
    pub(crate) fn sweeps(&self) -> usize {
        self.sweeps
    }

    /// Forgets all content; capacity is kept.
    pub(crate) fn reset(&mut self) {
        self.bytes.clear();
        self.used = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regions_are_laid_out_back_to_back() {
        let mut buf = Buffer::default();
        let src = buf.set_source(b"hello {x}");
        let old = buf.alloc(b"{x}");
        let new = buf.alloc(b"world");

        assert_eq!(src, Handle::new(0, 9));
        assert_eq!(old, Handle::new(9, 3));
        assert_eq!(new, Handle::new(12, 5));
        assert_eq!(buf.used(), 17);
        assert_eq!(buf.get(new), b"world");
    }

    #[test]
    fn alloc_slides_the_staged_tail_up() {
        let mut buf = Buffer::default();
        let src = buf.set_source(b"abc");
        buf.stage(src);
        assert_eq!(buf.staged(), b"abc");

        let h = buf.alloc_with(|out| out.extend_from_slice(b"42"));
        assert_eq!(buf.get(h), b"42");
        assert_eq!(h.offset(), 3);
        assert_eq!(buf.staged(), b"abc");
    }

    #[test]
    fn sweep_replaces_up_to_limit() {
        let mut buf = Buffer::default();
        let src = buf.set_source(b"a-a-a");
        let old = buf.alloc(b"a");
        let new = buf.alloc(b"bb");
        buf.stage(src);

        assert_eq!(buf.sweep(old, new, 2), 2);
        assert_eq!(buf.staged(), b"bb-bb-a");
    }

    #[test]
    fn sweep_stops_early_when_matches_run_out() {
        let mut buf = Buffer::default();
        let src = buf.set_source(b"x a y");
        let old = buf.alloc(b"a");
        let new = buf.alloc(b"");
        buf.stage(src);

        assert_eq!(buf.sweep(old, new, 5), 1);
        assert_eq!(buf.staged(), b"x  y");
        assert_eq!(buf.sweep(old, new, 5), 0);
        assert_eq!(buf.staged(), b"x  y");
    }

    #[test]
    fn sweep_matches_do_not_overlap() {
        let mut buf = Buffer::default();
        let src = buf.set_source(b"aaaa");
        let old = buf.alloc(b"aa");
        let new = buf.alloc(b"b");
        buf.stage(src);

        assert_eq!(buf.sweep(old, new, usize::MAX), 2);
        assert_eq!(buf.staged(), b"bb");
    }

    #[test]
    fn commit_and_rewind() {
        let mut buf = Buffer::default();
        let src = buf.set_source(b"abc");
        buf.stage(src);
        let dst = buf.commit_staged();
        assert_eq!(dst, Handle::new(3, 3));
        assert!(buf.staged().is_empty());

        buf.rewind(dst.offset());
        assert_eq!(buf.used(), 3);
    }

    #[test]
    fn rewind_keeps_the_staged_tail() {
        let mut buf = Buffer::default();
        let src = buf.set_source(b"abc");
        let old = buf.alloc(b"b");
        buf.stage(src);
        buf.rewind(old.offset());

        assert_eq!(buf.used(), 3);
        assert_eq!(buf.staged(), b"abc");
    }

    #[test]
    fn reserve_tail_counts_staged_bytes() {
        let mut buf = Buffer::default();
        let src = buf.set_source(b"abcd");
        buf.stage(src);
        buf.reserve_tail(16);
        assert!(buf.capacity() >= 20);

        let cap = buf.capacity();
        buf.reserve_tail(4);
        assert_eq!(buf.capacity(), cap);
    }

    #[test]
    fn reset_keeps_capacity() {
        let mut buf = Buffer::with_capacity(64);
        buf.set_source(b"some source text");
        let cap = buf.capacity();
        buf.reset();
        assert_eq!(buf.used(), 0);
        assert_eq!(buf.capacity(), cap);
    }
}
