use alloc::{borrow::Cow, string::String, vec::Vec};

use bstr::ByteSlice;
use tracing::{debug, trace};

use crate::{
    Error, ReplaceOptions,
    buffer::Buffer,
    format::{self, FloatFormat, Radix},
    handle::Handle,
    queue::OperandQueue,
};

/// Replacement side of a pair before it is written into the buffer.
enum Value<'a> {
    Literal(&'a [u8]),
    Int(i64, Radix),
    Uint(u64, Radix),
    Float(f64, FloatFormat),
}

/// Collects literal replacement pairs for one source and applies them all in
/// a single commit.
///
/// The source, every registered operand, and the output share one backing
/// buffer, so a build cycle costs no allocation per pair, and none at all once
/// the buffer has grown to fit (see [`reset`](Self::reset) and
/// [`Pool`](crate::Pool)).
///
/// Pairs are applied in registration order, each over the output of the
/// previous one. A later pattern therefore matches text produced by an earlier
/// replacement:
///
/// ```rust
/// use batch_replace::BatchReplace;
///
/// let mut r = BatchReplace::new("A");
/// assert_eq!(r.replace("A", "B").replace("B", "C").commit_str(), "C");
/// ```
///
/// Occurrences are counted when a pair is registered, against the text as it
/// stands after every earlier pair. A pair whose pattern does not occur there
/// is dropped on the spot.
///
/// # Examples
///
/// ```rust
/// use batch_replace::BatchReplace;
///
/// let mut r = BatchReplace::new("foo {tag0} bar {cnt} tags");
/// r.replace("{tag0}", "s0")
///     .replace_int("{cnt}", 4)
///     .replace("{missing}", "X");
/// assert_eq!(r.pairs(), 2);
/// assert_eq!(r.commit_str(), "foo s0 bar 4 tags");
/// ```
#[derive(Debug, Default)]
pub struct BatchReplace {
    buf: Buffer,
    src: Handle,
    dst: Option<Handle>,
    old: OperandQueue,
    new: OperandQueue,
    // The staged tail holds the source with every registered pair applied.
    preview: bool,
}

impl BatchReplace {
    /// Creates an engine over `src`, which may be text or raw bytes.
    pub fn new(src: impl AsRef<[u8]>) -> Self {
        Self::with_options(src, ReplaceOptions::default())
    }

    /// Creates an engine over `src` with pre-sized storage.
    pub fn with_options(src: impl AsRef<[u8]>, options: ReplaceOptions) -> Self {
        let mut r = Self {
            buf: Buffer::with_capacity(options.buffer_capacity),
            old: OperandQueue::with_capacity(options.pair_capacity),
            new: OperandQueue::with_capacity(options.pair_capacity),
            ..Self::default()
        };
        r.set_source(src);
        r
    }

    /// Replaces the source and starts a new build cycle.
    ///
    /// Pairs registered against the previous source are forgotten; buffer and
    /// queue capacity is kept.
    pub fn set_source(&mut self, src: impl AsRef<[u8]>) -> &mut Self {
        self.clear_pairs();
        self.src = self.buf.set_source(src.as_ref());
        self
    }

    /// Registers a literal `old` → `new` pair.
    ///
    /// Has no effect when `old` is empty or does not occur in the current
    /// text.
    pub fn replace(&mut self, old: impl AsRef<[u8]>, new: impl AsRef<[u8]>) -> &mut Self {
        self.register(old.as_ref(), Value::Literal(new.as_ref()))
    }

    /// Registers `old` → `new` rendered in base 10.
    pub fn replace_int(&mut self, old: impl AsRef<[u8]>, new: i64) -> &mut Self {
        self.register(old.as_ref(), Value::Int(new, Radix::DECIMAL))
    }

    /// Registers `old` → `new` rendered in `radix`.
    ///
    /// A radix outside `2..=36` drops the pair, the same way an absent pattern
    /// does.
    pub fn replace_int_radix(&mut self, old: impl AsRef<[u8]>, new: i64, radix: u32) -> &mut Self {
        match Radix::new(radix) {
            Ok(radix) => self.register(old.as_ref(), Value::Int(new, radix)),
            Err(err) => {
                trace!(%err, "dropping integer pair");
                self
            }
        }
    }

    /// Registers `old` → `new` rendered in base 10.
    pub fn replace_uint(&mut self, old: impl AsRef<[u8]>, new: u64) -> &mut Self {
        self.register(old.as_ref(), Value::Uint(new, Radix::DECIMAL))
    }

    /// Registers `old` → `new` rendered in `radix`.
    ///
    /// A radix outside `2..=36` drops the pair, the same way an absent pattern
    /// does.
    pub fn replace_uint_radix(
        &mut self,
        old: impl AsRef<[u8]>,
        new: u64,
        radix: u32,
    ) -> &mut Self {
        match Radix::new(radix) {
            Ok(radix) => self.register(old.as_ref(), Value::Uint(new, radix)),
            Err(err) => {
                trace!(%err, "dropping integer pair");
                self
            }
        }
    }

    /// Registers `old` → `new` in fixed notation with the shortest digits
    /// that round-trip a 64-bit float.
    pub fn replace_float(&mut self, old: impl AsRef<[u8]>, new: f64) -> &mut Self {
        self.register(old.as_ref(), Value::Float(new, FloatFormat::default()))
    }

    /// Registers `old` → `new` rendered with `format`.
    pub fn replace_float_with(
        &mut self,
        old: impl AsRef<[u8]>,
        new: f64,
        format: FloatFormat,
    ) -> &mut Self {
        self.register(old.as_ref(), Value::Float(new, format))
    }

    /// Applies every registered pair and returns the result.
    ///
    /// When registration already rendered the running text, that text is the
    /// result and no pair is applied again.
    ///
    /// The slice lives in the shared buffer; it stays valid until the engine
    /// is mutated again. Committing twice without registering anything in
    /// between yields the same bytes and reuses the same space.
    pub fn commit(&mut self) -> &[u8] {
        let upper = self.src.len() + self.new.accumulated();
        let len = upper.saturating_sub(self.old.accumulated());

        if let Some(dst) = self.dst.take() {
            if dst.end() == self.buf.used() {
                self.buf.rewind(dst.offset());
            }
        }

        // Destination plus a scratch region of the same size.
        self.buf.reserve_tail(upper * 2);
        if !self.preview {
            self.buf.discard_staged();
            self.buf.stage(self.src);
            for index in 0..self.old.len() {
                let old = self.old.get(index);
                let new = self.new.get(index);
                let replaced = self.buf.sweep(old.handle, new.handle, old.count);
                if replaced < old.count {
                    debug!(
                        index,
                        expected = old.count,
                        replaced,
                        "pattern ran out of matches, kept the rest verbatim"
                    );
                }
            }
        }
        self.preview = false;

        let dst = self.buf.commit_staged();
        debug_assert_eq!(dst.len(), len, "computed length disagrees with output");
        self.dst = Some(dst);
        self.buf.get(dst)
    }

    /// Like [`commit`](Self::commit) but returns an owned copy that outlives
    /// any later reset or reuse of this engine.
    pub fn commit_copy(&mut self) -> Vec<u8> {
        self.commit().to_vec()
    }

    /// Text view of [`commit`](Self::commit).
    ///
    /// Borrowed when the output is valid UTF-8, which it always is when the
    /// source and every operand were text. Invalid sequences are replaced with
    /// U+FFFD otherwise.
    pub fn commit_str(&mut self) -> Cow<'_, str> {
        self.commit().to_str_lossy()
    }

    /// Owned text result, see [`commit_str`](Self::commit_str).
    pub fn commit_string(&mut self) -> String {
        self.commit_str().into_owned()
    }

    /// Strict text view of [`commit`](Self::commit).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUtf8`] if the output is not valid UTF-8.
    pub fn try_commit_str(&mut self) -> Result<&str, Error> {
        Ok(core::str::from_utf8(self.commit())?)
    }

    /// Returns the engine to the empty state, keeping every allocation for the
    /// next build cycle.
    pub fn reset(&mut self) -> &mut Self {
        self.clear_pairs();
        self.buf.reset();
        self.src.reset();
        self
    }

    /// Number of pairs that survived registration.
    #[must_use]
    pub fn pairs(&self) -> usize {
        self.old.len()
    }

    /// The current source.
    #[must_use]
    pub fn source(&self) -> &[u8] {
        self.buf.get(self.src)
    }

    /// Bytes the shared buffer can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    fn clear_pairs(&mut self) {
        self.old.reset();
        self.new.reset();
        self.dst = None;
        self.preview = false;
    }

    fn register(&mut self, old: &[u8], value: Value<'_>) -> &mut Self {
        if old.is_empty() {
            trace!("dropping pair with an empty pattern");
            return self;
        }
        let count = self.occurrences(old);
        if count == 0 {
            trace!(pattern = %old.as_bstr(), "pattern absent, dropping pair");
            return self;
        }

        let old_handle = self.buf.alloc(old);
        let new_handle = match value {
            Value::Literal(bytes) => self.buf.alloc(bytes),
            Value::Int(v, radix) => self.buf.alloc_with(|out| format::write_int(out, v, radix)),
            Value::Uint(v, radix) => self.buf.alloc_with(|out| format::write_uint(out, v, radix)),
            Value::Float(v, f) => self.buf.alloc_with(|out| format::write_float(out, v, f)),
        };
        self.old.push(old_handle, count);
        self.new.push(new_handle, count);
        if self.preview {
            self.buf.sweep(old_handle, new_handle, count);
        }

        trace!(count, pairs = self.old.len(), "registered pair");
        self
    }

    /// Non-overlapping occurrences of `pattern` in the running text.
    fn occurrences(&mut self, pattern: &[u8]) -> usize {
        if self.old.is_empty() {
            return self.buf.get(self.src).find_iter(pattern).count();
        }
        if !self.preview {
            self.render_preview();
        }
        self.buf.staged().find_iter(pattern).count()
    }

    fn render_preview(&mut self) {
        self.buf.discard_staged();
        self.buf.stage(self.src);
        for (old, new) in self.old.as_slice().iter().zip(self.new.as_slice()) {
            self.buf.sweep(old.handle, new.handle, old.count);
        }
        self.preview = true;
    }
}
