/// Pre-sizing knobs for a [`BatchReplace`](crate::BatchReplace).
///
/// Nothing here changes the substituted output; these only decide how much
/// memory is reserved up front so the first build cycles do not grow the
/// buffer piecemeal.
///
/// # Examples
///
/// ```rust
/// use batch_replace::{BatchReplace, ReplaceOptions};
///
/// let mut r = BatchReplace::with_options(
///     "Balance of !user: !val",
///     ReplaceOptions {
///         buffer_capacity: 256,
///         ..Default::default()
///     },
/// );
/// assert!(r.capacity() >= 256);
/// assert_eq!(r.replace("!user", "John").replace("!val", "8000").commit(), b"Balance of John: 8000");
/// ```
///
/// # Default
///
/// All capacities default to `0`, deferring every allocation to first use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReplaceOptions {
    /// Bytes reserved for the shared buffer.
    ///
    /// A good estimate is the source length plus every operand, plus twice
    /// the expected output length (destination and scratch).
    ///
    /// # Default
    ///
    /// `0`
    pub buffer_capacity: usize,

    /// Replacement pairs reserved in each operand queue.
    ///
    /// # Default
    ///
    /// `0`
    pub pair_capacity: usize,
}

impl ReplaceOptions {
    /// Same as `Default::default()`, usable in `const` contexts.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer_capacity: 0,
            pair_capacity: 0,
        }
    }
}

/// Configuration for a [`Pool`](crate::Pool).
///
/// # Default
///
/// Unbounded idle list; engines are created with
/// [`ReplaceOptions::default`].
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolOptions {
    /// Most engines kept idle; engines released past this are dropped.
    ///
    /// `None` keeps every released engine.
    ///
    /// # Default
    ///
    /// `None`
    pub max_idle: Option<usize>,

    /// Options for engines the pool has to create.
    pub engine: ReplaceOptions,
}

#[cfg(feature = "std")]
impl PoolOptions {
    /// Same as `Default::default()`, usable in `const` contexts.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_idle: None,
            engine: ReplaceOptions::new(),
        }
    }
}
