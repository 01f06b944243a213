use core::str::Utf8Error;

use thiserror::Error;

/// Errors surfaced by the checked corners of the API.
///
/// Registration itself never fails: an unusable pair is dropped instead. These
/// variants only come from explicit validation, such as [`Radix::new`] or
/// [`BatchReplace::try_commit_str`].
///
/// [`Radix::new`]: crate::Radix::new
/// [`BatchReplace::try_commit_str`]: crate::BatchReplace::try_commit_str
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Integer radix outside `2..=36`.
    #[error("radix {0} is outside the supported range 2..=36")]
    RadixOutOfRange(u32),
    /// The substituted output is not valid UTF-8.
    #[error("substituted output is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] Utf8Error),
}
