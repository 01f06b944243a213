//! Naive sequential substitution, used as an oracle by tests and fuzzing.
use alloc::vec::Vec;

use bstr::ByteSlice;

/// One full replace per pair, each over the output of the previous one.
///
/// Allocates a fresh vector per pair; this is the behavior
/// [`BatchReplace`](crate::BatchReplace) reproduces without doing so.
#[must_use]
pub fn sequential_replace<P: AsRef<[u8]>>(source: &[u8], pairs: &[(P, P)]) -> Vec<u8> {
    let mut text = source.to_vec();
    for (old, new) in pairs {
        if !old.as_ref().is_empty() {
            text = text.replace(old, new);
        }
    }
    text
}
