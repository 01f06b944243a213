//! Batch literal substitution over a single shared byte buffer.
//!
//! A [`BatchReplace`] holds one source text and any number of `old → new`
//! pairs. The source, every operand, and the result all live in one growable
//! byte array addressed by offset/length handles, so rendering a template with
//! many small substitutions costs a handful of amortized buffer growths rather
//! than one allocation per replacement.
//!
//! ```rust
//! use batch_replace::BatchReplace;
//!
//! let mut r = BatchReplace::new("foo {tag0} bar {tag1} string {macro} with {cnt} tags");
//! r.replace("{tag0}", "s0")
//!     .replace("{tag1}", "long string")
//!     .replace_float("{macro}", 1234567.0987654321)
//!     .replace_int("{cnt}", 4);
//! assert_eq!(
//!     r.commit_str(),
//!     "foo s0 bar long string string 1234567.0987654321 with 4 tags"
//! );
//! ```
//!
//! Only exact literal matches are supported. Pairs are applied in registration
//! order, each over the output of the previous one.

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod buffer;
mod error;
mod format;
mod handle;
mod options;
#[cfg(feature = "std")]
mod pool;
mod queue;
#[cfg(any(test, feature = "fuzzing"))]
#[doc(hidden)]
pub mod reference;
mod replace;

#[cfg(test)]
mod tests;

pub use error::Error;
pub use format::{FloatFormat, FloatWidth, Notation, Radix, format_float, format_int, format_uint};
#[cfg(feature = "std")]
pub use options::PoolOptions;
pub use options::ReplaceOptions;
#[cfg(feature = "std")]
pub use pool::{Pool, Pooled, acquire, acquire_with_source, release};
pub use replace::BatchReplace;
