//! Number-to-text conversion for numeric replacement values.
//!
//! Every routine appends straight to a byte vector, which lets the engine
//! write formatted operands into its shared buffer without an intermediate
//! `String`. The `format_*` functions expose the exact same rules for callers
//! that want to know what text a numeric registration will splice in.
use alloc::{string::String, vec::Vec};
use core::fmt::{self, Display, LowerExp, Write};

use bstr::ByteVec;

use crate::Error;

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Decimal exponent at which [`Notation::Shortest`] switches to scientific
/// form when no precision is given.
const SHORTEST_EXPONENT_LIMIT: i64 = 6;

/// Base used to render integers, always within `2..=36`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u32", into = "u32")
)]
pub struct Radix(u32);

impl Radix {
    /// Smallest supported radix.
    pub const MIN: u32 = 2;
    /// Largest supported radix (digits `0-9` then `a-z`).
    pub const MAX: u32 = 36;
    /// Base 10.
    pub const DECIMAL: Self = Self(10);

    /// Validates `radix`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RadixOutOfRange`] unless `2 <= radix <= 36`.
    pub const fn new(radix: u32) -> Result<Self, Error> {
        if radix < Self::MIN || radix > Self::MAX {
            return Err(Error::RadixOutOfRange(radix));
        }
        Ok(Self(radix))
    }

    /// The numeric base.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for Radix {
    fn default() -> Self {
        Self::DECIMAL
    }
}

impl TryFrom<u32> for Radix {
    type Error = Error;

    fn try_from(radix: u32) -> Result<Self, Self::Error> {
        Self::new(radix)
    }
}

impl From<Radix> for u32 {
    fn from(radix: Radix) -> Self {
        radix.0
    }
}

/// How a float is laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Notation {
    /// Plain decimal digits, never an exponent: `1234567.0987654321`.
    #[default]
    Fixed,
    /// One leading digit, a fraction, and a signed exponent of at least two
    /// digits: `1.5e+06`, `2.5e-07`.
    Scientific,
    /// Scientific when the decimal exponent is below `-4` or at least the
    /// precision (6 without a precision), fixed otherwise: `1e+06`, `123.5`.
    /// Precision counts significant digits in this mode, and trailing zeros
    /// of the fraction are dropped (`100` rather than `100.00`).
    Shortest,
}

/// Floating-point width the value is rendered at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FloatWidth {
    /// Round to `f32` first and print the shortest digits that identify the
    /// `f32`.
    F32,
    /// Print the shortest digits that identify the `f64`.
    #[default]
    F64,
}

/// Rendering parameters for float replacement values.
///
/// # Default
///
/// Fixed notation, shortest round-trip precision, 64-bit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloatFormat {
    /// Layout of the digits.
    pub notation: Notation,
    /// Digits after the decimal point for [`Notation::Fixed`] and
    /// [`Notation::Scientific`]; significant digits for
    /// [`Notation::Shortest`]. `None` prints the fewest digits that still
    /// round-trip.
    pub precision: Option<usize>,
    /// Width the value is rounded to before printing.
    pub width: FloatWidth,
}

/// Renders `value` in `radix` exactly as a numeric registration would.
#[must_use]
pub fn format_int(value: i64, radix: Radix) -> String {
    let mut out = Vec::new();
    write_int(&mut out, value, radix);
    out.into_string_lossy()
}

/// Renders `value` in `radix` exactly as a numeric registration would.
#[must_use]
pub fn format_uint(value: u64, radix: Radix) -> String {
    let mut out = Vec::new();
    write_uint(&mut out, value, radix);
    out.into_string_lossy()
}

/// Renders `value` with `format` exactly as a numeric registration would.
#[must_use]
pub fn format_float(value: f64, format: FloatFormat) -> String {
    let mut out = Vec::new();
    write_float(&mut out, value, format);
    out.into_string_lossy()
}

pub(crate) fn write_int(out: &mut Vec<u8>, value: i64, radix: Radix) {
    if value < 0 {
        out.push(b'-');
    }
    write_uint(out, value.unsigned_abs(), radix);
}

#[allow(clippy::cast_possible_truncation)]
pub(crate) fn write_uint(out: &mut Vec<u8>, value: u64, radix: Radix) {
    // u64::MAX in base 2 is the longest rendering.
    let mut digits = [0u8; 64];
    let mut pos = digits.len();
    let base = u64::from(radix.get());
    let mut n = value;
    loop {
        pos -= 1;
        digits[pos] = DIGITS[(n % base) as usize];
        n /= base;
        if n == 0 {
            break;
        }
    }
    out.extend_from_slice(&digits[pos..]);
}

#[allow(clippy::cast_possible_truncation)]
pub(crate) fn write_float(out: &mut Vec<u8>, value: f64, format: FloatFormat) {
    match format.width {
        FloatWidth::F32 => write_float_as(out, value as f32, format),
        FloatWidth::F64 => write_float_as(out, value, format),
    }
}

trait Float: Copy + Display + LowerExp {
    fn is_nan(self) -> bool;
    fn is_infinite(self) -> bool;
    fn is_sign_negative(self) -> bool;
}

macro_rules! impl_float {
    ($($t:ty),*) => {$(
        impl Float for $t {
            fn is_nan(self) -> bool {
                <$t>::is_nan(self)
            }
            fn is_infinite(self) -> bool {
                <$t>::is_infinite(self)
            }
            fn is_sign_negative(self) -> bool {
                <$t>::is_sign_negative(self)
            }
        }
    )*};
}

impl_float!(f32, f64);

fn write_float_as<T: Float>(out: &mut Vec<u8>, value: T, format: FloatFormat) {
    if value.is_nan() {
        out.extend_from_slice(b"NaN");
        return;
    }
    if value.is_infinite() {
        out.extend_from_slice(if value.is_sign_negative() { b"-Inf" } else { b"+Inf" });
        return;
    }

    match (format.notation, format.precision) {
        (Notation::Fixed, None) => emit(out, format_args!("{value}")),
        (Notation::Fixed, Some(p)) => emit(out, format_args!("{value:.p$}")),
        (Notation::Scientific, precision) => {
            let start = out.len();
            write_exp(out, value, precision);
            normalize_exponent(out, start);
        }
        (Notation::Shortest, precision) => {
            let digits = precision.map(|p| p.max(1));
            let start = out.len();
            write_exp(out, value, digits.map(|d| d - 1));
            let exponent = i64::from(normalize_exponent(out, start));
            let limit = digits.map_or(SHORTEST_EXPONENT_LIMIT, |d| {
                i64::try_from(d).unwrap_or(i64::MAX)
            });
            if exponent < -4 || exponent >= limit {
                if digits.is_some() {
                    trim_fraction_zeros(out, start);
                }
                return;
            }

            out.truncate(start);
            match digits {
                None => emit(out, format_args!("{value}")),
                Some(d) => {
                    let d = i64::try_from(d).unwrap_or(i64::MAX);
                    let decimals = usize::try_from(d - 1 - exponent).unwrap_or(0);
                    emit(out, format_args!("{value:.decimals$}"));
                    trim_fraction_zeros(out, start);
                }
            }
        }
    }
}

fn write_exp<T: Float>(out: &mut Vec<u8>, value: T, decimals: Option<usize>) {
    match decimals {
        None => emit(out, format_args!("{value:e}")),
        Some(p) => emit(out, format_args!("{value:.p$e}")),
    }
}

/// Rewrites the `e6` / `e-7` suffix written since `start` as `e+06` /
/// `e-07` and returns the exponent.
fn normalize_exponent(out: &mut Vec<u8>, start: usize) -> i32 {
    let Some(at) = out[start..].iter().rposition(|&b| b == b'e') else {
        return 0;
    };
    let at = start + at;
    let (negative, digits) = match out[at + 1..].split_first() {
        Some((b'-', rest)) => (true, rest),
        _ => (false, &out[at + 1..]),
    };
    let magnitude = digits
        .iter()
        .fold(0i32, |acc, d| acc * 10 + i32::from(d - b'0'));

    out.truncate(at + 1);
    out.push(if negative { b'-' } else { b'+' });
    if magnitude < 10 {
        out.push(b'0');
    }
    write_uint(out, u64::from(magnitude.unsigned_abs()), Radix::DECIMAL);
    if negative { -magnitude } else { magnitude }
}

/// Drops trailing zeros of the fraction written since `start`, and the `.`
/// if nothing is left after it. An exponent suffix is kept.
fn trim_fraction_zeros(out: &mut Vec<u8>, start: usize) {
    let end = out[start..]
        .iter()
        .position(|&b| b == b'e')
        .map_or(out.len(), |at| start + at);
    let Some(dot) = out[start..end].iter().position(|&b| b == b'.') else {
        return;
    };
    let dot = start + dot;
    let mut cut = end;
    while cut > dot + 1 && out[cut - 1] == b'0' {
        cut -= 1;
    }
    if cut == dot + 1 {
        cut = dot;
    }
    out.drain(cut..end);
}

struct VecWriter<'a>(&'a mut Vec<u8>);

impl Write for VecWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

fn emit(out: &mut Vec<u8>, args: fmt::Arguments<'_>) {
    // VecWriter never fails.
    let _ = VecWriter(out).write_fmt(args);
}
