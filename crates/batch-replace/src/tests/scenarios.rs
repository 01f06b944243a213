use alloc::{borrow::Cow, format, vec::Vec};

use rstest::rstest;

use crate::reference::sequential_replace;
use crate::{BatchReplace, Error, FloatFormat, Notation, Radix, format_float, format_int};

const TEMPLATE: &str = "foo {tag0} bar {tag1} string {macro} with {cnt} tags";
const RENDERED: &str = "foo s0 bar long string string 1234567.0987654321 with 4 tags";

fn register_template(r: &mut BatchReplace) -> &mut BatchReplace {
    r.replace("{tag0}", "s0")
        .replace("{tag1}", "long string")
        .replace_float("{macro}", 1_234_567.098_765_432_1)
        .replace_int("{cnt}", 4)
}

#[test]
fn renders_template_from_text() {
    let mut r = BatchReplace::new(TEMPLATE);
    assert_eq!(register_template(&mut r).commit_str(), RENDERED);
    assert_eq!(r.pairs(), 4);
}

#[test]
fn renders_template_from_bytes() {
    let mut r = BatchReplace::new(TEMPLATE.as_bytes());
    r.replace(b"{tag0}", b"s0")
        .replace(b"{tag1}", "long string")
        .replace_float(b"{macro}", 1_234_567.098_765_432_1)
        .replace_int(b"{cnt}", 4);
    assert_eq!(r.commit(), RENDERED.as_bytes());
}

#[test]
fn absent_pattern_is_a_no_op() {
    let mut r = BatchReplace::new(TEMPLATE);
    register_template(&mut r).replace("{missing}", "X");
    assert_eq!(r.pairs(), 4);
    assert_eq!(r.commit_str(), RENDERED);
}

#[rstest]
#[case("A", &[("A", "B"), ("B", "C")], "C")]
#[case("A B", &[("A", "B"), ("B", "C")], "C C")]
#[case("xy", &[("xy", "z"), ("y", "Q")], "z")]
#[case("a", &[("a", "aa")], "aa")]
#[case("aaa", &[("a", "")], "")]
#[case("aaaa", &[("aa", "b")], "bb")]
#[case("ab", &[("a", "b"), ("b", "a"), ("a", "c")], "cc")]
#[case("", &[("a", "b")], "")]
#[case("unchanged", &[], "unchanged")]
fn applies_pairs_sequentially(
    #[case] source: &str,
    #[case] pairs: &[(&str, &str)],
    #[case] expected: &str,
) {
    let mut r = BatchReplace::new(source);
    for (old, new) in pairs {
        r.replace(old, new);
    }
    assert_eq!(r.commit_str(), expected);

    let owned: Vec<_> = pairs
        .iter()
        .map(|(o, n)| (o.as_bytes().to_vec(), n.as_bytes().to_vec()))
        .collect();
    assert_eq!(sequential_replace(source.as_bytes(), owned.as_slice()), expected.as_bytes());
}

#[test]
fn pattern_consumed_by_earlier_pair_is_dropped() {
    let mut r = BatchReplace::new("xy");
    r.replace("xy", "z").replace("y", "Q");
    assert_eq!(r.pairs(), 1);
}

#[test]
fn empty_pattern_is_ignored() {
    let mut r = BatchReplace::new("abc");
    r.replace("", "X");
    assert_eq!(r.pairs(), 0);
    assert_eq!(r.commit(), b"abc");
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(37)]
fn out_of_range_radix_is_ignored(#[case] radix: u32) {
    let mut r = BatchReplace::new("n={n} u={u}");
    r.replace_int_radix("{n}", 10, radix)
        .replace_uint_radix("{u}", 10, radix);
    assert_eq!(r.pairs(), 0);
    assert_eq!(r.commit_str(), "n={n} u={u}");
}

#[test]
fn integers_in_other_radixes() {
    let mut r = BatchReplace::new("{hex} {bin} {b36} {neg}");
    r.replace_uint_radix("{hex}", 255, 16)
        .replace_uint_radix("{bin}", 5, 2)
        .replace_int_radix("{b36}", 35, 36)
        .replace_int("{neg}", -42);
    assert_eq!(r.commit_str(), "ff 101 z -42");
}

#[test]
fn numeric_pairs_embed_formatted_text() {
    let value = -123_456_789;
    let radix = Radix::new(7).unwrap();
    let mut numeric = BatchReplace::new("[{v}]");
    numeric.replace_int_radix("{v}", value, 7);
    let mut literal = BatchReplace::new("[{v}]");
    literal.replace("{v}", format_int(value, radix));
    assert_eq!(numeric.commit_copy(), literal.commit_copy());

    let format = FloatFormat {
        notation: Notation::Scientific,
        precision: Some(3),
        ..FloatFormat::default()
    };
    let mut numeric = BatchReplace::new("x={x}");
    numeric.replace_float_with("{x}", 6.022e23, format);
    assert_eq!(numeric.commit_string(), format!("x={}", format_float(6.022e23, format)));
    assert_eq!(numeric.commit_str(), "x=6.022e+23");
}

#[test]
fn commit_is_repeatable() {
    let mut r = BatchReplace::new(TEMPLATE);
    register_template(&mut r);
    let first = r.commit_copy();
    let capacity = r.capacity();
    assert_eq!(r.commit(), first.as_slice());
    assert_eq!(r.commit(), first.as_slice());
    assert_eq!(r.capacity(), capacity);
}

#[test]
fn registering_after_commit_continues_the_cycle() {
    let mut r = BatchReplace::new("a b");
    r.replace("a", "x");
    assert_eq!(r.commit_str(), "x b");

    r.replace("b", "y");
    assert_eq!(r.commit_str(), "x y");
    assert_eq!(r.pairs(), 2);
}

#[test]
fn reset_keeps_capacity_and_forgets_state() {
    let mut r = BatchReplace::new(TEMPLATE);
    register_template(&mut r).commit();
    let capacity = r.capacity();

    r.reset();
    assert_eq!(r.pairs(), 0);
    assert!(r.source().is_empty());
    assert_eq!(r.capacity(), capacity);

    r.set_source("hi {tag0}");
    r.replace("{tag0}", "there");
    assert_eq!(r.commit_str(), "hi there");
    assert_eq!(r.capacity(), capacity);
}

#[test]
fn set_source_starts_a_new_cycle() {
    let mut r = BatchReplace::new("a");
    r.replace("a", "b");
    r.set_source("a c");
    assert_eq!(r.pairs(), 0);
    assert_eq!(r.source(), b"a c");
    assert_eq!(r.replace("c", "d").commit_str(), "a d");
}

#[test]
fn copies_outlive_the_engine_state() {
    let mut r = BatchReplace::new("{x}");
    let first = r.replace("{x}", "one").commit_string();
    r.reset().set_source("{x}").replace("{x}", "two");
    assert_eq!(first, "one");
    assert_eq!(r.commit_string(), "two");
}

#[test]
fn non_utf8_output() {
    let mut r = BatchReplace::new(b"\xff{x}");
    r.replace("{x}", "y");
    assert_eq!(r.commit(), b"\xffy");
    assert!(matches!(r.try_commit_str(), Err(Error::InvalidUtf8(_))));
    assert_eq!(r.commit_str(), "\u{FFFD}y");
}

#[test]
fn valid_utf8_is_borrowed() {
    let mut r = BatchReplace::new("héllo {w}");
    r.replace("{w}", "wörld");
    assert!(matches!(r.commit_str(), Cow::Borrowed("héllo wörld")));
    assert_eq!(r.try_commit_str(), Ok("héllo wörld"));
}
