#![no_main]

use arbitrary::Arbitrary;
use batch_replace::{BatchReplace, reference::sequential_replace};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    source: Vec<u8>,
    pairs: Vec<(Vec<u8>, Vec<u8>)>,
    /// Run a second cycle on the same engine after a reset.
    reuse: bool,
}

fuzz_target!(|input: Input| {
    let expected = sequential_replace(&input.source, input.pairs.as_slice());

    let mut r = BatchReplace::new(&input.source);
    for (old, new) in &input.pairs {
        r.replace(old, new);
    }
    assert_eq!(r.commit(), expected.as_slice());
    // A second commit must not disturb the result.
    assert_eq!(r.commit(), expected.as_slice());

    if input.reuse {
        r.reset().set_source(&input.source);
        for (old, new) in &input.pairs {
            r.replace(old, new);
        }
        assert_eq!(r.commit(), expected.as_slice());
    }
});
