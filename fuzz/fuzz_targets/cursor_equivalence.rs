#![no_main]

use cordyceps_rbtree::model::{run_cursor_equivalence, CursorEquivalenceInput};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: CursorEquivalenceInput| {
    run_cursor_equivalence(input.values, input.ops);
});
