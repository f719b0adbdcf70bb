#![no_main]

use libfuzzer_sys::fuzz_target;
use putty_path::{parse, parse_strict};

fuzz_target!(|data: &str| {
    // Neither parser may panic on any input.
    let _ = parse(data);
    let _ = parse_strict(data);
});
