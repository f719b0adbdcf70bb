#![no_main]

use libfuzzer_sys::fuzz_target;
use putty_path::{parse, serialize, COORD_EPSILON};

fuzz_target!(|data: &str| {
    // Whatever survives the tolerant parse must re-parse to the same
    // segments within serialization precision.
    let first = parse(data);
    let second = parse(&serialize(&first));
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.kind, b.kind);
        assert_eq!(a.absolute, b.absolute);
        for (x, y) in a.args.iter().zip(&b.args) {
            assert!((x - y).abs() <= COORD_EPSILON || (x - y).abs() <= x.abs() * 1e-6);
        }
    }
});
