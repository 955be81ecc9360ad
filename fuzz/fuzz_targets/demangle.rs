#![no_main]

use libfuzzer_sys::fuzz_target;
use quixcc::mangle::{Symbol, demangle_symbol};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Anything that decodes must encode back to the same bytes.
        if let Ok(symbol) = demangle_symbol(s) {
            assert_eq!(Symbol::mangle(&symbol), s);
        }
    }
});
