//! Fuzz target for constraint model parsing.
//!
//! Goal: The model parsers should **never panic** on any input.
//! They may return errors, but panics are unacceptable.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_model_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = cgad_loader::fuzz::parse_model_json(text);
        let _ = cgad_loader::fuzz::parse_model_yaml(text);
    }
});
