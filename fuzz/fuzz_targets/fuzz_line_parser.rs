//! Fuzz target: `LineDecoder::push` → `command::parse`
//!
//! Drives arbitrary bytes through the serial line framer and parses every
//! line it yields. Neither stage may panic, no line may exceed the
//! framing limit, and every accepted angle must be in range.
//!
//! cargo fuzz run fuzz_line_parser

#![no_main]

use libfuzzer_sys::fuzz_target;
use pantilt::app::command::{self, ANGLE_MAX};
use pantilt::serial::line::{LineDecoder, MAX_LINE_LEN};

fuzz_target!(|data: &[u8]| {
    let mut decoder = LineDecoder::new();

    for &byte in data {
        if let Some(line) = decoder.push(byte) {
            assert!(line.len() <= MAX_LINE_LEN, "line exceeds MAX_LINE_LEN");
            if let Ok(angle) = command::parse(&line) {
                assert!(angle.degrees() <= ANGLE_MAX);
            }
        }
    }

    // After a reset the decoder must accept bytes cleanly again.
    decoder.reset();
    let _ = data.iter().filter_map(|&b| decoder.push(b)).count();
});
