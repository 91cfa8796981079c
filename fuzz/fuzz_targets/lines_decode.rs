//! Fuzz target for `.lines`/`.rm` decoding.
//!
//! This fuzzer feeds arbitrary byte sequences to the page decoder,
//! checking for panics, buffer overflows, or other undefined behavior.
//!
//! Run with:
//!   cargo +nightly fuzz run lines_decode
//!
//! Or with a corpus:
//!   cargo +nightly fuzz run lines_decode fuzz/corpus/lines_decode/

#![no_main]

use libfuzzer_sys::fuzz_target;
use rmdraw::ink::io_lines::from_lines_slice;

fuzz_target!(|data: &[u8]| {
    // Cap input size to avoid OOM on very large inputs.
    // 10MB matches the decoder's own block-length ceiling.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    // Try to parse the data. We don't care about errors—
    // we only care about panics, crashes, or hangs.
    let _ = from_lines_slice(data);
});
