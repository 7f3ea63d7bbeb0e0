//! Fuzz target: `UartLink::accept_bytes` (disarm code path)
//!
//! Feeds arbitrary byte streams from the bridge, split into arbitrary
//! read chunks, into the link framer and HMAC verifier.
//!
//! Invariants checked:
//! - No panics under any byte sequence or chunking
//! - A stream is accepted ONLY if it contains the configured code
//! - A time sync is reported ONLY if the stream carried a `TIME:` line
//!
//! cargo fuzz run fuzz_disarm_link

#![no_main]

use libfuzzer_sys::fuzz_target;
use roomctl::adapters::uart::{DisarmVerifier, TIME_PREFIX, UartLink};

const CODE: &[u8; 4] = b"4096";

fuzz_target!(|data: &[u8]| {
    let Some((&chunk, stream)) = data.split_first() else {
        return;
    };
    let chunk = usize::from(chunk.max(1));

    let mut link = UartLink::new(DisarmVerifier::new(CODE, b"fuzz-key"));
    let mut accepted = false;
    let mut synced = false;
    for part in stream.chunks(chunk) {
        accepted |= link.accept_bytes(part);
        synced |= link.take_time_sync().is_some();
    }

    if synced {
        assert!(
            stream.windows(TIME_PREFIX.len()).any(|w| w == TIME_PREFIX),
            "time sync without a time line"
        );
    }

    if accepted {
        assert!(
            stream.windows(CODE.len()).any(|w| w == CODE),
            "accepted a stream that never carried the code"
        );
    }
});
