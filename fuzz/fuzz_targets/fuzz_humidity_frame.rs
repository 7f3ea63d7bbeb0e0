//! Fuzz target: `decode_humidity` (SHT31 measurement frame)
//!
//! Invariants checked:
//! - No panics for any 6-byte frame
//! - A frame decodes only when the humidity CRC matches
//! - Decoded humidity always lies in 0..=100 %RH
//!
//! cargo fuzz run fuzz_humidity_frame

#![no_main]

use libfuzzer_sys::fuzz_target;
use roomctl::sensors::humidity::{crc8, decode_humidity};

fuzz_target!(|data: &[u8]| {
    let Ok(frame) = <[u8; 6]>::try_from(data) else {
        return;
    };

    match decode_humidity(&frame) {
        Ok(pct) => {
            assert_eq!(crc8(&frame[3..5]), frame[5]);
            assert!((0.0..=100.0).contains(&pct), "humidity {pct} out of range");
        }
        Err(_) => {}
    }
});
