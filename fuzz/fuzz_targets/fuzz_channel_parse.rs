//! Fuzz target: `parse_channel`
//!
//! Feeds arbitrary UTF-8 into the colour channel parser and checks that
//! it never panics and that every accepted value parses back to itself.
//!
//! cargo fuzz run fuzz_channel_parse

#![no_main]

use aura_smbus::color::{ChannelError, parse_channel};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else { return };

    match parse_channel(text) {
        Ok(v) => assert_eq!(parse_channel(&v.to_string()), Ok(v)),
        Err(ChannelError::OutOfRange(v)) => assert!(!(0..=255).contains(&v)),
        Err(_) => {}
    }
});
