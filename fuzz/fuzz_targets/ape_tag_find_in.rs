#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use tagsmith::ape::ApeTag;
use tagsmith::config::ParseOptions;

fuzz_target!(|data: &[u8]| {
	let _ = ApeTag::find_in(&mut Cursor::new(data), ParseOptions::new());
});
