#![no_main]
use libfuzzer_sys::fuzz_target;
use tagsmith::config::ParseOptions;
use tagsmith::ifd::IfdTag;

fuzz_target!(|data: &[u8]| {
	let _ = IfdTag::parse(data, ParseOptions::new());
});
