#![no_main]
use libfuzzer_sys::fuzz_target;
use tagsmith::ape::ApeTag;
use tagsmith::config::ParseOptions;

fuzz_target!(|data: &[u8]| {
	let _ = ApeTag::parse(data, ParseOptions::new());
});
