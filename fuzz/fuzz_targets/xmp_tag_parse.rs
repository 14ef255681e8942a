#![no_main]
use libfuzzer_sys::fuzz_target;
use tagsmith::config::{ParseOptions, WriteOptions};
use tagsmith::tag::TagExt;
use tagsmith::xmp::XmpTag;

fuzz_target!(|data: &[u8]| {
	if let Ok(mut tag) = XmpTag::parse(data, ParseOptions::new()) {
		let _ = tag.render(WriteOptions::default());
	}
});
