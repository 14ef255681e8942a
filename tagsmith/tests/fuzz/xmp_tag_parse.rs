use crate::corruption_test;

use tagsmith::config::{ParseOptions, ParsingMode, WriteOptions};
use tagsmith::tag::{Accessor, TagExt};
use tagsmith::xmp::XmpTag;

fn sample() -> Vec<u8> {
	let mut tag = XmpTag::new();
	tag.set_title(String::from("Foo title"));
	tag.set_creator(String::from("Foo creator"));
	tag.set_keywords(vec![String::from("foo"), String::from("bar")]);
	tag.set_rating(5);
	tag.set_f_number(2.8);
	tag.render(WriteOptions::new().preferred_padding(0))
		.unwrap()
}

#[test_log::test]
fn corrupt_packet() {
	corruption_test(sample(), |data| {
		if let Ok(mut tag) = XmpTag::parse(data, ParseOptions::new()) {
			let _ = tag.keywords();
			let _ = tag.render(WriteOptions::default());
		}

		let _ = XmpTag::parse(data, ParseOptions::new().parsing_mode(ParsingMode::Strict));
	});
}
