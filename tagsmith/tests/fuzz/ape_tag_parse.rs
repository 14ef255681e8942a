use crate::corruption_test;

use std::io::Cursor;

use tagsmith::ape::{ApeItem, ApeTag};
use tagsmith::config::{ParseOptions, ParsingMode, WriteOptions};
use tagsmith::tag::{Accessor, TagExt};

fn sample() -> Vec<u8> {
	let mut tag = ApeTag::new();
	tag.set_title(String::from("Foo title"));
	tag.set_performers(vec![String::from("Foo artist"), String::from("Bar artist")]);
	tag.set_track(3);
	tag.insert(ApeItem::binary("Payload", vec![1, 2, 3, 4, 5]).unwrap());
	tag.insert(ApeItem::locator("Related", "https://example.com/").unwrap());
	tag.render(WriteOptions::default()).unwrap()
}

#[test_log::test]
fn corrupt_tag() {
	corruption_test(sample(), |data| {
		let _ = ApeTag::parse(data, ParseOptions::new());
		let _ = ApeTag::parse(data, ParseOptions::new().parsing_mode(ParsingMode::Strict));
	});
}

#[test_log::test]
fn corrupt_stream() {
	corruption_test(sample(), |data| {
		let _ = ApeTag::find_in(&mut Cursor::new(data), ParseOptions::new());
	});
}
