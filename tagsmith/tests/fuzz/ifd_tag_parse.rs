use crate::corruption_test;

use tagsmith::byte_vector::Endianness;
use tagsmith::config::{ParseOptions, ParsingMode, WriteOptions};
use tagsmith::ifd::IfdTag;
use tagsmith::tag::{Accessor, TagExt};

fn sample(endianness: Endianness) -> Vec<u8> {
	let mut tag = IfdTag::new();
	tag.set_endianness(endianness);
	tag.set_make(String::from("Canon"));
	tag.set_title(String::from("Foo title"));
	tag.set_comment(String::from("Ünïcödé comment"));
	tag.set_orientation(6);
	tag.set_exposure_time(0.008);
	tag.set_iso_speed(400);
	tag.render(WriteOptions::default()).unwrap()
}

#[test_log::test]
fn corrupt_big_endian() {
	corruption_test(sample(Endianness::Big), |data| {
		let _ = IfdTag::parse(data, ParseOptions::new());
		let _ = IfdTag::parse(data, ParseOptions::new().parsing_mode(ParsingMode::Strict));
	});
}

#[test_log::test]
fn corrupt_little_endian() {
	corruption_test(sample(Endianness::Little), |data| {
		if let Ok(mut tag) = IfdTag::parse(data, ParseOptions::new()) {
			let _ = tag.title();
			let _ = tag.comment();
			let _ = tag.render(WriteOptions::default());
		}
	});
}
