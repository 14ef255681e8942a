use crate::temp_file;
use crate::util::audio_data;

use std::io::{Read, Seek, SeekFrom, Write};

use tagsmith::ape::{ApeItem, ApeItemType, ApeItemValue, ApeTag};
use tagsmith::config::{ParseOptions, ParsingMode, WriteOptions};
use tagsmith::error::ErrorKind;
use tagsmith::picture::{MimeType, Picture, PictureType};
use tagsmith::tag::{Accessor, TagExt};

#[test_log::test]
fn test_is_empty() {
	let mut tag = ApeTag::default();
	assert!(tag.is_empty());
	tag.insert(
		ApeItem::new(
			String::from("COMPOSER"),
			ApeItemValue::Text(vec![String::from("Mike Oldfield")]),
		)
		.unwrap(),
	);
	assert!(!tag.is_empty());
}

#[test_log::test]
fn test_is_empty_2() {
	let mut tag = ApeTag::default();
	assert!(tag.is_empty());
	tag.set_performers(vec![String::from("Mike Oldfield")]);
	assert!(!tag.is_empty());
}

#[test_log::test]
fn test_invalid_keys() {
	static INVALID_KEY_ONE_CHARACTER: &str = "A";
	static INVALID_KEY_FORBIDDEN_STRING: &str = "MP+";
	static INVALID_KEY_UNICODE: &str = "\u{1234}\u{3456}";
	static VALID_KEY_SPACE_AND_TILDE: &str = "A B~C";
	static VALID_KEY_NORMAL_ONE: &str = "ARTIST";

	assert!(
		ApeItem::new(
			INVALID_KEY_ONE_CHARACTER,
			ApeItemValue::Text(vec![String::from("invalid key: one character")])
		)
		.is_err()
	);
	assert!(
		ApeItem::new(
			INVALID_KEY_FORBIDDEN_STRING,
			ApeItemValue::Text(vec![String::from("invalid key: forbidden string")])
		)
		.is_err()
	);
	assert!(
		ApeItem::new(
			INVALID_KEY_UNICODE,
			ApeItemValue::Text(vec![String::from("invalid key: Unicode")])
		)
		.is_err()
	);

	let valid_space_and_tilde = ApeItem::new(
		VALID_KEY_SPACE_AND_TILDE,
		ApeItemValue::Text(vec![String::from("valid key: space and tilde")]),
	);
	assert!(valid_space_and_tilde.is_ok());

	let valid_normal_one = ApeItem::new(
		VALID_KEY_NORMAL_ONE,
		ApeItemValue::Text(vec![String::from("valid key: normal one")]),
	);
	assert!(valid_normal_one.is_ok());

	let mut tag = ApeTag::default();
	tag.insert(valid_space_and_tilde.unwrap());
	tag.insert(valid_normal_one.unwrap());
	assert_eq!(tag.len(), 2);
}

#[test_log::test]
fn test_text_binary() {
	let mut item = ApeItem::texts("DUMMY", vec![String::from("Test Text")]).unwrap();
	assert_eq!(item.item_type(), ApeItemType::Text);
	assert_eq!(item.as_text(), Some("Test Text"));
	assert_eq!(item.as_binary(), None);

	item.set_value(ApeItemValue::Binary(b"Test Text".to_vec()));
	assert_eq!(item.item_type(), ApeItemType::Binary);
	assert_eq!(item.as_binary(), Some(&b"Test Text"[..]));
	assert_eq!(item.as_text(), None);
}

#[test_log::test]
fn test_item_render_and_parse() {
	let mut item = ApeItem::texts("Artist", vec![String::from("Foo"), String::from("Bar")]).unwrap();
	item.set_read_only(true);

	let rendered = item.render().unwrap();
	// 4 (length) + 4 (flags) + 6 (key) + 1 (terminator) + 7 ("Foo\0Bar")
	assert_eq!(rendered.len(), 22);
	assert_eq!(item.size_on_disk(), 22);
	assert_eq!(&rendered[..4], &7_u32.to_le_bytes());
	assert_eq!(&rendered[4..8], &1_u32.to_le_bytes());

	// Parse from the middle of a larger buffer
	let mut buffer = vec![0xEE; 5];
	buffer.extend_from_slice(&rendered);
	buffer.extend_from_slice(&[0xEE; 3]);

	let parsed = ApeItem::parse(&buffer, 5).unwrap();
	assert_eq!(parsed.key(), "Artist");
	assert!(parsed.read_only());
	assert_eq!(
		parsed.as_texts(),
		Some(&[String::from("Foo"), String::from("Bar")][..])
	);
	assert_eq!(parsed.size_on_disk(), 22);
}

#[test_log::test]
fn test_item_invalid_data_length() {
	let mut item = ApeItem::binary("Cover Art (Front)", vec![1, 2, 3]).unwrap();
	let mut rendered = item.render().unwrap();
	rendered[..4].copy_from_slice(&100_u32.to_le_bytes());

	let err = ApeItem::parse(&rendered, 0).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::CorruptData(_)));

	// Fewer than 11 bytes can never hold an item
	assert!(ApeItem::parse(&rendered[..10], 0).is_err());
}

#[test_log::test]
fn test_empty_items_are_omitted() {
	let mut tag = ApeTag::new();
	tag.insert(ApeItem::texts("Empty", Vec::new()).unwrap());
	tag.insert(ApeItem::text("Blank", "").unwrap());
	tag.set_title(String::from("Title"));

	let rendered = tag.render(WriteOptions::default()).unwrap();
	let parsed = ApeTag::parse(&rendered, ParseOptions::new()).unwrap();
	assert_eq!(parsed.len(), 1);
	assert!(parsed.get("Empty").is_none());
	assert!(parsed.get("Blank").is_none());
}

#[test_log::test]
fn test_clone_is_deep() {
	let mut original = ApeItem::texts("Title", vec![String::from("Original")]).unwrap();
	let mut copy = original.clone();
	copy.set_value(ApeItemValue::Text(vec![String::from("Changed")]));
	copy.set_read_only(true);

	assert_eq!(original.as_text(), Some("Original"));
	assert!(!original.read_only());

	original.render().unwrap();
	assert_eq!(copy.size_on_disk(), 0);
}

#[test_log::test]
fn test_save_and_find() {
	let mut tag = ApeTag::new();
	tag.set_title(String::from("Filltointersect    "));
	tag.set_performers(vec![String::from("Filltointersect    ")]);
	tag.set_pictures(vec![Picture::unchecked(
		PictureType::CoverFront,
		Some(MimeType::Jpeg),
		Some(String::from("front")),
		vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'],
	)]);

	let audio = audio_data();
	let mut file = temp_file!(audio);

	let rendered = tag.render(WriteOptions::default()).unwrap();
	file.seek(SeekFrom::End(0)).unwrap();
	file.write_all(&rendered).unwrap();

	file.rewind().unwrap();
	let (found, range) = ApeTag::find_in(&mut file, ParseOptions::new())
		.unwrap()
		.unwrap();
	assert_eq!(range.start, audio.len() as u64);
	assert_eq!(range.end, (audio.len() + rendered.len()) as u64);
	assert_eq!(found, tag);
	assert_eq!(
		found.pictures().unwrap()[0].description(),
		Some("front")
	);

	// The audio data is untouched
	file.rewind().unwrap();
	let mut contents = Vec::new();
	file.read_to_end(&mut contents).unwrap();
	assert_eq!(&contents[..audio.len()], &audio[..]);
}

#[test_log::test]
fn test_no_tag() {
	let mut file = temp_file!(audio_data());
	assert!(
		ApeTag::find_in(&mut file, ParseOptions::new())
			.unwrap()
			.is_none()
	);
}

#[test_log::test]
fn test_corrupt_item_keeps_earlier_items() {
	let mut tag = ApeTag::new();
	tag.set_title(String::from("Title"));
	tag.set_album(String::from("Album"));
	let mut rendered = tag.render(WriteOptions::default()).unwrap();

	// Items start after the 32 byte header, break the length of the second one
	let first_item_size = tag.get("Title").unwrap().size_on_disk();
	let second_item = 32 + first_item_size;
	rendered[second_item..second_item + 4].copy_from_slice(&u32::MAX.to_le_bytes());

	let parsed = ApeTag::parse(&rendered, ParseOptions::new()).unwrap();
	assert_eq!(parsed.title().as_deref(), Some("Title"));
	assert_eq!(parsed.album(), None);

	assert!(
		ApeTag::parse(
			&rendered,
			ParseOptions::new().parsing_mode(ParsingMode::Strict)
		)
		.is_err()
	);
}

#[test_log::test]
fn test_dump_to() {
	let mut tag = ApeTag::new();
	tag.set_title(String::from("Foo title"));

	let mut dumped = Vec::new();
	tag.dump_to(&mut dumped, WriteOptions::default()).unwrap();
	assert_eq!(dumped, tag.render(WriteOptions::default()).unwrap());

	let parsed = ApeTag::parse(&dumped, ParseOptions::new()).unwrap();
	assert_eq!(parsed.title().as_deref(), Some("Foo title"));
}
