use tagsmith::byte_vector::Endianness;
use tagsmith::config::{ParseOptions, ParsingMode, WriteOptions};
use tagsmith::ifd::{ExifEntryTag, IfdEntry, IfdEntryTag, IfdTag};
use tagsmith::tag::{Accessor, TagExt};

const COMPRESSION: u16 = 0x0103;

fn entry(out: &mut Vec<u8>, tag: u16, type_code: u16, count: u32, value: [u8; 4]) {
	out.extend(tag.to_le_bytes());
	out.extend(type_code.to_le_bytes());
	out.extend(count.to_le_bytes());
	out.extend(value);
}

// A little endian TIFF stream:
//
// 0..8     header
// 8..50    IFD0: Make, Orientation, Exif IFD pointer, next -> IFD1
// 50..56   "Canon\0"
// 56..86   Exif IFD: ExposureTime, ISOSpeedRatings
// 86..94   1/125
// 94..112  IFD1: Compression
fn sample_tiff(ifd1_next: u32, exif_offset: u32) -> Vec<u8> {
	let mut out = b"II\x2A\0".to_vec();
	out.extend(8_u32.to_le_bytes());

	out.extend(3_u16.to_le_bytes());
	entry(&mut out, IfdEntryTag::MAKE, 2, 6, 50_u32.to_le_bytes());
	entry(&mut out, IfdEntryTag::ORIENTATION, 3, 1, [1, 0, 0, 0]);
	entry(&mut out, IfdEntryTag::EXIF_IFD, 4, 1, exif_offset.to_le_bytes());
	out.extend(94_u32.to_le_bytes());
	assert_eq!(out.len(), 50);

	out.extend(b"Canon\0");

	out.extend(2_u16.to_le_bytes());
	entry(&mut out, ExifEntryTag::EXPOSURE_TIME, 5, 1, 86_u32.to_le_bytes());
	entry(&mut out, ExifEntryTag::ISO_SPEED_RATINGS, 3, 1, [200, 0, 0, 0]);
	out.extend(0_u32.to_le_bytes());
	assert_eq!(out.len(), 86);

	out.extend(1_u32.to_le_bytes());
	out.extend(125_u32.to_le_bytes());

	out.extend(1_u16.to_le_bytes());
	entry(&mut out, COMPRESSION, 3, 1, [6, 0, 0, 0]);
	out.extend(ifd1_next.to_le_bytes());
	assert_eq!(out.len(), 112);

	out
}

fn strict() -> ParseOptions {
	ParseOptions::new().parsing_mode(ParsingMode::Strict)
}

#[test_log::test]
fn test_read_little_endian() {
	let tag = IfdTag::parse(&sample_tiff(0, 56), strict()).unwrap();

	assert_eq!(tag.endianness(), Endianness::Little);
	assert_eq!(tag.make().as_deref(), Some("Canon"));
	assert_eq!(tag.orientation(), Some(1));
	assert_eq!(tag.exposure_time(), Some(0.008));
	assert_eq!(tag.iso_speed(), Some(200));
	assert_eq!(tag.model(), None);

	let structure = tag.structure();
	assert_eq!(structure.directory_count(), 2);
	assert_eq!(structure.get_u32(1, COMPRESSION), Some(6));

	let exif = structure.get_sub_ifd(0, IfdEntryTag::EXIF_IFD).unwrap();
	assert_eq!(exif.directory_count(), 1);
	assert_eq!(
		exif.get_entry(0, ExifEntryTag::ISO_SPEED_RATINGS),
		Some(&IfdEntry::Short(vec![200]))
	);

	// IFD0 holds 3 entries, IFD1 holds 1
	assert_eq!(tag.len(), 4);
}

#[test_log::test]
fn test_modify_and_save() {
	let mut tag = IfdTag::parse(&sample_tiff(0, 56), ParseOptions::new()).unwrap();
	tag.set_model(String::from("Canon EOS R5"));
	tag.set_rating(4);
	tag.set_f_number(1.8);
	tag.remove_iso_speed();

	let rendered = tag.render(WriteOptions::default()).unwrap();
	assert_eq!(&rendered[..4], b"II\x2A\0");

	let parsed = IfdTag::parse(&rendered, strict()).unwrap();
	assert_eq!(parsed, tag);
	assert_eq!(parsed.model().as_deref(), Some("Canon EOS R5"));
	assert_eq!(parsed.rating(), Some(4));
	assert_eq!(parsed.f_number(), Some(1.8));
	assert_eq!(parsed.iso_speed(), None);
	assert_eq!(parsed.exposure_time(), Some(0.008));

	// The thumbnail directory is untouched
	assert_eq!(parsed.structure().get_u32(1, COMPRESSION), Some(6));
}

#[test_log::test]
fn test_change_endianness() {
	let mut tag = IfdTag::parse(&sample_tiff(0, 56), ParseOptions::new()).unwrap();
	tag.set_endianness(Endianness::Big);

	let rendered = tag.render(WriteOptions::default()).unwrap();
	assert_eq!(&rendered[..4], b"MM\0\x2A");

	let parsed = IfdTag::parse(&rendered, strict()).unwrap();
	assert_eq!(parsed.endianness(), Endianness::Big);
	assert_eq!(parsed.structure(), tag.structure());
	assert_eq!(parsed.exposure_time(), Some(0.008));
}

#[test_log::test]
fn test_cyclic_chain() {
	// IFD1 links back to IFD0
	let data = sample_tiff(8, 56);

	assert!(IfdTag::parse(&data, strict()).is_err());

	let tag = IfdTag::parse(&data, ParseOptions::new()).unwrap();
	assert_eq!(tag.structure().directory_count(), 2);
	assert_eq!(tag.make().as_deref(), Some("Canon"));
}

#[test_log::test]
fn test_cyclic_sub_ifd() {
	// The Exif IFD pointer leads back to IFD0
	let data = sample_tiff(0, 8);

	assert!(IfdTag::parse(&data, strict()).is_err());

	let tag = IfdTag::parse(&data, ParseOptions::new()).unwrap();
	assert!(
		tag.structure()
			.get_entry(0, IfdEntryTag::EXIF_IFD)
			.is_none()
	);
	assert_eq!(tag.make().as_deref(), Some("Canon"));
	assert_eq!(tag.exposure_time(), None);
}

#[test_log::test]
fn test_depth_limit() {
	let data = sample_tiff(0, 56);

	let tag = IfdTag::parse(&data, ParseOptions::new().max_ifd_depth(0)).unwrap();
	assert!(tag.structure().get_sub_ifd(0, IfdEntryTag::EXIF_IFD).is_none());
	assert_eq!(tag.orientation(), Some(1));

	assert!(IfdTag::parse(&data, strict().max_ifd_depth(0)).is_err());
}

#[test_log::test]
fn test_not_tiff() {
	assert!(IfdTag::parse(b"Exif\0\0II*\0", ParseOptions::new()).is_err());
	assert!(IfdTag::parse(b"", ParseOptions::new()).is_err());
}

#[test_log::test]
fn test_empty_tag_renders_nothing() {
	let mut tag = IfdTag::parse(&sample_tiff(0, 56), ParseOptions::new()).unwrap();
	tag.clear();

	assert!(tag.is_empty());
	assert!(tag.render(WriteOptions::default()).unwrap().is_empty());
}
