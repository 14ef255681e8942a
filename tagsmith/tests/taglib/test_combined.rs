use tagsmith::ape::ApeTag;
use tagsmith::config::{ParseOptions, WriteOptions};
use tagsmith::ifd::IfdTag;
use tagsmith::tag::{Accessor, CombinedTag, TagExt, TagType, TagTypes};
use tagsmith::xmp::XmpTag;

// The tags of a photo, as a camera would write them and an editor would add to them
fn photo_tags() -> (Vec<u8>, Vec<u8>) {
	let mut exif = IfdTag::new();
	exif.set_make(String::from("FUJIFILM"));
	exif.set_model(String::from("X-T4"));
	exif.set_exposure_time(0.002);
	exif.set_iso_speed(160);
	exif.set_date_time(String::from("2023:05:14 18:02:11"));

	let mut xmp = XmpTag::new();
	xmp.set_title(String::from("Evening tram"));
	xmp.set_rating(4);
	xmp.set_date_time(String::from("2023-05-14T18:02:11"));

	(
		exif.render(WriteOptions::default()).unwrap(),
		xmp.render(WriteOptions::default()).unwrap(),
	)
}

fn combined_photo() -> CombinedTag {
	let (exif, xmp) = photo_tags();
	CombinedTag::from_tags([
		Box::new(XmpTag::parse(&xmp, ParseOptions::new()).unwrap()) as Box<dyn TagExt>,
		Box::new(IfdTag::parse(&exif, ParseOptions::new()).unwrap()),
	])
}

#[test_log::test]
fn test_read_priority() {
	let combined = combined_photo();
	assert_eq!(combined.tag_types(), TagTypes::XMP | TagTypes::TIFF_IFD);

	// Only in XMP
	assert_eq!(combined.title().as_deref(), Some("Evening tram"));
	assert_eq!(combined.rating(), Some(4));

	// Only in Exif
	assert_eq!(combined.make().as_deref(), Some("FUJIFILM"));
	assert_eq!(combined.iso_speed(), Some(160));
	assert_eq!(combined.exposure_time(), Some(0.002));

	// In both, XMP comes first
	assert_eq!(combined.date_time().as_deref(), Some("2023-05-14T18:02:11"));

	assert_eq!(combined.album(), None);
}

#[test_log::test]
fn test_write_to_all() {
	let mut combined = combined_photo();
	combined.set_copyright(String::from("(c) 2023 Jane Doe"));
	combined.set_keywords(vec![String::from("tram"), String::from("evening")]);
	combined.remove_date_time();

	let mut xmp = combined.remove_tag_type(TagType::Xmp).unwrap();
	let mut exif = combined.remove_tag_type(TagType::TiffIfd).unwrap();
	assert!(combined.tag_types().is_empty());

	let xmp = XmpTag::parse(&xmp.render(WriteOptions::default()).unwrap(), ParseOptions::new())
		.unwrap();
	let exif = IfdTag::parse(
		&exif.render(WriteOptions::default()).unwrap(),
		ParseOptions::new(),
	)
	.unwrap();

	for tag in [&xmp as &dyn TagExt, &exif] {
		assert_eq!(tag.copyright().as_deref(), Some("(c) 2023 Jane Doe"));
		assert_eq!(
			tag.keywords(),
			Some(vec![String::from("tram"), String::from("evening")])
		);
		assert_eq!(tag.date_time(), None);
	}

	assert_eq!(exif.make().as_deref(), Some("FUJIFILM"));
	assert_eq!(xmp.title().as_deref(), Some("Evening tram"));
}

#[test_log::test]
fn test_unsupported_properties_skip_tags() {
	let mut combined = CombinedTag::new();
	combined.push_tag(Box::new(ApeTag::new()));
	combined.push_tag(Box::new(IfdTag::new()));

	// Exif has nowhere to store an album
	combined.set_album(String::from("Field recordings"));
	assert!(combined.tag::<IfdTag>().unwrap().is_empty());
	assert_eq!(
		combined.tag::<ApeTag>().unwrap().album().as_deref(),
		Some("Field recordings")
	);

	// APE has nowhere to store an aperture
	combined.set_f_number(8.0);
	assert_eq!(combined.tag::<ApeTag>().unwrap().len(), 1);
	assert_eq!(combined.tag::<IfdTag>().unwrap().f_number(), Some(8.0));
}

#[test_log::test]
fn test_tag_mut() {
	let mut combined = combined_photo();

	combined
		.tag_mut::<IfdTag>()
		.unwrap()
		.set_title(String::from("Exif title"));

	// XMP still comes first
	assert_eq!(combined.title().as_deref(), Some("Evening tram"));

	combined.tag_mut::<XmpTag>().unwrap().remove_title();
	assert_eq!(combined.title().as_deref(), Some("Exif title"));

	assert!(combined.tag::<ApeTag>().is_none());
	assert!(combined.tag_mut::<ApeTag>().is_none());
}

#[test_log::test]
fn test_replace_tag() {
	let mut combined = combined_photo();

	let previous = combined.push_tag(Box::new(XmpTag::new())).unwrap();
	assert_eq!(previous.tag_type(), TagType::Xmp);
	assert!(!previous.is_empty());

	assert_eq!(combined.len(), 2);
	assert_eq!(combined.title(), None);
	assert_eq!(combined.make().as_deref(), Some("FUJIFILM"));

	let types = combined.tags().map(|tag| tag.tag_type()).collect::<Vec<_>>();
	assert_eq!(types.len(), 2);
	assert!(types.contains(&TagType::Xmp));
	assert!(types.contains(&TagType::TiffIfd));
}
