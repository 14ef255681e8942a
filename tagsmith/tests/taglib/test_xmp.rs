use tagsmith::config::{ParseOptions, ParsingMode, WriteOptions};
use tagsmith::tag::{Accessor, TagExt, TagType};
use tagsmith::xmp::namespace::{DC_NS, EXIF_NS, PHOTOSHOP_NS, XML_NS, XMP_NS};
use tagsmith::xmp::{XmpNode, XmpNodeType, XmpTag};

const PACKET: &str = r#"<?xpacket begin="﻿" id="W5M0MpCehiHzreSzNTczkc9d"?>
<x:xmpmeta xmlns:x="adobe:ns:meta/" x:xmptk="Adobe XMP Core 5.6-c140">
 <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <rdf:Description rdf:about=""
    xmlns:xmp="http://ns.adobe.com/xap/1.0/"
    xmlns:dc="http://purl.org/dc/elements/1.1/"
    xmlns:photoshop="http://ns.adobe.com/photoshop/1.0/"
    xmlns:exif="http://ns.adobe.com/exif/1.0/"
    xmlns:tiff="http://ns.adobe.com/tiff/1.0/"
   xmp:CreatorTool="Adobe Photoshop Lightroom 6.0 (Windows)"
   xmp:CreateDate="2015-06-20T14:51:29"
   xmp:Rating="3"
   photoshop:City="Lisbon"
   tiff:Make="NIKON CORPORATION"
   exif:ExposureTime="1/250"
   exif:FNumber="56/10">
   <dc:title>
    <rdf:Alt>
     <rdf:li xml:lang="x-default">Harbour at dusk</rdf:li>
     <rdf:li xml:lang="pt-PT">Porto ao anoitecer</rdf:li>
    </rdf:Alt>
   </dc:title>
   <dc:creator>
    <rdf:Seq>
     <rdf:li>Jane Doe</rdf:li>
    </rdf:Seq>
   </dc:creator>
   <dc:subject>
    <rdf:Bag>
     <rdf:li>harbour</rdf:li>
     <rdf:li>boats</rdf:li>
     <rdf:li>dusk</rdf:li>
    </rdf:Bag>
   </dc:subject>
   <exif:ISOSpeedRatings>
    <rdf:Seq>
     <rdf:li>400</rdf:li>
    </rdf:Seq>
   </exif:ISOSpeedRatings>
  </rdf:Description>
 </rdf:RDF>
</x:xmpmeta>
<?xpacket end="w"?>"#;

#[test_log::test]
fn test_read_packet() {
	let tag = XmpTag::parse(PACKET.as_bytes(), ParseOptions::new()).unwrap();
	assert_eq!(tag.tag_type(), TagType::Xmp);

	assert_eq!(tag.title().as_deref(), Some("Harbour at dusk"));
	assert_eq!(tag.creator().as_deref(), Some("Jane Doe"));
	assert_eq!(
		tag.software().as_deref(),
		Some("Adobe Photoshop Lightroom 6.0 (Windows)")
	);
	assert_eq!(tag.date_time().as_deref(), Some("2015-06-20T14:51:29"));
	assert_eq!(tag.make().as_deref(), Some("NIKON CORPORATION"));
	assert_eq!(tag.rating(), Some(3));
	assert_eq!(tag.exposure_time(), Some(0.004));
	assert_eq!(tag.f_number(), Some(5.6));
	assert_eq!(tag.iso_speed(), Some(400));
	assert_eq!(
		tag.keywords(),
		Some(vec![
			String::from("harbour"),
			String::from("boats"),
			String::from("dusk")
		])
	);

	// Properties without an accessor are still reachable
	assert_eq!(tag.get_text_node(PHOTOSHOP_NS, "City"), Some("Lisbon"));

	let title = tag.find_node(DC_NS, "title").unwrap();
	assert_eq!(title.node_type(), XmpNodeType::Alt);
	assert_eq!(title.child_count(), 2);
	assert_eq!(title.children()[1].qualifier(XML_NS, "lang"), Some("pt-PT"));
}

#[test_log::test]
fn test_modify_and_save() {
	let mut tag = XmpTag::parse(PACKET.as_bytes(), ParseOptions::new()).unwrap();
	tag.set_title(String::from("Harbour at night"));
	tag.set_keywords(vec![String::from("harbour"), String::from("night")]);
	tag.set_iso_speed(800);
	tag.remove_rating();

	let rendered = tag.render(WriteOptions::default()).unwrap();
	let text = String::from_utf8(rendered.clone()).unwrap();
	assert!(text.starts_with("<?xpacket begin="));
	assert!(text.ends_with("<?xpacket end=\"w\"?>"));

	let parsed = XmpTag::parse(&rendered, ParseOptions::new()).unwrap();
	assert_eq!(parsed.title().as_deref(), Some("Harbour at night"));
	assert_eq!(parsed.rating(), None);
	assert_eq!(parsed.iso_speed(), Some(800));
	assert_eq!(
		parsed.keywords(),
		Some(vec![String::from("harbour"), String::from("night")])
	);
	assert_eq!(parsed.get_text_node(PHOTOSHOP_NS, "City"), Some("Lisbon"));

	// Only the default language was replaced
	assert_eq!(
		parsed.find_node(DC_NS, "title").map(XmpNode::child_count),
		Some(2)
	);
}

#[test_log::test]
fn test_save_without_wrapper() {
	let mut tag = XmpTag::new();
	tag.set_make(String::from("Canon"));
	tag.set_text_node(XMP_NS, "Label", "Red");

	let rendered = tag
		.render(WriteOptions::new().xmp_packet_wrapper(false))
		.unwrap();
	let text = String::from_utf8(rendered).unwrap();
	assert!(text.starts_with("<x:xmpmeta"));
	assert!(!text.contains("xpacket"));
	assert!(text.contains("tiff:Make=\"Canon\""));
	assert!(text.contains("xmp:Label=\"Red\""));
}

#[test_log::test]
fn test_empty_tag() {
	let mut tag = XmpTag::new();
	assert!(tag.is_empty());
	assert!(tag.render(WriteOptions::default()).unwrap().is_empty());

	tag.set_exposure_time(0.5);
	assert!(!tag.is_empty());
	assert_eq!(tag.len(), 1);

	tag.clear();
	assert!(tag.is_empty());
}

#[test_log::test]
fn test_malformed_packet() {
	assert!(XmpTag::parse(b"<x:xmpmeta xmlns:x=\"adobe:ns:meta/\">", ParseOptions::new()).is_err());
	assert!(XmpTag::parse(b"not xml at all", ParseOptions::new()).is_err());
}

#[test_log::test]
fn test_unknown_namespace_survives() {
	let packet = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <rdf:Description rdf:about="" xmlns:acme="http://example.com/acme/1.0/">
   <acme:Project>Lighthouse</acme:Project>
   <acme:Reviewers>
    <rdf:Bag><rdf:li>Ana</rdf:li><rdf:li>Rui</rdf:li></rdf:Bag>
   </acme:Reviewers>
  </rdf:Description>
 </rdf:RDF>"#;

	let strict = ParseOptions::new().parsing_mode(ParsingMode::Strict);
	let mut tag = XmpTag::parse(packet.as_bytes(), strict).unwrap();
	let rendered = tag.render(WriteOptions::default()).unwrap();
	let parsed = XmpTag::parse(&rendered, strict).unwrap();

	assert_eq!(
		parsed.get_text_node("http://example.com/acme/1.0/", "Project"),
		Some("Lighthouse")
	);
	assert_eq!(
		parsed.get_collection_node("http://example.com/acme/1.0/", "Reviewers"),
		Some(vec![String::from("Ana"), String::from("Rui")])
	);
	assert!(parsed.find_node(EXIF_NS, "FNumber").is_none());
}
