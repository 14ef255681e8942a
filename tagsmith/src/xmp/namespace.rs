//! Well known XMP namespaces

/// The RDF syntax namespace
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
/// The XML namespace, bound to the `xml` prefix in every document
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";
/// The namespace of the `x:xmpmeta` wrapper element
pub const X_NS: &str = "adobe:ns:meta/";
/// Dublin Core
pub const DC_NS: &str = "http://purl.org/dc/elements/1.1/";
/// XMP Basic
pub const XMP_NS: &str = "http://ns.adobe.com/xap/1.0/";
/// XMP Rights Management
pub const XMP_RIGHTS_NS: &str = "http://ns.adobe.com/xap/1.0/rights/";
/// XMP Dynamic Media
pub const XMP_DM_NS: &str = "http://ns.adobe.com/xmp/1.0/DynamicMedia/";
/// XMP Image, used by the fields of `xmp:Thumbnails`
pub const XMP_G_IMG_NS: &str = "http://ns.adobe.com/xap/1.0/g/img/";
/// Exif specific properties
pub const EXIF_NS: &str = "http://ns.adobe.com/exif/1.0/";
/// TIFF properties
pub const TIFF_NS: &str = "http://ns.adobe.com/tiff/1.0/";
/// Photoshop
pub const PHOTOSHOP_NS: &str = "http://ns.adobe.com/photoshop/1.0/";

const WELL_KNOWN_PREFIXES: [(&str, &str); 11] = [
	(RDF_NS, "rdf"),
	(XML_NS, "xml"),
	(X_NS, "x"),
	(DC_NS, "dc"),
	(XMP_NS, "xmp"),
	(XMP_RIGHTS_NS, "xmpRights"),
	(XMP_DM_NS, "xmpDM"),
	(XMP_G_IMG_NS, "xmpGImg"),
	(EXIF_NS, "exif"),
	(TIFF_NS, "tiff"),
	(PHOTOSHOP_NS, "photoshop"),
];

/// The conventional prefix of a well known namespace
///
/// # Examples
///
/// ```rust
/// use tagsmith::xmp::namespace::{DC_NS, prefix_for};
///
/// assert_eq!(prefix_for(DC_NS), Some("dc"));
/// assert_eq!(prefix_for("http://example.com/ns/"), None);
/// ```
pub fn prefix_for(namespace: &str) -> Option<&'static str> {
	WELL_KNOWN_PREFIXES
		.iter()
		.find(|(uri, _)| *uri == namespace)
		.map(|(_, prefix)| *prefix)
}

// Prefixes handed out while serializing, generated as `ns1`, `ns2`, ... for unknown namespaces
#[derive(Default)]
pub(crate) struct PrefixMap {
	entries: Vec<(String, String)>,
	generated: usize,
}

impl PrefixMap {
	pub(crate) fn register(&mut self, namespace: &str) {
		if namespace.is_empty() || self.get(namespace).is_some() {
			return;
		}

		let prefix = match prefix_for(namespace) {
			Some(prefix) => prefix.to_owned(),
			None => {
				self.generated += 1;
				format!("ns{}", self.generated)
			},
		};

		self.entries.push((namespace.to_owned(), prefix));
	}

	pub(crate) fn get(&self, namespace: &str) -> Option<&str> {
		self.entries
			.iter()
			.find(|(uri, _)| uri == namespace)
			.map(|(_, prefix)| prefix.as_str())
	}

	pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.entries
			.iter()
			.map(|(uri, prefix)| (uri.as_str(), prefix.as_str()))
	}
}
