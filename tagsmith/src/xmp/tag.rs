use super::namespace::{
	DC_NS, EXIF_NS, RDF_NS, TIFF_NS, XML_NS, XMP_DM_NS, XMP_G_IMG_NS, XMP_NS,
};
use super::node::{XmpNode, XmpNodeType};
use super::read::parse_xmp;
use super::write::XmpRenderer;
use crate::config::{ParseOptions, WriteOptions};
use crate::error::Result;
use crate::ifd::Rational;
use crate::macros::err;
use crate::picture::{MimeType, Picture};
use crate::tag::{Accessor, TagExt, TagType};

use std::any::Any;
use std::borrow::Cow;
use std::cell::OnceCell;
use std::collections::HashMap;

const DEFAULT_LANGUAGE: &str = "x-default";

// (namespace, name) -> child indices leading to the first match
type NodeIndex = HashMap<(String, String), Vec<usize>>;

macro_rules! impl_text_accessor {
	($($name:ident => ($namespace:ident, $property:literal);)+) => {
		paste::paste! {
			$(
				fn $name(&self) -> Option<Cow<'_, str>> {
					self.get_text_node($namespace, $property).map(Cow::Borrowed)
				}

				fn [<set_ $name>](&mut self, value: String) {
					self.set_text_node($namespace, $property, value);
				}

				fn [<remove_ $name>](&mut self) {
					self.remove_node($namespace, $property);
				}
			)+
		}
	}
}

macro_rules! impl_lang_alt_accessor {
	($($name:ident => ($namespace:ident, $property:literal);)+) => {
		paste::paste! {
			$(
				fn $name(&self) -> Option<Cow<'_, str>> {
					self.get_lang_alt_node($namespace, $property).map(Cow::Borrowed)
				}

				fn [<set_ $name>](&mut self, value: String) {
					self.set_lang_alt_node($namespace, $property, value);
				}

				fn [<remove_ $name>](&mut self) {
					self.remove_node($namespace, $property);
				}
			)+
		}
	}
}

macro_rules! impl_text_list_accessor {
	($($name:ident => ($namespace:ident, $property:literal);)+) => {
		paste::paste! {
			$(
				fn $name(&self) -> Option<Vec<String>> {
					self.get_collection_node($namespace, $property)
				}

				fn [<set_ $name>](&mut self, value: Vec<String>) {
					self.set_text_list($namespace, $property, value);
				}

				fn [<remove_ $name>](&mut self) {
					self.remove_node($namespace, $property);
				}
			)+
		}
	}
}

macro_rules! impl_rational_accessor {
	($($name:ident => ($namespace:ident, $property:literal);)+) => {
		paste::paste! {
			$(
				fn $name(&self) -> Option<f64> {
					self.get_text_node($namespace, $property).and_then(parse_rational)
				}

				fn [<set_ $name>](&mut self, value: f64) {
					let Some(rational) = Rational::approximate(value) else {
						log::warn!("XMP: {value} cannot be stored as a rational, ignoring");
						return;
					};

					self.set_text_node($namespace, $property, rational.to_string());
				}

				fn [<remove_ $name>](&mut self) {
					self.remove_node($namespace, $property);
				}
			)+
		}
	}
}

/// An XMP packet
///
/// The packet is kept as a tree of [`XmpNode`]s, rooted at a struct standing for the
/// `rdf:Description`s of the packet. Every top level property is a child of the root, properties
/// the [`Accessor`] methods do not cover survive a round trip.
///
/// Lookups through [`XmpTag::find_node`] go through an index, built on first use and discarded
/// on any mutable access to the tree. As such, `XmpTag` is not [`Sync`].
///
/// ## Accessor mapping
///
/// | Accessor                          | Property                 |
/// |-----------------------------------|--------------------------|
/// | title, comment, copyright         | `dc:title`, `dc:description`, `dc:rights` (`x-default`) |
/// | creator                           | `dc:creator` (first)     |
/// | keywords                          | `dc:subject`             |
/// | software, date time, rating       | `xmp:CreatorTool`, `xmp:CreateDate`, `xmp:Rating` |
/// | make, model, orientation          | `tiff:Make`, `tiff:Model`, `tiff:Orientation` |
/// | exposure time, f-number, focal length, ISO speed | `exif:ExposureTime`, `exif:FNumber`, `exif:FocalLength`, `exif:ISOSpeedRatings` |
/// | album, lyrics, track              | `xmpDM:album`, `xmpDM:lyrics`, `xmpDM:trackNumber` |
/// | performers, album artists, composers, genres | `xmpDM:artist`, `xmpDM:albumArtist`, `xmpDM:composer`, `xmpDM:genre` |
/// | pictures                          | `xmp:Thumbnails` (base64 JPEG) |
///
/// The `xmpDM` list properties are plain text in the XMP Dynamic Media schema. A single value is
/// written as text, multiple values as an `rdf:Seq`.
#[derive(Clone, Debug)]
pub struct XmpTag {
	root: XmpNode,
	index: OnceCell<NodeIndex>,
}

impl PartialEq for XmpTag {
	fn eq(&self, other: &Self) -> bool {
		self.root == other.root
	}
}

impl Eq for XmpTag {}

impl Default for XmpTag {
	fn default() -> Self {
		Self {
			root: XmpNode::structure(RDF_NS, "Description"),
			index: OnceCell::new(),
		}
	}
}

impl XmpTag {
	/// Create a new empty `XmpTag`
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::tag::TagExt;
	/// use tagsmith::xmp::XmpTag;
	///
	/// let tag = XmpTag::new();
	/// assert!(tag.is_empty());
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// Parse an XMP packet
	///
	/// The packet may be UTF-8 or, with a byte order mark, UTF-16. The `<?xpacket?>` wrapper and
	/// `x:xmpmeta` element are optional.
	///
	/// With [`ParseOptions::read_cover_art`] disabled, `xmp:Thumbnails` is discarded.
	///
	/// # Errors
	///
	/// * The packet is not well-formed XML
	/// * The packet has no `rdf:RDF` element
	/// * [`ParsingMode::Strict`](crate::config::ParsingMode::Strict) only: The RDF contains
	///   elements out of place
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::config::{ParseOptions, WriteOptions};
	/// use tagsmith::tag::{Accessor, TagExt};
	/// use tagsmith::xmp::XmpTag;
	///
	/// # fn main() -> tagsmith::error::Result<()> {
	/// let mut tag = XmpTag::new();
	/// tag.set_title(String::from("Foo title"));
	/// tag.set_keywords(vec![String::from("sky"), String::from("sea")]);
	///
	/// let packet = tag.render(WriteOptions::default())?;
	///
	/// let parsed = XmpTag::parse(&packet, ParseOptions::new())?;
	/// assert_eq!(parsed.title().as_deref(), Some("Foo title"));
	/// assert_eq!(parsed.keywords().map(|k| k.len()), Some(2));
	/// # Ok(()) }
	/// ```
	pub fn parse(data: &[u8], parse_options: ParseOptions) -> Result<Self> {
		let mut root = parse_xmp(data, parse_options)?;
		if !parse_options.read_cover_art {
			root.remove_child(XMP_NS, "Thumbnails");
		}

		Ok(Self {
			root,
			index: OnceCell::new(),
		})
	}

	/// The root of the property tree
	pub fn root(&self) -> &XmpNode {
		&self.root
	}

	/// A mutable reference to the root of the property tree
	pub fn root_mut(&mut self) -> &mut XmpNode {
		self.index.take();
		&mut self.root
	}

	/// Find the first node with the given name, at any depth
	///
	/// This is the same search as [`XmpNode::find_node`] on the root, backed by an index.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::xmp::XmpTag;
	/// use tagsmith::xmp::namespace::{DC_NS, XML_NS};
	///
	/// let mut tag = XmpTag::new();
	/// tag.set_lang_alt_node(DC_NS, "title", "Foo title");
	///
	/// let title = tag.find_node(DC_NS, "title").unwrap();
	/// assert_eq!(title.children()[0].qualifier(XML_NS, "lang"), Some("x-default"));
	/// ```
	pub fn find_node(&self, namespace: &str, name: &str) -> Option<&XmpNode> {
		let path = self
			.index
			.get_or_init(|| build_index(&self.root))
			.get(&(namespace.to_owned(), name.to_owned()))?;

		let mut node = &self.root;
		for &index in path {
			node = node.children.get(index)?;
		}

		Some(node)
	}

	/// Get the value of a top level simple property
	pub fn get_text_node(&self, namespace: &str, name: &str) -> Option<&str> {
		let node = self.root.child(namespace, name)?;
		match node.node_type {
			XmpNodeType::Simple => node.value(),
			_ => None,
		}
	}

	/// Set a top level simple property, replacing any existing property of the same name
	///
	/// An empty `value` removes the property.
	pub fn set_text_node(&mut self, namespace: &str, name: &str, value: impl Into<String>) {
		let value = value.into();
		if value.is_empty() {
			self.remove_node(namespace, name);
			return;
		}

		self.replace_node(XmpNode::simple(namespace, name, value));
	}

	/// Get the default (`x-default`) value of a language alternative
	///
	/// If there is no default, the first alternative is used. A simple property is also accepted.
	pub fn get_lang_alt_node(&self, namespace: &str, name: &str) -> Option<&str> {
		let node = self.root.child(namespace, name)?;
		match node.node_type {
			XmpNodeType::Simple => node.value(),
			XmpNodeType::Struct => None,
			XmpNodeType::Bag | XmpNodeType::Seq | XmpNodeType::Alt => node
				.children
				.iter()
				.find(|item| item.qualifier(XML_NS, "lang") == Some(DEFAULT_LANGUAGE))
				.or_else(|| node.children.first())
				.and_then(XmpNode::value),
		}
	}

	/// Set the default (`x-default`) value of a language alternative
	///
	/// Any other languages of an existing alternative are kept. An empty `value` removes the
	/// property.
	pub fn set_lang_alt_node(&mut self, namespace: &str, name: &str, value: impl Into<String>) {
		let value = value.into();
		if value.is_empty() {
			self.remove_node(namespace, name);
			return;
		}

		let mut alt = match self.root.child(namespace, name) {
			Some(existing) if existing.node_type == XmpNodeType::Alt => existing.clone(),
			_ => XmpNode::new(namespace, name, XmpNodeType::Alt, None),
		};

		alt.children
			.retain(|item| item.qualifier(XML_NS, "lang") != Some(DEFAULT_LANGUAGE));

		let mut item = XmpNode::simple(RDF_NS, "li", value);
		item.set_qualifier(XML_NS, "lang", DEFAULT_LANGUAGE);
		alt.children.insert(0, item);

		self.replace_node(alt);
	}

	/// Get the non-empty values of an array property
	///
	/// A simple property is read as a single item array.
	pub fn get_collection_node(&self, namespace: &str, name: &str) -> Option<Vec<String>> {
		let node = self.root.child(namespace, name)?;
		let values = match node.node_type {
			XmpNodeType::Simple => node
				.value()
				.filter(|value| !value.is_empty())
				.map(String::from)
				.into_iter()
				.collect::<Vec<_>>(),
			XmpNodeType::Struct => return None,
			XmpNodeType::Bag | XmpNodeType::Seq | XmpNodeType::Alt => node
				.children
				.iter()
				.filter_map(XmpNode::value)
				.filter(|value| !value.is_empty())
				.map(String::from)
				.collect(),
		};

		(!values.is_empty()).then_some(values)
	}

	/// Set an array property, replacing any existing property of the same name
	///
	/// Empty values are skipped, if none remain the property is removed.
	///
	/// # Errors
	///
	/// `array_type` is not one of [`XmpNodeType::Bag`], [`XmpNodeType::Seq`], or [`XmpNodeType::Alt`]
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::xmp::namespace::DC_NS;
	/// use tagsmith::xmp::{XmpNodeType, XmpTag};
	///
	/// # fn main() -> tagsmith::error::Result<()> {
	/// let mut tag = XmpTag::new();
	/// tag.set_collection_node(
	/// 	DC_NS,
	/// 	"subject",
	/// 	vec![String::from("sky"), String::new()],
	/// 	XmpNodeType::Bag,
	/// )?;
	///
	/// assert_eq!(tag.get_collection_node(DC_NS, "subject"), Some(vec![String::from("sky")]));
	/// assert!(tag.set_collection_node(DC_NS, "subject", Vec::new(), XmpNodeType::Simple).is_err());
	/// # Ok(()) }
	/// ```
	pub fn set_collection_node(
		&mut self,
		namespace: &str,
		name: &str,
		values: Vec<String>,
		array_type: XmpNodeType,
	) -> Result<()> {
		if !array_type.is_array() {
			err!(InvalidArgument("Expected an array node type"));
		}

		self.set_array(namespace, name, values, array_type);
		Ok(())
	}

	/// Remove every top level property with the given name
	pub fn remove_node(&mut self, namespace: &str, name: &str) {
		if self.root.child(namespace, name).is_some() {
			self.root_mut().remove_child(namespace, name);
		}
	}

	fn set_array(&mut self, namespace: &str, name: &str, values: Vec<String>, array_type: XmpNodeType) {
		let mut array = XmpNode::new(namespace, name, array_type, None);
		array.children = values
			.into_iter()
			.filter(|value| !value.is_empty())
			.map(|value| XmpNode::simple(RDF_NS, "li", value))
			.collect();

		if array.children.is_empty() {
			self.remove_node(namespace, name);
			return;
		}

		self.replace_node(array);
	}

	// Single values are written as text, matching the Dynamic Media schema
	fn set_text_list(&mut self, namespace: &str, name: &str, mut values: Vec<String>) {
		values.retain(|value| !value.is_empty());
		match values.len() {
			0 => self.remove_node(namespace, name),
			1 => self.set_text_node(namespace, name, values.remove(0)),
			_ => self.set_array(namespace, name, values, XmpNodeType::Seq),
		}
	}

	// The value of a simple property, or the first item of an array
	fn first_item(&self, namespace: &str, name: &str) -> Option<&str> {
		let node = self.root.child(namespace, name)?;
		let value = match node.node_type {
			XmpNodeType::Simple => node.value(),
			XmpNodeType::Struct => None,
			XmpNodeType::Bag | XmpNodeType::Seq | XmpNodeType::Alt => {
				node.children.first().and_then(XmpNode::value)
			},
		};

		value.filter(|value| !value.is_empty())
	}

	// Replaces the first property of the same name in place, dropping any duplicates
	fn replace_node(&mut self, node: XmpNode) {
		let root = self.root_mut();
		let position = root
			.children
			.iter()
			.position(|child| child.is(&node.namespace, &node.name));

		root.remove_child(&node.namespace, &node.name);
		match position {
			Some(position) => root.children.insert(position, node),
			None => root.children.push(node),
		}
	}
}

fn build_index(root: &XmpNode) -> NodeIndex {
	fn visit(node: &XmpNode, path: &mut Vec<usize>, index: &mut NodeIndex) {
		for (position, child) in node.children.iter().enumerate() {
			path.push(position);
			index
				.entry((child.namespace.clone(), child.name.clone()))
				.or_insert_with(|| path.clone());
			visit(child, path, index);
			path.pop();
		}
	}

	let mut index = NodeIndex::new();
	visit(root, &mut Vec::new(), &mut index);
	index
}

// XMP rationals are written as "numerator/denominator", plain numbers are accepted too
fn parse_rational(text: &str) -> Option<f64> {
	let text = text.trim();
	let Some((numerator, denominator)) = text.split_once('/') else {
		return text.parse().ok().filter(|value: &f64| value.is_finite());
	};

	let numerator = numerator.trim().parse::<f64>().ok()?;
	let denominator = denominator.trim().parse::<f64>().ok()?;
	if denominator == 0.0 {
		return None;
	}

	Some(numerator / denominator)
}

impl Accessor for XmpTag {
	impl_lang_alt_accessor!(
		title     => (DC_NS, "title");
		comment   => (DC_NS, "description");
		copyright => (DC_NS, "rights");
	);

	impl_text_accessor!(
		album     => (XMP_DM_NS, "album");
		lyrics    => (XMP_DM_NS, "lyrics");
		software  => (XMP_NS, "CreatorTool");
		date_time => (XMP_NS, "CreateDate");
		make      => (TIFF_NS, "Make");
		model     => (TIFF_NS, "Model");
	);

	impl_text_list_accessor!(
		performers    => (XMP_DM_NS, "artist");
		album_artists => (XMP_DM_NS, "albumArtist");
		composers     => (XMP_DM_NS, "composer");
		genres        => (XMP_DM_NS, "genre");
	);

	impl_rational_accessor!(
		exposure_time => (EXIF_NS, "ExposureTime");
		f_number      => (EXIF_NS, "FNumber");
		focal_length  => (EXIF_NS, "FocalLength");
	);

	fn creator(&self) -> Option<Cow<'_, str>> {
		self.first_item(DC_NS, "creator").map(Cow::Borrowed)
	}

	fn set_creator(&mut self, value: String) {
		self.set_array(DC_NS, "creator", vec![value], XmpNodeType::Seq);
	}

	fn remove_creator(&mut self) {
		self.remove_node(DC_NS, "creator");
	}

	fn keywords(&self) -> Option<Vec<String>> {
		self.get_collection_node(DC_NS, "subject")
	}

	fn set_keywords(&mut self, value: Vec<String>) {
		self.set_array(DC_NS, "subject", value, XmpNodeType::Bag);
	}

	fn remove_keywords(&mut self) {
		self.remove_node(DC_NS, "subject");
	}

	fn track(&self) -> Option<u32> {
		// Some writers store "track/total"
		let text = self.get_text_node(XMP_DM_NS, "trackNumber")?;
		let number = text.split('/').next().unwrap_or_default();
		number.trim().parse().ok()
	}

	fn set_track(&mut self, value: u32) {
		self.set_text_node(XMP_DM_NS, "trackNumber", value.to_string());
	}

	fn remove_track(&mut self) {
		self.remove_node(XMP_DM_NS, "trackNumber");
	}

	fn rating(&self) -> Option<u32> {
		// A real number, -1 meaning "rejected"
		let rating = self
			.get_text_node(XMP_NS, "Rating")?
			.trim()
			.parse::<f64>()
			.ok()?;

		if !rating.is_finite() || rating < 0.0 {
			return None;
		}

		Some(rating.round() as u32)
	}

	fn set_rating(&mut self, value: u32) {
		self.set_text_node(XMP_NS, "Rating", value.to_string());
	}

	fn remove_rating(&mut self) {
		self.remove_node(XMP_NS, "Rating");
	}

	fn orientation(&self) -> Option<u16> {
		self.get_text_node(TIFF_NS, "Orientation")?
			.trim()
			.parse()
			.ok()
	}

	fn set_orientation(&mut self, value: u16) {
		self.set_text_node(TIFF_NS, "Orientation", value.to_string());
	}

	fn remove_orientation(&mut self) {
		self.remove_node(TIFF_NS, "Orientation");
	}

	fn iso_speed(&self) -> Option<u32> {
		self.first_item(EXIF_NS, "ISOSpeedRatings")?
			.trim()
			.parse()
			.ok()
	}

	fn set_iso_speed(&mut self, value: u32) {
		self.set_array(
			EXIF_NS,
			"ISOSpeedRatings",
			vec![value.to_string()],
			XmpNodeType::Seq,
		);
	}

	fn remove_iso_speed(&mut self) {
		self.remove_node(EXIF_NS, "ISOSpeedRatings");
	}

	fn pictures(&self) -> Option<Vec<Picture>> {
		let thumbnails = self.root.child(XMP_NS, "Thumbnails")?;
		let pictures = thumbnails
			.children
			.iter()
			.filter_map(|item| {
				let image = item.child(XMP_G_IMG_NS, "image")?.value()?;
				match Picture::from_base64(image) {
					Ok(picture) => Some(picture),
					Err(e) => {
						log::warn!("XMP: Unable to read thumbnail: {e}");
						None
					},
				}
			})
			.collect::<Vec<_>>();

		(!pictures.is_empty()).then_some(pictures)
	}

	fn set_pictures(&mut self, value: Vec<Picture>) {
		let mut thumbnails = XmpNode::new(XMP_NS, "Thumbnails", XmpNodeType::Alt, None);
		for picture in value {
			if picture.mime_type() != Some(&MimeType::Jpeg) {
				log::warn!(
					"XMP: Discarding thumbnail with unsupported format {:?}",
					picture.mime_type()
				);
				continue;
			}

			let mut item = XmpNode::structure(RDF_NS, "li");
			item.children.extend([
				XmpNode::simple(XMP_G_IMG_NS, "format", "JPEG"),
				XmpNode::simple(XMP_G_IMG_NS, "image", picture.as_base64()),
			]);
			thumbnails.children.push(item);
		}

		if thumbnails.children.is_empty() {
			self.remove_pictures();
			return;
		}

		self.replace_node(thumbnails);
	}

	fn remove_pictures(&mut self) {
		self.remove_node(XMP_NS, "Thumbnails");
	}
}

impl TagExt for XmpTag {
	#[inline]
	fn tag_type(&self) -> TagType {
		TagType::Xmp
	}

	/// The number of top level properties
	fn len(&self) -> usize {
		self.root.child_count()
	}

	fn is_empty(&self) -> bool {
		self.root.children.is_empty()
	}

	fn clear(&mut self) {
		self.root_mut().children.clear();
	}

	/// Render the tag as an XMP packet
	///
	/// The packet is wrapped in `<?xpacket?>` processing instructions unless
	/// [`WriteOptions::xmp_packet_wrapper`] is disabled, padded by
	/// [`WriteOptions::preferred_padding`]. An empty tag renders to nothing.
	///
	/// # Errors
	///
	/// * Writing the XML fails
	fn render(&mut self, write_options: WriteOptions) -> Result<Vec<u8>> {
		if self.is_empty() {
			return Ok(Vec::new());
		}

		XmpRenderer::new(&self.root).render(write_options)
	}

	fn as_any(&self) -> &dyn Any {
		self
	}

	fn as_any_mut(&mut self) -> &mut dyn Any {
		self
	}
}
