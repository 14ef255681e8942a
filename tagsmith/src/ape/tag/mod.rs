pub(crate) mod item;
mod read;
mod write;

use crate::ape::APE_PICTURE_TYPES;
use crate::config::{ParseOptions, WriteOptions};
use crate::error::Result;
use crate::picture::Picture;
use crate::tag::utils::{format_number_pair, parse_year, split_number_pair};
use crate::tag::{Accessor, TagExt, TagType};
use item::{ApeItem, ApeItemValue};

use std::any::Any;
use std::borrow::Cow;
use std::io::{Read, Seek};
use std::ops::Range;

macro_rules! first_key {
	($key:literal $(| $_remaining:literal)*) => {
		$key
	};
}

macro_rules! impl_accessor {
	($($name:ident => $($key:literal)|+;)+) => {
		paste::paste! {
			$(
				fn $name(&self) -> Option<Cow<'_, str>> {
					$(
						if let Some(text) = self.get($key).and_then(ApeItem::as_text) {
							return Some(Cow::Borrowed(text));
						}
					)+

					None
				}

				fn [<set_ $name>](&mut self, value: String) {
					$(
						self.remove($key);
					)+

					if !value.is_empty() {
						self.insert(ApeItem::known_text(first_key!($($key)|*), value))
					}
				}

				fn [<remove_ $name>](&mut self) {
					$(
						self.remove($key);
					)+
				}
			)+
		}
	}
}

macro_rules! impl_multi_accessor {
	($($name:ident => $($key:literal)|+;)+) => {
		paste::paste! {
			$(
				fn $name(&self) -> Option<Vec<String>> {
					$(
						if let Some(texts) = self.get($key).and_then(ApeItem::as_texts) {
							return Some(texts.to_vec());
						}
					)+

					None
				}

				fn [<set_ $name>](&mut self, value: Vec<String>) {
					$(
						self.remove($key);
					)+

					let value = ApeItemValue::Text(value);
					if !value.is_empty() {
						self.insert(ApeItem::unchecked(first_key!($($key)|*), value))
					}
				}

				fn [<remove_ $name>](&mut self) {
					$(
						self.remove($key);
					)+
				}
			)+
		}
	}
}

/// ## Item storage
///
/// `APE` isn't a very strict format. An [`ApeItem`] is only restricted by its key, and holds text,
/// binary data, or a locator.
///
/// Pictures are stored as [`ApeItemValue::Binary`], and can be converted with
/// [`Picture::from_ape_bytes()`]. For the appropriate item keys, see [`APE_PICTURE_TYPES`].
///
/// ## Read only items
///
/// Items marked read only when the tag is parsed are remembered. When rendering with
/// [`WriteOptions::respect_read_only`] they are written as they were read, regardless of any
/// changes made in the meantime. If the entire tag was marked read only, the whole tag is written
/// as it was read.
///
/// [`Picture::from_ape_bytes()`]: crate::picture::Picture::from_ape_bytes
#[derive(Default, Debug, Clone)]
pub struct ApeTag {
	/// Whether or not to mark the tag as read only
	pub read_only: bool,
	pub(crate) items: Vec<ApeItem>,
	pub(crate) retained: Vec<ApeItem>,
	pub(crate) retain_all: bool,
}

impl PartialEq for ApeTag {
	fn eq(&self, other: &Self) -> bool {
		self.read_only == other.read_only && self.items == other.items
	}
}

impl Eq for ApeTag {}

impl ApeTag {
	/// Create a new empty `ApeTag`
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::ape::ApeTag;
	/// use tagsmith::tag::TagExt;
	///
	/// let ape_tag = ApeTag::new();
	/// assert!(ape_tag.is_empty());
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// Parse a tag laid out as `[header][items][footer]`, `[header][items]` or `[items][footer]`
	///
	/// # Errors
	///
	/// * No valid header or footer is found
	/// * The tag claims a size larger than `data`
	/// * [`ParsingMode::Strict`](crate::config::ParsingMode::Strict) only: An item is corrupt or has an illegal key
	///
	/// In the other parsing modes, a corrupt item ends parsing, keeping all items read before it.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::ape::ApeTag;
	/// use tagsmith::config::{ParseOptions, WriteOptions};
	/// use tagsmith::tag::{Accessor, TagExt};
	///
	/// # fn main() -> tagsmith::error::Result<()> {
	/// let mut tag = ApeTag::new();
	/// tag.set_title(String::from("Foo title"));
	///
	/// let rendered = tag.render(WriteOptions::default())?;
	///
	/// let parsed = ApeTag::parse(&rendered, ParseOptions::new())?;
	/// assert_eq!(parsed.title().as_deref(), Some("Foo title"));
	/// # Ok(()) }
	/// ```
	pub fn parse(data: &[u8], parse_options: ParseOptions) -> Result<Self> {
		read::parse_ape_tag(data, parse_options)
	}

	/// Search for a tag at the end of `reader`
	///
	/// An ID3v1 tag following the APE tag is skipped. On success, this returns the tag along with
	/// the byte range it occupies in the stream.
	///
	/// # Errors
	///
	/// * `reader` cannot be read
	/// * A tag was found, but it is corrupt. See [`ApeTag::parse`]
	pub fn find_in<R>(
		reader: &mut R,
		parse_options: ParseOptions,
	) -> Result<Option<(Self, Range<u64>)>>
	where
		R: Read + Seek,
	{
		read::find_ape_tag(reader, parse_options)
	}

	/// Get an [`ApeItem`] by key
	///
	/// NOTE: While `APE` items are supposed to be case-sensitive,
	/// this rule is rarely followed, so this will ignore case when searching.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::ape::ApeTag;
	/// use tagsmith::tag::Accessor;
	///
	/// let mut ape_tag = ApeTag::new();
	/// ape_tag.set_title(String::from("Foo title"));
	///
	/// // Get the title by its key
	/// let title = ape_tag.get("TITLE");
	/// assert!(title.is_some());
	/// ```
	pub fn get(&self, key: &str) -> Option<&ApeItem> {
		self.items
			.iter()
			.find(|i| i.key().eq_ignore_ascii_case(key))
	}

	/// Insert an [`ApeItem`]
	///
	/// This will remove any item with the same key prior to insertion
	pub fn insert(&mut self, value: ApeItem) {
		self.remove(value.key());
		self.items.push(value);
	}

	/// Remove an [`ApeItem`] by key
	///
	/// NOTE: Like [`ApeTag::get`], this is not case-sensitive
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::ape::ApeTag;
	/// use tagsmith::tag::Accessor;
	///
	/// let mut ape_tag = ApeTag::new();
	/// ape_tag.set_title(String::from("Foo title"));
	///
	/// // Remove the title
	/// ape_tag.remove("Title");
	///
	/// let title = ape_tag.get("Title");
	/// assert!(title.is_none());
	/// ```
	pub fn remove(&mut self, key: &str) {
		self.items.retain(|i| !i.key().eq_ignore_ascii_case(key));
	}

	/// Returns all items in the tag
	pub fn items(&self) -> impl ExactSizeIterator<Item = &ApeItem> + Clone {
		self.items.iter()
	}

	/// The items that were marked read only when the tag was parsed
	pub fn read_only_items(&self) -> &[ApeItem] {
		&self.retained
	}

	fn split_num_pair(&self, key: &str) -> (Option<u32>, Option<u32>) {
		match self.get(key).and_then(ApeItem::as_text) {
			Some(text) => split_number_pair(text),
			None => (None, None),
		}
	}

	fn insert_number_pair(&mut self, key: &'static str, number: Option<u32>, total: Option<u32>) {
		if let Some(value) = format_number_pair(number, total) {
			self.insert(ApeItem::known_text(key, value));
		} else {
			log::warn!("{key} is not set. number: {number:?}, total: {total:?}");
		}
	}

	fn is_picture_key(key: &str) -> bool {
		APE_PICTURE_TYPES
			.iter()
			.any(|picture_key| picture_key.eq_ignore_ascii_case(key))
	}
}

impl IntoIterator for ApeTag {
	type Item = ApeItem;
	type IntoIter = std::vec::IntoIter<Self::Item>;

	fn into_iter(self) -> Self::IntoIter {
		self.items.into_iter()
	}
}

impl<'a> IntoIterator for &'a ApeTag {
	type Item = &'a ApeItem;
	type IntoIter = std::slice::Iter<'a, ApeItem>;

	fn into_iter(self) -> Self::IntoIter {
		self.items.iter()
	}
}

impl Accessor for ApeTag {
	impl_accessor!(
		title     => "Title";
		album     => "Album";
		comment   => "Comment";
		copyright => "Copyright";
		conductor => "Conductor";
		grouping  => "Grouping";
		lyrics    => "Lyrics";
	);

	impl_multi_accessor!(
		performers    => "Artist";
		album_artists => "Album Artist" | "AlbumArtist";
		composers     => "Composer";
		genres        => "Genre";
	);

	fn track(&self) -> Option<u32> {
		self.split_num_pair("Track").0
	}

	fn set_track(&mut self, value: u32) {
		self.insert_number_pair("Track", Some(value), self.track_total());
	}

	fn remove_track(&mut self) {
		self.remove("Track");
	}

	fn track_total(&self) -> Option<u32> {
		self.split_num_pair("Track").1
	}

	fn set_track_total(&mut self, value: u32) {
		self.insert_number_pair("Track", self.track(), Some(value));
	}

	fn remove_track_total(&mut self) {
		let existing_track_number = self.track();
		self.remove("Track");

		if let Some(track) = existing_track_number {
			self.insert(ApeItem::known_text("Track", track.to_string()));
		}
	}

	fn disk(&self) -> Option<u32> {
		self.split_num_pair("Disc").0
	}

	fn set_disk(&mut self, value: u32) {
		self.insert_number_pair("Disc", Some(value), self.disk_total());
	}

	fn remove_disk(&mut self) {
		self.remove("Disc");
	}

	fn disk_total(&self) -> Option<u32> {
		self.split_num_pair("Disc").1
	}

	fn set_disk_total(&mut self, value: u32) {
		self.insert_number_pair("Disc", self.disk(), Some(value));
	}

	fn remove_disk_total(&mut self) {
		let existing_disk_number = self.disk();
		self.remove("Disc");

		if let Some(disk) = existing_disk_number {
			self.insert(ApeItem::known_text("Disc", disk.to_string()));
		}
	}

	// For some reason, the ecosystem agreed on the key "Year", even for full date strings.
	fn year(&self) -> Option<u32> {
		self.get("Year").and_then(ApeItem::as_text).and_then(parse_year)
	}

	fn set_year(&mut self, value: u32) {
		self.insert(ApeItem::known_text("Year", value.to_string()));
	}

	fn remove_year(&mut self) {
		self.remove("Year");
	}

	fn beats_per_minute(&self) -> Option<u32> {
		let text = self.get("BPM").and_then(ApeItem::as_text)?;
		text.trim().parse().ok()
	}

	fn set_beats_per_minute(&mut self, value: u32) {
		self.insert(ApeItem::known_text("BPM", value.to_string()));
	}

	fn remove_beats_per_minute(&mut self) {
		self.remove("BPM");
	}

	fn pictures(&self) -> Option<Vec<Picture>> {
		let pictures = self
			.items
			.iter()
			.filter(|item| Self::is_picture_key(item.key()))
			.filter_map(|item| {
				let data = item.as_binary()?;
				match Picture::from_ape_bytes(item.key(), data) {
					Ok(picture) => Some(picture),
					Err(e) => {
						log::warn!("APE: Unable to read picture '{}': {e}", item.key());
						None
					},
				}
			})
			.collect::<Vec<_>>();

		(!pictures.is_empty()).then_some(pictures)
	}

	fn set_pictures(&mut self, value: Vec<Picture>) {
		self.remove_pictures();

		for picture in value {
			let Some(key) = picture.pic_type().as_ape_key() else {
				log::warn!(
					"APE: Discarding picture with unsupported type {:?}",
					picture.pic_type()
				);
				continue;
			};

			self.insert(ApeItem::unchecked(
				key,
				ApeItemValue::Binary(picture.as_ape_bytes()),
			));
		}
	}

	fn remove_pictures(&mut self) {
		self.items.retain(|item| !Self::is_picture_key(item.key()));
	}
}

impl TagExt for ApeTag {
	#[inline]
	fn tag_type(&self) -> TagType {
		TagType::Ape
	}

	fn len(&self) -> usize {
		self.items.len()
	}

	fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	fn clear(&mut self) {
		self.items.clear();
	}

	/// Render the tag as `[header][items][footer]`
	///
	/// # Errors
	///
	/// * The tag is larger than [`u32::MAX`]
	fn render(&mut self, write_options: WriteOptions) -> Result<Vec<u8>> {
		write::render_ape_tag(self, write_options)
	}

	fn as_any(&self) -> &dyn Any {
		self
	}

	fn as_any_mut(&mut self) -> &mut dyn Any {
		self
	}
}
