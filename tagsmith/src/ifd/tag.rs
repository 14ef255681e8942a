use super::entry::{IfdEntry, IfdEntryType, Rational};
use super::read::IfdReader;
use super::structure::IfdStructure;
use super::tags::{ExifEntryTag, IfdEntryTag};
use super::write::IfdRenderer;
use crate::byte_vector::Endianness;
use crate::config::{ParseOptions, WriteOptions};
use crate::error::Result;
use crate::tag::{Accessor, TagExt, TagType};
use crate::util::text::{TextEncoding, latin1_decode, utf16_decode_bytes};

use std::any::Any;
use std::borrow::Cow;

const USER_COMMENT_ASCII: &[u8; 8] = b"ASCII\0\0\0";
const USER_COMMENT_UNICODE: &[u8; 8] = b"UNICODE\0";
const USER_COMMENT_UNDEFINED: &[u8; 8] = &[0; 8];

macro_rules! impl_ascii_accessor {
	($($name:ident => $tag:expr;)+) => {
		paste::paste! {
			$(
				fn $name(&self) -> Option<Cow<'_, str>> {
					self.structure.get_string(0, $tag).map(Cow::Borrowed)
				}

				fn [<set_ $name>](&mut self, value: String) {
					self.set_ascii(0, $tag, value);
				}

				fn [<remove_ $name>](&mut self) {
					self.structure.remove_entry(0, $tag);
				}
			)+
		}
	}
}

macro_rules! impl_exif_rational_accessor {
	($($name:ident => $tag:expr;)+) => {
		paste::paste! {
			$(
				fn $name(&self) -> Option<f64> {
					self.exif()?.get_rational(0, $tag).map(Rational::value)
				}

				fn [<set_ $name>](&mut self, value: f64) {
					let Some(rational) = Rational::approximate(value) else {
						log::warn!("IFD: {value} cannot be stored as a rational, ignoring");
						return;
					};

					self.with_exif(|exif| {
						exif.set_entry(0, $tag, IfdEntry::Rational(vec![rational]));
					});
				}

				fn [<remove_ $name>](&mut self) {
					self.remove_exif_entry($tag);
				}
			)+
		}
	}
}

/// An Exif/TIFF tag
///
/// This wraps the [`IfdStructure`] of a TIFF stream, as found in TIFF files or a JPEG's APP1
/// segment, along with its byte order. Unlike other tags, the structure is kept exactly as read,
/// so entries without an [`Accessor`] counterpart survive a round trip.
///
/// ## Accessor mapping
///
/// * The title and keywords use the UCS-2 `XPTitle`/`XPKeywords` entries
/// * The comment is Exif's `UserComment`, falling back to `ImageDescription`
/// * The date time is `DateTime`, falling back to Exif's `DateTimeOriginal`
/// * The exposure time, f-number, focal length, and ISO speed live in the Exif IFD, which is
///   created as needed
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IfdTag {
	endianness: Endianness,
	structure: IfdStructure,
}

impl IfdTag {
	/// Create a new empty, big endian `IfdTag`
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::ifd::IfdTag;
	/// use tagsmith::tag::TagExt;
	///
	/// let tag = IfdTag::new();
	/// assert!(tag.is_empty());
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// Parse a TIFF stream, starting at its byte order mark
	///
	/// # Errors
	///
	/// See [`IfdReader::new`] and [`IfdReader::read`]
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::config::{ParseOptions, WriteOptions};
	/// use tagsmith::ifd::IfdTag;
	/// use tagsmith::tag::{Accessor, TagExt};
	///
	/// # fn main() -> tagsmith::error::Result<()> {
	/// let mut tag = IfdTag::new();
	/// tag.set_make(String::from("Canon"));
	/// tag.set_exposure_time(0.008);
	///
	/// let data = tag.render(WriteOptions::default())?;
	///
	/// let parsed = IfdTag::parse(&data, ParseOptions::new())?;
	/// assert_eq!(parsed.make().as_deref(), Some("Canon"));
	/// assert_eq!(parsed.exposure_time(), Some(0.008));
	/// # Ok(()) }
	/// ```
	pub fn parse(data: &[u8], parse_options: ParseOptions) -> Result<Self> {
		let reader = IfdReader::new(data, parse_options)?;
		let endianness = reader.endianness();
		let structure = reader.read()?;

		Ok(Self {
			endianness,
			structure,
		})
	}

	/// The byte order used when rendering
	pub fn endianness(&self) -> Endianness {
		self.endianness
	}

	/// Change the byte order used when rendering
	pub fn set_endianness(&mut self, endianness: Endianness) {
		self.endianness = endianness;
	}

	/// The underlying directory chain
	pub fn structure(&self) -> &IfdStructure {
		&self.structure
	}

	/// A mutable reference to the underlying directory chain
	pub fn structure_mut(&mut self) -> &mut IfdStructure {
		&mut self.structure
	}

	fn exif(&self) -> Option<&IfdStructure> {
		self.structure.get_sub_ifd(0, IfdEntryTag::EXIF_IFD)
	}

	// Runs `f` on the Exif IFD, creating it (or replacing a malformed pointer) first
	fn with_exif(&mut self, f: impl FnOnce(&mut IfdStructure)) {
		let directory = self.structure.directory_mut(0);
		if !matches!(
			directory.get(&IfdEntryTag::EXIF_IFD),
			Some(IfdEntry::SubIfd { .. })
		) {
			directory.insert(
				IfdEntryTag::EXIF_IFD,
				IfdEntry::SubIfd {
					type_code: IfdEntryType::Long as u16,
					structure: IfdStructure::new(),
				},
			);
		}

		if let Some(IfdEntry::SubIfd { structure, .. }) = directory.get_mut(&IfdEntryTag::EXIF_IFD) {
			f(structure);
		}
	}

	// Removes an Exif entry, along with the Exif IFD itself once it is empty
	fn remove_exif_entry(&mut self, tag: u16) {
		let Some(exif) = self.structure.get_sub_ifd_mut(0, IfdEntryTag::EXIF_IFD) else {
			return;
		};

		exif.remove_entry(0, tag);
		if exif.is_empty() {
			self.structure.remove_entry(0, IfdEntryTag::EXIF_IFD);
		}
	}

	fn set_ascii(&mut self, directory: usize, tag: u16, value: String) {
		if value.is_empty() {
			self.structure.remove_entry(directory, tag);
			return;
		}

		self.structure
			.set_entry(directory, tag, IfdEntry::Ascii(value));
	}

	// The XP* entries are null terminated UCS-2 LE, stored as BYTE
	fn xp_string(&self, tag: u16) -> Option<String> {
		let (IfdEntry::Byte(bytes) | IfdEntry::Undefined(bytes)) = self.structure.get_entry(0, tag)?
		else {
			return None;
		};

		utf16_decode_bytes(bytes, u16::from_le_bytes)
			.inspect_err(|e| log::warn!("IFD: Unable to decode XP entry {tag:#06X}: {e}"))
			.ok()
			.filter(|text| !text.is_empty())
	}

	fn set_xp_string(&mut self, tag: u16, value: &str) {
		if value.is_empty() {
			self.structure.remove_entry(0, tag);
			return;
		}

		// Encoding to UTF-16 never fails
		if let Ok(encoded) = TextEncoding::UTF16LE.encode(value, true, false) {
			self.structure.set_entry(0, tag, IfdEntry::Byte(encoded));
		}
	}

	fn user_comment(&self) -> Option<String> {
		let exif = self.exif()?;
		let IfdEntry::Undefined(bytes) = exif.get_entry(0, ExifEntryTag::USER_COMMENT)? else {
			return None;
		};

		if bytes.len() < 8 {
			return None;
		}

		let (charset, text) = bytes.split_at(8);
		let decoded = match charset {
			c if c == USER_COMMENT_UNICODE => {
				let decode_fn = match self.endianness {
					Endianness::Big => u16::from_be_bytes,
					Endianness::Little => u16::from_le_bytes,
				};

				utf16_decode_bytes(text, decode_fn)
					.inspect_err(|e| log::warn!("IFD: Unable to decode UNICODE user comment: {e}"))
					.ok()?
			},
			c if c == USER_COMMENT_ASCII || c == USER_COMMENT_UNDEFINED => {
				match std::str::from_utf8(text) {
					Ok(text) => text.to_owned(),
					Err(_) => latin1_decode(text),
				}
			},
			_ => {
				log::debug!("IFD: Unsupported user comment character code, reading as Latin-1");
				latin1_decode(text)
			},
		};

		let trimmed = decoded.trim_end_matches(['\0', ' ']);
		if trimmed.is_empty() {
			return None;
		}

		Some(trimmed.to_owned())
	}
}

impl Accessor for IfdTag {
	impl_ascii_accessor!(
		copyright => IfdEntryTag::COPYRIGHT;
		creator   => IfdEntryTag::ARTIST;
		software  => IfdEntryTag::SOFTWARE;
		make      => IfdEntryTag::MAKE;
		model     => IfdEntryTag::MODEL;
	);

	impl_exif_rational_accessor!(
		exposure_time => ExifEntryTag::EXPOSURE_TIME;
		f_number      => ExifEntryTag::F_NUMBER;
		focal_length  => ExifEntryTag::FOCAL_LENGTH;
	);

	fn title(&self) -> Option<Cow<'_, str>> {
		self.xp_string(IfdEntryTag::XP_TITLE).map(Cow::Owned)
	}

	fn set_title(&mut self, value: String) {
		self.set_xp_string(IfdEntryTag::XP_TITLE, &value);
	}

	fn remove_title(&mut self) {
		self.structure.remove_entry(0, IfdEntryTag::XP_TITLE);
	}

	fn comment(&self) -> Option<Cow<'_, str>> {
		if let Some(comment) = self.user_comment() {
			return Some(Cow::Owned(comment));
		}

		self.structure
			.get_string(0, IfdEntryTag::IMAGE_DESCRIPTION)
			.filter(|description| !description.trim().is_empty())
			.map(Cow::Borrowed)
	}

	fn set_comment(&mut self, value: String) {
		if value.is_empty() {
			self.remove_comment();
			return;
		}

		let mut encoded = Vec::new();
		if value.is_ascii() {
			encoded.extend_from_slice(USER_COMMENT_ASCII);
			encoded.extend_from_slice(value.as_bytes());
		} else {
			let encoding = match self.endianness {
				Endianness::Big => TextEncoding::UTF16BE,
				Endianness::Little => TextEncoding::UTF16LE,
			};

			encoded.extend_from_slice(USER_COMMENT_UNICODE);
			if let Ok(text) = encoding.encode(&value, false, false) {
				encoded.extend(text);
			}
		}

		self.with_exif(|exif| {
			exif.set_entry(0, ExifEntryTag::USER_COMMENT, IfdEntry::Undefined(encoded));
		});
	}

	fn remove_comment(&mut self) {
		self.remove_exif_entry(ExifEntryTag::USER_COMMENT);
		self.structure.remove_entry(0, IfdEntryTag::IMAGE_DESCRIPTION);
	}

	fn date_time(&self) -> Option<Cow<'_, str>> {
		if let Some(date_time) = self.structure.get_string(0, IfdEntryTag::DATE_TIME) {
			return Some(Cow::Borrowed(date_time));
		}

		self.exif()?
			.get_string(0, ExifEntryTag::DATE_TIME_ORIGINAL)
			.map(Cow::Borrowed)
	}

	fn set_date_time(&mut self, value: String) {
		if value.is_empty() {
			self.remove_date_time();
			return;
		}

		self.with_exif(|exif| {
			exif.set_entry(
				0,
				ExifEntryTag::DATE_TIME_ORIGINAL,
				IfdEntry::Ascii(value.clone()),
			);
		});
		self.set_ascii(0, IfdEntryTag::DATE_TIME, value);
	}

	fn remove_date_time(&mut self) {
		self.structure.remove_entry(0, IfdEntryTag::DATE_TIME);
		self.remove_exif_entry(ExifEntryTag::DATE_TIME_ORIGINAL);
	}

	fn keywords(&self) -> Option<Vec<String>> {
		let keywords = self
			.xp_string(IfdEntryTag::XP_KEYWORDS)?
			.split(';')
			.map(str::trim)
			.filter(|keyword| !keyword.is_empty())
			.map(String::from)
			.collect::<Vec<_>>();

		if keywords.is_empty() {
			return None;
		}

		Some(keywords)
	}

	fn set_keywords(&mut self, value: Vec<String>) {
		self.set_xp_string(IfdEntryTag::XP_KEYWORDS, &value.join(";"));
	}

	fn remove_keywords(&mut self) {
		self.structure.remove_entry(0, IfdEntryTag::XP_KEYWORDS);
	}

	fn orientation(&self) -> Option<u16> {
		self.structure
			.get_u32(0, IfdEntryTag::ORIENTATION)
			.and_then(|orientation| u16::try_from(orientation).ok())
	}

	fn set_orientation(&mut self, value: u16) {
		self.structure
			.set_entry(0, IfdEntryTag::ORIENTATION, IfdEntry::Short(vec![value]));
	}

	fn remove_orientation(&mut self) {
		self.structure.remove_entry(0, IfdEntryTag::ORIENTATION);
	}

	fn rating(&self) -> Option<u32> {
		self.structure.get_u32(0, IfdEntryTag::RATING)
	}

	fn set_rating(&mut self, value: u32) {
		let rating = u16::try_from(value).unwrap_or(u16::MAX);
		self.structure
			.set_entry(0, IfdEntryTag::RATING, IfdEntry::Short(vec![rating]));
	}

	fn remove_rating(&mut self) {
		self.structure.remove_entry(0, IfdEntryTag::RATING);
	}

	fn iso_speed(&self) -> Option<u32> {
		self.exif()?.get_u32(0, ExifEntryTag::ISO_SPEED_RATINGS)
	}

	fn set_iso_speed(&mut self, value: u32) {
		let entry = match u16::try_from(value) {
			Ok(short) => IfdEntry::Short(vec![short]),
			Err(_) => IfdEntry::Long(vec![value]),
		};

		self.with_exif(|exif| {
			exif.set_entry(0, ExifEntryTag::ISO_SPEED_RATINGS, entry);
		});
	}

	fn remove_iso_speed(&mut self) {
		self.remove_exif_entry(ExifEntryTag::ISO_SPEED_RATINGS);
	}
}

impl TagExt for IfdTag {
	#[inline]
	fn tag_type(&self) -> TagType {
		TagType::TiffIfd
	}

	/// The number of entries across every directory of the main chain
	fn len(&self) -> usize {
		(0..self.structure.directory_count())
			.map(|directory| self.structure.entries(directory).count())
			.sum()
	}

	fn is_empty(&self) -> bool {
		self.structure.is_empty()
	}

	fn clear(&mut self) {
		self.structure = IfdStructure::new();
	}

	/// Render the tag as a TIFF stream, in [`IfdTag::endianness`]
	///
	/// # Errors
	///
	/// See [`IfdRenderer::render`]
	fn render(&mut self, _write_options: WriteOptions) -> Result<Vec<u8>> {
		if self.structure.is_empty() {
			return Ok(Vec::new());
		}

		IfdRenderer::new(self.endianness).render(&self.structure)
	}

	fn as_any(&self) -> &dyn Any {
		self
	}

	fn as_any_mut(&mut self) -> &mut dyn Any {
		self
	}
}

#[cfg(test)]
mod tests {
	use crate::byte_vector::Endianness;
	use crate::config::{ParseOptions, WriteOptions};
	use crate::ifd::{ExifEntryTag, IfdEntry, IfdEntryTag, IfdTag};
	use crate::tag::{Accessor, TagExt, TagType};

	fn test_tag() -> IfdTag {
		let mut tag = IfdTag::new();
		tag.set_title(String::from("Foo title"));
		tag.set_comment(String::from("A comment"));
		tag.set_make(String::from("Canon"));
		tag.set_model(String::from("Canon EOS 5D"));
		tag.set_date_time(String::from("2024:01:02 03:04:05"));
		tag.set_orientation(6);
		tag.set_keywords(vec![String::from("sky"), String::from("sea")]);
		tag.set_exposure_time(0.008);
		tag.set_f_number(2.8);
		tag.set_focal_length(50.0);
		tag.set_iso_speed(400);
		tag
	}

	#[test_log::test]
	fn accessors() {
		let tag = test_tag();

		assert_eq!(tag.title().as_deref(), Some("Foo title"));
		assert_eq!(tag.comment().as_deref(), Some("A comment"));
		assert_eq!(tag.make().as_deref(), Some("Canon"));
		assert_eq!(tag.model().as_deref(), Some("Canon EOS 5D"));
		assert_eq!(tag.date_time().as_deref(), Some("2024:01:02 03:04:05"));
		assert_eq!(tag.orientation(), Some(6));
		assert_eq!(
			tag.keywords(),
			Some(vec![String::from("sky"), String::from("sea")])
		);
		assert_eq!(tag.exposure_time(), Some(0.008));
		assert_eq!(tag.f_number(), Some(2.8));
		assert_eq!(tag.focal_length(), Some(50.0));
		assert_eq!(tag.iso_speed(), Some(400));
		assert_eq!(tag.album(), None);
	}

	#[test_log::test]
	fn parse_rendered() {
		for endianness in [Endianness::Big, Endianness::Little] {
			let mut tag = test_tag();
			tag.set_endianness(endianness);
			tag.set_comment(String::from("Ünïcödé comment"));

			let rendered = tag.render(WriteOptions::default()).unwrap();
			let parsed = IfdTag::parse(&rendered, ParseOptions::new()).unwrap();

			assert_eq!(parsed.endianness(), endianness);
			assert_eq!(parsed, tag);
			assert_eq!(parsed.comment().as_deref(), Some("Ünïcödé comment"));
		}
	}

	#[test_log::test]
	fn exif_ifd_created_and_removed() {
		let mut tag = IfdTag::new();
		assert!(tag.structure().get_sub_ifd(0, IfdEntryTag::EXIF_IFD).is_none());

		tag.set_iso_speed(100);
		tag.set_f_number(4.0);
		let exif = tag.structure().get_sub_ifd(0, IfdEntryTag::EXIF_IFD).unwrap();
		assert_eq!(exif.get_u32(0, ExifEntryTag::ISO_SPEED_RATINGS), Some(100));

		tag.remove_iso_speed();
		assert!(!tag.is_empty());

		tag.remove_f_number();
		assert!(tag.is_empty());
	}

	#[test_log::test]
	fn malformed_exif_pointer_replaced() {
		let mut tag = IfdTag::new();
		tag.structure_mut()
			.set_entry(0, IfdEntryTag::EXIF_IFD, IfdEntry::Ascii(String::from("junk")));
		assert_eq!(tag.exposure_time(), None);

		tag.set_exposure_time(0.5);
		assert_eq!(tag.exposure_time(), Some(0.5));
	}

	#[test_log::test]
	fn comment_falls_back_to_image_description() {
		let mut tag = IfdTag::new();
		tag.structure_mut().set_entry(
			0,
			IfdEntryTag::IMAGE_DESCRIPTION,
			IfdEntry::Ascii(String::from("Description")),
		);
		assert_eq!(tag.comment().as_deref(), Some("Description"));

		// An all blank user comment is ignored
		tag.with_exif(|exif| {
			exif.set_entry(
				0,
				ExifEntryTag::USER_COMMENT,
				IfdEntry::Undefined(b"\0\0\0\0\0\0\0\0        ".to_vec()),
			);
		});
		assert_eq!(tag.comment().as_deref(), Some("Description"));

		tag.set_comment(String::from("User comment"));
		assert_eq!(tag.comment().as_deref(), Some("User comment"));

		tag.remove_comment();
		assert_eq!(tag.comment(), None);
		assert!(tag.is_empty());
	}

	#[test_log::test]
	fn date_time_falls_back_to_original() {
		let mut tag = IfdTag::new();
		tag.set_date_time(String::from("2020:05:06 07:08:09"));
		tag.structure_mut().remove_entry(0, IfdEntryTag::DATE_TIME);

		assert_eq!(tag.date_time().as_deref(), Some("2020:05:06 07:08:09"));

		tag.remove_date_time();
		assert_eq!(tag.date_time(), None);
	}

	#[test_log::test]
	fn unrepresentable_rational() {
		let mut tag = IfdTag::new();
		tag.set_exposure_time(-1.0);
		tag.set_f_number(f64::NAN);
		assert!(tag.is_empty());
	}

	#[test_log::test]
	fn empty_values_remove() {
		let mut tag = IfdTag::new();
		tag.set_make(String::from("Canon"));
		tag.set_title(String::from("Title"));
		assert_eq!(tag.len(), 2);

		tag.set_make(String::new());
		tag.set_title(String::new());
		assert!(tag.is_empty());
		assert_eq!(tag.render(WriteOptions::default()).unwrap(), Vec::<u8>::new());
	}

	#[test_log::test]
	fn unknown_entries_survive() {
		let mut tag = IfdTag::new();
		tag.set_software(String::from("tagsmith"));
		tag.structure_mut().set_entry(
			0,
			0xBEEF,
			IfdEntry::Opaque {
				type_code: 0x55,
				count: 2,
				data: vec![9, 8, 7, 6],
			},
		);

		let rendered = tag.render(WriteOptions::default()).unwrap();
		let parsed = IfdTag::parse(&rendered, ParseOptions::new()).unwrap();
		assert_eq!(parsed.tag_type(), TagType::TiffIfd);
		assert_eq!(parsed.software().as_deref(), Some("tagsmith"));
		assert_eq!(parsed.structure().get_entry(0, 0xBEEF), tag.structure().get_entry(0, 0xBEEF));
	}
}
