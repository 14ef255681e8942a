use crate::ape::constants::{APE_ITEM_MIN_SIZE, INVALID_KEYS};
use crate::byte_vector::{ByteSlice, ByteVector, Endianness};
use crate::error::Result;
use crate::macros::{decode_err, err, range_err};
use crate::util::text::TextEncoding;

use std::fmt::{Display, Formatter};

const FLAG_READ_ONLY: u32 = 1;

/// The type of an [`ApeItem`], stored in bits 1-2 of the item flags
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ApeItemType {
	/// One or more UTF-8 strings
	Text = 0,
	/// Arbitrary binary data, such as cover art
	Binary = 1,
	/// One or more UTF-8 locators (URLs, file paths)
	Locator = 2,
}

impl ApeItemType {
	fn from_flags(flags: u32) -> Option<Self> {
		match (flags >> 1) & 3 {
			0 => Some(Self::Text),
			1 => Some(Self::Binary),
			2 => Some(Self::Locator),
			_ => None,
		}
	}

	fn as_flags(self) -> u32 {
		(self as u32) << 1
	}
}

/// The payload of an [`ApeItem`]
///
/// The item type is derived from the variant, so a binary item can never carry text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ApeItemValue {
	/// Text strings, rendered separated by NUL bytes
	Text(Vec<String>),
	/// Raw bytes
	Binary(Vec<u8>),
	/// Locator strings, rendered separated by NUL bytes
	Locator(Vec<String>),
}

impl ApeItemValue {
	/// The [`ApeItemType`] this value is stored as
	pub fn item_type(&self) -> ApeItemType {
		match self {
			Self::Text(_) => ApeItemType::Text,
			Self::Binary(_) => ApeItemType::Binary,
			Self::Locator(_) => ApeItemType::Locator,
		}
	}

	/// Whether there is anything to render
	pub fn is_empty(&self) -> bool {
		match self {
			// A lone empty string has no payload on disk
			Self::Text(strings) | Self::Locator(strings) => match strings.as_slice() {
				[] => true,
				[only] => only.is_empty(),
				_ => false,
			},
			Self::Binary(data) => data.is_empty(),
		}
	}
}

/// Represents an `APE` tag item
///
/// An item keeps track of the number of bytes it occupies on disk, see [`ApeItem::size_on_disk`].
/// Cloning an item is a deep copy.
#[derive(Clone, Debug)]
pub struct ApeItem {
	key: String,
	value: ApeItemValue,
	read_only: bool,
	size_on_disk: usize,
}

impl PartialEq for ApeItem {
	fn eq(&self, other: &Self) -> bool {
		self.read_only == other.read_only
			&& self.key == other.key
			&& self.value == other.value
	}
}

impl Eq for ApeItem {}

impl ApeItem {
	/// Create an [`ApeItem`]
	///
	/// # Errors
	///
	/// * `key` is illegal ("ID3", "TAG", "OGGS", "MP+")
	/// * `key` has a bad length (must be 2 to 255, inclusive)
	/// * `key` contains characters outside of printable ASCII
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::ape::{ApeItem, ApeItemValue};
	///
	/// # fn main() -> tagsmith::error::Result<()> {
	/// let item = ApeItem::new("Artist", ApeItemValue::Text(vec![String::from("Foo")]))?;
	/// assert_eq!(item.as_text(), Some("Foo"));
	///
	/// assert!(ApeItem::new("TAG", ApeItemValue::Binary(Vec::new())).is_err());
	/// # Ok(()) }
	/// ```
	pub fn new(key: impl Into<String>, value: ApeItemValue) -> Result<Self> {
		let key = key.into();
		verify_key(&key)?;

		Ok(Self {
			key,
			value,
			read_only: false,
			size_on_disk: 0,
		})
	}

	/// Create a text item holding a single string
	///
	/// # Errors
	///
	/// See [`ApeItem::new`]
	pub fn text(key: impl Into<String>, value: impl Into<String>) -> Result<Self> {
		Self::new(key, ApeItemValue::Text(vec![value.into()]))
	}

	/// Create a text item holding multiple strings
	///
	/// # Errors
	///
	/// See [`ApeItem::new`]
	pub fn texts(key: impl Into<String>, values: Vec<String>) -> Result<Self> {
		Self::new(key, ApeItemValue::Text(values))
	}

	/// Create a binary item
	///
	/// # Errors
	///
	/// See [`ApeItem::new`]
	pub fn binary(key: impl Into<String>, data: Vec<u8>) -> Result<Self> {
		Self::new(key, ApeItemValue::Binary(data))
	}

	/// Create a locator item
	///
	/// # Errors
	///
	/// See [`ApeItem::new`]
	pub fn locator(key: impl Into<String>, locator: impl Into<String>) -> Result<Self> {
		Self::new(key, ApeItemValue::Locator(vec![locator.into()]))
	}

	// Keys known to be valid, used by the accessors
	pub(crate) fn known_text(key: &'static str, value: impl Into<String>) -> Self {
		Self {
			key: String::from(key),
			value: ApeItemValue::Text(vec![value.into()]),
			read_only: false,
			size_on_disk: 0,
		}
	}

	pub(crate) fn unchecked(key: &'static str, value: ApeItemValue) -> Self {
		Self {
			key: String::from(key),
			value,
			read_only: false,
			size_on_disk: 0,
		}
	}

	/// Parse a single item starting at `offset`
	///
	/// The item layout is:
	///
	/// ```text
	/// [u32 LE value length][u32 LE flags][key][0x00][value]
	/// ```
	///
	/// NOTE: The key is only required to be UTF-8 here, use [`ApeItem::verify_key`] to check it
	/// against the full key rules.
	///
	/// # Errors
	///
	/// * `offset` is past the end of `data` ([`OutOfRange`](crate::error::ErrorKind::OutOfRange))
	/// * Fewer than 11 bytes are available from `offset`
	/// * The key has no terminator, or is not UTF-8
	/// * The value length exceeds the remaining data
	///
	/// A reserved item type is read as text, and text that is not UTF-8 is decoded lossily, as the
	/// extent of the item is known at that point.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::ape::{ApeItem, ApeItemType};
	///
	/// # fn main() -> tagsmith::error::Result<()> {
	/// let mut data = Vec::new();
	/// data.extend(3_u32.to_le_bytes());
	/// data.extend(0_u32.to_le_bytes());
	/// data.extend(b"TEST\0A\0B");
	///
	/// let item = ApeItem::parse(&data, 0)?;
	/// assert_eq!(item.key(), "TEST");
	/// assert_eq!(item.item_type(), ApeItemType::Text);
	/// assert_eq!(item.as_texts(), Some(&[String::from("A"), String::from("B")][..]));
	/// assert_eq!(item.size_on_disk(), data.len());
	/// # Ok(()) }
	/// ```
	pub fn parse(data: &[u8], offset: usize) -> Result<Self> {
		let Some(available) = data.len().checked_sub(offset) else {
			return Err(range_err!(offset, 0, data.len()));
		};

		if available < APE_ITEM_MIN_SIZE {
			decode_err!(@BAIL Ape, "Not enough data for APE item");
		}

		let value_length = data.read_u32(offset, Endianness::Little)? as usize;
		let flags = data.read_u32(offset + 4, Endianness::Little)?;

		let Some(terminator) = data.find(&[0], offset + 8) else {
			decode_err!(@BAIL Ape, "APE item key is missing its terminator");
		};

		let Ok(key) = std::str::from_utf8(&data[offset + 8..terminator]) else {
			decode_err!(@BAIL Ape, "APE item contains a non UTF-8 key");
		};

		let value_start = terminator + 1;
		if value_length > data.len() - value_start {
			decode_err!(@BAIL Ape, "Invalid data length");
		}

		// The reserved type 3 is read as text
		let item_type = ApeItemType::from_flags(flags).unwrap_or_else(|| {
			log::warn!("APE: Item '{key}' has a reserved item type, reading it as text");
			ApeItemType::Text
		});

		let raw_value = &data[value_start..value_start + value_length];
		let value = match item_type {
			ApeItemType::Binary => ApeItemValue::Binary(raw_value.to_vec()),
			ApeItemType::Text | ApeItemType::Locator => {
				let strings = match raw_value.split_text(TextEncoding::UTF8) {
					Ok(strings) => strings,
					Err(_) => {
						log::warn!("APE: Item '{key}' is not valid UTF-8, decoding lossily");
						raw_value
							.split(|b| *b == 0)
							.map(|string| String::from_utf8_lossy(string).into_owned())
							.collect()
					},
				};

				if item_type == ApeItemType::Text {
					ApeItemValue::Text(strings)
				} else {
					ApeItemValue::Locator(strings)
				}
			},
		};

		Ok(Self {
			key: key.to_owned(),
			value,
			read_only: flags & FLAG_READ_ONLY == FLAG_READ_ONLY,
			size_on_disk: value_start + value_length - offset,
		})
	}

	/// Render the item, updating [`ApeItem::size_on_disk`]
	///
	/// An item with no payload (including text made up of a single empty string) renders to
	/// nothing, and should be omitted by the caller.
	///
	/// # Errors
	///
	/// The value is larger than [`u32::MAX`]
	pub fn render(&mut self) -> Result<Vec<u8>> {

		let mut payload = ByteVector::new();
		match &self.value {
			ApeItemValue::Binary(data) => payload.push_bytes(data),
			ApeItemValue::Text(strings) | ApeItemValue::Locator(strings) => {
				for (i, string) in strings.iter().enumerate() {
					if i > 0 {
						payload.push_delimiter(TextEncoding::UTF8);
					}

					payload.push_text(string, TextEncoding::UTF8)?;
				}
			},
		}

		if payload.is_empty() {
			self.size_on_disk = 0;
			return Ok(Vec::new());
		}

		let Ok(value_length) = u32::try_from(payload.len()) else {
			err!(TooMuchData);
		};

		let mut flags = self.value.item_type().as_flags();
		if self.read_only {
			flags |= FLAG_READ_ONLY;
		}

		let mut out = ByteVector::with_capacity(8 + self.key.len() + 1 + payload.len())?;
		out.push_u32(value_length, Endianness::Little);
		out.push_u32(flags, Endianness::Little);
		out.push_text(&self.key, TextEncoding::UTF8)?;
		out.push_delimiter(TextEncoding::UTF8);
		out.push_bytes(&payload);

		self.size_on_disk = out.len();
		Ok(out.into_inner())
	}

	/// Check `key` against the APE key rules
	///
	/// # Errors
	///
	/// See [`ApeItem::new`]
	pub fn verify_key(key: &str) -> Result<()> {
		verify_key(key)
	}

	/// Returns the item key
	pub fn key(&self) -> &str {
		&self.key
	}

	/// Returns the item type
	pub fn item_type(&self) -> ApeItemType {
		self.value.item_type()
	}

	/// Returns the item value
	pub fn value(&self) -> &ApeItemValue {
		&self.value
	}

	/// Replace the item value, the item type follows the new value
	pub fn set_value(&mut self, value: ApeItemValue) {
		self.value = value;
	}

	/// Whether the item is marked read only
	pub fn read_only(&self) -> bool {
		self.read_only
	}

	/// Mark the item as read only (or not)
	pub fn set_read_only(&mut self, read_only: bool) {
		self.read_only = read_only;
	}

	/// The number of bytes the item occupied when it was last parsed or rendered
	///
	/// This is `0` for items that were never parsed or rendered.
	pub fn size_on_disk(&self) -> usize {
		self.size_on_disk
	}

	/// Whether the item has no payload
	pub fn is_empty(&self) -> bool {
		self.value.is_empty()
	}

	/// The first string of a text item
	pub fn as_text(&self) -> Option<&str> {
		match &self.value {
			ApeItemValue::Text(strings) => strings.first().map(String::as_str),
			_ => None,
		}
	}

	/// All strings of a text item
	pub fn as_texts(&self) -> Option<&[String]> {
		match &self.value {
			ApeItemValue::Text(strings) => Some(strings),
			_ => None,
		}
	}

	/// The data of a binary item
	pub fn as_binary(&self) -> Option<&[u8]> {
		match &self.value {
			ApeItemValue::Binary(data) => Some(data),
			_ => None,
		}
	}
}

impl Display for ApeItem {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match &self.value {
			ApeItemValue::Text(strings) | ApeItemValue::Locator(strings) => {
				write!(f, "{}", strings.join(", "))
			},
			ApeItemValue::Binary(data) => write!(f, "<{} bytes>", data.len()),
		}
	}
}

fn verify_key(key: &str) -> Result<()> {
	if !(2..=255).contains(&key.len()) {
		err!(InvalidArgument("APE item key has an invalid length (must be 2..=255)"));
	}

	if INVALID_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key)) {
		err!(InvalidArgument("APE item key is illegal (ID3, TAG, OGGS, MP+)"));
	}

	if !key.bytes().all(|b| (0x20..=0x7E).contains(&b)) {
		err!(InvalidArgument("APE item key contains characters outside of printable ASCII"));
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::{ApeItem, ApeItemType, ApeItemValue};
	use crate::error::ErrorKind;

	fn raw_item(flags: u32, key: &[u8], value: &[u8]) -> Vec<u8> {
		let mut data = Vec::new();
		data.extend((value.len() as u32).to_le_bytes());
		data.extend(flags.to_le_bytes());
		data.extend(key);
		data.push(0);
		data.extend(value);
		data
	}

	#[test_log::test]
	fn parse_multi_string_text() {
		let data = raw_item(0, b"TEST", b"A\0B");

		let mut item = ApeItem::parse(&data, 0).unwrap();
		assert_eq!(item.key(), "TEST");
		assert_eq!(item.item_type(), ApeItemType::Text);
		assert_eq!(
			item.value(),
			&ApeItemValue::Text(vec![String::from("A"), String::from("B")])
		);
		assert_eq!(item.size_on_disk(), data.len());

		assert_eq!(item.render().unwrap(), data);
		assert_eq!(item.size_on_disk(), data.len());
	}

	#[test_log::test]
	fn parse_at_offset() {
		let mut data = vec![0xAA; 5];
		data.extend(raw_item(1 | (1 << 1), b"Cover", &[1, 2, 3]));

		let item = ApeItem::parse(&data, 5).unwrap();
		assert!(item.read_only());
		assert_eq!(item.item_type(), ApeItemType::Binary);
		assert_eq!(item.as_binary(), Some(&[1, 2, 3][..]));
		assert_eq!(item.size_on_disk(), data.len() - 5);
	}

	#[test_log::test]
	fn parse_locator() {
		let data = raw_item(2 << 1, b"Related", b"http://example.com");

		let item = ApeItem::parse(&data, 0).unwrap();
		assert_eq!(item.item_type(), ApeItemType::Locator);
		assert_eq!(item.to_string(), "http://example.com");
		assert_eq!(item.as_text(), None);
	}

	#[test_log::test]
	fn zero_length_value_yields_no_strings() {
		let data = raw_item(0, b"Empty", b"");

		let mut item = ApeItem::parse(&data, 0).unwrap();
		assert!(item.is_empty());
		assert_eq!(item.size_on_disk(), 14);

		// Empty items are omitted when rendering
		assert!(item.render().unwrap().is_empty());
		assert_eq!(item.size_on_disk(), 0);
	}

	#[test_log::test]
	fn too_short() {
		for len in 0..11 {
			let data = vec![0; len];
			let err = ApeItem::parse(&data, 0).unwrap_err();
			assert!(matches!(err.kind(), ErrorKind::CorruptData(_)), "{len}");
		}

		let data = raw_item(0, b"TEST", b"A");
		let err = ApeItem::parse(&data, data.len() - 10).unwrap_err();
		assert!(matches!(err.kind(), ErrorKind::CorruptData(_)));

		let err = ApeItem::parse(&data, data.len() + 1).unwrap_err();
		assert!(matches!(err.kind(), ErrorKind::OutOfRange { .. }));
	}

	#[test_log::test]
	fn corrupt_items() {
		// Missing terminator
		let mut data = Vec::new();
		data.extend(1_u32.to_le_bytes());
		data.extend(0_u32.to_le_bytes());
		data.extend(b"NOTERMINATOR");
		assert!(matches!(
			ApeItem::parse(&data, 0).unwrap_err().kind(),
			ErrorKind::CorruptData(_)
		));

		// Value length too large
		let mut data = raw_item(0, b"TEST", b"ABC");
		data[0] = 4;
		let err = ApeItem::parse(&data, 0).unwrap_err();
		match err.kind() {
			ErrorKind::CorruptData(e) => assert_eq!(e.description(), "Invalid data length"),
			_ => panic!("Expected CorruptData, got {err:?}"),
		}

	}

	#[test_log::test]
	fn reserved_type_and_bad_text_are_recovered() {
		let data = raw_item(3 << 1, b"TEST", b"ABC");
		let item = ApeItem::parse(&data, 0).unwrap();
		assert_eq!(item.item_type(), ApeItemType::Text);
		assert_eq!(item.as_text(), Some("ABC"));
		assert_eq!(item.size_on_disk(), data.len());

		let data = raw_item(0, b"TEST", &[0xC3, 0x28, 0, b'O', b'K']);
		let item = ApeItem::parse(&data, 0).unwrap();
		assert_eq!(
			item.as_texts(),
			Some(&[String::from("\u{FFFD}("), String::from("OK")][..])
		);
		assert_eq!(item.size_on_disk(), data.len());
	}

	#[test_log::test]
	fn empty_string_renders_nothing() {
		let mut item = ApeItem::new("Title", ApeItemValue::Text(vec![String::new()])).unwrap();
		assert!(item.is_empty());
		assert!(item.render().unwrap().is_empty());
		assert_eq!(item.size_on_disk(), 0);

		let mut item = ApeItem::new("Related", ApeItemValue::Locator(vec![String::new()])).unwrap();
		assert!(item.render().unwrap().is_empty());
	}

	#[test_log::test]
	fn render_round_trip() {
		let mut item = ApeItem::texts(
			"Artist",
			vec![String::from("Foo"), String::from("Bar"), String::from("Baz")],
		)
		.unwrap();
		item.set_read_only(true);
		assert_eq!(item.size_on_disk(), 0);

		let rendered = item.render().unwrap();
		assert_eq!(&rendered[15..], b"Foo\0Bar\0Baz");
		assert_eq!(item.size_on_disk(), rendered.len());

		let parsed = ApeItem::parse(&rendered, 0).unwrap();
		assert_eq!(parsed, item);
		assert!(parsed.read_only());
		assert_eq!(parsed.to_string(), "Foo, Bar, Baz");
	}

	#[test_log::test]
	fn clone_is_deep() {
		let original = ApeItem::binary("Cover Art (Front)", vec![1, 2, 3]).unwrap();

		let mut clone = original.clone();
		clone.set_value(ApeItemValue::Binary(vec![4]));
		clone.set_read_only(true);

		assert_eq!(original.as_binary(), Some(&[1, 2, 3][..]));
		assert!(!original.read_only());
		assert_ne!(original, clone);
	}

	#[test_log::test]
	fn key_rules() {
		assert!(ApeItem::locator("A", "x").is_err());
		assert!(ApeItem::locator("a".repeat(256), "x").is_err());
		assert!(ApeItem::locator("oggs", "x").is_err());
		assert!(ApeItem::locator("Tab\tKey", "x").is_err());
		assert!(ApeItem::locator("Ключ", "x").is_err());
		assert!(ApeItem::locator("Related URL", "x").is_ok());
	}
}
