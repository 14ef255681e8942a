use crate::error::{ErrorKind, Result, TagsmithError};
use crate::macros::err;

/// Errors that can occur while encoding text
#[derive(Copy, Clone, Debug)]
pub struct TextEncodingError {
	encoding: TextEncoding,
	valid_up_to: usize,
}

impl TextEncodingError {
	/// The target text encoding
	pub fn encoding(&self) -> TextEncoding {
		self.encoding
	}

	/// The byte index in the provided string up to which the encoding was valid
	pub fn valid_up_to(&self) -> usize {
		self.valid_up_to
	}
}

impl core::fmt::Display for TextEncodingError {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		let encoding = match self.encoding {
			TextEncoding::Latin1 => "Latin-1",
			TextEncoding::UTF16 => "UTF-16",
			TextEncoding::UTF16BE => "UTF-16 BE",
			TextEncoding::UTF16LE => "UTF-16 LE",
			TextEncoding::UTF8 => "UTF-8",
		};

		write!(
			f,
			"invalid {encoding} sequence from index {}",
			self.valid_up_to
		)
	}
}

impl core::error::Error for TextEncodingError {}

/// The character encodings understood by [`ByteSlice`](crate::byte_vector::ByteSlice)
#[derive(Debug, Clone, Eq, PartialEq, Copy, Hash)]
#[non_exhaustive]
pub enum TextEncoding {
	/// ISO-8859-1
	Latin1,
	/// UTF-16 with a byte order mark
	///
	/// Encoding always produces little endian output.
	UTF16,
	/// UTF-16 big endian, no byte order mark
	UTF16BE,
	/// UTF-16 little endian, no byte order mark
	UTF16LE,
	/// UTF-8
	UTF8,
}

impl TextEncoding {
	/// The delimiter used to separate strings in this encoding
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::TextEncoding;
	///
	/// assert_eq!(TextEncoding::UTF8.delimiter(), &[0]);
	/// assert_eq!(TextEncoding::UTF16LE.delimiter(), &[0, 0]);
	/// ```
	pub fn delimiter(self) -> &'static [u8] {
		match self {
			Self::Latin1 | Self::UTF8 => &[0],
			Self::UTF16 | Self::UTF16BE | Self::UTF16LE => &[0, 0],
		}
	}

	/// The size of a single code unit, delimiters are only matched on multiples of this
	pub fn code_unit_size(self) -> usize {
		self.delimiter().len()
	}

	/// Encode `text`, optionally followed by the encoding's delimiter
	///
	/// With `lossy`, characters outside of Latin-1 are replaced with `?` rather than failing.
	///
	/// # Errors
	///
	/// Only [`TextEncoding::Latin1`] can fail, when `text` has characters above U+00FF and `lossy` is off.
	pub fn encode(
		self,
		text: &str,
		terminated: bool,
		lossy: bool,
	) -> std::result::Result<Vec<u8>, TextEncodingError> {
		let mut out = match self {
			TextEncoding::Latin1 => {
				latin1_encode(text, lossy).collect::<std::result::Result<Vec<u8>, _>>()?
			},
			TextEncoding::UTF16 => utf16_encode(text, u16::to_le_bytes, true),
			TextEncoding::UTF16BE => utf16_encode(text, u16::to_be_bytes, false),
			TextEncoding::UTF16LE => utf16_encode(text, u16::to_le_bytes, false),
			TextEncoding::UTF8 => text.as_bytes().to_vec(),
		};

		if terminated {
			out.extend_from_slice(self.delimiter());
		}

		Ok(out)
	}

	/// Decode `bytes`, trimming any trailing nulls
	///
	/// The input is never assumed to be null terminated, the caller provides the exact bounds.
	///
	/// # Errors
	///
	/// * The bytes are not valid in this encoding
	/// * [`TextEncoding::UTF16`] is missing its byte order mark
	pub fn decode(self, bytes: &[u8]) -> Result<String> {
		if bytes.is_empty() {
			return Ok(String::new());
		}

		match self {
			TextEncoding::Latin1 => Ok(latin1_decode(bytes)),
			TextEncoding::UTF16 => {
				if bytes.len() < 2 {
					err!(TextDecode("UTF-16 string has an invalid length (< 2)"));
				}

				match [bytes[0], bytes[1]] {
					[0xFE, 0xFF] => utf16_decode_bytes(&bytes[2..], u16::from_be_bytes),
					[0xFF, 0xFE] => utf16_decode_bytes(&bytes[2..], u16::from_le_bytes),
					_ => err!(TextDecode("UTF-16 string has an invalid byte order mark")),
				}
			},
			TextEncoding::UTF16BE => utf16_decode_bytes(bytes, u16::from_be_bytes),
			TextEncoding::UTF16LE => utf16_decode_bytes(bytes, u16::from_le_bytes),
			TextEncoding::UTF8 => utf8_decode(bytes.to_vec())
				.map_err(|_| TagsmithError::new(ErrorKind::TextDecode("Expected a UTF-8 string"))),
		}
	}
}

pub(crate) fn latin1_decode(bytes: &[u8]) -> String {
	let mut text = bytes.iter().map(|c| *c as char).collect::<String>();
	trim_end_nulls(&mut text);
	text
}

pub(crate) fn latin1_encode(
	s: &str,
	lossy: bool,
) -> impl Iterator<Item = std::result::Result<u8, TextEncodingError>> {
	s.chars().enumerate().map(move |(index, c)| {
		if (c as u32) <= 255 {
			Ok(c as u8)
		} else if lossy {
			Ok(b'?')
		} else {
			Err(TextEncodingError {
				encoding: TextEncoding::Latin1,
				valid_up_to: index, // All characters up to this point are single-byte
			})
		}
	})
}

pub(crate) fn utf8_decode(bytes: Vec<u8>) -> Result<String> {
	String::from_utf8(bytes)
		.map(|mut text| {
			trim_end_nulls(&mut text);
			text
		})
		.map_err(Into::into)
}

pub(crate) fn utf16_decode_bytes(bytes: &[u8], endianness: fn([u8; 2]) -> u16) -> Result<String> {
	if bytes.len() % 2 != 0 {
		err!(TextDecode("UTF-16 string has an odd length"));
	}

	let words: Vec<u16> = bytes
		.chunks_exact(2)
		.map(|c| endianness([c[0], c[1]]))
		.collect();

	String::from_utf16(&words)
		.map(|mut text| {
			trim_end_nulls(&mut text);
			text
		})
		.map_err(|_| TagsmithError::new(ErrorKind::TextDecode("Given an invalid UTF-16 string")))
}

pub(crate) fn trim_end_nulls(text: &mut String) {
	if text.ends_with('\0') {
		let new_len = text.trim_end_matches('\0').len();
		text.truncate(new_len);
	}
}

fn utf16_encode(text: &str, endianness: fn(u16) -> [u8; 2], bom: bool) -> Vec<u8> {
	let mut encoded = Vec::<u8>::new();

	if bom {
		encoded.extend_from_slice(&endianness(0xFEFF_u16));
	}

	for ch in text.encode_utf16() {
		encoded.extend_from_slice(&endianness(ch));
	}

	encoded
}
