//! Bounded byte buffers shared by every tag codec
//!
//! [`ByteVector`] is the owned, growable buffer that renderers write into. Reading is done through
//! [`ByteSlice`], which is implemented for `[u8]` so any borrowed view gets the same structured
//! accessors without copying.
//!
//! Every accessor is bounds checked. Requesting bytes past the end of a buffer is an
//! [`ErrorKind::OutOfRange`](crate::error::ErrorKind::OutOfRange) error, never a silent truncation.
//! The only exception is [`ByteSlice::mid_saturating`], which is explicit about allowing short reads.

use crate::error::Result;
use crate::macros::{err, range_err};
use crate::util::alloc::VecFallibleCapacity;
use crate::util::text::TextEncoding;

use std::ops::{Deref, DerefMut};

use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// The byte order of fixed-width integers
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Endianness {
	/// Most significant byte first ("MM" in TIFF)
	#[default]
	Big,
	/// Least significant byte first ("II" in TIFF)
	Little,
}

/// Structured, bounds checked accessors over a byte view
///
/// # Examples
///
/// ```rust
/// use tagsmith::byte_vector::{ByteSlice, Endianness};
///
/// # fn main() -> tagsmith::error::Result<()> {
/// let data: &[u8] = &[0x01, 0x02, 0x03, 0x04, b'h', b'i'];
///
/// assert_eq!(data.read_uint(0, 2, Endianness::Big)?, 0x0102);
/// assert_eq!(data.read_uint(0, 2, Endianness::Little)?, 0x0201);
/// assert_eq!(data.find(b"hi", 0), Some(4));
/// assert!(data.mid(4, 3).is_err());
/// # Ok(()) }
/// ```
pub trait ByteSlice {
	/// Borrow `length` bytes starting at `offset`
	///
	/// # Errors
	///
	/// `offset + length` exceeds the length of the buffer
	fn mid(&self, offset: usize, length: usize) -> Result<&[u8]>;

	/// Borrow up to `length` bytes starting at `offset`, clamped to the end of the buffer
	///
	/// An `offset` past the end yields an empty slice.
	fn mid_saturating(&self, offset: usize, length: usize) -> &[u8];

	/// Find the first occurrence of `pattern` at or after `start`
	fn find(&self, pattern: &[u8], start: usize) -> Option<usize> {
		self.find_aligned(pattern, start, 1)
	}

	/// Find the first occurrence of `pattern` at `start + k * alignment`
	///
	/// This is needed to locate delimiters in multi-byte encodings, where a match spanning two code
	/// units is not a match at all.
	fn find_aligned(&self, pattern: &[u8], start: usize, alignment: usize) -> Option<usize>;

	/// Decode an unsigned integer of `width` bytes (1 to 8) at `offset`
	///
	/// # Errors
	///
	/// * `width` is not in `1..=8`
	/// * The integer extends past the end of the buffer
	fn read_uint(&self, offset: usize, width: usize, endianness: Endianness) -> Result<u64>;

	/// Decode a signed integer of `width` bytes (1 to 8) at `offset`
	///
	/// # Errors
	///
	/// See [`ByteSlice::read_uint`]
	fn read_int(&self, offset: usize, width: usize, endianness: Endianness) -> Result<i64>;

	/// Shorthand for a 2 byte [`ByteSlice::read_uint`]
	///
	/// # Errors
	///
	/// See [`ByteSlice::read_uint`]
	fn read_u16(&self, offset: usize, endianness: Endianness) -> Result<u16> {
		self.read_uint(offset, 2, endianness).map(|n| n as u16)
	}

	/// Shorthand for a 4 byte [`ByteSlice::read_uint`]
	///
	/// # Errors
	///
	/// See [`ByteSlice::read_uint`]
	fn read_u32(&self, offset: usize, endianness: Endianness) -> Result<u32> {
		self.read_uint(offset, 4, endianness).map(|n| n as u32)
	}

	/// Shorthand for a 2 byte [`ByteSlice::read_int`]
	///
	/// # Errors
	///
	/// See [`ByteSlice::read_uint`]
	fn read_i16(&self, offset: usize, endianness: Endianness) -> Result<i16> {
		self.read_int(offset, 2, endianness).map(|n| n as i16)
	}

	/// Shorthand for a 4 byte [`ByteSlice::read_int`]
	///
	/// # Errors
	///
	/// See [`ByteSlice::read_uint`]
	fn read_i32(&self, offset: usize, endianness: Endianness) -> Result<i32> {
		self.read_int(offset, 4, endianness).map(|n| n as i32)
	}

	/// Decode `length` bytes at `offset` as text
	///
	/// The text is not assumed to be null terminated, trailing nulls are trimmed.
	///
	/// # Errors
	///
	/// * The range extends past the end of the buffer
	/// * The bytes are not valid in `encoding`
	fn read_text(&self, offset: usize, length: usize, encoding: TextEncoding) -> Result<String>;

	/// Split the entire buffer on `encoding`'s delimiter, decoding every piece
	///
	/// An empty buffer yields no strings. Empty pieces between two delimiters are kept.
	///
	/// # Errors
	///
	/// Any piece is not valid in `encoding`
	fn split_text(&self, encoding: TextEncoding) -> Result<Vec<String>>;
}

impl ByteSlice for [u8] {
	fn mid(&self, offset: usize, length: usize) -> Result<&[u8]> {
		match offset.checked_add(length) {
			Some(end) if end <= self.len() => Ok(&self[offset..end]),
			_ => Err(range_err!(offset, length, self.len())),
		}
	}

	fn mid_saturating(&self, offset: usize, length: usize) -> &[u8] {
		let start = offset.min(self.len());
		let end = offset.saturating_add(length).min(self.len());
		&self[start..end]
	}

	fn find_aligned(&self, pattern: &[u8], start: usize, alignment: usize) -> Option<usize> {
		if pattern.is_empty() || alignment == 0 {
			return None;
		}

		let last_start = self.len().checked_sub(pattern.len())?;

		let mut pos = start;
		while pos <= last_start {
			if &self[pos..pos + pattern.len()] == pattern {
				return Some(pos);
			}

			pos += alignment;
		}

		None
	}

	fn read_uint(&self, offset: usize, width: usize, endianness: Endianness) -> Result<u64> {
		if !(1..=8).contains(&width) {
			err!(InvalidArgument("Integer width must be between 1 and 8 bytes"));
		}

		let bytes = self.mid(offset, width)?;
		Ok(match endianness {
			Endianness::Big => BigEndian::read_uint(bytes, width),
			Endianness::Little => LittleEndian::read_uint(bytes, width),
		})
	}

	fn read_int(&self, offset: usize, width: usize, endianness: Endianness) -> Result<i64> {
		if !(1..=8).contains(&width) {
			err!(InvalidArgument("Integer width must be between 1 and 8 bytes"));
		}

		let bytes = self.mid(offset, width)?;
		Ok(match endianness {
			Endianness::Big => BigEndian::read_int(bytes, width),
			Endianness::Little => LittleEndian::read_int(bytes, width),
		})
	}

	fn read_text(&self, offset: usize, length: usize, encoding: TextEncoding) -> Result<String> {
		encoding.decode(self.mid(offset, length)?)
	}

	fn split_text(&self, encoding: TextEncoding) -> Result<Vec<String>> {
		let mut strings = Vec::new();
		if self.is_empty() {
			return Ok(strings);
		}

		let delimiter = encoding.delimiter();
		let mut start = 0;
		loop {
			match self.find_aligned(delimiter, start, encoding.code_unit_size()) {
				Some(end) => {
					strings.push(encoding.decode(&self[start..end])?);
					start = end + delimiter.len();
				},
				None => {
					strings.push(encoding.decode(&self[start..])?);
					break;
				},
			}
		}

		Ok(strings)
	}
}

/// An owned, growable byte buffer
///
/// `ByteVector` dereferences to `[u8]`, so every [`ByteSlice`] accessor is available on it.
///
/// # Examples
///
/// ```rust
/// use tagsmith::TextEncoding;
/// use tagsmith::byte_vector::{ByteSlice, ByteVector, Endianness};
///
/// # fn main() -> tagsmith::error::Result<()> {
/// let mut buffer = ByteVector::new();
/// buffer.push_uint(42, 4, Endianness::Little)?;
/// buffer.push_text("A", TextEncoding::UTF8)?;
/// buffer.push_delimiter(TextEncoding::UTF8);
/// buffer.push_text("B", TextEncoding::UTF8)?;
///
/// assert_eq!(buffer.read_u32(0, Endianness::Little)?, 42);
/// assert_eq!(buffer.mid(4, 3)?.split_text(TextEncoding::UTF8)?, ["A", "B"]);
/// # Ok(()) }
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash, Debug)]
pub struct ByteVector(Vec<u8>);

impl ByteVector {
	/// Create an empty `ByteVector`
	pub const fn new() -> Self {
		Self(Vec::new())
	}

	/// Create an empty `ByteVector` able to hold `capacity` bytes without reallocating
	///
	/// # Errors
	///
	/// `capacity` exceeds [`GlobalOptions::allocation_limit`](crate::config::GlobalOptions::allocation_limit)
	pub fn with_capacity(capacity: usize) -> Result<Self> {
		Vec::try_with_capacity_stable(capacity).map(Self)
	}

	/// Encode `value` as a `width` byte integer
	///
	/// # Errors
	///
	/// See [`ByteVector::push_uint`]
	pub fn from_uint(value: u64, width: usize, endianness: Endianness) -> Result<Self> {
		let mut bytes = Self::new();
		bytes.push_uint(value, width, endianness)?;
		Ok(bytes)
	}

	/// Encode `text`, without any delimiter
	///
	/// # Errors
	///
	/// See [`ByteVector::push_text`]
	pub fn from_text(text: &str, encoding: TextEncoding) -> Result<Self> {
		let mut bytes = Self::new();
		bytes.push_text(text, encoding)?;
		Ok(bytes)
	}

	/// Append `value` as a `width` byte integer
	///
	/// # Errors
	///
	/// * `width` is not in `1..=8`
	/// * `value` does not fit in `width` bytes
	pub fn push_uint(&mut self, value: u64, width: usize, endianness: Endianness) -> Result<()> {
		if !(1..=8).contains(&width) {
			err!(InvalidArgument("Integer width must be between 1 and 8 bytes"));
		}

		if width < 8 && value >> (width * 8) != 0 {
			err!(InvalidArgument("Integer does not fit in the requested width"));
		}

		let mut encoded = [0; 8];
		match endianness {
			Endianness::Big => BigEndian::write_uint(&mut encoded[..width], value, width),
			Endianness::Little => LittleEndian::write_uint(&mut encoded[..width], value, width),
		}

		self.0.extend_from_slice(&encoded[..width]);
		Ok(())
	}

	/// Append a 2 byte integer
	pub fn push_u16(&mut self, value: u16, endianness: Endianness) {
		let encoded = match endianness {
			Endianness::Big => value.to_be_bytes(),
			Endianness::Little => value.to_le_bytes(),
		};

		self.0.extend_from_slice(&encoded);
	}

	/// Append a 4 byte integer
	pub fn push_u32(&mut self, value: u32, endianness: Endianness) {
		let encoded = match endianness {
			Endianness::Big => value.to_be_bytes(),
			Endianness::Little => value.to_le_bytes(),
		};

		self.0.extend_from_slice(&encoded);
	}

	/// Append `text` in `encoding`, without any delimiter
	///
	/// # Errors
	///
	/// `text` can not be represented in `encoding`
	pub fn push_text(&mut self, text: &str, encoding: TextEncoding) -> Result<()> {
		let encoded = encoding.encode(text, false, false)?;
		self.0.extend_from_slice(&encoded);
		Ok(())
	}

	/// Append `encoding`'s delimiter
	pub fn push_delimiter(&mut self, encoding: TextEncoding) {
		self.0.extend_from_slice(encoding.delimiter());
	}

	/// Append raw bytes
	pub fn push_bytes(&mut self, bytes: &[u8]) {
		self.0.extend_from_slice(bytes);
	}

	/// Pad the buffer with zeros until its length is a multiple of `alignment`
	pub fn align(&mut self, alignment: usize) {
		if alignment == 0 {
			return;
		}

		let remainder = self.0.len() % alignment;
		if remainder != 0 {
			self.0.resize(self.0.len() + (alignment - remainder), 0);
		}
	}

	/// Overwrite bytes starting at `offset`
	///
	/// # Errors
	///
	/// `offset + bytes.len()` exceeds the length of the buffer
	pub fn overwrite(&mut self, offset: usize, bytes: &[u8]) -> Result<()> {
		let available = self.0.len();
		match offset.checked_add(bytes.len()) {
			Some(end) if end <= available => {
				self.0[offset..end].copy_from_slice(bytes);
				Ok(())
			},
			_ => Err(range_err!(offset, bytes.len(), available)),
		}
	}

	/// Consume the `ByteVector`, returning the underlying [`Vec`]
	pub fn into_inner(self) -> Vec<u8> {
		self.0
	}
}

impl Deref for ByteVector {
	type Target = [u8];

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl DerefMut for ByteVector {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.0
	}
}

impl AsRef<[u8]> for ByteVector {
	fn as_ref(&self) -> &[u8] {
		&self.0
	}
}

impl From<Vec<u8>> for ByteVector {
	fn from(input: Vec<u8>) -> Self {
		Self(input)
	}
}

impl From<&[u8]> for ByteVector {
	fn from(input: &[u8]) -> Self {
		Self(input.to_vec())
	}
}

impl From<ByteVector> for Vec<u8> {
	fn from(input: ByteVector) -> Self {
		input.0
	}
}

impl Extend<u8> for ByteVector {
	fn extend<T: IntoIterator<Item = u8>>(&mut self, iter: T) {
		self.0.extend(iter)
	}
}

#[cfg(test)]
#[allow(trivial_casts)]
mod tests {
	use super::{ByteSlice, ByteVector, Endianness};
	use crate::error::ErrorKind;
	use crate::util::text::TextEncoding;

	#[test_log::test]
	fn mid_rejects_out_of_range() {
		let data: &[u8] = &[1, 2, 3, 4];

		assert_eq!(data.mid(1, 3).unwrap(), &[2, 3, 4]);
		assert_eq!(data.mid(4, 0).unwrap(), &[] as &[u8]);

		let err = data.mid(2, 3).unwrap_err();
		assert!(matches!(
			err.kind(),
			ErrorKind::OutOfRange {
				offset: 2,
				length: 3,
				available: 4
			}
		));

		assert!(data.mid(usize::MAX, 2).is_err());
		assert_eq!(data.mid_saturating(2, 10), &[3, 4]);
		assert_eq!(data.mid_saturating(10, 10), &[] as &[u8]);
	}

	#[test_log::test]
	fn find() {
		let data: &[u8] = b"abcabc";

		assert_eq!(data.find(b"bc", 0), Some(1));
		assert_eq!(data.find(b"bc", 2), Some(4));
		assert_eq!(data.find(b"bc", 5), None);
		assert_eq!(data.find(b"abcabcabc", 0), None);
		assert_eq!(data.find(b"", 0), None);
	}

	#[test_log::test]
	fn find_aligned_skips_straddling_matches() {
		// "a" NUL "b" in UTF-16LE, where the bytes 0x00 0x00 straddle two code units
		let data: &[u8] = &[0x61, 0x00, 0x00, 0x00, 0x62, 0x00];

		assert_eq!(data.find(&[0, 0], 0), Some(1));
		assert_eq!(data.find_aligned(&[0, 0], 0, 2), Some(2));
	}

	#[test_log::test]
	fn integers() {
		let data: &[u8] = &[0xFF, 0xFE, 0x01, 0x02, 0x03];

		assert_eq!(data.read_uint(0, 1, Endianness::Big).unwrap(), 0xFF);
		assert_eq!(data.read_uint(2, 3, Endianness::Big).unwrap(), 0x01_02_03);
		assert_eq!(data.read_uint(2, 3, Endianness::Little).unwrap(), 0x03_02_01);
		assert_eq!(data.read_int(0, 2, Endianness::Big).unwrap(), -2);
		assert_eq!(data.read_u16(0, Endianness::Little).unwrap(), 0xFEFF);

		assert!(data.read_uint(0, 9, Endianness::Big).is_err());
		assert!(data.read_uint(0, 0, Endianness::Big).is_err());
		assert!(data.read_u32(2, Endianness::Big).is_err());
	}

	#[test_log::test]
	fn integer_encoding() {
		let mut buffer = ByteVector::new();
		buffer.push_uint(0x0102, 2, Endianness::Big).unwrap();
		buffer.push_uint(0x0102, 2, Endianness::Little).unwrap();
		buffer.push_u32(7, Endianness::Little);

		assert_eq!(&*buffer, &[0x01, 0x02, 0x02, 0x01, 7, 0, 0, 0]);

		assert!(buffer.push_uint(0x1_00, 1, Endianness::Big).is_err());
		assert!(buffer.push_uint(1, 0, Endianness::Big).is_err());
		assert_eq!(buffer.len(), 8);

		let wide = ByteVector::from_uint(u64::MAX, 8, Endianness::Big).unwrap();
		assert_eq!(wide.read_uint(0, 8, Endianness::Big).unwrap(), u64::MAX);
	}

	#[test_log::test]
	fn text() {
		let data: &[u8] = b"A\0B";
		assert_eq!(data.split_text(TextEncoding::UTF8).unwrap(), ["A", "B"]);
		assert_eq!(data.read_text(0, 1, TextEncoding::UTF8).unwrap(), "A");
		assert!(data.read_text(2, 2, TextEncoding::UTF8).is_err());

		let empty: &[u8] = &[];
		assert!(empty.split_text(TextEncoding::UTF8).unwrap().is_empty());

		let utf16: &[u8] = &[0x61, 0x00, 0x00, 0x00, 0x62, 0x00];
		assert_eq!(utf16.split_text(TextEncoding::UTF16LE).unwrap(), ["a", "b"]);
	}

	#[test_log::test]
	fn align_and_overwrite() {
		let mut buffer = ByteVector::from(vec![1, 2, 3]);
		buffer.align(2);
		assert_eq!(&*buffer, &[1, 2, 3, 0]);

		buffer.overwrite(2, &[9, 9]).unwrap();
		assert_eq!(&*buffer, &[1, 2, 9, 9]);
		assert!(buffer.overwrite(3, &[9, 9]).is_err());
	}
}
