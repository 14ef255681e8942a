use crate::byte_vector::{ByteSlice, ByteVector, Endianness};
use crate::error::Result;
use crate::ifd::IfdStructure;
use crate::macros::{decode_err, err};
use crate::util::text::latin1_decode;

use std::fmt::{Display, Formatter};

/// The on-disk type of an [`IfdEntry`]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
#[allow(missing_docs)]
pub enum IfdEntryType {
	Byte = 1,
	Ascii = 2,
	Short = 3,
	Long = 4,
	Rational = 5,
	SByte = 6,
	Undefined = 7,
	SShort = 8,
	SLong = 9,
	SRational = 10,
	Float = 11,
	Double = 12,
	/// An offset to a nested directory, equivalent to [`IfdEntryType::Long`]
	Ifd = 13,
}

impl IfdEntryType {
	/// Get the type for a type code
	///
	/// This returns `None` for unknown codes.
	pub fn from_u16(code: u16) -> Option<Self> {
		match code {
			1 => Some(Self::Byte),
			2 => Some(Self::Ascii),
			3 => Some(Self::Short),
			4 => Some(Self::Long),
			5 => Some(Self::Rational),
			6 => Some(Self::SByte),
			7 => Some(Self::Undefined),
			8 => Some(Self::SShort),
			9 => Some(Self::SLong),
			10 => Some(Self::SRational),
			11 => Some(Self::Float),
			12 => Some(Self::Double),
			13 => Some(Self::Ifd),
			_ => None,
		}
	}

	/// The size in bytes of a single value of this type
	pub fn size(self) -> usize {
		match self {
			Self::Byte | Self::Ascii | Self::SByte | Self::Undefined => 1,
			Self::Short | Self::SShort => 2,
			Self::Long | Self::SLong | Self::Float | Self::Ifd => 4,
			Self::Rational | Self::SRational | Self::Double => 8,
		}
	}
}

/// An unsigned fraction
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rational {
	/// The numerator
	pub numerator: u32,
	/// The denominator
	pub denominator: u32,
}

impl Rational {
	/// Create a new `Rational`
	pub const fn new(numerator: u32, denominator: u32) -> Self {
		Self {
			numerator,
			denominator,
		}
	}

	/// The value of the fraction
	///
	/// A zero denominator yields [`f64::NAN`].
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::ifd::Rational;
	///
	/// assert_eq!(Rational::new(8, 1000).value(), 0.008);
	/// assert!(Rational::new(1, 0).value().is_nan());
	/// ```
	pub fn value(self) -> f64 {
		if self.denominator == 0 {
			return f64::NAN;
		}

		f64::from(self.numerator) / f64::from(self.denominator)
	}

	/// Find a fraction close to `value`
	///
	/// This returns `None` for negative, non-finite, or out of range values.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::ifd::Rational;
	///
	/// assert_eq!(Rational::approximate(0.008), Some(Rational::new(1, 125)));
	/// assert_eq!(Rational::approximate(2.8), Some(Rational::new(14, 5)));
	/// assert_eq!(Rational::approximate(-1.0), None);
	/// ```
	pub fn approximate(value: f64) -> Option<Self> {
		if !value.is_finite() || value < 0.0 {
			return None;
		}

		let mut denominator = 1_000_000_u32;
		while value * f64::from(denominator) > f64::from(u32::MAX) && denominator > 1 {
			denominator /= 10;
		}

		let numerator = (value * f64::from(denominator)).round();
		if numerator > f64::from(u32::MAX) {
			return None;
		}

		let numerator = numerator as u32;
		let divisor = gcd(numerator, denominator);
		Some(Self::new(numerator / divisor, denominator / divisor))
	}
}

impl Display for Rational {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}/{}", self.numerator, self.denominator)
	}
}

/// A signed fraction
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SRational {
	/// The numerator
	pub numerator: i32,
	/// The denominator
	pub denominator: i32,
}

impl SRational {
	/// Create a new `SRational`
	pub const fn new(numerator: i32, denominator: i32) -> Self {
		Self {
			numerator,
			denominator,
		}
	}

	/// The value of the fraction
	///
	/// A zero denominator yields [`f64::NAN`].
	pub fn value(self) -> f64 {
		if self.denominator == 0 {
			return f64::NAN;
		}

		f64::from(self.numerator) / f64::from(self.denominator)
	}
}

impl Display for SRational {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}/{}", self.numerator, self.denominator)
	}
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
	while b != 0 {
		(a, b) = (b, a % b);
	}

	a.max(1)
}

/// The value of a directory entry
///
/// Every known type code has a variant holding its decoded values. Entries with an unknown type
/// code are kept as [`IfdEntry::Opaque`], so they survive a round trip.
#[derive(Clone, Debug, PartialEq)]
pub enum IfdEntry {
	/// Unsigned bytes
	Byte(Vec<u8>),
	/// A string, the terminating null is not stored
	Ascii(String),
	/// Unsigned 16-bit integers
	Short(Vec<u16>),
	/// Unsigned 32-bit integers
	Long(Vec<u32>),
	/// Unsigned fractions
	Rational(Vec<Rational>),
	/// Signed bytes
	SByte(Vec<i8>),
	/// Bytes with a tag specific meaning
	Undefined(Vec<u8>),
	/// Signed 16-bit integers
	SShort(Vec<i16>),
	/// Signed 32-bit integers
	SLong(Vec<i32>),
	/// Signed fractions
	SRational(Vec<SRational>),
	/// Single precision floats
	Float(Vec<f32>),
	/// Double precision floats
	Double(Vec<f64>),
	/// A nested directory chain, such as the Exif IFD
	SubIfd {
		/// The type code the offset is stored as, either [`IfdEntryType::Long`] or [`IfdEntryType::Ifd`]
		type_code: u16,
		/// The nested directories
		structure: IfdStructure,
	},
	/// An entry with an unknown type code
	Opaque {
		/// The unknown type code
		type_code: u16,
		/// The value count as stored on disk
		count: u32,
		/// The raw 4 byte value/offset field
		data: Vec<u8>,
	},
}

impl IfdEntry {
	/// The type code written to disk
	pub fn type_code(&self) -> u16 {
		let entry_type = match self {
			IfdEntry::Byte(_) => IfdEntryType::Byte,
			IfdEntry::Ascii(_) => IfdEntryType::Ascii,
			IfdEntry::Short(_) => IfdEntryType::Short,
			IfdEntry::Long(_) => IfdEntryType::Long,
			IfdEntry::Rational(_) => IfdEntryType::Rational,
			IfdEntry::SByte(_) => IfdEntryType::SByte,
			IfdEntry::Undefined(_) => IfdEntryType::Undefined,
			IfdEntry::SShort(_) => IfdEntryType::SShort,
			IfdEntry::SLong(_) => IfdEntryType::SLong,
			IfdEntry::SRational(_) => IfdEntryType::SRational,
			IfdEntry::Float(_) => IfdEntryType::Float,
			IfdEntry::Double(_) => IfdEntryType::Double,
			IfdEntry::SubIfd { type_code, .. } | IfdEntry::Opaque { type_code, .. } => {
				return *type_code;
			},
		};

		entry_type as u16
	}

	/// The number of values, as written to disk
	///
	/// For [`IfdEntry::Ascii`], this includes the terminating null.
	pub fn count(&self) -> usize {
		match self {
			IfdEntry::Byte(v) | IfdEntry::Undefined(v) => v.len(),
			IfdEntry::Ascii(s) => s.len() + 1,
			IfdEntry::Short(v) => v.len(),
			IfdEntry::Long(v) => v.len(),
			IfdEntry::Rational(v) => v.len(),
			IfdEntry::SByte(v) => v.len(),
			IfdEntry::SShort(v) => v.len(),
			IfdEntry::SLong(v) => v.len(),
			IfdEntry::SRational(v) => v.len(),
			IfdEntry::Float(v) => v.len(),
			IfdEntry::Double(v) => v.len(),
			IfdEntry::SubIfd { .. } => 1,
			IfdEntry::Opaque { count, .. } => *count as usize,
		}
	}

	/// The first value as an unsigned integer
	///
	/// This is only available for [`IfdEntry::Byte`], [`IfdEntry::Short`], and [`IfdEntry::Long`].
	pub fn as_u32(&self) -> Option<u32> {
		match self {
			IfdEntry::Byte(v) => v.first().copied().map(u32::from),
			IfdEntry::Short(v) => v.first().copied().map(u32::from),
			IfdEntry::Long(v) => v.first().copied(),
			_ => None,
		}
	}

	/// The string of an [`IfdEntry::Ascii`]
	pub fn as_str(&self) -> Option<&str> {
		match self {
			IfdEntry::Ascii(s) => Some(s),
			_ => None,
		}
	}

	// Decodes the `raw` value bytes of a known, non sub-IFD type
	pub(crate) fn decode(entry_type: IfdEntryType, raw: &[u8], endianness: Endianness) -> Result<Self> {
		let width = entry_type.size();
		if raw.len() % width != 0 {
			decode_err!(@BAIL TiffIfd, "IFD entry value has an invalid size");
		}

		let count = raw.len() / width;
		let entry = match entry_type {
			IfdEntryType::Byte => IfdEntry::Byte(raw.to_vec()),
			IfdEntryType::Undefined => IfdEntry::Undefined(raw.to_vec()),
			IfdEntryType::SByte => IfdEntry::SByte(raw.iter().map(|b| *b as i8).collect()),
			IfdEntryType::Ascii => {
				// Strings are supposed to be ASCII, but UTF-8 is common in the wild
				let text = match std::str::from_utf8(raw) {
					Ok(text) => text.trim_end_matches('\0').to_owned(),
					Err(_) => latin1_decode(raw),
				};

				IfdEntry::Ascii(text)
			},
			IfdEntryType::Short => IfdEntry::Short(
				(0..count)
					.map(|i| raw.read_u16(i * 2, endianness))
					.collect::<Result<_>>()?,
			),
			IfdEntryType::Long | IfdEntryType::Ifd => IfdEntry::Long(
				(0..count)
					.map(|i| raw.read_u32(i * 4, endianness))
					.collect::<Result<_>>()?,
			),
			IfdEntryType::SShort => IfdEntry::SShort(
				(0..count)
					.map(|i| raw.read_i16(i * 2, endianness))
					.collect::<Result<_>>()?,
			),
			IfdEntryType::SLong => IfdEntry::SLong(
				(0..count)
					.map(|i| raw.read_i32(i * 4, endianness))
					.collect::<Result<_>>()?,
			),
			IfdEntryType::Rational => IfdEntry::Rational(
				(0..count)
					.map(|i| {
						Ok(Rational::new(
							raw.read_u32(i * 8, endianness)?,
							raw.read_u32(i * 8 + 4, endianness)?,
						))
					})
					.collect::<Result<_>>()?,
			),
			IfdEntryType::SRational => IfdEntry::SRational(
				(0..count)
					.map(|i| {
						Ok(SRational::new(
							raw.read_i32(i * 8, endianness)?,
							raw.read_i32(i * 8 + 4, endianness)?,
						))
					})
					.collect::<Result<_>>()?,
			),
			IfdEntryType::Float => IfdEntry::Float(
				(0..count)
					.map(|i| raw.read_u32(i * 4, endianness).map(f32::from_bits))
					.collect::<Result<_>>()?,
			),
			IfdEntryType::Double => IfdEntry::Double(
				(0..count)
					.map(|i| raw.read_uint(i * 8, 8, endianness).map(f64::from_bits))
					.collect::<Result<_>>()?,
			),
		};

		Ok(entry)
	}

	// Encodes the value bytes, sub-IFDs are handled by the renderer
	pub(crate) fn encode(&self, endianness: Endianness) -> Result<ByteVector> {
		let mut out = ByteVector::new();
		match self {
			IfdEntry::Byte(v) | IfdEntry::Undefined(v) => out.push_bytes(v),
			IfdEntry::SByte(v) => out.extend(v.iter().map(|b| *b as u8)),
			IfdEntry::Ascii(s) => {
				out.push_bytes(s.as_bytes());
				out.push_bytes(&[0]);
			},
			IfdEntry::Short(v) => v.iter().for_each(|n| out.push_u16(*n, endianness)),
			IfdEntry::Long(v) => v.iter().for_each(|n| out.push_u32(*n, endianness)),
			IfdEntry::SShort(v) => v
				.iter()
				.for_each(|n| out.push_u16(*n as u16, endianness)),
			IfdEntry::SLong(v) => v
				.iter()
				.for_each(|n| out.push_u32(*n as u32, endianness)),
			IfdEntry::Rational(v) => v.iter().for_each(|r| {
				out.push_u32(r.numerator, endianness);
				out.push_u32(r.denominator, endianness);
			}),
			IfdEntry::SRational(v) => v.iter().for_each(|r| {
				out.push_u32(r.numerator as u32, endianness);
				out.push_u32(r.denominator as u32, endianness);
			}),
			IfdEntry::Float(v) => v
				.iter()
				.for_each(|n| out.push_u32(n.to_bits(), endianness)),
			IfdEntry::Double(v) => {
				for n in v {
					out.push_uint(n.to_bits(), 8, endianness)?;
				}
			},
			IfdEntry::Opaque { data, .. } => out.push_bytes(data),
			IfdEntry::SubIfd { .. } => {
				err!(InvalidArgument("Sub-IFD entries cannot be encoded as a value"))
			},
		}

		Ok(out)
	}
}
