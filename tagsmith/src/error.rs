//! Contains the errors that can arise within Tagsmith
//!
//! The primary error is [`TagsmithError`]. The type of error is determined by [`ErrorKind`],
//! which can be extended at any time.
//!
//! Errors fall into two classes:
//!
//! * Programmer errors ([`ErrorKind::InvalidArgument`], [`ErrorKind::OutOfRange`]), which are
//!   detected before anything is mutated.
//! * Data errors ([`ErrorKind::CorruptData`] and friends), which describe input that could not be
//!   turned into a structurally valid record. These are always recoverable.

use crate::tag::TagType;
pub use crate::util::text::TextEncodingError;

use std::collections::TryReserveError;
use std::fmt::{Debug, Display, Formatter};

/// Alias for `Result<T, TagsmithError>`
pub type Result<T> = std::result::Result<T, TagsmithError>;

/// The types of errors that can occur
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
	// Caller related errors
	/// A required input was absent or malformed (Ex. an APE key with invalid characters)
	InvalidArgument(&'static str),
	/// An offset/length pair exceeds the bounds of a buffer
	OutOfRange {
		/// The requested start of the range
		offset: usize,
		/// The requested length of the range
		length: usize,
		/// The number of bytes actually available
		available: usize,
	},

	// Data related errors
	/// Attempting to read/write an abnormally large amount of data
	TooMuchData,
	/// Expected the data to be a different size than provided
	///
	/// This occurs when the size of an item is written as one value, but that size is either too
	/// big or small to be valid within the bounds of that item.
	SizeMismatch,
	/// A record could not be decoded into a structurally valid value
	CorruptData(CorruptDataError),

	// Picture related errors
	/// Provided an invalid picture
	NotAPicture,

	// Text related errors
	/// Errors that arise while decoding text
	TextDecode(&'static str),
	/// Errors that arise while encoding text
	TextEncode(TextEncodingError),

	// Conversions for external errors
	/// Errors that arise while reading or writing XML
	Xml(quick_xml::Error),
	/// Unable to convert bytes to a String
	StringFromUtf8(std::string::FromUtf8Error),
	/// Unable to convert bytes to a str
	StrFromUtf8(std::str::Utf8Error),
	/// Represents all cases of [`std::io::Error`].
	Io(std::io::Error),
	/// Represents all cases of [`std::fmt::Error`].
	Fmt(std::fmt::Error),
	/// Failure to allocate enough memory
	Alloc(TryReserveError),
	/// This should **never** be encountered
	Infallible(std::convert::Infallible),
}

/// An error that arises while decoding a tag
pub struct CorruptDataError {
	tag_type: Option<TagType>,
	description: &'static str,
}

impl CorruptDataError {
	/// Create a `CorruptDataError` from a [`TagType`] and description
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::error::CorruptDataError;
	/// use tagsmith::tag::TagType;
	///
	/// let ape_error = CorruptDataError::new(TagType::Ape, "Not enough data for APE item");
	/// assert_eq!(ape_error.tag_type(), Some(TagType::Ape));
	/// ```
	#[must_use]
	pub const fn new(tag_type: TagType, description: &'static str) -> Self {
		Self {
			tag_type: Some(tag_type),
			description,
		}
	}

	/// Create a `CorruptDataError` without binding it to a [`TagType`]
	pub fn from_description(description: &'static str) -> Self {
		Self {
			tag_type: None,
			description,
		}
	}

	/// Returns the associated [`TagType`], if one exists
	pub fn tag_type(&self) -> Option<TagType> {
		self.tag_type
	}

	/// Returns the error description
	pub fn description(&self) -> &str {
		self.description
	}
}

impl Debug for CorruptDataError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		if let Some(tag_type) = self.tag_type {
			write!(f, "{:?}: {:?}", tag_type, self.description)
		} else {
			write!(f, "{:?}", self.description)
		}
	}
}

impl Display for CorruptDataError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		if let Some(tag_type) = self.tag_type {
			write!(f, "{:?}: {}", tag_type, self.description)
		} else {
			write!(f, "{}", self.description)
		}
	}
}

/// Errors that could occur within Tagsmith
pub struct TagsmithError {
	pub(crate) kind: ErrorKind,
}

impl TagsmithError {
	/// Create a `TagsmithError` from an [`ErrorKind`]
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::error::{ErrorKind, TagsmithError};
	///
	/// let too_much_data = TagsmithError::new(ErrorKind::TooMuchData);
	/// ```
	#[must_use]
	pub const fn new(kind: ErrorKind) -> Self {
		Self { kind }
	}

	/// Returns the [`ErrorKind`]
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::error::{ErrorKind, TagsmithError};
	///
	/// let too_much_data = TagsmithError::new(ErrorKind::TooMuchData);
	/// if let ErrorKind::TooMuchData = too_much_data.kind() {
	/// 	println!("That's a lot of data!");
	/// }
	/// ```
	pub fn kind(&self) -> &ErrorKind {
		&self.kind
	}

	/// Whether the error was caused by malformed input rather than misuse of the API
	///
	/// Data errors are always safe to recover from, the caller can treat the tag as absent.
	pub fn is_data_error(&self) -> bool {
		matches!(
			self.kind,
			ErrorKind::CorruptData(_)
				| ErrorKind::SizeMismatch
				| ErrorKind::TooMuchData
				| ErrorKind::NotAPicture
				| ErrorKind::TextDecode(_)
				| ErrorKind::Xml(_)
				| ErrorKind::StringFromUtf8(_)
				| ErrorKind::StrFromUtf8(_)
		)
	}
}

impl std::error::Error for TagsmithError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self.kind {
			ErrorKind::Xml(ref err) => Some(err),
			ErrorKind::StringFromUtf8(ref err) => Some(err),
			ErrorKind::StrFromUtf8(ref err) => Some(err),
			ErrorKind::Io(ref err) => Some(err),
			ErrorKind::Fmt(ref err) => Some(err),
			ErrorKind::Alloc(ref err) => Some(err),
			_ => None,
		}
	}
}

impl Debug for TagsmithError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?}", self.kind)
	}
}

impl From<CorruptDataError> for TagsmithError {
	fn from(input: CorruptDataError) -> Self {
		Self {
			kind: ErrorKind::CorruptData(input),
		}
	}
}

impl From<TextEncodingError> for TagsmithError {
	fn from(input: TextEncodingError) -> Self {
		Self {
			kind: ErrorKind::TextEncode(input),
		}
	}
}

impl From<quick_xml::Error> for TagsmithError {
	fn from(input: quick_xml::Error) -> Self {
		Self {
			kind: ErrorKind::Xml(input),
		}
	}
}

impl From<std::io::Error> for TagsmithError {
	fn from(input: std::io::Error) -> Self {
		Self {
			kind: ErrorKind::Io(input),
		}
	}
}

impl From<std::fmt::Error> for TagsmithError {
	fn from(input: std::fmt::Error) -> Self {
		Self {
			kind: ErrorKind::Fmt(input),
		}
	}
}

impl From<std::string::FromUtf8Error> for TagsmithError {
	fn from(input: std::string::FromUtf8Error) -> Self {
		Self {
			kind: ErrorKind::StringFromUtf8(input),
		}
	}
}

impl From<std::str::Utf8Error> for TagsmithError {
	fn from(input: std::str::Utf8Error) -> Self {
		Self {
			kind: ErrorKind::StrFromUtf8(input),
		}
	}
}

impl From<std::collections::TryReserveError> for TagsmithError {
	fn from(input: TryReserveError) -> Self {
		Self {
			kind: ErrorKind::Alloc(input),
		}
	}
}

impl From<std::convert::Infallible> for TagsmithError {
	fn from(input: std::convert::Infallible) -> Self {
		Self {
			kind: ErrorKind::Infallible(input),
		}
	}
}

impl Display for TagsmithError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self.kind {
			// Conversions
			ErrorKind::Xml(ref err) => write!(f, "XML: {err}"),
			ErrorKind::StringFromUtf8(ref err) => write!(f, "{err}"),
			ErrorKind::StrFromUtf8(ref err) => write!(f, "{err}"),
			ErrorKind::Io(ref err) => write!(f, "{err}"),
			ErrorKind::Fmt(ref err) => write!(f, "{err}"),
			ErrorKind::Alloc(ref err) => write!(f, "{err}"),

			ErrorKind::InvalidArgument(message) => write!(f, "Invalid argument: {message}"),
			ErrorKind::OutOfRange {
				offset,
				length,
				available,
			} => write!(
				f,
				"Range {offset}..{} exceeds the {available} available bytes",
				offset.saturating_add(length)
			),
			ErrorKind::NotAPicture => write!(f, "Picture: Encountered invalid data"),
			ErrorKind::TextDecode(message) => write!(f, "Text decoding: {message}"),
			ErrorKind::TextEncode(message) => write!(f, "Text encoding: {message}"),

			// Data
			ErrorKind::TooMuchData => write!(
				f,
				"Attempted to read/write an abnormally large amount of data"
			),
			ErrorKind::SizeMismatch => write!(
				f,
				"Encountered an invalid item size, either too big or too small to be valid"
			),
			ErrorKind::CorruptData(ref corrupt_data_err) => write!(f, "{corrupt_data_err}"),

			ErrorKind::Infallible(_) => write!(f, "A expected condition was not upheld"),
		}
	}
}
