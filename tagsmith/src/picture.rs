//! Format-agnostic picture handling

use crate::error::Result;
use crate::macros::err;

use std::fmt::{Debug, Display, Formatter};

use data_encoding::BASE64;

/// Common picture item keys for APE
pub const APE_PICTURE_TYPES: [&str; 21] = [
	"Cover Art (Other)",
	"Cover Art (Png Icon)",
	"Cover Art (Icon)",
	"Cover Art (Front)",
	"Cover Art (Back)",
	"Cover Art (Leaflet)",
	"Cover Art (Media)",
	"Cover Art (Lead Artist)",
	"Cover Art (Artist)",
	"Cover Art (Conductor)",
	"Cover Art (Band)",
	"Cover Art (Composer)",
	"Cover Art (Lyricist)",
	"Cover Art (Recording Location)",
	"Cover Art (During Recording)",
	"Cover Art (During Performance)",
	"Cover Art (Video Capture)",
	"Cover Art (Fish)",
	"Cover Art (Illustration)",
	"Cover Art (Band Logotype)",
	"Cover Art (Publisher Logotype)",
];

/// MIME types for pictures.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum MimeType {
	/// PNG image
	Png,
	/// JPEG image
	Jpeg,
	/// TIFF image
	Tiff,
	/// BMP image
	Bmp,
	/// GIF image
	Gif,
	/// Some unknown MIME type
	Unknown(String),
}

impl MimeType {
	/// Get a `MimeType` from a string
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::picture::MimeType;
	///
	/// let jpeg_mimetype_str = "image/jpeg";
	/// assert_eq!(MimeType::from_str(jpeg_mimetype_str), MimeType::Jpeg);
	/// ```
	#[must_use]
	#[allow(clippy::should_implement_trait)] // Infallible in contrast to FromStr
	pub fn from_str(mime_type: &str) -> Self {
		match &*mime_type.to_lowercase() {
			"image/jpeg" | "image/jpg" => Self::Jpeg,
			"image/png" => Self::Png,
			"image/tiff" => Self::Tiff,
			"image/bmp" => Self::Bmp,
			"image/gif" => Self::Gif,
			_ => Self::Unknown(mime_type.to_owned()),
		}
	}

	/// Get a &str from a `MimeType`
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::picture::MimeType;
	///
	/// let jpeg_mimetype = MimeType::Jpeg;
	/// assert_eq!(jpeg_mimetype.as_str(), "image/jpeg")
	/// ```
	#[must_use]
	pub fn as_str(&self) -> &str {
		match self {
			MimeType::Jpeg => "image/jpeg",
			MimeType::Png => "image/png",
			MimeType::Tiff => "image/tiff",
			MimeType::Bmp => "image/bmp",
			MimeType::Gif => "image/gif",
			MimeType::Unknown(unknown) => unknown,
		}
	}

	/// Sniff the `MimeType` from the signature of `bytes`
	///
	/// # Errors
	///
	/// `bytes` does not start with a known image signature
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::picture::MimeType;
	///
	/// # fn main() -> tagsmith::error::Result<()> {
	/// assert_eq!(MimeType::from_signature(&[0xFF, 0xD8, 0xFF, 0xE0])?, MimeType::Jpeg);
	/// assert!(MimeType::from_signature(b"not an image").is_err());
	/// # Ok(()) }
	/// ```
	pub fn from_signature(bytes: &[u8]) -> Result<Self> {
		match bytes {
			[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Ok(MimeType::Png),
			[0xFF, 0xD8, ..] => Ok(MimeType::Jpeg),
			[b'G', b'I', b'F', 0x38, 0x37 | 0x39, b'a', ..] => Ok(MimeType::Gif),
			[b'B', b'M', ..] => Ok(MimeType::Bmp),
			[b'I', b'I', b'*', 0x00, ..] | [b'M', b'M', 0x00, b'*', ..] => Ok(MimeType::Tiff),
			_ => err!(NotAPicture),
		}
	}
}

impl Display for MimeType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// The picture type, according to ID3v2 APIC
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum PictureType {
	Other,
	Icon,
	OtherIcon,
	CoverFront,
	CoverBack,
	Leaflet,
	Media,
	LeadArtist,
	Artist,
	Conductor,
	Band,
	Composer,
	Lyricist,
	RecordingLocation,
	DuringRecording,
	DuringPerformance,
	ScreenCapture,
	BrightFish,
	Illustration,
	BandLogo,
	PublisherLogo,
	Undefined(u8),
}

impl PictureType {
	/// Get an APE item key from a `PictureType`
	pub fn as_ape_key(&self) -> Option<&'static str> {
		let index = match self {
			Self::Other => 0,
			Self::Icon => 1,
			Self::OtherIcon => 2,
			Self::CoverFront => 3,
			Self::CoverBack => 4,
			Self::Leaflet => 5,
			Self::Media => 6,
			Self::LeadArtist => 7,
			Self::Artist => 8,
			Self::Conductor => 9,
			Self::Band => 10,
			Self::Composer => 11,
			Self::Lyricist => 12,
			Self::RecordingLocation => 13,
			Self::DuringRecording => 14,
			Self::DuringPerformance => 15,
			Self::ScreenCapture => 16,
			Self::BrightFish => 17,
			Self::Illustration => 18,
			Self::BandLogo => 19,
			Self::PublisherLogo => 20,
			Self::Undefined(_) => return None,
		};

		Some(APE_PICTURE_TYPES[index])
	}

	/// Get a `PictureType` from an APE item key
	///
	/// The comparison is case-insensitive, like all APE keys.
	pub fn from_ape_key(key: &str) -> Self {
		let Some(index) = APE_PICTURE_TYPES
			.iter()
			.position(|ape_key| ape_key.eq_ignore_ascii_case(key))
		else {
			return Self::Undefined(0);
		};

		match index {
			0 => Self::Other,
			1 => Self::Icon,
			2 => Self::OtherIcon,
			3 => Self::CoverFront,
			4 => Self::CoverBack,
			5 => Self::Leaflet,
			6 => Self::Media,
			7 => Self::LeadArtist,
			8 => Self::Artist,
			9 => Self::Conductor,
			10 => Self::Band,
			11 => Self::Composer,
			12 => Self::Lyricist,
			13 => Self::RecordingLocation,
			14 => Self::DuringRecording,
			15 => Self::DuringPerformance,
			16 => Self::ScreenCapture,
			17 => Self::BrightFish,
			18 => Self::Illustration,
			19 => Self::BandLogo,
			_ => Self::PublisherLogo,
		}
	}
}

/// Represents a picture.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Picture {
	pub(crate) pic_type: PictureType,
	pub(crate) mime_type: Option<MimeType>,
	pub(crate) description: Option<String>,
	pub(crate) data: Vec<u8>,
}

impl Debug for Picture {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Picture")
			.field("pic_type", &self.pic_type)
			.field("mime_type", &self.mime_type)
			.field("description", &self.description)
			.field("data", &format!("<{} bytes>", self.data.len()))
			.finish()
	}
}

impl Picture {
	/// Create a [`Picture`] from raw image data
	///
	/// NOTE: `pic_type` will always be [`PictureType::Other`], be sure to change it accordingly if
	/// writing.
	///
	/// # Errors
	///
	/// `data` does not contain a supported format. See [`MimeType`] for valid formats
	pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
		let mime_type = MimeType::from_signature(&data)?;

		Ok(Self {
			pic_type: PictureType::Other,
			mime_type: Some(mime_type),
			description: None,
			data,
		})
	}

	/// Create a new `Picture` with no verification
	///
	/// This will **not** verify `data`'s signature.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::picture::{MimeType, Picture, PictureType};
	///
	/// let picture = Picture::unchecked(
	/// 	PictureType::Band,
	/// 	Some(MimeType::Jpeg),
	/// 	Some(String::from("The band on stage")),
	/// 	vec![0xFF, 0xD8, 0xFF, 0xD9],
	/// );
	/// assert_eq!(picture.description(), Some("The band on stage"));
	/// ```
	pub fn unchecked(
		pic_type: PictureType,
		mime_type: Option<MimeType>,
		description: Option<String>,
		data: Vec<u8>,
	) -> Self {
		Self {
			pic_type,
			mime_type,
			description,
			data,
		}
	}

	/// Returns the [`PictureType`]
	pub fn pic_type(&self) -> PictureType {
		self.pic_type
	}

	/// Sets the [`PictureType`]
	pub fn set_pic_type(&mut self, pic_type: PictureType) {
		self.pic_type = pic_type
	}

	/// Returns the [`MimeType`]
	pub fn mime_type(&self) -> Option<&MimeType> {
		self.mime_type.as_ref()
	}

	/// Returns the description
	pub fn description(&self) -> Option<&str> {
		self.description.as_deref()
	}

	/// Sets the description
	pub fn set_description(&mut self, description: Option<String>) {
		self.description = description;
	}

	/// Returns the [`Picture`] data as borrowed bytes.
	pub fn data(&self) -> &[u8] {
		&self.data
	}

	/// Consumes a [`Picture`], returning the data as [`Vec`] without clones or allocation.
	pub fn into_data(self) -> Vec<u8> {
		self.data
	}

	/// Convert a [`Picture`] to an APE Cover Art byte vec:
	///
	/// NOTE: This is only the picture data and description, a
	/// key and terminating null byte will not be prepended.
	/// To map a [`PictureType`] to an APE key see [`PictureType::as_ape_key`]
	pub fn as_ape_bytes(&self) -> Vec<u8> {
		let mut data: Vec<u8> = Vec::new();

		if let Some(desc) = &self.description {
			data.extend(desc.as_bytes());
		}

		data.push(0);
		data.extend(self.data.iter());

		data
	}

	/// Get a [`Picture`] from an APEv2 binary item:
	///
	/// NOTE: This function expects `bytes` to contain *only* the APE item data
	///
	/// # Errors
	///
	/// This function will return [`NotAPicture`](crate::error::ErrorKind::NotAPicture)
	/// if at any point it's unable to parse the data
	pub fn from_ape_bytes(key: &str, bytes: &[u8]) -> Result<Self> {
		let Some(description_end) = bytes.iter().position(|b| *b == 0) else {
			err!(NotAPicture);
		};

		let description = String::from_utf8_lossy(&bytes[..description_end]).into_owned();
		let data = &bytes[description_end + 1..];

		let mime_type = MimeType::from_signature(data)?;

		Ok(Picture {
			pic_type: PictureType::from_ape_key(key),
			mime_type: Some(mime_type),
			description: (!description.is_empty()).then_some(description),
			data: data.to_vec(),
		})
	}

	/// Encode the picture data as base64 ([RFC 4648 §4](http://www.faqs.org/rfcs/rfc4648.html))
	///
	/// This is the representation used by XMP thumbnails.
	pub fn as_base64(&self) -> String {
		BASE64.encode(&self.data)
	}

	/// Decode a base64 encoded picture
	///
	/// Whitespace is ignored, XMP writers commonly wrap the encoded data across multiple lines.
	///
	/// # Errors
	///
	/// * `encoded` is not valid base64
	/// * The decoded data is not a supported image format
	pub fn from_base64(encoded: &str) -> Result<Self> {
		let stripped = encoded
			.bytes()
			.filter(|b| !b.is_ascii_whitespace())
			.collect::<Vec<u8>>();

		let Ok(data) = BASE64.decode(&stripped) else {
			err!(NotAPicture);
		};

		Self::from_bytes(data)
	}
}
