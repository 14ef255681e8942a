//! Well known entry tags
//!
//! Only the tags used by [`IfdTag`](crate::ifd::IfdTag)'s accessors and the directory pointers
//! are listed. Any other tag number can still be read and written through
//! [`IfdStructure`](crate::ifd::IfdStructure).

/// Tags of the main image directories
#[derive(Copy, Clone, Debug)]
pub struct IfdEntryTag;

impl IfdEntryTag {
	/// A description of the image
	pub const IMAGE_DESCRIPTION: u16 = 0x010E;
	/// The manufacturer of the recording equipment
	pub const MAKE: u16 = 0x010F;
	/// The model of the recording equipment
	pub const MODEL: u16 = 0x0110;
	/// The orientation of the image, `1..=8`
	pub const ORIENTATION: u16 = 0x0112;
	/// The software used to create the image
	pub const SOFTWARE: u16 = 0x0131;
	/// The modification date, formatted `YYYY:MM:DD HH:MM:SS`
	pub const DATE_TIME: u16 = 0x0132;
	/// The creator of the image
	pub const ARTIST: u16 = 0x013B;
	/// The copyright notice
	pub const COPYRIGHT: u16 = 0x8298;
	/// The offset of the Exif IFD
	pub const EXIF_IFD: u16 = 0x8769;
	/// The offset of the GPS IFD
	pub const GPS_IFD: u16 = 0x8825;
	/// A rating of the image, `0..=5`
	pub const RATING: u16 = 0x4746;
	/// The title, as UCS-2 little endian bytes
	pub const XP_TITLE: u16 = 0x9C9B;
	/// A comment, as UCS-2 little endian bytes
	pub const XP_COMMENT: u16 = 0x9C9C;
	/// The author, as UCS-2 little endian bytes
	pub const XP_AUTHOR: u16 = 0x9C9D;
	/// Keywords separated by `;`, as UCS-2 little endian bytes
	pub const XP_KEYWORDS: u16 = 0x9C9E;
	/// The subject, as UCS-2 little endian bytes
	pub const XP_SUBJECT: u16 = 0x9C9F;
}

/// Tags of the Exif IFD
#[derive(Copy, Clone, Debug)]
pub struct ExifEntryTag;

impl ExifEntryTag {
	/// The exposure time, in seconds
	pub const EXPOSURE_TIME: u16 = 0x829A;
	/// The f-number
	pub const F_NUMBER: u16 = 0x829D;
	/// The ISO speed
	pub const ISO_SPEED_RATINGS: u16 = 0x8827;
	/// The Exif version, as four ASCII digits
	pub const EXIF_VERSION: u16 = 0x9000;
	/// The date the image was captured
	pub const DATE_TIME_ORIGINAL: u16 = 0x9003;
	/// The date the image was digitized
	pub const DATE_TIME_DIGITIZED: u16 = 0x9004;
	/// The focal length of the lens, in millimeters
	pub const FOCAL_LENGTH: u16 = 0x920A;
	/// Maker specific data
	pub const MAKER_NOTE: u16 = 0x927C;
	/// A comment prefixed with an 8 byte character code
	pub const USER_COMMENT: u16 = 0x9286;
	/// The offset of the Interoperability IFD
	pub const INTEROPERABILITY_IFD: u16 = 0xA005;
	/// The name of the lens
	pub const LENS_MODEL: u16 = 0xA434;
}

/// Tags of the GPS IFD
#[derive(Copy, Clone, Debug)]
pub struct GpsEntryTag;

impl GpsEntryTag {
	/// The version of the GPS IFD
	pub const VERSION_ID: u16 = 0x0000;
	/// `N` or `S`
	pub const LATITUDE_REF: u16 = 0x0001;
	/// Degrees, minutes, and seconds
	pub const LATITUDE: u16 = 0x0002;
	/// `E` or `W`
	pub const LONGITUDE_REF: u16 = 0x0003;
	/// Degrees, minutes, and seconds
	pub const LONGITUDE: u16 = 0x0004;
	/// The altitude reference, `0` is above sea level
	pub const ALTITUDE_REF: u16 = 0x0005;
	/// The altitude, in meters
	pub const ALTITUDE: u16 = 0x0006;
}

// Entries whose value is the offset of a nested directory chain
pub(crate) const SUB_IFD_TAGS: [u16; 3] = [
	IfdEntryTag::EXIF_IFD,
	IfdEntryTag::GPS_IFD,
	ExifEntryTag::INTEROPERABILITY_IFD,
];
