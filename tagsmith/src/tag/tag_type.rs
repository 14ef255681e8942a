use crate::tag::TagProperty;

use bitflags::bitflags;

/// The tag's format
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum TagType {
	/// This covers both APEv1 and APEv2, APEv1 tags are upgraded when written
	Ape,
	/// A TIFF-style image file directory, as found in EXIF blocks
	TiffIfd,
	/// An XMP packet
	Xmp,
}

bitflags! {
	/// A set of [`TagType`]s
	///
	/// Used to describe which formats a [`CombinedTag`](crate::tag::CombinedTag) holds.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct TagTypes: u32 {
		/// See [`TagType::Ape`]
		const APE = 1 << 0;
		/// See [`TagType::TiffIfd`]
		const TIFF_IFD = 1 << 1;
		/// See [`TagType::Xmp`]
		const XMP = 1 << 2;
	}
}

impl TagType {
	/// The [`TagTypes`] flag for this type
	pub fn as_flag(self) -> TagTypes {
		match self {
			TagType::Ape => TagTypes::APE,
			TagType::TiffIfd => TagTypes::TIFF_IFD,
			TagType::Xmp => TagTypes::XMP,
		}
	}

	/// Whether tags of this type can store `property`
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::tag::{TagProperty, TagType};
	///
	/// assert!(TagType::Ape.supports(TagProperty::Title));
	/// assert!(!TagType::Ape.supports(TagProperty::ExposureTime));
	/// assert!(TagType::TiffIfd.supports(TagProperty::ExposureTime));
	/// ```
	pub fn supports(self, property: TagProperty) -> bool {
		use TagProperty as P;

		match self {
			TagType::Ape => matches!(
				property,
				P::Title
					| P::Album | P::Comment
					| P::Copyright | P::Conductor
					| P::Grouping | P::Lyrics
					| P::Performers | P::AlbumArtists
					| P::Composers | P::Genres
					| P::Track | P::TrackTotal
					| P::Disk | P::DiskTotal
					| P::Year | P::BeatsPerMinute
					| P::Pictures
			),
			TagType::TiffIfd => matches!(
				property,
				P::Title
					| P::Comment | P::Copyright
					| P::Creator | P::Software
					| P::Make | P::Model
					| P::DateTime | P::Orientation
					| P::Rating | P::Keywords
					| P::ExposureTime | P::FNumber
					| P::FocalLength | P::IsoSpeed
			),
			TagType::Xmp => matches!(
				property,
				P::Title
					| P::Album | P::Comment
					| P::Copyright | P::Lyrics
					| P::Creator | P::Software
					| P::Make | P::Model
					| P::DateTime | P::Performers
					| P::AlbumArtists | P::Composers
					| P::Genres | P::Keywords
					| P::Pictures | P::Track
					| P::Rating | P::IsoSpeed
					| P::Orientation | P::ExposureTime
					| P::FNumber | P::FocalLength
			),
		}
	}
}

impl From<TagType> for TagTypes {
	fn from(tag_type: TagType) -> Self {
		tag_type.as_flag()
	}
}

#[cfg(test)]
mod tests {
	use super::{TagType, TagTypes};
	use crate::tag::TagProperty;

	#[test_log::test]
	fn flags() {
		let types = TagTypes::from(TagType::Ape) | TagType::Xmp.as_flag();
		assert!(types.contains(TagTypes::APE));
		assert!(types.contains(TagTypes::XMP));
		assert!(!types.contains(TagTypes::TIFF_IFD));
	}

	#[test_log::test]
	fn every_property_has_a_home() {
		let properties = [
			TagProperty::Conductor,
			TagProperty::Grouping,
			TagProperty::DiskTotal,
			TagProperty::BeatsPerMinute,
			TagProperty::Year,
			TagProperty::FNumber,
			TagProperty::DateTime,
		];

		for property in properties {
			assert!(
				[TagType::Ape, TagType::TiffIfd, TagType::Xmp]
					.iter()
					.any(|t| t.supports(property)),
				"{property:?}"
			);
		}
	}
}
