//! Utilities for generic tag handling
//!
//! Every format specific tag implements [`Accessor`] and [`TagExt`]. [`CombinedTag`] layers
//! several of them into one logical tag.

mod accessor;
mod tag_ext;
mod tag_type;
pub(crate) mod utils;

use crate::picture::Picture;

use std::borrow::Cow;
use std::fmt::{Debug, Formatter};

// Exports
pub use accessor::{Accessor, TagProperty};
pub use tag_ext::TagExt;
pub use tag_type::{TagType, TagTypes};

// A value counts as absent in a `CombinedTag` read if it is empty
trait IsEmptyValue {
	fn is_empty_value(&self) -> bool;
}

impl IsEmptyValue for Cow<'_, str> {
	fn is_empty_value(&self) -> bool {
		self.is_empty()
	}
}

impl<T> IsEmptyValue for Vec<T> {
	fn is_empty_value(&self) -> bool {
		self.is_empty()
	}
}

impl IsEmptyValue for u32 {
	fn is_empty_value(&self) -> bool {
		false
	}
}

impl IsEmptyValue for u16 {
	fn is_empty_value(&self) -> bool {
		false
	}
}

impl IsEmptyValue for f64 {
	fn is_empty_value(&self) -> bool {
		self.is_nan()
	}
}

macro_rules! impl_combined_accessor {
	($($property:ident => [$name:tt $($other:tt)*] < $ret_ty:ty, $owned_ty:ty >),+ $(,)?) => {
		paste::paste! {
			impl Accessor for CombinedTag {
				$(
					fn [<$name $(_ $other)*>](&self) -> Option<$ret_ty> {
						self.tags
							.iter()
							.find_map(|tag| tag.[<$name $(_ $other)*>]().filter(|value| !value.is_empty_value()))
					}

					#[allow(clippy::clone_on_copy)]
					fn [<set_ $name $(_ $other)*>](&mut self, value: $owned_ty) {
						for tag in self.supporting_mut(TagProperty::$property) {
							tag.[<set_ $name $(_ $other)*>](value.clone());
						}
					}

					fn [<remove_ $name $(_ $other)*>](&mut self) {
						for tag in self.supporting_mut(TagProperty::$property) {
							tag.[<remove_ $name $(_ $other)*>]();
						}
					}
				)+
			}
		}
	};
}

/// Several format specific tags presented as one
///
/// Tags are kept in priority order, with at most one tag per [`TagType`].
///
/// * Reads return the first value that is present and non-empty, in priority order. When no tag
///   holds a value, the read returns `None` rather than an empty or zero value, the same as any
///   other [`Accessor`].
/// * Writes and removals go to every tag that [supports](TagExt::supports) the property, the rest
///   are left untouched.
///
/// # Examples
///
/// ```rust
/// use tagsmith::ape::ApeTag;
/// use tagsmith::tag::{Accessor, CombinedTag, TagTypes};
/// use tagsmith::xmp::XmpTag;
///
/// let mut ape = ApeTag::new();
/// ape.set_title(String::from("From APE"));
///
/// let mut combined = CombinedTag::new();
/// combined.push_tag(Box::new(XmpTag::new()));
/// combined.push_tag(Box::new(ape));
/// assert_eq!(combined.tag_types(), TagTypes::XMP | TagTypes::APE);
///
/// // The XMP tag has no title, so the APE title is used
/// assert_eq!(combined.title().as_deref(), Some("From APE"));
///
/// combined.set_title(String::from("Everywhere"));
/// assert_eq!(combined.tag::<XmpTag>().unwrap().title().as_deref(), Some("Everywhere"));
/// ```
#[derive(Default)]
pub struct CombinedTag {
	tags: Vec<Box<dyn TagExt>>,
}

impl Debug for CombinedTag {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CombinedTag")
			.field("tag_types", &self.tag_types())
			.finish()
	}
}

impl CombinedTag {
	/// Create an empty `CombinedTag`
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a `CombinedTag` from tags in priority order
	///
	/// Later tags replace earlier tags of the same [`TagType`].
	pub fn from_tags(tags: impl IntoIterator<Item = Box<dyn TagExt>>) -> Self {
		let mut combined = Self::new();
		for tag in tags {
			combined.push_tag(tag);
		}

		combined
	}

	/// The formats present
	pub fn tag_types(&self) -> TagTypes {
		self.tags
			.iter()
			.fold(TagTypes::empty(), |types, tag| types | tag.tag_type().as_flag())
	}

	/// Append a tag with the lowest priority
	///
	/// If a tag of the same [`TagType`] exists, it is replaced in place (keeping its priority) and
	/// returned.
	pub fn push_tag(&mut self, tag: Box<dyn TagExt>) -> Option<Box<dyn TagExt>> {
		let tag_type = tag.tag_type();
		match self.tags.iter_mut().find(|t| t.tag_type() == tag_type) {
			Some(existing) => Some(std::mem::replace(existing, tag)),
			None => {
				self.tags.push(tag);
				None
			},
		}
	}

	/// Remove the tag of `tag_type`, if present
	pub fn remove_tag_type(&mut self, tag_type: TagType) -> Option<Box<dyn TagExt>> {
		let pos = self.tags.iter().position(|t| t.tag_type() == tag_type)?;
		Some(self.tags.remove(pos))
	}

	/// The contained tags, in priority order
	pub fn tags(&self) -> impl Iterator<Item = &(dyn TagExt + 'static)> {
		self.tags.iter().map(|t| &**t)
	}

	/// The contained tags, in priority order
	pub fn tags_mut(&mut self) -> impl Iterator<Item = &mut (dyn TagExt + 'static)> {
		self.tags.iter_mut().map(|t| &mut **t)
	}

	/// Get the tag of concrete type `T`
	pub fn tag<T: TagExt>(&self) -> Option<&T> {
		self.tags.iter().find_map(|t| t.as_any().downcast_ref::<T>())
	}

	/// Get the tag of concrete type `T` mutably
	pub fn tag_mut<T: TagExt>(&mut self) -> Option<&mut T> {
		self.tags
			.iter_mut()
			.find_map(|t| t.as_any_mut().downcast_mut::<T>())
	}

	/// The number of contained tags
	pub fn len(&self) -> usize {
		self.tags.len()
	}

	/// Whether every contained tag is empty
	///
	/// This is also `true` when there are no tags at all.
	pub fn is_empty(&self) -> bool {
		self.tags.iter().all(|t| t.is_empty())
	}

	/// Clear every contained tag
	///
	/// The tags themselves remain, see [`CombinedTag::remove_tag_type`].
	pub fn clear(&mut self) {
		for tag in &mut self.tags {
			tag.clear();
		}
	}

	fn supporting_mut(&mut self, property: TagProperty) -> impl Iterator<Item = &mut Box<dyn TagExt>> {
		self.tags.iter_mut().filter(move |t| t.supports(property))
	}
}

impl_combined_accessor! {
	Title          => [title           ]<Cow<'_, str>, String>,
	Album          => [album           ]<Cow<'_, str>, String>,
	Comment        => [comment         ]<Cow<'_, str>, String>,
	Copyright      => [copyright       ]<Cow<'_, str>, String>,
	Conductor      => [conductor       ]<Cow<'_, str>, String>,
	Grouping       => [grouping        ]<Cow<'_, str>, String>,
	Lyrics         => [lyrics          ]<Cow<'_, str>, String>,
	Creator        => [creator         ]<Cow<'_, str>, String>,
	Software       => [software        ]<Cow<'_, str>, String>,
	Make           => [make            ]<Cow<'_, str>, String>,
	Model          => [model           ]<Cow<'_, str>, String>,
	DateTime       => [date time       ]<Cow<'_, str>, String>,
	Performers     => [performers      ]<Vec<String>, Vec<String>>,
	AlbumArtists   => [album artists   ]<Vec<String>, Vec<String>>,
	Composers      => [composers       ]<Vec<String>, Vec<String>>,
	Genres         => [genres          ]<Vec<String>, Vec<String>>,
	Keywords       => [keywords        ]<Vec<String>, Vec<String>>,
	Pictures       => [pictures        ]<Vec<Picture>, Vec<Picture>>,
	Track          => [track           ]<u32, u32>,
	TrackTotal     => [track total     ]<u32, u32>,
	Disk           => [disk            ]<u32, u32>,
	DiskTotal      => [disk total      ]<u32, u32>,
	Year           => [year            ]<u32, u32>,
	BeatsPerMinute => [beats per minute]<u32, u32>,
	Rating         => [rating          ]<u32, u32>,
	IsoSpeed       => [iso speed       ]<u32, u32>,
	Orientation    => [orientation     ]<u16, u16>,
	ExposureTime   => [exposure time   ]<f64, f64>,
	FNumber        => [f number        ]<f64, f64>,
	FocalLength    => [focal length    ]<f64, f64>,
}
