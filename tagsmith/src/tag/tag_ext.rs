use crate::config::WriteOptions;
use crate::error::Result;
use crate::tag::{Accessor, TagProperty, TagType};

use std::any::Any;
use std::io::Write;

/// A set of common methods between tags
///
/// This provides a set of methods to make interaction with all tags a similar
/// experience. The trait is object safe, [`CombinedTag`](crate::tag::CombinedTag) stores its
/// tags as `Box<dyn TagExt>`.
pub trait TagExt: Accessor + Any + private::Sealed {
	/// The format of the tag
	fn tag_type(&self) -> TagType;

	/// Whether the tag can store `property`
	///
	/// Setters for unsupported properties are no-ops.
	///
	/// # Example
	///
	/// ```rust
	/// use tagsmith::ape::ApeTag;
	/// use tagsmith::tag::{TagExt, TagProperty};
	///
	/// let tag = ApeTag::new();
	/// assert!(tag.supports(TagProperty::Album));
	/// assert!(!tag.supports(TagProperty::FocalLength));
	/// ```
	fn supports(&self, property: TagProperty) -> bool {
		self.tag_type().supports(property)
	}

	/// Returns the number of items in the tag
	///
	/// This will also include any extras, such as pictures.
	///
	/// # Example
	///
	/// ```rust
	/// use tagsmith::ape::ApeTag;
	/// use tagsmith::tag::{Accessor, TagExt};
	///
	/// let mut tag = ApeTag::new();
	/// assert_eq!(tag.len(), 0);
	///
	/// tag.set_title(String::from("Foo title"));
	/// assert_eq!(tag.len(), 1);
	/// ```
	fn len(&self) -> usize;

	/// Whether the tag has any items
	fn is_empty(&self) -> bool;

	/// Clear the tag, removing all items
	///
	/// NOTE: This will **not** remove any format-specific extras, such as flags
	fn clear(&mut self);

	/// Render the tag to a freshly allocated buffer
	///
	/// An empty tag renders to an empty buffer.
	///
	/// # Errors
	///
	/// The tag contains data that cannot be encoded in its format
	fn render(&mut self, write_options: WriteOptions) -> Result<Vec<u8>>;

	/// Dump the tag to a writer
	///
	/// This will only write the tag, it will not produce a usable file.
	///
	/// # Errors
	///
	/// * See [`TagExt::render`]
	/// * Writing to `writer` fails
	fn dump_to(&mut self, writer: &mut dyn Write, write_options: WriteOptions) -> Result<()> {
		let rendered = self.render(write_options)?;
		writer.write_all(&rendered)?;
		Ok(())
	}

	#[doc(hidden)]
	fn as_any(&self) -> &dyn Any;

	#[doc(hidden)]
	fn as_any_mut(&mut self) -> &mut dyn Any;
}

// https://rust-lang.github.io/api-guidelines/future-proofing.html#c-sealed
mod private {
	use crate::ape::ApeTag;
	use crate::ifd::IfdTag;
	use crate::xmp::XmpTag;

	pub trait Sealed {}

	impl Sealed for ApeTag {}
	impl Sealed for IfdTag {}
	impl Sealed for XmpTag {}
}
