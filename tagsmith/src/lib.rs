//! Read, modify, and write embedded metadata tags.
//!
//! Tagsmith works on tag blocks, not on whole files. A container reader locates a tag inside a
//! file and hands its bytes over; the matching codec turns them into a mutable tag object, which
//! renders back to bytes when saving.
//!
//! # Supported Formats
//!
//! | Format   | Type                        | Encoding                                |
//! |----------|-----------------------------|-----------------------------------------|
//! | APEv2    | [`ApeTag`](ape::ApeTag)     | Flat key/value items                    |
//! | Exif     | [`IfdTag`](ifd::IfdTag)     | TIFF image file directories             |
//! | XMP      | [`XmpTag`](xmp::XmpTag)     | RDF/XML property trees                  |
//!
//! # Examples
//!
//! ## Parsing a tag
//!
//! ```rust
//! # fn main() -> tagsmith::error::Result<()> {
//! use tagsmith::ape::ApeTag;
//! use tagsmith::config::{ParseOptions, WriteOptions};
//! use tagsmith::prelude::*;
//!
//! # let mut tag = ApeTag::new();
//! # tag.set_title(String::from("Foo title"));
//! # let bytes = tag.render(WriteOptions::default())?;
//! // `bytes` holds an APE tag, as found at the end of an MP3 file
//! let mut tag = ApeTag::parse(&bytes, ParseOptions::new())?;
//! assert_eq!(tag.title().as_deref(), Some("Foo title"));
//!
//! tag.set_performers(vec![String::from("Foo artist"), String::from("Bar artist")]);
//! let bytes = tag.render(WriteOptions::default())?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Combining tags
//!
//! Files often carry more than one tag. A [`CombinedTag`](tag::CombinedTag) presents them as one:
//! reads go to the first tag with a value, writes go to every tag able to store it.
//!
//! ```rust
//! # fn main() -> tagsmith::error::Result<()> {
//! use tagsmith::ifd::IfdTag;
//! use tagsmith::prelude::*;
//! use tagsmith::tag::CombinedTag;
//! use tagsmith::xmp::XmpTag;
//!
//! let mut combined = CombinedTag::new();
//! combined.push_tag(Box::new(XmpTag::new()));
//! combined.push_tag(Box::new(IfdTag::new()));
//!
//! combined.set_make(String::from("Canon"));
//! combined.set_exposure_time(0.008);
//!
//! let exif = combined.tag::<IfdTag>().unwrap();
//! assert_eq!(exif.make().as_deref(), Some("Canon"));
//!
//! let xmp = combined.tag::<XmpTag>().unwrap();
//! assert_eq!(xmp.exposure_time(), Some(0.008));
//! # Ok(())
//! # }
//! ```
//!
//! # Important format-specific notes
//!
//! All formats have their own quirks that may produce unexpected results between conversions.
//! Be sure to read the module documentation of each format to see important notes and warnings.
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod byte_vector;
pub mod config;
pub mod error;
pub(crate) mod macros;
pub mod picture;
pub mod tag;
mod util;

pub mod ape;
pub mod ifd;
pub mod xmp;

pub use util::text::TextEncoding;

pub use util::io;

pub mod prelude {
	//! A prelude for commonly used items in the library.
	//!
	//! This module is intended to be wildcard imported.
	//!
	//! ```rust
	//! use tagsmith::prelude::*;
	//! ```

	pub use crate::tag::{Accessor, TagExt};
}
