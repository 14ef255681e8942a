//! Exif/TIFF image file directories
//!
//! A TIFF stream starts with an 8 byte header (`II*\0` or `MM\0*`, followed by the offset of the
//! first directory). Each directory is a table of 12 byte entries:
//!
//! ```text
//! [u16 tag][u16 type][u32 count][u32 value or offset]
//! ```
//!
//! Values of up to 4 bytes are stored in the entry itself, anything larger is stored elsewhere
//! in the stream. Directories form a chain through their trailing "next IFD" offset, and some
//! entries point to nested directory chains, such as the Exif and GPS IFDs.
//!
//! ## Notes
//!
//! * Entries with an unknown type are kept as [`IfdEntry::Opaque`]
//! * A directory offset seen twice is corrupt, see [`IfdReader`]
mod entry;
mod read;
mod structure;
mod tag;
mod tags;
mod write;

pub use entry::{IfdEntry, IfdEntryType, Rational, SRational};
pub use read::IfdReader;
pub use structure::IfdStructure;
pub use tag::IfdTag;
pub use tags::{ExifEntryTag, GpsEntryTag, IfdEntryTag};
pub use write::IfdRenderer;

pub(crate) const TIFF_HEADER_SIZE: usize = 8;
pub(crate) const TIFF_MAGIC: u16 = 42;
pub(crate) const IFD_ENTRY_SIZE: usize = 12;
