//! APEv2 tags
//!
//! An APE tag is a flat list of key/value items, framed by a 32 byte header and/or footer.
//! Items are one of three types, see [`ApeItemType`].
//!
//! ## Notes
//!
//! * Keys are case-insensitive when searching, but their case is preserved when rendering.
//! * Read-only items are kept as they were read when rendering with
//!   [`WriteOptions::respect_read_only`](crate::config::WriteOptions::respect_read_only).
pub(crate) mod constants;
pub(crate) mod header;
pub(crate) mod tag;

pub use crate::picture::APE_PICTURE_TYPES;
pub use header::ApeHeader;
pub use tag::ApeTag;
pub use tag::item::{ApeItem, ApeItemType, ApeItemValue};
