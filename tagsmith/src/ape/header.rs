use crate::ape::constants::{APE_HEADER_SIZE, APE_PREAMBLE, APE_VERSION};
use crate::byte_vector::{ByteSlice, ByteVector, Endianness};
use crate::error::Result;
use crate::macros::decode_err;

const FLAG_READ_ONLY: u32 = 1;
const FLAG_IS_HEADER: u32 = 1 << 29;
const FLAG_HAS_FOOTER: u32 = 1 << 30;
const FLAG_HAS_HEADER: u32 = 1 << 31;

/// An APE tag header or footer
///
/// Both share the same 32 byte layout, only the flags tell them apart.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ApeHeader {
	pub(crate) version: u32,
	pub(crate) size: u32,
	pub(crate) item_count: u32,
	pub(crate) flags: u32,
}

impl ApeHeader {
	pub(crate) fn new(items_size: u32, item_count: u32, read_only: bool) -> Self {
		let mut flags = FLAG_HAS_HEADER | FLAG_HAS_FOOTER;
		if read_only {
			flags |= FLAG_READ_ONLY;
		}

		Self {
			version: APE_VERSION,
			size: items_size + APE_HEADER_SIZE as u32,
			item_count,
			flags,
		}
	}

	/// Parse a header or footer from the start of `data`
	///
	/// # Errors
	///
	/// * `data` is shorter than 32 bytes
	/// * The preamble is not `APETAGEX`
	/// * The tag size is smaller than the footer itself
	pub fn parse(data: &[u8]) -> Result<Self> {
		if data.len() < APE_HEADER_SIZE || &data[..8] != APE_PREAMBLE {
			decode_err!(@BAIL Ape, "APE tag has no valid header or footer");
		}

		let version = data.read_u32(8, Endianness::Little)?;
		let size = data.read_u32(12, Endianness::Little)?;
		let item_count = data.read_u32(16, Endianness::Little)?;
		let flags = data.read_u32(20, Endianness::Little)?;

		if (size as usize) < APE_HEADER_SIZE {
			// If the size is < 32, something went wrong during encoding
			// The size includes the footer and all items
			decode_err!(@BAIL Ape, "APE tag has an invalid size (< 32)");
		}

		if version != APE_VERSION && version != 1000 {
			log::warn!("APE: Unknown tag version {version}, attempting to read anyway");
		}

		Ok(Self {
			version,
			size,
			item_count,
			flags,
		})
	}

	/// The tag version, 1000 for APEv1 and 2000 for APEv2
	pub fn version(&self) -> u32 {
		self.version
	}

	/// The size of all items plus the footer, this does **not** include the header
	pub fn tag_size(&self) -> u32 {
		self.size
	}

	/// The size of the items alone
	pub fn items_size(&self) -> u32 {
		self.size - APE_HEADER_SIZE as u32
	}

	/// The size of the entire tag, including the header if one is present
	pub fn total_size(&self) -> u64 {
		let mut size = u64::from(self.size);
		// APEv1 never has a header, whatever the flags say
		if self.version >= APE_VERSION && self.has_header() {
			size += APE_HEADER_SIZE as u64;
		}

		size
	}

	/// The number of items in the tag
	pub fn item_count(&self) -> u32 {
		self.item_count
	}

	/// Whether the entire tag is marked read only
	pub fn read_only(&self) -> bool {
		self.flags & FLAG_READ_ONLY == FLAG_READ_ONLY
	}

	/// Whether this is the header rather than the footer
	pub fn is_header(&self) -> bool {
		self.flags & FLAG_IS_HEADER == FLAG_IS_HEADER
	}

	/// Whether the tag claims to have a header
	pub fn has_header(&self) -> bool {
		self.flags & FLAG_HAS_HEADER == FLAG_HAS_HEADER
	}

	/// Whether the tag claims to have a footer
	pub fn has_footer(&self) -> bool {
		// Tags without a footer are an APEv2 extension, APEv1 always has one
		self.version < APE_VERSION || self.flags & FLAG_HAS_FOOTER == FLAG_HAS_FOOTER
	}

	pub(crate) fn render(&self, as_header: bool) -> ByteVector {
		let mut flags = self.flags;
		if as_header {
			flags |= FLAG_IS_HEADER;
		} else {
			flags &= !FLAG_IS_HEADER;
		}

		let mut out = ByteVector::new();
		out.push_bytes(APE_PREAMBLE);
		out.push_u32(self.version, Endianness::Little);
		out.push_u32(self.size, Endianness::Little);
		out.push_u32(self.item_count, Endianness::Little);
		out.push_u32(flags, Endianness::Little);
		// The header/footer must end in 8 bytes of zeros
		out.push_bytes(&[0; 8]);
		out
	}
}
