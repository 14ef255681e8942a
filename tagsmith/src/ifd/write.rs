use super::entry::IfdEntry;
use super::structure::IfdStructure;
use super::{IFD_ENTRY_SIZE, TIFF_MAGIC};
use crate::byte_vector::{ByteVector, Endianness};
use crate::error::Result;
use crate::macros::err;

/// Renders an [`IfdStructure`] to TIFF data
///
/// The output starts with an 8 byte TIFF header. Each directory is followed by its out of line
/// values, and then by the directories of its sub-IFDs.
///
/// # Examples
///
/// ```rust
/// use tagsmith::byte_vector::Endianness;
/// use tagsmith::config::ParseOptions;
/// use tagsmith::ifd::{IfdEntry, IfdEntryTag, IfdReader, IfdRenderer, IfdStructure};
///
/// # fn main() -> tagsmith::error::Result<()> {
/// let mut structure = IfdStructure::new();
/// structure.set_entry(0, IfdEntryTag::SOFTWARE, IfdEntry::Ascii(String::from("tagsmith")));
///
/// let data = IfdRenderer::new(Endianness::Little).render(&structure)?;
/// assert_eq!(&data[..4], b"II*\0");
///
/// let read = IfdReader::new(&data, ParseOptions::new())?.read()?;
/// assert_eq!(read, structure);
/// # Ok(()) }
/// ```
#[derive(Copy, Clone, Debug)]
pub struct IfdRenderer {
	endianness: Endianness,
}

impl IfdRenderer {
	/// Create a new `IfdRenderer`
	pub fn new(endianness: Endianness) -> Self {
		Self { endianness }
	}

	/// Render `structure`, including the TIFF header
	///
	/// # Errors
	///
	/// * A directory has more than `u16::MAX` entries
	/// * The output exceeds the 4GB addressable by TIFF offsets
	pub fn render(&self, structure: &IfdStructure) -> Result<Vec<u8>> {
		let mut out = ByteVector::new();
		match self.endianness {
			Endianness::Little => out.push_bytes(b"II"),
			Endianness::Big => out.push_bytes(b"MM"),
		}
		out.push_u16(TIFF_MAGIC, self.endianness);
		out.push_u32(0, self.endianness);

		let first_offset = self.render_chain(structure, &mut out)?;
		out.overwrite(4, &first_offset.to_bytes(self.endianness))?;

		log::debug!(
			"IFD: Rendered {} directories, {} bytes",
			structure.directory_count(),
			out.len()
		);

		Ok(out.into_inner())
	}

	// Appends every directory of the chain, returning the offset of the first one
	fn render_chain(&self, structure: &IfdStructure, out: &mut ByteVector) -> Result<u32> {
		let mut first_offset = 0;
		let mut previous_next_pos = None;

		for directory in &structure.directories {
			out.align(2);
			let offset = current_offset(out)?;

			match previous_next_pos {
				Some(pos) => out.overwrite(pos, &offset.to_bytes(self.endianness))?,
				None => first_offset = offset,
			}

			let Ok(entry_count) = u16::try_from(directory.len()) else {
				err!(TooMuchData);
			};

			out.push_u16(entry_count, self.endianness);
			let table_start = out.len();
			out.extend(std::iter::repeat_n(0, directory.len() * IFD_ENTRY_SIZE + 4));
			let next_pos = out.len() - 4;

			let mut sub_ifds = Vec::new();
			for (index, (tag, entry)) in directory.iter().enumerate() {
				let entry_pos = table_start + index * IFD_ENTRY_SIZE;
				let Ok(count) = u32::try_from(entry.count()) else {
					err!(TooMuchData);
				};

				let mut entry_bytes = ByteVector::with_capacity(IFD_ENTRY_SIZE)?;
				entry_bytes.push_u16(*tag, self.endianness);
				entry_bytes.push_u16(entry.type_code(), self.endianness);
				entry_bytes.push_u32(count, self.endianness);

				if let IfdEntry::SubIfd { structure, .. } = entry {
					sub_ifds.push((entry_pos + 8, structure));
					entry_bytes.push_u32(0, self.endianness);
				} else {
					let value = entry.encode(self.endianness)?;
					if value.len() <= 4 {
						entry_bytes.push_bytes(&value);
						entry_bytes.extend(std::iter::repeat_n(0, 4 - value.len()));
					} else {
						out.align(2);
						entry_bytes.push_u32(current_offset(out)?, self.endianness);
						out.push_bytes(&value);
					}
				}

				out.overwrite(entry_pos, &entry_bytes)?;
			}

			for (pos, sub_structure) in sub_ifds {
				let sub_offset = self.render_chain(sub_structure, out)?;
				out.overwrite(pos, &sub_offset.to_bytes(self.endianness))?;
			}

			previous_next_pos = Some(next_pos);
		}

		Ok(first_offset)
	}
}

fn current_offset(out: &ByteVector) -> Result<u32> {
	match u32::try_from(out.len()) {
		Ok(offset) => Ok(offset),
		Err(_) => err!(TooMuchData),
	}
}

trait ToBytes {
	fn to_bytes(self, endianness: Endianness) -> [u8; 4];
}

impl ToBytes for u32 {
	fn to_bytes(self, endianness: Endianness) -> [u8; 4] {
		match endianness {
			Endianness::Big => self.to_be_bytes(),
			Endianness::Little => self.to_le_bytes(),
		}
	}
}
