use super::entry::{IfdEntry, IfdEntryType};
use super::structure::IfdStructure;
use super::tags::SUB_IFD_TAGS;
use super::{IFD_ENTRY_SIZE, TIFF_HEADER_SIZE, TIFF_MAGIC};
use crate::byte_vector::{ByteSlice, Endianness};
use crate::config::ParseOptions;
use crate::error::Result;
use crate::macros::{decode_err, parse_mode_choice};

use std::collections::{BTreeMap, HashSet};

/// Reads an [`IfdStructure`] from TIFF data
///
/// All offsets are relative to the start of the TIFF header. Every directory offset is
/// remembered, so a chain or sub-IFD pointing back at a directory that was already read is
/// reported as corrupt instead of looping forever.
///
/// # Examples
///
/// ```rust
/// use tagsmith::config::ParseOptions;
/// use tagsmith::ifd::{IfdEntryTag, IfdReader};
///
/// # fn main() -> tagsmith::error::Result<()> {
/// // An empty little endian file
/// let data = [b'I', b'I', 42, 0, 8, 0, 0, 0, 0, 0, 0, 0, 0, 0];
///
/// let structure = IfdReader::new(&data, ParseOptions::new())?.read()?;
/// assert_eq!(structure.directory_count(), 1);
/// assert!(structure.get_entry(0, IfdEntryTag::MAKE).is_none());
/// # Ok(()) }
/// ```
pub struct IfdReader<'a> {
	data: &'a [u8],
	endianness: Endianness,
	first_offset: u32,
	parse_options: ParseOptions,
	visited: HashSet<u32>,
}

impl<'a> IfdReader<'a> {
	/// Create a new `IfdReader`, validating the TIFF header
	///
	/// # Errors
	///
	/// `data` does not start with a little (`II*\0`) or big (`MM\0*`) endian TIFF header
	pub fn new(data: &'a [u8], parse_options: ParseOptions) -> Result<Self> {
		if data.len() < TIFF_HEADER_SIZE {
			decode_err!(@BAIL TiffIfd, "Not enough data for a TIFF header");
		}

		let endianness = match &data[..2] {
			b"II" => Endianness::Little,
			b"MM" => Endianness::Big,
			_ => decode_err!(@BAIL TiffIfd, "Invalid TIFF byte order mark"),
		};

		if data.read_u16(2, endianness)? != TIFF_MAGIC {
			decode_err!(@BAIL TiffIfd, "Invalid TIFF magic number");
		}

		let first_offset = data.read_u32(4, endianness)?;

		Ok(Self {
			data,
			endianness,
			first_offset,
			parse_options,
			visited: HashSet::new(),
		})
	}

	/// The byte order declared by the TIFF header
	pub fn endianness(&self) -> Endianness {
		self.endianness
	}

	/// Read the entire directory chain, including any nested directories
	///
	/// # Errors
	///
	/// * The first directory is out of bounds
	/// * With [`ParsingMode::Strict`](crate::config::ParsingMode::Strict), any entry or
	///   directory is corrupt, or an offset is visited twice
	pub fn read(mut self) -> Result<IfdStructure> {
		let structure = self.read_chain(self.first_offset, 0)?;

		log::debug!(
			"IFD: Read {} directories, {} unique offsets",
			structure.directory_count(),
			self.visited.len()
		);

		Ok(structure)
	}

	fn read_chain(&mut self, first_offset: u32, depth: usize) -> Result<IfdStructure> {
		let parsing_mode = self.parse_options.parsing_mode;

		if depth > self.parse_options.max_ifd_depth {
			decode_err!(@BAIL TiffIfd, "IFD nesting is too deep");
		}

		let mut structure = IfdStructure::new();
		if first_offset == 0 {
			return Ok(structure);
		}

		let (first, mut next_offset) = self.read_directory(first_offset, depth)?;
		structure.directories.push(first);

		while next_offset != 0 {
			match self.read_directory(next_offset, depth) {
				Ok((directory, next)) => {
					structure.directories.push(directory);
					next_offset = next;
				},
				Err(e) => parse_mode_choice!(
					parsing_mode,
					STRICT: return Err(e),
					DEFAULT: {
						log::warn!("IFD: Unable to follow the directory chain, stopping: {e}");
						break;
					}
				),
			}
		}

		Ok(structure)
	}

	fn read_directory(&mut self, offset: u32, depth: usize) -> Result<(BTreeMap<u16, IfdEntry>, u32)> {
		let parsing_mode = self.parse_options.parsing_mode;

		if !self.visited.insert(offset) {
			decode_err!(@BAIL TiffIfd, "Cyclic IFD offset");
		}

		let start = offset as usize;
		let entry_count = self.slice(start, 2)?.read_u16(0, self.endianness)? as usize;
		let table_start = start + 2;

		let available = (self.data.len() - table_start) / IFD_ENTRY_SIZE;
		let readable = if entry_count > available {
			parse_mode_choice!(
				parsing_mode,
				STRICT: decode_err!(@BAIL TiffIfd, "IFD entry table exceeds the available data"),
				DEFAULT: {
					log::warn!("IFD: Directory claims {entry_count} entries, only {available} fit");
					available
				}
			)
		} else {
			entry_count
		};

		log::trace!("IFD: Reading directory at {offset}, {readable} entries");

		let data = self.data;
		let mut directory = BTreeMap::new();
		for index in 0..readable {
			let entry_start = table_start + index * IFD_ENTRY_SIZE;
			let entry_bytes = &data[entry_start..entry_start + IFD_ENTRY_SIZE];

			match self.read_entry(entry_bytes, depth) {
				Ok((tag, entry)) => {
					if directory.insert(tag, entry).is_some() {
						log::warn!("IFD: Duplicate entry for tag {tag:#06X}, keeping the last one");
					}
				},
				Err(e) => parse_mode_choice!(
					parsing_mode,
					STRICT: return Err(e),
					DEFAULT: log::warn!("IFD: Skipping corrupt entry #{index} in directory at {offset}: {e}")
				),
			}
		}

		let next_start = table_start + entry_count * IFD_ENTRY_SIZE;
		let next_offset = match self.data.get(next_start..next_start + 4) {
			Some(bytes) => bytes.read_u32(0, self.endianness)?,
			None => {
				log::warn!("IFD: Directory at {offset} has no next offset");
				0
			},
		};

		Ok((directory, next_offset))
	}

	fn read_entry(&mut self, entry_bytes: &[u8], depth: usize) -> Result<(u16, IfdEntry)> {
		let tag = entry_bytes.read_u16(0, self.endianness)?;
		let type_code = entry_bytes.read_u16(2, self.endianness)?;
		let count = entry_bytes.read_u32(4, self.endianness)?;
		let value_field = &entry_bytes[8..12];

		let Some(entry_type) = IfdEntryType::from_u16(type_code) else {
			log::debug!("IFD: Keeping entry {tag:#06X} with unknown type {type_code} as-is");
			return Ok((
				tag,
				IfdEntry::Opaque {
					type_code,
					count,
					data: value_field.to_vec(),
				},
			));
		};

		let is_sub_ifd = count == 1
			&& (entry_type == IfdEntryType::Ifd
				|| (entry_type == IfdEntryType::Long && SUB_IFD_TAGS.contains(&tag)));
		if is_sub_ifd {
			let offset = value_field.read_u32(0, self.endianness)?;
			let structure = self.read_chain(offset, depth + 1)?;
			return Ok((
				tag,
				IfdEntry::SubIfd {
					type_code,
					structure,
				},
			));
		}

		let Some(size) = (count as usize).checked_mul(entry_type.size()) else {
			decode_err!(@BAIL TiffIfd, "IFD entry count overflows");
		};

		let raw = if size <= 4 {
			&value_field[..size]
		} else {
			let offset = value_field.read_u32(0, self.endianness)?;
			self.slice(offset as usize, size)?
		};

		Ok((tag, IfdEntry::decode(entry_type, raw, self.endianness)?))
	}

	fn slice(&self, offset: usize, length: usize) -> Result<&'a [u8]> {
		let data = self.data;
		data.mid(offset, length)
			.map_err(|_| decode_err!(TiffIfd, "IFD offset points outside of the data"))
	}
}
