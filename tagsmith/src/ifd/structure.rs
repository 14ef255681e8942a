use super::entry::{IfdEntry, Rational};

use std::collections::BTreeMap;

/// A chain of image file directories
///
/// Directories are indexed from `0`, following the "next IFD" links of the file. Each one maps
/// a tag number to its [`IfdEntry`]. Nested directories, such as the Exif or GPS IFD, are stored
/// as [`IfdEntry::SubIfd`] values.
///
/// # Examples
///
/// ```rust
/// use tagsmith::ifd::{IfdEntry, IfdEntryTag, IfdStructure};
///
/// let mut structure = IfdStructure::new();
/// structure.set_entry(0, IfdEntryTag::MAKE, IfdEntry::Ascii(String::from("Canon")));
///
/// assert_eq!(structure.get_string(0, IfdEntryTag::MAKE), Some("Canon"));
/// assert_eq!(structure.get_string(1, IfdEntryTag::MAKE), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IfdStructure {
	pub(crate) directories: Vec<BTreeMap<u16, IfdEntry>>,
}

impl IfdStructure {
	/// Create an empty `IfdStructure`
	pub fn new() -> Self {
		Self::default()
	}

	/// The number of directories in the chain
	pub fn directory_count(&self) -> usize {
		self.directories.len()
	}

	/// Whether every directory is empty
	pub fn is_empty(&self) -> bool {
		self.directories.iter().all(BTreeMap::is_empty)
	}

	/// Iterate over the entries of directory `directory`, ordered by tag
	pub fn entries(&self, directory: usize) -> impl Iterator<Item = (u16, &IfdEntry)> {
		self.directories
			.get(directory)
			.into_iter()
			.flat_map(|dir| dir.iter().map(|(tag, entry)| (*tag, entry)))
	}

	/// Get the entry for `tag` in directory `directory`
	pub fn get_entry(&self, directory: usize, tag: u16) -> Option<&IfdEntry> {
		self.directories.get(directory)?.get(&tag)
	}

	/// Get a mutable reference to the entry for `tag` in directory `directory`
	pub fn get_entry_mut(&mut self, directory: usize, tag: u16) -> Option<&mut IfdEntry> {
		self.directories.get_mut(directory)?.get_mut(&tag)
	}

	/// Set the entry for `tag` in directory `directory`
	///
	/// Missing directories up to `directory` are created. This returns the previous entry, if
	/// one existed.
	pub fn set_entry(&mut self, directory: usize, tag: u16, entry: IfdEntry) -> Option<IfdEntry> {
		self.directory_mut(directory).insert(tag, entry)
	}

	/// Remove the entry for `tag` in directory `directory`
	pub fn remove_entry(&mut self, directory: usize, tag: u16) -> Option<IfdEntry> {
		self.directories.get_mut(directory)?.remove(&tag)
	}

	/// Get the string of an [`IfdEntry::Ascii`]
	pub fn get_string(&self, directory: usize, tag: u16) -> Option<&str> {
		self.get_entry(directory, tag)?.as_str()
	}

	/// Get the first value of an unsigned integer entry
	///
	/// See [`IfdEntry::as_u32`].
	pub fn get_u32(&self, directory: usize, tag: u16) -> Option<u32> {
		self.get_entry(directory, tag)?.as_u32()
	}

	/// Get the first value of an [`IfdEntry::Rational`]
	pub fn get_rational(&self, directory: usize, tag: u16) -> Option<Rational> {
		match self.get_entry(directory, tag)? {
			IfdEntry::Rational(values) => values.first().copied(),
			_ => None,
		}
	}

	/// Get the nested directories stored under `tag`
	pub fn get_sub_ifd(&self, directory: usize, tag: u16) -> Option<&IfdStructure> {
		match self.get_entry(directory, tag)? {
			IfdEntry::SubIfd { structure, .. } => Some(structure),
			_ => None,
		}
	}

	/// Get a mutable reference to the nested directories stored under `tag`
	pub fn get_sub_ifd_mut(&mut self, directory: usize, tag: u16) -> Option<&mut IfdStructure> {
		match self.get_entry_mut(directory, tag)? {
			IfdEntry::SubIfd { structure, .. } => Some(structure),
			_ => None,
		}
	}

	pub(crate) fn directory_mut(&mut self, directory: usize) -> &mut BTreeMap<u16, IfdEntry> {
		if self.directories.len() <= directory {
			self.directories.resize_with(directory + 1, BTreeMap::new);
		}

		&mut self.directories[directory]
	}
}
