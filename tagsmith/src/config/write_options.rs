/// Options to control how Tagsmith renders a tag
///
/// This acts as a dumping ground for all sorts of format-specific settings. As such, this is best
/// used as an application global config that gets set once.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct WriteOptions {
	pub(crate) preferred_padding: Option<u32>,
	pub(crate) respect_read_only: bool,
	pub(crate) xmp_packet_wrapper: bool,
}

impl WriteOptions {
	/// Default preferred padding size in bytes
	pub const DEFAULT_PREFERRED_PADDING: u32 = 2048;

	/// Creates a new `WriteOptions`, alias for `Default` implementation
	///
	/// See also: [`WriteOptions::default`]
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::config::WriteOptions;
	///
	/// let write_options = WriteOptions::new();
	/// ```
	pub const fn new() -> Self {
		Self {
			preferred_padding: Some(Self::DEFAULT_PREFERRED_PADDING),
			respect_read_only: true,
			xmp_packet_wrapper: true,
		}
	}

	/// Set the preferred padding size in bytes
	///
	/// If the tag format being written supports padding, this will be the size of the padding
	/// in bytes.
	///
	/// NOTES:
	///
	/// * Only XMP packets are padded, APE tags and IFDs have no notion of padding
	/// * Padding is only written when the XMP packet wrapper is enabled
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::config::WriteOptions;
	///
	/// // I edit XMP in place a lot, so I'll double the padding size!
	/// let options = WriteOptions::new().preferred_padding(4096);
	///
	/// // ...Or I don't want padding under any circumstances!
	/// let options = WriteOptions::new().preferred_padding(0);
	/// ```
	pub fn preferred_padding(mut self, preferred_padding: u32) -> Self {
		match preferred_padding {
			0 => self.preferred_padding = None,
			_ => self.preferred_padding = Some(preferred_padding),
		}
		self
	}

	/// Whether to respect read-only tag items
	///
	/// Some tag formats allow for items to be marked as read-only. If set to `true`, the values
	/// these items were read with will take priority over any in-memory changes.
	///
	/// NOTE: In the case of APE tags, one can mark the entire tag as read-only. This will render
	/// the tag exactly as it was read.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::config::WriteOptions;
	///
	/// // I don't care about read-only items, I want to write my new items!
	/// let options = WriteOptions::new().respect_read_only(false);
	/// ```
	pub fn respect_read_only(mut self, respect_read_only: bool) -> Self {
		self.respect_read_only = respect_read_only;
		self
	}

	/// Whether to wrap rendered XMP in `<?xpacket?>` processing instructions
	///
	/// The packet wrapper allows other software to locate and edit XMP in place. It is required
	/// when XMP is embedded in a container without its own length field.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::config::WriteOptions;
	///
	/// // The XMP is going in a sidecar file, no wrapper needed
	/// let options = WriteOptions::new().xmp_packet_wrapper(false);
	/// ```
	pub fn xmp_packet_wrapper(mut self, xmp_packet_wrapper: bool) -> Self {
		self.xmp_packet_wrapper = xmp_packet_wrapper;
		self
	}
}

impl Default for WriteOptions {
	/// The default implementation for `WriteOptions`
	///
	/// The defaults are as follows:
	///
	/// ```rust,ignore
	/// WriteOptions {
	///     preferred_padding: 2048,
	///     respect_read_only: true,
	///     xmp_packet_wrapper: true,
	/// }
	/// ```
	fn default() -> Self {
		Self::new()
	}
}
