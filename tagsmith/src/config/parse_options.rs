/// Options to control how Tagsmith parses a tag
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct ParseOptions {
	pub(crate) parsing_mode: ParsingMode,
	pub(crate) read_cover_art: bool,
	pub(crate) max_ifd_depth: usize,
}

impl Default for ParseOptions {
	/// The default implementation for `ParseOptions`
	///
	/// The defaults are as follows:
	///
	/// ```rust,ignore
	/// ParseOptions {
	/// 	parsing_mode: ParsingMode::BestAttempt,
	/// 	read_cover_art: true,
	/// 	max_ifd_depth: 64,
	/// }
	/// ```
	fn default() -> Self {
		Self::new()
	}
}

impl ParseOptions {
	/// Default parsing mode
	pub const DEFAULT_PARSING_MODE: ParsingMode = ParsingMode::BestAttempt;

	/// Default maximum nesting of sub-IFDs
	pub const DEFAULT_MAX_IFD_DEPTH: usize = 64;

	/// Creates a new `ParseOptions`, alias for `Default` implementation
	///
	/// See also: [`ParseOptions::default`]
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::config::ParseOptions;
	///
	/// let parsing_options = ParseOptions::new();
	/// ```
	#[must_use]
	pub const fn new() -> Self {
		Self {
			parsing_mode: Self::DEFAULT_PARSING_MODE,
			read_cover_art: true,
			max_ifd_depth: Self::DEFAULT_MAX_IFD_DEPTH,
		}
	}

	/// The parsing mode to use, see [`ParsingMode`] for details
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::config::{ParseOptions, ParsingMode};
	///
	/// // By default, `parsing_mode` is ParsingMode::BestAttempt. Here, we need absolute correctness.
	/// let parsing_options = ParseOptions::new().parsing_mode(ParsingMode::Strict);
	/// ```
	pub fn parsing_mode(&mut self, parsing_mode: ParsingMode) -> Self {
		self.parsing_mode = parsing_mode;
		*self
	}

	/// Whether or not to read cover art
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::config::ParseOptions;
	///
	/// // Reading cover art is expensive, and I do not need it!
	/// let parsing_options = ParseOptions::new().read_cover_art(false);
	/// ```
	pub fn read_cover_art(&mut self, read_cover_art: bool) -> Self {
		self.read_cover_art = read_cover_art;
		*self
	}

	/// The maximum number of nested sub-IFDs to follow
	///
	/// EXIF sub-IFDs are only one level deep in practice, but nothing in the format prevents deeper
	/// nesting. This limit only exists to keep recursion bounded on hostile input, cycles are detected
	/// separately.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagsmith::config::ParseOptions;
	///
	/// // Only read the primary IFD and the directories it links to
	/// let parsing_options = ParseOptions::new().max_ifd_depth(1);
	/// ```
	pub fn max_ifd_depth(&mut self, max_ifd_depth: usize) -> Self {
		self.max_ifd_depth = max_ifd_depth;
		*self
	}
}

/// The parsing strictness mode
///
/// This can be set with [`ParseOptions::parsing_mode`].
///
/// # Examples
///
/// ```rust
/// use tagsmith::config::{ParseOptions, ParsingMode};
///
/// let parse_options = ParseOptions::new().parsing_mode(ParsingMode::Relaxed);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum ParsingMode {
	/// Will eagerly error on invalid input
	///
	/// This mode will eagerly error on any input that does not follow the format.
	///
	/// ## Examples of behavior
	///
	/// * Unable to decode an APE item - The parser will error and the entire tag is discarded
	/// * An IFD entry points outside of the TIFF data - The parser will error and the entire tag is discarded
	/// * An RDF element is neither a node nor a property element - The parser will error
	Strict,
	/// Default mode, less eager to error on recoverably malformed input
	///
	/// This mode will attempt to fill in any holes where possible in otherwise valid input.
	///
	/// NOTE: A readable input does *not* necessarily make it writeable.
	///
	/// ## Examples of behavior
	///
	/// * Unable to decode an APE item - The item is skipped, items read so far are kept
	/// * An IFD entry points outside of the TIFF data - The entry is skipped, its siblings are kept
	/// * A sub-IFD offset has already been visited - The sub-IFD is dropped, its parent is kept
	#[default]
	BestAttempt,
	/// Least eager to error, may produce invalid/partial output
	///
	/// This mode will discard any invalid fields, and ignore the majority of non-fatal errors.
	///
	/// If the input is malformed, the resulting tags may be incomplete, and the properties zeroed.
	///
	/// ## Examples of behavior
	///
	/// * Same as [`ParsingMode::BestAttempt`], plus unsupported RDF constructs are silently skipped
	Relaxed,
}
