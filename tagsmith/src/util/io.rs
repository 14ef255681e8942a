//! Access to the files tags live in
//!
//! Tagsmith never assumes a file is fully buffered in memory. Containers hand over a
//! [`FileAbstraction`], and the codecs only ever ask for bounded byte ranges through
//! [`read_range`] and [`write_range`].

use crate::error::Result;
use crate::macros::{err, range_err, try_vec};

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

// TODO: https://github.com/rust-lang/rust/issues/59359
pub(crate) trait SeekStreamLen: Seek {
	fn stream_len_hack(&mut self) -> Result<u64> {
		let current_pos = self.stream_position()?;
		let len = self.seek(SeekFrom::End(0))?;

		self.seek(SeekFrom::Start(current_pos))?;

		Ok(len)
	}
}

impl<T> SeekStreamLen for T where T: Seek {}

/// A named resource providing readable and writable byte streams
///
/// Streams are handed out by value and handed back through [`FileAbstraction::close_stream`].
/// Closing releases the stream's resources, it is the caller's responsibility to flush any
/// writes beforehand.
///
/// Prefer [`with_read_stream`] and [`with_write_stream`], which guarantee the stream is closed on
/// every exit path.
pub trait FileAbstraction {
	/// The stream type handed out for reading and writing
	type Stream: Read + Write + Seek;

	/// A human readable name for the resource, used for diagnostics
	fn name(&self) -> &str;

	/// Open a stream for reading
	///
	/// # Errors
	///
	/// The resource cannot be opened
	fn read_stream(&mut self) -> Result<Self::Stream>;

	/// Open a stream for reading and writing
	///
	/// # Errors
	///
	/// The resource cannot be opened for writing
	fn write_stream(&mut self) -> Result<Self::Stream>;

	/// Release a stream previously returned by [`FileAbstraction::read_stream`] or
	/// [`FileAbstraction::write_stream`]
	fn close_stream(&mut self, stream: Self::Stream);
}

/// A [`FileAbstraction`] over a path on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalFileAbstraction {
	path: PathBuf,
	name: String,
}

impl LocalFileAbstraction {
	/// Create a `LocalFileAbstraction` for `path`
	///
	/// The file is not opened until a stream is requested.
	pub fn new(path: impl AsRef<Path>) -> Self {
		let path = path.as_ref().to_path_buf();
		let name = path.display().to_string();
		Self { path, name }
	}

	/// The path of the file
	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl FileAbstraction for LocalFileAbstraction {
	type Stream = File;

	fn name(&self) -> &str {
		&self.name
	}

	fn read_stream(&mut self) -> Result<Self::Stream> {
		Ok(File::open(&self.path)?)
	}

	fn write_stream(&mut self) -> Result<Self::Stream> {
		Ok(OpenOptions::new().read(true).write(true).open(&self.path)?)
	}

	fn close_stream(&mut self, stream: Self::Stream) {
		log::trace!("Closing `{}`", self.name);
		drop(stream);
	}
}

/// A [`FileAbstraction`] over a caller supplied stream, such as a `Cursor<Vec<u8>>`
///
/// Only one stream can be open at a time. Opening a stream lends out the inner stream,
/// closing it returns the stream to the abstraction.
///
/// # Examples
///
/// ```rust
/// use tagsmith::io::{StreamFileAbstraction, read_range, with_read_stream};
/// use std::io::Cursor;
///
/// # fn main() -> tagsmith::error::Result<()> {
/// let mut file = StreamFileAbstraction::new("memory", Cursor::new(b"APETAGEX".to_vec()));
///
/// let preamble = with_read_stream(&mut file, |stream| read_range(stream, 0, 3))?;
/// assert_eq!(preamble, b"APE");
/// # Ok(()) }
/// ```
#[derive(Debug)]
pub struct StreamFileAbstraction<S> {
	name: String,
	stream: Option<S>,
}

impl<S> StreamFileAbstraction<S>
where
	S: Read + Write + Seek,
{
	/// Create a `StreamFileAbstraction` named `name` over `stream`
	pub fn new(name: impl Into<String>, stream: S) -> Self {
		Self {
			name: name.into(),
			stream: Some(stream),
		}
	}

	/// Consume the abstraction, returning the stream
	///
	/// This is `None` if a stream is still lent out.
	pub fn into_inner(self) -> Option<S> {
		self.stream
	}

	fn take_stream(&mut self) -> Result<S> {
		match self.stream.take() {
			Some(stream) => Ok(stream),
			None => err!(InvalidArgument("The stream is already open")),
		}
	}
}

impl<S> FileAbstraction for StreamFileAbstraction<S>
where
	S: Read + Write + Seek,
{
	type Stream = S;

	fn name(&self) -> &str {
		&self.name
	}

	fn read_stream(&mut self) -> Result<Self::Stream> {
		self.take_stream()
	}

	fn write_stream(&mut self) -> Result<Self::Stream> {
		self.take_stream()
	}

	fn close_stream(&mut self, stream: Self::Stream) {
		self.stream = Some(stream);
	}
}

/// Run `f` with a read stream, closing it on every exit path
///
/// # Errors
///
/// * The stream cannot be opened
/// * `f` fails
pub fn with_read_stream<F, T, R>(file: &mut F, f: R) -> Result<T>
where
	F: FileAbstraction + ?Sized,
	R: FnOnce(&mut F::Stream) -> Result<T>,
{
	let mut stream = file.read_stream()?;
	let ret = f(&mut stream);
	file.close_stream(stream);
	ret
}

/// Run `f` with a write stream, closing it on every exit path
///
/// The stream is flushed before it is closed when `f` succeeds.
///
/// # Errors
///
/// * The stream cannot be opened
/// * `f` fails
/// * Flushing fails
pub fn with_write_stream<F, T, R>(file: &mut F, f: R) -> Result<T>
where
	F: FileAbstraction + ?Sized,
	R: FnOnce(&mut F::Stream) -> Result<T>,
{
	let mut stream = file.write_stream()?;
	let ret = f(&mut stream).and_then(|value| {
		stream.flush()?;
		Ok(value)
	});
	file.close_stream(stream);
	ret
}

/// Read exactly `length` bytes at `offset`
///
/// # Errors
///
/// * The range extends past the end of the stream
/// * `length` exceeds [`GlobalOptions::allocation_limit`](crate::config::GlobalOptions::allocation_limit)
pub fn read_range<S>(stream: &mut S, offset: u64, length: usize) -> Result<Vec<u8>>
where
	S: Read + Seek,
{
	let stream_len = stream.stream_len_hack()?;
	if offset.saturating_add(length as u64) > stream_len {
		return Err(range_err!(offset as usize, length, stream_len as usize));
	}

	let mut content = try_vec![0; length];
	stream.seek(SeekFrom::Start(offset))?;
	stream.read_exact(&mut content)?;

	Ok(content)
}

/// Write `bytes` at `offset`, overwriting whatever is there
///
/// # Errors
///
/// `offset` is past the end of the stream, or the write fails
pub fn write_range<S>(stream: &mut S, offset: u64, bytes: &[u8]) -> Result<()>
where
	S: Write + Seek,
{
	let stream_len = stream.stream_len_hack()?;
	if offset > stream_len {
		return Err(range_err!(offset as usize, bytes.len(), stream_len as usize));
	}

	stream.seek(SeekFrom::Start(offset))?;
	stream.write_all(bytes)?;

	Ok(())
}
