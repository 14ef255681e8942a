#![allow(missing_docs)]

use std::io::{Cursor, Write};

use tagsmith::ape::ApeTag;
use tagsmith::config::{ParseOptions, WriteOptions};
use tagsmith::io::{
	FileAbstraction, LocalFileAbstraction, StreamFileAbstraction, read_range, with_read_stream,
	with_write_stream, write_range,
};
use tagsmith::tag::{Accessor, TagExt};

// An MP3 frame header followed by filler
fn audio_data() -> Vec<u8> {
	let mut data = vec![0xFF, 0xFB, 0x90, 0x64];
	data.resize(1024, 0xAA);
	data
}

fn tag(title: &str) -> ApeTag {
	let mut tag = ApeTag::new();
	tag.set_title(String::from(title));
	tag.set_performers(vec![String::from("Foo artist")]);
	tag
}

// Replaces (or appends) the APE tag at the end of `file`, returning the new file length
fn save_tag<F>(file: &mut F, tag: &mut ApeTag, truncate: impl Fn(&mut F::Stream, u64)) -> u64
where
	F: FileAbstraction,
{
	let rendered = tag.render(WriteOptions::default()).unwrap();

	with_write_stream(file, |stream| {
		let start = match ApeTag::find_in(stream, ParseOptions::new())? {
			Some((_, range)) => range.start,
			None => std::io::Seek::seek(stream, std::io::SeekFrom::End(0))?,
		};

		truncate(stream, start);
		write_range(stream, start, &rendered)?;
		Ok(start + rendered.len() as u64)
	})
	.unwrap()
}

#[test_log::test]
fn io_save_to_file() {
	let mut temp_file = tempfile::NamedTempFile::new().unwrap();
	temp_file.write_all(&audio_data()).unwrap();
	temp_file.flush().unwrap();

	let mut file = LocalFileAbstraction::new(temp_file.path());
	assert_eq!(file.path(), temp_file.path());

	let truncate = |stream: &mut std::fs::File, len: u64| stream.set_len(len).unwrap();

	// Add a tag, then replace it with a shorter one
	let len = save_tag(&mut file, &mut tag("A rather long title"), truncate);
	let len_after = save_tag(&mut file, &mut tag("Short"), truncate);
	assert!(len_after < len);
	assert_eq!(std::fs::metadata(temp_file.path()).unwrap().len(), len_after);

	let (parsed, range) = with_read_stream(&mut file, |stream| {
		ApeTag::find_in(stream, ParseOptions::new())
	})
	.unwrap()
	.unwrap();
	assert_eq!(parsed.title().as_deref(), Some("Short"));
	assert_eq!(range.start, audio_data().len() as u64);

	// The audio data is untouched
	let audio = with_read_stream(&mut file, |stream| read_range(stream, 0, 1024)).unwrap();
	assert_eq!(audio, audio_data());
}

#[test_log::test]
fn io_save_to_vec() {
	let mut file = StreamFileAbstraction::new("memory", Cursor::new(audio_data()));
	assert_eq!(file.name(), "memory");

	let truncate = |stream: &mut Cursor<Vec<u8>>, len: u64| stream.get_mut().truncate(len as usize);

	save_tag(&mut file, &mut tag("A rather long title"), truncate);
	let len = save_tag(&mut file, &mut tag("Short"), truncate);

	let contents = file.into_inner().unwrap().into_inner();
	assert_eq!(contents.len() as u64, len);
	assert_eq!(&contents[..1024], &audio_data()[..]);

	let parsed = ApeTag::parse(&contents[1024..], ParseOptions::new()).unwrap();
	assert_eq!(parsed.title().as_deref(), Some("Short"));
}

#[test_log::test]
fn io_stream_closed_on_error() {
	let mut file = StreamFileAbstraction::new("memory", Cursor::new(audio_data()));

	// Reading past the end fails, the stream must still be returned
	assert!(with_read_stream(&mut file, |stream| read_range(stream, 1000, 100)).is_err());
	assert!(with_write_stream(&mut file, |stream| write_range(stream, 2000, b"x")).is_err());

	let tail = with_read_stream(&mut file, |stream| read_range(stream, 1020, 4)).unwrap();
	assert_eq!(tail, [0xAA; 4]);

	assert!(file.into_inner().is_some());
}

#[test_log::test]
fn io_missing_file() {
	let dir = tempfile::tempdir().unwrap();
	let mut file = LocalFileAbstraction::new(dir.path().join("missing.mp3"));

	assert!(with_read_stream(&mut file, |_| Ok(())).is_err());
	assert!(with_write_stream(&mut file, |_| Ok(())).is_err());
}
