#[macro_export]
macro_rules! temp_file {
	($contents:expr) => {{
		use std::io::{Seek, Write};
		let mut file = tempfile::tempfile().unwrap();
		file.write_all(&$contents).unwrap();

		file.seek(std::io::SeekFrom::Start(0)).unwrap();

		file
	}};
}

// A fake MP3 payload, the codecs never look at it
pub fn audio_data() -> Vec<u8> {
	let mut data = vec![0xFF, 0xFB, 0x90, 0x64];
	data.extend(std::iter::repeat_n(0xAA, 1020));
	data
}
