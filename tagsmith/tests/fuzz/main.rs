#![allow(missing_docs)]

use std::thread;
use std::time::{Duration, Instant};

mod ape_tag_parse;
mod ifd_tag_parse;
mod xmp_tag_parse;

// Every truncation of `sample`, followed by every single byte replacement
fn corruptions(sample: &[u8]) -> impl Iterator<Item = Vec<u8>> + '_ {
	let truncated = (0..sample.len()).map(|len| sample[..len].to_vec());
	let replaced = (0..sample.len()).flat_map(move |pos| {
		[0x00, 0x7F, 0xFF].into_iter().map(move |byte| {
			let mut data = sample.to_vec();
			data[pos] = byte;
			data
		})
	});

	truncated.chain(replaced)
}

/// Feed every corruption of `sample` to `parse`, which must neither panic nor hang
#[allow(clippy::missing_panics_doc)]
pub fn corruption_test<F>(sample: Vec<u8>, parse: F)
where
	F: Fn(&[u8]) + Send + 'static,
{
	let instant = Instant::now();
	let thread = thread::spawn(move || {
		for data in corruptions(&sample) {
			parse(&data);
		}
	});

	while instant.elapsed().as_secs() < 30 {
		if thread.is_finished() {
			assert!(thread.join().is_ok(), "Parser panicked");
			return;
		}

		thread::sleep(Duration::from_millis(10));
	}

	panic!("Failed to run test");
}
