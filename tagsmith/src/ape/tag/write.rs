use super::ApeTag;
use crate::ape::constants::APE_HEADER_SIZE;
use crate::ape::header::ApeHeader;
use crate::byte_vector::ByteVector;
use crate::config::WriteOptions;
use crate::error::Result;
use crate::macros::err;

// Undo any changes made to items that were read only when the tag was parsed
fn restore_read_only(tag: &mut ApeTag) {
	if tag.retain_all {
		if tag.items != tag.retained {
			log::warn!("APE: Tag is read only, discarding changes");
			tag.items.clone_from(&tag.retained);
		}

		return;
	}

	for retained in &tag.retained {
		match tag
			.items
			.iter_mut()
			.find(|i| i.key().eq_ignore_ascii_case(retained.key()))
		{
			Some(existing) if existing == retained => {},
			Some(existing) => {
				log::warn!("APE: Item '{}' is read only, discarding changes", retained.key());
				*existing = retained.clone();
			},
			None => {
				log::warn!("APE: Item '{}' is read only, restoring it", retained.key());
				tag.items.push(retained.clone());
			},
		}
	}
}

pub(super) fn render_ape_tag(tag: &mut ApeTag, write_options: WriteOptions) -> Result<Vec<u8>> {
	if write_options.respect_read_only {
		restore_read_only(tag);
	}

	let mut items = ByteVector::new();
	let mut item_count = 0_u32;
	for item in &mut tag.items {
		let rendered = item.render()?;

		// Unnecessary to write anything for empty items
		if rendered.is_empty() {
			continue;
		}

		items.push_bytes(&rendered);
		item_count += 1;
	}

	// Unnecessary to write anything if there's no metadata
	if item_count == 0 {
		return Ok(Vec::new());
	}

	let items_size = match u32::try_from(items.len()) {
		Ok(size) if size <= u32::MAX - APE_HEADER_SIZE as u32 => size,
		_ => err!(TooMuchData),
	};

	// The header is exactly the same as the footer, except for the flags
	let header = ApeHeader::new(items_size, item_count, tag.read_only);

	let mut out = ByteVector::with_capacity(items.len() + APE_HEADER_SIZE * 2)?;
	out.push_bytes(&header.render(true));
	out.push_bytes(&items);
	out.push_bytes(&header.render(false));

	log::debug!("APE: Rendered {item_count} items, {} bytes", out.len());
	Ok(out.into_inner())
}
