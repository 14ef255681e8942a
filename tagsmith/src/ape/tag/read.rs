use super::ApeTag;
use super::item::ApeItem;
use crate::ape::APE_PICTURE_TYPES;
use crate::ape::constants::{APE_HEADER_SIZE, APE_ITEM_MIN_SIZE, APE_PREAMBLE, ID3V1_SIZE};
use crate::ape::header::ApeHeader;
use crate::config::ParseOptions;
use crate::error::Result;
use crate::macros::{decode_err, parse_mode_choice};
use crate::util::io::{SeekStreamLen, read_range};

use std::io::{Read, Seek};
use std::ops::Range;

// Locates the items of a tag laid out as `[header][items][footer?]` or `[items][footer]`
fn locate_items(data: &[u8]) -> Result<(ApeHeader, Range<usize>)> {
	if data.len() >= APE_HEADER_SIZE && &data[..8] == APE_PREAMBLE {
		let header = ApeHeader::parse(data)?;
		if header.is_header() {
			let items_size = header.items_size() as usize;
			if items_size > data.len() - APE_HEADER_SIZE {
				decode_err!(@BAIL Ape, "APE tag size exceeds the available data");
			}

			return Ok((header, APE_HEADER_SIZE..APE_HEADER_SIZE + items_size));
		}
	}

	let Some(footer_start) = data.len().checked_sub(APE_HEADER_SIZE) else {
		decode_err!(@BAIL Ape, "APE tag has no valid header or footer");
	};

	let footer = ApeHeader::parse(&data[footer_start..])?;
	let items_size = footer.items_size() as usize;
	let Some(items_start) = footer_start.checked_sub(items_size) else {
		decode_err!(@BAIL Ape, "APE tag size exceeds the available data");
	};

	Ok((footer, items_start..footer_start))
}

pub(super) fn parse_ape_tag(data: &[u8], parse_options: ParseOptions) -> Result<ApeTag> {
	let parsing_mode = parse_options.parsing_mode;

	let (header, items_range) = locate_items(data)?;
	let items = &data[items_range];

	log::debug!(
		"APE: Parsing tag, version: {}, items: {}, size: {}",
		header.version(),
		header.item_count(),
		header.tag_size()
	);

	let mut tag = ApeTag {
		read_only: header.read_only(),
		retain_all: header.read_only(),
		..ApeTag::default()
	};

	let mut offset = 0;
	for _ in 0..header.item_count() {
		if items.len() - offset < APE_ITEM_MIN_SIZE {
			log::warn!("APE: Tag claims more items than it holds, stopping early");
			break;
		}

		let item = match ApeItem::parse(items, offset) {
			Ok(item) => item,
			Err(e) => {
				parse_mode_choice!(
					parsing_mode,
					STRICT: return Err(e),
					DEFAULT: {
						log::warn!("APE: Failed to parse item, discarding the rest of the tag: {e}");
						break;
					}
				)
			},
		};

		offset += item.size_on_disk();

		if ApeItem::verify_key(item.key()).is_err() {
			parse_mode_choice!(
				parsing_mode,
				STRICT: decode_err!(@BAIL Ape, "APE tag item contains an illegal key"),
				DEFAULT: {
					log::warn!("APE: Skipping item with an invalid key '{}'", item.key());
					continue;
				}
			)
		}

		if item.is_empty() {
			log::warn!("APE: Skipping empty item '{}'", item.key());
			continue;
		}

		if !parse_options.read_cover_art
			&& APE_PICTURE_TYPES
				.iter()
				.any(|key| key.eq_ignore_ascii_case(item.key()))
		{
			log::trace!("APE: Skipping cover art item '{}'", item.key());
			continue;
		}

		if tag.retain_all || item.read_only() {
			tag.retained.push(item.clone());
		}

		tag.insert(item);
	}

	Ok(tag)
}

pub(super) fn find_ape_tag<R>(
	reader: &mut R,
	parse_options: ParseOptions,
) -> Result<Option<(ApeTag, Range<u64>)>>
where
	R: Read + Seek,
{
	let stream_len = reader.stream_len_hack()?;
	let mut end = stream_len;

	// An ID3v1 tag always sits at the very end, after any APE tag
	if stream_len >= ID3V1_SIZE && read_range(reader, stream_len - ID3V1_SIZE, 3)? == b"TAG" {
		log::trace!("APE: Skipping ID3v1 tag");
		end -= ID3V1_SIZE;
	}

	let Some(footer_start) = end.checked_sub(APE_HEADER_SIZE as u64) else {
		return Ok(None);
	};

	let footer_bytes = read_range(reader, footer_start, APE_HEADER_SIZE)?;
	if &footer_bytes[..8] != APE_PREAMBLE {
		return Ok(None);
	}

	let footer = ApeHeader::parse(&footer_bytes)?;
	if footer.is_header() {
		log::warn!("APE: Found a header where a footer was expected");
		return Ok(None);
	}

	let Some(mut start) = end.checked_sub(footer.total_size()) else {
		decode_err!(@BAIL Ape, "APE tag size exceeds the available data");
	};

	if footer.total_size() != u64::from(footer.tag_size())
		&& read_range(reader, start, 8)? != APE_PREAMBLE
	{
		log::warn!("APE: Tag claims to have a header, but none was found");
		start += APE_HEADER_SIZE as u64;
	}

	let tag_bytes = read_range(reader, start, (end - start) as usize)?;
	let tag = parse_ape_tag(&tag_bytes, parse_options)?;

	Ok(Some((tag, start..end)))
}
