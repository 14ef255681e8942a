// Helpers shared by the tag formats

// Splits a "current/total" pair, as used by APE's "Track" and "Disc" items
//
// Either side may be missing or unparsable, "3" yields (Some(3), None) and "/12" yields (None, Some(12)).
pub(crate) fn split_number_pair(value: &str) -> (Option<u32>, Option<u32>) {
	let mut split = value.splitn(2, '/');

	let current = split.next().and_then(|n| n.trim().parse().ok());
	let total = split.next().and_then(|n| n.trim().parse().ok());

	(current, total)
}

// The inverse of `split_number_pair`
//
// A pair with only a total is rendered as "0/total", since the current number is mandatory.
pub(crate) fn format_number_pair(current: Option<u32>, total: Option<u32>) -> Option<String> {
	match (current, total) {
		(None, None) => None,
		(Some(current), None) => Some(current.to_string()),
		(current, Some(total)) => Some(format!("{}/{total}", current.unwrap_or(0))),
	}
}

// Years are commonly stored as full dates, only the leading digits are relevant
pub(crate) fn parse_year(value: &str) -> Option<u32> {
	let digits = value
		.trim()
		.bytes()
		.take_while(u8::is_ascii_digit)
		.count();

	if digits < 4 {
		return None;
	}

	value.trim()[..4].parse().ok()
}
