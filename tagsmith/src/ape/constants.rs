pub(crate) const INVALID_KEYS: [&str; 4] = ["ID3", "TAG", "OGGS", "MP+"];

// https://wiki.hydrogenaud.io/index.php?title=APE_Tags_Header
pub(crate) const APE_PREAMBLE: &[u8; 8] = b"APETAGEX";
pub(crate) const APE_HEADER_SIZE: usize = 32;
pub(crate) const APE_VERSION: u32 = 2000;

// Value length (4) + flags (4) + a key of at least 1 byte + the key terminator (1)
pub(crate) const APE_ITEM_MIN_SIZE: usize = 11;

pub(crate) const ID3V1_SIZE: u64 = 128;
