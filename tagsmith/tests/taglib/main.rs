#![allow(missing_docs, trivial_casts)]

pub(crate) mod util;

mod test_apetag;
mod test_combined;
mod test_ifd;
mod test_xmp;
