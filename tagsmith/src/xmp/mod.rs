//! XMP packets
//!
//! XMP is RDF serialized as XML, usually wrapped in an `x:xmpmeta` element and `<?xpacket?>`
//! processing instructions. Properties are addressed by their namespace URI and local name, the
//! prefixes used in a packet carry no meaning.
//!
//! ## Notes
//!
//! * Only the `rdf:parseType="Resource"` parse type is understood, properties using any other
//!   parse type are skipped
//! * Structured qualifiers are dropped
//! * Simple, unqualified properties are written as attributes of `rdf:Description`
mod dom;
pub mod namespace;
mod node;
pub mod rdf;
mod read;
mod tag;
mod write;

pub use node::{XmpNode, XmpNodeType};
pub use tag::XmpTag;
