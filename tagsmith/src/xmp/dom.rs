// A minimal namespace-resolved XML element tree, built on top of quick-xml's event reader

use super::namespace::XML_NS;
use crate::error::Result;
use crate::macros::decode_err;

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

#[derive(Debug, Default)]
pub(crate) struct XmlAttribute {
	pub(crate) namespace: String,
	pub(crate) name: String,
	pub(crate) value: String,
}

#[derive(Debug, Default)]
pub(crate) struct XmlElement {
	pub(crate) namespace: String,
	pub(crate) name: String,
	pub(crate) attributes: Vec<XmlAttribute>,
	pub(crate) children: Vec<XmlElement>,
	pub(crate) text: String,
}

impl XmlElement {
	pub(crate) fn is(&self, namespace: &str, name: &str) -> bool {
		self.namespace == namespace && self.name == name
	}

	pub(crate) fn attribute(&self, namespace: &str, name: &str) -> Option<&str> {
		self.attributes
			.iter()
			.find(|attr| attr.namespace == namespace && attr.name == name)
			.map(|attr| attr.value.as_str())
	}

	// Pre-order search, including the element itself
	pub(crate) fn find(&self, namespace: &str, name: &str) -> Option<&XmlElement> {
		if self.is(namespace, name) {
			return Some(self);
		}

		self.children
			.iter()
			.find_map(|child| child.find(namespace, name))
	}
}

fn malformed(error: impl std::fmt::Display) -> crate::error::TagsmithError {
	log::debug!("XMP: XML error: {error}");
	decode_err!(Xmp, "Malformed XML")
}

// The `xmlns` declarations in scope, innermost last
#[derive(Default)]
struct NamespaceScopes {
	scopes: Vec<Vec<(String, String)>>,
}

impl NamespaceScopes {
	fn resolve(&self, prefix: &str) -> Option<&str> {
		if prefix == "xml" {
			return Some(XML_NS);
		}

		self.scopes
			.iter()
			.rev()
			.flat_map(|scope| scope.iter().rev())
			.find(|(declared, _)| declared == prefix)
			.map(|(_, uri)| uri.as_str())
	}
}

fn split_qname(qname: &str) -> (&str, &str) {
	match qname.split_once(':') {
		Some((prefix, local)) => (prefix, local),
		None => ("", qname),
	}
}

fn decode_text(raw: &[u8]) -> Result<String> {
	let text = std::str::from_utf8(raw).map_err(malformed)?;
	Ok(unescape(text).map_err(malformed)?.into_owned())
}

// Pushes a new namespace scope for `start`, then builds the element with its names resolved
fn open_element(start: &BytesStart<'_>, scopes: &mut NamespaceScopes) -> Result<XmlElement> {
	let mut raw_attributes = Vec::new();
	let mut scope = Vec::new();

	for attr in start.attributes() {
		let attr = attr.map_err(malformed)?;
		let key = std::str::from_utf8(attr.key.as_ref())
			.map_err(malformed)?
			.to_owned();
		let value = decode_text(&attr.value)?;

		if key == "xmlns" {
			scope.push((String::new(), value));
		} else if let Some(prefix) = key.strip_prefix("xmlns:") {
			scope.push((prefix.to_owned(), value));
		} else {
			raw_attributes.push((key, value));
		}
	}

	scopes.scopes.push(scope);

	let qname = std::str::from_utf8(start.name().as_ref())
		.map_err(malformed)?
		.to_owned();
	let (prefix, local) = split_qname(&qname);
	let namespace = match scopes.resolve(prefix) {
		Some(namespace) => namespace.to_owned(),
		None if prefix.is_empty() => String::new(),
		None => decode_err!(@BAIL Xmp, "Undeclared XML namespace prefix"),
	};

	Ok(XmlElement {
		namespace,
		name: local.to_owned(),
		attributes: resolve_attributes(raw_attributes, scopes)?,
		..XmlElement::default()
	})
}

// Unprefixed attributes never take the default namespace
fn resolve_attributes(
	raw: Vec<(String, String)>,
	scopes: &NamespaceScopes,
) -> Result<Vec<XmlAttribute>> {
	let mut attributes = Vec::with_capacity(raw.len());
	for (key, value) in raw {
		let (prefix, local) = split_qname(&key);
		let namespace = if prefix.is_empty() {
			String::new()
		} else {
			match scopes.resolve(prefix) {
				Some(namespace) => namespace.to_owned(),
				None => decode_err!(@BAIL Xmp, "Undeclared XML namespace prefix"),
			}
		};

		attributes.push(XmlAttribute {
			namespace,
			name: local.to_owned(),
			value,
		});
	}

	Ok(attributes)
}

fn close_element(
	element: XmlElement,
	stack: &mut [XmlElement],
	root: &mut Option<XmlElement>,
) -> Result<()> {
	match stack.last_mut() {
		Some(parent) => parent.children.push(element),
		None if root.is_none() => *root = Some(element),
		None => decode_err!(@BAIL Xmp, "XML document has multiple root elements"),
	}

	Ok(())
}

// Parses `xml` into an element tree, returning the root element
pub(crate) fn parse_document(xml: &str) -> Result<XmlElement> {
	let mut reader = Reader::from_str(xml);

	let mut scopes = NamespaceScopes::default();
	let mut stack: Vec<XmlElement> = Vec::new();
	let mut root = None;
	let mut buf = Vec::new();

	loop {
		match reader.read_event_into(&mut buf).map_err(malformed)? {
			Event::Start(start) => {
				let element = open_element(&start, &mut scopes)?;
				stack.push(element);
			},
			Event::Empty(start) => {
				let element = open_element(&start, &mut scopes)?;
				scopes.scopes.pop();
				close_element(element, &mut stack, &mut root)?;
			},
			Event::End(_) => {
				let Some(element) = stack.pop() else {
					decode_err!(@BAIL Xmp, "Unexpected XML end tag");
				};

				scopes.scopes.pop();
				close_element(element, &mut stack, &mut root)?;
			},
			Event::Text(text) => {
				if let Some(current) = stack.last_mut() {
					current.text.push_str(&decode_text(&text)?);
				}
			},
			Event::CData(data) => {
				if let Some(current) = stack.last_mut() {
					let text = std::str::from_utf8(&data).map_err(malformed)?;
					current.text.push_str(text);
				}
			},
			Event::GeneralRef(reference) => {
				if let Some(current) = stack.last_mut() {
					let name = std::str::from_utf8(&reference).map_err(malformed)?;
					current.text.push_str(&decode_text(format!("&{name};").as_bytes())?);
				}
			},
			Event::Eof => break,
			// Declarations, comments, doctypes, and processing instructions (<?xpacket?>)
			_ => {},
		}

		buf.clear();
	}

	if !stack.is_empty() {
		decode_err!(@BAIL Xmp, "XML document ended with unclosed elements");
	}

	match root {
		Some(root) => Ok(root),
		None => decode_err!(@BAIL Xmp, "XML document has no root element"),
	}
}

#[cfg(test)]
mod tests {
	use super::parse_document;
	use crate::xmp::namespace::{DC_NS, RDF_NS, XML_NS};

	#[test_log::test]
	fn namespaces_resolved() {
		let xml = r#"<?xpacket begin="" id="W5M0MpCehiHzreSzNTczkc9d"?>
<x:xmpmeta xmlns:x="adobe:ns:meta/">
	<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
		<rdf:Description xmlns:dc="http://purl.org/dc/elements/1.1/" dc:format="image/jpeg">
			<dc:title xml:lang="en">A &amp; B &#x41;<![CDATA[<c>]]></dc:title>
		</rdf:Description>
	</rdf:RDF>
</x:xmpmeta>
<?xpacket end="w"?>"#;

		let root = parse_document(xml).unwrap();
		assert!(root.is("adobe:ns:meta/", "xmpmeta"));

		let description = root.find(RDF_NS, "Description").unwrap();
		assert_eq!(description.attribute(DC_NS, "format"), Some("image/jpeg"));

		let title = description.find(DC_NS, "title").unwrap();
		assert_eq!(title.attribute(XML_NS, "lang"), Some("en"));
		assert_eq!(title.text, "A & B A<c>");
	}

	#[test_log::test]
	fn default_namespace_and_shadowing() {
		let xml = r#"<root xmlns="urn:a" xmlns:p="urn:p"><p:child xmlns:p="urn:q" plain="1"/></root>"#;

		let root = parse_document(xml).unwrap();
		assert!(root.is("urn:a", "root"));

		let child = &root.children[0];
		assert!(child.is("urn:q", "child"));
		assert_eq!(child.attribute("", "plain"), Some("1"));
	}

	#[test_log::test]
	fn malformed() {
		assert!(parse_document("").is_err());
		assert!(parse_document("<a><b></a>").is_err());
		assert!(parse_document("<a>").is_err());
		assert!(parse_document("<p:a/>").is_err());
		assert!(parse_document("<a/><b/>").is_err());
	}
}
