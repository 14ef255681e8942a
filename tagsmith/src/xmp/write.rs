use super::namespace::{PrefixMap, RDF_NS, X_NS, XML_NS};
use super::node::{XmpNode, XmpNodeType};
use crate::config::WriteOptions;
use crate::error::Result;

use std::collections::HashSet;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

const PACKET_ID: &str = "W5M0MpCehiHzreSzNTczkc9d";
const PADDING_LINE_LENGTH: usize = 100;

pub(super) struct XmpRenderer<'a> {
	root: &'a XmpNode,
	prefixes: PrefixMap,
	writer: Writer<Vec<u8>>,
}

impl<'a> XmpRenderer<'a> {
	pub(super) fn new(root: &'a XmpNode) -> Self {
		let mut prefixes = PrefixMap::default();
		for child in &root.children {
			register_namespaces(child, &mut prefixes);
		}

		Self {
			root,
			prefixes,
			writer: Writer::new_with_indent(Vec::new(), b' ', 1),
		}
	}

	pub(super) fn render(mut self, write_options: WriteOptions) -> Result<Vec<u8>> {
		let mut meta_start = BytesStart::new("x:xmpmeta");
		meta_start.push_attribute(("xmlns:x", X_NS));
		self.writer.write_event(Event::Start(meta_start))?;

		let mut rdf_start = BytesStart::new("rdf:RDF");
		rdf_start.push_attribute(("xmlns:rdf", RDF_NS));
		self.writer.write_event(Event::Start(rdf_start))?;

		self.write_description()?;

		self.writer
			.write_event(Event::End(BytesEnd::new("rdf:RDF")))?;
		self.writer
			.write_event(Event::End(BytesEnd::new("x:xmpmeta")))?;

		let body = self.writer.into_inner();
		if !write_options.xmp_packet_wrapper {
			return Ok(body);
		}

		let padding = write_options.preferred_padding.unwrap_or(0) as usize;

		let mut packet = Vec::with_capacity(body.len() + padding + 96);
		packet.extend_from_slice(format!("<?xpacket begin=\"\u{FEFF}\" id=\"{PACKET_ID}\"?>\n").as_bytes());
		packet.extend(body);
		packet.push(b'\n');
		packet.extend((1..=padding).map(|i| {
			if i % PADDING_LINE_LENGTH == 0 {
				b'\n'
			} else {
				b' '
			}
		}));
		packet.extend_from_slice(b"<?xpacket end=\"w\"?>");

		Ok(packet)
	}

	fn write_description(&mut self) -> Result<()> {
		let mut description = BytesStart::new("rdf:Description");
		description.push_attribute(("rdf:about", ""));
		for (namespace, prefix) in self.prefixes.iter() {
			if namespace == RDF_NS || namespace == XML_NS {
				continue;
			}

			description.push_attribute((format!("xmlns:{prefix}").as_str(), namespace));
		}

		let root = self.root;
		let mut elements = Vec::new();
		let mut attribute_names = HashSet::new();
		for child in &root.children {
			if child.namespace.is_empty() {
				log::warn!("XMP: Skipping property '{}' without a namespace", child.name);
				continue;
			}

			// An attribute can only appear once, repeated properties are written as elements
			if child.node_type == XmpNodeType::Simple
				&& child.qualifiers.is_empty()
				&& attribute_names.insert((child.namespace.as_str(), child.name.as_str()))
			{
				let name = self.qualified_name(&child.namespace, &child.name);
				let value = child.value.as_deref().unwrap_or_default();
				description.push_attribute((name.as_str(), value));
				continue;
			}

			elements.push(child);
		}

		if elements.is_empty() {
			self.writer.write_event(Event::Empty(description))?;
			return Ok(());
		}

		self.writer.write_event(Event::Start(description))?;
		for element in elements {
			self.write_property(element, false)?;
		}
		self.writer
			.write_event(Event::End(BytesEnd::new("rdf:Description")))?;

		Ok(())
	}

	fn qualified_name(&self, namespace: &str, name: &str) -> String {
		let prefix = match namespace {
			RDF_NS => "rdf",
			XML_NS => "xml",
			_ => match self.prefixes.get(namespace) {
				Some(prefix) => prefix,
				None => return name.to_owned(),
			},
		};

		format!("{prefix}:{name}")
	}

	fn write_property(&mut self, node: &XmpNode, array_item: bool) -> Result<()> {
		let name = if array_item {
			String::from("rdf:li")
		} else {
			self.qualified_name(&node.namespace, &node.name)
		};

		let mut start = BytesStart::new(name.as_str());
		if let Some(lang) = node.qualifier(XML_NS, "lang") {
			start.push_attribute(("xml:lang", lang));
		}

		match node.node_type {
			XmpNodeType::Simple => self.write_simple(node, &name, start),
			XmpNodeType::Struct => {
				start.push_attribute(("rdf:parseType", "Resource"));
				if node.children.is_empty() {
					self.writer.write_event(Event::Empty(start))?;
					return Ok(());
				}

				self.writer.write_event(Event::Start(start))?;
				for child in &node.children {
					self.write_property(child, false)?;
				}
				self.writer
					.write_event(Event::End(BytesEnd::new(name.as_str())))?;

				Ok(())
			},
			XmpNodeType::Bag | XmpNodeType::Seq | XmpNodeType::Alt => {
				let container = format!(
					"rdf:{}",
					node.node_type.container_name().unwrap_or_default()
				);

				self.writer.write_event(Event::Start(start))?;
				if node.children.is_empty() {
					self.writer
						.write_event(Event::Empty(BytesStart::new(container.as_str())))?;
				} else {
					self.writer
						.write_event(Event::Start(BytesStart::new(container.as_str())))?;
					for item in &node.children {
						self.write_property(item, true)?;
					}
					self.writer
						.write_event(Event::End(BytesEnd::new(container.as_str())))?;
				}
				self.writer
					.write_event(Event::End(BytesEnd::new(name.as_str())))?;

				Ok(())
			},
		}
	}

	fn write_simple(&mut self, node: &XmpNode, name: &str, mut start: BytesStart<'_>) -> Result<()> {
		let value = node.value.as_deref().unwrap_or_default();

		if node.qualifier(RDF_NS, "resource").is_some() {
			start.push_attribute(("rdf:resource", value));
			self.writer.write_event(Event::Empty(start))?;
			return Ok(());
		}

		let general_qualifiers = node
			.qualifiers()
			.filter(|((namespace, name), _)| {
				!matches!((*namespace, *name), (XML_NS, "lang") | (RDF_NS, "resource"))
			})
			.collect::<Vec<_>>();

		if general_qualifiers.is_empty() {
			self.writer.write_event(Event::Start(start))?;
			self.writer.write_event(Event::Text(BytesText::new(value)))?;
			self.writer
				.write_event(Event::End(BytesEnd::new(name)))?;
			return Ok(());
		}

		start.push_attribute(("rdf:parseType", "Resource"));
		self.writer.write_event(Event::Start(start))?;

		self.writer
			.write_event(Event::Start(BytesStart::new("rdf:value")))?;
		self.writer.write_event(Event::Text(BytesText::new(value)))?;
		self.writer
			.write_event(Event::End(BytesEnd::new("rdf:value")))?;

		for ((namespace, qualifier_name), qualifier_value) in general_qualifiers {
			let qualifier = self.qualified_name(namespace, qualifier_name);
			self.writer
				.write_event(Event::Start(BytesStart::new(qualifier.as_str())))?;
			self.writer
				.write_event(Event::Text(BytesText::new(qualifier_value)))?;
			self.writer
				.write_event(Event::End(BytesEnd::new(qualifier.as_str())))?;
		}

		self.writer
			.write_event(Event::End(BytesEnd::new(name)))?;

		Ok(())
	}
}

fn register_namespaces(node: &XmpNode, prefixes: &mut PrefixMap) {
	if node.namespace != RDF_NS && node.namespace != XML_NS {
		prefixes.register(&node.namespace);
	}

	for (namespace, _) in node.qualifiers.keys() {
		if namespace != RDF_NS && namespace != XML_NS {
			prefixes.register(namespace);
		}
	}

	for child in &node.children {
		register_namespaces(child, prefixes);
	}
}
