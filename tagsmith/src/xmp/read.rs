use super::dom::{XmlElement, parse_document};
use super::namespace::{RDF_NS, XML_NS};
use super::node::{XmpNode, XmpNodeType};
use super::rdf::{is_node_element, is_old_term, is_property_attribute, is_property_element};
use crate::config::{ParseOptions, ParsingMode};
use crate::error::Result;
use crate::macros::{decode_err, parse_mode_choice};
use crate::util::text::TextEncoding;

// Decodes a packet to text, UTF-16 packets must start with a BOM
fn decode_packet(data: &[u8]) -> Result<String> {
	let text = match data {
		[0xFF, 0xFE, ..] | [0xFE, 0xFF, ..] => TextEncoding::UTF16.decode(data)?,
		[0xEF, 0xBB, 0xBF, rest @ ..] => TextEncoding::UTF8.decode(rest)?,
		_ => TextEncoding::UTF8.decode(data)?,
	};

	// Packets are commonly padded with nulls
	Ok(text.trim_end_matches('\0').to_owned())
}

pub(super) fn parse_xmp(data: &[u8], parse_options: ParseOptions) -> Result<XmpNode> {
	let parsing_mode = parse_options.parsing_mode;

	let text = decode_packet(data).map_err(|e| {
		log::debug!("XMP: Unable to decode packet: {e}");
		decode_err!(Xmp, "XMP packet is not valid UTF-8 or UTF-16")
	})?;

	let document = parse_document(&text)?;
	let Some(rdf) = document.find(RDF_NS, "RDF") else {
		decode_err!(@BAIL Xmp, "XMP packet has no rdf:RDF element");
	};

	let mut root = XmpNode::structure(RDF_NS, "Description");
	for element in &rdf.children {
		if !is_node_element(&element.namespace, &element.name) {
			parse_mode_choice!(
				parsing_mode,
				STRICT: decode_err!(@BAIL Xmp, "rdf:RDF contains a non-node element"),
				DEFAULT: {
					log::warn!("XMP: Skipping non-node element '{}' in rdf:RDF", element.name);
					continue;
				}
			)
		}

		parse_node_element(element, &mut root, parsing_mode)?;
	}

	log::debug!("XMP: Parsed {} top level properties", root.child_count());
	Ok(root)
}

// Adds the properties of a node element (such as `rdf:Description`) to `parent`
fn parse_node_element(
	element: &XmlElement,
	parent: &mut XmpNode,
	parsing_mode: ParsingMode,
) -> Result<()> {
	for attr in &element.attributes {
		if attr.namespace == RDF_NS && matches!(attr.name.as_str(), "about" | "ID" | "nodeID") {
			continue;
		}

		if is_old_term(&attr.namespace, &attr.name) {
			log::warn!("XMP: Ignoring deprecated attribute rdf:{}", attr.name);
			continue;
		}

		if is_property_attribute(&attr.namespace, &attr.name) {
			parent.children.push(XmpNode::simple(
				&attr.namespace,
				&attr.name,
				attr.value.clone(),
			));
			continue;
		}

		log::debug!("XMP: Ignoring node element attribute '{}'", attr.name);
	}

	for child in &element.children {
		if !is_property_element(&child.namespace, &child.name) {
			parse_mode_choice!(
				parsing_mode,
				STRICT: decode_err!(@BAIL Xmp, "Node element contains a non-property element"),
				DEFAULT: {
					log::warn!("XMP: Skipping non-property element '{}'", child.name);
					continue;
				}
			)
		}

		if let Some(node) = parse_property_element(child, parsing_mode)? {
			parent.children.push(node);
		}
	}

	Ok(())
}

// Builds the node for a property element, `None` if the element is skipped
fn parse_property_element(element: &XmlElement, parsing_mode: ParsingMode) -> Result<Option<XmpNode>> {
	let lang = element.attribute(XML_NS, "lang");
	let parse_type = element.attribute(RDF_NS, "parseType");
	let resource = element.attribute(RDF_NS, "resource");

	let mut properties = Vec::new();
	for attr in &element.attributes {
		match (attr.namespace.as_str(), attr.name.as_str()) {
			(XML_NS, "lang") | (RDF_NS, "parseType" | "resource" | "ID" | "nodeID" | "datatype") => {},
			(namespace, name) if is_old_term(namespace, name) => {
				log::warn!("XMP: Ignoring deprecated attribute rdf:{name}");
			},
			(namespace, name) if is_property_attribute(namespace, name) => properties.push(attr),
			(_, name) => log::debug!("XMP: Ignoring property element attribute '{name}'"),
		}
	}

	let namespace = element.namespace.as_str();
	let name = element.name.as_str();

	let mut node = if let Some(resource) = resource {
		let mut node = XmpNode::simple(namespace, name, resource);
		node.set_qualifier(RDF_NS, "resource", "");
		node
	} else if let Some(parse_type) = parse_type {
		if parse_type != "Resource" {
			log::warn!("XMP: Skipping '{name}', rdf:parseType=\"{parse_type}\" is unsupported");
			return Ok(None);
		}

		parse_resource(element, parsing_mode)?
	} else if let Some(first_child) = element.children.first() {
		if element.children.len() > 1 {
			parse_mode_choice!(
				parsing_mode,
				STRICT: decode_err!(@BAIL Xmp, "Property element has more than one node element"),
				DEFAULT: log::warn!("XMP: '{name}' has multiple node elements, only reading the first")
			)
		}

		if !is_node_element(&first_child.namespace, &first_child.name) {
			parse_mode_choice!(
				parsing_mode,
				STRICT: decode_err!(@BAIL Xmp, "Property element contains a non-node element"),
				DEFAULT: {
					log::warn!("XMP: Skipping '{name}', its child is not a node element");
					return Ok(None);
				}
			)
		}

		match XmpNodeType::from_container_name(&first_child.name) {
			Some(array_type) if first_child.namespace == RDF_NS => {
				let mut array = XmpNode::array(namespace, name, array_type)?;
				parse_array_items(first_child, &mut array, parsing_mode)?;
				array
			},
			_ => {
				let mut structure = XmpNode::structure(namespace, name);
				parse_node_element(first_child, &mut structure, parsing_mode)?;
				structure
			},
		}
	} else if !properties.is_empty() {
		let mut structure = XmpNode::structure(namespace, name);
		for attr in properties {
			structure.children.push(XmpNode::simple(
				&attr.namespace,
				&attr.name,
				attr.value.clone(),
			));
		}

		structure
	} else {
		XmpNode::simple(namespace, name, element.text.clone())
	};

	if let Some(lang) = lang {
		node.set_qualifier(XML_NS, "lang", lang);
	}

	Ok(Some(node))
}

fn parse_array_items(
	container: &XmlElement,
	array: &mut XmpNode,
	parsing_mode: ParsingMode,
) -> Result<()> {
	for item in &container.children {
		if !item.is(RDF_NS, "li") {
			parse_mode_choice!(
				parsing_mode,
				STRICT: decode_err!(@BAIL Xmp, "RDF container holds an element other than rdf:li"),
				DEFAULT: {
					log::warn!("XMP: Skipping '{}' in an RDF container", item.name);
					continue;
				}
			)
		}

		if let Some(node) = parse_property_element(item, parsing_mode)? {
			array.children.push(node);
		}
	}

	Ok(())
}

// `rdf:parseType="Resource"`, a struct or a qualified value
fn parse_resource(element: &XmlElement, parsing_mode: ParsingMode) -> Result<XmpNode> {
	let namespace = element.namespace.as_str();
	let name = element.name.as_str();

	let Some(value) = element
		.children
		.iter()
		.find(|child| child.is(RDF_NS, "value"))
	else {
		let mut structure = XmpNode::structure(namespace, name);
		for child in &element.children {
			if !is_property_element(&child.namespace, &child.name) {
				parse_mode_choice!(
					parsing_mode,
					STRICT: decode_err!(@BAIL Xmp, "Resource contains a non-property element"),
					DEFAULT: {
						log::warn!("XMP: Skipping non-property element '{}' in '{name}'", child.name);
						continue;
					}
				)
			}

			if let Some(node) = parse_property_element(child, parsing_mode)? {
				structure.children.push(node);
			}
		}

		return Ok(structure);
	};

	let mut node = XmpNode::simple(namespace, name, value.text.clone());
	for child in &element.children {
		if child.is(RDF_NS, "value") {
			continue;
		}

		if !is_property_element(&child.namespace, &child.name) {
			parse_mode_choice!(
				parsing_mode,
				STRICT: decode_err!(@BAIL Xmp, "Qualified value contains a non-property element"),
				DEFAULT: {
					log::warn!("XMP: Skipping non-property qualifier '{}' of '{name}'", child.name);
					continue;
				}
			)
		}

		if !child.children.is_empty() {
			log::warn!("XMP: Skipping structured qualifier '{}'", child.name);
			continue;
		}

		node.set_qualifier(&child.namespace, &child.name, child.text.clone());
	}

	Ok(node)
}
