use super::namespace::RDF_NS;
use crate::error::Result;
use crate::macros::err;

use std::collections::BTreeMap;

/// The shape of an [`XmpNode`]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum XmpNodeType {
	/// A single text value
	Simple,
	/// A set of named fields
	Struct,
	/// An unordered array (`rdf:Bag`)
	Bag,
	/// An ordered array (`rdf:Seq`)
	Seq,
	/// A set of alternatives, usually translations (`rdf:Alt`)
	Alt,
}

impl XmpNodeType {
	/// Whether this is [`XmpNodeType::Bag`], [`XmpNodeType::Seq`], or [`XmpNodeType::Alt`]
	pub fn is_array(self) -> bool {
		matches!(self, Self::Bag | Self::Seq | Self::Alt)
	}

	pub(crate) fn from_container_name(name: &str) -> Option<Self> {
		match name {
			"Bag" => Some(Self::Bag),
			"Seq" => Some(Self::Seq),
			"Alt" => Some(Self::Alt),
			_ => None,
		}
	}

	pub(crate) fn container_name(self) -> Option<&'static str> {
		match self {
			Self::Bag => Some("Bag"),
			Self::Seq => Some("Seq"),
			Self::Alt => Some("Alt"),
			Self::Simple | Self::Struct => None,
		}
	}
}

/// A node of an XMP property tree
///
/// Simple nodes carry a value, structs and arrays carry children. Array items are always named
/// `rdf:li`, and are addressed by their position.
///
/// Qualifiers (such as `xml:lang`) are keyed by their namespace and name.
///
/// # Examples
///
/// ```rust
/// use tagsmith::xmp::namespace::{DC_NS, XML_NS};
/// use tagsmith::xmp::{XmpNode, XmpNodeType};
///
/// # fn main() -> tagsmith::error::Result<()> {
/// let mut title = XmpNode::array(DC_NS, "title", XmpNodeType::Alt)?;
///
/// let mut item = XmpNode::simple("", "", "Un titre");
/// item.set_qualifier(XML_NS, "lang", "fr");
/// title.add_child(item)?;
///
/// let item = &title.children()[0];
/// assert_eq!(item.name(), "li");
/// assert_eq!(item.value(), Some("Un titre"));
/// assert_eq!(item.qualifier(XML_NS, "lang"), Some("fr"));
/// # Ok(()) }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmpNode {
	pub(crate) namespace: String,
	pub(crate) name: String,
	pub(crate) node_type: XmpNodeType,
	pub(crate) value: Option<String>,
	pub(crate) children: Vec<XmpNode>,
	pub(crate) qualifiers: BTreeMap<(String, String), String>,
}

impl XmpNode {
	pub(super) fn new(
		namespace: &str,
		name: &str,
		node_type: XmpNodeType,
		value: Option<String>,
	) -> Self {
		Self {
			namespace: namespace.to_owned(),
			name: name.to_owned(),
			node_type,
			value,
			children: Vec::new(),
			qualifiers: BTreeMap::new(),
		}
	}

	/// Create a [`XmpNodeType::Simple`] node
	pub fn simple(namespace: &str, name: &str, value: impl Into<String>) -> Self {
		Self::new(namespace, name, XmpNodeType::Simple, Some(value.into()))
	}

	/// Create an empty [`XmpNodeType::Struct`] node
	pub fn structure(namespace: &str, name: &str) -> Self {
		Self::new(namespace, name, XmpNodeType::Struct, None)
	}

	/// Create an empty array node
	///
	/// # Errors
	///
	/// `array_type` is not one of [`XmpNodeType::Bag`], [`XmpNodeType::Seq`], or [`XmpNodeType::Alt`]
	pub fn array(namespace: &str, name: &str, array_type: XmpNodeType) -> Result<Self> {
		if !array_type.is_array() {
			err!(InvalidArgument("Expected an array node type"));
		}

		Ok(Self::new(namespace, name, array_type, None))
	}

	/// The namespace URI of the node
	pub fn namespace(&self) -> &str {
		&self.namespace
	}

	/// The local name of the node
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The shape of the node
	pub fn node_type(&self) -> XmpNodeType {
		self.node_type
	}

	/// The value of a [`XmpNodeType::Simple`] node
	pub fn value(&self) -> Option<&str> {
		self.value.as_deref()
	}

	/// Set the value, turning the node into a [`XmpNodeType::Simple`] node
	///
	/// Any children are discarded.
	pub fn set_value(&mut self, value: impl Into<String>) {
		self.node_type = XmpNodeType::Simple;
		self.children.clear();
		self.value = Some(value.into());
	}

	/// The children of a struct or array, in document order
	pub fn children(&self) -> &[XmpNode] {
		&self.children
	}

	/// The number of children
	pub fn child_count(&self) -> usize {
		self.children.len()
	}

	/// Get the first direct child with the given name
	pub fn child(&self, namespace: &str, name: &str) -> Option<&XmpNode> {
		self.children
			.iter()
			.find(|child| child.is(namespace, name))
	}

	/// Get a mutable reference to the first direct child with the given name
	pub fn child_mut(&mut self, namespace: &str, name: &str) -> Option<&mut XmpNode> {
		self.children
			.iter_mut()
			.find(|child| child.is(namespace, name))
	}

	/// Append a child
	///
	/// Children of arrays are renamed to `rdf:li`.
	///
	/// # Errors
	///
	/// The node is a [`XmpNodeType::Simple`] node
	pub fn add_child(&mut self, mut child: XmpNode) -> Result<()> {
		match self.node_type {
			XmpNodeType::Simple => err!(InvalidArgument("Simple XMP nodes cannot have children")),
			XmpNodeType::Struct => {},
			XmpNodeType::Bag | XmpNodeType::Seq | XmpNodeType::Alt => {
				RDF_NS.clone_into(&mut child.namespace);
				"li".clone_into(&mut child.name);
			},
		}

		self.children.push(child);
		Ok(())
	}

	/// Remove every direct child with the given name, returning the first one
	pub fn remove_child(&mut self, namespace: &str, name: &str) -> Option<XmpNode> {
		let mut removed = None;
		let mut index = 0;
		while index < self.children.len() {
			if self.children[index].is(namespace, name) {
				let child = self.children.remove(index);
				if removed.is_none() {
					removed = Some(child);
				}
			} else {
				index += 1;
			}
		}

		removed
	}

	/// Get a qualifier value
	pub fn qualifier(&self, namespace: &str, name: &str) -> Option<&str> {
		self.qualifiers
			.get(&(namespace.to_owned(), name.to_owned()))
			.map(String::as_str)
	}

	/// Set a qualifier, replacing any existing value
	pub fn set_qualifier(&mut self, namespace: &str, name: &str, value: impl Into<String>) {
		self.qualifiers
			.insert((namespace.to_owned(), name.to_owned()), value.into());
	}

	/// Remove a qualifier
	pub fn remove_qualifier(&mut self, namespace: &str, name: &str) -> Option<String> {
		self.qualifiers
			.remove(&(namespace.to_owned(), name.to_owned()))
	}

	/// Iterate over the qualifiers as `((namespace, name), value)`
	pub fn qualifiers(&self) -> impl Iterator<Item = ((&str, &str), &str)> {
		self.qualifiers
			.iter()
			.map(|((namespace, name), value)| ((namespace.as_str(), name.as_str()), value.as_str()))
	}

	/// Find the first descendant with the given name
	///
	/// The search is depth first, in document order, and does not consider the node itself.
	pub fn find_node(&self, namespace: &str, name: &str) -> Option<&XmpNode> {
		for child in &self.children {
			if child.is(namespace, name) {
				return Some(child);
			}

			if let Some(found) = child.find_node(namespace, name) {
				return Some(found);
			}
		}

		None
	}

	pub(crate) fn is(&self, namespace: &str, name: &str) -> bool {
		self.namespace == namespace && self.name == name
	}
}
