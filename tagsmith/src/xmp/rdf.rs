//! RDF/XML term classification
//!
//! These follow the grammar of the RDF/XML syntax, sections 7.2.2 to 7.2.7. Every function only
//! looks at names in the RDF namespace, any other (non-empty) namespace is always allowed.

use super::namespace::{RDF_NS, XML_NS};

// `rdf:RDF`, `rdf:ID`, `rdf:about`, `rdf:parseType`, `rdf:resource`, `rdf:nodeID`, `rdf:datatype`
const CORE_SYNTAX_TERMS: [&str; 7] = [
	"RDF",
	"ID",
	"about",
	"parseType",
	"resource",
	"nodeID",
	"datatype",
];

const OLD_TERMS: [&str; 3] = ["aboutEach", "aboutEachPrefix", "bagID"];

/// Whether the name is one of the core syntax terms, such as `rdf:about`
pub fn is_core_syntax_term(namespace: &str, name: &str) -> bool {
	namespace == RDF_NS && CORE_SYNTAX_TERMS.contains(&name)
}

/// Whether the name is one of the terms removed from RDF, such as `rdf:bagID`
pub fn is_old_term(namespace: &str, name: &str) -> bool {
	namespace == RDF_NS && OLD_TERMS.contains(&name)
}

/// Whether an element with this name can describe a resource, such as `rdf:Description`
///
/// # Examples
///
/// ```rust
/// use tagsmith::xmp::namespace::{DC_NS, RDF_NS};
/// use tagsmith::xmp::rdf::is_node_element;
///
/// assert!(is_node_element(RDF_NS, "Description"));
/// assert!(is_node_element(RDF_NS, "Bag"));
/// assert!(is_node_element(DC_NS, "title"));
/// assert!(!is_node_element(RDF_NS, "li"));
/// ```
pub fn is_node_element(namespace: &str, name: &str) -> bool {
	if namespace.is_empty() {
		return false;
	}

	!is_core_syntax_term(namespace, name)
		&& !(namespace == RDF_NS && name == "li")
		&& !is_old_term(namespace, name)
}

/// Whether an element with this name can be a property, such as `dc:title` or `rdf:li`
pub fn is_property_element(namespace: &str, name: &str) -> bool {
	if namespace.is_empty() {
		return false;
	}

	!is_core_syntax_term(namespace, name)
		&& !(namespace == RDF_NS && name == "Description")
		&& !is_old_term(namespace, name)
}

/// Whether an attribute with this name is a property, such as `xmp:Rating="5"`
///
/// Attributes in the XML namespace (`xml:lang`) are never properties.
pub fn is_property_attribute(namespace: &str, name: &str) -> bool {
	if namespace.is_empty() || namespace == XML_NS {
		return false;
	}

	!is_core_syntax_term(namespace, name)
		&& !(namespace == RDF_NS && (name == "Description" || name == "li"))
		&& !is_old_term(namespace, name)
}
