//! In-memory, namespace-aware document tree.
//!
//! Trees are fully owned: a [`Document`] shares nothing with the parser that built it or with
//! any other document, so it can be moved across threads and mutated freely.

mod element;
mod name;

pub use element::{Attribute, Element};
pub use name::{NamespaceDeclaration, QName, XMLNS_NAMESPACE, XML_NAMESPACE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction { target: String, data: Option<String> },
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// From the XML declaration, `"1.0"` when there is none.
    pub xml_version: String,
    pub encoding: String,
    pub standalone: Option<bool>,
    /// Path or system id the document was read from, if known.
    pub document_uri: Option<String>,
    /// Comments and processing instructions before the root element.
    pub prolog: Vec<Node>,
    pub root: Element,
    /// Comments and processing instructions after the root element.
    pub epilog: Vec<Node>,
}

impl Document {
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// All elements with the given name, the root included, in document order.
    pub fn elements_by_name(&self, namespace: Option<&str>, local_name: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        if self.root.name.matches(namespace, local_name) {
            found.push(&self.root);
        }
        found.extend(self.root.elements_by_name(namespace, local_name));
        found
    }

    /// Compares two trees while ignoring where they were read from.
    pub fn structurally_eq(&self, other: &Document) -> bool {
        self.xml_version == other.xml_version
            && self.encoding == other.encoding
            && self.standalone == other.standalone
            && self.prolog == other.prolog
            && self.root == other.root
            && self.epilog == other.epilog
    }
}

#[test]
fn test_structurally_eq_ignores_document_uri() {
    let document = Document {
        xml_version: "1.0".to_string(),
        encoding: "UTF-8".to_string(),
        standalone: None,
        document_uri: Some("tests/read/simple.xml".to_string()),
        prolog: vec![Node::Comment(" generated ".to_string())],
        root: Element::new(QName::local("math")),
        epilog: Vec::new(),
    };

    let mut other = document.clone();
    other.document_uri = None;
    assert!(document.structurally_eq(&other));
    assert_ne!(document, other);

    other.prolog.clear();
    assert!(!document.structurally_eq(&other));
}

#[test]
fn test_elements_by_name_includes_root() {
    let mut root = Element::new(QName::local("mrow"));
    root.children.push(Node::Element(Element::new(QName::local("mrow"))));

    let document = Document {
        xml_version: "1.0".to_string(),
        encoding: "UTF-8".to_string(),
        standalone: None,
        document_uri: None,
        prolog: Vec::new(),
        root,
        epilog: Vec::new(),
    };

    assert_eq!(document.elements_by_name(None, "mrow").len(), 2);
    assert!(document.root().children[0].is_element());
}
