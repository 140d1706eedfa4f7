use super::name::{NamespaceDeclaration, QName};
use super::Node;

#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QName,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct Element {
    pub name: QName,
    pub attributes: Vec<Attribute>,
    /// Declarations made on this element itself, sorted by prefix with the default namespace first.
    pub namespace_declarations: Vec<NamespaceDeclaration>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: QName) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            namespace_declarations: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn local_name(&self) -> &str {
        &self.name.local_name
    }

    pub fn namespace_uri(&self) -> Option<&str> {
        self.name.namespace.as_deref()
    }

    pub fn prefix(&self) -> Option<&str> {
        self.name.prefix.as_deref()
    }

    pub fn qualified_name(&self) -> std::borrow::Cow<'_, str> {
        self.name.qualified()
    }

    /// Looks up an attribute value by namespace URI and local name.
    pub fn attribute(&self, namespace: Option<&str>, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name.matches(namespace, local_name))
            .map(|attr| attr.value.as_str())
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// First child element with the given name.
    pub fn get_child(&self, namespace: Option<&str>, local_name: &str) -> Option<&Element> {
        self.child_elements().find(|e| e.name.matches(namespace, local_name))
    }

    /// All descendant elements (not including `self`) with the given name, in document order.
    pub fn elements_by_name(&self, namespace: Option<&str>, local_name: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_elements(namespace, local_name, &mut found);
        found
    }

    fn collect_elements<'a>(&'a self, namespace: Option<&str>, local_name: &str, found: &mut Vec<&'a Element>) {
        for child in self.child_elements() {
            if child.name.matches(namespace, local_name) {
                found.push(child);
            }
            child.collect_elements(namespace, local_name, found);
        }
    }

    /// Concatenation of all descendant text and CDATA, like the DOM `textContent` property.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.append_text(&mut text);
        text
    }

    fn append_text(&self, text: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) | Node::CData(t) => text.push_str(t),
                Node::Element(e) => e.append_text(text),
                Node::Comment(_) | Node::ProcessingInstruction { .. } => {}
            }
        }
    }
}

// attributes are unordered in XML, everything else compares in document order
impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.namespace_declarations == other.namespace_declarations
            && self.attributes.len() == other.attributes.len()
            && self.attributes.iter().all(|attr| {
                other
                    .attributes
                    .iter()
                    .any(|o| o.name == attr.name && o.value == attr.value)
            })
            && self.children == other.children
    }
}

impl Eq for Element {}

#[cfg(test)]
fn sample_tree() -> Element {
    let mut root = Element::new(QName::local("a"));
    root.namespace_declarations.push(NamespaceDeclaration {
        prefix: Some("x".to_string()),
        uri: "urn:x".to_string(),
    });

    let mut b = Element::new(QName::new(Some("urn:x"), Some("x"), "b"));
    b.attributes.push(Attribute {
        name: QName::new(Some("urn:x"), Some("x"), "kind"),
        value: "first".to_string(),
    });
    b.children.push(Node::Text("hi".to_string()));

    let mut c = Element::new(QName::local("c"));
    c.children.push(Node::CData(" there".to_string()));
    c.children.push(Node::Comment("ignored".to_string()));

    let mut nested = Element::new(QName::new(Some("urn:x"), Some("x"), "b"));
    nested.children.push(Node::Text("!".to_string()));
    c.children.push(Node::Element(nested));

    root.children.push(Node::Element(b));
    root.children.push(Node::Element(c));
    root
}

#[test]
fn test_attribute_lookup() {
    let root = sample_tree();
    let b = root.get_child(Some("urn:x"), "b").unwrap();

    assert_eq!(b.attribute(Some("urn:x"), "kind"), Some("first"));
    assert_eq!(b.attribute(None, "kind"), None);
    assert_eq!(b.attribute(Some("*"), "kind"), Some("first"));
}

#[test]
fn test_elements_by_name_in_document_order() {
    let root = sample_tree();

    let found = root.elements_by_name(Some("urn:x"), "b");
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].text_content(), "hi");
    assert_eq!(found[1].text_content(), "!");

    assert_eq!(root.elements_by_name(Some("*"), "*").len(), 3);
    assert!(root.elements_by_name(None, "b").is_empty());
}

#[test]
fn test_text_content_skips_comments() {
    let root = sample_tree();
    assert_eq!(root.text_content(), "hi there!");
}

#[test]
fn test_equality_ignores_attribute_order() {
    let mut left = Element::new(QName::local("mi"));
    left.attributes.push(Attribute {
        name: QName::local("mathvariant"),
        value: "bold".to_string(),
    });
    left.attributes.push(Attribute {
        name: QName::local("id"),
        value: "m1".to_string(),
    });

    let mut right = left.clone();
    right.attributes.reverse();
    assert_eq!(left, right);

    right.children.push(Node::Text("x".to_string()));
    assert_ne!(left, right);
}
