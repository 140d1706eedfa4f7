use std::io::Read;

use log::trace;
use xml::common::{Position, XmlVersion};
use xml::reader::{EventReader, XmlEvent};

use crate::dom::{Attribute, Document, Element, Node, QName};
use crate::errors::DOMError;

use super::namespaces::NamespaceScopes;

#[derive(Debug, Clone)]
pub(crate) struct TreeOptions {
    pub(crate) ignoring_whitespace: bool,
}

/// The finished tree and how many elements it holds.
pub(crate) struct BuiltDocument {
    pub(crate) document: Document,
    pub(crate) element_count: usize,
}

// nodes outside the root element go to the prolog or epilog, depending on whether the root was seen yet
fn push_node(stack: &mut [Element], outside: &mut Vec<Node>, node: Node) {
    let siblings = match stack.last_mut() {
        Some(parent) => &mut parent.children,
        None => outside,
    };

    if let Node::Text(text) = &node {
        if let Some(Node::Text(previous)) = siblings.last_mut() {
            previous.push_str(text);
            return;
        }
    }

    siblings.push(node);
}

pub(crate) fn document<R: Read>(
    mut reader: EventReader<R>,
    options: &TreeOptions,
    document_uri: Option<String>,
) -> Result<BuiltDocument, DOMError> {
    let mut xml_version = "1.0".to_string();
    let mut encoding = "UTF-8".to_string();
    let mut standalone = None;

    let mut prolog: Vec<Node> = Vec::new();
    let mut epilog: Vec<Node> = Vec::new();
    let mut root: Option<Element> = None;

    let mut stack: Vec<Element> = Vec::new();
    let mut scopes = NamespaceScopes::new();
    let mut element_count = 0;

    loop {
        let event = reader.next()?;
        let outside = if root.is_some() { &mut epilog } else { &mut prolog };

        match event {
            XmlEvent::StartDocument {
                version,
                encoding: declared_encoding,
                standalone: declared_standalone,
            } => {
                xml_version = match version {
                    XmlVersion::Version10 => "1.0".to_string(),
                    XmlVersion::Version11 => "1.1".to_string(),
                };
                encoding = declared_encoding;
                standalone = declared_standalone;
            }
            XmlEvent::StartElement {
                name,
                attributes,
                namespace,
            } => {
                trace!("start element {}", name);
                let mut element = Element::new(QName::from(name));
                element.namespace_declarations = scopes.push(namespace);
                element.attributes = attributes
                    .into_iter()
                    .map(|attr| Attribute {
                        name: QName::from(attr.name),
                        value: attr.value,
                    })
                    .collect();

                element_count += 1;
                stack.push(element);
            }
            XmlEvent::EndElement { .. } => {
                scopes.pop();
                // the engine rejects unbalanced end tags before they get here
                if let Some(element) = stack.pop() {
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Element(element)),
                        None => root = Some(element),
                    }
                }
            }
            XmlEvent::Characters(text) => {
                if stack.is_empty() && text.trim().is_empty() {
                    continue;
                }
                push_node(&mut stack, outside, Node::Text(text));
            }
            XmlEvent::Whitespace(text) => {
                if stack.is_empty() || options.ignoring_whitespace {
                    continue;
                }
                push_node(&mut stack, outside, Node::Text(text));
            }
            XmlEvent::CData(text) => push_node(&mut stack, outside, Node::CData(text)),
            XmlEvent::Comment(text) => push_node(&mut stack, outside, Node::Comment(text)),
            XmlEvent::ProcessingInstruction { name, data } => {
                push_node(&mut stack, outside, Node::ProcessingInstruction { target: name, data });
            }
            XmlEvent::EndDocument => break,
            #[allow(unreachable_patterns)]
            _ => {}
        }
    }

    let Some(root) = root else {
        let position = reader.position();
        return Err(DOMError::MalformedXMLError {
            message: "document has no root element".to_string(),
            line: position.row + 1,
            column: position.column + 1,
        });
    };

    let document = Document {
        xml_version,
        encoding,
        standalone,
        document_uri,
        prolog,
        root,
        epilog,
    };

    Ok(BuiltDocument { document, element_count })
}

#[cfg(test)]
fn parse(xml: &str, ignoring_whitespace: bool) -> Result<Document, DOMError> {
    let reader = xml::reader::ParserConfig::new()
        .whitespace_to_characters(false)
        .ignore_comments(false)
        .create_reader(xml.as_bytes());
    document(reader, &TreeOptions { ignoring_whitespace }, None).map(|built| built.document)
}

#[test]
fn test_namespaced_child() {
    let document = parse(r#"<a xmlns:x="urn:x"><x:b>hi</x:b></a>"#, false).unwrap();

    let root = document.root();
    assert_eq!(root.local_name(), "a");
    assert_eq!(root.namespace_uri(), None);
    assert_eq!(root.namespace_declarations.len(), 1);

    let children: Vec<&Element> = root.child_elements().collect();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].local_name(), "b");
    assert_eq!(children[0].prefix(), Some("x"));
    assert_eq!(children[0].namespace_uri(), Some("urn:x"));
    assert_eq!(children[0].text_content(), "hi");
}

#[test]
fn test_default_namespace_applies_to_elements_not_attributes() {
    let xml = r#"<math xmlns="http://www.w3.org/1998/Math/MathML" display="block"><mi>x</mi></math>"#;
    let document = parse(xml, false).unwrap();

    let root = document.root();
    assert_eq!(root.namespace_uri(), Some("http://www.w3.org/1998/Math/MathML"));
    assert_eq!(root.attributes.len(), 1);
    assert_eq!(root.attributes[0].name.namespace, None);
    assert_eq!(root.attribute(None, "display"), Some("block"));

    let mi = root.get_child(Some("http://www.w3.org/1998/Math/MathML"), "mi").unwrap();
    assert!(mi.namespace_declarations.is_empty());
}

#[test]
fn test_prolog_and_epilog() {
    let xml = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- before -->\n<root/>\n<?done now?>\n";
    let document = parse(xml, false).unwrap();

    assert_eq!(document.xml_version, "1.0");
    assert_eq!(document.encoding, "UTF-8");
    assert_eq!(document.prolog, vec![Node::Comment(" before ".to_string())]);
    assert_eq!(
        document.epilog,
        vec![Node::ProcessingInstruction {
            target: "done".to_string(),
            data: Some("now".to_string()),
        }]
    );
    assert!(document.root().children.is_empty());
}

#[test]
fn test_whitespace_nodes() {
    let xml = "<mrow>\n  <mi>a</mi>\n</mrow>";

    let kept = parse(xml, false).unwrap();
    assert_eq!(kept.root().children.len(), 3);
    assert_eq!(kept.root().children[0], Node::Text("\n  ".to_string()));

    let dropped = parse(xml, true).unwrap();
    assert_eq!(dropped.root().children.len(), 1);
}

#[test]
fn test_unclosed_tag_is_malformed() {
    let result = parse("<a><b>text</b>", false);
    assert!(matches!(result, Err(DOMError::MalformedXMLError { .. })));
}
