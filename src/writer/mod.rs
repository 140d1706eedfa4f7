//! Serialising document trees back to XML text.
//!
//! The root element goes through `xmltree`'s emitter, which also makes any [`Element`] usable
//! by code written against `xmltree`. Namespace declarations are written where they were made
//! in the source, so re-parsing the output gives back an equal tree. The one exception is an
//! `xmlns=""` undeclaration, which the emitter drops.
use std::io::Write;

use xml::namespace::Namespace;
use xml::writer::EmitterConfig;
use xmltree::XMLNode;

use crate::dom::{Document, Element, Node};

mod error;

pub use error::DOMWriterError;

impl From<&Element> for xmltree::Element {
    fn from(element: &Element) -> Self {
        let mut out = xmltree::Element::new(&element.name.local_name);
        out.prefix = element.name.prefix.clone();
        out.namespace = element.name.namespace.clone();

        if !element.namespace_declarations.is_empty() {
            let mut namespaces = Namespace::empty();
            for declaration in &element.namespace_declarations {
                namespaces.put(declaration.prefix.as_deref().unwrap_or(""), declaration.uri.as_str());
            }
            out.namespaces = Some(namespaces);
        }

        // keyed by qualified name, the prefix stays bound through the declarations above
        for attr in &element.attributes {
            out.attributes
                .insert(attr.name.qualified().into_owned(), attr.value.clone());
        }

        out.children = element.children.iter().map(XMLNode::from).collect();
        out
    }
}

impl From<&Node> for XMLNode {
    fn from(node: &Node) -> Self {
        match node {
            Node::Element(e) => XMLNode::Element(e.into()),
            Node::Text(text) => XMLNode::Text(text.clone()),
            Node::CData(text) => XMLNode::CData(text.clone()),
            Node::Comment(text) => XMLNode::Comment(text.clone()),
            Node::ProcessingInstruction { target, data } => XMLNode::ProcessingInstruction(target.clone(), data.clone()),
        }
    }
}

// prolog and epilog only ever hold comments and processing instructions
fn write_outside_root<W: Write>(writer: &mut W, nodes: &[Node]) -> Result<(), DOMWriterError> {
    for node in nodes {
        match node {
            Node::Comment(text) => writeln!(writer, "<!--{}-->", text)?,
            Node::ProcessingInstruction { target, data: Some(data) } => writeln!(writer, "<?{} {}?>", target, data)?,
            Node::ProcessingInstruction { target, data: None } => writeln!(writer, "<?{}?>", target)?,
            Node::Element(_) | Node::Text(_) | Node::CData(_) => {}
        }
    }
    Ok(())
}

impl Document {
    /// Writes the document as UTF-8, whatever encoding it was read in.
    pub fn write<W: Write>(&self, mut writer: W) -> Result<(), DOMWriterError> {
        write!(writer, "<?xml version=\"{}\" encoding=\"UTF-8\"", self.xml_version)?;
        if let Some(standalone) = self.standalone {
            write!(writer, " standalone=\"{}\"", if standalone { "yes" } else { "no" })?;
        }
        writeln!(writer, "?>")?;

        write_outside_root(&mut writer, &self.prolog)?;

        let root = xmltree::Element::from(&self.root);
        let config = EmitterConfig::new()
            .perform_indent(false)
            .write_document_declaration(false);
        root.write_with_config(&mut writer, config)?;

        if !self.epilog.is_empty() {
            writeln!(writer)?;
            write_outside_root(&mut writer, &self.epilog)?;
        }

        Ok(())
    }

    pub fn to_xml_string(&self) -> Result<String, DOMWriterError> {
        let mut bytes = Vec::new();
        self.write(&mut bytes)?;
        Ok(String::from_utf8(bytes)?)
    }
}

#[cfg(test)]
fn parse(xml: &str) -> Document {
    crate::BuilderConfig::new().build().unwrap().parse_str(xml).unwrap()
}

#[test]
fn test_to_xmltree_element() {
    let document = parse(r#"<a xmlns:x="urn:x" x:id="1"><x:b>hi</x:b></a>"#);
    let element = xmltree::Element::from(document.root());

    assert_eq!(element.name, "a");
    assert_eq!(element.attributes.get("x:id").map(String::as_str), Some("1"));

    let b = element.get_child("b").unwrap();
    assert_eq!(b.namespace.as_deref(), Some("urn:x"));
    assert_eq!(b.prefix.as_deref(), Some("x"));
    assert_eq!(b.get_text().as_deref(), Some("hi"));
}

#[test]
fn test_written_document_reparses_equal() {
    let xml = concat!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
        "<!-- formula 1 -->\n",
        "<m:math xmlns:m=\"http://www.w3.org/1998/Math/MathML\" xmlns:xlink=\"http://www.w3.org/1999/xlink\">",
        "<m:mrow xlink:href=\"#eq1\"><m:mi>x</m:mi><m:mo>&lt;</m:mo><m:mn>2</m:mn></m:mrow>",
        "<m:mtext><![CDATA[a & b]]></m:mtext>",
        "</m:math>\n",
        "<?unify done?>\n",
    );
    let document = parse(xml);

    let written = document.to_xml_string().unwrap();
    let reparsed = parse(&written);

    assert!(document.structurally_eq(&reparsed), "{}", written);
    let mrow = reparsed.elements_by_name(Some("http://www.w3.org/1998/Math/MathML"), "mrow");
    assert_eq!(
        mrow[0].attribute(Some("http://www.w3.org/1999/xlink"), "href"),
        Some("#eq1")
    );
}
