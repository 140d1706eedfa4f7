use std::collections::BTreeMap;

use xml::namespace::Namespace;

use crate::dom::{NamespaceDeclaration, XMLNS_NAMESPACE, XML_NAMESPACE};

/// Tracks the namespace bindings in scope for each open element.
///
/// xml-rs folds `xmlns` attributes into the full mapping in scope at every start tag, so the
/// declarations made on one element are recovered by comparing it against its parent's.
pub(crate) struct NamespaceScopes {
    scopes: Vec<BTreeMap<String, String>>,
}

impl NamespaceScopes {
    pub(crate) fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    /// Enters an element and returns the declarations it made.
    pub(crate) fn push(&mut self, in_scope: Namespace) -> Vec<NamespaceDeclaration> {
        let in_scope = in_scope.0;
        let declarations = match self.scopes.last() {
            Some(parent) => declared(parent, &in_scope),
            None => declared(&BTreeMap::new(), &in_scope),
        };
        self.scopes.push(in_scope);
        declarations
    }

    pub(crate) fn pop(&mut self) {
        self.scopes.pop();
    }
}

fn declared(parent: &BTreeMap<String, String>, current: &BTreeMap<String, String>) -> Vec<NamespaceDeclaration> {
    current
        .iter()
        .filter(|(prefix, uri)| !is_reserved(prefix, uri))
        .filter(|(prefix, uri)| {
            let inherited = parent.get(prefix.as_str());
            if prefix.is_empty() {
                // no default namespace and an empty one are the same thing
                inherited.map_or("", String::as_str) != uri.as_str()
            } else {
                inherited != Some(*uri)
            }
        })
        .map(|(prefix, uri)| NamespaceDeclaration {
            prefix: (!prefix.is_empty()).then(|| prefix.clone()),
            uri: uri.clone(),
        })
        .collect()
}

fn is_reserved(prefix: &str, uri: &str) -> bool {
    (prefix == "xml" && uri == XML_NAMESPACE) || (prefix == "xmlns" && uri == XMLNS_NAMESPACE)
}

#[cfg(test)]
fn namespace(bindings: &[(&str, &str)]) -> Namespace {
    let mut ns = Namespace::empty();
    ns.put("xml", XML_NAMESPACE);
    ns.put("xmlns", XMLNS_NAMESPACE);
    for (prefix, uri) in bindings {
        ns.put(*prefix, *uri);
    }
    ns
}

#[test]
fn test_root_declarations() {
    let mut scopes = NamespaceScopes::new();
    let declarations = scopes.push(namespace(&[("", ""), ("x", "urn:x")]));

    assert_eq!(
        declarations,
        vec![NamespaceDeclaration {
            prefix: Some("x".to_string()),
            uri: "urn:x".to_string(),
        }]
    );
}

#[test]
fn test_inherited_bindings_are_not_redeclared() {
    let mut scopes = NamespaceScopes::new();
    scopes.push(namespace(&[("m", "http://www.w3.org/1998/Math/MathML")]));

    let child = scopes.push(namespace(&[("m", "http://www.w3.org/1998/Math/MathML"), ("x", "urn:x")]));
    assert_eq!(child.len(), 1);
    assert_eq!(child[0].prefix.as_deref(), Some("x"));

    scopes.pop();
    let sibling = scopes.push(namespace(&[("m", "urn:rebound")]));
    assert_eq!(sibling[0].uri, "urn:rebound");
}

#[test]
fn test_default_namespace_undeclared() {
    let mut scopes = NamespaceScopes::new();
    let root = scopes.push(namespace(&[("", "http://www.w3.org/1998/Math/MathML")]));
    assert_eq!(root[0].prefix, None);

    let child = scopes.push(namespace(&[("", "")]));
    assert_eq!(
        child,
        vec![NamespaceDeclaration {
            prefix: None,
            uri: String::new(),
        }]
    );
}
