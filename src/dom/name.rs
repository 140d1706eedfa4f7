//! Namespace-resolved names

use std::borrow::Cow;

pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

/// An element or attribute name with its prefix resolved against the declarations in scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// `None` when the name is in no namespace.
    pub namespace: Option<String>,
    pub prefix: Option<String>,
    pub local_name: String,
}

/// A single `xmlns` or `xmlns:prefix` declaration made on an element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespaceDeclaration {
    /// `None` for the default namespace.
    pub prefix: Option<String>,
    /// Empty when the default namespace is undeclared with `xmlns=""`.
    pub uri: String,
}

impl QName {
    pub fn new(namespace: Option<&str>, prefix: Option<&str>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: non_empty(namespace),
            prefix: non_empty(prefix),
            local_name: local_name.into(),
        }
    }

    pub fn local(local_name: impl Into<String>) -> Self {
        Self::new(None, None, local_name)
    }

    /// The name as written in the source, `prefix:local` or just `local`.
    pub fn qualified(&self) -> Cow<'_, str> {
        match &self.prefix {
            Some(prefix) => Cow::Owned(format!("{}:{}", prefix, self.local_name)),
            None => Cow::Borrowed(&self.local_name),
        }
    }

    /// Matches against a namespace URI and local name. `"*"` matches anything in either position.
    pub fn matches(&self, namespace: Option<&str>, local_name: &str) -> bool {
        let namespace_matches = match namespace {
            Some("*") => true,
            other => non_empty_str(other) == self.namespace.as_deref(),
        };

        namespace_matches && (local_name == "*" || local_name == self.local_name)
    }
}

impl From<xml::name::OwnedName> for QName {
    fn from(name: xml::name::OwnedName) -> Self {
        Self {
            namespace: name.namespace.filter(|ns| !ns.is_empty()),
            prefix: name.prefix.filter(|p| !p.is_empty()),
            local_name: name.local_name,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    non_empty_str(value).map(str::to_string)
}

fn non_empty_str(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[test]
fn test_qualified_name() {
    let prefixed = QName::new(Some("urn:x"), Some("x"), "b");
    assert_eq!(prefixed.qualified(), "x:b");

    let plain = QName::local("a");
    assert_eq!(plain.qualified(), "a");
    assert_eq!(plain.namespace, None);
}

#[test]
fn test_empty_namespace_is_none() {
    let name = QName::new(Some(""), Some(""), "a");
    assert_eq!(name, QName::local("a"));
}

#[test]
fn test_matches() {
    let name = QName::new(Some("http://www.w3.org/1998/Math/MathML"), Some("m"), "mi");

    assert!(name.matches(Some("http://www.w3.org/1998/Math/MathML"), "mi"));
    assert!(name.matches(Some("*"), "mi"));
    assert!(name.matches(Some("http://www.w3.org/1998/Math/MathML"), "*"));
    assert!(!name.matches(None, "mi"));
    assert!(!name.matches(Some("http://www.w3.org/1998/Math/MathML"), "mo"));

    let unqualified = QName::local("mi");
    assert!(unqualified.matches(None, "mi"));
    assert!(unqualified.matches(Some(""), "mi"));
}
