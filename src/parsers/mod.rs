mod document;
mod namespaces;

pub(crate) use document::{document, TreeOptions};
