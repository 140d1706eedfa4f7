#![forbid(unsafe_code)]
#![deny(nonstandard_style)]
#![warn(array_into_iter)]

//! Build namespace-aware XML document trees
//!
//! Four entry points turn XML into an owned [`Document`], one for each way a caller may hold
//! the source: a filesystem path, an open [`File`], an [`InputSource`], or any [`Read`] stream.
//! Each call configures its own namespace-aware [`DocumentBuilder`] and parses with it, so
//! calls share no state and may run concurrently from any number of threads.
//!
//! ```
//! let xml = r#"<a xmlns:x="urn:x"><x:b>hi</x:b></a>"#;
//! let document = dom_builder::parse_stream(xml.as_bytes()).unwrap();
//!
//! let b = document.root().get_child(Some("urn:x"), "b").unwrap();
//! assert_eq!(b.text_content(), "hi");
//! ```
//!
//! Failures come in three kinds, see [`ErrorKind`]. None of them are retried or recovered from,
//! and no partial tree is ever returned.

use std::fs::File;
use std::io::Read;

mod builder;
mod config;
mod errors;
mod input;
mod parsers;
mod util;

pub mod dom;
pub mod writer;

pub use builder::DocumentBuilder;
pub use config::BuilderConfig;
pub use dom::{Attribute, Document, Element, NamespaceDeclaration, Node, QName};
pub use errors::{DOMError, ErrorKind};
pub use input::InputSource;
pub use writer::DOMWriterError;

fn namespace_aware_builder() -> Result<DocumentBuilder, DOMError> {
    BuilderConfig::new().namespace_aware(true).build()
}

/// Builds a document from the file at `path`.
///
/// `path` may also be a `file:` URI. Other URI schemes fail with an I/O error.
pub fn parse_path(path: &str) -> Result<Document, DOMError> {
    namespace_aware_builder()?.parse_path(path)
}

/// Builds a document from an open file, which stays open and owned by the caller.
pub fn parse_file(file: &File) -> Result<Document, DOMError> {
    namespace_aware_builder()?.parse_file(file)
}

/// Builds a document from an [`InputSource`].
pub fn parse_source(source: InputSource<'_>) -> Result<Document, DOMError> {
    namespace_aware_builder()?.parse_source(source)
}

/// Builds a document from everything `stream` yields.
///
/// The stream is not closed, pass `&mut stream` to keep it.
pub fn parse_stream<R: Read>(stream: R) -> Result<Document, DOMError> {
    namespace_aware_builder()?.parse_stream(stream)
}

/// Builds a document from XML held in memory.
pub fn parse_bytes(bytes: &[u8]) -> Result<Document, DOMError> {
    namespace_aware_builder()?.parse_bytes(bytes)
}

#[test]
fn test_builder_is_thread_safe() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DocumentBuilder>();
    assert_send_sync::<Document>();
    assert_send_sync::<DOMError>();
}
