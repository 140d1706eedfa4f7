use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};

use log::debug;
use xml::reader::ParserConfig;
use xml::Encoding;

use crate::dom::Document;
use crate::errors::DOMError;
use crate::input::InputSource;
use crate::parsers::{self, TreeOptions};
use crate::util::system_id_to_path;

/// Parses XML inputs into [`Document`]s using the configuration it was built with.
///
/// A builder holds no state between calls, one instance can be shared across threads and used
/// for any number of parses.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    parser_config: ParserConfig,
    tree_options: TreeOptions,
}

impl DocumentBuilder {
    pub(crate) fn new(parser_config: ParserConfig, tree_options: TreeOptions) -> Self {
        Self {
            parser_config,
            tree_options,
        }
    }

    /// Parses the file at `path`. A `file:` URI is accepted in place of a plain path.
    pub fn parse_path(&self, path: &str) -> Result<Document, DOMError> {
        let file = File::open(system_id_to_path(path)?)?;
        self.parse_reader(file, None, Some(path.to_string()), path)
    }

    /// Parses from an open file. The file is only borrowed and stays open afterwards.
    pub fn parse_file(&self, file: &File) -> Result<Document, DOMError> {
        self.parse_reader(file, None, None, "file handle")
    }

    pub fn parse_source(&self, source: InputSource<'_>) -> Result<Document, DOMError> {
        let description = format!("{:?}", source);
        let opened = source.open()?;
        self.parse_reader(opened.reader, opened.encoding, opened.document_uri, &description)
    }

    /// Parses everything `stream` yields. Pass `&mut stream` to keep using it afterwards.
    pub fn parse_stream<R: Read>(&self, stream: R) -> Result<Document, DOMError> {
        self.parse_reader(stream, None, None, "stream")
    }

    pub fn parse_str(&self, xml: &str) -> Result<Document, DOMError> {
        self.parse_bytes(xml.as_bytes())
    }

    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Document, DOMError> {
        self.parse_reader(bytes, None, None, "bytes")
    }

    fn parse_reader<R: Read>(
        &self,
        input: R,
        encoding: Option<Encoding>,
        document_uri: Option<String>,
        description: &str,
    ) -> Result<Document, DOMError> {
        debug!("Building document from {}", description);

        let mut input = BufReader::new(input);
        if input.fill_buf()?.is_empty() {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no XML content, the input is empty").into());
        }

        // without an override the byte order mark or the XML declaration decides, with one a
        // conflicting declaration is not an error
        let reader = self
            .parser_config
            .clone()
            .override_encoding(encoding)
            .ignore_invalid_encoding_declarations(encoding.is_some())
            .create_reader(input);
        let built = parsers::document(reader, &self.tree_options, document_uri)?;

        debug!("Built document from {} with {} elements", description, built.element_count);
        Ok(built.document)
    }
}

#[cfg(test)]
fn builder() -> DocumentBuilder {
    crate::BuilderConfig::new().build().unwrap()
}

#[test]
fn test_parse_str() {
    let document = builder().parse_str(r#"<a xmlns:x="urn:x"><x:b>hi</x:b></a>"#).unwrap();
    let b = document.root().get_child(Some("urn:x"), "b").unwrap();
    assert_eq!(b.text_content(), "hi");
    assert_eq!(document.document_uri, None);
}

#[test]
fn test_empty_input_is_io_error() {
    let Err(DOMError::IOError(error)) = builder().parse_bytes(b"") else {
        panic!("empty input did not fail with an I/O error");
    };
    assert_eq!(error.kind(), io::ErrorKind::UnexpectedEof);
}

#[test]
fn test_stream_is_left_with_caller() {
    let mut stream = io::Cursor::new(b"<a/>".to_vec());
    builder().parse_stream(&mut stream).unwrap();

    // exhausted now, a second parse has nothing left to read
    assert_eq!(stream.position(), 4);
    let error = builder().parse_stream(&mut stream).unwrap_err();
    assert_eq!(error.kind(), crate::ErrorKind::Io);
}

#[test]
fn test_coalescing_merges_cdata() {
    let xml = "<mtext>a<![CDATA[<b>]]>c</mtext>";

    let plain = builder().parse_str(xml).unwrap();
    assert_eq!(plain.root().children.len(), 3);

    let coalesced = crate::BuilderConfig::new().coalescing(true).build().unwrap();
    let document = coalesced.parse_str(xml).unwrap();
    assert_eq!(
        document.root().children,
        vec![crate::dom::Node::Text("a<b>c".to_string())]
    );
}

#[test]
fn test_ignoring_comments() {
    let xml = "<math><!-- x --><mi>x</mi></math>";

    let kept = builder().parse_str(xml).unwrap();
    assert_eq!(kept.root().children.len(), 2);

    let ignoring = crate::BuilderConfig::new().ignoring_comments(true).build().unwrap();
    assert_eq!(ignoring.parse_str(xml).unwrap().root().children.len(), 1);
}

#[test]
fn test_encoding_label_overrides_declaration() {
    // declared UTF-8, but the bytes are Latin-1
    let bytes = b"<?xml version=\"1.0\" encoding=\"UTF-8\"?><mi>caf\xe9</mi>";

    let source = InputSource::from_byte_stream(&bytes[..]).with_encoding("ISO-8859-1");
    let document = builder().parse_source(source).unwrap();
    assert_eq!(document.root().text_content(), "caf\u{e9}");
}
