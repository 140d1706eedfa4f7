use std::fs::{self, File, OpenOptions};
use std::io::{self, Read};
use std::thread;

use dom_builder::{DOMError, Document, ErrorKind, InputSource, Node};

const MATHML: &str = "http://www.w3.org/1998/Math/MathML";
const XLINK: &str = "http://www.w3.org/1999/xlink";

const MATHML_FILE: &str = "tests/read/mathml.xml";
const MALFORMED_FILE: &str = "tests/read/malformed.xml";

/// The same file through every entry point.
fn parse_all_ways(file_path: &str) -> Vec<Result<Document, DOMError>> {
    let bytes = fs::read(file_path).unwrap();
    let file = File::open(file_path).unwrap();

    vec![
        dom_builder::parse_path(file_path),
        dom_builder::parse_file(&file),
        dom_builder::parse_source(InputSource::from_byte_stream(bytes.as_slice())),
        dom_builder::parse_stream(bytes.as_slice()),
    ]
}

#[test]
fn every_entry_point_builds_the_same_tree() {
    let documents: Vec<Document> = parse_all_ways(MATHML_FILE).into_iter().map(Result::unwrap).collect();

    assert_eq!(documents[0].document_uri.as_deref(), Some(MATHML_FILE));
    for document in &documents[1..] {
        assert!(documents[0].structurally_eq(document));
    }
}

#[test]
fn read_mathml_namespaces() {
    let document = dom_builder::parse_path(MATHML_FILE).unwrap();

    assert_eq!(document.prolog, vec![Node::Comment(" quadratic formula ".to_string())]);

    let root = document.root();
    assert_eq!(root.local_name(), "math");
    assert_eq!(root.prefix(), Some("m"));
    assert_eq!(root.namespace_uri(), Some(MATHML));
    assert_eq!(root.namespace_declarations.len(), 2);
    assert_eq!(root.attribute(None, "display"), Some("block"));

    let mrow = root.get_child(Some(MATHML), "mrow").unwrap();
    assert_eq!(mrow.attribute(Some(XLINK), "href"), Some("#quadratic"));
    assert_eq!(mrow.attribute(None, "href"), None);

    assert_eq!(document.elements_by_name(Some(MATHML), "mi").len(), 6);
    assert!(document.elements_by_name(None, "mi").is_empty());

    // content markup under a default namespace declared further down
    let ci = document.elements_by_name(Some(MATHML), "ci");
    assert_eq!(ci.len(), 1);
    assert_eq!(ci[0].prefix(), None);
    assert_eq!(ci[0].text_content(), "x");

    let operators: Vec<String> = document
        .elements_by_name(Some(MATHML), "mo")
        .iter()
        .map(|mo| mo.text_content())
        .collect();
    assert_eq!(operators, vec!["=", "-", "\u{b1}", "-"]);
}

#[test]
fn namespaced_child_through_stream() {
    let xml = r#"<a xmlns:x="urn:x"><x:b>hi</x:b></a>"#;
    let document = dom_builder::parse_stream(xml.as_bytes()).unwrap();

    let root = document.root();
    assert_eq!(root.local_name(), "a");
    assert_eq!(root.namespace_uri(), None);

    let children: Vec<_> = root.child_elements().collect();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].local_name(), "b");
    assert_eq!(children[0].namespace_uri(), Some("urn:x"));
    assert_eq!(children[0].text_content(), "hi");
}

#[test]
fn namespaced_child_every_entry_point() {
    let results = parse_all_ways("tests/read/simple.xml");
    let expected = dom_builder::parse_stream(r#"<a xmlns:x="urn:x"><x:b>hi</x:b></a>"#.as_bytes()).unwrap();

    for result in results {
        let document = result.unwrap();
        assert!(document.structurally_eq(&expected));
        assert_eq!(document.elements_by_name(Some("urn:x"), "b")[0].text_content(), "hi");
    }
}

#[test]
fn malformed_input_fails_everywhere() {
    for result in parse_all_ways(MALFORMED_FILE) {
        let error = result.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MalformedInput, "{}", error);
    }

    let result = dom_builder::parse_source(InputSource::from_characters("<a><b></a>"));
    assert!(matches!(result, Err(DOMError::MalformedXMLError { .. })));
}

#[test]
fn missing_path_is_io_error() {
    let Err(DOMError::IOError(error)) = dom_builder::parse_path("tests/read/does-not-exist.xml") else {
        panic!("missing file did not fail with an I/O error");
    };
    assert_eq!(error.kind(), io::ErrorKind::NotFound);
}

#[test]
fn file_uri_path() {
    let absolute = fs::canonicalize(MATHML_FILE).unwrap();
    let uri = format!("file://{}", absolute.display());

    let document = dom_builder::parse_path(&uri).unwrap();
    let expected = dom_builder::parse_path(MATHML_FILE).unwrap();
    assert!(document.structurally_eq(&expected));
    assert_eq!(document.document_uri, Some(uri));
}

#[test]
fn unreadable_file_handle_is_io_error() {
    let scratch = tempfile::NamedTempFile::new().unwrap();
    fs::write(scratch.path(), "<a/>").unwrap();

    let write_only = OpenOptions::new().write(true).open(scratch.path()).unwrap();
    let error = dom_builder::parse_file(&write_only).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Io);
}

#[test]
fn empty_file_is_io_error() {
    let scratch = tempfile::NamedTempFile::new().unwrap();

    let error = dom_builder::parse_path(scratch.path().to_str().unwrap()).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Io);

    let error = dom_builder::parse_file(scratch.as_file()).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Io);
}

#[test]
fn absent_input_source_is_io_error() {
    let error = dom_builder::parse_source(InputSource::new()).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Io);
}

#[test]
fn input_source_by_system_id() {
    let document = dom_builder::parse_source(InputSource::from_system_id(MATHML_FILE)).unwrap();
    assert_eq!(document.document_uri.as_deref(), Some(MATHML_FILE));
    assert_eq!(document.root().local_name(), "math");

    let remote = InputSource::from_system_id("https://example.com/formula.xml");
    let error = dom_builder::parse_source(remote).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Io);
}

/// Hands out `good` and then fails like a dropped connection.
struct BrokenStream {
    good: &'static [u8],
}

impl Read for BrokenStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.good.is_empty() {
            return Err(io::Error::new(io::ErrorKind::ConnectionReset, "transport failed"));
        }
        let n = self.good.len().min(buf.len());
        buf[..n].copy_from_slice(&self.good[..n]);
        self.good = &self.good[n..];
        Ok(n)
    }
}

#[test]
fn stream_failing_mid_read_is_io_error() {
    let stream = BrokenStream {
        good: b"<math><mrow><mi>x</mi>",
    };

    let error = dom_builder::parse_stream(stream).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Io, "{}", error);
}

#[test]
fn repeated_parses_are_independent() {
    let first = dom_builder::parse_path(MATHML_FILE).unwrap();
    let mut second = dom_builder::parse_path(MATHML_FILE).unwrap();
    assert_eq!(first, second);

    second.root.children.clear();
    assert!(!first.structurally_eq(&second));
    assert!(!first.root().children.is_empty());
}

#[test]
fn concurrent_parses() {
    let expected = dom_builder::parse_path(MATHML_FILE).unwrap();

    thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| dom_builder::parse_path(MATHML_FILE)))
            .collect();

        for handle in handles {
            let document = handle.join().unwrap().unwrap();
            assert_eq!(document, expected);
        }
    });
}

#[test]
fn write_and_read_back() {
    let document = dom_builder::parse_path(MATHML_FILE).unwrap();
    let written = document.to_xml_string().unwrap();

    let reparsed = dom_builder::parse_bytes(written.as_bytes()).unwrap();
    assert!(document.structurally_eq(&reparsed), "{}", written);
}

#[test]
fn file_uri_is_percent_decoded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("formula 1.xml");
    fs::copy(MATHML_FILE, &path).unwrap();

    let uri = format!("file://{}", path.display()).replace(' ', "%20");
    let document = dom_builder::parse_path(&uri).unwrap();
    let expected = dom_builder::parse_path(MATHML_FILE).unwrap();
    assert!(document.structurally_eq(&expected));

    let document = dom_builder::parse_source(InputSource::from_system_id(uri.as_str())).unwrap();
    assert!(document.structurally_eq(&expected));
}

fn utf16le_with_bom(xml: &str) -> Vec<u8> {
    let mut bytes = vec![0xff, 0xfe];
    bytes.extend(xml.encode_utf16().flat_map(u16::to_le_bytes));
    bytes
}

#[test]
fn utf16_input() {
    let bytes = utf16le_with_bom("<m:mo xmlns:m=\"http://www.w3.org/1998/Math/MathML\">\u{b1}</m:mo>");

    let document = dom_builder::parse_stream(bytes.as_slice()).unwrap();
    assert_eq!(document.root().namespace_uri(), Some(MATHML));
    assert_eq!(document.root().text_content(), "\u{b1}");

    let labeled = InputSource::from_byte_stream(bytes.as_slice()).with_encoding("UTF-16");
    let document = dom_builder::parse_source(labeled).unwrap();
    assert_eq!(document.root().text_content(), "\u{b1}");
}

#[test]
fn latin1_input() {
    let bytes: &[u8] = b"<mtext>caf\xe9</mtext>";

    let labeled = InputSource::from_byte_stream(bytes).with_encoding("ISO-8859-1");
    let document = dom_builder::parse_source(labeled).unwrap();
    assert_eq!(document.root().text_content(), "caf\u{e9}");

    let declared: &[u8] = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><mtext>caf\xe9</mtext>";
    let document = dom_builder::parse_stream(declared).unwrap();
    assert_eq!(document.root().text_content(), "caf\u{e9}");
    assert_eq!(document.encoding, "ISO-8859-1");

    // not valid UTF-8 without either
    let error = dom_builder::parse_stream(bytes).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::MalformedInput, "{}", error);
}

#[test]
fn same_content_in_any_labeled_encoding() {
    let xml = "<m:mi xmlns:m=\"http://www.w3.org/1998/Math/MathML\">\u{e9}</m:mi>";
    let utf8 = xml.as_bytes().to_vec();
    let latin1: Vec<u8> = xml.chars().map(|c| c as u8).collect();
    let utf16 = utf16le_with_bom(xml);

    let expected = dom_builder::parse_source(InputSource::from_characters(xml)).unwrap();
    for (bytes, label) in [(&utf8, "UTF-8"), (&latin1, "latin1"), (&utf16, "utf-16")] {
        let source = InputSource::from_byte_stream(bytes.as_slice()).with_encoding(label);
        let document = dom_builder::parse_source(source).unwrap();
        // the reported encoding differs, the tree does not
        assert_eq!(document.root(), expected.root(), "{}", label);
    }
}

#[test]
fn unknown_encoding_label_is_io_error() {
    let source = InputSource::from_byte_stream("<a/>".as_bytes()).with_encoding("EBCDIC");
    let Err(DOMError::IOError(error)) = dom_builder::parse_source(source) else {
        panic!("an unknown encoding label did not fail with an I/O error");
    };
    assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
}
