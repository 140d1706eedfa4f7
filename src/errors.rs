//! Errors that can occur when building a document tree
use std::io;

use thiserror::Error;
use xml::common::Position;

/// The three kinds of failure a parse call can end in.
///
/// Configuration problems are defects of the caller or environment, malformed input is a
/// defect of the data, and I/O problems come from the transport the XML was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    MalformedInput,
    Io,
}

#[derive(Debug, Error)]
pub enum DOMError {
    /// The parser could not be built with the requested configuration.
    #[error("Parser configuration not supported: {0}")]
    ConfigurationError(String),

    /// The input is not well-formed XML. `line` and `column` are 1-based.
    #[error("Malformed XML at {line}:{column}: {message}")]
    MalformedXMLError { message: String, line: u64, column: u64 },

    #[error(transparent)]
    IOError(#[from] io::Error),
}

impl DOMError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DOMError::ConfigurationError(_) => ErrorKind::Configuration,
            DOMError::MalformedXMLError { .. } => ErrorKind::MalformedInput,
            DOMError::IOError(_) => ErrorKind::Io,
        }
    }
}

// xml-rs reports transport failures and syntax errors through the same type, split them here
impl From<xml::reader::Error> for DOMError {
    fn from(error: xml::reader::Error) -> Self {
        match error.kind() {
            xml::reader::ErrorKind::Io(io_error) => {
                DOMError::IOError(io::Error::new(io_error.kind(), error.to_string()))
            }
            _ => {
                let position = error.position();
                DOMError::MalformedXMLError {
                    message: error.msg().to_string(),
                    line: position.row + 1,
                    column: position.column + 1,
                }
            }
        }
    }
}

#[test]
fn test_error_kinds() {
    let config = DOMError::ConfigurationError("validation".to_string());
    assert_eq!(config.kind(), ErrorKind::Configuration);

    let malformed = DOMError::MalformedXMLError {
        message: "unexpected end of stream".to_string(),
        line: 1,
        column: 4,
    };
    assert_eq!(malformed.kind(), ErrorKind::MalformedInput);
    assert_eq!(malformed.to_string(), "Malformed XML at 1:4: unexpected end of stream");

    let io_error = DOMError::from(io::Error::new(io::ErrorKind::NotFound, "missing"));
    assert_eq!(io_error.kind(), ErrorKind::Io);
}

#[test]
fn test_reader_syntax_error_is_malformed() {
    let mut reader = xml::reader::EventReader::new("<a><b></a>".as_bytes());
    let error = loop {
        match reader.next() {
            Ok(xml::reader::XmlEvent::EndDocument) => panic!("mismatched tags parsed without error"),
            Ok(_) => continue,
            Err(e) => break e,
        }
    };

    let dom_error = DOMError::from(error);
    assert_eq!(dom_error.kind(), ErrorKind::MalformedInput);
    if let DOMError::MalformedXMLError { line, .. } = dom_error {
        assert_eq!(line, 1);
    }
}
