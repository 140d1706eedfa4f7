//! The input-source abstraction: a stream plus optional metadata describing it

use std::borrow::Cow;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};

use log::{debug, warn};
use xml::Encoding;

use crate::util::system_id_to_path;

enum SourceStream<'a> {
    Bytes(Box<dyn Read + 'a>),
    Characters(Cow<'a, str>),
}

/// A single XML input, given as a byte stream, as already decoded characters, or only by its
/// system id.
///
/// When several are present the character stream wins over the byte stream, and either wins
/// over the system id. Streams are borrowed for `'a` when given by reference, the caller keeps
/// ownership of them and is responsible for closing them.
#[derive(Default)]
pub struct InputSource<'a> {
    stream: Option<SourceStream<'a>>,
    encoding: Option<String>,
    system_id: Option<String>,
    public_id: Option<String>,
}

/// An input source resolved to something readable.
pub(crate) struct OpenedSource<'a> {
    pub(crate) reader: Box<dyn Read + 'a>,
    /// Overrides whatever encoding the input declares or starts with.
    pub(crate) encoding: Option<Encoding>,
    pub(crate) document_uri: Option<String>,
}

impl<'a> InputSource<'a> {
    /// An empty input source. Parsing it fails until a stream or system id is added.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_byte_stream<R: Read + 'a>(stream: R) -> Self {
        Self::new().with_byte_stream(stream)
    }

    pub fn from_characters(text: impl Into<Cow<'a, str>>) -> Self {
        Self::new().with_characters(text)
    }

    pub fn from_system_id(system_id: impl Into<String>) -> Self {
        Self::new().with_system_id(system_id)
    }

    pub fn with_byte_stream<R: Read + 'a>(mut self, stream: R) -> Self {
        if !matches!(self.stream, Some(SourceStream::Characters(_))) {
            self.stream = Some(SourceStream::Bytes(Box::new(stream)));
        }
        self
    }

    pub fn with_characters(mut self, text: impl Into<Cow<'a, str>>) -> Self {
        self.stream = Some(SourceStream::Characters(text.into()));
        self
    }

    /// Encoding label for the byte stream, taking precedence over the XML declaration and any
    /// byte order mark. UTF-8, US-ASCII, ISO-8859-1 and the UTF-16 family are understood.
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    pub fn with_system_id(mut self, system_id: impl Into<String>) -> Self {
        self.system_id = Some(system_id.into());
        self
    }

    pub fn with_public_id(mut self, public_id: impl Into<String>) -> Self {
        self.public_id = Some(public_id.into());
        self
    }

    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    pub fn system_id(&self) -> Option<&str> {
        self.system_id.as_deref()
    }

    pub fn public_id(&self) -> Option<&str> {
        self.public_id.as_deref()
    }

    pub(crate) fn open(mut self) -> Result<OpenedSource<'a>, io::Error> {
        let document_uri = self.system_id.clone();

        let (reader, encoding): (Box<dyn Read + 'a>, Option<Encoding>) = match self.stream.take() {
            Some(SourceStream::Characters(text)) => {
                if let Some(encoding) = &self.encoding {
                    warn!("ignoring encoding {} for an already decoded character stream", encoding);
                }
                // whatever the XML declaration says, the text is UTF-8 by now
                let reader: Box<dyn Read + 'a> = match text {
                    Cow::Borrowed(text) => Box::new(text.as_bytes()),
                    Cow::Owned(text) => Box::new(io::Cursor::new(text.into_bytes())),
                };
                (reader, Some(Encoding::Utf8))
            }
            Some(SourceStream::Bytes(stream)) => (stream, self.parse_encoding()?),
            None => {
                let Some(system_id) = &self.system_id else {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "input source has no byte stream, character stream or system id",
                    ));
                };
                let encoding = self.parse_encoding()?;
                (Box::new(File::open(system_id_to_path(system_id)?)?), encoding)
            }
        };

        Ok(OpenedSource {
            reader,
            encoding,
            document_uri,
        })
    }

    fn parse_encoding(&self) -> Result<Option<Encoding>, io::Error> {
        let Some(label) = &self.encoding else {
            return Ok(None);
        };

        let encoding = label.trim().parse::<Encoding>().map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("unsupported encoding: {}", label))
        })?;
        debug!("decoding input as {} ({:?})", label, encoding);
        Ok(Some(encoding))
    }
}

impl fmt::Debug for InputSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stream = match &self.stream {
            Some(SourceStream::Bytes(_)) => "bytes",
            Some(SourceStream::Characters(_)) => "characters",
            None => "none",
        };

        f.debug_struct("InputSource")
            .field("stream", &stream)
            .field("encoding", &self.encoding)
            .field("system_id", &self.system_id)
            .field("public_id", &self.public_id)
            .finish()
    }
}

#[test]
fn test_empty_source_is_invalid_input() {
    let Err(error) = InputSource::new().open() else {
        panic!("an empty input source opened");
    };
    assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
}

#[test]
fn test_characters_win_over_bytes() {
    let source = InputSource::from_characters("<a/>").with_byte_stream("<b/>".as_bytes());

    let mut opened = source.open().unwrap();
    let mut text = String::new();
    opened.reader.read_to_string(&mut text).unwrap();
    assert_eq!(text, "<a/>");
}

#[test]
fn test_system_id_becomes_document_uri() {
    let source = InputSource::from_byte_stream("<a/>".as_bytes()).with_system_id("urn:formula:1");

    let opened = source.open().unwrap();
    assert_eq!(opened.document_uri.as_deref(), Some("urn:formula:1"));
}

#[test]
fn test_encoding_labels() {
    let source = InputSource::from_byte_stream("<a/>".as_bytes()).with_encoding("ISO-8859-1");
    assert!(source.open().unwrap().encoding.is_some());

    let source = InputSource::from_byte_stream("<a/>".as_bytes()).with_encoding("utf-16le");
    assert!(source.open().unwrap().encoding.is_some());

    let source = InputSource::from_byte_stream("<a/>".as_bytes());
    assert!(source.open().unwrap().encoding.is_none());

    let Err(error) = InputSource::from_byte_stream("<a/>".as_bytes()).with_encoding("Shift_JIS").open() else {
        panic!("an unknown encoding label was accepted");
    };
    assert_eq!(error.kind(), io::ErrorKind::InvalidInput);

    // already decoded text has no encoding left to apply
    let source = InputSource::from_characters("<a/>").with_encoding("Shift_JIS");
    assert!(source.open().is_ok());
}
