use std::io;
use std::path::PathBuf;

use url::Url;

/// Turns a system id into a local file path.
///
/// Plain paths and `file:` URIs are accepted, the latter percent-decoded. Any other URI scheme,
/// or a `file:` URI naming another host, is refused so that parsing never reaches out over the
/// network.
pub(crate) fn system_id_to_path(system_id: &str) -> Result<PathBuf, io::Error> {
    if system_id.get(..5).is_some_and(|scheme| scheme.eq_ignore_ascii_case("file:")) {
        let url = Url::parse(system_id)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("invalid URI {}: {}", system_id, e)))?;
        return url.to_file_path().map_err(|()| {
            io::Error::new(
                io::ErrorKind::Unsupported,
                format!("cannot read {}: not a local file", system_id),
            )
        });
    }

    if let Some((scheme, _)) = system_id.split_once("://") {
        if is_uri_scheme(scheme) {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("cannot read {}: only local files are supported", system_id),
            ));
        }
    }

    Ok(PathBuf::from(system_id))
}

// RFC 3986: ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )
fn is_uri_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

#[test]
fn test_plain_path() {
    assert_eq!(
        system_id_to_path("tests/read/mathml.xml").unwrap(),
        PathBuf::from("tests/read/mathml.xml")
    );
    // not a URI, so no decoding either
    assert_eq!(system_id_to_path("a%20b.xml").unwrap(), PathBuf::from("a%20b.xml"));
}

#[cfg(unix)]
#[test]
fn test_file_uris() {
    assert_eq!(system_id_to_path("file:///tmp/a.xml").unwrap(), PathBuf::from("/tmp/a.xml"));
    assert_eq!(
        system_id_to_path("file://localhost/tmp/a.xml").unwrap(),
        PathBuf::from("/tmp/a.xml")
    );
    assert_eq!(system_id_to_path("FILE:///tmp/a.xml").unwrap(), PathBuf::from("/tmp/a.xml"));
}

#[cfg(unix)]
#[test]
fn test_file_uri_is_percent_decoded() {
    assert_eq!(
        system_id_to_path("file:///tmp/formula%201.xml").unwrap(),
        PathBuf::from("/tmp/formula 1.xml")
    );
    assert_eq!(
        system_id_to_path("file:///tmp/caf%C3%A9.xml").unwrap(),
        PathBuf::from("/tmp/caf\u{e9}.xml")
    );
}

#[test]
fn test_file_uri_on_other_host_refused() {
    let error = system_id_to_path("file://example.com/tmp/a.xml").unwrap_err();
    assert_eq!(error.kind(), io::ErrorKind::Unsupported);

    // only the exact host name localhost is local
    let error = system_id_to_path("file://localhostx/tmp/a.xml").unwrap_err();
    assert_eq!(error.kind(), io::ErrorKind::Unsupported);
}

#[test]
fn test_remote_system_id_refused() {
    let error = system_id_to_path("http://example.com/formula.xml").unwrap_err();
    assert_eq!(error.kind(), io::ErrorKind::Unsupported);
}
