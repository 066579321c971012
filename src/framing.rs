//! LSP-over-JSON-RPC header framing:
//! `Content-Length: <n>\r\n\r\n<payload>`, optionally preceded by a
//! `Content-Type` header. The payload is opaque UTF-8 JSON text handed
//! straight to the codec; this module never looks inside it.

use std::io::{self, BufRead, Read, Write};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FramingError {
    #[error("transport closed")]
    Eof,
    #[error("missing Content-Length header")]
    MissingContentLength,
    #[error("malformed Content-Length header: {0}")]
    MalformedContentLength(String),
    #[error("header line is not valid UTF-8")]
    InvalidHeaderEncoding,
    #[error("payload is not valid UTF-8: {0}")]
    InvalidPayloadEncoding(#[from] std::string::FromUtf8Error),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Reads one framed message's raw JSON payload from `reader`.
///
/// Returns `Err(FramingError::Eof)` when the transport is closed before any
/// header bytes arrive, which the listener treats as a clean shutdown
/// rather than a protocol violation.
pub fn read_message(reader: &mut impl BufRead) -> Result<String, FramingError> {
    let mut content_length: Option<usize> = None;
    let mut saw_any_header_line = false;

    loop {
        let mut line = Vec::new();
        let bytes_read = reader.read_until(b'\n', &mut line)?;
        if bytes_read == 0 {
            return if saw_any_header_line {
                Err(FramingError::MissingContentLength)
            } else {
                Err(FramingError::Eof)
            };
        }
        saw_any_header_line = true;

        let line = String::from_utf8(line).map_err(|_| FramingError::InvalidHeaderEncoding)?;
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            break;
        }

        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("Content-Length") {
                content_length = Some(
                    value
                        .parse()
                        .map_err(|_| FramingError::MalformedContentLength(value.to_owned()))?,
                );
            }
            // Content-Type and any other header is read and discarded; the
            // framing layer is agnostic to payload shape.
        }
    }

    let content_length = content_length.ok_or(FramingError::MissingContentLength)?;
    let mut payload = vec![0u8; content_length];
    reader.read_exact(&mut payload)?;
    Ok(String::from_utf8(payload)?)
}

/// Writes one framed message, computing `Content-Length` from the UTF-8
/// byte length of `payload`.
pub fn write_message(writer: &mut impl Write, payload: &str) -> io::Result<()> {
    write!(writer, "Content-Length: {}\r\n\r\n", payload.len())?;
    writer.write_all(payload.as_bytes())?;
    writer.flush()
}

/// Wraps a byte-level transport pair so the listener and the outbound
/// writer deal only in framed JSON text.
pub struct FramedReader<R> {
    inner: io::BufReader<R>,
}

impl<R: Read> FramedReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner: io::BufReader::new(inner),
        }
    }

    pub fn read_message(&mut self) -> Result<String, FramingError> {
        read_message(&mut self.inner)
    }
}

pub struct FramedWriter<W> {
    inner: W,
}

impl<W: Write> FramedWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn write_message(&mut self, payload: &str) -> io::Result<()> {
        write_message(&mut self.inner, payload)
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn round_trip_single_message() {
        let mut buf = Vec::new();
        write_message(&mut buf, r#"{"jsonrpc":"2.0"}"#).unwrap();
        let mut cursor = Cursor::new(buf);
        let read_back = read_message(&mut cursor).unwrap();
        assert_eq!(read_back, r#"{"jsonrpc":"2.0"}"#);
    }

    #[test]
    fn content_type_header_is_ignored() {
        let raw = "Content-Type: application/vscode-jsonrpc; charset=utf-8\r\nContent-Length: 2\r\n\r\n{}";
        let mut cursor = Cursor::new(raw.as_bytes().to_vec());
        assert_eq!(read_message(&mut cursor).unwrap(), "{}");
    }

    #[test]
    fn missing_content_length_is_an_error() {
        let raw = "Content-Type: application/json\r\n\r\n{}";
        let mut cursor = Cursor::new(raw.as_bytes().to_vec());
        assert!(matches!(
            read_message(&mut cursor),
            Err(FramingError::MissingContentLength)
        ));
    }

    #[test]
    fn clean_eof_before_any_header() {
        let mut cursor = Cursor::new(Vec::<u8>::new());
        assert!(matches!(read_message(&mut cursor), Err(FramingError::Eof)));
    }

    #[test]
    fn multiple_messages_back_to_back() {
        let mut buf = Vec::new();
        write_message(&mut buf, "1").unwrap();
        write_message(&mut buf, "2").unwrap();
        let mut cursor = Cursor::new(buf);
        assert_eq!(read_message(&mut cursor).unwrap(), "1");
        assert_eq!(read_message(&mut cursor).unwrap(), "2");
    }
}
