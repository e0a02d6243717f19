//! Response body reassembly and decoding.
//!
//! The exchange buffers the whole response before the body is looked at, so
//! the reader works on the complete raw region that follows the header block.
//! Framing is removed first, then the content coding is undone.

use crate::base::neterror::NetError;
use crate::http::contentcoding::{self, ContentCoding};
use crate::http::headerparser::{find, HeaderParser};
use bytes::Bytes;
use http::Method;

const CRLF: &[u8] = b"\r\n";

/// How the end of the body is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramingMode {
    /// Exactly this many bytes follow the header block.
    LengthDelimited(usize),
    /// A sequence of hex-sized chunks ending with a zero-size chunk.
    Chunked,
    /// Everything up to end-of-stream.
    StreamUntilClose,
}

impl FramingMode {
    /// `Transfer-Encoding: chunked` takes precedence over `Content-Length`.
    /// Repeated `Content-Length` fields must agree.
    pub fn from_headers(headers: &HeaderParser) -> Result<Self, NetError> {
        if headers.field_equals("Transfer-Encoding", "chunked") {
            return Ok(FramingMode::Chunked);
        }

        let mut declared: Option<&str> = None;
        for value in headers
            .field_values("Content-Length")
            .flat_map(|v| v.split(','))
            .map(str::trim)
        {
            match declared {
                Some(prev) if prev != value => {
                    return Err(NetError::ResponseHeadersMultipleContentLength)
                }
                _ => declared = Some(value),
            }
        }

        match declared {
            Some(value) => value
                .parse::<usize>()
                .map(FramingMode::LengthDelimited)
                .map_err(|_| NetError::InvalidContentLength(value.to_string())),
            None => Ok(FramingMode::StreamUntilClose),
        }
    }
}

/// Turns the raw bytes after the header block into the decoded body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyReader {
    framing: FramingMode,
    coding: ContentCoding,
}

impl BodyReader {
    pub fn new(framing: FramingMode, coding: ContentCoding) -> Self {
        Self { framing, coding }
    }

    /// Reader for the response to a `method` request. Responses to `HEAD`
    /// and `1xx`/`204`/`304` responses never carry a body.
    pub fn for_response(headers: &HeaderParser, method: &Method) -> Result<Self, NetError> {
        let code = headers.code();
        let bodiless =
            *method == Method::HEAD || (100..200).contains(&code) || code == 204 || code == 304;

        let framing = if bodiless {
            FramingMode::LengthDelimited(0)
        } else {
            FramingMode::from_headers(headers)?
        };
        let coding = ContentCoding::from_headers(headers);

        tracing::debug!(framing = ?framing, coding = coding.as_str(), "body reader selected");
        Ok(Self::new(framing, coding))
    }

    pub fn framing(&self) -> FramingMode {
        self.framing
    }

    pub fn coding(&self) -> ContentCoding {
        self.coding
    }

    /// Reassemble `raw` per the framing mode, then decode it.
    pub fn read(&self, raw: &[u8]) -> Result<Bytes, NetError> {
        let body = match self.framing {
            FramingMode::LengthDelimited(expected) => {
                if raw.len() < expected {
                    return Err(NetError::ContentLengthMismatch {
                        expected,
                        actual: raw.len(),
                    });
                }
                if raw.len() > expected {
                    tracing::warn!(
                        expected,
                        extra = raw.len() - expected,
                        "discarding bytes past Content-Length"
                    );
                }
                raw[..expected].to_vec()
            }
            FramingMode::Chunked => decode_chunked(raw)?,
            FramingMode::StreamUntilClose => raw.to_vec(),
        };

        if self.coding == ContentCoding::Identity {
            return Ok(Bytes::from(body));
        }
        let decoded = contentcoding::decompress(&body, self.coding)?;
        tracing::debug!(
            coding = self.coding.as_str(),
            encoded = body.len(),
            decoded = decoded.len(),
            "body decoded"
        );
        Ok(Bytes::from(decoded))
    }
}

/// Strip chunked transfer framing from `raw`.
///
/// Chunk extensions after `;` are ignored, as is everything after the
/// zero-size chunk.
pub fn decode_chunked(raw: &[u8]) -> Result<Vec<u8>, NetError> {
    let mut out = Vec::new();
    let mut rest = raw;

    loop {
        if let Some(stripped) = rest.strip_prefix(CRLF) {
            rest = stripped;
        }

        let line_end = find(rest, CRLF).ok_or(NetError::IncompleteChunkedEncoding)?;
        let size = parse_chunk_size(&rest[..line_end])?;
        rest = &rest[line_end + CRLF.len()..];
        tracing::debug!(size, "chunk");

        if size == 0 {
            return Ok(out);
        }
        if rest.len() < size {
            return Err(NetError::IncompleteChunkedEncoding);
        }
        out.extend_from_slice(&rest[..size]);
        rest = &rest[size..];
    }
}

fn parse_chunk_size(line: &[u8]) -> Result<usize, NetError> {
    let text = String::from_utf8_lossy(line);
    let malformed = || NetError::InvalidChunkedEncoding {
        line: text.to_string(),
    };

    let digits = text.split(';').next().unwrap_or_default().trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(malformed());
    }
    usize::from_str_radix(digits, 16).map_err(|_| malformed())
}
