//! gzip / deflate body codings.

use crate::base::neterror::NetError;
use crate::http::headerparser::HeaderParser;
use flate2::read::{DeflateDecoder, MultiGzDecoder, ZlibDecoder};
use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;
use std::io::{Read, Write};

/// Whole-body transformation signalled by `Content-Encoding`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContentCoding {
    #[default]
    Identity,
    Gzip,
    Deflate,
}

impl ContentCoding {
    /// Exact, case-sensitive token match. Unknown tokens are `None`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "identity" => Some(ContentCoding::Identity),
            "gzip" => Some(ContentCoding::Gzip),
            "deflate" => Some(ContentCoding::Deflate),
            _ => None,
        }
    }

    /// Coding of a response body. gzip wins if both markers are present.
    pub fn from_headers(headers: &HeaderParser) -> Self {
        if headers.field_equals("Content-Encoding", "gzip") {
            ContentCoding::Gzip
        } else if headers.field_equals("Content-Encoding", "deflate") {
            ContentCoding::Deflate
        } else {
            ContentCoding::Identity
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentCoding::Identity => "identity",
            ContentCoding::Gzip => "gzip",
            ContentCoding::Deflate => "deflate",
        }
    }
}

/// Encode `data` with `method`. `deflate` produces a zlib stream.
pub fn compress(data: &[u8], method: ContentCoding) -> Result<Vec<u8>, NetError> {
    let fail = |e: std::io::Error| NetError::ContentEncodingFailed {
        method: method.as_str().to_string(),
        reason: e.to_string(),
    };

    match method {
        ContentCoding::Identity => Ok(data.to_vec()),
        ContentCoding::Gzip => {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(data).map_err(fail)?;
            encoder.finish().map_err(fail)
        }
        ContentCoding::Deflate => {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(data).map_err(fail)?;
            encoder.finish().map_err(fail)
        }
    }
}

/// Decode `data` encoded with `method`. Empty input decodes to empty output.
///
/// `deflate` is tried as a zlib stream first, then as raw DEFLATE, since
/// servers send both under that name.
pub fn decompress(data: &[u8], method: ContentCoding) -> Result<Vec<u8>, NetError> {
    if data.is_empty() || method == ContentCoding::Identity {
        return Ok(data.to_vec());
    }

    let fail = |e: std::io::Error| NetError::ContentDecodingFailed {
        method: method.as_str().to_string(),
        reason: e.to_string(),
    };

    match method {
        ContentCoding::Identity => Ok(data.to_vec()),
        ContentCoding::Gzip => read_all(MultiGzDecoder::new(data)).map_err(fail),
        ContentCoding::Deflate => match read_all(ZlibDecoder::new(data)) {
            Ok(out) => Ok(out),
            Err(zlib_err) => {
                tracing::debug!(error = %zlib_err, "not a zlib stream, trying raw deflate");
                read_all(DeflateDecoder::new(data)).map_err(fail)
            }
        },
    }
}

fn read_all(mut decoder: impl Read) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}
