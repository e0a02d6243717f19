//! Incremental HTTP/1.1 response header parser.
//!
//! Bytes arrive in whatever fragments the socket hands out. The parser
//! buffers them until the blank line (`CRLF CRLF`) that ends the header block
//! has been seen, then parses the status line and header fields once.

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";
const VERSION_MARKER: &str = "HTTP/";

/// Response header block, filled in by [`append`](HeaderParser::append).
///
/// Field names keep the case they arrived with and lookups through
/// [`get`](HeaderParser::get), [`contains`](HeaderParser::contains) and
/// [`equals`](HeaderParser::equals) are case-sensitive. A repeated name
/// collects every value under its first occurrence, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderParser {
    buffer: Vec<u8>,
    done: bool,
    code: u16,
    reason: String,
    length: usize,
    fields: Vec<(String, Vec<String>)>,
}

impl HeaderParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next fragment. Does nothing once the header block is complete.
    pub fn append(&mut self, fragment: &[u8]) {
        if self.done {
            return;
        }

        // The terminator may straddle the previous fragment boundary.
        let search_from = self.buffer.len().saturating_sub(HEADER_TERMINATOR.len() - 1);
        self.buffer.extend_from_slice(fragment);

        if let Some(pos) = find(&self.buffer[search_from..], HEADER_TERMINATOR) {
            let end = search_from + pos;
            let block = std::mem::take(&mut self.buffer);
            self.complete(&block[..end]);
            self.length = end + HEADER_TERMINATOR.len();
            self.done = true;
            tracing::debug!(
                code = self.code,
                reason = %self.reason,
                length = self.length,
                fields = self.fields.len(),
                "header block complete"
            );
        }
    }

    fn complete(&mut self, block: &[u8]) {
        let text = String::from_utf8_lossy(block);
        let mut status_seen = false;

        for line in text.split('\n') {
            if !status_seen {
                // Anything ahead of the status line is not a header.
                if let Some(idx) = line.find(VERSION_MARKER) {
                    status_seen = true;
                    self.parse_status_line(&line[idx + VERSION_MARKER.len()..]);
                }
                continue;
            }

            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            let value = value
                .trim_end_matches('\r')
                .trim_matches(|c: char| c == ' ' || c == '\t');
            self.push_field(name, value);
        }
    }

    /// `rest` is the status line after the `HTTP/` marker: `1.1 200 OK\r`.
    fn parse_status_line(&mut self, rest: &str) {
        let rest = rest.trim_end_matches('\r');
        let Some((_version, after_version)) = rest.split_once(' ') else {
            return;
        };
        let after_version = after_version.trim_start_matches(' ');
        let (code, reason) = after_version
            .split_once(' ')
            .unwrap_or((after_version, ""));

        self.code = code.parse().unwrap_or(0);
        self.reason = reason.trim_matches(|c: char| c == ' ' || c == '\r').to_string();
    }

    fn push_field(&mut self, name: &str, value: &str) {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, values)) => values.push(value.to_string()),
            None => self.fields.push((name.to_string(), vec![value.to_string()])),
        }
    }

    /// True once the blank line ending the header block has been seen.
    pub fn done(&self) -> bool {
        self.done
    }

    /// Status code, 0 until the status line has been parsed.
    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Length of the header block including the terminating blank line.
    /// The body starts at this offset of the raw response.
    pub fn length(&self) -> usize {
        self.length
    }

    /// All values of `name`, empty if absent.
    pub fn get(&self, name: &str) -> &[String] {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    /// True iff `name` is present and one of its values is exactly `value`.
    pub fn equals(&self, name: &str, value: &str) -> bool {
        self.get(name).iter().any(|v| v == value)
    }

    /// Unique field names in arrival order.
    pub fn keys(&self) -> Vec<&str> {
        self.fields.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Every (name, value) pair in arrival order, repeated names grouped.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .flat_map(|(n, values)| values.iter().map(move |v| (n.as_str(), v.as_str())))
    }

    /// Values of every field whose name matches `name` ignoring ASCII case.
    pub fn field_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.fields
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .flat_map(|(_, values)| values.iter().map(String::as_str))
    }

    /// Like [`equals`](Self::equals) but with an ASCII-case-insensitive name.
    /// The value still has to match exactly.
    pub fn field_equals(&self, name: &str, value: &str) -> bool {
        self.field_values(name).any(|v| v == value)
    }
}

pub(crate) fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
