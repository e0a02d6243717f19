use crate::base::neterror::NetError;
use http::header::{HeaderName, HeaderValue};
use std::str::FromStr;

/// Request header list that strictly preserves insertion order and the
/// caller's spelling of each name.
///
/// Names are validated against the `http` crate's grammar but stored as
/// given, so `User-Agent` goes on the wire as `User-Agent`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedHeaderMap {
    headers: Vec<(String, String)>,
}

impl OrderedHeaderMap {
    pub fn new() -> Self {
        Self {
            headers: Vec::new(),
        }
    }

    /// Set `name` to `value`. An existing entry with the same name (ignoring
    /// ASCII case) is updated in place, otherwise the entry is appended.
    pub fn insert(&mut self, name: &str, value: &str) -> Result<(), NetError> {
        HeaderName::from_str(name).map_err(|_| NetError::InvalidHeader {
            name: name.to_string(),
        })?;
        HeaderValue::from_str(value).map_err(|_| NetError::InvalidHeader {
            name: name.to_string(),
        })?;

        if let Some((_, v)) = self
            .headers
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
        {
            *v = value.to_string();
        } else {
            self.headers.push((name.to_string(), value.to_string()));
        }
        Ok(())
    }

    pub fn remove(&mut self, name: &str) {
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Append `Name: value\r\n` for every entry.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        for (name, value) in &self.headers {
            write_line(out, name, value);
        }
    }
}

pub(crate) fn write_line(out: &mut Vec<u8>, name: &str, value: &str) {
    out.extend_from_slice(name.as_bytes());
    out.extend_from_slice(b": ");
    out.extend_from_slice(value.as_bytes());
    out.extend_from_slice(b"\r\n");
}
