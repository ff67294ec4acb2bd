use std::slice;


/// Ordered multi-value header map
///
/// Names are compared case-insensitively and stored as received. The same
/// name may be present multiple times, lookups return the first value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<(String, String)>,
}

/// Iterator over all values of a single header
pub struct GetAll<'a, 'n> {
    name: &'n str,
    iter: slice::Iter<'a, (String, String)>,
}

impl HeaderMap {
    pub fn new() -> HeaderMap {
        HeaderMap { entries: Vec::new() }
    }
    /// Appends a value, keeping the values already present
    pub fn add<N, V>(&mut self, name: N, value: V)
        where N: Into<String>, V: Into<String>
    {
        self.entries.push((name.into(), value.into()));
    }
    /// Replaces all values of the header with a single one
    pub fn set<N, V>(&mut self, name: N, value: V)
        where N: Into<String>, V: Into<String>
    {
        let name = name.into();
        self.remove(&name);
        self.entries.push((name, value.into()));
    }
    /// Removes all values of the header, returns `true` if there were any
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|&(ref n, _)| !n.eq_ignore_ascii_case(name));
        self.entries.len() != before
    }
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).next()
    }
    pub fn get_all<'a, 'n>(&'a self, name: &'n str) -> GetAll<'a, 'n> {
        GetAll { name: name, iter: self.entries.iter() }
    }
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn clear(&mut self) {
        self.entries.clear();
    }
    /// Iterates over `(name, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item=(&str, &str)> {
        self.entries.iter().map(|&(ref n, ref v)| (&n[..], &v[..]))
    }
}

impl<'a, 'n> Iterator for GetAll<'a, 'n> {
    type Item = &'a str;
    fn next(&mut self) -> Option<&'a str> {
        let name = self.name;
        self.iter.by_ref()
            .find(|&&(ref n, _)| n.eq_ignore_ascii_case(name))
            .map(|&(_, ref v)| &v[..])
    }
}

fn is_space(ch: u8) -> bool {
    matches!(ch, b'\r' | b'\n' | b' ' | b'\t')
}

fn trim(val: &[u8]) -> &[u8] {
    let start = val.iter().position(|&c| !is_space(c)).unwrap_or(val.len());
    let end = val.iter().rposition(|&c| !is_space(c)).map(|x| x + 1)
        .unwrap_or(start);
    &val[start..end]
}

// header value is byte sequence
// we need case insensitive comparison and strip out of the whitespace
fn token_eq(val: &[u8], token: &str) -> bool {
    trim(val).eq_ignore_ascii_case(token.as_bytes())
}

/// Only the exact lowercase token is accepted, without surrounding spaces
pub fn is_chunked(val: &[u8]) -> bool {
    val == b"chunked"
}

pub fn is_continue(val: &[u8]) -> bool {
    token_eq(val, "100-continue")
}

/// Checks a comma-separated `Connection` value for the `close` option
pub fn is_close(val: &[u8]) -> bool {
    val.split(|&x| x == b',').any(|item| token_eq(item, "close"))
}

/// Checks a comma-separated `Connection` value for `keep-alive`
pub fn is_keep_alive(val: &[u8]) -> bool {
    val.split(|&x| x == b',').any(|item| token_eq(item, "keep-alive"))
}

/// Returns the media type of a `Content-Type` value, lowercased
pub fn media_type(content_type: &str) -> String {
    content_type.split(';').next().unwrap_or("")
        .trim().to_ascii_lowercase()
}
