use url::form_urlencoded;

use crate::enums::{Method, Version};
use crate::headers::{self, HeaderMap};


/// A request parsed by `RequestParser`
///
/// The parser fills the structure in place while bytes arrive. Once it
/// reports `RequestComplete` the request is taken out of the parser and
/// never changed by it again.
#[derive(Debug, Clone)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Option<String>,
    pub(crate) version: Version,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Vec<u8>,
    pub(crate) expect: Option<String>,
}

impl Request {
    pub(crate) fn new() -> Request {
        Request {
            method: Method::Get,
            path: String::new(),
            query: None,
            version: Version::Http11,
            headers: HeaderMap::new(),
            body: Vec::new(),
            expect: None,
        }
    }
    /// Clears all the fields, keeping allocations
    pub(crate) fn reset(&mut self) {
        self.method = Method::Get;
        self.path.clear();
        self.query = None;
        self.version = Version::Http11;
        self.headers.clear();
        self.body.clear();
        self.expect = None;
    }
    /// Adds a header from the raw line, split at the colon
    ///
    /// Leading whitespace of the name is stripped, as well as a single space
    /// after the colon.
    pub(crate) fn add_raw_header(&mut self, name: &[u8], value: &[u8]) {
        let start = name.iter().position(|&c| c != b' ' && c != b'\t')
            .unwrap_or(name.len());
        let name = String::from_utf8_lossy(&name[start..]).into_owned();
        let value = if value.first() == Some(&b' ') {
            &value[1..]
        } else {
            value
        };
        let value = String::from_utf8_lossy(value).into_owned();
        if name.eq_ignore_ascii_case("Expect") {
            self.expect = Some(value.clone());
        }
        self.headers.add(name, value);
    }

    pub fn method(&self) -> Method {
        self.method
    }
    /// Path part of the request target, without the query
    pub fn path(&self) -> &str {
        &self.path
    }
    /// Raw (not decoded) query string, without the question mark
    pub fn query(&self) -> Option<&str> {
        self.query.as_ref().map(|x| &x[..])
    }
    pub fn version(&self) -> Version {
        self.version
    }
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
    /// Shortcut to the first value of the header
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }
    pub fn body(&self) -> &[u8] {
        &self.body
    }
    /// Value of the `Expect` header as received
    pub fn expect(&self) -> Option<&str> {
        self.expect.as_ref().map(|x| &x[..])
    }
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("Content-Type")
    }
    pub fn is_head(&self) -> bool {
        self.method == Method::Head
    }
    /// Returns `true` if the response must close the connection
    ///
    /// This is the case for HTTP/1.0 requests (unless `keep-alive` is
    /// requested explicitly) and for requests with `Connection: close`.
    pub fn connection_close(&self) -> bool {
        let mut close = false;
        let mut keep_alive = false;
        for value in self.headers.get_all("Connection") {
            close |= headers::is_close(value.as_bytes());
            keep_alive |= headers::is_keep_alive(value.as_bytes());
        }
        match self.version {
            Version::Http10 => close || !keep_alive,
            Version::Http11 => close,
        }
    }
    /// Decoded request parameters
    ///
    /// Query string parameters go first. They are followed by the parameters
    /// from the body if it's `application/x-www-form-urlencoded`, or if
    /// there is a body without `Content-Type` at all.
    pub fn parameters(&self) -> Vec<(String, String)> {
        let mut result = Vec::new();
        if let Some(ref query) = self.query {
            result.extend(form_urlencoded::parse(query.as_bytes())
                .into_owned());
        }
        if !self.body.is_empty() {
            let is_form = match self.content_type() {
                None => true,
                Some(ctype) => headers::media_type(ctype)
                    == "application/x-www-form-urlencoded",
            };
            if is_form {
                result.extend(form_urlencoded::parse(&self.body)
                    .into_owned());
            }
        }
        result
    }
}

#[cfg(test)]
mod test {
    use super::Request;
    use crate::enums::Version;

    #[test]
    fn raw_headers() {
        let mut req = Request::new();
        req.add_raw_header(b"  Host", b" example.com");
        req.add_raw_header(b"X-Empty", b"");
        req.add_raw_header(b"X-Two-Spaces", b"  value");
        req.add_raw_header(b"expect", b"100-continue");
        assert_eq!(req.header("host"), Some("example.com"));
        assert_eq!(req.header("x-empty"), Some(""));
        assert_eq!(req.header("x-two-spaces"), Some(" value"));
        assert_eq!(req.expect(), Some("100-continue"));
    }

    #[test]
    fn reset_clears_everything() {
        let mut req = Request::new();
        req.path.push_str("/x");
        req.query = Some("a=b".into());
        req.body.extend(b"data");
        req.add_raw_header(b"Expect", b"100-continue");
        req.reset();
        assert_eq!(req.path(), "");
        assert_eq!(req.query(), None);
        assert_eq!(req.body(), b"");
        assert_eq!(req.expect(), None);
        assert!(req.headers().is_empty());
    }

    #[test]
    fn keep_alive() {
        let mut req = Request::new();
        assert!(!req.connection_close());
        req.add_raw_header(b"Connection", b"close");
        assert!(req.connection_close());

        let mut req = Request::new();
        req.version = Version::Http10;
        assert!(req.connection_close());
        req.add_raw_header(b"Connection", b"Keep-Alive");
        assert!(!req.connection_close());
    }

    #[test]
    fn query_parameters() {
        let mut req = Request::new();
        req.query = Some("a=1&b=hello%20world&a=2&c=x+y".into());
        assert_eq!(req.parameters(), vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "hello world".to_string()),
            ("a".to_string(), "2".to_string()),
            ("c".to_string(), "x y".to_string()),
        ]);
    }

    #[test]
    fn form_parameters() {
        let mut req = Request::new();
        req.query = Some("q=1".into());
        req.add_raw_header(b"Content-Type",
            b"application/x-www-form-urlencoded; charset=utf-8");
        req.body.extend(b"name=%D0%AF&x=");
        assert_eq!(req.parameters(), vec![
            ("q".to_string(), "1".to_string()),
            ("name".to_string(), "\u{42f}".to_string()),
            ("x".to_string(), "".to_string()),
        ]);
    }

    #[test]
    fn json_body_is_not_parameters() {
        let mut req = Request::new();
        req.add_raw_header(b"Content-Type", b"application/json");
        req.body.extend(b"a=b");
        assert!(req.parameters().is_empty());
    }
}
