use netbuf::Buf;

use crate::base_serializer::HeaderError;
use crate::enums::Status;
use crate::headers::{self, HeaderMap};
use crate::server::{Config, Encoder, ResponseConfig};


/// A complete response to a single request
///
/// ```rust
/// # use tk_h1::Status;
/// # use tk_h1::server::Response;
/// let response = Response::new(Status::Ok)
///     .header("Content-Type", "text/plain")
///     .body("hello");
/// assert_eq!(response.get_body(), b"hello");
/// ```
#[derive(Debug, Clone)]
pub struct Response {
    status: Status,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Response {
    pub fn new(status: Status) -> Response {
        Response {
            status: status,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }
    /// Adds a header
    ///
    /// `Content-Length` is always computed from the body, so adding it
    /// here makes the response fail to serialize.
    pub fn header<N, V>(mut self, name: N, value: V) -> Response
        where N: Into<String>, V: Into<String>
    {
        self.headers.add(name, value);
        self
    }
    pub fn body<B: Into<Vec<u8>>>(mut self, body: B) -> Response {
        self.body = body.into();
        self
    }
    pub fn get_status(&self) -> Status {
        self.status
    }
    pub fn get_headers(&self) -> &HeaderMap {
        &self.headers
    }
    pub fn get_body(&self) -> &[u8] {
        &self.body
    }
    /// Returns true if the response itself asks to close the connection
    pub fn is_close(&self) -> bool {
        self.headers.get_all("Connection")
            .any(|v| headers::is_close(v.as_bytes()))
    }

    /// Serializes the response
    ///
    /// Nothing is written to `buf` if any header is invalid.
    pub fn write_to(&self, buf: &mut Buf, cfg: ResponseConfig,
        config: &Config)
        -> Result<(), HeaderError>
    {
        let mut tmp = Buf::new();
        {
            let mut enc = Encoder::new(&mut tmp, ResponseConfig {
                do_close: cfg.do_close || self.is_close(),
                .. cfg
            });
            enc.status(self.status);
            if let Some(ref name) = config.server_name {
                enc.add_header("Server", name)?;
            }
            #[cfg(feature="date_header")]
            enc.add_date()?;
            for (name, value) in self.headers.iter() {
                // it's added by the encoder
                if name.eq_ignore_ascii_case("Connection")
                    && headers::is_close(value.as_bytes())
                {
                    continue;
                }
                enc.add_header(name, value)?;
            }
            if self.status.has_body() {
                enc.add_length(self.body.len() as u64)?;
            }
            if enc.done_headers()? {
                enc.write_body(&self.body);
            }
            enc.done();
        }
        buf.extend(&tmp[..]);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use netbuf::Buf;

    use super::Response;
    use crate::base_serializer::HeaderError;
    use crate::enums::{Status, Version};
    use crate::server::{Config, ResponseConfig};

    fn cfg(is_head: bool, do_close: bool) -> ResponseConfig {
        ResponseConfig {
            version: Version::Http11,
            is_head: is_head,
            do_close: do_close,
        }
    }

    fn config() -> Config {
        let mut cfg = Config::new();
        cfg.server_name("test");
        cfg
    }

    fn strip_date(buf: &Buf) -> String {
        String::from_utf8_lossy(&buf[..]).lines()
            .filter(|line| !line.starts_with("Date: "))
            .collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn simple() {
        let mut buf = Buf::new();
        Response::new(Status::NotFound)
            .header("Content-Type", "text/plain")
            .body("not here")
            .write_to(&mut buf, cfg(false, false), &config()).unwrap();
        assert_eq!(strip_date(&buf),
            "HTTP/1.1 404 Not Found\nServer: test\n\
             Content-Type: text/plain\nContent-Length: 8\n\nnot here");
    }

    #[test]
    fn head() {
        let mut get = Buf::new();
        let mut head = Buf::new();
        let resp = Response::new(Status::Ok).body("data");
        resp.write_to(&mut get, cfg(false, false), &config()).unwrap();
        resp.write_to(&mut head, cfg(true, false), &config()).unwrap();
        assert_eq!(strip_date(&get), strip_date(&head) + "\ndata");
    }

    #[test]
    fn no_content() {
        let mut buf = Buf::new();
        Response::new(Status::NoContent)
            .write_to(&mut buf, cfg(false, true), &Config::new()).unwrap();
        assert_eq!(strip_date(&buf),
            "HTTP/1.1 204 No Content\nConnection: close\n");
    }

    #[test]
    fn close_requested_by_response() {
        let mut buf = Buf::new();
        let resp = Response::new(Status::Ok).header("Connection", "close");
        assert!(resp.is_close());
        resp.write_to(&mut buf, cfg(false, false), &Config::new()).unwrap();
        assert_eq!(strip_date(&buf),
            "HTTP/1.1 200 OK\nContent-Length: 0\nConnection: close\n");
    }

    #[test]
    fn invalid_header_writes_nothing() {
        let mut buf = Buf::new();
        let result = Response::new(Status::Ok)
            .header("Content-Length", "10")
            .write_to(&mut buf, cfg(false, false), &Config::new());
        assert_eq!(result, Err(HeaderError::BodyLengthHeader));
        assert_eq!(buf.len(), 0);
    }
}
