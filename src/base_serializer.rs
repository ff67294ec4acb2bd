//! Response message state shared by the encoder and by the parser, which
//! writes interim and error responses itself

use std::fmt::{Arguments, Display};
use std::io::Write;

use netbuf::Buf;

use crate::enums::Version;

quick_error! {
    /// Error adding a header to the response
    #[derive(Debug, PartialEq, Eq)]
    pub enum HeaderError {
        DuplicateContentLength {
            description("Content-Length is added twice")
            display("Content-Length is added twice")
        }
        InvalidHeaderName {
            description("Header name contains invalid characters")
            display("Header name contains invalid characters")
        }
        InvalidHeaderValue {
            description("Header value contains invalid characters")
            display("Header value contains invalid characters")
        }
        CantDetermineBodySize {
            description("Content-Length is not present in the headers")
            display("Content-Length is not present in the headers")
        }
        BodyLengthHeader {
            description("Content-Length and Transfer-Encoding must not be \
                set as a plain header")
            display("Content-Length and Transfer-Encoding must not be \
                set as a plain header")
        }
        RequireBodyless {
            description("This message must not contain body length fields.")
            display("This message must not contain body length fields.")
        }
    }
}

/// State of a response message being written into a buffer
///
/// Note: while we pass buffer to each method, we expect that the same buffer
/// is passed each time
#[derive(Debug)]
pub enum MessageState {
    /// Nothing has been sent.
    ResponseStart { version: Version, body: Body, close: bool },
    /// A `100 Continue` line has been sent.
    FinalResponseStart { version: Version, body: Body, close: bool },
    /// Status line is already in the buffer.
    Headers { body: Body, close: bool },
    /// The message contains a fixed size body.
    FixedHeaders { is_head: bool, close: bool, content_length: u64 },
    /// The message contains no body.
    ///
    /// All 1xx (Informational), 204 (No Content),
    /// and 304 (Not Modified) responses do not include a message body.
    Bodyless,
    /// The message contains a body with the given length.
    FixedBody { is_head: bool, content_length: u64 },
    /// A message in final state.
    Done,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Body {
    /// Message contains a body.
    Normal,
    /// Message body is ignored: responses to HEAD requests.
    Head,
    /// Message must not have a body: all 1xx (Informational),
    /// 204 (No Content), and 304 (Not Modified) responses
    Denied,
}

fn invalid_header(value: &[u8]) -> bool {
    value.iter().any(|&x| x == b'\r' || x == b'\n')
}

pub(crate) fn put(buf: &mut Buf, args: Arguments) {
    buf.write_fmt(args).expect("writing to a buffer always succeeds");
}

impl MessageState {
    /// Start a response to a request of `version`
    pub fn response(version: Version, is_head: bool, close: bool)
        -> MessageState
    {
        MessageState::ResponseStart {
            version: version,
            body: if is_head { Body::Head } else { Body::Normal },
            close: close || version == Version::Http10,
        }
    }

    /// Write status line.
    ///
    /// # Panics
    ///
    /// When status line is already written, or when the status code is
    /// 100 (Continue) which is not allowed as a final status code.
    pub fn response_status(&mut self, buf: &mut Buf, code: u16, reason: &str) {
        use self::Body::*;
        use self::MessageState::*;
        match *self {
            ResponseStart { version, mut body, close } |
            FinalResponseStart { version, mut body, close } => {
                assert!(code != 100);
                put(buf, format_args!("{} {} {}\r\n", version, code, reason));
                if (code >= 100 && code < 200) || code == 204 || code == 304 {
                    body = Denied
                }
                *self = Headers { body: body, close: close };
            }
            ref state => {
                panic!("Called response_status() method on response \
                    in state {:?}", state)
            }
        }
    }

    /// Write a 100 (Continue) response.
    ///
    /// # Panics
    ///
    /// When the response is already started.
    pub fn response_continue(&mut self, buf: &mut Buf) {
        use self::MessageState::*;
        match *self {
            ResponseStart { version, body, close } => {
                put(buf, format_args!("{} 100 Continue\r\n\r\n", version));
                *self = FinalResponseStart { version: version,
                                            body: body,
                                            close: close }
            }
            ref state => {
                panic!("Called response_continue() method on response \
                    in state {:?}", state)
            }
        }
    }

    fn write_formatted<D: Display>(&mut self, buf: &mut Buf,
        name: &str, value: D)
        -> Result<(), HeaderError>
    {
        if invalid_header(name.as_bytes()) || name.contains(':') {
            return Err(HeaderError::InvalidHeaderName);
        }
        let value = value.to_string();
        if invalid_header(value.as_bytes()) {
            return Err(HeaderError::InvalidHeaderValue);
        }
        put(buf, format_args!("{}: {}\r\n", name, value));
        Ok(())
    }

    /// Add a header to the message.
    ///
    /// `Content-Length` must be added with `add_length`, the body of the
    /// response is always sent with a fixed length.
    ///
    /// # Panics
    ///
    /// Panics when `add_header` is called in the wrong state.
    pub fn add_header<D: Display>(&mut self, buf: &mut Buf,
        name: &str, value: D)
        -> Result<(), HeaderError>
    {
        use self::MessageState::*;
        if name.eq_ignore_ascii_case("Content-Length")
            || name.eq_ignore_ascii_case("Transfer-Encoding") {
            return Err(HeaderError::BodyLengthHeader)
        }
        match *self {
            Headers { .. } | FixedHeaders { .. } => {
                self.write_formatted(buf, name, value)
            }
            ref state => {
                panic!("Called add_header() method on a message in state {:?}",
                       state)
            }
        }
    }

    /// Add a content length to the message.
    ///
    /// # Panics
    ///
    /// Panics when `add_length` is called in the wrong state.
    pub fn add_length(&mut self, buf: &mut Buf, n: u64)
        -> Result<(), HeaderError>
    {
        use self::MessageState::*;
        use self::HeaderError::*;
        use self::Body::*;
        match *self {
            FixedHeaders { .. } => Err(DuplicateContentLength),
            Headers { body: Denied, .. } => Err(RequireBodyless),
            Headers { body, close } => {
                self.write_formatted(buf, "Content-Length", n)?;
                *self = FixedHeaders { is_head: body == Head,
                                       close: close,
                                       content_length: n };
                Ok(())
            }
            ref state => {
                panic!("Called add_length() method on message in state {:?}",
                       state)
            }
        }
    }

    /// Returns `true` if the connection must be closed after this message
    pub fn is_close(&self) -> bool {
        use self::MessageState::*;
        match *self {
            ResponseStart { close, .. } | FinalResponseStart { close, .. } |
            Headers { close, .. } | FixedHeaders { close, .. } => close,
            _ => false,
        }
    }

    /// Closes the HTTP header and returns `true` if entity body is expected.
    ///
    /// Specifically `false` is returned when status is 1xx, 204, 304 or in
    /// the response to a `HEAD` request but not if the body has zero-length.
    ///
    /// # Panics
    ///
    /// Panics when the response is in a wrong state.
    pub fn done_headers(&mut self, buf: &mut Buf)
        -> Result<bool, HeaderError>
    {
        use self::Body::*;
        use self::MessageState::*;
        if matches!(*self,
                    Headers { close: true, .. } |
                    FixedHeaders { close: true, .. }) {
            self.write_formatted(buf, "Connection", "close")?;
        }
        let expect_body = match *self {
            Headers { body: Denied, .. } => {
                *self = Bodyless;
                false
            }
            Headers { .. } => {
                return Err(HeaderError::CantDetermineBodySize);
            }
            FixedHeaders { is_head, content_length, .. } => {
                *self = FixedBody { is_head: is_head,
                                    content_length: content_length };
                !is_head
            }
            ref state => {
                panic!("Called done_headers() method on  in state {:?}",
                       state)
            }
        };
        buf.extend(b"\r\n");
        Ok(expect_body)
    }

    /// Write a chunk of the message body.
    ///
    /// In responses to HEAD requests the data is accounted but not put
    /// into the buffer.
    ///
    /// # Panics
    ///
    /// When response is in wrong state or more bytes are written than
    /// declared by `Content-Length`.
    pub fn write_body(&mut self, buf: &mut Buf, data: &[u8]) {
        use self::MessageState::*;
        match *self {
            Bodyless => panic!("Message must not contain body."),
            FixedBody { is_head, ref mut content_length } => {
                if data.len() as u64 > *content_length {
                    panic!("Fixed size response error. \
                        Bytes left {} but got additional {}",
                        content_length, data.len());
                }
                if !is_head {
                    buf.extend(data);
                }
                *content_length -= data.len() as u64;
            }
            ref state => {
                panic!("Called write_body() method on message \
                    in state {:?}", state)
            }
        }
    }

    /// Returns true if `done()` method is already called
    pub fn is_complete(&self) -> bool {
        matches!(*self, MessageState::Done)
    }

    /// Asserts that the message is complete
    ///
    /// The method may be called multiple times.
    ///
    /// # Panics
    ///
    /// When the message is in the wrong state or the body is not finished.
    pub fn done(&mut self) {
        use self::MessageState::*;
        match *self {
            Bodyless => *self = Done,
            FixedBody { is_head: true, .. } => *self = Done,
            FixedBody { is_head: false, content_length: 0 } => *self = Done,
            FixedBody { is_head: false, content_length } =>
                panic!("Tried to close message with {} bytes remaining.",
                       content_length),
            Done => {}  // multiple invocations are okay.
            ref state => {
                panic!("Called done() method on response in state {:?}",
                       state);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use netbuf::Buf;

    use super::{MessageState, HeaderError};
    use crate::enums::Version;

    fn do_response<F>(version: Version, is_head: bool, close: bool, fun: F)
        -> Buf
        where F: FnOnce(MessageState, &mut Buf)
    {
        let mut buf = Buf::new();
        fun(MessageState::response(version, is_head, close), &mut buf);
        buf
    }

    #[test]
    fn minimal_response10() {
        // HTTP/1.0 has no keep-alive
        assert_eq!(&do_response(Version::Http10, false, false, |mut msg, buf| {
            msg.response_status(buf, 200, "OK");
            msg.add_length(buf, 0).unwrap();
            msg.done_headers(buf).unwrap();
        })[..], concat!("HTTP/1.0 200 OK\r\nContent-Length: 0\r\n",
                        "Connection: close\r\n\r\n").as_bytes());
    }

    #[test]
    fn minimal_response11() {
        assert_eq!(&do_response(Version::Http11, false, false, |mut msg, buf| {
            msg.response_status(buf, 200, "OK");
            msg.add_length(buf, 0).unwrap();
            msg.done_headers(buf).unwrap();
        })[..], "HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n".as_bytes());
    }

    #[test]
    fn close_response11() {
        assert_eq!(&do_response(Version::Http11, false, true, |mut msg, buf| {
            msg.response_status(buf, 200, "OK");
            msg.add_length(buf, 0).unwrap();
            msg.done_headers(buf).unwrap();
        })[..], concat!("HTTP/1.1 200 OK\r\nContent-Length: 0\r\n",
                        "Connection: close\r\n\r\n").as_bytes());
    }

    #[test]
    fn head_response() {
        // The response to a HEAD request contains the real body length.
        assert_eq!(&do_response(Version::Http11, true, false, |mut msg, buf| {
            msg.response_status(buf, 200, "OK");
            msg.add_length(buf, 5).unwrap();
            assert_eq!(msg.done_headers(buf), Ok(false));
            msg.write_body(buf, b"Hello");
            msg.done();
        })[..], "HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\n".as_bytes());
    }

    #[test]
    fn continue_then_final() {
        assert_eq!(&do_response(Version::Http11, false, false, |mut msg, buf| {
            msg.response_continue(buf);
            msg.response_status(buf, 200, "OK");
            msg.add_length(buf, 2).unwrap();
            assert_eq!(msg.done_headers(buf), Ok(true));
            msg.write_body(buf, b"ok");
            msg.done();
            assert!(msg.is_complete());
        })[..], concat!("HTTP/1.1 100 Continue\r\n\r\n",
                        "HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nok")
                .as_bytes());
    }

    #[test]
    fn informational_response() {
        // No response with an 1xx status code may contain a body length.
        assert_eq!(&do_response(Version::Http11, false, false, |mut msg, buf| {
            msg.response_status(buf, 142, "Foo");
            assert_eq!(msg.add_length(buf, 500),
                       Err(HeaderError::RequireBodyless));
            msg.done_headers(buf).unwrap();
        })[..], "HTTP/1.1 142 Foo\r\n\r\n".as_bytes());
    }

    #[test]
    fn invalid_headers() {
        do_response(Version::Http11, false, false, |mut msg, buf| {
            msg.response_status(buf, 200, "OK");
            assert_eq!(msg.add_header(buf, "X-A", "a\r\nb"),
                       Err(HeaderError::InvalidHeaderValue));
            assert_eq!(msg.add_header(buf, "X\nA", "a"),
                       Err(HeaderError::InvalidHeaderName));
            assert_eq!(msg.add_header(buf, "content-length", "1"),
                       Err(HeaderError::BodyLengthHeader));
            assert_eq!(msg.done_headers(buf),
                       Err(HeaderError::CantDetermineBodySize));
        });
    }
}
