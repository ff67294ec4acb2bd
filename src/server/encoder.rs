use std::fmt::Display;
#[cfg(feature="date_header")] use std::time::SystemTime;

use netbuf::Buf;

use crate::base_serializer::{MessageState, HeaderError, put};
use crate::enums::{Version, Status};
use crate::server::ResponseConfig;


/// Writes a response into the output buffer
///
/// Methods of this structure ensure that everything you write into a buffer
/// is consistent and valid protocol
pub struct Encoder<'a> {
    state: MessageState,
    buf: &'a mut Buf,
}

impl<'a> Encoder<'a> {
    pub fn new(buf: &'a mut Buf, cfg: ResponseConfig) -> Encoder<'a> {
        Encoder {
            state: MessageState::response(cfg.version, cfg.is_head,
                                          cfg.do_close),
            buf: buf,
        }
    }
    /// Write a 100 (Continue) response.
    ///
    /// # Panics
    ///
    /// When the response is already started.
    pub fn response_continue(&mut self) {
        self.state.response_continue(self.buf)
    }

    /// Write status line using `Status` enum
    ///
    /// # Panics
    ///
    /// When status line is already written, or when the status is
    /// 100 (Continue) which is not allowed as a final status code.
    pub fn status(&mut self, status: Status) {
        self.state.response_status(self.buf, status.code(), status.reason())
    }

    /// Write custom status line
    ///
    /// # Panics
    ///
    /// Same as for `status`.
    pub fn custom_status(&mut self, code: u16, reason: &str) {
        self.state.response_status(self.buf, code, reason)
    }

    /// Add a header to the message.
    ///
    /// The value is formatted directly into the buffer. `Content-Length`
    /// must be sent using the `add_length` method.
    ///
    /// # Panics
    ///
    /// Panics when `add_header` is called in the wrong state.
    pub fn add_header<D: Display>(&mut self, name: &str, value: D)
        -> Result<(), HeaderError>
    {
        self.state.add_header(self.buf, name, value)
    }

    /// Add a content length to the message.
    ///
    /// # Panics
    ///
    /// Panics when `add_length` is called in the wrong state.
    pub fn add_length(&mut self, n: u64)
        -> Result<(), HeaderError>
    {
        self.state.add_length(self.buf, n)
    }

    /// Add a `Date` header with the current time
    #[cfg(feature="date_header")]
    pub fn add_date(&mut self) -> Result<(), HeaderError> {
        self.add_header("Date", httpdate::fmt_http_date(SystemTime::now()))
    }

    /// Returns true if `Connection: close` is (or will be) sent
    pub fn is_close(&self) -> bool {
        self.state.is_close()
    }

    /// Closes the HTTP header and returns `true` if entity body is expected.
    ///
    /// Specifically `false` is returned when status is 1xx, 204, 304 or in
    /// the response to a `HEAD` request but not if the body has zero-length.
    pub fn done_headers(&mut self) -> Result<bool, HeaderError> {
        self.state.done_headers(self.buf)
    }

    /// Write a chunk of the body
    ///
    /// Nothing is written for HEAD requests, but the length is checked.
    ///
    /// # Panics
    ///
    /// When the response is in the wrong state, or more bytes are written
    /// than the declared length.
    pub fn write_body(&mut self, data: &[u8]) {
        self.state.write_body(self.buf, data)
    }

    /// Returns true if `done()` has already been called
    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    /// Finishes the response
    ///
    /// # Panics
    ///
    /// When the body is not fully written.
    pub fn done(&mut self) {
        self.state.done()
    }
}

/// Writes the status line of a fatal protocol error
///
/// The connection must be closed after the output is flushed.
pub fn write_fatal(buf: &mut Buf, status: Status) {
    put(buf, format_args!("{} {} {}\r\nConnection: close\r\n\r\n",
        Version::Http11, status.code(), status.reason()));
}

/// Writes the interim `100 Continue` response
pub(crate) fn write_continue(buf: &mut Buf, version: Version) {
    MessageState::response(version, false, false).response_continue(buf);
}

/// Writes an empty response that rejects the request without closing
/// the connection
pub(crate) fn write_rejection(buf: &mut Buf, version: Version,
    status: Status)
{
    let mut enc = Encoder::new(buf, ResponseConfig {
        version: version,
        is_head: false,
        do_close: false,
    });
    enc.status(status);
    // neither the length nor the connection header can be invalid
    let _ = enc.add_length(0).and_then(|()| enc.done_headers());
    enc.done();
}
