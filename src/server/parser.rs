use std::cmp::min;
use std::fmt;
use std::mem;
use std::str::from_utf8;
use std::sync::Arc;

use netbuf::Buf;

use crate::chunked;
use crate::enums::{Method, Status, Version};
use crate::headers;
use crate::server::{Config, Error, Request, RequestPool};
use crate::server::encoder::{write_continue, write_fatal, write_rejection};


/// The limit for the request line and for every header line
pub const MAX_LINE_LENGTH: usize = 64 * 1024;
/// Chunk size line: 16 hex digits and CRLF
const MAX_CHUNK_LINE: usize = chunked::MAX_SIZE_DIGITS + 2;
const CRLF: &[u8] = b"\r\n";


/// State of the request parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    ExpectMethod,
    ExpectRequestLine,
    ExpectHeaders,
    ProcessHeaders,
    ExpectBody,
    ExpectChunkLen,
    ExpectChunkBody,
    ExpectLastEmptyChunk,
    GotAll,
}

/// Result of a single parsing step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    /// All buffered bytes are consumed but the request is not complete
    NeedMoreData,
    /// Request is complete, take it with `RequestParser::take`
    RequestComplete,
    /// The stream is broken, the status line is already written to the
    /// output and the connection must be closed
    FatalError(Status),
}

/// Incremental HTTP/1.x request parser
///
/// The parser never does any I/O. It consumes bytes from the input buffer
/// and may write responses that it generates on its own into the output
/// buffer: `100 Continue`, the `413` rejection of an expectation, and the
/// error status line of a fatal error.
///
/// Bytes may arrive in chunks of any size, including one byte at a time,
/// and the result is the same as if the whole request was delivered at once.
pub struct RequestParser {
    state: State,
    request: Request,
    pool: RequestPool,
    max_body_size: u64,
    /// Remaining bytes of a fixed body, accumulated size of a chunked one
    content_length: u64,
    chunk_length: usize,
    requests_parsed: u64,
    error: Option<Error>,
    input: Buf,
}

impl fmt::Debug for RequestParser {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("RequestParser")
            .field("state", &self.state)
            .field("requests_parsed", &self.requests_parsed)
            .field("error", &self.error)
            .finish()
    }
}

fn find_crlf(data: &[u8], window: usize) -> Option<usize> {
    data[..min(data.len(), window)].windows(2).position(|w| w == CRLF)
}

impl RequestParser {
    pub fn new(cfg: &Arc<Config>) -> RequestParser {
        let mut pool = RequestPool::new(cfg.request_pool_size);
        RequestParser {
            state: State::ExpectMethod,
            request: pool.get(),
            pool: pool,
            max_body_size: cfg.max_body_size as u64,
            content_length: 0,
            chunk_length: 0,
            requests_parsed: 0,
            error: None,
            input: Buf::new(),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }
    /// The request being parsed
    ///
    /// Fields are filled in as soon as they are parsed, so this is only
    /// complete in the `GotAll` state.
    pub fn request(&self) -> &Request {
        &self.request
    }
    /// Number of complete requests seen by this parser
    pub fn requests_parsed(&self) -> u64 {
        self.requests_parsed
    }
    /// The fatal error if one has happened
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Appends `data` to the parser's own input buffer and parses it
    ///
    /// This is a convenience wrapper around `parse_from` for callers that
    /// don't keep an input buffer themselves.
    pub fn feed(&mut self, data: &[u8], out: &mut Buf) -> ParseOutcome {
        let mut input = mem::replace(&mut self.input, Buf::new());
        input.extend(data);
        let result = self.parse_from(&mut input, out);
        self.input = input;
        result
    }

    /// Parses bytes from `buf`, consuming everything that belongs to the
    /// current request
    ///
    /// Bytes of subsequent pipelined requests are left in the buffer. Once
    /// `RequestComplete` is returned, the parser doesn't consume anything
    /// until the request is taken out with `take()` (or dropped with
    /// `reset()`).
    pub fn parse_from(&mut self, buf: &mut Buf, out: &mut Buf)
        -> ParseOutcome
    {
        if let Some(ref err) = self.error {
            return ParseOutcome::FatalError(err.status());
        }
        match self.parse(buf, out) {
            Ok(true) => ParseOutcome::RequestComplete,
            Ok(false) => ParseOutcome::NeedMoreData,
            Err(err) => {
                let status = err.status();
                debug!("Fatal error in state {:?}: {}, replying with {}",
                    self.state, err, status.code());
                let len = buf.len();
                buf.consume(len);
                write_fatal(out, status);
                self.error = Some(err);
                ParseOutcome::FatalError(status)
            }
        }
    }

    /// Takes a complete request and resets the parser for the next one
    ///
    /// Returns `None` unless the parser is in the `GotAll` state.
    pub fn take(&mut self) -> Option<Request> {
        if self.state != State::GotAll {
            return None;
        }
        let fresh = self.pool.get();
        let req = mem::replace(&mut self.request, fresh);
        self.restart();
        Some(req)
    }

    /// Drops the current request and starts waiting for the next one
    pub fn reset(&mut self) {
        let fresh = self.pool.get();
        let old = mem::replace(&mut self.request, fresh);
        self.pool.put(old);
        self.restart();
    }

    /// Gives a request object back for reuse by subsequent requests
    pub fn recycle(&mut self, req: Request) {
        self.pool.put(req);
    }

    fn restart(&mut self) {
        self.state = State::ExpectMethod;
        self.content_length = 0;
        self.chunk_length = 0;
    }

    fn switch(&mut self, state: State) {
        trace!("Request parser {:?} -> {:?}", self.state, state);
        if state == State::GotAll {
            self.requests_parsed += 1;
        }
        self.state = state;
    }

    fn parse(&mut self, buf: &mut Buf, out: &mut Buf) -> Result<bool, Error> {
        use self::State::*;
        loop {
            match self.state {
                ExpectMethod => {
                    let window = min(buf.len(), Method::MAX_LEN + 1);
                    let space = buf[..window].iter().position(|&c| c == b' ');
                    let space = match space {
                        Some(x) => x,
                        None if buf.len() > Method::MAX_LEN => {
                            return Err(Error::UnsupportedMethod);
                        }
                        None => return Ok(false),
                    };
                    self.request.method = Method::from_bytes(&buf[..space])
                        .ok_or(Error::UnsupportedMethod)?;
                    buf.consume(space + 1);
                    self.switch(ExpectRequestLine);
                }
                ExpectRequestLine => {
                    let end = match find_crlf(&buf[..], MAX_LINE_LENGTH) {
                        Some(x) => x,
                        None if buf.len() >= MAX_LINE_LENGTH => {
                            return Err(Error::RequestLineTooLong);
                        }
                        None => return Ok(false),
                    };
                    self.request_line(&buf[..end])?;
                    buf.consume(end + CRLF.len());
                    self.switch(ExpectHeaders);
                }
                ExpectHeaders => {
                    let end = match find_crlf(&buf[..], MAX_LINE_LENGTH) {
                        Some(x) => x,
                        None if buf.len() >= MAX_LINE_LENGTH => {
                            return Err(Error::HeaderTooLong);
                        }
                        None => return Ok(false),
                    };
                    // Note: any line without a colon, not only an empty
                    // one, terminates the header section.
                    match buf[..end].iter().position(|&c| c == b':') {
                        Some(colon) => {
                            self.request.add_raw_header(
                                &buf[..colon], &buf[colon+1..end]);
                        }
                        None => self.switch(ProcessHeaders),
                    }
                    buf.consume(end + CRLF.len());
                }
                ProcessHeaders => {
                    let next = self.body_kind()?;
                    if !self.check_expectation(out)? {
                        // expectation rejected, the request is dropped
                        continue;
                    }
                    if next == ExpectBody {
                        let reserve = min(self.content_length,
                                          self.max_body_size);
                        self.request.body.reserve(reserve as usize);
                    }
                    self.switch(next);
                }
                ExpectBody => {
                    let bytes = min(self.content_length, buf.len() as u64)
                        as usize;
                    if bytes > 0 {
                        self.request.body.extend_from_slice(&buf[..bytes]);
                        buf.consume(bytes);
                        self.content_length -= bytes as u64;
                    }
                    if self.content_length > 0 {
                        return Ok(false);
                    }
                    self.switch(GotAll);
                }
                ExpectChunkLen => {
                    let end = match find_crlf(&buf[..], MAX_CHUNK_LINE) {
                        Some(x) => x,
                        None if buf.len() > MAX_CHUNK_LINE => {
                            return Err(Error::ChunkSizeTooLong);
                        }
                        None => return Ok(false),
                    };
                    let size = chunked::parse_size(&buf[..end]);
                    if size == 0 {
                        buf.consume(end + CRLF.len());
                        self.switch(ExpectLastEmptyChunk);
                        continue;
                    }
                    if size.saturating_add(self.content_length)
                        > self.max_body_size
                    {
                        return Err(Error::RequestTooLong);
                    }
                    buf.consume(end + CRLF.len());
                    self.chunk_length = size as usize;
                    self.switch(ExpectChunkBody);
                }
                ExpectChunkBody => {
                    let len = self.chunk_length;
                    if buf.len() < len + CRLF.len() {
                        return Ok(false);
                    }
                    if &buf[len..len + CRLF.len()] != CRLF {
                        return Err(Error::BadChunk);
                    }
                    self.request.body.extend_from_slice(&buf[..len]);
                    buf.consume(len + CRLF.len());
                    self.content_length += len as u64;
                    self.chunk_length = 0;
                    self.switch(ExpectChunkLen);
                }
                ExpectLastEmptyChunk => {
                    if buf.len() < CRLF.len() {
                        return Ok(false);
                    }
                    if &buf[..CRLF.len()] != CRLF {
                        return Err(Error::BadLastChunk);
                    }
                    buf.consume(CRLF.len());
                    let size = self.request.body.len().to_string();
                    self.request.headers.set("content-length", size);
                    self.request.headers.remove("transfer-encoding");
                    self.switch(GotAll);
                }
                GotAll => return Ok(true),
            }
        }
    }

    /// Parses `<path>[?<query>] HTTP/1.<0|1>`, the method is already
    /// consumed
    fn request_line(&mut self, line: &[u8]) -> Result<(), Error> {
        let space = line.iter().position(|&c| c == b' ')
            .ok_or(Error::BadRequestLine)?;
        let (target, version) = (&line[..space], &line[space+1..]);
        self.request.version = Version::from_request_line(version)
            .ok_or(Error::BadRequestLine)?;
        let (path, query) = match target.iter().position(|&c| c == b'?') {
            Some(q) => (&target[..q], Some(&target[q+1..])),
            None => (target, None),
        };
        self.request.path.push_str(
            from_utf8(path).map_err(|_| Error::BadRequestLine)?);
        if let Some(query) = query {
            let query = from_utf8(query).map_err(|_| Error::BadRequestLine)?;
            self.request.query = Some(query.to_string());
        }
        Ok(())
    }

    /// Decides how the body is framed, returns the state after headers
    fn body_kind(&mut self) -> Result<State, Error> {
        self.content_length = 0;
        let length = self.request.headers.get("content-length")
            .filter(|x| !x.is_empty());
        if let Some(length) = length {
            self.content_length = length.trim().parse()
                .map_err(|_| Error::ContentLengthInvalid)?;
            if self.content_length == 0 {
                return Ok(State::GotAll);
            }
            return Ok(State::ExpectBody);
        }
        match self.request.headers.get("transfer-encoding") {
            None => Ok(State::GotAll),
            Some(enc) if enc.is_empty() => Ok(State::GotAll),
            Some(enc) if headers::is_chunked(enc.as_bytes()) => {
                Ok(State::ExpectChunkLen)
            }
            Some(_) => Err(Error::UnsupportedTransferEncoding),
        }
    }

    /// Handles `Expect` and the declared body size
    ///
    /// Returns `false` if the request has been rejected with a 413 response
    /// without closing the connection.
    fn check_expectation(&mut self, out: &mut Buf) -> Result<bool, Error> {
        let version = self.request.version;
        let expect = match self.request.expect {
            Some(ref x) if !x.is_empty() => Some(x.clone()),
            _ => None,
        };
        match expect {
            Some(ref value) if headers::is_continue(value.as_bytes())
                && version >= Version::Http11
            => {
                if self.content_length == 0 {
                    return Err(Error::ContinueWithoutBody);
                }
                if self.content_length > self.max_body_size {
                    // TODO: skip the announced body, if the client sends
                    // it anyway it's parsed as the next request and fails
                    warn!("Rejecting 100-continue request with body of \
                        {} bytes", self.content_length);
                    write_rejection(out, version,
                        Status::RequestEntityTooLarge);
                    self.reset();
                    return Ok(false);
                }
                write_continue(out, version);
            }
            Some(value) => {
                warn!("417 Expectation Failed for {:?}", value);
                return Err(Error::ExpectationFailed(value));
            }
            None => {
                if self.content_length > self.max_body_size {
                    return Err(Error::RequestTooLong);
                }
            }
        }
        Ok(true)
    }
}
