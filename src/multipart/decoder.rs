use std::fmt;

use netbuf::Buf;

use crate::headers::media_type;
use crate::multipart::PartHeader;


/// The limit of buffered bytes of a single part header line
pub const MAX_HEADER_SIZE: usize = 60 * 1024;
const CRLF: &[u8] = b"\r\n";
const DASH: &[u8] = b"--";


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ExpectFirstBoundary,
    ExpectNewEntry,
    ExpectHeader,
    ExpectBody,
    ExpectEndOrNewEntry,
}

/// Incremental decoder of a `multipart/form-data` body
///
/// Once the data is found to be invalid, or the closing delimiter is
/// received, `parse` does nothing.
pub struct MultipartDecoder {
    state: State,
    buffer: Buf,
    boundary: String,
    /// `--boundary\r\n`
    first_delimiter: Vec<u8>,
    /// `\r\n--boundary`
    delimiter: Vec<u8>,
    header: PartHeader,
    valid: bool,
    finished: bool,
}

impl fmt::Debug for MultipartDecoder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("MultipartDecoder")
            .field("boundary", &self.boundary)
            .field("state", &self.state)
            .field("valid", &self.valid)
            .field("finished", &self.finished)
            .finish()
    }
}

enum Param<'a> {
    Missing,
    Unterminated,
    Value(&'a str),
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Finds the `key=value` parameter of `Content-Disposition`
///
/// The value is either quoted (no escapes are supported) or runs up to
/// the next semicolon.
fn find_param<'a>(value: &'a str, key: &str) -> Param<'a> {
    let bytes = value.as_bytes();
    for (idx, _) in value.match_indices(key) {
        let end = idx + key.len();
        let at_start = idx == 0 || matches!(bytes[idx-1], b';' | b' ' | b'\t');
        if !at_start || bytes.get(end) != Some(&b'=') {
            continue;
        }
        let rest = &value[end+1..];
        if rest.starts_with('"') {
            return match rest[1..].find('"') {
                Some(close) => Param::Value(&rest[1..close+1]),
                None => Param::Unterminated,
            };
        }
        let stop = rest.find(';').unwrap_or(rest.len());
        return Param::Value(rest[..stop].trim_end());
    }
    Param::Missing
}

/// Applies a single part header line, returns `false` if it's invalid
fn header_line(header: &mut PartHeader, line: &[u8]) -> bool {
    let line = String::from_utf8_lossy(line);
    let colon = match line.find(':') {
        Some(x) => x,
        None => return false,
    };
    let key = &line[..colon];
    let value = &line[colon+1..];
    let value = if value.starts_with(' ') { &value[1..] } else { value };
    if key.is_empty() || value.is_empty() {
        return false;
    }
    if key.eq_ignore_ascii_case("Content-Type") {
        header.content_type = Some(value.to_string());
    } else if key.eq_ignore_ascii_case("Content-Disposition") {
        match find_param(value, "name") {
            Param::Value(name) => header.name = name.to_string(),
            Param::Missing | Param::Unterminated => return false,
        }
        match find_param(value, "filename") {
            Param::Value(name) => header.filename = Some(name.to_string()),
            Param::Missing => {}
            Param::Unterminated => return false,
        }
    }
    true
}

impl MultipartDecoder {
    /// Creates a decoder from the value of the request's `Content-Type`
    ///
    /// If it's not `multipart/form-data` with a non-empty boundary, the
    /// decoder is invalid from the start.
    pub fn new(content_type: &str) -> MultipartDecoder {
        let boundary = if content_type.contains(';')
            && media_type(content_type) == "multipart/form-data"
        {
            content_type.find("boundary=").map(|pos| {
                let value = &content_type[pos + "boundary=".len()..];
                value[..value.find(';').unwrap_or(value.len())].to_string()
            })
        } else {
            None
        };
        let boundary = boundary.filter(|b| !b.is_empty());
        if boundary.is_none() {
            debug!("Invalid multipart content type {:?}", content_type);
        }
        let boundary = boundary.unwrap_or_default();
        MultipartDecoder {
            state: State::ExpectFirstBoundary,
            buffer: Buf::new(),
            first_delimiter: [DASH, boundary.as_bytes(), CRLF].concat(),
            delimiter: [CRLF, DASH, boundary.as_bytes()].concat(),
            valid: !boundary.is_empty(),
            boundary: boundary,
            header: PartHeader::default(),
            finished: false,
        }
    }
    pub fn is_valid(&self) -> bool {
        self.valid
    }
    /// Returns true when the closing delimiter has been received
    pub fn is_finished(&self) -> bool {
        self.finished
    }
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Parses the next portion of the body
    ///
    /// `on_header` is called when all headers of a part are received,
    /// `on_data` is called zero or more times with the part's data after
    /// that.
    pub fn parse(&mut self, data: &[u8],
        on_header: &mut dyn FnMut(&PartHeader),
        on_data: &mut dyn FnMut(&[u8]))
    {
        use self::State::*;
        if !self.valid || self.finished {
            return;
        }
        self.buffer.extend(data);
        while self.buffer.len() > 0 {
            match self.state {
                ExpectFirstBoundary => {
                    match find(&self.buffer[..], &self.first_delimiter) {
                        Some(pos) => {
                            self.buffer.consume(
                                pos + self.first_delimiter.len());
                            self.state = ExpectNewEntry;
                        }
                        None => {
                            // preamble, keep what may start a delimiter
                            let keep = self.first_delimiter.len() - 1;
                            if self.buffer.len() > keep {
                                let drop = self.buffer.len() - keep;
                                self.buffer.consume(drop);
                            }
                            return;
                        }
                    }
                }
                ExpectNewEntry => {
                    self.header = PartHeader::default();
                    self.state = ExpectHeader;
                }
                ExpectHeader => {
                    let end = match find(&self.buffer[..], CRLF) {
                        Some(x) => x,
                        None => {
                            if self.buffer.len() > MAX_HEADER_SIZE {
                                debug!("Multipart header is too long");
                                self.valid = false;
                            }
                            return;
                        }
                    };
                    if end == 0 {
                        self.buffer.consume(CRLF.len());
                        self.state = ExpectBody;
                        on_header(&self.header);
                        continue;
                    }
                    if !header_line(&mut self.header, &self.buffer[..end]) {
                        debug!("Bad multipart header {:?}",
                            String::from_utf8_lossy(&self.buffer[..end]));
                        self.valid = false;
                        return;
                    }
                    self.buffer.consume(end + CRLF.len());
                }
                ExpectBody => {
                    let margin = self.delimiter.len();
                    if self.buffer.len() < margin {
                        return;
                    }
                    match find(&self.buffer[..], &self.delimiter) {
                        Some(pos) => {
                            if pos > 0 {
                                on_data(&self.buffer[..pos]);
                            }
                            self.buffer.consume(pos + margin);
                            self.state = ExpectEndOrNewEntry;
                        }
                        None => {
                            let ready = self.buffer.len() - margin;
                            if ready > 0 {
                                on_data(&self.buffer[..ready]);
                                self.buffer.consume(ready);
                            }
                            return;
                        }
                    }
                }
                ExpectEndOrNewEntry => {
                    if self.buffer.len() < CRLF.len() {
                        return;
                    }
                    if self.buffer[..].starts_with(CRLF) {
                        self.buffer.consume(CRLF.len());
                        self.state = ExpectNewEntry;
                    } else if self.buffer[..].starts_with(DASH) {
                        // the epilogue is ignored
                        self.finished = true;
                        let len = self.buffer.len();
                        self.buffer.consume(len);
                        return;
                    } else {
                        debug!("Bad multipart delimiter suffix");
                        self.valid = false;
                        return;
                    }
                }
            }
        }
    }
}
