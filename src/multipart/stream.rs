use std::fmt;

use crate::headers::media_type;
use crate::multipart::{MultipartDecoder, PartHeader, StreamError};
use crate::server::Request;


pub type HeaderCallback = Box<dyn FnMut(&PartHeader)>;
pub type DataCallback = Box<dyn FnMut(&[u8])>;
pub type FinishCallback = Box<dyn FnOnce(Option<StreamError>)>;

/// Consumer of a request body that arrives in pieces
///
/// The finish callback is called exactly once, either with `None` when
/// the body is received successfully, or with an error.
pub enum StreamHandler {
    /// Passes raw body bytes through
    Default {
        on_data: DataCallback,
        on_finish: Option<FinishCallback>,
    },
    /// Drops everything
    Null,
    /// Decodes a `multipart/form-data` body
    Multipart {
        decoder: MultipartDecoder,
        on_header: HeaderCallback,
        on_data: DataCallback,
        on_finish: Option<FinishCallback>,
    },
}

impl StreamHandler {
    pub fn new<D, F>(on_data: D, on_finish: F) -> StreamHandler
        where D: FnMut(&[u8]) + 'static,
              F: FnOnce(Option<StreamError>) + 'static,
    {
        StreamHandler::Default {
            on_data: Box::new(on_data),
            on_finish: Some(Box::new(on_finish)),
        }
    }
    pub fn null() -> StreamHandler {
        StreamHandler::Null
    }
    /// Handler for the body with the `content_type`
    ///
    /// If the content type is not a valid multipart one, the stream fails
    /// with `InvalidMultipart` as soon as anything happens to it.
    pub fn multipart<H, D, F>(content_type: &str,
        on_header: H, on_data: D, on_finish: F)
        -> StreamHandler
        where H: FnMut(&PartHeader) + 'static,
              D: FnMut(&[u8]) + 'static,
              F: FnOnce(Option<StreamError>) + 'static,
    {
        StreamHandler::Multipart {
            decoder: MultipartDecoder::new(content_type),
            on_header: Box::new(on_header),
            on_data: Box::new(on_data),
            on_finish: Some(Box::new(on_finish)),
        }
    }
    /// Selects a multipart or a raw handler by the request's content type
    pub fn for_request<H, D, F>(request: &Request,
        on_header: H, on_data: D, on_finish: F)
        -> StreamHandler
        where H: FnMut(&PartHeader) + 'static,
              D: FnMut(&[u8]) + 'static,
              F: FnOnce(Option<StreamError>) + 'static,
    {
        match request.content_type() {
            Some(ctype) if media_type(ctype) == "multipart/form-data" => {
                StreamHandler::multipart(ctype, on_header, on_data, on_finish)
            }
            _ => StreamHandler::new(on_data, on_finish),
        }
    }

    /// Feeds the next piece of the body
    pub fn data_received(&mut self, data: &[u8]) {
        match *self {
            StreamHandler::Default { ref mut on_data, ref on_finish } => {
                if on_finish.is_some() {
                    on_data(data);
                }
            }
            StreamHandler::Null => {}
            StreamHandler::Multipart {
                ref mut decoder, ref mut on_header, ref mut on_data,
                ref mut on_finish,
            } => {
                if on_finish.is_none() {
                    return;
                }
                decoder.parse(data, &mut **on_header, &mut **on_data);
                if !decoder.is_valid() {
                    finish(on_finish, Some(StreamError::InvalidMultipart));
                } else if decoder.is_finished() {
                    finish(on_finish, None);
                }
            }
        }
    }

    /// Signals the end of the body
    ///
    /// For multipart handlers the end of the stream before the closing
    /// delimiter is an `IncompleteMultipart` error.
    pub fn stream_finished(&mut self, error: Option<StreamError>) {
        match *self {
            StreamHandler::Default { ref mut on_finish, .. } => {
                finish(on_finish, error);
            }
            StreamHandler::Null => {}
            StreamHandler::Multipart {
                ref decoder, ref mut on_finish, ..
            } => {
                let error = if !decoder.is_valid() {
                    StreamError::InvalidMultipart
                } else {
                    error.unwrap_or(StreamError::IncompleteMultipart)
                };
                finish(on_finish, Some(error));
            }
        }
    }

    /// Returns true when the finish callback has been called
    pub fn is_finished(&self) -> bool {
        match *self {
            StreamHandler::Default { ref on_finish, .. } |
            StreamHandler::Multipart { ref on_finish, .. }
            => on_finish.is_none(),
            StreamHandler::Null => false,
        }
    }
}

fn finish(callback: &mut Option<FinishCallback>, error: Option<StreamError>)
{
    if let Some(callback) = callback.take() {
        callback(error);
    }
}

impl fmt::Debug for StreamHandler {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            StreamHandler::Default { .. } => write!(f, "StreamHandler::Default"),
            StreamHandler::Null => write!(f, "StreamHandler::Null"),
            StreamHandler::Multipart { ref decoder, .. } => {
                write!(f, "StreamHandler::Multipart({:?})", decoder.boundary())
            }
        }
    }
}

impl Request {
    /// Passes the complete body through the handler and finishes it
    pub fn stream_body(&self, mut handler: StreamHandler) {
        handler.data_received(&self.body);
        handler.stream_finished(None);
    }
}

#[cfg(test)]
mod test {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::StreamHandler;
    use crate::multipart::{PartHeader, StreamError};

    type Log = Rc<RefCell<Vec<String>>>;

    fn multipart(ctype: &str, log: &Log) -> StreamHandler {
        let (l1, l2, l3) = (log.clone(), log.clone(), log.clone());
        StreamHandler::multipart(ctype,
            move |h: &PartHeader| l1.borrow_mut().push(
                format!("header {}", h.name)),
            move |d: &[u8]| l2.borrow_mut().push(
                format!("data {}", String::from_utf8_lossy(d))),
            move |e: Option<StreamError>| l3.borrow_mut().push(
                match e {
                    Some(e) => format!("error {}", e),
                    None => "done".to_string(),
                }))
    }

    const BODY: &[u8] = b"--XYZ\r\n\
        Content-Disposition: form-data; name=\"f\"\r\n\r\n\
        hello\r\n--XYZ--\r\n";

    #[test]
    fn success() {
        let log = Log::default();
        let mut handler = multipart("multipart/form-data; boundary=XYZ", &log);
        handler.data_received(BODY);
        assert!(handler.is_finished());
        handler.stream_finished(None);
        handler.data_received(b"more");
        assert_eq!(*log.borrow(), vec!["header f", "data hello", "done"]);
    }

    #[test]
    fn incomplete() {
        let log = Log::default();
        let mut handler = multipart("multipart/form-data; boundary=XYZ", &log);
        handler.data_received(&BODY[..20]);
        handler.stream_finished(None);
        handler.stream_finished(None);
        assert_eq!(*log.borrow(), vec!["error incomplete multipart data"]);
    }

    #[test]
    fn invalid() {
        let log = Log::default();
        let mut handler = multipart("multipart/form-data; boundary=XYZ", &log);
        handler.data_received(b"--XYZ\r\nContent-Disposition: x\r\n\r\n");
        handler.stream_finished(None);
        assert_eq!(*log.borrow(), vec!["error invalid multipart data"]);
    }

    #[test]
    fn invalid_content_type() {
        let log = Log::default();
        let mut handler = multipart("multipart/form-data", &log);
        handler.stream_finished(None);
        assert_eq!(*log.borrow(), vec!["error invalid multipart data"]);
    }

    #[test]
    fn aborted() {
        let log = Log::default();
        let mut handler = multipart("multipart/form-data; boundary=XYZ", &log);
        handler.stream_finished(Some(StreamError::Aborted("reset".into())));
        assert_eq!(*log.borrow(), vec!["error stream aborted: reset"]);
    }

    #[test]
    fn raw() {
        let log = Log::default();
        let (l1, l2) = (log.clone(), log.clone());
        let mut handler = StreamHandler::new(
            move |d: &[u8]| l1.borrow_mut().push(d.len().to_string()),
            move |e: Option<StreamError>| l2.borrow_mut().push(
                format!("{:?}", e)));
        handler.data_received(b"abc");
        handler.data_received(b"de");
        handler.stream_finished(None);
        handler.data_received(b"ignored");
        assert_eq!(*log.borrow(), vec!["3", "2", "None"]);
    }

    #[test]
    fn null() {
        let mut handler = StreamHandler::null();
        handler.data_received(b"abc");
        handler.stream_finished(None);
        assert!(!handler.is_finished());
    }
}
