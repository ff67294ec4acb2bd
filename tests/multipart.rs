extern crate netbuf;
extern crate tk_h1;

use std::cell::RefCell;
use std::rc::Rc;

use netbuf::Buf;

use tk_h1::multipart::{StreamHandler, StreamError, PartHeader};
use tk_h1::server::{Config, RequestParser, ParseOutcome};


#[derive(Debug, Default)]
struct Collected {
    parts: Vec<(PartHeader, Vec<u8>)>,
    result: Option<Option<StreamError>>,
}

fn handler(req: &tk_h1::server::Request, data: &Rc<RefCell<Collected>>)
    -> StreamHandler
{
    let (d1, d2, d3) = (data.clone(), data.clone(), data.clone());
    StreamHandler::for_request(req,
        move |h: &PartHeader| {
            d1.borrow_mut().parts.push((h.clone(), Vec::new()));
        },
        move |chunk: &[u8]| {
            let mut d = d2.borrow_mut();
            match d.parts.last_mut() {
                Some(part) => part.1.extend(chunk),
                None => d.parts.push((PartHeader::default(), chunk.to_vec())),
            }
        },
        move |err: Option<StreamError>| {
            d3.borrow_mut().result = Some(err);
        })
}

#[test]
fn upload() {
    let mut parser = RequestParser::new(&Config::new().done());
    let mut out = Buf::new();
    let result = parser.feed(b"POST /upload HTTP/1.1\r\n\
        Content-Type: multipart/form-data; boundary=----b0undary\r\n\
        Content-Length: 177\r\n\r\n\
        ------b0undary\r\n\
        Content-Disposition: form-data; name=\"title\"\r\n\r\n\
        Hi\r\n\
        ------b0undary\r\n\
        Content-Disposition: form-data; name=\"doc\"; filename=\"a.txt\"\r\n\
        \r\n\
        file body\r\n\
        ------b0undary--\r\n", &mut out);
    assert_eq!(result, ParseOutcome::RequestComplete);
    let req = parser.take().unwrap();
    assert_eq!(req.body().len(), 177);

    let data = Rc::new(RefCell::new(Collected::default()));
    req.stream_body(handler(&req, &data));
    let data = data.borrow();
    assert_eq!(data.result, Some(None));
    assert_eq!(data.parts.len(), 2);
    assert_eq!(data.parts[0].0.name, "title");
    assert_eq!(data.parts[0].1, b"Hi");
    assert_eq!(data.parts[1].0.filename, Some("a.txt".to_string()));
    assert_eq!(data.parts[1].1, b"file body");
}

#[test]
fn not_multipart() {
    let mut parser = RequestParser::new(&Config::new().done());
    let mut out = Buf::new();
    parser.feed(b"POST / HTTP/1.1\r\nContent-Type: text/plain\r\n\
                  Content-Length: 4\r\n\r\ntext", &mut out);
    let req = parser.take().unwrap();
    let data = Rc::new(RefCell::new(Collected::default()));
    req.stream_body(handler(&req, &data));
    let data = data.borrow();
    assert_eq!(data.result, Some(None));
    assert_eq!(data.parts, vec![(PartHeader::default(), b"text".to_vec())]);
}

#[test]
fn truncated() {
    let mut parser = RequestParser::new(&Config::new().done());
    let mut out = Buf::new();
    parser.feed(b"POST / HTTP/1.1\r\n\
                  Content-Type: multipart/form-data; boundary=B\r\n\
                  Content-Length: 10\r\n\r\n--B\r\n\r\nabc", &mut out);
    let req = parser.take().unwrap();
    let data = Rc::new(RefCell::new(Collected::default()));
    req.stream_body(handler(&req, &data));
    assert_eq!(data.borrow().result,
               Some(Some(StreamError::IncompleteMultipart)));
}
