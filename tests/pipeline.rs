#[macro_use] extern crate matches;
extern crate futures;
extern crate tk_h1;

use std::thread;

use futures::Async;
use futures::future::{lazy, Future};

use tk_h1::{Method, Status};
use tk_h1::server::{Config, Connection, PipelineQueue, Request, RequestId};
use tk_h1::server::Response;


fn strip_date(data: Vec<u8>) -> String {
    String::from_utf8(data).unwrap()
        .split("\r\n")
        .filter(|line| !line.starts_with("Date: "))
        .collect::<Vec<_>>().join("\r\n")
}

#[test]
fn ordering() {
    let mut queue = PipelineQueue::new();
    let (r1, r2, r3) = (RequestId(1), RequestId(2), RequestId(3));
    queue.push(r1);
    queue.push(r2);
    queue.push(r3);
    queue.attach(r2, "R2", false);
    assert!(queue.drain_ready().is_empty());
    queue.attach(r3, "R3", false);
    assert!(queue.drain_ready().is_empty());
    queue.attach(r1, "R1", true);
    assert_eq!(queue.drain_ready(),
               vec![("R1", true), ("R2", false), ("R3", false)]);
}

fn none(_: RequestId, _: Request) -> Option<Response> {
    None
}

#[test]
fn out_of_order_responses() {
    let mut conn = Connection::new(none, &Config::new().done());
    conn.data_received(b"GET /1 HTTP/1.1\r\n\r\n\
                         GET /2 HTTP/1.1\r\n\r\n\
                         GET /3 HTTP/1.1\r\n\r\n");
    assert_eq!(conn.in_flight(), 3);
    conn.respond(RequestId(1), Response::new(Status::Ok).body("2"));
    conn.respond(RequestId(2), Response::new(Status::Ok).body("3"));
    assert_eq!(conn.output().len(), 0);
    conn.respond(RequestId(0), Response::new(Status::Ok).body("1"));
    assert_eq!(strip_date(conn.take_output()),
        "HTTP/1.1 200 OK\r\nContent-Length: 1\r\n\r\n1\
         HTTP/1.1 200 OK\r\nContent-Length: 1\r\n\r\n2\
         HTTP/1.1 200 OK\r\nContent-Length: 1\r\n\r\n3");
}

#[test]
fn head_suppression() {
    let respond = |_: RequestId, req: Request| {
        assert_matches!(req.method(), Method::Get | Method::Head);
        Some(Response::new(Status::Ok)
            .header("Content-Type", "text/plain")
            .body("same body"))
    };
    let mut conn = Connection::new(respond, &Config::new().done());
    conn.data_received(b"GET / HTTP/1.1\r\n\r\n");
    let get = strip_date(conn.take_output());
    conn.data_received(b"HEAD / HTTP/1.1\r\n\r\n");
    let head = strip_date(conn.take_output());
    assert!(get.ends_with("\r\n\r\nsame body"));
    assert_eq!(head, &get[..get.len() - "same body".len()]);
}

#[test]
fn response_from_other_thread() {
    let mut conn = Connection::new(none, &Config::new().done());
    conn.data_received(b"GET / HTTP/1.1\r\nConnection: close\r\n\r\n");
    assert!(conn.is_closing());
    let sender = conn.sender();
    thread::spawn(move || {
        sender.send(RequestId(0), Response::new(Status::Accepted));
    }).join().unwrap();
    let poll = lazy(|| Ok::<_, ()>(conn.poll_responses())).wait();
    assert_eq!(poll, Ok(Async::Ready(())));
    assert_eq!(strip_date(conn.take_output()),
        "HTTP/1.1 202 Accepted\r\nContent-Length: 0\r\n\
         Connection: close\r\n\r\n");
    assert!(conn.is_done());
}

#[test]
fn fatal_error_drops_pending() {
    let mut conn = Connection::new(none, &Config::new().done());
    conn.data_received(b"GET /ok HTTP/1.1\r\n\r\nGET /bad HTTP/1.1\r\n\
                         Transfer-Encoding: gzip\r\n\r\n");
    assert!(conn.is_done());
    assert!(!conn.respond(RequestId(0), Response::new(Status::Ok)));
    assert_eq!(strip_date(conn.take_output()),
        "HTTP/1.1 501 Not Implemented\r\nConnection: close\r\n\r\n");
}

#[test]
fn server_header() {
    let cfg = Config::new().server_name("tk-h1").done();
    let mut conn = Connection::new(
        |_: RequestId, _: Request| Some(Response::new(Status::NoContent)),
        &cfg);
    conn.data_received(b"OPTIONS * HTTP/1.1\r\n\r\n");
    assert_eq!(strip_date(conn.take_output()),
        "HTTP/1.1 204 No Content\r\nServer: tk-h1\r\n\r\n");
}
