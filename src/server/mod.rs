//! HTTP server protocol implementation
//!
//! Everything here is sans-io: the caller reads from the socket into a
//! buffer, passes it to a `RequestParser` or a `Connection`, and writes
//! the output buffer back to the socket.
use crate::enums::Version;


mod config;
mod connection;
mod encoder;
mod error;
mod parser;
mod pipeline;
mod pool;
mod request;
mod response;

pub use self::connection::{Connection, Dispatcher, ResponseSender};
pub use self::encoder::{Encoder, write_fatal};
pub use self::error::Error;
pub use self::parser::{RequestParser, ParseOutcome, State, MAX_LINE_LENGTH};
pub use self::pipeline::{PipelineQueue, RequestId};
pub use self::pool::RequestPool;
pub use self::request::Request;
pub use self::response::Response;


/// Fine-grained configuration of the HTTP server
#[derive(Debug, Clone)]
pub struct Config {
    max_body_size: usize,
    inflight_request_limit: usize,
    inflight_request_prealloc: usize,
    request_pool_size: usize,
    server_name: Option<String>,
}


/// This structure contains all needed info to start response of the request
/// in a correct manner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseConfig {
    /// Whether request is a HEAD request
    pub is_head: bool,
    /// Is `Connection: close` in request or HTTP version == 1.0
    pub do_close: bool,
    /// Version of HTTP request
    pub version: Version,
}

impl ResponseConfig {
    pub fn for_request(req: &Request) -> ResponseConfig {
        ResponseConfig {
            version: req.version(),
            is_head: req.is_head(),
            do_close: req.connection_close(),
        }
    }
}
