//! Incremental HTTP/1.x request parsing for non-blocking servers
//!
//! The crate is sans-io: bytes read from a socket are pushed into a
//! [`server::RequestParser`] (or a whole [`server::Connection`]), and
//! everything that must be written back ends up in an output buffer.
//!
//! * [`server::RequestParser`] is the request-line/header/body state
//!   machine, including chunked transfer decoding and `Expect: 100-continue`
//! * [`server::PipelineQueue`] keeps responses of a persistent connection
//!   in request order even if handlers complete out of order
//! * [`multipart::MultipartDecoder`] decodes `multipart/form-data` bodies
//!   incrementally, without buffering whole parts
#![recursion_limit="100"]

extern crate futures;
extern crate netbuf;
extern crate url;
#[cfg(feature="date_header")] extern crate httpdate;
#[macro_use(quick_error)] extern crate quick_error;
#[macro_use] extern crate matches;
#[macro_use] extern crate log;


pub mod server;
pub mod multipart;
mod enums;
mod headers;
mod base_serializer;
mod chunked;

pub use crate::enums::{Version, Status, Method};
pub use crate::headers::HeaderMap;
pub use crate::base_serializer::HeaderError;
