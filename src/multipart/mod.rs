//! Streaming `multipart/form-data` decoding
//!
//! The decoder never buffers part bodies: data is passed to the callback as
//! soon as it's known not to be a part of the delimiter.
mod decoder;
mod error;
mod stream;

pub use self::decoder::{MultipartDecoder, MAX_HEADER_SIZE};
pub use self::error::StreamError;
pub use self::stream::StreamHandler;


/// Headers of a single part
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartHeader {
    /// The `name` parameter of `Content-Disposition`
    pub name: String,
    /// The `filename` parameter of `Content-Disposition`
    pub filename: Option<String>,
    /// Raw `Content-Type` of the part
    pub content_type: Option<String>,
}
