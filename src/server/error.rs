use crate::enums::Status;


quick_error! {
    /// Fatal request parsing error
    ///
    /// Every variant is fatal for the connection: the input is discarded,
    /// an error status line with `Connection: close` is written and the
    /// connection must be shut down after flushing output.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Error {
        /// Method is not terminated within `OPTIONS` length or is not
        /// one of the supported methods
        UnsupportedMethod {
            description("method is not supported")
            display("method is not supported")
        }
        /// Request line doesn't end within the 64 KiB window
        RequestLineTooLong {
            description("request line is too long")
            display("request line is too long")
        }
        /// Request line is malformed (no target or bad version)
        BadRequestLine {
            description("error parsing request line")
            display("error parsing request line")
        }
        /// A header line doesn't end within the 64 KiB window
        HeaderTooLong {
            description("header line is too long")
            display("header line is too long")
        }
        /// Content length header is invalid (non-integer, or > 64bit)
        ContentLengthInvalid {
            description("invalid content-length header")
            display("invalid content-length header")
        }
        /// Transfer encoding other than `chunked`
        UnsupportedTransferEncoding {
            description("unsupported transfer encoding")
            display("unsupported transfer encoding")
        }
        /// `Expect: 100-continue` without a request body
        ContinueWithoutBody {
            description("100-continue expected for a request without body")
            display("100-continue expected for a request without body")
        }
        /// Expectation other than `100-continue` on HTTP/1.1
        ExpectationFailed(value: String) {
            description("unsupported expectation")
            display("unsupported expectation {:?}", value)
        }
        /// Request body is larger than the configured maximum
        RequestTooLong {
            description("request body is too big")
            display("request body is too big")
        }
        /// Chunk size line doesn't fit in 16 hex digits
        ChunkSizeTooLong {
            description("chunk size line is too long")
            display("chunk size line is too long")
        }
        /// Chunk data is not followed by CRLF
        BadChunk {
            description("chunk is not terminated by CRLF")
            display("chunk is not terminated by CRLF")
        }
        /// Anything but CRLF after the last chunk (trailers)
        BadLastChunk {
            description("trailers are not supported")
            display("trailers are not supported")
        }
    }
}

impl Error {
    /// Status code that is sent to the peer
    pub fn status(&self) -> Status {
        use self::Error::*;
        match *self {
            UnsupportedMethod => Status::MethodNotAllowed,
            RequestLineTooLong => Status::RequestURITooLong,
            BadRequestLine | HeaderTooLong | ContentLengthInvalid |
            ContinueWithoutBody | ChunkSizeTooLong | BadChunk | BadLastChunk
            => Status::BadRequest,
            UnsupportedTransferEncoding => Status::NotImplemented,
            ExpectationFailed(..) => Status::ExpectationFailed,
            RequestTooLong => Status::RequestEntityTooLarge,
        }
    }
}
