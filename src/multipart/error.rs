quick_error! {
    /// The terminal error of a body stream
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum StreamError {
        /// Multipart framing is broken or the content type is not a valid
        /// `multipart/form-data` one
        InvalidMultipart {
            description("invalid multipart data")
            display("invalid multipart data")
        }
        /// The stream ended before the closing delimiter
        IncompleteMultipart {
            description("incomplete multipart data")
            display("incomplete multipart data")
        }
        /// The stream was interrupted by the connection
        Aborted(reason: String) {
            description("stream aborted")
            display("stream aborted: {}", reason)
        }
    }
}
