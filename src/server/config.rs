use std::sync::Arc;

use crate::server::Config;

impl Config {
    /// Create a config with defaults
    pub fn new() -> Config {
        Config {
            max_body_size: 1 << 20,
            inflight_request_limit: 32,
            inflight_request_prealloc: 4,
            request_pool_size: 16,
            server_name: None,
        }
    }
    /// Maximum size of a request body
    ///
    /// Default is 1 MiB.
    ///
    /// Applies both to `Content-Length` declared bodies and to the sum of
    /// chunk sizes of a chunked body. A request over the limit is rejected
    /// with `413 Request Entity Too Large`.
    pub fn max_body_size(&mut self, value: usize) -> &mut Self {
        self.max_body_size = value;
        self
    }
    /// A number of inflight requests until we stop reading more requests
    ///
    /// Pipelined requests over the limit stay in the input buffer until
    /// responses for the preceding ones are written.
    pub fn inflight_request_limit(&mut self, value: usize) -> &mut Self {
        self.inflight_request_limit = value;
        self
    }
    /// Size of the queue that is preallocated for holding requests
    ///
    /// Should be smaller than `inflight_request_limit`.
    pub fn inflight_request_prealloc(&mut self, value: usize) -> &mut Self {
        self.inflight_request_prealloc = value;
        self
    }
    /// Number of recycled request objects kept per connection
    ///
    /// Zero disables pooling.
    pub fn request_pool_size(&mut self, value: usize) -> &mut Self {
        self.request_pool_size = value;
        self
    }
    /// Value of the `Server` header added to every response
    ///
    /// By default no `Server` header is sent.
    pub fn server_name<S: Into<String>>(&mut self, value: S) -> &mut Self {
        self.server_name = Some(value.into());
        self
    }
    /// Create a Arc'd config clone to pass to the constructor
    ///
    /// This is just a convenience method.
    pub fn done(&mut self) -> Arc<Config> {
        Arc::new(self.clone())
    }
}

impl Default for Config {
    fn default() -> Config {
        Config::new()
    }
}
