use crate::server::Request;


/// Bounded free-list of request objects
///
/// Reusing a request keeps the allocations of its path, header and body
/// buffers. This is purely an optimization, a pool of size zero works
/// just as well.
#[derive(Debug)]
pub struct RequestPool {
    free: Vec<Request>,
    limit: usize,
}

impl RequestPool {
    pub fn new(limit: usize) -> RequestPool {
        RequestPool {
            free: Vec::with_capacity(limit),
            limit: limit,
        }
    }
    /// Returns a cleared request, either recycled or a new one
    pub fn get(&mut self) -> Request {
        self.free.pop().unwrap_or_else(Request::new)
    }
    /// Returns the request to the pool, dropping it if the pool is full
    pub fn put(&mut self, mut req: Request) {
        if self.free.len() < self.limit {
            req.reset();
            self.free.push(req);
        }
    }
    /// Number of requests ready for reuse
    pub fn len(&self) -> usize {
        self.free.len()
    }
    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }
}
