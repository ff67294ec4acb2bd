use std::collections::VecDeque;


/// Identity of a request within a single connection
///
/// Ids are assigned sequentially in the order requests are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

#[derive(Debug)]
struct Entry<T> {
    id: RequestId,
    response: Option<(T, bool)>,
}

/// Keeps responses of pipelined requests in request order
///
/// An entry is pushed for every request as soon as it's parsed. Responses
/// may be attached in any order, but are only drained from the front of
/// the queue, so a slow request holds back the responses to every request
/// that came after it.
#[derive(Debug)]
pub struct PipelineQueue<T> {
    entries: VecDeque<Entry<T>>,
}

impl<T> PipelineQueue<T> {
    pub fn new() -> PipelineQueue<T> {
        PipelineQueue::with_capacity(0)
    }
    pub fn with_capacity(capacity: usize) -> PipelineQueue<T> {
        PipelineQueue {
            entries: VecDeque::with_capacity(capacity),
        }
    }
    /// Appends an entry without a response
    pub fn push(&mut self, id: RequestId) {
        self.entries.push_back(Entry { id: id, response: None });
    }
    /// Attaches a response to the entry with the id
    ///
    /// Returns `false` if there is no such entry (e.g. it's already
    /// drained). Attaching twice replaces the response.
    pub fn attach(&mut self, id: RequestId, response: T, is_head: bool)
        -> bool
    {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                if entry.response.is_some() {
                    debug!("Response for {:?} is replaced", id);
                }
                entry.response = Some((response, is_head));
                true
            }
            None => {
                debug!("Response for unknown request {:?} is dropped", id);
                false
            }
        }
    }
    /// Removes and returns responses from the front of the queue, up to the
    /// first entry that has no response yet
    pub fn drain_ready(&mut self) -> Vec<(T, bool)> {
        let mut result = Vec::new();
        while self.entries.front().map_or(false, |e| e.response.is_some()) {
            let entry = self.entries.pop_front();
            if let Some(response) = entry.and_then(|e| e.response) {
                result.push(response);
            }
        }
        result
    }
    /// Id of the oldest request that is not drained yet
    pub fn front(&self) -> Option<RequestId> {
        self.entries.front().map(|e| e.id)
    }
    /// Returns true if a request with the id is waiting for a response
    pub fn is_pending(&self, id: RequestId) -> bool {
        self.entries.iter().any(|e| e.id == id && e.response.is_none())
    }
    /// Number of requests that are not drained yet
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for PipelineQueue<T> {
    fn default() -> PipelineQueue<T> {
        PipelineQueue::new()
    }
}
