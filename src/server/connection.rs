use std::collections::VecDeque;
use std::sync::Arc;

use futures::{Async, Stream};
use futures::sync::mpsc::{unbounded, UnboundedSender, UnboundedReceiver};
use netbuf::Buf;

use crate::enums::Status;
use crate::server::{Config, Request, RequestParser, ParseOutcome, Response};
use crate::server::{PipelineQueue, RequestId, ResponseConfig};


/// Receives requests parsed by a `Connection`
pub trait Dispatcher {
    /// A request is fully received
    ///
    /// Return a response to answer immediately, or `None` to respond later
    /// via `Connection::respond` or a `ResponseSender`.
    fn request_received(&mut self, id: RequestId, request: Request)
        -> Option<Response>;
}

impl<F> Dispatcher for F
    where F: FnMut(RequestId, Request) -> Option<Response>
{
    fn request_received(&mut self, id: RequestId, request: Request)
        -> Option<Response>
    {
        (self)(id, request)
    }
}

/// A handle to deliver a response from another thread or task
///
/// Responses are picked up by `Connection::poll_responses`.
#[derive(Debug, Clone)]
pub struct ResponseSender {
    channel: UnboundedSender<(RequestId, Response)>,
}

impl ResponseSender {
    /// Returns `false` if the connection is already gone
    pub fn send(&self, id: RequestId, response: Response) -> bool {
        self.channel.unbounded_send((id, response)).is_ok()
    }
}

/// A single server-side HTTP/1.x connection
///
/// Owns input and output buffers. Bytes read from the socket are passed
/// to `data_received`, and everything in `output()` must be written back
/// to the socket. The connection must be shut down (after flushing the
/// output) once `is_done()` returns true.
pub struct Connection<D: Dispatcher> {
    config: Arc<Config>,
    parser: RequestParser,
    input: Buf,
    output: Buf,
    dispatcher: D,
    pipeline: PipelineQueue<Response>,
    in_flight: VecDeque<(RequestId, ResponseConfig)>,
    next_id: u64,
    sender: UnboundedSender<(RequestId, Response)>,
    receiver: UnboundedReceiver<(RequestId, Response)>,
    /// No more requests are read from the connection
    read_closed: bool,
    /// The fatal error status is written, nothing else must be sent
    failed: bool,
}

impl<D: Dispatcher> Connection<D> {
    pub fn new(dispatcher: D, config: &Arc<Config>) -> Connection<D> {
        let (tx, rx) = unbounded();
        Connection {
            config: config.clone(),
            parser: RequestParser::new(config),
            input: Buf::new(),
            output: Buf::new(),
            dispatcher: dispatcher,
            pipeline: PipelineQueue::with_capacity(
                config.inflight_request_prealloc),
            in_flight: VecDeque::with_capacity(
                config.inflight_request_prealloc),
            next_id: 0,
            sender: tx,
            receiver: rx,
            read_closed: false,
            failed: false,
        }
    }

    /// Handles bytes read from the socket
    ///
    /// Input received after the connection started closing is ignored.
    pub fn data_received(&mut self, data: &[u8]) {
        if self.read_closed {
            trace!("Ignoring {} bytes on closing connection", data.len());
            return;
        }
        self.input.extend(data);
        self.process();
    }

    /// Attaches a response to the request
    ///
    /// Returns `false` if the request is unknown or the connection is
    /// closing and the response is dropped.
    pub fn respond(&mut self, id: RequestId, response: Response) -> bool {
        let attached = self.attach(id, response);
        self.process();
        attached
    }

    /// Returns a handle for responding from other threads
    pub fn sender(&self) -> ResponseSender {
        ResponseSender { channel: self.sender.clone() }
    }

    /// Picks up responses delivered by `ResponseSender`s
    ///
    /// Must be called from within a task, which is woken up when a new
    /// response arrives. Returns `Ready` when the connection is done.
    pub fn poll_responses(&mut self) -> Async<()> {
        // the stream never ends as we keep a sender ourselves
        while let Ok(Async::Ready(Some((id, response)))) = self.receiver.poll()
        {
            self.attach(id, response);
        }
        self.process();
        if self.is_done() {
            Async::Ready(())
        } else {
            Async::NotReady
        }
    }

    /// Bytes to be written to the socket
    ///
    /// Consume written bytes from the buffer.
    pub fn output(&mut self) -> &mut Buf {
        &mut self.output
    }

    /// Takes all the pending output
    pub fn take_output(&mut self) -> Vec<u8> {
        let result = self.output[..].to_vec();
        let len = self.output.len();
        self.output.consume(len);
        result
    }

    /// Returns true if no more requests will be read from the connection
    pub fn is_closing(&self) -> bool {
        self.read_closed
    }

    /// Returns true when the connection must be closed after the output
    /// is flushed
    pub fn is_done(&self) -> bool {
        self.failed || (self.read_closed && self.pipeline.is_empty())
    }

    /// Number of requests waiting for the response
    pub fn in_flight(&self) -> usize {
        self.pipeline.len()
    }

    /// Returns the request object to the pool for reuse
    pub fn recycle(&mut self, request: Request) {
        self.parser.recycle(request);
    }

    pub fn dispatcher(&mut self) -> &mut D {
        &mut self.dispatcher
    }

    fn attach(&mut self, id: RequestId, response: Response) -> bool {
        let is_head = match self.in_flight.iter().find(|&&(x, _)| x == id) {
            Some(&(_, cfg)) => cfg.is_head,
            None => {
                debug!("Response for {:?} is dropped", id);
                return false;
            }
        };
        self.pipeline.attach(id, response, is_head)
    }

    fn process(&mut self) {
        let limit = self.config.inflight_request_limit;
        loop {
            self.flush_ready();
            if self.read_closed || self.pipeline.len() >= limit {
                return;
            }
            match self.parser.parse_from(&mut self.input, &mut self.output) {
                ParseOutcome::NeedMoreData => return,
                ParseOutcome::FatalError(status) => {
                    self.fail(status);
                    return;
                }
                ParseOutcome::RequestComplete => {}
            }
            let request = match self.parser.take() {
                Some(req) => req,
                None => return,
            };
            let id = RequestId(self.next_id);
            self.next_id += 1;
            let cfg = ResponseConfig::for_request(&request);
            if cfg.do_close {
                debug!("Request {:?} closes the connection", id);
                self.stop_reading();
            }
            self.pipeline.push(id);
            self.in_flight.push_back((id, cfg));
            if let Some(response) = self.dispatcher.request_received(id,
                                                                     request)
            {
                self.pipeline.attach(id, response, cfg.is_head);
            }
        }
    }

    fn flush_ready(&mut self) {
        for (response, is_head) in self.pipeline.drain_ready() {
            let (id, mut cfg) = match self.in_flight.pop_front() {
                Some(x) => x,
                None => break,
            };
            cfg.is_head = is_head;
            if let Err(e) = response.write_to(&mut self.output, cfg,
                                              &self.config)
            {
                warn!("Can't serialize response to {:?}: {}", id, e);
                let error = Response::new(Status::InternalServerError);
                cfg.do_close = true;
                if let Err(e) = error.write_to(&mut self.output, cfg,
                                               &self.config)
                {
                    debug!("Can't serialize error response: {}", e);
                }
            }
            if cfg.do_close || response.is_close() {
                trace!("Response to {:?} closes the connection", id);
                self.stop_reading();
                self.pipeline = PipelineQueue::new();
                self.in_flight.clear();
                break;
            }
        }
    }

    fn stop_reading(&mut self) {
        self.read_closed = true;
        let len = self.input.len();
        self.input.consume(len);
    }

    fn fail(&mut self, status: Status) {
        debug!("Closing connection with {} status, dropping {} responses",
               status.code(), self.pipeline.len());
        self.failed = true;
        self.stop_reading();
        self.pipeline = PipelineQueue::new();
        self.in_flight.clear();
    }
}
