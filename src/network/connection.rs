//! Connection Handler
//!
//! Handles individual publisher connections.

use std::io::{BufReader, BufWriter, ErrorKind};
use std::net::TcpStream;
use std::time::{Duration, Instant};

use bytes::Bytes;
use crossbeam::channel::Sender;

use crate::dispatch::Delivery;
use crate::error::{HandlerError, Result};
use crate::protocol::{read_request, write_reply, Reply, Request};
use super::ShutdownHandle;

/// How often an idle connection wakes up to check for shutdown
const IDLE_POLL: Duration = Duration::from_millis(50);

const SHUTTING_DOWN: &str = "queue is shutting down";

/// Handles a single publisher connection
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Delivery queue shared with the worker pool
    queue: Sender<Delivery>,

    /// Raised by the server; no request is dispatched after it
    shutdown: ShutdownHandle,

    /// Idle limit between requests (None waits until shutdown)
    read_timeout: Option<Duration>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    ///
    /// Sets up buffered I/O
    pub fn new(stream: TcpStream, queue: Sender<Delivery>, shutdown: ShutdownHandle) -> Result<Self> {
        // Get peer address for logging before we split the stream
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm: every publish waits for its reply
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            queue,
            shutdown,
            read_timeout: None,
            peer_addr,
        })
    }

    /// Configure connection timeouts
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        self.read_timeout = (read_ms > 0).then(|| Duration::from_millis(read_ms));
        self.reader.get_ref().set_read_timeout(self.read_timeout)?;
        if write_ms > 0 {
            self.writer
                .get_ref()
                .set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }

        Ok(())
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Reads requests in a loop and sends one reply per request.
    /// Returns when the publisher disconnects, goes idle past the read
    /// timeout, shutdown is raised, or an error occurs.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        loop {
            if !self.wait_for_request()? {
                return Ok(());
            }
            if self.shutdown.is_shutdown() {
                tracing::debug!("Rejecting request from {}: shutting down", self.peer_addr);
                let _ = write_reply(&mut self.writer, &Reply::error(SHUTTING_DOWN));
                return Ok(());
            }

            let request = match read_request(&mut self.reader) {
                Ok(request) => request,
                Err(HandlerError::Io(ref e)) if is_disconnect(e.kind()) => {
                    tracing::debug!("Client {} disconnected ({:?})", self.peer_addr, e.kind());
                    return Ok(());
                }
                Err(HandlerError::Io(ref e))
                    if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
                {
                    // Windows reports TimedOut instead of WouldBlock
                    tracing::debug!("Read timeout for client {}", self.peer_addr);
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                    let _ = write_reply(&mut self.writer, &Reply::error(&e.to_string()));
                    return Err(e);
                }
            };

            let reply = match request {
                Request::Publish(payload) => self.publish(payload),
                Request::Ping => Reply::pong(),
            };

            if let Err(e) = write_reply(&mut self.writer, &reply) {
                if let HandlerError::Io(ref io_err) = e {
                    if is_disconnect(io_err.kind()) {
                        tracing::debug!(
                            "Client {} disconnected before reply could be sent: {}",
                            self.peer_addr,
                            e
                        );
                        return Ok(());
                    }
                }
                tracing::warn!("Error writing to {}: {}", self.peer_addr, e);
                return Err(e);
            }

            if self.shutdown.is_shutdown() {
                return Ok(());
            }
        }
    }

    /// Wait until the next request has started to arrive
    ///
    /// Wakes every `IDLE_POLL` to look at the shutdown flag. Returns false
    /// when the connection should close without a reply: the publisher left,
    /// stayed idle past the read timeout, or shutdown was raised while idle.
    fn wait_for_request(&mut self) -> Result<bool> {
        if !self.reader.buffer().is_empty() {
            return Ok(true);
        }

        let poll = self.read_timeout.map_or(IDLE_POLL, |timeout| timeout.min(IDLE_POLL));
        let stream = self.reader.get_ref();
        stream.set_read_timeout(Some(poll))?;

        let started = Instant::now();
        let mut byte = [0u8; 1];
        let ready = loop {
            match stream.peek(&mut byte) {
                Ok(0) => {
                    tracing::debug!("Client {} disconnected", self.peer_addr);
                    break false;
                }
                Ok(_) => break true,
                // Windows reports TimedOut instead of WouldBlock
                Err(ref e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    if self.shutdown.is_shutdown() {
                        tracing::debug!("Closing idle connection {} for shutdown", self.peer_addr);
                        break false;
                    }
                    if self.read_timeout.is_some_and(|timeout| started.elapsed() >= timeout) {
                        tracing::debug!("Read timeout for client {}", self.peer_addr);
                        break false;
                    }
                }
                Err(ref e) if e.kind() == ErrorKind::Interrupted => {}
                Err(ref e) if is_disconnect(e.kind()) => {
                    tracing::debug!("Client {} disconnected ({:?})", self.peer_addr, e.kind());
                    break false;
                }
                Err(e) => return Err(e.into()),
            }
        };

        // The frame itself is read under the configured timeout
        stream.set_read_timeout(self.read_timeout)?;
        Ok(ready)
    }

    /// Enqueue one message and wait for a worker to settle it
    fn publish(&self, payload: Bytes) -> Reply {
        if self.shutdown.is_shutdown() {
            return Reply::error(SHUTTING_DOWN);
        }

        let (delivery, outcome) = Delivery::new(payload);

        if self.queue.send(delivery).is_err() {
            tracing::warn!("Queue closed, rejecting message from {}", self.peer_addr);
            return Reply::error(SHUTTING_DOWN);
        }

        match outcome.recv() {
            Ok(status) => Reply {
                status,
                payload: None,
            },
            // Delivery dropped without an answer
            Err(_) => Reply::nack(),
        }
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

fn is_disconnect(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::UnexpectedEof
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe
    )
}
