//! Queue Client
//!
//! Publisher side of the queue protocol.

use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};

use bytes::Bytes;

use crate::error::{HandlerError, Result};
use crate::protocol::{
    encode_command, read_reply, write_request, Command, Reply, Request, Status, MAX_PAYLOAD_SIZE,
};

/// Blocking connection to a consumer's queue
///
/// One request is in flight at a time: every publish waits for its ack/nack.
pub struct QueueClient {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl QueueClient {
    /// Connect to a consumer
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        let read_stream = stream.try_clone()?;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
        })
    }

    /// Publish one opaque message and return whether it was acked or nacked
    ///
    /// Payloads over `MAX_PAYLOAD_SIZE` are rejected before anything is sent,
    /// so the connection stays usable.
    pub fn publish(&mut self, payload: impl Into<Bytes>) -> Result<Status> {
        let payload = payload.into();
        if payload.len() > MAX_PAYLOAD_SIZE as usize {
            return Err(HandlerError::Protocol(format!(
                "Publish payload too large: {} bytes (max {})",
                payload.len(),
                MAX_PAYLOAD_SIZE
            )));
        }

        let reply = self.round_trip(&Request::Publish(payload))?;
        match reply.status {
            Status::Ack | Status::Nack => Ok(reply.status),
            Status::Error => Err(HandlerError::Network(error_message(&reply))),
            Status::Pong => Err(HandlerError::Protocol(
                "unexpected PONG reply to PUBLISH".to_string(),
            )),
        }
    }

    /// Encode and publish a command
    pub fn publish_command(&mut self, command: &Command) -> Result<Status> {
        let payload = encode_command(command)?;
        self.publish(payload)
    }

    /// Health check
    pub fn ping(&mut self) -> Result<()> {
        let reply = self.round_trip(&Request::Ping)?;
        match reply.status {
            Status::Pong => Ok(()),
            Status::Error => Err(HandlerError::Network(error_message(&reply))),
            other => Err(HandlerError::Protocol(format!(
                "unexpected {:?} reply to PING",
                other
            ))),
        }
    }

    fn round_trip(&mut self, request: &Request) -> Result<Reply> {
        write_request(&mut self.writer, request)?;
        read_reply(&mut self.reader)
    }
}

fn error_message(reply: &Reply) -> String {
    reply
        .payload
        .as_deref()
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        .unwrap_or_else(|| "server error".to_string())
}
