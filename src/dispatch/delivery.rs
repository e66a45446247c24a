//! Delivery
//!
//! One queued message plus the channel its outcome is reported on.

use bytes::Bytes;
use crossbeam::channel::{self, Receiver, Sender};

use crate::protocol::Status;

/// A message waiting to be processed
///
/// Exactly one of `ack`/`nack` is sent back. If the delivery is dropped
/// unanswered, the waiting side sees a disconnected channel and treats the
/// message as rejected.
#[derive(Debug)]
pub struct Delivery {
    payload: Bytes,
    reply: Sender<Status>,
}

impl Delivery {
    /// Create a delivery and the receiver its outcome will arrive on
    pub fn new(payload: Bytes) -> (Self, Receiver<Status>) {
        let (reply, outcome) = channel::bounded(1);
        (Self { payload, reply }, outcome)
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Mark the message processed
    pub fn ack(self) {
        self.settle(Status::Ack);
    }

    /// Mark the message rejected
    pub fn nack(self) {
        self.settle(Status::Nack);
    }

    fn settle(self, status: Status) {
        if self.reply.send(status).is_err() {
            tracing::debug!("Publisher went away before {:?} could be delivered", status);
        }
    }
}
