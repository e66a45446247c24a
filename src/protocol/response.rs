//! Reply definitions
//!
//! Represents the queue's answer to a publisher.

/// Reply status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    /// Message was processed
    Ack = 0x00,

    /// Message was rejected (undecodable or dropped)
    Nack = 0x01,

    /// Request could not be handled
    Error = 0x02,

    /// Answer to a ping
    Pong = 0x03,
}

impl Status {
    pub(crate) fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Status::Ack),
            0x01 => Some(Status::Nack),
            0x02 => Some(Status::Error),
            0x03 => Some(Status::Pong),
            _ => None,
        }
    }
}

/// A reply sent back for each request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Status code
    pub status: Status,

    /// Optional payload (error message for ERROR)
    pub payload: Option<Vec<u8>>,
}

impl Reply {
    pub fn ack() -> Self {
        Self {
            status: Status::Ack,
            payload: None,
        }
    }

    pub fn nack() -> Self {
        Self {
            status: Status::Nack,
            payload: None,
        }
    }

    pub fn pong() -> Self {
        Self {
            status: Status::Pong,
            payload: None,
        }
    }

    /// Create an ERROR reply
    pub fn error(message: &str) -> Self {
        Self {
            status: Status::Error,
            payload: Some(message.as_bytes().to_vec()),
        }
    }
}
