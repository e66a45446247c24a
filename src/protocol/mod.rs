//! Protocol Module
//!
//! Commands, their JSON payload codec, and the queue's framed wire protocol.
//!
//! ## Layers
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ Frame   (type, len, payload)     frame.rs   │
//! │   └── Payload  (JSON Command)    codec.rs   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ### Request Types
//! - 0x01: PUBLISH - Payload: message bytes
//! - 0x02: PING    - Payload: empty
//!
//! ### Reply Status Codes
//! - 0x00: ACK
//! - 0x01: NACK
//! - 0x02: ERROR
//! - 0x03: PONG
//!
//! ### Action Codes
//! - 0: AddItem
//! - 1: DeleteItem
//! - 2: GetItem
//! - 3: GetAllItems

mod command;
mod codec;
mod frame;
mod response;

pub use command::{Action, Command};
pub use codec::{decode_command, encode_command};
pub use frame::{
    decode_reply, decode_request, encode_reply, encode_request, read_reply, read_request,
    write_reply, write_request, Request, HEADER_SIZE, MAX_PAYLOAD_SIZE,
};
pub use response::{Reply, Status};
