//! Command codec
//!
//! JSON encoding of commands carried inside publish frames.
//!
//! ```text
//! {"Action":0,"Key":"key1","Value":"value1"}
//! ```
//! `Key` and `Value` may be omitted and default to empty strings.

use crate::error::Result;
use super::Command;

/// Decode a command from a message payload
pub fn decode_command(payload: &[u8]) -> Result<Command> {
    Ok(serde_json::from_slice(payload)?)
}

/// Encode a command into a message payload
pub fn encode_command(command: &Command) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(command)?)
}
