//! Sink Module
//!
//! Destinations for result lines.
//!
//! ## Responsibilities
//! - Accept finished lines without blocking the caller on I/O
//! - Record every accepted line exactly once
//! - Drain pending lines before closing
//!
//! Write failures are logged and otherwise swallowed: the executor never sees
//! them.

mod file;
mod memory;

pub use file::FileSink;
pub use memory::MemorySink;

/// Fire-and-forget destination for result lines
///
/// Lines are passed without a trailing newline; the sink terminates them.
pub trait Sink: Send + Sync {
    /// Hand off one line. Must return without waiting for the write.
    fn write(&self, line: String);
}

