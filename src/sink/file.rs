//! File Sink
//!
//! Appends lines to a file from a single writer thread.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::{Mutex, RwLock};

use crate::error::{HandlerError, Result};
use super::Sink;

/// Asynchronous append-only file sink
///
/// ## Concurrency:
/// - Any number of threads call `write`; each call is one channel send
/// - One writer thread owns the file and drains the channel
/// - `close` drops the sending side, so the writer exits once the channel
///   is empty, then joins it
pub struct FileSink {
    /// Output file path (for logging)
    path: PathBuf,

    /// Sending side of the hand-off channel, `None` once closed
    sender: RwLock<Option<Sender<String>>>,

    /// Writer thread, taken by `close`
    writer: Mutex<Option<JoinHandle<()>>>,
}

impl FileSink {
    /// Open `path` for appending (creating it) and start the writer thread
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        let (sender, receiver) = channel::unbounded();
        let thread_path = path.clone();
        let writer = thread::Builder::new()
            .name("sink-writer".to_string())
            .spawn(move || drain(file, receiver, &thread_path))?;

        tracing::debug!("Sink opened at {}", path.display());

        Ok(Self {
            path,
            sender: RwLock::new(Some(sender)),
            writer: Mutex::new(Some(writer)),
        })
    }

    /// Stop accepting lines and wait until every pending line is written.
    ///
    /// Calling it again is a no-op.
    pub fn close(&self) -> Result<()> {
        // Dropping the last sender disconnects the channel once it is drained
        drop(self.sender.write().take());

        let Some(writer) = self.writer.lock().take() else {
            return Ok(());
        };
        writer
            .join()
            .map_err(|_| HandlerError::Sink(format!("writer for {} panicked", self.path.display())))?;

        tracing::debug!("Sink at {} closed", self.path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn write(&self, line: String) {
        match self.sender.read().as_ref() {
            Some(sender) => {
                if sender.send(line).is_err() {
                    tracing::warn!("Sink writer for {} is gone, line dropped", self.path.display());
                }
            }
            None => {
                tracing::warn!("Sink {} is closed, line dropped: {}", self.path.display(), line);
            }
        }
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::error!("Failed to close sink: {}", e);
        }
    }
}

/// Writer loop: runs until every sender is dropped and the channel is empty
fn drain(file: File, receiver: Receiver<String>, path: &Path) {
    let mut out = BufWriter::new(file);

    for line in receiver.iter() {
        if let Err(e) = writeln!(out, "{}", line) {
            tracing::warn!("Error writing to {}: {}", path.display(), e);
            continue;
        }
        // Flush whenever producers are momentarily idle
        if receiver.is_empty() {
            if let Err(e) = out.flush() {
                tracing::warn!("Error flushing {}: {}", path.display(), e);
            }
        }
    }

    if let Err(e) = out.flush() {
        tracing::warn!("Error flushing {}: {}", path.display(), e);
    }
}
