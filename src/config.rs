//! Configuration for cmdhandler
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{HandlerError, Result};

/// Main configuration for a consumer instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Queue Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address for publishers
    pub listen_addr: String,

    /// Capacity of the delivery queue between connections and workers.
    /// Publishers block once this many deliveries are waiting.
    pub queue_capacity: usize,

    /// Max concurrent publisher connections
    pub max_connections: usize,

    /// Connection read timeout (milliseconds, 0 disables)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 disables)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Dispatch Configuration
    // -------------------------------------------------------------------------
    /// Number of worker threads executing commands
    pub workers: usize,

    // -------------------------------------------------------------------------
    // Sink Configuration
    // -------------------------------------------------------------------------
    /// File that result lines are appended to
    pub output_path: PathBuf,

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------
    /// Stop accepting publishers after this long (None runs until shutdown)
    pub run_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:5672".to_string(),
            queue_capacity: 1024,
            max_connections: 1024,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
            workers: 8,
            output_path: PathBuf::from("/tmp/consumer-output.txt"),
            run_timeout: Some(Duration::from_secs(10 * 60)),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject settings that would leave the consumer unable to make progress
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(HandlerError::Config(
                "at least one worker is required".to_string(),
            ));
        }
        if self.queue_capacity == 0 {
            return Err(HandlerError::Config(
                "queue capacity must be greater than zero".to_string(),
            ));
        }
        if self.max_connections == 0 {
            return Err(HandlerError::Config(
                "max connections must be greater than zero".to_string(),
            ));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(HandlerError::Config("output path is empty".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the delivery queue capacity
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    /// Set the maximum number of concurrent connections
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the number of worker threads
    pub fn workers(mut self, count: usize) -> Self {
        self.config.workers = count;
        self
    }

    /// Set the output file for result lines
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_path = path.into();
        self
    }

    /// Set the run deadline
    pub fn run_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.run_timeout = timeout;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
