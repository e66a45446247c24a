//! # cmdhandler
//!
//! An insertion-ordered key-value store driven by a queue of commands:
//! - O(1) add/replace, delete and lookup by key
//! - O(1) maintenance of first-insertion order
//! - Many concurrent workers over one reader/writer lock
//! - One human-readable result line per command, appended asynchronously
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  TCP Queue (Publishers)                      │
//! │              frames: PUBLISH -> ACK / NACK                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Delivery
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    Worker Pool (N)                           │
//! │              decode JSON -> CommandExecutor                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │OrderedStore │          │  FileSink   │
//!   │  (RwLock)   │          │ (1 writer)  │
//!   └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod store;
pub mod protocol;
pub mod sink;
pub mod executor;
pub mod dispatch;
pub mod network;
pub mod scenario;
pub mod consumer;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{HandlerError, Result};
pub use config::Config;
pub use consumer::Consumer;
pub use executor::{CommandExecutor, Outcome};
pub use store::OrderedStore;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of cmdhandler
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
