//! Dispatch Module
//!
//! Moves queued messages through the executor.
//!
//! ## Flow
//! ```text
//!  Connection ──Delivery──▶ bounded queue ──▶ worker 0..N ──▶ CommandExecutor
//!      ▲                                          │
//!      └──────────────── ack / nack ──────────────┘
//! ```
//!
//! Workers only contend on the store lock.

mod delivery;
mod pool;

pub use delivery::Delivery;
pub use pool::{process_delivery, WorkerPool};
