//! Network Module
//!
//! TCP front of the delivery queue and its client.
//!
//! ## Architecture
//! - Single acceptor thread (non-blocking accept loop)
//! - One thread per publisher connection
//! - Publishes handed to the worker pool as deliveries

mod server;
mod connection;
mod client;

pub use server::{Server, ShutdownHandle};
pub use connection::Connection;
pub use client::QueueClient;
