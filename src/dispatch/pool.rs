//! Worker Pool
//!
//! N threads pulling deliveries off one queue and feeding the executor.

use std::thread::{self, JoinHandle};

use crossbeam::channel::Receiver;

use crate::error::{HandlerError, Result};
use crate::executor::CommandExecutor;
use crate::protocol::{decode_command, Status};
use super::Delivery;

/// Fixed-size pool of command workers
///
/// Workers run until every sender of the delivery queue is dropped and the
/// queue is empty, so closing the queue drains it.
pub struct WorkerPool {
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Start `count` workers sharing `executor`
    pub fn spawn(
        count: usize,
        deliveries: Receiver<Delivery>,
        executor: CommandExecutor,
    ) -> Result<Self> {
        let mut workers = Vec::with_capacity(count);

        for id in 0..count {
            let deliveries = deliveries.clone();
            let executor = executor.clone();
            let handle = thread::Builder::new()
                .name(format!("worker-{}", id))
                .spawn(move || worker(id, deliveries, executor))?;
            workers.push(handle);
        }

        tracing::info!("Started {} workers", count);
        Ok(Self { workers })
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Wait for every worker to finish
    pub fn join(self) -> Result<()> {
        let mut panicked = 0;
        for handle in self.workers {
            if handle.join().is_err() {
                panicked += 1;
            }
        }

        if panicked > 0 {
            return Err(HandlerError::Worker(format!("{} workers panicked", panicked)));
        }
        Ok(())
    }
}

fn worker(id: usize, deliveries: Receiver<Delivery>, executor: CommandExecutor) {
    for delivery in deliveries.iter() {
        tracing::trace!("Worker {}: received delivery", id);
        process_delivery(delivery, &executor);
    }
    tracing::debug!("Worker {}: finished", id);
}

/// Decode, execute and settle one delivery
///
/// Undecodable payloads are rejected and never reach the executor.
pub fn process_delivery(delivery: Delivery, executor: &CommandExecutor) -> Status {
    tracing::trace!("Received message: {}", String::from_utf8_lossy(delivery.payload()));

    let command = match decode_command(delivery.payload()) {
        Ok(command) => command,
        Err(e) => {
            tracing::warn!("Rejecting undecodable message: {}", e);
            delivery.nack();
            return Status::Nack;
        }
    };

    let outcome = executor.execute(&command);
    tracing::debug!(action = %command.action, key = %command.key, ?outcome, "Executed command");

    delivery.ack();
    Status::Ack
}
