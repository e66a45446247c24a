//! Consumer Module
//!
//! Wires store, executor, sink and worker pool into one running unit.
//!
//! ## Lifecycle
//! 1. `open`: validate config, open the output sink, start workers
//! 2. hand `queue()` to a [`Server`](crate::network::Server) (or feed it directly)
//! 3. `close`: drop the queue, let workers drain it, close the sink

use std::sync::Arc;

use crossbeam::channel::{self, Sender};

use crate::config::Config;
use crate::dispatch::{Delivery, WorkerPool};
use crate::error::Result;
use crate::executor::CommandExecutor;
use crate::sink::FileSink;
use crate::store::OrderedStore;

/// A running consumer
///
/// ## Shutdown order
/// Every queue sender (this one and those held by servers/connections) must
/// be dropped before `close` can finish: workers exit only once the queue is
/// disconnected and empty. The sink is closed last so no line is lost.
pub struct Consumer {
    config: Config,
    store: Arc<OrderedStore>,
    sink: Arc<FileSink>,
    queue: Sender<Delivery>,
    pool: WorkerPool,
}

impl Consumer {
    /// Open the output file and start the worker pool
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        let sink = Arc::new(FileSink::open(&config.output_path)?);
        let store = Arc::new(OrderedStore::new());
        let executor = CommandExecutor::new(Arc::clone(&store), sink.clone());

        let (queue, deliveries) = channel::bounded(config.queue_capacity);
        let pool = WorkerPool::spawn(config.workers, deliveries, executor)?;

        tracing::info!(
            "Consumer ready: {} workers, output {}",
            pool.len(),
            config.output_path.display()
        );

        Ok(Self {
            config,
            store,
            sink,
            queue,
            pool,
        })
    }

    /// A sender onto the delivery queue
    pub fn queue(&self) -> Sender<Delivery> {
        self.queue.clone()
    }

    /// The shared store (for inspection)
    pub fn store(&self) -> &Arc<OrderedStore> {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Drain queued deliveries, stop the workers and flush the sink
    pub fn close(self) -> Result<()> {
        let Self {
            queue, pool, sink, ..
        } = self;

        drop(queue);
        pool.join()?;
        sink.close()?;

        tracing::info!("Consumer closed");
        Ok(())
    }
}
