//! TCP Server
//!
//! Accepts publisher connections and runs one thread per connection.

use std::io::ErrorKind;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam::channel::Sender;

use crate::config::Config;
use crate::dispatch::Delivery;
use crate::error::{HandlerError, Result};
use super::Connection;

/// How long the accept loop sleeps when no connection is pending
const ACCEPT_POLL: Duration = Duration::from_millis(20);

/// Stops a running server from another thread
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// TCP front of the delivery queue
pub struct Server {
    config: Config,
    listener: TcpListener,
    queue: Sender<Delivery>,
    shutdown: ShutdownHandle,
}

impl Server {
    /// Bind the listen address from `config`
    pub fn bind(config: Config, queue: Sender<Delivery>) -> Result<Self> {
        let listener = TcpListener::bind(&config.listen_addr)?;
        // Non-blocking accept so the loop can notice shutdown and the deadline
        listener.set_nonblocking(true)?;

        Ok(Self {
            config,
            listener,
            queue,
            shutdown: ShutdownHandle::default(),
        })
    }

    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Accept connections until shutdown is requested or the run timeout
    /// elapses, then wait for open connections to finish.
    ///
    /// Open connections share the shutdown flag: once it is raised they
    /// answer new requests with an error and close.
    ///
    /// Consumes the server so its queue sender is dropped on return.
    pub fn run(self) -> Result<()> {
        let deadline = self.config.run_timeout.map(|timeout| Instant::now() + timeout);
        let active = Arc::new(AtomicUsize::new(0));
        let mut connections: Vec<JoinHandle<()>> = Vec::new();

        tracing::info!("Listening on {}", self.local_addr()?);

        loop {
            if self.shutdown.is_shutdown() {
                tracing::info!("Shutdown requested");
                break;
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                tracing::info!("Run timeout reached");
                // Open connections stop dispatching too
                self.shutdown.shutdown();
                break;
            }

            match self.listener.accept() {
                Ok((stream, addr)) => {
                    if active.load(Ordering::Relaxed) >= self.config.max_connections {
                        tracing::warn!(
                            "Refusing {}: {} connections open",
                            addr,
                            self.config.max_connections
                        );
                        drop(stream);
                    } else {
                        match self.spawn_connection(stream, Arc::clone(&active)) {
                            Ok(handle) => connections.push(handle),
                            Err(e) => tracing::warn!("Failed to start connection for {}: {}", addr, e),
                        }
                    }
                }
                Err(ref e) if e.kind() == ErrorKind::WouldBlock => thread::sleep(ACCEPT_POLL),
                Err(e) => tracing::warn!("Accept failed: {}", e),
            }

            connections.retain(|handle| !handle.is_finished());
        }

        tracing::debug!("Waiting for {} connections to close", connections.len());
        for handle in connections {
            let _ = handle.join();
        }

        Ok(())
    }

    fn spawn_connection(&self, stream: TcpStream, active: Arc<AtomicUsize>) -> Result<JoinHandle<()>> {
        // Accepted sockets may inherit the listener's non-blocking mode
        stream.set_nonblocking(false)?;

        let mut connection = Connection::new(stream, self.queue.clone(), self.shutdown.clone())?;
        connection.set_timeouts(self.config.read_timeout_ms, self.config.write_timeout_ms)?;

        active.fetch_add(1, Ordering::Relaxed);
        let released = Arc::clone(&active);
        thread::Builder::new()
            .name(format!("conn-{}", connection.peer_addr()))
            .spawn(move || {
                if let Err(e) = connection.handle() {
                    tracing::warn!("Connection {} closed with error: {}", connection.peer_addr(), e);
                }
                released.fetch_sub(1, Ordering::Relaxed);
            })
            .map_err(|e| {
                active.fetch_sub(1, Ordering::Relaxed);
                HandlerError::from(e)
            })
    }
}
