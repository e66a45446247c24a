//! cmdhandler Producer Binary
//!
//! Publishes the commands of a scenario file to a consumer.

use std::sync::Arc;
use std::thread;

use clap::Parser;
use cmdhandler::network::QueueClient;
use cmdhandler::protocol::{Command, Status};
use cmdhandler::scenario::{expand, load_scenario};
use cmdhandler::Result;
use crossbeam::channel::{self, Receiver};
use tracing_subscriber::{fmt, EnvFilter};

/// cmdhandler Producer
#[derive(Parser, Debug)]
#[command(name = "cmdhandler-producer")]
#[command(about = "Publishes commands from a scenario file to the queue")]
#[command(version)]
struct Args {
    /// Consumer address
    #[arg(short, long, default_value = "127.0.0.1:5672")]
    server: String,

    /// Scenario JSON file
    #[arg(short = 'f', long, default_value = "/tmp/scenario01.json")]
    scenario: String,

    /// Number of publishing threads. Use 1 to keep the scenario order.
    #[arg(short, long, default_value = "8")]
    workers: usize,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cmdhandler=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        tracing::error!("Producer error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Shutting down...");
}

fn run(args: &Args) -> Result<()> {
    let scenario = load_scenario(&args.scenario)?;
    let commands = expand(&scenario);
    tracing::info!("Publishing {} commands from {}", commands.len(), args.scenario);

    let (sender, receiver) = channel::unbounded();
    for command in commands {
        // The receiver is alive until the senders below finish
        let _ = sender.send(command);
    }
    drop(sender);

    let server = Arc::new(args.server.clone());
    let mut publishers = Vec::with_capacity(args.workers);
    for id in 0..args.workers.max(1) {
        let receiver = receiver.clone();
        let server = Arc::clone(&server);
        publishers.push(thread::spawn(move || publisher(id, &server, receiver)));
    }

    for handle in publishers {
        match handle.join() {
            Ok(Err(e)) => tracing::error!("Publisher failed: {}", e),
            Err(_) => tracing::error!("Publisher panicked"),
            Ok(Ok(())) => {}
        }
    }

    Ok(())
}

fn publisher(id: usize, server: &str, commands: Receiver<Command>) -> Result<()> {
    let mut client = QueueClient::connect(server)?;

    for command in commands.iter() {
        match client.publish_command(&command)? {
            Status::Ack => tracing::debug!("Publisher {}: {} acked", id, command.action),
            status => tracing::warn!("Publisher {}: {} got {:?}", id, command.action, status),
        }
    }

    tracing::debug!("Publisher {}: finished", id);
    Ok(())
}
