//! cmdhandler Consumer Binary
//!
//! Accepts published commands, executes them against the ordered store and
//! appends result lines to the output file.

use std::time::Duration;

use clap::Parser;
use cmdhandler::network::Server;
use cmdhandler::{Config, Consumer, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// cmdhandler Consumer
#[derive(Parser, Debug)]
#[command(name = "cmdhandler-consumer")]
#[command(about = "Reads commands from the queue and executes them")]
#[command(version)]
struct Args {
    /// Listen address for publishers (host:port)
    #[arg(short, long, default_value = "127.0.0.1:5672")]
    listen: String,

    /// Output file for result lines
    #[arg(short, long, default_value = "/tmp/consumer-output.txt")]
    output: String,

    /// Number of worker threads
    #[arg(short, long, default_value = "8")]
    workers: usize,

    /// Stop accepting publishers after this many seconds (0 runs forever)
    #[arg(short, long, default_value = "600")]
    timeout_secs: u64,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cmdhandler=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("cmdhandler consumer v{}", cmdhandler::VERSION);
    tracing::info!("Output file: {}", args.output);
    tracing::info!("Listen address: {}", args.listen);

    let run_timeout = (args.timeout_secs > 0).then(|| Duration::from_secs(args.timeout_secs));
    let config = Config::builder()
        .listen_addr(&args.listen)
        .output_path(&args.output)
        .workers(args.workers)
        .run_timeout(run_timeout)
        .build();

    if let Err(e) = run(config) {
        tracing::error!("Consumer error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Shutting down...");
}

fn run(config: Config) -> Result<()> {
    let consumer = Consumer::open(config.clone())?;

    let served = Server::bind(config, consumer.queue()).and_then(Server::run);

    // Close even if the server failed so queued lines still reach the file
    let closed = consumer.close();
    served.and(closed)
}
