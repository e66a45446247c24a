//! Dispatch Tests
//!
//! Tests verify:
//! - Valid payloads are executed and acked
//! - Undecodable payloads are nacked and never executed
//! - A dropped delivery is seen as disconnected by its publisher
//! - The worker pool drains the queue before exiting

use std::sync::Arc;

use bytes::Bytes;
use cmdhandler::dispatch::{process_delivery, Delivery, WorkerPool};
use cmdhandler::protocol::{encode_command, Command, Status};
use cmdhandler::sink::MemorySink;
use cmdhandler::{CommandExecutor, OrderedStore};
use crossbeam::channel;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup() -> (Arc<MemorySink>, CommandExecutor) {
    let sink = Arc::new(MemorySink::new());
    let executor = CommandExecutor::new(Arc::new(OrderedStore::new()), sink.clone());
    (sink, executor)
}

fn payload(command: &Command) -> Bytes {
    Bytes::from(encode_command(command).unwrap())
}

// =============================================================================
// process_delivery Tests
// =============================================================================

#[test]
fn test_valid_payload_is_acked() {
    let (sink, executor) = setup();
    let (delivery, outcome) = Delivery::new(payload(&Command::add("k", "v")));

    let status = process_delivery(delivery, &executor);

    assert_eq!(status, Status::Ack);
    assert_eq!(outcome.recv().unwrap(), Status::Ack);
    assert_eq!(sink.lines(), vec!["AddItem: Added item successfully. Key: k, Value: v"]);
}

#[test]
fn test_unsupported_action_is_still_acked() {
    let (sink, executor) = setup();
    let (delivery, outcome) = Delivery::new(Bytes::from_static(br#"{"Action":13}"#));

    assert_eq!(process_delivery(delivery, &executor), Status::Ack);
    assert_eq!(outcome.recv().unwrap(), Status::Ack);
    assert_eq!(sink.lines(), vec!["Action: unknownAction: 13, is not supported"]);
}

#[test]
fn test_malformed_payload_is_nacked() {
    let (sink, executor) = setup();
    let (delivery, outcome) = Delivery::new(Bytes::from_static(b"{not json"));

    let status = process_delivery(delivery, &executor);

    assert_eq!(status, Status::Nack);
    assert_eq!(outcome.recv().unwrap(), Status::Nack);
    assert!(sink.lines().is_empty());
    assert!(executor.store().is_empty());
}

#[test]
fn test_dropped_delivery_disconnects_publisher() {
    let (delivery, outcome) = Delivery::new(Bytes::from_static(b"{}"));

    drop(delivery);

    assert!(outcome.recv().is_err());
}

#[test]
fn test_ack_after_publisher_left_does_not_panic() {
    let (delivery, outcome) = Delivery::new(Bytes::from_static(b"{}"));
    drop(outcome);

    delivery.ack();
}

// =============================================================================
// WorkerPool Tests
// =============================================================================

#[test]
fn test_pool_processes_and_drains_queue() {
    let (sink, executor) = setup();
    let store = Arc::clone(executor.store());
    let (queue, deliveries) = channel::bounded(16);

    let pool = WorkerPool::spawn(4, deliveries, executor).unwrap();
    assert_eq!(pool.len(), 4);

    let mut outcomes = Vec::new();
    for i in 0..200 {
        let (delivery, outcome) = Delivery::new(payload(&Command::add(format!("key{}", i), "v")));
        queue.send(delivery).unwrap();
        outcomes.push(outcome);
    }
    drop(queue);
    pool.join().unwrap();

    for outcome in outcomes {
        assert_eq!(outcome.recv().unwrap(), Status::Ack);
    }
    assert_eq!(store.len(), 200);
    assert_eq!(sink.lines().len(), 200);
    store.verify_links().unwrap();
}

#[test]
fn test_pool_mixed_valid_and_invalid() {
    let (sink, executor) = setup();
    let (queue, deliveries) = channel::unbounded();
    let pool = WorkerPool::spawn(2, deliveries, executor).unwrap();

    let (good, good_outcome) = Delivery::new(payload(&Command::get_all()));
    let (bad, bad_outcome) = Delivery::new(Bytes::from_static(b"nonsense"));
    queue.send(good).unwrap();
    queue.send(bad).unwrap();
    drop(queue);
    pool.join().unwrap();

    assert_eq!(good_outcome.recv().unwrap(), Status::Ack);
    assert_eq!(bad_outcome.recv().unwrap(), Status::Nack);
    assert_eq!(sink.lines(), vec!["GetAllItems: Empty map"]);
}
