//! CommandExecutor Tests
//!
//! Tests verify the exact result lines for every action:
//! - AddItem: added vs replaced
//! - DeleteItem / GetItem: hit and miss
//! - GetAllItems: one line per entry, or "Empty map"
//! - Unsupported actions leave the store untouched

use std::sync::Arc;

use cmdhandler::protocol::{Action, Command};
use cmdhandler::sink::MemorySink;
use cmdhandler::{CommandExecutor, OrderedStore, Outcome};

// =============================================================================
// Helper Functions
// =============================================================================

fn setup() -> (Arc<MemorySink>, CommandExecutor) {
    let sink = Arc::new(MemorySink::new());
    let executor = CommandExecutor::new(Arc::new(OrderedStore::new()), sink.clone());
    (sink, executor)
}

/// Run one command and return the lines it produced
fn run(sink: &MemorySink, executor: &CommandExecutor, command: Command) -> Vec<String> {
    executor.execute(&command);
    sink.take()
}

// =============================================================================
// AddItem Tests
// =============================================================================

#[test]
fn test_add_item_single() {
    let (sink, executor) = setup();

    assert_eq!(
        run(&sink, &executor, Command::add("testKey", "testValue")),
        vec!["AddItem: Added item successfully. Key: testKey, Value: testValue"]
    );
    assert_eq!(
        run(&sink, &executor, Command::get("testKey")),
        vec!["GetItem: Key: testKey, Value: testValue"]
    );
    assert_eq!(
        run(&sink, &executor, Command::get_all()),
        vec!["GetAllItems: Position: 0, Key: testKey, Value: testValue"]
    );
}

#[test]
fn test_add_item_between_others() {
    let (sink, executor) = setup();

    executor.execute(&Command::add("before", "1"));
    executor.execute(&Command::add("testKey", "testValue"));
    executor.execute(&Command::add("after", "2"));
    sink.take();

    assert_eq!(
        run(&sink, &executor, Command::get_all()),
        vec![
            "GetAllItems: Position: 0, Key: before, Value: 1",
            "GetAllItems: Position: 1, Key: testKey, Value: testValue",
            "GetAllItems: Position: 2, Key: after, Value: 2",
        ]
    );
}

#[test]
fn test_add_item_replace_keeps_position() {
    let (sink, executor) = setup();

    executor.execute(&Command::add("before", "1"));
    executor.execute(&Command::add("testKey", "testValue"));
    executor.execute(&Command::add("after", "2"));
    sink.take();

    assert_eq!(
        run(&sink, &executor, Command::add("testKey", "differentTestValue")),
        vec!["AddItem: Replaced item successfully. Key: testKey, Value: differentTestValue"]
    );
    assert_eq!(
        run(&sink, &executor, Command::get("testKey")),
        vec!["GetItem: Key: testKey, Value: differentTestValue"]
    );
    assert_eq!(
        run(&sink, &executor, Command::get_all())[1],
        "GetAllItems: Position: 1, Key: testKey, Value: differentTestValue"
    );
}

#[test]
fn test_add_item_outcomes() {
    let (_sink, executor) = setup();

    assert_eq!(executor.execute(&Command::add("k", "v1")), Outcome::Added);
    assert_eq!(executor.execute(&Command::add("k", "v2")), Outcome::Replaced);
}

// =============================================================================
// DeleteItem Tests
// =============================================================================

#[test]
fn test_delete_item_single() {
    let (sink, executor) = setup();

    executor.execute(&Command::add("testKey", "testValue"));
    sink.take();

    assert_eq!(
        run(&sink, &executor, Command::delete("testKey")),
        vec!["DeleteItem: Deleted item successfully. Key: testKey"]
    );
    assert_eq!(
        run(&sink, &executor, Command::get("testKey")),
        vec!["GetItem: Key testKey not found"]
    );
    assert_eq!(
        run(&sink, &executor, Command::get_all()),
        vec!["GetAllItems: Empty map"]
    );
}

#[test]
fn test_delete_item_middle() {
    let (sink, executor) = setup();

    for key in ["a", "testKey", "c"] {
        executor.execute(&Command::add(key, "v"));
    }
    sink.take();

    assert_eq!(
        run(&sink, &executor, Command::delete("testKey")),
        vec!["DeleteItem: Deleted item successfully. Key: testKey"]
    );
    assert_eq!(
        run(&sink, &executor, Command::get_all()),
        vec![
            "GetAllItems: Position: 0, Key: a, Value: v",
            "GetAllItems: Position: 1, Key: c, Value: v",
        ]
    );
}

#[test]
fn test_delete_item_head_then_add() {
    let (sink, executor) = setup();

    executor.execute(&Command::add("testKey", "testValue"));
    executor.execute(&Command::add("b", "v"));
    executor.execute(&Command::delete("testKey"));
    sink.take();

    assert_eq!(
        run(&sink, &executor, Command::get_all()),
        vec!["GetAllItems: Position: 0, Key: b, Value: v"]
    );

    executor.execute(&Command::add("c", "v"));
    sink.take();
    assert_eq!(
        run(&sink, &executor, Command::get_all()),
        vec![
            "GetAllItems: Position: 0, Key: b, Value: v",
            "GetAllItems: Position: 1, Key: c, Value: v",
        ]
    );
}

#[test]
fn test_delete_item_tail_then_add() {
    let (sink, executor) = setup();

    executor.execute(&Command::add("a", "v"));
    executor.execute(&Command::add("testKey", "testValue"));
    executor.execute(&Command::delete("testKey"));
    sink.take();

    assert_eq!(
        run(&sink, &executor, Command::get_all()),
        vec!["GetAllItems: Position: 0, Key: a, Value: v"]
    );

    executor.execute(&Command::add("c", "v"));
    sink.take();
    assert_eq!(
        run(&sink, &executor, Command::get_all()),
        vec![
            "GetAllItems: Position: 0, Key: a, Value: v",
            "GetAllItems: Position: 1, Key: c, Value: v",
        ]
    );
}

#[test]
fn test_delete_item_not_found() {
    let (sink, executor) = setup();

    assert_eq!(
        run(&sink, &executor, Command::delete("ghost")),
        vec!["DeleteItem: Key ghost not found"]
    );
    assert_eq!(executor.execute(&Command::delete("ghost")), Outcome::NotFound);
}

// =============================================================================
// GetItem Tests
// =============================================================================

#[test]
fn test_get_item_missing_and_wrong_key() {
    let (sink, executor) = setup();

    assert_eq!(
        run(&sink, &executor, Command::get("testKey")),
        vec!["GetItem: Key testKey not found"]
    );

    executor.execute(&Command::add("testKey", "testValue"));
    sink.take();

    assert_eq!(
        run(&sink, &executor, Command::get("wrongKey")),
        vec!["GetItem: Key wrongKey not found"]
    );
    assert_eq!(executor.execute(&Command::get("testKey")), Outcome::Found);
}

// =============================================================================
// GetAllItems Tests
// =============================================================================

#[test]
fn test_get_all_items() {
    let (sink, executor) = setup();

    assert_eq!(
        run(&sink, &executor, Command::get_all()),
        vec!["GetAllItems: Empty map"]
    );

    executor.execute(&Command::add("key1", "value1"));
    executor.execute(&Command::add("key2", "value2"));
    sink.take();

    assert_eq!(
        run(&sink, &executor, Command::get_all()),
        vec![
            "GetAllItems: Position: 0, Key: key1, Value: value1",
            "GetAllItems: Position: 1, Key: key2, Value: value2",
        ]
    );
    assert_eq!(executor.execute(&Command::get_all()), Outcome::Listed(2));
}

#[test]
fn test_get_all_items_is_repeatable() {
    let (sink, executor) = setup();

    executor.execute(&Command::add("a", "1"));
    executor.execute(&Command::add("b", "2"));
    sink.take();

    let first = run(&sink, &executor, Command::get_all());
    let second = run(&sink, &executor, Command::get_all());
    assert_eq!(first, second);
}

// =============================================================================
// Unsupported Action Tests
// =============================================================================

#[test]
fn test_not_supported_action() {
    let (sink, executor) = setup();

    let command = Command {
        action: Action::Unknown(13),
        key: "k".to_string(),
        value: "v".to_string(),
    };

    assert_eq!(
        run(&sink, &executor, command.clone()),
        vec!["Action: unknownAction: 13, is not supported"]
    );
    assert_eq!(executor.execute(&command), Outcome::Unsupported(13));
    assert!(executor.store().is_empty());
}

// =============================================================================
// Scenario Tests
// =============================================================================

#[test]
fn test_full_lifecycle_of_one_key() {
    let (sink, executor) = setup();

    for command in [
        Command::add("k1", "v1"),
        Command::add("k1", "v2"),
        Command::get("k1"),
        Command::delete("k1"),
        Command::get("k1"),
        Command::get_all(),
    ] {
        executor.execute(&command);
    }

    assert_eq!(
        sink.lines(),
        vec![
            "AddItem: Added item successfully. Key: k1, Value: v1",
            "AddItem: Replaced item successfully. Key: k1, Value: v2",
            "GetItem: Key: k1, Value: v2",
            "DeleteItem: Deleted item successfully. Key: k1",
            "GetItem: Key k1 not found",
            "GetAllItems: Empty map",
        ]
    );
}

#[test]
fn test_concurrent_executors_emit_one_line_per_command() {
    let (sink, executor) = setup();
    let mut handles = Vec::new();

    for worker in 0..4 {
        let executor = executor.clone();
        handles.push(std::thread::spawn(move || {
            for i in 0..100 {
                executor.execute(&Command::add(format!("w{}-{}", worker, i), "v"));
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let lines = sink.take();
    assert_eq!(lines.len(), 400);
    assert!(lines.iter().all(|line| line.starts_with("AddItem: Added item successfully.")));
    assert_eq!(run(&sink, &executor, Command::get_all()).len(), 400);
    executor.store().verify_links().unwrap();
}
