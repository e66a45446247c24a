//! Executor Module
//!
//! Turns commands into store calls and result lines.
//!
//! ## Result Lines
//! ```text
//! AddItem: Added item successfully. Key: {key}, Value: {value}
//! AddItem: Replaced item successfully. Key: {key}, Value: {value}
//! DeleteItem: Deleted item successfully. Key: {key}
//! DeleteItem: Key {key} not found
//! GetItem: Key: {key}, Value: {value}
//! GetItem: Key {key} not found
//! GetAllItems: Position: {n}, Key: {key}, Value: {value}   (one per entry)
//! GetAllItems: Empty map
//! Action: unknownAction: {code}, is not supported
//! ```

use std::sync::Arc;

use crate::protocol::{Action, Command};
use crate::sink::Sink;
use crate::store::OrderedStore;

/// What a command did to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// New key linked at the tail
    Added,

    /// Existing key got a new value
    Replaced,

    Deleted,

    /// GetItem hit
    Found,

    /// DeleteItem or GetItem on a missing key
    NotFound,

    /// GetAllItems listed this many entries
    Listed(usize),

    /// Unrecognized action code; store untouched
    Unsupported(i64),
}

/// Stateless command dispatcher
///
/// All state lives in the shared store; the executor can be cloned into every
/// worker. Each call hands its line(s) to the sink and returns without waiting
/// for them to be written.
#[derive(Clone)]
pub struct CommandExecutor {
    store: Arc<OrderedStore>,
    sink: Arc<dyn Sink>,
}

impl CommandExecutor {
    pub fn new(store: Arc<OrderedStore>, sink: Arc<dyn Sink>) -> Self {
        Self { store, sink }
    }

    /// Execute a command
    ///
    /// Routes to the matching store operation and reports the result
    pub fn execute(&self, command: &Command) -> Outcome {
        let key = &command.key;

        match command.action {
            Action::AddItem => {
                let value = &command.value;
                if self.store.upsert(key.as_str(), value.as_str()) {
                    self.emit(format!(
                        "AddItem: Replaced item successfully. Key: {}, Value: {}",
                        key, value
                    ));
                    Outcome::Replaced
                } else {
                    self.emit(format!(
                        "AddItem: Added item successfully. Key: {}, Value: {}",
                        key, value
                    ));
                    Outcome::Added
                }
            }
            Action::DeleteItem => {
                if self.store.delete(key) {
                    self.emit(format!("DeleteItem: Deleted item successfully. Key: {}", key));
                    Outcome::Deleted
                } else {
                    self.emit(format!("DeleteItem: Key {} not found", key));
                    Outcome::NotFound
                }
            }
            Action::GetItem => match self.store.get(key) {
                Some(value) => {
                    self.emit(format!("GetItem: Key: {}, Value: {}", key, value));
                    Outcome::Found
                }
                None => {
                    self.emit(format!("GetItem: Key {} not found", key));
                    Outcome::NotFound
                }
            },
            Action::GetAllItems => {
                let items = self.store.get_all();
                if items.is_empty() {
                    self.emit("GetAllItems: Empty map".to_string());
                }
                for item in &items {
                    self.emit(format!(
                        "GetAllItems: Position: {}, Key: {}, Value: {}",
                        item.position, item.key, item.value
                    ));
                }
                Outcome::Listed(items.len())
            }
            Action::Unknown(code) => {
                self.emit(format!("Action: {}, is not supported", command.action));
                Outcome::Unsupported(code)
            }
        }
    }

    /// The store this executor operates on
    pub fn store(&self) -> &Arc<OrderedStore> {
        &self.store
    }

    fn emit(&self, line: String) {
        self.sink.write(line);
    }
}
