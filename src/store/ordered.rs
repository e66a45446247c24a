//! OrderedStore implementation
//!
//! HashMap index + slot-arena doubly-linked list behind one RwLock.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::{HandlerError, Result};
use super::StoreItem;

/// A key/value record linked to its neighbours in insertion order
#[derive(Debug)]
struct Entry {
    key: String,
    value: String,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Index, arena and anchors. Only ever touched under the store lock.
#[derive(Debug, Default)]
struct Links {
    /// key -> arena slot of the entry holding it
    index: HashMap<String, usize>,

    /// Entry arena; `None` marks a slot waiting in `free`
    slots: Vec<Option<Entry>>,

    /// Vacated slots available for reuse
    free: Vec<usize>,

    head: Option<usize>,
    tail: Option<usize>,
}

impl Links {
    fn entry(&self, slot: usize) -> Option<&Entry> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    fn entry_mut(&mut self, slot: usize) -> Option<&mut Entry> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    fn upsert(&mut self, key: String, value: String) -> bool {
        if let Some(slot) = self.index.get(&key).copied() {
            // Replacing keeps the original position
            if let Some(entry) = self.entry_mut(slot) {
                entry.value = value;
            }
            return true;
        }

        let entry = Entry {
            key: key.clone(),
            value,
            prev: self.tail,
            next: None,
        };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(entry);
                slot
            }
            None => {
                self.slots.push(Some(entry));
                self.slots.len() - 1
            }
        };

        match self.tail {
            Some(tail) => {
                if let Some(old_tail) = self.entry_mut(tail) {
                    old_tail.next = Some(slot);
                }
            }
            None => self.head = Some(slot),
        }
        self.tail = Some(slot);
        self.index.insert(key, slot);

        false
    }

    fn delete(&mut self, key: &str) -> bool {
        let Some(slot) = self.index.remove(key) else {
            return false;
        };
        let Some(entry) = self.slots.get_mut(slot).and_then(Option::take) else {
            return true;
        };
        self.free.push(slot);

        match entry.prev {
            Some(prev) => {
                if let Some(prev_entry) = self.entry_mut(prev) {
                    prev_entry.next = entry.next;
                }
            }
            None => self.head = entry.next,
        }
        match entry.next {
            Some(next) => {
                if let Some(next_entry) = self.entry_mut(next) {
                    next_entry.prev = entry.prev;
                }
            }
            None => self.tail = entry.prev,
        }

        if self.index.is_empty() {
            self.slots.clear();
            self.free.clear();
        }

        true
    }

    fn snapshot(&self) -> Vec<StoreItem> {
        let mut items = Vec::with_capacity(self.index.len());
        let mut cursor = self.head;

        while let Some(slot) = cursor {
            let Some(entry) = self.entry(slot) else {
                break;
            };
            items.push(StoreItem {
                position: items.len(),
                key: entry.key.clone(),
                value: entry.value.clone(),
            });
            cursor = entry.next;
        }

        items
    }

    fn verify(&self) -> Result<()> {
        let expected = self.index.len();

        if self.head.is_none() != self.tail.is_none() {
            return Err(corruption(format!(
                "head is {:?} but tail is {:?}",
                self.head, self.tail
            )));
        }
        if self.head.is_none() && expected != 0 {
            return Err(corruption(format!(
                "list is empty but index holds {} keys",
                expected
            )));
        }

        // Forward walk: every node indexed under its own key, prev links mirror next links
        let mut visited = 0;
        let mut previous: Option<usize> = None;
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            if visited == expected {
                return Err(corruption(format!(
                    "forward walk exceeds {} indexed keys (cycle or stray entry)",
                    expected
                )));
            }
            let entry = self
                .entry(slot)
                .ok_or_else(|| corruption(format!("slot {} is linked but vacant", slot)))?;
            if entry.prev != previous {
                return Err(corruption(format!(
                    "key {:?} has prev {:?}, expected {:?}",
                    entry.key, entry.prev, previous
                )));
            }
            match self.index.get(&entry.key) {
                Some(&indexed) if indexed == slot => {}
                other => {
                    return Err(corruption(format!(
                        "key {:?} linked at slot {} but indexed at {:?}",
                        entry.key, slot, other
                    )))
                }
            }
            visited += 1;
            previous = Some(slot);
            cursor = entry.next;
        }

        if visited != expected {
            return Err(corruption(format!(
                "forward walk visited {} entries, index holds {}",
                visited, expected
            )));
        }
        if previous != self.tail {
            return Err(corruption(format!(
                "forward walk ended at {:?}, tail is {:?}",
                previous, self.tail
            )));
        }

        // Backward walk must mirror the forward one
        let mut visited = 0;
        let mut last = None;
        let mut cursor = self.tail;
        while let Some(slot) = cursor {
            if visited == expected {
                return Err(corruption("backward walk contains a cycle".to_string()));
            }
            let entry = self
                .entry(slot)
                .ok_or_else(|| corruption(format!("slot {} is linked but vacant", slot)))?;
            visited += 1;
            last = Some(slot);
            cursor = entry.prev;
        }
        if visited != expected || last != self.head {
            return Err(corruption(format!(
                "backward walk visited {} entries ending at {:?}, head is {:?}",
                visited, last, self.head
            )));
        }

        let occupied = self.slots.iter().filter(|slot| slot.is_some()).count();
        if occupied != expected || occupied + self.free.len() != self.slots.len() {
            return Err(corruption(format!(
                "arena holds {} entries and {} free slots out of {}, index holds {}",
                occupied,
                self.free.len(),
                self.slots.len(),
                expected
            )));
        }

        Ok(())
    }
}

fn corruption(detail: String) -> HandlerError {
    HandlerError::Corruption(detail)
}

/// Insertion-ordered key-value store
///
/// ## Concurrency Model
///
/// - **Writes** (`upsert`/`delete`): exclusive write lock, both the index and
///   the links change together
/// - **Reads** (`get`/`get_all`): shared read lock, concurrent with each other
///   but never with a write
///
/// A `get_all` therefore sees every mutation either fully applied or not at all.
#[derive(Debug, Default)]
pub struct OrderedStore {
    links: RwLock<Links>,
}

impl OrderedStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `key` at the tail, or replace its value in place.
    ///
    /// Returns `true` when an existing value was replaced. A replaced key
    /// keeps its original position.
    pub fn upsert(&self, key: impl Into<String>, value: impl Into<String>) -> bool {
        self.links.write().upsert(key.into(), value.into())
    }

    /// Unlink and drop `key`. Returns `false` if it was not present.
    pub fn delete(&self, key: &str) -> bool {
        self.links.write().delete(key)
    }

    /// Current value for `key`
    pub fn get(&self, key: &str) -> Option<String> {
        let links = self.links.read();
        let slot = *links.index.get(key)?;
        links.entry(slot).map(|entry| entry.value.clone())
    }

    /// Snapshot of every entry in first-insertion order
    pub fn get_all(&self) -> Vec<StoreItem> {
        self.links.read().snapshot()
    }

    /// Number of keys currently stored
    pub fn len(&self) -> usize {
        self.links.read().index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Walk the list in both directions and check it against the index.
    ///
    /// Returns `HandlerError::Corruption` describing the first broken link.
    pub fn verify_links(&self) -> Result<()> {
        self.links.read().verify()
    }
}
