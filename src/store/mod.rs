//! Store Module
//!
//! Insertion-ordered key-value store shared by every worker.
//!
//! ## Responsibilities
//! - O(1) upsert, delete and point lookup by key
//! - O(1) maintenance of first-insertion order
//! - Consistent ordered snapshots for enumeration
//! - Single reader/writer lock guarding index and links together
//!
//! ## Data Structure Choice
//! HashMap index over a slot arena forming a doubly-linked list:
//! ```text
//!   index: key -> slot
//!
//!   head                                   tail
//!    │                                      │
//!    ▼                                      ▼
//!  ┌─────┐  next   ┌─────┐  next   ┌─────┐
//!  │  a  │ ──────▶ │  b  │ ──────▶ │  c  │
//!  │     │ ◀────── │     │ ◀────── │     │
//!  └─────┘  prev   └─────┘  prev   └─────┘
//! ```
//! Links are slot indices, so no entry is reachable from outside the store.
//! Positions are assigned only while walking the list; there is no rank index.

mod ordered;

pub use ordered::OrderedStore;

/// One entry of an ordered snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreItem {
    /// Zero-based position in first-insertion order
    pub position: usize,

    pub key: String,

    pub value: String,
}
