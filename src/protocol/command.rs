//! Command definitions
//!
//! Represents one request against the ordered store.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Action requested by a command
///
/// Serialized as its integer code. Codes outside the four known actions are
/// kept as `Unknown` so they can be reported back instead of rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Action {
    AddItem,
    DeleteItem,
    GetItem,
    GetAllItems,
    Unknown(i64),
}

impl Action {
    /// Integer code used on the wire
    pub fn code(&self) -> i64 {
        match self {
            Action::AddItem => 0,
            Action::DeleteItem => 1,
            Action::GetItem => 2,
            Action::GetAllItems => 3,
            Action::Unknown(code) => *code,
        }
    }
}

impl From<i64> for Action {
    fn from(code: i64) -> Self {
        match code {
            0 => Action::AddItem,
            1 => Action::DeleteItem,
            2 => Action::GetItem,
            3 => Action::GetAllItems,
            other => Action::Unknown(other),
        }
    }
}

impl From<Action> for i64 {
    fn from(action: Action) -> Self {
        action.code()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::AddItem => f.write_str("addItem"),
            Action::DeleteItem => f.write_str("deleteItem"),
            Action::GetItem => f.write_str("getItem"),
            Action::GetAllItems => f.write_str("getAllItems"),
            Action::Unknown(code) => write!(f, "unknownAction: {}", code),
        }
    }
}

/// A decoded command
///
/// `key` and `value` are ignored by actions that do not need them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Command {
    pub action: Action,

    #[serde(default)]
    pub key: String,

    #[serde(default)]
    pub value: String,
}

impl Command {
    /// Add or replace `key`
    pub fn add(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            action: Action::AddItem,
            key: key.into(),
            value: value.into(),
        }
    }

    /// Delete `key`
    pub fn delete(key: impl Into<String>) -> Self {
        Self {
            action: Action::DeleteItem,
            key: key.into(),
            value: String::new(),
        }
    }

    /// Look up `key`
    pub fn get(key: impl Into<String>) -> Self {
        Self {
            action: Action::GetItem,
            key: key.into(),
            value: String::new(),
        }
    }

    /// List every entry in insertion order
    pub fn get_all() -> Self {
        Self {
            action: Action::GetAllItems,
            key: String::new(),
            value: String::new(),
        }
    }
}
