//! Scenario files
//!
//! Input for the producer: a JSON array of commands with repeat counts.
//!
//! ```text
//! [
//!   {"Command": {"Action": 0, "Key": "k1", "Value": "v1"}, "Times": 2},
//!   {"Command": {"Action": 3}, "Times": 1}
//! ]
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HandlerError, Result};
use crate::protocol::Command;

/// A command to publish `times` times
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RepeatableCommand {
    pub command: Command,

    #[serde(default = "default_times")]
    pub times: usize,
}

fn default_times() -> usize {
    1
}

/// Parse a scenario from JSON text
pub fn parse_scenario(json: &str) -> Result<Vec<RepeatableCommand>> {
    serde_json::from_str(json)
        .map_err(|e| HandlerError::Scenario(format!("invalid scenario: {}", e)))
}

/// Read and parse a scenario file
pub fn load_scenario(path: impl AsRef<Path>) -> Result<Vec<RepeatableCommand>> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)
        .map_err(|e| HandlerError::Scenario(format!("cannot read {}: {}", path.display(), e)))?;
    parse_scenario(&json)
}

/// Flatten a scenario into the commands to publish, in file order
pub fn expand(scenario: &[RepeatableCommand]) -> Vec<Command> {
    scenario
        .iter()
        .flat_map(|entry| std::iter::repeat(entry.command.clone()).take(entry.times))
        .collect()
}
