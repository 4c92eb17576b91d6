//! State carried between runs.

use anyhow::Result;
use serde_json::{Map, Value};

pub const STATE_FILE_NAME: &str = "state.json";

pub trait StatePersister {
    /// Replaces the stored state with `state`.
    fn write_state(&self, state: &Map<String, Value>) -> Result<()>;
}

/// State written after every successful run. Prior state is never read.
pub fn next_state() -> Map<String, Value> {
    let mut state = Map::new();
    state.insert(
        "some_state_parameter".to_string(),
        Value::String("value".to_string()),
    );
    state
}
