//! Line-delimited JSON messages.
//!
//! Each request and each response is one JSON object on one line. A
//! connection is strictly request/response: the server answers every line
//! before reading the next.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::StackError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
  Push { value: i32 },
  Pop,
  IsEmpty,
  Reduce { operator: String },
  DelayedPop { millis: i64 },
  /// Switches the connection to the service bound under `name`.
  Lookup { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Response {
  Unit,
  Value { value: i32 },
  Bool { value: bool },
  Error { error: StackError },
  Registry { message: String },
  Protocol { message: String },
}

/// Serializes `msg` as one line, newline included.
pub fn encode<T: Serialize>(msg: &T) -> Result<String, serde_json::Error> {
  let mut line = serde_json::to_string(msg)?;
  line.push('\n');
  Ok(line)
}

/// Parses one line, ignoring surrounding whitespace.
pub fn decode<T: DeserializeOwned>(line: &str) -> Result<T, serde_json::Error> {
  serde_json::from_str(line.trim())
}
