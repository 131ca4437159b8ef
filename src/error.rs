//! Error kinds
//!
//! `StackError` enumerates the logical failures the stack service itself
//! raises. `RemoteError` is what a caller on the far side of the wire sees:
//! a logical failure keeps its `StackError` kind, while connectivity and
//! framing problems are reported separately so the two are never confused.

use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::reduce::Operator;

/// The service operation that found the stack empty.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
  Pop,
  Reduce,
  DelayedPop,
}

impl fmt::Display for Operation {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let name = match *self {
      Operation::Pop => "pop",
      Operation::Reduce => "reduce",
      Operation::DelayedPop => "delayed pop",
    };
    f.write_str(name)
  }
}

/// A logical failure raised by the stack service.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StackError {
  /// The stack held no elements when `op` took the lock.
  #[error("cannot {op}: stack is empty")]
  EmptyStack { op: Operation },

  /// `reduce` was given a name outside `min|max|gcd|lcm`.
  #[error("invalid operator `{operator}` (allowed: min|max|gcd|lcm)")]
  InvalidOperator { operator: String },

  /// A delayed pop was cancelled before its wait finished.
  #[error("delayed pop interrupted while waiting")]
  Interrupted,

  /// The folded result does not fit in an `i32`. The stack is left as it
  /// was before the reduction.
  #[error("{operator} result does not fit in a 32-bit integer")]
  Overflow { operator: Operator },
}

impl StackError {
  pub fn is_empty_stack(&self) -> bool {
    matches!(self, StackError::EmptyStack { .. })
  }
}

/// A failure observed by a remote caller.
#[derive(Error, Debug)]
pub enum RemoteError {
  /// The service rejected the call.
  #[error(transparent)]
  Service(#[from] StackError),

  /// The requested service name is not bound on the server.
  #[error("registry: {0}")]
  Registry(String),

  /// The connection failed or was closed.
  #[error("transport failure: {0}")]
  Transport(#[from] io::Error),

  /// The peer sent something that is not a valid message.
  #[error("protocol violation: {0}")]
  Protocol(String),
}

impl RemoteError {
  /// True for failures of the connection rather than of the call itself.
  pub fn is_transport(&self) -> bool {
    matches!(self, RemoteError::Transport(_) | RemoteError::Protocol(_))
  }

  /// The logical service failure, if that is what this is.
  pub fn as_service(&self) -> Option<&StackError> {
    match self {
      RemoteError::Service(e) => Some(e),
      _ => None,
    }
  }
}

impl From<serde_json::Error> for RemoteError {
  fn from(e: serde_json::Error) -> Self {
    RemoteError::Protocol(e.to_string())
  }
}
