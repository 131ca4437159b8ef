//! The shared stack service
//!
//! `StackService` owns one integer stack and serves it to any number of
//! concurrent callers. Handles are cheap clones of the same instance; the
//! stack itself never leaves the service.
//!
//! Locking discipline. A single mutex (inside `CoarseLockStack`) guards the
//! stack.
//!
//! - `push`, `pop`, `is_empty` and `size` lock, take one step and unlock.
//! - `reduce` holds the lock across the drain, the fold and the push of the
//!   result, so no other operation ever observes the drained stack and no
//!   concurrent push can land between the drain and the push-back.
//! - `delayed_pop` waits with the lock released and locks only for its
//!   final pop.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::cancel::{self, CancelToken, Canceller};
use crate::error::{Operation, StackError};
use crate::reduce::Operator;
use crate::stack::{CoarseLockStack, Stack};

/// A handle to one shared stack.
#[derive(Clone)]
pub struct StackService {
  stack: CoarseLockStack<i32>,
  shutdown: Arc<Canceller>,
  shutdown_token: CancelToken,
}

impl StackService {
  /// Creates a service with an empty stack.
  pub fn new() -> Self {
    let (canceller, token) = cancel::pair();
    Self {
      stack: CoarseLockStack::new(),
      shutdown: Arc::new(canceller),
      shutdown_token: token,
    }
  }

  /// Pushes `value` on top of the stack.
  pub fn push(&self, value: i32) {
    let size = self.stack.with_lock(|s| {
      s.push(value);
      s.size()
    });
    debug!(value, size, "push");
  }

  /// Removes and returns the top of the stack.
  pub fn pop(&self) -> Result<i32, StackError> {
    self.pop_as(Operation::Pop)
  }

  fn pop_as(&self, op: Operation) -> Result<i32, StackError> {
    let value = self.stack.with_lock(|s| s.pop())
      .ok_or(StackError::EmptyStack { op: op })?;
    debug!(value, %op, "pop");
    Ok(value)
  }

  pub fn is_empty(&self) -> bool {
    self.stack.with_lock(|s| s.is_empty())
  }

  /// The number of values currently on the stack.
  pub fn size(&self) -> usize {
    self.stack.with_lock(|s| s.size())
  }

  /// Copies the stack contents, bottom to top.
  pub fn snapshot(&self) -> Vec<i32> {
    self.stack.snapshot()
  }

  /// Parses `operator` and reduces the stack with it. See `reduce_with`.
  ///
  /// An unrecognized name fails before the stack is touched.
  pub fn reduce(&self, operator: &str) -> Result<i32, StackError> {
    let op: Operator = operator.parse()?;
    self.reduce_with(op)
  }

  /// Replaces every value on the stack with the single value obtained by
  /// folding `op` over them, and returns that value.
  ///
  /// Fails with `EmptyStack` on an empty stack. If the fold overflows, the
  /// drained values are put back in their original order and the stack is
  /// left exactly as it was.
  pub fn reduce_with(&self, op: Operator) -> Result<i32, StackError> {
    let (result, count) = self.stack.with_lock(|s| {
      if s.is_empty() {
        return Err(StackError::EmptyStack { op: Operation::Reduce });
      }

      let values = s.drain();
      match op.fold(&values) {
        Ok(r) => {
          s.push(r);
          Ok((r, values.len()))
        }
        Err(e) => {
          for v in values {
            s.push(v);
          }
          Err(e)
        }
      }
    })?;

    debug!(%op, count, result, "reduce");
    Ok(result)
  }

  /// Waits roughly `millis` milliseconds (negative counts as zero) without
  /// holding the lock, then pops.
  ///
  /// Fails with `Interrupted`, without popping, if the service is shut down
  /// during the wait, and with `EmptyStack` if the stack is empty once the
  /// wait is over.
  pub fn delayed_pop(&self, millis: i64) -> Result<i32, StackError> {
    self.delayed_pop_with(millis, &CancelToken::never())
  }

  /// Like `delayed_pop`, but the wait is also cut short when `token` is
  /// cancelled.
  pub fn delayed_pop_with(&self, millis: i64, token: &CancelToken) -> Result<i32, StackError> {
    let delay = Duration::from_millis(millis.max(0) as u64);
    debug!(?delay, "delayed pop waiting");

    cancel::wait_for(delay, &[&self.shutdown_token, token])?;
    self.pop_as(Operation::DelayedPop)
  }

  /// Cancels every pending and future delayed pop on this instance. The
  /// other operations keep working.
  pub fn shutdown(&self) {
    if !self.shutdown.is_cancelled() {
      info!(size = self.size(), "stack service shutting down");
    }
    self.shutdown.cancel();
  }

  pub fn is_shut_down(&self) -> bool {
    self.shutdown.is_cancelled()
  }
}

impl Default for StackService {
  fn default() -> Self {
    Self::new()
  }
}
