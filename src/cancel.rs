//! Cancellable waits
//!
//! A `Canceller` and its `CancelToken`s share one channel on which nothing
//! is ever sent. Cancelling drops the sending half, which disconnects the
//! channel and wakes every receiver blocked on it at once. A timed wait is a
//! `select` between the tokens and a `crossbeam` timer channel.

use std::time::Duration;

use crossbeam::channel::{self, Receiver, Select, Sender, TryRecvError};
use parking_lot::Mutex;

use crate::error::StackError;

/// The cancelling half. Dropping it cancels its tokens too.
pub struct Canceller {
  tx: Mutex<Option<Sender<()>>>,
}

/// The observing half. Cheap to clone.
#[derive(Clone, Debug)]
pub struct CancelToken {
  rx: Receiver<()>,
}

/// Creates a linked `Canceller` and `CancelToken`.
pub fn pair() -> (Canceller, CancelToken) {
  let (tx, rx) = channel::bounded(0);
  (Canceller { tx: Mutex::new(Some(tx)) }, CancelToken { rx: rx })
}

impl Canceller {
  /// Cancels every token linked to this canceller. Idempotent.
  pub fn cancel(&self) {
    self.tx.lock().take();
  }

  pub fn is_cancelled(&self) -> bool {
    self.tx.lock().is_none()
  }
}

impl CancelToken {
  /// A token that is never cancelled.
  pub fn never() -> Self {
    CancelToken { rx: channel::never() }
  }

  pub fn is_cancelled(&self) -> bool {
    match self.rx.try_recv() {
      Err(TryRecvError::Disconnected) => true,
      _ => false,
    }
  }
}

/// Blocks the calling thread for `duration` unless one of `tokens` is
/// cancelled first, in which case it fails with `Interrupted` right away.
pub fn wait_for(duration: Duration, tokens: &[&CancelToken]) -> Result<(), StackError> {
  if tokens.iter().any(|t| t.is_cancelled()) {
    return Err(StackError::Interrupted);
  }
  if duration == Duration::from_secs(0) {
    return Ok(());
  }

  let timer = channel::after(duration);
  let mut sel = Select::new();
  let timer_index = sel.recv(&timer);
  for t in tokens {
    sel.recv(&t.rx);
  }

  let oper = sel.select();
  let index = oper.index();
  if index == timer_index {
    let _ = oper.recv(&timer);
    Ok(())
  } else {
    // indices follow registration order, the timer came first
    let _ = oper.recv(&tokens[index - 1].rx);
    Err(StackError::Interrupted)
  }
}
