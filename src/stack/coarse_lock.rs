use std::sync::Arc;

use parking_lot::Mutex;

use super::*;

/// A `ConcurrentStack<T>` that uses a single mutex to wrap an `ArrayStack<T>`.
///
/// Clones share the same underlying stack. Compound operations that must
/// not interleave with anything else go through `with_lock`.
pub struct CoarseLockStack<T> {
  arc: Arc<Mutex<ArrayStack<T>>>,
}

impl<T> CoarseLockStack<T> {
  /// Runs `f` with the stack locked for its whole duration.
  pub fn with_lock<R, F>(&self, f: F) -> R
  where F: FnOnce(&mut ArrayStack<T>) -> R {
    let mut guard = self.arc.lock();
    f(&mut *guard)
  }

  /// Copies the current contents, bottom to top.
  pub fn snapshot(&self) -> Vec<T>
  where T: Clone {
    self.arc.lock().as_slice().to_vec()
  }
}

impl<T> Stack<T> for CoarseLockStack<T> {
  fn new() -> Self {
    Self {
      arc: Arc::new(Mutex::new(ArrayStack::new())),
    }
  }

  fn push(&mut self, elem: T) {
    self.with_lock(|s| s.push(elem))
  }

  fn pop(&mut self) -> Option<T> {
    self.with_lock(|s| s.pop())
  }

  fn is_empty(&self) -> bool {
    self.with_lock(|s| s.is_empty())
  }

  fn size(&self) -> usize {
    self.with_lock(|s| s.size())
  }

  fn drain(&mut self) -> Vec<T> {
    self.with_lock(|s| s.drain())
  }
}

impl<T> Clone for CoarseLockStack<T> {
  fn clone(&self) -> Self {
    Self {
      arc: self.arc.clone()
    }
  }
}

impl<T> ConcurrentStack<T> for CoarseLockStack<T>
where T: Send {}
