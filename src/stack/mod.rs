//! Stack storage
//!
//! `ArrayStack` is the sequential stack the service keeps its values in.
//! `CoarseLockStack` puts one mutex around an `ArrayStack` so that clones can
//! be shared between threads; besides the single-step `Stack` operations it
//! exposes `with_lock` for compound sections (drain, fold, push back) that
//! must run as one critical section.

mod array;
mod coarse_lock;

pub use self::array::ArrayStack;
pub use self::coarse_lock::CoarseLockStack;

/// The `Stack<T>` abstract data type.
pub trait Stack<T> {
  /// Creates a new, empty `Stack<T>`.
  fn new() -> Self;

  /// Pushes an element onto the stack.
  fn push(&mut self, elem: T);

  /// Pops an element from the stack, if there is one.
  fn pop(&mut self) -> Option<T>;

  /// Predicate that tests if the stack is empty.
  fn is_empty(&self) -> bool;

  /// Returns the number of elements in the stack.
  fn size(&self) -> usize;

  /// Removes every element, returning them bottom to top so that pushing
  /// them back in order restores the stack.
  fn drain(&mut self) -> Vec<T>;
}

/// A `Stack` whose clones can be shared between threads.
pub trait ConcurrentStack<T>: Stack<T> + Clone + Send + Sync {}
