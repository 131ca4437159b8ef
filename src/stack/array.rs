use super::*;

/// A simple array-based `Stack<T>`. Uses Rust's `Vec<T>`, top at the end.
#[derive(Debug, Clone, Default)]
pub struct ArrayStack<T> {
  elems: Vec<T>,
}

impl<T> ArrayStack<T> {
  /// The elements from bottom to top.
  pub fn as_slice(&self) -> &[T] {
    &self.elems
  }
}

impl<T> Stack<T> for ArrayStack<T> {
  fn new() -> Self {
    Self {
      elems: Vec::new(),
    }
  }

  fn push(&mut self, elem: T) {
    self.elems.push(elem)
  }

  fn pop(&mut self) -> Option<T> {
    self.elems.pop()
  }

  fn is_empty(&self) -> bool {
    self.elems.is_empty()
  }

  fn size(&self) -> usize {
    self.elems.len()
  }

  fn drain(&mut self) -> Vec<T> {
    std::mem::take(&mut self.elems)
  }
}
