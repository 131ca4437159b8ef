use crate::reduce::Operator;
use super::*;

/// Represents an operation performed on the calculator stack, together with
/// the result it observed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CalcOp {
  Push(i32),
  /// `None` when the pop found the stack empty.
  Pop(Option<i32>),
  IsEmpty(bool),
  /// The folded value left on the stack, or `None` when the reduction
  /// found the stack empty.
  Reduce(Operator, Option<i32>),
}

impl Op for CalcOp {}

/// An implementation of `Linearization` for the calculator stack.
#[derive(Clone)]
pub struct CalcLinearization {
  current: Vec<i32>,
  popped: Vec<i32>,
  reduced: Vec<Vec<i32>>,
  path: Vec<Action<CalcOp>>,
}

impl Linearization for CalcLinearization {
  type P = CalcOp;

  fn new() -> Self {
    Self {
      current: Vec::new(),
      popped: Vec::new(),
      reduced: Vec::new(),
      path: Vec::new(),
    }
  }

  fn push(&mut self, a: Action<Self::P>) {
    match a.get_op() {
      CalcOp::Push(v) => {
        self.current.push(v);
      }
      CalcOp::Pop(Some(_)) => {
        if let Some(v) = self.current.pop() {
          self.popped.push(v);
        }
      }
      CalcOp::Reduce(_, Some(r)) => {
        self.reduced.push(std::mem::take(&mut self.current));
        self.current.push(r);
      }
      CalcOp::Pop(None) | CalcOp::IsEmpty(_) | CalcOp::Reduce(_, None) => {}
    }

    self.path.push(a);
  }

  fn pop(&mut self) {
    if let Some(a) = self.path.pop() {
      match a.get_op() {
        CalcOp::Push(_) => {
          self.current.pop();
        }
        CalcOp::Pop(Some(_)) => {
          if let Some(v) = self.popped.pop() {
            self.current.push(v);
          }
        }
        CalcOp::Reduce(_, Some(_)) => {
          if let Some(prev) = self.reduced.pop() {
            self.current = prev;
          }
        }
        CalcOp::Pop(None) | CalcOp::IsEmpty(_) | CalcOp::Reduce(_, None) => {}
      }
    }
  }

  fn peek(&self) -> Option<&Action<Self::P>> {
    self.path.last()
  }

  fn contains(&self, a: &Action<Self::P>) -> bool {
    self.path.contains(a)
  }

  fn count(&self) -> usize {
    self.path.len()
  }

  fn is_consistent_with(&self, a: &Action<Self::P>) -> bool {
    match a.get_op() {
      CalcOp::Push(_) => true,
      CalcOp::Pop(None) | CalcOp::Reduce(_, None) => self.current.is_empty(),
      CalcOp::Pop(Some(v)) => self.current.last() == Some(&v),
      CalcOp::IsEmpty(e) => self.current.is_empty() == e,
      CalcOp::Reduce(op, Some(r)) => {
        !self.current.is_empty() && op.fold(&self.current) == Ok(r)
      }
    }
  }

  fn get_history(&self) -> Vec<Action<Self::P>> {
    self.path.clone()
  }
}
