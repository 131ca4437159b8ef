//! Linearization of concurrent histories
//!
//! This module provides facilities to construct linearizations of a
//! concurrent log, used for testing the correctness of the shared stack
//! service.
//!
//! The primary trait in the module is the `Linearization` trait. A
//! `Linearization` takes a concurrent log, represented as a sequence
//! of `Action` objects, and performs a depth-first search to find
//! a valid linearization. The depth-first search algorithm is based
//! on a [thesis](https://www.cl.cam.ac.uk/techreports/UCAM-CL-TR-579.pdf)
//! by Karl Fraser.
//!
//! `CalcLinearization` models the calculator stack: pushes, pops,
//! emptiness checks and whole-stack reductions.

mod action;
mod calc;

pub use self::action::{Action, ActionID};
pub use self::calc::{CalcOp, CalcLinearization};

use std::fmt::Debug;

/// Represents an operation performed by an abstract data type.
pub trait Op : Copy + Clone + Debug + Send {}

/// A linearization for a sequence of `Action` objects.
pub trait Linearization
where Self::P: Op {
  type P;

  /// Creates a new, empty linearization.
  fn new() -> Self;

  /// Pushes the given action onto the search path.
  fn push(&mut self, a: Action<Self::P>);

  /// Pops the latest action from the search path.
  fn pop(&mut self);

  /// Returns the latest action on the search path, if any.
  fn peek(&self) -> Option<&Action<Self::P>>;

  /// Tests if the search path contains the given action.
  fn contains(&self, a: &Action<Self::P>) -> bool;

  /// Returns the number of actions in the search path.
  fn count(&self) -> usize;

  /// Determines if the current linearization is consistent with the given
  /// action (i.e. if the action can be pushed onto the search path).
  fn is_consistent_with(&self, a: &Action<Self::P>) -> bool;

  /// Returns the linearized history produced by this linearization.
  fn get_history(&self) -> Vec<Action<Self::P>>;

  /// Linearizes the given concurrent log, if possible.
  fn linearize(&mut self, mut log: Vec<Action<Self::P>>) -> Option<Vec<Action<Self::P>>> {
    log.sort_by(|a1, a2| {
      a1.get_start().cmp(&a2.get_start())
    });

    self.dfs(&log)
  }

  /// Performs a depth-first search for a valid linearization on the given
  /// log.
  fn dfs(&mut self, log: &[Action<Self::P>]) -> Option<Vec<Action<Self::P>>> {
    let mut alists = Vec::new();
    let mut actions = self.gen(log);
    let mut i = 0;

    loop {
      if self.pred(log) {
        return Some(self.get_history());
      } else if i < actions.len() {
        let a = actions[i];

        if !self.contains(&a) {
          self.push(a);
          alists.push((actions, i + 1));
          actions = self.gen(log);
          i = 0;
        } else {
          i += 1;
        }
      } else {
        match alists.pop() {
          None => break,
          Some((prev, next)) => {
            self.pop();
            actions = prev;
            i = next;
          }
        }
      }
    }

    None
  }

  /// Returns true if the search has been completed successfully.
  fn pred(&self, log: &[Action<Self::P>]) -> bool {
    self.count() == log.len()
  }

  /// Generates a list of all actions consistent with the current
  /// search path.
  ///
  /// Only actions that start before the earliest-finishing pending action
  /// stops are candidates: anything later must come after it.
  fn gen(&self, log: &[Action<Self::P>]) -> Vec<Action<Self::P>> {
    let mut actions = Vec::new();

    let i_first = log.iter().position(|a| {
      match self.peek() {
        None => true,
        Some(last) => a.get_stop() >= last.get_start() && !self.contains(a),
      }
    });

    if let Some(i) = i_first {
      let mut first_stop_time = log[i].get_stop();

      for a in &log[i..] {
        if a.get_start() > first_stop_time {
          break;
        }
        if !self.contains(a) {
          if a.get_stop() < first_stop_time {
            first_stop_time = a.get_stop();
          }
          if self.is_consistent_with(a) {
            actions.push(*a);
          }
        }
      }
    }

    actions
  }
}


#[cfg(test)]
mod linearization_tests {
  use std::thread;
  use std::time::{Instant, Duration};
  use crate::reduce::Operator;
  use super::*;

  fn ticks(n: usize) -> Vec<Instant> {
    let d = Duration::from_millis(5);
    (0..n).map(|_| {
      let t = Instant::now();
      thread::sleep(d);
      t
    }).collect()
  }

  #[test]
  fn empty_linearization_test() {
    let log = Vec::new();

    let mut lin = CalcLinearization::new();
    let history = lin.linearize(log).expect(
      "No valid linearization found.");

    assert_eq!(history.len(), 0);
  }

  #[test]
  fn no_overlap_linearization_test() {
    let n = 10;
    let t = ticks(2 * n);
    let mut actions = Vec::new();

    for i in 0..n {
      actions.push(Action::new(
        (0, i),
        CalcOp::Push(1),
        t[2 * i],
        t[2 * i + 1]));
    }

    let log1 = actions.clone();
    let log2: Vec<_> = actions.iter().rev().cloned().collect();

    let mut lin1 = CalcLinearization::new();
    let history1 = lin1.linearize(log1).expect(
      "No valid linearization found.");

    assert_eq!(history1.len(), n);
    for i in 0..n {
      assert_eq!(history1[i].get_id(), (0, i));
    }

    let mut lin2 = CalcLinearization::new();
    let history2 = lin2.linearize(log2).expect(
      "No valid linearization found.");

    assert_eq!(history2.len(), n);
    for i in 0..n {
      assert_eq!(history2[i].get_id(), (0, i));
    }
  }

  #[test]
  fn overlap_linearization_test() {
    let t = ticks(4);
    let log = vec![
      Action::new((0, 0), CalcOp::Pop(Some(1)), t[0], t[2]),
      Action::new((1, 0), CalcOp::Push(1), t[1], t[3]),
    ];

    let mut lin = CalcLinearization::new();
    let history = lin.linearize(log).expect(
      "No valid linearization found.");

    assert_eq!(history[0].get_id(), (1, 0));
    assert_eq!(history[1].get_id(), (0, 0));
  }

  #[test]
  fn identical_time_linearization_test() {
    let n = 10;
    let t = ticks(2);
    let mut actions = Vec::new();

    for i in 0..n {
      let op = if i % 2 == 0 {
        CalcOp::Push(i as i32)
      } else {
        CalcOp::Pop(Some(i as i32 - 1))
      };

      actions.push(Action::new((i, 0), op, t[0], t[1]));
    }

    let log: Vec<_> = actions.iter().rev().cloned().collect();

    let mut lin = CalcLinearization::new();
    let history = lin.linearize(log).expect(
      "No valid linearization found.");

    assert_eq!(history.len(), n);
    for i in (0..n).step_by(2) {
      let i_push = history.iter().position(|a| {
        a.get_id() == (i, 0)
      }).unwrap();
      let i_pop = history.iter().position(|a| {
        a.get_id() == (i+1, 0)
      }).unwrap();
      assert!(i_push < i_pop);
    }
  }

  #[test]
  fn invalid_no_overlap_linearization_test() {
    let t = ticks(4);
    let log = vec![
      Action::new((0, 0), CalcOp::Pop(Some(1)), t[0], t[1]),
      Action::new((1, 0), CalcOp::Push(1), t[2], t[3]),
    ];

    let mut lin = CalcLinearization::new();
    assert_eq!(lin.linearize(log), None);
  }

  #[test]
  fn invalid_overlap_linearization_test() {
    let t = ticks(4);
    let log = vec![
      Action::new((0, 0), CalcOp::Pop(Some(1)), t[0], t[2]),
      Action::new((1, 0), CalcOp::Push(2), t[1], t[3]),
    ];

    let mut lin = CalcLinearization::new();
    assert_eq!(lin.linearize(log), None);
  }

  #[test]
  fn reduce_linearization_test() {
    let t = ticks(10);
    let log = vec![
      Action::new((0, 0), CalcOp::Push(8), t[0], t[1]),
      Action::new((0, 1), CalcOp::Push(12), t[2], t[3]),
      Action::new((0, 2), CalcOp::Push(20), t[4], t[5]),
      Action::new((0, 3), CalcOp::Reduce(Operator::Gcd, Some(4)), t[6], t[7]),
      Action::new((0, 4), CalcOp::Pop(Some(4)), t[8], t[9]),
    ];

    let mut lin = CalcLinearization::new();
    let history = lin.linearize(log).expect(
      "No valid linearization found.");
    assert_eq!(history.len(), 5);
  }

  #[test]
  fn overlapping_reduce_orders_push_test() {
    // the push overlaps the reduce; only "push first" explains max == 9
    let t = ticks(6);
    let log = vec![
      Action::new((0, 0), CalcOp::Push(3), t[0], t[1]),
      Action::new((0, 1), CalcOp::Reduce(Operator::Max, Some(9)), t[2], t[4]),
      Action::new((1, 0), CalcOp::Push(9), t[2], t[3]),
      Action::new((0, 2), CalcOp::IsEmpty(false), t[5], t[5]),
    ];

    let mut lin = CalcLinearization::new();
    let history = lin.linearize(log).expect(
      "No valid linearization found.");

    let i_push = history.iter().position(|a| a.get_id() == (1, 0)).unwrap();
    let i_reduce = history.iter().position(|a| a.get_id() == (0, 1)).unwrap();
    assert!(i_push < i_reduce);
  }

  #[test]
  fn lost_push_is_rejected_test() {
    // a push that completed before the reduce began must be folded in
    let t = ticks(8);
    let log = vec![
      Action::new((0, 0), CalcOp::Push(3), t[0], t[1]),
      Action::new((1, 0), CalcOp::Push(9), t[2], t[3]),
      Action::new((0, 1), CalcOp::Reduce(Operator::Max, Some(3)), t[4], t[5]),
      Action::new((0, 2), CalcOp::Pop(Some(3)), t[6], t[7]),
    ];

    let mut lin = CalcLinearization::new();
    assert_eq!(lin.linearize(log), None);
  }

  #[test]
  fn empty_reduce_linearization_test() {
    let t = ticks(4);
    let log = vec![
      Action::new((0, 0), CalcOp::Reduce(Operator::Min, None), t[0], t[1]),
      Action::new((0, 1), CalcOp::IsEmpty(true), t[2], t[3]),
    ];

    let mut lin = CalcLinearization::new();
    assert!(lin.linearize(log).is_some());
  }
}
