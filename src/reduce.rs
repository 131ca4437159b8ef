//! Reduction operators
//!
//! A reduction folds every value on the stack into one. All four operators
//! are commutative and associative, so the order the values were drained in
//! does not matter. `gcd` and `lcm` work on absolute values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Operation, StackError};

/// One of the four recognized reductions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
  Min,
  Max,
  Gcd,
  Lcm,
}

impl Operator {
  pub const ALL: [Operator; 4] = [Operator::Min, Operator::Max, Operator::Gcd, Operator::Lcm];

  pub fn name(&self) -> &'static str {
    match *self {
      Operator::Min => "min",
      Operator::Max => "max",
      Operator::Gcd => "gcd",
      Operator::Lcm => "lcm",
    }
  }

  /// Folds the operator over `values`.
  ///
  /// Fails with `EmptyStack` on an empty slice and with `Overflow` when the
  /// result cannot be represented as an `i32` (`gcd` of `i32::MIN` and 0, or
  /// an `lcm` past `i32::MAX`).
  pub fn fold(&self, values: &[i32]) -> Result<i32, StackError> {
    let (&first, rest) = values.split_first()
      .ok_or(StackError::EmptyStack { op: Operation::Reduce })?;

    match *self {
      Operator::Min => Ok(rest.iter().fold(first, |m, &v| m.min(v))),
      Operator::Max => Ok(rest.iter().fold(first, |m, &v| m.max(v))),
      Operator::Gcd => {
        let mut g = first.unsigned_abs();
        for &v in rest {
          // nothing divides below 1
          if g == 1 {
            break;
          }
          g = gcd(g, v.unsigned_abs());
        }
        self.narrow(g as u64)
      }
      Operator::Lcm => {
        let mut l = first.unsigned_abs() as u64;
        for &v in rest {
          if l == 0 {
            break;
          }
          l = lcm(l, v.unsigned_abs() as u64);
          if l > i32::MAX as u64 {
            return Err(StackError::Overflow { operator: *self });
          }
        }
        self.narrow(l)
      }
    }
  }

  fn narrow(&self, v: u64) -> Result<i32, StackError> {
    i32::try_from(v).map_err(|_| StackError::Overflow { operator: *self })
  }
}

impl fmt::Display for Operator {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for Operator {
  type Err = StackError;

  /// Parses an operator name, ignoring case and surrounding whitespace.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let name = s.trim();
    Operator::ALL.iter()
      .find(|op| op.name().eq_ignore_ascii_case(name))
      .copied()
      .ok_or_else(|| StackError::InvalidOperator { operator: s.to_string() })
  }
}

/// Greatest common divisor by Euclid's algorithm. `gcd(0, 0) == 0`.
pub fn gcd(mut a: u32, mut b: u32) -> u32 {
  while b != 0 {
    let t = a % b;
    a = b;
    b = t;
  }
  a
}

/// Least common multiple, dividing before multiplying. Zero if either
/// operand is zero.
///
/// Both operands must fit in a `u32`, so the product cannot overflow a `u64`.
pub fn lcm(a: u64, b: u64) -> u64 {
  if a == 0 || b == 0 {
    return 0;
  }
  let g = gcd(a as u32, b as u32) as u64;
  (a / g) * b
}
