//! The calculator interface
//!
//! `Calculator` is the operation set callers program against, whether the
//! stack lives in this process (`StackService`) or behind a socket
//! (`remote::RemoteStack`). The scripted sessions below run against either.

use std::fmt::Display;

use tracing::info;

use crate::error::StackError;
use crate::service::StackService;

/// The five calculator operations.
pub trait Calculator {
  type Error: Display;

  /// Pushes one value.
  fn push_value(&mut self, value: i32) -> Result<(), Self::Error>;

  /// Replaces the whole stack with the named reduction of its values.
  fn push_operation(&mut self, operator: &str) -> Result<(), Self::Error>;

  fn pop(&mut self) -> Result<i32, Self::Error>;

  fn is_empty(&mut self) -> Result<bool, Self::Error>;

  /// Waits `millis` milliseconds, then pops.
  fn delay_pop(&mut self, millis: i64) -> Result<i32, Self::Error>;
}

impl Calculator for StackService {
  type Error = StackError;

  fn push_value(&mut self, value: i32) -> Result<(), StackError> {
    self.push(value);
    Ok(())
  }

  fn push_operation(&mut self, operator: &str) -> Result<(), StackError> {
    self.reduce(operator).map(|_| ())
  }

  fn pop(&mut self) -> Result<i32, StackError> {
    StackService::pop(self)
  }

  fn is_empty(&mut self) -> Result<bool, StackError> {
    Ok(StackService::is_empty(self))
  }

  fn delay_pop(&mut self, millis: i64) -> Result<i32, StackError> {
    self.delayed_pop(millis)
  }
}

/// What the demo session observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoReport {
  pub empty_after_reduce: bool,
  pub popped: i32,
  pub delayed: i32,
  pub empty_at_end: bool,
}

/// Runs the single-client demo: push 8, 12, 20, reduce with `min`, pop,
/// push 5 and 7, then a one second delayed pop.
pub fn run_demo<C: Calculator>(calc: &mut C) -> Result<DemoReport, C::Error> {
  calc.push_value(8)?;
  calc.push_value(12)?;
  calc.push_value(20)?;
  calc.push_operation("min")?;

  let empty_after_reduce = calc.is_empty()?;
  let popped = calc.pop()?;

  calc.push_value(5)?;
  calc.push_value(7)?;
  let delayed = calc.delay_pop(1000)?;
  let empty_at_end = calc.is_empty()?;

  Ok(DemoReport {
    empty_after_reduce: empty_after_reduce,
    popped: popped,
    delayed: delayed,
    empty_at_end: empty_at_end,
  })
}

/// One scripted client of the multi-client driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientScript {
  pub id: String,
  pub values: Vec<i32>,
  pub operator: String,
  pub delay_millis: i64,
}

impl ClientScript {
  pub fn new(id: &str, values: &[i32], operator: &str, delay_millis: i64) -> Self {
    Self {
      id: id.to_string(),
      values: values.to_vec(),
      operator: operator.to_string(),
      delay_millis: delay_millis,
    }
  }

  /// The four clients the driver runs by default.
  pub fn defaults() -> Vec<ClientScript> {
    vec![
      ClientScript::new("Client-1", &[10, 15, 25], "max", 500),
      ClientScript::new("Client-2", &[3, 6, 9], "gcd", 1000),
      ClientScript::new("Client-3", &[4, 8, 12], "lcm", 1500),
      ClientScript::new("Client-4", &[7, 14, 21], "min", 2000),
    ]
  }
}

/// Runs one scripted session and returns its transcript.
///
/// A failed `pop` is recorded and the session goes on, since other clients
/// may legitimately have emptied the shared stack. Any other failure ends
/// the session.
pub fn run_script<C: Calculator>(calc: &mut C, script: &ClientScript) -> Result<Vec<String>, C::Error> {
  let mut transcript = Vec::new();
  let mut note = |line: String| {
    info!(client = %script.id, "{}", line);
    transcript.push(line);
  };

  for &v in script.values.iter() {
    note(format!("pushing {}", v));
    calc.push_value(v)?;
  }

  note(format!("applying operation {}", script.operator));
  calc.push_operation(&script.operator)?;
  note(format!("isEmpty? {}", calc.is_empty()?));

  match calc.pop() {
    Ok(top) => note(format!("pop() = {}", top)),
    Err(e) => note(format!("pop failed: {}", e)),
  }

  calc.push_value(5)?;
  calc.push_value(7)?;
  note(format!("calling delayPop({})", script.delay_millis));
  let delayed = calc.delay_pop(script.delay_millis)?;
  note(format!("delayPop({}) = {}", script.delay_millis, delayed));
  note(format!("isEmpty (end)? {}", calc.is_empty()?));

  Ok(transcript)
}
