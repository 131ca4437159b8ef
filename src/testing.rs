//! Randomized test drivers
//!
//! A `Tester` runs random operations against a sequential structure to
//! measure throughput. A `ConcurrentTester` is cloned into several threads
//! that each record a log of timed `Action`s; the merged log must admit a
//! linearization.

use std::time::{Duration, Instant};

use rand::rngs::ThreadRng;
use rand::Rng;

use crate::linearization::*;

/// Marker for the operation kinds a tester chooses between.
pub trait TestOp: Copy + Clone {}

pub trait Tester {
  fn execute_op(&mut self, rng: &mut ThreadRng);
}

pub trait ConcurrentTester: Clone + Send {
  type L: Linearization;

  fn execute_op(&mut self, rng: &mut ThreadRng);

  fn record_op(&mut self, rng: &mut ThreadRng, tid: usize, i: usize)
    -> Action<<Self::L as Linearization>::P>;

  fn lin(&self) -> Self::L;
}

/// Picks an operation with probability proportional to its weight.
pub fn choose_op<O: TestOp>(rng: &mut ThreadRng, ops: &[(O, f64)]) -> O {
  let total: f64 = ops.iter().map(|&(_, p)| p).sum();
  let mut f = rng.gen::<f64>() * total;

  for &(op, p) in ops {
    if f < p {
      return op;
    }
    f -= p;
  }

  ops[ops.len() - 1].0
}

/// Generates `n` small positive arguments. Keeping them small keeps `lcm`
/// of a whole stack inside `i32`.
pub fn gen_args(rng: &mut ThreadRng, n: usize) -> Vec<i32> {
  (0..n).map(|_| rng.gen_range(1..=12)).collect()
}

pub fn duration_to_ns(d: Duration) -> f64 {
  (d.as_secs() as f64) * 1_000_000_000.0 +
    (d.subsec_nanos() as f64)
}

pub fn secs_to_duration(t: f64) -> Duration {
  Duration::from_secs_f64(t)
}

fn report(ns_elapsed: f64, n_ops: usize) {
  let ns_per_op = ns_elapsed / (n_ops as f64);

  println!();
  println!("Time elapsed (s): {}", ns_elapsed / 1_000_000_000.0);
  println!("Ops completed:    {}", n_ops);
  println!("Time per op (ns): {}", ns_per_op);
}

pub fn test_throughput<T: Tester>(mut tester: T, t_secs: f64) {
  let mut rng = rand::thread_rng();
  let mut n_ops = 0;
  let duration = secs_to_duration(t_secs);
  let start_time = Instant::now();

  let elapsed = loop {
    tester.execute_op(&mut rng);
    n_ops += 1;

    let d = start_time.elapsed();
    if d >= duration {
      break d
    }
  };

  report(duration_to_ns(elapsed), n_ops);
}

/// Runs `tester` on `n_threads` threads for `t_secs`, then checks that the
/// merged log linearizes. Returns the linearized history.
pub fn test_concurrent_correctness<T: ConcurrentTester>(
  tester: T, t_secs: f64, n_threads: usize)
  -> Vec<Action<<T::L as Linearization>::P>> {
  let mut log = Vec::new();
  let duration = secs_to_duration(t_secs);

  crossbeam::scope(|scope| {
    let handles: Vec<_> = (0..n_threads).map(|tid| {
      let mut tester = tester.clone();

      scope.spawn(move |_| {
        let mut rng = rand::thread_rng();
        let mut log = Vec::new();
        let mut i = 0;
        let start_time = Instant::now();

        loop {
          log.push(tester.record_op(&mut rng, tid, i));
          i += 1;

          if start_time.elapsed() >= duration {
            break;
          }
        }

        log
      })
    }).collect();

    for h in handles {
      log.extend(h.join().expect("tester thread panicked"));
    }
  }).expect("tester scope panicked");

  let mut lin = tester.lin();
  lin.linearize(log).expect(
    "No valid linearization found.")
}

pub fn test_concurrent_throughput<T: ConcurrentTester>(
  tester: T, t_secs: f64, n_threads: usize) {
  let duration = secs_to_duration(t_secs);
  let mut ns_elapsed = 0.0;
  let mut op_total = 0;

  crossbeam::scope(|scope| {
    let handles: Vec<_> = (0..n_threads).map(|_| {
      let mut tester = tester.clone();

      scope.spawn(move |_| {
        let mut rng = rand::thread_rng();
        let mut n_ops = 0;
        let start_time = Instant::now();

        let elapsed = loop {
          tester.execute_op(&mut rng);
          n_ops += 1;

          let d = start_time.elapsed();
          if d >= duration {
            break d
          }
        };

        (elapsed, n_ops)
      })
    }).collect();

    for h in handles {
      let (elapsed, n_ops) = h.join().expect("tester thread panicked");
      ns_elapsed += duration_to_ns(elapsed);
      op_total += n_ops;
    }
  }).expect("tester scope panicked");

  report(ns_elapsed, op_total);
}
