//! A shared integer stack for concurrent callers.
//!
//! `StackService` owns one stack and serializes every access to it behind a
//! single lock. On top of push, pop and an emptiness check it offers
//! `reduce`, which atomically replaces the whole stack with its min, max,
//! gcd or lcm, and `delayed_pop`, which waits without holding the lock and
//! can be cancelled.
//!
//! Services are published by name in a `Registry` and served over TCP by
//! `remote::StackServer`; `remote::RemoteStack` is the client. Both the
//! local service and the client implement `Calculator`.

pub mod stack;
pub mod reduce;
pub mod error;
pub mod cancel;
pub mod service;
pub mod calculator;
pub mod registry;
pub mod config;
pub mod logging;
pub mod remote;
pub mod linearization;

#[cfg(test)]
mod testing;

pub use crate::calculator::{Calculator, ClientScript, DemoReport};
pub use crate::error::{Operation, RemoteError, StackError};
pub use crate::reduce::Operator;
pub use crate::registry::{Registry, RegistryError};
pub use crate::service::StackService;
