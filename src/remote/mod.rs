//! The remote-call boundary
//!
//! `StackServer` exposes the services of a `Registry` over TCP using the
//! line protocol in `wire`; `RemoteStack` is the matching client and
//! implements `Calculator`. Service failures travel as typed errors, so a
//! remote caller can tell `EmptyStack` from a dropped connection.

pub mod wire;
mod server;
mod client;

pub use self::server::{dispatch, dispatch_with, ServerHandle, StackServer};
pub use self::client::RemoteStack;
