//! Named service instances
//!
//! The registry publishes stack services under well-known names so that
//! connections can look up the instance they want. Clones share the same
//! table.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::info;

use crate::service::StackService;

/// The well-known name a server publishes its stack under by default.
pub const DEFAULT_SERVICE_NAME: &str = "CalculatorService";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
  #[error("`{0}` is not bound")]
  NotBound(String),

  #[error("`{0}` is already bound")]
  AlreadyBound(String),
}

#[derive(Clone, Default)]
pub struct Registry {
  services: Arc<RwLock<HashMap<String, StackService>>>,
}

impl Registry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Publishes `service` under `name`, failing if the name is taken.
  pub fn bind(&self, name: &str, service: StackService) -> Result<(), RegistryError> {
    let mut services = self.services.write();
    if services.contains_key(name) {
      return Err(RegistryError::AlreadyBound(name.to_string()));
    }
    services.insert(name.to_string(), service);
    info!(name, "service bound");
    Ok(())
  }

  /// Publishes `service` under `name`, returning whatever was bound there.
  pub fn rebind(&self, name: &str, service: StackService) -> Option<StackService> {
    let previous = self.services.write().insert(name.to_string(), service);
    info!(name, replaced = previous.is_some(), "service rebound");
    previous
  }

  /// Returns a handle to the service bound under `name`.
  pub fn lookup(&self, name: &str) -> Result<StackService, RegistryError> {
    self.services.read()
      .get(name)
      .cloned()
      .ok_or_else(|| RegistryError::NotBound(name.to_string()))
  }

  pub fn unbind(&self, name: &str) -> Result<StackService, RegistryError> {
    let removed = self.services.write()
      .remove(name)
      .ok_or_else(|| RegistryError::NotBound(name.to_string()))?;
    info!(name, "service unbound");
    Ok(removed)
  }

  /// Bound names, sorted.
  pub fn names(&self) -> Vec<String> {
    let mut names: Vec<String> = self.services.read().keys().cloned().collect();
    names.sort();
    names
  }

  /// Shuts down every bound service.
  pub fn shutdown_all(&self) {
    for service in self.services.read().values() {
      service.shutdown();
    }
  }
}
