//! Plugin-based registrar registry
//!
//! The registry allows registrar implementations to be registered at runtime
//! and selected by the `provider` name in [`RegistrarConfig`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use registrar_core::RegistrarRegistry;
//!
//! let registry = RegistrarRegistry::new();
//! registrar_godaddy::register(&registry);
//!
//! let registrar = registry.create_registrar(&config.registrar)?;
//! ```

use crate::config::RegistrarConfig;
use crate::error::{Result, ServiceError};
use crate::traits::{Registrar, RegistrarFactory};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Registry mapping provider type names to registrar factories
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct RegistrarRegistry {
    factories: RwLock<HashMap<String, Box<dyn RegistrarFactory>>>,
}

impl std::fmt::Debug for RegistrarRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrarRegistry")
            .field("registrars", &self.list_registrars())
            .finish()
    }
}

impl RegistrarRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a registrar factory under `name`
    ///
    /// Registering the same name twice replaces the earlier factory.
    pub fn register_registrar(&self, name: impl Into<String>, factory: Box<dyn RegistrarFactory>) {
        let mut factories = self.factories.write().unwrap_or_else(PoisonError::into_inner);
        factories.insert(name.into(), factory);
    }

    /// Create a registrar from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Arc<dyn Registrar>)`: Created registrar instance
    /// - `Err(ServiceError)`: `InvalidArgument` if the provider type is not
    ///   registered, or the factory's own error
    pub fn create_registrar(&self, config: &RegistrarConfig) -> Result<Arc<dyn Registrar>> {
        let factories = self.factories.read().unwrap_or_else(PoisonError::into_inner);

        let factory = factories.get(&config.provider).ok_or_else(|| {
            ServiceError::invalid_argument(format!("Unknown registrar type: {}", config.provider))
        })?;

        factory.create(config)
    }

    /// List all registered provider type names, sorted
    pub fn list_registrars(&self) -> Vec<String> {
        let factories = self.factories.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = factories.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a provider type is registered
    pub fn has_registrar(&self, name: &str) -> bool {
        let factories = self.factories.read().unwrap_or_else(PoisonError::into_inner);
        factories.contains_key(name)
    }
}
