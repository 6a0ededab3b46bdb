// Dependency injection container

use crate::Error;
use girder_log::{debug, trace};
use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

type Factory = Arc<dyn Fn(&Container) -> Result<Box<dyn Any + Send>, Error> + Send + Sync>;

/// A type the container can construct from its own bindings.
///
/// Implementations resolve each dependency from the container and
/// propagate the error when one is missing.
pub trait Injectable: Sized {
    fn inject(container: &Container) -> Result<Self, Error>;
}

/// Key to factory map.
///
/// Every `get` runs the registered factory again, so two lookups return two
/// independent values. Sharing is done by registering a factory that clones
/// a handle (an `Arc`, a pool).
#[derive(Clone)]
pub struct Container {
    factories: Arc<RwLock<HashMap<String, Factory>>>,
}

impl Container {
    pub fn new() -> Self {
        debug!("Creating new DI container");
        Self {
            factories: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a zero-argument factory under `key`, replacing any previous one.
    pub fn set<T, F>(&self, key: impl Into<String>, factory: F)
    where
        T: Send + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.insert(
            key.into(),
            Arc::new(move |_: &Container| Ok(Box::new(factory()) as Box<dyn Any + Send>)),
        );
    }

    /// Register a factory that may resolve further bindings.
    pub fn set_with<T, F>(&self, key: impl Into<String>, factory: F)
    where
        T: Send + 'static,
        F: Fn(&Container) -> Result<T, Error> + Send + Sync + 'static,
    {
        self.insert(
            key.into(),
            Arc::new(move |c: &Container| {
                factory(c).map(|value| Box::new(value) as Box<dyn Any + Send>)
            }),
        );
    }

    fn insert(&self, key: String, factory: Factory) {
        trace!("Registering binding {}", key);
        let replaced = self.factories.write().insert(key.clone(), factory).is_some();
        if replaced {
            debug!("Binding {} replaced", key);
        }
    }

    /// Invoke the factory registered under `key`.
    pub fn get<T: 'static>(&self, key: &str) -> Result<T, Error> {
        // The lock is released before the factory runs so factories can
        // resolve other bindings.
        let factory = self
            .factories
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| Error::BindingNotFound(key.to_string()))?;

        let value = factory(self)?;
        value
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| Error::BindingTypeMismatch {
                key: key.to_string(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// Register a zero-argument factory keyed by `T`'s type name.
    pub fn bind<T, F>(&self, factory: F)
    where
        T: Send + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.set(Self::type_key::<T>(), factory);
    }

    pub fn bind_with<T, F>(&self, factory: F)
    where
        T: Send + 'static,
        F: Fn(&Container) -> Result<T, Error> + Send + Sync + 'static,
    {
        self.set_with(Self::type_key::<T>(), factory);
    }

    pub fn resolve<T: 'static>(&self) -> Result<T, Error> {
        self.get(Self::type_key::<T>())
    }

    /// Resolve `T`, or construct it directly when nothing is bound for it.
    pub fn resolve_or_default<T: Default + 'static>(&self) -> Result<T, Error> {
        match self.resolve::<T>() {
            Err(Error::BindingNotFound(_)) => {
                trace!("No binding for {}, using Default", Self::type_key::<T>());
                Ok(T::default())
            }
            other => other,
        }
    }

    /// Construct `T` from its declared dependencies.
    pub fn build<T: Injectable>(&self) -> Result<T, Error> {
        T::inject(self).map_err(|err| match err {
            Error::BindingNotFound(dependency) => Error::UnresolvableDependency {
                target: std::any::type_name::<T>().to_string(),
                dependency,
            },
            other => other,
        })
    }

    pub fn has(&self, key: &str) -> bool {
        self.factories.read().contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.factories.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.factories.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every binding.
    pub fn clear(&self) {
        let mut factories = self.factories.write();
        let count = factories.len();
        factories.clear();
        debug!("Cleared {} bindings from container", count);
    }

    /// Key used by the type-keyed forms.
    pub fn type_key<T: 'static>() -> &'static str {
        std::any::type_name::<T>()
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("bindings", &self.keys())
            .finish()
    }
}
