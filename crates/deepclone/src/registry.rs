// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Registry of custom copy strategies keyed by exact type.

use crate::error::CloneError;
use crate::reflect::Reflect;
use crate::types::TypeDescriptor;
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Type-erased copy function: takes a source value of the registered type
/// and returns a fully independent copy.
pub type CopyFn = Arc<dyn Fn(&Value) -> Result<Value, CloneError> + Send + Sync>;

/// Mapping from type identity to its custom copier.
///
/// At most one copier exists per type; registering again replaces the
/// previous entry. Mutation needs `&mut self`, so a registry owned by a
/// [`Cloner`](crate::Cloner) is read-only for as long as it is shared.
#[derive(Clone, Default)]
pub struct CopierRegistry {
    copiers: HashMap<Arc<TypeDescriptor>, CopyFn>,
}

impl CopierRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in copiers.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.install_builtins();
        registry
    }

    /// Register `copier` as the copy strategy for exact type `T`.
    ///
    /// The source is lowered to `T` before the call and the result lifted
    /// back; a source that does not decode as `T` fails with
    /// [`CloneError::Value`].
    pub fn register<T, F>(&mut self, copier: F)
    where
        T: Reflect + 'static,
        F: Fn(&T) -> Result<T, CloneError> + Send + Sync + 'static,
    {
        self.register_fn(T::type_descriptor(), move |src: &Value| {
            let value = T::from_value(src)?;
            let copied = copier(&value)?;
            Ok(copied.to_value())
        });
    }

    /// Register a copier working directly on values of `descriptor`.
    pub fn register_fn<F>(&mut self, descriptor: Arc<TypeDescriptor>, copier: F)
    where
        F: Fn(&Value) -> Result<Value, CloneError> + Send + Sync + 'static,
    {
        self.insert(descriptor, Arc::new(copier));
    }

    fn insert(&mut self, descriptor: Arc<TypeDescriptor>, copier: CopyFn) {
        if !descriptor.is_struct() {
            log::warn!(
                "[CopierRegistry::register] {} is a {} type, copier will never be consulted",
                descriptor.name,
                descriptor.kind.category()
            );
        }
        let name = descriptor.name.clone();
        if self.copiers.insert(descriptor, copier).is_some() {
            log::debug!("[CopierRegistry::register] replaced copier for {}", name);
        } else {
            log::debug!("[CopierRegistry::register] registered copier for {}", name);
        }
    }

    /// Look up the copier registered for exactly this type.
    pub fn lookup(&self, descriptor: &TypeDescriptor) -> Option<&CopyFn> {
        self.copiers.get(descriptor)
    }

    /// Check whether a copier is registered for this type.
    pub fn contains(&self, descriptor: &TypeDescriptor) -> bool {
        self.copiers.contains_key(descriptor)
    }

    /// Remove the copier for this type, returning it.
    pub fn remove(&mut self, descriptor: &TypeDescriptor) -> Option<CopyFn> {
        self.copiers.remove(descriptor)
    }

    /// Move all entries of `other` into `self`, replacing duplicates.
    pub fn extend(&mut self, other: CopierRegistry) {
        for (descriptor, copier) in other.copiers {
            self.insert(descriptor, copier);
        }
    }

    /// Number of registered copiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.copiers.len()
    }

    /// Returns `true` if no copiers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.copiers.is_empty()
    }

    /// Registered type names (sorted for determinism).
    pub fn type_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.copiers.keys().map(|d| d.name.clone()).collect();
        names.sort();
        names
    }

    #[cfg(feature = "chrono")]
    fn install_builtins(&mut self) {
        crate::time::register_builtins(self);
    }

    #[cfg(not(feature = "chrono"))]
    fn install_builtins(&mut self) {}
}

impl fmt::Debug for CopierRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CopierRegistry")
            .field("types", &self.type_names())
            .finish()
    }
}
