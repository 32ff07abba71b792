// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Cloner context and entry points.

use crate::error::CloneError;
use crate::reflect::Reflect;
use crate::registry::CopierRegistry;
use crate::types::TypeDescriptor;
use crate::value::Value;
use std::sync::{Arc, OnceLock};

static GLOBAL_CLONER: OnceLock<Cloner> = OnceLock::new();

/// Deep-copy context owning a registry of custom copiers.
///
/// Construct once at startup (see [`Cloner::builder`]) and share by
/// reference. The registry cannot change while the cloner is shared.
#[derive(Debug, Clone)]
pub struct Cloner {
    registry: CopierRegistry,
}

impl Cloner {
    /// Create a cloner with the built-in copiers.
    pub fn new() -> Self {
        Self::with_registry(CopierRegistry::with_builtins())
    }

    /// Create a cloner around an existing registry.
    pub fn with_registry(registry: CopierRegistry) -> Self {
        log::debug!(
            "[Cloner::new] {} custom copier(s): {:?}",
            registry.len(),
            registry.type_names()
        );
        Self { registry }
    }

    /// Start configuring a cloner.
    pub fn builder() -> ClonerBuilder {
        ClonerBuilder::new()
    }

    /// Registry consulted for aggregate types.
    pub fn registry(&self) -> &CopierRegistry {
        &self.registry
    }

    /// Deep-copy `source` into `destination` (statically-typed entry).
    ///
    /// The compiler already guarantees both sides have the same type, so no
    /// type check is performed before traversal.
    pub fn clone_into<T: Reflect>(&self, source: &T, destination: &mut T) -> Result<(), CloneError> {
        *destination = self.deep_clone(source)?;
        Ok(())
    }

    /// Return a deep copy of `source`.
    pub fn deep_clone<T: Reflect>(&self, source: &T) -> Result<T, CloneError> {
        let copied = self.copy_value(&source.to_value())?;
        Ok(T::from_value(&copied)?)
    }

    /// Deep-copy through two type-erased references (dynamically-typed entry).
    ///
    /// Both arguments must be non-nil [`Value::Pointer`]s to the same
    /// pointee type. The source pointee is copied into the allocation the
    /// destination already points at.
    pub fn clone_dyn(&self, source: &Value, destination: &mut Value) -> Result<(), CloneError> {
        let Value::Pointer(src) = source else {
            return Err(CloneError::SourceNotReference);
        };
        let Value::Pointer(dst) = destination else {
            return Err(CloneError::DestinationNotWritable);
        };
        if src.pointee != dst.pointee {
            return Err(CloneError::type_mismatch(
                dst.pointee.name.clone(),
                src.pointee.name.clone(),
            ));
        }
        let target = src.target().ok_or(CloneError::SourceNotReference)?;
        let slot = dst.target_mut().ok_or(CloneError::DestinationNotWritable)?;
        self.copy(target, slot)
    }
}

impl Default for Cloner {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`Cloner`].
///
/// User registrations are applied after the built-ins, so they can
/// override them.
#[derive(Debug)]
pub struct ClonerBuilder {
    builtins: bool,
    registry: CopierRegistry,
}

impl ClonerBuilder {
    /// Create a builder with built-ins enabled and no custom copiers.
    pub fn new() -> Self {
        Self {
            builtins: true,
            registry: CopierRegistry::new(),
        }
    }

    /// Enable or disable the built-in copiers.
    pub fn builtins(mut self, enabled: bool) -> Self {
        self.builtins = enabled;
        self
    }

    /// Register a custom copier for exact type `T`.
    pub fn register<T, F>(mut self, copier: F) -> Self
    where
        T: Reflect + 'static,
        F: Fn(&T) -> Result<T, CloneError> + Send + Sync + 'static,
    {
        self.registry.register::<T, F>(copier);
        self
    }

    /// Register a custom copier for a type known only by descriptor.
    pub fn register_fn<F>(mut self, descriptor: Arc<TypeDescriptor>, copier: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, CloneError> + Send + Sync + 'static,
    {
        self.registry.register_fn(descriptor, copier);
        self
    }

    /// Build the cloner.
    pub fn build(self) -> Cloner {
        let mut registry = if self.builtins {
            CopierRegistry::with_builtins()
        } else {
            CopierRegistry::new()
        };
        registry.extend(self.registry);
        Cloner::with_registry(registry)
    }
}

impl Default for ClonerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide cloner holding only the built-in copiers.
pub fn global() -> &'static Cloner {
    GLOBAL_CLONER.get_or_init(Cloner::new)
}

/// [`Cloner::clone_into`] on the [`global`] cloner.
pub fn clone_into<T: Reflect>(source: &T, destination: &mut T) -> Result<(), CloneError> {
    global().clone_into(source, destination)
}

/// [`Cloner::clone_dyn`] on the [`global`] cloner.
pub fn clone_dyn(source: &Value, destination: &mut Value) -> Result<(), CloneError> {
    global().clone_dyn(source, destination)
}
