// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types.

use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by the traversal engine and its entry points.
#[derive(Debug, Clone, Error)]
pub enum CloneError {
    /// The dynamically-typed entry expects the source to be a non-nil pointer.
    #[error("source is not a reference")]
    SourceNotReference,

    /// The destination slot cannot be written through.
    #[error("destination is not a writable reference")]
    DestinationNotWritable,

    /// Source and destination denote different types.
    #[error("source and destination have different types: {found} vs {expected}")]
    TypeMismatch {
        /// Type of the destination slot.
        expected: String,
        /// Type of the source value.
        found: String,
    },

    /// Source and destination are functions with different signatures.
    #[error("source and destination functions have different signatures: {found} vs {expected}")]
    SignatureMismatch { expected: String, found: String },

    /// The value belongs to a category the engine cannot traverse.
    #[error("unknown value category: {0}")]
    UnknownCategory(String),

    /// A value could not be converted to or from its Rust type.
    #[error(transparent)]
    Value(#[from] ValueError),

    /// Failure reported by a registered custom copier.
    #[error(transparent)]
    Custom(Arc<dyn StdError + Send + Sync>),
}

impl CloneError {
    /// Wrap an arbitrary error returned from a custom copier.
    pub fn custom<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(err))
    }

    /// Build a type mismatch error from the destination and source types.
    pub(crate) fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Caller misuse that should be fixed at the call site.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::SourceNotReference
                | Self::DestinationNotWritable
                | Self::TypeMismatch { .. }
                | Self::SignatureMismatch { .. }
        )
    }
}

/// Errors converting between [`Value`](crate::Value) and Rust types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("length mismatch: expected {expected} elements, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    #[error("nil {0} cannot be represented")]
    UnexpectedNil(String),

    #[error("missing field: {0}")]
    MissingField(String),

    #[error("value out of range for {0}")]
    OutOfRange(String),

    #[error("fields of {0} are already defined")]
    AlreadyDefined(String),
}

impl ValueError {
    pub(crate) fn type_mismatch(expected: impl Into<String>, got: &crate::Value) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            got: got.type_desc().name.clone(),
        }
    }
}
