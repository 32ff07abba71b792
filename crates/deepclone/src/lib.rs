// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # deepclone - generic deep copies over a runtime type model
//!
//! Walks a value's structure at runtime and produces an independent copy:
//! no slice storage, map or pointee is shared between source and
//! destination. Custom copy strategies can be registered per exact
//! aggregate type.
//!
//! ## Quick Start
//!
//! ```rust
//! use deepclone::{Cloner, StructBuilder, ScalarKind, StructValue, Value};
//! use std::sync::Arc;
//!
//! let point = Arc::new(
//!     StructBuilder::new("Point")
//!         .field("x", ScalarKind::I32)
//!         .private_field("cache", ScalarKind::U64)
//!         .build(),
//! );
//!
//! let src = Value::Struct(StructValue::new(point.clone(), vec![Value::I32(3), Value::U64(99)]));
//! let mut dst = point.zero_value();
//!
//! let cloner = Cloner::new();
//! cloner.copy(&src, &mut dst).unwrap();
//! assert_eq!(dst.get_field("x"), Some(&Value::I32(3)));
//! // Private fields are left at their zero value.
//! assert_eq!(dst.get_field("cache"), Some(&Value::U64(0)));
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +--------------------------------------------------------------+
//! |  Entry points: clone_into<T> (static) | clone_dyn (erased)   |
//! +--------------------------------------------------------------+
//! |  Engine: exhaustive match over Value categories              |
//! |    scalar | array | slice | map | pointer | dynamic | struct |
//! |    func | chan | opaque                                      |
//! +--------------------------------------------------------------+
//! |  CopierRegistry: TypeDescriptor -> custom copier (structs)   |
//! +--------------------------------------------------------------+
//! ```
//!
//! ## Limitations
//!
//! - Cyclic values recurse without bound. Self-referential types such as
//!   lists and trees are supported.
//! - Private fields are never copied by generic traversal.
//! - Channels are replicated by capacity; queued values are not copied.

mod builder;
mod cloner;
mod engine;
mod error;
mod macros;
mod reflect;
mod registry;
#[cfg(feature = "chrono")]
mod time;
mod types;
mod value;

pub use builder::StructBuilder;
pub use cloner::{clone_dyn, clone_into, global, Cloner, ClonerBuilder};
pub use error::{CloneError, ValueError};
pub use reflect::Reflect;
#[doc(hidden)]
pub use reflect::{expect_struct_fields, next_field};
pub use registry::{CopierRegistry, CopyFn};
#[cfg(feature = "chrono")]
pub use time::TIMESTAMP_TYPE_NAME;
pub use types::{
    ArrayDescriptor, FieldDescriptor, MapDescriptor, ScalarKind, Signature, StructFields,
    TypeDescriptor, TypeKind,
};
pub use value::{
    ArrayValue, Callable, ChanValue, Channel, Complex, FuncValue, Handle, MapKey, MapValue,
    PointerValue, SliceValue, StructValue, Value,
};
