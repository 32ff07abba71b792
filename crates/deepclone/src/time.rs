// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Timestamp support and the built-in timestamp copier.
//!
//! `DateTime<Utc>` is reflected as a struct with private fields, the way an
//! opaque time type exposes nothing settable. Generic traversal therefore
//! resets it to the Unix epoch; the built-in copier copies it by plain value
//! assignment instead.

use crate::error::ValueError;
use crate::reflect::{expect_struct_fields, Reflect};
use crate::registry::CopierRegistry;
use crate::types::{FieldDescriptor, ScalarKind, TypeDescriptor};
use crate::value::{StructValue, Value};
use chrono::{DateTime, Utc};
use std::sync::{Arc, OnceLock};

/// Type name of the reflected timestamp.
pub const TIMESTAMP_TYPE_NAME: &str = "chrono::DateTime<Utc>";

impl Reflect for DateTime<Utc> {
    fn type_descriptor() -> Arc<TypeDescriptor> {
        static DESCRIPTOR: OnceLock<Arc<TypeDescriptor>> = OnceLock::new();
        DESCRIPTOR
            .get_or_init(|| {
                Arc::new(TypeDescriptor::struct_type(
                    TIMESTAMP_TYPE_NAME,
                    vec![
                        FieldDescriptor::private(
                            "secs",
                            Arc::new(TypeDescriptor::scalar(ScalarKind::I64)),
                        ),
                        FieldDescriptor::private(
                            "nanos",
                            Arc::new(TypeDescriptor::scalar(ScalarKind::U32)),
                        ),
                    ],
                ))
            })
            .clone()
    }

    fn to_value(&self) -> Value {
        Value::Struct(StructValue::new(
            Self::type_descriptor(),
            vec![
                Value::I64(self.timestamp()),
                Value::U32(self.timestamp_subsec_nanos()),
            ],
        ))
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        let descriptor = Self::type_descriptor();
        match expect_struct_fields(value, &descriptor)? {
            [Value::I64(secs), Value::U32(nanos)] => DateTime::<Utc>::from_timestamp(*secs, *nanos)
                .ok_or_else(|| ValueError::OutOfRange(TIMESTAMP_TYPE_NAME.to_string())),
            _ => Err(ValueError::type_mismatch(TIMESTAMP_TYPE_NAME, value)),
        }
    }
}

pub(crate) fn register_builtins(registry: &mut CopierRegistry) {
    registry.register::<DateTime<Utc>, _>(|src| Ok(*src));
}
