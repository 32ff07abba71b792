// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for struct descriptors.

use crate::error::ValueError;
use crate::types::{FieldDescriptor, ScalarKind, TypeDescriptor};
use std::sync::Arc;

/// Builder for struct [`TypeDescriptor`]s.
#[derive(Debug)]
pub struct StructBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl StructBuilder {
    /// Create a new builder for a struct type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add an exported scalar field.
    pub fn field(self, name: impl Into<String>, kind: ScalarKind) -> Self {
        self.field_with_type(name, Arc::new(TypeDescriptor::scalar(kind)))
    }

    /// Add an exported field with a type descriptor.
    pub fn field_with_type(mut self, name: impl Into<String>, type_desc: Arc<TypeDescriptor>) -> Self {
        self.fields.push(FieldDescriptor::new(name, type_desc));
        self
    }

    /// Add a private scalar field.
    pub fn private_field(self, name: impl Into<String>, kind: ScalarKind) -> Self {
        self.private_field_with_type(name, Arc::new(TypeDescriptor::scalar(kind)))
    }

    /// Add a private field with a type descriptor.
    pub fn private_field_with_type(
        mut self,
        name: impl Into<String>,
        type_desc: Arc<TypeDescriptor>,
    ) -> Self {
        self.fields.push(FieldDescriptor::private(name, type_desc));
        self
    }

    /// Add a string field.
    pub fn string_field(self, name: impl Into<String>) -> Self {
        self.field(name, ScalarKind::String)
    }

    /// Add a slice field.
    pub fn slice_field(self, name: impl Into<String>, element: Arc<TypeDescriptor>) -> Self {
        self.field_with_type(name, Arc::new(TypeDescriptor::slice(element)))
    }

    /// Add an array field.
    pub fn array_field(
        self,
        name: impl Into<String>,
        element: Arc<TypeDescriptor>,
        length: usize,
    ) -> Self {
        self.field_with_type(name, Arc::new(TypeDescriptor::array(element, length)))
    }

    /// Add a map field.
    pub fn map_field(
        self,
        name: impl Into<String>,
        key: Arc<TypeDescriptor>,
        value: Arc<TypeDescriptor>,
    ) -> Self {
        self.field_with_type(name, Arc::new(TypeDescriptor::map(key, value)))
    }

    /// Add a pointer field.
    pub fn pointer_field(self, name: impl Into<String>, pointee: Arc<TypeDescriptor>) -> Self {
        self.field_with_type(name, Arc::new(TypeDescriptor::pointer(pointee)))
    }

    /// Add a dynamic field.
    pub fn dynamic_field(self, name: impl Into<String>) -> Self {
        self.field_with_type(name, Arc::new(TypeDescriptor::dynamic()))
    }

    /// Build the TypeDescriptor.
    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor::struct_type(self.name, self.fields)
    }

    /// Supply the fields of a struct created with
    /// [`TypeDescriptor::declare_struct`], returning the declared descriptor.
    ///
    /// Fields may point back at `declared`, which is how recursive types such
    /// as linked lists and trees are described.
    pub fn define(self, declared: &Arc<TypeDescriptor>) -> Result<Arc<TypeDescriptor>, ValueError> {
        if declared.name != self.name {
            return Err(ValueError::TypeMismatch {
                expected: self.name,
                got: declared.name.clone(),
            });
        }
        declared.define_fields(self.fields)?;
        Ok(declared.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeKind;

    #[test]
    fn test_builder() {
        let i32_type = Arc::new(TypeDescriptor::scalar(ScalarKind::I32));
        let desc = StructBuilder::new("Order")
            .field("id", ScalarKind::U64)
            .string_field("customer")
            .slice_field("quantities", i32_type.clone())
            .pointer_field("parent", i32_type)
            .private_field("checksum", ScalarKind::U32)
            .build();

        assert_eq!(desc.name, "Order");
        let fields = desc.fields().expect("struct");
        assert_eq!(fields.len(), 5);
        assert!(matches!(fields[2].type_desc.kind, TypeKind::Slice(_)));
        assert_eq!(fields[3].type_desc.name, "*i32");
        assert!(!fields[4].exported);
    }

    #[test]
    fn test_define_recursive() {
        let node = Arc::new(TypeDescriptor::declare_struct("Node"));
        let node = StructBuilder::new("Node")
            .field("value", ScalarKind::I32)
            .pointer_field("next", node.clone())
            .define(&node)
            .expect("define");
        assert_eq!(node.field("next").map(|f| f.type_desc.name.as_str()), Some("*Node"));

        let other = Arc::new(TypeDescriptor::declare_struct("Other"));
        assert!(StructBuilder::new("Node").define(&other).is_err());
        assert!(StructBuilder::new("Node").define(&node).is_err());
    }
}
