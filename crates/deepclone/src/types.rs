// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors for runtime type identity.

use crate::value::{
    ArrayValue, ChanValue, FuncValue, MapValue, PointerValue, SliceValue, StructValue, Value,
};
use crate::error::ValueError;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

/// Scalar type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    Complex64,
    Complex128,
    String,
    /// Raw memory address held as an integer.
    Address,
    /// Opaque pointer-sized handle.
    Handle,
}

impl ScalarKind {
    /// Canonical type name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Isize => "isize",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::Usize => "usize",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Complex64 => "complex64",
            Self::Complex128 => "complex128",
            Self::String => "string",
            Self::Address => "address",
            Self::Handle => "handle",
        }
    }
}

/// Type kind enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Scalar copied by value.
    Scalar(ScalarKind),
    /// Fixed-size homogeneous array.
    Array(ArrayDescriptor),
    /// Variable-length sequence.
    Slice(Arc<TypeDescriptor>),
    /// Keyed mapping.
    Map(MapDescriptor),
    /// Owning reference to a value of the pointee type.
    Pointer(Arc<TypeDescriptor>),
    /// Box holding a value whose type is chosen at runtime.
    Dynamic,
    /// Aggregate with named fields in declaration order.
    Struct(Arc<StructFields>),
    /// Callable.
    Func(Signature),
    /// Bounded channel.
    Chan(Arc<TypeDescriptor>),
    /// Type without a traversal rule.
    Opaque,
}

impl TypeKind {
    /// Category label used in diagnostics.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Array(_) => "array",
            Self::Slice(_) => "slice",
            Self::Map(_) => "map",
            Self::Pointer(_) => "pointer",
            Self::Dynamic => "dynamic",
            Self::Struct(_) => "struct",
            Self::Func(_) => "func",
            Self::Chan(_) => "chan",
            Self::Opaque => "opaque",
        }
    }
}

/// A complete type descriptor.
///
/// Two values have the same type when their descriptors compare equal.
/// Struct types are identified by name alone, so struct names must be unique
/// within a program (the `reflect_struct!` macro qualifies them with the
/// module path). This is what lets a struct refer to itself through a
/// pointer, slice or map field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    /// Type name.
    pub name: String,
    /// Type kind.
    pub kind: TypeKind,
}

impl TypeDescriptor {
    /// Create a new type descriptor.
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Create a scalar type descriptor.
    pub fn scalar(kind: ScalarKind) -> Self {
        Self::new(kind.name(), TypeKind::Scalar(kind))
    }

    /// Create a fixed-length array type descriptor.
    pub fn array(element: Arc<TypeDescriptor>, length: usize) -> Self {
        let name = format!("[{}]{}", length, element.name);
        Self::new(name, TypeKind::Array(ArrayDescriptor::new(element, length)))
    }

    /// Create a slice type descriptor.
    pub fn slice(element: Arc<TypeDescriptor>) -> Self {
        let name = format!("[]{}", element.name);
        Self::new(name, TypeKind::Slice(element))
    }

    /// Create a map type descriptor.
    pub fn map(key: Arc<TypeDescriptor>, value: Arc<TypeDescriptor>) -> Self {
        let name = format!("map[{}]{}", key.name, value.name);
        Self::new(name, TypeKind::Map(MapDescriptor::new(key, value)))
    }

    /// Create a pointer type descriptor.
    pub fn pointer(pointee: Arc<TypeDescriptor>) -> Self {
        let name = format!("*{}", pointee.name);
        Self::new(name, TypeKind::Pointer(pointee))
    }

    /// Create the dynamic box type descriptor.
    pub fn dynamic() -> Self {
        Self::new("any", TypeKind::Dynamic)
    }

    /// Create a struct type descriptor.
    pub fn struct_type(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self::new(name, TypeKind::Struct(Arc::new(StructFields::defined(fields))))
    }

    /// Create a struct type descriptor whose fields are built on first use.
    ///
    /// `init` may look up the descriptor being defined (directly or through
    /// other types), which is how self-referential types are described.
    pub fn lazy_struct(name: impl Into<String>, init: fn() -> Vec<FieldDescriptor>) -> Self {
        Self::new(name, TypeKind::Struct(Arc::new(StructFields::lazy(init))))
    }

    /// Declare a struct type whose fields are supplied later with
    /// [`define_fields`](Self::define_fields).
    ///
    /// Until then the struct has no fields.
    pub fn declare_struct(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Struct(Arc::new(StructFields::declared())))
    }

    /// Supply the fields of a struct created with
    /// [`declare_struct`](Self::declare_struct).
    pub fn define_fields(&self, fields: Vec<FieldDescriptor>) -> Result<(), ValueError> {
        match &self.kind {
            TypeKind::Struct(slot) if slot.init.is_none() => slot
                .fields
                .set(fields)
                .map_err(|_| ValueError::AlreadyDefined(self.name.clone())),
            TypeKind::Struct(_) => Err(ValueError::AlreadyDefined(self.name.clone())),
            _ => Err(ValueError::TypeMismatch {
                expected: "struct".to_string(),
                got: self.name.clone(),
            }),
        }
    }

    /// Create a function type descriptor.
    pub fn func(signature: Signature) -> Self {
        Self::new(signature.to_string(), TypeKind::Func(signature))
    }

    /// Create a channel type descriptor.
    pub fn chan(element: Arc<TypeDescriptor>) -> Self {
        let name = format!("chan {}", element.name);
        Self::new(name, TypeKind::Chan(element))
    }

    /// Create a descriptor for a type the engine cannot traverse.
    pub fn opaque(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Opaque)
    }

    /// Check if this is a scalar type.
    pub fn is_scalar(&self) -> bool {
        matches!(self.kind, TypeKind::Scalar(_))
    }

    /// Check if this is a struct type.
    pub fn is_struct(&self) -> bool {
        matches!(self.kind, TypeKind::Struct(_))
    }

    /// Get fields if this is a struct.
    pub fn fields(&self) -> Option<&[FieldDescriptor]> {
        match &self.kind {
            TypeKind::Struct(fields) => Some(fields.as_slice()),
            _ => None,
        }
    }

    /// Get field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields()?.iter().find(|f| f.name == name)
    }

    /// Get field index by name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields()?.iter().position(|f| f.name == name)
    }

    /// Get the signature if this is a function type.
    pub fn signature(&self) -> Option<&Signature> {
        match &self.kind {
            TypeKind::Func(sig) => Some(sig),
            _ => None,
        }
    }

    /// Build the zero value of this type.
    ///
    /// References (slice, map, pointer, func, chan) are nil, the dynamic box
    /// is empty, arrays and structs hold zero values all the way down.
    pub fn zero_value(self: &Arc<Self>) -> Value {
        match &self.kind {
            TypeKind::Scalar(kind) => zero_scalar(*kind),
            TypeKind::Array(arr) => {
                let items = (0..arr.length)
                    .map(|_| arr.element.zero_value())
                    .collect();
                Value::Array(ArrayValue::new(arr.element.clone(), items))
            }
            TypeKind::Slice(element) => Value::Slice(SliceValue::nil(element.clone())),
            TypeKind::Map(map) => Value::Map(MapValue::nil(map.key.clone(), map.value.clone())),
            TypeKind::Pointer(pointee) => Value::Pointer(PointerValue::nil(pointee.clone())),
            TypeKind::Dynamic => Value::Dynamic(None),
            TypeKind::Struct(fields) => {
                let values = fields
                    .as_slice()
                    .iter()
                    .map(|f| f.type_desc.zero_value())
                    .collect();
                Value::Struct(StructValue::new(self.clone(), values))
            }
            TypeKind::Func(_) => Value::Func(FuncValue::nil(self.clone())),
            TypeKind::Chan(element) => Value::Chan(ChanValue::nil(element.clone())),
            TypeKind::Opaque => Value::Opaque(self.clone()),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// @audit-ok: Simple pattern matching (cyclo 18, cogni 1) - zero value dispatch table
fn zero_scalar(kind: ScalarKind) -> Value {
    match kind {
        ScalarKind::Bool => Value::Bool(false),
        ScalarKind::I8 => Value::I8(0),
        ScalarKind::I16 => Value::I16(0),
        ScalarKind::I32 => Value::I32(0),
        ScalarKind::I64 => Value::I64(0),
        ScalarKind::Isize => Value::Isize(0),
        ScalarKind::U8 => Value::U8(0),
        ScalarKind::U16 => Value::U16(0),
        ScalarKind::U32 => Value::U32(0),
        ScalarKind::U64 => Value::U64(0),
        ScalarKind::Usize => Value::Usize(0),
        ScalarKind::F32 => Value::F32(0.0),
        ScalarKind::F64 => Value::F64(0.0),
        ScalarKind::Complex64 => Value::Complex64(Default::default()),
        ScalarKind::Complex128 => Value::Complex128(Default::default()),
        ScalarKind::String => Value::String(String::new()),
        ScalarKind::Address => Value::Address(0),
        ScalarKind::Handle => Value::Handle(Default::default()),
    }
}

/// Field list of a struct type.
///
/// Fields are either given up front, built on first access, or supplied once
/// after declaration. Equality and hashing ignore the fields: a struct type
/// is identified by its [`TypeDescriptor`] name.
pub struct StructFields {
    fields: OnceLock<Vec<FieldDescriptor>>,
    init: Option<fn() -> Vec<FieldDescriptor>>,
}

impl StructFields {
    fn defined(fields: Vec<FieldDescriptor>) -> Self {
        Self {
            fields: OnceLock::from(fields),
            init: None,
        }
    }

    fn lazy(init: fn() -> Vec<FieldDescriptor>) -> Self {
        Self {
            fields: OnceLock::new(),
            init: Some(init),
        }
    }

    fn declared() -> Self {
        Self {
            fields: OnceLock::new(),
            init: None,
        }
    }

    /// Fields in declaration order, resolving them if needed.
    pub fn as_slice(&self) -> &[FieldDescriptor] {
        match self.init {
            Some(init) => self.fields.get_or_init(init).as_slice(),
            None => self.fields.get().map(Vec::as_slice).unwrap_or_default(),
        }
    }

    /// Returns `true` once the field list is known.
    pub fn is_resolved(&self) -> bool {
        self.fields.get().is_some()
    }
}

impl PartialEq for StructFields {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for StructFields {}

impl Hash for StructFields {
    fn hash<H: Hasher>(&self, _state: &mut H) {}
}

// Field types are printed by name; a full dump would not terminate for
// self-referential structs.
impl fmt::Debug for StructFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fields.get() {
            Some(fields) => f
                .debug_map()
                .entries(fields.iter().map(|field| (&field.name, &field.type_desc.name)))
                .finish(),
            None => f.write_str("{..}"),
        }
    }
}

/// Field descriptor for struct members.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    /// Field name.
    pub name: String,
    /// Field type.
    pub type_desc: Arc<TypeDescriptor>,
    /// Settable from outside the defining module.
    ///
    /// Generic struct copying skips fields where this is false and leaves
    /// them at their zero value.
    pub exported: bool,
}

impl FieldDescriptor {
    /// Create an exported field descriptor.
    pub fn new(name: impl Into<String>, type_desc: Arc<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            type_desc,
            exported: true,
        }
    }

    /// Create a private field descriptor.
    pub fn private(name: impl Into<String>, type_desc: Arc<TypeDescriptor>) -> Self {
        Self::new(name, type_desc).exported(false)
    }

    /// Set the exported flag.
    pub fn exported(mut self, exported: bool) -> Self {
        self.exported = exported;
        self
    }
}

/// Array type descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrayDescriptor {
    /// Element type.
    pub element: Arc<TypeDescriptor>,
    /// Fixed length.
    pub length: usize,
}

impl ArrayDescriptor {
    /// Create array descriptor.
    pub fn new(element: Arc<TypeDescriptor>, length: usize) -> Self {
        Self { element, length }
    }
}

/// Map type descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MapDescriptor {
    /// Key type.
    pub key: Arc<TypeDescriptor>,
    /// Value type.
    pub value: Arc<TypeDescriptor>,
}

impl MapDescriptor {
    /// Create map descriptor.
    pub fn new(key: Arc<TypeDescriptor>, value: Arc<TypeDescriptor>) -> Self {
        Self { key, value }
    }
}

/// Function signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Signature {
    /// Parameter types.
    pub params: Vec<Arc<TypeDescriptor>>,
    /// Result types.
    pub results: Vec<Arc<TypeDescriptor>>,
}

impl Signature {
    /// Create a signature.
    pub fn new(params: Vec<Arc<TypeDescriptor>>, results: Vec<Arc<TypeDescriptor>>) -> Self {
        Self { params, results }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |types: &[Arc<TypeDescriptor>]| {
            types
                .iter()
                .map(|t| t.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        write!(f, "fn({}) -> ({})", join(&self.params), join(&self.results))
    }
}
