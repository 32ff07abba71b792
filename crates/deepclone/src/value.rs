// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime value model.
//!
//! [`Value`] is a closed tagged union over every category the traversal
//! engine knows how to copy. Composite payloads carry the descriptors of
//! their element, key or pointee types so that nil values still know their
//! exact type.

use crate::types::{ScalarKind, Signature, TypeDescriptor, TypeKind};
use crossbeam::channel::{self, Receiver, Sender};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;
use std::sync::Arc;

/// Complex number with components of type `T`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex<T> {
    pub re: T,
    pub im: T,
}

impl<T> Complex<T> {
    pub fn new(re: T, im: T) -> Self {
        Self { re, im }
    }
}

/// Opaque pointer-sized handle. Never dereferenced by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Handle(pub usize);

/// A dynamic value of any supported category.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    // Scalars
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Usize(usize),
    F32(f32),
    F64(f64),
    Complex64(Complex<f32>),
    Complex128(Complex<f64>),
    String(String),
    Address(usize),
    Handle(Handle),

    // Composites
    Array(ArrayValue),
    Slice(SliceValue),
    Map(MapValue),
    Pointer(PointerValue),
    /// Boxed value of a runtime-chosen type, `None` when empty.
    Dynamic(Option<Box<Value>>),
    Struct(StructValue),

    // Reference-like
    Func(FuncValue),
    Chan(ChanValue),

    /// Value of a type without a traversal rule.
    Opaque(Arc<TypeDescriptor>),
}

fn same_type(a: &TypeDescriptor, b: &TypeDescriptor) -> bool {
    std::ptr::eq(a, b) || a == b
}

impl Value {
    /// Scalar kind, if this is a scalar.
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        let kind = match self {
            Self::Bool(_) => ScalarKind::Bool,
            Self::I8(_) => ScalarKind::I8,
            Self::I16(_) => ScalarKind::I16,
            Self::I32(_) => ScalarKind::I32,
            Self::I64(_) => ScalarKind::I64,
            Self::Isize(_) => ScalarKind::Isize,
            Self::U8(_) => ScalarKind::U8,
            Self::U16(_) => ScalarKind::U16,
            Self::U32(_) => ScalarKind::U32,
            Self::U64(_) => ScalarKind::U64,
            Self::Usize(_) => ScalarKind::Usize,
            Self::F32(_) => ScalarKind::F32,
            Self::F64(_) => ScalarKind::F64,
            Self::Complex64(_) => ScalarKind::Complex64,
            Self::Complex128(_) => ScalarKind::Complex128,
            Self::String(_) => ScalarKind::String,
            Self::Address(_) => ScalarKind::Address,
            Self::Handle(_) => ScalarKind::Handle,
            _ => return None,
        };
        Some(kind)
    }

    /// Check if value is a scalar.
    pub fn is_scalar(&self) -> bool {
        self.scalar_kind().is_some()
    }

    /// Check if value is a nil reference or an empty dynamic box.
    pub fn is_nil(&self) -> bool {
        match self {
            Self::Slice(s) => s.is_nil(),
            Self::Map(m) => m.is_nil(),
            Self::Pointer(p) => p.is_nil(),
            Self::Dynamic(inner) => inner.is_none(),
            Self::Func(f) => f.is_nil(),
            Self::Chan(c) => c.is_nil(),
            _ => false,
        }
    }

    /// Exact runtime type of this value.
    pub fn type_desc(&self) -> Arc<TypeDescriptor> {
        if let Some(kind) = self.scalar_kind() {
            return Arc::new(TypeDescriptor::scalar(kind));
        }
        match self {
            Self::Array(a) => Arc::new(TypeDescriptor::array(a.element.clone(), a.items.len())),
            Self::Slice(s) => Arc::new(TypeDescriptor::slice(s.element.clone())),
            Self::Map(m) => Arc::new(TypeDescriptor::map(m.key.clone(), m.value.clone())),
            Self::Pointer(p) => Arc::new(TypeDescriptor::pointer(p.pointee.clone())),
            Self::Dynamic(_) => Arc::new(TypeDescriptor::dynamic()),
            Self::Struct(s) => s.descriptor.clone(),
            Self::Func(f) => f.signature.clone(),
            Self::Chan(c) => Arc::new(TypeDescriptor::chan(c.element.clone())),
            Self::Opaque(desc) => desc.clone(),
            _ => unreachable!("scalars handled above"),
        }
    }

    /// Check that this value can occupy a slot of type `ty`.
    ///
    /// Only the outermost type is compared; nested values are checked by the
    /// engine as it descends.
    pub fn conforms_to(&self, ty: &TypeDescriptor) -> bool {
        if let Some(kind) = self.scalar_kind() {
            return ty.kind == TypeKind::Scalar(kind);
        }
        match (self, &ty.kind) {
            (Self::Array(a), TypeKind::Array(desc)) => {
                a.items.len() == desc.length && same_type(&a.element, &desc.element)
            }
            (Self::Slice(s), TypeKind::Slice(element)) => same_type(&s.element, element),
            (Self::Map(m), TypeKind::Map(desc)) => {
                same_type(&m.key, &desc.key) && same_type(&m.value, &desc.value)
            }
            (Self::Pointer(p), TypeKind::Pointer(pointee)) => same_type(&p.pointee, pointee),
            (Self::Dynamic(_), TypeKind::Dynamic) => true,
            (Self::Struct(s), TypeKind::Struct(_)) => same_type(&s.descriptor, ty),
            (Self::Func(f), TypeKind::Func(_)) => same_type(&f.signature, ty),
            (Self::Chan(c), TypeKind::Chan(element)) => same_type(&c.element, element),
            (Self::Opaque(desc), TypeKind::Opaque) => same_type(desc, ty),
            _ => false,
        }
    }

    /// Try to get as string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get slice or array elements. Nil slices yield `None`.
    pub fn as_elements(&self) -> Option<&[Value]> {
        match self {
            Self::Array(a) => Some(&a.items),
            Self::Slice(s) => s.items.as_deref(),
            _ => None,
        }
    }

    /// Try to get as struct.
    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Self::Struct(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get struct field.
    pub fn get_field(&self, name: &str) -> Option<&Value> {
        self.as_struct()?.field(name)
    }

    /// Try to get mutable struct field.
    pub fn get_field_mut(&mut self, name: &str) -> Option<&mut Value> {
        match self {
            Self::Struct(s) => s.field_mut(name),
            _ => None,
        }
    }

    /// Try to get the pointee of a non-nil pointer.
    pub fn pointee(&self) -> Option<&Value> {
        match self {
            Self::Pointer(p) => p.target(),
            _ => None,
        }
    }

    /// Try to get the pointee of a non-nil pointer mutably.
    pub fn pointee_mut(&mut self) -> Option<&mut Value> {
        match self {
            Self::Pointer(p) => p.target_mut(),
            _ => None,
        }
    }
}

macro_rules! impl_scalar_accessor {
    ($fn_name:ident, $variant:ident, $ty:ty) => {
        impl Value {
            #[doc = concat!("Try to get as ", stringify!($ty), ".")]
            pub fn $fn_name(&self) -> Option<$ty> {
                match self {
                    Self::$variant(v) => Some(*v),
                    _ => None,
                }
            }
        }
    };
}

impl_scalar_accessor!(as_bool, Bool, bool);
impl_scalar_accessor!(as_i8, I8, i8);
impl_scalar_accessor!(as_i16, I16, i16);
impl_scalar_accessor!(as_i32, I32, i32);
impl_scalar_accessor!(as_i64, I64, i64);
impl_scalar_accessor!(as_isize, Isize, isize);
impl_scalar_accessor!(as_u8, U8, u8);
impl_scalar_accessor!(as_u16, U16, u16);
impl_scalar_accessor!(as_u32, U32, u32);
impl_scalar_accessor!(as_u64, U64, u64);
impl_scalar_accessor!(as_usize, Usize, usize);
impl_scalar_accessor!(as_f32, F32, f32);
impl_scalar_accessor!(as_f64, F64, f64);

// Conversion traits
macro_rules! impl_from_variant {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Self::$variant(v)
            }
        }
    };
}

impl_from_variant!(bool, Bool);
impl_from_variant!(i8, I8);
impl_from_variant!(i16, I16);
impl_from_variant!(i32, I32);
impl_from_variant!(i64, I64);
impl_from_variant!(isize, Isize);
impl_from_variant!(u8, U8);
impl_from_variant!(u16, U16);
impl_from_variant!(u32, U32);
impl_from_variant!(u64, U64);
impl_from_variant!(usize, Usize);
impl_from_variant!(f32, F32);
impl_from_variant!(f64, F64);
impl_from_variant!(Complex<f32>, Complex64);
impl_from_variant!(Complex<f64>, Complex128);
impl_from_variant!(String, String);
impl_from_variant!(Handle, Handle);
impl_from_variant!(ArrayValue, Array);
impl_from_variant!(SliceValue, Slice);
impl_from_variant!(MapValue, Map);
impl_from_variant!(PointerValue, Pointer);
impl_from_variant!(StructValue, Struct);
impl_from_variant!(FuncValue, Func);
impl_from_variant!(ChanValue, Chan);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

/// Fixed-length array payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue {
    /// Element type.
    pub element: Arc<TypeDescriptor>,
    /// Elements; the length is part of the array type.
    pub items: Vec<Value>,
}

impl ArrayValue {
    pub fn new(element: Arc<TypeDescriptor>, items: Vec<Value>) -> Self {
        Self { element, items }
    }
}

/// Variable-length sequence payload.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceValue {
    /// Element type.
    pub element: Arc<TypeDescriptor>,
    /// Elements, `None` for a nil slice.
    pub items: Option<Vec<Value>>,
}

impl SliceValue {
    pub fn new(element: Arc<TypeDescriptor>, items: Vec<Value>) -> Self {
        Self {
            element,
            items: Some(items),
        }
    }

    pub fn nil(element: Arc<TypeDescriptor>) -> Self {
        Self {
            element,
            items: None,
        }
    }

    pub fn is_nil(&self) -> bool {
        self.items.is_none()
    }

    /// Number of elements (0 for nil).
    pub fn len(&self) -> usize {
        self.items.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keyed mapping payload.
#[derive(Debug, Clone, PartialEq)]
pub struct MapValue {
    /// Key type.
    pub key: Arc<TypeDescriptor>,
    /// Value type.
    pub value: Arc<TypeDescriptor>,
    /// Entries, `None` for a nil map.
    pub entries: Option<HashMap<MapKey, Value>>,
}

impl MapValue {
    /// Create an empty (non-nil) map.
    pub fn new(key: Arc<TypeDescriptor>, value: Arc<TypeDescriptor>) -> Self {
        Self {
            key,
            value,
            entries: Some(HashMap::new()),
        }
    }

    pub fn nil(key: Arc<TypeDescriptor>, value: Arc<TypeDescriptor>) -> Self {
        Self {
            key,
            value,
            entries: None,
        }
    }

    pub fn is_nil(&self) -> bool {
        self.entries.is_none()
    }

    /// Number of entries (0 for nil).
    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert an entry, allocating the map if it is nil.
    pub fn insert(&mut self, key: impl Into<Value>, value: impl Into<Value>) -> Option<Value> {
        self.entries
            .get_or_insert_with(HashMap::new)
            .insert(MapKey::new(key.into()), value.into())
    }

    /// Look up an entry.
    pub fn get(&self, key: impl Into<Value>) -> Option<&Value> {
        self.entries.as_ref()?.get(&MapKey::new(key.into()))
    }

    /// Remove all entries. A nil map stays nil.
    pub fn clear(&mut self) {
        if let Some(entries) = &mut self.entries {
            entries.clear();
        }
    }
}

/// Owning reference payload.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerValue {
    /// Pointee type.
    pub pointee: Arc<TypeDescriptor>,
    /// Referent, `None` for a nil pointer.
    pub target: Option<Box<Value>>,
}

impl PointerValue {
    pub fn new(pointee: Arc<TypeDescriptor>, target: Value) -> Self {
        Self {
            pointee,
            target: Some(Box::new(target)),
        }
    }

    pub fn nil(pointee: Arc<TypeDescriptor>) -> Self {
        Self {
            pointee,
            target: None,
        }
    }

    pub fn is_nil(&self) -> bool {
        self.target.is_none()
    }

    pub fn target(&self) -> Option<&Value> {
        self.target.as_deref()
    }

    pub fn target_mut(&mut self) -> Option<&mut Value> {
        self.target.as_deref_mut()
    }
}

/// Aggregate payload.
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
    /// Struct type; its fields line up with `fields` by index.
    pub descriptor: Arc<TypeDescriptor>,
    /// Field values in declaration order.
    pub fields: Vec<Value>,
}

impl StructValue {
    pub fn new(descriptor: Arc<TypeDescriptor>, fields: Vec<Value>) -> Self {
        Self { descriptor, fields }
    }

    /// Get field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        let index = self.descriptor.field_index(name)?;
        self.fields.get(index)
    }

    /// Get mutable field by name.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Value> {
        let index = self.descriptor.field_index(name)?;
        self.fields.get_mut(index)
    }

    /// Set field by name. Returns false if the field does not exist.
    pub fn set_field(&mut self, name: &str, value: impl Into<Value>) -> bool {
        match self.field_mut(name) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }
}

/// Shared callable.
pub type Callable = Arc<dyn Fn(&[Value]) -> Vec<Value> + Send + Sync>;

/// Function payload. Copies share the same callable.
#[derive(Clone)]
pub struct FuncValue {
    /// Function type (kind [`TypeKind::Func`]).
    pub signature: Arc<TypeDescriptor>,
    /// Callable, `None` for a nil function.
    pub func: Option<Callable>,
}

impl FuncValue {
    /// Wrap a callable with the given signature.
    pub fn new<F>(signature: Signature, func: F) -> Self
    where
        F: Fn(&[Value]) -> Vec<Value> + Send + Sync + 'static,
    {
        Self {
            signature: Arc::new(TypeDescriptor::func(signature)),
            func: Some(Arc::new(func)),
        }
    }

    /// Nil function of the given function type.
    pub fn nil(signature: Arc<TypeDescriptor>) -> Self {
        Self {
            signature,
            func: None,
        }
    }

    pub fn is_nil(&self) -> bool {
        self.func.is_none()
    }

    /// Invoke the callable. Returns `None` for a nil function.
    pub fn call(&self, args: &[Value]) -> Option<Vec<Value>> {
        self.func.as_ref().map(|f| f(args))
    }

    /// Check whether two values share the same callable.
    pub fn same_callable(&self, other: &Self) -> bool {
        match (&self.func, &other.func) {
            // Compare data pointers only; vtable addresses are not unique.
            (Some(a), Some(b)) => Arc::as_ptr(a).cast::<()>() == Arc::as_ptr(b).cast::<()>(),
            (None, None) => true,
            _ => false,
        }
    }
}

impl PartialEq for FuncValue {
    fn eq(&self, other: &Self) -> bool {
        self.signature == other.signature && self.same_callable(other)
    }
}

impl fmt::Debug for FuncValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FuncValue")
            .field("signature", &self.signature.name)
            .field("nil", &self.is_nil())
            .finish()
    }
}

/// Both ends of a bounded channel.
#[derive(Debug, Clone)]
pub struct Channel {
    pub sender: Sender<Value>,
    pub receiver: Receiver<Value>,
}

/// Channel payload.
///
/// Equality is structural (element type, capacity, nil-ness) because a
/// copied channel is always a fresh, empty channel.
#[derive(Debug, Clone)]
pub struct ChanValue {
    /// Element type.
    pub element: Arc<TypeDescriptor>,
    /// Buffer capacity; 0 is a rendezvous channel.
    pub capacity: usize,
    /// Channel ends, `None` for a nil channel.
    pub channel: Option<Channel>,
}

impl ChanValue {
    /// Create a fresh channel with the given capacity.
    pub fn new(element: Arc<TypeDescriptor>, capacity: usize) -> Self {
        let (sender, receiver) = channel::bounded(capacity);
        Self {
            element,
            capacity,
            channel: Some(Channel { sender, receiver }),
        }
    }

    pub fn nil(element: Arc<TypeDescriptor>) -> Self {
        Self {
            element,
            capacity: 0,
            channel: None,
        }
    }

    pub fn is_nil(&self) -> bool {
        self.channel.is_none()
    }

    /// Number of queued values.
    pub fn len(&self) -> usize {
        self.channel.as_ref().map_or(0, |c| c.receiver.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fresh channel of the same element type and capacity, nil if `self`
    /// is nil. Queued values are not transferred.
    pub fn replicate(&self) -> Self {
        if self.is_nil() {
            Self::nil(self.element.clone())
        } else {
            Self::new(self.element.clone(), self.capacity)
        }
    }

    /// Check whether two values refer to the same underlying channel.
    pub fn same_channel(&self, other: &Self) -> bool {
        match (&self.channel, &other.channel) {
            (Some(a), Some(b)) => a.sender.same_channel(&b.sender),
            (None, None) => true,
            _ => false,
        }
    }
}

impl PartialEq for ChanValue {
    fn eq(&self, other: &Self) -> bool {
        self.element == other.element
            && self.capacity == other.capacity
            && self.is_nil() == other.is_nil()
    }
}

/// Map key with total equality and hashing.
///
/// Floats compare by bit pattern, callables and channels by identity,
/// everything else structurally. Keys are copied by value, never deeply.
#[derive(Debug, Clone)]
pub struct MapKey(Value);

impl MapKey {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for MapKey {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl PartialEq for MapKey {
    fn eq(&self, other: &Self) -> bool {
        key_eq(&self.0, &other.0)
    }
}

impl Eq for MapKey {}

impl Hash for MapKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        key_hash(&self.0, state);
    }
}

fn key_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::F32(x), Value::F32(y)) => x.to_bits() == y.to_bits(),
        (Value::F64(x), Value::F64(y)) => x.to_bits() == y.to_bits(),
        (Value::Complex64(x), Value::Complex64(y)) => {
            x.re.to_bits() == y.re.to_bits() && x.im.to_bits() == y.im.to_bits()
        }
        (Value::Complex128(x), Value::Complex128(y)) => {
            x.re.to_bits() == y.re.to_bits() && x.im.to_bits() == y.im.to_bits()
        }
        (Value::Array(x), Value::Array(y)) => x.element == y.element && elements_eq(&x.items, &y.items),
        (Value::Slice(x), Value::Slice(y)) => {
            x.element == y.element
                && match (&x.items, &y.items) {
                    (Some(xs), Some(ys)) => elements_eq(xs, ys),
                    (None, None) => true,
                    _ => false,
                }
        }
        (Value::Map(x), Value::Map(y)) => {
            x.key == y.key
                && x.value == y.value
                && match (&x.entries, &y.entries) {
                    (Some(xs), Some(ys)) => {
                        xs.len() == ys.len()
                            && xs
                                .iter()
                                .all(|(k, v)| ys.get(k).is_some_and(|w| key_eq(v, w)))
                    }
                    (None, None) => true,
                    _ => false,
                }
        }
        (Value::Pointer(x), Value::Pointer(y)) => {
            x.pointee == y.pointee
                && match (x.target(), y.target()) {
                    (Some(xv), Some(yv)) => key_eq(xv, yv),
                    (None, None) => true,
                    _ => false,
                }
        }
        (Value::Dynamic(x), Value::Dynamic(y)) => match (x, y) {
            (Some(xv), Some(yv)) => key_eq(xv, yv),
            (None, None) => true,
            _ => false,
        },
        (Value::Struct(x), Value::Struct(y)) => {
            x.descriptor == y.descriptor && elements_eq(&x.fields, &y.fields)
        }
        (Value::Func(x), Value::Func(y)) => x == y,
        (Value::Chan(x), Value::Chan(y)) => x.element == y.element && x.same_channel(y),
        _ => a == b,
    }
}

fn elements_eq(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| key_eq(x, y))
}

fn key_hash<H: Hasher>(value: &Value, state: &mut H) {
    mem::discriminant(value).hash(state);
    match value {
        Value::Bool(v) => v.hash(state),
        Value::I8(v) => v.hash(state),
        Value::I16(v) => v.hash(state),
        Value::I32(v) => v.hash(state),
        Value::I64(v) => v.hash(state),
        Value::Isize(v) => v.hash(state),
        Value::U8(v) => v.hash(state),
        Value::U16(v) => v.hash(state),
        Value::U32(v) => v.hash(state),
        Value::U64(v) => v.hash(state),
        Value::Usize(v) | Value::Address(v) => v.hash(state),
        Value::F32(v) => v.to_bits().hash(state),
        Value::F64(v) => v.to_bits().hash(state),
        Value::Complex64(v) => {
            v.re.to_bits().hash(state);
            v.im.to_bits().hash(state);
        }
        Value::Complex128(v) => {
            v.re.to_bits().hash(state);
            v.im.to_bits().hash(state);
        }
        Value::String(v) => v.hash(state),
        Value::Handle(v) => v.hash(state),
        Value::Array(a) => a.items.iter().for_each(|v| key_hash(v, state)),
        Value::Slice(s) => {
            s.items.is_some().hash(state);
            s.items.iter().flatten().for_each(|v| key_hash(v, state));
        }
        // Entry order is unspecified, hash the size only.
        Value::Map(m) => m.entries.as_ref().map(HashMap::len).hash(state),
        Value::Pointer(p) => {
            if let Some(target) = p.target() {
                key_hash(target, state);
            }
        }
        Value::Dynamic(inner) => {
            if let Some(inner) = inner {
                key_hash(inner, state);
            }
        }
        Value::Struct(s) => {
            s.descriptor.name.hash(state);
            s.fields.iter().for_each(|v| key_hash(v, state));
        }
        Value::Func(f) => f.signature.name.hash(state),
        Value::Chan(c) => c.capacity.hash(state),
        Value::Opaque(desc) => desc.name.hash(state),
    }
}
