// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bridge between Rust types and the dynamic value model.

use crate::error::ValueError;
use crate::types::{ScalarKind, TypeDescriptor};
use crate::value::{
    ArrayValue, Complex, Handle, MapKey, MapValue, PointerValue, SliceValue, Value,
};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

/// Rust types with a runtime type descriptor and a [`Value`] representation.
///
/// Implemented for scalars, raw pointers (as addresses), `String`, `Vec<T>`,
/// `[T; N]`, `HashMap<K, V>`, `Option<Box<T>>` (pointers) and
/// `Option<Vec<T>>` / `Option<HashMap<K, V>>` (nil-able slices and maps).
/// Structs opt in through [`reflect_struct!`](crate::reflect_struct).
pub trait Reflect: Sized {
    /// Runtime type of `Self`.
    fn type_descriptor() -> Arc<TypeDescriptor>;

    /// Lift `self` into the value model.
    fn to_value(&self) -> Value;

    /// Lower a value back into `Self`.
    fn from_value(value: &Value) -> Result<Self, ValueError>;
}

macro_rules! impl_reflect_scalar {
    ($ty:ty, $variant:ident) => {
        impl Reflect for $ty {
            fn type_descriptor() -> Arc<TypeDescriptor> {
                Arc::new(TypeDescriptor::scalar(ScalarKind::$variant))
            }

            fn to_value(&self) -> Value {
                Value::$variant(*self)
            }

            fn from_value(value: &Value) -> Result<Self, ValueError> {
                match value {
                    Value::$variant(v) => Ok(*v),
                    other => Err(ValueError::type_mismatch(
                        ScalarKind::$variant.name(),
                        other,
                    )),
                }
            }
        }
    };
}

impl_reflect_scalar!(bool, Bool);
impl_reflect_scalar!(i8, I8);
impl_reflect_scalar!(i16, I16);
impl_reflect_scalar!(i32, I32);
impl_reflect_scalar!(i64, I64);
impl_reflect_scalar!(isize, Isize);
impl_reflect_scalar!(u8, U8);
impl_reflect_scalar!(u16, U16);
impl_reflect_scalar!(u32, U32);
impl_reflect_scalar!(u64, U64);
impl_reflect_scalar!(usize, Usize);
impl_reflect_scalar!(f32, F32);
impl_reflect_scalar!(f64, F64);
impl_reflect_scalar!(Complex<f32>, Complex64);
impl_reflect_scalar!(Complex<f64>, Complex128);
impl_reflect_scalar!(Handle, Handle);

impl Reflect for String {
    fn type_descriptor() -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::scalar(ScalarKind::String))
    }

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(ValueError::type_mismatch("string", other)),
        }
    }
}

// Raw pointers are addresses: copied by value, never dereferenced.
macro_rules! impl_reflect_address {
    ($($ptr:tt)+) => {
        impl<T> Reflect for $($ptr)+ T {
            fn type_descriptor() -> Arc<TypeDescriptor> {
                Arc::new(TypeDescriptor::scalar(ScalarKind::Address))
            }

            fn to_value(&self) -> Value {
                Value::Address(*self as usize)
            }

            fn from_value(value: &Value) -> Result<Self, ValueError> {
                match value {
                    Value::Address(addr) => Ok(*addr as $($ptr)+ T),
                    other => Err(ValueError::type_mismatch(ScalarKind::Address.name(), other)),
                }
            }
        }
    };
}

impl_reflect_address!(*const);
impl_reflect_address!(*mut);

fn slice_items<T: Reflect>(value: &Value) -> Result<Option<Vec<T>>, ValueError> {
    match value {
        Value::Slice(slice) => slice
            .items
            .as_ref()
            .map(|items| items.iter().map(T::from_value).collect())
            .transpose(),
        other => Err(ValueError::type_mismatch(
            TypeDescriptor::slice(T::type_descriptor()).name,
            other,
        )),
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn type_descriptor() -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::slice(T::type_descriptor()))
    }

    fn to_value(&self) -> Value {
        let items = self.iter().map(Reflect::to_value).collect();
        Value::Slice(SliceValue::new(T::type_descriptor(), items))
    }

    /// A nil slice lowers to an empty vector.
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        Ok(slice_items(value)?.unwrap_or_default())
    }
}

impl<T: Reflect> Reflect for Option<Vec<T>> {
    fn type_descriptor() -> Arc<TypeDescriptor> {
        Vec::<T>::type_descriptor()
    }

    fn to_value(&self) -> Value {
        match self {
            Some(items) => items.to_value(),
            None => Value::Slice(SliceValue::nil(T::type_descriptor())),
        }
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        slice_items(value)
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn type_descriptor() -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::array(T::type_descriptor(), N))
    }

    fn to_value(&self) -> Value {
        let items = self.iter().map(Reflect::to_value).collect();
        Value::Array(ArrayValue::new(T::type_descriptor(), items))
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        let Value::Array(array) = value else {
            return Err(ValueError::type_mismatch(
                TypeDescriptor::array(T::type_descriptor(), N).name,
                value,
            ));
        };
        let got = array.items.len();
        let items = array
            .items
            .iter()
            .map(T::from_value)
            .collect::<Result<Vec<_>, _>>()?;
        items
            .try_into()
            .map_err(|_| ValueError::LengthMismatch { expected: N, got })
    }
}

fn map_entries<K, V>(value: &Value) -> Result<Option<HashMap<K, V>>, ValueError>
where
    K: Reflect + Eq + Hash,
    V: Reflect,
{
    match value {
        Value::Map(map) => map
            .entries
            .as_ref()
            .map(|entries| {
                entries
                    .iter()
                    .map(|(k, v)| Ok((K::from_value(k.value())?, V::from_value(v)?)))
                    .collect()
            })
            .transpose(),
        other => Err(ValueError::type_mismatch(
            TypeDescriptor::map(K::type_descriptor(), V::type_descriptor()).name,
            other,
        )),
    }
}

impl<K, V> Reflect for HashMap<K, V>
where
    K: Reflect + Eq + Hash,
    V: Reflect,
{
    fn type_descriptor() -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::map(K::type_descriptor(), V::type_descriptor()))
    }

    fn to_value(&self) -> Value {
        let entries = self
            .iter()
            .map(|(k, v)| (MapKey::new(k.to_value()), v.to_value()))
            .collect();
        Value::Map(MapValue {
            key: K::type_descriptor(),
            value: V::type_descriptor(),
            entries: Some(entries),
        })
    }

    /// A nil map lowers to an empty map.
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        Ok(map_entries(value)?.unwrap_or_default())
    }
}

impl<K, V> Reflect for Option<HashMap<K, V>>
where
    K: Reflect + Eq + Hash,
    V: Reflect,
{
    fn type_descriptor() -> Arc<TypeDescriptor> {
        HashMap::<K, V>::type_descriptor()
    }

    fn to_value(&self) -> Value {
        match self {
            Some(map) => map.to_value(),
            None => Value::Map(MapValue::nil(K::type_descriptor(), V::type_descriptor())),
        }
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        map_entries(value)
    }
}

impl<T: Reflect> Reflect for Option<Box<T>> {
    fn type_descriptor() -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::pointer(T::type_descriptor()))
    }

    fn to_value(&self) -> Value {
        match self {
            Some(target) => Value::Pointer(PointerValue::new(T::type_descriptor(), target.to_value())),
            None => Value::Pointer(PointerValue::nil(T::type_descriptor())),
        }
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Pointer(ptr) => ptr
                .target()
                .map(|target| T::from_value(target).map(Box::new))
                .transpose(),
            other => Err(ValueError::type_mismatch(
                TypeDescriptor::pointer(T::type_descriptor()).name,
                other,
            )),
        }
    }
}

/// Field values of a struct value of exactly type `descriptor`.
#[doc(hidden)]
pub fn expect_struct_fields<'a>(
    value: &'a Value,
    descriptor: &TypeDescriptor,
) -> Result<&'a [Value], ValueError> {
    match value {
        Value::Struct(s) if *s.descriptor == *descriptor => Ok(&s.fields),
        other => Err(ValueError::type_mismatch(descriptor.name.clone(), other)),
    }
}

/// Lower the next field of a struct being decoded.
#[doc(hidden)]
pub fn next_field<'a, T, I>(fields: &mut I, name: &str) -> Result<T, ValueError>
where
    T: Reflect,
    I: Iterator<Item = &'a Value>,
{
    let value = fields
        .next()
        .ok_or_else(|| ValueError::MissingField(name.to_string()))?;
    T::from_value(value)
}
