// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Recursive deep-copy traversal.
//!
//! Dispatch is an exhaustive match over [`Value`]. No state is carried
//! between recursive calls, so cyclic structures are not supported.

use crate::cloner::Cloner;
use crate::error::CloneError;
use crate::types::{TypeDescriptor, TypeKind};
use crate::value::{
    ArrayValue, MapValue, PointerValue, SliceValue, StructValue, Value,
};
use std::collections::HashMap;

impl Cloner {
    /// Deep-copy `source` into the `destination` slot.
    ///
    /// The destination must already hold a value of the same type as the
    /// source. On success it holds a copy sharing no mutable substructure
    /// with the source; on failure it is left untouched.
    pub fn copy(&self, source: &Value, destination: &mut Value) -> Result<(), CloneError> {
        check_destination(source, destination)?;
        *destination = self.copy_value(source)?;
        Ok(())
    }

    /// Deep-copy a value into a fresh allocation.
    pub fn copy_value(&self, source: &Value) -> Result<Value, CloneError> {
        match source {
            Value::Bool(_)
            | Value::I8(_)
            | Value::I16(_)
            | Value::I32(_)
            | Value::I64(_)
            | Value::Isize(_)
            | Value::U8(_)
            | Value::U16(_)
            | Value::U32(_)
            | Value::U64(_)
            | Value::Usize(_)
            | Value::F32(_)
            | Value::F64(_)
            | Value::Complex64(_)
            | Value::Complex128(_)
            | Value::String(_)
            | Value::Address(_)
            | Value::Handle(_) => Ok(source.clone()),
            Value::Array(array) => self.copy_array(array),
            // Capacity only, queued values stay behind.
            Value::Chan(chan) => Ok(Value::Chan(chan.replicate())),
            Value::Func(func) => Ok(Value::Func(func.clone())),
            Value::Dynamic(None) => Ok(Value::Dynamic(None)),
            Value::Dynamic(Some(inner)) => {
                let copied = self.copy_value(inner)?;
                Ok(Value::Dynamic(Some(Box::new(copied))))
            }
            Value::Map(map) => self.copy_map(map),
            Value::Pointer(ptr) => self.copy_pointer(ptr),
            Value::Slice(slice) => self.copy_slice(slice),
            Value::Struct(value) => self.copy_struct(source, value),
            Value::Opaque(desc) => Err(CloneError::UnknownCategory(desc.name.clone())),
        }
    }

    /// Copy a value that is about to occupy a slot of type `slot`.
    fn copy_slot(&self, slot: &TypeDescriptor, source: &Value) -> Result<Value, CloneError> {
        check_slot(slot, source)?;
        self.copy_value(source)
    }

    fn copy_array(&self, array: &ArrayValue) -> Result<Value, CloneError> {
        let items = array
            .items
            .iter()
            .map(|item| self.copy_slot(&array.element, item))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::Array(ArrayValue::new(array.element.clone(), items)))
    }

    fn copy_map(&self, map: &MapValue) -> Result<Value, CloneError> {
        let Some(entries) = &map.entries else {
            return Ok(Value::Map(MapValue::nil(map.key.clone(), map.value.clone())));
        };
        let mut copied = HashMap::with_capacity(entries.len());
        for (key, value) in entries {
            check_slot(&map.key, key.value())?;
            copied.insert(key.clone(), self.copy_slot(&map.value, value)?);
        }
        Ok(Value::Map(MapValue {
            key: map.key.clone(),
            value: map.value.clone(),
            entries: Some(copied),
        }))
    }

    fn copy_pointer(&self, ptr: &PointerValue) -> Result<Value, CloneError> {
        let copied = match ptr.target() {
            Some(target) => {
                PointerValue::new(ptr.pointee.clone(), self.copy_slot(&ptr.pointee, target)?)
            }
            None => PointerValue::nil(ptr.pointee.clone()),
        };
        Ok(Value::Pointer(copied))
    }

    fn copy_slice(&self, slice: &SliceValue) -> Result<Value, CloneError> {
        let Some(items) = &slice.items else {
            return Ok(Value::Slice(SliceValue::nil(slice.element.clone())));
        };
        let copied = items
            .iter()
            .map(|item| self.copy_slot(&slice.element, item))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::Slice(SliceValue::new(slice.element.clone(), copied)))
    }

    fn copy_struct(&self, source: &Value, value: &StructValue) -> Result<Value, CloneError> {
        let descriptor = &value.descriptor;

        if let Some(copier) = self.registry().lookup(descriptor) {
            log::trace!("[Cloner::copy] custom copier for {}", descriptor.name);
            let copied = copier(source)?;
            check_slot(descriptor, &copied)?;
            return Ok(copied);
        }

        let fields = descriptor
            .fields()
            .ok_or_else(|| CloneError::type_mismatch("struct", descriptor.name.clone()))?;
        if fields.len() != value.fields.len() {
            return Err(CloneError::type_mismatch(
                descriptor.name.clone(),
                format!("struct with {} fields", value.fields.len()),
            ));
        }

        let mut copied = Vec::with_capacity(fields.len());
        for (field, item) in fields.iter().zip(&value.fields) {
            if !field.exported {
                log::trace!(
                    "[Cloner::copy] {}.{} is private, leaving zero value",
                    descriptor.name,
                    field.name
                );
                copied.push(field.type_desc.zero_value());
                continue;
            }
            copied.push(self.copy_slot(&field.type_desc, item)?);
        }
        Ok(Value::Struct(StructValue::new(descriptor.clone(), copied)))
    }
}

fn check_slot(slot: &TypeDescriptor, value: &Value) -> Result<(), CloneError> {
    if let (Value::Func(func), TypeKind::Func(_)) = (value, &slot.kind) {
        if *func.signature != *slot {
            return Err(CloneError::SignatureMismatch {
                expected: slot.name.clone(),
                found: func.signature.name.clone(),
            });
        }
        return Ok(());
    }
    if value.conforms_to(slot) {
        Ok(())
    } else {
        Err(CloneError::type_mismatch(
            slot.name.clone(),
            value.type_desc().name.clone(),
        ))
    }
}

fn check_destination(source: &Value, destination: &Value) -> Result<(), CloneError> {
    check_slot(&destination.type_desc(), source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldDescriptor, ScalarKind, Signature};
    use crate::value::{ChanValue, FuncValue};
    use std::sync::Arc;

    fn scalar(kind: ScalarKind) -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::scalar(kind))
    }

    fn cloner() -> Cloner {
        Cloner::builder().builtins(false).build()
    }

    #[test]
    fn test_scalar_copy() {
        let mut dst = Value::I32(0);
        cloner().copy(&Value::I32(123), &mut dst).expect("copy");
        assert_eq!(dst, Value::I32(123));
    }

    #[test]
    fn test_mismatch_leaves_destination() {
        let mut dst = Value::String("keep".into());
        let err = cloner().copy(&Value::I32(1), &mut dst).unwrap_err();
        assert!(matches!(err, CloneError::TypeMismatch { .. }));
        assert_eq!(dst, Value::String("keep".into()));
    }

    #[test]
    fn test_ill_typed_element_rejected() {
        let i32_type = scalar(ScalarKind::I32);
        let src = Value::Slice(SliceValue::new(
            i32_type.clone(),
            vec![Value::I32(1), Value::String("two".into())],
        ));
        let mut dst = Value::Slice(SliceValue::nil(i32_type));
        let err = cloner().copy(&src, &mut dst).unwrap_err();
        assert!(matches!(err, CloneError::TypeMismatch { ref found, .. } if found == "string"));
        assert!(dst.is_nil());
    }

    #[test]
    fn test_opaque_is_unknown_category() {
        let opaque = Arc::new(TypeDescriptor::opaque("ffi::Context"));
        let src = Value::Opaque(opaque.clone());
        let err = cloner().copy_value(&src).unwrap_err();
        assert!(matches!(err, CloneError::UnknownCategory(ref name) if name == "ffi::Context"));

        // Nested inside an aggregate the failure aborts the whole copy.
        let desc = Arc::new(TypeDescriptor::struct_type(
            "Holder",
            vec![FieldDescriptor::new("ctx", opaque.clone())],
        ));
        let holder = Value::Struct(StructValue::new(desc, vec![src]));
        assert!(cloner().copy_value(&holder).is_err());
    }

    #[test]
    fn test_private_opaque_field_is_skipped() {
        let opaque = Arc::new(TypeDescriptor::opaque("ffi::Context"));
        let desc = Arc::new(TypeDescriptor::struct_type(
            "Holder",
            vec![
                FieldDescriptor::new("id", scalar(ScalarKind::U32)),
                FieldDescriptor::private("ctx", opaque.clone()),
            ],
        ));
        let holder = Value::Struct(StructValue::new(
            desc,
            vec![Value::U32(9), Value::Opaque(opaque)],
        ));
        let copied = cloner().copy_value(&holder).expect("copy");
        assert_eq!(copied.get_field("id"), Some(&Value::U32(9)));
    }

    #[test]
    fn test_func_shared_and_signature_checked() {
        let i32_type = scalar(ScalarKind::I32);
        let double = FuncValue::new(Signature::new(vec![i32_type.clone()], vec![i32_type.clone()]), |args| {
            vec![Value::I32(args[0].as_i32().unwrap_or(0) * 2)]
        });
        let src = Value::Func(double.clone());

        let mut dst = Value::Func(FuncValue::nil(double.signature.clone()));
        cloner().copy(&src, &mut dst).expect("copy");
        match &dst {
            Value::Func(f) => {
                assert!(f.same_callable(&double));
                assert_eq!(f.call(&[Value::I32(21)]), Some(vec![Value::I32(42)]));
            }
            other => panic!("expected func, got {:?}", other),
        }

        let other_sig = Arc::new(TypeDescriptor::func(Signature::new(vec![], vec![i32_type])));
        let mut dst = Value::Func(FuncValue::nil(other_sig));
        let err = cloner().copy(&src, &mut dst).unwrap_err();
        assert!(matches!(err, CloneError::SignatureMismatch { .. }));
    }

    #[test]
    fn test_nested_func_signature_checked() {
        let i32_type = scalar(ScalarKind::I32);
        let handler_sig = Arc::new(TypeDescriptor::func(Signature::new(
            vec![i32_type.clone()],
            Vec::new(),
        )));
        let desc = Arc::new(TypeDescriptor::struct_type(
            "Hook",
            vec![FieldDescriptor::new("on_event", handler_sig.clone())],
        ));

        // A callable whose signature does not match its field
        let wrong = FuncValue::new(Signature::new(Vec::new(), vec![i32_type.clone()]), |_| {
            vec![Value::I32(0)]
        });
        let src = Value::Struct(StructValue::new(desc.clone(), vec![Value::Func(wrong)]));
        let err = cloner().copy_value(&src).unwrap_err();
        assert!(matches!(
            err,
            CloneError::SignatureMismatch { ref expected, .. } if *expected == handler_sig.name
        ));

        // Inside a slice as well
        let handlers = Value::Slice(SliceValue::new(
            handler_sig.clone(),
            vec![Value::Func(FuncValue::new(Signature::default(), |_| Vec::new()))],
        ));
        assert!(matches!(
            cloner().copy_value(&handlers),
            Err(CloneError::SignatureMismatch { .. })
        ));

        let right = FuncValue::new(Signature::new(vec![i32_type], Vec::new()), |_| Vec::new());
        let src = Value::Struct(StructValue::new(desc, vec![Value::Func(right)]));
        assert_eq!(cloner().copy_value(&src).expect("copy"), src);
    }

    #[test]
    fn test_chan_replicates_capacity_only() {
        let chan = ChanValue::new(scalar(ScalarKind::String), 3);
        if let Some(ends) = &chan.channel {
            ends.sender.send(Value::from("queued")).expect("send");
        }
        let copied = cloner().copy_value(&Value::Chan(chan.clone())).expect("copy");
        let Value::Chan(copied) = copied else {
            panic!("expected chan");
        };
        assert_eq!(copied.capacity, 3);
        assert!(copied.is_empty());
        assert!(!copied.same_channel(&chan));
        assert_eq!(chan.len(), 1);
    }

    #[test]
    fn test_dynamic_copy() {
        let i32_type = scalar(ScalarKind::I32);
        let inner = Value::Slice(SliceValue::new(i32_type, vec![Value::I32(1)]));
        let src = Value::Dynamic(Some(Box::new(inner.clone())));

        // Any dynamic destination accepts any boxed type.
        let mut dst = Value::Dynamic(Some(Box::new(Value::from(""))));
        cloner().copy(&src, &mut dst).expect("copy");
        assert_eq!(dst, src);

        let mut dst = Value::Dynamic(Some(Box::new(Value::from(""))));
        cloner().copy(&Value::Dynamic(None), &mut dst).expect("copy");
        assert!(dst.is_nil());
    }

    #[test]
    fn test_custom_copier_must_return_same_type() {
        let desc = Arc::new(TypeDescriptor::struct_type("Unit", Vec::new()));
        let cloner = Cloner::builder()
            .builtins(false)
            .register_fn(desc.clone(), |_| Ok(Value::Bool(true)))
            .build();
        let src = Value::Struct(StructValue::new(desc, Vec::new()));
        let err = cloner.copy_value(&src).unwrap_err();
        assert!(matches!(err, CloneError::TypeMismatch { .. }));
    }

    #[test]
    fn test_field_count_mismatch() {
        let desc = Arc::new(TypeDescriptor::struct_type(
            "Pair",
            vec![
                FieldDescriptor::new("a", scalar(ScalarKind::I32)),
                FieldDescriptor::new("b", scalar(ScalarKind::I32)),
            ],
        ));
        let src = Value::Struct(StructValue::new(desc, vec![Value::I32(1)]));
        assert!(cloner().copy_value(&src).is_err());
    }
}
