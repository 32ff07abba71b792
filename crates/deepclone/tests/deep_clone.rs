// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Deep Clone Scenario Tests
//!
//! Exercise the public API the way a caller would:
//! - Statically-typed copies of Rust values
//! - Type-erased copies through pointer values
//! - Custom copiers and the built-in timestamp copier

use deepclone::{
    CloneError, Cloner, MapValue, PointerValue, Reflect, ScalarKind, StructBuilder, StructValue,
    TypeDescriptor, Value,
};
use std::collections::HashMap;
use std::sync::Arc;

deepclone::reflect_struct! {
    #[derive(Debug, Clone, PartialEq, Default)]
    struct Account {
        pub owner: String,
        pub balance: i64,
        pub history: Vec<i64>,
        pin: u16,
    }
}

deepclone::reflect_struct! {
    #[derive(Debug, Clone, PartialEq, Default)]
    struct Ledger {
        pub accounts: Vec<Account>,
        pub index: HashMap<String, usize>,
    }
}

deepclone::reflect_struct! {
    #[derive(Debug, Clone, PartialEq, Default)]
    struct ListNode {
        pub value: i32,
        pub next: Option<Box<ListNode>>,
    }
}

deepclone::reflect_struct! {
    #[derive(Debug, Clone, PartialEq, Default)]
    struct TreeNode {
        pub key: u32,
        pub left: Option<Box<TreeNode>>,
        pub right: Option<Box<TreeNode>>,
        depth: u8,
    }
}

/// Run `f` on a worker thread, failing instead of hanging.
fn within_timeout<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let _ = tx.send(f());
    });
    rx.recv_timeout(std::time::Duration::from_secs(10))
        .expect("copy did not finish")
}

fn list(values: &[i32]) -> Option<Box<ListNode>> {
    values.iter().rev().fold(None, |next, &value| {
        Some(Box::new(ListNode { value, next }))
    })
}

fn leaf(key: u32) -> Option<Box<TreeNode>> {
    Some(Box::new(TreeNode {
        key,
        depth: 1,
        ..TreeNode::default()
    }))
}

fn account(owner: &str, balance: i64) -> Account {
    Account {
        owner: owner.to_string(),
        balance,
        history: vec![balance],
        pin: 1234,
    }
}

#[test]
fn test_clone_integer() {
    let mut dst = 0i32;
    deepclone::clone_into(&123i32, &mut dst).expect("clone");
    assert_eq!(dst, 123);
}

#[test]
fn test_clone_sequence_is_independent() {
    let mut src = vec![1, 2, 3];
    let mut dst = Vec::new();
    deepclone::clone_into(&src, &mut dst).expect("clone");

    src[1] = 222;
    assert_eq!(dst, vec![1, 2, 3]);
}

#[test]
fn test_clone_mapping_is_independent() {
    let mut src = HashMap::new();
    src.insert("a".to_string(), "aaa".to_string());
    src.insert("b".to_string(), "bbb".to_string());

    let mut dst = HashMap::new();
    deepclone::clone_into(&src, &mut dst).expect("clone");

    src.clear();
    assert_eq!(dst.len(), 2);
    assert_eq!(dst.get("a").map(String::as_str), Some("aaa"));
    assert_eq!(dst.get("b").map(String::as_str), Some("bbb"));
}

#[test]
fn test_clone_pointer_allocates_fresh_referent() {
    let mut src: Option<Box<i64>> = Some(Box::new(123));
    let mut dst: Option<Box<i64>> = None;
    deepclone::clone_into(&src, &mut dst).expect("clone");

    if let Some(target) = src.as_mut() {
        **target = 456;
    }
    assert_eq!(dst.as_deref(), Some(&123));
}

#[test]
fn test_pointer_value_written_through_shared_referent() {
    // Through the value model: the destination initially holds the same
    // referent value as the source, and the copy must not alias it.
    let i64_type = Arc::new(TypeDescriptor::scalar(ScalarKind::I64));
    let mut src = Value::Pointer(PointerValue::new(i64_type.clone(), Value::I64(123)));
    let mut dst = src.clone();

    Cloner::new().copy(&src, &mut dst).expect("copy");
    if let Some(target) = src.pointee_mut() {
        *target = Value::I64(456);
    }
    assert_eq!(dst.pointee(), Some(&Value::I64(123)));
}

#[test]
fn test_nil_references_stay_nil() {
    let src: (Option<Vec<u8>>, Option<HashMap<u8, u8>>, Option<Box<u8>>) = (None, None, None);

    let mut slice = Some(vec![9]);
    deepclone::clone_into(&src.0, &mut slice).expect("clone");
    assert!(slice.is_none());

    let mut map = Some(HashMap::from([(1, 1)]));
    deepclone::clone_into(&src.1, &mut map).expect("clone");
    assert!(map.is_none());

    let mut ptr = Some(Box::new(1));
    deepclone::clone_into(&src.2, &mut ptr).expect("clone");
    assert!(ptr.is_none());

    // Empty but non-nil survives as non-nil
    let empty: Option<Vec<u8>> = Some(Vec::new());
    let mut dst = None;
    deepclone::clone_into(&empty, &mut dst).expect("clone");
    assert_eq!(dst, Some(Vec::new()));
}

#[test]
fn test_clone_linked_list() {
    let src = *list(&[1, 2, 3]).expect("non-empty list");
    let (src, dst) = within_timeout(move || {
        let mut dst = ListNode::default();
        deepclone::clone_into(&src, &mut dst).expect("clone");
        (src, dst)
    });
    assert_eq!(dst, src);

    let mut values = Vec::new();
    let mut node = Some(&dst);
    while let Some(n) = node {
        values.push(n.value);
        node = n.next.as_deref();
    }
    assert_eq!(values, vec![1, 2, 3]);
}

#[test]
fn test_clone_binary_tree() {
    let src = TreeNode {
        key: 2,
        left: leaf(1),
        right: Some(Box::new(TreeNode {
            key: 4,
            left: leaf(3),
            right: None,
            depth: 2,
        })),
        depth: 3,
    };
    let copy = within_timeout(move || Cloner::new().deep_clone(&src)).expect("clone");

    assert_eq!(copy.key, 2);
    assert_eq!(copy.left.as_ref().map(|n| n.key), Some(1));
    let right = copy.right.as_deref().expect("right subtree");
    assert_eq!(right.left.as_ref().map(|n| n.key), Some(3));
    assert!(right.right.is_none());
    // Private depth is reset at every level
    assert_eq!((copy.depth, right.depth), (0, 0));
}

#[test]
fn test_clone_dyn_runtime_recursive_type() {
    let node = Arc::new(TypeDescriptor::declare_struct("Node"));
    let node = StructBuilder::new("Node")
        .field("value", ScalarKind::I32)
        .pointer_field("next", node.clone())
        .define(&node)
        .expect("define");
    let node_ptr = Arc::new(TypeDescriptor::pointer(node.clone()));

    let make = |value: i32, next: Value| {
        Value::Struct(StructValue::new(node.clone(), vec![Value::I32(value), next]))
    };
    let tail = Value::Pointer(PointerValue::nil(node.clone()));
    let two = Value::Pointer(PointerValue::new(node.clone(), make(2, tail)));
    let head = make(1, two);

    let src = Value::Pointer(PointerValue::new(node.clone(), head.clone()));
    let mut dst = Value::Pointer(PointerValue::new(node.clone(), node.zero_value()));
    let copied = within_timeout(move || {
        deepclone::clone_dyn(&src, &mut dst).map(|()| dst)
    })
    .expect("clone");

    assert_eq!(copied.pointee(), Some(&head));
    let second = copied
        .pointee()
        .and_then(|n| n.get_field("next"))
        .expect("next field");
    assert!(second.conforms_to(&node_ptr));
    assert_eq!(
        second.pointee().and_then(|n| n.get_field("value")),
        Some(&Value::I32(2))
    );
}

#[test]
fn test_private_fields_left_at_zero() {
    let src = account("ada", 100);
    let copy = Cloner::new().deep_clone(&src).expect("clone");
    assert_eq!(copy.owner, "ada");
    assert_eq!(copy.balance, 100);
    assert_eq!(copy.history, vec![100]);
    assert_eq!(copy.pin, 0);
}

#[test]
fn test_nested_reflected_structs() {
    let src = Ledger {
        accounts: vec![account("ada", 10), account("grace", 20)],
        index: HashMap::from([("ada".to_string(), 0), ("grace".to_string(), 1)]),
    };
    let mut dst = Ledger::default();
    Cloner::new().clone_into(&src, &mut dst).expect("clone");

    assert_eq!(dst.index, src.index);
    assert_eq!(dst.accounts.len(), 2);
    assert!(dst.accounts.iter().all(|a| a.pin == 0));
    assert_eq!(dst.accounts[1].owner, "grace");
}

#[test]
fn test_registered_copier_replaces_generic_traversal() {
    let src = account("ada", 100);

    let generic = Cloner::new();
    assert_eq!(generic.deep_clone(&src).expect("clone").pin, 0);

    // Keeps the pin and drops the history
    let cloner = Cloner::builder()
        .register::<Account, _>(|a| {
            Ok(Account {
                owner: a.owner.clone(),
                balance: a.balance,
                history: Vec::new(),
                pin: a.pin,
            })
        })
        .build();
    let copy = cloner.deep_clone(&src).expect("clone");
    assert_eq!(copy.pin, 1234);
    assert!(copy.history.is_empty());

    // Applies inside containers too
    let ledger = Ledger {
        accounts: vec![src],
        index: HashMap::new(),
    };
    let copy = cloner.deep_clone(&ledger).expect("clone");
    assert_eq!(copy.accounts[0].pin, 1234);
}

#[test]
fn test_later_registration_wins() {
    let cloner = Cloner::builder()
        .register::<Account, _>(|_| Ok(account("first", 1)))
        .register::<Account, _>(|_| Ok(account("second", 2)))
        .build();
    let copy = cloner.deep_clone(&account("ada", 0)).expect("clone");
    assert_eq!(copy.owner, "second");
}

#[test]
fn test_copier_error_propagates() {
    let cloner = Cloner::builder()
        .register::<Account, _>(|a| {
            Err(CloneError::custom(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("account {} is frozen", a.owner),
            )))
        })
        .build();

    let ledger = Ledger {
        accounts: vec![account("ada", 0)],
        index: HashMap::new(),
    };
    let mut dst = Ledger::default();
    let err = cloner.clone_into(&ledger, &mut dst).unwrap_err();
    assert!(err.to_string().contains("frozen"));
    assert!(!err.is_usage_error());
    assert_eq!(dst, Ledger::default());
}

#[cfg(feature = "chrono")]
#[test]
fn test_builtin_timestamp_copier() {
    use chrono::{DateTime, TimeZone, Utc};

    let ts = Utc
        .with_ymd_and_hms(2024, 3, 1, 12, 30, 0)
        .single()
        .expect("valid date");

    let copy = Cloner::new().deep_clone(&ts).expect("clone");
    assert_eq!(copy, ts);

    // Without the built-in the private representation is not copied
    let bare = Cloner::builder().builtins(false).build();
    let copy = bare.deep_clone(&ts).expect("clone");
    assert_eq!(copy, DateTime::<Utc>::UNIX_EPOCH);

    assert!(Cloner::new()
        .registry()
        .type_names()
        .contains(&deepclone::TIMESTAMP_TYPE_NAME.to_string()));
}

#[test]
fn test_type_mismatch_leaves_destination() {
    let point = Arc::new(
        StructBuilder::new("Point")
            .field("x", ScalarKind::I32)
            .build(),
    );
    let other = Arc::new(
        StructBuilder::new("Other")
            .field("x", ScalarKind::I32)
            .build(),
    );
    let src = Value::Struct(StructValue::new(point, vec![Value::I32(1)]));
    let mut dst = Value::Struct(StructValue::new(other, vec![Value::I32(5)]));
    let before = dst.clone();

    let err = Cloner::new().copy(&src, &mut dst).unwrap_err();
    assert!(matches!(err, CloneError::TypeMismatch { .. }));
    assert!(err.is_usage_error());
    assert_eq!(dst, before);
}

#[test]
fn test_clone_dyn_validates_arguments() {
    let i32_type = Arc::new(TypeDescriptor::scalar(ScalarKind::I32));
    let string_type = Arc::new(TypeDescriptor::scalar(ScalarKind::String));
    let src = Value::Pointer(PointerValue::new(i32_type.clone(), Value::I32(1)));

    // Source must be a reference
    let mut dst = Value::Pointer(PointerValue::new(i32_type, Value::I32(0)));
    assert!(matches!(
        deepclone::clone_dyn(&Value::I32(1), &mut dst),
        Err(CloneError::SourceNotReference)
    ));

    // Destination must be a writable reference
    let mut not_ref = Value::String("x".into());
    assert!(matches!(
        deepclone::clone_dyn(&src, &mut not_ref),
        Err(CloneError::DestinationNotWritable)
    ));

    // Pointee types must match
    let mut wrong = Value::Pointer(PointerValue::new(string_type, Value::from("")));
    assert!(matches!(
        deepclone::clone_dyn(&src, &mut wrong),
        Err(CloneError::TypeMismatch { .. })
    ));
}

#[test]
fn test_clone_dyn_copies_into_referent() {
    let string_type = Arc::new(TypeDescriptor::scalar(ScalarKind::String));
    let map_type = Arc::new(TypeDescriptor::map(string_type.clone(), string_type.clone()));

    let mut entries = MapValue::new(string_type.clone(), string_type.clone());
    entries.insert("a", "aaa");
    let mut src = Value::Pointer(PointerValue::new(map_type.clone(), Value::Map(entries)));
    let mut dst = Value::Pointer(PointerValue::new(
        map_type,
        Value::Map(MapValue::nil(string_type.clone(), string_type)),
    ));

    deepclone::clone_dyn(&src, &mut dst).expect("clone");
    if let Some(Value::Map(map)) = src.pointee_mut() {
        map.clear();
    }
    let Some(Value::Map(copied)) = dst.pointee() else {
        panic!("expected map referent");
    };
    assert_eq!(copied.get("a"), Some(&Value::from("aaa")));
}

#[test]
fn test_reflect_descriptor_is_stable() {
    assert_eq!(Account::type_descriptor(), Account::type_descriptor());
    assert!(Account::type_descriptor().name.ends_with("::Account"));
}
